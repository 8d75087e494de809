use std::time::Duration;

use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::proximity::{TriggerZone, ZoneId, ZoneKind};

/// Declarative course layout loaded from a `.course.ron` file.
///
/// Loaded once during [`Screen::Loading`](crate::screens::Screen::Loading) and never
/// mutated afterwards. Start and end are optional only so that a missing zone surfaces
/// as a validation error instead of a parse error.
#[derive(Asset, Resource, Reflect, Clone, Debug, Serialize, Deserialize)]
pub struct CourseConfig {
    pub start: Option<ZoneConfig>,
    pub end: Option<ZoneConfig>,
    #[serde(default)]
    pub checkpoints: Vec<CheckpointConfig>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleConfig>,
    /// Time the finished run stays on screen before the start zone re-arms.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    #[serde(default)]
    pub checkpoint_policy: CheckpointPolicy,
}

#[derive(Reflect, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub position: [f32; 3],
    pub radius: f32,
}

#[derive(Reflect, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckpointConfig {
    /// Zero-based; the report shows it as `index + 1`.
    pub index: usize,
    pub position: [f32; 3],
    pub radius: f32,
    /// Yaw of the gate mesh in radians, purely visual.
    #[serde(default)]
    pub facing: f32,
}

#[derive(Reflect, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Wall,
    Platform,
    /// Two edge markers around an empty span; only the markers collide.
    Gap,
    CandyPillar,
    CandyBubble,
    CandyBridge,
    CandyPyramid,
    CandyPlatform,
}

#[derive(Reflect, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    pub kind: ObstacleKind,
    pub position: [f32; 3],
    /// Full extents. Round shapes read `scale[0]` as radius and `scale[1]` as height.
    pub scale: [f32; 3],
}

/// Whether checkpoints must be visited in declared index order.
#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckpointPolicy {
    /// Every first visit is recorded, whatever the order.
    #[default]
    AnyOrder,
    /// Only the next unvisited index counts, and the end zone needs all of them.
    InOrder,
}

fn default_cooldown_ms() -> u64 {
    2000
}

#[derive(Debug, Error, PartialEq)]
pub enum CourseConfigError {
    #[error("course has no {0} zone")]
    MissingZone(&'static str),
    #[error("{zone} zone has radius {radius}, a trigger radius must be positive")]
    NonPositiveRadius { zone: String, radius: f32 },
    #[error("{zone} zone position {position:?} is not finite")]
    NonFinitePosition { zone: String, position: [f32; 3] },
    #[error("checkpoint {0} is declared more than once")]
    DuplicateCheckpoint(usize),
    #[error("checkpoint indices must run from 0 without holes, {0} is missing")]
    MissingCheckpoint(usize),
    #[error("obstacle #{index} ({kind:?}) has non-positive scale {scale:?}")]
    NonPositiveScale {
        index: usize,
        kind: ObstacleKind,
        scale: [f32; 3],
    },
    #[error("finish cooldown must be longer than zero")]
    ZeroCooldown,
}

/// A validated, immutable set of trigger zones.
#[derive(Resource, Debug, Clone)]
pub struct Course {
    zones: Vec<TriggerZone>,
    checkpoint_count: usize,
    pub cooldown: Duration,
    pub policy: CheckpointPolicy,
}

impl Course {
    pub fn zones(&self) -> &[TriggerZone] {
        &self.zones
    }

    pub fn checkpoint_count(&self) -> usize {
        self.checkpoint_count
    }

    pub fn zone(&self, kind: ZoneKind) -> Option<&TriggerZone> {
        self.zones.iter().find(|zone| zone.kind == kind)
    }
}

impl CourseConfig {
    /// Default course shipped with the game.
    pub const PATH: &'static str = "config/default.course.ron";

    pub fn from_ron_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let config: CourseConfig = ron::de::from_bytes(bytes)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CourseConfigError> {
        self.build().map(|_| ())
    }

    /// Validates the layout and turns it into trigger zones.
    pub fn build(&self) -> Result<Course, CourseConfigError> {
        if self.cooldown_ms == 0 {
            return Err(CourseConfigError::ZeroCooldown);
        }

        let start = self.start.ok_or(CourseConfigError::MissingZone("start"))?;
        let end = self.end.ok_or(CourseConfigError::MissingZone("end"))?;

        let mut zones = Vec::with_capacity(self.checkpoints.len() + 2);
        let mut push = |label: String, position: [f32; 3], radius: f32, kind: ZoneKind| {
            if !position.iter().all(|c| c.is_finite()) {
                return Err(CourseConfigError::NonFinitePosition {
                    zone: label,
                    position,
                });
            }
            if !(radius > 0.0) || !radius.is_finite() {
                return Err(CourseConfigError::NonPositiveRadius {
                    zone: label,
                    radius,
                });
            }
            zones.push(TriggerZone {
                id: ZoneId(zones.len()),
                position: Vec3::from_array(position),
                radius,
                kind,
            });
            Ok(())
        };

        push("start".into(), start.position, start.radius, ZoneKind::Start)?;
        for checkpoint in &self.checkpoints {
            push(
                format!("checkpoint {}", checkpoint.index),
                checkpoint.position,
                checkpoint.radius,
                ZoneKind::Checkpoint(checkpoint.index),
            )?;
        }
        push("end".into(), end.position, end.radius, ZoneKind::End)?;

        let mut indices: Vec<usize> = self.checkpoints.iter().map(|c| c.index).collect();
        indices.sort_unstable();
        for (expected, window) in indices.windows(2).enumerate() {
            if window[0] == window[1] {
                return Err(CourseConfigError::DuplicateCheckpoint(window[0]));
            }
            if window[0] != expected {
                return Err(CourseConfigError::MissingCheckpoint(expected));
            }
        }
        if let Some(last) = indices.last() {
            if *last != indices.len() - 1 {
                return Err(CourseConfigError::MissingCheckpoint(indices.len() - 1));
            }
        }

        for (index, obstacle) in self.obstacles.iter().enumerate() {
            if obstacle.scale.iter().any(|s| !(*s > 0.0)) {
                return Err(CourseConfigError::NonPositiveScale {
                    index,
                    kind: obstacle.kind,
                    scale: obstacle.scale,
                });
            }
        }

        Ok(Course {
            zones,
            checkpoint_count: indices.len(),
            cooldown: Duration::from_millis(self.cooldown_ms),
            policy: self.checkpoint_policy,
        })
    }
}

/// Asset loader for `.course.ron` files. Rejects invalid layouts at load time.
#[derive(Default)]
pub struct CourseConfigLoader;

impl AssetLoader for CourseConfigLoader {
    type Asset = CourseConfig;
    type Settings = ();
    type Error = anyhow::Error;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        CourseConfig::from_ron_bytes(&bytes).map_err(|err| {
            anyhow::anyhow!("invalid course {}: {err}", load_context.asset_path())
        })
    }

    fn extensions(&self) -> &[&str] {
        &["course.ron"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COURSE: &str = r#"(
        start: Some((position: (0.0, 0.0, 0.0), radius: 2.0)),
        end: Some((position: (20.0, 0.0, 0.0), radius: 2.0)),
        checkpoints: [
            (index: 1, position: (12.0, 0.0, 0.0), radius: 2.0),
            (index: 0, position: (7.0, 0.0, 0.0), radius: 2.0, facing: 1.57),
        ],
        obstacles: [
            (kind: Wall, position: (5.0, 1.5, 0.0), scale: (0.5, 3.0, 4.0)),
        ],
        checkpoint_policy: InOrder,
    )"#;

    fn zone(x: f32) -> Option<ZoneConfig> {
        Some(ZoneConfig {
            position: [x, 0.0, 0.0],
            radius: 2.0,
        })
    }

    fn config() -> CourseConfig {
        CourseConfig {
            start: zone(0.0),
            end: zone(20.0),
            checkpoints: Vec::new(),
            obstacles: Vec::new(),
            cooldown_ms: 2000,
            checkpoint_policy: CheckpointPolicy::AnyOrder,
        }
    }

    #[test]
    fn test_parse_course() {
        let config = CourseConfig::from_ron_bytes(COURSE.as_bytes()).unwrap();
        assert_eq!(config.cooldown_ms, 2000);
        assert_eq!(config.checkpoint_policy, CheckpointPolicy::InOrder);

        let course = config.build().unwrap();
        assert_eq!(course.zones().len(), 4);
        assert_eq!(course.checkpoint_count(), 2);
        assert_eq!(course.cooldown, Duration::from_secs(2));
        let end = course.zone(ZoneKind::End).unwrap();
        assert_eq!(end.position, Vec3::new(20.0, 0.0, 0.0));
    }

    #[test]
    fn test_missing_end_zone_is_rejected() {
        let config = CourseConfig {
            end: None,
            ..config()
        };
        assert_eq!(
            config.validate(),
            Err(CourseConfigError::MissingZone("end"))
        );
    }

    #[test]
    fn test_non_positive_radius_is_rejected() {
        let mut config = config();
        config.checkpoints.push(CheckpointConfig {
            index: 0,
            position: [5.0, 0.0, 0.0],
            radius: 0.0,
            facing: 0.0,
        });
        assert!(matches!(
            config.validate(),
            Err(CourseConfigError::NonPositiveRadius { radius, .. }) if radius == 0.0
        ));

        let config = CourseConfig {
            start: Some(ZoneConfig {
                position: [0.0; 3],
                radius: -1.0,
            }),
            ..self::config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_checkpoint_indices_must_be_contiguous() {
        let checkpoint = |index| CheckpointConfig {
            index,
            position: [5.0, 0.0, 0.0],
            radius: 1.0,
            facing: 0.0,
        };

        let mut duplicated = config();
        duplicated.checkpoints = vec![checkpoint(0), checkpoint(0)];
        assert_eq!(
            duplicated.validate(),
            Err(CourseConfigError::DuplicateCheckpoint(0))
        );

        let mut holed = config();
        holed.checkpoints = vec![checkpoint(0), checkpoint(2)];
        assert_eq!(
            holed.validate(),
            Err(CourseConfigError::MissingCheckpoint(1))
        );

        let mut late = config();
        late.checkpoints = vec![checkpoint(1)];
        assert_eq!(late.validate(), Err(CourseConfigError::MissingCheckpoint(0)));
    }

    #[test]
    fn test_zero_cooldown_is_rejected() {
        let config = CourseConfig {
            cooldown_ms: 0,
            ..config()
        };
        assert_eq!(config.validate(), Err(CourseConfigError::ZeroCooldown));
    }

    #[test]
    fn test_bad_ron_fails_loading() {
        assert!(CourseConfig::from_ron_bytes(b"(start: ").is_err());
        let no_start = r#"(end: Some((position: (1.0, 0.0, 0.0), radius: 1.0)))"#;
        let err = CourseConfig::from_ron_bytes(no_start.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("start"));
    }

    #[test]
    fn test_shipped_course_is_valid() {
        let bytes = include_bytes!("../../../assets/config/default.course.ron");
        let course = CourseConfig::from_ron_bytes(bytes).unwrap().build().unwrap();
        assert_eq!(course.checkpoint_count(), 2);
        assert_eq!(course.policy, CheckpointPolicy::AnyOrder);
        assert!(CourseConfig::PATH.ends_with("default.course.ron"));
    }
}
