use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Movement and camera tuning loaded from a `.gameplay.ron` file
#[derive(Asset, Resource, Reflect, Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameplayConfig {
    #[serde(default)]
    pub movement: MovementSettings,
    #[serde(default)]
    pub camera: CameraSettings,
}

/// Character locomotion tuning
#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    /// Ground speed without the run key (m/s)
    pub walk_speed: f32,
    /// Ground speed with the run key held (m/s)
    pub run_speed: f32,
    /// Jump lock used until the jump clip reports its own length
    pub jump_fallback_ms: u64,
    /// Frame deltas above this are clamped (s)
    pub max_frame_delta: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            walk_speed: 4.0,
            run_speed: 8.0,
            jump_fallback_ms: 800,
            max_frame_delta: 0.25,
        }
    }
}

/// Which rig drives the gameplay camera. Only one is attached per scene.
#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraMode {
    #[default]
    Follow,
    Orbit,
}

#[derive(Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub mode: CameraMode,
    pub follow: FollowSettings,
    pub orbit: OrbitSettings,
}

/// Automatic chase camera
#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowSettings {
    /// Distance behind the character
    pub distance: f32,
    /// Height above the character origin
    pub height: f32,
    /// Look target height above the character origin
    pub eye_height: f32,
    /// Exponential approach rate (1/s), higher is snappier
    pub sharpness: f32,
}

impl Default for FollowSettings {
    fn default() -> Self {
        Self {
            distance: 6.0,
            height: 3.0,
            eye_height: 1.5,
            sharpness: 6.0,
        }
    }
}

/// Free-look camera orbiting the character
#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    /// Polar angle limits measured from straight up (radians)
    pub min_polar: f32,
    pub max_polar: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Radians per pixel of mouse drag
    pub sensitivity: f32,
    /// Distance change per scroll line
    pub zoom_step: f32,
    pub eye_height: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            min_polar: 0.2,
            max_polar: 1.45,
            min_distance: 3.0,
            max_distance: 15.0,
            sensitivity: 0.005,
            zoom_step: 0.5,
            eye_height: 1.5,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GameplayConfigError {
    #[error("{name} is {value}, it must be a finite number above zero")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} is {value}, it must be a finite number not below zero")]
    Negative { name: &'static str, value: f32 },
    #[error("run speed {run} is slower than walk speed {walk}")]
    RunSlowerThanWalk { walk: f32, run: f32 },
}

fn positive(name: &'static str, value: f32) -> Result<(), GameplayConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GameplayConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), GameplayConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GameplayConfigError::Negative { name, value })
    }
}

impl GameplayConfig {
    /// Path to the gameplay tuning file
    pub const PATH: &'static str = "config/default.gameplay.ron";

    pub fn from_ron_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let config: GameplayConfig = ron::de::from_bytes(bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects tuning the per-frame systems cannot run with.
    pub fn validate(&self) -> Result<(), GameplayConfigError> {
        let movement = &self.movement;
        positive("movement.walk_speed", movement.walk_speed)?;
        positive("movement.run_speed", movement.run_speed)?;
        positive("movement.max_frame_delta", movement.max_frame_delta)?;
        if movement.run_speed < movement.walk_speed {
            return Err(GameplayConfigError::RunSlowerThanWalk {
                walk: movement.walk_speed,
                run: movement.run_speed,
            });
        }

        let follow = &self.camera.follow;
        non_negative("camera.follow.distance", follow.distance)?;
        non_negative("camera.follow.height", follow.height)?;
        non_negative("camera.follow.eye_height", follow.eye_height)?;
        positive("camera.follow.sharpness", follow.sharpness)?;

        let orbit = &self.camera.orbit;
        positive("camera.orbit.min_distance", orbit.min_distance)?;
        positive("camera.orbit.max_distance", orbit.max_distance)?;
        non_negative("camera.orbit.min_polar", orbit.min_polar)?;
        positive("camera.orbit.max_polar", orbit.max_polar)?;
        positive("camera.orbit.sensitivity", orbit.sensitivity)?;
        non_negative("camera.orbit.zoom_step", orbit.zoom_step)?;
        non_negative("camera.orbit.eye_height", orbit.eye_height)?;
        Ok(())
    }
}

/// Asset loader for GameplayConfig RON files
#[derive(Default)]
pub struct GameplayConfigLoader;

impl AssetLoader for GameplayConfigLoader {
    type Asset = GameplayConfig;
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
        GameplayConfig::from_ron_bytes(&bytes).map_err(|err| {
            anyhow::anyhow!("invalid gameplay config {}: {err}", load_context.asset_path())
        })
    }

    fn extensions(&self) -> &[&str] {
        &["gameplay.ron"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: GameplayConfig =
            ron::de::from_str("(camera: (mode: Orbit, orbit: (max_distance: 20.0)))").unwrap();
        assert_eq!(config.movement, MovementSettings::default());
        assert_eq!(config.camera.mode, CameraMode::Orbit);
        assert_eq!(config.camera.orbit.max_distance, 20.0);
        assert_eq!(config.camera.orbit.min_distance, 3.0);
    }

    #[test]
    fn test_run_is_twice_walk_by_default() {
        let movement = MovementSettings::default();
        assert_eq!(movement.run_speed, 2.0 * movement.walk_speed);
        assert_eq!(movement.jump_fallback_ms, 800);
    }

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(GameplayConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_unusable_frame_delta_ceiling() {
        for value in ["-0.1", "0.0", "NaN", "inf"] {
            let file = format!("(movement: (max_frame_delta: {value}))");
            let err = GameplayConfig::from_ron_bytes(file.as_bytes()).unwrap_err();
            assert!(err.to_string().contains("max_frame_delta"), "{value}: {err}");
        }
    }

    #[test]
    fn test_rejects_negative_speeds() {
        let err = GameplayConfig::from_ron_bytes(b"(movement: (walk_speed: -4.0))").unwrap_err();
        assert!(err.to_string().contains("walk_speed"));

        let err = GameplayConfig::from_ron_bytes(b"(movement: (walk_speed: 4.0, run_speed: 2.0))")
            .unwrap_err();
        assert!(err.to_string().contains("slower"));
    }

    #[test]
    fn test_rejects_bad_follow_settings() {
        let mut config = GameplayConfig::default();
        config.camera.follow.sharpness = -6.0;
        assert_eq!(
            config.validate(),
            Err(GameplayConfigError::NotPositive {
                name: "camera.follow.sharpness",
                value: -6.0
            })
        );

        let mut config = GameplayConfig::default();
        config.camera.follow.distance = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(GameplayConfigError::Negative {
                name: "camera.follow.distance",
                ..
            })
        ));
    }

    #[test]
    fn test_shipped_config_is_valid() {
        let bytes = include_bytes!("../../../assets/config/default.gameplay.ron");
        let config = GameplayConfig::from_ron_bytes(bytes).unwrap();
        assert_eq!(config.movement, MovementSettings::default());
    }
}
