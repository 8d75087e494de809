use bevy::prelude::*;

use crate::game::{configs::FollowSettings, player::movement::Pose};

/// Where the camera sits and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub look_target: Vec3,
}

/// Automatic chase camera trailing the character.
///
/// Seeded at the ideal spot on its first update, then eased towards it so the camera
/// never jumps after start-up.
#[derive(Component, Debug, Clone)]
pub struct FollowRig {
    pub settings: FollowSettings,
    state: Option<CameraState>,
}

impl FollowRig {
    pub fn new(settings: FollowSettings) -> Self {
        Self {
            settings,
            state: None,
        }
    }

    pub fn state(&self) -> Option<CameraState> {
        self.state
    }

    /// `distance` behind and `height` above the character, rotated with its yaw.
    pub fn ideal(&self, pose: Pose) -> CameraState {
        let offset = Vec3::new(0.0, self.settings.height, self.settings.distance);
        CameraState {
            position: pose.position + Quat::from_rotation_y(pose.yaw) * offset,
            look_target: pose.position + Vec3::Y * self.settings.eye_height,
        }
    }

    pub fn update(&mut self, pose: Pose, delta: f32) -> CameraState {
        let ideal = self.ideal(pose);
        let next = match self.state {
            None => ideal,
            Some(current) => CameraState {
                position: current
                    .position
                    .lerp(ideal.position, smoothing_factor(self.settings.sharpness, delta)),
                look_target: ideal.look_target,
            },
        };
        self.state = Some(next);
        next
    }
}

/// Fraction of the remaining gap closed in `delta` seconds.
///
/// Exponential decay, so two half frames close the same gap as one full frame.
pub fn smoothing_factor(sharpness: f32, delta: f32) -> f32 {
    if !delta.is_finite() || delta <= 0.0 {
        return 0.0;
    }
    1.0 - (-sharpness.max(0.0) * delta).exp()
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn rig() -> FollowRig {
        FollowRig::new(FollowSettings {
            distance: 6.0,
            height: 3.0,
            eye_height: 1.5,
            sharpness: 5.0,
        })
    }

    #[test]
    fn test_first_update_seeds_at_ideal() {
        let mut rig = rig();
        let pose = Pose {
            position: Vec3::new(2.0, 0.0, 2.0),
            yaw: 0.0,
        };
        let state = rig.update(pose, 0.016);
        assert_eq!(state.position, Vec3::new(2.0, 3.0, 8.0));
        assert_eq!(state.look_target, Vec3::new(2.0, 1.5, 2.0));
    }

    #[test]
    fn test_ideal_stays_behind_character() {
        // Facing +X (yaw -π/2), behind is -X.
        let ideal = rig().ideal(Pose {
            position: Vec3::ZERO,
            yaw: -FRAC_PI_2,
        });
        assert!(ideal.position.distance(Vec3::new(-6.0, 3.0, 0.0)) < 1e-4);
    }

    #[test]
    fn test_eases_without_overshoot() {
        let mut rig = rig();
        rig.update(Pose::default(), 0.016);
        let moved = Pose {
            position: Vec3::new(0.0, 0.0, -10.0),
            yaw: 0.0,
        };
        let ideal = rig.ideal(moved).position;

        let mut previous = rig.state().unwrap().position.distance(ideal);
        for _ in 0..30 {
            let state = rig.update(moved, 0.016);
            let gap = state.position.distance(ideal);
            assert!(gap < previous);
            previous = gap;
        }
        assert!(previous > 0.0);
    }

    #[test]
    fn test_smoothing_is_frame_rate_independent() {
        let one = smoothing_factor(5.0, 0.1);
        let half = smoothing_factor(5.0, 0.05);
        let two_halves = 1.0 - (1.0 - half) * (1.0 - half);
        assert!((one - two_halves).abs() < 1e-6);
        assert_eq!(smoothing_factor(5.0, 0.0), 0.0);
        assert_eq!(smoothing_factor(5.0, -1.0), 0.0);
    }
}
