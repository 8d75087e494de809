use bevy::prelude::*;

use super::follow::CameraState;
use crate::game::configs::OrbitSettings;

/// Free-look camera orbiting a target that re-centers on the character every frame.
///
/// `polar` is measured from straight up; `azimuth` 0 puts the camera on the +Z side.
#[derive(Component, Debug, Clone)]
pub struct OrbitRig {
    pub settings: OrbitSettings,
    pub azimuth: f32,
    pub polar: f32,
    pub distance: f32,
    pub target: Vec3,
}

impl OrbitRig {
    pub fn new(mut settings: OrbitSettings) -> Self {
        // clamp() panics on inverted bounds
        settings.max_polar = settings.max_polar.max(settings.min_polar);
        settings.max_distance = settings.max_distance.max(settings.min_distance);
        let polar = 1.1_f32.clamp(settings.min_polar, settings.max_polar);
        let distance = 8.0_f32.clamp(settings.min_distance, settings.max_distance);
        Self {
            settings,
            azimuth: 0.0,
            polar,
            distance,
            target: Vec3::ZERO,
        }
    }

    /// Applies a mouse drag in pixels.
    pub fn rotate(&mut self, drag: Vec2) {
        self.azimuth -= drag.x * self.settings.sensitivity;
        self.polar = (self.polar - drag.y * self.settings.sensitivity)
            .clamp(self.settings.min_polar, self.settings.max_polar);
    }

    /// Positive `lines` zooms in.
    pub fn zoom(&mut self, lines: f32) {
        self.distance = (self.distance - lines * self.settings.zoom_step)
            .clamp(self.settings.min_distance, self.settings.max_distance);
    }

    pub fn recenter(&mut self, character_position: Vec3) {
        self.target = character_position + Vec3::Y * self.settings.eye_height;
    }

    pub fn camera_state(&self) -> CameraState {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        let offset = Vec3::new(sin_polar * sin_azimuth, cos_polar, sin_polar * cos_azimuth);
        CameraState {
            position: self.target + offset * self.distance,
            look_target: self.target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_hold() {
        let mut rig = OrbitRig::new(OrbitSettings::default());
        rig.rotate(Vec2::new(0.0, 100_000.0));
        assert_eq!(rig.polar, rig.settings.min_polar);
        rig.rotate(Vec2::new(0.0, -100_000.0));
        assert_eq!(rig.polar, rig.settings.max_polar);

        rig.zoom(1000.0);
        assert_eq!(rig.distance, rig.settings.min_distance);
        rig.zoom(-1000.0);
        assert_eq!(rig.distance, rig.settings.max_distance);
    }

    #[test]
    fn test_follows_target() {
        let mut rig = OrbitRig::new(OrbitSettings::default());
        rig.recenter(Vec3::new(4.0, 0.0, -3.0));
        let state = rig.camera_state();
        assert_eq!(state.look_target, Vec3::new(4.0, 1.5, -3.0));
        assert!((state.position.distance(state.look_target) - rig.distance).abs() < 1e-4);
        // Azimuth 0 sits behind a character facing -Z.
        assert!(state.position.z > state.look_target.z);
    }

    #[test]
    fn test_inverted_limits_do_not_panic() {
        let rig = OrbitRig::new(OrbitSettings {
            min_distance: 10.0,
            max_distance: 2.0,
            ..default()
        });
        assert_eq!(rig.distance, 10.0);
    }
}
