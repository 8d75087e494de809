use std::{
    f32::consts::{PI, TAU},
    time::Duration,
};

use bevy::prelude::*;

use super::{Player, input::{ControlVector, InputState}};
use crate::game::{camera_controller::GameplayCamera, configs::MovementSettings};

/// Discrete movement state, drives which locomotion clip plays.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum LocomotionMode {
    #[default]
    Idle,
    Walking,
    Running,
    Jumping,
}

/// Character placement on the ground plane. `yaw` is in (-π, π], 0 faces -Z.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub yaw: f32,
}

/// Kinematic third-person locomotion.
///
/// The only writer of the character [`Pose`]; every other system reads [`pose`](Self::pose).
#[derive(Component, Debug, Clone)]
pub struct MotionController {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub jump_duration: Duration,
    /// Longest frame delta integrated in one step, longer stalls are clamped.
    pub max_frame_delta: f32,
    pose: Pose,
    mode: LocomotionMode,
    velocity: Vec3,
    jump_remaining: Option<Duration>,
    jump_held: bool,
    /// Camera forward captured when the held direction keys last changed.
    held_basis: Option<([bool; 4], Vec3)>,
}

impl Default for MotionController {
    fn default() -> Self {
        Self::new(&MovementSettings::default(), Vec3::ZERO)
    }
}

impl MotionController {
    pub fn new(settings: &MovementSettings, position: Vec3) -> Self {
        Self {
            walk_speed: settings.walk_speed,
            run_speed: settings.run_speed,
            jump_duration: Duration::from_millis(settings.jump_fallback_ms),
            max_frame_delta: settings.max_frame_delta,
            pose: Pose { position, yaw: 0.0 },
            mode: LocomotionMode::Idle,
            velocity: Vec3::ZERO,
            jump_remaining: None,
            jump_held: false,
            held_basis: None,
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn mode(&self) -> LocomotionMode {
        self.mode
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Advances one frame.
    ///
    /// Directions are relative to `camera_forward` flattened onto the ground, sampled when
    /// the set of held direction keys changes and kept while it stays the same. A camera
    /// that swings around the character therefore cannot reverse a held direction.
    /// Negative or non-finite deltas count as zero.
    pub fn step(&mut self, controls: ControlVector, camera_forward: Vec3, delta: f32) -> Pose {
        let delta = if delta.is_finite() {
            delta.max(0.0).min(self.max_frame_delta.max(0.0))
        } else {
            0.0
        };

        let keys = [controls.forward, controls.backward, controls.left, controls.right];
        let basis_forward = match self.held_basis {
            Some((held, forward)) if held == keys => forward,
            _ => camera_forward,
        };
        self.held_basis = keys.contains(&true).then_some((keys, basis_forward));

        let (forward, right) = movement_basis(basis_forward);
        let mut direction = Vec3::ZERO;
        if controls.forward {
            direction += forward;
        }
        if controls.backward {
            direction -= forward;
        }
        if controls.left {
            direction -= right;
        }
        if controls.right {
            direction += right;
        }

        let jump_pressed = controls.jump && !self.jump_held;
        self.jump_held = controls.jump;

        if direction.length_squared() > 0.0 {
            let speed = if controls.run {
                self.run_speed
            } else {
                self.walk_speed
            };
            self.velocity = direction.normalize() * speed;
            self.pose.position += self.velocity * delta;
            self.pose.yaw = yaw_for(self.velocity);
        } else {
            self.velocity = Vec3::ZERO;
        }

        if jump_pressed && self.mode != LocomotionMode::Jumping {
            self.mode = LocomotionMode::Jumping;
            self.jump_remaining = Some(self.jump_duration);
        } else if let Some(remaining) = self.jump_remaining {
            let remaining = remaining.saturating_sub(Duration::from_secs_f32(delta));
            self.jump_remaining = (!remaining.is_zero()).then_some(remaining);
        }

        if self.jump_remaining.is_none() {
            self.mode = match (self.velocity == Vec3::ZERO, controls.run) {
                (true, _) => LocomotionMode::Idle,
                (false, false) => LocomotionMode::Walking,
                (false, true) => LocomotionMode::Running,
            };
        }

        self.pose
    }
}

/// Horizontal forward and right unit vectors for camera-relative input.
///
/// Falls back to world -Z when the camera looks straight up or down.
pub fn movement_basis(camera_forward: Vec3) -> (Vec3, Vec3) {
    let forward = Vec3::new(camera_forward.x, 0.0, camera_forward.z)
        .try_normalize()
        .unwrap_or(Vec3::NEG_Z);
    (forward, forward.cross(Vec3::Y))
}

/// Yaw that turns the character's -Z forward onto `direction`.
pub fn yaw_for(direction: Vec3) -> f32 {
    normalize_yaw(f32::atan2(-direction.x, -direction.z))
}

/// Wraps an angle into (-π, π].
pub fn normalize_yaw(yaw: f32) -> f32 {
    let wrapped = yaw.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

pub fn apply_motion(
    time: Res<Time>,
    input: Res<InputState>,
    camera_query: Query<&Transform, (With<GameplayCamera>, Without<Player>)>,
    mut player_query: Query<(&mut MotionController, &mut LocomotionMode, &mut Transform), With<Player>>,
) {
    let controls = input.controls();
    let camera_forward = camera_query
        .single()
        .map(|transform| transform.forward().as_vec3())
        .unwrap_or(Vec3::NEG_Z);
    let delta = time.delta_secs();

    for (mut controller, mut mode, mut transform) in &mut player_query {
        if delta > controller.max_frame_delta {
            debug!("Stalled frame of {delta:.3}s clamped to {}s", controller.max_frame_delta);
        }
        let pose = controller.step(controls, camera_forward, delta);
        transform.translation = pose.position;
        transform.rotation = Quat::from_rotation_y(pose.yaw);
        mode.set_if_neq(controller.mode());
    }
}
