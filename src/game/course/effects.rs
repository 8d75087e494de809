//! Cosmetic observers of the course. They read the run and its messages, never write them.

use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;

use crate::screens::Screen;

use super::{
    CheckpointReached,
    obstacles::{CheckpointGate, GATE_SIZE},
    proximity::ZoneKind,
    run::{CourseRun, RunState},
};

const PARTICLE_COUNT: usize = 50;
const PARTICLE_RISE_SPEED: f32 = 1.2;
const PARTICLE_LIFETIME: Duration = Duration::from_millis(2500);

/// Light column over the start or end zone.
#[derive(Component, Debug)]
pub struct CourseBeacon(pub ZoneKind);

/// Emissive glow oscillating around `base` with the clock.
#[derive(Component, Debug, Clone)]
pub struct EmissivePulse {
    color: LinearRgba,
    base: f32,
    amplitude: f32,
    speed: f32,
}

impl EmissivePulse {
    pub fn new(color: Color, base: f32, amplitude: f32, speed: f32) -> Self {
        Self {
            color: color.to_linear(),
            base,
            amplitude,
            speed,
        }
    }

    pub fn intensity(&self, elapsed_secs: f32) -> f32 {
        self.base + (elapsed_secs * self.speed).sin() * self.amplitude
    }
}

/// Constant rotation around the local up axis, in radians per second.
#[derive(Component, Debug)]
pub struct Spin(pub f32);

#[derive(Component, Debug)]
struct CheckpointParticle {
    lifetime: Timer,
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (
            update_beacons,
            pulse_emissive,
            spin,
            burst_particles,
            rise_particles,
        )
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// Whether the beacon of `kind` should be shown in `state`.
pub fn beacon_armed(kind: ZoneKind, state: RunState) -> bool {
    match kind {
        ZoneKind::Start => state == RunState::Idle,
        ZoneKind::End => state != RunState::Finished,
        ZoneKind::Checkpoint(_) => state == RunState::Running,
    }
}

fn update_beacons(
    run: Option<Res<CourseRun>>,
    mut beacon_query: Query<(&CourseBeacon, &mut Visibility)>,
) {
    let state = run.map(|run| run.state()).unwrap_or_default();
    for (beacon, mut visibility) in &mut beacon_query {
        let target = if beacon_armed(beacon.0, state) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        visibility.set_if_neq(target);
    }
}

fn pulse_emissive(
    time: Res<Time>,
    pulse_query: Query<(&EmissivePulse, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let elapsed = time.elapsed_secs();
    for (pulse, material) in &pulse_query {
        if let Some(material) = materials.get_mut(&material.0) {
            material.emissive = pulse.color * pulse.intensity(elapsed);
        }
    }
}

fn spin(time: Res<Time>, mut spin_query: Query<(&Spin, &mut Transform)>) {
    for (spin, mut transform) in &mut spin_query {
        transform.rotate_y(spin.0 * time.delta_secs());
    }
}

/// Sprinkles particles over the gate that was just passed.
fn burst_particles(
    mut commands: Commands,
    mut reached: MessageReader<CheckpointReached>,
    gate_query: Query<(&CheckpointGate, &GlobalTransform)>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for checkpoint in reached.read() {
        let Some((_, gate_transform)) = gate_query
            .iter()
            .find(|(gate, _)| gate.index == checkpoint.index)
        else {
            continue;
        };

        let mesh = meshes.add(Sphere::new(0.05));
        let material = materials.add(StandardMaterial {
            base_color: Color::srgba(0.298, 0.686, 0.314, 0.6),
            emissive: LinearRgba::rgb(0.3, 1.0, 0.3),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
        let mut rng = rand::rng();
        let gate = gate_transform.compute_transform();

        for _ in 0..PARTICLE_COUNT {
            let local = Vec3::new(
                rng.random_range(-0.5..0.5) * GATE_SIZE.x,
                rng.random_range(-0.5..0.5) * GATE_SIZE.y,
                rng.random_range(-0.5..0.5) * GATE_SIZE.z,
            );
            commands.spawn((
                Name::new("Checkpoint Particle"),
                CheckpointParticle {
                    lifetime: Timer::new(PARTICLE_LIFETIME, TimerMode::Once),
                },
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::from_translation(gate.transform_point(local)),
                DespawnOnExit(Screen::Gameplay),
            ));
        }
    }
}

fn rise_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut particle_query: Query<(Entity, &mut CheckpointParticle, &mut Transform)>,
) {
    for (entity, mut particle, mut transform) in &mut particle_query {
        particle.lifetime.tick(time.delta());
        if particle.lifetime.is_finished() {
            commands.entity(entity).despawn();
            continue;
        }
        transform.translation.y += PARTICLE_RISE_SPEED * time.delta_secs();
        transform.scale = Vec3::splat(1.0 - particle.lifetime.fraction());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_beacon_only_while_idle() {
        assert!(beacon_armed(ZoneKind::Start, RunState::Idle));
        assert!(!beacon_armed(ZoneKind::Start, RunState::Running));
        assert!(!beacon_armed(ZoneKind::Start, RunState::Finished));
    }

    #[test]
    fn test_end_beacon_hidden_once_finished() {
        assert!(beacon_armed(ZoneKind::End, RunState::Idle));
        assert!(beacon_armed(ZoneKind::End, RunState::Running));
        assert!(!beacon_armed(ZoneKind::End, RunState::Finished));
    }

    #[test]
    fn test_pulse_stays_within_amplitude() {
        let pulse = EmissivePulse::new(Color::WHITE, 0.2, 0.1, 2.0);
        assert_eq!(pulse.intensity(0.0), 0.2);
        for step in 0..100 {
            let intensity = pulse.intensity(step as f32 * 0.37);
            assert!((0.1 - 1e-6..=0.3 + 1e-6).contains(&intensity));
        }
    }
}
