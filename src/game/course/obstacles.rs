use std::f32::consts::FRAC_PI_2;

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::screens::Screen;

use super::{
    config::{CourseConfig, ObstacleConfig, ObstacleKind},
    effects::{CourseBeacon, EmissivePulse, Spin},
    proximity::ZoneKind,
};

/// Size of a checkpoint gate, width by height by depth.
pub const GATE_SIZE: Vec3 = Vec3::new(4.0, 3.0, 0.1);

const WALL_COLOR: Color = Color::srgb(0.4, 0.4, 0.4);
const PLATFORM_COLOR: Color = Color::srgb(0.267, 0.267, 0.267);
const GAP_EDGE_COLOR: Color = Color::srgb(1.0, 0.267, 0.267);
const START_COLOR: Color = Color::srgb(0.0, 1.0, 0.0);
const END_COLOR: Color = Color::srgb(1.0, 0.2, 0.4);
const GATE_COLOR: Color = Color::srgb(0.298, 0.686, 0.314);

const CANDY_PINK: Color = Color::srgb(1.0, 0.412, 0.706);
const CANDY_BLUE: Color = Color::srgb(0.529, 0.808, 0.922);
const CANDY_YELLOW: Color = Color::srgb(1.0, 0.843, 0.0);
const CANDY_GREEN: Color = Color::srgb(0.596, 0.984, 0.596);
const CANDY_PURPLE: Color = Color::srgb(0.867, 0.627, 0.867);

/// A gate marking checkpoint `index`.
#[derive(Component, Debug)]
pub struct CheckpointGate {
    pub index: usize,
}

/// Spawns the zone markers and the obstacles of the loaded course.
pub(super) fn spawn_course(
    mut commands: Commands,
    config: Option<Res<CourseConfig>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(config) = config else {
        return;
    };

    let root = commands
        .spawn((
            Name::new("Obstacle Course"),
            Transform::default(),
            Visibility::default(),
            DespawnOnExit(Screen::Gameplay),
        ))
        .id();

    if let Some(start) = config.start {
        let position = Vec3::from_array(start.position);
        let marker = spawn_start_marker(&mut commands, &mut meshes, &mut materials, position, start.radius);
        commands.entity(root).add_child(marker);
    }
    if let Some(end) = config.end {
        let position = Vec3::from_array(end.position);
        let marker = spawn_end_marker(&mut commands, &mut meshes, &mut materials, position, end.radius);
        commands.entity(root).add_child(marker);
    }

    for checkpoint in &config.checkpoints {
        let color = GATE_COLOR.with_alpha(0.3);
        let gate = commands
            .spawn((
                Name::new(format!("Checkpoint {}", checkpoint.index + 1)),
                CheckpointGate {
                    index: checkpoint.index,
                },
                Mesh3d(meshes.add(Cuboid::from_size(GATE_SIZE))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: color,
                    alpha_mode: AlphaMode::Blend,
                    metallic: 0.8,
                    perceptual_roughness: 0.2,
                    clearcoat: 1.0,
                    ..default()
                })),
                EmissivePulse::new(GATE_COLOR, 0.4, 0.1, 2.0),
                Transform::from_translation(
                    Vec3::from_array(checkpoint.position) + Vec3::Y * GATE_SIZE.y / 2.0,
                )
                .with_rotation(Quat::from_rotation_y(checkpoint.facing)),
            ))
            .id();
        commands.entity(root).add_child(gate);
    }

    for (index, obstacle) in config.obstacles.iter().enumerate() {
        let entity = spawn_obstacle(&mut commands, &mut meshes, &mut materials, obstacle);
        commands.entity(entity).insert(Name::new(format!("{:?} #{index}", obstacle.kind)));
        commands.entity(root).add_child(entity);
    }

    info!(
        "Spawned course with {} checkpoints and {} obstacles",
        config.checkpoints.len(),
        config.obstacles.len()
    );
}

fn spawn_start_marker(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    position: Vec3,
    radius: f32,
) -> Entity {
    commands
        .spawn((
            Name::new("Start"),
            Transform::from_translation(position),
            Visibility::default(),
            children![
                (
                    Name::new("Start Pad"),
                    Mesh3d(meshes.add(Cylinder::new(radius, 0.2))),
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color: START_COLOR,
                        metallic: 0.4,
                        perceptual_roughness: 0.5,
                        ..default()
                    })),
                    Transform::from_xyz(0.0, 0.1, 0.0),
                ),
                (
                    Name::new("Flag Pole"),
                    Mesh3d(meshes.add(Cylinder::new(0.1, 4.0))),
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color: Color::srgb(0.533, 0.533, 0.533),
                        metallic: 0.6,
                        perceptual_roughness: 0.2,
                        ..default()
                    })),
                    Transform::from_xyz(0.0, 2.0, 0.0),
                ),
                (
                    Name::new("Flag"),
                    Mesh3d(meshes.add(Cuboid::new(1.0, 0.8, 0.05))),
                    MeshMaterial3d(materials.add(START_COLOR)),
                    Transform::from_xyz(0.5, 3.5, 0.0),
                ),
                beacon(meshes, materials, ZoneKind::Start, START_COLOR),
            ],
        ))
        .id()
}

fn spawn_end_marker(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    position: Vec3,
    radius: f32,
) -> Entity {
    const HOLOGRAM_HEIGHT: f32 = 4.0;

    commands
        .spawn((
            Name::new("Finish"),
            Transform::from_translation(position),
            Visibility::default(),
            children![
                (
                    Name::new("Finish Hologram"),
                    Mesh3d(meshes.add(Cylinder::new(radius, HOLOGRAM_HEIGHT))),
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color: END_COLOR.with_alpha(0.3),
                        alpha_mode: AlphaMode::Blend,
                        metallic: 0.8,
                        perceptual_roughness: 0.2,
                        ..default()
                    })),
                    EmissivePulse::new(END_COLOR, 0.5, 0.2, 2.0),
                    Spin(0.3),
                    Transform::from_xyz(0.0, HOLOGRAM_HEIGHT / 2.0, 0.0),
                ),
                (
                    Name::new("Finish Ring"),
                    Mesh3d(meshes.add(Torus::new(radius, radius + 0.2))),
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color: END_COLOR,
                        emissive: END_COLOR.to_linear(),
                        ..default()
                    })),
                    Spin(-0.6),
                    Transform::from_xyz(0.0, 0.05, 0.0),
                ),
                beacon(meshes, materials, ZoneKind::End, END_COLOR),
            ],
        ))
        .id()
}

/// Tall light column that is only shown while its zone is armed.
fn beacon(
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    kind: ZoneKind,
    color: Color,
) -> impl Bundle {
    const BEACON_HEIGHT: f32 = 30.0;

    (
        Name::new("Beacon"),
        CourseBeacon(kind),
        Mesh3d(meshes.add(Cylinder::new(0.3, BEACON_HEIGHT))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: color.with_alpha(0.25),
            emissive: color.to_linear(),
            alpha_mode: AlphaMode::Add,
            unlit: true,
            ..default()
        })),
        Transform::from_xyz(0.0, BEACON_HEIGHT / 2.0, 0.0),
    )
}

/// Material shared by the candy obstacles, glowing in their own color.
fn candy_material(color: Color, emissive_intensity: f32) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        emissive: color.to_linear() * emissive_intensity,
        metallic: 0.3,
        perceptual_roughness: 0.2,
        clearcoat: 0.8,
        clearcoat_perceptual_roughness: 0.2,
        ..default()
    }
}

fn spawn_obstacle(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    obstacle: &ObstacleConfig,
) -> Entity {
    let position = Vec3::from_array(obstacle.position);
    let [sx, sy, sz] = obstacle.scale;
    let mut entity = commands.spawn((
        Transform::from_translation(position),
        Visibility::default(),
    ));

    match obstacle.kind {
        ObstacleKind::Wall => {
            entity.insert((
                RigidBody::Static,
                Collider::cuboid(sx, sy, sz),
                Mesh3d(meshes.add(Cuboid::new(sx, sy, sz))),
                MeshMaterial3d(materials.add(WALL_COLOR)),
            ));
        }
        ObstacleKind::Platform => {
            entity.insert((
                RigidBody::Static,
                Collider::cuboid(sx, sy, sz),
                Mesh3d(meshes.add(Cuboid::new(sx, sy, sz))),
                MeshMaterial3d(materials.add(PLATFORM_COLOR)),
            ));
        }
        ObstacleKind::Gap => {
            // Only the edges are solid, the span between them is left open
            let edge_mesh = meshes.add(Cuboid::new(1.0, 0.2, sz));
            let edge_material = materials.add(GAP_EDGE_COLOR);
            for side in [-1.0, 1.0] {
                entity.with_child((
                    Name::new("Gap Edge"),
                    RigidBody::Static,
                    Collider::cuboid(1.0, 0.2, sz),
                    Mesh3d(edge_mesh.clone()),
                    MeshMaterial3d(edge_material.clone()),
                    Transform::from_xyz(side * (sx / 2.0 + 0.5), 0.0, 0.0),
                ));
            }
        }
        ObstacleKind::CandyPillar => {
            entity.insert((
                RigidBody::Static,
                Collider::cylinder(sx, sy),
                Mesh3d(meshes.add(Cylinder::new(sx, sy))),
                MeshMaterial3d(materials.add(candy_material(CANDY_PINK, 0.2))),
                EmissivePulse::new(CANDY_PINK, 0.2, 0.1, 2.0),
            ));
        }
        ObstacleKind::CandyBubble => {
            let mut material = candy_material(CANDY_BLUE.with_alpha(0.8), 0.2);
            material.alpha_mode = AlphaMode::Blend;
            entity.insert((
                RigidBody::Static,
                Collider::sphere(sx),
                Mesh3d(meshes.add(Sphere::new(sx))),
                MeshMaterial3d(materials.add(material)),
                EmissivePulse::new(CANDY_BLUE, 0.2, 0.1, 3.0),
            ));
        }
        ObstacleKind::CandyBridge => {
            entity
                .insert((
                    RigidBody::Static,
                    Collider::cuboid(sx, sy, sz),
                    Mesh3d(meshes.add(Cuboid::new(sx, sy, sz))),
                    MeshMaterial3d(materials.add(candy_material(CANDY_YELLOW, 0.1))),
                ))
                .with_child((
                    Name::new("Bridge Stripes"),
                    Mesh3d(meshes.add(Plane3d::default().mesh().size(sx, sz))),
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color: CANDY_YELLOW.with_alpha(0.3),
                        alpha_mode: AlphaMode::Blend,
                        metallic: 0.5,
                        ..default()
                    })),
                    Transform::from_xyz(0.0, sy / 2.0 + 0.01, 0.0),
                ));
        }
        ObstacleKind::CandyPyramid => {
            entity.insert((
                RigidBody::Static,
                Collider::cone(sx, sy),
                Mesh3d(meshes.add(Cone::new(sx, sy).mesh().resolution(4))),
                MeshMaterial3d(materials.add(candy_material(CANDY_PURPLE, 0.1))),
                // Turn a face towards the course instead of an edge
                Transform::from_translation(position)
                    .with_rotation(Quat::from_rotation_y(FRAC_PI_2 / 2.0)),
            ));
        }
        ObstacleKind::CandyPlatform => {
            entity.insert((
                RigidBody::Static,
                Collider::cuboid(sx, sy, sz),
                Mesh3d(meshes.add(Cuboid::new(sx, sy, sz))),
                MeshMaterial3d(materials.add(candy_material(CANDY_GREEN, 0.1))),
                EmissivePulse::new(CANDY_GREEN, 0.1, 0.05, 1.0),
            ));
        }
    }

    entity.id()
}
