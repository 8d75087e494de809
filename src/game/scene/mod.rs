//! The static world around the course: ground, light, the player and the AI character.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::{
    game::{interaction::AiCharacter, player::SpawnPlayer},
    screens::Screen,
};

const GROUND_SIZE: f32 = 200.0;
const GROUND_THICKNESS: f32 = 0.5;

// Just off the start pad so the first run starts on entry
const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, 0.0, 5.0);

const AI_CHARACTER_MODEL: &str = "models/characters/granny.glb";
const AI_CHARACTER_POSITION: Vec3 = Vec3::new(-5.0, 0.0, -5.0);

/// Spawns everything that exists for the whole gameplay session.
pub fn spawn_level(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Name::new("Ground"),
        DespawnOnExit(Screen::Gameplay),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.3, 0.5, 0.3),
            perceptual_roughness: 0.9,
            ..default()
        })),
        children![(
            Name::new("Ground Collider"),
            RigidBody::Static,
            Collider::cuboid(GROUND_SIZE, GROUND_THICKNESS, GROUND_SIZE),
            Transform::from_xyz(0.0, -GROUND_THICKNESS / 2.0, 0.0),
        )],
    ));

    commands.spawn((
        Name::new("Sun"),
        DespawnOnExit(Screen::Gameplay),
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -1.0, -0.5, 0.0)),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 200.0,
        affects_lightmapped_meshes: false,
    });

    commands.spawn((
        Name::new("AI Character"),
        AiCharacter,
        DespawnOnExit(Screen::Gameplay),
        SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(AI_CHARACTER_MODEL))),
        Transform::from_translation(AI_CHARACTER_POSITION),
        RigidBody::Static,
        children![(
            Name::new("AI Character Collider"),
            Collider::capsule(0.4, 1.0),
            Transform::from_xyz(0.0, 0.9, 0.0),
        )],
    ));

    commands.queue(SpawnPlayer {
        position: PLAYER_SPAWN,
    });

    info!("Level spawned");
}
