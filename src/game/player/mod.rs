mod assets;
pub mod input;
pub mod movement;

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::{
    game::{GameplaySet, configs::GameplayConfig},
    screens::Screen,
};

pub use assets::{PlayerAnimations, PlayerAssets};
use input::{InputState, record_player_input};
use movement::{LocomotionMode, MotionController, apply_motion};

// Player marker component
#[derive(Component)]
pub struct Player;

// Marks the child entity holding the character scene
#[derive(Component)]
pub struct PlayerModel;

// Constants
pub const PLAYER_HEIGHT: f32 = 1.1;
pub const PLAYER_RADIUS: f32 = 0.4;

// Player spawn command
pub struct SpawnPlayer {
    pub position: Vec3,
}

impl Command for SpawnPlayer {
    fn apply(self, world: &mut World) {
        if let Err(err) = world.run_system_cached_with(spawn_player, self) {
            error!("Failed to spawn player: {err}");
        }
    }
}

fn spawn_player(
    In(spawn_config): In<SpawnPlayer>,
    mut commands: Commands,
    player_assets: Res<PlayerAssets>,
    config: Option<Res<GameplayConfig>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let movement = config
        .map(|config| config.movement.clone())
        .unwrap_or_default();

    commands
        .spawn((
            Name::new("Player"),
            Player,
            MotionController::new(&movement, spawn_config.position),
            LocomotionMode::default(),
            DespawnOnExit(Screen::Gameplay),
            Transform::from_translation(spawn_config.position),
            Visibility::Visible,
            // Moved by the motion controller only, physics sees it as a moving obstacle
            RigidBody::Kinematic,
        ))
        .with_children(|parent| {
            // Stand-in body, shows through if the model fails to load
            parent.spawn((
                Name::new("Player Capsule"),
                Mesh3d(meshes.add(Capsule3d::new(PLAYER_RADIUS, PLAYER_HEIGHT))),
                MeshMaterial3d(materials.add(Color::srgb(0.53, 0.81, 0.92))),
                Collider::capsule(PLAYER_RADIUS, PLAYER_HEIGHT),
                Transform::from_xyz(0.0, PLAYER_HEIGHT / 2.0 + PLAYER_RADIUS, 0.0),
            ));
            parent.spawn((
                Name::new("Player Model"),
                PlayerModel,
                SceneRoot(player_assets.character_scene.clone()),
                // glTF models face +Z
                Transform::from_rotation(Quat::from_rotation_y(std::f32::consts::PI)),
            ));
        });
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<InputState>();
    app.init_resource::<PlayerAssets>();

    app.add_systems(Update, record_player_input.in_set(GameplaySet::Input));
    app.add_systems(Update, apply_motion.in_set(GameplaySet::Motion));
    app.add_systems(OnExit(Screen::Gameplay), clear_input);
}

fn clear_input(mut input: ResMut<InputState>) {
    input.clear();
}
