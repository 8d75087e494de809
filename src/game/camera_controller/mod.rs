pub mod follow;
pub mod orbit;

use bevy::{
    input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit},
    prelude::*,
};

use crate::{
    game::{
        GameplaySet,
        configs::{CameraMode, GameplayConfig},
        player::{Player, movement::MotionController},
    },
    screens::Screen,
};

pub use follow::{CameraState, FollowRig};
pub use orbit::OrbitRig;

/// Pixels per scroll line for touchpads reporting pixel deltas.
const PIXELS_PER_LINE: f32 = 16.0;

/// Marker for the one 3D camera the gameplay drives.
#[derive(Component)]
pub struct GameplayCamera;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Gameplay), attach_camera_rig);
    app.add_systems(
        Update,
        (follow_player, orbit_player).in_set(GameplaySet::Camera),
    );
}

/// Attach the rig picked in the gameplay config. The two rigs never coexist on a camera.
fn attach_camera_rig(
    mut commands: Commands,
    config: Option<Res<GameplayConfig>>,
    camera_query: Query<Entity, With<GameplayCamera>>,
) {
    let Ok(camera_entity) = camera_query.single() else {
        warn!("No gameplay camera to attach a rig to");
        return;
    };
    let camera = config.map(|config| config.camera.clone()).unwrap_or_default();

    let mut entity = commands.entity(camera_entity);
    match camera.mode {
        CameraMode::Follow => {
            entity.remove::<OrbitRig>().insert(FollowRig::new(camera.follow));
        }
        CameraMode::Orbit => {
            entity.remove::<FollowRig>().insert(OrbitRig::new(camera.orbit));
        }
    }
    info!("Camera rig attached: {:?}", camera.mode);
}

/// Ease the chase camera towards its spot behind the character.
fn follow_player(
    time: Res<Time>,
    player_query: Query<&MotionController, With<Player>>,
    mut camera_query: Query<(&mut FollowRig, &mut Transform), With<GameplayCamera>>,
) {
    let Ok(controller) = player_query.single() else {
        return;
    };
    for (mut rig, mut transform) in &mut camera_query {
        let state = rig.update(controller.pose(), time.delta_secs());
        transform.translation = state.position;
        transform.look_at(state.look_target, Vec3::Y);
    }
}

/// Mouse drag orbits, the wheel zooms, and the target tracks the character.
fn orbit_player(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    player_query: Query<&MotionController, With<Player>>,
    mut camera_query: Query<(&mut OrbitRig, &mut Transform), With<GameplayCamera>>,
) {
    let Ok(controller) = player_query.single() else {
        return;
    };
    let scroll_lines = match mouse_scroll.unit {
        MouseScrollUnit::Line => mouse_scroll.delta.y,
        MouseScrollUnit::Pixel => mouse_scroll.delta.y / PIXELS_PER_LINE,
    };

    for (mut rig, mut transform) in &mut camera_query {
        if mouse_buttons.pressed(MouseButton::Left) || mouse_buttons.pressed(MouseButton::Right) {
            rig.rotate(mouse_motion.delta);
        }
        if scroll_lines != 0.0 {
            rig.zoom(scroll_lines);
        }
        rig.recenter(controller.pose().position);

        let state = rig.camera_state();
        transform.translation = state.position;
        transform.look_at(state.look_target, Vec3::Y);
    }
}
