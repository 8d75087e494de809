//! Gameplay: the player, the camera, the course and the UI around them.

mod animations;
pub mod camera_controller;
pub mod configs;
pub mod course;
mod hud;
pub mod interaction;
pub mod player;
pub mod scene;

use bevy::prelude::*;

use crate::screens::Screen;

/// Per-frame order of the gameplay kernel. A trigger check always sees the position
/// computed by this frame's motion step.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameplaySet {
    Input,
    Motion,
    Camera,
    Triggers,
}

pub(super) fn plugin(app: &mut App) {
    app.configure_sets(
        Update,
        (
            GameplaySet::Input,
            GameplaySet::Motion,
            GameplaySet::Camera,
            GameplaySet::Triggers,
        )
            .chain()
            .run_if(in_state(Screen::Gameplay)),
    );

    app.add_plugins((
        configs::plugin,
        player::plugin,
        camera_controller::plugin,
        animations::plugin,
        course::plugin,
        interaction::plugin,
        hud::plugin,
    ));
}
