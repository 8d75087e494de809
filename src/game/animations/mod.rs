mod animation_controller;
pub mod models;

use bevy::prelude::*;

use crate::game::GameplaySet;

use self::animation_controller::{
    apply_animation_state, attach_animation_controller, report_missing_animations,
    sync_jump_duration,
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (
            report_missing_animations,
            attach_animation_controller,
            sync_jump_duration.before(GameplaySet::Motion),
            apply_animation_state.after(GameplaySet::Motion),
        )
            .run_if(in_state(crate::screens::Screen::Gameplay)),
    );
}
