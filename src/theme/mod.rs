//! Reusable UI building blocks shared by the screens and the HUD.

pub mod palette;
pub mod widget;

use bevy::prelude::*;

use palette::{BUTTON_BACKGROUND, BUTTON_HOVERED_BACKGROUND, BUTTON_PRESSED_BACKGROUND};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Update, apply_button_palette);
}

/// Tint buttons by their interaction state.
fn apply_button_palette(
    mut button_query: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
) {
    for (interaction, mut background) in &mut button_query {
        *background = match interaction {
            Interaction::Pressed => BUTTON_PRESSED_BACKGROUND,
            Interaction::Hovered => BUTTON_HOVERED_BACKGROUND,
            Interaction::None => BUTTON_BACKGROUND,
        }
        .into();
    }
}
