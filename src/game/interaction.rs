//! Clicking the AI character raises an [`Interact`] message for the UI.

use avian3d::prelude::*;
use bevy::{prelude::*, window::PrimaryWindow};

use crate::{game::camera_controller::GameplayCamera, screens::Screen};

/// How far a click ray reaches into the scene.
const MAX_PICK_DISTANCE: f32 = 200.0;

/// The character the player can talk to.
#[derive(Component, Debug)]
pub struct AiCharacter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenSide {
    Left,
    Right,
}

/// The AI character was clicked. `screen_side` is the half of the viewport it is drawn in.
#[derive(Message, Debug, Clone, Copy)]
pub struct Interact {
    pub screen_side: ScreenSide,
}

pub(super) fn plugin(app: &mut App) {
    app.add_message::<Interact>();
    app.add_systems(
        Update,
        pick_ai_character.run_if(in_state(Screen::Gameplay)),
    );
}

/// Right strictly past the middle, so a character dead center opens on the left.
pub fn screen_side(x: f32, viewport_width: f32) -> ScreenSide {
    if x > viewport_width / 2.0 {
        ScreenSide::Right
    } else {
        ScreenSide::Left
    }
}

/// Whether the pointer is over a button or any other interactive UI node.
pub fn pointer_over_ui<'a>(interactions: impl IntoIterator<Item = &'a Interaction>) -> bool {
    interactions
        .into_iter()
        .any(|interaction| *interaction != Interaction::None)
}

fn pick_ai_character(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    ui_query: Query<&Interaction>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<GameplayCamera>>,
    spatial_query: SpatialQuery,
    parent_query: Query<&ChildOf>,
    ai_query: Query<&GlobalTransform, With<AiCharacter>>,
    mut interactions: MessageWriter<Interact>,
) {
    if !mouse_buttons.just_pressed(MouseButton::Left) {
        return;
    }
    // Clicks on the chat or report buttons never reach the scene
    if pointer_over_ui(&ui_query) {
        return;
    }
    let Ok(window) = window_query.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };
    let Some(hit) = spatial_query.cast_ray(
        ray.origin,
        ray.direction,
        MAX_PICK_DISTANCE,
        true,
        &SpatialQueryFilter::default(),
    ) else {
        return;
    };

    // The collider may sit on a child of the character root
    let Some(ai_transform) = std::iter::once(hit.entity)
        .chain(parent_query.iter_ancestors(hit.entity))
        .find_map(|entity| ai_query.get(entity).ok())
    else {
        return;
    };

    let Ok(projected) = camera.world_to_viewport(camera_transform, ai_transform.translation())
    else {
        debug!("AI character clicked but could not be projected on screen");
        return;
    };
    let viewport_width = camera
        .logical_viewport_size()
        .map(|size| size.x)
        .unwrap_or_else(|| window.width());

    let side = screen_side(projected.x, viewport_width);
    info!("AI character clicked, opening chat on the {side:?}");
    interactions.write(Interact { screen_side: side });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_side_halves() {
        assert_eq!(screen_side(100.0, 800.0), ScreenSide::Left);
        assert_eq!(screen_side(700.0, 800.0), ScreenSide::Right);
    }

    #[test]
    fn test_center_is_left() {
        assert_eq!(screen_side(400.0, 800.0), ScreenSide::Left);
        assert_eq!(screen_side(400.01, 800.0), ScreenSide::Right);
    }

    #[test]
    fn test_clicks_on_ui_are_not_picks() {
        assert!(!pointer_over_ui(&[] as &[Interaction]));
        assert!(!pointer_over_ui(&[Interaction::None, Interaction::None]));
        assert!(pointer_over_ui(&[Interaction::None, Interaction::Pressed]));
        assert!(pointer_over_ui(&[Interaction::Hovered]));
    }

    #[test]
    fn test_offscreen_projection_still_classified() {
        assert_eq!(screen_side(-50.0, 800.0), ScreenSide::Left);
        assert_eq!(screen_side(1200.0, 800.0), ScreenSide::Right);
    }
}
