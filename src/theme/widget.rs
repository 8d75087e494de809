//! Helper functions for creating common widgets.

use bevy::prelude::*;

use super::palette::*;

/// A root UI node that fills the window and centers its content.
pub fn ui_root(name: impl Into<String>) -> impl Bundle {
    (
        Name::new(name.into()),
        Node {
            position_type: PositionType::Absolute,
            width: percent(100),
            height: percent(100),
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            flex_direction: FlexDirection::Column,
            row_gap: px(20),
            ..default()
        },
        Pickable::IGNORE,
    )
}

pub fn header(text: impl Into<String>) -> impl Bundle {
    (
        Name::new("Header"),
        Text(text.into()),
        TextFont::from_font_size(36.0),
        TextColor(HEADER_TEXT),
    )
}

pub fn label(text: impl Into<String>) -> impl Bundle {
    (
        Name::new("Label"),
        Text(text.into()),
        TextFont::from_font_size(20.0),
        TextColor(LABEL_TEXT),
    )
}

/// A button tagged with `action` so that a system can react to its [`Interaction`].
pub fn button<A: Component>(text: impl Into<String>, action: A) -> impl Bundle {
    (
        Name::new("Button"),
        Button,
        action,
        Node {
            padding: UiRect::axes(px(24), px(10)),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(BUTTON_BACKGROUND),
        children![(
            Text(text.into()),
            TextFont::from_font_size(20.0),
            TextColor(BUTTON_TEXT),
            Pickable::IGNORE,
        )],
    )
}
