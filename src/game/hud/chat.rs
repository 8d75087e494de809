use bevy::prelude::*;

use crate::{
    game::interaction::{Interact, ScreenSide},
    screens::Screen,
    theme::{palette::PANEL_BACKGROUND, widget},
};

/// First line the assistant says when a conversation opens.
const GREETING: &str = "Hello! How can I assist you today?";

#[derive(Component)]
struct ChatPanel;

#[derive(Component)]
struct CloseChatButton;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (open_chat, close_chat.run_if(chat_requested_closed))
            .chain()
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// Opens the chat on the side the character was clicked, replacing any open panel.
fn open_chat(
    mut commands: Commands,
    mut interactions: MessageReader<Interact>,
    panel_query: Query<Entity, With<ChatPanel>>,
) {
    let Some(interaction) = interactions.read().last() else {
        return;
    };
    for entity in &panel_query {
        commands.entity(entity).despawn();
    }

    let (left, right) = match interaction.screen_side {
        ScreenSide::Left => (px(20), Val::Auto),
        ScreenSide::Right => (Val::Auto, px(20)),
    };

    commands.spawn((
        Name::new("Chat Panel"),
        ChatPanel,
        Node {
            position_type: PositionType::Absolute,
            left,
            right,
            top: percent(20),
            width: percent(30),
            min_height: percent(40),
            flex_direction: FlexDirection::Column,
            row_gap: px(16),
            padding: UiRect::all(px(20)),
            ..default()
        },
        BackgroundColor(PANEL_BACKGROUND),
        DespawnOnExit(Screen::Gameplay),
        children![
            widget::header("Assistant"),
            widget::label(GREETING),
            widget::button("Close", CloseChatButton),
        ],
    ));
}

fn chat_requested_closed(
    keys: Res<ButtonInput<KeyCode>>,
    button_query: Query<&Interaction, (Changed<Interaction>, With<CloseChatButton>)>,
) -> bool {
    keys.just_pressed(KeyCode::Escape)
        || button_query
            .iter()
            .any(|interaction| *interaction == Interaction::Pressed)
}

fn close_chat(mut commands: Commands, panel_query: Query<Entity, With<ChatPanel>>) {
    for entity in &panel_query {
        commands.entity(entity).despawn();
    }
}
