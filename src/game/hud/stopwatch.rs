use bevy::prelude::*;

use crate::{
    game::course::CourseRun,
    screens::Screen,
    theme::palette::{LABEL_TEXT, PANEL_BACKGROUND},
};

use super::format_stopwatch;

#[derive(Component)]
struct StopwatchText;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Gameplay), spawn_stopwatch);
    app.add_systems(
        Update,
        update_stopwatch.run_if(in_state(Screen::Gameplay)),
    );
}

fn spawn_stopwatch(mut commands: Commands) {
    commands.spawn((
        Name::new("Stopwatch"),
        Node {
            position_type: PositionType::Absolute,
            top: px(16),
            width: percent(100),
            justify_content: JustifyContent::Center,
            ..default()
        },
        Pickable::IGNORE,
        DespawnOnExit(Screen::Gameplay),
        children![(
            Node {
                padding: UiRect::axes(px(18), px(8)),
                ..default()
            },
            BackgroundColor(PANEL_BACKGROUND),
            children![(
                StopwatchText,
                Text::new(format_stopwatch(default())),
                TextFont::from_font_size(28.0),
                TextColor(LABEL_TEXT),
            )],
        )],
    ));
}

/// Live while running, frozen on the final time once finished.
fn update_stopwatch(
    time: Res<Time>,
    run: Option<Res<CourseRun>>,
    mut text_query: Query<&mut Text, With<StopwatchText>>,
) {
    let elapsed = run
        .map(|run| run.elapsed(time.elapsed()))
        .unwrap_or_default();
    let formatted = format_stopwatch(elapsed);
    for mut text in &mut text_query {
        if text.0 != formatted {
            text.0.clone_from(&formatted);
        }
    }
}
