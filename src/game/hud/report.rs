use bevy::prelude::*;

use crate::{
    game::course::CourseFinished,
    screens::Screen,
    theme::{
        palette::{ACCENT_TEXT, OVERLAY_BACKGROUND, PANEL_BACKGROUND},
        widget,
    },
};

use super::format_split;

/// Root of the completion report overlay.
#[derive(Component)]
struct CompletionReport;

#[derive(Component)]
struct PlayAgainButton;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (
            open_report,
            close_report.run_if(report_requested_closed),
        )
            .chain()
            .run_if(in_state(Screen::Gameplay)),
    );
}

fn open_report(
    mut commands: Commands,
    mut finished: MessageReader<CourseFinished>,
    existing_query: Query<Entity, With<CompletionReport>>,
) {
    let Some(report) = finished.read().last() else {
        return;
    };
    for entity in &existing_query {
        commands.entity(entity).despawn();
    }

    let rows: Vec<_> = report
        .checkpoint_times
        .iter()
        .map(|(index, time)| {
            widget::label(format!("Checkpoint {}    {}", index + 1, format_split(*time)))
        })
        .collect();

    commands
        .spawn((
            widget::ui_root("Completion Report"),
            CompletionReport,
            BackgroundColor(OVERLAY_BACKGROUND),
            DespawnOnExit(Screen::Gameplay),
        ))
        .with_children(|root| {
            root.spawn((
                Name::new("Report Panel"),
                Node {
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    row_gap: px(12),
                    padding: UiRect::all(px(32)),
                    ..default()
                },
                BackgroundColor(PANEL_BACKGROUND),
            ))
            .with_children(|panel| {
                panel.spawn(widget::header("Course Complete!"));
                panel.spawn(widget::label("Final Time"));
                panel.spawn((
                    Text::new(format_split(report.final_time)),
                    TextFont::from_font_size(40.0),
                    TextColor(ACCENT_TEXT),
                ));
                if !rows.is_empty() {
                    panel.spawn(widget::label("Checkpoint Times"));
                }
                for row in rows {
                    panel.spawn(row);
                }
                panel.spawn(widget::button("Play Again", PlayAgainButton));
            });
        });
}

fn report_requested_closed(
    keys: Res<ButtonInput<KeyCode>>,
    button_query: Query<&Interaction, (Changed<Interaction>, With<PlayAgainButton>)>,
) -> bool {
    keys.any_just_pressed([KeyCode::Enter, KeyCode::Escape])
        || button_query
            .iter()
            .any(|interaction| *interaction == Interaction::Pressed)
}

fn close_report(mut commands: Commands, report_query: Query<Entity, With<CompletionReport>>) {
    for entity in &report_query {
        commands.entity(entity).despawn();
    }
}
