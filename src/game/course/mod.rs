//! The timed obstacle course: trigger zones, run state and the obstacles around them.

mod config;
mod effects;
mod obstacles;
pub mod proximity;
mod run;

use std::{collections::BTreeMap, time::Duration};

use bevy::prelude::*;

use crate::{
    game::{
        GameplaySet,
        player::{Player, movement::MotionController},
    },
    screens::Screen,
};

pub use config::{Course, CourseConfig, CourseConfigLoader};
pub use run::{CourseEvent, CourseRun, RunState};

/// The player entered the start zone while the course was armed.
#[derive(Message, Debug, Clone)]
pub struct CourseStarted;

/// First visit of a checkpoint during the current run.
#[derive(Message, Debug, Clone)]
pub struct CheckpointReached {
    pub index: usize,
    pub split: Duration,
}

/// The run completed, carrying what the report shows.
#[derive(Message, Debug, Clone)]
pub struct CourseFinished {
    pub final_time: Duration,
    pub checkpoint_times: BTreeMap<usize, Duration>,
}

pub(super) fn plugin(app: &mut App) {
    app.add_message::<CourseStarted>();
    app.add_message::<CheckpointReached>();
    app.add_message::<CourseFinished>();

    app.add_systems(
        OnEnter(Screen::Gameplay),
        (build_course, obstacles::spawn_course).chain(),
    );
    app.add_systems(OnExit(Screen::Gameplay), clear_course);
    app.add_systems(Update, detect_course_events.in_set(GameplaySet::Triggers));

    app.add_plugins(effects::plugin);
}

/// Turns the loaded layout into trigger zones and a fresh run.
fn build_course(mut commands: Commands, config: Option<Res<CourseConfig>>) {
    let Some(config) = config else {
        error!("Course configuration is not loaded, the course is disabled");
        return;
    };
    match config.build() {
        Ok(course) => {
            info!(
                "Course ready: {} checkpoints, {:?} order",
                course.checkpoint_count(),
                course.policy
            );
            commands.insert_resource(course);
            commands.insert_resource(CourseRun::default());
        }
        Err(err) => error!("Course disabled: {err}"),
    }
}

fn clear_course(mut commands: Commands) {
    commands.remove_resource::<Course>();
    commands.remove_resource::<CourseRun>();
}

/// Checks this frame's player position against every zone and surfaces the transitions.
fn detect_course_events(
    time: Res<Time>,
    course: Option<Res<Course>>,
    run: Option<ResMut<CourseRun>>,
    player_query: Query<&MotionController, With<Player>>,
    mut started: MessageWriter<CourseStarted>,
    mut checkpoints: MessageWriter<CheckpointReached>,
    mut finished: MessageWriter<CourseFinished>,
) {
    let (Some(course), Some(mut run)) = (course, run) else {
        return;
    };
    let Ok(controller) = player_query.single() else {
        return;
    };

    for event in run.observe(&course, controller.pose().position, time.elapsed()) {
        match event {
            CourseEvent::Started => {
                info!("Course started");
                started.write(CourseStarted);
            }
            CourseEvent::CheckpointReached { index, split } => {
                info!("Checkpoint {} reached at {:.2}s", index + 1, split.as_secs_f32());
                checkpoints.write(CheckpointReached { index, split });
            }
            CourseEvent::Finished {
                final_time,
                checkpoint_times,
            } => {
                info!(
                    "Course finished in {:.2}s with {} checkpoints",
                    final_time.as_secs_f32(),
                    checkpoint_times.len()
                );
                finished.write(CourseFinished {
                    final_time,
                    checkpoint_times,
                });
            }
            CourseEvent::Rearmed => debug!("Course re-armed"),
        }
    }
}
