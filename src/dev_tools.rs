//! Development tools for the game. This plugin is only enabled in dev builds.

use avian3d::prelude::{PhysicsDebugPlugin, PhysicsGizmos};
use bevy::{
    dev_tools::states::log_transitions, input::common_conditions::input_just_pressed, prelude::*,
};

use crate::{
    game::course::{Course, CourseRun, RunState, proximity::ZoneKind},
    screens::Screen,
};

const TOGGLE_UI_DEBUG_KEY: KeyCode = KeyCode::Backquote;
const TOGGLE_PHYSICS_DEBUG_KEY: KeyCode = KeyCode::F3;
const TOGGLE_ZONE_GIZMOS_KEY: KeyCode = KeyCode::F4;

/// Draws the trigger radius of every course zone when enabled.
#[derive(Resource, Default)]
struct ShowZoneGizmos(bool);

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(PhysicsDebugPlugin::default());
    app.init_resource::<ShowZoneGizmos>();
    app.add_systems(Startup, hide_physics_debug);

    // Log `Screen` state transitions and course run transitions.
    app.add_systems(Update, (log_transitions::<Screen>, log_run_transitions));

    app.add_systems(
        Update,
        (
            toggle_debug_ui.run_if(input_just_pressed(TOGGLE_UI_DEBUG_KEY)),
            toggle_physics_debug.run_if(input_just_pressed(TOGGLE_PHYSICS_DEBUG_KEY)),
            toggle_zone_gizmos.run_if(input_just_pressed(TOGGLE_ZONE_GIZMOS_KEY)),
            draw_zone_gizmos.run_if(|show: Res<ShowZoneGizmos>| show.0),
        ),
    );
}

fn hide_physics_debug(mut store: ResMut<GizmoConfigStore>) {
    store.config_mut::<PhysicsGizmos>().0.enabled = false;
}

fn toggle_debug_ui(mut options: ResMut<UiDebugOptions>) {
    options.toggle();
}

fn toggle_physics_debug(mut store: ResMut<GizmoConfigStore>) {
    let (config, _) = store.config_mut::<PhysicsGizmos>();
    config.enabled = !config.enabled;
    info!(
        "Physics debug rendering: {}",
        if config.enabled { "ON" } else { "OFF" }
    );
}

fn log_run_transitions(run: Option<Res<CourseRun>>, mut last: Local<Option<RunState>>) {
    let state = run.map(|run| run.state());
    if *last != state {
        info!("Course run: {:?} -> {:?}", *last, state);
        *last = state;
    }
}

fn toggle_zone_gizmos(mut show: ResMut<ShowZoneGizmos>) {
    show.0 = !show.0;
    info!("Zone gizmos: {}", if show.0 { "ON" } else { "OFF" });
}

fn draw_zone_gizmos(course: Option<Res<Course>>, mut gizmos: Gizmos) {
    let Some(course) = course else {
        return;
    };
    for zone in course.zones() {
        let color = match zone.kind {
            ZoneKind::Start => Color::srgb(0.0, 1.0, 0.0),
            ZoneKind::Checkpoint(_) => Color::srgb(0.3, 0.7, 1.0),
            ZoneKind::End => Color::srgb(1.0, 0.2, 0.4),
        };
        let isometry = Isometry3d::new(
            zone.position + Vec3::Y * 0.05,
            Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
        );
        gizmos.circle(isometry, zone.radius, color);
    }
}
