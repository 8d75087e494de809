pub mod assets;

use bevy::prelude::*;

use crate::{asset_tracking::LoadResource, game::course::CourseConfig};

pub use assets::{
    CameraMode, CameraSettings, FollowSettings, GameplayConfig, GameplayConfigLoader,
    MovementSettings, OrbitSettings,
};

pub(super) fn plugin(app: &mut App) {
    // Register the asset loaders for RON config files
    app.init_asset::<GameplayConfig>();
    app.init_asset_loader::<GameplayConfigLoader>();
    app.init_asset::<CourseConfig>();
    app.init_asset_loader::<crate::game::course::CourseConfigLoader>();

    // Loading screen waits on both
    app.load_resource::<GameplayConfig>(GameplayConfig::PATH);
    app.load_resource::<CourseConfig>(CourseConfig::PATH);
}
