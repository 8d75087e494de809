use bevy::prelude::*;

/// Handles to the player character model and its locomotion clips.
///
/// Loaded with `init_resource` rather than through the loading screen: a missing model is
/// not fatal, the capsule stand-in keeps moving without animation.
#[derive(Resource, Clone)]
pub struct PlayerAssets {
    pub character_scene: Handle<Scene>,
    pub animations: PlayerAnimations,
}

/// Clip handles in the order the model exports them.
#[derive(Clone)]
pub struct PlayerAnimations {
    pub idle: Handle<AnimationClip>,
    pub walking: Handle<AnimationClip>,
    pub running: Handle<AnimationClip>,
    pub jump: Handle<AnimationClip>,
}

impl PlayerAssets {
    /// Path to the player character GLB file
    pub const PATH_CHARACTER: &'static str = "models/characters/player.glb";
}

impl FromWorld for PlayerAssets {
    fn from_world(world: &mut World) -> Self {
        let assets = world.resource::<AssetServer>();
        let clip = |index| assets.load(GltfAssetLabel::Animation(index).from_asset(Self::PATH_CHARACTER));
        Self {
            character_scene: assets
                .load(GltfAssetLabel::Scene(0).from_asset(Self::PATH_CHARACTER)),
            animations: PlayerAnimations {
                idle: clip(0),
                walking: clip(1),
                running: clip(2),
                jump: clip(3),
            },
        }
    }
}
