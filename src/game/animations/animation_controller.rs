use std::time::Duration;

use bevy::prelude::*;

use crate::game::player::{
    Player, PlayerAssets,
    movement::{LocomotionMode, MotionController},
};

use super::models::{CharacterAnimationController, LocomotionNodes};

/// Cross-fade between locomotion clips
const BLEND_DURATION: Duration = Duration::from_millis(200);

/// Builds the locomotion graph for the player's animation player once the model spawns
pub fn attach_animation_controller(
    mut commands: Commands,
    player_assets: Res<PlayerAssets>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    animation_player_query: Query<Entity, Added<AnimationPlayer>>,
    parent_query: Query<&ChildOf>,
    player_query: Query<(), With<Player>>,
) {
    for animation_player in &animation_player_query {
        let Some(player) = parent_query
            .iter_ancestors(animation_player)
            .find(|ancestor| player_query.contains(*ancestor))
        else {
            continue;
        };

        let animations = &player_assets.animations;
        let (graph, indices) = AnimationGraph::from_clips([
            animations.idle.clone(),
            animations.walking.clone(),
            animations.running.clone(),
            animations.jump.clone(),
        ]);
        let nodes = LocomotionNodes {
            idle: indices[0],
            walk: indices[1],
            run: indices[2],
            jump: indices[3],
        };

        commands.entity(animation_player).insert((
            AnimationGraphHandle(graphs.add(graph)),
            AnimationTransitions::new(),
        ));
        commands.entity(player).insert(CharacterAnimationController {
            animation_player,
            nodes,
            playing: None,
        });
        info!("Locomotion animations attached to the player model");
    }
}

/// Plays the clip of the current locomotion mode, looping everything but the jump
pub fn apply_animation_state(
    mut player_query: Query<(&LocomotionMode, &mut CharacterAnimationController), With<Player>>,
    mut animation_player_query: Query<(&mut AnimationPlayer, &mut AnimationTransitions)>,
) {
    for (mode, mut controller) in &mut player_query {
        if controller.playing == Some(*mode) {
            continue;
        }
        let Ok((mut animation_player, mut transitions)) =
            animation_player_query.get_mut(controller.animation_player)
        else {
            continue;
        };

        let animation = transitions.play(
            &mut animation_player,
            controller.nodes.node(*mode),
            BLEND_DURATION,
        );
        if *mode != LocomotionMode::Jumping {
            animation.repeat();
        }
        controller.playing = Some(*mode);
    }
}

/// Lets the jump lock last exactly as long as the jump clip once it has loaded
pub fn sync_jump_duration(
    player_assets: Res<PlayerAssets>,
    clips: Res<Assets<AnimationClip>>,
    mut controller_query: Query<&mut MotionController, With<Player>>,
    mut logged: Local<bool>,
) {
    let Some(clip) = clips.get(&player_assets.animations.jump) else {
        return;
    };
    if !(clip.duration() > 0.0) {
        return;
    }
    let duration = Duration::from_secs_f32(clip.duration());

    for mut controller in &mut controller_query {
        if controller.jump_duration != duration {
            controller.jump_duration = duration;
            if !*logged {
                info!("Jump duration set from clip: {}ms", duration.as_millis());
                *logged = true;
            }
        }
    }
}

/// Missing animation assets are not fatal, say so once and carry on
pub fn report_missing_animations(
    asset_server: Res<AssetServer>,
    player_assets: Res<PlayerAssets>,
    mut reported: Local<bool>,
) {
    if *reported {
        return;
    }
    let animations = &player_assets.animations;
    let failed = [
        player_assets.character_scene.id().untyped(),
        animations.idle.id().untyped(),
        animations.walking.id().untyped(),
        animations.running.id().untyped(),
        animations.jump.id().untyped(),
    ]
    .into_iter()
    .any(|id| asset_server.load_state(id).is_failed());

    if failed {
        warn!(
            "Player model or clips from {} failed to load, moving without animation",
            PlayerAssets::PATH_CHARACTER
        );
        *reported = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_mode_has_its_own_node() {
        let nodes = LocomotionNodes {
            idle: AnimationNodeIndex::new(1),
            walk: AnimationNodeIndex::new(2),
            run: AnimationNodeIndex::new(3),
            jump: AnimationNodeIndex::new(4),
        };
        assert_eq!(nodes.node(LocomotionMode::Idle), nodes.idle);
        assert_eq!(nodes.node(LocomotionMode::Walking), nodes.walk);
        assert_eq!(nodes.node(LocomotionMode::Running), nodes.run);
        assert_eq!(nodes.node(LocomotionMode::Jumping), nodes.jump);
    }
}
