use bevy::prelude::*;

use crate::game::player::movement::LocomotionMode;

/// Graph nodes of the locomotion clips
#[derive(Debug, Clone, Copy)]
pub struct LocomotionNodes {
    pub idle: AnimationNodeIndex,
    pub walk: AnimationNodeIndex,
    pub run: AnimationNodeIndex,
    pub jump: AnimationNodeIndex,
}

impl LocomotionNodes {
    pub fn node(&self, mode: LocomotionMode) -> AnimationNodeIndex {
        match mode {
            LocomotionMode::Idle => self.idle,
            LocomotionMode::Walking => self.walk,
            LocomotionMode::Running => self.run,
            LocomotionMode::Jumping => self.jump,
        }
    }
}

/// Links a character root to the animation player inside its model
#[derive(Component)]
pub struct CharacterAnimationController {
    pub animation_player: Entity,
    pub nodes: LocomotionNodes,
    /// Mode whose clip is currently playing, `None` until the first clip starts
    pub playing: Option<LocomotionMode>,
}
