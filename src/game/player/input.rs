use std::collections::HashSet;

use bevy::{
    input::{ButtonState, keyboard::KeyboardInput},
    prelude::*,
    window::WindowFocused,
};

/// Debounced movement intent for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlVector {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    Run,
}

fn binding(key: KeyCode) -> Option<Control> {
    match key {
        KeyCode::KeyW | KeyCode::ArrowUp => Some(Control::Forward),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(Control::Backward),
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(Control::Left),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(Control::Right),
        KeyCode::Space => Some(Control::Jump),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Control::Run),
        _ => None,
    }
}

/// Keyboard state reduced to a [`ControlVector`].
///
/// Tracks every held bound key so that releasing one of two keys mapped to the same
/// control (left and right shift, `W` and arrow up) keeps the control active.
#[derive(Resource, Debug, Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
    controls: ControlVector,
}

impl InputState {
    /// Snapshot of the current controls.
    pub fn controls(&self) -> ControlVector {
        self.controls
    }

    pub fn press(&mut self, key: KeyCode) {
        if binding(key).is_some() && self.held.insert(key) {
            self.refresh();
        }
    }

    pub fn release(&mut self, key: KeyCode) {
        if self.held.remove(&key) {
            self.refresh();
        }
    }

    /// Drops every held key, used when the window loses focus and releases go missing.
    pub fn clear(&mut self) {
        self.held.clear();
        self.controls = ControlVector::default();
    }

    fn refresh(&mut self) {
        let mut controls = ControlVector::default();
        for control in self.held.iter().filter_map(|key| binding(*key)) {
            match control {
                Control::Forward => controls.forward = true,
                Control::Backward => controls.backward = true,
                Control::Left => controls.left = true,
                Control::Right => controls.right = true,
                Control::Jump => controls.jump = true,
                Control::Run => controls.run = true,
            }
        }
        self.controls = controls;
    }
}

/// Folds this frame's key presses and releases into [`InputState`].
pub fn record_player_input(
    mut keyboard: MessageReader<KeyboardInput>,
    mut focus: MessageReader<WindowFocused>,
    mut input: ResMut<InputState>,
) {
    for event in keyboard.read() {
        match event.state {
            ButtonState::Pressed => input.press(event.key_code),
            ButtonState::Released => input.release(event.key_code),
        }
    }

    if focus.read().any(|event| !event.focused) {
        input.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut input = InputState::default();
        input.press(KeyCode::KeyW);
        input.press(KeyCode::ShiftLeft);
        assert_eq!(
            input.controls(),
            ControlVector {
                forward: true,
                run: true,
                ..default()
            }
        );

        input.release(KeyCode::KeyW);
        assert!(!input.controls().forward);
        assert!(input.controls().run);
    }

    #[test]
    fn test_aliases_share_a_control() {
        let mut input = InputState::default();
        input.press(KeyCode::ShiftLeft);
        input.press(KeyCode::ShiftRight);
        input.release(KeyCode::ShiftLeft);
        assert!(input.controls().run);

        input.press(KeyCode::ArrowLeft);
        input.press(KeyCode::KeyA);
        input.release(KeyCode::KeyA);
        assert!(input.controls().left);
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let mut input = InputState::default();
        input.press(KeyCode::KeyQ);
        input.release(KeyCode::Escape);
        assert_eq!(input.controls(), ControlVector::default());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut input = InputState::default();
        input.press(KeyCode::Space);
        let snapshot = input.controls();
        input.clear();
        assert!(snapshot.jump);
        assert!(!input.controls().jump);
    }
}
