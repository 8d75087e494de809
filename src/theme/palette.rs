use bevy::prelude::*;

/// #ffffff
pub const LABEL_TEXT: Color = Color::WHITE;
/// #ffd700
pub const HEADER_TEXT: Color = Color::srgb(1.0, 0.843, 0.0);
/// #ff69b4
pub const ACCENT_TEXT: Color = Color::srgb(1.0, 0.412, 0.706);

pub const PANEL_BACKGROUND: Color = Color::srgba(0.05, 0.05, 0.12, 0.85);
pub const OVERLAY_BACKGROUND: Color = Color::srgba(0.0, 0.0, 0.0, 0.6);

/// #4caf50
pub const BUTTON_BACKGROUND: Color = Color::srgb(0.298, 0.686, 0.314);
pub const BUTTON_HOVERED_BACKGROUND: Color = Color::srgb(0.4, 0.78, 0.42);
pub const BUTTON_PRESSED_BACKGROUND: Color = Color::srgb(0.22, 0.55, 0.24);
pub const BUTTON_TEXT: Color = Color::WHITE;
