//! Mouse conversion from winit.

use winit::event::{MouseButton as WinitMouseButton, MouseScrollDelta};

use super::events::MouseButton;
use crate::geometry::Vector2;

/// Pixels per scroll line when a device reports pixel deltas.
pub const PIXELS_PER_LINE: f32 = 20.0;

/// Converts a winit mouse button. Unknown extra buttons map to `None`.
pub fn from_winit_mouse_button(button: WinitMouseButton) -> Option<MouseButton> {
    match button {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Right => Some(MouseButton::Right),
        WinitMouseButton::Middle => Some(MouseButton::Middle),
        WinitMouseButton::Back => Some(MouseButton::Back),
        WinitMouseButton::Forward => Some(MouseButton::Forward),
        WinitMouseButton::Other(_) => None,
    }
}

/// Converts a winit scroll delta to lines.
///
/// Positive `y` scrolls up (away from the user).
pub fn scroll_delta_lines(delta: MouseScrollDelta) -> Vector2 {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => Vector2::new(x, y),
        MouseScrollDelta::PixelDelta(pos) => Vector2::new(
            pos.x as f32 / PIXELS_PER_LINE,
            pos.y as f32 / PIXELS_PER_LINE,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_mouse_button_conversion() {
        assert_eq!(
            from_winit_mouse_button(WinitMouseButton::Left),
            Some(MouseButton::Left)
        );
        assert_eq!(
            from_winit_mouse_button(WinitMouseButton::Forward),
            Some(MouseButton::Forward)
        );
        assert_eq!(from_winit_mouse_button(WinitMouseButton::Other(99)), None);
    }

    #[test]
    fn test_scroll_delta() {
        assert_eq!(
            scroll_delta_lines(MouseScrollDelta::LineDelta(0.0, -1.0)),
            Vector2::new(0.0, -1.0)
        );
        assert_eq!(
            scroll_delta_lines(MouseScrollDelta::PixelDelta(PhysicalPosition::new(40.0, 20.0))),
            Vector2::new(2.0, 1.0)
        );
    }
}
