//! Cursor shapes and the sink the screen pushes cursor changes into.
//!
//! Each widget names the cursor it wants while hovered. The screen tracks the
//! cursor currently displayed and only talks to the [`CursorSink`] when the
//! shape under the pointer actually changes.

use std::sync::Arc;

use cursor_icon::CursorIcon;
use winit::window::{Cursor, Window};

/// The shape (icon) of the mouse cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorShape {
    /// The standard arrow.
    #[default]
    Arrow,
    /// Text insertion bar.
    IBeam,
    /// Precise selection crosshair.
    Crosshair,
    /// Pointing hand for clickable items.
    Hand,
    /// Horizontal resize arrows.
    HResize,
    /// Vertical resize arrows.
    VResize,
}

impl CursorShape {
    /// The platform icon for this shape.
    pub fn to_icon(self) -> CursorIcon {
        match self {
            CursorShape::Arrow => CursorIcon::Default,
            CursorShape::IBeam => CursorIcon::Text,
            CursorShape::Crosshair => CursorIcon::Crosshair,
            CursorShape::Hand => CursorIcon::Pointer,
            CursorShape::HResize => CursorIcon::EwResize,
            CursorShape::VResize => CursorIcon::NsResize,
        }
    }

    /// Convert to winit's Cursor type.
    pub fn to_winit_cursor(self) -> Cursor {
        Cursor::Icon(self.to_icon())
    }

    /// Check if this is a resize cursor.
    pub fn is_resize_cursor(self) -> bool {
        matches!(self, CursorShape::HResize | CursorShape::VResize)
    }
}

/// Receives cursor changes from a screen.
pub trait CursorSink {
    fn set_cursor(&mut self, shape: CursorShape);
}

impl CursorSink for Arc<Window> {
    fn set_cursor(&mut self, shape: CursorShape) {
        (**self).set_cursor(shape.to_winit_cursor());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_shape_default() {
        assert_eq!(CursorShape::default(), CursorShape::Arrow);
    }

    #[test]
    fn test_icons() {
        assert_eq!(CursorShape::IBeam.to_icon(), CursorIcon::Text);
        assert_eq!(CursorShape::Hand.to_icon(), CursorIcon::Pointer);
        assert!(CursorShape::HResize.is_resize_cursor());
        assert!(!CursorShape::Crosshair.is_resize_cursor());
    }
}
