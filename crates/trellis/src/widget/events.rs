//! Widget-specific event types.
//!
//! Positional events carry the pointer both in the receiving widget's local
//! coordinates and in screen coordinates. Drag events are the exception: the
//! drag position is expressed relative to the dragged widget's *parent*, which
//! is the frame its own position lives in.
//!
//! # Messages
//!
//! Widgets talk to each other through [`MessageEvent`]s queued with
//! [`EventContext::notify`](super::EventContext::notify). A message carries
//! any payload and is delivered after the current event finishes.
//!
//! ```ignore
//! struct Selected(usize);
//!
//! if let WidgetEvent::Message(message) = event {
//!     if let Some(Selected(index)) = message.downcast_ref::<Selected>() {
//!         self.select(*index);
//!     }
//! }
//! ```

use std::any::{Any, TypeId};

use bitflags::bitflags;
use trellis_core::WidgetId;

use crate::geometry::{Point, Vector2};

bitflags! {
    /// Keyboard modifiers held during an input event.
    ///
    /// `DOUBLE_CLICK` is synthesized by the screen on the second left press
    /// inside the double-click interval; it is never reported by the platform.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        /// The Shift key is held.
        const SHIFT = 1;
        /// The Control key is held.
        const CONTROL = 1 << 1;
        /// The Alt key is held (Option on macOS).
        const ALT = 1 << 2;
        /// The Super key is held (Windows key, Cmd on macOS).
        const SUPER = 1 << 3;
        /// This press completes a double click.
        const DOUBLE_CLICK = 1 << 4;
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MouseButton {
    /// Primary button (usually left).
    Left = 0,
    /// Secondary button (usually right).
    Right = 1,
    /// Middle button (scroll wheel click).
    Middle = 2,
    /// Additional button 1 (e.g., browser back).
    Back = 3,
    /// Additional button 2 (e.g., browser forward).
    Forward = 4,
}

impl MouseButton {
    /// The bit this button occupies in a [`MouseButtons`] mask.
    pub fn mask(self) -> MouseButtons {
        MouseButtons::from_bits_truncate(1 << self as u8)
    }

    /// Whether a press of this button may start a drag.
    pub fn starts_drag(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

bitflags! {
    /// The set of mouse buttons currently held down.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MouseButtons: u8 {
        const LEFT = 1;
        const RIGHT = 1 << 1;
        const MIDDLE = 1 << 2;
        const BACK = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

/// A mouse button was pressed or released over the widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseButtonEvent {
    /// Pointer position in the widget's local coordinates.
    pub local_pos: Point,
    /// Pointer position in screen coordinates.
    pub screen_pos: Point,
    /// The button that changed state.
    pub button: MouseButton,
    /// `true` for a press, `false` for a release.
    pub pressed: bool,
    /// Modifier keys, including a synthesized `DOUBLE_CLICK`.
    pub modifiers: Modifiers,
}

impl MouseButtonEvent {
    /// Whether this is a left-button press.
    pub fn is_left_press(&self) -> bool {
        self.pressed && self.button == MouseButton::Left
    }

    /// Whether this press completes a double click.
    pub fn is_double_click(&self) -> bool {
        self.modifiers.contains(Modifiers::DOUBLE_CLICK)
    }
}

/// The pointer moved over (or just out of) the widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseMotionEvent {
    /// Pointer position in the widget's local coordinates.
    pub local_pos: Point,
    /// Pointer position in screen coordinates.
    pub screen_pos: Point,
    /// Movement since the previous pointer position.
    pub delta: Point,
    /// Buttons held during the move.
    pub buttons: MouseButtons,
    /// Modifier keys held during the move.
    pub modifiers: Modifiers,
}

/// The pointer moved while this widget owns the drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseDragEvent {
    /// Pointer position relative to the dragged widget's parent.
    pub pos: Point,
    /// Pointer position in the widget's local coordinates.
    pub local_pos: Point,
    /// Movement since the previous pointer position.
    pub delta: Point,
    /// Buttons held during the drag.
    pub buttons: MouseButtons,
    /// Modifier keys held during the drag.
    pub modifiers: Modifiers,
}

/// The pointer entered or left the widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossingEvent {
    /// Pointer position relative to the widget.
    pub local_pos: Point,
}

/// A scroll wheel or trackpad scroll over the widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    /// Pointer position in the widget's local coordinates.
    pub local_pos: Point,
    /// Pointer position in screen coordinates.
    pub screen_pos: Point,
    /// Scroll amount; positive `y` scrolls up.
    pub delta: Vector2,
}

/// Key transitions reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Press,
    Release,
    Repeat,
}

/// Keys the toolkit distinguishes. Anything else arrives as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Numbers (main keyboard)
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Navigation
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    Home, End, PageUp, PageDown,

    // Editing
    Backspace, Delete, Insert,
    Enter, Tab, Space, Escape,

    // Modifiers
    Shift, Control, Alt, Super,

    // Function keys
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    // Unknown/unmapped key
    Unknown,
}

/// A key changed state while the widget is on the focus path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The logical key.
    pub key: Key,
    /// Platform scan code, or 0 when unavailable.
    pub scancode: u32,
    /// Press, release or auto-repeat.
    pub action: KeyAction,
    /// Modifier keys held.
    pub modifiers: Modifiers,
}

/// Text input while the widget is on the focus path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharEvent {
    /// The Unicode scalar typed.
    pub codepoint: char,
}

/// A payload sent from one widget to another.
pub struct MessageEvent {
    sender: WidgetId,
    payload: Box<dyn Any>,
    type_id: TypeId,
}

impl MessageEvent {
    /// Wrap a payload sent by `sender`.
    pub fn new<T: Any>(sender: WidgetId, payload: T) -> Self {
        Self {
            sender,
            type_id: TypeId::of::<T>(),
            payload: Box::new(payload),
        }
    }

    /// The widget that queued the message.
    pub fn sender(&self) -> WidgetId {
        self.sender
    }

    /// Check if the payload is of type `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Try to get a reference to the payload as type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

impl std::fmt::Debug for MessageEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageEvent")
            .field("sender", &self.sender)
            .field("type_id", &self.type_id)
            .finish_non_exhaustive()
    }
}

/// Events delivered to [`Widget::event`](super::Widget::event).
///
/// Handlers return `Ok(true)` to consume the event and stop propagation,
/// `Ok(false)` to let it continue, or an error to abort the dispatch.
#[derive(Debug)]
pub enum WidgetEvent {
    /// Mouse press or release.
    MouseButton(MouseButtonEvent),
    /// Pointer motion.
    MouseMotion(MouseMotionEvent),
    /// Pointer motion while this widget owns the drag.
    MouseDrag(MouseDragEvent),
    /// Pointer entered the widget.
    Enter(CrossingEvent),
    /// Pointer left the widget.
    Leave(CrossingEvent),
    /// Scroll wheel.
    Scroll(ScrollEvent),
    /// The widget joined the keyboard focus path.
    FocusIn,
    /// The widget left the keyboard focus path.
    FocusOut,
    /// Key press, release or repeat.
    Key(KeyEvent),
    /// Text input.
    Char(CharEvent),
    /// A message from another widget.
    Message(MessageEvent),
    /// A popup owned by this widget was dismissed because it lost focus.
    PopupDismissed,
}

impl WidgetEvent {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MouseButton(_) => "mouse_button",
            Self::MouseMotion(_) => "mouse_motion",
            Self::MouseDrag(_) => "mouse_drag",
            Self::Enter(_) => "enter",
            Self::Leave(_) => "leave",
            Self::Scroll(_) => "scroll",
            Self::FocusIn => "focus_in",
            Self::FocusOut => "focus_out",
            Self::Key(_) => "key",
            Self::Char(_) => "char",
            Self::Message(_) => "message",
            Self::PopupDismissed => "popup_dismissed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    #[test]
    fn test_button_masks() {
        assert_eq!(MouseButton::Left.mask(), MouseButtons::LEFT);
        assert_eq!(MouseButton::Middle.mask(), MouseButtons::MIDDLE);
        assert_eq!(MouseButton::Forward.mask(), MouseButtons::FORWARD);
    }

    #[test]
    fn test_drag_buttons() {
        assert!(MouseButton::Left.starts_drag());
        assert!(MouseButton::Right.starts_drag());
        assert!(!MouseButton::Middle.starts_drag());
    }

    #[test]
    fn test_message_downcast() {
        struct Ping(u8);
        let sender = WidgetId::from(KeyData::from_ffi(1));
        let message = MessageEvent::new(sender, Ping(3));
        assert!(message.is::<Ping>());
        assert!(!message.is::<u8>());
        assert_eq!(message.downcast_ref::<Ping>().map(|p| p.0), Some(3));
        assert_eq!(message.sender(), sender);
    }
}
