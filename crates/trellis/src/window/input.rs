//! Normalized input and the winit adapter.
//!
//! A [`Screen`](crate::Screen) consumes [`InputEvent`]s rather than
//! platform events. [`InputTranslator`] produces them from winit
//! [`WindowEvent`]s, tracking the modifier state winit reports separately
//! from key presses.
//!
//! ```ignore
//! let mut translator = InputTranslator::new();
//!
//! // In ApplicationHandler::window_event:
//! for input in translator.translate(&event) {
//!     registry.dispatch(&window_id, input);
//! }
//! ```

use std::path::PathBuf;

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{ModifiersState, PhysicalKey};

use trellis_core::logging::targets;

use crate::geometry::{Size, Vector2};
use crate::widget::keyboard::{
    from_winit_modifiers, from_winit_physical_key, key_action, scan_code_from_physical_key,
};
use crate::widget::mouse::{from_winit_mouse_button, scroll_delta_lines};
use crate::widget::{KeyEvent, Modifiers, MouseButton};

/// A platform-independent input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The pointer moved. Physical pixels; the screen divides by its pixel
    /// ratio.
    CursorMoved { x: f64, y: f64 },
    /// A mouse button changed state.
    MouseButton {
        button: MouseButton,
        pressed: bool,
        modifiers: Modifiers,
    },
    /// Scroll, in lines.
    Scroll { delta: Vector2 },
    /// A key changed state.
    Key(KeyEvent),
    /// A character was typed.
    Char(char),
    /// The framebuffer was resized, in physical pixels.
    FramebufferResized { width: i32, height: i32 },
    /// The display scale changed.
    ScaleFactorChanged(f32),
    /// Files were dropped onto the window.
    FilesDropped(Vec<PathBuf>),
}

impl InputEvent {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CursorMoved { .. } => "cursor_moved",
            Self::MouseButton { .. } => "mouse_button",
            Self::Scroll { .. } => "scroll",
            Self::Key(_) => "key",
            Self::Char(_) => "char",
            Self::FramebufferResized { .. } => "framebuffer_resized",
            Self::ScaleFactorChanged(_) => "scale_factor_changed",
            Self::FilesDropped(_) => "files_dropped",
        }
    }
}

/// Translates winit window events into [`InputEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct InputTranslator {
    modifiers: Modifiers,
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The modifier keys currently held.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Translate one window event. Events with no input meaning produce
    /// nothing; a key press that types text produces a key and its
    /// characters.
    pub fn translate(&mut self, event: &WindowEvent) -> Vec<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => vec![self.cursor_moved(*position)],
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse_input(*state, *button).into_iter().collect()
            }
            WindowEvent::MouseWheel { delta, .. } => vec![self.mouse_wheel(*delta)],
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers_changed(modifiers.state());
                Vec::new()
            }
            WindowEvent::KeyboardInput { event, .. } => self.keyboard_input(
                &event.physical_key,
                event.state,
                event.repeat,
                event.text.as_deref(),
            ),
            WindowEvent::Resized(size) => vec![Self::resized(size.width, size.height)],
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                vec![InputEvent::ScaleFactorChanged(*scale_factor as f32)]
            }
            WindowEvent::DroppedFile(path) => vec![InputEvent::FilesDropped(vec![path.clone()])],
            _ => Vec::new(),
        }
    }

    pub fn cursor_moved(&self, position: PhysicalPosition<f64>) -> InputEvent {
        InputEvent::CursorMoved {
            x: position.x,
            y: position.y,
        }
    }

    /// `None` for buttons the toolkit has no name for.
    pub fn mouse_input(&self, state: ElementState, button: WinitMouseButton) -> Option<InputEvent> {
        let Some(button) = from_winit_mouse_button(button) else {
            tracing::trace!(target: targets::INPUT, ?button, "unmapped mouse button ignored");
            return None;
        };
        Some(InputEvent::MouseButton {
            button,
            pressed: state == ElementState::Pressed,
            modifiers: self.modifiers,
        })
    }

    pub fn mouse_wheel(&self, delta: MouseScrollDelta) -> InputEvent {
        InputEvent::Scroll {
            delta: scroll_delta_lines(delta),
        }
    }

    pub fn modifiers_changed(&mut self, state: ModifiersState) {
        self.modifiers = from_winit_modifiers(state);
    }

    pub fn keyboard_input(
        &self,
        physical_key: &PhysicalKey,
        state: ElementState,
        repeat: bool,
        text: Option<&str>,
    ) -> Vec<InputEvent> {
        let mut events = vec![InputEvent::Key(KeyEvent {
            key: from_winit_physical_key(physical_key),
            scancode: scan_code_from_physical_key(physical_key),
            action: key_action(state, repeat),
            modifiers: self.modifiers,
        })];
        if state == ElementState::Pressed
            && let Some(text) = text
        {
            events.extend(
                text.chars()
                    .filter(|c| !c.is_control())
                    .map(InputEvent::Char),
            );
        }
        events
    }

    pub fn resized(width: u32, height: u32) -> InputEvent {
        let size = Size::new(
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        );
        InputEvent::FramebufferResized {
            width: size.width,
            height: size.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{Key, KeyAction};
    use winit::keyboard::KeyCode;

    #[test]
    fn test_button_carries_modifiers() {
        let mut translator = InputTranslator::new();
        translator.modifiers_changed(ModifiersState::SHIFT);
        let event = translator
            .mouse_input(ElementState::Pressed, WinitMouseButton::Left)
            .unwrap();
        assert_eq!(
            event,
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed: true,
                modifiers: Modifiers::SHIFT,
            }
        );
        assert!(
            translator
                .mouse_input(ElementState::Pressed, WinitMouseButton::Other(7))
                .is_none()
        );
    }

    #[test]
    fn test_key_press_with_text_yields_chars() {
        let translator = InputTranslator::new();
        let events = translator.keyboard_input(
            &PhysicalKey::Code(KeyCode::KeyA),
            ElementState::Pressed,
            false,
            Some("a"),
        );
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            InputEvent::Key(KeyEvent {
                key: Key::A,
                action: KeyAction::Press,
                ..
            })
        ));
        assert_eq!(events[1], InputEvent::Char('a'));
    }

    #[test]
    fn test_control_text_is_dropped() {
        let translator = InputTranslator::new();
        let events = translator.keyboard_input(
            &PhysicalKey::Code(KeyCode::Backspace),
            ElementState::Pressed,
            false,
            Some("\u{8}"),
        );
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_resize_and_scroll() {
        assert_eq!(
            InputTranslator::resized(800, 600),
            InputEvent::FramebufferResized {
                width: 800,
                height: 600
            }
        );
        let translator = InputTranslator::new();
        assert_eq!(
            translator.mouse_wheel(MouseScrollDelta::LineDelta(0.0, 2.0)),
            InputEvent::Scroll {
                delta: Vector2::new(0.0, 2.0)
            }
        );
    }
}
