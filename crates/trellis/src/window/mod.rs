//! Windows, popups and the platform-facing pieces of a screen.
//!
//! A window is a widget node with [`NodeRole::Window`](crate::widget::NodeRole)
//! and a [`WindowState`]; a popup is a window specialization anchored to a
//! parent window and usually owned by a button. Both live as direct children
//! of the screen root. Popups are positioned every frame from their anchor
//! (see [`popup`]).

pub mod chrome;
pub mod input;
pub mod popup;
pub mod screen_registry;
pub mod window_config;

pub use input::{InputEvent, InputTranslator};
pub use popup::Side;
pub use screen_registry::ScreenRegistry;
pub use window_config::ScreenConfig;

use trellis_core::WidgetId;

use crate::geometry::Point;

/// Default anchor height of a popup, in pixels.
pub const DEFAULT_ANCHOR_HEIGHT: i32 = 30;

/// State carried by every window and popup node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowState {
    /// Title shown in the header. An empty title means no header.
    pub title: String,
    /// While a modal window is focused, clicks and scrolls outside it are
    /// blocked.
    pub modal: bool,
    /// Background windows are never raised when they receive focus.
    pub background: bool,
    /// Set while the header is being dragged.
    pub(crate) header_drag: bool,
}

impl WindowState {
    /// A window with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Make the window modal.
    pub fn with_modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    /// Keep the window below others even when focused.
    pub fn with_background(mut self, background: bool) -> Self {
        self.background = background;
        self
    }

    /// Whether a header drag is in progress.
    pub fn is_header_dragging(&self) -> bool {
        self.header_drag
    }
}

/// State carried by popup nodes in addition to [`WindowState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupState {
    pub(crate) window: WindowState,
    /// The window the popup is anchored to. May outlive its target.
    pub(crate) parent_window: WidgetId,
    /// The button that toggles the popup, if any. May outlive its target.
    pub(crate) button: Option<WidgetId>,
    /// Anchor relative to the parent window's position.
    pub anchor_pos: Point,
    /// Preferred arrow offset from the popup's top edge, for owners that
    /// draw their own chrome. Placement and the built-in chrome centre the
    /// popup on the anchor and ignore it.
    pub anchor_height: i32,
    /// Which side of the parent window the popup opens on.
    pub side: Side,
    /// Hide the popup once neither it nor its parent window is focused.
    pub disposable: bool,
}

impl PopupState {
    /// A popup anchored to `parent_window`.
    pub fn new(parent_window: WidgetId) -> Self {
        Self {
            window: WindowState::default(),
            parent_window,
            button: None,
            anchor_pos: Point::ZERO,
            anchor_height: DEFAULT_ANCHOR_HEIGHT,
            side: Side::Right,
            disposable: false,
        }
    }

    /// The window this popup is anchored to.
    pub fn parent_window(&self) -> WidgetId {
        self.parent_window
    }

    /// The button that owns this popup.
    pub fn button(&self) -> Option<WidgetId> {
        self.button
    }

    /// Window-level state shared with plain windows.
    pub fn window(&self) -> &WindowState {
        &self.window
    }
}
