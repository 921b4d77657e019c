//! Widget system for Trellis.
//!
//! This module provides the building blocks of a screen's content:
//!
//! - [`Widget`]: the behaviour trait every widget implements
//! - [`WidgetBase`]: geometry, visibility and focus flags common to all widgets
//! - [`WidgetTree`]: the arena that owns every widget of a screen
//! - [`WidgetEvent`] and friends: what handlers receive
//! - [`Layout`]: automatic positioning of a container's children
//!
//! # Event flow
//!
//! Input enters through the [`Screen`](crate::Screen), which routes it:
//!
//! 1. Button and scroll events travel from the root towards the widget under
//!    the pointer; each container offers them to its topmost child first.
//! 2. Key and character events go to the keyboard focus path, deepest
//!    widget first.
//! 3. While a drag is active, motion goes to the drag widget alone.
//!
//! A handler returns `Ok(true)` to consume an event. Anything a handler
//! wants done to *other* widgets is queued on its [`EventContext`] and
//! applied when the handler returns.

mod base;
pub mod cursor;
mod dispatcher;
mod events;
mod focus;
pub mod keyboard;
pub mod layout;
pub mod mouse;
mod traits;
mod tree;
pub mod widgets;

#[cfg(test)]
mod tests;

pub use base::WidgetBase;
pub use cursor::{CursorShape, CursorSink};
pub use dispatcher::DispatchResult;
pub use events::{
    CharEvent, CrossingEvent, Key, KeyAction, KeyEvent, MessageEvent, Modifiers, MouseButton,
    MouseButtonEvent, MouseButtons, MouseDragEvent, MouseMotionEvent, ScrollEvent, WidgetEvent,
};
pub use layout::{Alignment, BoxLayout, Layout, Orientation};
pub use traits::{AsAny, EventContext, EventResult, LayoutContext, PaintContext, Panel, Widget};
pub use tree::{NodeRole, WidgetTree};

pub(crate) use dispatcher::Dispatcher;
pub(crate) use focus::{diff_paths, focus_chain, hover_chain};
pub(crate) use traits::Command;
