//! Prelude module for Trellis.
//!
//! ```ignore
//! use trellis::prelude::*;
//! ```
//!
//! Brings in the screen, the widget foundation, the stock widgets, layouts,
//! geometry and the signal type.

// ============================================================================
// Screen
// ============================================================================

pub use crate::screen::Screen;
pub use crate::window::{InputEvent, PopupState, ScreenConfig, ScreenRegistry, Side, WindowState};

// ============================================================================
// Core
// ============================================================================

pub use crate::{Signal, TreeError, TrellisError, WidgetError, WidgetId};

// ============================================================================
// Widget Foundation
// ============================================================================

pub use crate::widget::{
    DispatchResult, EventContext, EventResult, LayoutContext, PaintContext, Panel, Widget,
    WidgetBase, WidgetEvent, WidgetTree,
};

// ============================================================================
// Common Widgets
// ============================================================================

pub use crate::widget::widgets::{
    Button, ButtonFlags, ComboBox, Label, PopupButton, PopupOwner, Slider,
};

// ============================================================================
// Layout
// ============================================================================

pub use crate::widget::{Alignment, BoxLayout, Layout, Orientation};

// ============================================================================
// Geometry, Rendering and Theme
// ============================================================================

pub use crate::geometry::{Color, Point, Rect, Size, Vector2};
pub use crate::render::{DrawContext, RecordingContext};
pub use crate::theme::Theme;
