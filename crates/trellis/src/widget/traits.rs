//! Core widget trait definitions.
//!
//! This module defines the [`Widget`] trait, the capability interface every
//! concrete widget implements, and the contexts handed to it.
//!
//! # Key Types
//!
//! - [`Widget`] - Capability trait for all UI elements
//! - [`PaintContext`] - Drawing context passed to [`Widget::paint`]
//! - [`LayoutContext`] - Text measurement context for [`Widget::preferred_size`]
//! - [`EventContext`] - Access to the widget's own state while handling events
//!
//! Handlers never get the tree itself. Anything that touches another widget
//! (focusing, showing a popup, messaging the owner of a popup) is queued
//! through the [`EventContext`] and applied by the screen once the current
//! handler has returned.

use std::any::Any;

use trellis_core::{WidgetError, WidgetId};

use super::base::WidgetBase;
use super::events::{MessageEvent, WidgetEvent};
use crate::geometry::{Rect, Size};
use crate::render::DrawContext;
use crate::theme::Theme;

/// What a handler reports: consumed, not consumed, or a fault.
pub type EventResult = Result<bool, WidgetError>;

/// Upcast helper so `dyn Widget` can be downcast to its concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Deferred requests a handler makes of the screen.
#[derive(Debug)]
pub(crate) enum Command {
    RequestFocus(WidgetId),
    SetVisible(WidgetId, bool),
    MoveToFront(WidgetId),
    Notify(WidgetId, MessageEvent),
}

/// Context provided during widget painting.
///
/// The transform is already translated to the widget's top-left corner.
pub struct PaintContext<'a> {
    draw: &'a mut dyn DrawContext,
    theme: &'a Theme,
    base: &'a WidgetBase,
}

impl<'a> PaintContext<'a> {
    pub(crate) fn new(
        draw: &'a mut dyn DrawContext,
        theme: &'a Theme,
        base: &'a WidgetBase,
    ) -> Self {
        Self { draw, theme, base }
    }

    /// The drawing context.
    #[inline]
    pub fn draw(&mut self) -> &mut dyn DrawContext {
        &mut *self.draw
    }

    #[inline]
    pub fn theme(&self) -> &'a Theme {
        self.theme
    }

    #[inline]
    pub fn base(&self) -> &'a WidgetBase {
        self.base
    }

    /// The widget's local rectangle (origin always 0,0).
    #[inline]
    pub fn rect(&self) -> Rect {
        self.base.local_rect()
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.base.size()
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.base.width() as f32
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.base.height() as f32
    }
}

/// Context for size negotiation. Gives access to text measurement.
pub struct LayoutContext<'a> {
    draw: &'a mut dyn DrawContext,
    theme: &'a Theme,
}

impl<'a> LayoutContext<'a> {
    pub fn new(draw: &'a mut dyn DrawContext, theme: &'a Theme) -> Self {
        Self { draw, theme }
    }

    #[inline]
    pub fn draw(&mut self) -> &mut dyn DrawContext {
        &mut *self.draw
    }

    #[inline]
    pub fn theme(&self) -> &'a Theme {
        self.theme
    }
}

/// Context provided while a widget handles an event.
pub struct EventContext<'a> {
    id: WidgetId,
    base: &'a mut WidgetBase,
    theme: &'a Theme,
    commands: &'a mut Vec<Command>,
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(
        id: WidgetId,
        base: &'a mut WidgetBase,
        theme: &'a Theme,
        commands: &'a mut Vec<Command>,
    ) -> Self {
        Self {
            id,
            base,
            theme,
            commands,
        }
    }

    /// The id of the widget handling the event.
    #[inline]
    pub fn id(&self) -> WidgetId {
        self.id
    }

    #[inline]
    pub fn base(&self) -> &WidgetBase {
        self.base
    }

    #[inline]
    pub fn base_mut(&mut self) -> &mut WidgetBase {
        self.base
    }

    #[inline]
    pub fn theme(&self) -> &Theme {
        self.theme
    }

    /// Ask for keyboard focus once the handler returns.
    pub fn request_focus(&mut self) {
        self.commands.push(Command::RequestFocus(self.id));
    }

    /// Move keyboard focus to another widget once the handler returns.
    pub fn request_focus_on(&mut self, target: WidgetId) {
        self.commands.push(Command::RequestFocus(target));
    }

    /// Show or hide another widget.
    pub fn set_visible(&mut self, target: WidgetId, visible: bool) {
        self.commands.push(Command::SetVisible(target, visible));
    }

    /// Raise a window (and its popups) above its siblings.
    pub fn move_to_front(&mut self, window: WidgetId) {
        self.commands.push(Command::MoveToFront(window));
    }

    /// Send a message to another widget.
    pub fn notify<T: Any>(&mut self, target: WidgetId, payload: T) {
        self.commands
            .push(Command::Notify(target, MessageEvent::new(self.id, payload)));
    }
}

/// The capability interface of a widget.
///
/// A widget's common state (geometry, flags, tree links) lives in its
/// [`WidgetBase`], owned by the tree next to the boxed widget; the trait only
/// supplies behaviour. Every method has a default, so a plain container is
/// just an empty struct.
///
/// # Example
///
/// ```ignore
/// use trellis::widget::*;
///
/// struct Counter {
///     clicks: u32,
/// }
///
/// impl Widget for Counter {
///     fn preferred_size(&self, _base: &WidgetBase, _ctx: &mut LayoutContext<'_>) -> Size {
///         Size::new(80, 24)
///     }
///
///     fn event(&mut self, _ctx: &mut EventContext<'_>, event: &WidgetEvent) -> EventResult {
///         match event {
///             WidgetEvent::MouseButton(e) if e.is_left_press() => {
///                 self.clicks += 1;
///                 Ok(true)
///             }
///             _ => Ok(false),
///         }
///     }
/// }
/// ```
pub trait Widget: AsAny {
    /// Adjust the widget's base when it is inserted into a tree, e.g. to
    /// make it draggable.
    fn init_base(&self, _base: &mut WidgetBase) {}

    /// The size this widget would like when laid out without a fixed size.
    fn preferred_size(&self, base: &WidgetBase, _ctx: &mut LayoutContext<'_>) -> Size {
        base.size()
    }

    /// Draw the widget. Children are drawn afterwards by the screen.
    fn paint(&self, _ctx: &mut PaintContext<'_>) {}

    /// Handle an event; return `Ok(true)` to consume it.
    fn event(&mut self, _ctx: &mut EventContext<'_>, _event: &WidgetEvent) -> EventResult {
        Ok(false)
    }

    /// Short type name used in logs.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl dyn Widget {
    /// Downcast to a concrete widget type.
    pub fn downcast_ref<T: Widget>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Downcast to a concrete widget type, mutably.
    pub fn downcast_mut<T: Widget>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// A widget with no behaviour of its own: windows, popups, the screen root
/// and grouping panels.
#[derive(Debug, Default, Clone, Copy)]
pub struct Panel;

impl Widget for Panel {}
