//! Event routing through the widget tree.
//!
//! Positional events travel top-down: a widget offers the event to its
//! visible, enabled children in reverse paint order (topmost first) before
//! handling it itself, and the first consumer stops the walk. Non-positional
//! events (focus, crossing, key, char, messages) are delivered to a single
//! widget.
//!
//! Windows and popups get extra behaviour from their node role once their
//! own widget declines an event:
//!
//! - a left press inside the header of a titled window starts a header drag,
//!   and windows and popups consume left clicks;
//! - windows and popups consume scrolls;
//! - a header-dragging window follows the pointer, clamped to the screen.
//!
//! Handler errors propagate with `?` to the screen entry point, which turns
//! them into [`DispatchResult::Faulted`].

use trellis_core::WidgetId;
use trellis_core::logging::targets;

use super::events::{
    Modifiers, MouseButton, MouseButtonEvent, MouseButtons, MouseDragEvent, MouseMotionEvent,
    ScrollEvent, WidgetEvent,
};
use super::traits::{Command, EventContext, EventResult};
use super::tree::{Node, NodeRole, WidgetTree};
use crate::geometry::{Point, Size};
use crate::theme::Theme;

/// Outcome of a screen entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    /// Some widget (or window) consumed the event.
    Accepted,
    /// Nothing consumed the event.
    Ignored,
    /// A modal window swallowed the event before it reached the tree.
    Blocked,
    /// A widget handler returned an error. The error has been logged.
    Faulted,
}

impl DispatchResult {
    /// Whether the event was consumed.
    pub fn was_handled(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub(crate) fn from_result(result: EventResult) -> Self {
        match result {
            Ok(true) => Self::Accepted,
            Ok(false) => Self::Ignored,
            Err(_) => Self::Faulted,
        }
    }
}

/// One routing pass over the tree.
///
/// Borrows the screen's tree, theme and command queue for the duration of a
/// single entry point. Commands pushed by handlers are applied by the screen
/// after the pass.
pub(crate) struct Dispatcher<'a> {
    tree: &'a mut WidgetTree,
    theme: &'a Theme,
    commands: &'a mut Vec<Command>,
    focus_settled: bool,
}

impl<'a> Dispatcher<'a> {
    pub(crate) fn new(
        tree: &'a mut WidgetTree,
        theme: &'a Theme,
        commands: &'a mut Vec<Command>,
    ) -> Self {
        Self {
            tree,
            theme,
            commands,
            focus_settled: false,
        }
    }

    /// Deliver an event to exactly one widget.
    ///
    /// Unknown ids are ignored.
    pub(crate) fn deliver(&mut self, id: WidgetId, event: &WidgetEvent) -> EventResult {
        let Some(node) = self.tree.node_mut(id) else {
            tracing::trace!(
                target: targets::SCREEN,
                ?id,
                event = event.name(),
                "event for stale widget dropped"
            );
            return Ok(false);
        };

        let Node { base, widget, .. } = node;
        let type_name = widget.type_name();
        let mut ctx = EventContext::new(id, base, self.theme, self.commands);
        widget.event(&mut ctx, event).inspect_err(|err| {
            tracing::error!(
                target: targets::SCREEN,
                ?id,
                widget = type_name,
                event = event.name(),
                %err,
                "widget handler failed"
            );
        })
    }

    /// Route a button event below `id`. `local` is the pointer relative to
    /// `id`.
    ///
    /// The deepest widget reached by a left press that is not already
    /// focused asks for focus; its ancestors don't.
    pub(crate) fn deliver_button(
        &mut self,
        id: WidgetId,
        local: Point,
        event: &MouseButtonEvent,
    ) -> EventResult {
        for child in self.routable_children(id) {
            let Some(base) = self.tree.base(child) else {
                continue;
            };
            if !base.contains(local) {
                continue;
            }
            let child_local = local - base.pos();
            if self.deliver_button(child, child_local, event)? {
                return Ok(true);
            }
        }

        if event.is_left_press() && !self.focus_settled && id != self.tree.root() {
            self.focus_settled = true;
            if self.tree.base(id).is_some_and(|base| !base.is_focused()) {
                self.commands.push(Command::RequestFocus(id));
            }
        }

        let own = WidgetEvent::MouseButton(MouseButtonEvent {
            local_pos: local,
            ..*event
        });
        if self.deliver(id, &own)? {
            return Ok(true);
        }
        Ok(self.window_button(id, local, event))
    }

    /// Route a motion event below `id`, offering it to every child that
    /// contains either the current or the previous pointer position.
    pub(crate) fn deliver_motion(
        &mut self,
        id: WidgetId,
        local: Point,
        event: &MouseMotionEvent,
    ) -> EventResult {
        for child in self.routable_children(id) {
            let Some(base) = self.tree.base(child) else {
                continue;
            };
            let inside = base.contains(local);
            let was_inside = base.contains(local - event.delta);
            if !inside && !was_inside {
                continue;
            }
            let child_local = local - base.pos();
            if self.deliver_motion(child, child_local, event)? {
                return Ok(true);
            }
        }

        let own = WidgetEvent::MouseMotion(MouseMotionEvent {
            local_pos: local,
            ..*event
        });
        self.deliver(id, &own)
    }

    /// Route a scroll event below `id`. Windows and popups consume it.
    pub(crate) fn deliver_scroll(
        &mut self,
        id: WidgetId,
        local: Point,
        event: &ScrollEvent,
    ) -> EventResult {
        for child in self.routable_children(id) {
            let Some(base) = self.tree.base(child) else {
                continue;
            };
            if !base.contains(local) {
                continue;
            }
            let child_local = local - base.pos();
            if self.deliver_scroll(child, child_local, event)? {
                return Ok(true);
            }
        }

        let own = WidgetEvent::Scroll(ScrollEvent {
            local_pos: local,
            ..*event
        });
        if self.deliver(id, &own)? {
            return Ok(true);
        }
        Ok(self.tree.role(id).is_some_and(NodeRole::is_window))
    }

    /// Deliver a drag step to the widget that owns the drag.
    ///
    /// `mouse` is the new pointer position in screen coordinates.
    pub(crate) fn deliver_drag(
        &mut self,
        id: WidgetId,
        mouse: Point,
        delta: Point,
        buttons: MouseButtons,
        modifiers: Modifiers,
        screen_size: Size,
    ) -> EventResult {
        let parent_origin = self
            .tree
            .parent(id)
            .map(|parent| self.tree.absolute_position(parent))
            .unwrap_or_default();
        let pos = mouse - parent_origin;
        let own_pos = self.tree.base(id).map(|base| base.pos()).unwrap_or_default();
        let event = WidgetEvent::MouseDrag(MouseDragEvent {
            pos,
            local_pos: pos - own_pos,
            delta,
            buttons,
            modifiers,
        });
        if self.deliver(id, &event)? {
            return Ok(true);
        }
        Ok(self.window_drag(id, delta, buttons, screen_size))
    }

    /// Visible, enabled children of `id`, topmost first.
    fn routable_children(&self, id: WidgetId) -> Vec<WidgetId> {
        self.tree
            .children(id)
            .iter()
            .rev()
            .copied()
            .filter(|&child| {
                self.tree
                    .base(child)
                    .is_some_and(|base| base.is_visible() && base.is_enabled())
            })
            .collect()
    }

    fn window_button(&mut self, id: WidgetId, local: Point, event: &MouseButtonEvent) -> bool {
        let header_height = self.theme.get_int_or("/window/header/height", 30);
        let Some(node) = self.tree.node_mut(id) else {
            return false;
        };
        match &mut node.role {
            NodeRole::Window(state) if event.button == MouseButton::Left => {
                state.header_drag =
                    event.pressed && !state.title.is_empty() && local.y < header_height;
                true
            }
            NodeRole::Popup(_) => event.button == MouseButton::Left,
            _ => false,
        }
    }

    fn window_drag(
        &mut self,
        id: WidgetId,
        delta: Point,
        buttons: MouseButtons,
        screen_size: Size,
    ) -> bool {
        let Some(node) = self.tree.node_mut(id) else {
            return false;
        };
        let NodeRole::Window(state) = &node.role else {
            return false;
        };
        if !state.header_drag || !buttons.contains(MouseButtons::LEFT) {
            return false;
        }

        let limit = (screen_size - node.base.size()).to_point();
        let pos = (node.base.pos() + delta).max(Point::ZERO).min(limit);
        node.base.set_pos(pos);
        tracing::trace!(target: targets::SCREEN, ?id, x = pos.x, y = pos.y, "window dragged");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::traits::{Panel, Widget};
    use crate::window::WindowState;

    struct Sink;

    impl Widget for Sink {
        fn event(&mut self, _ctx: &mut EventContext<'_>, event: &WidgetEvent) -> EventResult {
            Ok(matches!(event, WidgetEvent::MouseButton(_)))
        }
    }

    fn press(screen_pos: Point) -> MouseButtonEvent {
        MouseButtonEvent {
            local_pos: screen_pos,
            screen_pos,
            button: MouseButton::Left,
            pressed: true,
            modifiers: Modifiers::empty(),
        }
    }

    #[test]
    fn test_dispatch_result_from_result() {
        assert_eq!(DispatchResult::from_result(Ok(true)), DispatchResult::Accepted);
        assert_eq!(DispatchResult::from_result(Ok(false)), DispatchResult::Ignored);
        assert_eq!(
            DispatchResult::from_result(Err(trellis_core::WidgetError::fault("x"))),
            DispatchResult::Faulted
        );
        assert!(DispatchResult::Accepted.was_handled());
        assert!(!DispatchResult::Blocked.was_handled());
    }

    #[test]
    fn test_press_requests_focus_for_deepest_only() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        tree.base_mut(root).unwrap().set_size(Size::new(200, 200));
        let outer = tree.add_child(root, Panel).unwrap();
        tree.base_mut(outer).unwrap().set_size(Size::new(100, 100));
        let inner = tree.add_child(outer, Panel).unwrap();
        tree.base_mut(inner).unwrap().set_size(Size::new(50, 50));

        let theme = Theme::default();
        let mut commands = Vec::new();
        let handled = Dispatcher::new(&mut tree, &theme, &mut commands)
            .deliver_button(root, Point::new(10, 10), &press(Point::new(10, 10)))
            .unwrap();

        assert!(!handled);
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], Command::RequestFocus(id) if id == inner));
    }

    #[test]
    fn test_topmost_sibling_wins() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        tree.base_mut(root).unwrap().set_size(Size::new(200, 200));
        let below = tree.add_child(root, Sink).unwrap();
        tree.base_mut(below).unwrap().set_size(Size::new(100, 100));
        let above = tree.add_child(root, Sink).unwrap();
        tree.base_mut(above).unwrap().set_size(Size::new(100, 100));

        let theme = Theme::default();
        let mut commands = Vec::new();
        Dispatcher::new(&mut tree, &theme, &mut commands)
            .deliver_button(root, Point::new(5, 5), &press(Point::new(5, 5)))
            .unwrap();

        assert!(matches!(commands[0], Command::RequestFocus(id) if id == above));
    }

    #[test]
    fn test_header_press_starts_window_drag() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        tree.base_mut(root).unwrap().set_size(Size::new(400, 300));
        let window = tree
            .insert(root, Box::new(Panel), NodeRole::Window(WindowState::new("Tools")))
            .unwrap();
        {
            let base = tree.base_mut(window).unwrap();
            base.set_pos(Point::new(10, 10));
            base.set_size(Size::new(100, 100));
        }

        let theme = Theme::default();
        let mut commands = Vec::new();
        let mut dispatcher = Dispatcher::new(&mut tree, &theme, &mut commands);
        assert!(
            dispatcher
                .deliver_button(root, Point::new(20, 15), &press(Point::new(20, 15)))
                .unwrap()
        );
        assert!(
            dispatcher
                .deliver_drag(
                    window,
                    Point::new(500, 15),
                    Point::new(480, 0),
                    MouseButtons::LEFT,
                    Modifiers::empty(),
                    Size::new(400, 300),
                )
                .unwrap()
        );

        assert!(tree.window_state(window).unwrap().is_header_dragging());
        assert_eq!(tree.base(window).unwrap().pos(), Point::new(300, 10));
    }

    #[test]
    fn test_body_press_does_not_start_drag() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        tree.base_mut(root).unwrap().set_size(Size::new(400, 300));
        let window = tree
            .insert(root, Box::new(Panel), NodeRole::Window(WindowState::new("Tools")))
            .unwrap();
        tree.base_mut(window).unwrap().set_size(Size::new(100, 100));

        let theme = Theme::default();
        let mut commands = Vec::new();
        Dispatcher::new(&mut tree, &theme, &mut commands)
            .deliver_button(root, Point::new(20, 60), &press(Point::new(20, 60)))
            .unwrap();

        assert!(!tree.window_state(window).unwrap().is_header_dragging());
    }

    #[test]
    fn test_windows_consume_scroll() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        tree.base_mut(root).unwrap().set_size(Size::new(400, 300));
        let window = tree
            .insert(root, Box::new(Panel), NodeRole::Window(WindowState::new("")))
            .unwrap();
        tree.base_mut(window).unwrap().set_size(Size::new(100, 100));

        let theme = Theme::default();
        let mut commands = Vec::new();
        let mut dispatcher = Dispatcher::new(&mut tree, &theme, &mut commands);
        let scroll = ScrollEvent {
            local_pos: Point::ZERO,
            screen_pos: Point::new(50, 50),
            delta: crate::geometry::Vector2::new(0.0, 1.0),
        };
        assert!(dispatcher.deliver_scroll(root, Point::new(50, 50), &scroll).unwrap());
        assert!(!dispatcher.deliver_scroll(root, Point::new(250, 250), &scroll).unwrap());
    }
}
