//! Widget base implementation.
//!
//! This module provides `WidgetBase`, the state every node in the widget
//! arena carries regardless of what kind of widget it is: geometry,
//! visibility, enabled and focus flags, cursor, tooltip and the tree links.

use trellis_core::WidgetId;

use super::cursor::CursorShape;
use crate::geometry::{Point, Rect, Size};

/// The common state of every widget.
///
/// The position is relative to the parent. Tree links and the focus flags are
/// maintained by the widget tree and the screen; everything else is set
/// freely through [`WidgetTree::base_mut`](super::WidgetTree::base_mut).
#[derive(Debug, Clone)]
pub struct WidgetBase {
    name: Option<String>,
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,

    pos: Point,
    size: Size,
    fixed_size: Size,

    visible: bool,
    enabled: bool,
    focused: bool,
    mouse_focus: bool,
    draggable: bool,

    cursor: CursorShape,
    tooltip: String,
}

impl Default for WidgetBase {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetBase {
    /// Create a visible, enabled base at the origin with zero size.
    pub fn new() -> Self {
        Self {
            name: None,
            parent: None,
            children: Vec::new(),
            pos: Point::ZERO,
            size: Size::ZERO,
            fixed_size: Size::ZERO,
            visible: true,
            enabled: true,
            focused: false,
            mouse_focus: false,
            draggable: false,
            cursor: CursorShape::Arrow,
            tooltip: String::new(),
        }
    }

    // =========================================================================
    // Identity and tree links
    // =========================================================================

    /// Debug name, if one was set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// The parent widget, `None` for the root.
    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// Children in paint order (back to front).
    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    pub(crate) fn set_parent(&mut self, parent: Option<WidgetId>) {
        self.parent = parent;
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<WidgetId> {
        &mut self.children
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Position relative to the parent.
    #[inline]
    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn set_pos(&mut self, pos: Point) {
        self.pos = pos;
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.size.height
    }

    /// Size override used by layouts. A zero component is not fixed.
    pub fn fixed_size(&self) -> Size {
        self.fixed_size
    }

    pub fn set_fixed_size(&mut self, size: Size) {
        self.fixed_size = size;
    }

    pub fn set_fixed_width(&mut self, width: i32) {
        self.fixed_size.width = width;
    }

    pub fn set_fixed_height(&mut self, height: i32) {
        self.fixed_size.height = height;
    }

    /// The widget's rectangle in its parent's coordinates.
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// The widget's rectangle in its own coordinates.
    pub fn local_rect(&self) -> Rect {
        Rect::new(Point::ZERO, self.size)
    }

    /// Whether a point in the parent's coordinates lies inside the widget.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.rect().contains(p)
    }

    /// Map a point from the parent's coordinates into the widget's.
    #[inline]
    pub fn map_from_parent(&self, p: Point) -> Point {
        p - self.pos
    }

    // =========================================================================
    // State flags
    // =========================================================================

    /// Whether the widget itself is visible (ancestors not considered).
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the widget is on the keyboard focus path.
    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub(crate) fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Whether the widget is on the hover path.
    #[inline]
    pub fn has_mouse_focus(&self) -> bool {
        self.mouse_focus
    }

    pub(crate) fn set_mouse_focus(&mut self, mouse_focus: bool) {
        self.mouse_focus = mouse_focus;
    }

    /// Whether pressing on this widget starts a drag that it owns.
    #[inline]
    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn set_draggable(&mut self, draggable: bool) {
        self.draggable = draggable;
    }

    // =========================================================================
    // Cursor and tooltip
    // =========================================================================

    pub fn cursor(&self) -> CursorShape {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: CursorShape) {
        self.cursor = cursor;
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn set_tooltip(&mut self, tooltip: impl Into<String>) {
        self.tooltip = tooltip.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_uses_parent_coordinates() {
        let mut base = WidgetBase::new();
        base.set_pos(Point::new(10, 20));
        base.set_size(Size::new(30, 40));
        assert!(base.contains(Point::new(10, 20)));
        assert!(base.contains(Point::new(39, 59)));
        assert!(!base.contains(Point::new(5, 25)));
        assert_eq!(base.map_from_parent(Point::new(15, 25)), Point::new(5, 5));
    }

    #[test]
    fn test_fixed_size_components() {
        let mut base = WidgetBase::new();
        base.set_fixed_height(12);
        assert_eq!(base.fixed_size(), Size::new(0, 12));
    }
}
