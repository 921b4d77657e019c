//! Box layout for arranging widgets in a row or column.
//!
//! `BoxLayout` stacks the visible children along one axis with a uniform
//! margin around them and fixed spacing between them. On the cross axis the
//! children are aligned according to [`Alignment`].
//!
//! # Example
//!
//! ```ignore
//! use trellis::widget::layout::{Alignment, BoxLayout, Orientation};
//!
//! screen.tree_mut().set_layout(
//!     window,
//!     BoxLayout::new(Orientation::Vertical, Alignment::Fill)
//!         .with_margin(15)
//!         .with_spacing(6),
//! )?;
//! ```

use trellis_core::WidgetId;

use super::Layout;
use crate::geometry::{Point, Size};
use crate::widget::traits::LayoutContext;
use crate::widget::tree::WidgetTree;

/// Layout orientation for box layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Items are arranged left to right.
    #[default]
    Horizontal,
    /// Items are arranged top to bottom.
    Vertical,
}

impl Orientation {
    /// Index of the main axis (0 = horizontal, 1 = vertical).
    #[inline]
    fn axis(self) -> usize {
        match self {
            Orientation::Horizontal => 0,
            Orientation::Vertical => 1,
        }
    }
}

/// Alignment of items on the cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Align items at the start (left/top), inside the margin.
    Minimum,
    /// Center items.
    #[default]
    Middle,
    /// Align items at the end (right/bottom).
    Maximum,
    /// Stretch items to fill the cross axis, minus the margins.
    Fill,
}

/// Lays out children in a single row or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxLayout {
    orientation: Orientation,
    alignment: Alignment,
    margin: i32,
    spacing: i32,
}

impl BoxLayout {
    /// A layout with no margin and no spacing.
    pub fn new(orientation: Orientation, alignment: Alignment) -> Self {
        Self {
            orientation,
            alignment,
            margin: 0,
            spacing: 0,
        }
    }

    /// A vertical layout filling the width.
    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical, Alignment::Fill)
    }

    /// A horizontal layout centring items vertically.
    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal, Alignment::Middle)
    }

    pub fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn margin(&self) -> i32 {
        self.margin
    }

    pub fn spacing(&self) -> i32 {
        self.spacing
    }

    /// Height reserved for a window's title header, if `id` has one.
    fn header_height(tree: &WidgetTree, id: WidgetId, ctx: &LayoutContext<'_>) -> i32 {
        match tree.window_state(id) {
            Some(state) if !state.title.is_empty() => {
                ctx.theme().get_int_or("/window/header/height", 30)
            }
            _ => 0,
        }
    }

    fn target_size(tree: &WidgetTree, child: WidgetId, ctx: &mut LayoutContext<'_>) -> Size {
        let preferred = tree.preferred_size(child, ctx);
        let fixed = tree.base(child).map(|b| b.fixed_size()).unwrap_or_default();
        fixed.or(preferred)
    }
}

impl Default for BoxLayout {
    fn default() -> Self {
        Self::vertical()
    }
}

impl Layout for BoxLayout {
    fn preferred_size(
        &self,
        tree: &WidgetTree,
        id: WidgetId,
        ctx: &mut LayoutContext<'_>,
    ) -> Size {
        let axis1 = self.orientation.axis();
        let axis2 = 1 - axis1;
        let mut size = Size::new(2 * self.margin, 2 * self.margin);
        let y_offset = Self::header_height(tree, id, ctx);

        let mut first = true;
        for &child in tree.children(id) {
            if !tree.base(child).is_some_and(|b| b.is_visible()) {
                continue;
            }
            if first {
                first = false;
            } else {
                size.set(axis1, size.get(axis1) + self.spacing);
            }

            let target = Self::target_size(tree, child, ctx);
            size.set(axis1, size.get(axis1) + target.get(axis1));
            size.set(
                axis2,
                size.get(axis2).max(target.get(axis2) + 2 * self.margin),
            );
        }

        Size::new(size.width, size.height + y_offset)
    }

    fn perform_layout(&self, tree: &mut WidgetTree, id: WidgetId, ctx: &mut LayoutContext<'_>) {
        let Some(base) = tree.base(id) else {
            return;
        };
        let mut container = base.fixed_size().or(base.size());
        let axis1 = self.orientation.axis();
        let axis2 = 1 - axis1;
        let mut position = self.margin;
        let mut y_offset = 0;

        let header = Self::header_height(tree, id, ctx);
        if header > 0 {
            if self.orientation == Orientation::Vertical {
                position += header - self.margin / 2;
            } else {
                y_offset = header;
                container.height -= y_offset;
            }
        }

        let mut first = true;
        for child in tree.children(id).to_vec() {
            if !tree.base(child).is_some_and(|b| b.is_visible()) {
                continue;
            }
            if first {
                first = false;
            } else {
                position += self.spacing;
            }

            let fixed = tree.base(child).map(|b| b.fixed_size()).unwrap_or_default();
            let mut target = Self::target_size(tree, child, ctx);
            let mut pos = Point::new(0, y_offset);
            let mut cross = if axis2 == 0 { pos.x } else { pos.y };

            match self.alignment {
                Alignment::Minimum => cross += self.margin,
                Alignment::Middle => cross += (container.get(axis2) - target.get(axis2)) / 2,
                Alignment::Maximum => {
                    cross += container.get(axis2) - target.get(axis2) - self.margin * 2
                }
                Alignment::Fill => {
                    cross += self.margin;
                    let fill = if fixed.get(axis2) != 0 {
                        fixed.get(axis2)
                    } else {
                        container.get(axis2) - self.margin * 2
                    };
                    target.set(axis2, fill);
                }
            }

            if axis1 == 0 {
                pos = Point::new(position, cross);
            } else {
                pos = Point::new(cross, position);
            }

            if let Some(base) = tree.base_mut(child) {
                base.set_pos(pos);
                base.set_size(target);
            }
            tree.perform_layout(child, ctx);
            position += target.get(axis1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingContext;
    use crate::theme::Theme;
    use crate::widget::traits::Panel;

    fn fixed_child(tree: &mut WidgetTree, parent: WidgetId, size: Size) -> WidgetId {
        let id = tree.add_child(parent, Panel).expect("parent exists");
        tree.base_mut(id).expect("child exists").set_fixed_size(size);
        id
    }

    #[test]
    fn test_vertical_preferred_size() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        let panel = tree.add_child(root, Panel).unwrap();
        fixed_child(&mut tree, panel, Size::new(40, 10));
        fixed_child(&mut tree, panel, Size::new(60, 20));
        let layout = BoxLayout::vertical().with_margin(5).with_spacing(3);
        tree.set_layout(panel, layout).unwrap();

        let mut draw = RecordingContext::new();
        let theme = Theme::default();
        let mut ctx = LayoutContext::new(&mut draw, &theme);
        assert_eq!(tree.preferred_size(panel, &mut ctx), Size::new(70, 43));
    }

    #[test]
    fn test_fill_stretches_cross_axis() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        let panel = tree.add_child(root, Panel).unwrap();
        tree.base_mut(panel).unwrap().set_size(Size::new(100, 100));
        let a = fixed_child(&mut tree, panel, Size::new(0, 10));
        let b = fixed_child(&mut tree, panel, Size::new(0, 20));
        tree.set_layout(panel, BoxLayout::vertical().with_margin(4).with_spacing(2))
            .unwrap();

        let mut draw = RecordingContext::new();
        let theme = Theme::default();
        let mut ctx = LayoutContext::new(&mut draw, &theme);
        tree.perform_layout(panel, &mut ctx);

        let a = tree.base(a).unwrap();
        let b = tree.base(b).unwrap();
        assert_eq!(a.pos(), Point::new(4, 4));
        assert_eq!(a.size(), Size::new(92, 10));
        assert_eq!(b.pos(), Point::new(4, 16));
        assert_eq!(b.size(), Size::new(92, 20));
    }

    #[test]
    fn test_hidden_children_are_skipped() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        let panel = tree.add_child(root, Panel).unwrap();
        fixed_child(&mut tree, panel, Size::new(10, 10));
        let hidden = fixed_child(&mut tree, panel, Size::new(10, 10));
        tree.base_mut(hidden).unwrap().set_visible(false);
        tree.set_layout(panel, BoxLayout::horizontal().with_spacing(5))
            .unwrap();

        let mut draw = RecordingContext::new();
        let theme = Theme::default();
        let mut ctx = LayoutContext::new(&mut draw, &theme);
        assert_eq!(tree.preferred_size(panel, &mut ctx), Size::new(10, 10));
    }
}
