//! Layout management for child widgets.
//!
//! A [`Layout`] installed on a widget with
//! [`WidgetTree::set_layout`](super::WidgetTree::set_layout) takes over both
//! size negotiation and child placement for that widget.

mod box_layout;

pub use box_layout::{Alignment, BoxLayout, Orientation};

use trellis_core::WidgetId;

use super::traits::LayoutContext;
use super::tree::WidgetTree;
use crate::geometry::Size;

/// Positions and sizes the children of a widget.
pub trait Layout {
    /// The size the laid-out widget would like.
    fn preferred_size(&self, tree: &WidgetTree, id: WidgetId, ctx: &mut LayoutContext<'_>)
    -> Size;

    /// Place every child of `id`, then lay the children out in turn.
    fn perform_layout(&self, tree: &mut WidgetTree, id: WidgetId, ctx: &mut LayoutContext<'_>);
}
