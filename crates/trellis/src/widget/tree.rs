//! The widget arena.
//!
//! Every widget of a screen lives in one [`WidgetTree`]: a slotmap of nodes,
//! each holding the widget's [`WidgetBase`], its role (plain widget, window
//! or popup), an optional layout and the boxed [`Widget`] itself. Parent and
//! child links are [`WidgetId`]s, so a link to a destroyed widget simply stops
//! resolving.
//!
//! Structural mutations that can strand a screen's focus or drag state
//! (destroying, removing) are crate-private; the [`Screen`](crate::Screen)
//! wraps them and scrubs its own references first.

use std::fmt::Write as _;
use std::sync::Arc;

use slotmap::SlotMap;
use trellis_core::logging::targets;
use trellis_core::{TreeError, TreeResult, WidgetId};

use super::base::WidgetBase;
use super::layout::Layout;
use super::traits::{LayoutContext, Panel, Widget};
use crate::geometry::{Point, Size};
use crate::window::{PopupState, WindowState};

/// What kind of node a widget is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRole {
    /// An ordinary widget.
    Widget,
    /// A top-level window.
    Window(WindowState),
    /// A popup anchored to a window.
    Popup(PopupState),
}

impl NodeRole {
    /// Whether the node is a window or a popup.
    pub fn is_window(&self) -> bool {
        matches!(self, Self::Window(_) | Self::Popup(_))
    }

    /// Whether the node is a popup.
    pub fn is_popup(&self) -> bool {
        matches!(self, Self::Popup(_))
    }
}

pub(crate) struct Node {
    pub(crate) base: WidgetBase,
    pub(crate) role: NodeRole,
    pub(crate) layout: Option<Arc<dyn Layout>>,
    pub(crate) widget: Box<dyn Widget>,
}

/// Arena of widgets rooted at the screen widget.
pub struct WidgetTree {
    nodes: SlotMap<WidgetId, Node>,
    root: WidgetId,
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetTree")
            .field("root", &self.root)
            .field("widgets", &self.nodes.len())
            .finish()
    }
}

impl WidgetTree {
    /// Create a tree holding only the root.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let mut base = WidgetBase::new();
        base.set_name("screen");
        let root = nodes.insert(Node {
            base,
            role: NodeRole::Widget,
            layout: None,
            widget: Box::new(Panel),
        });
        Self { nodes, root }
    }

    /// The root widget, which stands for the screen itself.
    #[inline]
    pub fn root(&self) -> WidgetId {
        self.root
    }

    /// Number of live widgets, including the root.
    pub fn widget_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the id refers to a live widget.
    #[inline]
    pub fn contains_widget(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    pub(crate) fn node(&self, id: WidgetId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: WidgetId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    // =========================================================================
    // Node access
    // =========================================================================

    pub fn base(&self, id: WidgetId) -> Option<&WidgetBase> {
        self.nodes.get(id).map(|node| &node.base)
    }

    pub fn base_mut(&mut self, id: WidgetId) -> Option<&mut WidgetBase> {
        self.nodes.get_mut(id).map(|node| &mut node.base)
    }

    /// Like [`base`](Self::base) but reporting unknown ids as errors.
    pub fn try_base(&self, id: WidgetId) -> TreeResult<&WidgetBase> {
        self.base(id).ok_or(TreeError::InvalidWidget(id))
    }

    /// Like [`base_mut`](Self::base_mut) but reporting unknown ids as errors.
    pub fn try_base_mut(&mut self, id: WidgetId) -> TreeResult<&mut WidgetBase> {
        self.base_mut(id).ok_or(TreeError::InvalidWidget(id))
    }

    pub fn widget(&self, id: WidgetId) -> Option<&(dyn Widget + 'static)> {
        self.nodes.get(id).map(|node| node.widget.as_ref())
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut (dyn Widget + 'static)> {
        self.nodes.get_mut(id).map(|node| node.widget.as_mut())
    }

    /// The widget as its concrete type.
    pub fn downcast_ref<T: Widget>(&self, id: WidgetId) -> Option<&T> {
        self.widget(id)?.downcast_ref::<T>()
    }

    /// The widget as its concrete type, mutably.
    pub fn downcast_mut<T: Widget>(&mut self, id: WidgetId) -> Option<&mut T> {
        self.widget_mut(id)?.downcast_mut::<T>()
    }

    pub fn role(&self, id: WidgetId) -> Option<&NodeRole> {
        self.nodes.get(id).map(|node| &node.role)
    }

    /// Window state of a window or popup.
    pub fn window_state(&self, id: WidgetId) -> Option<&WindowState> {
        match self.role(id)? {
            NodeRole::Window(state) => Some(state),
            NodeRole::Popup(popup) => Some(&popup.window),
            NodeRole::Widget => None,
        }
    }

    /// Window state of a window or popup, mutably.
    pub fn window_state_mut(&mut self, id: WidgetId) -> Option<&mut WindowState> {
        match &mut self.nodes.get_mut(id)?.role {
            NodeRole::Window(state) => Some(state),
            NodeRole::Popup(popup) => Some(&mut popup.window),
            NodeRole::Widget => None,
        }
    }

    pub fn popup_state(&self, id: WidgetId) -> Option<&PopupState> {
        match self.role(id)? {
            NodeRole::Popup(popup) => Some(popup),
            _ => None,
        }
    }

    pub fn popup_state_mut(&mut self, id: WidgetId) -> Option<&mut PopupState> {
        match &mut self.nodes.get_mut(id)?.role {
            NodeRole::Popup(popup) => Some(popup),
            _ => None,
        }
    }

    /// Install a layout that positions this widget's children.
    pub fn set_layout(&mut self, id: WidgetId, layout: impl Layout + 'static) -> TreeResult<()> {
        let node = self.nodes.get_mut(id).ok_or(TreeError::InvalidWidget(id))?;
        node.layout = Some(Arc::new(layout));
        Ok(())
    }

    /// Remove the layout of a widget.
    pub fn clear_layout(&mut self, id: WidgetId) -> TreeResult<()> {
        let node = self.nodes.get_mut(id).ok_or(TreeError::InvalidWidget(id))?;
        node.layout = None;
        Ok(())
    }

    pub fn layout(&self, id: WidgetId) -> Option<Arc<dyn Layout>> {
        self.nodes.get(id)?.layout.clone()
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Append a plain widget as the last (topmost) child of `parent`.
    pub fn add_child(&mut self, parent: WidgetId, widget: impl Widget) -> TreeResult<WidgetId> {
        self.insert(parent, Box::new(widget), NodeRole::Widget)
    }

    /// Append an already boxed widget.
    pub fn add_boxed_child(
        &mut self,
        parent: WidgetId,
        widget: Box<dyn Widget>,
    ) -> TreeResult<WidgetId> {
        self.insert(parent, widget, NodeRole::Widget)
    }

    pub(crate) fn insert(
        &mut self,
        parent: WidgetId,
        widget: Box<dyn Widget>,
        role: NodeRole,
    ) -> TreeResult<WidgetId> {
        if !self.nodes.contains_key(parent) {
            return Err(TreeError::InvalidWidget(parent));
        }

        let mut base = WidgetBase::new();
        base.set_parent(Some(parent));
        widget.init_base(&mut base);
        let type_name = widget.type_name();
        let id = self.nodes.insert(Node {
            base,
            role,
            layout: None,
            widget,
        });
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.base.children_mut().push(id);
        }
        tracing::trace!(target: targets::TREE, ?id, ?parent, type_name, "widget added");
        Ok(id)
    }

    /// The child at `index` in paint order.
    pub fn child_at(&self, parent: WidgetId, index: usize) -> TreeResult<WidgetId> {
        let children = self.try_base(parent)?.children();
        children
            .get(index)
            .copied()
            .ok_or(TreeError::InvalidChildIndex {
                parent,
                index,
                len: children.len(),
            })
    }

    /// Children in paint order; empty for unknown ids.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.base(id).map(WidgetBase::children).unwrap_or(&[])
    }

    pub fn child_count(&self, id: WidgetId) -> usize {
        self.children(id).len()
    }

    pub fn child_index(&self, parent: WidgetId, child: WidgetId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.base(id)?.parent()
    }

    /// `id` followed by its ancestors up to and including the root.
    pub fn ancestors(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut chain = Vec::new();
        let mut current = Some(id).filter(|&id| self.contains_widget(id));
        while let Some(id) = current {
            chain.push(id);
            current = self.parent(id);
        }
        chain
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(w) = current {
            if w == ancestor {
                return true;
            }
            current = self.parent(w);
        }
        false
    }

    /// Move `child` to the end of its parent's children, on top of its
    /// siblings.
    pub(crate) fn raise(&mut self, child: WidgetId) -> TreeResult<()> {
        let parent = self.parent(child).ok_or(TreeError::CannotReparentRoot)?;
        let node = self.nodes.get_mut(parent).ok_or(TreeError::InvalidWidget(parent))?;
        let children = node.base.children_mut();
        if let Some(index) = children.iter().position(|&c| c == child) {
            let id = children.remove(index);
            children.push(id);
        }
        Ok(())
    }

    /// Destroy a widget and its whole subtree, returning every removed id.
    pub(crate) fn destroy(&mut self, id: WidgetId) -> TreeResult<Vec<WidgetId>> {
        if id == self.root {
            return Err(TreeError::CannotReparentRoot);
        }
        if !self.nodes.contains_key(id) {
            return Err(TreeError::InvalidWidget(id));
        }

        if let Some(parent) = self.parent(id)
            && let Some(parent_node) = self.nodes.get_mut(parent)
        {
            parent_node.base.children_mut().retain(|&c| c != id);
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.base.children().iter().copied());
                removed.push(current);
            }
        }
        tracing::trace!(target: targets::TREE, ?id, count = removed.len(), "subtree destroyed");
        Ok(removed)
    }

    // =========================================================================
    // Coordinates and hit-testing
    // =========================================================================

    /// Position in screen coordinates: the sum of all ancestor positions.
    pub fn absolute_position(&self, id: WidgetId) -> Point {
        self.ancestors(id)
            .into_iter()
            .filter_map(|w| self.base(w))
            .fold(Point::ZERO, |acc, base| acc + base.pos())
    }

    /// Whether the widget and all of its ancestors are visible.
    pub fn visible_recursive(&self, id: WidgetId) -> bool {
        let chain = self.ancestors(id);
        !chain.is_empty()
            && chain
                .iter()
                .all(|&w| self.base(w).is_some_and(WidgetBase::is_visible))
    }

    /// The nearest window or popup at or above `id`.
    pub fn window_of(&self, id: WidgetId) -> Option<WidgetId> {
        self.ancestors(id)
            .into_iter()
            .find(|&w| self.role(w).is_some_and(NodeRole::is_window))
    }

    /// Whether a point in the parent's coordinates lies inside the widget.
    pub fn contains(&self, id: WidgetId, p: Point) -> bool {
        self.base(id).is_some_and(|base| base.contains(p))
    }

    /// The chain of widgets under a screen point, root first.
    ///
    /// At each level the last visible child (in paint order) containing the
    /// point is followed. Empty if the point is outside the root.
    pub fn hit_path(&self, p: Point) -> Vec<WidgetId> {
        let mut path = Vec::new();
        if !self.contains(self.root, p) {
            return path;
        }

        let mut current = self.root;
        let mut local = p - self.base(self.root).map(WidgetBase::pos).unwrap_or_default();
        path.push(current);
        loop {
            let next = self.children(current).iter().rev().copied().find(|&child| {
                self.base(child)
                    .is_some_and(|base| base.is_visible() && base.contains(local))
            });
            match next {
                Some(child) => {
                    local = local - self.base(child).map(WidgetBase::pos).unwrap_or_default();
                    path.push(child);
                    current = child;
                }
                None => return path,
            }
        }
    }

    /// The most specific widget under a screen point.
    pub fn find_widget(&self, p: Point) -> Option<WidgetId> {
        self.hit_path(p).last().copied()
    }

    /// The deepest widget under a screen point that satisfies `predicate`,
    /// falling back to matching ancestors.
    pub fn find_widget_where(
        &self,
        p: Point,
        predicate: impl Fn(&WidgetBase) -> bool,
    ) -> Option<WidgetId> {
        self.hit_path(p)
            .into_iter()
            .rev()
            .find(|&id| self.base(id).is_some_and(&predicate))
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// The size the widget would like: its layout's answer if it has one,
    /// else the widget's own.
    pub fn preferred_size(&self, id: WidgetId, ctx: &mut LayoutContext<'_>) -> Size {
        let Some(node) = self.nodes.get(id) else {
            return Size::ZERO;
        };
        let preferred = match &node.layout {
            Some(layout) => layout.preferred_size(self, id, ctx),
            None => node.widget.preferred_size(&node.base, ctx),
        };

        // A titled window is at least wide enough for its title.
        match &node.role {
            NodeRole::Window(state) if !state.title.is_empty() => {
                let font = ctx.theme().get_str_or("/font/bold", "sans-bold").to_owned();
                let draw = ctx.draw();
                draw.font_size(18.0);
                draw.font_face(&font);
                let (_, bounds) = draw.text_bounds(0.0, 0.0, &state.title);
                Size::new(
                    preferred.width.max(bounds.width() as i32 + 20),
                    preferred.height.max(bounds.height() as i32),
                )
            }
            _ => preferred,
        }
    }

    /// Position and size the children of `id`, recursively.
    pub fn perform_layout(&mut self, id: WidgetId, ctx: &mut LayoutContext<'_>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };

        if let Some(layout) = node.layout.clone() {
            layout.perform_layout(self, id, ctx);
            return;
        }

        let children = node.base.children().to_vec();
        if node.role.is_popup() && children.len() == 1 {
            let size = node.base.size();
            let child = children[0];
            if let Some(base) = self.base_mut(child) {
                base.set_pos(Point::ZERO);
                base.set_size(size);
            }
            self.perform_layout(child, ctx);
            return;
        }

        for child in children {
            let preferred = self.preferred_size(child, ctx);
            if let Some(base) = self.base_mut(child) {
                let size = base.fixed_size().or(preferred);
                base.set_size(size);
            }
            self.perform_layout(child, ctx);
        }
    }

    /// Multi-line dump of the tree for debugging.
    pub fn format_tree(&self) -> String {
        let mut output = String::new();
        self.format_subtree_into(self.root, 0, &mut output);
        output
    }

    fn format_subtree_into(&self, id: WidgetId, depth: usize, output: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let kind = match &node.role {
            NodeRole::Widget => "",
            NodeRole::Window(_) => " [window]",
            NodeRole::Popup(_) => " [popup]",
        };
        let _ = writeln!(
            output,
            "{:indent$}{} {:?} pos=({}, {}) size={}x{}{}{}",
            "",
            node.base.name().unwrap_or(node.widget.type_name()),
            id,
            node.base.pos().x,
            node.base.pos().y,
            node.base.width(),
            node.base.height(),
            kind,
            if node.base.is_visible() { "" } else { " (hidden)" },
            indent = depth * 2
        );
        for &child in node.base.children() {
            self.format_subtree_into(child, depth + 1, output);
        }
    }
}
