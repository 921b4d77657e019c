//! Focus paths.
//!
//! A screen tracks two chains of widgets:
//!
//! - the **focus path**: the keyboard-focused widget and its ancestors, up to
//!   but excluding the root;
//! - the **hover path**: the widget under the pointer and all of its
//!   ancestors, root included.
//!
//! Both are stored root-first. When either changes, only the widgets that
//! actually left or joined the chain are notified, so re-applying the same
//! target is a no-op.

use trellis_core::WidgetId;

use super::tree::WidgetTree;

/// Widgets that left and joined a path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PathChange {
    /// Leaf-first.
    pub(crate) lost: Vec<WidgetId>,
    /// Root-first, so ancestors hear about it before the leaf.
    pub(crate) gained: Vec<WidgetId>,
}

impl PathChange {
    pub(crate) fn is_empty(&self) -> bool {
        self.lost.is_empty() && self.gained.is_empty()
    }
}

/// Compare two root-first paths.
pub(crate) fn diff_paths(old: &[WidgetId], new: &[WidgetId]) -> PathChange {
    PathChange {
        lost: old.iter().rev().filter(|id| !new.contains(id)).copied().collect(),
        gained: new.iter().filter(|id| !old.contains(id)).copied().collect(),
    }
}

/// The keyboard focus path for `widget`: its ancestors and itself, root
/// excluded, root-first.
pub(crate) fn focus_chain(tree: &WidgetTree, widget: Option<WidgetId>) -> Vec<WidgetId> {
    let Some(widget) = widget else {
        return Vec::new();
    };
    let mut chain = tree.ancestors(widget);
    chain.retain(|&id| id != tree.root());
    chain.reverse();
    chain
}

/// The hover path for `widget`: its ancestors and itself, root included,
/// root-first.
pub(crate) fn hover_chain(tree: &WidgetTree, widget: Option<WidgetId>) -> Vec<WidgetId> {
    let Some(widget) = widget else {
        return Vec::new();
    };
    let mut chain = tree.ancestors(widget);
    chain.reverse();
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::traits::Panel;

    #[test]
    fn test_diff_orders_notifications() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        let a = tree.add_child(root, Panel).unwrap();
        let b = tree.add_child(a, Panel).unwrap();
        let c = tree.add_child(b, Panel).unwrap();
        let d = tree.add_child(a, Panel).unwrap();

        let old = focus_chain(&tree, Some(c));
        assert_eq!(old, vec![a, b, c]);
        let new = focus_chain(&tree, Some(d));
        let change = diff_paths(&old, &new);
        assert_eq!(change.lost, vec![c, b]);
        assert_eq!(change.gained, vec![d]);
    }

    #[test]
    fn test_same_path_is_empty_change() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        let a = tree.add_child(root, Panel).unwrap();
        let path = focus_chain(&tree, Some(a));
        assert!(diff_paths(&path, &path).is_empty());
    }

    #[test]
    fn test_hover_chain_includes_root() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        let a = tree.add_child(root, Panel).unwrap();
        assert_eq!(hover_chain(&tree, Some(a)), vec![root, a]);
        assert!(focus_chain(&tree, None).is_empty());
        assert!(focus_chain(&tree, Some(root)).is_empty());
    }
}
