//! Popup placement and stacking.
//!
//! A popup has no position of its own: every frame it is placed from its
//! parent window's position plus its anchor, centred vertically on the
//! anchor and then pushed back inside the screen vertically. Popups can be
//! anchored to other popups, in which case the parent is placed first.
//!
//! Popups owned by a button get their anchor from the button: level with the
//! button's vertical centre, 15 pixels beside the parent window on the
//! popup's [`Side`].

use trellis_core::WidgetId;
use trellis_core::logging::targets;

use crate::geometry::Point;
use crate::widget::WidgetTree;

/// Horizontal gap between a window edge and the popups it opens.
pub const POPUP_GAP: i32 = 15;

/// Which side of its parent window a popup opens on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    #[default]
    Right,
}

/// Recompute the screen position of `popup` from its anchor.
///
/// A popup whose parent window no longer exists is hidden. A popup whose
/// parent is hidden is hidden too.
pub(crate) fn refresh_relative_placement(tree: &mut WidgetTree, popup: WidgetId, screen_height: i32) {
    refresh(tree, popup, screen_height, 0);
}

fn refresh(tree: &mut WidgetTree, popup: WidgetId, screen_height: i32, depth: usize) {
    let Some(state) = tree.popup_state(popup) else {
        return;
    };
    let parent = state.parent_window();
    let anchor = state.anchor_pos;

    if !tree.contains_widget(parent) {
        if let Some(base) = tree.base_mut(popup)
            && base.is_visible()
        {
            tracing::debug!(target: targets::POPUP, ?popup, "parent window gone, hiding popup");
            base.set_visible(false);
        }
        return;
    }

    // Anchored to another popup: place that one first. The depth bound
    // stops parent cycles.
    if depth < tree.widget_count() && tree.popup_state(parent).is_some() {
        refresh(tree, parent, screen_height, depth + 1);
    }

    let parent_visible = tree.visible_recursive(parent);
    let parent_pos = tree.base(parent).map(|base| base.pos()).unwrap_or_default();
    let parent_of_popup = tree.parent(popup);
    let origin = parent_of_popup
        .map(|p| tree.absolute_position(p))
        .unwrap_or_default();

    let Some(base) = tree.base_mut(popup) else {
        return;
    };
    if !parent_visible {
        base.set_visible(false);
    }

    let mut pos = parent_pos + anchor - Point::new(0, base.height() / 2);
    let top = origin.y + pos.y;
    let bottom = top + base.height();
    if bottom > screen_height {
        pos.y -= bottom - screen_height;
    } else if top < 0 {
        pos.y -= top;
    }
    base.set_pos(pos);
}

/// The anchor a button-owned popup should have, or `None` when the popup,
/// its button or its parent window is gone.
pub(crate) fn anchor_for_button(tree: &WidgetTree, popup: WidgetId) -> Option<Point> {
    let state = tree.popup_state(popup)?;
    let button = state.button()?;
    let parent = state.parent_window();
    let button_base = tree.base(button)?;
    let parent_base = tree.base(parent)?;
    let popup_width = tree.base(popup)?.width();

    let y = tree.absolute_position(button).y - tree.absolute_position(parent).y
        + button_base.height() / 2;
    let x = match state.side {
        Side::Right => parent_base.width() + POPUP_GAP,
        Side::Left => -POPUP_GAP - popup_width,
    };
    Some(Point::new(x, y))
}

/// Whether a disposable popup has lost focus and should be hidden.
pub(crate) fn should_dismiss(tree: &WidgetTree, popup: WidgetId) -> bool {
    let Some(state) = tree.popup_state(popup) else {
        return false;
    };
    if !state.disposable {
        return false;
    }
    let focused = |id| tree.base(id).is_some_and(|base| base.is_focused());
    tree.base(popup).is_some_and(|base| base.is_visible())
        && !focused(popup)
        && !focused(state.parent_window())
}

/// A sibling popup anchored to `window` that is stacked below it.
pub(crate) fn popup_below(tree: &WidgetTree, window: WidgetId) -> Option<WidgetId> {
    let parent = tree.parent(window)?;
    let index = tree.child_index(parent, window)?;
    tree.children(parent)[..index].iter().copied().find(|&sibling| {
        tree.popup_state(sibling)
            .is_some_and(|state| state.parent_window() == window)
    })
}

/// All popups directly under the root, in paint order.
pub(crate) fn popups(tree: &WidgetTree) -> Vec<WidgetId> {
    tree.children(tree.root())
        .iter()
        .copied()
        .filter(|&id| tree.popup_state(id).is_some())
        .collect()
}
