//! Frame driver: popup housekeeping, the paint walk and tooltips.

use trellis_core::logging::targets;
use trellis_core::{PerfSpan, WidgetId};

use super::Screen;
use crate::geometry::{Color, Rect, Size};
use crate::render::{DrawContext, TextAlign};
use crate::theme::Theme;
use crate::widget::{Dispatcher, NodeRole, PaintContext, WidgetEvent, WidgetTree};
use crate::window::chrome::{draw_popup, draw_window};
use crate::window::popup::{anchor_for_button, popups, refresh_relative_placement, should_dismiss};

/// Wrap width of long tooltips.
const TOOLTIP_WIDTH: f32 = 150.0;

/// Weight of the newest sample in the FPS estimate.
const FPS_SMOOTHING: f32 = 0.0175;

impl Screen {
    /// Draw one frame.
    ///
    /// Hidden screens draw nothing. Disposable popups that lost focus are
    /// hidden first and popups follow their buttons, then the tree is painted
    /// back to front and the tooltip of the hovered widget goes on top.
    pub fn draw_all(&mut self) {
        if !self.visible {
            return;
        }
        let _span = PerfSpan::new("draw_all");
        let start = self.clock.now();

        let size = Size::new(
            (self.fb_size.width as f32 / self.pixel_ratio) as i32,
            (self.fb_size.height as f32 / self.pixel_ratio) as i32,
        );
        if !size.is_empty() && size != self.size {
            self.size = size;
            let root = self.tree.root();
            if let Some(base) = self.tree.base_mut(root) {
                base.set_size(size);
            }
        }

        self.draw.begin_frame(self.size, self.pixel_ratio);
        self.draw.clear(self.background);

        self.dismiss_popups();
        self.place_popups();

        let root = self.tree.root();
        draw_subtree(&self.tree, self.draw.as_mut(), &self.theme, root);
        self.draw_tooltip(start);

        self.draw.end_frame();

        let dt = (self.clock.now() - start) as f32;
        if dt > 0.0 {
            self.fps += FPS_SMOOTHING * (1.0 / dt - self.fps);
        }
    }

    fn dismiss_popups(&mut self) {
        let stale: Vec<WidgetId> = popups(&self.tree)
            .into_iter()
            .filter(|&popup| should_dismiss(&self.tree, popup))
            .collect();
        if stale.is_empty() {
            return;
        }

        let mut faulted = false;
        for popup in stale {
            if let Some(base) = self.tree.base_mut(popup) {
                base.set_visible(false);
            }
            let button = self.tree.popup_state(popup).and_then(|state| state.button());
            tracing::debug!(target: targets::POPUP, ?popup, ?button, "popup dismissed");
            if let Some(button) = button {
                faulted |= Dispatcher::new(&mut self.tree, &self.theme, &mut self.commands)
                    .deliver(button, &WidgetEvent::PopupDismissed)
                    .is_err();
            }
        }
        if self.flush_commands() || faulted {
            tracing::debug!(target: targets::POPUP, "popup dismissal handlers reported faults");
        }
    }

    /// Anchors are all refreshed before any popup is placed, since placing a
    /// nested popup places its parent popup first.
    pub(crate) fn place_popups(&mut self) {
        let height = self.size.height;
        let all = popups(&self.tree);
        for &popup in &all {
            if let Some(anchor) = anchor_for_button(&self.tree, popup)
                && let Some(state) = self.tree.popup_state_mut(popup)
            {
                state.anchor_pos = anchor;
            }
        }
        for popup in all {
            refresh_relative_placement(&mut self.tree, popup, height);
        }
    }

    fn draw_tooltip(&mut self, now: f64) {
        let elapsed = now - self.last_interaction;
        if elapsed < self.tooltip_delay {
            return;
        }
        let Some(widget) = self.tree.find_widget(self.mouse_pos) else {
            return;
        };
        let Some(base) = self.tree.base(widget) else {
            return;
        };
        if base.tooltip().is_empty() {
            return;
        }
        let tooltip = base.tooltip();
        let origin = self.tree.absolute_position(widget);
        let x = (origin.x + base.width() / 2) as f32;
        let y = (origin.y + base.height() + 10) as f32;

        let draw = self.draw.as_mut();
        draw.save();
        draw.font_face("sans");
        draw.font_size(15.0);
        draw.text_align(TextAlign::LEFT_TOP);

        let (_, mut bounds) = draw.text_bounds(x, y, tooltip);
        let mut h = bounds.width() / 2.0;
        if h > TOOLTIP_WIDTH / 2.0 {
            draw.text_align(TextAlign::CENTER_TOP);
            bounds = draw.text_box_bounds(x, y, TOOLTIP_WIDTH, tooltip);
            h = bounds.width() / 2.0;
        }

        let alpha = ((2.0 * (elapsed - 0.5)).clamp(0.0, 1.0) * 0.8) as f32;
        draw.global_alpha(alpha);

        draw.begin_path();
        draw.fill_color(Color::BLACK);
        draw.rounded_rect(
            bounds.min_x - 4.0 - h,
            bounds.min_y - 4.0,
            bounds.width() + 8.0,
            bounds.height() + 8.0,
            3.0,
        );
        let px = (bounds.max_x + bounds.min_x) / 2.0 - h;
        draw.move_to(px, bounds.min_y - 10.0);
        draw.line_to(px + 7.0, bounds.min_y + 1.0);
        draw.line_to(px - 7.0, bounds.min_y + 1.0);
        draw.fill();

        draw.fill_color(Color::WHITE);
        draw.text_box(x - h, y, TOOLTIP_WIDTH, tooltip);
        draw.restore();
    }
}

/// Paint `id` and its visible descendants, in the coordinate space of
/// `id`'s parent.
fn draw_subtree(tree: &WidgetTree, draw: &mut dyn DrawContext, theme: &Theme, id: WidgetId) {
    let Some(node) = tree.node(id) else {
        return;
    };
    let base = &node.base;
    if !base.is_visible() {
        return;
    }

    draw.save();
    draw.translate(base.pos().x as f32, base.pos().y as f32);

    match &node.role {
        NodeRole::Widget => {
            draw.intersect_scissor(0.0, 0.0, base.width() as f32, base.height() as f32);
        }
        NodeRole::Window(state) => {
            draw_window(
                draw,
                theme,
                base.size(),
                state,
                base.is_focused(),
                base.has_mouse_focus(),
            );
        }
        NodeRole::Popup(state) => {
            let button = state.button().and_then(|button| {
                let button_base = tree.base(button)?;
                let offset = tree.absolute_position(button) - tree.absolute_position(id);
                Some(Rect::new(offset, button_base.size()))
            });
            draw_popup(draw, theme, base.size(), state.side, button);
        }
    }

    node.widget.paint(&mut PaintContext::new(draw, theme, base));

    for &child in base.children() {
        draw_subtree(tree, draw, theme, child);
    }
    draw.restore();
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use trellis_core::ManualClock;

    use super::*;
    use crate::geometry::Point;
    use crate::render::RecordingContext;
    use crate::widget::Panel;
    use crate::window::{PopupState, ScreenConfig, WindowState};

    fn screen() -> Screen {
        Screen::with_clock(
            ScreenConfig::new("test").with_size(400, 300),
            Box::new(RecordingContext::new()),
            Arc::new(ManualClock::new(0.0)),
        )
        .unwrap()
    }

    fn panel(screen: &mut Screen, parent: WidgetId, pos: Point, size: Size) -> WidgetId {
        let id = screen.tree_mut().add_child(parent, Panel).unwrap();
        let base = screen.tree_mut().base_mut(id).unwrap();
        base.set_pos(pos);
        base.set_size(size);
        id
    }

    fn button_popup(
        screen: &mut Screen,
        parent: WidgetId,
        button: WidgetId,
        size: Size,
    ) -> WidgetId {
        let root = screen.root();
        let mut state = PopupState::new(parent);
        state.button = Some(button);
        let id = screen
            .tree_mut()
            .insert(root, Box::new(Panel), NodeRole::Popup(state))
            .unwrap();
        screen.tree_mut().base_mut(id).unwrap().set_size(size);
        id
    }

    #[test]
    fn test_nested_popup_listed_first_follows_its_parent_in_one_frame() {
        let mut screen = screen();
        let window = screen.add_window(WindowState::default()).unwrap();
        {
            let base = screen.tree_mut().base_mut(window).unwrap();
            base.set_pos(Point::new(10, 10));
            base.set_size(Size::new(100, 100));
        }
        let outer_button = panel(&mut screen, window, Point::new(0, 40), Size::new(20, 20));
        let outer = button_popup(&mut screen, window, outer_button, Size::new(80, 60));
        let inner_button = panel(&mut screen, outer, Point::new(0, 10), Size::new(20, 20));
        let inner = button_popup(&mut screen, outer, inner_button, Size::new(80, 40));

        // The nested popup now comes first among the root's children.
        screen.tree_mut().raise(outer).unwrap();
        screen.place_popups();

        screen
            .tree_mut()
            .base_mut(outer_button)
            .unwrap()
            .set_pos(Point::new(0, 70));
        screen.place_popups();

        let outer_pos = screen.tree().base(outer).unwrap().pos();
        let inner_pos = screen.tree().base(inner).unwrap().pos();
        // window y 10 + button centre 80 - half the popup height 30
        assert_eq!(outer_pos.y, 60);
        // the inner button centre sits 20 below the outer popup's top,
        // which is half the inner popup's height
        assert_eq!(inner_pos.y, outer_pos.y);
    }
}
