//! Combo box widget implementation.
//!
//! A [`ComboBox`] is a popup button whose popup lists one button per item.
//! Clicking an item selects it, shows its short caption on the combo box and
//! closes the popup. Scrolling over the closed combo box steps through the
//! items.
//!
//! # Example
//!
//! ```ignore
//! use trellis::widget::widgets::ComboBox;
//!
//! let combo = screen.add_popup_owner(window, ComboBox::new(["Low", "Medium", "High"]))?;
//! if let Some(combo) = screen.tree().downcast_ref::<ComboBox>(combo) {
//!     combo.selected_changed.connect(|index| println!("quality {index}"));
//! }
//! ```
//!
//! Replacing the items with [`ComboBox::set_items`] only updates the model;
//! call [`Screen::rebuild_popup`](crate::Screen::rebuild_popup) afterwards to
//! recreate the item buttons.

use trellis_core::logging::targets;
use trellis_core::{Signal, TreeResult, WidgetError, WidgetId};

use super::button::{Button, ButtonClicked};
use super::popup_button::{PopupButton, PopupOwner};
use crate::geometry::Size;
use crate::widget::base::WidgetBase;
use crate::widget::events::WidgetEvent;
use crate::widget::layout::BoxLayout;
use crate::widget::traits::{EventContext, EventResult, LayoutContext, PaintContext, Widget};
use crate::widget::tree::WidgetTree;
use crate::window::{PopupState, Side};

/// A drop-down selector.
///
/// # Signals
///
/// - `selected_changed`: Emitted with the new index after a popup click or a
///   scroll step
pub struct ComboBox {
    button: PopupButton,
    items: Vec<String>,
    items_short: Vec<String>,
    selected: usize,

    /// Signal emitted when the user picks an item.
    pub selected_changed: Signal<usize>,
}

impl ComboBox {
    /// Create a combo box whose short captions equal the items.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        let mut combo = Self {
            button: PopupButton::new(""),
            items_short: items.clone(),
            items,
            selected: 0,
            selected_changed: Signal::new(),
        };
        combo.sync_caption();
        combo
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.button = self.button.with_side(side);
        self
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn items_short(&self) -> &[String] {
        &self.items_short
    }

    /// Replace the items. `items_short` supplies the captions shown on the
    /// closed combo box and must have one entry per item.
    ///
    /// The selection is reset to the first item.
    pub fn set_items(
        &mut self,
        items: Vec<String>,
        items_short: Vec<String>,
    ) -> Result<(), WidgetError> {
        if items.len() != items_short.len() {
            return Err(WidgetError::InvalidState(format!(
                "{} items but {} short captions",
                items.len(),
                items_short.len()
            )));
        }
        self.items = items;
        self.items_short = items_short;
        self.selected = 0;
        self.sync_caption();
        Ok(())
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Select an item without emitting `selected_changed`. Out-of-range
    /// indices are ignored.
    pub fn set_selected_index(&mut self, index: usize) {
        if index < self.items_short.len() {
            self.selected = index;
            self.sync_caption();
        }
    }

    /// The popup listing the items, once the combo box was added to a screen.
    pub fn popup(&self) -> Option<WidgetId> {
        self.button.popup()
    }

    pub fn is_pushed(&self) -> bool {
        self.button.is_pushed()
    }

    /// The caption currently shown.
    pub fn caption(&self) -> &str {
        self.button.button().caption()
    }

    fn sync_caption(&mut self) {
        let caption = self
            .items_short
            .get(self.selected)
            .cloned()
            .unwrap_or_default();
        self.button.button_mut().set_caption(caption);
    }

    fn pick(&mut self, ctx: &mut EventContext<'_>, index: usize) {
        if index >= self.items.len() {
            tracing::warn!(
                target: targets::INPUT,
                index,
                len = self.items.len(),
                "combo box item out of range"
            );
            return;
        }
        self.set_selected_index(index);
        self.button.button_mut().set_pushed(false);
        if let Some(popup) = self.button.popup() {
            ctx.set_visible(popup, false);
        }
        self.selected_changed.emit(index);
    }

    fn step(&mut self, up: bool) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let index = if up {
            self.selected.saturating_sub(1)
        } else {
            (self.selected + 1).min(self.items.len() - 1)
        };
        self.set_selected_index(index);
        self.selected_changed.emit(index);
        true
    }
}

impl Widget for ComboBox {
    fn preferred_size(&self, base: &WidgetBase, ctx: &mut LayoutContext<'_>) -> Size {
        self.button.preferred_size(base, ctx)
    }

    fn event(&mut self, ctx: &mut EventContext<'_>, event: &WidgetEvent) -> EventResult {
        match event {
            WidgetEvent::Message(message) => match message.downcast_ref::<ButtonClicked>() {
                Some(clicked) => {
                    self.pick(ctx, clicked.tag);
                    Ok(true)
                }
                None => Ok(false),
            },
            WidgetEvent::Scroll(e) if e.delta.y < 0.0 => Ok(self.step(false)),
            WidgetEvent::Scroll(e) if e.delta.y > 0.0 => Ok(self.step(true)),
            _ => self.button.event(ctx, event),
        }
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) {
        self.button.paint(ctx);
    }
}

impl PopupOwner for ComboBox {
    fn attach_popup(&mut self, popup: WidgetId) {
        self.button.attach_popup(popup);
    }

    fn configure_popup(&self, state: &mut PopupState) {
        self.button.configure_popup(state);
        state.disposable = true;
    }

    fn populate_popup(tree: &mut WidgetTree, owner: WidgetId, popup: WidgetId) -> TreeResult<()> {
        let items = tree
            .downcast_ref::<ComboBox>(owner)
            .map(|combo| combo.items.clone())
            .unwrap_or_default();

        tree.set_layout(popup, BoxLayout::vertical().with_margin(10).with_spacing(6))?;
        for (index, item) in items.into_iter().enumerate() {
            tree.add_child(popup, Button::new(item).with_click_message(owner, index))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::geometry::{Point, Vector2};
    use crate::theme::Theme;
    use crate::widget::events::{MessageEvent, ScrollEvent};
    use crate::widget::traits::Command;

    fn scroll(dy: f32) -> WidgetEvent {
        WidgetEvent::Scroll(ScrollEvent {
            local_pos: Point::ZERO,
            screen_pos: Point::ZERO,
            delta: Vector2::new(0.0, dy),
        })
    }

    fn send(combo: &mut ComboBox, event: &WidgetEvent) -> (bool, Vec<Command>) {
        let theme = Theme::default();
        let mut base = WidgetBase::new();
        let mut commands = Vec::new();
        let mut ctx = EventContext::new(WidgetId::default(), &mut base, &theme, &mut commands);
        let handled = combo.event(&mut ctx, event).unwrap();
        (handled, commands)
    }

    #[test]
    fn test_caption_follows_selection() {
        let mut combo = ComboBox::new(["Alpha", "Beta"]);
        assert_eq!(combo.caption(), "Alpha");
        combo.set_selected_index(1);
        assert_eq!(combo.caption(), "Beta");
        combo.set_selected_index(5);
        assert_eq!(combo.selected_index(), 1);
    }

    #[test]
    fn test_scroll_steps_and_clamps() {
        let mut combo = ComboBox::new(["a", "b", "c"]);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        combo.selected_changed.connect(move |index| sink.lock().push(*index));

        assert!(send(&mut combo, &scroll(-1.0)).0);
        assert!(send(&mut combo, &scroll(-1.0)).0);
        assert!(send(&mut combo, &scroll(-1.0)).0);
        assert_eq!(combo.selected_index(), 2);
        assert!(send(&mut combo, &scroll(1.0)).0);
        assert_eq!(combo.selected_index(), 1);
        assert_eq!(*seen.lock(), vec![1, 2, 2, 1]);
    }

    #[test]
    fn test_item_click_selects_and_closes() {
        let mut combo = ComboBox::new(["a", "b", "c"]);
        let popup = WidgetId::default();
        combo.attach_popup(popup);
        combo.button.button_mut().set_pushed(true);

        let message = WidgetEvent::Message(MessageEvent::new(popup, ButtonClicked { tag: 2 }));
        let (handled, commands) = send(&mut combo, &message);
        assert!(handled);
        assert_eq!(combo.selected_index(), 2);
        assert_eq!(combo.caption(), "c");
        assert!(!combo.is_pushed());
        assert!(matches!(commands[..], [Command::SetVisible(p, false)] if p == popup));
    }

    #[test]
    fn test_set_items_requires_matching_short_captions() {
        let mut combo = ComboBox::new(["a"]);
        let result = combo.set_items(vec!["x".into(), "y".into()], vec!["x".into()]);
        assert!(result.is_err());
        combo
            .set_items(vec!["Long x".into(), "Long y".into()], vec!["x".into(), "y".into()])
            .unwrap();
        assert_eq!(combo.caption(), "x");
    }

    #[test]
    fn test_configure_popup_is_disposable() {
        let combo = ComboBox::new(["a"]);
        let mut state = PopupState::new(WidgetId::default());
        combo.configure_popup(&mut state);
        assert!(state.disposable);
    }
}
