//! Popup button widget implementation.
//!
//! A [`PopupButton`] is a toggle button that shows its popup while pushed.
//! The popup window itself is created by the screen:
//!
//! ```ignore
//! use trellis::widget::widgets::PopupButton;
//!
//! let button = screen.add_popup_owner(window, PopupButton::new("More"))?;
//! let popup = screen.tree().downcast_ref::<PopupButton>(button).and_then(|b| b.popup());
//! ```
//!
//! Clicking elsewhere moves focus away from the popup; the screen then hides
//! it at the next frame and sends the button `PopupDismissed`, which releases
//! it.

use trellis_core::{TreeResult, WidgetId};

use super::button::{Button, ButtonFlags};
use crate::geometry::{Color, Size};
use crate::theme::Theme;
use crate::widget::base::WidgetBase;
use crate::widget::events::{MouseButton, WidgetEvent};
use crate::widget::traits::{EventContext, EventResult, LayoutContext, PaintContext, Widget};
use crate::widget::tree::WidgetTree;
use crate::window::{PopupState, Side};

/// A widget that owns a popup window.
///
/// The screen creates the popup when the owner is added, hands its id to
/// [`attach_popup`](Self::attach_popup), lets the owner adjust the popup's
/// state and finally lets it fill the popup with children.
pub trait PopupOwner: Widget + Sized {
    /// Remember the popup created for this widget.
    fn attach_popup(&mut self, popup: WidgetId);

    /// Adjust the new popup's state (side, disposability).
    fn configure_popup(&self, _state: &mut PopupState) {}

    /// Add the popup's children. Also called when the owner asks for its
    /// popup to be rebuilt, after the old children were removed.
    fn populate_popup(_tree: &mut WidgetTree, _owner: WidgetId, _popup: WidgetId) -> TreeResult<()> {
        Ok(())
    }
}

/// A toggle button that shows and hides a popup.
pub struct PopupButton {
    button: Button,
    popup: Option<WidgetId>,
    side: Side,
}

impl PopupButton {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            button: Button::new(caption).with_flags(ButtonFlags::TOGGLE | ButtonFlags::POPUP),
            popup: None,
            side: Side::Right,
        }
    }

    /// Open the popup on the given side of the parent window.
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// The popup, once the button was added to a screen.
    pub fn popup(&self) -> Option<WidgetId> {
        self.popup
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// The underlying toggle button.
    pub fn button(&self) -> &Button {
        &self.button
    }

    pub fn button_mut(&mut self) -> &mut Button {
        &mut self.button
    }

    pub fn is_pushed(&self) -> bool {
        self.button.is_pushed()
    }

    fn paint_chevron(&self, ctx: &mut PaintContext<'_>, theme: &Theme) {
        let (w, h) = (ctx.width(), ctx.height());
        let color = if ctx.base().is_enabled() {
            theme.get_color_or("/text-color", Color::gray8(255, 160))
        } else {
            theme.get_color_or("/disabled-text-color", Color::gray8(255, 80))
        };
        let cy = h * 0.5 - 1.0;
        let draw = ctx.draw();
        draw.begin_path();
        match self.side {
            Side::Right => {
                let x = w - 14.0;
                draw.move_to(x, cy - 4.0);
                draw.line_to(x + 5.0, cy);
                draw.line_to(x, cy + 4.0);
            }
            Side::Left => {
                let x = 14.0;
                draw.move_to(x, cy - 4.0);
                draw.line_to(x - 5.0, cy);
                draw.line_to(x, cy + 4.0);
            }
        }
        draw.fill_color(color);
        draw.fill();
    }
}

impl Widget for PopupButton {
    fn preferred_size(&self, base: &WidgetBase, ctx: &mut LayoutContext<'_>) -> Size {
        let size = self.button.preferred_size(base, ctx);
        Size::new(size.width + 15, size.height)
    }

    fn event(&mut self, ctx: &mut EventContext<'_>, event: &WidgetEvent) -> EventResult {
        match event {
            WidgetEvent::PopupDismissed => {
                self.button.set_pushed(false);
                self.button.changed.emit(false);
                Ok(true)
            }
            WidgetEvent::MouseButton(e) if e.button == MouseButton::Left => {
                let was_pushed = self.button.is_pushed();
                let handled = self.button.event(ctx, event)?;
                let pushed = self.button.is_pushed();
                if pushed != was_pushed
                    && let Some(popup) = self.popup
                {
                    ctx.set_visible(popup, pushed);
                    if pushed {
                        ctx.request_focus_on(popup);
                    }
                }
                Ok(handled)
            }
            _ => self.button.event(ctx, event),
        }
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) {
        let theme = ctx.theme();
        self.button.paint(ctx);
        self.paint_chevron(ctx, theme);
    }
}

impl PopupOwner for PopupButton {
    fn attach_popup(&mut self, popup: WidgetId) {
        self.popup = Some(popup);
    }

    fn configure_popup(&self, state: &mut PopupState) {
        state.side = self.side;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::events::{Modifiers, MouseButtonEvent};
    use crate::widget::traits::Command;
    use crate::geometry::Point;
    use slotmap::KeyData;

    fn left(pressed: bool) -> WidgetEvent {
        WidgetEvent::MouseButton(MouseButtonEvent {
            local_pos: Point::new(2, 2),
            screen_pos: Point::new(2, 2),
            button: MouseButton::Left,
            pressed,
            modifiers: Modifiers::empty(),
        })
    }

    #[test]
    fn test_press_toggles_popup_and_focuses_it() {
        let popup = WidgetId::from(KeyData::from_ffi(7));
        let mut button = PopupButton::new("More");
        button.attach_popup(popup);

        let theme = Theme::default();
        let mut base = WidgetBase::new();
        base.set_size(Size::new(60, 30));
        let mut commands = Vec::new();
        let id = WidgetId::default();

        let mut ctx = EventContext::new(id, &mut base, &theme, &mut commands);
        assert!(button.event(&mut ctx, &left(true)).unwrap());
        assert!(button.event(&mut ctx, &left(false)).unwrap());
        assert!(button.is_pushed());

        assert!(matches!(commands[0], Command::SetVisible(p, true) if p == popup));
        assert!(matches!(commands[1], Command::RequestFocus(p) if p == popup));
        assert_eq!(commands.len(), 2);
    }

    #[test]
    fn test_dismiss_releases_button() {
        let mut button = PopupButton::new("More");
        button.button_mut().set_pushed(true);

        let theme = Theme::default();
        let mut base = WidgetBase::new();
        let mut commands = Vec::new();
        let mut ctx = EventContext::new(WidgetId::default(), &mut base, &theme, &mut commands);
        assert!(button.event(&mut ctx, &WidgetEvent::PopupDismissed).unwrap());
        assert!(!button.is_pushed());
    }

    #[test]
    fn test_configure_popup_uses_side() {
        let button = PopupButton::new("More").with_side(Side::Left);
        let mut state = PopupState::new(WidgetId::default());
        button.configure_popup(&mut state);
        assert_eq!(state.side, Side::Left);
    }
}
