//! Push button widget implementation.
//!
//! This module provides [`Button`], a clickable button that either springs
//! back after a click or toggles between pushed and released.
//!
//! # Example
//!
//! ```ignore
//! use trellis::widget::widgets::{Button, ButtonFlags};
//!
//! let button = Button::new("Apply");
//! button.clicked.connect(|_| println!("applied"));
//!
//! let toggle = Button::new("Bold").with_flags(ButtonFlags::TOGGLE);
//! toggle.changed.connect(|pushed| println!("bold: {pushed}"));
//! ```

use bitflags::bitflags;
use trellis_core::{Signal, WidgetId};

use crate::geometry::{Color, Size};
use crate::render::{Paint, TextAlign};
use crate::theme::Theme;
use crate::widget::base::WidgetBase;
use crate::widget::events::{MouseButton, WidgetEvent};
use crate::widget::traits::{EventContext, EventResult, LayoutContext, PaintContext, Widget};

bitflags! {
    /// How a button reacts to clicks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ButtonFlags: u32 {
        /// Pushed while held, released on mouse up.
        const NORMAL = 1;
        /// Each press flips the pushed state.
        const TOGGLE = 1 << 2;
        /// The button shows a popup while pushed.
        const POPUP = 1 << 3;
    }
}

impl Default for ButtonFlags {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Message a button sends to its click target when clicked.
///
/// The tag is whatever was passed to [`Button::with_click_message`]; item
/// lists use the item index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonClicked {
    pub tag: usize,
}

/// A clickable button with a text caption.
///
/// # Signals
///
/// - `clicked`: Emitted when a press is released over the button
/// - `changed`: Emitted with the new pushed state whenever it changes
pub struct Button {
    caption: String,
    flags: ButtonFlags,
    pushed: bool,
    font_size: Option<i32>,
    text_color: Option<Color>,
    click_message: Option<(WidgetId, usize)>,

    /// Signal emitted on click.
    pub clicked: Signal<()>,
    /// Signal emitted when the pushed state changes.
    pub changed: Signal<bool>,
}

impl Button {
    /// Create a normal push button.
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            flags: ButtonFlags::NORMAL,
            pushed: false,
            font_size: None,
            text_color: None,
            click_message: None,
            clicked: Signal::new(),
            changed: Signal::new(),
        }
    }

    pub fn with_flags(mut self, flags: ButtonFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Use a specific font size instead of the theme's button text size.
    pub fn with_font_size(mut self, size: i32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = Some(color);
        self
    }

    /// Send [`ButtonClicked`] with `tag` to `target` on every click.
    pub fn with_click_message(mut self, target: WidgetId, tag: usize) -> Self {
        self.click_message = Some((target, tag));
        self
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    pub fn flags(&self) -> ButtonFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: ButtonFlags) {
        self.flags = flags;
    }

    pub fn is_pushed(&self) -> bool {
        self.pushed
    }

    /// Set the pushed state without emitting `changed`.
    pub fn set_pushed(&mut self, pushed: bool) {
        self.pushed = pushed;
    }

    /// The font size in effect under `theme`.
    pub fn font_size(&self, theme: &Theme) -> i32 {
        self.font_size
            .unwrap_or_else(|| theme.get_int_or("/button/text-size", 20))
    }

    fn click(&mut self, ctx: &mut EventContext<'_>) {
        self.clicked.emit(());
        if let Some((target, tag)) = self.click_message {
            ctx.notify(target, ButtonClicked { tag });
        }
    }
}

impl Widget for Button {
    fn preferred_size(&self, _base: &WidgetBase, ctx: &mut LayoutContext<'_>) -> Size {
        let theme = ctx.theme();
        let font_size = self.font_size(theme);
        let face = theme.get_str_or("/font/bold", "sans-bold");
        let draw = ctx.draw();
        draw.font_size(font_size as f32);
        draw.font_face(face);
        let (advance, _) = draw.text_bounds(0.0, 0.0, &self.caption);
        Size::new(advance as i32 + 20, font_size + 10)
    }

    fn event(&mut self, ctx: &mut EventContext<'_>, event: &WidgetEvent) -> EventResult {
        let WidgetEvent::MouseButton(e) = event else {
            return Ok(false);
        };
        if e.button != MouseButton::Left || !ctx.base().is_enabled() {
            return Ok(false);
        }

        let was_pushed = self.pushed;
        if e.pressed {
            if self.flags.contains(ButtonFlags::TOGGLE) {
                self.pushed = !self.pushed;
            } else {
                self.pushed = true;
            }
        } else if self.pushed {
            if ctx.base().local_rect().contains(e.local_pos) {
                self.click(ctx);
            }
            if self.flags.contains(ButtonFlags::NORMAL) {
                self.pushed = false;
            }
        }

        if was_pushed != self.pushed {
            self.changed.emit(self.pushed);
        }
        Ok(true)
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) {
        let theme = ctx.theme();
        let base = ctx.base();
        let (w, h) = (ctx.width(), ctx.height());
        let radius = theme.get_float_or("/button/corner-radius", 2.0);

        let (top, bot) = if self.pushed {
            (
                theme.get_color_or("/button/pushed/grad-top", Color::gray8(41, 255)),
                theme.get_color_or("/button/pushed/grad-bot", Color::gray8(29, 255)),
            )
        } else if base.has_mouse_focus() && base.is_enabled() {
            (
                theme.get_color_or("/button/focused/grad-top", Color::gray8(64, 255)),
                theme.get_color_or("/button/focused/grad-bot", Color::gray8(48, 255)),
            )
        } else {
            (
                theme.get_color_or("/button/unfocused/grad-top", Color::gray8(74, 255)),
                theme.get_color_or("/button/unfocused/grad-bot", Color::gray8(58, 255)),
            )
        };

        let draw = ctx.draw();
        draw.begin_path();
        draw.rounded_rect(1.0, 1.0, w - 2.0, h - 2.0, (radius - 1.0).max(0.0));
        draw.fill_paint(Paint::Linear {
            start: (0.0, 0.0),
            end: (0.0, h),
            inner: top,
            outer: bot,
        });
        draw.fill();

        let inset = if self.pushed { 0.5 } else { 1.5 };
        draw.begin_path();
        draw.stroke_width(1.0);
        draw.rounded_rect(
            0.5,
            inset,
            w - 1.0,
            h - 1.0 - if self.pushed { 0.0 } else { 1.0 },
            radius,
        );
        draw.stroke_color(theme.get_color_or("/border/light", Color::gray8(92, 255)));
        draw.stroke();

        draw.begin_path();
        draw.rounded_rect(0.5, 0.5, w - 1.0, h - 2.0, radius);
        draw.stroke_color(theme.get_color_or("/border/dark", Color::gray8(29, 255)));
        draw.stroke();

        let font_size = self.font_size(theme) as f32;
        draw.font_size(font_size);
        draw.font_face(theme.get_str_or("/font/bold", "sans-bold"));
        let (advance, _) = draw.text_bounds(0.0, 0.0, &self.caption);
        let text_x = w * 0.5 - advance * 0.5;
        let text_y = h * 0.5 - 1.0;

        let color = if !base.is_enabled() {
            theme.get_color_or("/disabled-text-color", Color::gray8(255, 80))
        } else {
            self.text_color
                .unwrap_or_else(|| theme.get_color_or("/text-color", Color::gray8(255, 160)))
        };

        draw.text_align(TextAlign::LEFT_MIDDLE);
        draw.fill_color(theme.get_color_or("/text-shadow", Color::gray8(0, 160)));
        draw.text(text_x, text_y, &self.caption);
        draw.fill_color(color);
        draw.text(text_x, text_y + 1.0, &self.caption);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;
    use crate::geometry::Point;
    use crate::render::RecordingContext;
    use crate::widget::events::{Modifiers, MouseButtonEvent};
    use crate::widget::traits::Command;

    fn press(pressed: bool, local_pos: Point) -> WidgetEvent {
        WidgetEvent::MouseButton(MouseButtonEvent {
            local_pos,
            screen_pos: local_pos,
            button: MouseButton::Left,
            pressed,
            modifiers: Modifiers::empty(),
        })
    }

    fn sized_base() -> WidgetBase {
        let mut base = WidgetBase::new();
        base.set_size(Size::new(80, 30));
        base
    }

    fn send(
        button: &mut Button,
        base: &mut WidgetBase,
        commands: &mut Vec<Command>,
        event: &WidgetEvent,
    ) -> bool {
        let theme = Theme::default();
        let id = WidgetId::default();
        let mut ctx = EventContext::new(id, base, &theme, commands);
        button.event(&mut ctx, event).unwrap()
    }

    #[test]
    fn test_click_fires_on_release_inside() {
        let mut button = Button::new("OK");
        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = clicks.clone();
        button.clicked.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut base = sized_base();
        let mut commands = Vec::new();
        assert!(send(&mut button, &mut base, &mut commands, &press(true, Point::new(5, 5))));
        assert!(button.is_pushed());
        assert!(send(&mut button, &mut base, &mut commands, &press(false, Point::new(5, 5))));
        assert!(!button.is_pushed());
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_release_outside_does_not_click() {
        let mut button = Button::new("OK");
        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = clicks.clone();
        button.clicked.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut base = sized_base();
        let mut commands = Vec::new();
        send(&mut button, &mut base, &mut commands, &press(true, Point::new(5, 5)));
        send(&mut button, &mut base, &mut commands, &press(false, Point::new(200, 5)));
        assert_eq!(clicks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_toggle_flips_on_press() {
        let mut button = Button::new("Bold").with_flags(ButtonFlags::TOGGLE);
        let states = Arc::new(Mutex::new(Vec::new()));
        let sink = states.clone();
        button.changed.connect(move |pushed| sink.lock().push(*pushed));

        let mut base = sized_base();
        let mut commands = Vec::new();
        send(&mut button, &mut base, &mut commands, &press(true, Point::new(5, 5)));
        send(&mut button, &mut base, &mut commands, &press(false, Point::new(5, 5)));
        assert!(button.is_pushed());
        send(&mut button, &mut base, &mut commands, &press(true, Point::new(5, 5)));
        assert!(!button.is_pushed());
        assert_eq!(*states.lock(), vec![true, false]);
    }

    #[test]
    fn test_click_message_is_queued() {
        let target = WidgetId::default();
        let mut button = Button::new("Item").with_click_message(target, 4);
        let mut base = sized_base();
        let mut commands = Vec::new();
        send(&mut button, &mut base, &mut commands, &press(true, Point::new(1, 1)));
        send(&mut button, &mut base, &mut commands, &press(false, Point::new(1, 1)));

        assert_eq!(commands.len(), 1);
        match &commands[0] {
            Command::Notify(to, message) => {
                assert_eq!(*to, target);
                assert_eq!(
                    message.downcast_ref::<ButtonClicked>(),
                    Some(&ButtonClicked { tag: 4 })
                );
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_preferred_size_tracks_caption() {
        let button = Button::new("abcd");
        let mut draw = RecordingContext::new();
        let theme = Theme::default();
        let mut ctx = LayoutContext::new(&mut draw, &theme);
        // 4 glyphs at half of 20px each
        assert_eq!(button.preferred_size(&WidgetBase::new(), &mut ctx), Size::new(60, 30));
    }
}
