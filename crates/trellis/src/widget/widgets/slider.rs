//! Slider widget implementation.
//!
//! A [`Slider`] picks a value from a range by dragging a round knob along a
//! track. The knob follows the pointer with some easing: each drag event
//! moves it half way towards the pointer, or a twentieth of the way while
//! Shift is held for fine adjustment. A double click resets the value to its
//! default.
//!
//! # Example
//!
//! ```ignore
//! use trellis::widget::widgets::Slider;
//!
//! let volume = Slider::new()
//!     .with_range(0.0, 100.0)
//!     .with_default_value(50.0)
//!     .with_value(50.0);
//! volume.changed.connect(|value| println!("volume: {value}"));
//! ```

use trellis_core::Signal;

use crate::geometry::{Color, Size};
use crate::render::{Paint, Winding};
use crate::widget::base::WidgetBase;
use crate::widget::events::{Modifiers, MouseDragEvent, WidgetEvent};
use crate::widget::traits::{EventContext, EventResult, LayoutContext, PaintContext, Widget};

/// Shadow width around the knob.
const KNOB_SHADOW: f32 = 3.0;

/// Fraction of the remaining distance covered per drag event.
const DRAG_SPEED: f32 = 0.5;

/// Drag speed while Shift is held.
const FINE_DRAG_SPEED: f32 = 0.05;

/// A horizontal value slider.
///
/// # Signals
///
/// - `changed`: Emitted with the new value on every drag step and reset
pub struct Slider {
    value: f32,
    range: (f32, f32),
    default_value: f32,
    highlighted_range: (f32, f32),
    highlight_color: Color,

    /// Signal emitted when the value changes.
    pub changed: Signal<f32>,
}

impl Default for Slider {
    fn default() -> Self {
        Self::new()
    }
}

impl Slider {
    /// A slider over `0.0..=1.0` starting at zero.
    pub fn new() -> Self {
        Self {
            value: 0.0,
            range: (0.0, 1.0),
            default_value: 0.0,
            highlighted_range: (0.0, 0.0),
            highlight_color: Color::from_rgba8(255, 80, 80, 70),
            changed: Signal::new(),
        }
    }

    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.set_range(min, max);
        self
    }

    pub fn with_value(mut self, value: f32) -> Self {
        self.set_value(value);
        self
    }

    /// The value restored by a double click.
    pub fn with_default_value(mut self, value: f32) -> Self {
        self.default_value = value;
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Set the value, clamped to the range, without emitting `changed`.
    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(self.range.0, self.range.1);
    }

    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    /// Set the range. The bounds are swapped if given in reverse order and
    /// the current value is clamped into the new range.
    pub fn set_range(&mut self, min: f32, max: f32) {
        self.range = if min <= max { (min, max) } else { (max, min) };
        self.set_value(self.value);
    }

    pub fn default_value(&self) -> f32 {
        self.default_value
    }

    /// Part of the track drawn in the highlight colour, as fractions of the
    /// slider's width.
    pub fn highlighted_range(&self) -> (f32, f32) {
        self.highlighted_range
    }

    pub fn set_highlighted_range(&mut self, start: f32, end: f32) {
        self.highlighted_range = (start, end);
    }

    pub fn highlight_color(&self) -> Color {
        self.highlight_color
    }

    pub fn set_highlight_color(&mut self, color: Color) {
        self.highlight_color = color;
    }

    fn knob_radius(height: i32) -> f32 {
        (height as f32 * 0.4).trunc()
    }

    fn drag(&mut self, base: &WidgetBase, e: &MouseDragEvent) {
        let kr = Self::knob_radius(base.height());
        let start_x = kr + KNOB_SHADOW + base.pos().x as f32 - 1.0;
        let width_x = base.width() as f32 - 2.0 * (kr + KNOB_SHADOW);
        if width_x <= 0.0 {
            return;
        }

        let (lo, hi) = self.range;
        let target = (e.pos.x as f32 - start_x) / width_x * (hi - lo) + lo;
        let speed = if e.modifiers.contains(Modifiers::SHIFT) {
            FINE_DRAG_SPEED
        } else {
            DRAG_SPEED
        };
        self.set_value(self.value + speed * (target - self.value));
        self.changed.emit(self.value);
    }
}

impl Widget for Slider {
    fn init_base(&self, base: &mut WidgetBase) {
        base.set_draggable(true);
    }

    fn preferred_size(&self, _base: &WidgetBase, _ctx: &mut LayoutContext<'_>) -> Size {
        Size::new(70, 16)
    }

    fn event(&mut self, ctx: &mut EventContext<'_>, event: &WidgetEvent) -> EventResult {
        if !ctx.base().is_enabled() {
            return Ok(false);
        }
        match event {
            WidgetEvent::MouseButton(e) => {
                if e.pressed && e.is_double_click() {
                    self.set_value(self.default_value);
                    self.changed.emit(self.value);
                }
                Ok(true)
            }
            WidgetEvent::MouseDrag(e) => {
                self.drag(ctx.base(), e);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) {
        let theme = ctx.theme();
        let enabled = ctx.base().is_enabled();
        let (w, h) = (ctx.width(), ctx.height());
        let cy = h * 0.5;
        let kr = Self::knob_radius(ctx.base().height());
        let start_x = kr + KNOB_SHADOW;
        let width_x = w - 2.0 * (kr + KNOB_SHADOW);

        let (lo, hi) = self.range;
        let fraction = if hi > lo {
            (self.value - lo) / (hi - lo)
        } else {
            0.0
        };
        let knob_x = start_x + fraction * width_x;
        let knob_y = cy + 0.5;

        let border_light = theme.get_color_or("/border/light", Color::gray8(92, 255));
        let border_medium = theme.get_color_or("/border/medium", Color::gray8(35, 255));
        let border_dark = theme.get_color_or("/border/dark", Color::gray8(29, 255));
        let transparent = theme.get_color_or("/transparent", Color::TRANSPARENT);

        let draw = ctx.draw();

        draw.begin_path();
        draw.rounded_rect(start_x, cy - 3.0 + 1.0, width_x, 6.0, 2.0);
        draw.fill_paint(Paint::Box {
            x: start_x,
            y: cy - 3.0 + 1.0,
            width: width_x,
            height: 6.0,
            radius: 3.0,
            feather: 3.0,
            inner: Color::gray8(0, if enabled { 32 } else { 10 }),
            outer: Color::gray8(0, if enabled { 128 } else { 210 }),
        });
        draw.fill();

        let (hl_start, hl_end) = self.highlighted_range;
        if hl_start != hl_end {
            draw.begin_path();
            draw.rounded_rect(
                start_x + hl_start * w,
                cy - KNOB_SHADOW + 1.0,
                width_x * (hl_end - hl_start),
                KNOB_SHADOW * 2.0,
                2.0,
            );
            draw.fill_color(self.highlight_color);
            draw.fill();
        }

        draw.begin_path();
        draw.rect(
            knob_x - kr - 5.0,
            knob_y - kr - 5.0,
            kr * 2.0 + 10.0,
            kr * 2.0 + 10.0 + KNOB_SHADOW,
        );
        draw.circle(knob_x, knob_y, kr);
        draw.path_winding(Winding::Hole);
        draw.fill_paint(Paint::Radial {
            center: (knob_x, knob_y),
            inner_radius: kr - KNOB_SHADOW,
            outer_radius: kr + KNOB_SHADOW,
            inner: Color::gray8(0, 64),
            outer: transparent,
        });
        draw.fill();

        draw.begin_path();
        draw.circle(knob_x, knob_y, kr);
        draw.stroke_color(border_dark);
        draw.fill_paint(Paint::Linear {
            start: (0.0, cy - kr),
            end: (0.0, cy + kr),
            inner: border_light,
            outer: border_medium,
        });
        draw.stroke();
        draw.fill();

        draw.begin_path();
        draw.circle(knob_x, knob_y, kr / 2.0);
        draw.fill_color(Color::gray8(150, if enabled { 255 } else { 100 }));
        draw.stroke_paint(Paint::Linear {
            start: (0.0, cy - kr),
            end: (0.0, cy + kr),
            inner: border_medium,
            outer: border_light,
        });
        draw.stroke();
        draw.fill();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use trellis_core::WidgetId;

    use super::*;
    use crate::geometry::Point;
    use crate::theme::Theme;
    use crate::widget::events::{MouseButton, MouseButtonEvent, MouseButtons};

    fn slider_base() -> WidgetBase {
        let mut base = WidgetBase::new();
        base.set_pos(Point::new(10, 0));
        // knob radius 8, track from x=20 (10 + 8 + 3 - 1) spanning 78px
        base.set_size(Size::new(100, 20));
        base
    }

    fn drag_to(x: i32, modifiers: Modifiers) -> WidgetEvent {
        WidgetEvent::MouseDrag(MouseDragEvent {
            pos: Point::new(x, 10),
            local_pos: Point::new(x - 10, 10),
            delta: Point::ZERO,
            buttons: MouseButtons::LEFT,
            modifiers,
        })
    }

    fn send(slider: &mut Slider, base: &mut WidgetBase, event: &WidgetEvent) -> bool {
        let theme = Theme::default();
        let mut commands = Vec::new();
        let mut ctx = EventContext::new(WidgetId::default(), base, &theme, &mut commands);
        slider.event(&mut ctx, event).unwrap()
    }

    #[test]
    fn test_is_draggable() {
        let mut base = WidgetBase::new();
        Slider::new().init_base(&mut base);
        assert!(base.is_draggable());
    }

    #[test]
    fn test_drag_eases_towards_pointer() {
        let mut slider = Slider::new();
        let mut base = slider_base();
        // pointer at the far end of the track maps to 1.0
        assert!(send(&mut slider, &mut base, &drag_to(98, Modifiers::empty())));
        assert!((slider.value() - 0.5).abs() < 1e-5);
        send(&mut slider, &mut base, &drag_to(98, Modifiers::empty()));
        assert!((slider.value() - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_shift_drag_is_fine() {
        let mut slider = Slider::new();
        let mut base = slider_base();
        send(&mut slider, &mut base, &drag_to(98, Modifiers::SHIFT));
        assert!((slider.value() - 0.05).abs() < 1e-5);
    }

    #[test]
    fn test_value_is_clamped() {
        let mut slider = Slider::new().with_value(0.9);
        let mut base = slider_base();
        for _ in 0..20 {
            send(&mut slider, &mut base, &drag_to(500, Modifiers::empty()));
        }
        assert_eq!(slider.value(), 1.0);
    }

    #[test]
    fn test_double_click_restores_default() {
        let mut slider = Slider::new().with_default_value(0.25).with_value(0.8);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        slider.changed.connect(move |value| sink.lock().push(*value));

        let mut base = slider_base();
        let click = WidgetEvent::MouseButton(MouseButtonEvent {
            local_pos: Point::new(5, 5),
            screen_pos: Point::new(15, 5),
            button: MouseButton::Left,
            pressed: true,
            modifiers: Modifiers::DOUBLE_CLICK,
        });
        assert!(send(&mut slider, &mut base, &click));
        assert_eq!(slider.value(), 0.25);
        assert_eq!(*seen.lock(), vec![0.25]);
    }

    #[test]
    fn test_disabled_ignores_drag() {
        let mut slider = Slider::new();
        let mut base = slider_base();
        base.set_enabled(false);
        assert!(!send(&mut slider, &mut base, &drag_to(98, Modifiers::empty())));
        assert_eq!(slider.value(), 0.0);
    }
}
