//! Label widget implementation.
//!
//! A [`Label`] displays a single caption. With a fixed width the caption wraps
//! inside that width; otherwise it is drawn on one line, vertically centred.
//!
//! # Example
//!
//! ```ignore
//! use trellis::widget::widgets::Label;
//! use trellis::render::HAlign;
//!
//! let title = Label::new("Settings").with_font("sans-bold").with_font_size(20);
//! let note = Label::new("Changes apply on restart").with_alignment(HAlign::Right);
//! ```

use crate::geometry::{Color, Size};
use crate::render::{HAlign, TextAlign, VAlign};
use crate::theme::Theme;
use crate::widget::base::WidgetBase;
use crate::widget::traits::{LayoutContext, PaintContext, Widget};

/// A static text caption.
#[derive(Debug, Clone)]
pub struct Label {
    caption: String,
    font: String,
    font_size: Option<i32>,
    color: Option<Color>,
    alignment: HAlign,
}

impl Label {
    /// Create a label drawn with the normal font and the theme's text size.
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            font: "sans".to_owned(),
            font_size: None,
            color: None,
            alignment: HAlign::Left,
        }
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    pub fn with_font_size(mut self, size: i32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_alignment(mut self, alignment: HAlign) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn set_font(&mut self, font: impl Into<String>) {
        self.font = font.into();
    }

    pub fn alignment(&self) -> HAlign {
        self.alignment
    }

    pub fn set_alignment(&mut self, alignment: HAlign) {
        self.alignment = alignment;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = Some(color);
    }

    /// The font size in effect under `theme`.
    pub fn font_size(&self, theme: &Theme) -> i32 {
        self.font_size
            .unwrap_or_else(|| theme.get_int_or("/text-size", 16))
    }

    fn text_color(&self, theme: &Theme) -> Color {
        self.color
            .unwrap_or_else(|| theme.get_color_or("/text-color", Color::gray8(255, 160)))
    }
}

impl Widget for Label {
    fn preferred_size(&self, base: &WidgetBase, ctx: &mut LayoutContext<'_>) -> Size {
        if self.caption.is_empty() {
            return Size::ZERO;
        }
        let font_size = self.font_size(ctx.theme());
        let draw = ctx.draw();
        draw.font_face(&self.font);
        draw.font_size(font_size as f32);

        let fixed_width = base.fixed_size().width;
        if fixed_width > 0 {
            draw.text_align(TextAlign::new(self.alignment, VAlign::Top));
            let bounds = draw.text_box_bounds(0.0, 0.0, fixed_width as f32, &self.caption);
            Size::new(fixed_width, bounds.height() as i32)
        } else {
            draw.text_align(TextAlign::new(self.alignment, VAlign::Middle));
            let (advance, _) = draw.text_bounds(0.0, 0.0, &self.caption);
            Size::new(advance as i32 + 2, font_size)
        }
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) {
        let theme = ctx.theme();
        let base = ctx.base();
        let font_size = self.font_size(theme) as f32;
        let color = self.text_color(theme);
        let (w, h) = (ctx.width(), ctx.height());

        let draw = ctx.draw();
        draw.font_face(&self.font);
        draw.font_size(font_size);
        draw.fill_color(color);

        let fixed_width = base.fixed_size().width;
        if fixed_width > 0 {
            let x = match self.alignment {
                HAlign::Left => 0.0,
                HAlign::Center => w * 0.5,
                HAlign::Right => w,
            };
            draw.text_align(TextAlign::new(self.alignment, VAlign::Top));
            draw.text_box(x, 0.0, fixed_width as f32, &self.caption);
        } else {
            draw.text_align(TextAlign::LEFT_MIDDLE);
            draw.text(0.0, h * 0.5, &self.caption);
        }
    }
}
