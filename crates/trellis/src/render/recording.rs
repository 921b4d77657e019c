use std::sync::Arc;

use parking_lot::Mutex;

use super::{DrawContext, Paint, TextAlign, TextBounds, VAlign, Winding};
use crate::geometry::{Color, Size};

/// Average glyph advance as a fraction of the font size.
const GLYPH_ADVANCE: f32 = 0.5;

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginFrame { size: Size, pixel_ratio: f32 },
    EndFrame,
    Clear(Color),
    Save,
    Restore,
    Translate(f32, f32),
    ResetScissor,
    Scissor { x: f32, y: f32, width: f32, height: f32 },
    GlobalAlpha(f32),
    BeginPath,
    Rect { x: f32, y: f32, width: f32, height: f32 },
    RoundedRect { x: f32, y: f32, width: f32, height: f32, radius: f32 },
    Circle { cx: f32, cy: f32, radius: f32 },
    MoveTo(f32, f32),
    LineTo(f32, f32),
    Winding(Winding),
    FillColor(Color),
    FillPaint(Paint),
    Fill,
    StrokeColor(Color),
    StrokePaint(Paint),
    StrokeWidth(f32),
    Stroke,
    FontFace(String),
    FontSize(f32),
    TextAlign(TextAlign),
    Text { x: f32, y: f32, text: String },
    TextBox { x: f32, y: f32, break_width: f32, text: String },
}

/// A [`DrawContext`] that records calls instead of rasterizing them.
///
/// Text is measured with a fixed advance of half the font size per
/// character, which keeps layouts deterministic. The command log is shared:
/// keep a [`RecordingContext::commands`] handle before handing the context to
/// a screen to inspect what a frame drew.
#[derive(Debug, Clone)]
pub struct RecordingContext {
    commands: Arc<Mutex<Vec<DrawCommand>>>,
    font_size: f32,
    align: TextAlign,
    ready: bool,
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingContext {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self {
            commands: Arc::new(Mutex::new(Vec::new())),
            font_size: 16.0,
            align: TextAlign::default(),
            ready: true,
        }
    }

    /// A recorder that reports itself as not ready, as a backend whose
    /// context creation failed would.
    pub fn unavailable() -> Self {
        Self {
            ready: false,
            ..Self::new()
        }
    }

    /// Shared handle to the command log.
    pub fn commands(&self) -> Arc<Mutex<Vec<DrawCommand>>> {
        self.commands.clone()
    }

    /// Strings drawn with `text` or `text_box`, in order.
    pub fn texts(&self) -> Vec<String> {
        self.commands
            .lock()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } | DrawCommand::TextBox { text, .. } => {
                    Some(text.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// Drop everything recorded so far.
    pub fn clear_commands(&self) {
        self.commands.lock().clear();
    }

    fn push(&self, command: DrawCommand) {
        self.commands.lock().push(command);
    }

    fn advance(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.font_size * GLYPH_ADVANCE
    }

    fn line_top(&self, y: f32) -> f32 {
        match self.align.vertical {
            VAlign::Top => y,
            VAlign::Middle => y - self.font_size * 0.5,
            VAlign::Bottom | VAlign::Baseline => y - self.font_size,
        }
    }
}

impl DrawContext for RecordingContext {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn begin_frame(&mut self, size: Size, pixel_ratio: f32) {
        self.push(DrawCommand::BeginFrame { size, pixel_ratio });
    }

    fn end_frame(&mut self) {
        self.push(DrawCommand::EndFrame);
    }

    fn clear(&mut self, color: Color) {
        self.push(DrawCommand::Clear(color));
    }

    fn save(&mut self) {
        self.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.push(DrawCommand::Translate(x, y));
    }

    fn reset_scissor(&mut self) {
        self.push(DrawCommand::ResetScissor);
    }

    fn intersect_scissor(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.push(DrawCommand::Scissor {
            x,
            y,
            width,
            height,
        });
    }

    fn global_alpha(&mut self, alpha: f32) {
        self.push(DrawCommand::GlobalAlpha(alpha));
    }

    fn begin_path(&mut self) {
        self.push(DrawCommand::BeginPath);
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
        });
    }

    fn rounded_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32) {
        self.push(DrawCommand::RoundedRect {
            x,
            y,
            width,
            height,
            radius,
        });
    }

    fn circle(&mut self, cx: f32, cy: f32, radius: f32) {
        self.push(DrawCommand::Circle { cx, cy, radius });
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.push(DrawCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(DrawCommand::LineTo(x, y));
    }

    fn path_winding(&mut self, winding: Winding) {
        self.push(DrawCommand::Winding(winding));
    }

    fn fill_color(&mut self, color: Color) {
        self.push(DrawCommand::FillColor(color));
    }

    fn fill_paint(&mut self, paint: Paint) {
        self.push(DrawCommand::FillPaint(paint));
    }

    fn fill(&mut self) {
        self.push(DrawCommand::Fill);
    }

    fn stroke_color(&mut self, color: Color) {
        self.push(DrawCommand::StrokeColor(color));
    }

    fn stroke_paint(&mut self, paint: Paint) {
        self.push(DrawCommand::StrokePaint(paint));
    }

    fn stroke_width(&mut self, width: f32) {
        self.push(DrawCommand::StrokeWidth(width));
    }

    fn stroke(&mut self) {
        self.push(DrawCommand::Stroke);
    }

    fn font_face(&mut self, face: &str) {
        self.push(DrawCommand::FontFace(face.to_owned()));
    }

    fn font_size(&mut self, size: f32) {
        self.font_size = size;
        self.push(DrawCommand::FontSize(size));
    }

    fn text_align(&mut self, align: TextAlign) {
        self.align = align;
        self.push(DrawCommand::TextAlign(align));
    }

    fn text(&mut self, x: f32, y: f32, text: &str) -> f32 {
        self.push(DrawCommand::Text {
            x,
            y,
            text: text.to_owned(),
        });
        x + self.advance(text)
    }

    fn text_box(&mut self, x: f32, y: f32, break_width: f32, text: &str) {
        self.push(DrawCommand::TextBox {
            x,
            y,
            break_width,
            text: text.to_owned(),
        });
    }

    fn text_bounds(&mut self, x: f32, y: f32, text: &str) -> (f32, TextBounds) {
        let advance = self.advance(text);
        let top = self.line_top(y);
        let bounds = TextBounds {
            min_x: x,
            min_y: top,
            max_x: x + advance,
            max_y: top + self.font_size,
        };
        (advance, bounds)
    }

    fn text_box_bounds(&mut self, x: f32, y: f32, break_width: f32, text: &str) -> TextBounds {
        let advance = self.advance(text);
        let lines = if break_width > 0.0 {
            (advance / break_width).ceil().max(1.0)
        } else {
            1.0
        };
        let top = self.line_top(y);
        TextBounds {
            min_x: x,
            min_y: top,
            max_x: x + advance.min(break_width.max(0.0)),
            max_y: top + lines * self.font_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_measurement_is_deterministic() {
        let mut ctx = RecordingContext::new();
        ctx.font_size(20.0);
        ctx.text_align(TextAlign::LEFT_TOP);
        let (advance, bounds) = ctx.text_bounds(0.0, 0.0, "abcd");
        assert_eq!(advance, 40.0);
        assert_eq!(bounds.height(), 20.0);
    }

    #[test]
    fn test_text_box_wraps() {
        let mut ctx = RecordingContext::new();
        ctx.font_size(10.0);
        let bounds = ctx.text_box_bounds(0.0, 0.0, 30.0, "0123456789");
        assert_eq!(bounds.width(), 30.0);
        assert_eq!(bounds.height(), 20.0);
    }

    #[test]
    fn test_shared_log() {
        let mut ctx = RecordingContext::new();
        let log = ctx.commands();
        ctx.begin_path();
        ctx.text(1.0, 2.0, "hi");
        assert_eq!(log.lock().len(), 2);
        assert_eq!(ctx.texts(), vec!["hi".to_owned()]);
    }
}
