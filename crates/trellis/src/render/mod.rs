//! The vector drawing interface widgets paint through.
//!
//! [`DrawContext`] is modelled on an immediate-mode path renderer: build a
//! path, then fill or stroke it with a colour or a gradient paint. The screen
//! owns exactly one context and lends it to widgets while drawing and while
//! measuring text for layout.
//!
//! [`RecordingContext`] implements the trait without a GPU, recording every
//! call. It backs headless screens and tests.

mod recording;

pub use recording::{DrawCommand, RecordingContext};

use crate::geometry::{Color, Size};

/// Winding direction for the current sub-path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    /// Counter-clockwise, a filled shape.
    Solid,
    /// Clockwise, a hole cut from the shape.
    Hole,
}

/// Horizontal text alignment relative to the text origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment relative to the text origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
    Baseline,
}

/// Text alignment for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextAlign {
    pub horizontal: HAlign,
    pub vertical: VAlign,
}

impl TextAlign {
    /// Create an alignment.
    pub const fn new(horizontal: HAlign, vertical: VAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub const LEFT_TOP: Self = Self::new(HAlign::Left, VAlign::Top);
    pub const LEFT_MIDDLE: Self = Self::new(HAlign::Left, VAlign::Middle);
    pub const CENTER_MIDDLE: Self = Self::new(HAlign::Center, VAlign::Middle);
    pub const CENTER_TOP: Self = Self::new(HAlign::Center, VAlign::Top);
}

/// Bounding box of laid-out text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl TextBounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// A gradient used to fill or stroke a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    /// Gradient between two points.
    Linear {
        start: (f32, f32),
        end: (f32, f32),
        inner: Color,
        outer: Color,
    },
    /// Feathered rounded rectangle, used for drop shadows and insets.
    Box {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        feather: f32,
        inner: Color,
        outer: Color,
    },
    /// Gradient between two radii around a centre.
    Radial {
        center: (f32, f32),
        inner_radius: f32,
        outer_radius: f32,
        inner: Color,
        outer: Color,
    },
}

/// Immediate-mode vector drawing calls.
///
/// Coordinates are logical pixels in the current transform. The screen
/// translates to each widget's absolute position before painting it, so
/// widgets draw with their own top-left corner at the origin.
pub trait DrawContext {
    /// Whether the backend is ready to draw. Screens refuse backends that
    /// are not.
    fn is_ready(&self) -> bool {
        true
    }

    fn begin_frame(&mut self, size: Size, pixel_ratio: f32);
    fn end_frame(&mut self);
    /// Clear the whole target with a colour.
    fn clear(&mut self, color: Color);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn reset_scissor(&mut self);
    fn intersect_scissor(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn global_alpha(&mut self, alpha: f32);

    fn begin_path(&mut self);
    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn rounded_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32);
    fn circle(&mut self, cx: f32, cy: f32, radius: f32);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn path_winding(&mut self, winding: Winding);

    fn fill_color(&mut self, color: Color);
    fn fill_paint(&mut self, paint: Paint);
    fn fill(&mut self);
    fn stroke_color(&mut self, color: Color);
    fn stroke_paint(&mut self, paint: Paint);
    fn stroke_width(&mut self, width: f32);
    fn stroke(&mut self);

    fn font_face(&mut self, face: &str);
    fn font_size(&mut self, size: f32);
    fn text_align(&mut self, align: TextAlign);
    /// Draw a single line of text; returns the x position after it.
    fn text(&mut self, x: f32, y: f32, text: &str) -> f32;
    /// Draw text wrapped at `break_width`.
    fn text_box(&mut self, x: f32, y: f32, break_width: f32, text: &str);
    /// Measure a single line of text; returns the advance and the bounds.
    fn text_bounds(&mut self, x: f32, y: f32, text: &str) -> (f32, TextBounds);
    /// Measure text wrapped at `break_width`.
    fn text_box_bounds(&mut self, x: f32, y: f32, break_width: f32, text: &str) -> TextBounds;
}
