//! Screen configuration and builder.
//!
//! [`ScreenConfig`] carries everything a [`Screen`](crate::Screen) needs at
//! construction, plus the attributes of the native window it will be shown
//! in.

use winit::dpi::{LogicalSize, Size as WinitSize};
use winit::window::{Fullscreen, Window, WindowAttributes};

use trellis_core::{Result, TrellisError};

use crate::geometry::{Color, Size};

/// Default interval for two left presses to count as a double click, in
/// seconds.
pub const DEFAULT_DOUBLE_CLICK_INTERVAL: f64 = 0.2;

/// Default idle time before a tooltip is shown, in seconds.
pub const DEFAULT_TOOLTIP_DELAY: f64 = 0.0125;

/// Configuration for creating a screen.
///
/// # Example
///
/// ```ignore
/// use trellis::window::ScreenConfig;
///
/// let config = ScreenConfig::new("Inspector")
///     .with_size(1024, 768)
///     .with_resizable(true);
///
/// let attributes = config.to_window_attributes();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenConfig {
    caption: String,
    /// Logical size in pixels.
    size: Size,
    /// Physical pixels per logical pixel.
    pixel_ratio: f32,
    background: Color,
    resizable: bool,
    fullscreen: bool,
    double_click_interval: f64,
    tooltip_delay: f64,
}

impl ScreenConfig {
    /// A configuration with the given window caption and default values.
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            size: Size::new(1024, 768),
            pixel_ratio: 1.0,
            background: Color::from_rgba8(77, 77, 77, 255),
            resizable: true,
            fullscreen: false,
            double_click_interval: DEFAULT_DOUBLE_CLICK_INTERVAL,
            tooltip_delay: DEFAULT_TOOLTIP_DELAY,
        }
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.size = Size::new(width, height);
        self
    }

    pub fn with_pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    pub fn with_double_click_interval(mut self, seconds: f64) -> Self {
        self.double_click_interval = seconds;
        self
    }

    pub fn with_tooltip_delay(mut self, seconds: f64) -> Self {
        self.tooltip_delay = seconds;
        self
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn resizable(&self) -> bool {
        self.resizable
    }

    pub fn fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn double_click_interval(&self) -> f64 {
        self.double_click_interval
    }

    pub fn tooltip_delay(&self) -> f64 {
        self.tooltip_delay
    }

    /// Check the values a screen cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.size.width < 0 || self.size.height < 0 {
            return Err(TrellisError::InvalidConfig(format!(
                "negative screen size {}x{}",
                self.size.width, self.size.height
            )));
        }
        if !(self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0) {
            return Err(TrellisError::InvalidConfig(format!(
                "pixel ratio must be positive, got {}",
                self.pixel_ratio
            )));
        }
        if !(self.double_click_interval >= 0.0 && self.tooltip_delay >= 0.0) {
            return Err(TrellisError::InvalidConfig(
                "timing intervals must be non-negative".into(),
            ));
        }
        Ok(())
    }

    /// Convert to winit `WindowAttributes`.
    pub fn to_window_attributes(&self) -> WindowAttributes {
        let mut attrs = Window::default_attributes()
            .with_title(&self.caption)
            .with_resizable(self.resizable);

        if !self.size.is_empty() {
            attrs = attrs.with_inner_size(WinitSize::Logical(LogicalSize::new(
                self.size.width as f64,
                self.size.height as f64,
            )));
        }
        if self.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }
        attrs
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self::new("Trellis")
    }
}
