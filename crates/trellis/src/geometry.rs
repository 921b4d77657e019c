//! Geometry primitives.
//!
//! Widget positions and sizes are integral pixels in logical (DPI-independent)
//! units. Scroll deltas and paint coordinates are `f32`.

use std::ops::{Add, AddAssign, Div, Neg, Sub, SubAssign};

/// A 2D point or offset in logical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Offset by a size.
    #[inline]
    pub fn offset(self, size: Size) -> Self {
        Self::new(self.x + size.width, self.y + size.height)
    }
}

impl Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Point {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// A 2D extent in logical pixels.
///
/// A zero component in a fixed-size override means "not fixed" on that axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// The empty size.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero or negative.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Per axis, take `self` where non-zero and `fallback` otherwise.
    #[inline]
    pub fn or(self, fallback: Size) -> Size {
        Size::new(
            if self.width != 0 { self.width } else { fallback.width },
            if self.height != 0 { self.height } else { fallback.height },
        )
    }

    /// The size as a point-like offset.
    #[inline]
    pub fn to_point(self) -> Point {
        Point::new(self.width, self.height)
    }

    /// Read a component by axis index (0 = horizontal, 1 = vertical).
    #[inline]
    pub fn get(self, axis: usize) -> i32 {
        if axis == 0 { self.width } else { self.height }
    }

    /// Write a component by axis index (0 = horizontal, 1 = vertical).
    #[inline]
    pub fn set(&mut self, axis: usize, value: i32) {
        if axis == 0 {
            self.width = value;
        } else {
            self.height = value;
        }
    }
}

impl Sub for Size {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.width - rhs.width, self.height - rhs.height)
    }
}

impl Div<i32> for Size {
    type Output = Self;
    fn div(self, rhs: i32) -> Self {
        Self::new(self.width / rhs, self.height / rhs)
    }
}

/// An axis-aligned rectangle: top-left origin plus size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Create a rectangle from its components.
    #[inline]
    pub const fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(Point::new(x, y), Size::new(width, height))
    }

    /// Whether the point lies inside. The right and bottom edges are exclusive.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.origin.x
            && p.y >= self.origin.y
            && p.x < self.origin.x + self.size.width
            && p.y < self.origin.y + self.size.height
    }

    /// The bottom-right corner (exclusive).
    #[inline]
    pub fn max(&self) -> Point {
        self.origin.offset(self.size)
    }
}

/// A 2D vector for sub-pixel quantities such as scroll deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An RGBA colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Create a colour from float components.
    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a colour from 8-bit components.
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Create a grey with the given 8-bit intensity and alpha.
    #[inline]
    pub fn gray8(intensity: u8, alpha: u8) -> Self {
        Self::from_rgba8(intensity, intensity, intensity, alpha)
    }

    /// The same colour with a different alpha.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}
