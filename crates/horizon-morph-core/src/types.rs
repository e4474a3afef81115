//! Basic geometry value types.
//!
//! Every type here is a plain `Copy` value. Rectangles captured as transition
//! snapshots are never mutated in place; helpers return new values instead.

use bytemuck::{Pod, Zeroable};
use static_assertions::assert_impl_all;

/// Tolerance used by the `approx_eq` helpers.
pub const GEOMETRY_EPSILON: f32 = 1e-4;

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Convert to a glam Vec2.
    #[inline]
    pub fn to_vec2(self) -> glam::Vec2 {
        glam::Vec2::new(self.x, self.y)
    }

    /// Create from a glam Vec2.
    #[inline]
    pub fn from_vec2(v: glam::Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }

    /// Move the point by a delta.
    #[inline]
    pub fn translated(self, delta: Delta) -> Self {
        Self::new(self.x + delta.dx, self.y + delta.dy)
    }

    /// Compare two points within [`GEOMETRY_EPSILON`].
    pub fn approx_eq(self, other: Point) -> bool {
        (self.x - other.x).abs() <= GEOMETRY_EPSILON && (self.y - other.y).abs() <= GEOMETRY_EPSILON
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<glam::Vec2> for Point {
    fn from(v: glam::Vec2) -> Self {
        Self::from_vec2(v)
    }
}

/// A size in 2D space (width and height).
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Check if the size has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl From<(f32, f32)> for Size {
    fn from((width, height): (f32, f32)) -> Self {
        Self { width, height }
    }
}

/// A displacement between two points.
///
/// Deltas are what translation transforms are built from: a surface's visual
/// position is its frame origin moved by its offset delta.
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Delta {
    pub dx: f32,
    pub dy: f32,
}

impl Delta {
    /// Create a new delta.
    #[inline]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// No displacement.
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    /// The displacement that moves `from` onto `to`.
    #[inline]
    pub fn between(from: Point, to: Point) -> Self {
        Self::new(to.x - from.x, to.y - from.y)
    }

    /// Convert to a glam Vec2.
    #[inline]
    pub fn to_vec2(self) -> glam::Vec2 {
        glam::Vec2::new(self.dx, self.dy)
    }

    /// Keep only the horizontal component.
    #[inline]
    pub fn horizontal(self) -> Self {
        Self::new(self.dx, 0.0)
    }

    /// Keep only the vertical component.
    #[inline]
    pub fn vertical(self) -> Self {
        Self::new(0.0, self.dy)
    }

    /// Whether both components are zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

impl std::ops::Add for Delta {
    type Output = Delta;

    fn add(self, rhs: Delta) -> Delta {
        Delta::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

impl std::ops::Neg for Delta {
    type Output = Delta;

    fn neg(self) -> Delta {
        Delta::new(-self.dx, -self.dy)
    }
}

/// A rectangle defined by origin and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle from origin and size components.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    /// Create a rectangle from an origin point and a size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Empty rectangle at origin.
    pub const ZERO: Self = Self {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    /// Left edge x coordinate.
    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    /// Top edge y coordinate.
    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    /// Right edge x coordinate.
    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Bottom edge y coordinate.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Width of the rectangle.
    #[inline]
    pub fn width(&self) -> f32 {
        self.size.width
    }

    /// Height of the rectangle.
    #[inline]
    pub fn height(&self) -> f32 {
        self.size.height
    }

    /// Center point of the rectangle.
    #[inline]
    pub fn center(&self) -> Point {
        Point {
            x: self.origin.x + self.size.width / 2.0,
            y: self.origin.y + self.size.height / 2.0,
        }
    }

    /// Check if the rectangle is empty (zero or negative size).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// The same rectangle moved by a delta.
    #[inline]
    pub fn translated(&self, delta: Delta) -> Rect {
        Rect {
            origin: self.origin.translated(delta),
            size: self.size,
        }
    }

    /// The same origin with a different size.
    #[inline]
    pub fn with_size(&self, size: Size) -> Rect {
        Rect {
            origin: self.origin,
            size,
        }
    }

    /// The same size at a different origin.
    #[inline]
    pub fn with_origin(&self, origin: Point) -> Rect {
        Rect {
            origin,
            size: self.size,
        }
    }

    /// Width and height change needed to turn this rectangle into `other`.
    #[inline]
    pub fn size_delta(&self, other: &Rect) -> Size {
        Size::new(
            other.size.width - self.size.width,
            other.size.height - self.size.height,
        )
    }

    /// Compare two rectangles within [`GEOMETRY_EPSILON`].
    pub fn approx_eq(&self, other: &Rect) -> bool {
        self.origin.approx_eq(other.origin)
            && (self.size.width - other.size.width).abs() <= GEOMETRY_EPSILON
            && (self.size.height - other.size.height).abs() <= GEOMETRY_EPSILON
    }
}

assert_impl_all!(Point: Send, Sync, Copy);
assert_impl_all!(Rect: Send, Sync, Copy);
assert_impl_all!(Delta: Send, Sync, Copy);
