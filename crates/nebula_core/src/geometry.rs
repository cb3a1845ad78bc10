//! Geometry primitives shared by the host and the indicator
//!
//! Element boxes and visible regions are whole pixels, exactly as the host
//! reports them. Only the indicator's animated position is fractional.

/// 2D point in overlay-local coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset the point by a delta
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// An absolute bounding box: origin plus size, in a shared coordinate space
/// (typically window or screen space).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const ZERO: Bounds = Bounds {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when both extents are strictly positive
    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Move the box by a delta, keeping its size
    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Bounds::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// The box at its own origin, as an edge rectangle
    pub fn local_rect(&self) -> IntRect {
        IntRect::new(0, 0, self.width, self.height)
    }
}

/// Edge rectangle (left, top, right, bottom). Right and bottom are exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl IntRect {
    pub const ZERO: IntRect = IntRect {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Offset both corners by a delta
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        IntRect::new(
            self.left + dx,
            self.top + dy,
            self.right + dx,
            self.bottom + dy,
        )
    }

    /// Whether this rectangle covers `[0, 0, width, height]` entirely
    pub fn covers(&self, width: i32, height: i32) -> bool {
        self.left <= 0 && self.top <= 0 && self.right >= width && self.bottom >= height
    }
}

/// Four independent insets. Positive values grow a box outward, negative
/// values shrink it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Insets {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Insets {
    pub const ZERO: Insets = Insets {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Same inset on every edge
    pub const fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}
