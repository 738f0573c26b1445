use embedded_graphics::{
    prelude::{Point, Size},
    primitives::Rectangle,
};

/// An axis-aligned rectangle in pixel coordinates.
///
/// Rectangles are allowed to have zero width and/or height. The position may be negative, in
/// which case the rectangle extends past the top or left edge of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl Rect {
    /// Creates a rectangle extending downwards and right from a point.
    #[inline]
    pub fn from_top_left(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the X coordinate of the left side of the rectangle.
    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Returns the Y coordinate of the top side of the rectangle.
    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the X coordinate one past the right edge.
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Returns the Y coordinate one past the bottom edge.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Grows the rectangle by `amount` pixels on every side.
    #[must_use]
    pub fn grow(&self, amount: u32) -> Self {
        Self {
            x: self.x - amount as i32,
            y: self.y - amount as i32,
            width: self.width + amount * 2,
            height: self.height + amount * 2,
        }
    }

    /// Returns whether the pixel at `(x, y)` lies inside of `self`.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.right() && y < self.bottom()
    }

    pub(crate) fn to_rectangle(self) -> Rectangle {
        Rectangle::new(Point::new(self.x, self.y), Size::new(self.width, self.height))
    }

    pub(crate) fn from_rectangle(rect: Rectangle) -> Self {
        Self::from_top_left(
            rect.top_left.x,
            rect.top_left.y,
            rect.size.width,
            rect.size.height,
        )
    }
}
