//! Rectangles and sizes in compositor space

/// An axis-aligned rectangle in compositor coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Horizontal position of the top-left corner
    pub x: i32,
    /// Vertical position of the top-left corner
    pub y: i32,
    /// Width of the rectangle
    pub width: i32,
    /// Height of the rectangle
    pub height: i32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and extent
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Rect {
        Rect { x, y, width, height }
    }

    /// Coordinate of the left edge
    pub fn left(&self) -> i32 {
        self.x
    }

    /// Coordinate of the right edge
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Coordinate of the top edge
    pub fn top(&self) -> i32 {
        self.y
    }

    /// Coordinate of the bottom edge
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// A width/height pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Size {
    /// Create a size from its dimensions
    pub fn new(width: u32, height: u32) -> Size {
        Size { width, height }
    }
}
