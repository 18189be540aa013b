use std::ops::Sub;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(x: {}, y: {})", self.x, self.y)
    }
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn min(self, other: Self) -> Self {
        Position::new(self.x.min(other.x), self.y.min(other.y))
    }

    pub fn max(self, other: Self) -> Self {
        Position::new(self.x.max(other.x), self.y.max(other.y))
    }
}

impl From<(i32, i32)> for Position {
    fn from(value: (i32, i32)) -> Self {
        Position::new(value.0, value.1)
    }
}

impl Sub<Position> for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position {
            x: self.x.saturating_sub(rhs.x),
            y: self.y.saturating_sub(rhs.y),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Size { width, height }
    }
}

impl From<Position> for Size {
    fn from(value: Position) -> Self {
        Size::new(value.x, value.y)
    }
}

/// Pixel rectangle; `right()`/`bottom()` are exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Rectangle {
    pub start: Position,
    pub size: Size,
}

impl std::fmt::Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(x:{}, y:{}, width: {}, height: {})",
            self.start.x, self.start.y, self.size.width, self.size.height
        )
    }
}

impl Rectangle {
    pub fn new(start: Position, size: Size) -> Self {
        Self { start, size }
    }

    pub fn from(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            start: Position::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Exclusive corner, saturated at `i32::MAX`.
    pub fn bottom_right(&self) -> Position {
        Position {
            x: self.start.x.saturating_add(self.size.width),
            y: self.start.y.saturating_add(self.size.height),
        }
    }

    pub fn left(&self) -> i32 {
        self.start.x
    }

    pub fn right(&self) -> i32 {
        self.bottom_right().x
    }

    pub fn top(&self) -> i32 {
        self.start.y
    }

    pub fn bottom(&self) -> i32 {
        self.bottom_right().y
    }

    pub fn width(&self) -> i32 {
        self.size.width
    }

    pub fn height(&self) -> i32 {
        self.size.height
    }

    pub fn is_empty(&self) -> bool {
        self.size.width <= 0 || self.size.height <= 0
    }

    pub fn is_inside(&self, pos: impl Into<Position>) -> bool {
        let pos = pos.into();
        self.start.x <= pos.x && self.start.y <= pos.y && pos.x < self.right() && pos.y < self.bottom()
    }

    /// Overlap of both rectangles; empty rectangles come back with a zero size.
    pub fn intersect(&self, other: &Rectangle) -> Rectangle {
        let min = self.start.max(other.start);
        let max = self.bottom_right().min(other.bottom_right());
        if max.x <= min.x || max.y <= min.y {
            return Rectangle::new(min, Size::default());
        }
        Rectangle {
            start: min,
            size: (max - min).into(),
        }
    }

    pub fn union(&self, other: &Rectangle) -> Rectangle {
        if self.is_empty() {
            return *other;
        }

        if other.is_empty() {
            return *self;
        }

        let min = self.start.min(other.start);
        let max = self.bottom_right().max(other.bottom_right());
        Rectangle {
            start: min,
            size: (max - min).into(),
        }
    }

    pub fn y_range(&self) -> std::ops::Range<i32> {
        self.start.y..self.bottom()
    }

    pub fn x_range(&self) -> std::ops::Range<i32> {
        self.start.x..self.right()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_disjoint_is_empty() {
        let a = Rectangle::from(0, 0, 10, 10);
        let b = Rectangle::from(20, 20, 5, 5);
        assert!(a.intersect(&b).is_empty());
    }

    #[test]
    fn test_intersect_overlap() {
        let a = Rectangle::from(0, 0, 10, 10);
        let b = Rectangle::from(5, 3, 10, 10);
        assert_eq!(a.intersect(&b), Rectangle::from(5, 3, 5, 7));
    }

    #[test]
    fn test_is_inside_excludes_far_edges() {
        let r = Rectangle::from(1, 1, 4, 2);
        assert!(r.is_inside((4, 2)));
        assert!(!r.is_inside((5, 2)));
        assert!(!r.is_inside((1, 3)));
    }

    #[test]
    fn test_oversized_rectangle_clips() {
        let image = Rectangle::from(0, 0, 8, 8);
        let huge = Rectangle::from(1, 1, i32::MAX, i32::MAX);
        assert_eq!(huge.bottom_right(), Position::new(i32::MAX, i32::MAX));
        assert_eq!(huge.intersect(&image), Rectangle::from(1, 1, 7, 7));
        assert_eq!(image.intersect(&huge), Rectangle::from(1, 1, 7, 7));
    }
}
