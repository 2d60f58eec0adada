//! Integer rectangle for tile collision
//!
//! Level geometry lives on an integer pixel grid, and so do collision boxes.
//! Bodies keep a continuous position, but every overlap test goes through
//! `Rect`, which truncates coordinates toward zero. Snapping a body against a
//! tile therefore always lands it on a whole pixel.

use macroquad::math::Vec2;

/// An axis-aligned rectangle defined by integer position and size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rect at a continuous position (truncated toward zero)
    pub fn at(position: Vec2, w: i32, h: i32) -> Self {
        Self::new(position.x as i32, position.y as i32, w, h)
    }

    /// Left edge
    pub fn left(&self) -> i32 {
        self.x
    }

    /// Right edge
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Top edge
    pub fn top(&self) -> i32 {
        self.y
    }

    /// Bottom edge
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Center X (integer division, rounds toward the top-left)
    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    /// Center Y (integer division, rounds toward the top-left)
    pub fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }

    /// Center as a continuous point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x() as f32, self.center_y() as f32)
    }

    /// Move so the left edge sits at `x`
    pub fn set_left(&mut self, x: i32) {
        self.x = x;
    }

    /// Move so the right edge sits at `x`
    pub fn set_right(&mut self, x: i32) {
        self.x = x - self.w;
    }

    /// Move so the top edge sits at `y`
    pub fn set_top(&mut self, y: i32) {
        self.y = y;
    }

    /// Move so the bottom edge sits at `y`
    pub fn set_bottom(&mut self, y: i32) {
        self.y = y - self.h;
    }

    /// Check if two rects share any area. Touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Check if point is inside (point is truncated to the pixel grid)
    pub fn contains(&self, point: Vec2) -> bool {
        let (px, py) = (point.x as i32, point.y as i32);
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_truncates_toward_zero() {
        let r = Rect::at(Vec2::new(10.9, -0.5), 16, 16);
        assert_eq!(r.x, 10);
        assert_eq!(r.y, 0);
    }

    #[test]
    fn test_overlap_ignores_touching_edges() {
        let a = Rect::new(0, 0, 16, 16);
        assert!(!a.overlaps(&Rect::new(16, 0, 16, 16)));
        assert!(!a.overlaps(&Rect::new(0, 16, 16, 16)));
        assert!(a.overlaps(&Rect::new(15, 15, 16, 16)));
    }

    #[test]
    fn test_edge_setters() {
        let mut r = Rect::new(5, 5, 16, 8);
        r.set_right(32);
        assert_eq!(r.x, 16);
        r.set_bottom(48);
        assert_eq!(r.y, 40);
        assert_eq!(r.center_x(), 24);
        assert_eq!(r.center_y(), 44);
    }

    #[test]
    fn test_contains() {
        let r = Rect::new(10, 20, 16, 16);
        assert!(r.contains(Vec2::new(10.0, 20.0)));
        assert!(r.contains(Vec2::new(25.9, 35.9)));
        assert!(!r.contains(Vec2::new(26.0, 30.0)));
        assert!(!r.contains(Vec2::new(9.5, 30.0)));
    }
}
