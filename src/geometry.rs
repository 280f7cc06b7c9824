//! Screen-space geometry shared by the placement engine and the host traits.
//!
//! Coordinates are CSS-like pixels: x grows to the right, y grows downwards.

use glam::Vec2;

/// Axis-aligned rectangle given by its top-left origin and its size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Inclusive on the top/left edge, exclusive on the bottom/right edge.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x < self.origin.x + self.size.x
            && point.y < self.origin.y + self.size.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(r.contains(Vec2::new(10.0, 20.0)));
        assert!(r.contains(Vec2::new(109.9, 69.9)));
        assert!(!r.contains(Vec2::new(110.0, 30.0)));
        assert!(!r.contains(Vec2::new(50.0, 70.0)));
        assert!(!r.contains(Vec2::new(9.9, 30.0)));
    }
}
