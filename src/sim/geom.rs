//! Axis-aligned bounds for collision tests
//!
//! Positions are top-left corners in arena space (x right, y down).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Bottom edge midpoint (where dropped bombs appear)
    #[inline]
    pub fn bottom_center(&self) -> Vec2 {
        Vec2::new(self.min.x + self.size.x * 0.5, self.min.y + self.size.y)
    }

    /// True when the two rectangles share a region of non-zero area.
    ///
    /// Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        let left = self.min.x.max(other.min.x);
        let right = a_max.x.min(b_max.x);
        let top = self.min.y.max(other.min.y);
        let bottom = a_max.y.min(b_max.y);
        left < right && top < bottom
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x < max.x && point.y >= self.min.y && point.y < max.y
    }
}
