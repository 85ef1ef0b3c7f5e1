//! Surface and rectangle geometry
//!
//! All coordinates are surface-local: origin at the top-left corner of the
//! play surface, x to the right, y down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Measured play surface size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A surface is measurable once it has a positive area
    pub fn measured(width: f32, height: f32) -> Option<Self> {
        (width > 0.0 && height > 0.0).then_some(Self { width, height })
    }

    /// x of the vertical midline dividing answer side from staging side
    #[inline]
    pub fn midline(&self) -> f32 {
        self.width * 0.5
    }
}

/// Axis-aligned rectangle (top-left origin + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    /// Strict overlap: rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }

    /// True if `other` lies entirely inside (edges inclusive)
    pub fn contains_rect(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        b_min.x >= a_min.x && b_min.y >= a_min.y && b_max.x <= a_max.x && b_max.y <= a_max.y
    }
}
