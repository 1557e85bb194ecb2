//! Integer axis-aligned rectangles
//!
//! Edges are stored as `left, top, right, bottom` with `right`/`bottom`
//! exclusive, so two rectangles sharing an edge never both contain a point
//! on that edge.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Axis a wall extends along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Wall grows left/right and splits a region into top and bottom halves
    Horizontal,
    /// Wall grows up/down and splits a region into left and right halves
    Vertical,
}

/// Pixel rectangle; `left`/`top` inclusive, `right`/`bottom` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build from origin and size
    pub const fn from_xywh(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::new(x, y, x + w, y + h)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Pixel area (zero for degenerate rectangles)
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width() as i64 * self.height() as i64
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Half-open containment test; empty rectangles contain nothing
    pub fn contains(&self, x: i32, y: i32) -> bool {
        !self.is_empty() && x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    pub fn contains_point(&self, p: IVec2) -> bool {
        self.contains(p.x, p.y)
    }

    /// Containment for a floating point position (truncated to the pixel grid)
    pub fn contains_pos(&self, pos: Vec2) -> bool {
        self.contains(pos.x.floor() as i32, pos.y.floor() as i32)
    }

    /// True if the interiors overlap
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) as f32 * 0.5,
            (self.top + self.bottom) as f32 * 0.5,
        )
    }

    /// Squared distance from a point to the closest point of the rectangle
    pub fn distance_squared_to(&self, pos: Vec2) -> f32 {
        let dx = (self.left as f32 - pos.x).max(0.0).max(pos.x - self.right as f32);
        let dy = (self.top as f32 - pos.y).max(0.0).max(pos.y - self.bottom as f32);
        dx * dx + dy * dy
    }

    /// Split at `at` perpendicular to `axis`, returning (before, after)
    ///
    /// A horizontal wall splits at a y coordinate, a vertical wall at x. The
    /// coordinate is clamped to the rectangle, so either half may be empty.
    pub fn split(&self, axis: Axis, at: i32) -> (Rect, Rect) {
        match axis {
            Axis::Horizontal => {
                let y = at.clamp(self.top, self.bottom);
                (
                    Rect::new(self.left, self.top, self.right, y),
                    Rect::new(self.left, y, self.right, self.bottom),
                )
            }
            Axis::Vertical => {
                let x = at.clamp(self.left, self.right);
                (
                    Rect::new(self.left, self.top, x, self.bottom),
                    Rect::new(x, self.top, self.right, self.bottom),
                )
            }
        }
    }
}
