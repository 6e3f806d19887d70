//! Axis-Aligned Bounding Box
//!
//! Used for every overlap and containment test in the engine. All
//! operations are pure and return new values.

use serde::{Deserialize, Serialize};

use crate::Point;

/// Axis-aligned rectangle, `x_min <= x_max` and `y_min <= y_max`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl BoundingBox {
    /// Create a box from two corners. Swapped coordinates are reordered.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min: x_min.min(x_max),
            y_min: y_min.min(y_max),
            x_max: x_min.max(x_max),
            y_max: y_min.max(y_max),
        }
    }

    /// Create a box of the given size centered on `center`
    pub fn from_center(center: Point, width: f64, height: f64) -> Self {
        let half_w = width.abs() / 2.0;
        let half_h = height.abs() / 2.0;
        Self {
            x_min: center.x - half_w,
            y_min: center.y - half_h,
            x_max: center.x + half_w,
            y_max: center.y + half_h,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// True if both extents are finite and strictly positive
    pub fn has_positive_extent(&self) -> bool {
        let w = self.width();
        let h = self.height();
        w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0
    }

    /// Strict intersection test. Boxes that only touch along an edge do not
    /// overlap.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        !(self.x_max <= other.x_min
            || self.x_min >= other.x_max
            || self.y_max <= other.y_min
            || self.y_min >= other.y_max)
    }

    /// True if every edge of `other` lies within this box (edges may coincide)
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.x_min <= other.x_min
            && self.x_max >= other.x_max
            && self.y_min <= other.y_min
            && self.y_max >= other.y_max
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }

    /// Grow every side by `padding`. A negative value shrinks the box; a box
    /// shrunk past zero collapses onto its center instead of inverting.
    pub fn expand_by_padding(&self, padding: f64) -> BoundingBox {
        let center = self.center();
        let (x_min, x_max) = if self.width() + 2.0 * padding >= 0.0 {
            (self.x_min - padding, self.x_max + padding)
        } else {
            (center.x, center.x)
        };
        let (y_min, y_max) = if self.height() + 2.0 * padding >= 0.0 {
            (self.y_min - padding, self.y_max + padding)
        } else {
            (center.y, center.y)
        };
        BoundingBox { x_min, y_min, x_max, y_max }
    }

    /// Signed overlap along x. Negative values are the gap between the boxes.
    pub fn overlap_x(&self, other: &BoundingBox) -> f64 {
        self.x_max.min(other.x_max) - self.x_min.max(other.x_min)
    }

    /// Signed overlap along y. Negative values are the gap between the boxes.
    pub fn overlap_y(&self, other: &BoundingBox) -> f64 {
        self.y_max.min(other.y_max) - self.y_min.max(other.y_min)
    }

    /// Same size, moved so its center sits on `center`
    pub fn recentered(&self, center: Point) -> BoundingBox {
        BoundingBox::from_center(center, self.width(), self.height())
    }

    /// True if this box's extents do not exceed the region's
    pub fn fits_within_size_of(&self, region: &BoundingBox) -> bool {
        self.width() <= region.width() && self.height() <= region.height()
    }
}
