//! Preferred Positions
//!
//! An item asks for either a named anchor or an explicit point. Absolute
//! anchors resolve against the available region; relative anchors resolve
//! against the bounding box of the item placed just before it.

use serde::{Deserialize, Serialize};
use tableau_geometry::{BoundingBox, Point};

/// Named anchor point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    Center,
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    /// Above the previously placed item
    Above,
    /// Below the previously placed item
    Below,
    /// Left of the previously placed item
    LeftOf,
    /// Right of the previously placed item
    RightOf,
}

impl Anchor {
    pub fn is_relative(&self) -> bool {
        matches!(self, Self::Above | Self::Below | Self::LeftOf | Self::RightOf)
    }
}

/// Where an item would like to be
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferredPosition {
    Anchor(Anchor),
    Point(Point),
}

impl Default for PreferredPosition {
    fn default() -> Self {
        Self::Anchor(Anchor::Center)
    }
}

impl From<Anchor> for PreferredPosition {
    fn from(anchor: Anchor) -> Self {
        Self::Anchor(anchor)
    }
}

impl From<Point> for PreferredPosition {
    fn from(point: Point) -> Self {
        Self::Point(point)
    }
}

/// Inset keeping flush-anchored items strictly inside after rounding
const EDGE_INSET: f64 = 1e-9;

/// Horizontal/vertical alignment of an absolute anchor: -1 min edge,
/// 0 centered, 1 max edge
fn alignment(anchor: Anchor) -> (i8, i8) {
    match anchor {
        Anchor::TopLeft => (-1, 1),
        Anchor::TopCenter => (0, 1),
        Anchor::TopRight => (1, 1),
        Anchor::CenterLeft => (-1, 0),
        Anchor::CenterRight => (1, 0),
        Anchor::BottomLeft => (-1, -1),
        Anchor::BottomCenter => (0, -1),
        Anchor::BottomRight => (1, -1),
        _ => (0, 0),
    }
}

/// Center coordinate on one axis for an item of `extent` aligned inside
/// `[min, max]`. Items at least as large as the span are centered.
fn align_axis(align: i8, min: f64, max: f64, extent: f64) -> f64 {
    let mid = (min + max) / 2.0;
    if extent + 2.0 * EDGE_INSET >= max - min {
        return mid;
    }
    match align {
        -1 => min + extent / 2.0 + EDGE_INSET,
        1 => max - extent / 2.0 - EDGE_INSET,
        _ => mid,
    }
}

/// Resolve a preferred position to a concrete center point.
///
/// `item` is the item's current bounding box (only its size matters),
/// `previous` the current bounding box of the most recently placed item.
pub(crate) fn resolve(
    preferred: &PreferredPosition,
    region: &BoundingBox,
    item: &BoundingBox,
    previous: Option<&BoundingBox>,
    spacing: f64,
) -> Point {
    let anchor = match preferred {
        PreferredPosition::Point(p) => return *p,
        PreferredPosition::Anchor(anchor) => *anchor,
    };

    if anchor.is_relative() {
        return match previous {
            Some(reference) => relative_to(anchor, reference, item, spacing),
            None => region.center(),
        };
    }

    let (ax, ay) = alignment(anchor);
    Point::new(
        align_axis(ax, region.x_min, region.x_max, item.width()),
        align_axis(ay, region.y_min, region.y_max, item.height()),
    )
}

fn relative_to(anchor: Anchor, reference: &BoundingBox, item: &BoundingBox, spacing: f64) -> Point {
    let c = reference.center();
    match anchor {
        Anchor::Above => Point::new(c.x, reference.y_max + item.height() / 2.0 + spacing),
        Anchor::Below => Point::new(c.x, reference.y_min - item.height() / 2.0 - spacing),
        Anchor::LeftOf => Point::new(reference.x_min - item.width() / 2.0 - spacing, c.y),
        Anchor::RightOf => Point::new(reference.x_max + item.width() / 2.0 + spacing, c.y),
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> BoundingBox {
        BoundingBox::new(-4.0, -3.0, 4.0, 3.0)
    }

    fn item() -> BoundingBox {
        BoundingBox::from_center(Point::ORIGIN, 2.0, 1.0)
    }

    fn assert_near(actual: Point, expected: Point) {
        assert!(
            actual.distance_to(expected) < 1e-6,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn test_explicit_point_bypasses_anchors() {
        let p = Point::new(10.0, -10.0);
        assert_eq!(resolve(&p.into(), &region(), &item(), None, 0.1), p);
    }

    #[test]
    fn test_absolute_anchors_sit_flush_inside() {
        let r = region();
        let top_left = resolve(&Anchor::TopLeft.into(), &r, &item(), None, 0.0);
        assert_near(top_left, Point::new(-3.0, 2.5));

        let bottom_right = resolve(&Anchor::BottomRight.into(), &r, &item(), None, 0.0);
        assert_near(bottom_right, Point::new(3.0, -2.5));

        let top_center = resolve(&Anchor::TopCenter.into(), &r, &item(), None, 0.0);
        assert_near(top_center, Point::new(0.0, 2.5));

        let center = resolve(&PreferredPosition::default(), &r, &item(), None, 0.0);
        assert_eq!(center, Point::ORIGIN);

        for anchor in [Anchor::TopLeft, Anchor::TopRight, Anchor::BottomLeft, Anchor::CenterRight] {
            let p = resolve(&anchor.into(), &r, &item(), None, 0.0);
            assert!(r.contains(&item().recentered(p)), "{anchor:?} not inside");
        }
    }

    #[test]
    fn test_oversized_item_is_centered_on_that_axis() {
        let wide = BoundingBox::from_center(Point::ORIGIN, 20.0, 1.0);
        let p = resolve(&Anchor::TopLeft.into(), &region(), &wide, None, 0.0);
        assert_near(p, Point::new(0.0, 2.5));
    }

    #[test]
    fn test_relative_anchors() {
        let reference = BoundingBox::new(-1.0, -1.0, 1.0, 1.0);
        let r = region();
        let spacing = 0.1;

        let above = resolve(&Anchor::Above.into(), &r, &item(), Some(&reference), spacing);
        assert_eq!(above, Point::new(0.0, 1.0 + 0.5 + spacing));

        let below = resolve(&Anchor::Below.into(), &r, &item(), Some(&reference), spacing);
        assert_eq!(below, Point::new(0.0, -1.0 - 0.5 - spacing));

        let left = resolve(&Anchor::LeftOf.into(), &r, &item(), Some(&reference), spacing);
        assert_eq!(left, Point::new(-1.0 - 1.0 - spacing, 0.0));

        let right = resolve(&Anchor::RightOf.into(), &r, &item(), Some(&reference), spacing);
        assert_eq!(right, Point::new(1.0 + 1.0 + spacing, 0.0));
    }

    #[test]
    fn test_relative_anchor_without_reference_uses_center() {
        let p = resolve(&Anchor::RightOf.into(), &region(), &item(), None, 0.1);
        assert_eq!(p, region().center());
    }
}
