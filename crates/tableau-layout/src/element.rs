//! Element Contract
//!
//! Anything that can report its size and center and accept move/scale
//! commands can be laid out. The engine never creates or frees elements:
//! callers keep them in `Rc<RefCell<_>>` and the engine holds a `Weak`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tableau_geometry::{BoundingBox, Point};

/// A visual element placed by the layout engine
pub trait Element {
    /// Current width, reflecting any scaling applied so far
    fn width(&self) -> f64;

    /// Current height, reflecting any scaling applied so far
    fn height(&self) -> f64;

    fn center(&self) -> Point;

    fn move_to(&mut self, position: Point);

    /// Multiply the current size by `factor` in place, keeping the center
    fn scale(&mut self, factor: f64);
}

/// Caller-owned element handle
pub type SharedElement = Rc<RefCell<dyn Element>>;

/// Non-owning element handle held by layout items
pub type WeakElement = Weak<RefCell<dyn Element>>;

/// Live bounding box of an element, read from its center and half extents
pub fn element_bbox(element: &dyn Element) -> BoundingBox {
    BoundingBox::from_center(element.center(), element.width(), element.height())
}

/// A plain sized box. Handy as an adapter target and for tests.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    width: f64,
    height: f64,
    center: Point,
}

impl Rectangle {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, center: Point::ORIGIN }
    }

    pub fn at(mut self, center: Point) -> Self {
        self.center = center;
        self
    }

    /// Wrap in the shared handle expected by [`crate::LayoutManager::add`]
    pub fn shared(self) -> Rc<RefCell<Rectangle>> {
        Rc::new(RefCell::new(self))
    }

    pub fn bbox(&self) -> BoundingBox {
        element_bbox(self)
    }
}

impl Element for Rectangle {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn center(&self) -> Point {
        self.center
    }

    fn move_to(&mut self, position: Point) {
        self.center = position;
    }

    fn scale(&mut self, factor: f64) {
        self.width *= factor;
        self.height *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_element() {
        let mut rect = Rectangle::new(2.0, 1.0).at(Point::new(1.0, 1.0));
        assert_eq!(rect.bbox(), BoundingBox::new(0.0, 0.5, 2.0, 1.5));

        rect.scale(0.5);
        rect.move_to(Point::ORIGIN);
        assert_eq!(rect.bbox(), BoundingBox::new(-0.5, -0.25, 0.5, 0.25));
    }

    #[test]
    fn test_weak_handle_does_not_keep_element_alive() {
        let rect = Rectangle::new(1.0, 1.0).shared();
        let shared: SharedElement = rect.clone();
        let weak: WeakElement = Rc::downgrade(&shared);
        drop(shared);
        assert!(weak.upgrade().is_some());

        drop(rect);
        assert!(weak.upgrade().is_none());
    }
}
