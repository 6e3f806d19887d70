//! Layout Items
//!
//! A [`LayoutItem`] wraps one caller-owned element together with the
//! author's placement wishes and the state the engine writes while laying
//! it out.

use serde::Serialize;
use tableau_geometry::{BoundingBox, Point};

use crate::element::{element_bbox, Element, WeakElement};
use crate::position::PreferredPosition;

/// Slack allowed when comparing a cumulative scale against its bounds
const SCALE_EPSILON: f64 = 1e-9;

/// Item identifier (insertion index within its manager)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ItemId(pub usize);

/// Placement options passed to [`crate::LayoutManager::add`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemOptions {
    pub preferred_position: PreferredPosition,
    pub priority: i32,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for ItemOptions {
    fn default() -> Self {
        Self {
            preferred_position: PreferredPosition::default(),
            priority: 0,
            min_scale: 0.1,
            max_scale: 2.0,
        }
    }
}

impl ItemOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, position: impl Into<PreferredPosition>) -> Self {
        self.preferred_position = position.into();
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn scale_bounds(mut self, min_scale: f64, max_scale: f64) -> Self {
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self
    }
}

/// One element under layout
#[derive(Debug)]
pub struct LayoutItem {
    id: ItemId,
    element: WeakElement,

    /// Requested anchor or point
    pub preferred_position: PreferredPosition,
    /// Higher values win conflicts
    pub priority: i32,
    /// Lower bound on the cumulative scale factor
    pub min_scale: f64,
    /// Upper bound on the cumulative scale factor
    pub max_scale: f64,

    final_position: Option<Point>,
    final_scale: f64,
    run_start_scale: f64,
    bounding_box: Option<BoundingBox>,
    actions_taken: Vec<String>,
    overflow: bool,
}

impl LayoutItem {
    pub(crate) fn new(id: ItemId, element: WeakElement, options: ItemOptions) -> Self {
        Self {
            id,
            element,
            preferred_position: options.preferred_position,
            priority: options.priority,
            min_scale: options.min_scale,
            max_scale: options.max_scale,
            final_position: None,
            final_scale: 1.0,
            run_start_scale: 1.0,
            bounding_box: None,
            actions_taken: Vec::new(),
            overflow: false,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// False once the caller has dropped the element
    pub fn is_attached(&self) -> bool {
        self.element.strong_count() > 0
    }

    pub fn final_position(&self) -> Option<Point> {
        self.final_position
    }

    /// Cumulative scale applied by the engine (starts at 1.0)
    pub fn final_scale(&self) -> f64 {
        self.final_scale
    }

    /// Bounding box as of the engine's last move or scale
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounding_box
    }

    pub fn actions_taken(&self) -> &[String] {
        &self.actions_taken
    }

    pub fn is_overflow(&self) -> bool {
        self.overflow
    }

    /// Read the element's live bounding box. `None` if the element is gone
    /// or currently borrowed elsewhere.
    pub fn current_bbox(&self) -> Option<BoundingBox> {
        let element = self.element.upgrade()?;
        let element = element.try_borrow().ok()?;
        Some(element_bbox(&*element))
    }

    /// Scale the element by `factor` if the resulting cumulative scale stays
    /// within `[min_scale, max_scale]`. Returns false and leaves the element
    /// untouched otherwise.
    pub fn apply_scale(&mut self, factor: f64) -> bool {
        let new_scale = self.final_scale * factor;
        let in_bounds = factor.is_finite()
            && factor > 0.0
            && new_scale >= self.min_scale - SCALE_EPSILON
            && new_scale <= self.max_scale + SCALE_EPSILON;

        if !in_bounds {
            self.log(format!(
                "scale to {new_scale:.2} rejected (bounds [{:.2}, {:.2}])",
                self.min_scale, self.max_scale
            ));
            return false;
        }

        if self.with_element(|e| e.scale(factor)).is_none() {
            return false;
        }
        self.final_scale = new_scale;
        self.log(format!("scaled to {new_scale:.2}"));
        self.refresh_bbox();
        true
    }

    /// Move the element's center to `position`
    pub fn move_to_position(&mut self, position: Point) {
        self.with_element(|e| e.move_to(position));
        self.final_position = Some(position);
        self.log(format!("moved to ({:.2}, {:.2})", position.x, position.y));
        self.refresh_bbox();
    }

    /// True if the current `layout()` run changed this item's scale
    pub fn scaled_this_run(&self) -> bool {
        (self.final_scale - self.run_start_scale).abs() > f64::EPSILON
    }

    pub(crate) fn log(&mut self, action: impl Into<String>) {
        self.actions_taken.push(action.into());
    }

    pub(crate) fn refresh_bbox(&mut self) {
        if let Some(bbox) = self.current_bbox() {
            self.bounding_box = Some(bbox);
        }
    }

    pub(crate) fn mark_overflow(&mut self) {
        self.overflow = true;
    }

    /// Clear per-run state. Scale is cumulative across runs and kept.
    pub(crate) fn begin_run(&mut self) {
        self.actions_taken.clear();
        self.overflow = false;
        self.run_start_scale = self.final_scale;
        self.bounding_box = self.current_bbox();
    }

    fn with_element<R>(&self, f: impl FnOnce(&mut dyn Element) -> R) -> Option<R> {
        let element = self.element.upgrade()?;
        let mut element = element.try_borrow_mut().ok()?;
        Some(f(&mut *element))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::element::{Rectangle, SharedElement};

    fn item_for(element: &SharedElement, options: ItemOptions) -> LayoutItem {
        LayoutItem::new(ItemId(0), Rc::downgrade(element), options)
    }

    #[test]
    fn test_move_records_position_and_bbox() {
        let element: SharedElement = Rectangle::new(2.0, 1.0).shared();
        let mut item = item_for(&element, ItemOptions::default());

        item.move_to_position(Point::new(1.0, 1.0));
        assert_eq!(item.final_position(), Some(Point::new(1.0, 1.0)));
        assert_eq!(item.bounding_box(), Some(BoundingBox::new(0.0, 0.5, 2.0, 1.5)));
        assert_eq!(element.borrow().center(), Point::new(1.0, 1.0));
        assert_eq!(item.actions_taken(), ["moved to (1.00, 1.00)"]);
    }

    #[test]
    fn test_scale_is_cumulative_and_bounded() {
        let element: SharedElement = Rectangle::new(2.0, 2.0).shared();
        let mut item = item_for(&element, ItemOptions::new().scale_bounds(0.5, 1.5));

        assert!(item.apply_scale(0.8));
        assert!((item.final_scale() - 0.8).abs() < 1e-12);
        assert!(item.apply_scale(0.7));
        assert!((item.final_scale() - 0.56).abs() < 1e-12);

        // 0.56 * 0.8 = 0.448 < 0.5
        assert!(!item.apply_scale(0.8));
        assert!((item.final_scale() - 0.56).abs() < 1e-12);
        assert!((element.borrow().width() - 1.12).abs() < 1e-12);
        assert!(item.actions_taken().last().unwrap().contains("rejected"));
    }

    #[test]
    fn test_scale_above_max_rejected() {
        let element: SharedElement = Rectangle::new(1.0, 1.0).shared();
        let mut item = item_for(&element, ItemOptions::default());
        assert!(!item.apply_scale(3.0));
        assert_eq!(element.borrow().width(), 1.0);
        assert_eq!(item.final_scale(), 1.0);
    }

    #[test]
    fn test_detached_item() {
        let element: SharedElement = Rectangle::new(1.0, 1.0).shared();
        let mut item = item_for(&element, ItemOptions::default());
        assert!(item.is_attached());

        drop(element);
        assert!(!item.is_attached());
        assert!(item.current_bbox().is_none());
        assert!(!item.apply_scale(0.9));
    }

    #[test]
    fn test_options_builder() {
        let options = ItemOptions::new()
            .at(Point::new(1.0, 2.0))
            .priority(7)
            .scale_bounds(0.2, 1.0);
        assert_eq!(options.preferred_position, PreferredPosition::Point(Point::new(1.0, 2.0)));
        assert_eq!(options.priority, 7);
        assert_eq!(options.min_scale, 0.2);
        assert_eq!(options.max_scale, 1.0);
    }
}
