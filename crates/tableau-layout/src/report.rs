//! Layout Report
//!
//! Read-only summary of one `layout()` run.

use std::fmt;

use serde::Serialize;
use tableau_geometry::{BoundingBox, Point};

use crate::config::LayoutStrategy;
use crate::item::{ItemId, LayoutItem};

/// Final state of one item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemReport {
    pub id: ItemId,
    pub priority: i32,
    pub final_position: Option<Point>,
    pub final_scale: f64,
    pub actions_taken: Vec<String>,
    pub bounding_box: Option<BoundingBox>,
    pub overflow: bool,
}

impl ItemReport {
    fn from_item(item: &LayoutItem) -> Self {
        Self {
            id: item.id(),
            priority: item.priority,
            final_position: item.final_position(),
            final_scale: item.final_scale(),
            actions_taken: item.actions_taken().to_vec(),
            bounding_box: item.bounding_box(),
            overflow: item.is_overflow(),
        }
    }
}

/// Totals and diagnostics for one layout run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutReport {
    pub total_items: usize,
    pub items_placed: usize,
    pub items_scaled: usize,
    pub items_moved: usize,
    pub items_with_overflow: usize,
    pub collisions_resolved: usize,
    /// Occupied area over available area
    pub region_utilization: f64,
    pub strategy_used: LayoutStrategy,
    /// Collision-resolution passes executed
    pub iterations: usize,
    /// `(rows, cols)` of the packing grid
    pub grid: Option<(usize, usize)>,
    /// One entry per placed item, in placement order
    pub item_reports: Vec<ItemReport>,
    pub warnings: Vec<String>,
}

impl LayoutReport {
    pub(crate) fn new(strategy: LayoutStrategy, total_items: usize) -> Self {
        Self {
            total_items,
            items_placed: 0,
            items_scaled: 0,
            items_moved: 0,
            items_with_overflow: 0,
            collisions_resolved: 0,
            region_utilization: 0.0,
            strategy_used: strategy,
            iterations: 0,
            grid: None,
            item_reports: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Fill in the totals derived from final item state
    pub(crate) fn finish(mut self, items: &[LayoutItem], order: &[ItemId], region: &BoundingBox) -> Self {
        let placed: Vec<&LayoutItem> = order
            .iter()
            .filter_map(|id| items.get(id.0))
            .filter(|item| item.final_position().is_some())
            .collect();

        self.items_placed = placed.len();
        self.items_scaled = placed.iter().filter(|item| item.scaled_this_run()).count();
        self.region_utilization = utilization(&placed, region);
        self.item_reports = placed.iter().map(|item| ItemReport::from_item(item)).collect();
        self
    }

    pub fn item(&self, id: ItemId) -> Option<&ItemReport> {
        self.item_reports.iter().find(|r| r.id == id)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn utilization(items: &[&LayoutItem], region: &BoundingBox) -> f64 {
    let region_area = region.area();
    if region_area <= 0.0 {
        return 0.0;
    }
    let occupied: f64 = items
        .iter()
        .filter_map(|item| item.bounding_box())
        .map(|bbox| bbox.area())
        .sum();
    occupied / region_area
}

impl fmt::Display for LayoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Layout Report:")?;
        writeln!(f, "Items: {}/{}", self.items_placed, self.total_items)?;
        writeln!(f, "Scaled: {}", self.items_scaled)?;
        writeln!(f, "Moved: {}", self.items_moved)?;
        writeln!(f, "Overflow: {}", self.items_with_overflow)?;
        writeln!(f, "Collisions: {}", self.collisions_resolved)?;
        writeln!(f, "Utilization: {:.1}%", self.region_utilization * 100.0)?;
        write!(f, "Strategy: {}", self.strategy_used)?;
        for warning in &self.warnings {
            write!(f, "\nWarning: {warning}")?;
        }
        Ok(())
    }
}
