//! Placement Strategies
//!
//! Each strategy takes the item arena for one run and mutates positions and
//! scales in place, returning the run's report.

mod constraint;
mod packing;

pub use constraint::{ConstraintBasedStrategy, FIT_MARGIN};
pub use packing::{grid_dimensions, PackingBasedStrategy};

use tableau_geometry::BoundingBox;

use crate::config::LayoutStrategy;
use crate::item::{ItemId, LayoutItem};
use crate::overlay::{AnnotationFactory, Color, Overlay};
use crate::report::LayoutReport;

/// Everything a strategy may read or write during one run
pub struct LayoutContext<'a> {
    pub items: &'a mut [LayoutItem],
    /// Region after padding; all items must end up inside it
    pub region: BoundingBox,
    pub min_item_padding: f64,
    pub max_iterations: usize,
    pub overflow_color: Color,
    pub annotations: Option<&'a dyn AnnotationFactory>,
    /// Indicators created for overflowed items
    pub overflow_markers: &'a mut Vec<Overlay>,
}

/// A placement algorithm
pub trait PlacementStrategy {
    fn kind(&self) -> LayoutStrategy;

    fn layout(&self, ctx: &mut LayoutContext<'_>) -> LayoutReport;
}

/// Strategy object for a configured strategy kind
pub fn for_kind(kind: LayoutStrategy) -> Box<dyn PlacementStrategy> {
    match kind {
        LayoutStrategy::ConstraintBased => Box::new(ConstraintBasedStrategy),
        LayoutStrategy::PackingBased => Box::new(PackingBasedStrategy),
    }
}

/// Ids of items whose element is still alive. Detached items are reported
/// as warnings and skipped.
fn attached_items(items: &[LayoutItem], report: &mut LayoutReport) -> Vec<ItemId> {
    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        if item.is_attached() && item.bounding_box().is_some() {
            ids.push(item.id());
        } else {
            let warning = format!("Item {} skipped: element is no longer available", item.id().0);
            tracing::warn!("{warning}");
            report.warnings.push(warning);
        }
    }
    ids
}

/// Scale that shrinks `extent` to `available`. Zero-size extents never
/// need scaling.
fn fit_ratio(available: f64, extent: f64) -> f64 {
    if extent > 0.0 { available / extent } else { f64::INFINITY }
}

/// Flag an item that cannot be fitted even at its minimum scale
fn mark_overflow(ctx: &mut LayoutContext<'_>, id: ItemId, report: &mut LayoutReport) {
    let item = &mut ctx.items[id.0];
    item.mark_overflow();

    let indicator = match (ctx.annotations, item.bounding_box()) {
        (Some(factory), Some(bbox)) => factory.overflow_indicator(&bbox, ctx.overflow_color),
        _ => None,
    };
    match indicator {
        Some(marker) => {
            ctx.overflow_markers.push(marker);
            item.log("overflow indicator created");
        }
        None => item.log("overflow recorded without indicator"),
    }

    report.items_with_overflow += 1;
    let warning = format!(
        "Item {} exceeded region bounds even at minimum scale {:.2}",
        id.0, item.min_scale
    );
    tracing::warn!("{warning}");
    report.warnings.push(warning);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_ratio() {
        assert_eq!(fit_ratio(3.6, 1.8), 2.0);
        assert_eq!(fit_ratio(3.6, 0.0), f64::INFINITY);
    }

    #[test]
    fn test_for_kind() {
        assert_eq!(for_kind(LayoutStrategy::ConstraintBased).kind(), LayoutStrategy::ConstraintBased);
        assert_eq!(for_kind(LayoutStrategy::PackingBased).kind(), LayoutStrategy::PackingBased);
    }
}
