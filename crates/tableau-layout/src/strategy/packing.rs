//! Packing-Based Placement
//!
//! Near-square grid, one item per cell, filled row-major from the top-left.
//! Cells never overlap and items are shrunk to fit their cell, so no
//! collision pass is needed.

use std::cmp::{Ordering, Reverse};

use tableau_geometry::{BoundingBox, Point};

use super::{attached_items, fit_ratio, mark_overflow, LayoutContext, PlacementStrategy};
use crate::config::LayoutStrategy;
use crate::report::LayoutReport;

/// Grid packing for many same-class items
#[derive(Debug, Clone, Copy, Default)]
pub struct PackingBasedStrategy;

/// `(rows, cols)` for `n` items: `cols = ceil(sqrt(n))`, `rows = ceil(n / cols)`
pub fn grid_dimensions(n: usize) -> (usize, usize) {
    if n == 0 {
        return (0, 0);
    }
    let cols = (n as f64).sqrt().ceil() as usize;
    (n.div_ceil(cols), cols)
}

impl PlacementStrategy for PackingBasedStrategy {
    fn kind(&self) -> LayoutStrategy {
        LayoutStrategy::PackingBased
    }

    fn layout(&self, ctx: &mut LayoutContext<'_>) -> LayoutReport {
        let mut report = LayoutReport::new(self.kind(), ctx.items.len());

        // Priority descending, then larger items first; stable for ties
        let mut order = attached_items(ctx.items, &mut report);
        order.sort_by(|a, b| {
            let (a, b) = (&ctx.items[a.0], &ctx.items[b.0]);
            let area = |bbox: Option<BoundingBox>| bbox.map_or(0.0, |b| b.area());
            Reverse(a.priority)
                .cmp(&Reverse(b.priority))
                .then_with(|| {
                    area(b.bounding_box())
                        .partial_cmp(&area(a.bounding_box()))
                        .unwrap_or(Ordering::Equal)
                })
        });

        let (rows, cols) = grid_dimensions(order.len());
        if order.is_empty() {
            return report.finish(ctx.items, &order, &ctx.region);
        }
        report.grid = Some((rows, cols));

        let region = ctx.region;
        let cell_w = region.width() / cols as f64;
        let cell_h = region.height() / rows as f64;
        let inner_w = cell_w - 2.0 * ctx.min_item_padding;
        let inner_h = cell_h - 2.0 * ctx.min_item_padding;

        for (i, &id) in order.iter().enumerate() {
            let (row, col) = (i / cols, i % cols);
            let center = Point::new(
                region.x_min + (col as f64 + 0.5) * cell_w,
                region.y_max - (row as f64 + 0.5) * cell_h,
            );

            let item = &mut ctx.items[id.0];
            item.move_to_position(center);
            report.items_moved += 1;

            let Some(bbox) = item.bounding_box() else {
                continue;
            };
            let required = fit_ratio(inner_w, bbox.width()).min(fit_ratio(inner_h, bbox.height()));
            if required < 1.0 && !item.apply_scale(required) {
                mark_overflow(ctx, id, &mut report);
            }
        }

        tracing::info!(
            "Packing placed {} items in a {}x{} grid",
            order.len(),
            rows,
            cols
        );

        report.finish(ctx.items, &order, &ctx.region)
    }
}
