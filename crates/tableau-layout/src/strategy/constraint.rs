//! Constraint-Based Placement
//!
//! Phases, in order:
//! 1. Place items by descending priority at their preferred positions.
//! 2. Resolve collisions (translate, then scale) up to the iteration cap.
//! 3. Fit every item into the available region, flagging overflow when an
//!    item would need to go below its minimum scale.
//!
//! If phase 3 touched anything, phase 2 runs again on whatever iteration
//! budget is left.

use std::cmp::Reverse;

use tableau_geometry::{BoundingBox, Point};

use super::{attached_items, fit_ratio, mark_overflow, LayoutContext, PlacementStrategy};
use crate::collision::{CollisionResolver, ResolutionStats};
use crate::config::LayoutStrategy;
use crate::item::ItemId;
use crate::position;
use crate::report::LayoutReport;

/// Safety margin applied when scaling an item down to fit the region
pub const FIT_MARGIN: f64 = 0.95;

/// Inset used when shifting an item back inside the region
const EDGE_SLACK: f64 = 1e-9;

/// Preferred positions first, conflicts resolved by priority
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintBasedStrategy;

impl PlacementStrategy for ConstraintBasedStrategy {
    fn kind(&self) -> LayoutStrategy {
        LayoutStrategy::ConstraintBased
    }

    fn layout(&self, ctx: &mut LayoutContext<'_>) -> LayoutReport {
        let mut report = LayoutReport::new(self.kind(), ctx.items.len());

        // Stable sort: equal priorities keep insertion order
        let mut order = attached_items(ctx.items, &mut report);
        order.sort_by_key(|id| Reverse(ctx.items[id.0].priority));

        self.place_initial(ctx, &order, &mut report);

        let resolver = CollisionResolver::new(ctx.region, ctx.min_item_padding);
        let mut stats = resolver.run(ctx.items, &order, ctx.max_iterations);

        let adjusted = self.fit_to_region(ctx, &order, &mut report);
        if adjusted > 0 {
            let budget = ctx.max_iterations.saturating_sub(stats.iterations);
            let settle = resolver.run(ctx.items, &order, budget);
            stats = ResolutionStats {
                iterations: stats.iterations + settle.iterations,
                resolved: stats.resolved + settle.resolved,
                remaining: settle.remaining,
            };
        }

        report.collisions_resolved = stats.resolved;
        report.iterations = stats.iterations;
        if stats.remaining > 0 {
            let warning = format!(
                "{} collision(s) left unresolved after {} iteration(s)",
                stats.remaining, stats.iterations
            );
            tracing::warn!("{warning}");
            report.warnings.push(warning);
        }

        report.finish(ctx.items, &order, &ctx.region)
    }
}

impl ConstraintBasedStrategy {
    fn place_initial(&self, ctx: &mut LayoutContext<'_>, order: &[ItemId], report: &mut LayoutReport) {
        let mut previous: Option<BoundingBox> = None;

        for &id in order {
            let item = &mut ctx.items[id.0];
            let Some(current) = item.bounding_box() else {
                continue;
            };
            let target = position::resolve(
                &item.preferred_position,
                &ctx.region,
                &current,
                previous.as_ref(),
                ctx.min_item_padding,
            );
            item.move_to_position(target);
            report.items_moved += 1;
            previous = item.bounding_box();
        }
    }

    /// Bring every item inside the region. Returns how many items were moved
    /// or scaled.
    fn fit_to_region(&self, ctx: &mut LayoutContext<'_>, order: &[ItemId], report: &mut LayoutReport) -> usize {
        let region = ctx.region;
        let mut adjusted = 0;

        for &id in order {
            let item = &mut ctx.items[id.0];
            let Some(bbox) = item.bounding_box() else {
                continue;
            };
            if region.contains(&bbox) {
                continue;
            }

            if bbox.fits_within_size_of(&region) {
                item.move_to_position(clamp_center(&bbox, &region));
                if item.bounding_box().is_some_and(|b| region.contains(&b)) {
                    item.log("shifted into region");
                    adjusted += 1;
                    continue;
                }
            }

            let Some(bbox) = item.bounding_box() else {
                continue;
            };
            let required = fit_ratio(region.width(), bbox.width())
                .min(fit_ratio(region.height(), bbox.height()))
                * FIT_MARGIN;

            if required < 1.0 && item.apply_scale(required) {
                item.move_to_position(region.center());
                adjusted += 1;
            } else {
                mark_overflow(ctx, id, report);
            }
        }

        adjusted
    }
}

/// Center that puts `bbox` inside `region` with the smallest shift
fn clamp_center(bbox: &BoundingBox, region: &BoundingBox) -> Point {
    Point::new(
        clamp_axis(bbox.x_min, bbox.x_max, region.x_min, region.x_max),
        clamp_axis(bbox.y_min, bbox.y_max, region.y_min, region.y_max),
    )
}

fn clamp_axis(min: f64, max: f64, lo: f64, hi: f64) -> f64 {
    let half = (max - min) / 2.0;
    if (max - min) + 2.0 * EDGE_SLACK >= hi - lo {
        (lo + hi) / 2.0
    } else if min < lo {
        lo + half + EDGE_SLACK
    } else if max > hi {
        hi - half - EDGE_SLACK
    } else {
        (min + max) / 2.0
    }
}
