//! Collision Detection and Resolution
//!
//! Pairwise AABB tests over the item arena, resolved by moving the
//! lower-priority item to a free spot inside the available region, or
//! shrinking it when there is none.

use tableau_geometry::{BoundingBox, Point};

use crate::item::{ItemId, LayoutItem};

/// Scale applied to the yielding item when no translation fits
pub const SCALE_STEP: f64 = 0.9;

/// Extra separation so rounding never leaves a resolved pair touching
const SEPARATION_SLACK: f64 = 1e-9;

/// Two items whose padded bounding boxes overlap, in placement order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub first: ItemId,
    pub second: ItemId,
}

/// Outcome of a bounded resolution run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    /// Passes executed
    pub iterations: usize,
    /// Pairs left separated by a translation or a scale step
    pub resolved: usize,
    /// Collisions still present when the run stopped
    pub remaining: usize,
}

/// What a single resolution pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Pairs that no longer conflict after their step
    pub resolved: usize,
    /// Scale steps applied, whether or not they separated the pair
    pub scaled: usize,
}

impl PassStats {
    pub fn made_progress(&self) -> bool {
        self.resolved + self.scaled > 0
    }
}

/// Detects and resolves overlaps inside one available region
#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver {
    region: BoundingBox,
    min_item_padding: f64,
}

impl CollisionResolver {
    pub fn new(region: BoundingBox, min_item_padding: f64) -> Self {
        Self { region, min_item_padding }
    }

    /// Padded box used for conflict tests. Each side gets half the
    /// clearance so two boxes conflict when closer than `min_item_padding`.
    fn padded(&self, bbox: &BoundingBox) -> BoundingBox {
        bbox.expand_by_padding(self.min_item_padding / 2.0)
    }

    fn in_conflict(&self, a: &BoundingBox, b: &BoundingBox) -> bool {
        self.padded(a).overlaps(&self.padded(b))
    }

    /// Every conflicting pair among the items in `order`. Overflowed and
    /// detached items take no part.
    pub fn detect(&self, items: &[LayoutItem], order: &[ItemId]) -> Vec<Collision> {
        let boxes: Vec<(ItemId, BoundingBox)> = order
            .iter()
            .filter_map(|&id| {
                let item = items.get(id.0)?;
                if item.is_overflow() || !item.is_attached() {
                    return None;
                }
                item.bounding_box().map(|bbox| (id, bbox))
            })
            .collect();

        let mut collisions = Vec::new();
        for (i, (first, a)) in boxes.iter().enumerate() {
            for (second, b) in &boxes[i + 1..] {
                if self.in_conflict(a, b) {
                    collisions.push(Collision { first: *first, second: *second });
                }
            }
        }
        collisions
    }

    /// Which item of a pair keeps its place. Higher priority wins; on a tie
    /// the earlier-added item wins.
    pub fn primary_of(items: &[LayoutItem], collision: Collision) -> (ItemId, ItemId) {
        let (a, b) = (collision.first, collision.second);
        let pa = items[a.0].priority;
        let pb = items[b.0].priority;
        if pa > pb || (pa == pb && a < b) {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// One resolution pass over `collisions`
    pub fn resolve(&self, items: &mut [LayoutItem], collisions: &[Collision]) -> PassStats {
        let mut pass = PassStats::default();

        for &collision in collisions {
            let (primary, secondary) = Self::primary_of(items, collision);
            let (Some(p_box), Some(s_box)) =
                (items[primary.0].bounding_box(), items[secondary.0].bounding_box())
            else {
                continue;
            };

            // An earlier step in this pass may already have separated them
            if !self.in_conflict(&p_box, &s_box) {
                continue;
            }

            if self.try_translate(items, &p_box, secondary) {
                tracing::debug!(?primary, ?secondary, "collision resolved by translation");
                pass.resolved += 1;
            } else if items[secondary.0].apply_scale(SCALE_STEP) {
                pass.scaled += 1;
                let separated = items[secondary.0]
                    .bounding_box()
                    .is_some_and(|b| !self.in_conflict(&p_box, &b));
                if separated {
                    tracing::debug!(?primary, ?secondary, "collision resolved by scaling");
                    pass.resolved += 1;
                } else {
                    tracing::debug!(?primary, ?secondary, "scaled, still overlapping");
                }
            } else {
                tracing::debug!(?primary, ?secondary, "collision left unresolved");
            }
        }

        pass
    }

    /// Repeat detect/resolve until no collisions remain, a pass makes no
    /// progress, or `max_iterations` passes have run.
    pub fn run(&self, items: &mut [LayoutItem], order: &[ItemId], max_iterations: usize) -> ResolutionStats {
        let mut stats = ResolutionStats::default();

        for iteration in 0..max_iterations {
            let collisions = self.detect(items, order);
            if collisions.is_empty() {
                break;
            }
            tracing::debug!(iteration, collisions = collisions.len(), "resolving collisions");

            stats.iterations += 1;
            let pass = self.resolve(items, &collisions);
            stats.resolved += pass.resolved;
            if !pass.made_progress() {
                break;
            }
        }

        stats.remaining = self.detect(items, order).len();
        stats
    }

    /// Candidate centers for `moving`, best first: the axis with the smaller
    /// overlap, away from `fixed`, then the opposite side, then the other axis.
    fn translation_candidates(&self, fixed: &BoundingBox, moving: &BoundingBox) -> [Point; 4] {
        let gap = self.min_item_padding + SEPARATION_SLACK;
        let fc = fixed.center();
        let mc = moving.center();

        let left = Point::new(fixed.x_min - moving.width() / 2.0 - gap, mc.y);
        let right = Point::new(fixed.x_max + moving.width() / 2.0 + gap, mc.y);
        let down = Point::new(mc.x, fixed.y_min - moving.height() / 2.0 - gap);
        let up = Point::new(mc.x, fixed.y_max + moving.height() / 2.0 + gap);

        let horizontal = if mc.x < fc.x { [left, right] } else { [right, left] };
        let vertical = if mc.y < fc.y { [down, up] } else { [up, down] };

        if fixed.overlap_x(moving) < fixed.overlap_y(moving) {
            [horizontal[0], horizontal[1], vertical[0], vertical[1]]
        } else {
            [vertical[0], vertical[1], horizontal[0], horizontal[1]]
        }
    }

    /// Spots flush against each side of every obstacle, either keeping the
    /// moving item's other coordinate or lined up with the obstacle. Nearest
    /// to the current center first.
    fn neighbour_candidates(&self, obstacles: &[BoundingBox], moving: &BoundingBox) -> Vec<Point> {
        let gap = self.min_item_padding + SEPARATION_SLACK;
        let mc = moving.center();
        let (half_w, half_h) = (moving.width() / 2.0, moving.height() / 2.0);

        let mut candidates = Vec::with_capacity(obstacles.len() * 8);
        for obstacle in obstacles {
            let oc = obstacle.center();
            let xs = [obstacle.x_min - half_w - gap, obstacle.x_max + half_w + gap];
            let ys = [obstacle.y_min - half_h - gap, obstacle.y_max + half_h + gap];
            for x in xs {
                candidates.push(Point::new(x, mc.y));
                candidates.push(Point::new(x, oc.y));
            }
            for y in ys {
                candidates.push(Point::new(mc.x, y));
                candidates.push(Point::new(oc.x, y));
            }
        }

        candidates.sort_by(|a, b| a.distance_to(mc).total_cmp(&b.distance_to(mc)));
        candidates
    }

    /// Move `id` to the first candidate that stays inside the region and
    /// clear of every other placed item. Leaves the item alone otherwise.
    fn try_translate(&self, items: &mut [LayoutItem], fixed: &BoundingBox, id: ItemId) -> bool {
        let Some(current) = items[id.0].bounding_box() else {
            return false;
        };

        let obstacles: Vec<BoundingBox> = items
            .iter()
            .filter(|item| item.id() != id && !item.is_overflow() && item.is_attached())
            .filter_map(LayoutItem::bounding_box)
            .collect();

        let is_free = |center: Point| {
            let moved = current.recentered(center);
            self.region.contains(&moved) && obstacles.iter().all(|o| !self.in_conflict(o, &moved))
        };

        let target = self
            .translation_candidates(fixed, &current)
            .into_iter()
            .chain(self.neighbour_candidates(&obstacles, &current))
            .find(|&c| is_free(c));

        match target {
            Some(target) => {
                items[id.0].move_to_position(target);
                true
            }
            None => {
                tracing::trace!(?id, "no free position for translation");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::element::{Rectangle, SharedElement};
    use crate::item::ItemOptions;

    fn place(
        elements: &mut Vec<SharedElement>,
        items: &mut Vec<LayoutItem>,
        w: f64,
        h: f64,
        at: Point,
        priority: i32,
    ) -> ItemId {
        let element: SharedElement = Rectangle::new(w, h).shared();
        let id = ItemId(items.len());
        let mut item = LayoutItem::new(id, Rc::downgrade(&element), ItemOptions::new().priority(priority));
        item.move_to_position(at);
        elements.push(element);
        items.push(item);
        id
    }

    #[test]
    fn test_detect_uses_padding() {
        let mut elements = Vec::new();
        let mut items = Vec::new();
        let a = place(&mut elements, &mut items, 1.0, 1.0, Point::new(0.0, 0.0), 0);
        let b = place(&mut elements, &mut items, 1.0, 1.0, Point::new(1.05, 0.0), 0);

        let tight = CollisionResolver::new(BoundingBox::new(-5.0, -5.0, 5.0, 5.0), 0.02);
        assert!(tight.detect(&items, &[a, b]).is_empty());

        let loose = CollisionResolver::new(BoundingBox::new(-5.0, -5.0, 5.0, 5.0), 0.1);
        assert_eq!(loose.detect(&items, &[a, b]), vec![Collision { first: a, second: b }]);
    }

    #[test]
    fn test_primary_is_higher_priority_then_earlier() {
        let mut elements = Vec::new();
        let mut items = Vec::new();
        let low = place(&mut elements, &mut items, 1.0, 1.0, Point::ORIGIN, 1);
        let high = place(&mut elements, &mut items, 1.0, 1.0, Point::ORIGIN, 5);
        let tie = place(&mut elements, &mut items, 1.0, 1.0, Point::ORIGIN, 1);

        let c = Collision { first: low, second: high };
        assert_eq!(CollisionResolver::primary_of(&items, c), (high, low));

        let c = Collision { first: tie, second: low };
        assert_eq!(CollisionResolver::primary_of(&items, c), (low, tie));
    }

    #[test]
    fn test_translation_along_smaller_overlap() {
        let mut elements = Vec::new();
        let mut items = Vec::new();
        let a = place(&mut elements, &mut items, 2.0, 1.0, Point::ORIGIN, 10);
        let b = place(&mut elements, &mut items, 2.0, 1.0, Point::ORIGIN, 5);

        let resolver = CollisionResolver::new(BoundingBox::new(-4.95, -2.95, 4.95, 2.95), 0.02);
        let stats = resolver.run(&mut items, &[a, b], 100);

        assert_eq!(stats.remaining, 0);
        assert!(stats.resolved >= 1);
        assert_eq!(items[a.0].final_position(), Some(Point::ORIGIN));

        // Vertical overlap (1.0) is smaller than horizontal (2.0)
        let moved = items[b.0].final_position().unwrap();
        assert_eq!(moved.x, 0.0);
        assert!((moved.y - 1.02).abs() < 1e-6);
        assert_eq!(items[b.0].final_scale(), 1.0);
    }

    #[test]
    fn test_scale_fallback_when_no_room() {
        let mut elements = Vec::new();
        let mut items = Vec::new();
        // Region exactly as large as the items: nowhere to move
        let a = place(&mut elements, &mut items, 2.0, 2.0, Point::ORIGIN, 10);
        let b = place(&mut elements, &mut items, 2.0, 2.0, Point::ORIGIN, 5);

        let resolver = CollisionResolver::new(BoundingBox::new(-1.0, -1.0, 1.0, 1.0), 0.02);
        let collisions = resolver.detect(&items, &[a, b]);
        let pass = resolver.resolve(&mut items, &collisions);

        // Shrunk once but still inside the padded clearance of `a`
        assert_eq!(pass, PassStats { resolved: 0, scaled: 1 });
        assert!(pass.made_progress());

        assert!((items[b.0].final_scale() - SCALE_STEP).abs() < 1e-12);
        assert_eq!(items[a.0].final_scale(), 1.0);
        assert_eq!(items[b.0].final_position(), Some(Point::ORIGIN));
    }

    #[test]
    fn test_iteration_cap_is_respected() {
        let mut elements = Vec::new();
        let mut items = Vec::new();
        let a = place(&mut elements, &mut items, 2.0, 2.0, Point::ORIGIN, 10);
        let b = place(&mut elements, &mut items, 2.0, 2.0, Point::ORIGIN, 5);

        let resolver = CollisionResolver::new(BoundingBox::new(-1.0, -1.0, 1.0, 1.0), 0.02);
        let stats = resolver.run(&mut items, &[a, b], 3);

        assert_eq!(stats.iterations, 3);
        assert_eq!(stats.remaining, 1);
        // 0.9^3
        assert!((items[b.0].final_scale() - 0.729).abs() < 1e-9);
    }

    #[test]
    fn test_unresolvable_pair_stops_early() {
        let mut elements = Vec::new();
        let mut items = Vec::new();
        let a = place(&mut elements, &mut items, 2.0, 2.0, Point::ORIGIN, 10);
        let b = place(&mut elements, &mut items, 2.0, 2.0, Point::ORIGIN, 5);
        items[b.0].min_scale = 1.0;

        let resolver = CollisionResolver::new(BoundingBox::new(-1.0, -1.0, 1.0, 1.0), 0.02);
        let stats = resolver.run(&mut items, &[a, b], 100);

        assert_eq!(stats.iterations, 1);
        assert_eq!(stats.resolved, 0);
        assert_eq!(stats.remaining, 1);
    }

    #[test]
    fn test_translation_skips_occupied_spots() {
        let mut elements = Vec::new();
        let mut items = Vec::new();
        let a = place(&mut elements, &mut items, 1.0, 1.0, Point::ORIGIN, 10);
        let blocker = place(&mut elements, &mut items, 1.0, 1.0, Point::new(0.0, 1.1), 5);
        let b = place(&mut elements, &mut items, 1.0, 1.0, Point::ORIGIN, 1);

        let resolver = CollisionResolver::new(BoundingBox::new(-7.0, -4.0, 7.0, 4.0), 0.02);
        let collisions = resolver.detect(&items, &[a, blocker, b]);
        let pass = resolver.resolve(&mut items, &collisions);
        assert_eq!(pass, PassStats { resolved: 1, scaled: 0 });

        // Above `a` is taken, so `b` goes below instead
        let moved = items[b.0].final_position().unwrap();
        assert_eq!(moved.x, 0.0);
        assert!((moved.y + 1.02).abs() < 1e-6);
        assert!(resolver.detect(&items, &[a, blocker, b]).is_empty());
    }

    #[test]
    fn test_pile_of_identical_items_spreads_in_one_pass() {
        let mut elements = Vec::new();
        let mut items = Vec::new();
        let order: Vec<ItemId> = (0..8)
            .map(|_| place(&mut elements, &mut items, 1.0, 1.0, Point::ORIGIN, 0))
            .collect();

        let resolver = CollisionResolver::new(BoundingBox::new(-7.0, -4.0, 7.0, 4.0), 0.02);
        let stats = resolver.run(&mut items, &order, 100);

        assert_eq!(stats.iterations, 1);
        assert_eq!(stats.resolved, 7);
        assert_eq!(stats.remaining, 0);
        assert_eq!(items[order[0].0].final_position(), Some(Point::ORIGIN));
        assert!(items.iter().all(|item| item.final_scale() == 1.0));
    }

    #[test]
    fn test_neighbour_candidates_nearest_first() {
        let resolver = CollisionResolver::new(BoundingBox::new(-7.0, -4.0, 7.0, 4.0), 0.0);
        let obstacles = [BoundingBox::new(-1.0, -0.5, 1.0, 0.5)];
        let moving = BoundingBox::from_center(Point::ORIGIN, 1.0, 1.0);

        let candidates = resolver.neighbour_candidates(&obstacles, &moving);
        assert_eq!(candidates.len(), 8);
        assert!((candidates[0].y.abs() - 1.0).abs() < 1e-6);
        assert!((candidates[7].x.abs() - 1.5).abs() < 1e-6);
    }
}
