//! Spawn anchoring inside region boundaries.
//!
//! A new agent anchors near the region's first boundary vertex. A fixed
//! 8-neighborhood scan nudges it onto the first contained cell, then a
//! short quasi-random relaxation walk drifts it away from the entry point
//! so agents spawned into the same region do not stack. Both scan orders
//! are deterministic and load-bearing for reproducible placement; do not
//! reorder them.

use fastrand::Rng;
use meander_common::TileCell;
use tracing::warn;

use crate::region::RegionMap;

/// Fixed 8-neighborhood scan order for the initial nudge:
/// NW, N, NE, W, E, SW, S, SE.
const NUDGE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Fixed per-iteration step order for the relaxation walk: N, W, E, S.
const RELAX_STEPS: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// Exclusive upper bound on relaxation iterations.
const MAX_RELAX_ITERS: f32 = 30.0;

/// Finds the spawn anchor cell for an agent entering `region`.
///
/// Best-effort: a region whose first vertex has no contained neighbor
/// leaves the anchor at the raw boundary cell, possibly outside the
/// walkable area. That is a soft condition, logged and tolerated.
pub fn find_spawn<R: RegionMap>(region: &R, rng: &mut Rng) -> TileCell {
    let origin = match region.boundary().first() {
        Some(point) => point.to_tile().cell(),
        None => TileCell::new(0, 0),
    };
    let anchor = nudge(origin, region);
    let iters = (rng.f32() * MAX_RELAX_ITERS) as u32;
    relax(anchor, region, iters)
}

/// Deterministic nudge: the origin cell itself, then its 8 neighbors in
/// fixed order, stopping at the first contained candidate. Falls back to
/// the raw origin when nothing qualifies.
pub fn nudge<R: RegionMap>(origin: TileCell, region: &R) -> TileCell {
    if region.contains(origin.pos()) {
        return origin;
    }
    for (dx, dy) in NUDGE_OFFSETS {
        let candidate = origin.offset(dx, dy);
        if region.contains(candidate.pos()) {
            return candidate;
        }
    }
    warn!(
        x = origin.x,
        y = origin.y,
        region = region.id().raw(),
        "no contained spawn neighbor, anchor left outside region"
    );
    origin
}

/// Bounded relaxation walk: for each iteration, attempt one step in each of
/// the four cardinal directions in fixed order, committing every step whose
/// destination is contained. Several directions may commit within one
/// iteration, compounding displacement diagonally. The Chebyshev
/// displacement never exceeds `iters`.
pub fn relax<R: RegionMap>(anchor: TileCell, region: &R, iters: u32) -> TileCell {
    let mut current = anchor;
    for _ in 0..iters {
        for (dx, dy) in RELAX_STEPS {
            let candidate = current.offset(dx, dy);
            if region.contains(candidate.pos()) {
                current = candidate;
            }
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::MaskRegion;
    use meander_common::{PixelPoint, RegionId};

    fn boundary_at(x: f32, y: f32) -> Vec<PixelPoint> {
        vec![
            PixelPoint::new(x * 16.0, y * 16.0),
            PixelPoint::new((x + 2.0) * 16.0, y * 16.0),
            PixelPoint::new((x + 2.0) * 16.0, (y + 2.0) * 16.0),
            PixelPoint::new(x * 16.0, (y + 2.0) * 16.0),
        ]
    }

    #[test]
    fn test_nudge_keeps_contained_origin() {
        let mut region = MaskRegion::new(RegionId::new(1));
        region.allow(TileCell::new(5, 5));
        assert_eq!(nudge(TileCell::new(5, 5), &region), TileCell::new(5, 5));
    }

    #[test]
    fn test_nudge_scan_order_is_fixed() {
        // Both W (-1,0) and E (1,0) are walkable; NW..NE are not.
        // W precedes E in the scan order.
        let mut region = MaskRegion::new(RegionId::new(1));
        region.allow(TileCell::new(4, 5));
        region.allow(TileCell::new(6, 5));
        assert_eq!(nudge(TileCell::new(5, 5), &region), TileCell::new(4, 5));

        // With a contained NW neighbor, NW wins over everything.
        region.allow(TileCell::new(4, 4));
        assert_eq!(nudge(TileCell::new(5, 5), &region), TileCell::new(4, 4));
    }

    #[test]
    fn test_nudge_falls_back_to_raw_origin() {
        let region = MaskRegion::new(RegionId::new(1));
        assert_eq!(nudge(TileCell::new(3, 3), &region), TileCell::new(3, 3));
    }

    #[test]
    fn test_relax_displacement_bounded_by_iterations() {
        let mut region = MaskRegion::new(RegionId::new(1));
        region.allow_rect(-50, -50, 100, 100);
        let anchor = TileCell::new(0, 0);

        for iters in 0..16 {
            let settled = relax(anchor, &region, iters);
            assert!(settled.chebyshev(anchor) <= iters as i32);
        }
    }

    #[test]
    fn test_relax_zero_iterations_is_identity() {
        let mut region = MaskRegion::new(RegionId::new(1));
        region.allow_rect(0, 0, 8, 8);
        assert_eq!(relax(TileCell::new(2, 2), &region, 0), TileCell::new(2, 2));
    }

    #[test]
    fn test_relax_never_leaves_the_region() {
        let mut region = MaskRegion::new(RegionId::new(1));
        region.allow_rect(0, 0, 3, 3);

        let settled = relax(TileCell::new(1, 1), &region, 25);
        assert!(region.contains(settled.pos()));
    }

    #[test]
    fn test_find_spawn_lands_inside() {
        let mut region = MaskRegion::new(RegionId::new(1)).with_boundary(boundary_at(0.0, 0.0));
        region.allow_rect(0, 0, 2, 2);
        let mut rng = fastrand::Rng::with_seed(7);

        for _ in 0..32 {
            let anchor = find_spawn(&region, &mut rng);
            assert!(region.contains(anchor.pos()));
        }
    }

    #[test]
    fn test_find_spawn_degenerate_region_keeps_raw_anchor() {
        // Nothing is walkable: the anchor stays at the boundary cell.
        let region = MaskRegion::new(RegionId::new(1)).with_boundary(boundary_at(4.0, 4.0));
        let mut rng = fastrand::Rng::with_seed(7);

        assert_eq!(find_spawn(&region, &mut rng), TileCell::new(4, 4));
    }
}
