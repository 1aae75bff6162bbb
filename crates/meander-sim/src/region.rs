//! Walkable regions bounded by authored polygons.
//!
//! A region supplies three things to the simulation: an ordered boundary
//! (pixel units, implicitly closed), a point-containment test over tile-unit
//! coordinates, and a membership set of the agents currently living in it.
//! Membership insertion happens at agent construction; removal is the
//! agent's own responsibility and must stay idempotent.

use ahash::AHashSet;
use meander_common::{AgentId, PixelPoint, RegionId, TileCell, TilePos, TILE_SIZE};
use serde::{Deserialize, Serialize};

use crate::movement::Facing;

/// Authored tags attached to a region.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionProperties {
    /// Facings the default person texture may use, in preference order.
    pub directions: Vec<Facing>,
}

/// Seam the simulation consumes from a region.
pub trait RegionMap {
    /// Returns the region's identifier.
    fn id(&self) -> RegionId;
    /// Point-in-region test over tile-unit coordinates.
    fn contains(&self, pos: TilePos) -> bool;
    /// Ordered boundary points in pixel units, implicitly closed.
    fn boundary(&self) -> &[PixelPoint];
    /// Authored properties.
    fn properties(&self) -> &RegionProperties;
    /// Registers an agent in the membership set. Returns whether it was new.
    fn insert_member(&mut self, agent: AgentId) -> bool;
    /// Removes an agent from the membership set. Idempotent: removing an
    /// absent agent is a no-op returning false.
    fn remove_member(&mut self, agent: AgentId) -> bool;
    /// Number of agents currently registered.
    fn member_count(&self) -> usize;
}

/// A polygon-bounded walkable region with an owned agent membership set.
#[derive(Debug, Clone)]
pub struct Region {
    id: RegionId,
    boundary: Vec<PixelPoint>,
    properties: RegionProperties,
    members: AHashSet<AgentId>,
}

impl Region {
    /// Creates a region from its authored boundary polygon (pixel units).
    #[must_use]
    pub fn new(id: RegionId, boundary: Vec<PixelPoint>) -> Self {
        Self {
            id,
            boundary,
            properties: RegionProperties::default(),
            members: AHashSet::new(),
        }
    }

    /// Attaches authored properties.
    #[must_use]
    pub fn with_properties(mut self, properties: RegionProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Returns whether an agent is registered in this region.
    #[must_use]
    pub fn is_member(&self, agent: AgentId) -> bool {
        self.members.contains(&agent)
    }

    /// Iterates over the registered agents.
    pub fn members(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.members.iter().copied()
    }
}

impl RegionMap for Region {
    fn id(&self) -> RegionId {
        self.id
    }

    fn contains(&self, pos: TilePos) -> bool {
        polygon_contains(&self.boundary, pos)
    }

    fn boundary(&self) -> &[PixelPoint] {
        &self.boundary
    }

    fn properties(&self) -> &RegionProperties {
        &self.properties
    }

    fn insert_member(&mut self, agent: AgentId) -> bool {
        self.members.insert(agent)
    }

    fn remove_member(&mut self, agent: AgentId) -> bool {
        self.members.remove(&agent)
    }

    fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// Even-odd ray-cast point-in-polygon test in tile units. Points lying on
/// the boundary count as inside, so perimeter waypoints survive validation.
fn polygon_contains(boundary: &[PixelPoint], pos: TilePos) -> bool {
    if boundary.len() < 3 {
        return false;
    }
    let (px, py) = (pos.x, pos.y);
    let mut inside = false;
    let mut j = boundary.len() - 1;
    for i in 0..boundary.len() {
        let (xi, yi) = (boundary[i].x / TILE_SIZE, boundary[i].y / TILE_SIZE);
        let (xj, yj) = (boundary[j].x / TILE_SIZE, boundary[j].y / TILE_SIZE);
        if on_segment((xi, yi), (xj, yj), (px, py)) {
            return true;
        }
        if ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Whether `p` lies on the segment `a`-`b`, within a small tolerance.
fn on_segment(a: (f32, f32), b: (f32, f32), p: (f32, f32)) -> bool {
    const EPS: f32 = 1e-4;
    let cross = (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0);
    if cross.abs() > EPS {
        return false;
    }
    p.0 >= a.0.min(b.0) - EPS
        && p.0 <= a.0.max(b.0) + EPS
        && p.1 >= a.1.min(b.1) - EPS
        && p.1 <= a.1.max(b.1) + EPS
}

/// Test-friendly region backed by an explicit set of walkable cells.
///
/// Containment floors the queried position to its cell, which makes edge
/// behavior exact in tests that need a predicate accepting precisely a
/// known set of tiles.
#[derive(Debug, Clone, Default)]
pub struct MaskRegion {
    id: RegionId,
    boundary: Vec<PixelPoint>,
    cells: AHashSet<TileCell>,
    properties: RegionProperties,
    members: AHashSet<AgentId>,
}

impl MaskRegion {
    /// Creates an empty mask region.
    #[must_use]
    pub fn new(id: RegionId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Sets the authored boundary (pixel units).
    #[must_use]
    pub fn with_boundary(mut self, boundary: Vec<PixelPoint>) -> Self {
        self.boundary = boundary;
        self
    }

    /// Attaches authored properties.
    #[must_use]
    pub fn with_properties(mut self, properties: RegionProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Marks a single cell walkable.
    pub fn allow(&mut self, cell: TileCell) {
        self.cells.insert(cell);
    }

    /// Marks a rectangle of cells walkable.
    pub fn allow_rect(&mut self, x0: i32, y0: i32, w: i32, h: i32) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                self.cells.insert(TileCell::new(x, y));
            }
        }
    }
}

impl RegionMap for MaskRegion {
    fn id(&self) -> RegionId {
        self.id
    }

    fn contains(&self, pos: TilePos) -> bool {
        self.cells.contains(&pos.cell())
    }

    fn boundary(&self) -> &[PixelPoint] {
        &self.boundary
    }

    fn properties(&self) -> &RegionProperties {
        &self.properties
    }

    fn insert_member(&mut self, agent: AgentId) -> bool {
        self.members.insert(agent)
    }

    fn remove_member(&mut self, agent: AgentId) -> bool {
        self.members.remove(&agent)
    }

    fn member_count(&self) -> usize {
        self.members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side_tiles: f32) -> Region {
        let side = side_tiles * TILE_SIZE;
        Region::new(
            RegionId::new(1),
            vec![
                PixelPoint::new(0.0, 0.0),
                PixelPoint::new(side, 0.0),
                PixelPoint::new(side, side),
                PixelPoint::new(0.0, side),
            ],
        )
    }

    #[test]
    fn test_polygon_contains_interior_and_exterior() {
        let region = square(4.0);
        assert!(region.contains(TilePos::new(2.0, 2.0)));
        assert!(region.contains(TilePos::new(0.5, 3.5)));
        assert!(!region.contains(TilePos::new(-1.0, 2.0)));
        assert!(!region.contains(TilePos::new(2.0, 4.5)));
    }

    #[test]
    fn test_polygon_boundary_points_count_as_inside() {
        let region = square(2.0);
        assert!(region.contains(TilePos::new(0.0, 0.0)));
        assert!(region.contains(TilePos::new(2.0, 1.0)));
        assert!(region.contains(TilePos::new(1.0, 2.0)));
    }

    #[test]
    fn test_degenerate_polygon_contains_nothing() {
        let region = Region::new(
            RegionId::new(2),
            vec![PixelPoint::new(0.0, 0.0), PixelPoint::new(16.0, 0.0)],
        );
        assert!(!region.contains(TilePos::new(0.0, 0.0)));
    }

    #[test]
    fn test_l_shaped_polygon() {
        // 4x4 square with the top-right 2x2 corner cut out.
        let s = TILE_SIZE;
        let region = Region::new(
            RegionId::new(3),
            vec![
                PixelPoint::new(0.0, 0.0),
                PixelPoint::new(2.0 * s, 0.0),
                PixelPoint::new(2.0 * s, 2.0 * s),
                PixelPoint::new(4.0 * s, 2.0 * s),
                PixelPoint::new(4.0 * s, 4.0 * s),
                PixelPoint::new(0.0, 4.0 * s),
            ],
        );
        assert!(region.contains(TilePos::new(1.0, 1.0)));
        assert!(region.contains(TilePos::new(3.0, 3.0)));
        assert!(!region.contains(TilePos::new(3.0, 1.0)));
    }

    #[test]
    fn test_membership_insert_remove_idempotent() {
        let mut region = square(2.0);
        let id = AgentId::new();

        assert!(region.insert_member(id));
        assert!(!region.insert_member(id));
        assert_eq!(region.member_count(), 1);

        assert!(region.remove_member(id));
        assert!(!region.remove_member(id));
        assert_eq!(region.member_count(), 0);
    }

    #[test]
    fn test_mask_region_contains_exact_cells() {
        let mut region = MaskRegion::new(RegionId::new(4));
        region.allow_rect(0, 0, 2, 2);

        assert!(region.contains(TilePos::new(0.5, 1.5)));
        assert!(region.contains(TilePos::new(1.0, 1.0)));
        assert!(!region.contains(TilePos::new(2.0, 1.0)));
        assert!(!region.contains(TilePos::new(-0.1, 0.0)));
    }
}
