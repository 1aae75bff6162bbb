//! Waypoint track construction from region boundaries.
//!
//! Loop and patrol agents follow the region's boundary polygon one tile at a
//! time. Each boundary edge is rasterized into an axis-aligned staircase:
//! the full horizontal run first, then the full vertical run. Waypoints that
//! fail the region's containment test are dropped, which silently downgrades
//! a self-filtering boundary to a stationary agent.

use meander_common::TileCell;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::movement::Pattern;
use crate::region::RegionMap;

/// An ordered waypoint track with a wrapping cursor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Track {
    cells: Vec<TileCell>,
    index: usize,
}

impl Track {
    /// Builds the waypoint track for `pattern` from the region's boundary.
    ///
    /// Only `Loop` and `Patrol` build a track; every other pattern gets an
    /// empty one. `Patrol` appends a reversed copy of the validated
    /// waypoints (excluding both endpoints) so traversal runs back and
    /// forth; `Loop` drops a trailing waypoint equal to the first so
    /// wrapping never stalls on a duplicate.
    #[must_use]
    pub fn build<R: RegionMap>(region: &R, pattern: Pattern) -> Self {
        if !matches!(pattern, Pattern::Loop | Pattern::Patrol) {
            return Self::default();
        }

        let mut cells = rasterize(region);
        cells.retain(|cell| region.contains(cell.pos()));
        if cells.len() < 2 {
            debug!(region = region.id().raw(), "degenerate boundary, empty track");
            cells.clear();
            return Self { cells, index: 0 };
        }

        match pattern {
            Pattern::Patrol => {
                // Reversed middle section: skip the final waypoint (already
                // the turnaround) and stop before repeating the first.
                for i in (1..cells.len() - 1).rev() {
                    cells.push(cells[i]);
                }
            }
            Pattern::Loop => {
                if cells.first() == cells.last() {
                    cells.pop();
                }
            }
            _ => {}
        }

        Self { cells, index: 0 }
    }

    /// Returns whether the track has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// The ordered waypoints.
    #[must_use]
    pub fn cells(&self) -> &[TileCell] {
        &self.cells
    }

    /// Current cursor offset.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The waypoint under the cursor, if any.
    #[must_use]
    pub fn current(&self) -> Option<TileCell> {
        self.cells.get(self.index).copied()
    }

    /// Advances the cursor one waypoint, wrapping modulo the track length.
    /// Returns the new target waypoint, or `None` on an empty track.
    pub fn advance(&mut self) -> Option<TileCell> {
        if self.cells.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.cells.len();
        Some(self.cells[self.index])
    }
}

/// Rasterizes the closed boundary into a dense axis-aligned waypoint chain.
///
/// Starts at the first vertex and, per edge (including the closing edge back
/// to the first vertex), steps one tile at a time along the horizontal delta
/// then the vertical delta.
fn rasterize<R: RegionMap>(region: &R) -> Vec<TileCell> {
    let verts: Vec<TileCell> = region
        .boundary()
        .iter()
        .map(|p| p.to_tile().cell())
        .collect();
    let Some(&first) = verts.first() else {
        return Vec::new();
    };

    let mut cells = vec![first];
    let mut cursor = first;
    for k in 1..=verts.len() {
        let target = verts[k % verts.len()];
        let dx = target.x - cursor.x;
        let dy = target.y - cursor.y;
        for _ in 0..dx.abs() {
            cursor = cursor.offset(dx.signum(), 0);
            cells.push(cursor);
        }
        for _ in 0..dy.abs() {
            cursor = cursor.offset(0, dy.signum());
            cells.push(cursor);
        }
    }
    cells
}
