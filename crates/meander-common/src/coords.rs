//! Coordinate types for pixel, tile, and cell positions.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Size of one tile in pixels. Region boundaries are authored in pixels;
/// everything the simulation touches is expressed in tile units.
pub const TILE_SIZE: f32 = 16.0;

/// Number of tiles along one side of a chunk.
pub const CHUNK_SIZE: i32 = 32;

/// Authored position in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct PixelPoint {
    /// X coordinate in pixels
    pub x: f32,
    /// Y coordinate in pixels
    pub y: f32,
}

impl PixelPoint {
    /// Creates a new pixel point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Converts to a continuous tile-unit position.
    #[must_use]
    pub fn to_tile(self) -> TilePos {
        TilePos::new(self.x / TILE_SIZE, self.y / TILE_SIZE)
    }
}

/// Continuous position in tile units (sub-tile interpolation lives here).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct TilePos {
    /// X coordinate in tile units
    pub x: f32,
    /// Y coordinate in tile units
    pub y: f32,
}

impl TilePos {
    /// Creates a new tile-unit position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the discrete cell this position falls in.
    #[must_use]
    pub fn cell(self) -> TileCell {
        TileCell::new(self.x.floor() as i32, self.y.floor() as i32)
    }

    /// Returns this position displaced by the given tile-unit deltas.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Discrete tile cell on the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct TileCell {
    /// X cell index
    pub x: i32,
    /// Y cell index
    pub y: i32,
}

impl TileCell {
    /// Creates a new tile cell.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this cell displaced by the given cell deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Returns the cell corner as a continuous tile-unit position.
    #[must_use]
    pub fn pos(self) -> TilePos {
        TilePos::new(self.x as f32, self.y as f32)
    }

    /// Chebyshev (chessboard) distance to another cell.
    #[must_use]
    pub const fn chebyshev(self, other: Self) -> i32 {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        if dx > dy {
            dx
        } else {
            dy
        }
    }
}
