//! Sprite placement against a chunked render world.
//!
//! The simulation owns positions in tile units; the renderer owns chunks of
//! pixel-space layers. This module is the one-way boundary between them:
//! given an agent, compute which chunk should draw it, where, and with what
//! decorations. Placement is best-effort: an agent standing in a chunk the
//! renderer has not loaded simply produces nothing this frame.

use meander_common::{PixelPoint, TilePos, CHUNK_SIZE, TILE_SIZE};

use crate::agent::{Agent, AgentKind};
use crate::config::SimConfig;

/// Layer key agents are drawn on, above the ground tiles of their chunk.
pub const AGENT_LAYER: &str = "2X";

/// One render chunk, addressed on the chunk grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkRef {
    /// Chunk-grid X.
    pub x: i32,
    /// Chunk-grid Y.
    pub y: i32,
}

impl ChunkRef {
    /// The chunk containing a tile-unit position.
    #[must_use]
    pub fn containing(pos: TilePos) -> Self {
        Self {
            x: (pos.x / CHUNK_SIZE as f32).floor() as i32,
            y: (pos.y / CHUNK_SIZE as f32).floor() as i32,
        }
    }
}

/// Seam to the renderer's chunk store.
pub trait WorldView {
    /// Whether a chunk is loaded and can accept sprites.
    fn has_chunk(&self, chunk: ChunkRef) -> bool;
}

/// Drop-shadow ellipse drawn under hovering creatures, at ground level.
/// Center and radii are in tile units relative to the ground anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowEllipse {
    /// Center offset from the ground anchor.
    pub center: (f32, f32),
    /// Horizontal and vertical radii.
    pub radii: (f32, f32),
    /// Shadow opacity.
    pub opacity: f32,
}

impl ShadowEllipse {
    const UNDER_FLYER: Self = Self {
        center: (0.0, -0.5),
        radii: (2.0 / 3.0, 0.5),
        opacity: 0.5,
    };
}

/// Crop rectangle for half-submerged swimmers, in tile units relative to
/// the pixel anchor. Everything outside the rectangle is clipped, hiding
/// the sprite's lower half under the water surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskRect {
    /// Top-left corner offset from the anchor.
    pub origin: (f32, f32),
    /// Width and height.
    pub size: (f32, f32),
}

impl MaskRect {
    const WATERLINE: Self = Self {
        origin: (-2.0, -2.75),
        size: (4.0, 2.0),
    };
}

/// Everything the renderer needs to draw one agent this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Chunk whose `AGENT_LAYER` receives the sprite.
    pub chunk: ChunkRef,
    /// Anchor in world pixel units: bottom-center of the occupied tile.
    pub pixel: PixelPoint,
    /// Depth-sort key within the layer, derived from the tile row.
    pub z_index: i32,
    /// Texture frame name.
    pub frame: String,
    /// Horizontal scale sign.
    pub flip_x: f32,
    /// Fade opacity.
    pub opacity: f32,
    /// Drop shadow for hovering creatures.
    pub shadow: Option<ShadowEllipse>,
    /// Waterline crop for swimmers.
    pub mask: Option<MaskRect>,
}

/// Computes the render placement for `agent`, or `None` when the owning
/// chunk is not loaded.
///
/// The hover offset shifts the drawn pixel only; chunk ownership and depth
/// sorting stay anchored to the logical position so a hovering creature
/// still sorts against the tile row it stands over.
pub fn place<W: WorldView>(agent: &Agent, config: &SimConfig, world: &W) -> Option<Placement> {
    let pos = agent.position();
    let chunk = ChunkRef::containing(pos);
    if !world.has_chunk(chunk) {
        return None;
    }

    let (ox, oy) = agent.offset();
    let (rx, ry) = (pos.x + ox, pos.y + oy);
    let sprite = agent.sprite();

    let is_creature = agent.kind() == AgentKind::Creature;
    let shadow = (is_creature && config.flying.contains(agent.name()))
        .then_some(ShadowEllipse::UNDER_FLYER);
    let mask =
        (is_creature && config.swimmers.contains(agent.name())).then_some(MaskRect::WATERLINE);

    Some(Placement {
        chunk,
        pixel: PixelPoint::new((rx + 0.5) * TILE_SIZE, (ry + 1.0) * TILE_SIZE),
        z_index: pos.y.ceil() as i32 * CHUNK_SIZE,
        frame: sprite.frame.clone(),
        flip_x: sprite.flip_x,
        opacity: sprite.opacity,
        shadow,
        mask,
    })
}
