//! Per-tick steering decisions and per-frame movement application.
//!
//! Steering is decided only at tick boundaries through an explicit
//! transition function over the agent's pattern. The decided direction is a
//! request: position advances in small per-frame steps, and each step is
//! individually rejected when the tile one unit ahead fails containment
//! (the normal "wall bump" path, which still animates the walk texture).

use fastrand::Rng;
use meander_common::TilePos;
use serde::{Deserialize, Serialize};

use crate::region::RegionMap;
use crate::track::Track;

/// Facing / movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Negative Y
    Up,
    /// Positive X
    Right,
    /// Positive Y
    Down,
    /// Negative X
    Left,
}

impl Facing {
    /// Frame-name fragment for this facing.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Facing::Up => "up",
            Facing::Right => "right",
            Facing::Down => "down",
            Facing::Left => "left",
        }
    }

    /// Unit step in tile units.
    #[must_use]
    pub const fn step(self) -> (f32, f32) {
        match self {
            Facing::Up => (0.0, -1.0),
            Facing::Right => (1.0, 0.0),
            Facing::Down => (0.0, 1.0),
            Facing::Left => (-1.0, 0.0),
        }
    }

    /// Horizontal-scale sign to use when a directional frame is missing.
    /// Left/right sprites are frequently mirrored rather than separately
    /// authored; up/down have no mirror.
    #[must_use]
    pub const fn mirror(self) -> Option<f32> {
        match self {
            Facing::Left => Some(1.0),
            Facing::Right => Some(-1.0),
            Facing::Up | Facing::Down => None,
        }
    }

    /// Whether this facing moves along the X axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Facing::Left | Facing::Right)
    }
}

/// Behavior pattern an agent is assigned for life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    /// Stands still and never turns.
    Fixed,
    /// Follows the boundary track, wrapping around.
    Loop,
    /// Follows the boundary track back and forth.
    Patrol,
    /// Random idle/step in one of four directions each tick.
    Wander,
    /// Random facing changes each tick, no movement.
    Lookaround,
}

/// Outcome of a tick-boundary behavior decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Steering {
    /// Requested facing, if any.
    pub facing: Option<Facing>,
    /// When set, the facing only changes the texture, never position.
    pub look_only: bool,
}

/// Decides the requested direction for one behavior tick.
pub fn decide(pattern: Pattern, track: &mut Track, position: TilePos, rng: &mut Rng) -> Steering {
    match pattern {
        Pattern::Fixed => Steering::default(),
        Pattern::Loop | Pattern::Patrol => follow_track(track, position),
        Pattern::Wander => Steering {
            facing: five_way(rng.f32()),
            look_only: false,
        },
        Pattern::Lookaround => Steering {
            facing: five_way(rng.f32()),
            look_only: true,
        },
    }
}

/// Advances the track cursor one waypoint and steers toward it, horizontal
/// component first. No-op on an empty track (degenerate boundary).
fn follow_track(track: &mut Track, position: TilePos) -> Steering {
    let Some(target) = track.advance() else {
        return Steering::default();
    };
    let dx = target.x as f32 - position.x;
    let dy = target.y as f32 - position.y;
    let facing = if dx > 0.0 {
        Some(Facing::Right)
    } else if dx < 0.0 {
        Some(Facing::Left)
    } else if dy < 0.0 {
        Some(Facing::Up)
    } else if dy > 0.0 {
        Some(Facing::Down)
    } else {
        None
    };
    Steering {
        facing,
        look_only: false,
    }
}

/// Maps one uniform draw in [0, 1) onto five equal buckets:
/// idle, left, right, up, down.
#[must_use]
pub fn five_way(roll: f32) -> Option<Facing> {
    match (roll / 0.2) as u32 {
        0 => None,
        1 => Some(Facing::Left),
        2 => Some(Facing::Right),
        3 => Some(Facing::Up),
        _ => Some(Facing::Down),
    }
}

/// Result of applying a steering for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Position after the step (unchanged on a wall bump).
    pub position: TilePos,
    /// Whether the position actually changed.
    pub moved: bool,
}

/// Attempts one per-frame step of `delta` tile units along `facing`.
///
/// The step commits only if the tile one full unit ahead satisfies the
/// region's containment test; otherwise the position is left untouched.
pub fn apply_step<R: RegionMap>(
    position: TilePos,
    facing: Facing,
    delta: f32,
    region: &R,
) -> StepOutcome {
    let (ux, uy) = facing.step();
    let probe = position.offset(ux, uy);
    if region.contains(probe) {
        StepOutcome {
            position: position.offset(ux * delta, uy * delta),
            moved: true,
        }
    } else {
        StepOutcome {
            position,
            moved: false,
        }
    }
}

/// Three-phase walk-cycle index derived from the fractional tile progress
/// along one axis. A full tile traversal cycles through all three phases
/// twice.
#[must_use]
pub fn walk_phase(coord: f32) -> u8 {
    let frac = (coord - coord.floor()).abs();
    ((frac / (1.0 / 6.0)).round() as u32 % 3) as u8
}
