//! # Meander Sim
//!
//! Agent simulation core for Meander.
//!
//! This crate drives non-player agents inside polygon-bounded walkable
//! regions without an authored navigation mesh:
//! - Waypoint tracks rasterized from region boundaries (loop/patrol)
//! - Spawn anchoring with a deterministic nudge and a bounded relaxation walk
//! - Tick-gated steering decisions decoupled from the render frame rate
//! - Sub-tile walk-cycle phases and mirrored-frame fallback
//! - Fade-based lifecycle with self-removal for transient creatures
//! - Sprite placement against a chunked render world

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod agent;
pub mod animation;
pub mod clock;
pub mod config;
pub mod lifecycle;
pub mod manager;
pub mod movement;
pub mod placement;
pub mod region;
pub mod spawn;
pub mod track;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::agent::*;
    pub use crate::animation::*;
    pub use crate::clock::*;
    pub use crate::config::*;
    pub use crate::lifecycle::*;
    pub use crate::manager::*;
    pub use crate::movement::*;
    pub use crate::placement::*;
    pub use crate::region::*;
    pub use crate::spawn::*;
    pub use crate::track::*;
}

pub use prelude::*;
