//! # Meander Common
//!
//! Common types and shared abstractions for Meander.
//!
//! This crate provides foundational types used across all Meander subsystems:
//! - Coordinate types (pixel, tile, cell)
//! - ID types (AgentId, RegionId)
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::ids::*;
}

pub use prelude::*;
