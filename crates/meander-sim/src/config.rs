//! Simulation configuration.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// Tunable parameters for the agent simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Per-frame movement step in tile units. Also the per-frame lifetime
    /// decrement, so lifetimes are expressed in behavior ticks.
    pub delta: f32,
    /// Render frames per behavior tick.
    pub frames_per_tick: u32,
    /// Probability (0.0-1.0) that a creature resolves to the shiny variant.
    pub shiny_rate: f32,
    /// Creature names that hover above the ground. They render one tile up
    /// with a drop shadow underneath.
    pub flying: AHashSet<String>,
    /// Creature names rendered half-submerged behind a crop mask.
    pub swimmers: AHashSet<String>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // One full tile per tick at 8 frames per tick.
            delta: 0.125,
            frames_per_tick: 8,
            shiny_rate: 1.0 / 512.0,
            flying: AHashSet::new(),
            swimmers: AHashSet::new(),
        }
    }
}

impl SimConfig {
    /// Sets the shiny variant probability.
    #[must_use]
    pub fn with_shiny_rate(mut self, rate: f32) -> Self {
        self.shiny_rate = rate;
        self
    }

    /// Marks a creature name as flying.
    #[must_use]
    pub fn with_flying(mut self, name: impl Into<String>) -> Self {
        self.flying.insert(name.into());
        self
    }

    /// Marks a creature name as a swimmer.
    #[must_use]
    pub fn with_swimmer(mut self, name: impl Into<String>) -> Self {
        self.swimmers.insert(name.into());
        self
    }
}
