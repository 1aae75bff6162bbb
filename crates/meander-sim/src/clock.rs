//! Frame/tick scheduler.
//!
//! Behavior decisions happen on discrete ticks while movement and fades run
//! every render frame. The clock counts frames and reports tick boundaries
//! with a modulo gate, so behavior cadence is independent of frame rate.

use serde::{Deserialize, Serialize};

/// Counts render frames and reports discrete behavior ticks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimClock {
    frame: u64,
    frames_per_tick: u32,
}

impl SimClock {
    /// Creates a clock ticking once every `frames_per_tick` frames.
    #[must_use]
    pub fn new(frames_per_tick: u32) -> Self {
        Self {
            frame: 0,
            frames_per_tick: frames_per_tick.max(1),
        }
    }

    /// Advances by one frame. Returns whether this frame is a tick boundary.
    ///
    /// The very first frame is a boundary, so agents make a behavior decision
    /// immediately after construction.
    pub fn advance(&mut self) -> bool {
        let boundary = self.frame % u64::from(self.frames_per_tick) == 0;
        self.frame += 1;
        boundary
    }

    /// Returns the number of frames advanced so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Returns the number of completed ticks.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.frame / u64::from(self.frames_per_tick)
    }
}
