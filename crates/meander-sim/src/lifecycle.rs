//! Fade-driven lifecycle for transient agents.
//!
//! Lifetime decrements continuously every frame while the fade opacity
//! follows it: multiplicative fade-in up to full opacity, multiplicative
//! fade-out once the remaining lifetime drops under one tick, and
//! self-removal gated on the next tick boundary after expiry. Persistent
//! agents carry an infinite lifetime and never expire.

/// Opacity multiplier applied each frame while fading out.
pub const FADE_OUT_FACTOR: f32 = 0.8;
/// Opacity multiplier applied each frame while fading in.
pub const FADE_IN_FACTOR: f32 = 1.25;
/// Seed opacity so a fade-in can leave exactly zero.
pub const FADE_SEED: f32 = 0.03;
/// Remaining lifetime below which the fade-out begins.
pub const FADE_OUT_THRESHOLD: f32 = 1.0;

/// Remaining lifetime and fade policy for one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifecycle {
    lifetime: f32,
}

impl Lifecycle {
    /// A lifecycle that never expires.
    #[must_use]
    pub const fn persistent() -> Self {
        Self {
            lifetime: f32::INFINITY,
        }
    }

    /// A lifecycle expiring after `lifetime` time units.
    #[must_use]
    pub const fn transient(lifetime: f32) -> Self {
        Self { lifetime }
    }

    /// Remaining time units.
    #[must_use]
    pub const fn remaining(&self) -> f32 {
        self.lifetime
    }

    /// Whether this lifecycle can ever expire.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.lifetime.is_infinite()
    }

    /// Advances the lifetime by one frame's `delta` and fades `opacity`
    /// toward its target. Returns the new opacity, always in [0, 1].
    pub fn advance(&mut self, delta: f32, opacity: f32) -> f32 {
        self.lifetime -= delta;
        if self.lifetime <= FADE_OUT_THRESHOLD {
            opacity * FADE_OUT_FACTOR
        } else if opacity < 1.0 {
            let grown = (opacity * FADE_IN_FACTOR).min(1.0);
            // Multiplying exactly zero would never leave zero.
            if grown == 0.0 {
                FADE_SEED
            } else {
                grown
            }
        } else {
            opacity
        }
    }

    /// Whether the agent should remove itself at the next tick boundary.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.lifetime <= 0.0
    }
}
