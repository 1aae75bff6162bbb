//! Texture frame selection with mirror fallback.
//!
//! Frame names join an agent's identity with a directional/phase suffix,
//! e.g. `villager_left_1`. Left/right frames are frequently mirrored rather
//! than separately authored, so a missing frame falls back to flipping the
//! sprite's horizontal scale sign instead of failing.

use ahash::AHashSet;

/// The set of frame names available in the loaded texture atlas.
#[derive(Debug, Clone, Default)]
pub struct FrameCatalog {
    frames: AHashSet<String>,
}

impl FrameCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog from an iterator of frame names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            frames: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Registers a frame name.
    pub fn insert(&mut self, name: impl Into<String>) {
        self.frames.insert(name.into());
    }

    /// Returns whether a frame exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.frames.contains(name)
    }

    /// Resolves the frame for `name` with an optional `_suffix` joined on.
    ///
    /// Returns the frame when it exists; otherwise falls back to the mirror
    /// hint when one is provided. A missing frame is never an error.
    #[must_use]
    pub fn resolve(&self, name: &str, suffix: Option<&str>, mirror: Option<f32>) -> FrameChoice {
        let frame = match suffix {
            Some(suffix) => format!("{name}_{suffix}"),
            None => name.to_owned(),
        };
        if self.frames.contains(&frame) {
            FrameChoice::Frame(frame)
        } else if let Some(flip) = mirror {
            FrameChoice::Mirror(flip.signum())
        } else {
            FrameChoice::Unchanged
        }
    }
}

/// How the sprite should realize a requested frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameChoice {
    /// Swap to this texture frame.
    Frame(String),
    /// Keep the current frame and set the horizontal scale sign.
    Mirror(f32),
    /// Frame missing and no mirror hint: keep everything as-is.
    Unchanged,
}

/// Mutable sprite appearance driven by the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteState {
    /// Current texture frame name.
    pub frame: String,
    /// Horizontal scale sign (+1 normal, -1 mirrored).
    pub flip_x: f32,
    /// Fade opacity in [0, 1]. Agents fade in from invisible.
    pub opacity: f32,
}

impl SpriteState {
    /// Creates a sprite state showing `frame`, fully transparent.
    pub fn new(frame: impl Into<String>) -> Self {
        Self {
            frame: frame.into(),
            flip_x: 1.0,
            opacity: 0.0,
        }
    }

    /// Applies a frame choice from the catalog.
    pub fn apply(&mut self, choice: FrameChoice) {
        match choice {
            FrameChoice::Frame(frame) => self.frame = frame,
            FrameChoice::Mirror(flip) => self.flip_x = flip,
            FrameChoice::Unchanged => {}
        }
    }
}
