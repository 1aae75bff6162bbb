//! The simulated agent entity.
//!
//! An agent is constructed against exactly one region: the spawn anchor and
//! waypoint track are computed synchronously in the constructor, and the
//! agent registers itself in the region's membership set. From then on it
//! is driven once per rendered frame; behavior re-evaluation happens only
//! on tick boundaries. Expired transient agents remove themselves from the
//! membership set, and that removal is idempotent.

use fastrand::Rng;
use meander_common::{AgentId, RegionId, TilePos};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::animation::{FrameCatalog, SpriteState};
use crate::config::SimConfig;
use crate::lifecycle::Lifecycle;
use crate::movement::{self, Facing, Pattern, Steering};
use crate::region::RegionMap;
use crate::spawn;
use crate::track::Track;

/// Broad agent category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// Persistent inhabitant with authored directional frames.
    Person,
    /// Transient creature: always wanders, fades out and self-removes.
    Creature,
}

/// Cosmetic rarity variant for creatures, rolled once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Common coloring.
    Regular,
    /// Rare coloring.
    Shiny,
}

impl Variant {
    /// Frame-name prefix for this variant.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Variant::Regular => "regular",
            Variant::Shiny => "shiny",
        }
    }
}

/// Creature lifetimes are drawn once as `floor(12 + r * 28)` time units.
const LIFETIME_BASE: f32 = 12.0;
const LIFETIME_SPREAD: f32 = 28.0;

/// One simulated agent.
#[derive(Debug)]
pub struct Agent {
    id: AgentId,
    name: String,
    kind: AgentKind,
    pattern: Pattern,
    region: RegionId,
    position: TilePos,
    steering: Steering,
    track: Track,
    lifecycle: Lifecycle,
    variant: Variant,
    sprite: SpriteState,
    /// Render offset in tile units (flying creatures hover one tile up).
    offset: (f32, f32),
    despawned: bool,
}

impl Agent {
    /// Creates an agent inside `region`, computing its spawn anchor and
    /// waypoint track synchronously and registering it as a member.
    ///
    /// Creatures override the requested pattern to `Wander`, roll a finite
    /// lifetime, and roll the shiny variant with `config.shiny_rate`.
    pub fn new<R: RegionMap>(
        region: &mut R,
        kind: AgentKind,
        name: impl Into<String>,
        pattern: Pattern,
        config: &SimConfig,
        rng: &mut Rng,
    ) -> Self {
        let name = name.into();
        let mut pattern = pattern;
        let mut lifecycle = Lifecycle::persistent();
        let mut variant = Variant::Regular;

        if kind == AgentKind::Creature {
            variant = if rng.f32() < config.shiny_rate {
                Variant::Shiny
            } else {
                Variant::Regular
            };
            lifecycle = Lifecycle::transient((LIFETIME_BASE + rng.f32() * LIFETIME_SPREAD).floor());
            pattern = Pattern::Wander;
        }

        let frame = match kind {
            AgentKind::Creature => format!("{}/{}", variant.prefix(), name),
            AgentKind::Person => {
                let facing = region
                    .properties()
                    .directions
                    .first()
                    .copied()
                    .unwrap_or(Facing::Down);
                format!("{}_{}_0", name, facing.suffix())
            }
        };

        let anchor = spawn::find_spawn(region, rng);
        let track = Track::build(region, pattern);
        let offset = if kind == AgentKind::Creature && config.flying.contains(&name) {
            (0.0, -1.0)
        } else {
            (0.0, 0.0)
        };

        let id = AgentId::new();
        region.insert_member(id);
        debug!(agent = %name, ?kind, "loaded agent");

        Self {
            id,
            name,
            kind,
            pattern,
            region: region.id(),
            position: anchor.pos(),
            steering: Steering::default(),
            track,
            lifecycle,
            variant,
            sprite: SpriteState::new(frame),
            offset,
            despawned: false,
        }
    }

    /// Returns the agent's unique ID.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Returns the agent's identity name (frame-name stem).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the agent category.
    #[must_use]
    pub const fn kind(&self) -> AgentKind {
        self.kind
    }

    /// Returns the behavior pattern (after any creature override).
    #[must_use]
    pub const fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Returns the ID of the region this agent lives in.
    #[must_use]
    pub const fn region_id(&self) -> RegionId {
        self.region
    }

    /// Returns the continuous position in tile units.
    #[must_use]
    pub const fn position(&self) -> TilePos {
        self.position
    }

    /// Returns the currently requested facing, if any.
    #[must_use]
    pub const fn facing(&self) -> Option<Facing> {
        self.steering.facing
    }

    /// Returns the sprite appearance state.
    #[must_use]
    pub const fn sprite(&self) -> &SpriteState {
        &self.sprite
    }

    /// Returns the rolled variant.
    #[must_use]
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// Returns the waypoint track.
    #[must_use]
    pub const fn track(&self) -> &Track {
        &self.track
    }

    /// Returns the remaining lifetime in time units.
    #[must_use]
    pub const fn lifetime(&self) -> f32 {
        self.lifecycle.remaining()
    }

    /// Returns the render offset in tile units.
    #[must_use]
    pub const fn offset(&self) -> (f32, f32) {
        self.offset
    }

    /// Returns whether this agent has removed itself.
    #[must_use]
    pub const fn is_despawned(&self) -> bool {
        self.despawned
    }

    /// Per-frame update. `tick_boundary` gates behavior re-evaluation.
    ///
    /// Returns `false` once the agent has expired and removed itself from
    /// the region's membership set; the caller should drop it.
    pub fn update<R: RegionMap>(
        &mut self,
        region: &mut R,
        tick_boundary: bool,
        catalog: &FrameCatalog,
        config: &SimConfig,
        rng: &mut Rng,
    ) -> bool {
        if self.despawned {
            return false;
        }

        self.sprite.opacity = self.lifecycle.advance(config.delta, self.sprite.opacity);

        if tick_boundary {
            if self.lifecycle.expired() {
                self.despawn(region);
                return false;
            }
            self.steering = movement::decide(self.pattern, &mut self.track, self.position, rng);
        }

        self.apply_steering(region, catalog, config.delta);
        true
    }

    /// Removes the agent from its region's membership set. Idempotent:
    /// repeated calls do nothing.
    pub fn despawn<R: RegionMap>(&mut self, region: &mut R) {
        if self.despawned {
            return;
        }
        self.despawned = true;
        region.remove_member(self.id);
        debug!(agent = %self.name, "unloaded agent");
    }

    /// Applies the current steering for one frame: a containment-gated
    /// positional step plus the walk/look texture update. The texture
    /// changes even when the step is rejected at a wall, and the walk phase
    /// samples the position before the step.
    fn apply_steering<R: RegionMap>(&mut self, region: &R, catalog: &FrameCatalog, delta: f32) {
        let Some(facing) = self.steering.facing else {
            return;
        };

        let pre_step = self.position;
        if !self.steering.look_only {
            let outcome = movement::apply_step(self.position, facing, delta, region);
            self.position = outcome.position;
        }

        let suffix = if self.steering.look_only {
            format!("{}_0", facing.suffix())
        } else {
            let phase = if facing.is_horizontal() {
                movement::walk_phase(pre_step.x)
            } else {
                movement::walk_phase(pre_step.y)
            };
            format!("{}_{}", facing.suffix(), phase)
        };
        let choice = catalog.resolve(&self.name, Some(&suffix), facing.mirror());
        self.sprite.apply(choice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{MaskRegion, Region, RegionProperties};
    use meander_common::{PixelPoint, RegionId, TILE_SIZE};

    fn square_region(tiles: f32) -> Region {
        let side = tiles * TILE_SIZE;
        Region::new(
            RegionId::new(1),
            vec![
                PixelPoint::new(0.0, 0.0),
                PixelPoint::new(side, 0.0),
                PixelPoint::new(side, side),
                PixelPoint::new(0.0, side),
            ],
        )
    }

    #[test]
    fn test_creature_is_forced_to_wander() {
        let mut region = square_region(4.0);
        let mut rng = fastrand::Rng::with_seed(11);
        let config = SimConfig::default();

        let agent = Agent::new(
            &mut region,
            AgentKind::Creature,
            "koi",
            Pattern::Loop,
            &config,
            &mut rng,
        );
        assert_eq!(agent.pattern(), Pattern::Wander);
        assert!(agent.track().is_empty());
    }

    #[test]
    fn test_creature_lifetime_in_range() {
        let mut region = square_region(4.0);
        let config = SimConfig::default();

        for seed in 0..64 {
            let mut rng = fastrand::Rng::with_seed(seed);
            let agent = Agent::new(
                &mut region,
                AgentKind::Creature,
                "koi",
                Pattern::Fixed,
                &config,
                &mut rng,
            );
            let lifetime = agent.lifetime();
            assert!((12.0..40.0).contains(&lifetime));
            assert!((lifetime - lifetime.floor()).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_person_is_persistent() {
        let mut region = square_region(4.0);
        let mut rng = fastrand::Rng::with_seed(11);
        let config = SimConfig::default();

        let agent = Agent::new(
            &mut region,
            AgentKind::Person,
            "villager",
            Pattern::Fixed,
            &config,
            &mut rng,
        );
        assert!(agent.lifetime().is_infinite());
    }

    #[test]
    fn test_shiny_rate_extremes() {
        let config_never = SimConfig::default().with_shiny_rate(0.0);
        let config_always = SimConfig::default().with_shiny_rate(1.0);

        for seed in 0..16 {
            let mut region = square_region(4.0);
            let mut rng = fastrand::Rng::with_seed(seed);
            let agent = Agent::new(
                &mut region,
                AgentKind::Creature,
                "koi",
                Pattern::Fixed,
                &config_never,
                &mut rng,
            );
            assert_eq!(agent.variant(), Variant::Regular);
            assert!(agent.sprite().frame.starts_with("regular/"));

            let mut rng = fastrand::Rng::with_seed(seed);
            let agent = Agent::new(
                &mut region,
                AgentKind::Creature,
                "koi",
                Pattern::Fixed,
                &config_always,
                &mut rng,
            );
            assert_eq!(agent.variant(), Variant::Shiny);
            assert!(agent.sprite().frame.starts_with("shiny/"));
        }
    }

    #[test]
    fn test_person_initial_frame_uses_region_directions() {
        let mut region = square_region(4.0).with_properties(RegionProperties {
            directions: vec![Facing::Left, Facing::Down],
        });
        let mut rng = fastrand::Rng::with_seed(5);
        let config = SimConfig::default();

        let agent = Agent::new(
            &mut region,
            AgentKind::Person,
            "villager",
            Pattern::Fixed,
            &config,
            &mut rng,
        );
        assert_eq!(agent.sprite().frame, "villager_left_0");

        // Without authored directions the default facing is down.
        let mut plain = square_region(4.0);
        let agent = Agent::new(
            &mut plain,
            AgentKind::Person,
            "villager",
            Pattern::Fixed,
            &config,
            &mut rng,
        );
        assert_eq!(agent.sprite().frame, "villager_down_0");
    }

    #[test]
    fn test_despawn_is_idempotent() {
        let mut region = square_region(4.0);
        let mut rng = fastrand::Rng::with_seed(2);
        let config = SimConfig::default();

        let mut agent = Agent::new(
            &mut region,
            AgentKind::Person,
            "villager",
            Pattern::Fixed,
            &config,
            &mut rng,
        );
        assert_eq!(region.member_count(), 1);

        agent.despawn(&mut region);
        assert_eq!(region.member_count(), 0);
        assert!(agent.is_despawned());

        // Second call removes nothing and does not panic.
        agent.despawn(&mut region);
        assert_eq!(region.member_count(), 0);
    }

    #[test]
    fn test_fixed_agent_never_moves() {
        let mut region = square_region(4.0);
        let mut rng = fastrand::Rng::with_seed(8);
        let config = SimConfig::default();
        let catalog = FrameCatalog::new();

        let mut agent = Agent::new(
            &mut region,
            AgentKind::Person,
            "statue",
            Pattern::Fixed,
            &config,
            &mut rng,
        );
        let start = agent.position();
        for frame in 0..32 {
            let boundary = frame % config.frames_per_tick == 0;
            agent.update(&mut region, boundary, &catalog, &config, &mut rng);
        }
        assert_eq!(agent.position(), start);
        assert_eq!(agent.facing(), None);
    }

    #[test]
    fn test_wall_bump_keeps_position_but_animates() {
        // Single walkable cell: every step is rejected.
        let mut region = MaskRegion::new(RegionId::new(9)).with_boundary(vec![
            PixelPoint::new(0.0, 0.0),
            PixelPoint::new(TILE_SIZE, 0.0),
            PixelPoint::new(TILE_SIZE, TILE_SIZE),
            PixelPoint::new(0.0, TILE_SIZE),
        ]);
        region.allow(meander_common::TileCell::new(0, 0));
        let mut rng = fastrand::Rng::with_seed(21);
        let config = SimConfig::default();
        let catalog =
            FrameCatalog::from_names(["koi_up_0", "koi_down_0", "koi_left_0", "koi_right_0"]);

        let mut agent = Agent::new(
            &mut region,
            AgentKind::Creature,
            "koi",
            Pattern::Fixed,
            &config,
            &mut rng,
        );
        let start = agent.position();
        let initial_frame = agent.sprite().frame.clone();

        let mut frame_changed = false;
        for frame in 0..256 {
            let boundary = frame % config.frames_per_tick == 0;
            if !agent.update(&mut region, boundary, &catalog, &config, &mut rng) {
                break;
            }
            frame_changed |= agent.sprite().frame != initial_frame;
        }
        assert_eq!(agent.position(), start);
        assert!(frame_changed);
    }

    #[test]
    fn test_walk_phase_samples_position_before_the_step() {
        let mut region = square_region(8.0);
        let mut rng = fastrand::Rng::with_seed(13);
        let config = SimConfig::default();
        let catalog = FrameCatalog::from_names(["villager_right_0", "villager_right_1"]);

        let mut agent = Agent::new(
            &mut region,
            AgentKind::Person,
            "villager",
            Pattern::Fixed,
            &config,
            &mut rng,
        );
        agent.position = TilePos::new(1.0, 1.0);
        agent.steering = Steering {
            facing: Some(Facing::Right),
            look_only: false,
        };

        // The frame reflects the tile-aligned position the step left, not
        // the 0.125 it arrived at.
        agent.apply_steering(&region, &catalog, config.delta);
        assert_eq!(agent.sprite().frame, "villager_right_0");
        assert!((agent.position().x - 1.125).abs() < f32::EPSILON);

        // The next frame picks up the advanced phase.
        agent.apply_steering(&region, &catalog, config.delta);
        assert_eq!(agent.sprite().frame, "villager_right_1");
    }

    #[test]
    fn test_expired_creature_removes_itself() {
        let mut region = square_region(4.0);
        let mut rng = fastrand::Rng::with_seed(4);
        let config = SimConfig::default();
        let catalog = FrameCatalog::new();

        let mut agent = Agent::new(
            &mut region,
            AgentKind::Creature,
            "koi",
            Pattern::Fixed,
            &config,
            &mut rng,
        );
        assert_eq!(region.member_count(), 1);

        // Lifetimes cap below 40 time units; at delta per frame this is
        // certain to expire within 40 / delta frames plus one tick.
        let max_frames = (40.0 / config.delta) as u32 + config.frames_per_tick * 2;
        let mut alive = true;
        for frame in 0..max_frames {
            let boundary = frame % config.frames_per_tick == 0;
            if !agent.update(&mut region, boundary, &catalog, &config, &mut rng) {
                alive = false;
                break;
            }
        }
        assert!(!alive);
        assert!(agent.is_despawned());
        assert_eq!(region.member_count(), 0);
    }
}
