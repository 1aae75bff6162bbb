//! Owns every region and agent and drives them frame by frame.
//!
//! The manager holds the shared clock and RNG, and updates agents in spawn
//! order so a seeded run replays identically. Agents that expire during an
//! update remove themselves from their region and are reaped from the
//! manager in the same frame.

use ahash::AHashMap;
use fastrand::Rng;
use meander_common::{AgentId, RegionId};
use thiserror::Error;
use tracing::{debug, info};

use crate::agent::{Agent, AgentKind};
use crate::animation::FrameCatalog;
use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::movement::Pattern;
use crate::placement::{self, Placement, WorldView};
use crate::region::{Region, RegionMap};

/// Errors from manager operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgentError {
    /// No agent with this ID is alive.
    #[error("agent {} not found", .0.raw())]
    NotFound(AgentId),
    /// No region with this ID has been registered.
    #[error("region {} not found", .0.raw())]
    RegionNotFound(RegionId),
}

/// Result alias for manager operations.
pub type AgentResult<T> = Result<T, AgentError>;

/// Container driving all regions and agents.
#[derive(Debug)]
pub struct AgentManager {
    config: SimConfig,
    clock: SimClock,
    rng: Rng,
    regions: AHashMap<RegionId, Region>,
    agents: AHashMap<AgentId, Agent>,
    /// Spawn order; the per-frame update walks this so every agent receives
    /// the same RNG draws on every seeded run.
    order: Vec<AgentId>,
}

impl AgentManager {
    /// Creates a manager with an entropy-seeded RNG.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        let rng = Rng::new();
        Self::with_rng(config, rng)
    }

    /// Creates a manager with a fixed RNG seed for reproducible runs.
    #[must_use]
    pub fn with_seed(config: SimConfig, seed: u64) -> Self {
        Self::with_rng(config, Rng::with_seed(seed))
    }

    fn with_rng(config: SimConfig, rng: Rng) -> Self {
        let clock = SimClock::new(config.frames_per_tick);
        Self {
            config,
            clock,
            rng,
            regions: AHashMap::new(),
            agents: AHashMap::new(),
            order: Vec::new(),
        }
    }

    /// Registers a region, replacing any previous region with the same ID.
    pub fn insert_region(&mut self, region: Region) {
        info!(region = region.id().raw(), "registered region");
        self.regions.insert(region.id(), region);
    }

    /// Returns a registered region.
    #[must_use]
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(&id)
    }

    /// Spawns an agent into a registered region and returns its ID.
    pub fn spawn(
        &mut self,
        region_id: RegionId,
        kind: AgentKind,
        name: impl Into<String>,
        pattern: Pattern,
    ) -> AgentResult<AgentId> {
        let region = self
            .regions
            .get_mut(&region_id)
            .ok_or(AgentError::RegionNotFound(region_id))?;
        let agent = Agent::new(region, kind, name, pattern, &self.config, &mut self.rng);
        let id = agent.id();
        self.agents.insert(id, agent);
        self.order.push(id);
        Ok(id)
    }

    /// Removes an agent immediately, unregistering it from its region.
    pub fn despawn(&mut self, id: AgentId) -> AgentResult<()> {
        let mut agent = self.agents.remove(&id).ok_or(AgentError::NotFound(id))?;
        self.order.retain(|&o| o != id);
        if let Some(region) = self.regions.get_mut(&agent.region_id()) {
            agent.despawn(region);
        }
        Ok(())
    }

    /// Returns an alive agent.
    #[must_use]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// Number of alive agents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether no agents are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Iterates over alive agents in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Returns the shared clock.
    #[must_use]
    pub const fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Advances the simulation by one render frame, reaping agents that
    /// expired. Returns the number of agents reaped.
    pub fn update(&mut self, catalog: &FrameCatalog) -> usize {
        let tick_boundary = self.clock.advance();
        let regions = &mut self.regions;
        let agents = &mut self.agents;
        let rng = &mut self.rng;
        let config = &self.config;

        let mut dead = Vec::new();
        for &id in &self.order {
            let Some(agent) = agents.get_mut(&id) else {
                continue;
            };
            let Some(region) = regions.get_mut(&agent.region_id()) else {
                continue;
            };
            if !agent.update(region, tick_boundary, catalog, config, rng) {
                dead.push(id);
            }
        }
        for id in &dead {
            self.agents.remove(id);
            debug!(agent = id.raw(), "reaped expired agent");
        }
        self.order.retain(|id| !dead.contains(id));
        dead.len()
    }

    /// Collects render placements for every agent standing in a loaded
    /// chunk.
    #[must_use]
    pub fn placements<W: WorldView>(&self, world: &W) -> Vec<Placement> {
        self.agents
            .values()
            .filter_map(|agent| placement::place(agent, &self.config, world))
            .collect()
    }
}
