//! Race coordination: owns the maze and the agents of one race, drives
//! per-tick updates, and turns finish signals into dense ranks. There is
//! no event bus; agents report arrivals through their `update` return
//! value and the coordinator does all bookkeeping inline.

use rand::RngCore;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use serde::Serialize;
use slotmap::SlotMap;

use crate::agent::{Agent, StepEvent};
use crate::config::SimConfig;
use crate::maze::Maze;
use crate::types::{AgentId, AgentKind, AgentStatus, Point};

/// One line of the final standings.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FinishRecord {
    pub kind: AgentKind,
    pub rank: u32,
    pub elapsed_ms: f64,
    pub is_player: bool,
}

/// Race-finished notification consumed by the presentation layer.
#[derive(Clone, Debug)]
pub struct RaceOutcome {
    /// Ordered by rank, covering the whole roster.
    pub standings: Vec<FinishRecord>,
    pub finish_order: Vec<AgentId>,
    pub player: AgentId,
}

pub struct RaceCoordinator {
    maze: Maze,
    config: SimConfig,
    agents: SlotMap<AgentId, Agent>,
    /// Creation order; also the deterministic tie-break for forced ends.
    roster: Vec<AgentId>,
    player: AgentId,
    finish_order: Vec<AgentId>,
    active: bool,
    elapsed_ms: f64,
    rng: ChaCha8Rng,
}

impl RaceCoordinator {
    pub fn new(maze: Maze, config: SimConfig, seed: u64) -> Self {
        Self {
            maze,
            config,
            agents: SlotMap::with_key(),
            roster: Vec::new(),
            player: AgentId::default(),
            finish_order: Vec::new(),
            active: false,
            elapsed_ms: 0.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Builds the roster: the flagged player agent of the requested kind
    /// plus distinct kinds from the configured pool, all at the start
    /// cell. Roster size is bounded by configuration and by how many
    /// distinct kinds exist.
    pub fn create_agents(&mut self, player_kind: AgentKind) {
        self.agents.clear();
        self.roster.clear();
        self.finish_order.clear();

        let start = self.maze.start();
        self.player = self.spawn_agent(player_kind, start, true);

        let pool = self.config.race.pool.clone();
        for kind in pool {
            if kind == player_kind || self.roster.len() >= self.config.race.roster_size {
                continue;
            }
            self.spawn_agent(kind, start, false);
        }
    }

    fn spawn_agent(&mut self, kind: AgentKind, start: Point, is_player: bool) -> AgentId {
        let profile = self.config.profile(kind);
        let seed = self.rng.next_u64();
        let id = self.agents.insert(Agent::new(kind, profile, start, seed, is_player));
        self.agents[id].set_id(id);
        self.roster.push(id);
        id
    }

    /// Resets every agent to the start cell and sets them all moving with
    /// fresh paths. Clears any previous finish order.
    pub fn start_race(&mut self) {
        let start = self.maze.start();
        for &id in &self.roster {
            if let Some(agent) = self.agents.get_mut(id) {
                agent.reset(start);
                agent.start(&self.maze);
            }
        }
        self.finish_order.clear();
        self.active = true;
        self.elapsed_ms = 0.0;
        log::info!("race started with {} agents", self.roster.len());
    }

    /// Ticks every agent in creation order. Returns the outcome when the
    /// last agent arrives during this tick.
    pub fn update(&mut self, delta_ms: f64) -> Option<RaceOutcome> {
        if !self.active {
            return None;
        }
        self.elapsed_ms += delta_ms;

        let mut arrivals = Vec::new();
        for &id in &self.roster {
            if let Some(agent) = self.agents.get_mut(id)
                && agent.update(&self.maze, delta_ms) == StepEvent::ReachedFinish
            {
                arrivals.push(id);
            }
        }
        for id in arrivals {
            self.record_finish(id);
        }

        (self.active && self.finish_order.len() == self.roster.len())
            .then(|| self.end_race())
    }

    /// Assigns the next dense rank. Duplicate or late signals for an
    /// already-finished agent are silently ignored.
    fn record_finish(&mut self, id: AgentId) {
        let rank = self.finish_order.len() as u32 + 1;
        let Some(agent) = self.agents.get_mut(id) else {
            return;
        };
        if agent.status() == AgentStatus::Finished {
            return;
        }
        if agent.finish(rank) {
            self.finish_order.push(id);
        }
    }

    /// Ranks every not-yet-finished agent in roster (creation) order,
    /// then ends the race. Used when the race timeout elapses.
    pub fn force_end_race(&mut self) -> RaceOutcome {
        for index in 0..self.roster.len() {
            let id = self.roster[index];
            let already_finished = self
                .agents
                .get(id)
                .is_none_or(|agent| agent.status() == AgentStatus::Finished);
            if !already_finished {
                self.record_finish(id);
            }
        }
        self.end_race()
    }

    fn end_race(&mut self) -> RaceOutcome {
        self.active = false;
        for &id in &self.roster {
            if let Some(agent) = self.agents.get_mut(id) {
                agent.stop();
            }
        }

        let standings = self
            .finish_order
            .iter()
            .filter_map(|&id| self.agents.get(id))
            .map(|agent| FinishRecord {
                kind: agent.kind(),
                rank: agent.finish_rank().unwrap_or(0),
                elapsed_ms: agent.finish_elapsed_ms().unwrap_or(0.0),
                is_player: agent.is_player(),
            })
            .collect();

        log::info!("race ended after {:.0}ms", self.elapsed_ms);
        RaceOutcome {
            standings,
            finish_order: self.finish_order.clone(),
            player: self.player,
        }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn duration_ms(&self) -> f64 {
        self.config.race.duration_ms
    }

    pub fn player_id(&self) -> AgentId {
        self.player
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    /// Agents in creation order, for rendering layers.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.roster.iter().filter_map(|&id| self.agents.get(id))
    }

    pub fn finish_order(&self) -> &[AgentId] {
        &self.finish_order
    }
}
