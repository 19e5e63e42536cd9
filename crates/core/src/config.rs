//! Configuration surface consumed by the engine: grid dimensions and
//! decoration counts per difficulty, per-kind behavior profiles, and race
//! parameters. Everything deserializes from TOML with field defaults so a
//! config file only needs to name what it changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::AgentKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Grid dimensions and decoration counts for one maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub rows: usize,
    pub cols: usize,
    pub random_paths: usize,
    pub traps: usize,
    pub boosts: usize,
}

impl MazeConfig {
    pub fn preset(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self { rows: 15, cols: 15, random_paths: 3, traps: 3, boosts: 2 },
            Difficulty::Medium => Self { rows: 21, cols: 21, random_paths: 4, traps: 4, boosts: 3 },
            Difficulty::Hard => Self { rows: 31, cols: 31, random_paths: 6, traps: 6, boosts: 4 },
        }
    }
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self::preset(Difficulty::Medium)
    }
}

/// Stochastic knobs for one agent kind. Speeds are steps per second;
/// probabilities are rolled per path decision.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorProfile {
    pub base_speed: f64,
    pub speed_variation: f64,
    /// Chance the base policy abandons the shortest path for a random walk.
    pub wrong_path_probability: f64,
    /// Chance of splicing a random-neighbor detour at each interior waypoint.
    pub detour_probability: f64,
    /// Racer: chance to self-activate turbo at a decision point.
    pub boost_probability: f64,
    pub boost_multiplier: f64,
    /// Explorer: chance to head for a random reachable cell instead of finish.
    pub exploration_rate: f64,
    /// Snake: chance to zigzag along the shortest path.
    pub zigzag_probability: f64,
    /// Stubborn: chance to keep extending the current facing direction.
    pub forward_probability: f64,
    /// Deadender: chance to steer into an adjacent dead end.
    pub dead_end_seek_probability: f64,
    /// Deadender: chance of pausing once the dead end is chosen.
    pub stuck_probability: f64,
    pub stuck_pause_ms: f64,
}

impl Default for BehaviorProfile {
    fn default() -> Self {
        Self {
            base_speed: 2.0,
            speed_variation: 0.4,
            wrong_path_probability: 0.3,
            detour_probability: 0.5,
            boost_probability: 0.0,
            boost_multiplier: 1.3,
            exploration_rate: 0.0,
            zigzag_probability: 0.0,
            forward_probability: 0.0,
            dead_end_seek_probability: 0.0,
            stuck_probability: 0.0,
            stuck_pause_ms: 1000.0,
        }
    }
}

impl BehaviorProfile {
    pub fn default_for(kind: AgentKind) -> Self {
        let base = Self::default();
        match kind {
            AgentKind::Racer => Self {
                base_speed: 2.2,
                wrong_path_probability: 0.2,
                boost_probability: 0.2,
                boost_multiplier: 1.3,
                ..base
            },
            AgentKind::Explorer => Self {
                base_speed: 1.8,
                wrong_path_probability: 0.4,
                exploration_rate: 0.65,
                boost_multiplier: 1.25,
                ..base
            },
            AgentKind::Snake => {
                Self { base_speed: 2.0, zigzag_probability: 0.7, boost_multiplier: 1.3, ..base }
            }
            AgentKind::Stubborn => {
                Self { base_speed: 1.9, forward_probability: 0.85, boost_multiplier: 1.35, ..base }
            }
            AgentKind::Deadender => Self {
                base_speed: 1.7,
                dead_end_seek_probability: 0.6,
                stuck_probability: 0.3,
                stuck_pause_ms: 1000.0,
                boost_multiplier: 1.2,
                ..base
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub roster_size: usize,
    pub duration_ms: f64,
    /// Opponent kinds are drawn from this pool in order, skipping the
    /// player's kind.
    pub pool: Vec<AgentKind>,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            roster_size: 5,
            duration_ms: 60_000.0,
            pool: vec![
                AgentKind::Racer,
                AgentKind::Explorer,
                AgentKind::Snake,
                AgentKind::Stubborn,
                AgentKind::Deadender,
            ],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub maze: MazeConfig,
    pub race: RaceConfig,
    /// Per-kind profile overrides; a kind absent here uses
    /// `BehaviorProfile::default_for`. An override replaces the whole
    /// profile, it is not merged field by field.
    pub agents: BTreeMap<AgentKind, BehaviorProfile>,
}

impl SimConfig {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self { maze: MazeConfig::preset(difficulty), ..Self::default() }
    }

    pub fn profile(&self, kind: AgentKind) -> BehaviorProfile {
        self.agents.get(&kind).copied().unwrap_or_else(|| BehaviorProfile::default_for(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_scale_with_difficulty() {
        let easy = MazeConfig::preset(Difficulty::Easy);
        let hard = MazeConfig::preset(Difficulty::Hard);
        assert!(easy.rows < hard.rows);
        assert!(easy.traps < hard.traps);
    }

    #[test]
    fn profile_override_wins_over_kind_default() {
        let mut config = SimConfig::default();
        let custom = BehaviorProfile { base_speed: 9.0, ..BehaviorProfile::default() };
        config.agents.insert(AgentKind::Racer, custom);

        assert_eq!(config.profile(AgentKind::Racer).base_speed, 9.0);
        assert_eq!(
            config.profile(AgentKind::Snake),
            BehaviorProfile::default_for(AgentKind::Snake)
        );
    }
}
