pub mod agent;
pub mod config;
pub mod maze;
pub mod mazegen;
pub mod race;
pub mod types;

pub use agent::{Agent, StepEvent};
pub use config::{BehaviorProfile, Difficulty, MazeConfig, RaceConfig, SimConfig};
pub use maze::Maze;
pub use race::{FinishRecord, RaceCoordinator, RaceOutcome};
pub use types::*;
