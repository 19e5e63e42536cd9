use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct AgentId;
}

/// Grid coordinate, 0-indexed, row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Point {
    pub fn step(self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        Self { row: self.row + d_row, col: self.col + d_col }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CellKind {
    Wall,
    Path,
    Start,
    Finish,
    Trap,
    Boost,
    /// Reserved in the cell vocabulary; nothing places portals yet.
    Portal,
}

/// Facing direction; the variant order doubles as the neighbor visiting
/// order everywhere (BFS, A*, policies).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

pub const DIRECTIONS: [Direction; 4] =
    [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Direction of a single-cell move from `from` to `to`, if any.
    pub fn between(from: Point, to: Point) -> Option<Self> {
        if from.row > to.row {
            Some(Direction::Up)
        } else if from.row < to.row {
            Some(Direction::Down)
        } else if from.col > to.col {
            Some(Direction::Left)
        } else if from.col < to.col {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Racer,
    Explorer,
    Snake,
    Stubborn,
    Deadender,
}

impl AgentKind {
    pub fn name(self) -> &'static str {
        match self {
            AgentKind::Racer => "racer",
            AgentKind::Explorer => "explorer",
            AgentKind::Snake => "snake",
            AgentKind::Stubborn => "stubborn",
            AgentKind::Deadender => "deadender",
        }
    }
}

/// Top-level agent state. Disorientation, turbo boost, and dead-end
/// pauses are timed overlays on `Moving`, not statuses of their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentStatus {
    Idle,
    Moving,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("maze generation produced no start->finish route after {attempts} attempts")]
    Disconnected { attempts: u32 },
}
