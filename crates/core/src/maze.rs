//! Validated maze facade. Owns one generated grid plus its start->finish
//! shortest path; exposes the cell queries and pathfinding the agents use.

use rand::Rng;

use crate::config::MazeConfig;
use crate::mazegen::model::{GeneratedMaze, MazeGrid};
use crate::mazegen::{MazeGenerator, search};
use crate::types::{DIRECTIONS, CellKind, Direction, MazeError, Point};

/// Hard cap on regeneration; a disconnected carve is already rare, so
/// hitting this means the configuration itself is pathological.
pub const MAX_GENERATION_ATTEMPTS: u32 = 64;

/// Failed attempts between each widening of the extra-path count.
const WIDEN_EVERY: u32 = 8;

#[derive(Clone, Debug)]
pub struct Maze {
    grid: MazeGrid,
    start: Point,
    finish: Point,
    shortest_path: Vec<Point>,
}

impl Maze {
    /// Generates until validation passes. The whole grid is discarded and
    /// rebuilt on failure, never patched; every `WIDEN_EVERY` failures the
    /// extra-path count grows to open the topology up.
    pub fn generate(config: &MazeConfig, rng: &mut impl Rng) -> Result<Self, MazeError> {
        let mut widened = *config;
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let generated = MazeGenerator::new(&widened).generate(rng);
            if let Ok(maze) = Self::from_generated(generated) {
                return Ok(maze);
            }
            log::warn!("maze attempt {attempt} had no start->finish route, regenerating");
            if attempt.is_multiple_of(WIDEN_EVERY) {
                widened.random_paths += 2;
            }
        }
        Err(MazeError::Disconnected { attempts: MAX_GENERATION_ATTEMPTS })
    }

    /// Validates a raw generator result by solving start->finish once.
    pub fn from_generated(generated: GeneratedMaze) -> Result<Self, MazeError> {
        let GeneratedMaze { grid, start, finish } = generated;
        match search::find_path(&grid, start, finish) {
            Some(shortest_path) => Ok(Self { grid, start, finish, shortest_path }),
            None => Err(MazeError::Disconnected { attempts: 1 }),
        }
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn finish(&self) -> Point {
        self.finish
    }

    pub fn shortest_path(&self) -> &[Point] {
        &self.shortest_path
    }

    /// Grid snapshot for rendering layers.
    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    pub fn cell_kind_at(&self, point: Point) -> CellKind {
        self.grid.cell_at(point)
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        self.grid.is_walkable(point)
    }

    /// Walkable orthogonal neighbors in up/down/left/right order.
    pub fn neighbors(&self, point: Point) -> Vec<(Point, Direction)> {
        DIRECTIONS
            .into_iter()
            .filter_map(|direction| {
                let next = point.step(direction);
                self.is_walkable(next).then_some((next, direction))
            })
            .collect()
    }

    pub fn find_path(&self, from: Point, to: Point) -> Option<Vec<Point>> {
        search::find_path(&self.grid, from, to)
    }

    pub fn reachable_cells(&self, from: Point) -> Vec<Point> {
        search::reachable_cells(&self.grid, from)
    }
}
