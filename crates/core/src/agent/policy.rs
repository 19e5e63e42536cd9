//! Path-decision policies, one per agent kind. Each decision returns a
//! candidate path starting at the agent's current cell; the stepping
//! logic in the parent module consumes it point by point.
//!
//! Pathfinding failure is never an error here: a disconnected query just
//! degrades into a short random walk.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::maze::Maze;
use crate::types::{AgentKind, Point};

use super::Agent;

/// Random-walk length when A* finds no route.
const FALLBACK_WALK_STEPS: usize = 3;
/// Random-walk length for a deliberate wrong-path decision.
const WRONG_PATH_WALK_STEPS: usize = 5;

impl Agent {
    /// Single dispatch point over the closed kind set.
    pub(super) fn decide_path(&mut self, maze: &Maze) -> Vec<Point> {
        match self.kind {
            AgentKind::Racer => self.racer_path(maze),
            AgentKind::Explorer => self.explorer_path(maze),
            AgentKind::Snake => self.snake_path(maze),
            AgentKind::Stubborn => self.stubborn_path(maze),
            AgentKind::Deadender => self.deadender_path(maze),
        }
    }

    /// Chance to self-activate turbo, then the base policy (a racer's
    /// lower wrong-path probability already keeps it closer to optimal).
    fn racer_path(&mut self, maze: &Maze) -> Vec<Point> {
        if !self.is_boosted() && self.rng.gen_bool(self.profile.boost_probability) {
            self.activate_boost();
        }
        self.base_path(maze)
    }

    /// High chance to head for a uniformly random reachable cell instead
    /// of the finish.
    fn explorer_path(&mut self, maze: &Maze) -> Vec<Point> {
        if self.rng.gen_bool(self.profile.exploration_rate) {
            let cells = maze.reachable_cells(self.position);
            if let Some(&target) = cells.choose(&mut self.rng)
                && let Some(path) = maze.find_path(self.position, target)
            {
                return path;
            }
        }
        self.base_path(maze)
    }

    /// High chance to zigzag: the shortest path with a random-neighbor
    /// detour interleaved at each waypoint; otherwise a random walk.
    fn snake_path(&mut self, maze: &Maze) -> Vec<Point> {
        if self.rng.gen_bool(self.profile.zigzag_probability) {
            if let Some(base) = maze.find_path(self.position, maze.finish())
                && base.len() > 2
            {
                let mut zigzag = vec![base[0]];
                for &waypoint in &base[1..base.len() - 1] {
                    let neighbors = maze.neighbors(waypoint);
                    if neighbors.len() > 1
                        && self.rng.gen_bool(0.5)
                        && let Some(&(detour, _)) = neighbors.choose(&mut self.rng)
                    {
                        zigzag.push(detour);
                    }
                    zigzag.push(waypoint);
                }
                zigzag.push(base[base.len() - 1]);
                return zigzag;
            }
            // Too close to the finish to weave; take the direct route.
            return self.base_path(maze);
        }
        self.random_walk(maze, WRONG_PATH_WALK_STEPS)
    }

    /// Strong bias to keep extending the facing direction while the cells
    /// ahead stay walkable; a new leg is derived only when blocked.
    fn stubborn_path(&mut self, maze: &Maze) -> Vec<Point> {
        if self.rng.gen_bool(self.profile.forward_probability) {
            let mut leg = vec![self.position];
            let mut cursor = self.position;
            while maze.is_walkable(cursor.step(self.facing)) {
                cursor = cursor.step(self.facing);
                leg.push(cursor);
                if cursor == maze.finish() {
                    break;
                }
            }
            if leg.len() > 1 {
                return leg;
            }
        }
        self.base_path(maze)
    }

    /// Seeks a neighbor leading into a dead end (at most one onward exit)
    /// and sometimes pauses there for a while.
    fn deadender_path(&mut self, maze: &Maze) -> Vec<Point> {
        if self.rng.gen_bool(self.profile.dead_end_seek_probability) {
            for (neighbor, _) in maze.neighbors(self.position) {
                if maze.neighbors(neighbor).len() <= 1 {
                    if self.rng.gen_bool(self.profile.stuck_probability) {
                        self.stuck_remaining_ms = self.profile.stuck_pause_ms;
                        log::debug!("{} pauses in a dead end", self.kind.name());
                    }
                    return vec![self.position, neighbor];
                }
            }
        }
        self.base_path(maze)
    }

    /// Shared fallback: wrong-path chance for a pure random walk, else the
    /// A* shortest path with detours spliced at interior waypoints so the
    /// run never looks perfectly efficient.
    fn base_path(&mut self, maze: &Maze) -> Vec<Point> {
        if self.rng.gen_bool(self.profile.wrong_path_probability) {
            return self.random_walk(maze, WRONG_PATH_WALK_STEPS);
        }
        match maze.find_path(self.position, maze.finish()) {
            Some(path) => self.splice_detours(maze, path),
            None => self.random_walk(maze, FALLBACK_WALK_STEPS),
        }
    }

    fn splice_detours(&mut self, maze: &Maze, base: Vec<Point>) -> Vec<Point> {
        if base.len() <= 2 || self.profile.detour_probability <= 0.0 {
            return base;
        }
        let mut path = vec![base[0]];
        for &waypoint in &base[1..base.len() - 1] {
            if self.rng.gen_bool(self.profile.detour_probability)
                && let Some(&(detour, _)) = maze.neighbors(waypoint).choose(&mut self.rng)
            {
                path.push(detour);
            }
            path.push(waypoint);
        }
        path.push(base[base.len() - 1]);
        path
    }

    fn random_walk(&mut self, maze: &Maze, steps: usize) -> Vec<Point> {
        let mut path = vec![self.position];
        let mut current = self.position;
        for _ in 0..steps {
            let neighbors = maze.neighbors(current);
            let Some(&(next, _)) = neighbors.choose(&mut self.rng) else {
                break;
            };
            path.push(next);
            current = next;
            if current == maze.finish() {
                break;
            }
        }
        path
    }
}
