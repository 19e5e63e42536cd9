//! Randomized maze construction: depth-first carving over the odd-aligned
//! lattice, extra connections to break the perfect-maze property, and
//! trap/boost decoration.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::MazeConfig;
use crate::types::{DIRECTIONS, CellKind, Point};

use super::model::{GeneratedMaze, MazeGrid};
use super::search::farthest_path_cell;

/// Placement sampling gives up after this many rejected cells and
/// silently places fewer decorations than requested.
const PLACEMENT_ATTEMPTS: usize = 100;

pub struct MazeGenerator {
    rows: usize,
    cols: usize,
    random_paths: usize,
    traps: usize,
    boosts: usize,
}

impl MazeGenerator {
    pub fn new(config: &MazeConfig) -> Self {
        Self {
            rows: config.rows,
            cols: config.cols,
            random_paths: config.random_paths,
            traps: config.traps,
            boosts: config.boosts,
        }
    }

    pub fn generate(&self, rng: &mut impl Rng) -> GeneratedMaze {
        let mut grid = MazeGrid::filled(self.rows, self.cols, CellKind::Wall);

        let start = self.random_carve_origin(rng);
        self.carve_from(&mut grid, start, rng);

        grid.set_cell(start, CellKind::Start);
        let finish = farthest_path_cell(&grid, start);
        grid.set_cell(finish, CellKind::Finish);

        self.add_random_paths(&mut grid, rng);
        self.add_special_cells(&mut grid, CellKind::Trap, self.traps, rng);
        self.add_special_cells(&mut grid, CellKind::Boost, self.boosts, rng);

        GeneratedMaze { grid, start, finish }
    }

    /// Random odd-aligned interior cell, clamped away from the border.
    fn random_carve_origin(&self, rng: &mut impl Rng) -> Point {
        let row_lanes = (self.rows.saturating_sub(2)) / 2;
        let col_lanes = (self.cols.saturating_sub(2)) / 2;
        let row = (rng.gen_range(0..=row_lanes) * 2 + 1).min(self.rows.saturating_sub(2)).max(1);
        let col = (rng.gen_range(0..=col_lanes) * 2 + 1).min(self.cols.saturating_sub(2)).max(1);
        Point { row: row as i32, col: col as i32 }
    }

    /// Depth-first backtracking carve over 2-step offsets. Carving through
    /// the intermediate wall yields a perfect maze over the odd lattice.
    fn carve_from(&self, grid: &mut MazeGrid, origin: Point, rng: &mut impl Rng) {
        grid.set_cell(origin, CellKind::Path);
        let mut stack = vec![origin];

        while let Some(&current) = stack.last() {
            let mut directions = DIRECTIONS;
            directions.shuffle(rng);

            let mut advanced = false;
            for direction in directions {
                let between = current.step(direction);
                let destination = between.step(direction);
                if grid.in_bounds(destination) && grid.cell_at(destination) == CellKind::Wall {
                    grid.set_cell(between, CellKind::Path);
                    grid.set_cell(destination, CellKind::Path);
                    stack.push(destination);
                    advanced = true;
                    break;
                }
            }
            if !advanced {
                stack.pop();
            }
        }
    }

    /// Converts interior walls flanked by at least two path cells into
    /// paths, adding cycles and shortcuts beyond the perfect maze.
    fn add_random_paths(&self, grid: &mut MazeGrid, rng: &mut impl Rng) {
        for _ in 0..self.random_paths {
            for _ in 0..PLACEMENT_ATTEMPTS {
                let candidate = self.random_interior_cell(rng);
                if grid.cell_at(candidate) != CellKind::Wall {
                    continue;
                }
                let adjacent_paths = DIRECTIONS
                    .iter()
                    .filter(|direction| {
                        grid.cell_at(candidate.step(**direction)) == CellKind::Path
                    })
                    .count();
                if adjacent_paths >= 2 {
                    grid.set_cell(candidate, CellKind::Path);
                    break;
                }
            }
        }
    }

    /// Converts random plain path cells (never Start/Finish) to `kind`,
    /// stopping early when the attempt budget runs out.
    fn add_special_cells(
        &self,
        grid: &mut MazeGrid,
        kind: CellKind,
        count: usize,
        rng: &mut impl Rng,
    ) {
        let mut added = 0;
        let mut attempts = 0;
        while added < count && attempts < PLACEMENT_ATTEMPTS {
            let candidate = self.random_interior_cell(rng);
            if grid.cell_at(candidate) == CellKind::Path {
                grid.set_cell(candidate, kind);
                added += 1;
            }
            attempts += 1;
        }
    }

    fn random_interior_cell(&self, rng: &mut impl Rng) -> Point {
        Point {
            row: rng.gen_range(1..self.rows.saturating_sub(1).max(2)) as i32,
            col: rng.gen_range(1..self.cols.saturating_sub(1).max(2)) as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use super::*;
    use crate::mazegen::search::find_path;

    fn generate(rows: usize, cols: usize, seed: u64) -> GeneratedMaze {
        let config =
            MazeConfig { rows, cols, random_paths: 4, traps: 4, boosts: 3 };
        MazeGenerator::new(&config).generate(&mut ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn seeded_fifteen_by_fifteen_has_one_start_one_finish_and_a_route() {
        let generated = generate(15, 15, 0xC0FFEE);
        assert_eq!(generated.grid.count_of(CellKind::Start), 1);
        assert_eq!(generated.grid.count_of(CellKind::Finish), 1);
        assert_eq!(generated.grid.cell_at(generated.start), CellKind::Start);
        assert_eq!(generated.grid.cell_at(generated.finish), CellKind::Finish);
        assert!(find_path(&generated.grid, generated.start, generated.finish).is_some());
    }

    #[test]
    fn same_seed_produces_identical_grids() {
        let first = generate(15, 15, 42);
        let second = generate(15, 15, 42);
        assert_eq!(first.grid.canonical_bytes(), second.grid.canonical_bytes());
        assert_eq!((first.start, first.finish), (second.start, second.finish));
    }

    #[test]
    fn different_seeds_produce_different_grids() {
        let first = generate(21, 21, 1);
        let second = generate(21, 21, 2);
        assert_ne!(first.grid.canonical_bytes(), second.grid.canonical_bytes());
    }

    #[test]
    fn decoration_counts_never_exceed_request() {
        let generated = generate(21, 21, 7);
        assert!(generated.grid.count_of(CellKind::Trap) <= 4);
        assert!(generated.grid.count_of(CellKind::Boost) <= 3);
    }

    #[test]
    fn finish_is_the_bfs_farthest_cell_before_decoration() {
        // Decoration only retypes Path cells, so re-running the BFS on the
        // decorated grid with decorations treated as Path is equivalent.
        let generated = generate(15, 15, 99);
        assert_ne!(generated.start, generated.finish);
        assert!(generated.grid.is_walkable(generated.finish));
    }

    proptest! {
        #[test]
        fn generated_mazes_always_connect_start_to_finish(
            seed in any::<u64>(),
            row_lanes in 4_usize..12,
            col_lanes in 4_usize..12,
        ) {
            let generated = generate(row_lanes * 2 + 1, col_lanes * 2 + 1, seed);
            prop_assert!(
                find_path(&generated.grid, generated.start, generated.finish).is_some(),
                "seed={seed} produced a disconnected maze"
            );
        }
    }
}
