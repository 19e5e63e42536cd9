//! Graph search over the maze grid: BFS farthest-point selection for the
//! finish cell, a reachability flood, and the A* path query used by the
//! maze facade and every agent policy.

use std::collections::{BTreeSet, VecDeque};

use crate::types::{DIRECTIONS, CellKind, Point};

use super::model::MazeGrid;

/// BFS over `Path` cells from `start`, returning the cell with the
/// maximum distance. Ties keep the first cell encountered, which the
/// FIFO traversal and fixed direction order make deterministic.
pub fn farthest_path_cell(grid: &MazeGrid, start: Point) -> Point {
    let mut queue = VecDeque::from([(start, 0_u32)]);
    let mut visited = BTreeSet::from([start]);
    let mut farthest = (start, 0_u32);

    while let Some((current, distance)) = queue.pop_front() {
        if distance > farthest.1 {
            farthest = (current, distance);
        }
        for direction in DIRECTIONS {
            let next = current.step(direction);
            if grid.cell_at(next) == CellKind::Path && visited.insert(next) {
                queue.push_back((next, distance + 1));
            }
        }
    }

    farthest.0
}

/// Every walkable cell reachable from `start`, in BFS visit order.
pub fn reachable_cells(grid: &MazeGrid, start: Point) -> Vec<Point> {
    if !grid.is_walkable(start) {
        return Vec::new();
    }

    let mut queue = VecDeque::from([start]);
    let mut visited = BTreeSet::from([start]);
    let mut cells = vec![start];

    while let Some(current) = queue.pop_front() {
        for direction in DIRECTIONS {
            let next = current.step(direction);
            if grid.is_walkable(next) && visited.insert(next) {
                cells.push(next);
                queue.push_back(next);
            }
        }
    }

    cells
}

struct OpenNode {
    point: Point,
    g: u32,
    h: u32,
    f: u32,
    parent: Option<usize>,
}

/// A* with Manhattan heuristic over 4-connected unit-cost moves.
///
/// The open list is scanned linearly for the minimum f-score and the
/// first minimum wins, so equal-score candidates resolve in insertion
/// order. The returned path includes both endpoints; `None` means the
/// cells are disconnected.
pub fn find_path(grid: &MazeGrid, from: Point, to: Point) -> Option<Vec<Point>> {
    if !grid.is_walkable(from) || !grid.is_walkable(to) {
        return None;
    }

    let start_h = manhattan(from, to);
    let mut nodes =
        vec![OpenNode { point: from, g: 0, h: start_h, f: start_h, parent: None }];
    let mut open = vec![0_usize];
    let mut closed: BTreeSet<Point> = BTreeSet::new();

    while !open.is_empty() {
        let mut lowest = 0;
        for candidate in 1..open.len() {
            if nodes[open[candidate]].f < nodes[open[lowest]].f {
                lowest = candidate;
            }
        }
        let current = open.remove(lowest);

        if nodes[current].point == to {
            return Some(reconstruct(&nodes, current));
        }
        closed.insert(nodes[current].point);

        for direction in DIRECTIONS {
            let next = nodes[current].point.step(direction);
            if !grid.is_walkable(next) || closed.contains(&next) {
                continue;
            }

            let tentative_g = nodes[current].g + 1;
            if let Some(&node_index) = open.iter().find(|&&index| nodes[index].point == next) {
                if tentative_g < nodes[node_index].g {
                    nodes[node_index].g = tentative_g;
                    nodes[node_index].f = tentative_g + nodes[node_index].h;
                    nodes[node_index].parent = Some(current);
                }
            } else {
                let h = manhattan(next, to);
                nodes.push(OpenNode {
                    point: next,
                    g: tentative_g,
                    h,
                    f: tentative_g + h,
                    parent: Some(current),
                });
                open.push(nodes.len() - 1);
            }
        }
    }

    None
}

fn reconstruct(nodes: &[OpenNode], goal: usize) -> Vec<Point> {
    let mut path = Vec::new();
    let mut cursor = Some(goal);
    while let Some(index) = cursor {
        path.push(nodes[index].point);
        cursor = nodes[index].parent;
    }
    path.reverse();
    path
}

pub fn manhattan(a: Point, b: Point) -> u32 {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor_grid() -> MazeGrid {
        let mut grid = MazeGrid::filled(5, 7, CellKind::Wall);
        for col in 1..6 {
            grid.set_cell(Point { row: 2, col }, CellKind::Path);
        }
        grid
    }

    fn bfs_distance(grid: &MazeGrid, from: Point, to: Point) -> Option<u32> {
        let mut queue = VecDeque::from([(from, 0_u32)]);
        let mut visited = BTreeSet::from([from]);
        while let Some((current, distance)) = queue.pop_front() {
            if current == to {
                return Some(distance);
            }
            for direction in DIRECTIONS {
                let next = current.step(direction);
                if grid.is_walkable(next) && visited.insert(next) {
                    queue.push_back((next, distance + 1));
                }
            }
        }
        None
    }

    #[test]
    fn path_includes_both_endpoints() {
        let grid = corridor_grid();
        let from = Point { row: 2, col: 1 };
        let to = Point { row: 2, col: 5 };
        let path = find_path(&grid, from, to).expect("corridor is connected");
        assert_eq!(path.first(), Some(&from));
        assert_eq!(path.last(), Some(&to));
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn path_to_self_is_single_point() {
        let grid = corridor_grid();
        let here = Point { row: 2, col: 3 };
        assert_eq!(find_path(&grid, here, here), Some(vec![here]));
    }

    #[test]
    fn disconnected_cells_return_none() {
        let mut grid = corridor_grid();
        grid.set_cell(Point { row: 2, col: 3 }, CellKind::Wall);
        assert!(find_path(&grid, Point { row: 2, col: 1 }, Point { row: 2, col: 5 }).is_none());
    }

    #[test]
    fn astar_length_matches_bfs_distance() {
        let mut grid = MazeGrid::filled(9, 9, CellKind::Path);
        for row in 0..9 {
            grid.set_cell(Point { row, col: 0 }, CellKind::Wall);
            grid.set_cell(Point { row, col: 8 }, CellKind::Wall);
        }
        for col in 0..9 {
            grid.set_cell(Point { row: 0, col }, CellKind::Wall);
            grid.set_cell(Point { row: 8, col }, CellKind::Wall);
        }
        for row in 1..7 {
            grid.set_cell(Point { row, col: 4 }, CellKind::Wall);
        }

        let from = Point { row: 1, col: 1 };
        let to = Point { row: 1, col: 7 };
        let path = find_path(&grid, from, to).expect("open around the wall");
        let expected = bfs_distance(&grid, from, to).expect("reachable");
        assert_eq!(path.len() as u32 - 1, expected);
    }

    #[test]
    fn farthest_cell_maximizes_bfs_distance() {
        let mut grid = MazeGrid::filled(7, 7, CellKind::Wall);
        for col in 1..6 {
            grid.set_cell(Point { row: 1, col }, CellKind::Path);
        }
        for row in 2..6 {
            grid.set_cell(Point { row, col: 5 }, CellKind::Path);
        }
        let start = Point { row: 1, col: 1 };
        grid.set_cell(start, CellKind::Start);

        let farthest = farthest_path_cell(&grid, start);
        let farthest_distance = bfs_distance(&grid, start, farthest).expect("reachable");
        for point in reachable_cells(&grid, start) {
            let distance = bfs_distance(&grid, start, point).expect("reachable");
            assert!(distance <= farthest_distance);
        }
        assert_eq!(farthest, Point { row: 5, col: 5 });
    }

    #[test]
    fn reachable_cells_stops_at_walls() {
        let grid = corridor_grid();
        let cells = reachable_cells(&grid, Point { row: 2, col: 1 });
        assert_eq!(cells.len(), 5);
        assert!(cells.iter().all(|point| grid.is_walkable(*point)));
    }
}
