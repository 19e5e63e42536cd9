//! Grid data model shared by generation, search, and the maze facade.

use crate::types::{CellKind, Point};

/// Row-major cell storage. Out-of-bounds lookups read as `Wall`, which
/// lets callers probe neighbors without bounds checks of their own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeGrid {
    rows: usize,
    cols: usize,
    cells: Vec<CellKind>,
}

impl MazeGrid {
    pub fn filled(rows: usize, cols: usize, fill: CellKind) -> Self {
        Self { rows, cols, cells: vec![fill; rows * cols] }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.row >= 0
            && point.col >= 0
            && (point.row as usize) < self.rows
            && (point.col as usize) < self.cols
    }

    pub fn cell_at(&self, point: Point) -> CellKind {
        if !self.in_bounds(point) {
            return CellKind::Wall;
        }
        self.cells[self.index(point)]
    }

    pub fn set_cell(&mut self, point: Point, kind: CellKind) {
        if !self.in_bounds(point) {
            return;
        }
        let index = self.index(point);
        self.cells[index] = kind;
    }

    /// Every cell kind except `Wall` can be stepped on.
    pub fn is_walkable(&self, point: Point) -> bool {
        self.cell_at(point) != CellKind::Wall
    }

    pub fn count_of(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&cell| cell == kind).count()
    }

    /// Stable byte encoding used for equality checks across generations.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.cells.len());
        bytes.extend((self.rows as u32).to_le_bytes());
        bytes.extend((self.cols as u32).to_le_bytes());
        for cell in &self.cells {
            bytes.push(match cell {
                CellKind::Wall => 0,
                CellKind::Path => 1,
                CellKind::Start => 2,
                CellKind::Finish => 3,
                CellKind::Trap => 4,
                CellKind::Boost => 5,
                CellKind::Portal => 6,
            });
        }
        bytes
    }

    fn index(&self, point: Point) -> usize {
        (point.row as usize) * self.cols + (point.col as usize)
    }
}

/// Raw generator output, prior to connectivity validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedMaze {
    pub grid: MazeGrid,
    pub start: Point,
    pub finish: Point,
}
