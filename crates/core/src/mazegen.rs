//! Maze generation domain: grid model, carving, and graph search.

pub mod model;
pub mod search;

mod generator;

pub use generator::MazeGenerator;
pub use model::{GeneratedMaze, MazeGrid};
