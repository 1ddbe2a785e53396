//! Maze grid, procedural generation, and layout files
//!
//! Provides the cell-coded maze grid, the connected-maze carver, and the
//! integer-array layout format consumed and produced by hosts.

mod generator;
mod grid;
mod layout;

pub use generator::{add_extra_walls, generate};
pub use grid::{Cell, MazeGrid};
pub use layout::{Layout, LayoutError};
