//! Maze layout files
//!
//! Layouts are 2D integer arrays (`0` wall, `1` floor, `3` alternate floor,
//! `4` player-start marker) and round-trip through JSON and RON. A manual
//! layout is used verbatim; generation is bypassed entirely.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::maze::{Cell, MazeGrid};

/// A serializable maze layout, row-major.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    /// Cell codes, one inner vec per row
    pub rows: Vec<Vec<u8>>,
}

impl Layout {
    /// Snapshot a grid into its layout form.
    #[must_use]
    pub fn from_grid(grid: &MazeGrid) -> Self {
        let rows = (0..grid.height())
            .map(|y| (0..grid.width()).map(|x| grid.cell(x, y).code()).collect())
            .collect();
        Self { rows }
    }

    /// Validate the layout and build a grid from it.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty layout, ragged rows, or unknown cell
    /// codes.
    pub fn into_grid(self) -> Result<MazeGrid, LayoutError> {
        let height = self.rows.len();
        let width = self.rows.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(LayoutError::Empty);
        }

        let mut grid = MazeGrid::filled(width, height, Cell::Wall);
        for (y, row) in self.rows.iter().enumerate() {
            if row.len() != width {
                return Err(LayoutError::Ragged { row: y });
            }
            for (x, &code) in row.iter().enumerate() {
                let cell = Cell::from_code(code).ok_or(LayoutError::UnknownCode { code, x, y })?;
                grid.set(x, y, cell);
            }
        }
        Ok(grid)
    }

    /// Save the layout to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), LayoutError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LayoutError::Serialize(e.to_string()))?;
        fs::write(path, json).map_err(|e| LayoutError::Io(e.to_string()))?;
        Ok(())
    }

    /// Load a layout from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let content = fs::read_to_string(path).map_err(|e| LayoutError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| LayoutError::Deserialize(e.to_string()))
    }

    /// Save the layout to a RON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), LayoutError> {
        let ron = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| LayoutError::Serialize(e.to_string()))?;
        fs::write(path, ron).map_err(|e| LayoutError::Io(e.to_string()))?;
        Ok(())
    }

    /// Load a layout from a RON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let content = fs::read_to_string(path).map_err(|e| LayoutError::Io(e.to_string()))?;
        ron::from_str(&content).map_err(|e| LayoutError::Deserialize(e.to_string()))
    }
}

/// Errors that can occur while loading or validating a layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// IO error
    Io(String),
    /// Serialization error
    Serialize(String),
    /// Deserialization error
    Deserialize(String),
    /// Layout has no rows or no columns
    Empty,
    /// Row has a different length than the first row
    Ragged { row: usize },
    /// Cell code is not one of 0, 1, 3, 4
    UnknownCode { code: u8, x: usize, y: usize },
    /// No player-start marker in the layout
    MissingStart,
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Serialize(e) => write!(f, "serialization error: {e}"),
            Self::Deserialize(e) => write!(f, "deserialization error: {e}"),
            Self::Empty => write!(f, "layout is empty"),
            Self::Ragged { row } => write!(f, "row {row} has inconsistent length"),
            Self::UnknownCode { code, x, y } => {
                write!(f, "unknown cell code {code} at ({x}, {y})")
            }
            Self::MissingStart => write!(f, "no player-start marker in layout"),
        }
    }
}

impl std::error::Error for LayoutError {}
