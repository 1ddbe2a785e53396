//! Maze grid and cell codes

/// A single maze cell.
///
/// Integer codes match the layout file format: `0` wall, `1` floor, `3`
/// alternate floor (rendered differently, identical for navigation and
/// spawning), `4` the player-start marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Solid wall
    Wall,
    /// Walkable floor
    Floor,
    /// Walkable floor with an alternate visual
    AltFloor,
    /// Player-start marker, converted to `Floor` once consumed
    Start,
}

impl Cell {
    /// Integer code used in layout files.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Cell::Wall => 0,
            Cell::Floor => 1,
            Cell::AltFloor => 3,
            Cell::Start => 4,
        }
    }

    /// Parse an integer code, `None` for unknown codes.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Cell::Wall),
            1 => Some(Cell::Floor),
            3 => Some(Cell::AltFloor),
            4 => Some(Cell::Start),
            _ => None,
        }
    }

    /// Anything that is not a wall is walkable and spawn-eligible.
    #[must_use]
    pub const fn is_floor(self) -> bool {
        !matches!(self, Cell::Wall)
    }
}

/// Rectangular grid of maze cells.
///
/// Owned by the session after generation; read-only afterwards except for
/// the one-time conversion of the start marker to floor.
#[derive(Debug, Clone)]
pub struct MazeGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl MazeGrid {
    /// Create a grid with every cell set to `fill`.
    #[must_use]
    pub fn filled(width: usize, height: usize, fill: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// Width in cells.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of bounds.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        assert!(x < self.width && y < self.height, "cell out of bounds");
        self.cells[y * self.width + x]
    }

    /// Set the cell at `(x, y)`; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    /// Whether `(x, y)` is a walkable cell. Out of bounds counts as wall.
    #[must_use]
    pub fn is_floor(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x].is_floor()
    }

    /// Coordinates of every walkable cell, row-major.
    pub fn floor_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_floor())
            .map(|(i, _)| (i % self.width, i / self.width))
    }

    /// Locate the player-start marker, first in row-major order.
    #[must_use]
    pub fn find_start(&self) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|&c| c == Cell::Start)
            .map(|i| (i % self.width, i / self.width))
    }

    /// Convert the start marker to floor and return its coordinate.
    ///
    /// Returns `None` if the grid carries no marker. Calling this twice
    /// yields `None` the second time.
    pub fn consume_start(&mut self) -> Option<(usize, usize)> {
        let (x, y) = self.find_start()?;
        self.set(x, y, Cell::Floor);
        Some((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_codes_round_trip() {
        for cell in [Cell::Wall, Cell::Floor, Cell::AltFloor, Cell::Start] {
            assert_eq!(Cell::from_code(cell.code()), Some(cell));
        }
        assert_eq!(Cell::from_code(2), None);
        assert_eq!(Cell::from_code(9), None);
    }

    #[test]
    fn test_floor_cells_and_bounds() {
        let mut grid = MazeGrid::filled(3, 2, Cell::Wall);
        grid.set(1, 0, Cell::Floor);
        grid.set(2, 1, Cell::AltFloor);

        let floors: Vec<_> = grid.floor_cells().collect();
        assert_eq!(floors, vec![(1, 0), (2, 1)]);

        assert!(grid.is_floor(1, 0));
        assert!(grid.is_floor(2, 1));
        assert!(!grid.is_floor(0, 0));
        assert!(!grid.is_floor(3, 0));
        assert!(!grid.is_floor(0, 2));
    }

    #[test]
    fn test_consume_start_is_one_shot() {
        let mut grid = MazeGrid::filled(4, 4, Cell::Wall);
        grid.set(2, 3, Cell::Start);

        assert_eq!(grid.find_start(), Some((2, 3)));
        assert_eq!(grid.consume_start(), Some((2, 3)));
        assert_eq!(grid.cell(2, 3), Cell::Floor);
        assert_eq!(grid.consume_start(), None);
    }
}
