//! A* pathfinding on a 2D walkability grid
//!
//! Independent utility for grid navigation. The per-tick agent steering is
//! reactive; this planner is exposed for hosts and diagnostics and is
//! optimal on uniform-cost grids.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::maze::MazeGrid;

/// A 2D walkability grid
#[derive(Debug, Clone)]
pub struct NavGrid {
    /// Width in cells
    pub width: usize,
    /// Height in cells
    pub height: usize,
    /// Walkable cells (true = walkable)
    cells: Vec<bool>,
}

impl NavGrid {
    /// Create a fully walkable grid.
    #[must_use]
    pub fn open(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![true; width * height],
        }
    }

    /// Derive walkability from a maze grid (floor-ish cells walkable).
    #[must_use]
    pub fn from_maze(grid: &MazeGrid) -> Self {
        let mut nav = Self {
            width: grid.width(),
            height: grid.height(),
            cells: vec![false; grid.width() * grid.height()],
        };
        for (x, y) in grid.floor_cells() {
            nav.cells[y * nav.width + x] = true;
        }
        nav
    }

    /// Set a cell's walkability
    pub fn set_walkable(&mut self, x: usize, y: usize, walkable: bool) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = walkable;
        }
    }

    /// Check if a cell is walkable
    #[must_use]
    pub fn is_walkable(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    /// Walkable neighbors of a cell (4-directional)
    fn neighbors(&self, x: usize, y: usize) -> SmallVec<[(usize, usize); 4]> {
        let mut result = SmallVec::new();
        if x > 0 && self.is_walkable(x - 1, y) {
            result.push((x - 1, y));
        }
        if self.is_walkable(x + 1, y) {
            result.push((x + 1, y));
        }
        if y > 0 && self.is_walkable(x, y - 1) {
            result.push((x, y - 1));
        }
        if self.is_walkable(x, y + 1) {
            result.push((x, y + 1));
        }
        result
    }
}

/// A* open-set entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    x: usize,
    y: usize,
    g: u32, // Cost from start
    f: u32, // g + heuristic
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse on f for a min-heap; remaining fields keep the order total
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.g.cmp(&self.g))
            .then_with(|| self.x.cmp(&other.x))
            .then_with(|| self.y.cmp(&other.y))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn manhattan(a: (usize, usize), b: (usize, usize)) -> u32 {
    (a.0.abs_diff(b.0) + a.1.abs_diff(b.1)) as u32
}

/// Find a shortest path with A* over 4-connected neighbors.
///
/// The returned sequence excludes the start cell and includes the goal
/// cell; it is empty when the goal is unreachable, when either endpoint is
/// unwalkable or out of bounds, or when `start == goal`. An empty result is
/// "no path", never an error.
#[must_use]
pub fn find_path(
    grid: &NavGrid,
    start: (usize, usize),
    goal: (usize, usize),
) -> Vec<(usize, usize)> {
    if !grid.is_walkable(start.0, start.1) || !grid.is_walkable(goal.0, goal.1) || start == goal {
        return Vec::new();
    }

    let mut open = BinaryHeap::new();
    let mut closed: FxHashSet<(usize, usize)> = FxHashSet::default();
    let mut came_from: FxHashMap<(usize, usize), (usize, usize)> = FxHashMap::default();
    let mut g_score: FxHashMap<(usize, usize), u32> = FxHashMap::default();

    g_score.insert(start, 0);
    open.push(Node {
        x: start.0,
        y: start.1,
        g: 0,
        f: manhattan(start, goal),
    });

    while let Some(current) = open.pop() {
        let pos = (current.x, current.y);
        if !closed.insert(pos) {
            continue; // stale heap entry, already expanded
        }

        if pos == goal {
            let mut path = vec![goal];
            let mut cursor = goal;
            while let Some(&prev) = came_from.get(&cursor) {
                if prev != start {
                    path.push(prev);
                }
                cursor = prev;
            }
            path.reverse();
            return path;
        }

        for next in grid.neighbors(current.x, current.y) {
            if closed.contains(&next) {
                continue;
            }
            let tentative = current.g + 1;
            if tentative < *g_score.get(&next).unwrap_or(&u32::MAX) {
                came_from.insert(next, pos);
                g_score.insert(next, tentative);
                open.push(Node {
                    x: next.0,
                    y: next.1,
                    g: tentative,
                    f: tentative + manhattan(next, goal),
                });
            }
        }
    }

    Vec::new()
}
