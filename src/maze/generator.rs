//! Procedural maze generation
//!
//! Carves a fully connected maze with an iterative randomized depth-first
//! walk over a junction lattice. Corridors are block-carved so any odd or
//! even corridor width is honored.

use fastrand::Rng;
use smallvec::SmallVec;

use crate::maze::{Cell, MazeGrid};

/// Generate a maze of roughly `width` x `height` cells.
///
/// Dimensions are rounded up so `(dim - 1) % (corridor_width + 1) == 0`,
/// which guarantees a lattice of carvable junctions. The start junction is
/// marked with [`Cell::Start`] and also returned as a coordinate.
///
/// A `manual` grid bypasses generation entirely and is returned verbatim
/// with the fixed start coordinate `(1, 1)`.
///
/// Determinism is controlled by the caller's `rng` seed.
pub fn generate(
    width: usize,
    height: usize,
    corridor_width: usize,
    manual: Option<MazeGrid>,
    rng: &mut Rng,
) -> (MazeGrid, usize, usize) {
    if let Some(grid) = manual {
        return (grid, 1, 1);
    }

    let cw = corridor_width.max(1);
    let pitch = cw + 1;
    let width = lattice_fit(width.max(pitch + 1), pitch);
    let height = lattice_fit(height.max(pitch + 1), pitch);

    let mut grid = MazeGrid::filled(width, height, Cell::Wall);

    let start_x = cw + pitch * rng.usize(0..junction_count(width, cw));
    let start_y = cw + pitch * rng.usize(0..junction_count(height, cw));
    carve_block(&mut grid, start_x, start_y, cw);

    let mut stack = vec![(start_x, start_y)];
    while let Some(&(x, y)) = stack.last() {
        let mut neighbors: SmallVec<[(usize, usize, isize, isize); 4]> = SmallVec::new();
        if x > cw && grid.cell(x - pitch, y) == Cell::Wall {
            neighbors.push((x - pitch, y, -1, 0));
        }
        if x + pitch < width && grid.cell(x + pitch, y) == Cell::Wall {
            neighbors.push((x + pitch, y, 1, 0));
        }
        if y > cw && grid.cell(x, y - pitch) == Cell::Wall {
            neighbors.push((x, y - pitch, 0, -1));
        }
        if y + pitch < height && grid.cell(x, y + pitch) == Cell::Wall {
            neighbors.push((x, y + pitch, 0, 1));
        }

        if neighbors.is_empty() {
            stack.pop();
            continue;
        }

        let (nx, ny, sx, sy) = neighbors[rng.usize(0..neighbors.len())];
        // Block-carve every step of the corridor, destination junction
        // included, so the new junction is floor (and thereby visited)
        // before it is pushed.
        for i in 0..=pitch as isize {
            let cx = (x as isize + sx * i) as usize;
            let cy = (y as isize + sy * i) as usize;
            carve_block(&mut grid, cx, cy, cw);
        }
        stack.push((nx, ny));
    }

    grid.set(start_x, start_y, Cell::Start);
    log::debug!(
        "generated {}x{} maze, corridor width {}, start ({}, {})",
        width,
        height,
        cw,
        start_x,
        start_y
    );
    (grid, start_x, start_y)
}

/// Re-wall dead ends with the given probability to increase difficulty.
///
/// Only interior floor cells with exactly one floor neighbor among the four
/// lattice-direction offsets are eligible, so at most leaf dead ends are
/// disconnected; the start marker is never converted. The scan mutates the
/// grid in place, so walling a dead end can expose the next cell up the
/// corridor as a new dead end within the same pass; at high probability
/// whole leaf branches erode. Returns the number of cells walled off.
pub fn add_extra_walls(
    grid: &mut MazeGrid,
    corridor_width: usize,
    probability: f32,
    rng: &mut Rng,
) -> usize {
    let cw = corridor_width.max(1);
    let pitch = (cw + 1) as isize;
    let (width, height) = (grid.width(), grid.height());
    let mut added = 0;

    for y in cw..height.saturating_sub(cw) {
        for x in cw..width.saturating_sub(cw) {
            if grid.cell(x, y) != Cell::Floor {
                continue;
            }
            let mut floor_neighbors = 0;
            for (dx, dy) in [(0, -pitch), (0, pitch), (-pitch, 0), (pitch, 0)] {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx >= 0 && ny >= 0 && grid.is_floor(nx as usize, ny as usize) {
                    floor_neighbors += 1;
                }
            }
            if floor_neighbors == 1 && rng.f32() < probability {
                grid.set(x, y, Cell::Wall);
                added += 1;
            }
        }
    }

    if added > 0 {
        log::debug!("walled off {added} dead-end cells");
    }
    added
}

/// Round `dim` up to the nearest value with `(dim - 1) % pitch == 0`.
fn lattice_fit(dim: usize, pitch: usize) -> usize {
    let rem = (dim - 1) % pitch;
    if rem == 0 { dim } else { dim + pitch - rem }
}

/// Number of lattice junctions along one axis.
fn junction_count(dim: usize, cw: usize) -> usize {
    (dim - 1 - cw) / (cw + 1) + 1
}

/// Carve a floor block of radius `cw / 2` around `(x, y)`, clipped to the
/// grid bounds.
fn carve_block(grid: &mut MazeGrid, x: usize, y: usize, cw: usize) {
    let half = (cw / 2) as isize;
    for dy in -half..=half {
        for dx in -half..=half {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            if nx >= 0 && ny >= 0 {
                grid.set(nx as usize, ny as usize, Cell::Floor);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// Count floor cells reachable from `start` with 4-connected moves.
    fn flood_fill(grid: &MazeGrid, start: (usize, usize)) -> usize {
        let mut seen = vec![false; grid.width() * grid.height()];
        let mut queue = VecDeque::from([start]);
        seen[start.1 * grid.width() + start.0] = true;
        let mut count = 0;

        while let Some((x, y)) = queue.pop_front() {
            count += 1;
            let mut visit = |nx: usize, ny: usize| {
                if grid.is_floor(nx, ny) && !seen[ny * grid.width() + nx] {
                    seen[ny * grid.width() + nx] = true;
                    queue.push_back((nx, ny));
                }
            };
            if x > 0 {
                visit(x - 1, y);
            }
            if y > 0 {
                visit(x, y - 1);
            }
            visit(x + 1, y);
            visit(x, y + 1);
        }
        count
    }

    #[test]
    fn test_lattice_dimension_correction() {
        for cw in 1..=4 {
            for dim in [5, 9, 10, 17, 31, 40] {
                let mut rng = Rng::with_seed(1);
                let (grid, _, _) = generate(dim, dim, cw, None, &mut rng);
                assert_eq!((grid.width() - 1) % (cw + 1), 0, "width cw={cw} dim={dim}");
                assert_eq!((grid.height() - 1) % (cw + 1), 0, "height cw={cw} dim={dim}");
                assert!(grid.width() >= dim);
                assert!(grid.height() >= dim);
            }
        }
    }

    #[test]
    fn test_every_floor_cell_reachable_from_start() {
        for (seed, w, h, cw) in [(1, 15, 15, 1), (7, 21, 17, 2), (42, 25, 25, 3), (9, 13, 31, 1)] {
            let mut rng = Rng::with_seed(seed);
            let (grid, sx, sy) = generate(w, h, cw, None, &mut rng);
            let total = grid.floor_cells().count();
            let reached = flood_fill(&grid, (sx, sy));
            assert_eq!(reached, total, "seed={seed} w={w} h={h} cw={cw}");
        }
    }

    #[test]
    fn test_start_marker_set_at_returned_coordinate() {
        let mut rng = Rng::with_seed(3);
        let (grid, sx, sy) = generate(17, 17, 2, None, &mut rng);
        assert_eq!(grid.cell(sx, sy), Cell::Start);
        assert_eq!(grid.find_start(), Some((sx, sy)));
    }

    #[test]
    fn test_manual_grid_bypasses_generation() {
        let mut manual = MazeGrid::filled(5, 5, Cell::Wall);
        manual.set(1, 1, Cell::Floor);
        let mut rng = Rng::with_seed(0);

        let (grid, sx, sy) = generate(99, 99, 3, Some(manual), &mut rng);
        assert_eq!((sx, sy), (1, 1));
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.floor_cells().count(), 1);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let mut a = Rng::with_seed(1234);
        let mut b = Rng::with_seed(1234);
        let (grid_a, ax, ay) = generate(21, 21, 2, None, &mut a);
        let (grid_b, bx, by) = generate(21, 21, 2, None, &mut b);

        assert_eq!((ax, ay), (bx, by));
        let cells_a: Vec<_> = grid_a.floor_cells().collect();
        let cells_b: Vec<_> = grid_b.floor_cells().collect();
        assert_eq!(cells_a, cells_b);
    }

    #[test]
    fn test_extra_walls_only_erode_leaf_branches() {
        let mut rng = Rng::with_seed(5);
        let (mut grid, sx, sy) = generate(21, 21, 1, None, &mut rng);
        let before = grid.clone();

        let added = add_extra_walls(&mut grid, 1, 1.0, &mut rng);
        assert!(added > 0, "expected at least one dead end in a 21x21 maze");

        let pitch = 2isize;
        let floor_neighbors = |g: &MazeGrid, x: usize, y: usize| {
            let mut n = 0;
            for (dx, dy) in [(0, -pitch), (0, pitch), (-pitch, 0), (pitch, 0)] {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx >= 0 && ny >= 0 && g.is_floor(nx as usize, ny as usize) {
                    n += 1;
                }
            }
            n
        };

        // The scan mutates in place, so one walled dead end can make the
        // next cell up the corridor a dead end within the same pass. Floor
        // only ever shrinks, so a cell that had one lattice floor neighbor
        // when it was converted still has at most one afterwards; more than
        // one would mean a junction was eroded.
        let mut converted = 0;
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if before.is_floor(x, y) && !grid.is_floor(x, y) {
                    converted += 1;
                    assert_eq!(before.cell(x, y), Cell::Floor, "only plain floor is eligible");
                    assert!(
                        floor_neighbors(&grid, x, y) <= 1,
                        "non-leaf cell eroded at ({x}, {y})"
                    );
                }
            }
        }
        assert_eq!(converted, added);
        assert_eq!(grid.cell(sx, sy), Cell::Start, "start marker must never be walled off");
    }

    #[test]
    fn test_extra_walls_zero_probability_is_noop() {
        let mut rng = Rng::with_seed(11);
        let (mut grid, _, _) = generate(17, 17, 2, None, &mut rng);
        let floors = grid.floor_cells().count();
        assert_eq!(add_extra_walls(&mut grid, 2, 0.0, &mut rng), 0);
        assert_eq!(grid.floor_cells().count(), floors);
    }
}
