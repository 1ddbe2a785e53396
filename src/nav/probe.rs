//! World-probe interface
//!
//! Navigation and combat query world geometry exclusively through these
//! pure, stateless probes. The bundled [`GridWorld`] ray-marches the maze
//! grid plus a per-tick player snapshot; hosts with a real physics scene
//! substitute their own implementation.

use glam::{Vec2, Vec3};

use crate::maze::MazeGrid;

/// What a probe struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeTarget {
    /// Static wall geometry
    Wall,
    /// The player's body
    Player,
}

/// Result of a ray or box probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The struck target
    pub target: ProbeTarget,
    /// World-space point of the hit
    pub point: Vec3,
    /// Distance from the probe origin
    pub distance: f32,
}

/// Which targets block a probe.
///
/// Navigation probes ignore the player so it is never treated as a wall;
/// attack rays include it. The querying agent itself never blocks its own
/// probes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeFilter {
    /// Whether the player's body blocks the probe
    pub hit_player: bool,
}

impl ProbeFilter {
    /// Static geometry only
    pub const GEOMETRY: Self = Self { hit_player: false };
    /// Geometry and the player body
    pub const ALL: Self = Self { hit_player: true };
}

/// Pure world-geometry queries consumed by navigation and combat.
///
/// Implementations must not mutate any state.
pub trait WorldProbe {
    /// Cast a ray and return the first hit within `max_distance`.
    fn ray_probe(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: ProbeFilter,
    ) -> Option<RayHit>;

    /// Sweep a box footprint (`width`, `depth`) along a direction and
    /// return the first hit within `max_distance`.
    fn box_probe(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        footprint: Vec2,
        filter: ProbeFilter,
    ) -> Option<RayHit>;
}

/// Probe implementation backed by the maze grid.
///
/// Walls occupy full cells centered on `(x * cell_size, 0, y * cell_size)`;
/// anything outside the grid counts as solid. The player obstacle is a
/// horizontal cylinder snapshot refreshed once per tick by the session.
#[derive(Debug, Clone)]
pub struct GridWorld {
    width: usize,
    height: usize,
    walls: Vec<bool>,
    cell_size: f32,
    player: Option<(Vec3, f32)>,
}

/// Ray-march step as a fraction of the cell size.
const MARCH_STEP: f32 = 0.05;

impl GridWorld {
    /// Build probe geometry from a maze grid.
    #[must_use]
    pub fn new(grid: &MazeGrid, cell_size: f32) -> Self {
        let walls = (0..grid.height())
            .flat_map(|y| (0..grid.width()).map(move |x| (x, y)))
            .map(|(x, y)| !grid.is_floor(x, y))
            .collect();
        Self {
            width: grid.width(),
            height: grid.height(),
            walls,
            cell_size,
            player: None,
        }
    }

    /// World-space center of a grid cell, at ground level.
    #[must_use]
    pub fn cell_to_world(&self, x: usize, y: usize) -> Vec3 {
        Vec3::new(x as f32 * self.cell_size, 0.0, y as f32 * self.cell_size)
    }

    /// Grid cell containing a world-space point.
    #[must_use]
    pub fn world_to_cell(&self, point: Vec3) -> (usize, usize) {
        let x = (point.x / self.cell_size).round().max(0.0) as usize;
        let y = (point.z / self.cell_size).round().max(0.0) as usize;
        (x.min(self.width.saturating_sub(1)), y.min(self.height.saturating_sub(1)))
    }

    /// Refresh the player obstacle snapshot for this tick.
    pub fn set_player(&mut self, position: Vec3, radius: f32) {
        self.player = Some((position, radius));
    }

    /// Remove the player obstacle.
    pub fn clear_player(&mut self) {
        self.player = None;
    }

    fn is_wall_at(&self, point: Vec3) -> bool {
        let x = (point.x / self.cell_size).round();
        let y = (point.z / self.cell_size).round();
        if x < 0.0 || y < 0.0 {
            return true;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return true;
        }
        self.walls[y * self.width + x]
    }

    fn march(&self, origin: Vec3, direction: Vec3, max_distance: f32, filter: ProbeFilter) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let step = self.cell_size * MARCH_STEP;
        let mut t = 0.0;
        while t <= max_distance {
            let point = origin + direction * t;
            if self.is_wall_at(point) {
                return Some(RayHit {
                    target: ProbeTarget::Wall,
                    point,
                    distance: t,
                });
            }
            if filter.hit_player {
                if let Some((center, radius)) = self.player {
                    let planar = Vec2::new(point.x - center.x, point.z - center.z);
                    if planar.length() <= radius {
                        return Some(RayHit {
                            target: ProbeTarget::Player,
                            point,
                            distance: t,
                        });
                    }
                }
            }
            t += step;
        }
        None
    }
}

impl WorldProbe for GridWorld {
    fn ray_probe(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: ProbeFilter,
    ) -> Option<RayHit> {
        self.march(origin, direction, max_distance, filter)
    }

    fn box_probe(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        footprint: Vec2,
        filter: ProbeFilter,
    ) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        // Three parallel rays across the footprint width
        let lateral = Vec3::new(-direction.z, 0.0, direction.x);
        let half = footprint.x * 0.5;
        [-half, 0.0, half]
            .into_iter()
            .filter_map(|offset| self.march(origin + lateral * offset, direction, max_distance, filter))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{Cell, MazeGrid};

    /// 5x3 grid with a single-row corridor along y == 1.
    fn corridor_world() -> GridWorld {
        let mut maze = MazeGrid::filled(5, 3, Cell::Wall);
        for x in 1..4 {
            maze.set(x, 1, Cell::Floor);
        }
        GridWorld::new(&maze, 2.0)
    }

    #[test]
    fn test_ray_hits_corridor_end_wall() {
        let world = corridor_world();
        let origin = world.cell_to_world(1, 1) + Vec3::Y;

        let hit = world
            .ray_probe(origin, Vec3::X, 20.0, ProbeFilter::GEOMETRY)
            .expect("corridor ends in a wall");
        assert_eq!(hit.target, ProbeTarget::Wall);
        // Wall cell (4, 1) begins one half-cell past the center of (3, 1)
        assert!((hit.distance - 5.0).abs() < 0.2, "distance {}", hit.distance);
    }

    #[test]
    fn test_ray_misses_within_clear_distance() {
        let world = corridor_world();
        let origin = world.cell_to_world(1, 1) + Vec3::Y;

        assert!(world.ray_probe(origin, Vec3::X, 2.0, ProbeFilter::GEOMETRY).is_none());
    }

    #[test]
    fn test_player_blocks_only_when_filtered_in() {
        let mut world = corridor_world();
        let origin = world.cell_to_world(1, 1) + Vec3::Y;
        world.set_player(world.cell_to_world(3, 1) + Vec3::Y, 0.5);

        let hit = world
            .ray_probe(origin, Vec3::X, 20.0, ProbeFilter::ALL)
            .expect("player in the way");
        assert_eq!(hit.target, ProbeTarget::Player);
        assert!(hit.distance < 4.0);

        let hit = world
            .ray_probe(origin, Vec3::X, 20.0, ProbeFilter::GEOMETRY)
            .expect("wall behind the player");
        assert_eq!(hit.target, ProbeTarget::Wall);
    }

    #[test]
    fn test_box_probe_catches_offset_wall() {
        let world = corridor_world();
        // Origin nudged toward the corridor's side wall; the center ray
        // stays clear but the footprint edge clips the wall cells.
        let origin = world.cell_to_world(1, 1) + Vec3::Y + Vec3::Z * 0.8;

        assert!(world.ray_probe(origin, Vec3::X, 3.0, ProbeFilter::GEOMETRY).is_none());
        let hit = world.box_probe(origin, Vec3::X, 3.0, Vec2::new(1.0, 1.0), ProbeFilter::GEOMETRY);
        assert!(hit.is_some(), "footprint edge should clip the side wall");
    }

    #[test]
    fn test_zero_direction_returns_none() {
        let world = corridor_world();
        let origin = world.cell_to_world(2, 1);
        assert!(world.ray_probe(origin, Vec3::ZERO, 5.0, ProbeFilter::ALL).is_none());
    }

    #[test]
    fn test_outside_grid_is_solid() {
        let world = corridor_world();
        let origin = world.cell_to_world(1, 1) + Vec3::Y;

        let hit = world
            .ray_probe(origin, -Vec3::X, 20.0, ProbeFilter::GEOMETRY)
            .expect("grid edge is solid");
        assert_eq!(hit.target, ProbeTarget::Wall);
    }
}
