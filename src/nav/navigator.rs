//! Reactive agent navigation
//!
//! Per-tick local steering using only immediate obstacle probes. Moves an
//! agent toward its target, sidestepping walls, or hands off to combat when
//! within attack range. No global planning happens here; see
//! [`crate::nav::find_path`] for the explicit planner.

use glam::{Vec2, Vec3};

use crate::nav::{ProbeFilter, WorldProbe};
use crate::sim::{Agent, AgentKind};

/// Planar (XZ) distance between two points.
#[must_use]
pub fn distance_xz(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(b.x - a.x, b.z - a.z).length()
}

/// Outcome of one navigation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    /// The agent moved (or held position while blocked)
    Moved,
    /// The target is within attack range; combat should resolve
    Attack,
}

/// Navigator tuning.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NavigatorConfig {
    /// Forward/lateral probe distance
    pub lookahead: f32,
    /// Footprint shrink factor for lateral box probes, avoids snagging on
    /// walls the body already clears
    pub probe_shrink: f32,
    /// Downward acceleration for grounded agents
    pub gravity: f32,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            lookahead: 1.0,
            probe_shrink: 0.9,
            gravity: -9.81,
        }
    }
}

/// Per-agent reactive movement and obstacle avoidance.
#[derive(Debug, Clone, Default)]
pub struct AgentNavigator {
    config: NavigatorConfig,
}

impl AgentNavigator {
    /// Create a navigator with the given tuning.
    #[must_use]
    pub fn new(config: NavigatorConfig) -> Self {
        Self { config }
    }

    /// Advance one agent for one tick.
    ///
    /// The agent re-faces the target every tick regardless of movement
    /// outcome. Returns [`NavAction::Attack`] once the planar distance to
    /// the target is within the agent's attack range.
    pub fn tick(
        &self,
        agent: &mut Agent,
        target: Vec3,
        world: &impl WorldProbe,
        dt: f32,
    ) -> NavAction {
        let mut direction = target - agent.position;
        direction.y = 0.0;
        let direction = direction.normalize_or_zero();

        if direction != Vec3::ZERO {
            agent.yaw = direction.x.atan2(direction.z);
        }

        if agent.kind == AgentKind::Grounded {
            self.apply_gravity(agent, dt);
        }

        if distance_xz(agent.position, target) <= agent.attack_range {
            return NavAction::Attack;
        }

        let origin = agent.position;
        let step = agent.speed * dt;

        // Clear ahead: move straight at the target.
        if world
            .ray_probe(origin, direction, self.config.lookahead, ProbeFilter::GEOMETRY)
            .is_none()
        {
            agent.position += direction * step;
            return NavAction::Moved;
        }

        // Wall ahead: try sidestepping left, then right.
        let footprint = Vec2::new(agent.half_extents.x, agent.half_extents.z)
            * 2.0
            * self.config.probe_shrink;
        let left = Vec3::new(-direction.z, 0.0, direction.x);
        if world
            .box_probe(origin, left, self.config.lookahead, footprint, ProbeFilter::GEOMETRY)
            .is_none()
        {
            agent.position += left * step;
            return NavAction::Moved;
        }
        let right = -left;
        if world
            .box_probe(origin, right, self.config.lookahead, footprint, ProbeFilter::GEOMETRY)
            .is_none()
        {
            agent.position += right * step;
            return NavAction::Moved;
        }

        // Boxed in: slide along the dominant world axis of the intended
        // direction, dropping the other component. Known to stall against
        // certain concave corners; kept as documented behavior.
        let slide = if direction.x.abs() > direction.z.abs() {
            Vec3::new(direction.x, 0.0, 0.0)
        } else {
            Vec3::new(0.0, 0.0, direction.z)
        };
        agent.position += slide * step;
        log::trace!("{} sliding along wall at {:?}", agent.id, agent.position);
        NavAction::Moved
    }

    /// Integrate gravity and clamp to the ground plane.
    fn apply_gravity(&self, agent: &mut Agent, dt: f32) {
        agent.velocity_y += self.config.gravity * dt;
        agent.position.y += agent.velocity_y * dt;
        if agent.position.y < agent.half_extents.y {
            agent.position.y = agent.half_extents.y;
            agent.velocity_y = 0.0;
        }
    }
}
