//! Agent and player data records
//!
//! Agents are plain data; navigation, combat, and animation are separate
//! capability modules operating over them, selected by configuration.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::sim::SpriteAnimation;

/// Identifier for a spawned agent, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// Opaque handle to a host-side visual (texture, sprite sheet, model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VisualHandle(pub u32);

/// How an agent interacts with the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentKind {
    /// Billboard sprite pinned to its spawn height
    Sprite,
    /// Grounded body with gravity and a ground-plane clamp
    Grounded,
}

/// Agent lifecycle flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Ticked normally
    Active,
    /// Inert; removed by the next reap
    Dead,
}

/// Construction template for spawned agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Starting health
    pub health: u32,
    /// Movement speed in world units per second
    pub speed: f32,
    /// Planar distance at which movement yields to attacking
    pub attack_range: f32,
    /// Damage per landed attack
    pub attack_damage: u32,
    /// Minimum simulated seconds between attacks
    pub attack_cooldown: f32,
    /// Half extents of the collision footprint
    pub half_extents: Vec3,
    /// Vertical behavior
    pub kind: AgentKind,
    /// Visual used for director-spawned agents
    pub visual: VisualHandle,
    /// Sprite animation template, cloned per agent
    pub animation: Option<SpriteAnimation>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            health: 100,
            speed: 2.5,
            attack_range: 1.5,
            attack_damage: 10,
            attack_cooldown: 1.5,
            half_extents: Vec3::new(0.5, 1.0, 0.5),
            kind: AgentKind::Sprite,
            visual: VisualHandle::default(),
            animation: None,
        }
    }
}

/// A hostile agent.
///
/// Owned by the spawn director's active collection; mutated by the
/// navigator and the combat controller.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Session-unique id
    pub id: AgentId,
    /// Host-side visual handle, opaque to the core
    pub visual: VisualHandle,
    /// Vertical behavior
    pub kind: AgentKind,
    /// World position (center of the footprint)
    pub position: Vec3,
    /// Facing angle around Y, radians
    pub yaw: f32,
    /// Remaining health, saturating at 0
    pub health: u32,
    /// Movement speed
    pub speed: f32,
    /// Attack reach (planar)
    pub attack_range: f32,
    /// Damage per landed attack
    pub attack_damage: u32,
    /// Cooldown between attacks, simulated seconds
    pub attack_cooldown: f32,
    /// Timestamp of the last landed attack
    pub last_attack_time: f32,
    /// Remaining knockback magnitude, >= 0
    pub knockback: f32,
    /// Horizontal unit direction of the active knockback
    pub knockback_direction: Vec3,
    /// Vertical velocity for the grounded variant
    pub velocity_y: f32,
    /// Collision footprint half extents
    pub half_extents: Vec3,
    /// Lifecycle flag
    pub lifecycle: Lifecycle,
    /// Per-agent sprite animation state
    pub animation: Option<SpriteAnimation>,
}

impl Agent {
    /// Build an active agent from a config template.
    ///
    /// `position` is the ground point; the agent rests with its center at
    /// half its height. The first attack is allowed immediately.
    #[must_use]
    pub fn from_config(id: AgentId, config: &AgentConfig, position: Vec3, visual: VisualHandle) -> Self {
        Self {
            id,
            visual,
            kind: config.kind,
            position: Vec3::new(position.x, config.half_extents.y, position.z),
            yaw: 0.0,
            health: config.health,
            speed: config.speed,
            attack_range: config.attack_range,
            attack_damage: config.attack_damage,
            attack_cooldown: config.attack_cooldown,
            last_attack_time: -config.attack_cooldown,
            knockback: 0.0,
            knockback_direction: Vec3::ZERO,
            velocity_y: 0.0,
            half_extents: config.half_extents,
            lifecycle: Lifecycle::Active,
            animation: config.animation.clone(),
        }
    }

    /// Whether the agent still takes part in the simulation.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }
}

/// The controlled agent.
///
/// Position and facing are written by the host each tick; the core reads
/// them and mutates health.
#[derive(Debug, Clone)]
pub struct PlayerState {
    /// World position
    pub position: Vec3,
    /// Facing direction (unit)
    pub forward: Vec3,
    /// Remaining health, saturating at 0
    pub health: u32,
    /// Melee damage
    pub attack_damage: u32,
    /// Melee reach
    pub attack_range: f32,
    /// Cooldown between swings, simulated seconds
    pub attack_cooldown: f32,
    /// Timestamp of the last swing
    pub last_attack_time: f32,
    /// Knockback force dealt to struck agents
    pub knockback_force: f32,
    /// Body radius used by world probes
    pub radius: f32,
}

impl PlayerState {
    /// Player at a position with default melee stats.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::Z,
            health: 100,
            attack_damage: 50,
            attack_range: 5.0,
            attack_cooldown: 0.5,
            last_attack_time: -0.5,
            knockback_force: 15.0,
            radius: 0.5,
        }
    }
}
