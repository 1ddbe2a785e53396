//! A maze dungeon-crawl simulation core
//!
//! This crate provides:
//! - Procedural maze generation with a connectivity guarantee
//! - A* pathfinding over the maze grid
//! - Reactive agent navigation through world probes
//! - Combat, knockback, and a timed spawn director

pub mod maze;
pub mod nav;
pub mod sim;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::maze::{Cell, Layout, LayoutError, MazeGrid};
    pub use crate::nav::{
        AgentNavigator, GridWorld, NavAction, NavGrid, ProbeFilter, WorldProbe, distance_xz,
        find_path,
    };
    pub use crate::sim::{
        Agent, AgentConfig, AgentId, AgentKind, CombatConfig, DamageOutcome, EventQueue,
        PlayerState, Session, SessionConfig, SimEvent, SpawnConfig, SpriteAnimation,
    };
    pub use glam::{Vec2, Vec3};
}
