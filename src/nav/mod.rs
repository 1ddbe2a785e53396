//! Navigation module
//!
//! Provides grid pathfinding, the world-probe interface, and per-agent
//! reactive steering.

mod navigator;
mod pathfinding;
mod probe;

pub use navigator::{AgentNavigator, NavAction, NavigatorConfig, distance_xz};
pub use pathfinding::{NavGrid, find_path};
pub use probe::{GridWorld, ProbeFilter, ProbeTarget, RayHit, WorldProbe};
