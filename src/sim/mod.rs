//! Simulation module
//!
//! Agents, combat, spawning, events, and the session that ties them to the
//! maze and navigation layers.

mod agent;
mod animation;
mod combat;
mod events;
mod session;
mod spawn;

pub use agent::{Agent, AgentConfig, AgentId, AgentKind, Lifecycle, PlayerState, VisualHandle};
pub use animation::SpriteAnimation;
pub use combat::{CombatConfig, CombatController, DamageOutcome};
pub use events::{EventQueue, SimEvent};
pub use session::{Session, SessionConfig};
pub use spawn::{SpawnConfig, SpawnDirector};
