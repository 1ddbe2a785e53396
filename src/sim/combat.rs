//! Combat resolution
//!
//! Cooldown-gated attacks in both directions plus the knockback impulse
//! state machine. Agent attacks are line-of-sight checked through the world
//! probe; player attacks pick the nearest agent along the facing ray.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::nav::{ProbeFilter, ProbeTarget, WorldProbe};
use crate::sim::{Agent, AgentId, EventQueue, Lifecycle, PlayerState, SimEvent};

/// Combat tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatConfig {
    /// Ceiling applied to any knockback impulse
    pub max_knockback_force: f32,
    /// Knockback decay in units per second squared
    pub knockback_friction: f32,
    /// Score awarded per agent killed by the player
    pub score_per_kill: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            max_knockback_force: 7.0,
            knockback_friction: 30.0,
            score_per_kill: 10,
        }
    }
}

/// What a damage application did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Health reduced, agent still active
    Wounded,
    /// Health reached zero
    Killed,
    /// Target was already dead
    Ignored,
}

/// Resolves attacks and knockback.
#[derive(Debug, Clone, Default)]
pub struct CombatController {
    config: CombatConfig,
}

impl CombatController {
    /// Create a controller with the given tuning.
    #[must_use]
    pub fn new(config: CombatConfig) -> Self {
        Self { config }
    }

    /// Score awarded per kill.
    #[must_use]
    pub fn score_per_kill(&self) -> u32 {
        self.config.score_per_kill
    }

    /// Attempt an agent melee attack against the player.
    ///
    /// Gated by the agent's cooldown, then by a planar ray toward the player
    /// that must reach the player before any wall. Returns true when damage
    /// landed.
    pub fn try_agent_attack(
        &self,
        agent: &mut Agent,
        player: &mut PlayerState,
        world: &impl WorldProbe,
        now: f32,
        events: &mut EventQueue,
    ) -> bool {
        if now - agent.last_attack_time < agent.attack_cooldown {
            return false;
        }

        let mut to_player = player.position - agent.position;
        to_player.y = 0.0;
        let direction = to_player.normalize_or_zero();
        let reach = agent.attack_range + player.radius;
        let hit = world.ray_probe(agent.position, direction, reach, ProbeFilter::ALL);
        if !matches!(hit.map(|h| h.target), Some(ProbeTarget::Player)) {
            return false;
        }

        agent.last_attack_time = now;
        player.health = player.health.saturating_sub(agent.attack_damage);
        log::debug!(
            "{} hit player for {} ({} hp left)",
            agent.id,
            agent.attack_damage,
            player.health
        );
        events.push(SimEvent::PlayerDamaged {
            amount: agent.attack_damage,
            remaining: player.health,
        });
        true
    }

    /// Resolve a player melee swing.
    ///
    /// The swing itself is cooldown-gated and always stamps the attack time.
    /// The nearest active agent whose body cylinder intersects the facing
    /// ray within range takes damage and knockback; walls occlude the ray,
    /// so agents behind the first wall hit cannot be struck. Returns the
    /// struck agent and what happened to it, or `None` on a whiff.
    pub fn resolve_player_attack(
        &self,
        player: &mut PlayerState,
        agents: &mut [Agent],
        world: &impl WorldProbe,
        now: f32,
        events: &mut EventQueue,
    ) -> Option<(AgentId, DamageOutcome)> {
        if now - player.last_attack_time < player.attack_cooldown {
            return None;
        }
        player.last_attack_time = now;

        let forward = Vec2::new(player.forward.x, player.forward.z).normalize_or_zero();
        if forward == Vec2::ZERO {
            return None;
        }

        let wall_limit = world
            .ray_probe(
                player.position,
                Vec3::new(forward.x, 0.0, forward.y),
                player.attack_range,
                ProbeFilter::GEOMETRY,
            )
            .map_or(f32::INFINITY, |hit| hit.distance);

        let mut best: Option<(usize, f32)> = None;
        for (i, agent) in agents.iter().enumerate() {
            if !agent.is_active() {
                continue;
            }
            let offset = Vec2::new(
                agent.position.x - player.position.x,
                agent.position.z - player.position.z,
            );
            let along = offset.dot(forward);
            if along < 0.0 || along > player.attack_range || along > wall_limit {
                continue;
            }
            let lateral = (offset - forward * along).length();
            if lateral > agent.half_extents.x {
                continue;
            }
            if best.is_none_or(|(_, d)| along < d) {
                best = Some((i, along));
            }
        }

        let (index, _) = best?;
        let direction = agents[index].position - player.position;
        let force = player.knockback_force;
        let damage = player.attack_damage;
        let outcome = self.apply_damage(&mut agents[index], damage, direction, force, events);
        Some((agents[index].id, outcome))
    }

    /// Apply damage and a knockback impulse to an agent.
    ///
    /// The impulse direction is flattened to the XZ plane and its magnitude
    /// clamped to the configured ceiling.
    pub fn apply_damage(
        &self,
        agent: &mut Agent,
        amount: u32,
        direction: Vec3,
        force: f32,
        events: &mut EventQueue,
    ) -> DamageOutcome {
        if !agent.is_active() {
            return DamageOutcome::Ignored;
        }

        agent.health = agent.health.saturating_sub(amount);
        let mut planar = direction;
        planar.y = 0.0;
        agent.knockback_direction = planar.normalize_or_zero();
        agent.knockback = force.min(self.config.max_knockback_force);
        events.push(SimEvent::AgentDamaged {
            id: agent.id,
            amount,
            remaining: agent.health,
        });

        if agent.health == 0 {
            self.kill(agent, events);
            DamageOutcome::Killed
        } else {
            DamageOutcome::Wounded
        }
    }

    /// Mark an agent dead. Idempotent.
    pub fn kill(&self, agent: &mut Agent, events: &mut EventQueue) {
        if agent.lifecycle == Lifecycle::Dead {
            return;
        }
        agent.lifecycle = Lifecycle::Dead;
        log::info!("{} died at {:?}", agent.id, agent.position);
        events.push(SimEvent::AgentDied {
            id: agent.id,
            position: agent.position,
        });
    }

    /// Advance an agent's knockback displacement and decay for one tick.
    ///
    /// Returns true while the agent is still being knocked back; movement
    /// control is suspended for the duration.
    pub fn tick_knockback(&self, agent: &mut Agent, dt: f32) -> bool {
        if agent.knockback <= 0.0 {
            return false;
        }
        agent.position += agent.knockback_direction * agent.knockback * dt;
        agent.knockback = (agent.knockback - self.config.knockback_friction * dt).max(0.0);
        true
    }
}
