//! Timed spawn director
//!
//! Owns the live agent collection. Spawns waves on a fixed interval at
//! random floor cells, escalating the wave size over time, independent of
//! how many agents are still alive.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::sim::{Agent, AgentConfig, AgentId, EventQueue, SimEvent, VisualHandle};

/// Spawn director tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Agents per wave at session start
    pub initial_rate: u32,
    /// Simulated seconds between waves
    pub spawn_interval: f32,
    /// Wave size increase per escalation
    pub rate_increment: u32,
    /// Simulated seconds between escalations
    pub increment_interval: f32,
    /// Template for spawned agents
    pub agent: AgentConfig,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            initial_rate: 2,
            spawn_interval: 10.0,
            rate_increment: 1,
            increment_interval: 30.0,
            agent: AgentConfig::default(),
        }
    }
}

/// Spawns agent waves on a timer and tracks the live population.
#[derive(Debug)]
pub struct SpawnDirector {
    config: SpawnConfig,
    spawn_rate: u32,
    next_spawn_time: f32,
    last_increment_time: f32,
    survival_start: f32,
    spawn_points: Vec<Vec3>,
    agents: Vec<Agent>,
    next_id: u32,
}

impl SpawnDirector {
    /// Create a director over a fixed set of candidate spawn points.
    ///
    /// The first wave fires on the first tick at or after `now`.
    #[must_use]
    pub fn new(config: SpawnConfig, spawn_points: Vec<Vec3>, now: f32) -> Self {
        Self {
            spawn_rate: config.initial_rate,
            next_spawn_time: now,
            last_increment_time: now,
            survival_start: now,
            config,
            spawn_points,
            agents: Vec::new(),
            next_id: 0,
        }
    }

    /// Current wave size.
    #[must_use]
    pub fn spawn_rate(&self) -> u32 {
        self.spawn_rate
    }

    /// Visual handle from the agent template.
    #[must_use]
    pub fn template_visual(&self) -> VisualHandle {
        self.config.agent.visual
    }

    /// Simulated seconds survived so far.
    #[must_use]
    pub fn survival_time(&self, now: f32) -> f32 {
        now - self.survival_start
    }

    /// Live agents, dead ones included until the next reap.
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Mutable view of the agent collection.
    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    /// Run the spawn and escalation timers for one tick.
    pub fn tick(&mut self, now: f32, rng: &mut fastrand::Rng, events: &mut EventQueue) {
        if now >= self.next_spawn_time {
            self.spawn_wave(rng, events);
            self.next_spawn_time = now + self.config.spawn_interval;
        }
        if now - self.last_increment_time >= self.config.increment_interval {
            self.spawn_rate += self.config.rate_increment;
            self.last_increment_time = now;
            log::info!("spawn rate raised to {}", self.spawn_rate);
            events.push(SimEvent::SpawnRateRaised {
                rate: self.spawn_rate,
            });
        }
    }

    /// Spawn one agent from the template at an explicit position.
    pub fn spawn_at(
        &mut self,
        position: Vec3,
        visual: VisualHandle,
        events: &mut EventQueue,
    ) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        let agent = Agent::from_config(id, &self.config.agent, position, visual);
        log::debug!("{} spawned at {:?}", id, agent.position);
        events.push(SimEvent::AgentSpawned {
            id,
            position: agent.position,
        });
        self.agents.push(agent);
        id
    }

    /// Remove dead agents; returns how many were removed.
    pub fn reap(&mut self) -> usize {
        let before = self.agents.len();
        self.agents.retain(Agent::is_active);
        before - self.agents.len()
    }

    /// Spawn one wave at distinct random spawn points.
    ///
    /// A wave larger than the candidate set is clamped; every agent in a
    /// wave gets its own cell.
    fn spawn_wave(&mut self, rng: &mut fastrand::Rng, events: &mut EventQueue) {
        let requested = self.spawn_rate as usize;
        let count = requested.min(self.spawn_points.len());
        if count < requested {
            log::warn!(
                "wave of {requested} clamped to {count} available spawn points"
            );
            events.push(SimEvent::SpawnClamped {
                requested,
                spawned: count,
            });
        }

        // Partial Fisher-Yates over the candidate list.
        for i in 0..count {
            let j = rng.usize(i..self.spawn_points.len());
            self.spawn_points.swap(i, j);
            let position = self.spawn_points[i];
            let visual = self.config.agent.visual;
            self.spawn_at(position, visual, events);
        }
    }
}
