//! Simulation event queue
//!
//! Double-buffered observability hook. Events pushed during one tick are
//! readable during the next, so consumers see a frame-consistent batch
//! regardless of update order.

use std::collections::VecDeque;

use glam::Vec3;

use crate::sim::AgentId;

/// Things that happened in the simulation.
///
/// Flow from the core to hosts (audio, UI, analytics) without coupling.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SimEvent {
    /// An agent entered the world.
    AgentSpawned {
        /// The new agent
        id: AgentId,
        /// Spawn position
        position: Vec3,
    },
    /// An agent took damage.
    AgentDamaged {
        /// The struck agent
        id: AgentId,
        /// Damage applied
        amount: u32,
        /// Health after the hit
        remaining: u32,
    },
    /// An agent died.
    AgentDied {
        /// The dead agent
        id: AgentId,
        /// Where it died
        position: Vec3,
    },
    /// The player took damage.
    PlayerDamaged {
        /// Damage applied
        amount: u32,
        /// Health after the hit
        remaining: u32,
    },
    /// A spawn request exceeded the available floor cells and was clamped.
    SpawnClamped {
        /// Agents requested
        requested: usize,
        /// Agents actually spawned
        spawned: usize,
    },
    /// The spawn director escalated its rate.
    SpawnRateRaised {
        /// New agents per spawn wave
        rate: u32,
    },
    /// A path query found no route.
    PathFailed {
        /// Query origin cell
        from: (usize, usize),
        /// Query goal cell
        to: (usize, usize),
    },
}

/// Double-buffered queue of [`SimEvent`]s.
///
/// `push` writes to the pending buffer; `swap` at the tick boundary makes
/// the previous tick's events visible to `iter`/`drain`.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<SimEvent>,
    processing: VecDeque<SimEvent>,
}

impl EventQueue {
    const DEFAULT_CAPACITY: usize = 64;

    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: VecDeque::with_capacity(Self::DEFAULT_CAPACITY),
            processing: VecDeque::with_capacity(Self::DEFAULT_CAPACITY),
        }
    }

    /// Record an event for the next tick's consumers.
    #[inline]
    pub fn push(&mut self, event: SimEvent) {
        self.pending.push_back(event);
    }

    /// Swap buffers at the tick boundary.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    /// Iterate the previous tick's events.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> {
        self.processing.iter()
    }

    /// Drain the previous tick's events.
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = SimEvent> + '_ {
        self.processing.drain(..)
    }

    /// Whether the readable buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    /// Number of readable events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    /// Drop everything, both buffers.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing.clear();
    }
}
