//! Sprite animation state
//!
//! Explicit, per-owner frame state. Sprite agents own one; hosts reuse the
//! same type for torch frames instead of global frame counters.

use serde::{Deserialize, Serialize};

/// Timer-driven frame stepping for a looping sprite sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteAnimation {
    /// Total frames in the sheet
    frame_count: u32,
    /// Seconds per frame
    frame_delay: f32,
    /// Current frame
    frame_index: u32,
    /// Time accumulated toward the next frame
    #[serde(default, skip)]
    timer: f32,
}

impl SpriteAnimation {
    /// Create a looping animation starting at frame 0.
    #[must_use]
    pub fn new(frame_count: u32, frame_delay: f32) -> Self {
        Self {
            frame_count: frame_count.max(1),
            frame_delay,
            frame_index: 0,
            timer: 0.0,
        }
    }

    /// Current frame index.
    #[must_use]
    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    /// Advance the timer; returns the new frame index when it changed.
    pub fn advance(&mut self, dt: f32) -> Option<u32> {
        self.timer += dt;
        if self.timer < self.frame_delay {
            return None;
        }
        self.timer = 0.0;
        self.frame_index = (self.frame_index + 1) % self.frame_count;
        Some(self.frame_index)
    }

    /// Rewind to frame 0.
    pub fn reset(&mut self) {
        self.frame_index = 0;
        self.timer = 0.0;
    }
}
