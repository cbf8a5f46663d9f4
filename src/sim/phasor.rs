//! Rotating phasor A·e^(i(φ - ωt)) with a scrolling trace of its real part

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::trail::Trail;
use crate::normalize_angle;

/// Minimum number of samples kept in the wave trace
pub const MIN_HISTORY: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phasor {
    pub amplitude: f32,
    /// Initial phase φ (radians)
    pub phase: f32,
    /// Angular speed ω (radians per frame)
    pub omega: f32,
    /// Time in frames, only ever increases
    pub time: f32,
    /// Real projection per frame, newest first
    pub history: Trail<f32>,
}

impl Phasor {
    pub fn new(amplitude: f32, phase: f32, omega: f32, history_len: usize) -> Self {
        Self {
            amplitude,
            phase,
            omega,
            time: 0.0,
            history: Trail::new(history_len.max(MIN_HISTORY)),
        }
    }

    /// Current angle φ - ωt (negative rotation, physics convention)
    #[inline]
    pub fn angle(&self) -> f32 {
        self.phase - self.omega * self.time
    }

    /// Tip of the rotating vector relative to the origin (math axes, +y up)
    pub fn position(&self) -> Vec2 {
        let angle = self.angle();
        Vec2::new(self.amplitude * angle.cos(), self.amplitude * angle.sin())
    }

    /// Record the real projection, then advance by `dt_frames`
    pub fn step(&mut self, dt_frames: f32) {
        let real = self.position().x;
        self.history.push(real);
        self.time += dt_frames.max(0.0);
    }

    /// Resize the trace; old samples no longer line up with the new layout
    pub fn set_history_len(&mut self, len: usize) {
        self.history = Trail::new(len.max(MIN_HISTORY));
    }

    /// Phase in degrees within [0, 360)
    pub fn phase_degrees(&self) -> f32 {
        let deg = normalize_angle(self.phase).to_degrees();
        if deg < 0.0 { deg + 360.0 } else { deg }
    }
}
