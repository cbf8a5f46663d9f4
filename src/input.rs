//! Per-frame input snapshot and numeric text parsing

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Input captured at the start of a frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Seconds since the previous frame
    pub dt: f32,
    /// Pointer position in canvas coordinates, if over the canvas
    pub pointer: Option<Vec2>,
    /// A click happened this frame (one-shot)
    pub pressed: bool,
    /// Key typed this frame (one-shot)
    pub key: Option<char>,
    /// Current slider values, in the order the sketch declared them
    pub sliders: Vec<f32>,
}

impl FrameInput {
    pub fn with_dt(dt: f32) -> Self {
        Self {
            dt,
            ..Self::default()
        }
    }

    /// Clear one-shot inputs so later substeps of the same frame don't replay them
    pub fn consume_one_shots(&mut self) {
        self.pressed = false;
        self.key = None;
    }

    /// Where the pointer was clicked this frame
    pub fn click(&self) -> Option<Vec2> {
        if self.pressed { self.pointer } else { None }
    }

    /// Case-insensitive key match
    pub fn key_is(&self, c: char) -> bool {
        self.key.is_some_and(|k| k.eq_ignore_ascii_case(&c))
    }

    pub fn slider(&self, index: usize) -> Option<f32> {
        self.sliders.get(index).copied()
    }
}

/// Parse a number from a text field, falling back on anything non-finite or non-numeric
pub fn parse_or(text: &str, fallback: f64) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => fallback,
    }
}

/// Range control description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slider {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl Slider {
    pub const fn new(min: f32, max: f32, default: f32) -> Self {
        Self { min, max, default }
    }

    /// Missing or non-finite values become the default; others are clamped into range
    pub fn value_or_default(&self, value: Option<f32>) -> f32 {
        match value {
            Some(v) if v.is_finite() => v.clamp(self.min, self.max.max(self.min)),
            _ => self.default,
        }
    }
}
