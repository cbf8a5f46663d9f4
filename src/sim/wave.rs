//! Travelling wave with exponential attenuation, A e^(-αx) cos(kx - phase)

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::map_range;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttenuatedWave {
    /// Amplitude at x = 0
    pub amplitude: f32,
    /// Spatial period in pixels
    pub wavelength: f32,
    /// Attenuation per pixel
    pub alpha: f32,
    pub alpha_max: f32,
    /// Temporal phase ωt
    pub phase: f32,
    /// Phase advance per frame
    pub omega: f32,
}

impl Default for AttenuatedWave {
    fn default() -> Self {
        Self {
            amplitude: 105.0,
            wavelength: 200.0,
            alpha: 0.003,
            alpha_max: 0.015,
            phase: 0.0,
            omega: 0.05,
        }
    }
}

impl AttenuatedWave {
    #[inline]
    pub fn wavenumber(&self) -> f32 {
        if self.wavelength > 0.0 { TAU / self.wavelength } else { 0.0 }
    }

    /// Decayed amplitude A e^(-αx)
    #[inline]
    pub fn envelope(&self, x: f32) -> f32 {
        self.amplitude * (-self.alpha * x).exp()
    }

    /// Signed displacement at `x`
    pub fn sample(&self, x: f32) -> f32 {
        self.envelope(x) * (self.wavenumber() * x - self.phase).cos()
    }

    /// Pointer x across the canvas maps linearly onto [0, alpha_max]
    pub fn set_alpha_from_pointer(&mut self, x: f32, width: f32) {
        self.alpha = map_range(x, 0.0, width, 0.0, self.alpha_max, true);
    }

    /// Attenuation as a share of the maximum, in percent
    pub fn alpha_percent(&self) -> f32 {
        if self.alpha_max > 0.0 {
            self.alpha / self.alpha_max * 100.0
        } else {
            0.0
        }
    }

    pub fn step(&mut self) {
        self.phase += self.omega;
    }
}
