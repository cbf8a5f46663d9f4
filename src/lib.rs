//! Sketchbook - a gallery of small physics sketches
//!
//! Core modules:
//! - `sim`: Per-frame simulation state and step rules (no rendering)
//! - `sketches`: Concrete sketches combining a sim with a render step
//! - `driver`: Frame driver (fixed-step update, render, pause, halt on error)
//! - `gallery`: Container registry and active-sketch switching
//! - `renderer`: Draw commands, palettes and canvas backends
//! - `layout`: Viewport clamping and size-derived layout constants

pub mod config;
pub mod driver;
pub mod error;
pub mod explorer;
pub mod gallery;
pub mod input;
pub mod layout;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod sketch;
pub mod sketches;

pub use config::GalleryConfig;
pub use driver::{FrameDriver, LoopState};
pub use error::{Result, SketchError};
pub use gallery::{ContainerInfo, Gallery, Host};
pub use input::FrameInput;
pub use layout::Viewport;
pub use settings::{QualityPreset, Settings, Theme};
pub use sketch::{Features, Mounted, Sketch, SketchKind};

use glam::Vec2;

/// Frame and layout constants
pub mod consts {
    /// Fixed update step (sketches count time in frames at 60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Largest frame delta accepted before clamping (tab switches etc.)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Smallest drawing surface we ever lay out against
    pub const MIN_VIEWPORT_SIZE: f32 = 16.0;

    /// Gravity defaults
    pub const GRAVITY_G: f32 = 1.0;
    pub const GRAVITY_MIN_DISTANCE: f32 = 5.0;
    pub const GRAVITY_MAX_DISTANCE: f32 = 50.0;

    /// Default number of positions kept per body trail
    pub const TRAIL_LENGTH: usize = 120;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Re-map a value from one range to another, optionally clamping to the output range
#[inline]
pub fn map_range(value: f32, in_lo: f32, in_hi: f32, out_lo: f32, out_hi: f32, clamp: bool) -> f32 {
    let span = in_hi - in_lo;
    if span == 0.0 {
        return out_lo;
    }
    let mapped = out_lo + (value - in_lo) / span * (out_hi - out_lo);
    if clamp {
        let (lo, hi) = if out_lo <= out_hi {
            (out_lo, out_hi)
        } else {
            (out_hi, out_lo)
        };
        mapped.clamp(lo, hi)
    } else {
        mapped
    }
}

/// Clamp a vector's length to `max` (direction preserved)
#[inline]
pub fn limit(v: Vec2, max: f32) -> Vec2 {
    if v.length_squared() > max * max {
        v.normalize_or_zero() * max
    } else {
        v
    }
}

/// Rescale a vector to the given length (zero stays zero)
#[inline]
pub fn set_mag(v: Vec2, mag: f32) -> Vec2 {
    v.normalize_or_zero() * mag
}
