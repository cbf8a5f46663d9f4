//! Viewport clamping and size-derived layout
//!
//! Everything here is recomputed from scratch on resize; nothing caches
//! an old size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MIN_VIEWPORT_SIZE;
use crate::sim::Rect;

/// Drawing surface size in CSS pixels, never smaller than the minimum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Clamp to the minimum size; NaN and negative sizes collapse to it as well
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: clamp_dim(width),
            height: clamp_dim(height),
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    pub fn rect(&self) -> Rect {
        Rect::new(Vec2::ZERO, self.size())
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.rect().contains(p)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(600.0, 400.0)
    }
}

fn clamp_dim(v: f32) -> f32 {
    if v.is_finite() { v.max(MIN_VIEWPORT_SIZE) } else { MIN_VIEWPORT_SIZE }
}

/// How a sketch derives its canvas height from the container width
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CanvasHeight {
    /// Use the container's own height
    Fill,
    Fixed(f32),
    /// `width * ratio`, clamped to [min, max]
    Ratio { ratio: f32, min: f32, max: f32 },
}

impl CanvasHeight {
    /// Size the canvas for a container; a collapsed container falls back to `fallback`
    pub fn viewport_for(&self, container_w: f32, container_h: f32, fallback: Viewport) -> Viewport {
        if container_w.is_nan() || container_w <= 0.0 {
            return fallback;
        }
        let height = match *self {
            CanvasHeight::Fill => container_h,
            CanvasHeight::Fixed(h) => h,
            CanvasHeight::Ratio { ratio, min, max } => {
                let hi = max.max(min);
                (container_w * ratio).clamp(min, hi)
            }
        };
        Viewport::new(container_w, height)
    }
}

/// Complex plane on the left, scrolling wave on the right
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhasorLayout {
    pub origin: Vec2,
    pub plot_radius: f32,
    pub wave_origin: Vec2,
    pub wave_width: f32,
    pub wave_height: f32,
    /// Samples kept in the wave trace
    pub history_len: usize,
}

impl PhasorLayout {
    pub const WAVE_GAP: f32 = 30.0;
    pub const RIGHT_MARGIN: f32 = 20.0;

    pub fn compute(viewport: &Viewport) -> Self {
        let origin = Vec2::new(viewport.width * 0.35, viewport.height * 0.5);
        let plot_radius = (origin.x * 0.8).min(origin.y * 0.9);

        let wave_x = (origin.x + plot_radius + Self::WAVE_GAP).min(viewport.width);
        let wave_width = (viewport.width - wave_x - Self::RIGHT_MARGIN).max(0.0);
        let wave_height = (plot_radius * 1.6).min(viewport.height);

        Self {
            origin,
            plot_radius,
            wave_origin: Vec2::new(wave_x, origin.y),
            wave_width,
            wave_height,
            history_len: (wave_width.floor() as usize).max(crate::sim::phasor::MIN_HISTORY),
        }
    }

    /// Phasor amplitude drawn relative to the plot radius
    pub fn amplitude(&self) -> f32 {
        self.plot_radius * 0.75
    }
}

/// Electric half on the left, magnetic half on the right
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitLayout {
    pub mid_x: f32,
    pub positive: Vec2,
    pub negative: Vec2,
    pub wire: Vec2,
    pub left: Rect,
    pub right: Rect,
}

impl SplitLayout {
    pub fn compute(viewport: &Viewport) -> Self {
        let w = viewport.width;
        let h = viewport.height;
        let mid_x = w * 0.5;
        // Charges sit symmetric about the middle of the left half, kept inside it
        let spread = (w * 0.15).min(mid_x * 0.45);
        Self {
            mid_x,
            positive: Vec2::new(mid_x * 0.5 - spread, h * 0.5),
            negative: Vec2::new(mid_x * 0.5 + spread, h * 0.5),
            wire: Vec2::new(mid_x + (w - mid_x) * 0.5, h * 0.5),
            left: Rect::new(Vec2::ZERO, Vec2::new(mid_x, h)),
            right: Rect::new(Vec2::new(mid_x, 0.0), Vec2::new(w, h)),
        }
    }

    /// Radius range of the magnetic loops
    pub fn loop_radii(&self, viewport: &Viewport) -> (f32, f32) {
        let r_max = self.mid_x * 0.40;
        let r_min = (viewport.width * 0.06).min(r_max);
        (r_min, r_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_viewport_clamps_degenerate_sizes() {
        let v = Viewport::new(0.0, -20.0);
        assert_eq!(v.width, MIN_VIEWPORT_SIZE);
        assert_eq!(v.height, MIN_VIEWPORT_SIZE);
        let v = Viewport::new(f32::NAN, f32::INFINITY);
        assert_eq!(v.size(), Vec2::splat(MIN_VIEWPORT_SIZE));
    }

    #[test]
    fn test_canvas_height_policies() {
        let fallback = Viewport::new(300.0, 240.0);
        let phasor = CanvasHeight::Ratio {
            ratio: 0.8,
            min: 300.0,
            max: 450.0,
        };
        assert_eq!(phasor.viewport_for(500.0, 0.0, fallback).height, 400.0);
        assert_eq!(phasor.viewport_for(200.0, 0.0, fallback).height, 300.0);
        assert_eq!(phasor.viewport_for(1000.0, 0.0, fallback).height, 450.0);
        assert_eq!(phasor.viewport_for(0.0, 0.0, fallback), fallback);
        assert_eq!(CanvasHeight::Fixed(300.0).viewport_for(800.0, 10.0, fallback).height, 300.0);
        assert_eq!(CanvasHeight::Fill.viewport_for(800.0, 600.0, fallback).height, 600.0);
    }

    #[test]
    fn test_phasor_layout_reference_size() {
        let layout = PhasorLayout::compute(&Viewport::new(800.0, 400.0));
        assert_eq!(layout.origin, Vec2::new(280.0, 200.0));
        assert_eq!(layout.plot_radius, 180.0);
        assert_eq!(layout.wave_origin.x, 490.0);
        assert_eq!(layout.history_len, 290);
    }

    #[test]
    fn test_split_layout_places_sources_per_half() {
        let layout = SplitLayout::compute(&Viewport::new(800.0, 400.0));
        assert_eq!(layout.mid_x, 400.0);
        assert!(layout.positive.abs_diff_eq(Vec2::new(80.0, 200.0), 1e-3));
        assert!(layout.negative.abs_diff_eq(Vec2::new(320.0, 200.0), 1e-3));
        assert!(layout.wire.abs_diff_eq(Vec2::new(600.0, 200.0), 1e-3));
    }

    proptest! {
        #[test]
        fn prop_layout_within_bounds_after_resize(w in -100.0f32..3000.0, h in -100.0f32..3000.0) {
            let viewport = Viewport::new(w, h);
            let rect = viewport.rect();

            let phasor = PhasorLayout::compute(&viewport);
            prop_assert!(rect.contains(phasor.origin));
            prop_assert!(phasor.plot_radius >= 0.0);
            prop_assert!(phasor.origin.x - phasor.plot_radius >= 0.0);
            prop_assert!(phasor.origin.y + phasor.plot_radius <= viewport.height);
            prop_assert!(phasor.wave_origin.x <= viewport.width);
            prop_assert!(phasor.wave_origin.x + phasor.wave_width <= viewport.width);
            prop_assert!(phasor.history_len >= 50);

            let split = SplitLayout::compute(&viewport);
            prop_assert!(split.left.contains(split.positive));
            prop_assert!(split.left.contains(split.negative));
            prop_assert!(split.right.contains(split.wire));
            let (r_min, r_max) = split.loop_radii(&viewport);
            prop_assert!(r_min <= r_max);
            prop_assert!(split.wire.x + r_max <= viewport.width + 1e-3);
        }
    }
}
