//! Perlin noise ribbons modulated by two sliders

use glam::Vec2;
use noise::{NoiseFn, Perlin};

use crate::config::NoiseConfig;
use crate::error::Result;
use crate::input::{FrameInput, Slider};
use crate::layout::Viewport;
use crate::renderer::{Canvas, Color, DrawCmd, Palette, Stroke};
use crate::sketch::Sketch;

/// Colour period exponent, then wave period exponent
pub const SLIDERS: [Slider; 2] = [Slider::new(0.0, 20.0, 9.0), Slider::new(0.0, 10.0, 2.0)];

/// Noise-space distance between neighbouring lines
const LINE_OFFSET: f64 = 1e4;

pub struct NoiseLinesSketch {
    perlin: Perlin,
    lines: usize,
    step: f64,
    speed: f64,
    /// Noise-space offset, advanced every frame
    t: f64,
    frame: u64,
    color_exp: f32,
    wave_exp: f32,
    viewport: Viewport,
}

impl NoiseLinesSketch {
    pub fn new(viewport: Viewport, config: &NoiseConfig, seed: u64) -> Self {
        Self {
            perlin: Perlin::new(seed as u32),
            lines: config.lines,
            step: config.step,
            speed: config.speed,
            t: 0.0,
            frame: 0,
            color_exp: SLIDERS[0].default,
            wave_exp: SLIDERS[1].default,
            viewport,
        }
    }

    /// Perlin value remapped to [0, 1]
    fn noise01(&self, x: f64) -> f64 {
        (self.perlin.get([x, 0.0]) + 1.0) * 0.5
    }

    /// Stroke colour of line `j` at the current frame
    pub fn line_color(&self, j: usize) -> Color {
        let period = 10f64.powf(self.color_exp as f64);
        let s = (self.frame as f64 / period * j as f64).sin();
        let channel = |v: f64| v.clamp(0.0, 255.0) as u8;
        Color::rgb(channel(s * 255.0), channel(25.0 * j as f64), channel(10.0 * j as f64))
    }

    /// Vertices of line `j`; columns whose divisor vanishes are dropped
    pub fn line_points(&self, j: usize) -> Vec<Vec2> {
        let height = self.viewport.height as f64;
        let period = 10f64.powf(self.wave_exp as f64);
        let mut xoff = self.t + j as f64 * LINE_OFFSET;
        let mut points = Vec::with_capacity(self.viewport.width as usize);
        for i in 0..self.viewport.width as usize {
            let n = self.noise01(xoff) * height * j as f64;
            let s = (self.frame as f64 * (i as f64 / period)).sin();
            // sin mapped from [0, 1] onto [-100, 100]
            let y = n / (s * 200.0 - 100.0);
            xoff += self.step;
            let p = Vec2::new(i as f32, y as f32);
            if p.is_finite() {
                points.push(p);
            }
        }
        points
    }
}

impl Sketch for NoiseLinesSketch {
    fn name(&self) -> &'static str {
        "noise_lines"
    }

    fn update(&mut self, input: &FrameInput) -> Result<()> {
        self.color_exp = SLIDERS[0].value_or_default(input.slider(0));
        self.wave_exp = SLIDERS[1].value_or_default(input.slider(1));
        self.frame += 1;
        self.t += self.speed;
        Ok(())
    }

    fn render(&self, canvas: &mut dyn Canvas, palette: &Palette) -> Result<()> {
        canvas.clear(palette.stage)?;
        for j in 0..self.lines {
            let points = self.line_points(j);
            if points.len() < 2 {
                continue;
            }
            canvas.draw(DrawCmd::Polyline {
                points,
                stroke: Stroke::new(self.line_color(j), 2.0),
                closed: false,
            })?;
        }
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}
