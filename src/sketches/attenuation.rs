//! Wave decaying as it travels; pointer x sets the attenuation

use glam::Vec2;

use crate::error::{Result, SketchError};
use crate::input::FrameInput;
use crate::layout::Viewport;
use crate::renderer::{Align, Canvas, DrawCmd, Palette, Stroke};
use crate::sim::AttenuatedWave;
use crate::sketch::Sketch;

/// Initial amplitude as a share of the canvas height
const AMPLITUDE_RATIO: f32 = 0.35;
const WAVE_STEP: usize = 5;
const ENVELOPE_STEP: usize = 10;
const GRID_SPACING: usize = 50;

pub struct AttenuationSketch {
    wave: AttenuatedWave,
    viewport: Viewport,
}

impl AttenuationSketch {
    pub fn new(viewport: Viewport, config: &AttenuatedWave) -> Result<Self> {
        if !config.wavelength.is_finite() || config.wavelength <= 0.0 {
            return Err(SketchError::InvalidParameter(format!(
                "wavelength {}",
                config.wavelength
            )));
        }
        if !config.alpha_max.is_finite() || config.alpha_max < 0.0 {
            return Err(SketchError::InvalidParameter(format!("alpha_max {}", config.alpha_max)));
        }
        let mut wave = *config;
        wave.amplitude = viewport.height * AMPLITUDE_RATIO;
        wave.alpha = wave.alpha.clamp(0.0, wave.alpha_max);
        Ok(Self { wave, viewport })
    }

    pub fn wave(&self) -> &AttenuatedWave {
        &self.wave
    }

    fn center_y(&self) -> f32 {
        self.viewport.height * 0.5
    }

    /// Columns 0, step, 2·step, ... up to and including the canvas width
    fn columns(&self, step: usize) -> impl Iterator<Item = f32> {
        let width = self.viewport.width;
        (0..=width as usize).step_by(step).map(|x| x as f32)
    }

    fn draw_grid(&self, canvas: &mut dyn Canvas, palette: &Palette) -> Result<()> {
        let stroke = Stroke::new(palette.grid.with_alpha(100), 0.5);
        let (w, h) = (self.viewport.width, self.viewport.height);
        let cy = self.center_y();
        canvas.line(Vec2::new(0.0, cy), Vec2::new(w, cy), stroke)?;
        for x in (0..w as usize).step_by(GRID_SPACING) {
            let x = x as f32;
            canvas.line(Vec2::new(x, 0.0), Vec2::new(x, h), stroke)?;
        }
        for y in (0..h as usize).step_by(GRID_SPACING) {
            let y = y as f32;
            // Leave the centre line clear
            if (y - cy).abs() > 10.0 {
                canvas.line(Vec2::new(0.0, y), Vec2::new(w, y), stroke)?;
            }
        }
        Ok(())
    }
}

impl Sketch for AttenuationSketch {
    fn name(&self) -> &'static str {
        "attenuation"
    }

    fn update(&mut self, input: &FrameInput) -> Result<()> {
        if let Some(p) = input.pointer {
            self.wave.set_alpha_from_pointer(p.x, self.viewport.width);
        }
        self.wave.step();
        Ok(())
    }

    fn render(&self, canvas: &mut dyn Canvas, palette: &Palette) -> Result<()> {
        canvas.clear(palette.background)?;
        self.draw_grid(canvas, palette)?;

        let cy = self.center_y();
        canvas.draw(DrawCmd::Polyline {
            points: self
                .columns(WAVE_STEP)
                .map(|x| Vec2::new(x, cy + self.wave.sample(x)))
                .collect(),
            stroke: Stroke::new(palette.primary, 2.5),
            closed: false,
        })?;

        let envelope = Stroke::new(palette.text_muted.with_alpha(100), 1.0);
        for sign in [-1.0, 1.0] {
            canvas.draw(DrawCmd::Polyline {
                points: self
                    .columns(ENVELOPE_STEP)
                    .map(|x| Vec2::new(x, cy + sign * self.wave.envelope(x)))
                    .collect(),
                stroke: envelope,
                closed: false,
            })?;
        }

        canvas.text(
            Vec2::new(10.0, 10.0),
            &format!(
                "Conceptual Attenuation α ~ {:.0}% (linked to ε'')",
                self.wave.alpha_percent()
            ),
            12.0,
            palette.text_muted,
            Align::Left,
        )?;
        canvas.text(
            Vec2::new(10.0, 30.0),
            "(Move mouse horizontally to change attenuation)",
            10.0,
            palette.text_muted,
            Align::Left,
        )
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.wave.amplitude = viewport.height * AMPLITUDE_RATIO;
    }
}
