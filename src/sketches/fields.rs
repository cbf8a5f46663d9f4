//! Gauss's laws side by side: dipole field lines on the left, loops around a
//! current on the right, with tracer particles drifting along both

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::FieldConfig;
use crate::error::Result;
use crate::input::FrameInput;
use crate::layout::{SplitLayout, Viewport};
use crate::map_range;
use crate::renderer::shapes::polyline_arrows;
use crate::renderer::{Align, Canvas, Color, DrawCmd, Palette, Stroke};
use crate::sim::{
    ChargePair, FieldParticle, LineCurrent, Region, TraceParams, electric_field_lines,
    magnetic_loops,
};
use crate::sketch::Sketch;

const E_ARROW_SPACING: usize = 8;
const B_ARROW_SPACING: usize = 12;
/// Radius around the source charge where electric tracers appear
const E_SPAWN_RADIUS: f32 = 12.0;
const E_MIN_SPEED: f32 = 1.0;
const B_MIN_SPEED: f32 = 0.5;

pub struct FieldsSketch {
    layout: SplitLayout,
    viewport: Viewport,
    charges: ChargePair,
    wire: LineCurrent,
    trace: TraceParams,
    electric_count: usize,
    magnetic_count: usize,
    e_lines: Vec<Vec<Vec2>>,
    b_loops: Vec<Vec<Vec2>>,
    particles: Vec<FieldParticle>,
    rng: Pcg32,
}

impl FieldsSketch {
    pub fn new(viewport: Viewport, config: &FieldConfig, particles: usize, seed: u64) -> Self {
        let layout = SplitLayout::compute(&viewport);
        let mut rng = Pcg32::seed_from_u64(seed);
        let particles = (0..particles)
            .map(|_| FieldParticle::new(Region::Electric, &mut rng))
            .collect();
        let mut sketch = Self {
            layout,
            viewport,
            charges: ChargePair::new(layout.positive, layout.negative),
            wire: LineCurrent::new(layout.wire),
            trace: config.trace,
            electric_count: config.electric_lines,
            magnetic_count: config.magnetic_loops,
            e_lines: Vec::new(),
            b_loops: Vec::new(),
            particles,
            rng,
        };
        sketch.rebuild_e_lines();
        sketch.rebuild_b_loops();
        sketch.respawn_where(|_| true);
        sketch
    }

    pub fn charges(&self) -> &ChargePair {
        &self.charges
    }

    pub fn wire(&self) -> &LineCurrent {
        &self.wire
    }

    pub fn particles(&self) -> &[FieldParticle] {
        &self.particles
    }

    fn rebuild_e_lines(&mut self) {
        self.e_lines = electric_field_lines(&self.charges, self.electric_count, &self.layout.left, &self.trace)
            .into_iter()
            .map(|line| line.points)
            .collect();
    }

    fn rebuild_b_loops(&mut self) {
        let (r_min, r_max) = self.layout.loop_radii(&self.viewport);
        self.b_loops = magnetic_loops(&self.wire, r_min, r_max, self.magnetic_count);
    }

    /// Respawn every particle matching `pred` into a randomly chosen half
    fn respawn_where(&mut self, pred: impl Fn(&FieldParticle) -> bool) {
        let picked: Vec<usize> = (0..self.particles.len())
            .filter(|&i| pred(&self.particles[i]))
            .collect();
        for i in picked {
            self.respawn(i);
        }
    }

    fn respawn(&mut self, index: usize) {
        let region = if self.rng.random_bool(0.5) {
            Region::Electric
        } else {
            Region::Magnetic
        };
        let particle = &mut self.particles[index];
        particle.region = region;
        match region {
            Region::Electric => particle.respawn(
                self.charges.source(),
                E_SPAWN_RADIUS,
                E_MIN_SPEED,
                &self.charges,
                &mut self.rng,
            ),
            Region::Magnetic => {
                let r_min = self.viewport.width * 0.05;
                let r_max = self.layout.mid_x * 0.35;
                let radius = if r_max > r_min {
                    self.rng.random_range(r_min..r_max)
                } else {
                    r_min
                };
                particle.respawn(self.wire.center, radius, B_MIN_SPEED, &self.wire, &mut self.rng)
            }
        }
    }

    fn handle_click(&mut self, at: Vec2) {
        if !self.viewport.contains(at) {
            return;
        }
        if at.x < self.layout.mid_x {
            self.charges.flip();
            self.rebuild_e_lines();
            self.respawn_where(|p| p.region == Region::Electric);
            log::info!("fields: charge flipped to {}", self.charges.magnitude);
        } else {
            self.wire.reverse();
            self.rebuild_b_loops();
            self.respawn_where(|p| p.region == Region::Magnetic);
            log::info!("fields: current reversed to {}", self.wire.current);
        }
    }

    fn draw_lines(
        &self,
        canvas: &mut dyn Canvas,
        lines: &[Vec<Vec2>],
        color: Color,
        spacing: usize,
        closed: bool,
    ) -> Result<()> {
        for line in lines.iter().filter(|l| l.len() >= 2) {
            canvas.draw(DrawCmd::Polyline {
                points: line.clone(),
                stroke: Stroke::new(color.with_alpha(150), 1.0),
                closed,
            })?;
            for cmd in polyline_arrows(line, spacing, color.with_alpha(200)) {
                canvas.draw(cmd)?;
            }
        }
        Ok(())
    }

    fn draw_sources(&self, canvas: &mut dyn Canvas, palette: &Palette) -> Result<()> {
        let (source_color, sink_color) = if self.charges.magnitude > 0.0 {
            (palette.positive, palette.negative)
        } else {
            (palette.negative, palette.positive)
        };
        let (pos_sign, neg_sign) = if self.charges.magnitude > 0.0 { ("+", "-") } else { ("-", "+") };
        canvas.fill_circle(self.charges.positive, 10.0, source_color)?;
        canvas.fill_circle(self.charges.negative, 10.0, sink_color)?;
        canvas.text(self.charges.positive, pos_sign, 16.0, palette.background, Align::Center)?;
        canvas.text(self.charges.negative, neg_sign, 16.0, palette.background, Align::Center)?;

        let c = self.wire.center;
        canvas.draw(DrawCmd::Circle {
            center: c,
            radius: 7.5,
            fill: Some(palette.background),
            stroke: Some(Stroke::new(palette.wire, 2.0)),
        })?;
        if self.wire.current > 0.0 {
            // Out of the page
            canvas.fill_circle(c, 3.0, palette.wire)
        } else {
            let stroke = Stroke::new(palette.wire, 1.5);
            canvas.line(c + Vec2::new(-3.0, -3.0), c + Vec2::new(3.0, 3.0), stroke)?;
            canvas.line(c + Vec2::new(-3.0, 3.0), c + Vec2::new(3.0, -3.0), stroke)
        }
    }

    fn draw_labels(&self, canvas: &mut dyn Canvas, palette: &Palette) -> Result<()> {
        let mid = self.layout.mid_x;
        let columns = [
            (
                mid * 0.5,
                ["Gauss's Law for E", "∇⋅D = ρ", "(Field lines start/end on charge)", "Click E-side to flip charge"],
            ),
            (
                mid + (self.viewport.width - mid) * 0.5,
                ["Gauss's Law for B", "∇⋅B = 0", "(Field lines form closed loops)", "Click B-side to reverse current"],
            ),
        ];
        for (x, [title, law, note, hint]) in columns {
            canvas.text(Vec2::new(x, 25.0), title, 14.0, palette.text, Align::Center)?;
            canvas.text(Vec2::new(x, 45.0), law, 11.0, palette.text.with_alpha(200), Align::Center)?;
            canvas.text(Vec2::new(x, 60.0), note, 9.0, palette.text.with_alpha(150), Align::Center)?;
            canvas.text(Vec2::new(x, 75.0), hint, 9.0, palette.text.with_alpha(150), Align::Center)?;
        }
        Ok(())
    }
}

impl Sketch for FieldsSketch {
    fn name(&self) -> &'static str {
        "fields"
    }

    fn update(&mut self, input: &FrameInput) -> Result<()> {
        if let Some(at) = input.click() {
            self.handle_click(at);
        }

        for i in 0..self.particles.len() {
            let particle = &mut self.particles[i];
            let expired = match particle.region {
                Region::Electric => particle.update(&self.charges, &self.layout.left),
                Region::Magnetic => particle.update(&self.wire, &self.layout.right),
            };
            if expired {
                self.respawn(i);
            }
        }
        Ok(())
    }

    fn render(&self, canvas: &mut dyn Canvas, palette: &Palette) -> Result<()> {
        canvas.clear(palette.background)?;
        let mid = self.layout.mid_x;
        canvas.line(
            Vec2::new(mid, 0.0),
            Vec2::new(mid, self.viewport.height),
            Stroke::new(palette.text.with_alpha(50), 1.0),
        )?;

        self.draw_lines(canvas, &self.e_lines, palette.e_line, E_ARROW_SPACING, false)?;
        self.draw_lines(canvas, &self.b_loops, palette.b_line, B_ARROW_SPACING, true)?;
        self.draw_sources(canvas, palette)?;

        for particle in &self.particles {
            let alpha = map_range(particle.lifespan, 0.0, particle.orig_lifespan * 0.6, 0.0, 180.0, true);
            let scale = map_range(particle.lifespan, 0.0, particle.orig_lifespan, 0.2, 1.0, true);
            canvas.fill_circle(
                particle.pos,
                particle.base_size * scale * 0.5,
                palette.particle.with_alpha(alpha as u8),
            )?;
        }

        self.draw_labels(canvas, palette)
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.layout = SplitLayout::compute(&viewport);
        self.charges.positive = self.layout.positive;
        self.charges.negative = self.layout.negative;
        self.wire.center = self.layout.wire;
        self.rebuild_e_lines();
        self.rebuild_b_loops();
        self.respawn_where(|_| true);
    }
}
