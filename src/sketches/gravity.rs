//! N-body gravity with fading trails

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::{GravityConfig, GravityScenario};
use crate::error::Result;
use crate::input::FrameInput;
use crate::layout::Viewport;
use crate::renderer::shapes::{speed_color, trail_segments};
use crate::renderer::{Align, Canvas, DrawCmd, Palette, Stroke};
use crate::sim::{Body, NBody};
use crate::sketch::Sketch;

/// Speed that maps to the hot end of the body colour ramp
const FAST_SPEED: f32 = 4.0;

pub struct GravitySketch {
    sim: NBody,
    viewport: Viewport,
    click_mass: f32,
    max_bodies: usize,
}

impl GravitySketch {
    pub fn new(
        viewport: Viewport,
        config: &GravityConfig,
        trail_len: usize,
        max_bodies: usize,
        seed: u64,
    ) -> Self {
        let mut sim = match config.scenario {
            GravityScenario::TwoBody => NBody::two_body(viewport.center(), config.params, trail_len),
            GravityScenario::Random { count } => {
                let mut rng = Pcg32::seed_from_u64(seed);
                NBody::random(count, viewport.size(), config.params, trail_len, &mut rng)
            }
        };
        sim.edges = config.edges;
        Self {
            sim,
            viewport,
            click_mass: config.click_mass,
            max_bodies,
        }
    }

    pub fn system(&self) -> &NBody {
        &self.sim
    }
}

impl Sketch for GravitySketch {
    fn name(&self) -> &'static str {
        "gravity"
    }

    fn update(&mut self, input: &FrameInput) -> Result<()> {
        if let Some(at) = input.click() {
            if self.sim.bodies.len() < self.max_bodies {
                self.sim.push_body(Body::new(at, Vec2::ZERO, self.click_mass));
                log::info!("gravity: dropped body #{} at ({:.0}, {:.0})", self.sim.bodies.len(), at.x, at.y);
            } else {
                log::debug!("gravity: body limit {} reached, click ignored", self.max_bodies);
            }
        }
        self.sim.step(self.viewport.size())
    }

    fn render(&self, canvas: &mut dyn Canvas, palette: &Palette) -> Result<()> {
        canvas.clear(palette.stage)?;

        for (body, trail) in self.sim.bodies.iter().zip(&self.sim.trails) {
            let color = speed_color(body.vel.length(), 0.0, FAST_SPEED, 1.0);
            for cmd in trail_segments(trail, color, 1.5) {
                canvas.draw(cmd)?;
            }
        }

        for body in &self.sim.bodies {
            canvas.draw(DrawCmd::Circle {
                center: body.pos,
                radius: body.radius.max(1.0),
                fill: Some(palette.stage_ink.with_alpha(150)),
                stroke: Some(Stroke::new(palette.stage_ink, 1.0)),
            })?;
        }

        canvas.text(
            Vec2::new(10.0, 10.0),
            &format!("bodies: {}  KE: {:.2}", self.sim.bodies.len(), self.sim.kinetic_energy()),
            11.0,
            palette.stage_ink.with_alpha(180),
            Align::Left,
        )
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}
