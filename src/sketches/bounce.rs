//! A ball bouncing around the inside of a wireframe cube

use crate::error::{Result, SketchError};
use crate::input::FrameInput;
use crate::layout::Viewport;
use crate::renderer::shapes::{cube_edges, project};
use crate::renderer::{Canvas, DrawCmd, Palette, Stroke};
use crate::sim::{BounceConfig, BouncingBall};
use crate::sketch::Sketch;

/// Share of the shorter canvas side the cube spans
const FIT: f32 = 0.6;

pub struct BounceSketch {
    sim: BouncingBall,
    viewport: Viewport,
}

impl BounceSketch {
    pub fn new(viewport: Viewport, config: &BounceConfig) -> Result<Self> {
        if !config.box_side.is_finite() || config.box_side <= 0.0 {
            return Err(SketchError::InvalidParameter(format!("box side {}", config.box_side)));
        }
        if !config.ball_radius.is_finite() || config.ball_radius < 0.0 {
            return Err(SketchError::InvalidParameter(format!(
                "ball radius {}",
                config.ball_radius
            )));
        }
        Ok(Self {
            sim: BouncingBall::new(config),
            viewport,
        })
    }

    pub fn ball(&self) -> &BouncingBall {
        &self.sim
    }

    /// World-to-canvas scale so the projected cube fits the viewport
    fn scale(&self) -> f32 {
        self.viewport.width.min(self.viewport.height) * FIT / self.sim.box_side
    }
}

impl Sketch for BounceSketch {
    fn name(&self) -> &'static str {
        "bounce"
    }

    fn update(&mut self, _input: &FrameInput) -> Result<()> {
        self.sim.step();
        if !self.sim.ball.pos.is_finite() {
            return Err(SketchError::NonFinite("bounce"));
        }
        Ok(())
    }

    fn render(&self, canvas: &mut dyn Canvas, palette: &Palette) -> Result<()> {
        canvas.clear(palette.stage)?;
        let center = self.viewport.center();
        let scale = self.scale();
        for cmd in cube_edges(self.sim.box_side, center, scale, Stroke::new(palette.stage_ink, 1.0)) {
            canvas.draw(cmd)?;
        }
        canvas.draw(DrawCmd::Circle {
            center: project(self.sim.ball.pos, center, scale),
            radius: self.sim.ball.radius * scale,
            fill: Some(palette.ball),
            stroke: None,
        })
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::renderer::DrawList;

    #[test]
    fn test_ball_stays_in_box_for_many_frames() {
        let mut s = BounceSketch::new(Viewport::new(600.0, 600.0), &BounceConfig::default()).unwrap();
        let limit = s.ball().limit();
        let max_speed = BounceConfig::default().velocity.abs().max_element();
        for _ in 0..2000 {
            s.update(&FrameInput::with_dt(FRAME_DT)).unwrap();
            // At most one step past a wall before turning back
            assert!(s.ball().ball.pos.abs().max_element() <= limit + max_speed + 1e-3);
        }
    }

    #[test]
    fn test_render_cube_and_ball() {
        let s = BounceSketch::new(Viewport::new(600.0, 400.0), &BounceConfig::default()).unwrap();
        let mut list = DrawList::new(s.viewport);
        s.render(&mut list, &Palette::default()).unwrap();
        assert_eq!(list.count(|c| matches!(c, DrawCmd::Line { .. })), 12);
        assert_eq!(list.count(|c| matches!(c, DrawCmd::Circle { .. })), 1);
    }

    #[test]
    fn test_rejects_empty_box() {
        let config = BounceConfig {
            box_side: 0.0,
            ..BounceConfig::default()
        };
        assert!(BounceSketch::new(Viewport::default(), &config).is_err());
    }
}
