//! Random walkers leaving a dotted history behind

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::{WalkerConfig, WalkerStart};
use crate::error::{Result, SketchError};
use crate::input::FrameInput;
use crate::layout::Viewport;
use crate::renderer::{Canvas, DrawCmd, Palette};
use crate::sim::{RngState, StepRule, Trail, Walker};
use crate::sketch::Sketch;

pub struct WalkerSketch {
    walkers: Vec<Walker>,
    /// Visited positions per walker, newest first
    history: Vec<Trail<Vec2>>,
    rule: StepRule,
    start: WalkerStart,
    rng_state: RngState,
    rng: Pcg32,
    viewport: Viewport,
}

impl WalkerSketch {
    pub fn new(viewport: Viewport, config: &WalkerConfig, seed: u64) -> Result<Self> {
        if let StepRule::Gaussian { sigma } = config.rule {
            if sigma.is_nan() || sigma < 0.0 {
                return Err(SketchError::InvalidParameter(format!("walker sigma {}", sigma)));
            }
        }
        let rng_state = RngState::new(seed);
        let start = Self::start_pos(config.start, &viewport);
        Ok(Self {
            walkers: (0..config.count).map(|_| Walker::new(start)).collect(),
            history: (0..config.count).map(|_| Trail::new(config.history)).collect(),
            rule: config.rule.clone(),
            start: config.start,
            rng: rng_state.to_rng(),
            rng_state,
            viewport,
        })
    }

    fn start_pos(start: WalkerStart, viewport: &Viewport) -> Vec2 {
        match start {
            WalkerStart::Origin => Vec2::ZERO,
            WalkerStart::Center => viewport.center(),
        }
    }

    /// Put every walker back at the start and replay the same random sequence
    pub fn reset(&mut self) {
        let start = Self::start_pos(self.start, &self.viewport);
        for (walker, history) in self.walkers.iter_mut().zip(&mut self.history) {
            walker.pos = start;
            history.clear();
        }
        self.rng = self.rng_state.to_rng();
    }

    pub fn walkers(&self) -> &[Walker] {
        &self.walkers
    }
}

impl Sketch for WalkerSketch {
    fn name(&self) -> &'static str {
        "walker"
    }

    fn update(&mut self, input: &FrameInput) -> Result<()> {
        if input.key_is('r') {
            self.reset();
            log::info!("walker: reset");
        }
        for (walker, history) in self.walkers.iter_mut().zip(&mut self.history) {
            walker.step(&self.rule, &mut self.rng);
            if !walker.pos.is_finite() {
                return Err(SketchError::NonFinite("walker"));
            }
            history.push(walker.pos);
        }
        Ok(())
    }

    fn render(&self, canvas: &mut dyn Canvas, palette: &Palette) -> Result<()> {
        canvas.clear(palette.stage)?;
        let faint = palette.stage_ink.with_alpha(110);
        for history in &self.history {
            for pos in history.iter().skip(1) {
                canvas.draw(DrawCmd::Point {
                    pos: *pos,
                    color: faint,
                    size: 1.0,
                })?;
            }
        }
        for walker in &self.walkers {
            canvas.fill_circle(walker.pos, 2.0, palette.stage_ink)?;
        }
        Ok(())
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

    fn input() -> FrameInput {
        FrameInput::with_dt(FRAME_DT)
    }

    #[test]
    fn test_history_is_bounded() {
        let config = WalkerConfig {
            history: 25,
            count: 3,
            ..WalkerConfig::default()
        };
        let mut s = WalkerSketch::new(Viewport::new(200.0, 200.0), &config, 4).unwrap();
        for _ in 0..100 {
            s.update(&input()).unwrap();
        }
        assert!(s.history.iter().all(|h| h.len() == 25));
        let mut list = DrawList::new(s.viewport);
        s.render(&mut list, &Palette::default()).unwrap();
        assert_eq!(list.count(|c| matches!(c, DrawCmd::Point { .. })), 3 * 24);
    }

    #[test]
    fn test_reset_replays_same_walk() {
        let mut s = WalkerSketch::new(Viewport::new(200.0, 200.0), &WalkerConfig::default(), 11).unwrap();
        for _ in 0..20 {
            s.update(&input()).unwrap();
        }
        let first = s.walkers()[0].pos;
        let reset = FrameInput {
            key: Some('R'),
            ..input()
        };
        // Reset happens before this frame's step
        s.update(&reset).unwrap();
        for _ in 0..19 {
            s.update(&input()).unwrap();
        }
        assert_eq!(s.walkers()[0].pos, first);
    }

    #[test]
    fn test_origin_start_and_invalid_sigma() {
        let config = WalkerConfig {
            start: WalkerStart::Origin,
            ..WalkerConfig::default()
        };
        let s = WalkerSketch::new(Viewport::default(), &config, 0).unwrap();
        assert_eq!(s.walkers()[0].pos, Vec2::ZERO);

        let bad = WalkerConfig {
            rule: StepRule::Gaussian { sigma: -2.0 },
            ..WalkerConfig::default()
        };
        assert!(matches!(
            WalkerSketch::new(Viewport::default(), &bad, 0),
            Err(SketchError::InvalidParameter(_))
        ));
    }
}
