//! Random walkers
//!
//! Each walker moves by an independent random increment every frame.
//! There is no boundary handling: a walker may leave the canvas for good.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// How a single step is drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepRule {
    /// Step length u² with u ~ U(0, max); each axis picks its sign independently
    /// (negative with probability `p_up` / `p_left`)
    SquaredUniform { max: f32, p_up: f32, p_left: f32 },
    /// dx, dy ~ U(-max, max)
    Uniform { max: f32 },
    /// dx, dy ~ N(0, sigma)
    Gaussian { sigma: f32 },
    /// One of a fixed set of moves, equally likely
    Discrete { choices: Vec<Vec2> },
}

impl Default for StepRule {
    fn default() -> Self {
        StepRule::SquaredUniform {
            max: 2.0,
            p_up: 0.5,
            p_left: 0.5,
        }
    }
}

impl StepRule {
    /// Unit moves on a square lattice
    pub fn lattice() -> Self {
        StepRule::Discrete {
            choices: vec![Vec2::X, Vec2::NEG_X, Vec2::Y, Vec2::NEG_Y],
        }
    }

    /// Draw one displacement
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        match self {
            StepRule::SquaredUniform { max, p_up, p_left } => {
                let u = rng.random::<f32>() * max;
                let len = u * u;
                let dy = if rng.random::<f32>() <= *p_up { -len } else { len };
                let dx = if rng.random::<f32>() <= *p_left { -len } else { len };
                Vec2::new(dx, dy)
            }
            StepRule::Uniform { max } => {
                if *max <= 0.0 {
                    return Vec2::ZERO;
                }
                Vec2::new(rng.random_range(-max..=*max), rng.random_range(-max..=*max))
            }
            StepRule::Gaussian { sigma } => {
                // Negative or NaN sigma stands still
                if sigma.is_nan() || *sigma < 0.0 {
                    return Vec2::ZERO;
                }
                match Normal::new(0.0_f32, *sigma) {
                    Ok(normal) => Vec2::new(normal.sample(rng), normal.sample(rng)),
                    Err(_) => Vec2::ZERO,
                }
            }
            StepRule::Discrete { choices } => choices.choose(rng).copied().unwrap_or(Vec2::ZERO),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Walker {
    pub pos: Vec2,
}

impl Walker {
    pub fn new(pos: Vec2) -> Self {
        Self { pos }
    }

    pub fn step<R: Rng + ?Sized>(&mut self, rule: &StepRule, rng: &mut R) {
        self.pos += rule.sample(rng);
    }
}
