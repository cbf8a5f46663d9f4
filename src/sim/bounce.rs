//! A ball bouncing inside an axis-aligned cube centred on the origin

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::body::Body3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceConfig {
    pub box_side: f32,
    pub ball_radius: f32,
    pub start: Vec3,
    pub velocity: Vec3,
}

impl Default for BounceConfig {
    fn default() -> Self {
        Self {
            box_side: 300.0,
            ball_radius: 30.0,
            start: Vec3::splat(100.0),
            velocity: Vec3::new(2.5, 2.0, 2.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BouncingBall {
    pub ball: Body3,
    pub box_side: f32,
}

impl BouncingBall {
    pub fn new(config: &BounceConfig) -> Self {
        Self {
            ball: Body3 {
                pos: config.start,
                vel: config.velocity,
                radius: config.ball_radius,
            },
            box_side: config.box_side,
        }
    }

    /// Largest |coordinate| the ball centre may reach on any axis
    #[inline]
    pub fn limit(&self) -> f32 {
        (self.box_side * 0.5 - self.ball.radius).max(0.0)
    }

    /// Move, then point each axis velocity back inside when past a wall
    pub fn step(&mut self) {
        self.ball.pos += self.ball.vel;
        let limit = self.limit();
        for axis in 0..3 {
            let p = self.ball.pos[axis];
            if p > limit {
                self.ball.vel[axis] = -self.ball.vel[axis].abs();
            } else if p < -limit {
                self.ball.vel[axis] = self.ball.vel[axis].abs();
            }
        }
    }
}
