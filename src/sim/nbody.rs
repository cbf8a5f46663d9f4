//! N-body gravity system with per-body trails
//!
//! Pairwise O(N²) attraction; N stays small so there is no spatial index.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{Body, GravityParams};
use super::trail::Trail;
use crate::error::{Result, SketchError};

/// What happens when a body leaves the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdgeMode {
    /// Bodies may fly off forever
    #[default]
    Open,
    /// Toroidal wrap
    Wrap,
}

/// Gravity system state
#[derive(Debug, Clone)]
pub struct NBody {
    pub bodies: Vec<Body>,
    /// One trail per body, same index
    pub trails: Vec<Trail<Vec2>>,
    pub params: GravityParams,
    pub edges: EdgeMode,
    /// Frames stepped so far
    pub frames: u64,
    trail_len: usize,
}

impl NBody {
    pub fn new(bodies: Vec<Body>, params: GravityParams, trail_len: usize) -> Self {
        let trails = bodies.iter().map(|_| Trail::new(trail_len)).collect();
        Self {
            bodies,
            trails,
            params,
            edges: EdgeMode::Open,
            frames: 0,
            trail_len,
        }
    }

    /// Heavy body at `center`, light body 100 units to its right moving "down" the screen
    pub fn two_body(center: Vec2, params: GravityParams, trail_len: usize) -> Self {
        let bodies = vec![
            Body::new(center, Vec2::ZERO, 50.0),
            Body::new(center + Vec2::new(100.0, 0.0), Vec2::new(0.0, 2.0), 5.0),
        ];
        Self::new(bodies, params, trail_len)
    }

    /// `count` bodies scattered inside `bounds` with small random drift
    pub fn random<R: Rng>(
        count: usize,
        bounds: Vec2,
        params: GravityParams,
        trail_len: usize,
        rng: &mut R,
    ) -> Self {
        let bodies = (0..count)
            .map(|_| {
                let pos = Vec2::new(
                    rng.random_range(0.0..bounds.x.max(1.0)),
                    rng.random_range(0.0..bounds.y.max(1.0)),
                );
                let vel = Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
                let mass = rng.random_range(2.0..40.0);
                Body::new(pos, vel, mass)
            })
            .collect();
        Self::new(bodies, params, trail_len)
    }

    /// Advance one frame: accumulate all pairwise forces, then integrate
    pub fn step(&mut self, bounds: Vec2) -> Result<()> {
        let n = self.bodies.len();

        // Forces are computed against the pre-step positions of every body
        let mut forces = vec![Vec2::ZERO; n];
        for (i, force) in forces.iter_mut().enumerate() {
            for j in 0..n {
                if i != j {
                    *force += self.bodies[i].attraction_from(&self.bodies[j], &self.params);
                }
            }
        }

        for (body, force) in self.bodies.iter_mut().zip(forces) {
            body.apply_force(force);
            body.integrate();
            if self.edges == EdgeMode::Wrap {
                body.wrap_edges(bounds.x, bounds.y);
            }
        }

        if self.bodies.iter().any(|b| !b.is_finite()) {
            return Err(SketchError::NonFinite("nbody"));
        }

        for (body, trail) in self.bodies.iter().zip(self.trails.iter_mut()) {
            trail.push(body.pos);
        }
        self.frames += 1;
        Ok(())
    }

    /// Add a body with an empty trail of the current length
    pub fn push_body(&mut self, body: Body) {
        self.bodies.push(body);
        self.trails.push(Trail::new(self.trail_len));
    }

    pub fn set_trail_len(&mut self, len: usize) {
        self.trail_len = len;
        for trail in &mut self.trails {
            trail.set_capacity(len);
        }
    }

    pub fn total_momentum(&self) -> Vec2 {
        self.bodies.iter().map(|b| b.vel * b.mass).sum()
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const BOUNDS: Vec2 = Vec2::new(600.0, 400.0);

    #[test]
    fn test_two_body_first_step_matches_inverse_square() {
        // G=1, min distance 5, max distance wide enough not to clamp the 100 unit gap
        let params = GravityParams {
            g: 1.0,
            min_distance: 5.0,
            max_distance: 1000.0,
        };
        let mut sys = NBody::two_body(Vec2::new(300.0, 200.0), params, 10);
        let v_before = sys.bodies[1].vel;
        sys.step(BOUNDS).unwrap();

        let dv = sys.bodies[1].vel - v_before;
        // G * m1 / d² = 50 / 100²
        assert!((dv.length() - 0.005).abs() < 1e-6);
        // Pointing back toward the heavy body (-x)
        assert!(dv.x < 0.0);
        assert!(dv.y.abs() < 1e-7);

        // Heavy body receives the equal and opposite force: 5 / 100² toward +x
        let dv1 = sys.bodies[0].vel;
        assert!((dv1.x - 0.0005).abs() < 1e-7);
    }

    #[test]
    fn test_default_params_clamp_far_separation() {
        let mut sys = NBody::two_body(Vec2::new(300.0, 200.0), GravityParams::default(), 10);
        sys.step(BOUNDS).unwrap();
        // d² = 10_000 is clamped to 50² = 2500: 50 / 2500
        let dv = sys.bodies[1].vel - Vec2::new(0.0, 2.0);
        assert!((dv.length() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_step_records_trails_and_resets_acc() {
        let mut sys = NBody::two_body(Vec2::new(300.0, 200.0), GravityParams::default(), 3);
        for _ in 0..5 {
            sys.step(BOUNDS).unwrap();
        }
        for (body, trail) in sys.bodies.iter().zip(&sys.trails) {
            assert_eq!(body.acc, Vec2::ZERO);
            assert_eq!(trail.len(), 3);
            assert_eq!(trail.newest().copied(), Some(body.pos));
        }
        assert_eq!(sys.frames, 5);
    }

    #[test]
    fn test_pairwise_forces_conserve_momentum() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut sys = NBody::random(6, BOUNDS, GravityParams::default(), 0, &mut rng);
        let before = sys.total_momentum();
        for _ in 0..20 {
            sys.step(BOUNDS).unwrap();
        }
        let scale: f32 = sys.bodies.iter().map(|b| (b.vel * b.mass).length()).sum();
        assert!((sys.total_momentum() - before).length() <= 1e-3 * scale.max(1.0));
    }

    #[test]
    fn test_non_finite_state_is_reported() {
        let mut sys = NBody::two_body(Vec2::ZERO, GravityParams::default(), 0);
        sys.bodies[1].vel = Vec2::new(f32::NAN, 0.0);
        assert_eq!(sys.step(BOUNDS), Err(SketchError::NonFinite("nbody")));
    }

    #[test]
    fn test_push_body_gets_matching_trail() {
        let mut sys = NBody::two_body(Vec2::new(300.0, 200.0), GravityParams::default(), 7);
        sys.push_body(Body::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 5.0));
        assert_eq!(sys.trails.len(), 3);
        assert_eq!(sys.trails[2].capacity(), 7);
        sys.step(BOUNDS).unwrap();
        assert_eq!(sys.trails[2].len(), 1);
    }

    #[test]
    fn test_wrap_mode_keeps_bodies_near_canvas() {
        let body = Body::new(Vec2::new(599.0, 200.0), Vec2::new(50.0, 0.0), 4.0);
        let mut sys = NBody::new(vec![body], GravityParams::default(), 0);
        sys.edges = EdgeMode::Wrap;
        sys.step(BOUNDS).unwrap();
        assert!(sys.bodies[0].pos.x <= 0.0);
    }
}
