//! Point-mass bodies and the pairwise attraction rule

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::set_mag;

/// Gravity tuning shared by every pair in a system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityParams {
    /// Gravitational constant
    pub g: f32,
    /// Separations below this are treated as this distance
    pub min_distance: f32,
    /// Separations above this are treated as this distance
    pub max_distance: f32,
}

impl Default for GravityParams {
    fn default() -> Self {
        Self {
            g: GRAVITY_G,
            min_distance: GRAVITY_MIN_DISTANCE,
            max_distance: GRAVITY_MAX_DISTANCE,
        }
    }
}

impl GravityParams {
    /// Squared distance after the min/max clamp
    #[inline]
    pub fn clamp_dist_sq(&self, dist_sq: f32) -> f32 {
        let lo = self.min_distance * self.min_distance;
        let hi = (self.max_distance * self.max_distance).max(lo);
        dist_sq.clamp(lo, hi)
    }
}

/// Force magnitude G * m1 * m2 / clamp(d², min², max²)
#[inline]
pub fn attraction_magnitude(dist_sq: f32, m1: f32, m2: f32, params: &GravityParams) -> f32 {
    params.g * m1 * m2 / params.clamp_dist_sq(dist_sq)
}

/// A point mass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Accumulated for the current frame, zeroed by `integrate`
    pub acc: Vec2,
    pub mass: f32,
    /// Display radius, sqrt(mass)
    pub radius: f32,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, mass: f32) -> Self {
        Self {
            pos,
            vel,
            acc: Vec2::ZERO,
            mass,
            radius: mass.max(0.0).sqrt(),
        }
    }

    /// Force exerted on `self` by `other`, pointing toward `other`
    pub fn attraction_from(&self, other: &Body, params: &GravityParams) -> Vec2 {
        let delta = other.pos - self.pos;
        let strength = attraction_magnitude(delta.length_squared(), self.mass, other.mass, params);
        // Coincident bodies have no direction; set_mag keeps that at zero
        set_mag(delta, strength)
    }

    /// Newton's second law: a += F / m. Massless bodies ignore forces.
    pub fn apply_force(&mut self, force: Vec2) {
        if self.mass <= 0.0 {
            return;
        }
        self.acc += force / self.mass;
    }

    /// Explicit Euler: velocity, then position, then reset acceleration
    pub fn integrate(&mut self) {
        self.vel += self.acc;
        self.pos += self.vel;
        self.acc = Vec2::ZERO;
    }

    /// Wrap around the canvas edges once fully off-screen
    pub fn wrap_edges(&mut self, width: f32, height: f32) {
        let r = self.radius;
        if self.pos.x > width + r {
            self.pos.x = -r;
        } else if self.pos.x < -r {
            self.pos.x = width + r;
        }
        if self.pos.y > height + r {
            self.pos.y = -r;
        } else if self.pos.y < -r {
            self.pos.y = height + r;
        }
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite() && self.acc.is_finite()
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.length_squared()
    }
}

/// A 3D body without forces (bounce sketch)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body3 {
    pub pos: Vec3,
    pub vel: Vec3,
    pub radius: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_integrate_applies_acceleration_then_resets() {
        let mut body = Body::new(Vec2::new(1.0, 1.0), Vec2::new(0.5, 0.0), 4.0);
        body.apply_force(Vec2::new(2.0, -4.0));
        assert_eq!(body.acc, Vec2::new(0.5, -1.0));

        body.integrate();
        assert_eq!(body.vel, Vec2::new(1.0, -1.0));
        assert_eq!(body.pos, Vec2::new(2.0, 0.0));
        assert_eq!(body.acc, Vec2::ZERO);
    }

    #[test]
    fn test_zero_mass_ignores_force() {
        let mut body = Body::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        body.apply_force(Vec2::new(1.0, 1.0));
        assert_eq!(body.acc, Vec2::ZERO);
        body.integrate();
        assert!(body.is_finite());
        assert_eq!(body.radius, 0.0);
    }

    #[test]
    fn test_coincident_bodies_produce_finite_zero_force() {
        let a = Body::new(Vec2::new(3.0, 3.0), Vec2::ZERO, 10.0);
        let b = Body::new(Vec2::new(3.0, 3.0), Vec2::ZERO, 10.0);
        let f = a.attraction_from(&b, &GravityParams::default());
        assert!(f.is_finite());
        assert_eq!(f, Vec2::ZERO);
    }

    #[test]
    fn test_attraction_points_toward_other() {
        let a = Body::new(Vec2::ZERO, Vec2::ZERO, 10.0);
        let b = Body::new(Vec2::new(20.0, 0.0), Vec2::ZERO, 10.0);
        let f = a.attraction_from(&b, &GravityParams::default());
        assert!(f.x > 0.0);
        assert!(f.y.abs() < 1e-6);
        // 1 * 10 * 10 / 400
        assert!((f.length() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_clamped_outside_range() {
        let params = GravityParams::default();
        let near = attraction_magnitude(1.0, 2.0, 3.0, &params);
        let at_min = attraction_magnitude(25.0, 2.0, 3.0, &params);
        let far = attraction_magnitude(1.0e6, 2.0, 3.0, &params);
        let at_max = attraction_magnitude(2500.0, 2.0, 3.0, &params);
        assert_eq!(near, at_min);
        assert_eq!(far, at_max);
    }

    #[test]
    fn test_wrap_edges() {
        let mut body = Body::new(Vec2::new(105.0, -20.0), Vec2::ZERO, 16.0);
        body.wrap_edges(100.0, 100.0);
        assert_eq!(body.pos, Vec2::new(-4.0, 104.0));
    }

    proptest! {
        #[test]
        fn prop_magnitude_monotone_in_range(d1 in 5.0f32..50.0, d2 in 5.0f32..50.0) {
            let params = GravityParams::default();
            let (near, far) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
            let f_near = attraction_magnitude(near * near, 50.0, 5.0, &params);
            let f_far = attraction_magnitude(far * far, 50.0, 5.0, &params);
            prop_assert!(f_near >= f_far);
        }

        #[test]
        fn prop_velocity_change_equals_acceleration(
            fx in -100.0f32..100.0, fy in -100.0f32..100.0, mass in 0.1f32..100.0,
        ) {
            let mut body = Body::new(Vec2::ZERO, Vec2::new(1.0, -1.0), mass);
            body.apply_force(Vec2::new(fx, fy));
            let acc = body.acc;
            let before = body.vel;
            body.integrate();
            prop_assert!(((body.vel - before) - acc).length() < 1e-4);
            prop_assert_eq!(body.acc, Vec2::ZERO);
        }
    }
}
