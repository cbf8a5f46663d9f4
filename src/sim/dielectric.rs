//! Complex permittivity of a lossy dielectric and a toy polarization model

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::layout::Viewport;
use crate::set_mag;

/// Vacuum permittivity (F/m)
pub const EPSILON_0: f64 = 8.854e-12;

/// Interpretation of the loss tangent ε''/ε'
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossClass {
    StronglyLossy,
    Lossy,
    Moderate,
    Low,
    VeryLow,
}

impl LossClass {
    pub fn from_loss_tangent(tan_delta: f64) -> Self {
        if tan_delta > 10.0 {
            LossClass::StronglyLossy
        } else if tan_delta < 0.01 {
            LossClass::VeryLow
        } else if tan_delta < 0.1 {
            LossClass::Low
        } else if tan_delta > 1.0 {
            LossClass::Lossy
        } else {
            LossClass::Moderate
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LossClass::StronglyLossy => "Strongly lossy (tan δ ≫ 1)",
            LossClass::Lossy => "Lossy dielectric (tan δ > 1)",
            LossClass::Moderate => "Moderate loss (tan δ ≈ 1)",
            LossClass::Low => "Low loss (tan δ < 0.1)",
            LossClass::VeryLow => "Very low loss (tan δ ≪ 1)",
        }
    }
}

/// Relative complex permittivity εc/ε0 = ε' - jε''
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Permittivity {
    /// Angular frequency (rad/s), zero when the frequency is not positive
    pub omega: f64,
    pub eps_prime: f64,
    pub eps_double_prime: f64,
    pub loss_tangent: f64,
    /// None when the frequency is not positive
    pub class: Option<LossClass>,
}

impl Permittivity {
    /// Only finite results have a point on the complex plane
    pub fn is_plottable(&self) -> bool {
        self.class.is_some() && self.eps_double_prime.is_finite()
    }
}

/// ε'' = σ / (ω ε0) with ω = 2π f
pub fn complex_permittivity(eps_r: f64, sigma: f64, freq_ghz: f64) -> Permittivity {
    let freq_hz = freq_ghz * 1e9;
    if freq_hz <= 0.0 || !freq_hz.is_finite() {
        return Permittivity {
            omega: 0.0,
            eps_prime: eps_r,
            eps_double_prime: f64::INFINITY,
            loss_tangent: f64::INFINITY,
            class: None,
        };
    }

    let omega = TAU * freq_hz;
    let eps_double_prime = sigma / (omega * EPSILON_0);
    let loss_tangent = if eps_r > 1e-9 {
        eps_double_prime / eps_r
    } else {
        f64::INFINITY
    };
    Permittivity {
        omega,
        eps_prime: eps_r,
        eps_double_prime,
        loss_tangent,
        class: Some(LossClass::from_loss_tangent(loss_tangent)),
    }
}

/// Susceptibility presets cycled from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Susceptibility(pub f32);

impl Default for Susceptibility {
    fn default() -> Self {
        Self(0.5)
    }
}

impl Susceptibility {
    /// 0.5 -> 2.0 -> 4.5 -> 0.5
    pub fn cycle(self) -> Self {
        if self.0 < 1.0 {
            Self(2.0)
        } else if self.0 < 3.0 {
            Self(4.5)
        } else {
            Self(0.5)
        }
    }
}

/// Largest external field the pointer can produce
pub const MAX_FIELD: f32 = 50.0;

/// External field from the pointer offset relative to the canvas centre
pub fn pointer_field(pointer: Vec2, viewport: &Viewport) -> Vec2 {
    crate::limit((pointer - viewport.center()) * 0.2, MAX_FIELD)
}

/// Polarizable atom: its charge centres separate along the applied field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub pos: Vec2,
    pub size: f32,
    pub max_displacement: f32,
}

impl Atom {
    /// Separation vector from the negative to the positive charge centre
    pub fn displacement(&self, e_field: Vec2, chi: Susceptibility) -> Vec2 {
        let magnitude = (e_field.length() * chi.0 * 0.1).min(self.max_displacement);
        set_mag(e_field, magnitude)
    }

    /// (positive, negative) charge centre positions
    pub fn charge_centres(&self, e_field: Vec2, chi: Susceptibility) -> (Vec2, Vec2) {
        let half = self.displacement(e_field, chi) * 0.5;
        (self.pos + half, self.pos - half)
    }
}

pub const GRID_PADDING: f32 = 30.0;

/// Lay out `count` atoms on a jittered grid that matches the viewport aspect ratio
pub fn atom_grid<R: Rng>(viewport: &Viewport, count: usize, rng: &mut R) -> Vec<Atom> {
    if count == 0 {
        return Vec::new();
    }
    let avail_w = (viewport.width - 2.0 * GRID_PADDING).max(1.0);
    let avail_h = (viewport.height - 2.0 * GRID_PADDING).max(1.0);
    let cols = ((count as f32 * avail_w / avail_h).sqrt().ceil() as usize).max(1);
    let rows = count.div_ceil(cols);

    let spacing_x = avail_w / cols as f32;
    let spacing_y = avail_h / rows as f32;
    let atom_size = spacing_x.min(spacing_y) * 0.6;
    let max_displacement = atom_size * 0.3;
    let start = Vec2::new(GRID_PADDING + spacing_x * 0.5, GRID_PADDING + spacing_y * 0.5);
    let jitter = Vec2::new(spacing_x, spacing_y) * 0.1;

    let mut atoms = Vec::with_capacity(count);
    'rows: for row in 0..rows {
        for col in 0..cols {
            if atoms.len() == count {
                break 'rows;
            }
            let cell = start + Vec2::new(col as f32 * spacing_x, row as f32 * spacing_y);
            let offset = Vec2::new(
                rng.random_range(-1.0..=1.0) * jitter.x,
                rng.random_range(-1.0..=1.0) * jitter.y,
            );
            atoms.push(Atom {
                pos: cell + offset,
                size: atom_size * rng.random_range(0.8..=1.2),
                max_displacement,
            });
        }
    }
    atoms
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_permittivity_of_lossy_medium() {
        // σ = 0.02 S/m at 4 GHz
        let p = complex_permittivity(4.0, 0.02, 4.0);
        let expected = 0.02 / (TAU * 4e9 * EPSILON_0);
        assert!((p.eps_double_prime - expected).abs() < 1e-9);
        assert!((p.eps_double_prime - 0.0899).abs() < 1e-3);
        assert!((p.loss_tangent - expected / 4.0).abs() < 1e-12);
        assert_eq!(p.class, Some(LossClass::Low));
        assert!(p.is_plottable());
    }

    #[test]
    fn test_non_positive_frequency_is_infinite_loss() {
        let p = complex_permittivity(2.5, 0.1, 0.0);
        assert_eq!(p.omega, 0.0);
        assert!(p.eps_double_prime.is_infinite());
        assert!(!p.is_plottable());
        assert!(!complex_permittivity(2.5, 0.1, -3.0).is_plottable());
    }

    #[test]
    fn test_loss_class_thresholds() {
        assert_eq!(LossClass::from_loss_tangent(50.0), LossClass::StronglyLossy);
        assert_eq!(LossClass::from_loss_tangent(5.0), LossClass::Lossy);
        assert_eq!(LossClass::from_loss_tangent(0.5), LossClass::Moderate);
        assert_eq!(LossClass::from_loss_tangent(0.05), LossClass::Low);
        assert_eq!(LossClass::from_loss_tangent(0.001), LossClass::VeryLow);
    }

    #[test]
    fn test_susceptibility_cycle() {
        let chi = Susceptibility::default();
        assert_eq!(chi.cycle(), Susceptibility(2.0));
        assert_eq!(chi.cycle().cycle(), Susceptibility(4.5));
        assert_eq!(chi.cycle().cycle().cycle(), chi);
    }

    #[test]
    fn test_displacement_aligned_and_capped() {
        let atom = Atom {
            pos: Vec2::ZERO,
            size: 20.0,
            max_displacement: 3.0,
        };
        let small = atom.displacement(Vec2::new(10.0, 0.0), Susceptibility(0.5));
        assert!((small - Vec2::new(0.5, 0.0)).length() < 1e-6);
        let big = atom.displacement(Vec2::new(0.0, 50.0), Susceptibility(4.5));
        assert!((big.length() - 3.0).abs() < 1e-5);
        assert!(big.y > 0.0);
        assert_eq!(atom.displacement(Vec2::ZERO, Susceptibility(4.5)), Vec2::ZERO);
    }

    #[test]
    fn test_atom_grid_fills_padded_area() {
        let mut rng = Pcg32::seed_from_u64(9);
        let viewport = Viewport::new(500.0, 400.0);
        let atoms = atom_grid(&viewport, 80, &mut rng);
        assert_eq!(atoms.len(), 80);
        for atom in &atoms {
            assert!(atom.pos.x > GRID_PADDING * 0.5 && atom.pos.x < 500.0 - GRID_PADDING * 0.5);
            assert!(atom.pos.y > GRID_PADDING * 0.5 && atom.pos.y < 400.0 - GRID_PADDING * 0.5);
            assert!((atom.max_displacement - atoms[0].max_displacement).abs() < 1e-6);
        }
        assert!(atom_grid(&viewport, 0, &mut rng).is_empty());
    }

    #[test]
    fn test_pointer_field_is_limited() {
        let viewport = Viewport::new(400.0, 400.0);
        assert_eq!(pointer_field(Vec2::splat(200.0), &viewport), Vec2::ZERO);
        let far = pointer_field(Vec2::new(5000.0, 200.0), &viewport);
        assert!((far.length() - MAX_FIELD).abs() < 1e-3);
    }
}
