//! Simulation state and step rules
//!
//! Everything here is plain data plus step functions:
//! - One step per frame (time is counted in frames)
//! - Seeded RNG only, passed in by the owner
//! - No rendering or platform dependencies

pub mod body;
pub mod bounce;
pub mod dielectric;
pub mod field;
pub mod nbody;
pub mod phasor;
pub mod trail;
pub mod walker;
pub mod wave;

pub use body::{Body, Body3, GravityParams, attraction_magnitude};
pub use bounce::{BounceConfig, BouncingBall};
pub use dielectric::{Atom, LossClass, Permittivity, Susceptibility, atom_grid, complex_permittivity};
pub use field::{
    ChargePair, FieldParticle, FieldSource, LineCurrent, Rect, Region, Streamline, Termination,
    TraceParams, electric_field_lines, magnetic_loops, trace_streamline,
};
pub use nbody::{EdgeMode, NBody};
pub use phasor::Phasor;
pub use trail::Trail;
pub use walker::{StepRule, Walker};
pub use wave::AttenuatedWave;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Seed a sketch's RNG is rebuilt from (resets replay the same run)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
