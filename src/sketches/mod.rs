//! Concrete sketches
//!
//! Each one owns its simulation state, advances it in `update`, and draws it
//! through a `Canvas` in `render`.

pub mod attenuation;
pub mod bounce;
pub mod fields;
pub mod gravity;
pub mod materials;
pub mod noise_lines;
pub mod phasor;
pub mod walker;

pub use attenuation::AttenuationSketch;
pub use bounce::BounceSketch;
pub use fields::FieldsSketch;
pub use gravity::GravitySketch;
pub use materials::MaterialsSketch;
pub use noise_lines::NoiseLinesSketch;
pub use phasor::PhasorSketch;
pub use walker::WalkerSketch;
