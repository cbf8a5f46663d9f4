//! Gallery configuration
//!
//! Loaded from JSON; every section is optional and falls back to the
//! defaults the sketches were tuned with.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::{AttenuatedWave, BounceConfig, EdgeMode, GravityParams, StepRule, TraceParams};
use crate::sketch::SketchKind;

/// One sketch mounted into one page container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchEntry {
    pub container_id: String,
    pub kind: SketchKind,
}

impl SketchEntry {
    pub fn new(kind: SketchKind) -> Self {
        Self {
            container_id: kind.default_container_id().to_owned(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GravityScenario {
    /// Heavy body plus a light orbiter
    TwoBody,
    /// `count` bodies scattered over the canvas
    Random { count: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityConfig {
    pub scenario: GravityScenario,
    pub params: GravityParams,
    pub edges: EdgeMode,
    /// Mass of a body dropped with a click
    pub click_mass: f32,
    /// Clicks stop adding bodies past this count (further capped by the quality preset)
    pub max_bodies: usize,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            scenario: GravityScenario::TwoBody,
            params: GravityParams::default(),
            edges: EdgeMode::Open,
            click_mass: 5.0,
            max_bodies: 24,
        }
    }
}

/// Where walkers begin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkerStart {
    /// Top-left corner
    Origin,
    #[default]
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    pub count: usize,
    pub rule: StepRule,
    pub start: WalkerStart,
    /// Visited points kept per walker
    pub history: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            count: 1,
            rule: StepRule::default(),
            start: WalkerStart::Center,
            history: 4000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhasorConfig {
    pub phase: f32,
    pub omega: f32,
}

impl Default for PhasorConfig {
    fn default() -> Self {
        Self {
            phase: std::f32::consts::FRAC_PI_4,
            omega: 0.03,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub electric_lines: usize,
    pub magnetic_loops: usize,
    pub particles: usize,
    pub trace: TraceParams,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            electric_lines: 16,
            magnetic_loops: 5,
            particles: 80,
            trace: TraceParams::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialsConfig {
    pub atoms: usize,
}

impl Default for MaterialsConfig {
    fn default() -> Self {
        Self { atoms: 80 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub lines: usize,
    /// Noise-space advance per pixel column
    pub step: f64,
    /// Noise-space advance per frame
    pub speed: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            lines: 10,
            step: 0.01,
            speed: 0.01,
        }
    }
}

/// Top-level gallery configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Base seed; each sketch derives its own from it
    pub seed: Option<u64>,
    pub sketches: Vec<SketchEntry>,
    pub gravity: GravityConfig,
    pub walker: WalkerConfig,
    pub phasor: PhasorConfig,
    pub fields: FieldConfig,
    pub attenuation: AttenuatedWave,
    pub materials: MaterialsConfig,
    pub noise: NoiseConfig,
    pub bounce: BounceConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            seed: None,
            sketches: SketchKind::ALL.iter().copied().map(SketchEntry::new).collect(),
            gravity: GravityConfig::default(),
            walker: WalkerConfig::default(),
            phasor: PhasorConfig::default(),
            fields: FieldConfig::default(),
            attenuation: AttenuatedWave::default(),
            materials: MaterialsConfig::default(),
            noise: NoiseConfig::default(),
            bounce: BounceConfig::default(),
        }
    }
}

impl GalleryConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SketchError;

    #[test]
    fn test_default_lists_every_sketch() {
        let config = GalleryConfig::default();
        assert_eq!(config.sketches.len(), SketchKind::ALL.len());
        assert_eq!(config.sketches[0].container_id, SketchKind::ALL[0].default_container_id());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "seed": 7,
            "sketches": [{ "container_id": "sketch-a", "kind": "phasor" }],
            "gravity": { "params": { "max_distance": 1000.0 } }
        }"#;
        let config = GalleryConfig::from_json(json).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.sketches.len(), 1);
        assert_eq!(config.sketches[0].kind, SketchKind::Phasor);
        assert_eq!(config.gravity.params.max_distance, 1000.0);
        assert_eq!(config.gravity.params.min_distance, 5.0);
        assert_eq!(config.phasor, PhasorConfig::default());
    }

    #[test]
    fn test_walker_rule_from_json() {
        let json = r#"{ "walker": { "rule": { "Gaussian": { "sigma": 2.0 } }, "start": "origin" } }"#;
        let config = GalleryConfig::from_json(json).unwrap();
        assert_eq!(config.walker.rule, StepRule::Gaussian { sigma: 2.0 });
        assert_eq!(config.walker.start, WalkerStart::Origin);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = GalleryConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, SketchError::Config(_)));
    }

    #[test]
    fn test_json_round_trip_of_default() {
        let config = GalleryConfig::default();
        let back = GalleryConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }
}
