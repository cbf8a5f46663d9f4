//! Sketch contract and the registry of sketch kinds

use serde::{Deserialize, Serialize};

use crate::config::GalleryConfig;
use crate::error::Result;
use crate::input::{FrameInput, Slider};
use crate::layout::{CanvasHeight, Viewport};
use crate::renderer::{Canvas, Palette};
use crate::settings::Settings;
use crate::sketches;

/// One animated sketch: owned state plus update and render steps
pub trait Sketch {
    fn name(&self) -> &'static str;

    /// Advance one fixed step
    fn update(&mut self, input: &FrameInput) -> Result<()>;

    /// Draw the current state; never mutates it
    fn render(&self, canvas: &mut dyn Canvas, palette: &Palette) -> Result<()>;

    /// Recompute size-derived layout
    fn resize(&mut self, viewport: Viewport);
}

/// Optional interactions a mounted sketch supports
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Features {
    /// Reads the pointer position
    pub pointer: bool,
    /// Reacts to clicks
    pub click: bool,
    /// Reacts to key presses
    pub keyboard: bool,
    /// Range controls, in `FrameInput::sliders` order
    pub sliders: Vec<Slider>,
    /// Draws trails controlled by the trail setting
    pub trails: bool,
}

/// Result of a successful mount
pub struct Mounted {
    pub sketch: Box<dyn Sketch>,
    pub features: Features,
}

impl std::fmt::Debug for Mounted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mounted")
            .field("sketch", &self.sketch.name())
            .field("features", &self.features)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SketchKind {
    Gravity,
    Walker,
    Phasor,
    Fields,
    Attenuation,
    Materials,
    NoiseLines,
    Bounce,
}

impl SketchKind {
    pub const ALL: [SketchKind; 8] = [
        SketchKind::Gravity,
        SketchKind::Walker,
        SketchKind::Phasor,
        SketchKind::Fields,
        SketchKind::Attenuation,
        SketchKind::Materials,
        SketchKind::NoiseLines,
        SketchKind::Bounce,
    ];

    pub fn default_container_id(&self) -> &'static str {
        match self {
            SketchKind::Gravity => "sketch-gravity",
            SketchKind::Walker => "sketch-walker",
            SketchKind::Phasor => "sketch-phasor",
            SketchKind::Fields => "sketch-fields",
            SketchKind::Attenuation => "sketch-attenuation",
            SketchKind::Materials => "sketch-materials",
            SketchKind::NoiseLines => "sketch-noise",
            SketchKind::Bounce => "sketch-bounce",
        }
    }

    /// Canvas height derived from the container width
    pub fn canvas_height(&self) -> CanvasHeight {
        match self {
            SketchKind::Gravity => CanvasHeight::Fixed(400.0),
            SketchKind::Walker | SketchKind::NoiseLines | SketchKind::Bounce => CanvasHeight::Fill,
            SketchKind::Phasor => CanvasHeight::Ratio {
                ratio: 0.8,
                min: 300.0,
                max: 450.0,
            },
            SketchKind::Fields => CanvasHeight::Ratio {
                ratio: 0.5,
                min: 350.0,
                max: f32::MAX,
            },
            SketchKind::Attenuation => CanvasHeight::Fixed(300.0),
            SketchKind::Materials => CanvasHeight::Ratio {
                ratio: 0.8,
                min: 0.0,
                max: 400.0,
            },
        }
    }

    /// Size used when the container reports no width
    pub fn fallback_viewport(&self) -> Viewport {
        match self {
            SketchKind::Phasor => Viewport::new(300.0, 240.0),
            SketchKind::Fields => Viewport::new(300.0, 350.0),
            _ => Viewport::new(600.0, 400.0),
        }
    }

    /// Viewport for a container of the given size
    pub fn viewport_for(&self, container_w: f32, container_h: f32) -> Viewport {
        self.canvas_height()
            .viewport_for(container_w, container_h, self.fallback_viewport())
    }

    /// Build the sketch and report which optional features it offers
    pub fn init(
        &self,
        viewport: Viewport,
        config: &GalleryConfig,
        settings: &Settings,
        seed: u64,
    ) -> Result<Mounted> {
        let trails = settings.effective_trail_length();
        let mounted = match self {
            SketchKind::Gravity => Mounted {
                sketch: Box::new(sketches::GravitySketch::new(
                    viewport,
                    &config.gravity,
                    trails,
                    settings.particle_budget(config.gravity.max_bodies),
                    seed,
                )),
                features: Features {
                    pointer: true,
                    click: true,
                    trails: true,
                    ..Features::default()
                },
            },
            SketchKind::Walker => Mounted {
                sketch: Box::new(sketches::WalkerSketch::new(viewport, &config.walker, seed)?),
                features: Features {
                    keyboard: true,
                    trails: true,
                    ..Features::default()
                },
            },
            SketchKind::Phasor => Mounted {
                sketch: Box::new(sketches::PhasorSketch::new(viewport, &config.phasor)),
                features: Features::default(),
            },
            SketchKind::Fields => Mounted {
                sketch: Box::new(sketches::FieldsSketch::new(
                    viewport,
                    &config.fields,
                    settings.particle_budget(config.fields.particles),
                    seed,
                )),
                features: Features {
                    pointer: true,
                    click: true,
                    ..Features::default()
                },
            },
            SketchKind::Attenuation => Mounted {
                sketch: Box::new(sketches::AttenuationSketch::new(viewport, &config.attenuation)?),
                features: Features {
                    pointer: true,
                    ..Features::default()
                },
            },
            SketchKind::Materials => Mounted {
                sketch: Box::new(sketches::MaterialsSketch::new(
                    viewport,
                    settings.particle_budget(config.materials.atoms),
                    seed,
                )),
                features: Features {
                    pointer: true,
                    keyboard: true,
                    ..Features::default()
                },
            },
            SketchKind::NoiseLines => Mounted {
                sketch: Box::new(sketches::NoiseLinesSketch::new(viewport, &config.noise, seed)),
                features: Features {
                    sliders: sketches::noise_lines::SLIDERS.to_vec(),
                    ..Features::default()
                },
            },
            SketchKind::Bounce => Mounted {
                sketch: Box::new(sketches::BounceSketch::new(viewport, &config.bounce)?),
                features: Features::default(),
            },
        };
        log::info!("Mounted {} ({}x{})", mounted.sketch.name(), viewport.width, viewport.height);
        Ok(mounted)
    }
}
