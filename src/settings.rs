//! Gallery settings and preferences
//!
//! Persisted in LocalStorage on the web; native builds always use defaults.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SketchError};

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parse a `data-theme` attribute value; anything unknown is light
    pub fn from_attr(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("dark") {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Cap on tracer particles / atoms per sketch
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 30,
            QualityPreset::Medium => 80,
            QualityPreset::High => 200,
        }
    }

    /// Trail length multiplier (1.0 = full)
    pub fn trail_quality(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.25,
            QualityPreset::Medium => 0.6,
            QualityPreset::High => 1.0,
        }
    }
}

/// Gallery settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub quality: QualityPreset,
    /// Body / walker trails
    pub trails: bool,
    /// Full trail length before the quality multiplier
    pub trail_length: usize,
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            quality: QualityPreset::Medium,
            trails: true,
            trail_length: crate::consts::TRAIL_LENGTH,
            show_fps: false,
        }
    }
}

impl Settings {
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Trail length after the on/off switch and quality multiplier
    pub fn effective_trail_length(&self) -> usize {
        if !self.trails {
            0
        } else {
            (self.trail_length as f32 * self.quality.trail_quality()).round() as usize
        }
    }

    /// Particle cap, never above what a sketch asks for
    pub fn particle_budget(&self, requested: usize) -> usize {
        requested.min(self.quality.max_particles())
    }

    /// Apply `--quality=<preset>`, `--no-trails` and `--fps`; returns the positional arguments
    pub fn apply_flags(&mut self, args: &[String]) -> Result<Vec<String>> {
        let mut positional = Vec::new();
        for arg in args {
            if let Some(preset) = arg.strip_prefix("--quality=") {
                self.quality = QualityPreset::parse(preset).ok_or_else(|| {
                    SketchError::InvalidParameter(format!("unknown quality preset '{}'", preset))
                })?;
            } else if arg == "--no-trails" {
                self.trails = false;
            } else if arg == "--fps" {
                self.show_fps = true;
            } else {
                positional.push(arg.clone());
            }
        }
        Ok(positional)
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "sketchbook_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(json) = storage.and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten()) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring stored settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
