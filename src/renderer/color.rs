//! Colours and per-theme palettes

use serde::{Deserialize, Serialize};

use crate::settings::Theme;

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Scale alpha by `t` in [0, 1]
    pub fn faded(self, t: f32) -> Self {
        let a = (self.a as f32 * t.clamp(0.0, 1.0)).round() as u8;
        self.with_alpha(a)
    }

    /// Build from unit floats, clamping each channel
    pub fn from_unit(r: f32, g: f32, b: f32, a: f32) -> Self {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgba(q(r), q(g), q(b), q(a))
    }

    /// CSS `rgba(...)` string for canvas style setters
    pub fn to_css(&self) -> String {
        format!(
            "rgba({},{},{},{:.3})",
            self.r,
            self.g,
            self.b,
            self.a as f32 / 255.0
        )
    }
}

/// Named colours every sketch draws with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub text_muted: Color,
    pub grid: Color,
    pub axis: Color,
    pub guide: Color,
    /// Primary accent (vectors, waves)
    pub primary: Color,
    pub tip: Color,
    pub real: Color,
    pub imag: Color,
    pub positive: Color,
    pub negative: Color,
    pub wire: Color,
    pub particle: Color,
    pub e_line: Color,
    pub b_line: Color,
    pub atom: Color,
    pub field_arrow: Color,
    /// Gravity bodies, walkers and the bounce ball sit on a dark stage in both themes
    pub stage: Color,
    pub stage_ink: Color,
    pub ball: Color,
}

impl Palette {
    pub fn light() -> Self {
        let red = Color::rgb(211, 47, 47);
        let blue = Color::rgb(66, 133, 244);
        Self {
            background: Color::rgb(248, 249, 250),
            text: Color::rgb(32, 33, 36),
            text_muted: Color::rgb(95, 99, 104),
            grid: Color::rgb(225, 227, 229),
            axis: Color::rgb(100, 100, 110),
            guide: Color::rgba(180, 185, 190, 150),
            primary: blue,
            tip: Color::rgb(25, 75, 190),
            real: red,
            imag: Color::rgb(52, 168, 83),
            positive: red,
            negative: blue,
            wire: Color::gray(80),
            particle: Color::rgb(95, 99, 104),
            e_line: blue,
            b_line: Color::rgb(52, 168, 83),
            atom: Color::rgba(200, 200, 210, 180),
            field_arrow: Color::rgba(255, 160, 0, 200),
            stage: Color::BLACK,
            stage_ink: Color::WHITE,
            ball: Color::rgb(70, 244, 50),
        }
    }

    pub fn dark() -> Self {
        let red = Color::rgb(255, 138, 128);
        let blue = Color::rgb(138, 180, 248);
        Self {
            background: Color::rgb(32, 33, 36),
            text: Color::rgb(232, 234, 237),
            text_muted: Color::rgb(154, 160, 166),
            grid: Color::rgba(50, 55, 60, 150),
            axis: Color::rgb(100, 110, 120),
            guide: Color::rgba(100, 110, 120, 100),
            primary: blue,
            tip: Color::rgb(200, 220, 255),
            real: red,
            imag: Color::rgb(129, 201, 149),
            positive: red,
            negative: blue,
            wire: Color::gray(200),
            particle: Color::rgb(232, 234, 237),
            e_line: blue,
            b_line: Color::rgb(129, 201, 149),
            atom: Color::rgba(100, 100, 110, 200),
            field_arrow: Color::rgba(255, 235, 59, 200),
            stage: Color::rgb(10, 10, 25),
            stage_ink: Color::WHITE,
            ball: Color::rgb(70, 244, 50),
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::light(),
            Theme::Dark => Self::dark(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::light()
    }
}
