//! Draw commands and the surface they are issued to
//!
//! Sketches never talk to a backend directly: they emit `DrawCmd`s through
//! the `Canvas` trait. The browser backend rasterizes them, `DrawList`
//! records them for tests and headless runs.

use glam::Vec2;

use super::color::Color;
use crate::error::Result;
use crate::layout::Viewport;

/// Line style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    /// Dash pattern (on, off) in pixels
    pub dash: Option<[f32; 2]>,
}

impl Stroke {
    pub const fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub const fn dashed(self, on: f32, off: f32) -> Self {
        Self {
            dash: Some([on, off]),
            ..self
        }
    }
}

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// One primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Fill the whole surface
    Clear(Color),
    Circle {
        center: Vec2,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Line {
        from: Vec2,
        to: Vec2,
        stroke: Stroke,
    },
    Polyline {
        points: Vec<Vec2>,
        stroke: Stroke,
        closed: bool,
    },
    Triangle {
        points: [Vec2; 3],
        fill: Color,
    },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Color,
        align: Align,
    },
    /// A single pixel-sized dot
    Point {
        pos: Vec2,
        color: Color,
        size: f32,
    },
}

/// A drawing surface
pub trait Canvas {
    fn viewport(&self) -> Viewport;
    fn draw(&mut self, cmd: DrawCmd) -> Result<()>;

    fn clear(&mut self, color: Color) -> Result<()> {
        self.draw(DrawCmd::Clear(color))
    }

    fn line(&mut self, from: Vec2, to: Vec2, stroke: Stroke) -> Result<()> {
        self.draw(DrawCmd::Line { from, to, stroke })
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Color) -> Result<()> {
        self.draw(DrawCmd::Circle {
            center,
            radius,
            fill: Some(fill),
            stroke: None,
        })
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: Stroke) -> Result<()> {
        self.draw(DrawCmd::Circle {
            center,
            radius,
            fill: None,
            stroke: Some(stroke),
        })
    }

    fn text(&mut self, pos: Vec2, text: &str, size: f32, color: Color, align: Align) -> Result<()> {
        self.draw(DrawCmd::Text {
            pos,
            text: text.to_owned(),
            size,
            color,
            align,
        })
    }
}

/// Records commands instead of rasterizing them
#[derive(Debug, Clone)]
pub struct DrawList {
    viewport: Viewport,
    commands: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn count(&self, pred: impl Fn(&DrawCmd) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    /// Every coordinate the list references (for bounds checks)
    pub fn points(&self) -> Vec<Vec2> {
        let mut out = Vec::new();
        for cmd in &self.commands {
            match cmd {
                DrawCmd::Clear(_) => {}
                DrawCmd::Circle { center, .. } => out.push(*center),
                DrawCmd::Line { from, to, .. } => out.extend([*from, *to]),
                DrawCmd::Polyline { points, .. } => out.extend(points.iter().copied()),
                DrawCmd::Triangle { points, .. } => out.extend(points.iter().copied()),
                DrawCmd::Text { pos, .. } | DrawCmd::Point { pos, .. } => out.push(*pos),
            }
        }
        out
    }
}

impl Canvas for DrawList {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn draw(&mut self, cmd: DrawCmd) -> Result<()> {
        self.commands.push(cmd);
        Ok(())
    }
}
