//! 2D rendering module
//!
//! Sketches emit `DrawCmd`s through the `Canvas` trait; the browser backend
//! rasterizes them onto a canvas 2D context.

pub mod canvas;
pub mod color;
pub mod shapes;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use canvas::{Align, Canvas, DrawCmd, DrawList, Stroke};
pub use color::{Color, Palette};
#[cfg(target_arch = "wasm32")]
pub use web::CanvasSurface;
