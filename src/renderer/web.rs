//! Browser backend: rasterizes `DrawCmd`s onto a 2D canvas context

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::canvas::{Align, Canvas, DrawCmd, Stroke};
use crate::error::{Result, SketchError};
use crate::layout::Viewport;

fn js_err(e: JsValue) -> SketchError {
    SketchError::Render(format!("{:?}", e))
}

/// A `<canvas>` and its 2D context, scaled for the device pixel ratio
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    viewport: Viewport,
    dpr: f64,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, viewport: Viewport, dpr: f64) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or_else(|| SketchError::Render("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SketchError::Render("context is not 2d".into()))?;
        let mut surface = Self {
            canvas,
            ctx,
            viewport,
            dpr: dpr.max(1.0),
        };
        surface.resize(viewport)?;
        Ok(surface)
    }

    pub fn element(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Resize the backing store; CSS size stays in logical pixels
    pub fn resize(&mut self, viewport: Viewport) -> Result<()> {
        self.viewport = viewport;
        let w = (viewport.width as f64 * self.dpr) as u32;
        let h = (viewport.height as f64 * self.dpr) as u32;
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        let style = self.canvas.style();
        style
            .set_property("width", &format!("{}px", viewport.width))
            .map_err(js_err)?;
        style
            .set_property("height", &format!("{}px", viewport.height))
            .map_err(js_err)?;
        self.ctx
            .set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0)
            .map_err(js_err)
    }

    fn apply_stroke(&self, stroke: &Stroke) -> Result<()> {
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.set_line_width(stroke.width as f64);
        let dash = js_sys::Array::new();
        if let Some([on, off]) = stroke.dash {
            dash.push(&JsValue::from_f64(on as f64));
            dash.push(&JsValue::from_f64(off as f64));
        }
        self.ctx.set_line_dash(&dash).map_err(js_err)
    }
}

impl Canvas for CanvasSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn draw(&mut self, cmd: DrawCmd) -> Result<()> {
        let ctx = &self.ctx;
        match cmd {
            DrawCmd::Clear(color) => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_rect(0.0, 0.0, self.viewport.width as f64, self.viewport.height as f64);
            }
            DrawCmd::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                if radius.is_nan() || radius <= 0.0 || !center.is_finite() {
                    return Ok(());
                }
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
                    .map_err(js_err)?;
                if let Some(fill) = fill {
                    ctx.set_fill_style_str(&fill.to_css());
                    ctx.fill();
                }
                if let Some(stroke) = stroke {
                    self.apply_stroke(&stroke)?;
                    ctx.stroke();
                }
            }
            DrawCmd::Line { from, to, stroke } => {
                self.apply_stroke(&stroke)?;
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.line_to(to.x as f64, to.y as f64);
                ctx.stroke();
            }
            DrawCmd::Polyline {
                points,
                stroke,
                closed,
            } => {
                if points.len() < 2 {
                    return Ok(());
                }
                self.apply_stroke(&stroke)?;
                ctx.begin_path();
                ctx.move_to(points[0].x as f64, points[0].y as f64);
                for p in &points[1..] {
                    ctx.line_to(p.x as f64, p.y as f64);
                }
                if closed {
                    ctx.close_path();
                }
                ctx.stroke();
            }
            DrawCmd::Triangle { points, fill } => {
                ctx.set_fill_style_str(&fill.to_css());
                ctx.begin_path();
                ctx.move_to(points[0].x as f64, points[0].y as f64);
                ctx.line_to(points[1].x as f64, points[1].y as f64);
                ctx.line_to(points[2].x as f64, points[2].y as f64);
                ctx.close_path();
                ctx.fill();
            }
            DrawCmd::Text {
                pos,
                text,
                size,
                color,
                align,
            } => {
                ctx.set_font(&format!("{}px sans-serif", size));
                ctx.set_text_align(match align {
                    Align::Left => "left",
                    Align::Center => "center",
                    Align::Right => "right",
                });
                ctx.set_text_baseline("top");
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_text(&text, pos.x as f64, pos.y as f64).map_err(js_err)?;
            }
            DrawCmd::Point { pos, color, size } => {
                ctx.set_fill_style_str(&color.to_css());
                let half = size as f64 * 0.5;
                ctx.fill_rect(pos.x as f64 - half, pos.y as f64 - half, size as f64, size as f64);
            }
        }
        Ok(())
    }
}
