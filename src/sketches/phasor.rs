//! Rotating phasor on a polar grid with a scrolling trace of its real part

use glam::Vec2;

use crate::config::PhasorConfig;
use crate::consts::FRAME_DT;
use crate::error::Result;
use crate::input::FrameInput;
use crate::layout::{PhasorLayout, Viewport};
use crate::map_range;
use crate::renderer::shapes::{arrow, polar_grid};
use crate::renderer::{Align, Canvas, DrawCmd, Palette, Stroke};
use crate::sim::Phasor;
use crate::sketch::Sketch;

const GRID_RINGS: u32 = 4;
const GRID_SPOKES: u32 = 12;
const AXIS_PAD: f32 = 15.0;

pub struct PhasorSketch {
    phasor: Phasor,
    layout: PhasorLayout,
    viewport: Viewport,
}

impl PhasorSketch {
    pub fn new(viewport: Viewport, config: &PhasorConfig) -> Self {
        let layout = PhasorLayout::compute(&viewport);
        Self {
            phasor: Phasor::new(layout.amplitude(), config.phase, config.omega, layout.history_len),
            layout,
            viewport,
        }
    }

    pub fn phasor(&self) -> &Phasor {
        &self.phasor
    }

    /// Tip of the vector in canvas coordinates
    fn tip(&self) -> Vec2 {
        let p = self.phasor.position();
        self.layout.origin + Vec2::new(p.x, -p.y)
    }

    /// Canvas y of a stored real-part sample
    fn wave_y(&self, value: f32) -> f32 {
        let half = self.layout.wave_height / 2.2;
        let a = self.phasor.amplitude;
        self.layout.wave_origin.y - map_range(value, -a, a, -half, half, true)
    }

    fn draw_axes(&self, canvas: &mut dyn Canvas, palette: &Palette) -> Result<()> {
        let o = self.layout.origin;
        let reach = self.layout.plot_radius + AXIS_PAD;
        let stroke = Stroke::new(palette.axis, 1.5);
        canvas.line(Vec2::new(o.x - reach, o.y), Vec2::new(o.x + reach, o.y), stroke)?;
        canvas.line(Vec2::new(o.x, o.y - reach), Vec2::new(o.x, o.y + reach), stroke)?;
        canvas.text(Vec2::new(o.x + reach + 3.0, o.y), "Re", 11.0, palette.axis, Align::Left)?;
        canvas.text(Vec2::new(o.x, o.y - reach - 3.0), "Im", 11.0, palette.axis, Align::Center)
    }

    fn draw_wave(&self, canvas: &mut dyn Canvas, palette: &Palette, real_x: f32) -> Result<()> {
        let history = &self.phasor.history;
        if history.len() < 2 {
            return Ok(());
        }
        let start = self.layout.wave_origin;
        let right = start.x + self.layout.wave_width;
        canvas.line(start, Vec2::new(right, start.y), Stroke::new(palette.axis.with_alpha(100), 1.0))?;

        let points: Vec<Vec2> = history
            .iter()
            .enumerate()
            .map(|(i, v)| Vec2::new(start.x + i as f32, self.wave_y(*v)))
            .filter(|p| p.x <= right && p.is_finite())
            .collect();
        let head = points.first().copied();
        if points.len() >= 2 {
            canvas.draw(DrawCmd::Polyline {
                points,
                stroke: Stroke::new(palette.primary, 1.5),
                closed: false,
            })?;
        }

        if let Some(head) = head {
            canvas.line(
                Vec2::new(real_x, self.layout.origin.y),
                head,
                Stroke::new(palette.guide, 1.0).dashed(3.0, 3.0),
            )?;
            canvas.fill_circle(head, 3.0, palette.primary)?;
        }
        Ok(())
    }

    fn draw_labels(&self, canvas: &mut dyn Canvas, palette: &Palette) -> Result<()> {
        let ratio = if self.layout.plot_radius > 0.0 {
            self.phasor.amplitude / self.layout.plot_radius
        } else {
            0.0
        };
        canvas.text(Vec2::new(10.0, 10.0), "A = |A|e^(iφ)", 11.0, palette.text, Align::Left)?;
        let muted = palette.text.with_alpha(200);
        canvas.text(Vec2::new(15.0, 28.0), &format!("|A|/R ≈ {:.2}", ratio), 11.0, muted, Align::Left)?;
        canvas.text(
            Vec2::new(15.0, 43.0),
            &format!(" φ ≈ {:.1}°", self.phasor.phase_degrees()),
            11.0,
            muted,
            Align::Left,
        )?;
        canvas.text(
            Vec2::new(self.viewport.width - 10.0, self.viewport.height - 10.0),
            "A(t) = Re{ A * e^(-iωt) }",
            10.0,
            palette.text.with_alpha(180),
            Align::Right,
        )
    }
}

impl Sketch for PhasorSketch {
    fn name(&self) -> &'static str {
        "phasor"
    }

    fn update(&mut self, input: &FrameInput) -> Result<()> {
        self.phasor.step(input.dt / FRAME_DT);
        Ok(())
    }

    fn render(&self, canvas: &mut dyn Canvas, palette: &Palette) -> Result<()> {
        canvas.clear(palette.background)?;
        let origin = self.layout.origin;
        for cmd in polar_grid(
            origin,
            self.layout.plot_radius,
            GRID_RINGS,
            GRID_SPOKES,
            Stroke::new(palette.grid, 0.5),
        ) {
            canvas.draw(cmd)?;
        }
        self.draw_axes(canvas, palette)?;

        let tip = self.tip();
        self.draw_wave(canvas, palette, tip.x)?;

        let guide = Stroke::new(palette.real.with_alpha(150), 1.0).dashed(2.0, 3.0);
        canvas.line(tip, Vec2::new(tip.x, origin.y), guide)?;
        canvas.line(tip, Vec2::new(origin.x, tip.y), Stroke { color: palette.imag.with_alpha(150), ..guide })?;

        arrow(canvas, origin, tip, Stroke::new(palette.primary, 2.5), 8.0)?;
        canvas.fill_circle(tip, 4.0, palette.tip)?;
        canvas.fill_circle(Vec2::new(tip.x, origin.y), 4.0, palette.real)?;
        canvas.fill_circle(Vec2::new(origin.x, tip.y), 4.0, palette.imag)?;

        self.draw_labels(canvas, palette)
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.layout = PhasorLayout::compute(&viewport);
        self.phasor.amplitude = self.layout.amplitude();
        self.phasor.set_history_len(self.layout.history_len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawList;

    fn sketch() -> PhasorSketch {
        PhasorSketch::new(Viewport::new(800.0, 400.0), &PhasorConfig::default())
    }

    #[test]
    fn test_amplitude_follows_layout() {
        let mut s = sketch();
        assert_eq!(s.phasor().amplitude, 135.0);
        s.resize(Viewport::new(400.0, 300.0));
        // origin (140, 150): radius min(112, 135)
        assert_eq!(s.phasor().amplitude, 112.0 * 0.75);
        assert!(s.phasor().history.is_empty());
    }

    #[test]
    fn test_update_scales_with_frame_dt() {
        let mut s = sketch();
        s.update(&FrameInput::with_dt(FRAME_DT * 2.0)).unwrap();
        assert!((s.phasor().time - 2.0).abs() < 1e-5);
        assert_eq!(s.phasor().history.len(), 1);
    }

    #[test]
    fn test_wave_trace_stays_in_wave_area() {
        let mut s = sketch();
        for _ in 0..400 {
            s.update(&FrameInput::with_dt(FRAME_DT)).unwrap();
        }
        let mut list = DrawList::new(s.viewport);
        s.render(&mut list, &Palette::default()).unwrap();
        let trace = list
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCmd::Polyline { points, .. } => Some(points.clone()),
                _ => None,
            })
            .unwrap();
        let top = s.layout.wave_origin.y - s.layout.wave_height / 2.2 - 1e-3;
        let bottom = s.layout.wave_origin.y + s.layout.wave_height / 2.2 + 1e-3;
        let right = s.layout.wave_origin.x + s.layout.wave_width;
        assert!(trace.iter().all(|p| p.x <= right && p.y >= top && p.y <= bottom));
        assert_eq!(trace.len(), s.phasor().history.len());
    }

    #[test]
    fn test_labels_show_phase() {
        let s = sketch();
        let mut list = DrawList::new(s.viewport);
        s.render(&mut list, &Palette::default()).unwrap();
        let has_phase = list.commands().iter().any(|c| match c {
            DrawCmd::Text { text, .. } => text.contains("45.0°"),
            _ => false,
        });
        assert!(has_phase);
    }
}
