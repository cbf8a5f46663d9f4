//! Dielectric polarization: atoms whose charge centres separate along the
//! field set by the pointer

use glam::Vec2;
use rand_pcg::Pcg32;

use crate::error::Result;
use crate::input::FrameInput;
use crate::layout::Viewport;
use crate::map_range;
use crate::renderer::shapes::arrow;
use crate::renderer::{Align, Canvas, DrawCmd, Palette, Stroke};
use crate::sim::dielectric::{MAX_FIELD, pointer_field};
use crate::sim::{Atom, RngState, Susceptibility, atom_grid};
use crate::sketch::Sketch;

pub struct MaterialsSketch {
    atoms: Vec<Atom>,
    atom_count: usize,
    e_field: Vec2,
    chi: Susceptibility,
    rng: Pcg32,
    viewport: Viewport,
}

impl MaterialsSketch {
    pub fn new(viewport: Viewport, atom_count: usize, seed: u64) -> Self {
        let mut rng = RngState::new(seed).to_rng();
        Self {
            atoms: atom_grid(&viewport, atom_count, &mut rng),
            atom_count,
            e_field: Vec2::ZERO,
            chi: Susceptibility::default(),
            rng,
            viewport,
        }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn e_field(&self) -> Vec2 {
        self.e_field
    }

    pub fn susceptibility(&self) -> Susceptibility {
        self.chi
    }
}

impl Sketch for MaterialsSketch {
    fn name(&self) -> &'static str {
        "materials"
    }

    fn update(&mut self, input: &FrameInput) -> Result<()> {
        if let Some(p) = input.pointer {
            self.e_field = pointer_field(p, &self.viewport);
        }
        if input.key_is('c') {
            self.chi = self.chi.cycle();
            log::info!("materials: susceptibility set to {}", self.chi.0);
        }
        Ok(())
    }

    fn render(&self, canvas: &mut dyn Canvas, palette: &Palette) -> Result<()> {
        canvas.clear(palette.background)?;

        for atom in &self.atoms {
            canvas.draw(DrawCmd::Circle {
                center: atom.pos,
                radius: atom.size * 0.5,
                fill: Some(palette.atom.with_alpha(50)),
                stroke: Some(Stroke::new(palette.atom, 1.0)),
            })?;
            let (plus, minus) = atom.charge_centres(self.e_field, self.chi);
            let r = atom.size * 0.125;
            canvas.fill_circle(plus, r, palette.positive.with_alpha(200))?;
            canvas.fill_circle(minus, r, palette.negative.with_alpha(200))?;
        }

        let (w, h) = (self.viewport.width, self.viewport.height);
        if self.e_field.length_squared() > 1.0 {
            let magnitude = self.e_field.length();
            let len = map_range(magnitude, 0.0, MAX_FIELD, 20.0, 80.0, true);
            let center = self.viewport.center();
            let tip = center + self.e_field.normalize_or_zero() * len;
            arrow(canvas, center, tip, Stroke::new(palette.field_arrow, 2.5), 10.0)?;
            canvas.text(
                Vec2::new(10.0, h - 10.0),
                &format!("External E ≈ {:.1} (arb. units)", magnitude),
                12.0,
                palette.text,
                Align::Left,
            )?;
        }

        canvas.text(
            Vec2::new(w - 10.0, 10.0),
            &format!("Simulated Susceptibility χe ≈ {:.1}", self.chi.0),
            12.0,
            palette.text,
            Align::Right,
        )?;
        canvas.text(
            Vec2::new(w - 10.0, 30.0),
            "(Move mouse to change E-field)",
            10.0,
            palette.text,
            Align::Right,
        )
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.atoms = atom_grid(&viewport, self.atom_count, &mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::renderer::DrawList;

    fn sketch() -> MaterialsSketch {
        MaterialsSketch::new(Viewport::new(500.0, 400.0), 80, 5)
    }

    #[test]
    fn test_pointer_sets_clamped_field() {
        let mut s = sketch();
        let input = FrameInput {
            pointer: Some(Vec2::new(500.0, 200.0)),
            ..FrameInput::with_dt(FRAME_DT)
        };
        s.update(&input).unwrap();
        // (250, 0) * 0.2 = 50, right at the cap
        assert!((s.e_field() - Vec2::new(50.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_key_cycles_susceptibility() {
        let mut s = sketch();
        let press = FrameInput {
            key: Some('C'),
            ..FrameInput::with_dt(FRAME_DT)
        };
        let seen: Vec<f32> = (0..3)
            .map(|_| {
                s.update(&press).unwrap();
                s.susceptibility().0
            })
            .collect();
        assert_eq!(seen, vec![2.0, 4.5, 0.5]);
    }

    #[test]
    fn test_resize_regenerates_atoms_inside_canvas() {
        let mut s = sketch();
        s.resize(Viewport::new(300.0, 240.0));
        assert_eq!(s.atoms().len(), 80);
        assert!(s.atoms().iter().all(|a| a.pos.x > 0.0 && a.pos.x < 300.0));
    }

    #[test]
    fn test_field_arrow_only_when_field_is_significant() {
        let mut s = sketch();
        let mut list = DrawList::new(s.viewport);
        s.render(&mut list, &Palette::default()).unwrap();
        assert_eq!(list.count(|c| matches!(c, DrawCmd::Triangle { .. })), 0);

        s.update(&FrameInput {
            pointer: Some(Vec2::new(400.0, 300.0)),
            ..FrameInput::with_dt(FRAME_DT)
        })
        .unwrap();
        let mut list = DrawList::new(s.viewport);
        s.render(&mut list, &Palette::default()).unwrap();
        assert_eq!(list.count(|c| matches!(c, DrawCmd::Triangle { .. })), 1);
    }
}
