//! Shape helpers built on top of `DrawCmd`

use glam::{Vec2, Vec3};
use std::f32::consts::PI;

use super::canvas::{Canvas, DrawCmd, Stroke};
use super::color::Color;
use crate::error::Result;
use crate::sim::Trail;

/// Interpolate color based on speed (slow=blue, medium=green, fast=red/orange)
pub fn speed_color(speed: f32, min_speed: f32, max_speed: f32, alpha: f32) -> Color {
    let span = (max_speed - min_speed).max(f32::EPSILON);
    let t = ((speed - min_speed) / span).clamp(0.0, 1.0);

    // Color gradient: blue (slow) -> cyan -> green -> yellow -> orange -> red (fast)
    let (r, g, b) = if t < 0.25 {
        let u = t / 0.25;
        (0.2, 0.4 + 0.4 * u, 1.0)
    } else if t < 0.5 {
        let u = (t - 0.25) / 0.25;
        (0.2, 0.8, 1.0 - 0.6 * u)
    } else if t < 0.75 {
        let u = (t - 0.5) / 0.25;
        (0.2 + 0.8 * u, 0.8, 0.4 - 0.2 * u)
    } else {
        let u = (t - 0.75) / 0.25;
        (1.0, 0.8 - 0.5 * u, 0.2)
    };

    Color::from_unit(r, g, b, alpha)
}

/// Trail as line segments fading out toward the oldest position
pub fn trail_segments(trail: &Trail<Vec2>, color: Color, width: f32) -> Vec<DrawCmd> {
    if trail.len() < 2 {
        return Vec::new();
    }
    let n = trail.len() as f32;
    trail
        .iter()
        .zip(trail.iter().skip(1))
        .enumerate()
        .map(|(i, (a, b))| {
            let t = i as f32 / n;
            DrawCmd::Line {
                from: *a,
                to: *b,
                stroke: Stroke::new(color.faded((1.0 - t) * 0.8), width * (1.0 - t * 0.7)),
            }
        })
        .collect()
}

/// Filled arrow head with its tip at `tip`, pointing along `dir`
pub fn arrow_head(tip: Vec2, dir: Vec2, length: f32, half_width: f32) -> Option<[Vec2; 3]> {
    let dir = dir.normalize_or_zero();
    if dir == Vec2::ZERO {
        return None;
    }
    let back = tip - dir * length;
    let perp = dir.perp() * half_width;
    Some([tip, back + perp, back - perp])
}

/// Shaft plus head
pub fn arrow(canvas: &mut dyn Canvas, from: Vec2, to: Vec2, stroke: Stroke, head: f32) -> Result<()> {
    canvas.line(from, to, stroke)?;
    if let Some(points) = arrow_head(to, to - from, head, head * 0.5) {
        canvas.draw(DrawCmd::Triangle {
            points,
            fill: stroke.color,
        })?;
    }
    Ok(())
}

/// Direction markers every `spacing` points along a polyline
pub fn polyline_arrows(points: &[Vec2], spacing: usize, color: Color) -> Vec<DrawCmd> {
    if spacing == 0 || points.len() < spacing {
        return Vec::new();
    }
    (spacing / 2..points.len() - 1)
        .step_by(spacing)
        .filter_map(|i| {
            let (a, b) = (points[i], points[i + 1]);
            if (b - a).length_squared() < 1e-4 {
                return None;
            }
            arrow_head(a, b - a, 5.0, 2.0).map(|points| DrawCmd::Triangle { points, fill: color })
        })
        .collect()
}

/// Concentric rings and radial spokes of a polar grid
pub fn polar_grid(center: Vec2, radius: f32, rings: u32, spokes: u32, stroke: Stroke) -> Vec<DrawCmd> {
    let mut cmds = Vec::with_capacity((rings + spokes) as usize);
    if radius <= 0.0 || !radius.is_finite() {
        return cmds;
    }
    for i in 1..=rings {
        cmds.push(DrawCmd::Circle {
            center,
            radius: radius * i as f32 / rings as f32,
            fill: None,
            stroke: Some(stroke),
        });
    }
    for i in 0..spokes {
        let angle = i as f32 / spokes as f32 * 2.0 * PI;
        // Screen y grows downward
        let end = center + Vec2::new(angle.cos(), -angle.sin()) * radius;
        cmds.push(DrawCmd::Line {
            from: center,
            to: end,
            stroke,
        });
    }
    cmds
}

/// Oblique projection of a 3D point onto the canvas (+y up in world space)
pub fn project(p: Vec3, center: Vec2, scale: f32) -> Vec2 {
    let depth = Vec2::new(0.5, -0.35) * p.z;
    center + (Vec2::new(p.x, -p.y) + depth) * scale
}

/// The twelve edges of an origin-centred cube
pub fn cube_edges(side: f32, center: Vec2, scale: f32, stroke: Stroke) -> Vec<DrawCmd> {
    let h = side * 0.5;
    let corner = |i: u32| {
        Vec3::new(
            if i & 1 == 0 { -h } else { h },
            if i & 2 == 0 { -h } else { h },
            if i & 4 == 0 { -h } else { h },
        )
    };
    let mut cmds = Vec::with_capacity(12);
    for a in 0..8u32 {
        for bit in [1u32, 2, 4] {
            let b = a | bit;
            if b != a {
                cmds.push(DrawCmd::Line {
                    from: project(corner(a), center, scale),
                    to: project(corner(b), center, scale),
                    stroke,
                });
            }
        }
    }
    cmds
}
