//! Closed-form vector fields, streamlines and advected particles
//!
//! Two sources are modelled:
//! - an electric dipole (inverse-square, lines start and end on charges)
//! - a straight current through the canvas (inverse-linear, closed loops)

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{limit, polar_to_cartesian};

/// Fields weaker than this (squared) stop a streamline
pub const VANISHING_FIELD_SQ: f32 = 1e-4;

/// A 2D vector field
pub trait FieldSource {
    fn sample(&self, p: Vec2) -> Vec2;
}

/// Axis-aligned region; streamlines and particles live inside one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Shrink by `margin` on every side (never inverted)
    pub fn inset(&self, margin: f32) -> Self {
        let center = (self.min + self.max) * 0.5;
        Self {
            min: (self.min + Vec2::splat(margin)).min(center),
            max: (self.max - Vec2::splat(margin)).max(center),
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Two opposite point charges with an inverse-square field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargePair {
    pub positive: Vec2,
    pub negative: Vec2,
    /// +1 or -1; flipping swaps which charge is the source
    pub magnitude: f32,
    /// Field constant k in k·q / r²
    pub strength: f32,
    /// r² is floored at this value near the charges
    pub min_dist_sq: f32,
}

impl ChargePair {
    pub fn new(positive: Vec2, negative: Vec2) -> Self {
        Self {
            positive,
            negative,
            magnitude: 1.0,
            strength: 1500.0,
            min_dist_sq: 100.0,
        }
    }

    /// Charge the field lines leave from
    pub fn source(&self) -> Vec2 {
        if self.magnitude > 0.0 { self.positive } else { self.negative }
    }

    /// Charge the field lines end on
    pub fn sink(&self) -> Vec2 {
        if self.magnitude > 0.0 { self.negative } else { self.positive }
    }

    pub fn flip(&mut self) {
        self.magnitude = -self.magnitude;
    }

    fn point_charge(&self, p: Vec2, at: Vec2, q: f32) -> Vec2 {
        let dir = p - at;
        let dist_sq = dir.length_squared().max(self.min_dist_sq);
        dir.normalize_or_zero() * (self.strength * q / dist_sq)
    }
}

impl FieldSource for ChargePair {
    fn sample(&self, p: Vec2) -> Vec2 {
        self.point_charge(p, self.positive, self.magnitude)
            + self.point_charge(p, self.negative, -self.magnitude)
    }
}

/// Current perpendicular to the canvas; field circulates around it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineCurrent {
    pub center: Vec2,
    /// Signed current; positive circulates counter-clockwise (in screen space)
    pub current: f32,
    /// Field constant k in k·I / r
    pub strength: f32,
    /// r is floored at this value near the wire
    pub min_radius: f32,
}

impl LineCurrent {
    pub fn new(center: Vec2) -> Self {
        Self {
            center,
            current: 1.0,
            strength: 500.0,
            min_radius: 5.0,
        }
    }

    pub fn reverse(&mut self) {
        self.current = -self.current;
    }
}

impl FieldSource for LineCurrent {
    fn sample(&self, p: Vec2) -> Vec2 {
        let offset = p - self.center;
        let r = offset.length().max(self.min_radius);
        let tangent = offset.perp().normalize_or_zero();
        tangent * (self.strength * self.current / r)
    }
}

/// Why a traced line stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    ReachedSink,
    StepBudget,
    LeftBounds,
    FieldVanished,
}

#[derive(Debug, Clone)]
pub struct Streamline {
    pub points: Vec<Vec2>,
    pub termination: Termination,
}

/// Streamline tracing parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceParams {
    pub step_len: f32,
    pub max_steps: usize,
    /// Radius around the source where lines begin
    pub start_radius: f32,
    /// Lines stop within this distance of the sink
    pub sink_radius: f32,
}

impl Default for TraceParams {
    fn default() -> Self {
        Self {
            step_len: 2.5,
            max_steps: 80,
            start_radius: 15.0,
            sink_radius: 15.0 * 0.8,
        }
    }
}

/// Follow the field direction from `start` in fixed-length steps
pub fn trace_streamline<F: FieldSource + ?Sized>(
    field: &F,
    start: Vec2,
    sink: Option<Vec2>,
    bounds: &Rect,
    params: &TraceParams,
) -> Streamline {
    let mut points = Vec::with_capacity(params.max_steps);
    let mut pos = start;

    for _ in 0..params.max_steps {
        points.push(pos);

        let f = field.sample(pos);
        if !f.is_finite() || f.length_squared() < VANISHING_FIELD_SQ {
            return Streamline {
                points,
                termination: Termination::FieldVanished,
            };
        }
        pos += f.normalize() * params.step_len;

        if sink.is_some_and(|s| pos.distance(s) < params.sink_radius) {
            return Streamline {
                points,
                termination: Termination::ReachedSink,
            };
        }
        if !bounds.contains(pos) {
            return Streamline {
                points,
                termination: Termination::LeftBounds,
            };
        }
    }

    Streamline {
        points,
        termination: Termination::StepBudget,
    }
}

/// Lines fanning out evenly from the dipole's source charge
pub fn electric_field_lines(
    charges: &ChargePair,
    count: usize,
    bounds: &Rect,
    params: &TraceParams,
) -> Vec<Streamline> {
    let source = charges.source();
    let sink = charges.sink();
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * std::f32::consts::TAU;
            let start = source + polar_to_cartesian(params.start_radius, angle);
            trace_streamline(charges, start, Some(sink), bounds, params)
        })
        .filter(|line| line.points.len() > 2)
        .collect()
}

/// Concentric closed loops around a wire, oriented by the sign of the current
pub fn magnetic_loops(wire: &LineCurrent, r_min: f32, r_max: f32, count: usize) -> Vec<Vec<Vec2>> {
    let direction = if wire.current < 0.0 { -1.0 } else { 1.0 };
    (0..count)
        .map(|i| {
            let t = if count > 1 { i as f32 / (count - 1) as f32 } else { 0.0 };
            let r = r_min + t * (r_max - r_min);
            let segments = ((r * 0.8).floor() as usize).max(30);
            (0..=segments)
                .map(|s| {
                    let angle = s as f32 / segments as f32 * std::f32::consts::TAU * direction;
                    wire.center + polar_to_cartesian(r, angle)
                })
                .collect()
        })
        .collect()
}

/// Which half of the canvas a particle is advected in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    Electric,
    Magnetic,
}

/// A short-lived tracer pushed around by a field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldParticle {
    pub region: Region,
    pub pos: Vec2,
    pub vel: Vec2,
    pub max_speed: f32,
    /// Frames left before respawn
    pub lifespan: f32,
    pub orig_lifespan: f32,
    pub base_size: f32,
}

/// Scale applied to the field before it becomes acceleration
pub const FIELD_FORCE_SCALE: f32 = 0.1;

impl FieldParticle {
    pub fn new<R: Rng>(region: Region, rng: &mut R) -> Self {
        let lifespan = rng.random_range(150.0..300.0);
        Self {
            region,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            max_speed: rng.random_range(1.5..3.0),
            lifespan,
            orig_lifespan: lifespan,
            base_size: rng.random_range(1.5..3.5),
        }
    }

    /// Accelerate along the field, cap speed, age; returns true when it needs a respawn
    pub fn update<F: FieldSource + ?Sized>(&mut self, field: &F, region_bounds: &Rect) -> bool {
        let acc = field.sample(self.pos) * FIELD_FORCE_SCALE;
        if acc.is_finite() {
            self.vel = limit(self.vel + acc, self.max_speed);
        }
        self.pos += self.vel;
        self.lifespan -= 1.0;
        self.lifespan < 0.0 || !region_bounds.inset(5.0).contains(self.pos) || !self.pos.is_finite()
    }

    /// Respawn next to the source of its region with velocity along the local field
    pub fn respawn<R: Rng, F: FieldSource + ?Sized>(
        &mut self,
        origin: Vec2,
        radius: f32,
        min_speed: f32,
        field: &F,
        rng: &mut R,
    ) {
        self.lifespan = rng.random_range(150.0..300.0);
        self.orig_lifespan = self.lifespan;
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        self.pos = origin + polar_to_cartesian(radius, angle);
        let speed = if self.max_speed > min_speed {
            rng.random_range(min_speed..self.max_speed)
        } else {
            self.max_speed
        };
        self.vel = limit(field.sample(self.pos).normalize_or_zero() * speed, self.max_speed);
    }

    /// Remaining life in [0, 1]
    pub fn life_fraction(&self) -> f32 {
        if self.orig_lifespan <= 0.0 {
            return 0.0;
        }
        (self.lifespan / self.orig_lifespan).clamp(0.0, 1.0)
    }
}
