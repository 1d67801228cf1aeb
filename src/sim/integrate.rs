//! Per-body integration through the active force field
//!
//! Geodesic levels hand the whole step to the geodesic integrator, which picks
//! its own time-dilated step. Everything else uses semi-implicit Euler:
//! v' = v + a·dt, then x' = x + v'·dt with the speed-capped v'.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::field::ForceField;
use super::geodesic;
use super::growth::crosses_horizon;
use super::state::{Body, BodyKind};
use crate::level::Boundary;
use crate::{limit_speed, normalize_angle, wrap_coordinate};

/// Rectangular world `[0, width) x [0, height)` with its edge policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f64,
    pub height: f64,
    pub boundary: Boundary,
}

impl WorldBounds {
    /// Inside the closed rectangle `[0, width] x [0, height]`
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    /// Wrap both coordinates independently into the world
    #[inline]
    pub fn wrap(&self, p: DVec2) -> DVec2 {
        DVec2::new(wrap_coordinate(p.x, self.width), wrap_coordinate(p.y, self.height))
    }

    /// Same bounds, always wrapping
    pub fn wrapping(self) -> Self {
        Self {
            boundary: Boundary::Wrap,
            ..self
        }
    }
}

/// Bounds and speed cap applied after every step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionLimits {
    pub bounds: WorldBounds,
    /// No body moves faster than this after integration
    pub speed_cap: f64,
}

/// A body after one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stepped {
    pub body: Body,
    /// False when a killing boundary removed the body
    pub in_bounds: bool,
    /// The step took the body into the horizon
    pub captured: bool,
}

/// Advance one body by a single tick
pub fn step_body(body: &Body, field: &ForceField, limits: &MotionLimits, dt: f64) -> Stepped {
    let mut next = *body;
    let mut captured = false;

    match field {
        ForceField::Geodesic { center, params } => {
            let result = geodesic::step(center, body.pos, body.vel, params);
            // Tested before wrapping so the path is continuous
            captured = crosses_horizon(center, body.pos, result.pos);
            next.pos = result.pos;
            next.vel = limit_speed(result.vel, limits.speed_cap);
        }
        ForceField::None | ForceField::NewtonianPoint(_) => {
            let a = field.acceleration(body.pos, body.vel);
            next.vel = limit_speed(body.vel + a * dt, limits.speed_cap);
            next.pos = body.pos + next.vel * dt;
        }
    }

    match &mut next.kind {
        BodyKind::Rocket {
            heading,
            angular_vel,
            ..
        } => {
            *heading = normalize_angle(*heading + *angular_vel * dt);
        }
        BodyKind::Bullet { ttl } => *ttl -= dt,
        BodyKind::Bomb { fuse } => *fuse -= dt,
        BodyKind::Asteroid => {}
    }

    let in_bounds = match limits.bounds.boundary {
        Boundary::Wrap => {
            next.pos = limits.bounds.wrap(next.pos);
            true
        }
        Boundary::Kill => limits.bounds.contains(next.pos),
    };

    Stepped {
        body: next,
        in_bounds,
        captured,
    }
}
