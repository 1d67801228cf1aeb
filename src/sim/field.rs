//! Force field selected by the active level

use glam::DVec2;

use super::geodesic::{GeodesicParams, geodesic_accel};
use super::newtonian::NewtonianField;
use super::state::GravitatingCenter;

/// How bodies are pulled on the current level
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForceField {
    /// Flat space, straight-line motion
    None,
    /// Inverse-power attractor with a cutoff range
    NewtonianPoint(NewtonianField),
    /// Curved space around a black hole whose horizon can grow
    Geodesic {
        center: GravitatingCenter,
        params: GeodesicParams,
    },
}

impl ForceField {
    /// Acceleration at `pos` for a body moving with `vel`
    pub fn acceleration(&self, pos: DVec2, vel: DVec2) -> DVec2 {
        match self {
            ForceField::None => DVec2::ZERO,
            ForceField::NewtonianPoint(field) => field.accel(pos),
            ForceField::Geodesic { center, params } => geodesic_accel(center, pos, vel, params),
        }
    }

    /// True if a body at `pos` is destroyed by the star surface or horizon
    pub fn is_lethal(&self, pos: DVec2) -> bool {
        match self {
            ForceField::None => false,
            ForceField::NewtonianPoint(field) => field.is_lethal(pos),
            ForceField::Geodesic { center, .. } => center.contains(pos),
        }
    }

    /// Distance from `pos` to the attractor, if there is one
    pub fn distance_to_center(&self, pos: DVec2) -> Option<f64> {
        match self {
            ForceField::None => None,
            ForceField::NewtonianPoint(field) => Some(field.distance_to_center(pos)),
            ForceField::Geodesic { center, .. } => Some(center.distance_to(pos)),
        }
    }

    /// Whether consumed bodies grow the center
    #[inline]
    pub fn accretes(&self) -> bool {
        matches!(self, ForceField::Geodesic { .. })
    }
}
