//! Newtonian point gravity for star levels
//!
//! Gravity has a hard cutoff at `gravity_range` and is switched off very close
//! to the center. A separate, smaller `lethal_radius` marks the star surface.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::NEWTON_MIN_DISTANCE;
use crate::level::Falloff;

/// Inverse-power point attractor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewtonianField {
    pub center: DVec2,
    /// Gravitational strength G·M
    pub gm: f64,
    /// No pull at or beyond this distance
    pub gravity_range: f64,
    /// Anything closer than this is destroyed
    pub lethal_radius: f64,
    pub falloff: Falloff,
}

impl NewtonianField {
    #[inline]
    pub fn distance_to_center(&self, p: DVec2) -> f64 {
        (p - self.center).length()
    }

    /// Acceleration toward the center at `p`
    pub fn accel(&self, p: DVec2) -> DVec2 {
        let d = p - self.center;
        let r = d.length();
        if r >= self.gravity_range || r < NEWTON_MIN_DISTANCE {
            return DVec2::ZERO;
        }

        let a_mag = match self.falloff {
            Falloff::InverseSquare => self.gm / (r * r),
            Falloff::InverseLinear => self.gm / r,
        };
        -(d / r) * a_mag
    }

    /// True inside the lethal surface
    #[inline]
    pub fn is_lethal(&self, p: DVec2) -> bool {
        (p - self.center).length_squared() < self.lethal_radius * self.lethal_radius
    }

    /// Speed of a circular orbit at distance `r` (zero outside the range)
    pub fn circular_speed(&self, r: f64) -> f64 {
        let a = self.accel(self.center + DVec2::new(r, 0.0)).length();
        (a * r).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star(falloff: Falloff) -> NewtonianField {
        NewtonianField {
            center: DVec2::new(1000.0, 1000.0),
            gm: 30_000.0,
            gravity_range: 800.0,
            lethal_radius: 200.0,
            falloff,
        }
    }

    #[test]
    fn test_inverse_square_points_inward() {
        let field = star(Falloff::InverseSquare);
        let a = field.accel(DVec2::new(1300.0, 1000.0));
        assert!((a.x - (-30_000.0 / 90_000.0)).abs() < 1e-12);
        assert!(a.y.abs() < 1e-12);
    }

    #[test]
    fn test_inverse_linear_falloff() {
        let field = star(Falloff::InverseLinear);
        let a = field.accel(DVec2::new(1000.0, 1500.0));
        assert!((a.y - (-30_000.0 / 500.0)).abs() < 1e-9);
    }

    #[test]
    fn test_cutoffs() {
        let field = star(Falloff::InverseSquare);
        assert_eq!(field.accel(DVec2::new(1800.0, 1000.0)), DVec2::ZERO);
        assert_eq!(field.accel(DVec2::new(2000.0, 1000.0)), DVec2::ZERO);
        assert_eq!(field.accel(DVec2::new(1000.0, 1000.0)), DVec2::ZERO);
        assert_eq!(field.accel(DVec2::new(1000.0005, 1000.0)), DVec2::ZERO);
        assert_ne!(field.accel(DVec2::new(1799.0, 1000.0)), DVec2::ZERO);
    }

    #[test]
    fn test_lethal_radius() {
        let field = star(Falloff::InverseSquare);
        assert!(field.is_lethal(DVec2::new(1150.0, 1000.0)));
        assert!(!field.is_lethal(DVec2::new(1200.0, 1000.0)));
        assert!(!field.is_lethal(DVec2::new(1500.0, 1000.0)));
        assert!((field.distance_to_center(DVec2::new(1300.0, 1400.0)) - 500.0).abs() < 1e-12);
    }

    #[test]
    fn test_circular_speed() {
        let field = star(Falloff::InverseSquare);
        let v = field.circular_speed(400.0);
        assert!((v - (30_000.0_f64 / 400.0).sqrt()).abs() < 1e-9);
        assert_eq!(field.circular_speed(900.0), 0.0);
    }
}
