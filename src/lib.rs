//! Orbit Arcade - physics core for a top-down orbital arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (metric field, geodesic and Newtonian
//!   integration, collisions, accretion, tick pipeline)
//! - `level`: Per-level configuration and presets
//! - `error`: Configuration loading errors
//!
//! Rendering, input polling and level generation live outside this crate;
//! the renderer reads body positions, radii and color tags from [`sim::World`].

pub mod error;
pub mod level;
pub mod sim;

pub use error::LevelError;
pub use level::{Boundary, Falloff, LevelConfig, LevelKind};

use glam::DVec2;

/// Simulation constants shared by every level
pub mod consts {
    /// Base coordinate step of the geodesic integrator
    pub const BASE_DT: f64 = 0.01;
    /// Fixed wall-clock tick (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;

    /// Shared step for every metric finite difference
    pub const METRIC_EPS: f64 = 1e-4;
    /// Keeps the metric factor finite as r approaches the horizon from outside
    pub const HORIZON_EPS: f64 = 1e-9;
    /// Diagonal of the spatial metric inside the horizon
    pub const HORIZON_STRETCH: f64 = 999_999.0;
    /// Width of the shell outside the horizon where g_tt is pinned
    pub const HORIZON_BAND: f64 = 1.0;
    /// g_tt used within [`HORIZON_BAND`] of the horizon
    pub const INTERIOR_G_TT: f64 = -1e-9;
    /// Floor under -g_tt before the square root
    pub const TIME_DILATION_FLOOR: f64 = 1e-12;

    /// Below this distance Newtonian gravity is switched off
    pub const NEWTON_MIN_DISTANCE: f64 = 1e-3;

    /// Masses at or below this are light-like
    pub const LIGHT_MASS: f64 = 1e-12;
    /// Inverse mass used for light-like bodies
    pub const LIGHT_INVERSE_MASS: f64 = 1e6;
    /// Center separations below this use a fixed collision normal
    pub const NORMAL_EPS: f64 = 1e-10;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

/// Wrap a coordinate into `[0, extent)`, including negative inputs
#[inline]
pub fn wrap_coordinate(value: f64, extent: f64) -> f64 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// Unit vector for a heading in radians
#[inline]
pub fn heading_vector(heading: f64) -> DVec2 {
    DVec2::new(heading.cos(), heading.sin())
}

/// Scale `vel` down so its length does not exceed `cap`
#[inline]
pub fn limit_speed(vel: DVec2, cap: f64) -> DVec2 {
    let speed = vel.length();
    if speed > cap && speed > 0.0 {
        vel * (cap / speed)
    } else {
        vel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_coordinate_negative() {
        assert!((wrap_coordinate(-10.0, 100.0) - 90.0).abs() < 1e-12);
        assert!((wrap_coordinate(250.0, 100.0) - 50.0).abs() < 1e-12);
        assert_eq!(wrap_coordinate(100.0, 100.0), 0.0);
        assert_eq!(wrap_coordinate(-1e-20, 100.0), 0.0);
    }

    #[test]
    fn test_limit_speed() {
        let v = limit_speed(DVec2::new(300.0, 400.0), 100.0);
        assert!((v.length() - 100.0).abs() < 1e-9);
        assert!((v.x - 60.0).abs() < 1e-9);

        let slow = DVec2::new(1.0, 2.0);
        assert_eq!(limit_speed(slow, 100.0), slow);
        assert_eq!(limit_speed(DVec2::ZERO, 0.0), DVec2::ZERO);
    }

    #[test]
    fn test_normalize_angle() {
        use std::f64::consts::PI;
        assert!((normalize_angle(2.0 * PI + 0.25) - 0.25).abs() < 1e-9);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-12);
        assert!((normalize_angle(-0.5 - 2.0 * PI) - (-0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_heading_vector() {
        let v = heading_vector(std::f64::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-12);
        assert!((v.y - 1.0).abs() < 1e-12);
    }
}
