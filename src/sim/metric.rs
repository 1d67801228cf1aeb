//! Curved-space metric around a gravitating center
//!
//! A 2D analogy of the Schwarzschild spatial metric. Outside the horizon the
//! radial direction is stretched by r / (r - rs) while tangential distances
//! stay Euclidean. Inside the horizon the metric is capped at a huge diagonal
//! so it stays invertible.

use glam::{DMat2, DVec2};

use super::state::GravitatingCenter;
use crate::consts::*;

/// Determinant below which a metric is treated as singular
const MIN_DETERMINANT: f64 = 1e-12;

/// Metric evaluated at a single point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSample {
    /// Spatial metric g_ij (symmetric)
    pub g: DMat2,
    /// Temporal component g_tt (negative outside the horizon)
    pub g_tt: f64,
    /// Local time-dilation factor, always > 0
    pub time_dilation: f64,
}

/// Spatial metric plus its first derivatives at a point
///
/// Built from five metric evaluations: the point itself and ±[`METRIC_EPS`]
/// along each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricStencil {
    pub center: MetricSample,
    /// ∂g_ij/∂x
    pub d_dx: DMat2,
    /// ∂g_ij/∂y
    pub d_dy: DMat2,
    /// ∇g_tt
    pub grad_g_tt: DVec2,
}

impl MetricStencil {
    /// ∂_axis g for axis 0 (x) or 1 (y)
    #[inline]
    pub fn partial(&self, axis: usize) -> &DMat2 {
        if axis == 0 { &self.d_dx } else { &self.d_dy }
    }
}

/// Evaluate the metric and time dilation at `p`
pub fn metric(center: &GravitatingCenter, p: DVec2) -> MetricSample {
    let g_tt = temporal_component(center, p);
    MetricSample {
        g: spatial_metric(center, p),
        g_tt,
        time_dilation: dilation_from_g_tt(g_tt),
    }
}

/// Spatial metric g = I - factor · (d ⊗ d), d = p - center
pub fn spatial_metric(center: &GravitatingCenter, p: DVec2) -> DMat2 {
    let d = p - center.pos;
    let r = d.length();
    if r <= center.radius {
        return DMat2::from_diagonal(DVec2::splat(HORIZON_STRETCH));
    }

    let factor = center.radius / (r * r * (center.radius - r + HORIZON_EPS));
    let outer = DMat2::from_cols(d * d.x, d * d.y);
    DMat2::IDENTITY - outer * factor
}

/// g_tt = -(1 - rs/r), pinned to a tiny negative value near the horizon
pub fn temporal_component(center: &GravitatingCenter, p: DVec2) -> f64 {
    let r = center.distance_to(p);
    if r <= center.radius + HORIZON_BAND {
        INTERIOR_G_TT
    } else {
        -(1.0 - center.radius / r)
    }
}

/// Time-dilation factor at `p`
pub fn time_dilation(center: &GravitatingCenter, p: DVec2) -> f64 {
    dilation_from_g_tt(temporal_component(center, p))
}

fn dilation_from_g_tt(g_tt: f64) -> f64 {
    if g_tt >= 0.0 {
        1.0
    } else {
        (-g_tt).max(TIME_DILATION_FLOOR).sqrt()
    }
}

/// Central-difference derivatives of the metric at `p`
pub fn metric_stencil(center: &GravitatingCenter, p: DVec2) -> MetricStencil {
    let ex = DVec2::new(METRIC_EPS, 0.0);
    let ey = DVec2::new(0.0, METRIC_EPS);

    let here = metric(center, p);
    let px = metric(center, p + ex);
    let mx = metric(center, p - ex);
    let py = metric(center, p + ey);
    let my = metric(center, p - ey);

    let inv_2eps = 1.0 / (2.0 * METRIC_EPS);
    MetricStencil {
        center: here,
        d_dx: (px.g - mx.g) * inv_2eps,
        d_dy: (py.g - my.g) * inv_2eps,
        grad_g_tt: DVec2::new(px.g_tt - mx.g_tt, py.g_tt - my.g_tt) * inv_2eps,
    }
}

/// Inverse of a spatial metric, falling back to the horizon cap when singular
pub fn inverse_metric(g: DMat2) -> DMat2 {
    let det = g.determinant();
    if det.is_finite() && det.abs() > MIN_DETERMINANT {
        g.inverse()
    } else {
        DMat2::from_diagonal(DVec2::splat(1.0 / HORIZON_STRETCH))
    }
}

/// Row `row`, column `col` of a 2x2 matrix
#[inline]
pub(crate) fn entry(m: &DMat2, row: usize, col: usize) -> f64 {
    m.col(col)[row]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hole(radius: f64) -> GravitatingCenter {
        GravitatingCenter::new(DVec2::ZERO, radius)
    }

    #[test]
    fn test_far_field_is_flat() {
        let center = hole(100.0);
        let sample = metric(&center, DVec2::new(1.0e7, 0.0));
        let diff = sample.g - DMat2::IDENTITY;
        for row in 0..2 {
            for col in 0..2 {
                assert!(entry(&diff, row, col).abs() < 1e-4);
            }
        }
        assert!((sample.time_dilation - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_radial_stretch_outside_horizon() {
        let center = hole(100.0);
        let g = spatial_metric(&center, DVec2::new(150.0, 0.0));
        // g_rr = r / (r - rs) = 3, tangential untouched
        assert!((entry(&g, 0, 0) - 3.0).abs() < 1e-6);
        assert!((entry(&g, 1, 1) - 1.0).abs() < 1e-12);
        assert!(entry(&g, 0, 1).abs() < 1e-12);
    }

    #[test]
    fn test_metric_is_symmetric() {
        let center = GravitatingCenter::new(DVec2::new(900.0, 500.0), 100.0);
        let g = spatial_metric(&center, DVec2::new(1130.0, 377.0));
        assert!((entry(&g, 0, 1) - entry(&g, 1, 0)).abs() < 1e-15);
    }

    #[test]
    fn test_inside_horizon_is_capped() {
        let center = hole(100.0);
        let sample = metric(&center, DVec2::new(30.0, 40.0));
        assert_eq!(entry(&sample.g, 0, 0), HORIZON_STRETCH);
        assert_eq!(entry(&sample.g, 1, 1), HORIZON_STRETCH);
        assert_eq!(entry(&sample.g, 0, 1), 0.0);
        assert!(sample.time_dilation > 0.0);
        assert!(sample.time_dilation < 1e-3);

        let inv = inverse_metric(sample.g);
        assert!((entry(&inv, 0, 0) - 1.0 / HORIZON_STRETCH).abs() < 1e-18);
    }

    #[test]
    fn test_time_dilation_values() {
        let center = hole(100.0);
        let tau = time_dilation(&center, DVec2::new(150.0, 0.0));
        assert!((tau - (1.0_f64 / 3.0).sqrt()).abs() < 1e-12);

        // Within one unit of the horizon the interior constant applies
        let near = time_dilation(&center, DVec2::new(100.5, 0.0));
        assert!((near - INTERIOR_G_TT.abs().sqrt()).abs() < 1e-15);
    }

    #[test]
    fn test_zero_radius_is_flat_everywhere() {
        let center = hole(0.0);
        let sample = metric(&center, DVec2::new(3.0, -4.0));
        assert_eq!(sample.g, DMat2::IDENTITY);
        assert_eq!(sample.time_dilation, 1.0);
    }

    #[test]
    fn test_stencil_derivative_matches_analytic() {
        // g_xx on the x axis is r / (r - rs); d/dr = -rs / (r - rs)^2
        let center = hole(100.0);
        let stencil = metric_stencil(&center, DVec2::new(200.0, 0.0));
        let expected = -100.0 / (100.0_f64 * 100.0);
        assert!((entry(&stencil.d_dx, 0, 0) - expected).abs() < 1e-6);
        assert!(entry(stencil.partial(1), 0, 0).abs() < 1e-6);
        // g_tt = -(1 - rs/r) has derivative -rs/r^2
        assert!((stencil.grad_g_tt.x - (-100.0 / 40_000.0)).abs() < 1e-8);
    }

    #[test]
    fn test_singular_metric_falls_back() {
        let singular = DMat2::from_cols(DVec2::new(1.0, 1.0), DVec2::new(1.0, 1.0));
        let inv = inverse_metric(singular);
        assert!(inv.is_finite());
        assert!(entry(&inv, 0, 1).abs() < 1e-18);
    }
}
