//! Geodesic integrator for bodies near the black hole
//!
//! Bodies follow a = -Γ^i_jk v^j v^k - Γ^i_tt c², with the connection built
//! from finite differences of [`metric`](super::metric). The coordinate step
//! is BASE_DT / τ, where τ is the local time dilation, and the state is
//! advanced with the explicit midpoint method.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::metric::{entry, inverse_metric, metric_stencil, time_dilation};
use super::state::GravitatingCenter;
use crate::consts::BASE_DT;

/// Tunables for the geodesic integrator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodesicParams {
    /// Coordinate step before time-dilation scaling
    pub base_dt: f64,
    /// Scales the static pull -Γ^i_tt c². Zero leaves only the velocity term.
    pub light_speed: f64,
}

impl Default for GeodesicParams {
    fn default() -> Self {
        Self {
            base_dt: BASE_DT,
            light_speed: 300.0,
        }
    }
}

/// Affine connection at a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Christoffel {
    /// gamma[i][j][k] = Γ^i_jk
    pub gamma: [[[f64; 2]; 2]; 2],
    /// Γ^i_tt for the static temporal component
    pub temporal: DVec2,
}

impl Christoffel {
    /// -Γ^i_jk v^j v^k - Γ^i_tt c²
    pub fn acceleration(&self, vel: DVec2, light_speed: f64) -> DVec2 {
        let v = [vel.x, vel.y];
        let mut a = [0.0; 2];
        for (i, a_i) in a.iter_mut().enumerate() {
            let mut sum = 0.0;
            for (j, v_j) in v.iter().enumerate() {
                for (k, v_k) in v.iter().enumerate() {
                    sum += self.gamma[i][j][k] * v_j * v_k;
                }
            }
            *a_i = -sum;
        }
        DVec2::new(a[0], a[1]) - self.temporal * (light_speed * light_speed)
    }
}

/// Result of one geodesic step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodesicStep {
    pub pos: DVec2,
    pub vel: DVec2,
    /// Coordinate step actually applied (base_dt / time_dilation)
    pub h: f64,
    /// Time dilation at the starting position
    pub time_dilation: f64,
}

/// Γ^i_jk = ½ g^im (∂_j g_mk + ∂_k g_mj - ∂_m g_jk), Γ^i_tt = -½ g^im ∂_m g_tt
pub fn christoffel(center: &GravitatingCenter, p: DVec2) -> Christoffel {
    let stencil = metric_stencil(center, p);
    let inv = inverse_metric(stencil.center.g);
    let dg = |axis: usize, row: usize, col: usize| entry(stencil.partial(axis), row, col);

    let mut gamma = [[[0.0; 2]; 2]; 2];
    for (i, gamma_i) in gamma.iter_mut().enumerate() {
        for (j, gamma_ij) in gamma_i.iter_mut().enumerate() {
            for (k, gamma_ijk) in gamma_ij.iter_mut().enumerate() {
                let mut val = 0.0;
                for m in 0..2 {
                    val += entry(&inv, i, m) * (dg(j, m, k) + dg(k, m, j) - dg(m, j, k));
                }
                *gamma_ijk = 0.5 * val;
            }
        }
    }

    let grad = [stencil.grad_g_tt.x, stencil.grad_g_tt.y];
    let mut temporal = [0.0; 2];
    for (i, t) in temporal.iter_mut().enumerate() {
        *t = -0.5 * (0..2).map(|m| entry(&inv, i, m) * grad[m]).sum::<f64>();
    }

    Christoffel {
        gamma,
        temporal: DVec2::new(temporal[0], temporal[1]),
    }
}

/// Geodesic acceleration for a body at `pos` moving with `vel`
pub fn geodesic_accel(
    center: &GravitatingCenter,
    pos: DVec2,
    vel: DVec2,
    params: &GeodesicParams,
) -> DVec2 {
    christoffel(center, pos).acceleration(vel, params.light_speed)
}

/// Advance one body by a single time-dilated midpoint step
pub fn step(
    center: &GravitatingCenter,
    pos: DVec2,
    vel: DVec2,
    params: &GeodesicParams,
) -> GeodesicStep {
    let tau = time_dilation(center, pos);
    let h = params.base_dt / tau;

    let a1 = geodesic_accel(center, pos, vel, params);
    let pos_mid = pos + vel * (0.5 * h);
    let vel_mid = vel + a1 * (0.5 * h);
    let a2 = geodesic_accel(center, pos_mid, vel_mid, params);

    let new_pos = pos + vel_mid * h;
    let new_vel = vel + a2 * h;

    if !new_pos.is_finite() || !new_vel.is_finite() {
        log::warn!(
            "Non-finite geodesic step at ({:.3}, {:.3}), holding position",
            pos.x,
            pos.y
        );
        return GeodesicStep {
            pos,
            vel: DVec2::ZERO,
            h,
            time_dilation: tau,
        };
    }

    GeodesicStep {
        pos: new_pos,
        vel: new_vel,
        h,
        time_dilation: tau,
    }
}
