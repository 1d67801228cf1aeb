//! Black hole accretion
//!
//! Bodies that fall strictly inside the horizon are swallowed and the horizon
//! grows by `mass * growth_coefficient`. A single geodesic step next to the
//! horizon can be hundreds of units long, so capture is also tested along the
//! path a body took during its step.

use glam::DVec2;

use super::state::{Body, GravitatingCenter};
use crate::consts::HORIZON_BAND;

/// Whether `body` is inside the center's current radius
#[inline]
pub fn is_consumed(center: &GravitatingCenter, body: &Body) -> bool {
    center.contains(body.pos)
}

/// Whether a step from `from` to `to` falls into the horizon
///
/// True when the segment comes strictly inside the radius, or when the step
/// started in the pinned shell just outside it where time has all but stopped.
pub fn crosses_horizon(center: &GravitatingCenter, from: DVec2, to: DVec2) -> bool {
    if center.distance_to(from) <= center.radius + HORIZON_BAND {
        return true;
    }
    closest_on_segment(center.pos, from, to).distance(center.pos) < center.radius
}

fn closest_on_segment(p: DVec2, from: DVec2, to: DVec2) -> DVec2 {
    let seg = to - from;
    let len_sq = seg.length_squared();
    if len_sq == 0.0 {
        return from;
    }
    let t = ((p - from).dot(seg) / len_sq).clamp(0.0, 1.0);
    from + seg * t
}

/// Center after swallowing `body`
pub fn grow_on_consumption(
    center: &GravitatingCenter,
    body: &Body,
    growth_coefficient: f64,
) -> GravitatingCenter {
    GravitatingCenter {
        radius: center.radius + body.mass * growth_coefficient,
        ..*center
    }
}

/// Grow `center` by `body` and return it with the new radius
pub fn swallow(center: &mut GravitatingCenter, body: Body, growth_coefficient: f64) -> (Body, f64) {
    *center = grow_on_consumption(center, &body, growth_coefficient);
    log::debug!(
        "Body {} consumed, horizon now {:.3}",
        body.id,
        center.radius
    );
    (body, center.radius)
}

/// Split `bodies` into survivors and swallowed bodies, growing `center` as it goes
///
/// Bodies are checked in order against the horizon as it stands at that point,
/// so one swallow can pull in a neighbour right at the edge. Each swallowed
/// body comes back with the horizon radius right after it.
pub fn accrete(
    center: &mut GravitatingCenter,
    bodies: Vec<Body>,
    growth_coefficient: f64,
) -> (Vec<Body>, Vec<(Body, f64)>) {
    let mut kept = Vec::with_capacity(bodies.len());
    let mut consumed = Vec::new();

    for body in bodies {
        if is_consumed(center, &body) {
            consumed.push(swallow(center, body, growth_coefficient));
        } else {
            kept.push(body);
        }
    }

    (kept, consumed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rock(id: u32, x: f64, mass: f64) -> Body {
        Body::asteroid(id, DVec2::new(x, 0.0), DVec2::ZERO, 5.0, mass)
    }

    #[test]
    fn test_growth_is_mass_times_coefficient() {
        let center = GravitatingCenter::new(DVec2::ZERO, 100.0);
        let grown = grow_on_consumption(&center, &rock(1, 10.0, 40.0), 0.05);
        assert!((grown.radius - 102.0).abs() < 1e-12);
        assert_eq!(grown.pos, center.pos);
    }

    #[test]
    fn test_boundary_is_strict() {
        let center = GravitatingCenter::new(DVec2::ZERO, 100.0);
        assert!(!is_consumed(&center, &rock(1, 100.0, 1.0)));
        assert!(is_consumed(&center, &rock(1, 99.999, 1.0)));
    }

    #[test]
    fn test_accrete_removes_consumed_bodies() {
        let mut center = GravitatingCenter::new(DVec2::ZERO, 100.0);
        let bodies = vec![rock(1, 50.0, 10.0), rock(2, 500.0, 10.0), rock(3, 0.0, 20.0)];
        let (kept, consumed) = accrete(&mut center, bodies, 0.05);

        assert_eq!(kept.iter().map(|b| b.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(
            consumed.iter().map(|(b, _)| b.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert!((center.radius - 101.5).abs() < 1e-12);
    }

    #[test]
    fn test_accrete_reports_radius_after_each_body() {
        let mut center = GravitatingCenter::new(DVec2::ZERO, 100.0);
        // Second body sits just outside the initial horizon
        let bodies = vec![rock(1, 10.0, 100.0), rock(2, 102.0, 1.0)];
        let (kept, consumed) = accrete(&mut center, bodies, 0.05);
        assert!(kept.is_empty());
        assert_eq!(consumed.len(), 2);
        assert!((consumed[0].1 - 105.0).abs() < 1e-12);
        assert!((consumed[1].1 - 105.05).abs() < 1e-12);
        assert_eq!(consumed[1].1, center.radius);
    }

    #[test]
    fn test_massless_body_does_not_grow() {
        let mut center = GravitatingCenter::new(DVec2::ZERO, 100.0);
        let bullet = Body::bullet(7, DVec2::new(1.0, 1.0), DVec2::X, 0.0, 4.0);
        let (kept, consumed) = accrete(&mut center, vec![bullet], 0.05);
        assert!(kept.is_empty());
        assert_eq!(consumed.len(), 1);
        assert_eq!(center.radius, 100.0);
    }

    #[test]
    fn test_path_through_horizon_is_captured() {
        let center = GravitatingCenter::new(DVec2::ZERO, 100.0);
        // Both ends outside, segment passes through the hole
        assert!(crosses_horizon(
            &center,
            DVec2::new(-150.0, 10.0),
            DVec2::new(150.0, 10.0)
        ));
        // Passing by at 120
        assert!(!crosses_horizon(
            &center,
            DVec2::new(-150.0, 120.0),
            DVec2::new(150.0, 120.0)
        ));
        // Ending inside
        assert!(crosses_horizon(
            &center,
            DVec2::new(0.0, 130.0),
            DVec2::new(0.0, 90.0)
        ));
    }

    #[test]
    fn test_step_from_pinned_shell_is_captured() {
        let center = GravitatingCenter::new(DVec2::ZERO, 100.0);
        let from = DVec2::new(0.0, 100.7);
        // Flung far outward by the huge dilated step
        assert!(crosses_horizon(&center, from, DVec2::new(0.0, 900.0)));
        assert!(crosses_horizon(&center, DVec2::new(100.5, 0.0), DVec2::new(31.2, -377.2)));
        // Just outside the shell is an ordinary step
        assert!(!crosses_horizon(
            &center,
            DVec2::new(0.0, 101.5),
            DVec2::new(0.0, 105.0)
        ));
    }
}
