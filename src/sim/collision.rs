//! Collision detection and response between circular bodies
//!
//! Every body is a circle. Overlapping pairs exchange an impulse along the
//! line of centers and are pushed out of overlap in proportion to their
//! masses; pairs already moving apart are left alone. The rocket is fragile
//! unless its shield is up, in which case it acts as a heavy deflector.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::Body;
use crate::consts::{LIGHT_INVERSE_MASS, LIGHT_MASS, NORMAL_EPS};

/// Result of a circle-circle overlap test
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the circles overlap (touching counts)
    pub hit: bool,
    /// Unit normal from the first circle toward the second
    pub normal: DVec2,
    /// Overlap depth along the normal
    pub penetration: f64,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: DVec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Tunables for pair resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionParams {
    /// 1.0 = perfectly elastic
    pub restitution: f64,
    /// Rocket mass while the shield is up
    pub shield_mass: f64,
    /// Rocket collision radius while the shield is up
    pub shield_radius: f64,
    /// Inverse mass substituted for light-like (zero-mass) bodies
    pub light_inverse_mass: f64,
}

impl Default for CollisionParams {
    fn default() -> Self {
        Self {
            restitution: 1.0,
            shield_mass: 100.0,
            shield_radius: 80.0,
            light_inverse_mass: LIGHT_INVERSE_MASS,
        }
    }
}

/// Outcome of resolving one pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairOutcome {
    /// No overlap
    Apart,
    /// Overlapping but separating or grazing (vn >= 0), nothing changed
    Separating,
    /// Impulse applied
    Bounced { a: Body, b: Body },
    /// An unshielded rocket was hit
    Fatal,
}

/// Check overlap of two circles: |b - a|² <= (ra + rb)²
pub fn circle_contact(a_pos: DVec2, a_radius: f64, b_pos: DVec2, b_radius: f64) -> CollisionResult {
    let delta = b_pos - a_pos;
    let reach = a_radius + b_radius;
    let dist_sq = delta.length_squared();
    if dist_sq > reach * reach {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    // Coincident centers get a fixed normal
    let normal = if dist > NORMAL_EPS { delta / dist } else { DVec2::X };
    CollisionResult {
        hit: true,
        normal,
        penetration: reach - dist,
    }
}

/// Whether a pair takes part in collision testing at all
///
/// Bullets pass through each other and bombs are carried inertly until they
/// detonate.
pub fn pair_collides(a: &Body, b: &Body) -> bool {
    !(a.is_bullet() && b.is_bullet()) && !a.is_bomb() && !b.is_bomb()
}

/// Radius used for contact tests (shield radius for a shielded rocket)
#[inline]
pub fn contact_radius(body: &Body, params: &CollisionParams) -> f64 {
    if body.shield_active() {
        params.shield_radius.max(body.radius)
    } else {
        body.radius
    }
}

/// Inverse mass used in the impulse, clamped for light-like bodies
#[inline]
pub fn inverse_mass(body: &Body, params: &CollisionParams) -> f64 {
    let mass = if body.shield_active() {
        params.shield_mass
    } else {
        body.mass
    };
    if mass > LIGHT_MASS {
        1.0 / mass
    } else {
        params.light_inverse_mass
    }
}

/// Resolve a possible collision between `a` and `b`
pub fn resolve_pair(a: &Body, b: &Body, params: &CollisionParams) -> PairOutcome {
    let contact = circle_contact(
        a.pos,
        contact_radius(a, params),
        b.pos,
        contact_radius(b, params),
    );
    if !contact.hit {
        return PairOutcome::Apart;
    }

    if (a.is_rocket() && !a.shield_active()) || (b.is_rocket() && !b.shield_active()) {
        return PairOutcome::Fatal;
    }

    let n = contact.normal;
    let vn = (b.vel - a.vel).dot(n);
    if vn >= 0.0 {
        return PairOutcome::Separating;
    }

    let inv_a = inverse_mass(a, params);
    let inv_b = inverse_mass(b, params);
    let j = -(1.0 + params.restitution) * vn / (inv_a + inv_b);
    let impulse = n * j;

    // Lighter body takes more of the push-out
    let push = n * (contact.penetration / (inv_a + inv_b));

    let mut a = *a;
    let mut b = *b;
    a.vel -= impulse * inv_a;
    b.vel += impulse * inv_b;
    a.pos -= push * inv_a;
    b.pos += push * inv_b;
    PairOutcome::Bounced { a, b }
}
