//! Deterministic simulation module
//!
//! All gameplay physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod field;
pub mod geodesic;
pub mod growth;
pub mod integrate;
pub mod metric;
pub mod newtonian;
pub mod state;
pub mod tick;

pub use collision::{CollisionParams, PairOutcome, resolve_pair};
pub use field::ForceField;
pub use geodesic::{GeodesicParams, GeodesicStep};
pub use growth::{accrete, crosses_horizon, grow_on_consumption, swallow};
pub use integrate::{MotionLimits, Stepped, WorldBounds, step_body};
pub use metric::MetricSample;
pub use newtonian::NewtonianField;
pub use state::{
    Body, BodyKind, GameEvent, GamePhase, GravitatingCenter, LossCause, Tool, World,
};
pub use tick::{TickInput, tick};
