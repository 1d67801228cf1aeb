//! World state and core simulation types
//!
//! Everything needed to continue a run deterministically lives here.

use glam::DVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CollisionParams;
use super::field::ForceField;
use super::integrate::MotionLimits;
use crate::level::LevelConfig;
use crate::limit_speed;

/// Bullet collision radius
pub const BULLET_RADIUS: f64 = 1.0;
/// Bomb collision radius
pub const BOMB_RADIUS: f64 = 10.0;
/// Bomb mass
pub const BOMB_MASS: f64 = 1.0;
/// Orbital speed scale used when placing the rocket near the black hole
pub const HORIZON_ORBIT_SCALE: f64 = 30.0;

/// Default render colors (0xRRGGBB)
pub mod colors {
    pub const ROCKET: u32 = 0xff0000;
    pub const BULLET: u32 = 0xffff64;
    pub const FRAGMENT: u32 = 0xffa500;
    pub const ASTEROID: u32 = 0x9a9a9a;
    pub const BOMB: u32 = 0xff4040;
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Rocket lost, waiting for restart
    GameOver,
}

/// Per-variant state of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyKind {
    /// The player ship
    Rocket {
        /// Heading in radians
        heading: f64,
        /// Angular velocity in radians/sec
        angular_vel: f64,
        /// Protective shield (deflects instead of dying)
        shield: bool,
    },
    /// Projectile with a remaining lifetime in seconds
    Bullet { ttl: f64 },
    Asteroid,
    /// Bomb with seconds left before it bursts into fragments
    Bomb { fuse: f64 },
}

/// A circular body in the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    /// Zero marks a light-like projectile
    pub mass: f64,
    /// Render color tag (0xRRGGBB), opaque to the simulation
    pub color: u32,
    pub kind: BodyKind,
}

impl Body {
    pub fn rocket(id: u32, pos: DVec2, vel: DVec2, heading: f64, radius: f64, mass: f64) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            mass,
            color: colors::ROCKET,
            kind: BodyKind::Rocket {
                heading,
                angular_vel: 0.0,
                shield: false,
            },
        }
    }

    pub fn bullet(id: u32, pos: DVec2, vel: DVec2, mass: f64, ttl: f64) -> Self {
        Self {
            id,
            pos,
            vel,
            radius: BULLET_RADIUS,
            mass,
            color: colors::BULLET,
            kind: BodyKind::Bullet { ttl },
        }
    }

    pub fn asteroid(id: u32, pos: DVec2, vel: DVec2, radius: f64, mass: f64) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            mass,
            color: colors::ASTEROID,
            kind: BodyKind::Asteroid,
        }
    }

    pub fn bomb(id: u32, pos: DVec2, vel: DVec2, fuse: f64) -> Self {
        Self {
            id,
            pos,
            vel,
            radius: BOMB_RADIUS,
            mass: BOMB_MASS,
            color: colors::BOMB,
            kind: BodyKind::Bomb { fuse },
        }
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn is_rocket(&self) -> bool {
        matches!(self.kind, BodyKind::Rocket { .. })
    }

    #[inline]
    pub fn is_bullet(&self) -> bool {
        matches!(self.kind, BodyKind::Bullet { .. })
    }

    #[inline]
    pub fn is_bomb(&self) -> bool {
        matches!(self.kind, BodyKind::Bomb { .. })
    }

    /// True for a rocket whose shield is up
    #[inline]
    pub fn shield_active(&self) -> bool {
        matches!(self.kind, BodyKind::Rocket { shield: true, .. })
    }

    /// Heading for rockets
    pub fn heading(&self) -> Option<f64> {
        match self.kind {
            BodyKind::Rocket { heading, .. } => Some(heading),
            _ => None,
        }
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.vel.length()
    }

    #[inline]
    pub fn momentum(&self) -> DVec2 {
        self.vel * self.mass
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vel.length_squared()
    }
}

/// The level's single point of attraction
///
/// The radius is the event horizon on black-hole levels (it only grows) and
/// the fixed surface radius elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravitatingCenter {
    pub pos: DVec2,
    pub radius: f64,
}

impl GravitatingCenter {
    pub fn new(pos: DVec2, radius: f64) -> Self {
        Self { pos, radius }
    }

    #[inline]
    pub fn distance_to(&self, p: DVec2) -> f64 {
        (p - self.pos).length()
    }

    /// Strictly inside the radius
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        self.distance_to(p) < self.radius
    }
}

/// What the fire command does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tool {
    /// Single bullet from the nose
    #[default]
    Gun,
    /// Ring of bullets in every direction
    Burst,
    /// Drop a timed bomb
    Bomb,
    /// Toggle the shield
    Shield,
}

impl Tool {
    const ALL: [Tool; 4] = [Tool::Gun, Tool::Burst, Tool::Bomb, Tool::Shield];

    fn index(self) -> usize {
        Self::ALL.iter().position(|&t| t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Why the rocket was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    /// Unshielded contact with another body
    Collision { with: u32 },
    /// Touched a star's lethal surface
    Lethal,
    /// Crossed the event horizon
    Horizon,
}

/// Notable things that happened during a tick, for audio/visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Fired { tool: Tool },
    ShieldToggled { on: bool },
    BombDetonated { id: u32, pos: DVec2 },
    /// Swallowed by the black hole, which grew to `horizon_radius`
    Consumed { id: u32, horizon_radius: f64 },
    /// Destroyed by a lethal surface
    Destroyed { id: u32 },
    LeftWorld { id: u32 },
    Expired { id: u32 },
    RocketLost { cause: LossCause },
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }

    /// Move to a fresh stream so the next draw differs
    pub fn advance(&mut self) {
        self.stream = self.stream.wrapping_add(1);
    }
}

/// Complete world state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub config: LevelConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub center: GravitatingCenter,
    pub rocket: Body,
    /// Selected fire tool
    pub tool: Tool,
    /// Every non-rocket body (sorted by id for determinism)
    pub bodies: Vec<Body>,
    /// Bodies registered by level setup, restored on reset
    initial_bodies: Vec<Body>,
    /// Next entity ID
    next_id: u32,
}

impl World {
    /// Create a world for `config` with the rocket placed from `seed`
    pub fn new(config: LevelConfig, seed: u64) -> Self {
        let center = GravitatingCenter::new(config.center, config.center_radius);
        let rocket = Body::rocket(
            1,
            config.center,
            DVec2::ZERO,
            -std::f64::consts::FRAC_PI_2,
            config.rocket.radius,
            config.rocket.mass,
        );
        let mut world = Self {
            config,
            seed,
            rng_state: RngState::new(seed),
            time_ticks: 0,
            phase: GamePhase::Playing,
            center,
            rocket,
            tool: Tool::default(),
            bodies: Vec::new(),
            initial_bodies: Vec::new(),
            next_id: 2,
        };
        world.place_rocket();
        log::info!(
            "World created: {} level, seed {}",
            world.config.kind.as_str(),
            seed
        );
        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Register a level body (asteroid etc.); it is restored on every reset
    pub fn spawn(&mut self, mut body: Body) -> u32 {
        body.id = self.next_entity_id();
        self.initial_bodies.push(body);
        self.bodies.push(body);
        body.id
    }

    /// Add a short-lived body (bullets, bombs, fragments)
    pub fn spawn_projectile(&mut self, mut body: Body) -> u32 {
        body.id = self.next_entity_id();
        self.bodies.push(body);
        body.id
    }

    /// Restore the level to its starting state with a fresh rocket placement
    pub fn reset(&mut self) {
        self.center = GravitatingCenter::new(self.config.center, self.config.center_radius);
        self.bodies = self.initial_bodies.clone();
        self.tool = Tool::default();
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
        self.place_rocket();
        log::info!("World reset (stream {})", self.rng_state.stream);
    }

    /// Force field for the current center
    pub fn force_field(&self) -> ForceField {
        self.config.force_field(self.center)
    }

    pub fn limits(&self) -> MotionLimits {
        self.config.motion_limits()
    }

    pub fn collision_params(&self) -> CollisionParams {
        self.config.collision_params()
    }

    /// Ensure bodies are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.bodies.sort_by_key(|b| b.id);
    }

    /// Rocket followed by every other body, for the renderer
    pub fn render_bodies(&self) -> impl Iterator<Item = &Body> {
        std::iter::once(&self.rocket).chain(self.bodies.iter())
    }

    /// Place the rocket on a seeded orbit (or at rest on flat levels)
    fn place_rocket(&mut self) {
        let mut rng = self.rng_state.to_rng();
        self.rng_state.advance();

        let cfg = &self.config;
        let world_center = DVec2::new(cfg.width / 2.0, cfg.height / 2.0);
        let (pos, vel) = match self.force_field() {
            ForceField::None => (world_center, DVec2::ZERO),
            ForceField::Geodesic { center, .. } => {
                let lo = (cfg.width / 4.0).max(center.radius + 4.0 * cfg.rocket.radius);
                let hi = (cfg.width / 2.0).max(lo + 1.0);
                let r = rng.random_range(lo..hi);
                let speed = (center.radius / r).sqrt() * HORIZON_ORBIT_SCALE;
                (center.pos + DVec2::new(r, 0.0), DVec2::new(0.0, -speed))
            }
            ForceField::NewtonianPoint(field) => {
                let lo = field.lethal_radius * 1.5 + cfg.rocket.radius;
                let hi = field.gravity_range.max(lo + 1.0);
                let r = rng.random_range(lo..hi);
                let speed = field.circular_speed(r);
                (field.center + DVec2::new(r, 0.0), DVec2::new(0.0, -speed))
            }
        };
        let vel = limit_speed(vel, cfg.speed_cap);

        let heading = if vel.length_squared() > 0.0 {
            vel.y.atan2(vel.x)
        } else {
            -std::f64::consts::FRAC_PI_2
        };
        let mut rocket = Body::rocket(
            self.rocket.id,
            pos,
            vel,
            heading,
            cfg.rocket.radius,
            cfg.rocket.mass,
        );
        rocket.color = self.rocket.color;
        self.rocket = rocket;
    }
}
