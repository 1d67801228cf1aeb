//! Per-level configuration
//!
//! Every value the simulation reads about a level lives in [`LevelConfig`],
//! built from a preset or loaded from JSON. Nothing here is global.

use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BASE_DT, LIGHT_INVERSE_MASS};
use crate::error::LevelError;
use crate::sim::collision::CollisionParams;
use crate::sim::field::ForceField;
use crate::sim::geodesic::GeodesicParams;
use crate::sim::integrate::{MotionLimits, WorldBounds};
use crate::sim::newtonian::NewtonianField;
use crate::sim::state::GravitatingCenter;

/// Level presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LevelKind {
    /// Empty space, no attractor
    #[default]
    Flat,
    /// Newtonian star with a lethal surface
    Star,
    /// Growing black hole in curved space
    BlackHole,
}

impl LevelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelKind::Flat => "Flat",
            LevelKind::Star => "Star",
            LevelKind::BlackHole => "BlackHole",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "flat" | "space" => Some(LevelKind::Flat),
            "star" | "sun" => Some(LevelKind::Star),
            "blackhole" | "black-hole" | "black_hole" | "bh" => Some(LevelKind::BlackHole),
            _ => None,
        }
    }
}

/// What happens at the world edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Boundary {
    /// Periodic wrap on both axes
    #[default]
    Wrap,
    /// Bodies leaving `[0, W] x [0, H]` are removed
    Kill,
}

/// Exponent of the Newtonian force law
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Falloff {
    /// a = GM / r²
    #[default]
    InverseSquare,
    /// a = GM / r
    InverseLinear,
}

/// Which force model the level runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GravityModel {
    #[default]
    None,
    Newtonian,
    Geodesic,
}

/// Rocket handling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RocketConfig {
    pub radius: f64,
    pub mass: f64,
    /// Linear acceleration from the main engine
    pub thrust: f64,
    /// Angular acceleration in radians/sec²
    pub torque: f64,
    /// Fraction of angular velocity bled off per second while damping
    pub spin_damping: f64,
    /// Collision radius while the shield is up
    pub shield_radius: f64,
    /// Collision mass while the shield is up
    pub shield_mass: f64,
}

impl Default for RocketConfig {
    fn default() -> Self {
        Self {
            radius: 20.0,
            mass: 10.0,
            thrust: 100.0,
            torque: 50f64.to_radians(),
            spin_damping: 2.5,
            shield_radius: 80.0,
            shield_mass: 100.0,
        }
    }
}

/// Projectile tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeaponConfig {
    /// Muzzle speed relative to the rocket, at most the level speed cap
    pub bullet_speed: f64,
    /// Zero makes bullets light-like
    pub bullet_mass: f64,
    /// Bullet lifetime in seconds
    pub bullet_ttl: f64,
    /// Velocity kick applied to the rocket per gun shot
    pub recoil: f64,
    /// Bullets in one burst ring
    pub burst_count: u32,
    /// Seconds from drop to detonation
    pub bomb_fuse: f64,
    pub fragment_count: u32,
    /// Fragment speed relative to the bomb, at most the level speed cap
    pub fragment_speed: f64,
    pub fragment_mass: f64,
    pub fragment_ttl: f64,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            bullet_speed: 300.0,
            bullet_mass: 0.0,
            bullet_ttl: 4.0,
            recoil: 10.0,
            burst_count: 100,
            bomb_fuse: 3.0,
            fragment_count: 100,
            fragment_speed: 250.0,
            fragment_mass: 0.1,
            fragment_ttl: 5.0,
        }
    }
}

/// Complete description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LevelConfig {
    pub kind: LevelKind,
    pub width: f64,
    pub height: f64,
    pub boundary: Boundary,
    pub gravity: GravityModel,

    // === Gravitating center ===
    pub center: DVec2,
    /// Initial horizon radius (black hole) or surface radius (star)
    pub center_radius: f64,
    /// Gravitational strength G·M for Newtonian levels
    pub gm: f64,
    /// Newtonian pull is zero at or beyond this distance
    pub gravity_range: f64,
    /// Newtonian lethal surface
    pub lethal_radius: f64,
    pub falloff: Falloff,
    /// Horizon growth per unit of swallowed mass
    pub growth_coefficient: f64,

    // === Motion ===
    pub speed_cap: f64,
    /// 1.0 = perfectly elastic
    pub restitution: f64,
    /// Geodesic coordinate step before time dilation
    pub base_dt: f64,
    /// Scale of the static geodesic pull
    pub light_speed: f64,

    pub rocket: RocketConfig,
    pub weapons: WeaponConfig,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::flat()
    }
}

impl LevelConfig {
    pub fn preset(kind: LevelKind) -> Self {
        match kind {
            LevelKind::Flat => Self::flat(),
            LevelKind::Star => Self::star(),
            LevelKind::BlackHole => Self::black_hole(),
        }
    }

    /// Open space with no attractor
    pub fn flat() -> Self {
        Self {
            kind: LevelKind::Flat,
            width: 2000.0,
            height: 2000.0,
            boundary: Boundary::Wrap,
            gravity: GravityModel::None,
            center: DVec2::new(1000.0, 1000.0),
            center_radius: 0.0,
            gm: 0.0,
            gravity_range: 0.0,
            lethal_radius: 0.0,
            falloff: Falloff::InverseSquare,
            growth_coefficient: 0.0,
            speed_cap: 300.0,
            restitution: 1.0,
            base_dt: BASE_DT,
            light_speed: 0.0,
            rocket: RocketConfig::default(),
            weapons: WeaponConfig::default(),
        }
    }

    /// Wrapping world around a Newtonian star
    pub fn star() -> Self {
        Self {
            kind: LevelKind::Star,
            width: 4000.0,
            height: 4000.0,
            boundary: Boundary::Wrap,
            gravity: GravityModel::Newtonian,
            center: DVec2::new(2000.0, 2000.0),
            center_radius: 200.0,
            gm: 30_000.0,
            gravity_range: 800.0,
            lethal_radius: 200.0,
            ..Self::flat()
        }
    }

    /// Bounded world around a growing black hole
    pub fn black_hole() -> Self {
        Self {
            kind: LevelKind::BlackHole,
            width: 1800.0,
            height: 1000.0,
            boundary: Boundary::Kill,
            gravity: GravityModel::Geodesic,
            center: DVec2::new(900.0, 500.0),
            center_radius: 100.0,
            growth_coefficient: 0.05,
            light_speed: 300.0,
            rocket: RocketConfig {
                radius: 10.0,
                thrust: 20.0,
                ..RocketConfig::default()
            },
            ..Self::flat()
        }
    }

    /// Parse and validate a level from JSON
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a level file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded {} level from {}", config.kind.as_str(), path.display());
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), LevelError> {
        fn check(ok: bool, msg: &str) -> Result<(), LevelError> {
            if ok {
                Ok(())
            } else {
                Err(LevelError::Invalid(msg.to_string()))
            }
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;

        check(positive(self.width) && positive(self.height), "world size must be positive")?;
        check(self.center.is_finite(), "center must be finite")?;
        check(non_negative(self.center_radius), "center_radius must be >= 0")?;
        check(non_negative(self.gm), "gm must be >= 0")?;
        check(non_negative(self.gravity_range), "gravity_range must be >= 0")?;
        check(non_negative(self.lethal_radius), "lethal_radius must be >= 0")?;
        check(non_negative(self.growth_coefficient), "growth_coefficient must be >= 0")?;
        check(positive(self.speed_cap), "speed_cap must be positive")?;
        check(
            (0.0..=1.0).contains(&self.restitution),
            "restitution must be in [0, 1]",
        )?;
        check(positive(self.base_dt), "base_dt must be positive")?;
        check(non_negative(self.light_speed), "light_speed must be >= 0")?;

        let r = &self.rocket;
        check(positive(r.radius), "rocket radius must be positive")?;
        check(positive(r.mass), "rocket mass must be positive")?;
        check(positive(r.shield_mass), "shield_mass must be positive")?;
        check(non_negative(r.shield_radius), "shield_radius must be >= 0")?;
        check(
            non_negative(r.thrust) && non_negative(r.torque) && non_negative(r.spin_damping),
            "rocket handling values must be >= 0",
        )?;

        let w = &self.weapons;
        check(
            non_negative(w.bullet_speed) && non_negative(w.fragment_speed),
            "projectile speeds must be >= 0",
        )?;
        check(
            w.bullet_speed <= self.speed_cap && w.fragment_speed <= self.speed_cap,
            "projectile speeds must not exceed speed_cap",
        )?;
        check(
            non_negative(w.bullet_mass) && non_negative(w.fragment_mass),
            "projectile masses must be >= 0",
        )?;
        check(
            non_negative(w.bullet_ttl) && non_negative(w.fragment_ttl) && non_negative(w.bomb_fuse),
            "projectile timers must be >= 0",
        )?;
        check(non_negative(w.recoil), "recoil must be >= 0")?;
        Ok(())
    }

    /// Force field around `center` (the live center, which may have grown)
    pub fn force_field(&self, center: GravitatingCenter) -> ForceField {
        match self.gravity {
            GravityModel::None => ForceField::None,
            GravityModel::Newtonian => ForceField::NewtonianPoint(NewtonianField {
                center: center.pos,
                gm: self.gm,
                gravity_range: self.gravity_range,
                lethal_radius: self.lethal_radius,
                falloff: self.falloff,
            }),
            GravityModel::Geodesic => ForceField::Geodesic {
                center,
                params: self.geodesic_params(),
            },
        }
    }

    pub fn bounds(&self) -> WorldBounds {
        WorldBounds {
            width: self.width,
            height: self.height,
            boundary: self.boundary,
        }
    }

    pub fn motion_limits(&self) -> MotionLimits {
        MotionLimits {
            bounds: self.bounds(),
            speed_cap: self.speed_cap,
        }
    }

    pub fn collision_params(&self) -> CollisionParams {
        CollisionParams {
            restitution: self.restitution,
            shield_mass: self.rocket.shield_mass,
            shield_radius: self.rocket.shield_radius,
            light_inverse_mass: LIGHT_INVERSE_MASS,
        }
    }

    pub fn geodesic_params(&self) -> GeodesicParams {
        GeodesicParams {
            base_dt: self.base_dt,
            light_speed: self.light_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_kind_parse() {
        assert_eq!(LevelKind::from_str("Star"), Some(LevelKind::Star));
        assert_eq!(LevelKind::from_str("black-hole"), Some(LevelKind::BlackHole));
        assert_eq!(LevelKind::from_str("FLAT"), Some(LevelKind::Flat));
        assert_eq!(LevelKind::from_str("nebula"), None);
        for kind in [LevelKind::Flat, LevelKind::Star, LevelKind::BlackHole] {
            assert_eq!(LevelKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_presets_are_valid() {
        for kind in [LevelKind::Flat, LevelKind::Star, LevelKind::BlackHole] {
            let config = LevelConfig::preset(kind);
            assert_eq!(config.kind, kind);
            assert!(config.validate().is_ok(), "{} preset invalid", kind.as_str());
        }
    }

    #[test]
    fn test_preset_force_fields() {
        let flat = LevelConfig::flat();
        let center = GravitatingCenter::new(flat.center, flat.center_radius);
        assert_eq!(flat.force_field(center), ForceField::None);

        let star = LevelConfig::star();
        let center = GravitatingCenter::new(star.center, star.center_radius);
        match star.force_field(center) {
            ForceField::NewtonianPoint(field) => {
                assert_eq!(field.gm, 30_000.0);
                assert_eq!(field.gravity_range, 800.0);
                assert_eq!(field.lethal_radius, 200.0);
                assert_eq!(field.falloff, Falloff::InverseSquare);
            }
            other => panic!("expected Newtonian field, got {other:?}"),
        }

        let bh = LevelConfig::black_hole();
        let grown = GravitatingCenter::new(bh.center, 150.0);
        match bh.force_field(grown) {
            ForceField::Geodesic { center, params } => {
                assert_eq!(center.radius, 150.0);
                assert_eq!(params.base_dt, BASE_DT);
                assert_eq!(params.light_speed, 300.0);
            }
            other => panic!("expected geodesic field, got {other:?}"),
        }
        assert_eq!(bh.boundary, Boundary::Kill);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = LevelConfig::black_hole();
        let json = config.to_json().unwrap();
        let loaded = LevelConfig::from_json(&json).unwrap();
        assert_eq!(loaded.kind, config.kind);
        assert_eq!(loaded.boundary, Boundary::Kill);
        assert_eq!(loaded.gravity, GravityModel::Geodesic);
        assert_eq!(loaded.center, config.center);
        assert_eq!(loaded.center_radius, config.center_radius);
        assert_eq!(loaded.weapons.burst_count, config.weapons.burst_count);
        assert!((loaded.rocket.torque - config.rocket.torque).abs() < 1e-12);
        assert!((loaded.growth_coefficient - config.growth_coefficient).abs() < 1e-15);
    }

    #[test]
    fn test_json_missing_fields_use_defaults() {
        let config = LevelConfig::from_json(r#"{ "width": 800.0, "restitution": 0.5 }"#).unwrap();
        assert_eq!(config.width, 800.0);
        assert_eq!(config.restitution, 0.5);
        assert_eq!(config.height, LevelConfig::flat().height);
        assert_eq!(config.rocket, RocketConfig::default());
    }

    #[test]
    fn test_json_rejects_unknown_fields() {
        let err = LevelConfig::from_json(r#"{ "gravity_strength": 5.0 }"#).unwrap_err();
        assert!(matches!(err, LevelError::Parse(_)));
    }

    #[test]
    fn test_validation_errors() {
        let err = LevelConfig::from_json(r#"{ "restitution": 1.5 }"#).unwrap_err();
        assert!(matches!(err, LevelError::Invalid(_)));
        assert!(err.to_string().contains("restitution"));

        let mut config = LevelConfig::star();
        config.rocket.mass = 0.0;
        assert!(config.validate().is_err());

        let mut config = LevelConfig::flat();
        config.width = -1.0;
        assert!(config.validate().is_err());

        let mut config = LevelConfig::black_hole();
        config.center_radius = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_projectiles_cannot_outrun_speed_cap() {
        let err = LevelConfig::from_json(r#"{ "weapons": { "fragment_speed": 500.0 } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("speed_cap"));

        let err = LevelConfig::from_json(r#"{ "speed_cap": 200.0 }"#).unwrap_err();
        assert!(matches!(err, LevelError::Invalid(_)));

        let config = LevelConfig::from_json(
            r#"{ "speed_cap": 600.0, "weapons": { "fragment_speed": 500.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.weapons.fragment_speed, 500.0);
    }

    #[test]
    fn test_black_hole_rocket_handling() {
        let config = LevelConfig::black_hole();
        assert_eq!(config.rocket.radius, 10.0);
        assert_eq!(config.rocket.thrust, 20.0);
        assert_eq!(config.rocket.spin_damping, 2.5);
        assert_eq!(LevelConfig::flat().rocket.thrust, 100.0);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = LevelConfig::load("/nonexistent/orbit-arcade/level.json").unwrap_err();
        assert!(matches!(err, LevelError::Io(_)));
    }

    #[test]
    fn test_collision_params_follow_rocket_config() {
        let mut config = LevelConfig::flat();
        config.rocket.shield_mass = 500.0;
        config.restitution = 0.8;
        let params = config.collision_params();
        assert_eq!(params.shield_mass, 500.0);
        assert_eq!(params.restitution, 0.8);
        assert_eq!(params.shield_radius, config.rocket.shield_radius);
    }
}
