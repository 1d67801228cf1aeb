//! Orbit Arcade headless runner
//!
//! Loads a level (preset name or JSON file), scatters a ring of asteroids,
//! and plays a scripted input sequence through the fixed-step simulation.
//!
//! Usage: `orbit-arcade [LEVEL] [TICKS] [SEED]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use orbit_arcade::consts::SIM_DT;
    use orbit_arcade::sim::{GameEvent, GamePhase, TickInput, World, tick};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let level = args.next().unwrap_or_else(|| "blackhole".to_string());
    let ticks = parse_or(args.next(), 1800u64, "tick count");
    let seed = parse_or(args.next(), 42u64, "seed");

    let config = load_level(&level)?;
    log::info!(
        "Orbit Arcade (headless) starting: {} level, {} ticks, seed {}",
        config.kind.as_str(),
        ticks,
        seed
    );

    let mut world = World::new(config, seed);
    spawn_asteroid_ring(&mut world, 12);

    let mut losses = 0u32;
    let mut consumed = 0u32;
    let mut shots = 0u32;
    for t in 0..ticks {
        let input = if world.phase == GamePhase::GameOver {
            TickInput {
                restart: true,
                ..Default::default()
            }
        } else {
            scripted_input(t)
        };

        for event in tick(&mut world, &input, SIM_DT) {
            match event {
                GameEvent::RocketLost { .. } => losses += 1,
                GameEvent::Consumed { .. } => consumed += 1,
                GameEvent::Fired { .. } => shots += 1,
                _ => {}
            }
        }
    }

    log::info!(
        "Finished after {} ticks: {} bodies, center radius {:.2}, phase {:?}",
        world.time_ticks,
        world.bodies.len(),
        world.center.radius,
        world.phase
    );
    log::info!("{shots} shots fired, {consumed} bodies consumed, {losses} rockets lost");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on the web
}

/// Preset name first, then a path to a JSON level file
#[cfg(not(target_arch = "wasm32"))]
fn load_level(arg: &str) -> Result<orbit_arcade::LevelConfig, orbit_arcade::LevelError> {
    use orbit_arcade::{LevelConfig, LevelKind};

    match LevelKind::from_str(arg) {
        Some(kind) => Ok(LevelConfig::preset(kind)),
        None => LevelConfig::load(arg),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_or<T: std::str::FromStr + std::fmt::Display>(arg: Option<String>, default: T, what: &str) -> T {
    match arg {
        Some(s) => s.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring bad {what} {s:?}, using {default}");
            default
        }),
        None => default,
    }
}

/// Deterministic asteroid ring around the level center, moving tangentially
#[cfg(not(target_arch = "wasm32"))]
fn spawn_asteroid_ring(world: &mut orbit_arcade::sim::World, count: u32) {
    use glam::DVec2;
    use orbit_arcade::heading_vector;
    use orbit_arcade::sim::Body;
    use orbit_arcade::sim::ForceField;
    use orbit_arcade::sim::state::HORIZON_ORBIT_SCALE;

    let cfg = &world.config;
    let field = world.force_field();
    let ring = match field {
        ForceField::None => cfg.width.min(cfg.height) * 0.3,
        ForceField::NewtonianPoint(star) => (star.lethal_radius + star.gravity_range) / 2.0,
        ForceField::Geodesic { center, .. } => (center.radius * 3.5).min(cfg.height * 0.4),
    };
    let speed = match field {
        ForceField::None => 20.0,
        ForceField::NewtonianPoint(star) => star.circular_speed(ring),
        ForceField::Geodesic { center, .. } => (center.radius / ring).sqrt() * HORIZON_ORBIT_SCALE,
    };
    let center = world.center.pos;

    for i in 0..count {
        let angle = std::f64::consts::TAU * i as f64 / count as f64;
        let radial = heading_vector(angle);
        let tangent = DVec2::new(-radial.y, radial.x);
        let radius = 15.0 + 5.0 * (i % 4) as f64;
        let mass = radius * 0.5;
        world.spawn(Body::asteroid(
            0,
            center + radial * ring,
            tangent * speed,
            radius,
            mass,
        ));
    }
    log::debug!("Spawned {count} asteroids on a ring of radius {ring:.1}");
}

/// Repeating pattern of thrust, turns, shots and tool changes
#[cfg(not(target_arch = "wasm32"))]
fn scripted_input(t: u64) -> orbit_arcade::sim::TickInput {
    orbit_arcade::sim::TickInput {
        forward: t % 120 < 20,
        turn_left: t % 200 < 15,
        damp_spin: t % 200 >= 100 && t % 200 < 110,
        fire: t % 45 == 0,
        next_tool: t % 600 == 300,
        ..Default::default()
    }
}
