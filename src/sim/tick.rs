//! Fixed timestep simulation tick
//!
//! One call runs the whole pipeline: commands, integration of every body,
//! pairwise collisions on the moved positions, then the field's destruction
//! rules (accretion or lethal surface).

use glam::DVec2;

use super::collision::{PairOutcome, pair_collides, resolve_pair};
use super::field::ForceField;
use super::growth::{accrete, swallow};
use super::integrate::{MotionLimits, Stepped, step_body};
use super::state::{Body, BodyKind, GameEvent, GamePhase, LossCause, Tool, World, colors};
use crate::{heading_vector, limit_speed};

/// Gap between the rocket hull and a freshly fired bullet
const MUZZLE_GAP: f64 = 10.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Main engine
    pub forward: bool,
    /// Retro thrust
    pub reverse: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    /// Bleed off angular velocity
    pub damp_spin: bool,
    /// Use the selected tool
    pub fire: bool,
    pub next_tool: bool,
    pub prev_tool: bool,
    pub toggle_shield: bool,
    /// Pause toggle
    pub pause: bool,
    /// Reset the level
    pub restart: bool,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput, dt: f64) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.restart {
        world.reset();
        return events;
    }

    // Handle pause toggle
    if input.pause {
        match world.phase {
            GamePhase::Playing => {
                world.phase = GamePhase::Paused;
                return events;
            }
            GamePhase::Paused => world.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if world.phase != GamePhase::Playing {
        return events;
    }

    world.time_ticks += 1;

    apply_commands(world, input, dt, &mut events);

    let field = world.force_field();
    let limits = world.limits();

    // The rocket always wraps, even where other bodies fall off the edge
    let rocket_limits = MotionLimits {
        bounds: limits.bounds.wrapping(),
        ..limits
    };
    let rocket = step_body(&world.rocket, &field, &rocket_limits, dt);
    world.rocket = rocket.body;

    let captured = step_bodies(world, &field, &limits, dt, &mut events);

    // A rocket that fell in is lost to the horizon, not to a collision
    let collided = if rocket.captured {
        None
    } else {
        resolve_collisions(world)
    };
    if let Some(with) = collided {
        lose_rocket(world, LossCause::Collision { with }, &mut events);
        return events;
    }

    apply_field_rules(world, captured, rocket.captured, &mut events);

    events
}

/// Steering, tool selection and firing
fn apply_commands(world: &mut World, input: &TickInput, dt: f64, events: &mut Vec<GameEvent>) {
    let handling = world.config.rocket;
    let speed_cap = world.config.speed_cap;

    if input.next_tool {
        world.tool = world.tool.next();
    }
    if input.prev_tool {
        world.tool = world.tool.prev();
    }

    if let BodyKind::Rocket {
        heading,
        angular_vel,
        shield,
    } = &mut world.rocket.kind
    {
        if input.turn_left {
            *angular_vel -= handling.torque * dt;
        }
        if input.turn_right {
            *angular_vel += handling.torque * dt;
        }
        if input.damp_spin {
            *angular_vel -= handling.spin_damping * dt * *angular_vel;
        }

        // Engines are off while the shield is up
        let engines = !*shield;
        let nose = heading_vector(*heading);
        let mut vel = world.rocket.vel;
        if input.forward && engines {
            vel += nose * handling.thrust * dt;
        }
        if input.reverse && engines {
            vel -= nose * handling.thrust * dt;
        }
        world.rocket.vel = limit_speed(vel, speed_cap);
    }

    if input.toggle_shield {
        toggle_shield(world, events);
    }

    if input.fire {
        fire(world, events);
    }
}

fn toggle_shield(world: &mut World, events: &mut Vec<GameEvent>) {
    if let BodyKind::Rocket { shield, .. } = &mut world.rocket.kind {
        *shield = !*shield;
        events.push(GameEvent::ShieldToggled { on: *shield });
    }
}

/// Use the selected tool
fn fire(world: &mut World, events: &mut Vec<GameEvent>) {
    let tool = world.tool;
    let weapons = world.config.weapons;
    let rocket = world.rocket;
    let Some(heading) = rocket.heading() else {
        return;
    };
    let muzzle = rocket.radius + MUZZLE_GAP;

    match tool {
        Tool::Gun => {
            let nose = heading_vector(heading);
            world.spawn_projectile(Body::bullet(
                0,
                rocket.pos + nose * muzzle,
                rocket.vel + nose * weapons.bullet_speed,
                weapons.bullet_mass,
                weapons.bullet_ttl,
            ));
            world.rocket.vel = limit_speed(
                world.rocket.vel - nose * weapons.recoil,
                world.config.speed_cap,
            );
        }
        Tool::Burst => {
            for dir in ring_directions(weapons.burst_count) {
                world.spawn_projectile(Body::bullet(
                    0,
                    rocket.pos + dir * muzzle,
                    rocket.vel + dir * weapons.bullet_speed,
                    weapons.bullet_mass,
                    weapons.bullet_ttl,
                ));
            }
        }
        Tool::Bomb => {
            world.spawn_projectile(Body::bomb(0, rocket.pos, rocket.vel, weapons.bomb_fuse));
        }
        Tool::Shield => {
            toggle_shield(world, events);
            return;
        }
    }

    log::debug!("Fired {:?} at tick {}", tool, world.time_ticks);
    events.push(GameEvent::Fired { tool });
}

/// `count` unit vectors evenly spaced around the circle
fn ring_directions(count: u32) -> impl Iterator<Item = DVec2> {
    (0..count).map(move |i| heading_vector(std::f64::consts::TAU * i as f64 / count as f64))
}

/// Integrate every non-rocket body, dropping ones that left, expired or blew up
///
/// Bodies whose step fell into the horizon are returned for accretion.
fn step_bodies(
    world: &mut World,
    field: &ForceField,
    limits: &MotionLimits,
    dt: f64,
    events: &mut Vec<GameEvent>,
) -> Vec<Body> {
    let snapshot = std::mem::take(&mut world.bodies);
    let mut next = Vec::with_capacity(snapshot.len());
    let mut captured = Vec::new();
    let mut detonated = Vec::new();

    for body in &snapshot {
        let Stepped {
            body,
            in_bounds,
            captured: fell_in,
        } = step_body(body, field, limits, dt);
        if fell_in {
            captured.push(body);
            continue;
        }
        if !in_bounds {
            events.push(GameEvent::LeftWorld { id: body.id });
            continue;
        }
        match body.kind {
            BodyKind::Bullet { ttl } if ttl <= 0.0 => {
                events.push(GameEvent::Expired { id: body.id });
            }
            BodyKind::Bomb { fuse } if fuse <= 0.0 => {
                events.push(GameEvent::BombDetonated {
                    id: body.id,
                    pos: body.pos,
                });
                detonated.push(body);
            }
            _ => next.push(body),
        }
    }

    world.bodies = next;
    for bomb in &detonated {
        detonate(world, bomb);
    }
    captured
}

/// Replace a bomb with a radial spray of fragments
fn detonate(world: &mut World, bomb: &Body) {
    let weapons = world.config.weapons;
    for dir in ring_directions(weapons.fragment_count) {
        let fragment = Body::bullet(
            0,
            bomb.pos + dir * bomb.radius,
            bomb.vel + dir * weapons.fragment_speed,
            weapons.fragment_mass,
            weapons.fragment_ttl,
        )
        .with_color(colors::FRAGMENT);
        world.spawn_projectile(fragment);
    }
    log::debug!(
        "Bomb {} detonated into {} fragments",
        bomb.id,
        weapons.fragment_count
    );
}

/// Resolve every colliding pair in a fixed order
///
/// The rocket goes first against each body by ascending id, then every pair
/// (i, j) with i < j. Returns the id of the body that destroyed the rocket.
fn resolve_collisions(world: &mut World) -> Option<u32> {
    world.normalize_order();
    let params = world.collision_params();

    for i in 0..world.bodies.len() {
        let other = world.bodies[i];
        if !pair_collides(&world.rocket, &other) {
            continue;
        }
        match resolve_pair(&world.rocket, &other, &params) {
            PairOutcome::Fatal => return Some(other.id),
            PairOutcome::Bounced { a, b } => {
                world.rocket = a;
                world.bodies[i] = b;
            }
            PairOutcome::Apart | PairOutcome::Separating => {}
        }
    }

    let n = world.bodies.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = (world.bodies[i], world.bodies[j]);
            if !pair_collides(&a, &b) {
                continue;
            }
            if let PairOutcome::Bounced { a, b } = resolve_pair(&a, &b, &params) {
                world.bodies[i] = a;
                world.bodies[j] = b;
            }
        }
    }

    None
}

/// Accretion on black-hole levels, lethal surface elsewhere
///
/// `captured` bodies fell into the horizon during their step and are swallowed
/// before the positional check on everything else.
fn apply_field_rules(
    world: &mut World,
    captured: Vec<Body>,
    rocket_captured: bool,
    events: &mut Vec<GameEvent>,
) {
    let field = world.force_field();

    if field.accretes() {
        let coefficient = world.config.growth_coefficient;
        let mut consumed: Vec<(Body, f64)> = captured
            .into_iter()
            .map(|body| swallow(&mut world.center, body, coefficient))
            .collect();
        let bodies = std::mem::take(&mut world.bodies);
        let (kept, swallowed) = accrete(&mut world.center, bodies, coefficient);
        world.bodies = kept;
        consumed.extend(swallowed);

        for (body, horizon_radius) in consumed {
            events.push(GameEvent::Consumed {
                id: body.id,
                horizon_radius,
            });
        }

        if rocket_captured || world.center.contains(world.rocket.pos) {
            lose_rocket(world, LossCause::Horizon, events);
        }
    } else {
        world.bodies.retain(|body| {
            if field.is_lethal(body.pos) {
                events.push(GameEvent::Destroyed { id: body.id });
                false
            } else {
                true
            }
        });

        if field.is_lethal(world.rocket.pos) {
            lose_rocket(world, LossCause::Lethal, events);
        }
    }
}

fn lose_rocket(world: &mut World, cause: LossCause, events: &mut Vec<GameEvent>) {
    world.phase = GamePhase::GameOver;
    events.push(GameEvent::RocketLost { cause });
    log::info!("Rocket lost ({:?}) at tick {}", cause, world.time_ticks);
}
