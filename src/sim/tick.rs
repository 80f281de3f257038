//! Fixed timestep simulation tick
//!
//! Advances one level session by one step. The order of the phases below is
//! part of the game's behavior; keep it.

use rand::Rng;

use super::collision::{in_freeze_zone, lethal_trap_hit, resolve_platforms};
use super::state::{GameEvent, Particle, World};
use super::timers::{TimerKind, Timers};
use super::traps::{animate_traps, trigger_traps};
use crate::consts::*;
use crate::geom::{random_range, rects_intersect};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// How a tick ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Player is dead and waiting for respawn; only effects advanced
    Skipped,
    Running,
    /// Player died this tick; a respawn timer is scheduled
    Died,
    /// Player reached the goal; the session must not be ticked again
    LevelComplete,
}

/// Advance the session by one fixed timestep
pub fn tick<R: Rng>(
    world: &mut World,
    input: &TickInput,
    dt_ms: f32,
    timers: &mut Timers,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> TickOutcome {
    world.clock_ms += dt_ms as f64;
    world.ticks += 1;

    if world.player.is_dead {
        // Let the death burst play out while the respawn timer runs
        update_particles(&mut world.particles);
        decay_shake(world, rng);
        return TickOutcome::Skipped;
    }

    let prev_pos = world.player.pos;

    // --- HORIZONTAL INPUT ---
    let frozen = in_freeze_zone(&world.level.traps, &world.player.rect());
    let speed = if frozen {
        MOVE_SPEED * FREEZE_FACTOR
    } else {
        MOVE_SPEED
    };
    let player = &mut world.player;
    if input.left {
        player.vel.x = -speed;
        player.facing_right = false;
    } else if input.right {
        player.vel.x = speed;
        player.facing_right = true;
    } else {
        let friction = if player.on_ice { ICE_FRICTION } else { FRICTION };
        player.vel.x *= friction;
        if player.vel.x.abs() < VELOCITY_SNAP {
            player.vel.x = 0.0;
        }
    }

    // --- GRAVITY + INTEGRATION ---
    player.vel.y = (player.vel.y + GRAVITY).min(MAX_FALL_SPEED);
    player.pos += player.vel;

    // --- PLATFORMS ---
    let was_grounded = player.is_grounded;
    player.is_grounded = false;
    let contacts = resolve_platforms(player, prev_pos, &mut world.level.platforms);
    player.on_ice = contacts.on_ice;
    if contacts.landed && !was_grounded {
        events.push(GameEvent::Landed);
    }
    events.extend(
        contacts
            .crumbling
            .iter()
            .map(|&index| GameEvent::PlatformCrumbling { index }),
    );

    for platform in &mut world.level.platforms {
        platform.advance(dt_ms, world.clock_ms);
    }

    // --- JUMP ---
    let player = &mut world.player;
    if input.jump && player.is_grounded && !player.is_jumping {
        player.vel.y = JUMP_FORCE;
        player.is_grounded = false;
        player.is_jumping = true;
        events.push(GameEvent::Jumped);
    }

    // --- TRAPS ---
    let center = world.player.center();
    trigger_traps(
        &mut world.level.traps,
        center,
        world.session,
        timers,
        events,
    );
    animate_traps(&mut world.level.traps);

    if let Some(trap_id) = lethal_trap_hit(&world.level.traps, &world.player.rect()) {
        log::debug!("Killed by trap {} in level {}", trap_id, world.level.id);
        kill_player(world, timers, rng, events);
        return TickOutcome::Died;
    }

    // --- GOAL ---
    if rects_intersect(&world.player.rect(), &world.level.goal) {
        events.push(GameEvent::LevelComplete);
        return TickOutcome::LevelComplete;
    }

    // --- FELL OUT ---
    if world.player.pos.y > VIEW_HEIGHT + FALL_MARGIN {
        kill_player(world, timers, rng, events);
        return TickOutcome::Died;
    }

    world.camera.follow(world.player.pos.x);

    // --- WALK CYCLE ---
    let player = &mut world.player;
    player.animation_timer += dt_ms;
    if player.animation_timer >= ANIMATION_FRAME_MS {
        player.animation_timer = 0.0;
        player.animation_frame = (player.animation_frame + 1) % ANIMATION_FRAMES;
    }

    update_particles(&mut world.particles);
    decay_shake(world, rng);

    TickOutcome::Running
}

/// Death burst, shake, and a respawn timer for this session
fn kill_player<R: Rng>(
    world: &mut World,
    timers: &mut Timers,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    let center = world.player.center();
    for _ in 0..DEATH_PARTICLES {
        let life = random_range(rng, 30.0, 60.0);
        let warm = random_range(rng, 0.0, 0.6);
        world.particles.push(Particle {
            pos: center,
            vel: glam::Vec2::new(random_range(rng, -8.0, 8.0), random_range(rng, -12.0, 2.0)),
            life,
            max_life: life,
            color: [1.0, warm, 0.1, 1.0],
            size: random_range(rng, 2.0, 6.0),
        });
    }

    let player = &mut world.player;
    player.is_dead = true;
    player.vel = glam::Vec2::ZERO;
    world.shake.intensity = DEATH_SHAKE;
    timers.schedule(world.session, RESPAWN_DELAY_MS, TimerKind::Respawn);
    events.push(GameEvent::PlayerDied);
}

fn update_particles(particles: &mut Vec<Particle>) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.vel.y += PARTICLE_GRAVITY;
        p.life -= 1.0;
    }
    particles.retain(|p| p.life > 0.0);
}

fn decay_shake<R: Rng>(world: &mut World, rng: &mut R) {
    let shake = &mut world.shake;
    if shake.intensity <= 0.0 {
        return;
    }
    shake.intensity *= SHAKE_DECAY;
    if shake.intensity < SHAKE_EPSILON {
        shake.intensity = 0.0;
        shake.offset = glam::Vec2::ZERO;
    } else {
        let i = shake.intensity;
        shake.offset = glam::Vec2::new(random_range(rng, -i, i), random_range(rng, -i, i));
    }
}
