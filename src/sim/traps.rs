//! Trap triggers and animation

use glam::Vec2;

use super::entities::Trap;
use super::state::{GameEvent, SessionId};
use super::timers::{TimerKind, Timers};
use crate::consts::*;
use crate::geom::distance;
use crate::level::TrapKind;

/// Arm hidden traps the player has come close to and release falling spikes
/// the player is passing beneath.
///
/// Arming is fire-and-forget: the reveal timer runs out even if the player
/// walks away, and a trap is armed at most once per session.
pub fn trigger_traps(
    traps: &mut [Trap],
    player_center: Vec2,
    session: SessionId,
    timers: &mut Timers,
    events: &mut Vec<GameEvent>,
) {
    for trap in traps.iter_mut() {
        if trap.is_hidden {
            if !trap.activated && distance(player_center, trap.rect.center()) < trap.trigger_distance
            {
                trap.activated = true;
                timers.schedule(
                    session,
                    trap.activation_delay_ms,
                    TimerKind::RevealTrap { trap_id: trap.id },
                );
                events.push(GameEvent::TrapArmed { trap_id: trap.id });
            }
            continue;
        }

        if let TrapKind::FallingSpike { .. } = trap.kind {
            let below = player_center.y > trap.rect.bottom();
            let dx = (player_center.x - trap.rect.center().x).abs();
            if !trap.dropping && below && dx < trap.trigger_distance {
                trap.dropping = true;
                events.push(GameEvent::FallingSpikeTriggered { trap_id: trap.id });
            }
        }
    }
}

/// Guillotine drop for a point in its cycle: fast drop, long dwell at the
/// bottom, fast rise.
pub fn guillotine_drop(cycle_tick: u32, travel: f32) -> f32 {
    let phase = GUILLOTINE_CYCLE_TICKS / 6;
    if cycle_tick < phase {
        travel * cycle_tick as f32 / phase as f32
    } else if cycle_tick >= GUILLOTINE_CYCLE_TICKS - phase {
        travel * (GUILLOTINE_CYCLE_TICKS - cycle_tick) as f32 / phase as f32
    } else {
        travel
    }
}

/// Advance the deterministic motion of every revealed trap by one tick
pub fn animate_traps(traps: &mut [Trap]) {
    for trap in traps.iter_mut().filter(|t| !t.is_hidden) {
        match trap.kind {
            TrapKind::SwingingBlade { swing_speed, .. } => {
                trap.angle += swing_speed;
            }
            TrapKind::Guillotine { travel } => {
                trap.timer = (trap.timer + 1) % GUILLOTINE_CYCLE_TICKS;
                trap.drop = guillotine_drop(trap.timer, travel);
            }
            TrapKind::FireBurst => {
                trap.timer += 1;
                if trap.timer % FIRE_HALF_PERIOD_TICKS == 0 {
                    trap.is_active = !trap.is_active;
                }
            }
            TrapKind::FallingSpike { speed } => {
                if trap.dropping {
                    trap.rect.y += speed;
                }
            }
            TrapKind::FloorSpike
            | TrapKind::CeilingSpike
            | TrapKind::WallSpike { .. }
            | TrapKind::FreezeZone => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::TrapSpec;

    #[test]
    fn test_guillotine_cycle_shape() {
        assert_eq!(guillotine_drop(0, 90.0), 0.0);
        assert_eq!(guillotine_drop(15, 90.0), 45.0);
        assert_eq!(guillotine_drop(30, 90.0), 90.0);
        assert_eq!(guillotine_drop(100, 90.0), 90.0);
        assert_eq!(guillotine_drop(165, 90.0), 45.0);
        assert!(guillotine_drop(179, 90.0) < 5.0);
    }

    #[test]
    fn test_fire_burst_toggles_every_half_period() {
        let mut traps = vec![Trap::from_spec(&TrapSpec::new(
            1,
            TrapKind::FireBurst,
            0.0,
            0.0,
            10.0,
            10.0,
        ))];
        assert!(traps[0].is_active);
        for _ in 0..FIRE_HALF_PERIOD_TICKS - 1 {
            animate_traps(&mut traps);
        }
        assert!(traps[0].is_active);
        animate_traps(&mut traps);
        assert!(!traps[0].is_active);
        for _ in 0..FIRE_HALF_PERIOD_TICKS {
            animate_traps(&mut traps);
        }
        assert!(traps[0].is_active);
    }

    #[test]
    fn test_falling_spike_waits_for_player_then_falls() {
        let spec = TrapSpec::new(5, TrapKind::FallingSpike { speed: 10.0 }, 100.0, 0.0, 30.0, 40.0)
            .with_trigger(50.0, 0.0);
        let mut traps = vec![Trap::from_spec(&spec)];
        let mut timers = Timers::new();
        let mut events = Vec::new();

        // Far to the side: nothing happens
        trigger_traps(&mut traps, Vec2::new(400.0, 300.0), SessionId(1), &mut timers, &mut events);
        animate_traps(&mut traps);
        assert_eq!(traps[0].rect.y, 0.0);

        trigger_traps(&mut traps, Vec2::new(120.0, 300.0), SessionId(1), &mut timers, &mut events);
        assert_eq!(events, vec![GameEvent::FallingSpikeTriggered { trap_id: 5 }]);

        // Keeps falling after the player leaves
        for _ in 0..3 {
            trigger_traps(&mut traps, Vec2::new(900.0, 300.0), SessionId(1), &mut timers, &mut events);
            animate_traps(&mut traps);
        }
        assert_eq!(traps[0].rect.y, 30.0);
        assert!(traps[0].is_active);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_hidden_falling_spike_drops_only_once_player_is_below() {
        let spec = TrapSpec::new(6, TrapKind::FallingSpike { speed: 10.0 }, 40.0, 300.0, 30.0, 40.0)
            .hidden()
            .with_trigger(100.0, 200.0);
        let mut traps = vec![Trap::from_spec(&spec)];
        let mut timers = Timers::new();
        let mut events = Vec::new();

        // Beside the spike, not beneath it
        let beside = Vec2::new(60.0, 310.0);
        trigger_traps(&mut traps, beside, SessionId(1), &mut timers, &mut events);
        assert!(traps[0].activated);
        assert!(!traps[0].dropping);

        traps[0].is_hidden = false;
        traps[0].is_active = true;
        for _ in 0..3 {
            trigger_traps(&mut traps, beside, SessionId(1), &mut timers, &mut events);
            animate_traps(&mut traps);
        }
        assert_eq!(traps[0].rect.y, 300.0);
        assert_eq!(events, vec![GameEvent::TrapArmed { trap_id: 6 }]);

        trigger_traps(&mut traps, Vec2::new(60.0, 400.0), SessionId(1), &mut timers, &mut events);
        animate_traps(&mut traps);
        assert_eq!(traps[0].rect.y, 310.0);
        assert_eq!(
            events,
            vec![
                GameEvent::TrapArmed { trap_id: 6 },
                GameEvent::FallingSpikeTriggered { trap_id: 6 },
            ]
        );
    }

    #[test]
    fn test_hidden_trap_armed_exactly_once() {
        let spec = TrapSpec::new(2, TrapKind::FloorSpike, 100.0, 100.0, 20.0, 20.0).hidden();
        let mut traps = vec![Trap::from_spec(&spec)];
        let mut timers = Timers::new();
        let mut events = Vec::new();
        for _ in 0..5 {
            trigger_traps(&mut traps, Vec2::new(120.0, 110.0), SessionId(3), &mut timers, &mut events);
        }
        assert_eq!(timers.len(), 1);
        assert_eq!(events, vec![GameEvent::TrapArmed { trap_id: 2 }]);
    }

    #[test]
    fn test_blade_angle_is_unbounded() {
        let spec = TrapSpec::new(
            1,
            TrapKind::SwingingBlade {
                swing_speed: 0.5,
                angle: 0.0,
            },
            0.0,
            0.0,
            20.0,
            100.0,
        );
        let mut traps = vec![Trap::from_spec(&spec)];
        for _ in 0..100 {
            animate_traps(&mut traps);
        }
        assert!((traps[0].angle - 50.0).abs() < 1e-3);
        assert!(traps[0].swing_angle().abs() <= BLADE_SWING_ARC);
    }
}
