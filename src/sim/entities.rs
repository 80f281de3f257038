//! Per-session mutable level state
//!
//! A `Level` is built fresh from a template at every (re)initialization, so
//! collapsed platforms and sprung traps never leak into the next attempt.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::geom::Rect;
use crate::level::{LevelTemplate, PlatformKind, PlatformSpec, Theme, TrapKind, TrapSpec};

/// Runtime behavior of a platform, one variant per platform kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlatformBehavior {
    Normal,
    Ice,
    Collapsing {
        /// Latched on the first landing
        collapsing: bool,
        timer_ms: f32,
    },
    Disappearing {
        /// Latched on the first touch
        touched: bool,
        visible: bool,
        timer_ms: f32,
    },
    Lava {
        /// Template y the bob oscillates around
        base_y: f32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub behavior: PlatformBehavior,
}

impl Platform {
    pub fn from_spec(spec: &PlatformSpec) -> Self {
        let behavior = match spec.kind {
            PlatformKind::Normal => PlatformBehavior::Normal,
            PlatformKind::Ice => PlatformBehavior::Ice,
            PlatformKind::Collapsing => PlatformBehavior::Collapsing {
                collapsing: false,
                timer_ms: 0.0,
            },
            PlatformKind::Disappearing => PlatformBehavior::Disappearing {
                touched: false,
                visible: true,
                timer_ms: 0.0,
            },
            PlatformKind::Lava => PlatformBehavior::Lava { base_y: spec.y },
        };
        Self {
            rect: spec.rect(),
            behavior,
        }
    }

    /// Whether the platform still takes part in collision (and is drawn)
    pub fn is_solid(&self) -> bool {
        match self.behavior {
            PlatformBehavior::Collapsing { timer_ms, .. } => timer_ms <= COLLAPSE_DELAY_MS,
            PlatformBehavior::Disappearing { visible, .. } => visible,
            _ => true,
        }
    }

    /// Called when the player lands on top. Starts one-shot timers.
    /// Returns true if this landing started a collapse or fade.
    pub fn on_landed(&mut self) -> bool {
        match &mut self.behavior {
            PlatformBehavior::Collapsing { collapsing, .. } if !*collapsing => {
                *collapsing = true;
                true
            }
            PlatformBehavior::Disappearing { touched, .. } if !*touched => {
                *touched = true;
                true
            }
            _ => false,
        }
    }

    /// Advance timers and motion by one tick
    pub fn advance(&mut self, dt_ms: f32, clock_ms: f64) {
        match &mut self.behavior {
            PlatformBehavior::Collapsing {
                collapsing: true,
                timer_ms,
            } => {
                *timer_ms += dt_ms;
            }
            PlatformBehavior::Disappearing {
                touched: true,
                visible,
                timer_ms,
            } => {
                *timer_ms += dt_ms;
                if *timer_ms > DISAPPEAR_DELAY_MS {
                    *visible = false;
                }
            }
            PlatformBehavior::Lava { base_y } => {
                let phase = clock_ms as f32 * LAVA_BOB_RATE + self.rect.x * 0.01;
                self.rect.y = *base_y + phase.sin() * LAVA_BOB_AMPLITUDE;
            }
            _ => {}
        }
    }

    /// Draw opacity: fades while a touched disappearing platform counts down
    pub fn alpha(&self) -> f32 {
        match self.behavior {
            PlatformBehavior::Disappearing {
                touched: true,
                visible,
                timer_ms,
            } => {
                if visible {
                    (1.0 - timer_ms / DISAPPEAR_DELAY_MS).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            }
            _ => 1.0,
        }
    }
}

/// A trap with its runtime state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trap {
    pub id: u32,
    pub kind: TrapKind,
    /// Current rect (falling spikes move this down)
    pub rect: Rect,
    pub is_active: bool,
    pub is_hidden: bool,
    /// Proximity trigger has fired and the reveal is scheduled (hidden traps)
    pub activated: bool,
    /// Falling spike has let go
    pub dropping: bool,
    /// Tick counter for periodic traps
    pub timer: u32,
    /// Unbounded swing phase (swinging blades)
    pub angle: f32,
    /// Current guillotine drop, 0 = raised
    pub drop: f32,
    pub trigger_distance: f32,
    pub activation_delay_ms: f32,
}

impl Trap {
    pub fn from_spec(spec: &TrapSpec) -> Self {
        let angle = match spec.kind {
            TrapKind::SwingingBlade { angle, .. } => angle,
            _ => 0.0,
        };
        Self {
            id: spec.id,
            kind: spec.kind,
            rect: spec.rect(),
            is_active: !spec.hidden,
            is_hidden: spec.hidden,
            activated: false,
            dropping: false,
            timer: 0,
            angle,
            drop: 0.0,
            trigger_distance: spec.trigger_distance,
            activation_delay_ms: spec.activation_delay_ms,
        }
    }

    /// Pivot of a swinging blade (top-center of its rect)
    pub fn pivot(&self) -> Vec2 {
        Vec2::new(self.rect.x + self.rect.width / 2.0, self.rect.y)
    }

    /// Current pendulum deflection from vertical
    pub fn swing_angle(&self) -> f32 {
        self.angle.sin() * BLADE_SWING_ARC
    }

    /// Blade center at the end of the swing arm
    pub fn blade_tip(&self) -> Vec2 {
        let a = self.swing_angle();
        self.pivot() + Vec2::new(a.sin(), a.cos()) * self.rect.height
    }
}

/// Mutable copy of a level template for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub id: u32,
    pub name: String,
    pub theme: Theme,
    pub platforms: Vec<Platform>,
    pub traps: Vec<Trap>,
    pub start_position: Vec2,
    pub goal: Rect,
    pub background_color: [f32; 3],
}

impl Level {
    pub fn from_template(template: &LevelTemplate) -> Self {
        Self {
            id: template.id,
            name: template.name.clone(),
            theme: template.theme,
            platforms: template.platforms.iter().map(Platform::from_spec).collect(),
            traps: template.traps.iter().map(Trap::from_spec).collect(),
            start_position: template.start_position,
            goal: template.goal,
            background_color: template.background_color,
        }
    }

    pub fn trap_mut(&mut self, id: u32) -> Option<&mut Trap> {
        self.traps.iter_mut().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collapsing() -> Platform {
        Platform::from_spec(&PlatformSpec::new(PlatformKind::Collapsing, 0.0, 100.0, 50.0, 10.0))
    }

    #[test]
    fn test_collapse_latches_once() {
        let mut p = collapsing();
        assert!(p.on_landed());
        p.advance(300.0, 0.0);
        // Second landing neither restarts nor resets the timer
        assert!(!p.on_landed());
        assert!(matches!(
            p.behavior,
            PlatformBehavior::Collapsing { collapsing: true, timer_ms } if timer_ms == 300.0
        ));
        assert!(p.is_solid());
        p.advance(250.0, 0.0);
        assert!(!p.is_solid());
    }

    #[test]
    fn test_untouched_collapsing_platform_stays() {
        let mut p = collapsing();
        for _ in 0..100 {
            p.advance(16.0, 0.0);
        }
        assert!(p.is_solid());
    }

    #[test]
    fn test_disappearing_fades_then_vanishes() {
        let spec = PlatformSpec::new(PlatformKind::Disappearing, 0.0, 100.0, 50.0, 10.0);
        let mut p = Platform::from_spec(&spec);
        assert_eq!(p.alpha(), 1.0);
        p.on_landed();
        p.advance(500.0, 0.0);
        assert!((p.alpha() - 0.5).abs() < 1e-4);
        assert!(p.is_solid());
        p.advance(501.0, 0.0);
        assert!(!p.is_solid());
        assert_eq!(p.alpha(), 0.0);
    }

    #[test]
    fn test_lava_bobs_around_template_y() {
        let spec = PlatformSpec::new(PlatformKind::Lava, 100.0, 400.0, 50.0, 20.0);
        let mut p = Platform::from_spec(&spec);
        for step in 0..200 {
            p.advance(16.0, step as f64 * 16.0);
            assert!((p.rect.y - 400.0).abs() <= LAVA_BOB_AMPLITUDE + 1e-4);
        }
    }

    #[test]
    fn test_hidden_trap_starts_inert() {
        let spec = TrapSpec::new(1, TrapKind::FloorSpike, 0.0, 0.0, 10.0, 10.0).hidden();
        let trap = Trap::from_spec(&spec);
        assert!(trap.is_hidden);
        assert!(!trap.is_active);
        assert!(!trap.activated);
    }

    #[test]
    fn test_blade_tip_hangs_below_pivot_at_rest() {
        let spec = TrapSpec::new(
            1,
            TrapKind::SwingingBlade {
                swing_speed: 0.05,
                angle: 0.0,
            },
            100.0,
            50.0,
            30.0,
            120.0,
        );
        let trap = Trap::from_spec(&spec);
        let tip = trap.blade_tip();
        assert!((tip.x - 115.0).abs() < 1e-4);
        assert!((tip.y - 170.0).abs() < 1e-4);
    }
}
