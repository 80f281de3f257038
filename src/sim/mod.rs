//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (level definition order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entities;
pub mod state;
pub mod tick;
pub mod timers;
pub mod traps;

pub use collision::{in_freeze_zone, lethal_trap_hit, resolve_platforms, trap_hitbox};
pub use entities::{Level, Platform, PlatformBehavior, Trap};
pub use state::{
    Camera, GameEvent, GameState, Particle, Player, ScreenShake, SessionId, World,
};
pub use tick::{TickInput, TickOutcome, tick};
pub use timers::{TimerKind, Timers};
