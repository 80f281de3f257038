//! Collision detection and response
//!
//! Platforms are resolved one at a time in level order against the player's
//! post-integration rect. There is no global resolution pass; level geometry
//! is authored so overlapping edge cases do not matter.

use glam::Vec2;

use super::entities::{Platform, PlatformBehavior, Trap};
use super::state::Player;
use crate::consts::*;
use crate::geom::{Rect, rects_intersect};
use crate::level::TrapKind;

/// What the platform pass found
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlatformContacts {
    /// Landed on top of at least one platform
    pub landed: bool,
    pub on_ice: bool,
    /// Platforms whose collapse/fade was started by this landing
    pub crumbling: Vec<usize>,
}

/// Resolve the player against all solid platforms.
///
/// `prev_pos` is the player's position before integration; `player.vel` is
/// the velocity that produced the move.
pub fn resolve_platforms(
    player: &mut Player,
    prev_pos: Vec2,
    platforms: &mut [Platform],
) -> PlatformContacts {
    let mut contacts = PlatformContacts::default();
    let prev_bottom = prev_pos.y + PLAYER_HEIGHT;

    for (index, platform) in platforms.iter_mut().enumerate() {
        if !platform.is_solid() {
            continue;
        }
        let p = platform.rect;
        if !rects_intersect(&player.rect(), &p) {
            continue;
        }

        if player.vel.y >= 0.0 && prev_bottom <= p.y + LANDING_TOLERANCE {
            // Landing on top
            player.pos.y = p.y - PLAYER_HEIGHT;
            player.vel.y = 0.0;
            player.is_grounded = true;
            player.is_jumping = false;
            contacts.landed = true;
            if matches!(platform.behavior, PlatformBehavior::Ice) {
                contacts.on_ice = true;
            }
            if platform.on_landed() {
                contacts.crumbling.push(index);
            }
        } else if player.vel.y < 0.0 && prev_pos.y >= p.bottom() - LANDING_TOLERANCE {
            // Head bump
            player.pos.y = p.bottom();
            player.vel.y = 0.0;
        } else {
            // Side hit
            let from_left = if player.vel.x != 0.0 {
                player.vel.x > 0.0
            } else {
                prev_pos.x + PLAYER_WIDTH / 2.0 < p.center().x
            };
            player.pos.x = if from_left {
                p.x - PLAYER_WIDTH
            } else {
                p.right()
            };
            player.vel.x = 0.0;
        }
    }

    contacts
}

/// Collision rect of a trap in its current pose
pub fn trap_hitbox(trap: &Trap) -> Rect {
    match trap.kind {
        // Square the width of the blade, centered on the end of the arm
        TrapKind::SwingingBlade { .. } => {
            Rect::centered(trap.blade_tip(), trap.rect.width, trap.rect.width)
        }
        TrapKind::Guillotine { .. } => Rect::new(
            trap.rect.x,
            trap.rect.y + trap.drop,
            trap.rect.width,
            trap.rect.height,
        ),
        TrapKind::FloorSpike
        | TrapKind::CeilingSpike
        | TrapKind::WallSpike { .. }
        | TrapKind::FreezeZone
        | TrapKind::FireBurst
        | TrapKind::FallingSpike { .. } => trap.rect,
    }
}

/// Whether the trap is currently armed and visible
#[inline]
pub fn trap_is_live(trap: &Trap) -> bool {
    trap.is_active && !trap.is_hidden
}

/// Lethal trap overlapping `player_rect`, if any
pub fn lethal_trap_hit(traps: &[Trap], player_rect: &Rect) -> Option<u32> {
    traps
        .iter()
        .filter(|t| trap_is_live(t) && t.kind.is_lethal())
        .find(|t| rects_intersect(&trap_hitbox(t), player_rect))
        .map(|t| t.id)
}

/// Whether an active freeze zone overlaps `player_rect`
pub fn in_freeze_zone(traps: &[Trap], player_rect: &Rect) -> bool {
    traps.iter().any(|t| {
        matches!(t.kind, TrapKind::FreezeZone)
            && trap_is_live(t)
            && rects_intersect(&t.rect, player_rect)
    })
}
