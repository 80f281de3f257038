//! Game state and core simulation types
//!
//! `World` is everything one level session mutates. It is rebuilt from the
//! level template on every (re)initialization and tagged with a fresh session
//! id so that deferred timers from older sessions can be recognized and dropped.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::Level;
use crate::consts::*;
use crate::geom::{Rect, lerp};
use crate::level::LevelTemplate;

/// Identifies one level session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

/// The player avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left of the hitbox
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub is_grounded: bool,
    pub is_jumping: bool,
    pub is_dead: bool,
    pub facing_right: bool,
    pub animation_frame: u32,
    pub animation_timer: f32,
    /// Stood on ice during the last collision pass
    pub on_ice: bool,
}

impl Player {
    pub fn spawn(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            is_grounded: false,
            is_jumping: false,
            is_dead: false,
            facing_right: true,
            animation_frame: 0,
            animation_timer: 0.0,
            on_ice: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }
}

/// Side-scrolling camera; only x follows the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub target_x: f32,
    pub smoothing: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: VIEW_WIDTH,
            height: VIEW_HEIGHT,
            target_x: 0.0,
            smoothing: CAMERA_SMOOTHING,
        }
    }
}

impl Camera {
    /// Keep the player a third of the way into the view
    pub fn follow(&mut self, player_x: f32) {
        self.target_x = player_x - self.width / 3.0;
        self.x = lerp(self.x, self.target_x, self.smoothing).max(0.0);
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining ticks
    pub life: f32,
    pub max_life: f32,
    pub color: [f32; 4],
    pub size: f32,
}

impl Particle {
    /// Remaining life fraction, used as draw alpha
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }
}

/// Camera shake after a death
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScreenShake {
    pub intensity: f32,
    pub offset: Vec2,
}

/// Things that happened during a tick (for audio and logging)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    Landed,
    /// A collapsing or disappearing platform was stepped on for the first time
    PlatformCrumbling { index: usize },
    TrapArmed { trap_id: u32 },
    TrapRevealed { trap_id: u32 },
    FallingSpikeTriggered { trap_id: u32 },
    PlayerDied,
    LevelComplete,
}

/// Everything one level session owns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub session: SessionId,
    pub level: Level,
    pub player: Player,
    pub camera: Camera,
    pub particles: Vec<Particle>,
    pub shake: ScreenShake,
    /// Simulation time since the session started
    pub clock_ms: f64,
    /// Ticks simulated this session
    pub ticks: u64,
}

impl World {
    /// Fresh session from a template
    pub fn new(template: &LevelTemplate, session: SessionId) -> Self {
        let level = Level::from_template(template);
        let player = Player::spawn(level.start_position);
        Self {
            session,
            level,
            player,
            camera: Camera::default(),
            particles: Vec::new(),
            shake: ScreenShake::default(),
            clock_ms: 0.0,
            ticks: 0,
        }
    }

    /// Reveal a hidden trap whose activation delay has elapsed.
    /// Returns false if the trap was already revealed or does not exist.
    pub fn reveal_trap(&mut self, trap_id: u32) -> bool {
        match self.level.trap_mut(trap_id) {
            Some(trap) if trap.is_hidden => {
                trap.is_hidden = false;
                trap.is_active = true;
                true
            }
            _ => false,
        }
    }
}

/// Run-level flags (the outer state machine)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// 1-based
    pub current_level: u32,
    pub deaths: u32,
    pub is_playing: bool,
    pub is_paused: bool,
    pub level_complete: bool,
    pub game_complete: bool,
    pub show_start_screen: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            current_level: 1,
            deaths: 0,
            is_playing: false,
            is_paused: false,
            level_complete: false,
            game_complete: false,
            show_start_screen: true,
        }
    }
}

impl GameState {
    /// Whether the simulation should advance this frame
    pub fn is_simulating(&self) -> bool {
        self.is_playing && !self.is_paused && !self.level_complete && !self.game_complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_never_goes_negative() {
        let mut cam = Camera::default();
        for _ in 0..50 {
            cam.follow(10.0);
        }
        assert_eq!(cam.x, 0.0);
    }

    #[test]
    fn test_camera_converges_on_target() {
        let mut cam = Camera::default();
        for _ in 0..300 {
            cam.follow(1000.0);
        }
        let target = 1000.0 - VIEW_WIDTH / 3.0;
        assert!((cam.x - target).abs() < 0.5);
        assert_eq!(cam.target_x, target);
    }

    #[test]
    fn test_initial_game_state() {
        let gs = GameState::default();
        assert!(gs.show_start_screen);
        assert!(!gs.is_playing);
        assert!(!gs.is_simulating());
        assert_eq!(gs.current_level, 1);
        assert_eq!(gs.deaths, 0);
    }

    #[test]
    fn test_particle_alpha() {
        let p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            life: 15.0,
            max_life: 60.0,
            color: [1.0; 4],
            size: 3.0,
        };
        assert!((p.alpha() - 0.25).abs() < 1e-6);
    }
}
