//! Treasure Run - the trap-filled platformer stage of the treasure hunt
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, traps, timers)
//! - `level`: Level templates, validation and the built-in level set
//! - `game`: Game state machine and fixed-step driver
//! - `renderer`: Scene building and WebGPU rendering pipeline
//! - `platform`: Browser host and input mapping

pub mod audio;
pub mod game;
pub mod geom;
pub mod level;
pub mod platform;
pub mod records;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use geom::Rect;
pub use level::{LevelError, LevelSet, LevelTemplate};
pub use records::BestRuns;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz, one tick per display frame)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Logical drawing resolution
    pub const VIEW_WIDTH: f32 = 800.0;
    pub const VIEW_HEIGHT: f32 = 600.0;
    /// Falling this far below the playfield kills the player
    pub const FALL_MARGIN: f32 = 100.0;

    /// Player hitbox
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;

    /// Kinematics, all per tick
    pub const GRAVITY: f32 = 0.8;
    pub const MAX_FALL_SPEED: f32 = 15.0;
    pub const MOVE_SPEED: f32 = 5.0;
    pub const JUMP_FORCE: f32 = -15.0;
    pub const FRICTION: f32 = 0.85;
    pub const ICE_FRICTION: f32 = 0.98;
    /// Horizontal speed below which friction snaps velocity to zero
    pub const VELOCITY_SNAP: f32 = 0.1;
    /// Speed multiplier inside an active freeze zone
    pub const FREEZE_FACTOR: f32 = 0.4;
    /// Slack when deciding whether the player came from above a platform
    pub const LANDING_TOLERANCE: f32 = 10.0;

    /// Platform timings (ms)
    pub const COLLAPSE_DELAY_MS: f32 = 500.0;
    pub const DISAPPEAR_DELAY_MS: f32 = 1000.0;
    /// Lava surface bob
    pub const LAVA_BOB_AMPLITUDE: f32 = 5.0;
    pub const LAVA_BOB_RATE: f32 = 0.002;

    /// Trap defaults applied at level load
    pub const DEFAULT_TRIGGER_DISTANCE: f32 = 100.0;
    pub const DEFAULT_ACTIVATION_DELAY_MS: f32 = 200.0;
    pub const DEFAULT_SWING_SPEED: f32 = 0.05;
    pub const DEFAULT_FALL_SPEED: f32 = 10.0;
    /// Maximum pendulum deflection of a swinging blade (radians)
    pub const BLADE_SWING_ARC: f32 = std::f32::consts::FRAC_PI_3;
    /// Guillotine drop/rise cycle, in ticks
    pub const GUILLOTINE_CYCLE_TICKS: u32 = 180;
    /// Fire burst on/off half period, in ticks
    pub const FIRE_HALF_PERIOD_TICKS: u32 = 60;

    /// Death handling
    pub const RESPAWN_DELAY_MS: f32 = 1000.0;
    pub const DEATH_PARTICLES: usize = 30;
    pub const DEATH_SHAKE: f32 = 10.0;
    pub const SHAKE_DECAY: f32 = 0.9;
    pub const SHAKE_EPSILON: f32 = 0.1;
    pub const PARTICLE_GRAVITY: f32 = 0.2;

    /// Camera follow smoothing factor (lerp t per tick)
    pub const CAMERA_SMOOTHING: f32 = 0.1;

    /// Walk cycle
    pub const ANIMATION_FRAME_MS: f32 = 100.0;
    pub const ANIMATION_FRAMES: u32 = 4;

    /// Number of levels in a run
    pub const LEVEL_COUNT: u32 = 3;
}
