//! Level templates
//!
//! Templates are immutable descriptions of a level. Optional trap parameters
//! are resolved to explicit values when a template is built or deserialized,
//! and every template is validated before a game may use it.

pub mod data;

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::geom::{Rect, rects_intersect};

/// Visual theme of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Dungeon,
    Ice,
    Volcano,
}

/// Platform surface types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    #[default]
    Normal,
    /// Low friction
    Ice,
    /// Falls away shortly after the first landing
    Collapsing,
    /// Fades out after the first touch
    Disappearing,
    /// Bobs up and down
    Lava,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(rename = "type", default)]
    pub kind: PlatformKind,
}

impl PlatformSpec {
    pub const fn new(kind: PlatformKind, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            kind,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Which way a wall spike points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

fn default_swing_speed() -> f32 {
    DEFAULT_SWING_SPEED
}

fn default_fall_speed() -> f32 {
    DEFAULT_FALL_SPEED
}

fn default_guillotine_travel() -> f32 {
    120.0
}

fn default_trigger_distance() -> f32 {
    DEFAULT_TRIGGER_DISTANCE
}

fn default_activation_delay() -> f32 {
    DEFAULT_ACTIVATION_DELAY_MS
}

/// Trap types with their behavior parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrapKind {
    FloorSpike,
    CeilingSpike,
    WallSpike {
        #[serde(default)]
        direction: Facing,
    },
    /// Pendulum hanging from the top-center of its rect; `height` is the arm length
    SwingingBlade {
        #[serde(default = "default_swing_speed")]
        swing_speed: f32,
        /// Initial phase (radians)
        #[serde(default)]
        angle: f32,
    },
    /// Blade that drops `travel` pixels and rises again on a fixed cycle
    Guillotine {
        #[serde(default = "default_guillotine_travel")]
        travel: f32,
    },
    /// Slows the player, never kills
    FreezeZone,
    /// Toggles on and off on a fixed half period
    FireBurst,
    /// Drops at `speed` px/tick once the player passes beneath
    FallingSpike {
        #[serde(default = "default_fall_speed")]
        speed: f32,
    },
}

impl TrapKind {
    pub fn is_lethal(&self) -> bool {
        !matches!(self, TrapKind::FreezeZone)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrapSpec {
    /// Unique within the level
    pub id: u32,
    #[serde(flatten)]
    pub kind: TrapKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Hidden traps stay inert until the player comes close
    #[serde(default)]
    pub hidden: bool,
    #[serde(default = "default_trigger_distance")]
    pub trigger_distance: f32,
    #[serde(default = "default_activation_delay")]
    pub activation_delay_ms: f32,
}

impl TrapSpec {
    /// Visible trap with default trigger parameters
    pub fn new(id: u32, kind: TrapKind, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id,
            kind,
            x,
            y,
            width,
            height,
            hidden: false,
            trigger_distance: DEFAULT_TRIGGER_DISTANCE,
            activation_delay_ms: DEFAULT_ACTIVATION_DELAY_MS,
        }
    }

    /// Mark as hidden until the player comes within `trigger_distance`
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_trigger(mut self, distance: f32, delay_ms: f32) -> Self {
        self.trigger_distance = distance;
        self.activation_delay_ms = delay_ms;
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Immutable level description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTemplate {
    pub id: u32,
    pub name: String,
    pub theme: Theme,
    /// Evaluated in this order during collision
    pub platforms: Vec<PlatformSpec>,
    pub traps: Vec<TrapSpec>,
    pub start_position: Vec2,
    pub goal: Rect,
    /// RGB, 0-1
    pub background_color: [f32; 3],
}

impl LevelTemplate {
    /// Reject data that would produce an unplayable or inconsistent level
    pub fn validate(&self) -> Result<(), LevelError> {
        let level = self.id;

        if self.platforms.is_empty() {
            return Err(LevelError::NoPlatforms { level });
        }
        for (index, platform) in self.platforms.iter().enumerate() {
            if !finite_rect(&platform.rect()) || platform.rect().is_degenerate() {
                return Err(LevelError::BadPlatform { level, index });
            }
        }

        let mut seen = Vec::with_capacity(self.traps.len());
        for trap in &self.traps {
            if seen.contains(&trap.id) {
                return Err(LevelError::DuplicateTrapId { level, id: trap.id });
            }
            seen.push(trap.id);

            let bad = |reason| LevelError::BadTrap {
                level,
                id: trap.id,
                reason,
            };
            if !finite_rect(&trap.rect()) || trap.rect().is_degenerate() {
                return Err(bad("non-positive size"));
            }
            if !(trap.trigger_distance.is_finite() && trap.trigger_distance > 0.0) {
                return Err(bad("trigger distance must be positive"));
            }
            if !(trap.activation_delay_ms.is_finite() && trap.activation_delay_ms >= 0.0) {
                return Err(bad("activation delay must be non-negative"));
            }
            match trap.kind {
                TrapKind::SwingingBlade { swing_speed, angle } => {
                    if !swing_speed.is_finite() || !angle.is_finite() {
                        return Err(bad("swing parameters must be finite"));
                    }
                }
                TrapKind::Guillotine { travel } if !(travel.is_finite() && travel >= 0.0) => {
                    return Err(bad("guillotine travel must be non-negative"));
                }
                TrapKind::FallingSpike { speed } if !(speed.is_finite() && speed > 0.0) => {
                    return Err(bad("fall speed must be positive"));
                }
                _ => {}
            }
        }

        let start = self.start_position;
        if !start.is_finite() || start.x < 0.0 || start.y < 0.0 || start.y >= VIEW_HEIGHT {
            return Err(LevelError::StartOutOfBounds { level });
        }
        if !finite_rect(&self.goal)
            || self.goal.is_degenerate()
            || self.goal.y < 0.0
            || self.goal.bottom() > VIEW_HEIGHT
        {
            return Err(LevelError::GoalOutOfBounds { level });
        }
        let spawn = Rect::new(start.x, start.y, PLAYER_WIDTH, PLAYER_HEIGHT);
        if rects_intersect(&spawn, &self.goal) {
            return Err(LevelError::StartInsideGoal { level });
        }

        Ok(())
    }
}

fn finite_rect(r: &Rect) -> bool {
    r.x.is_finite() && r.y.is_finite() && r.width.is_finite() && r.height.is_finite()
}

/// The ordered, validated set of levels for one run
#[derive(Debug, Clone)]
pub struct LevelSet {
    levels: Vec<LevelTemplate>,
}

impl LevelSet {
    /// Validate and wrap exactly `LEVEL_COUNT` templates with ids 1..=N in order
    pub fn new(levels: Vec<LevelTemplate>) -> Result<Self, LevelError> {
        if levels.len() != LEVEL_COUNT as usize {
            return Err(LevelError::WrongLevelCount {
                expected: LEVEL_COUNT as usize,
                found: levels.len(),
            });
        }
        for (index, level) in levels.iter().enumerate() {
            if level.id != index as u32 + 1 {
                return Err(LevelError::LevelIdMismatch { index, id: level.id });
            }
            level.validate()?;
        }
        Ok(Self { levels })
    }

    /// Parse a JSON array of level templates
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let levels: Vec<LevelTemplate> =
            serde_json::from_str(json).map_err(|e| LevelError::Parse(e.to_string()))?;
        Self::new(levels)
    }

    /// The three shipped levels, validated like any other set
    pub fn builtin() -> Result<Self, LevelError> {
        Self::new(data::builtin_levels())
    }

    /// Level 1; a set always holds `LEVEL_COUNT` levels
    pub fn first(&self) -> &LevelTemplate {
        &self.levels[0]
    }

    /// Template by 1-based level id
    pub fn get(&self, id: u32) -> Option<&LevelTemplate> {
        id.checked_sub(1).and_then(|i| self.levels.get(i as usize))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelTemplate> {
        self.levels.iter()
    }
}

/// Malformed level data
#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    WrongLevelCount { expected: usize, found: usize },
    LevelIdMismatch { index: usize, id: u32 },
    NoPlatforms { level: u32 },
    BadPlatform { level: u32, index: usize },
    DuplicateTrapId { level: u32, id: u32 },
    BadTrap { level: u32, id: u32, reason: &'static str },
    StartOutOfBounds { level: u32 },
    GoalOutOfBounds { level: u32 },
    StartInsideGoal { level: u32 },
    Parse(String),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::WrongLevelCount { expected, found } => {
                write!(f, "expected {expected} levels, found {found}")
            }
            LevelError::LevelIdMismatch { index, id } => {
                write!(f, "level at position {index} has id {id}, expected {}", index + 1)
            }
            LevelError::NoPlatforms { level } => write!(f, "level {level} has no platforms"),
            LevelError::BadPlatform { level, index } => {
                write!(f, "level {level} platform {index} has invalid geometry")
            }
            LevelError::DuplicateTrapId { level, id } => {
                write!(f, "level {level} reuses trap id {id}")
            }
            LevelError::BadTrap { level, id, reason } => {
                write!(f, "level {level} trap {id}: {reason}")
            }
            LevelError::StartOutOfBounds { level } => {
                write!(f, "level {level} start position is outside the playfield")
            }
            LevelError::GoalOutOfBounds { level } => {
                write!(f, "level {level} goal is outside the playfield")
            }
            LevelError::StartInsideGoal { level } => {
                write!(f, "level {level} starts inside its goal")
            }
            LevelError::Parse(msg) => write!(f, "invalid level data: {msg}"),
        }
    }
}

impl std::error::Error for LevelError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(id: u32) -> LevelTemplate {
        LevelTemplate {
            id,
            name: format!("Test {id}"),
            theme: Theme::Dungeon,
            platforms: vec![PlatformSpec::new(PlatformKind::Normal, 0.0, 500.0, 400.0, 40.0)],
            traps: vec![],
            start_position: Vec2::new(50.0, 400.0),
            goal: Rect::new(350.0, 440.0, 40.0, 60.0),
            background_color: [0.1, 0.1, 0.15],
        }
    }

    #[test]
    fn test_builtin_levels_validate() {
        let set = LevelSet::builtin().unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get(1).map(|l| l.id), Some(1));
        assert!(set.get(0).is_none());
        assert!(set.get(4).is_none());
    }

    #[test]
    fn test_wrong_level_count_rejected() {
        let err = LevelSet::new(vec![minimal(1), minimal(2)]).unwrap_err();
        assert_eq!(
            err,
            LevelError::WrongLevelCount {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_out_of_order_ids_rejected() {
        let err = LevelSet::new(vec![minimal(1), minimal(3), minimal(2)]).unwrap_err();
        assert_eq!(err, LevelError::LevelIdMismatch { index: 1, id: 3 });
    }

    #[test]
    fn test_duplicate_trap_id_rejected() {
        let mut level = minimal(1);
        level.traps.push(TrapSpec::new(4, TrapKind::FloorSpike, 100.0, 480.0, 30.0, 20.0));
        level.traps.push(TrapSpec::new(4, TrapKind::FireBurst, 200.0, 460.0, 30.0, 40.0));
        assert_eq!(
            level.validate(),
            Err(LevelError::DuplicateTrapId { level: 1, id: 4 })
        );
    }

    #[test]
    fn test_start_inside_goal_rejected() {
        let mut level = minimal(2);
        level.start_position = Vec2::new(355.0, 450.0);
        assert_eq!(level.validate(), Err(LevelError::StartInsideGoal { level: 2 }));
    }

    #[test]
    fn test_goal_below_playfield_rejected() {
        let mut level = minimal(1);
        level.goal = Rect::new(300.0, 580.0, 40.0, 60.0);
        assert_eq!(level.validate(), Err(LevelError::GoalOutOfBounds { level: 1 }));
    }

    #[test]
    fn test_degenerate_platform_rejected() {
        let mut level = minimal(1);
        level.platforms.push(PlatformSpec::new(PlatformKind::Ice, 10.0, 10.0, 0.0, 20.0));
        assert_eq!(
            level.validate(),
            Err(LevelError::BadPlatform { level: 1, index: 1 })
        );
    }

    #[test]
    fn test_json_defaults_resolved_at_load() {
        let json = r#"{
            "id": 7, "type": "swinging_blade",
            "x": 100, "y": 50, "width": 20, "height": 120
        }"#;
        let trap: TrapSpec = serde_json::from_str(json).unwrap();
        assert_eq!(
            trap.kind,
            TrapKind::SwingingBlade {
                swing_speed: DEFAULT_SWING_SPEED,
                angle: 0.0
            }
        );
        assert!(!trap.hidden);
        assert_eq!(trap.trigger_distance, DEFAULT_TRIGGER_DISTANCE);
        assert_eq!(trap.activation_delay_ms, DEFAULT_ACTIVATION_DELAY_MS);
    }

    #[test]
    fn test_level_set_json_roundtrip_validates() {
        let levels: Vec<_> = LevelSet::builtin().unwrap().iter().cloned().collect();
        let json = serde_json::to_string(&levels).unwrap();
        let parsed = LevelSet::from_json(&json).unwrap();
        assert_eq!(parsed.get(3).map(|l| l.name.as_str()), levels.get(2).map(|l| l.name.as_str()));
    }

    #[test]
    fn test_bad_json_reports_parse_error() {
        assert!(matches!(LevelSet::from_json("[{"), Err(LevelError::Parse(_))));
    }
}
