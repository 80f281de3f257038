//! Built-in level set
//!
//! Geometry assumes a 30x40 player with a ~140px jump apex and ~180px jump
//! range at full run speed.

use glam::Vec2;

use super::{Facing, LevelTemplate, PlatformKind, PlatformSpec, Theme, TrapKind, TrapSpec};
use crate::geom::Rect;

use PlatformKind::*;

fn p(kind: PlatformKind, x: f32, y: f32, width: f32, height: f32) -> PlatformSpec {
    PlatformSpec::new(kind, x, y, width, height)
}

pub fn builtin_levels() -> Vec<LevelTemplate> {
    vec![dungeon_entrance(), frozen_caverns(), volcano_core()]
}

fn dungeon_entrance() -> LevelTemplate {
    LevelTemplate {
        id: 1,
        name: "Dungeon Entrance".into(),
        theme: Theme::Dungeon,
        platforms: vec![
            p(Normal, 0.0, 500.0, 400.0, 100.0),
            p(Normal, 520.0, 500.0, 300.0, 100.0),
            p(Collapsing, 880.0, 430.0, 120.0, 20.0),
            p(Normal, 1060.0, 500.0, 300.0, 100.0),
            p(Ice, 1420.0, 500.0, 350.0, 100.0),
            p(Disappearing, 1830.0, 420.0, 120.0, 20.0),
            p(Normal, 2010.0, 500.0, 420.0, 100.0),
        ],
        traps: vec![
            TrapSpec::new(1, TrapKind::FloorSpike, 300.0, 480.0, 40.0, 20.0),
            TrapSpec::new(2, TrapKind::FloorSpike, 660.0, 480.0, 40.0, 20.0).hidden(),
            TrapSpec::new(
                3,
                TrapKind::SwingingBlade {
                    swing_speed: 0.05,
                    angle: 0.0,
                },
                1195.0,
                300.0,
                30.0,
                150.0,
            ),
            TrapSpec::new(4, TrapKind::CeilingSpike, 1580.0, 380.0, 40.0, 20.0),
            TrapSpec::new(5, TrapKind::FireBurst, 2160.0, 440.0, 30.0, 60.0),
        ],
        start_position: Vec2::new(50.0, 440.0),
        goal: Rect::new(2340.0, 420.0, 50.0, 80.0),
        background_color: [0.10, 0.09, 0.14],
    }
}

fn frozen_caverns() -> LevelTemplate {
    LevelTemplate {
        id: 2,
        name: "Frozen Caverns".into(),
        theme: Theme::Ice,
        platforms: vec![
            p(Normal, 0.0, 500.0, 300.0, 100.0),
            p(Ice, 360.0, 500.0, 400.0, 100.0),
            p(Ice, 820.0, 440.0, 160.0, 20.0),
            p(Disappearing, 1040.0, 380.0, 120.0, 20.0),
            p(Normal, 1220.0, 500.0, 260.0, 100.0),
            p(Collapsing, 1540.0, 430.0, 100.0, 20.0),
            p(Collapsing, 1700.0, 380.0, 100.0, 20.0),
            p(Ice, 1860.0, 500.0, 500.0, 100.0),
            p(Normal, 2420.0, 500.0, 300.0, 100.0),
        ],
        traps: vec![
            TrapSpec::new(1, TrapKind::FreezeZone, 400.0, 380.0, 200.0, 120.0),
            TrapSpec::new(
                2,
                TrapKind::FallingSpike { speed: 10.0 },
                900.0,
                60.0,
                30.0,
                40.0,
            )
            .with_trigger(60.0, 0.0),
            TrapSpec::new(
                3,
                TrapKind::WallSpike {
                    direction: Facing::Left,
                },
                1460.0,
                440.0,
                20.0,
                60.0,
            ),
            TrapSpec::new(4, TrapKind::FloorSpike, 1300.0, 480.0, 40.0, 20.0).hidden(),
            TrapSpec::new(5, TrapKind::FreezeZone, 1900.0, 360.0, 250.0, 140.0),
            TrapSpec::new(
                6,
                TrapKind::FallingSpike { speed: 12.0 },
                2250.0,
                40.0,
                30.0,
                40.0,
            )
            .with_trigger(80.0, 0.0),
            TrapSpec::new(7, TrapKind::CeilingSpike, 2500.0, 400.0, 40.0, 20.0)
                .hidden()
                .with_trigger(120.0, 300.0),
        ],
        start_position: Vec2::new(40.0, 440.0),
        goal: Rect::new(2640.0, 420.0, 50.0, 80.0),
        background_color: [0.08, 0.12, 0.20],
    }
}

fn volcano_core() -> LevelTemplate {
    LevelTemplate {
        id: 3,
        name: "Volcano Core".into(),
        theme: Theme::Volcano,
        platforms: vec![
            p(Normal, 0.0, 500.0, 320.0, 100.0),
            p(Lava, 380.0, 470.0, 140.0, 30.0),
            p(Collapsing, 580.0, 420.0, 110.0, 20.0),
            p(Normal, 750.0, 500.0, 280.0, 100.0),
            p(Lava, 1090.0, 460.0, 120.0, 30.0),
            p(Disappearing, 1270.0, 400.0, 110.0, 20.0),
            p(Normal, 1440.0, 500.0, 400.0, 100.0),
            p(Collapsing, 1900.0, 440.0, 100.0, 20.0),
            p(Lava, 2060.0, 460.0, 120.0, 30.0),
            p(Normal, 2240.0, 500.0, 420.0, 100.0),
        ],
        traps: vec![
            TrapSpec::new(1, TrapKind::FireBurst, 200.0, 440.0, 30.0, 60.0),
            TrapSpec::new(
                2,
                TrapKind::Guillotine { travel: 110.0 },
                880.0,
                300.0,
                40.0,
                40.0,
            ),
            TrapSpec::new(
                3,
                TrapKind::SwingingBlade {
                    swing_speed: 0.07,
                    angle: 1.0,
                },
                1560.0,
                300.0,
                30.0,
                150.0,
            ),
            TrapSpec::new(
                4,
                TrapKind::Guillotine { travel: 110.0 },
                1720.0,
                300.0,
                40.0,
                40.0,
            ),
            TrapSpec::new(5, TrapKind::FloorSpike, 2350.0, 480.0, 40.0, 20.0)
                .hidden()
                .with_trigger(100.0, 150.0),
            TrapSpec::new(
                6,
                TrapKind::FallingSpike { speed: 10.0 },
                2480.0,
                40.0,
                30.0,
                40.0,
            )
            .with_trigger(70.0, 0.0),
            TrapSpec::new(7, TrapKind::FireBurst, 2540.0, 440.0, 30.0, 60.0),
        ],
        start_position: Vec2::new(40.0, 440.0),
        goal: Rect::new(2590.0, 420.0, 50.0, 80.0),
        background_color: [0.16, 0.06, 0.05],
    }
}
