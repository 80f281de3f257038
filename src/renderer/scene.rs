//! Scene building
//!
//! Turns a simulation snapshot into a triangle list in logical screen space.
//! Nothing here mutates game state; presentation-only animation (flicker,
//! jitter, bobbing) is driven by the frame time passed in.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, shade, with_alpha};
use crate::consts::*;
use crate::geom::Rect;
use crate::level::{Facing, Theme, TrapKind};
use crate::settings::Settings;
use crate::sim::{GameState, Particle, Platform, PlatformBehavior, Player, Trap, World};

/// Horizontal slack when culling world objects against the view
const CULL_MARGIN: f32 = 150.0;
/// Bevel strip thickness on platforms
const BEVEL: f32 = 4.0;
/// Spacing of procedural background decorations
const DECOR_SLOT: f32 = 160.0;

/// Build the full frame
pub fn build(world: &World, state: &GameState, settings: &Settings, time_ms: f64) -> Vec<Vertex> {
    let mut scene = Scene::new(world, settings, time_ms);
    scene.background(world);
    for (index, platform) in world.level.platforms.iter().enumerate() {
        scene.platform(index, platform);
    }
    for trap in &world.level.traps {
        scene.trap(trap);
    }
    scene.goal(world.level.goal);
    scene.player(&world.player);
    scene.particles(&world.particles);
    if state.show_start_screen || state.is_paused || state.level_complete || state.game_complete {
        shapes::rect(
            &mut scene.out,
            Rect::new(0.0, 0.0, VIEW_WIDTH, VIEW_HEIGHT),
            colors::OVERLAY,
        );
    }
    scene.out
}

struct Scene<'a> {
    out: Vec<Vertex>,
    settings: &'a Settings,
    /// World to screen translation (camera and shake)
    offset: Vec2,
    camera_x: f32,
    /// Seconds, for presentation animation
    t: f32,
}

impl<'a> Scene<'a> {
    fn new(world: &World, settings: &'a Settings, time_ms: f64) -> Self {
        let shake = if settings.effective_screen_shake() {
            world.shake.offset
        } else {
            Vec2::ZERO
        };
        Self {
            out: Vec::with_capacity(4096),
            settings,
            offset: Vec2::new(-world.camera.x, -world.camera.y) + shake,
            camera_x: world.camera.x,
            t: (time_ms / 1000.0) as f32,
        }
    }

    fn to_screen(&self, r: Rect) -> Rect {
        Rect::new(r.x + self.offset.x, r.y + self.offset.y, r.width, r.height)
    }

    fn visible(&self, r: &Rect) -> bool {
        r.right() >= self.camera_x - CULL_MARGIN
            && r.x <= self.camera_x + VIEW_WIDTH + CULL_MARGIN
    }

    fn animate(&self) -> bool {
        !self.settings.reduced_motion
    }

    // === Background ===

    fn background(&mut self, world: &World) {
        let [r, g, b] = world.level.background_color;
        let top = [r, g, b, 1.0];
        shapes::rect_gradient(
            &mut self.out,
            Rect::new(0.0, 0.0, VIEW_WIDTH, VIEW_HEIGHT),
            top,
            shade(top, -0.08),
        );

        let layers = self.settings.quality.parallax_layers();
        for layer in 0..layers {
            let factor = 0.2 + 0.3 * layer as f32;
            let tint = shade(top, 0.04 + 0.04 * layer as f32);
            self.parallax_layer(world.level.theme, layer as u32, factor, tint);
        }
    }

    /// One row of theme decorations scrolling at `factor` of the camera speed
    fn parallax_layer(&mut self, theme: Theme, layer: u32, factor: f32, tint: [f32; 4]) {
        let scroll = self.camera_x * factor;
        let first = (scroll / DECOR_SLOT).floor() as i32 - 1;
        let last = ((scroll + VIEW_WIDTH) / DECOR_SLOT).floor() as i32 + 1;
        for slot in first..=last {
            let h1 = hash01(slot, layer * 2);
            let h2 = hash01(slot, layer * 2 + 1);
            let x = slot as f32 * DECOR_SLOT + h1 * DECOR_SLOT * 0.6 - scroll;
            let size = 40.0 + h2 * 80.0 + layer as f32 * 30.0;
            let floor = VIEW_HEIGHT;
            match theme {
                Theme::Dungeon => {
                    // Pillars with a capital
                    let w = size * 0.35;
                    shapes::rect(
                        &mut self.out,
                        Rect::new(x, floor - size * 3.0, w, size * 3.0),
                        tint,
                    );
                    shapes::rect(
                        &mut self.out,
                        Rect::new(x - 6.0, floor - size * 3.0, w + 12.0, 10.0),
                        shade(tint, 0.03),
                    );
                }
                Theme::Ice => {
                    // Ice peaks and a stalactite from the ceiling
                    shapes::triangle(
                        &mut self.out,
                        Vec2::new(x, floor),
                        Vec2::new(x + size * 2.0, floor),
                        Vec2::new(x + size, floor - size * 2.5),
                        tint,
                    );
                    shapes::triangle(
                        &mut self.out,
                        Vec2::new(x + size * 0.5, 0.0),
                        Vec2::new(x + size * 0.9, 0.0),
                        Vec2::new(x + size * 0.7, size * 1.2),
                        shade(tint, 0.05),
                    );
                }
                Theme::Volcano => {
                    // Rock spires with rising embers
                    shapes::triangle(
                        &mut self.out,
                        Vec2::new(x, floor),
                        Vec2::new(x + size * 1.2, floor),
                        Vec2::new(x + size * 0.5, floor - size * 3.0),
                        tint,
                    );
                    let rise = if self.animate() {
                        (self.t * 40.0 + h2 * VIEW_HEIGHT) % VIEW_HEIGHT
                    } else {
                        h2 * VIEW_HEIGHT
                    };
                    shapes::circle(
                        &mut self.out,
                        Vec2::new(x + size * 0.5, VIEW_HEIGHT - rise),
                        2.0,
                        with_alpha(colors::LAVA_GLOW, 0.6),
                        self.settings.quality.circle_segments().min(6),
                    );
                }
            }
        }
    }

    // === Platforms ===

    fn platform(&mut self, index: usize, platform: &Platform) {
        if !platform.is_solid() || !self.visible(&platform.rect) {
            return;
        }
        let mut r = self.to_screen(platform.rect);
        let alpha = platform.alpha();

        let base = match platform.behavior {
            PlatformBehavior::Normal => colors::STONE,
            PlatformBehavior::Ice => colors::ICE,
            PlatformBehavior::Collapsing { collapsing, .. } => {
                if collapsing && self.animate() {
                    r.x += (self.t * 60.0 + index as f32 * 1.7).sin() * 2.0;
                }
                colors::CRUMBLING
            }
            PlatformBehavior::Disappearing { .. } => colors::GHOST,
            PlatformBehavior::Lava { .. } => colors::LAVA,
        };
        let base = with_alpha(base, alpha);

        if matches!(platform.behavior, PlatformBehavior::Lava { .. }) {
            shapes::rect_gradient(&mut self.out, r, colors::LAVA_GLOW, base);
            return;
        }
        self.beveled(r, base);
    }

    /// Face plus lit top/left and shaded bottom/right edges
    fn beveled(&mut self, r: Rect, base: [f32; 4]) {
        let light = shade(base, 0.15);
        let dark = shade(base, -0.2);
        let b = BEVEL.min(r.height / 3.0).min(r.width / 3.0);
        shapes::rect(&mut self.out, r, base);
        shapes::rect(&mut self.out, Rect::new(r.x, r.y, r.width, b), light);
        shapes::rect(&mut self.out, Rect::new(r.x, r.y + b, b, r.height - b), light);
        shapes::rect(
            &mut self.out,
            Rect::new(r.x + b, r.bottom() - b, r.width - b, b),
            dark,
        );
        shapes::rect(
            &mut self.out,
            Rect::new(r.right() - b, r.y + b, b, r.height - 2.0 * b),
            dark,
        );
    }

    // === Traps ===

    fn trap(&mut self, trap: &Trap) {
        if trap.is_hidden {
            return;
        }
        let reach = Rect::new(
            trap.rect.x - trap.rect.height,
            trap.rect.y,
            trap.rect.width + 2.0 * trap.rect.height,
            trap.rect.height,
        );
        if !self.visible(&reach) {
            return;
        }
        let r = self.to_screen(trap.rect);
        match trap.kind {
            TrapKind::FloorSpike => shapes::spikes(&mut self.out, r, Vec2::NEG_Y, 10.0, colors::STEEL),
            TrapKind::CeilingSpike => shapes::spikes(&mut self.out, r, Vec2::Y, 10.0, colors::STEEL),
            TrapKind::WallSpike { direction } => {
                let dir = match direction {
                    Facing::Left => Vec2::NEG_X,
                    Facing::Right => Vec2::X,
                };
                shapes::spikes(&mut self.out, r, dir, 10.0, colors::STEEL);
            }
            TrapKind::FallingSpike { .. } => {
                shapes::triangle(
                    &mut self.out,
                    Vec2::new(r.x, r.y),
                    Vec2::new(r.right(), r.y),
                    Vec2::new(r.center().x, r.bottom()),
                    colors::STEEL,
                );
            }
            TrapKind::SwingingBlade { .. } => self.blade(trap),
            TrapKind::Guillotine { .. } => self.guillotine(trap, r),
            TrapKind::FreezeZone => self.freeze_zone(trap, r),
            TrapKind::FireBurst => self.fire(trap, r),
        }
    }

    fn blade(&mut self, trap: &Trap) {
        let pivot = trap.pivot() + self.offset;
        let tip = trap.blade_tip() + self.offset;
        let w = trap.rect.width;
        shapes::line(&mut self.out, pivot, tip, 3.0, colors::CHAIN);
        shapes::circle(&mut self.out, pivot, 5.0, colors::CHAIN, 8);
        // Blade square turned with the arm
        shapes::rotated_rect(
            &mut self.out,
            tip,
            Vec2::splat(-w / 2.0),
            Vec2::splat(w),
            -trap.swing_angle(),
            colors::STEEL,
        );
        shapes::rotated_rect(
            &mut self.out,
            tip,
            Vec2::new(-w / 2.0, w / 2.0 - 3.0),
            Vec2::new(w, 3.0),
            -trap.swing_angle(),
            shade(colors::STEEL, 0.2),
        );
    }

    fn guillotine(&mut self, trap: &Trap, r: Rect) {
        let blade = Rect::new(r.x, r.y + trap.drop, r.width, r.height);
        // Housing beam and the chain down to the blade
        shapes::rect(
            &mut self.out,
            Rect::new(r.x - 6.0, r.y - 8.0, r.width + 12.0, 8.0),
            colors::CHAIN,
        );
        if trap.drop > 0.0 {
            let x = r.center().x;
            shapes::line(
                &mut self.out,
                Vec2::new(x, r.y),
                Vec2::new(x, blade.y),
                2.0,
                colors::CHAIN,
            );
        }
        shapes::rect(&mut self.out, blade, colors::STEEL);
        shapes::rect(
            &mut self.out,
            Rect::new(blade.x, blade.bottom() - 4.0, blade.width, 4.0),
            shade(colors::STEEL, 0.2),
        );
    }

    fn freeze_zone(&mut self, trap: &Trap, r: Rect) {
        shapes::rect(&mut self.out, r, colors::FREEZE);
        let flakes = (r.width / 40.0).max(1.0) as i32;
        for i in 0..flakes {
            let h = hash01(i, trap.id);
            let drift = if self.animate() { self.t * 20.0 } else { 0.0 };
            let y = r.y + (h * r.height + drift) % r.height;
            let x = r.x + (i as f32 + 0.5) * r.width / flakes as f32;
            shapes::circle(&mut self.out, Vec2::new(x, y), 2.0, [1.0, 1.0, 1.0, 0.7], 6);
        }
    }

    fn fire(&mut self, trap: &Trap, r: Rect) {
        let nozzle = 8.0_f32.min(r.height);
        shapes::rect(
            &mut self.out,
            Rect::new(r.x, r.bottom() - nozzle, r.width, nozzle),
            colors::FIRE_NOZZLE,
        );
        if !trap.is_active {
            return;
        }
        let flicker = if self.animate() {
            0.85 + 0.15 * (self.t * 25.0 + trap.id as f32).sin()
        } else {
            1.0
        };
        let h = (r.height - nozzle) * flicker;
        shapes::rect_gradient(
            &mut self.out,
            Rect::new(r.x, r.bottom() - nozzle - h, r.width, h),
            colors::FIRE_EDGE,
            colors::FIRE_CORE,
        );
    }

    // === Goal, player, particles ===

    fn goal(&mut self, goal: Rect) {
        if !self.visible(&goal) {
            return;
        }
        let mut r = self.to_screen(goal);
        if self.animate() {
            r.y += (self.t * 3.0).sin() * 3.0;
        }
        let segments = self.settings.quality.circle_segments();
        shapes::circle_gradient(
            &mut self.out,
            r.center(),
            r.width.max(r.height) * 0.8,
            colors::GOAL_HALO,
            colors::GOAL_GLOW,
            segments,
        );
        // Chest: body, lid and lock
        let lid = r.height * 0.35;
        let body = Rect::new(r.x, r.y + lid, r.width, r.height - lid);
        shapes::rect(&mut self.out, body, shade(colors::GOAL, -0.25));
        shapes::rect(&mut self.out, Rect::new(r.x, r.y, r.width, lid), colors::GOAL);
        shapes::rect(
            &mut self.out,
            Rect::centered(Vec2::new(r.center().x, r.y + lid), 8.0, 10.0),
            shade(colors::GOAL, -0.5),
        );
    }

    fn player(&mut self, player: &Player) {
        let r = self.to_screen(player.rect());
        if player.is_dead {
            // Flash while waiting to respawn
            if ((self.t * 10.0) as i32) % 2 == 0 {
                shapes::rect(&mut self.out, r, colors::PLAYER_DEAD);
            }
            return;
        }

        let walking = player.is_grounded && player.vel.x.abs() > VELOCITY_SNAP;
        let stride = if walking {
            [0.0, 3.0, 0.0, -3.0][(player.animation_frame % ANIMATION_FRAMES) as usize]
        } else {
            0.0
        };
        let leg_h = r.height * 0.3;
        let leg_w = r.width * 0.3;
        let legs_y = r.bottom() - leg_h;
        shapes::rect(
            &mut self.out,
            Rect::new(r.x + r.width * 0.15 + stride, legs_y, leg_w, leg_h),
            colors::PLAYER_LEGS,
        );
        shapes::rect(
            &mut self.out,
            Rect::new(r.right() - r.width * 0.15 - leg_w - stride, legs_y, leg_w, leg_h),
            colors::PLAYER_LEGS,
        );

        let torso = Rect::new(r.x, r.y + r.height * 0.3, r.width, r.height * 0.4);
        shapes::rect(&mut self.out, torso, colors::PLAYER_BODY);
        shapes::rect(
            &mut self.out,
            Rect::new(torso.x + 4.0, torso.y + 3.0, torso.width - 8.0, torso.height - 6.0),
            colors::PLAYER_ARMOR,
        );

        let head = Rect::new(r.x + r.width * 0.2, r.y, r.width * 0.6, r.height * 0.3);
        shapes::rect(&mut self.out, head, colors::PLAYER_SKIN);
        shapes::rect(
            &mut self.out,
            Rect::new(head.x - 2.0, head.y, head.width + 4.0, 4.0),
            colors::PLAYER_ARMOR,
        );
        let eye_x = if player.facing_right {
            head.right() - 6.0
        } else {
            head.x + 3.0
        };
        shapes::rect(
            &mut self.out,
            Rect::new(eye_x, head.y + 5.0, 3.0, 3.0),
            [0.0, 0.0, 0.0, 1.0],
        );
    }

    fn particles(&mut self, particles: &[Particle]) {
        let cap = self.settings.max_particles();
        let segments = self.settings.quality.circle_segments().min(8);
        for p in particles.iter().take(cap) {
            let color = with_alpha(p.color, p.alpha());
            shapes::circle(&mut self.out, p.pos + self.offset, p.size / 2.0, color, segments);
        }
    }
}

/// Stable pseudo-random value in [0, 1) for decoration placement
fn hash01(i: i32, salt: u32) -> f32 {
    let mut h = (i as u32).wrapping_mul(0x9E37_79B9) ^ salt.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    (h & 0xFFFF) as f32 / 65536.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{LevelTemplate, PlatformKind, PlatformSpec, TrapSpec};
    use crate::sim::SessionId;

    fn template(platforms: Vec<PlatformSpec>, traps: Vec<TrapSpec>) -> LevelTemplate {
        LevelTemplate {
            id: 1,
            name: "Scene".into(),
            theme: Theme::Dungeon,
            platforms,
            traps,
            start_position: Vec2::new(50.0, 460.0),
            goal: Rect::new(700.0, 420.0, 50.0, 80.0),
            background_color: [0.1, 0.1, 0.1],
        }
    }

    fn playing() -> GameState {
        GameState {
            show_start_screen: false,
            is_playing: true,
            ..Default::default()
        }
    }

    fn count(world: &World, settings: &Settings) -> usize {
        build(world, &playing(), settings, 0.0).len()
    }

    fn floor() -> PlatformSpec {
        PlatformSpec::new(PlatformKind::Normal, 0.0, 500.0, 800.0, 100.0)
    }

    #[test]
    fn test_all_vertices_finite() {
        for level in crate::level::LevelSet::builtin().unwrap().iter() {
            let world = World::new(level, SessionId(1));
            let settings = Settings {
                quality: crate::settings::QualityPreset::High,
                ..Default::default()
            };
            let verts = build(&world, &GameState::default(), &settings, 12_345.0);
            assert!(!verts.is_empty());
            assert_eq!(verts.len() % 3, 0);
            for v in verts {
                assert!(v.position.iter().chain(v.color.iter()).all(|c| c.is_finite()));
            }
        }
    }

    #[test]
    fn test_hidden_trap_not_drawn() {
        let spike = TrapSpec::new(1, TrapKind::FloorSpike, 200.0, 480.0, 40.0, 20.0);
        let settings = Settings::default();
        let bare = World::new(&template(vec![floor()], vec![]), SessionId(1));
        let hidden = World::new(&template(vec![floor()], vec![spike.hidden()]), SessionId(1));
        let shown = World::new(&template(vec![floor()], vec![spike]), SessionId(1));
        assert_eq!(count(&bare, &settings), count(&hidden, &settings));
        assert!(count(&shown, &settings) > count(&bare, &settings));
    }

    #[test]
    fn test_vanished_platform_not_drawn() {
        let ghost = PlatformSpec::new(PlatformKind::Disappearing, 300.0, 400.0, 100.0, 20.0);
        let settings = Settings::default();
        let mut world = World::new(&template(vec![floor(), ghost], vec![]), SessionId(1));
        let before = count(&world, &settings);
        world.level.platforms[1].behavior = PlatformBehavior::Disappearing {
            touched: true,
            visible: false,
            timer_ms: 1200.0,
        };
        assert!(count(&world, &settings) < before);
    }

    #[test]
    fn test_particles_respect_settings() {
        let mut world = World::new(&template(vec![floor()], vec![]), SessionId(1));
        let mut settings = Settings::default();
        settings.particles = false;
        let without = count(&world, &settings);
        world.particles = (0..50)
            .map(|i| Particle {
                pos: Vec2::new(i as f32 * 10.0, 300.0),
                vel: Vec2::ZERO,
                life: 20.0,
                max_life: 40.0,
                color: [1.0, 0.5, 0.1, 1.0],
                size: 4.0,
            })
            .collect();
        assert_eq!(count(&world, &settings), without);

        settings.particles = true;
        let segments = settings.quality.circle_segments().min(8) as usize;
        let capped = settings.max_particles().min(50);
        assert_eq!(count(&world, &settings), without + capped * segments * 3);
    }

    #[test]
    fn test_camera_scrolls_world() {
        let far = PlatformSpec::new(PlatformKind::Normal, 1000.0, 300.0, 100.0, 20.0);
        let settings = Settings::default();
        let mut world = World::new(&template(vec![far], vec![]), SessionId(1));
        world.camera.x = 1000.0;
        let mut scene = Scene::new(&world, &settings, 0.0);
        scene.platform(0, &world.level.platforms[0]);
        assert_eq!(scene.out[0].position, [0.0, 300.0]);
    }

    #[test]
    fn test_reduced_motion_ignores_shake() {
        let mut world = World::new(&template(vec![floor()], vec![]), SessionId(1));
        world.shake.offset = Vec2::new(7.0, -3.0);
        let mut settings = Settings::default();

        let shaken = Scene::new(&world, &settings, 0.0);
        assert_eq!(shaken.offset, Vec2::new(7.0, -3.0));

        settings.reduced_motion = true;
        let calm = Scene::new(&world, &settings, 0.0);
        assert_eq!(calm.offset, Vec2::ZERO);
    }

    #[test]
    fn test_overlay_only_when_not_running() {
        let world = World::new(&template(vec![floor()], vec![]), SessionId(1));
        let settings = Settings::default();
        let running = build(&world, &playing(), &settings, 0.0).len();
        let paused = GameState {
            is_paused: true,
            ..playing()
        };
        assert_eq!(build(&world, &paused, &settings, 0.0).len(), running + 6);
    }

    #[test]
    fn test_dead_player_flashes() {
        let mut world = World::new(&template(vec![floor()], vec![]), SessionId(1));
        world.player.is_dead = true;
        let settings = Settings::default();
        let on = build(&world, &playing(), &settings, 0.0).len();
        let off = build(&world, &playing(), &settings, 100.0).len();
        assert_eq!(on, off + 6);
    }
}
