//! Game controller
//!
//! Owns the run-level state machine, the active level session and the timer
//! queue. These are the only entry points the host page drives:
//! `start_game`, `next_level`, `restart_level`, `restart_game`, plus the
//! per-frame `update`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::level::LevelSet;
use crate::sim::{GameEvent, GameState, SessionId, TickInput, TickOutcome, TimerKind, Timers, World, tick};

pub struct Game {
    levels: LevelSet,
    state: GameState,
    world: World,
    timers: Timers,
    rng: Pcg32,
    next_session: u64,
    accumulator: f32,
    events: Vec<GameEvent>,
    /// Simulated play time for the whole run
    run_time_ms: f64,
}

impl Game {
    /// New game on the start screen. Level 1 is loaded as the backdrop.
    pub fn new(levels: LevelSet, seed: u64) -> Self {
        let first = World::new(levels.first(), SessionId(0));
        Self {
            levels,
            state: GameState::default(),
            world: first,
            timers: Timers::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_session: 1,
            accumulator: 0.0,
            events: Vec::new(),
            run_time_ms: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn run_time_ms(&self) -> f64 {
        self.run_time_ms
    }

    pub fn is_game_complete(&self) -> bool {
        self.state.game_complete
    }

    /// Events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Leave the start screen and begin level 1
    pub fn start_game(&mut self) {
        self.state.show_start_screen = false;
        self.state.is_playing = true;
        self.state.is_paused = false;
        self.state.level_complete = false;
        self.state.game_complete = false;
        self.state.current_level = 1;
        self.init_level(1);
    }

    /// Advance past a completed level, or finish the run after the last one.
    /// Ignored while a level is still being played.
    pub fn next_level(&mut self) {
        if self.state.game_complete || !self.state.level_complete {
            return;
        }
        if self.state.current_level >= LEVEL_COUNT {
            self.state.game_complete = true;
            self.state.is_playing = false;
            log::info!(
                "Run complete: {} deaths in {:.1}s",
                self.state.deaths,
                self.run_time_ms / 1000.0
            );
            return;
        }
        self.state.current_level += 1;
        self.state.level_complete = false;
        self.init_level(self.state.current_level);
    }

    /// Replay the current level from its template; deaths are kept
    pub fn restart_level(&mut self) {
        if self.state.game_complete {
            return;
        }
        self.state.level_complete = false;
        self.init_level(self.state.current_level);
    }

    /// Back to the start screen with a clean slate
    pub fn restart_game(&mut self) {
        self.state = GameState::default();
        self.run_time_ms = 0.0;
        self.accumulator = 0.0;
        self.events.clear();
        self.init_level(1);
    }

    pub fn toggle_pause(&mut self) {
        if self.state.is_playing && !self.state.game_complete {
            self.state.is_paused = !self.state.is_paused;
            log::info!("Paused: {}", self.state.is_paused);
        }
    }

    /// Pause without toggling (focus loss)
    pub fn pause(&mut self) {
        if self.state.is_playing && !self.state.is_paused {
            self.state.is_paused = true;
            log::info!("Auto-paused");
        }
    }

    /// Cancel outstanding timers (host teardown)
    pub fn dispose(&mut self) {
        self.timers.clear();
        self.state.is_playing = false;
    }

    /// Run as many fixed steps as `frame_dt_ms` of wall time covers
    pub fn update(&mut self, frame_dt_ms: f32, input: &TickInput) {
        let dt = frame_dt_ms.clamp(0.0, 100.0);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            self.step(input);
            self.accumulator -= SIM_DT_MS;
            substeps += 1;
        }
    }

    /// One fixed simulation step: fire due timers, then tick the session
    pub fn step(&mut self, input: &TickInput) {
        if !self.state.is_simulating() {
            return;
        }

        self.timers.advance(SIM_DT_MS);
        self.run_time_ms += SIM_DT_MS as f64;

        let session = self.world.session;
        for fired in self.timers.drain_due(session) {
            if self.world.session != session {
                // A respawn earlier in this batch superseded the session
                log::debug!("Dropped {:?} for superseded session {:?}", fired, session);
                continue;
            }
            match fired {
                TimerKind::RevealTrap { trap_id } => {
                    if self.world.reveal_trap(trap_id) {
                        self.events.push(GameEvent::TrapRevealed { trap_id });
                    }
                }
                TimerKind::Respawn => {
                    let level = self.state.current_level;
                    self.init_level(level);
                }
            }
        }

        let outcome = tick(
            &mut self.world,
            input,
            SIM_DT_MS,
            &mut self.timers,
            &mut self.rng,
            &mut self.events,
        );

        match outcome {
            TickOutcome::Died => {
                self.state.deaths += 1;
                log::info!(
                    "Died on level {} (deaths: {})",
                    self.state.current_level,
                    self.state.deaths
                );
            }
            TickOutcome::LevelComplete => {
                self.state.level_complete = true;
                log::info!("Level {} complete", self.state.current_level);
            }
            TickOutcome::Running | TickOutcome::Skipped => {}
        }
    }

    /// Fresh session for level `id`; pending timers of the old session go stale
    fn init_level(&mut self, id: u32) {
        let session = SessionId(self.next_session);
        self.next_session += 1;
        self.accumulator = 0.0;
        match self.levels.get(id) {
            Some(template) => {
                self.world = World::new(template, session);
                log::info!("Level {} '{}' started (session {})", id, template.name, session.0);
            }
            None => log::error!("No level {} in level set", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Rect;
    use crate::level::{LevelTemplate, PlatformKind, PlatformSpec, Theme, TrapKind, TrapSpec};
    use glam::Vec2;

    fn simple(id: u32) -> LevelTemplate {
        LevelTemplate {
            id,
            name: format!("Level {id}"),
            theme: Theme::Dungeon,
            platforms: vec![PlatformSpec::new(PlatformKind::Normal, 0.0, 500.0, 1000.0, 100.0)],
            traps: vec![],
            start_position: Vec2::new(50.0, 460.0),
            goal: Rect::new(900.0, 420.0, 50.0, 80.0),
            background_color: [0.0; 3],
        }
    }

    fn game_with(first: LevelTemplate) -> Game {
        let set = LevelSet::new(vec![first, simple(2), simple(3)]).expect("valid test levels");
        let mut game = Game::new(set, 1234);
        game.start_game();
        game
    }

    fn idle(game: &mut Game, n: usize) {
        for _ in 0..n {
            game.step(&TickInput::default());
        }
    }

    const RIGHT: TickInput = TickInput {
        left: false,
        right: true,
        jump: false,
    };

    #[test]
    fn test_start_game_leaves_start_screen() {
        let set = LevelSet::builtin().unwrap();
        let mut game = Game::new(set, 1);
        assert!(game.state().show_start_screen);
        idle(&mut game, 10);
        assert_eq!(game.world().ticks, 0);

        game.start_game();
        assert!(!game.state().show_start_screen);
        assert!(game.state().is_playing);
        assert_eq!(game.world().level.id, 1);
        idle(&mut game, 10);
        assert_eq!(game.world().ticks, 10);
    }

    #[test]
    fn test_fall_death_respawns_at_start() {
        // Start over a collapsing ledge: stand, it collapses, fall, die, respawn
        let mut first = simple(1);
        first.platforms = vec![
            PlatformSpec::new(PlatformKind::Collapsing, 0.0, 500.0, 200.0, 20.0),
            PlatformSpec::new(PlatformKind::Normal, 700.0, 500.0, 300.0, 100.0),
        ];
        let mut game = game_with(first);
        let first_session = game.world().session;

        let mut died = false;
        for _ in 0..400 {
            game.step(&TickInput::default());
            if game.world().player.is_dead {
                died = true;
                break;
            }
        }
        assert!(died);
        assert_eq!(game.state().deaths, 1);
        assert!(!game.world().level.platforms[0].is_solid());

        // Respawn after the fixed delay
        let mut waited = 0;
        while game.world().session == first_session {
            game.step(&TickInput::default());
            waited += 1;
            assert!(waited <= 70);
        }
        assert!(waited >= 59);

        let world = game.world();
        assert!(!world.player.is_dead);
        assert_eq!(world.player.vel, Vec2::ZERO);
        assert_eq!(world.player.pos, Vec2::new(50.0, 460.0));
        assert!(world.level.platforms[0].is_solid());
        assert_eq!(game.state().deaths, 1);
        assert_eq!(game.state().current_level, 1);
    }

    #[test]
    fn test_respawn_restores_start_position_exactly() {
        let mut first = simple(1);
        first.traps = vec![TrapSpec::new(1, TrapKind::FloorSpike, 120.0, 480.0, 40.0, 20.0)];
        let mut game = game_with(first);

        for _ in 0..30 {
            game.step(&RIGHT);
            if game.world().player.is_dead {
                break;
            }
        }
        assert!(game.world().player.is_dead);
        let dead_session = game.world().session;

        let mut n = 0;
        while game.world().session == dead_session {
            game.step(&TickInput::default());
            n += 1;
            assert!(n <= 70);
        }
        let world = game.world();
        assert!(!world.player.is_dead);
        assert_eq!(world.player.pos.x, 50.0);
        assert_eq!(game.state().deaths, 1);
    }

    #[test]
    fn test_level_complete_freezes_simulation() {
        let mut first = simple(1);
        first.goal = Rect::new(150.0, 420.0, 50.0, 80.0);
        let mut game = game_with(first);

        for _ in 0..60 {
            game.step(&RIGHT);
            if game.state().level_complete {
                break;
            }
        }
        assert!(game.state().level_complete);
        let pos = game.world().player.pos;
        let vel = game.world().player.vel;
        let ticks = game.world().ticks;

        game.update(500.0, &RIGHT);
        idle(&mut game, 30);
        assert_eq!(game.world().player.pos, pos);
        assert_eq!(game.world().player.vel, vel);
        assert_eq!(game.world().ticks, ticks);

        game.next_level();
        assert_eq!(game.state().current_level, 2);
        assert!(!game.state().level_complete);
        assert_eq!(game.world().level.id, 2);
    }

    /// Mark the current level cleared and move on
    fn finish_level(game: &mut Game) {
        game.state.level_complete = true;
        game.next_level();
    }

    #[test]
    fn test_next_level_ignored_mid_level() {
        let mut game = game_with(simple(1));
        idle(&mut game, 5);
        let session = game.world().session;
        for _ in 0..LEVEL_COUNT + 1 {
            game.next_level();
        }
        assert_eq!(game.state().current_level, 1);
        assert!(!game.state().game_complete);
        assert!(game.state().is_playing);
        assert_eq!(game.world().session, session);
    }

    #[test]
    fn test_next_level_terminal_is_idempotent() {
        let mut game = game_with(simple(1));
        finish_level(&mut game);
        finish_level(&mut game);
        assert_eq!(game.state().current_level, 3);
        assert!(!game.state().game_complete);

        finish_level(&mut game);
        assert!(game.state().game_complete);
        assert!(!game.state().is_playing);
        assert!(game.is_game_complete());

        let snapshot = game.state().clone();
        let session = game.world().session;
        game.next_level();
        game.restart_level();
        idle(&mut game, 5);
        assert_eq!(game.state(), &snapshot);
        assert_eq!(game.world().session, session);
    }

    #[test]
    fn test_restart_level_discards_pending_trap_reveal() {
        let mut first = simple(1);
        first.traps = vec![
            TrapSpec::new(3, TrapKind::CeilingSpike, 60.0, 300.0, 30.0, 20.0)
                .hidden()
                .with_trigger(200.0, 500.0),
        ];
        let mut game = game_with(first);
        idle(&mut game, 1);
        assert!(game.world().level.traps[0].activated);

        game.restart_level();
        // Out of range so the new session never arms it
        game.world.player.pos.x = 600.0;
        idle(&mut game, 60);
        let trap = &game.world().level.traps[0];
        assert!(trap.is_hidden);
        assert!(!trap.is_active);
        assert!(!trap.activated);
    }

    #[test]
    fn test_restart_while_dead_drops_stale_respawn() {
        let mut first = simple(1);
        first.traps = vec![TrapSpec::new(1, TrapKind::FloorSpike, 120.0, 480.0, 40.0, 20.0)];
        let mut game = game_with(first);
        for _ in 0..30 {
            game.step(&RIGHT);
            if game.world().player.is_dead {
                break;
            }
        }
        assert!(game.world().player.is_dead);

        game.restart_level();
        let session = game.world().session;
        assert!(!game.world().player.is_dead);
        idle(&mut game, 90);
        assert_eq!(game.world().session, session);
        assert_eq!(game.state().deaths, 1);
    }

    #[test]
    fn test_restart_level_keeps_deaths_and_level() {
        let mut game = game_with(simple(1));
        finish_level(&mut game);
        game.state.deaths = 4;
        game.restart_level();
        assert_eq!(game.state().deaths, 4);
        assert_eq!(game.state().current_level, 2);
        assert_eq!(game.world().level.id, 2);
    }

    #[test]
    fn test_restart_game_resets_everything() {
        let mut game = game_with(simple(1));
        finish_level(&mut game);
        game.state.deaths = 7;
        idle(&mut game, 10);
        game.restart_game();
        assert_eq!(game.state(), &GameState::default());
        assert_eq!(game.run_time_ms(), 0.0);
        assert_eq!(game.world().level.id, 1);
    }

    #[test]
    fn test_pause_stops_time() {
        let mut game = game_with(simple(1));
        idle(&mut game, 3);
        game.toggle_pause();
        let ticks = game.world().ticks;
        idle(&mut game, 20);
        assert_eq!(game.world().ticks, ticks);
        game.toggle_pause();
        idle(&mut game, 1);
        assert_eq!(game.world().ticks, ticks + 1);
    }

    #[test]
    fn test_update_runs_fixed_substeps() {
        let mut game = game_with(simple(1));
        game.update(SIM_DT_MS * 3.0 + 1.0, &TickInput::default());
        assert_eq!(game.world().ticks, 3);

        // A long hitch is clamped to 100ms of simulation
        game.update(10_000.0, &TickInput::default());
        assert_eq!(game.world().ticks, 3 + 6);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = game_with(simple(1));
        let mut b = game_with(simple(1));
        let inputs = [RIGHT, TickInput::default(), TickInput { jump: true, ..RIGHT }];
        for i in 0..120 {
            let input = inputs[i % inputs.len()];
            a.step(&input);
            b.step(&input);
        }
        assert_eq!(a.world().player.pos, b.world().player.pos);
        assert_eq!(a.world().ticks, b.world().ticks);
    }
}
