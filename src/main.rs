//! Treasure Run entry point
//!
//! The browser build mounts the game on the page canvas. The native build has
//! no window; it plays level 1 headless with a scripted input and logs the
//! outcome, which is handy for checking level tuning.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    treasure_run::platform::web::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Treasure Run (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    headless::run_level_one();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use treasure_run::consts::SIM_DT_MS;
    use treasure_run::sim::{GameEvent, TickInput};
    use treasure_run::{Game, LevelSet};

    /// One minute of frames
    const MAX_FRAMES: u32 = 60 * 60;
    /// Tap jump for a few frames out of every cycle
    const JUMP_CYCLE: u32 = 45;
    const JUMP_HOLD: u32 = 4;

    pub fn run_level_one() {
        let levels = match LevelSet::builtin() {
            Ok(levels) => levels,
            Err(e) => {
                log::error!("Built-in levels rejected: {}", e);
                return;
            }
        };
        let mut game = Game::new(levels, 0x7EA5_0000);
        game.start_game();

        let mut jumps = 0u32;
        let mut frames = 0u32;
        while frames < MAX_FRAMES && !game.state().level_complete {
            let input = TickInput {
                left: false,
                right: true,
                jump: frames % JUMP_CYCLE < JUMP_HOLD,
            };
            game.update(SIM_DT_MS, &input);
            jumps += game
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::Jumped))
                .count() as u32;
            frames += 1;
        }

        let state = game.state();
        let player = &game.world().player;
        log::info!(
            "Level 1 after {} frames: complete={} deaths={} jumps={} player=({:.0}, {:.0})",
            frames,
            state.level_complete,
            state.deaths,
            jumps,
            player.pos.x,
            player.pos.y
        );
        println!(
            "level 1: {} in {} frames, {} deaths",
            if state.level_complete { "cleared" } else { "not cleared" },
            frames,
            state.deaths
        );
    }
}
