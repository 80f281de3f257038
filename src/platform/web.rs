//! Browser host
//!
//! Owns the canvas, the held-key set and the animation-frame loop. The page
//! drives the game through DOM buttons and the exported functions below;
//! completion is observed with `is_game_complete()`.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, anyhow};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, EventTarget, HtmlCanvasElement, HtmlInputElement, KeyboardEvent};

use super::input::{HeldKeys, Key};
use crate::audio::{AudioManager, SoundEffect};
use crate::consts::*;
use crate::game::Game;
use crate::level::LevelSet;
use crate::records::{BestRuns, format_time};
use crate::renderer::{RenderState, scene};
use crate::settings::Settings;

type Shared = Rc<RefCell<App>>;

thread_local! {
    static APP: RefCell<Option<Shared>> = const { RefCell::new(None) };
}

/// What the DOM currently shows
#[derive(Debug, Clone, PartialEq)]
struct Hud {
    level: u32,
    deaths: u32,
    tenths: u64,
    show_timer: bool,
    start: bool,
    paused: bool,
    level_complete: bool,
    game_complete: bool,
}

struct App {
    game: Game,
    held: HeldKeys,
    canvas: HtmlCanvasElement,
    render: RenderState,
    settings: Settings,
    audio: AudioManager,
    records: BestRuns,
    last_time: f64,
    raf_id: Option<i32>,
    disposed: bool,
    /// Board rank of the finished run; set once per run
    run_rank: Option<Option<usize>>,
    last_hud: Option<Hud>,
}

impl App {
    fn start_game(&mut self) {
        self.audio.resume();
        self.run_rank = None;
        self.game.start_game();
    }

    fn next_level(&mut self) {
        self.game.next_level();
        if self.game.is_game_complete() && self.run_rank.is_none() {
            self.record_run();
        }
    }

    fn restart_level(&mut self) {
        self.game.restart_level();
    }

    fn restart_game(&mut self) {
        self.run_rank = None;
        self.game.restart_game();
    }

    fn toggle_pause(&mut self) {
        self.game.toggle_pause();
    }

    fn record_run(&mut self) {
        let deaths = self.game.state().deaths;
        let time_ms = self.game.run_time_ms();
        let rank = self.records.add_run(deaths, time_ms, js_sys::Date::now());
        if rank.is_some() {
            self.records.save();
        }
        self.run_rank = Some(rank);
        self.audio.play(SoundEffect::GameComplete);
        log::info!("Run recorded: rank {:?}", rank);
    }

    fn dispose(&mut self) {
        if let (Some(id), Some(window)) = (self.raf_id.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(id);
        }
        self.disposed = true;
        self.held.clear();
        self.game.dispose();
        log::info!("Treasure Run disposed");
    }

    /// One display frame. Returns false when the loop must stop.
    fn frame(&mut self, time: f64) -> bool {
        let dt = if self.last_time > 0.0 {
            (time - self.last_time) as f32
        } else {
            SIM_DT_MS
        };
        self.last_time = time;

        self.game.update(dt, &self.held.to_input());
        for event in self.game.drain_events() {
            if let Some(effect) = SoundEffect::for_event(&event) {
                self.audio.play(effect);
            }
        }

        self.fit_canvas();
        let vertices = scene::build(self.game.world(), self.game.state(), &self.settings, time);
        match self.render.render(&vertices) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.render.reconfigure();
            }
            Err(wgpu::SurfaceError::Timeout) => {}
            Err(e) => {
                log::error!("Render failed, stopping: {:?}", e);
                return false;
            }
        }

        self.update_hud();
        true
    }

    /// Track CSS size changes of the canvas
    fn fit_canvas(&mut self) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let width = (self.canvas.client_width() as f64 * dpr) as u32;
        let height = (self.canvas.client_height() as f64 * dpr) as u32;
        if width > 0 && height > 0 && (width, height) != self.render.size {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.render.resize(width, height);
        }
    }

    fn update_hud(&mut self) {
        let state = self.game.state();
        let hud = Hud {
            level: state.current_level,
            deaths: state.deaths,
            tenths: (self.game.run_time_ms() / 100.0) as u64,
            show_timer: self.settings.show_timer,
            start: state.show_start_screen,
            paused: state.is_paused,
            level_complete: state.level_complete,
            game_complete: state.game_complete,
        };
        if self.last_hud.as_ref() == Some(&hud) {
            return;
        }
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        set_text(&document, "#hud-level .hud-value", &format!("{} / {}", hud.level, LEVEL_COUNT));
        set_text(&document, "#hud-deaths .hud-value", &hud.deaths.to_string());
        set_text(&document, "#hud-time .hud-value", &format_time(self.game.run_time_ms()));
        show(&document, "hud-time", hud.show_timer);
        show(&document, "hud", !hud.start);
        show(&document, "start-screen", hud.start);
        show(&document, "pause-menu", hud.paused && !hud.game_complete);
        show(&document, "level-complete", hud.level_complete && !hud.game_complete);
        show(&document, "game-complete", hud.game_complete);

        let finishing = hud.level == LEVEL_COUNT;
        set_text(
            &document,
            "#next-level-btn",
            if finishing { "Claim the treasure" } else { "Next level" },
        );

        let newly_complete = hud.game_complete
            && !self.last_hud.as_ref().is_some_and(|h| h.game_complete);
        if newly_complete {
            self.fill_results(&document);
        }
        self.last_hud = Some(hud);
    }

    fn fill_results(&self, document: &Document) {
        set_text(document, "#final-deaths", &self.game.state().deaths.to_string());
        set_text(document, "#final-time", &format_time(self.game.run_time_ms()));
        let rank = match self.run_rank {
            Some(Some(rank)) => format!("#{rank}"),
            _ => "-".to_string(),
        };
        set_text(document, "#final-rank", &rank);

        if let Some(list) = document.get_element_by_id("records-list") {
            let items: String = self
                .records
                .entries
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    format!(
                        "<li>{}. {} deaths - {}</li>",
                        i + 1,
                        r.deaths,
                        format_time(r.time_ms)
                    )
                })
                .collect();
            list.set_inner_html(&items);
        }
    }

    fn apply_settings(&mut self) {
        self.audio.set_volume(self.settings.effective_volume());
        self.settings.save();
        self.last_hud = None;
    }
}

/// Mount the game on `#canvas` and start the frame loop
pub async fn run() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

    log::info!("Treasure Run starting...");
    match init().await {
        Ok(app) => {
            APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));
            request_frame(app);
            log::info!("Treasure Run running!");
        }
        Err(e) => log::error!("Failed to start: {e:#}"),
    }
}

async fn init() -> anyhow::Result<Shared> {
    let window = web_sys::window().context("no window")?;
    let document = window.document().context("no document")?;

    if let Some(loading) = document.get_element_by_id("loading") {
        set_hidden(&loading, true);
    }

    let canvas: HtmlCanvasElement = document
        .get_element_by_id("canvas")
        .context("no #canvas element")?
        .dyn_into()
        .map_err(|_| anyhow!("#canvas is not a canvas"))?;

    let dpr = window.device_pixel_ratio();
    let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
    let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
    canvas.set_width(width);
    canvas.set_height(height);

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
        ..Default::default()
    });
    let surface = instance
        .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
        .map_err(|e| anyhow!("failed to create surface: {e}"))?;
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await
        .map_err(|e| anyhow!("no suitable GPU adapter: {e}"))?;
    log::info!("Using adapter: {:?}", adapter.get_info().name);

    let render = RenderState::new(surface, &adapter, width, height)
        .await
        .context("renderer init")?;

    let levels = LevelSet::builtin().context("built-in levels are malformed")?;
    let settings = Settings::load();
    let seed = js_sys::Date::now() as u64;
    log::info!("Game initialized with seed: {}", seed);

    let app = Rc::new(RefCell::new(App {
        game: Game::new(levels, seed),
        held: HeldKeys::default(),
        canvas,
        render,
        audio: AudioManager::new(settings.effective_volume()),
        settings,
        records: BestRuns::load(),
        last_time: 0.0,
        raf_id: None,
        disposed: false,
        run_rank: None,
        last_hud: None,
    }));

    setup_keyboard(&window, app.clone())?;
    setup_focus(&window, &document, app.clone())?;
    setup_buttons(&document, app.clone())?;
    setup_settings(&document, app.clone())?;

    Ok(app)
}

fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> anyhow::Result<()> {
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(|e| anyhow!("failed to listen for '{event}': {e:?}"))?;
    closure.forget();
    Ok(())
}

fn setup_keyboard(window: &web_sys::Window, app: Shared) -> anyhow::Result<()> {
    {
        let app = app.clone();
        listen(window, "keydown", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let Some(key) = Key::from_key_name(&event.key()) else {
                return;
            };
            if key.suppresses_default() {
                event.prevent_default();
            }
            let mut a = app.borrow_mut();
            if a.disposed {
                return;
            }
            match key {
                Key::Pause if !event.repeat() => a.toggle_pause(),
                Key::Pause => {}
                _ => a.held.press(key),
            }
        })?;
    }
    listen(window, "keyup", move |event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if let Some(key) = Key::from_key_name(&event.key()) {
            if key.suppresses_default() {
                event.prevent_default();
            }
            app.borrow_mut().held.release(key);
        }
    })
}

fn setup_focus(window: &web_sys::Window, document: &Document, app: Shared) -> anyhow::Result<()> {
    {
        let app = app.clone();
        listen(window, "blur", move |_| {
            let mut a = app.borrow_mut();
            a.held.clear();
            a.game.pause();
            if a.settings.mute_on_blur {
                a.audio.set_muted(true);
            }
        })?;
    }
    {
        let app = app.clone();
        listen(window, "focus", move |_| {
            app.borrow_mut().audio.set_muted(false);
        })?;
    }
    let doc = document.clone();
    listen(document, "visibilitychange", move |_| {
        if doc.visibility_state() == web_sys::VisibilityState::Hidden {
            let mut a = app.borrow_mut();
            a.held.clear();
            a.game.pause();
        }
    })
}

fn setup_buttons(document: &Document, app: Shared) -> anyhow::Result<()> {
    let buttons: [(&str, fn(&mut App)); 5] = [
        ("start-btn", App::start_game),
        ("next-level-btn", App::next_level),
        ("restart-level-btn", App::restart_level),
        ("restart-game-btn", App::restart_game),
        ("resume-btn", App::toggle_pause),
    ];
    for (id, action) in buttons {
        let Some(button) = document.get_element_by_id(id) else {
            continue;
        };
        let app = app.clone();
        listen(&button, "click", move |_| {
            let mut a = app.borrow_mut();
            if !a.disposed {
                action(&mut a);
            }
        })?;
    }
    Ok(())
}

/// Checkboxes in the pause menu, pre-filled from stored settings
fn setup_settings(document: &Document, app: Shared) -> anyhow::Result<()> {
    let toggles: [(&str, fn(&mut Settings) -> &mut bool); 5] = [
        ("setting-shake", |s| &mut s.screen_shake),
        ("setting-particles", |s| &mut s.particles),
        ("setting-reduced-motion", |s| &mut s.reduced_motion),
        ("setting-timer", |s| &mut s.show_timer),
        ("setting-mute-on-blur", |s| &mut s.mute_on_blur),
    ];
    for (id, field) in toggles {
        let Some(input) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        else {
            continue;
        };
        input.set_checked(*field(&mut app.borrow_mut().settings));

        let app = app.clone();
        let source = input.clone();
        listen(&input, "change", move |_| {
            let mut a = app.borrow_mut();
            *field(&mut a.settings) = source.checked();
            a.apply_settings();
        })?;
    }
    Ok(())
}

fn request_frame(app: Shared) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let next = app.clone();
    let closure = Closure::once(move |time: f64| frame(next, time));
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => app.borrow_mut().raf_id = Some(id),
        Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
    }
    closure.forget();
}

fn frame(app: Shared, time: f64) {
    let keep_running = {
        let mut a = app.borrow_mut();
        a.raf_id = None;
        !a.disposed && a.frame(time)
    };
    if keep_running {
        request_frame(app);
    }
}

fn set_hidden(el: &Element, hidden: bool) {
    let _ = el.class_list().toggle_with_force("hidden", hidden);
}

fn show(document: &Document, id: &str, visible: bool) {
    if let Some(el) = document.get_element_by_id(id) {
        set_hidden(&el, !visible);
    }
}

fn set_text(document: &Document, selector: &str, text: &str) {
    if let Some(el) = document.query_selector(selector).ok().flatten() {
        el.set_text_content(Some(text));
    }
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|slot| {
        let app = slot.borrow().clone()?;
        let mut a = app.borrow_mut();
        Some(f(&mut a))
    })
}

#[wasm_bindgen]
pub fn start_game() {
    with_app(App::start_game);
}

#[wasm_bindgen]
pub fn next_level() {
    with_app(App::next_level);
}

#[wasm_bindgen]
pub fn restart_level() {
    with_app(App::restart_level);
}

#[wasm_bindgen]
pub fn restart_game() {
    with_app(App::restart_game);
}

#[wasm_bindgen]
pub fn is_game_complete() -> bool {
    with_app(|a| a.game.is_game_complete()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn deaths() -> u32 {
    with_app(|a| a.game.state().deaths).unwrap_or(0)
}

#[wasm_bindgen]
pub fn current_level() -> u32 {
    with_app(|a| a.game.state().current_level).unwrap_or(1)
}

/// Stop the frame loop and drop the game; later calls are no-ops
#[wasm_bindgen]
pub fn dispose() {
    if let Some(app) = APP.with(|slot| slot.borrow_mut().take()) {
        app.borrow_mut().dispose();
    }
}
