//! Rail Runner entry point
//!
//! On the web this wires the session to the DOM, the keyboard, audio and the
//! JS renderer. Natively it runs a headless autopilot game and logs the score.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, KeyboardEvent, MouseEvent};

    use rail_runner::audio::AudioManager;
    use rail_runner::platform::now_secs;
    use rail_runner::platform::web::RafScheduler;
    use rail_runner::sim::{GameEvent, GamePhase, ObstacleKind, VisualId};
    use rail_runner::{Key, Session, Snapshot, Tuning};

    // Bridge to the page's renderer/model loader. A page that does not
    // provide `window.railRunner` still runs, it just shows nothing.
    #[wasm_bindgen(inline_js = "
        export function render_frame(json) {
            const host = window.railRunner;
            if (host && host.render) {
                host.render(JSON.parse(json));
            }
        }

        export function load_obstacle_visual(id, kind) {
            const host = window.railRunner;
            if (host && host.loadObstacle) {
                return Promise.resolve(host.loadObstacle(id, kind));
            }
            return Promise.resolve(null);
        }

        export function release_obstacle_visual(id) {
            const host = window.railRunner;
            if (host && host.releaseObstacle) {
                host.releaseObstacle(id);
            }
        }
    ")]
    extern "C" {
        fn render_frame(json: &str);
        fn load_obstacle_visual(id: u32, kind: &str) -> js_sys::Promise;
        fn release_obstacle_visual(id: u32);
    }

    struct Game {
        session: Session<RafScheduler>,
        audio: AudioManager,
    }

    type GameRef = Rc<RefCell<Game>>;

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Rail Runner starting...");

        let tuning = Tuning::load();
        let session = match Session::new(tuning, RafScheduler::new()) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Invalid tuning: {}", e);
                return;
            }
        };
        let game = Rc::new(RefCell::new(Game {
            session,
            audio: AudioManager::new(),
        }));

        // The frame callback captures the game, so it is installed after
        let callback = {
            let game = game.clone();
            Closure::<dyn FnMut(f64)>::new(move |time_ms: f64| {
                let snapshot = game.borrow_mut().session.frame(time_ms / 1000.0);
                if let Some(snapshot) = snapshot {
                    render(&snapshot);
                }
                dispatch_events(&game);
            })
        };
        game.borrow().session.scheduler().set_callback(callback);

        setup_buttons(&game);
        setup_keyboard(&game);
        setup_auto_pause(&game);

        if let Some(loading) = document().and_then(|d| d.get_element_by_id("loading")) {
            let _ = loading.set_attribute("class", "hidden");
        }
        refresh(&game);

        log::info!("Rail Runner ready, press Start");
    }

    fn render(snapshot: &Snapshot) {
        match serde_json::to_string(snapshot) {
            Ok(json) => render_frame(&json),
            Err(e) => log::error!("Snapshot encoding failed: {}", e),
        }
    }

    /// Re-render and flush events after a transition outside the frame loop
    fn refresh(game: &GameRef) {
        let snapshot = game.borrow().session.snapshot();
        render(&snapshot);
        dispatch_events(game);
    }

    /// Route drained events to audio and the model loader, then sync the DOM
    fn dispatch_events(game: &GameRef) {
        let events = game.borrow_mut().session.drain_events();
        for event in &events {
            game.borrow_mut().audio.on_event(event);
            match event {
                GameEvent::ObstacleSpawned { id, kind, .. } => load_visual(game.clone(), *id, *kind),
                GameEvent::ObstacleCulled { id } => release_obstacle_visual(*id),
                _ => {}
            }
        }
        if !events.is_empty() {
            update_ui(&game.borrow());
        }
    }

    /// Ask the page for a model and attach it when (and if) it arrives
    fn load_visual(game: GameRef, id: u32, kind: ObstacleKind) {
        let promise = load_obstacle_visual(id, kind.as_str());
        wasm_bindgen_futures::spawn_local(async move {
            let handle = match JsFuture::from(promise).await {
                Ok(value) => value.as_f64(),
                Err(e) => {
                    log::warn!("Model for obstacle {} failed to load: {:?}", id, e);
                    None
                }
            };
            let Some(handle) = handle else { return };
            // Culled or cleared by a restart while loading
            if !game.borrow_mut().session.attach_visual(id, VisualId(handle as u32)) {
                release_obstacle_visual(id);
            }
        });
    }

    fn set_disabled(document: &Document, id: &str, disabled: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            if disabled {
                let _ = el.set_attribute("disabled", "");
            } else {
                let _ = el.remove_attribute("disabled");
            }
        }
    }

    /// Update buttons, the game-over banner and the score in the DOM
    fn update_ui(game: &Game) {
        let Some(document) = document() else { return };
        let state = game.session.state();
        let phase = state.phase;

        set_disabled(&document, "startBtn", phase != GamePhase::Idle);
        set_disabled(
            &document,
            "pauseBtn",
            !matches!(phase, GamePhase::Running | GamePhase::Paused),
        );
        set_disabled(&document, "restartBtn", phase == GamePhase::Idle);

        if let Some(el) = document.get_element_by_id("pauseBtn") {
            let label = if phase == GamePhase::Paused { "Resume" } else { "Pause" };
            el.set_text_content(Some(label));
        }

        if let Some(el) = document.get_element_by_id("gameOverMessage") {
            if phase == GamePhase::GameOver {
                let _ = el.set_attribute("class", "");
                if let Some(score_el) = document.get_element_by_id("scoreDisplay") {
                    let score = state.score.unwrap_or(state.frame);
                    score_el.set_text_content(Some(&score.to_string()));
                }
            } else {
                let _ = el.set_attribute("class", "hidden");
            }
        }
    }

    fn on_click(document: &Document, id: &str, game: &GameRef, action: fn(&mut Game, f64)) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing #{} button", id);
            return;
        };
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            action(&mut game.borrow_mut(), now_secs());
            refresh(&game);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: &GameRef) {
        let Some(document) = document() else { return };

        on_click(&document, "startBtn", game, |g, now| {
            g.session.start(now);
        });
        on_click(&document, "pauseBtn", game, |g, now| {
            g.session.toggle_pause(now);
        });
        on_click(&document, "restartBtn", game, |g, now| g.session.restart(now));
        on_click(&document, "retryButton", game, |g, now| g.session.restart(now));
    }

    fn setup_keyboard(game: &GameRef) {
        let Some(window) = web_sys::window() else { return };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if code == "Escape" || code == "KeyP" {
                    game.borrow_mut().session.toggle_pause(now_secs());
                    refresh(&game);
                    return;
                }
                if code == "KeyM" {
                    game.borrow_mut().audio.toggle_muted();
                    return;
                }
                let Some(key) = Key::from_code(&code) else { return };
                // Keep arrows and space from scrolling the page
                event.prevent_default();
                if event.repeat() {
                    return;
                }
                game.borrow_mut().session.key_down(key);
                dispatch_events(&game);
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_code(&event.code()) {
                    game.borrow_mut().session.key_up(key);
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Pause when the tab is hidden or the window loses focus
    fn auto_pause(game: &GameRef, reason: &str) {
        let paused = {
            let mut g = game.borrow_mut();
            g.session.state().is_running() && g.session.toggle_pause(now_secs())
        };
        if paused {
            log::info!("Auto-paused ({})", reason);
            refresh(game);
        }
    }

    fn setup_auto_pause(game: &GameRef) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    auto_pause(&game, "tab hidden");
                }
            });
            let _ = document
                .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                auto_pause(&game, "window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Simulated frame rate for the headless run
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_FPS: f64 = 60.0;

/// Give up after ten simulated minutes
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_MAX_FRAMES: u64 = 60 * 60 * 10;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use rail_runner::platform::{FrameScheduler, ManualScheduler, now_secs};
    use rail_runner::{Session, Tuning};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Rail Runner (native, headless) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading tuning file {}", path))?;
            Tuning::from_json(&json).with_context(|| format!("parsing tuning file {}", path))?
        }
        None => Tuning::default(),
    };

    let mut session = Session::new(tuning, ManualScheduler::new())?;
    let mut autopilot = Autopilot::default();
    let wall_start = now_secs();
    let mut now = 0.0;

    session.start(now);
    while session.scheduler().is_pending() && session.state().frame < HEADLESS_MAX_FRAMES {
        autopilot.drive(&mut session);
        now += 1.0 / HEADLESS_FPS;
        session.frame(now);
        for event in session.drain_events() {
            log::debug!("{:?}", event);
        }
    }

    let state = session.state();
    match state.score {
        Some(score) => log::info!("Crashed with score {} at speed {:.1}", score, state.obstacle_speed),
        None => log::info!("Survived {} frames", state.frame),
    }
    log::info!(
        "Simulated {:.1}s of play in {:.3}s",
        now,
        now_secs() - wall_start
    );
    Ok(())
}

/// Very small bot: hops barriers, changes lane away from trains
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
struct Autopilot {
    lane: Option<u32>,
}

#[cfg(not(target_arch = "wasm32"))]
impl Autopilot {
    /// Distance ahead at which a barrier is jumped
    const JUMP_AT: f32 = 120.0;
    /// Distance ahead at which a train forces a lane change
    const DODGE_AT: f32 = 500.0;

    fn drive(&mut self, session: &mut rail_runner::Session<rail_runner::platform::ManualScheduler>) {
        use rail_runner::Key;
        use rail_runner::sim::ObstacleKind;

        let state = session.state();
        let track = *state.track();
        let player = state.player.pos;
        let player_back = state.player.bounds().back;
        let nearest_lane = |x: f32| {
            track
                .lane_centers()
                .enumerate()
                .min_by(|a, b| (a.1 - x).abs().total_cmp(&(b.1 - x).abs()))
                .map_or(0, |(lane, _)| lane as u32)
        };
        let lane = *self.lane.get_or_insert_with(|| nearest_lane(player.x));

        // (lane, kind, distance ahead) of everything still in front
        let ahead: Vec<(u32, ObstacleKind, f32)> = state
            .obstacles
            .iter()
            .filter(|o| o.body.bounds().front < player_back)
            .map(|o| (nearest_lane(o.body.pos.x), o.kind, player_back - o.body.bounds().front))
            .collect();
        let train_near = |l: u32| {
            ahead
                .iter()
                .any(|&(ol, kind, d)| ol == l && kind == ObstacleKind::Train && d < Self::DODGE_AT)
        };

        if train_near(lane) {
            if let Some(free) = (0..track.lane_count()).find(|&l| !train_near(l)) {
                self.lane = Some(free);
            }
        }
        let jump = ahead
            .iter()
            .any(|&(ol, kind, d)| ol == lane && kind == ObstacleKind::Barrier && d < Self::JUMP_AT);

        let target = self.lane.and_then(|l| track.lane_center(l)).unwrap_or(0.0);
        let (left, right) = if player.x > target + 2.0 {
            (true, false)
        } else if player.x < target - 2.0 {
            (false, true)
        } else {
            (false, false)
        };

        for (key, held) in [(Key::Left, left), (Key::Right, right)] {
            if held {
                session.key_down(key);
            } else {
                session.key_up(key);
            }
        }
        if jump {
            session.key_down(Key::Jump);
        }
    }
}
