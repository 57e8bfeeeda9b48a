//! Zen Rake entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent};

    use glam::Vec2;
    use zen_rake::consts::*;
    use zen_rake::{Leaderboard, Settings};
    use zen_rake::sim::{GamePhase, GameState, InputState, ObstacleKind, PlacementMode, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        /// Shared input value: event handlers write it, the tick reads it
        /// once per frame
        input: InputState,
        leaderboard: Leaderboard,
        settings: Settings,
        ctx: Option<CanvasRenderingContext2d>,
        canvas_size: (f32, f32),
        /// Final (coverage, elapsed_seconds) awaiting a name submit
        pending_result: Option<(f32, f32)>,
        last_phase: GamePhase,
    }

    impl Game {
        fn new(seed: u64, w: f32, h: f32) -> Self {
            Self {
                state: GameState::new(seed, w, h),
                input: InputState::default(),
                leaderboard: Leaderboard::load(),
                settings: Settings::load(),
                ctx: None,
                canvas_size: (w, h),
                pending_result: None,
                last_phase: GamePhase::Menu,
            }
        }

        /// Reset to a fresh menu snapshot for restart
        fn restart(&mut self, seed: u64) {
            let (w, h) = self.canvas_size;
            self.state = GameState::new(seed, w, h);
            self.input = InputState::default();
            self.pending_result = None;
        }

        /// Run one simulation frame
        fn update(&mut self, time: f64) {
            tick(&mut self.state, &self.input, time);

            // Capture the final result once on the transition into a
            // terminal phase; the name-submit handler consumes it
            let phase = self.state.phase;
            if phase != self.last_phase
                && matches!(phase, GamePhase::Victory | GamePhase::GameOver)
            {
                self.pending_result = Some((
                    self.state.coverage_percent(),
                    (self.state.elapsed_ms / 1000.0) as f32,
                ));
            }
            self.last_phase = phase;
        }

        /// Draw the snapshot with flat canvas-2d shapes
        fn render(&self) {
            let Some(ctx) = &self.ctx else { return };
            let (w, h) = self.canvas_size;
            let state = &self.state;

            // Sand
            ctx.set_fill_style_str("#f0deb0");
            ctx.fill_rect(0.0, 0.0, w as f64, h as f64);

            // Raked tiles
            let tile = state.coverage.tile_size() as f64;
            ctx.set_fill_style_str("#e3cb96");
            for &(col, row) in state.coverage.iter() {
                ctx.fill_rect(col as f64 * tile, row as f64 * tile, tile, tile);
            }

            // Paw prints
            ctx.set_fill_style_str("#a98d5f");
            for paw in &state.paw_prints {
                ctx.fill_rect(paw.pos.x as f64 - 2.0, paw.pos.y as f64 - 2.0, 4.0, 4.0);
            }

            // Obstacles
            for o in &state.obstacles {
                let color = match o.kind {
                    ObstacleKind::Rock => "#8a8a8a",
                    ObstacleKind::Tree => "#4d7a3a",
                    ObstacleKind::Pond => "#5a8fc7",
                };
                ctx.set_fill_style_str(color);
                ctx.fill_rect(
                    o.pos.x as f64,
                    o.pos.y as f64,
                    o.width as f64,
                    o.height as f64,
                );
            }

            // Sushi bobs a few pixels on its animation phase
            if let Some(sushi) = &state.sushi {
                let bob = if self.settings.reduced_motion {
                    0.0
                } else {
                    (sushi.anim_frame.sin() * 3.0) as f64
                };
                ctx.set_fill_style_str("#e06a5a");
                ctx.fill_rect(
                    sushi.pos.x as f64 - 8.0,
                    sushi.pos.y as f64 - 8.0 + bob,
                    16.0,
                    16.0,
                );
            }

            // Dog
            if let Some(dog) = &state.dog {
                ctx.set_fill_style_str("#c79b52");
                ctx.fill_rect(dog.pos.x as f64 - 15.0, dog.pos.y as f64 - 10.0, 30.0, 20.0);
            }

            // Rake, red-tinted while colliding
            ctx.set_fill_style_str(if state.is_colliding {
                "#d14b3c"
            } else {
                "#7a5c3a"
            });
            ctx.fill_rect(
                state.rake_pos.x as f64,
                state.rake_pos.y as f64,
                RAKE_SIZE as f64,
                RAKE_SIZE as f64,
            );
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();
            let state = &self.state;

            if let Some(el) = document.get_element_by_id("hud-aura") {
                let pct = (state.aura / MAX_AURA * 100.0).round();
                let _ = el.set_attribute("style", &format!("width: {pct}%"));
            }

            if let Some(el) = document.get_element_by_id("hud-coverage") {
                el.set_text_content(Some(&format!("{:.1}%", state.coverage_percent())));
            }

            if let Some(el) = document.get_element_by_id("hud-time") {
                el.set_text_content(Some(&format!("{:.0}s", state.remaining_ms() / 1000.0)));
            }

            // Placement prompt only while a credit is spendable
            if let Some(el) = document.get_element_by_id("placement-hint") {
                if state.placements_available > 0 && state.placement_mode != PlacementMode::None {
                    el.set_text_content(Some(&format!(
                        "Click to place {:?} ({} left, +{} aura)",
                        state.placement_mode, state.placements_available, AURA_PLACEMENT_BONUS
                    )));
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            // Menu / end-screen visibility tracks the phase
            set_visible(&document, "menu", state.phase == GamePhase::Menu);
            set_visible(&document, "victory", state.phase == GamePhase::Victory);
            set_visible(&document, "game-over", state.phase == GamePhase::GameOver);

            if matches!(state.phase, GamePhase::Victory | GamePhase::GameOver) {
                if let Some(el) = document.get_element_by_id("final-coverage") {
                    el.set_text_content(Some(&format!("{:.1}%", state.coverage_percent())));
                }
            }
        }
    }

    fn set_visible(document: &web_sys::Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Push the persisted volumes onto the audio elements
    fn apply_audio_settings(settings: &Settings) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();
        for (id, volume) in [
            ("bgm", settings.effective_music_volume()),
            ("sfx", settings.effective_sfx_volume()),
        ] {
            if let Some(audio) = document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<web_sys::HtmlAudioElement>().ok())
            {
                audio.set_volume(volume as f64);
                audio.set_muted(settings.muted);
            }
        }
    }

    /// Rewrite the leaderboard list element from the saved entries
    fn render_leaderboard(board: &Leaderboard) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(el) = document.get_element_by_id("best-coverage") {
            let text = match board.top_coverage() {
                Some(best) => format!("Best: {best:.1}%"),
                None => "No sessions yet".to_string(),
            };
            el.set_text_content(Some(&text));
        }

        if let Some(el) = document.get_element_by_id("leaderboard") {
            let rows: Vec<String> = board
                .entries
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    format!(
                        "{}. {} - {:.1}% in {:.0}s",
                        i + 1,
                        e.name,
                        e.coverage,
                        e.elapsed_seconds
                    )
                })
                .collect();
            el.set_text_content(Some(&rows.join("\n")));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Zen Rake starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Responsive canvas: simulate at the CSS pixel size the host laid out
        let w = canvas.client_width().max(1) as f32;
        let h = canvas.client_height().max(1) as f32;
        canvas.set_width(w as u32);
        canvas.set_height(h as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, w, h)));
        game.borrow_mut().ctx = Some(ctx);

        log::info!("Game initialized with seed: {seed} ({w}x{h})");

        render_leaderboard(&game.borrow().leaderboard);
        apply_audio_settings(&game.borrow().settings);

        setup_input_handlers(&canvas, game.clone());
        setup_menu_buttons(game.clone());

        request_animation_frame(game);

        log::info!("Zen Rake running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move - update the shared pointer position
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.pointer = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down - place an obstacle if a credit is armed, otherwise rake
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                g.input.pointer = pos;
                if g.state.placements_available > 0
                    && g.state.placement_mode != PlacementMode::None
                {
                    g.state.place(pos);
                } else {
                    g.input.pressed = true;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up / leave - release the rake
        for event_name in ["mouseup", "mouseleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.pressed = false;
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let mut g = game.borrow_mut();
                    g.input.pointer = Vec2::new(
                        touch.client_x() as f32 - rect.left() as f32,
                        touch.client_y() as f32 - rect.top() as f32,
                    );
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - same placement-or-rake split as mouse down
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let pos = Vec2::new(
                        touch.client_x() as f32 - rect.left() as f32,
                        touch.client_y() as f32 - rect.top() as f32,
                    );
                    let mut g = game.borrow_mut();
                    g.input.pointer = pos;
                    if g.state.placements_available > 0
                        && g.state.placement_mode != PlacementMode::None
                    {
                        g.state.place(pos);
                    } else {
                        g.input.pressed = true;
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.pressed = false;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_menu_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Start button - menu snapshot into Playing
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let now = web_sys::window()
                    .and_then(|w| w.performance())
                    .map(|p| p.now())
                    .unwrap_or(0.0);
                game.borrow_mut().state.start(now);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restart button - fresh garden, straight into Playing
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                let mut g = game.borrow_mut();
                g.restart(seed);
                let now = web_sys::window()
                    .and_then(|w| w.performance())
                    .map(|p| p.now())
                    .unwrap_or(0.0);
                g.state.start(now);
                log::info!("Game restarted with seed: {seed}");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Placement kind selectors, active only while a credit is held
        for (id, mode) in [
            ("place-rock-btn", PlacementMode::Rock),
            ("place-tree-btn", PlacementMode::Tree),
            ("place-pond-btn", PlacementMode::Pond),
        ] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().state.select_placement(mode);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Mute toggle
        if let Some(btn) = document.get_element_by_id("mute-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.settings.muted = !g.settings.muted;
                g.settings.save();
                apply_audio_settings(&g.settings);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Name submit - hand the finished session to the leaderboard
        if let Some(btn) = document.get_element_by_id("submit-score-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                let name = document
                    .get_element_by_id("player-name")
                    .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
                    .map(|input| input.value())
                    .unwrap_or_default();
                if name.trim().is_empty() {
                    return;
                }

                let mut g = game.borrow_mut();
                if let Some((coverage, elapsed)) = g.pending_result.take() {
                    let rank = g.leaderboard.add_entry(
                        name.trim(),
                        coverage,
                        elapsed,
                        js_sys::Date::now(),
                    );
                    g.leaderboard.save();
                    render_leaderboard(&g.leaderboard);
                    if let Some(rank) = rank {
                        log::info!("Score submitted at rank {rank}");
                    }
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use zen_rake::consts::*;
    use zen_rake::sim::{GameState, InputState, tick};

    env_logger::init();
    log::info!("Zen Rake (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Short scripted session so the sim can be smoke-tested off-browser
    let mut state = GameState::new(0xD06, DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT);
    state.start(0.0);

    let mut now = 0.0;
    let waypoints = [
        Vec2::new(100.0, 100.0),
        Vec2::new(700.0, 100.0),
        Vec2::new(700.0, 500.0),
        Vec2::new(100.0, 500.0),
    ];
    for target in waypoints.iter().cycle().take(64) {
        let input = InputState {
            pointer: *target,
            pressed: true,
        };
        for _ in 0..30 {
            now += 16.0;
            tick(&mut state, &input, now);
        }
    }

    println!(
        "Simulated {:.0}s: coverage {:.1}%, aura {:.0}, phase {:?}",
        now / 1000.0,
        state.coverage_percent(),
        state.aura,
        state.phase
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
