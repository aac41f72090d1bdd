//! Grid Snake entry point
//!
//! Browser: paints the board on a 2D canvas and drives the tick scheduler
//! with `setTimeout`. Native: runs a headless demo round and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent};

    use grid_snake::platform::{InputAction, LocalStorage, map_key};
    use grid_snake::renderer::{Scene, build_scene, css_color};
    use grid_snake::sim::{GameOutcome, GamePhase, Grid, SnakeId};
    use grid_snake::{Session, Settings, Variant};

    /// Game instance holding all state
    struct Game {
        session: Session<LocalStorage>,
        settings: Settings,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        /// Bumped whenever the scheduler is (re)armed; stale timeouts compare
        /// against it and drop out
        loop_generation: u64,
    }

    impl Game {
        fn cell_px(&self) -> u32 {
            self.settings.cell_px()
        }

        /// Refit the board to the window and resize the canvas to match
        fn fit_to_window(&mut self) {
            let window = match web_sys::window() {
                Some(w) => w,
                None => return,
            };
            let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let cell = self.cell_px();
            let grid = self.session.resize_viewport(width as u32, height as u32, cell);
            let (w, h) = grid.pixel_size(cell);
            self.canvas.set_width(w);
            self.canvas.set_height(h);
            log::debug!("Board resized to {}x{}", grid.cols, grid.rows);
        }

        fn render(&self) {
            let scene = build_scene(self.session.state(), self.cell_px(), self.settings.show_grid);
            paint(&self.ctx, &scene);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let state = self.session.state();
            let competitive = self.session.variant() == Variant::Competitive;

            let score_of = |id: SnakeId| {
                if competitive {
                    self.session.scores().wins(id)
                } else {
                    state.snake(id).map_or(0, |s| s.score)
                }
            };
            set_text(&document, "score", &score_of(SnakeId::Green).to_string());
            set_text(&document, "scoreRed", &score_of(SnakeId::Red).to_string());
            set_text(&document, "highScore", &self.session.high_score().to_string());

            let pause_label = if state.phase == GamePhase::Paused {
                "Resume"
            } else {
                "Pause"
            };
            set_text(&document, "pauseBtn", pause_label);

            if let Some(el) = document.get_element_by_id("gameOver") {
                match state.outcome {
                    Some(outcome) if state.phase == GamePhase::GameOver => {
                        el.set_text_content(Some(&game_over_text(outcome)));
                        let _ = el.set_attribute("class", "");
                        if let GameOutcome::Crashed { score } = outcome {
                            set_text(&document, "finalScore", &score.to_string());
                        }
                    }
                    _ => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }
        }

        fn redraw(&self) {
            self.render();
            self.update_hud();
        }
    }

    fn game_over_text(outcome: GameOutcome) -> String {
        match outcome {
            GameOutcome::Crashed { score } => format!("Game Over! Score: {}", score),
            GameOutcome::Won { winner, .. } => format!("{} wins!", winner.as_str()),
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Draw a scene onto the canvas
    fn paint(ctx: &CanvasRenderingContext2d, scene: &Scene) {
        ctx.set_shadow_blur(0.0);
        ctx.set_fill_style_str(&css_color(scene.background));
        ctx.fill_rect(0.0, 0.0, scene.width as f64, scene.height as f64);

        for cmd in &scene.commands {
            let color = css_color(cmd.color);
            ctx.set_fill_style_str(&color);
            ctx.set_shadow_color(&color);
            ctx.set_shadow_blur(cmd.glow as f64);
            ctx.begin_path();
            if cmd.shape.is_round() {
                let _ = ctx.arc(
                    cmd.center.x as f64,
                    cmd.center.y as f64,
                    cmd.radius as f64,
                    0.0,
                    std::f64::consts::TAU,
                );
            } else {
                for (i, v) in cmd.outline().iter().enumerate() {
                    if i == 0 {
                        ctx.move_to(v.x as f64, v.y as f64);
                    } else {
                        ctx.line_to(v.x as f64, v.y as f64);
                    }
                }
                ctx.close_path();
            }
            ctx.fill();
        }
        ctx.set_shadow_color("transparent");
        ctx.set_shadow_blur(0.0);

        if let Some(grid) = scene.grid {
            ctx.set_stroke_style_str(&css_color(grid.color));
            ctx.set_line_width(0.5);
            for i in 0..=grid.cols {
                let x = i as f64 * grid.cell_px as f64;
                ctx.begin_path();
                ctx.move_to(x, 0.0);
                ctx.line_to(x, scene.height as f64);
                ctx.stroke();
            }
            for i in 0..=grid.rows {
                let y = i as f64 * grid.cell_px as f64;
                ctx.begin_path();
                ctx.move_to(0.0, y);
                ctx.line_to(scene.width as f64, y);
                ctx.stroke();
            }
        }
    }

    /// Start a fresh tick loop, invalidating any pending one
    fn arm(game: &Rc<RefCell<Game>>) {
        let (generation, interval) = {
            let mut g = game.borrow_mut();
            g.loop_generation += 1;
            (g.loop_generation, g.session.tick_interval_ms())
        };
        schedule_tick(game.clone(), generation, interval);
    }

    fn schedule_tick(game: Rc<RefCell<Game>>, generation: u64, interval_ms: u32) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move || game_loop(game, generation));
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            interval_ms as i32,
        );
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, generation: u64) {
        let next = {
            let mut g = game.borrow_mut();
            if g.loop_generation != generation || !g.session.is_running() {
                return;
            }
            g.session.step(js_sys::Date::now() as u64);
            g.redraw();
            g.session.is_running().then(|| g.session.tick_interval_ms())
        };

        // Reschedule only while running; the interval follows the score
        if let Some(interval) = next {
            schedule_tick(game, generation, interval);
        }
    }

    /// Apply an action and arm the scheduler if the game just started
    fn dispatch(game: &Rc<RefCell<Game>>, action: InputAction) {
        let armed = {
            let mut g = game.borrow_mut();
            let armed = g.session.handle(action);
            g.redraw();
            armed
        };
        if armed {
            arm(game);
        }
    }

    fn setup_keyboard(document: &Document, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let key = event.key();
            if key == "i" || key == "I" {
                let mut g = game.borrow_mut();
                let demo = !g.session.demo();
                g.session.set_demo(demo);
                return;
            }
            let variant = game.borrow().session.variant();
            if let Some(action) = map_key(variant, &key) {
                // Keep arrows and space from scrolling the page
                event.prevent_default();
                dispatch(&game, action);
            }
        });
        let _ = document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: &Rc<RefCell<Game>>) {
        let buttons = [
            ("startBtn", InputAction::Start),
            ("restartBtn", InputAction::Restart),
            ("pauseBtn", InputAction::Pause),
            ("resetBtn", InputAction::Reset { clear_scores: true }),
        ];
        for (id, action) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                dispatch(&game, action);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.fit_to_window();
            g.redraw();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Grid Snake starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("context lookup failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        // The page picks the game with data-variant; settings are the fallback
        let mut settings = Settings::load();
        if let Some(variant) = canvas
            .get_attribute("data-variant")
            .and_then(|v| Variant::from_str(&v))
        {
            settings.variant = variant;
        }

        let seed = settings.seed_or(js_sys::Date::now() as u64);
        let session = Session::new(settings.variant, Grid::default(), seed, LocalStorage::open());
        let game = Rc::new(RefCell::new(Game {
            session,
            settings,
            canvas,
            ctx,
            loop_generation: 0,
        }));

        {
            let mut g = game.borrow_mut();
            g.fit_to_window();
            g.redraw();
        }

        setup_keyboard(&document, game.clone());
        setup_buttons(&document, &game);
        setup_resize(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use grid_snake::platform::JsonFileStore;
    use grid_snake::sim::{GameEvent, Grid};
    use grid_snake::{Session, Settings};

    /// Upper bound on ticks for a headless round
    const MAX_TICKS: u64 = 20_000;

    env_logger::init();
    log::info!("Grid Snake (native) starting...");

    let settings = Settings::load();
    let fallback_seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let seed = settings.seed_or(fallback_seed);

    let store = JsonFileStore::open("grid_snake_scores.json");
    let mut session = Session::new(settings.variant, Grid::default(), seed, store);
    session.set_demo(true);
    session.start();

    // Simulated clock: each tick advances by the current interval
    let mut now_ms = 0u64;
    let mut eaten = 0u32;
    for _ in 0..MAX_TICKS {
        now_ms += session.tick_interval_ms() as u64;
        for event in session.step(now_ms) {
            match event {
                GameEvent::FoodEaten { .. } => eaten += 1,
                GameEvent::GameOver(outcome) => log::info!("Round over: {:?}", outcome),
                _ => {}
            }
        }
        if !session.is_running() {
            break;
        }
    }

    let state = session.state();
    log::info!(
        "{} demo finished after {} ticks ({} items eaten, high score {})",
        settings.variant.as_str(),
        state.time_ticks,
        eaten,
        session.high_score()
    );
    log::info!("Scores stored in {}", session.store().path().display());
}
