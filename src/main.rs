//! Fish Jump entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent};

    use fish_jump::audio::{AudioManager, SoundEffect};
    use fish_jump::consts::*;
    use fish_jump::renderer::{CanvasSurface, render_scene};
    use fish_jump::sim::{GameInput, GameState, step};
    use fish_jump::ui::{self, ActionButton, to_logical};
    use fish_jump::{AssetTracker, Settings};

    struct Game {
        state: GameState,
        surface: CanvasSurface,
        assets: Rc<RefCell<AssetTracker>>,
        audio: AudioManager,
        document: Document,
        // Last HUD values written, to skip redundant DOM updates
        hud_banner: Option<String>,
        hud_phase: Option<fish_jump::sim::GamePhase>,
        assets_logged: bool,
        loading_shown: Option<(usize, usize)>,
    }

    impl Game {
        /// Feed one input to the session and react to what happened
        fn apply(&mut self, input: GameInput) {
            step(&mut self.state, &input);
            for event in self.state.drain_events() {
                log::debug!("Event: {:?}", event);
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let assets = self.assets.borrow();
            let drawn = render_scene(&self.state, &assets, &mut self.surface);
            if !drawn {
                let progress = assets.progress();
                if self.loading_shown != Some(progress) {
                    self.loading_shown = Some(progress);
                    if let Some(el) = self.document.get_element_by_id("loading") {
                        let text = format!("Loading... {}/{}", progress.0, progress.1);
                        el.set_text_content(Some(&text));
                    }
                }
            } else if !self.assets_logged {
                self.assets_logged = true;
                log::info!("Assets ready, rendering");
                set_class(&self.document, "loading", "hidden");
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let banner = ui::banner(&self.state);
            if banner != self.hud_banner {
                if let Some(el) = self.document.get_element_by_id("banner") {
                    el.set_text_content(banner.as_deref());
                    let _ = el.set_attribute("class", if banner.is_some() { "" } else { "hidden" });
                }
                self.hud_banner = banner;
            }

            let phase = self.state.phase;
            if self.hud_phase == Some(phase) {
                return;
            }
            self.hud_phase = Some(phase);

            if let Some(el) = self.document.get_element_by_id("prompt") {
                el.set_text_content(Some(ui::prompt(phase)));
            }
            if let Some(el) = self.document.get_element_by_id("action-btn") {
                match ui::action_button(phase) {
                    Some(button) => {
                        el.set_text_content(Some(button.label()));
                        let _ = el.set_attribute("class", "");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }
        }
    }

    fn set_class(document: &Document, id: &str, class: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", class);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Fish Jump starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);

        let settings = Settings::load(&canvas);
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);

        let assets = Rc::new(RefCell::new(AssetTracker::default()));
        let mut surface = CanvasSurface::new(&canvas)?;
        surface.load_images(assets.clone())?;

        let audio = AudioManager::new(settings.effective_volume());
        let state = GameState::new(seed, settings);
        if !state.layout_report.is_complete() {
            log::warn!("Short layout: {:?}", state.layout_report);
        }
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            state,
            surface,
            assets,
            audio,
            document,
            hud_banner: None,
            hud_phase: None,
            assets_logged: false,
            loading_shown: None,
        }));

        setup_click_handler(&canvas, game.clone())?;
        setup_action_button(game.clone())?;
        setup_teardown(game.clone())?;

        request_animation_frame(game);

        log::info!("Fish Jump running!");
        Ok(())
    }

    /// Client position to logical canvas coordinates (CSS size may differ)
    ///
    /// The bounding rect includes the CSS border; `client_*` measure the
    /// drawable box inside it.
    fn canvas_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> (f32, f32) {
        let rect = canvas.get_bounding_client_rect();
        let (x, y) = to_logical(
            event.client_x() as f64 - rect.left() - canvas.client_left() as f64,
            event.client_y() as f64 - rect.top() - canvas.client_top() as f64,
            canvas.client_width() as f64,
            canvas.client_height() as f64,
        );
        (x as f32, y as f32)
    }

    fn setup_click_handler(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let (x, y) = canvas_point(&canvas_clone, &event);
            game.borrow_mut().apply(GameInput::Click { x, y });
        });
        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_action_button(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let Some(btn) = game.borrow().document.get_element_by_id("action-btn") else {
            log::warn!("No #action-btn on page");
            return Ok(());
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let mut g = game.borrow_mut();
            // Browsers only allow audio after a user gesture
            g.audio.resume();
            match ui::action_button(g.state.phase) {
                Some(ActionButton::Start) => g.apply(GameInput::Start),
                Some(ActionButton::PlayAgain) => g.apply(GameInput::Restart),
                None => {}
            }
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Leaving the page tears the round down so no alarm fires into it later
    fn setup_teardown(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            log::info!("Page hidden, resetting round");
            game.borrow_mut().apply(GameInput::Restart);
        });
        window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.apply(GameInput::Advance { now_ms: time });
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use fish_jump::Settings;
    use fish_jump::sim::{GameInput, GameState, layout_to_screen, step};

    env_logger::init();
    log::info!("Fish Jump (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(12345);

    // Scripted round: memorize, then jump to the first pond
    let mut state = GameState::new(seed, Settings::default());
    step(&mut state, &GameInput::Start);
    step(&mut state, &GameInput::Advance { now_ms: 10_000.0 });

    let (Some(home), Some(target)) = (state.home(), state.puddles.get(1)) else {
        println!("Seed {}: layout has no ponds to jump to", seed);
        return;
    };
    let screen = layout_to_screen(target.pos, home.pos, state.rotation);
    step(
        &mut state,
        &GameInput::Click {
            x: screen.x,
            y: screen.y,
        },
    );

    println!(
        "Seed {}: {} puddles, rotation {:.2} rad, clicked ({:.0}, {:.0}) -> {:?}",
        seed,
        state.puddles.len(),
        state.rotation,
        screen.x,
        screen.y,
        state.phase
    );
    for event in state.drain_events() {
        println!("  {:?}", event);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
