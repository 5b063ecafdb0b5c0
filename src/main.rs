//! Night Runner entry point
//!
//! Web: canvas + DOM overlay driven by requestAnimationFrame.
//! Native: a headless seeded session played by the autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use night_runner::present::Hud;
    use night_runner::renderer::SdfRenderState;
    use night_runner::sim::{GameState, SessionPhase};
    use night_runner::{Command, FrameControl, FrameDriver, Settings, Tuning};

    type WebDriver = FrameDriver<SdfRenderState, DomHud>;

    /// Score readout and end-of-run overlay in the page
    struct DomHud {
        score: Option<Element>,
        best: Option<Element>,
        overlay: Option<Element>,
        restart_btn: Option<Element>,
        /// Last (score, best) written, to skip redundant DOM writes
        shown: Option<(u64, u64)>,
    }

    impl DomHud {
        fn new(document: &Document, settings: &Settings) -> Self {
            let best = document.get_element_by_id("best");
            if let Some(el) = &best {
                if !settings.show_best {
                    let _ = el.set_attribute("hidden", "");
                }
            }
            Self {
                score: document.get_element_by_id("score"),
                best: best.filter(|_| settings.show_best),
                overlay: document.get_element_by_id("overlay"),
                restart_btn: document.get_element_by_id("restart-btn"),
                shown: None,
            }
        }
    }

    impl Hud for DomHud {
        fn show_score(&mut self, score: u64, best: u64) {
            if self.shown == Some((score, best)) {
                return;
            }
            self.shown = Some((score, best));
            if let Some(el) = &self.score {
                el.set_text_content(Some(&score.to_string()));
            }
            if let Some(el) = &self.best {
                el.set_text_content(Some(&best.to_string()));
            }
        }

        fn hide_overlay(&mut self) {
            if let Some(el) = &self.overlay {
                let _ = el.class_list().add_1("hidden");
            }
            if let Some(btn) = &self.restart_btn {
                let _ = btn.set_attribute("hidden", "");
            }
        }

        fn show_game_over(&mut self, score: u64, best: u64, new_best: bool) {
            if let Some(el) = &self.overlay {
                let badge = if new_best {
                    r#"<p class="badge">New best!</p>"#
                } else {
                    ""
                };
                el.set_inner_html(&format!(
                    r#"<h2 class="title">Game Over</h2>
<p class="subtitle">Score: {score} · Best: {best}</p>{badge}"#
                ));
                let _ = el.class_list().remove_1("hidden");
            }
            if let Some(btn) = &self.restart_btn {
                let _ = btn.remove_attribute("hidden");
            }
        }
    }

    /// Read an inline `<script id="tuning" type="application/json">` block
    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from page");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring page tuning: {}", e);
                Tuning::default()
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Night Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::from_query(&window.location().search().unwrap_or_default());
        log::info!("Quality: {}", settings.quality.as_str());
        let tuning = load_tuning(&document);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state =
            match SdfRenderState::new(surface, &adapter, width, height, &tuning, settings).await {
                Ok(render_state) => render_state,
                Err(e) => {
                    log::error!("Failed to create device: {}", e);
                    return;
                }
            };

        let seed = js_sys::Date::now() as u64;
        let state = GameState::with_tuning(seed, tuning);
        let hud = DomHud::new(&document, &settings);
        let driver = FrameDriver::new(state, settings, render_state, hud);
        let game = Rc::new(RefCell::new(driver));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());

        // Draw the idle scene once; the loop halts until a start command
        let wake = game.borrow_mut().request_frame();
        if wake {
            request_animation_frame(game);
        }

        log::info!("Night Runner ready");
    }

    /// Forward a command, waking the loop if it was halted
    fn send(game: &Rc<RefCell<WebDriver>>, command: Command) {
        let wake = game.borrow_mut().command(command);
        if wake {
            request_animation_frame(game.clone());
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<WebDriver>>) {
        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if matches!(code.as_str(), "Space" | "ArrowUp" | "KeyW") {
                    event.prevent_default();
                    send(&game, Command::Jump);
                }
                let ended = game.borrow().state().phase == SessionPhase::Ended;
                if ended && matches!(code.as_str(), "Space" | "Enter") {
                    send(&game, Command::Restart);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer down (mouse, touch and pen)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                send(&game, Command::Jump);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<WebDriver>>) {
        for (id, command) in [("start-btn", Command::Start), ("restart-btn", Command::Restart)] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                send(&game, command);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<WebDriver>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<WebDriver>>, time: f64) {
        let control = game.borrow_mut().frame(time);
        if control == FrameControl::Continue {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::process::ExitCode;

    use night_runner::consts::NOMINAL_DT;
    use night_runner::present::{LogHud, NullRenderer};
    use night_runner::sim::GameState;
    use night_runner::{Command, FrameControl, FrameDriver, Settings, Tuning};

    /// Give up after ten minutes of simulated play
    const MAX_FRAMES: u64 = 60 * 60 * 10;
    const DEFAULT_SEED: u64 = 2024;

    const USAGE: &str = "usage: night-runner [TUNING.json] [--seed N]";

    struct Args {
        tuning_path: Option<String>,
        seed: u64,
    }

    fn parse_args() -> Result<Args, String> {
        let mut args = Args {
            tuning_path: None,
            seed: DEFAULT_SEED,
        };
        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = iter.next().ok_or("--seed needs a value")?;
                    args.seed = value
                        .parse()
                        .map_err(|e| format!("bad seed {value:?}: {e}"))?;
                }
                "-h" | "--help" => return Err(USAGE.to_string()),
                _ if args.tuning_path.is_none() && !arg.starts_with('-') => {
                    args.tuning_path = Some(arg);
                }
                _ => return Err(format!("unexpected argument {arg:?}\n{USAGE}")),
            }
        }
        Ok(args)
    }

    fn load_tuning(path: Option<&str>) -> Result<Tuning, String> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
        let tuning = Tuning::from_json(&json).map_err(|e| format!("{path}: {e}"))?;
        log::info!("Loaded tuning from {}", path);
        Ok(tuning)
    }

    pub fn run() -> ExitCode {
        let args = match parse_args() {
            Ok(args) => args,
            Err(msg) => {
                eprintln!("{msg}");
                return ExitCode::from(2);
            }
        };
        let tuning = match load_tuning(args.tuning_path.as_deref()) {
            Ok(tuning) => tuning,
            Err(msg) => {
                log::error!("Invalid tuning: {}", msg);
                return ExitCode::FAILURE;
            }
        };

        log::info!("Headless run with seed {}", args.seed);
        let state = GameState::with_tuning(args.seed, tuning);
        let mut driver = FrameDriver::new(
            state,
            Settings::default(),
            NullRenderer::default(),
            LogHud::default(),
        );
        driver.autopilot = true;
        driver.command(Command::Start);

        let step_ms = f64::from(NOMINAL_DT) * 1000.0;
        let mut frames = 0;
        while frames < MAX_FRAMES {
            frames += 1;
            if driver.frame(frames as f64 * step_ms) == FrameControl::Halt {
                break;
            }
        }

        let state = driver.state();
        if state.is_running() {
            log::warn!("Stopped after {} frames with the run still going", frames);
        }
        println!(
            "seed {}: score {} (best {}) after {} ticks",
            args.seed,
            state.display_score(),
            state.best_score(),
            state.time_ticks
        );
        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Night Runner (native) starting...");
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
