//! Snow Block entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, DeviceOrientationEvent, HtmlCanvasElement, KeyboardEvent,
        PointerEvent,
    };

    use glam::DVec2;
    use snow_block::consts::*;
    use snow_block::renderer::{Projection, RenderStyle, Renderer};
    use snow_block::sim::{GameState, TickInput, tick};
    use snow_block::{Settings, Tuning, Viewport};

    const PERSPECTIVE: Projection = Projection::Perspective {
        fov: 600.0,
        viewer_distance: 600.0,
    };

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Renderer,
        ctx: CanvasRenderingContext2d,
        settings: Settings,
        accumulator: f64,
        last_time: f64,
        input: TickInput,
    }

    impl Game {
        fn new(seed: u64, viewport: Viewport, ctx: CanvasRenderingContext2d) -> Self {
            let settings = Settings::load();
            let mut tuning = Tuning::default();
            settings.apply_to(&mut tuning);
            Self {
                state: GameState::new(seed, viewport, tuning, settings.start_level),
                renderer: Renderer::new(settings.render_style, settings.projection),
                ctx,
                settings,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f64) {
            self.accumulator += dt.min(0.1);

            let mut substeps = 0;
            while self.accumulator >= FRAME_DT && substeps < MAX_SUBSTEPS {
                let input = std::mem::take(&mut self.input);
                tick(&mut self.state, &input);
                self.accumulator -= FRAME_DT;
                substeps += 1;
            }
        }

        fn render(&mut self) {
            self.renderer.draw_frame(&mut self.ctx, &self.state);
        }

        fn toggle_render_style(&mut self) {
            self.settings.render_style = match self.settings.render_style {
                RenderStyle::Wireframe => RenderStyle::Solid,
                RenderStyle::Solid => RenderStyle::Wireframe,
            };
            self.renderer.style = self.settings.render_style;
            self.settings.save();
        }

        fn toggle_projection(&mut self) {
            self.settings.projection = match self.settings.projection {
                Projection::Orthographic => PERSPECTIVE,
                Projection::Perspective { .. } => Projection::Orthographic,
            };
            self.renderer.projection = self.settings.projection;
            self.settings.save();
        }
    }

    fn window_viewport(window: &web_sys::Window) -> Viewport {
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
        Viewport::new(width, height)
    }

    fn fit_canvas(canvas: &HtmlCanvasElement, viewport: Viewport) {
        canvas.set_width(viewport.width as u32);
        canvas.set_height(viewport.height as u32);
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger already set: {e}").into());
        }

        log::info!("Snow Block starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let viewport = window_viewport(&window);
        fit_canvas(&canvas, viewport);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, viewport, ctx)));
        log::info!(
            "Game initialized with seed {} at {} quality",
            game.borrow().state.seed,
            game.borrow().settings.quality.as_str()
        );

        setup_input_handlers(&window, &canvas, game.clone())?;
        request_animation_frame(game);

        log::info!("Snow Block running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Pointer down on the canvas: tap + drag start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                let pos = DVec2::new(event.client_x() as f64, event.client_y() as f64);
                g.input.tap = true;
                g.input.pointer_down = Some(pos);
            });
            canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Pointer move/up anywhere so drags survive leaving the canvas
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let pos = DVec2::new(event.client_x() as f64, event.client_y() as f64);
                game.borrow_mut().input.pointer_move = Some(pos);
            });
            window.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().input.pointer_up = true;
            });
            window.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Device orientation
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DeviceOrientationEvent| {
                let mut g = game.borrow_mut();
                if g.settings.tilt_controls {
                    if let Some(beta) = event.beta() {
                        g.input.tilt_beta = Some(beta);
                    }
                }
            });
            window.add_event_listener_with_callback(
                "deviceorientation",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Resize
        {
            let game = game.clone();
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let viewport = window_viewport(&window);
                fit_canvas(&canvas, viewport);
                game.borrow_mut().input.resize = Some(viewport);
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" => g.input.tap = true,
                    "r" | "R" => g.input.reset = true,
                    "v" | "V" => g.toggle_render_style(),
                    "p" | "P" => g.toggle_projection(),
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window; stopping frame loop");
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

            let dt = if g.last_time > 0.0 {
                (time - g.last_time) / 1000.0
            } else {
                FRAME_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
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
    env_logger::init();
    log::info!("Snow Block (native) starting...");
    log::info!("Native mode runs a scripted headless session - use `trunk serve` to play");

    let tuning = match std::env::args().nth(1) {
        Some(path) => load_tuning(&path),
        None => snow_block::Tuning::default(),
    };
    headless::run(tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> snow_block::Tuning {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Could not read tuning file {path}: {e}; using defaults");
            return snow_block::Tuning::default();
        }
    };
    match snow_block::Tuning::from_json(&json) {
        Ok(tuning) => {
            log::info!("Loaded tuning from {path}");
            tuning
        }
        Err(e) => {
            log::error!("Invalid tuning in {path}: {e}; using defaults");
            snow_block::Tuning::default()
        }
    }
}

/// Scripted session against a recording surface
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::DVec2;
    use snow_block::renderer::{RecordingSurface, Renderer};
    use snow_block::sim::{GameState, Scene, TickInput, tick};
    use snow_block::{Settings, Tuning, Viewport};

    const MAX_TICKS: usize = 5_000;

    pub fn run(mut tuning: Tuning) {
        let settings = Settings::load();
        settings.apply_to(&mut tuning);

        let viewport = Viewport::new(1200.0, 800.0);
        let mut state = GameState::new(7, viewport, tuning, settings.start_level);
        let mut renderer = Renderer::new(settings.render_style, settings.projection);
        let mut surface = RecordingSurface::new();
        let mut draw_calls = 0usize;

        let mut frame = |state: &mut GameState, input: TickInput| {
            tick(state, &input);
            surface.reset();
            renderer.draw_frame(&mut surface, state);
            draw_calls += surface.commands.len();
        };

        frame(&mut state, TickInput {
            tap: true,
            ..Default::default()
        });
        for _ in 0..MAX_TICKS {
            if state.scene() == Scene::Playing {
                break;
            }
            frame(&mut state, TickInput::default());
        }

        // One gentle push, then flip the "device" and float to the top
        let start = state.start_position();
        frame(&mut state, TickInput {
            pointer_down: Some(start),
            ..Default::default()
        });
        frame(&mut state, TickInput {
            pointer_move: Some(start + DVec2::new(30.0, -20.0)),
            pointer_up: true,
            ..Default::default()
        });
        frame(&mut state, TickInput {
            tilt_beta: Some(170.0),
            ..Default::default()
        });
        for _ in 0..MAX_TICKS {
            if state.scene() != Scene::Playing {
                break;
            }
            frame(&mut state, TickInput::default());
        }

        match state.primary() {
            Some(cube) => log::info!(
                "Finished in scene {} after {} ticks: cube at ({:.1}, {:.1}) size {:.1}",
                state.scene().name(),
                state.time_ticks,
                cube.pos.x,
                cube.pos.y,
                cube.size
            ),
            None => log::info!(
                "Finished in scene {} after {} ticks with {} objects",
                state.scene().name(),
                state.time_ticks,
                state.objects.len()
            ),
        }
        log::info!(
            "Recorded {draw_calls} draw commands (seed {}, {} quality)",
            state.seed,
            settings.quality.as_str()
        );
    }
}
