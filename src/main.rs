//! Pool entry point
//!
//! Owns the scene loop: frame clock, input, one simulation step and one
//! render pass per frame, then hands the framebuffer to the display.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::Clamped;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData, MouseEvent};

    use pool::platform::{EdgeTrigger, FrameClock, map_pointer, write_rgba_top_down};
    use pool::renderer::{Framebuffer, RenderStyle, render_with};
    use pool::sim::{Scene, TickInput, tick};
    use pool::Settings;

    /// App instance holding all state
    struct App {
        scene: Scene,
        fb: Framebuffer,
        style: RenderStyle,
        clock: FrameClock,
        fire: EdgeTrigger,
        mouse_down: bool,
        aim: Option<Vec2>,
        rgba: Vec<u8>,
        ctx: CanvasRenderingContext2d,
    }

    impl App {
        fn frame(&mut self, time_ms: f64) {
            let dt = self.clock.tick(time_ms / 1000.0);
            let input = TickInput {
                aim: self.aim,
                fire: self.fire.update(self.mouse_down),
            };
            tick(&mut self.scene, &input, dt);

            render_with(&mut self.fb, &self.scene, &self.style, self.aim);
            self.present();
        }

        /// Blit the framebuffer onto the canvas
        fn present(&mut self) {
            write_rgba_top_down(&self.fb, &mut self.rgba);
            match ImageData::new_with_u8_clamped_array_and_sh(
                Clamped(&self.rgba),
                self.fb.width(),
                self.fb.height(),
            ) {
                Ok(image) => {
                    if let Err(e) = self.ctx.put_image_data(&image, 0.0, 0.0) {
                        log::warn!("put_image_data failed: {:?}", e);
                    }
                }
                Err(e) => log::error!("ImageData creation failed: {:?}", e),
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pool starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let settings = Settings::default();
        let scene = settings.build_scene().expect("default settings are valid");

        // Canvas backing store is the framebuffer; CSS scales it up
        canvas.set_width(settings.width);
        canvas.set_height(settings.height);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let app = Rc::new(RefCell::new(App {
            scene,
            fb: Framebuffer::new(settings.width, settings.height),
            style: RenderStyle {
                background: settings.background,
                aim: settings.aim_color,
            },
            clock: FrameClock::new(settings.max_dt()),
            fire: EdgeTrigger::default(),
            mouse_down: false,
            aim: None,
            rgba: Vec::new(),
            ctx,
        }));

        setup_input_handlers(&canvas, app.clone(), settings.width, settings.height);
        request_animation_frame(app);

        log::info!("Pool running!");
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        app: Rc<RefCell<App>>,
        buffer_width: u32,
        buffer_height: u32,
    ) {
        // Mouse move - aim in buffer space
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let client = Vec2::new(
                    event.client_x() as f32 - rect.left() as f32,
                    event.client_y() as f32 - rect.top() as f32,
                );
                let size = Vec2::new(rect.width() as f32, rect.height() as f32);
                app.borrow_mut().aim = Some(map_pointer(client, size, buffer_width, buffer_height));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down/up - fire on the press edge
        for (name, down) in [("mousedown", true), ("mouseup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().mouse_down = down;
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            app.borrow_mut().frame(time);
            request_animation_frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use glam::Vec2;

    use pool::renderer::{Framebuffer, RenderStyle, render_with};
    use pool::settings::ScatterSpec;
    use pool::sim::{TickInput, tick};
    use pool::Settings;

    /// Run the ball simulation without a window
    #[derive(Parser, Debug)]
    #[command(version, about)]
    struct Args {
        /// JSON scene config (defaults to the two-ball reference table)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of frames to simulate
        #[arg(short, long, default_value_t = 600)]
        frames: u32,

        /// Scatter this many seeded random balls into the scene
        #[arg(short, long)]
        balls: Option<usize>,

        /// Seed for --balls
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Launch the cue ball toward X Y (buffer space) on the first frame
        #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
        fire_at: Option<Vec<f32>>,

        /// Print the final scene as JSON on stdout
        #[arg(long)]
        dump: bool,
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();

        let mut settings = match &args.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => Settings::default(),
        };
        if let Some(count) = args.balls {
            settings.scatter = Some(ScatterSpec {
                seed: args.seed,
                count,
                ..ScatterSpec::default()
            });
        }

        let mut scene = settings.build_scene().context("invalid scene")?;
        let mut fb = Framebuffer::new(settings.width, settings.height);
        let style = RenderStyle {
            background: settings.background,
            aim: settings.aim_color,
        };

        let aim = args.fire_at.as_deref().map(|xy| Vec2::new(xy[0], xy[1]));
        let dt = settings.max_dt();
        let frames_per_second = settings.target_frame_rate.round().max(1.0) as u32;

        log::info!(
            "Simulating {} frames at dt {:.4}s with {} balls",
            args.frames,
            dt,
            scene.balls.len()
        );

        for frame in 0..args.frames {
            let input = TickInput {
                aim,
                fire: frame == 0 && aim.is_some(),
            };
            tick(&mut scene, &input, dt);
            render_with(&mut fb, &scene, &style, None);

            if frame % frames_per_second == 0 {
                log::info!(
                    "t={:.2}s energy={:.2} momentum={:?}",
                    frame as f32 * dt,
                    scene.kinetic_energy(),
                    scene.total_momentum()
                );
            }
        }

        let drawn = fb.pixels().len() - fb.count(style.background);
        log::info!(
            "Done: energy={:.3}, {} pixels drawn in final frame, at rest: {}",
            scene.kinetic_energy(),
            drawn,
            scene.at_rest(0.01)
        );

        if args.dump {
            println!("{}", serde_json::to_string_pretty(&scene)?);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Pool (native, headless) starting...");
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
