use std::ffi::CString;
use std::num::NonZeroU32;
use std::time::Instant;

use anyhow::{ anyhow, Context as _ };
use glutin::config::{ ConfigTemplateBuilder, GlConfig };
use glutin::context::{ ContextApi, ContextAttributesBuilder, PossiblyCurrentContext, Version };
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{ Surface, SurfaceAttributesBuilder, WindowSurface };
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::event::{ ElementState, KeyEvent, WindowEvent };
use winit::event_loop::{ ActiveEventLoop, EventLoop };
use winit::keyboard::{ KeyCode, PhysicalKey };
use winit::window::{ Fullscreen, Window, WindowId };

use glscene::engine::config::DEFAULT_CONFIG_PATH;
use glscene::engine::graphics::device::init_gl_state;
use glscene::{ Scene, SceneConfig };

struct Renderer {
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    gl: glow::Context,
    scene: Scene,
}

struct App {
    config: SceneConfig,
    renderer: Option<Renderer>,
    last_frame_time: Option<Instant>,
}

impl App {
    fn new(config: SceneConfig) -> Self {
        Self { config, renderer: None, last_frame_time: None }
    }

    fn create_renderer(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<Renderer> {
        let window_config = &self.config.window;
        let mut attributes = Window::default_attributes()
            .with_title(window_config.title.as_str())
            .with_inner_size(winit::dpi::PhysicalSize::new(window_config.width, window_config.height));
        if window_config.fullscreen {
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }
        let window = event_loop.create_window(attributes).context("could not create window")?;

        let (_, gl_config) = DisplayBuilder::new()
            .build(event_loop, ConfigTemplateBuilder::new(), |configs| {
                // glutin only calls the picker with a non-empty iterator
                configs.max_by_key(|config| config.num_samples()).expect("at least one GL config")
            })
            .map_err(|e| anyhow!("could not pick a GL config: {e}"))?;

        let display = gl_config.display();
        let raw_handle = window.window_handle().context("window has no handle")?.as_raw();
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(raw_handle));
        let not_current = unsafe { display.create_context(&gl_config, &context_attributes) }.context(
            "could not create OpenGL 3.3 context"
        )?;

        let size = window.inner_size();
        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>
            ::new()
            .build(
                raw_handle,
                NonZeroU32::new(size.width.max(1)).unwrap_or(NonZeroU32::MIN),
                NonZeroU32::new(size.height.max(1)).unwrap_or(NonZeroU32::MIN)
            );
        let gl_surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes) }.context(
            "could not create window surface"
        )?;
        let gl_context = not_current.make_current(&gl_surface).context("could not make GL context current")?;

        let gl = unsafe {
            glow::Context::from_loader_function(|symbol| {
                match CString::new(symbol) {
                    Ok(symbol) => display.get_proc_address(&symbol) as *const _,
                    Err(_) => std::ptr::null(),
                }
            })
        };
        init_gl_state(&gl);

        let scene = Scene::build(&gl, &self.config).context("could not build scene")?;
        window.request_redraw();

        Ok(Renderer { window, gl_context, gl_surface, gl, scene })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        match self.create_renderer(event_loop) {
            Ok(renderer) => {
                log::info!("✅ Renderer ready");
                self.renderer = Some(renderer);
                self.last_frame_time = Some(Instant::now());
            }
            Err(e) => {
                log::error!("{:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(KeyCode::Escape), state: ElementState::Pressed, .. },
                ..
            } => event_loop.exit(),

            WindowEvent::Resized(size) => {
                if let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
                    renderer.gl_surface.resize(&renderer.gl_context, width, height);
                }
                renderer.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = self.last_frame_time.map(|last| (now - last).as_secs_f32()).unwrap_or(0.0);
                self.last_frame_time = Some(now);

                let size = renderer.window.inner_size();
                renderer.window.set_title(&format!("{}x{}", size.width, size.height));
                renderer.scene.frame(&renderer.gl, size.width, size.height, delta_time);

                if let Err(e) = renderer.gl_surface.swap_buffers(&renderer.gl_context) {
                    log::error!("swap_buffers failed: {}", e);
                    event_loop.exit();
                    return;
                }
                renderer.window.request_redraw();
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.take() {
            renderer.scene.release(&renderer.gl);
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SceneConfig::load_or_default(DEFAULT_CONFIG_PATH).context("could not load scene config")?;
    let event_loop = EventLoop::new().context("could not create event loop")?;

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}
