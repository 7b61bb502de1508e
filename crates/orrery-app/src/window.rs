//! Window creation and event handling via winit.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`]; [`run`] drives it.
//! All mutable state lives in the struct, so event callbacks never reach for
//! globals.

use std::sync::Arc;

use glam::Vec3;
use orrery_camera::Camera;
use orrery_config::{CameraConfig, Config};
use orrery_input::{KeyboardState, MouseState};
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::clock::FrameClock;
use crate::controls::apply_input;
use crate::error::AppError;
use crate::renderer::{FrameView, Renderer};
use crate::solar::SolarSystem;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

/// The camera described by `config`.
pub fn camera_from_config(config: &CameraConfig) -> Camera {
    Camera::new(
        Vec3::from_array(config.position),
        Vec3::from_array(config.world_up),
        config.yaw,
        config.pitch,
    )
    .with_speed(config.speed)
    .with_sensitivity(config.sensitivity)
    .with_zoom(config.zoom)
}

/// Application state: window, renderer, camera, input and timing.
pub struct AppState {
    config: Config,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    camera: Camera,
    keyboard: KeyboardState,
    mouse: MouseState,
    clock: FrameClock,
    system: SolarSystem,
    exit_requested: bool,
    error: Option<AppError>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            camera: camera_from_config(&config.camera),
            system: SolarSystem::from_config(&config.scene),
            config,
            window: None,
            renderer: None,
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            clock: FrameClock::new(),
            exit_requested: false,
            error: None,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// The error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<AppError> {
        self.error.take()
    }

    /// Apply this frame's input to the camera and clear per-frame input.
    fn update(&mut self, dt: f32) {
        if apply_input(&mut self.camera, &self.keyboard, &self.mouse, dt) {
            self.exit_requested = true;
        }
        self.keyboard.clear_transients();
        self.mouse.clear_transients();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.clock.tick();
        self.update(dt);
        if self.exit_requested {
            info!("Exit requested, shutting down");
            event_loop.exit();
            return;
        }

        if let Some(renderer) = &mut self.renderer {
            let view = FrameView {
                camera: &self.camera,
                time: self.clock.elapsed(),
            };
            if let Err(err) = renderer.render(&view, &self.system) {
                self.fail(event_loop, err);
                return;
            }
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window = Arc::new(
            event_loop.create_window(window_attributes_from_config(&self.config))?,
        );
        let renderer = Renderer::new(Arc::clone(&window), &self.config)?;
        let (width, height) = renderer.size();
        info!("Window created: {width}x{height}");

        self.mouse.set_captured(&window, true);
        window.request_redraw();
        self.renderer = Some(renderer);
        self.window = Some(window);
        // Startup loading should not count as the first frame's delta.
        self.clock = FrameClock::new();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none()
            && let Err(err) = self.init_window(event_loop)
        {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                    info!("Window resized to {}x{}", size.width, size.height);
                }
            }
            WindowEvent::Focused(focused) => {
                if focused {
                    if let Some(window) = &self.window {
                        self.mouse.set_captured(window, true);
                    }
                } else {
                    self.keyboard.release_all();
                    self.mouse.reset_anchor();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.keyboard.process_event(&event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.mouse.on_scroll(delta);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.mouse.on_raw_motion(delta.0, delta.1);
        }
    }
}

/// Open the window and run until it closes, Escape is pressed, or something
/// fails.
pub fn run(config: Config) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config);
    event_loop.run_app(&mut app)?;
    match app.take_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
