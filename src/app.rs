//! # Window Host (`app.rs`)
//!
//! [`App`] is the `winit` application handler that owns the viewer window and the [`Renderer`].
//!
//! ## Lifecycle
//!
//! - **Resumed**: creates one non-resizable window from the [`WindowConfig`](crate::WindowConfig)
//!   and builds the renderer on it, blocking on setup with `pollster`. A setup failure is logged,
//!   kept for the caller (see [`App::take_setup_error`]) and ends the event loop.
//! - **Events**: pointer events feed a [`PointerTracker`]. `Escape` or a close request tears the
//!   viewer down: the renderer is dropped first, since its surface refers to the window, then the
//!   window, then the loop exits.
//! - **Frames**: with `ControlFlow::Poll`, `about_to_wait` asks for a redraw once pending events are
//!   drained, and each `RedrawRequested` runs exactly one tick of the frame loop.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::ViewerConfig;
use crate::error::RendererError;
use crate::input::PointerTracker;
use crate::renderer::{FrameOutcome, Renderer};

pub struct App {
    config: ViewerConfig,

    window: Option<Arc<Window>>,

    renderer: Option<Renderer>,

    pointer: PointerTracker,

    /// Why setup failed, if it did.
    setup_error: Option<RendererError>,
}

impl App {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            window: None,
            renderer: None,
            pointer: PointerTracker::new(),
            setup_error: None,
        }
    }

    /// The setup failure that ended the event loop, if any.
    pub fn take_setup_error(&mut self) -> Option<RendererError> {
        self.setup_error.take()
    }

    fn fail_setup(&mut self, event_loop: &ActiveEventLoop, err: RendererError) {
        log::error!("Renderer setup failed ({}): {err}", err.kind());
        self.setup_error = Some(err);
        self.teardown(event_loop);
    }

    fn teardown(&mut self, event_loop: &ActiveEventLoop) {
        self.renderer = None;
        self.window = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_config = &self.config.window;
        let attributes = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height))
            .with_resizable(false);

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                let err = RendererError::DeviceUnavailable(format!("window creation: {err}"));
                self.fail_setup(event_loop, err);
                return;
            }
        };
        self.window = Some(window.clone());

        let PhysicalSize { width, height } = window.inner_size();
        log::info!("Created {width}x{height} window");

        let renderer = pollster::block_on(Renderer::create(
            window,
            width,
            height,
            &self.config.renderer,
        ));
        match renderer {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(err) => self.fail_setup(event_loop, err),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        self.pointer.handle_event(&event);

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                log::info!("Escape pressed. Exiting...");
                self.teardown(event_loop);
            }
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting...");
                self.teardown(event_loop);
            }
            WindowEvent::RedrawRequested => {
                let Some(renderer) = self.renderer.as_mut() else {
                    return;
                };
                let input = self.pointer.take_input();
                if renderer.run_frame(&input) == FrameOutcome::Exit {
                    self.teardown(event_loop);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
