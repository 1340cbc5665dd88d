//! Standalone window backed by winit.
//!
//! The window's redraw requests play the role of the per-frame callback:
//! each `RedrawRequested` runs one [`FrameTask`](crate::schedule::FrameTask)
//! frame and requests the next redraw until the window closes or the
//! [`CancelHandle`] fires.
//!
//! ```no_run
//! # use wiresphere::Viewer;
//! Viewer::builder()
//!     .with_title("Wiresphere")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    engine::{bootstrap, Engine},
    error::SphereError,
    gpu::render_context::RenderContext,
    options::Options,
    schedule::CancelHandle,
    InputEvent, MouseButton,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Options,
    title: Option<String>,
    cancel: CancelHandle,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            options: Options::default(),
            title: None,
            cancel: CancelHandle::new(),
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Set the window title (defaults to `display.title`).
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Stop the frame loop when `cancel` fires.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        let title = self
            .title
            .unwrap_or_else(|| self.options.display.title.clone());
        Viewer {
            options: self.options,
            title,
            cancel: self.cancel,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A native window showing the wireframe sphere.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
    title: String,
    cancel: CancelHandle,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Handle that stops the frame loop and closes the window.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`SphereError::Viewer`] if the event loop fails, or the
    /// first error raised while building the engine or running a frame.
    pub fn run(self) -> Result<(), SphereError> {
        let event_loop =
            EventLoop::new().map_err(|e| SphereError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            options: self.options,
            title: self.title,
            cancel: self.cancel,
            error: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| SphereError::Viewer(e.to_string()))?;

        app.error.map_or(Ok(()), Err)
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<Engine>,
    options: Options,
    title: String,
    cancel: CancelHandle,
    /// First fatal error, reported when the loop exits.
    error: Option<SphereError>,
}

/// Initial surface size for a window size. Never zero.
fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: SphereError) {
        log::error!("{error}");
        self.cancel.cancel();
        if self.error.is_none() {
            self.error = Some(error);
        }
        event_loop.exit();
    }

    fn request_redraw(&self) {
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn forward(&mut self, event: InputEvent) {
        if let Some(engine) = &mut self.engine {
            let _ = engine.handle_input(event);
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = if let Some(mon) = &monitor {
            let mon_size = mon.size();
            let scale = mon.scale_factor();
            let logical_w = (f64::from(mon_size.width) / scale * 0.75) as u32;
            let logical_h = (f64::from(mon_size.height) / scale * 0.75) as u32;
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(logical_w, logical_h))
        } else {
            Window::default_attributes().with_title(&self.title)
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, SphereError::Viewer(e.to_string()));
                return;
            }
        };

        let size = viewport_size(window.inner_size());
        let engine = pollster::block_on(RenderContext::new(Arc::clone(&window), size))
            .map_err(SphereError::from)
            .and_then(|context| bootstrap(context, &self.options));

        match engine {
            Ok(engine) => {
                window.request_redraw();
                self.window = Some(window);
                self.engine = Some(engine);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            self.cancel.cancel();
            event_loop.exit();
            return;
        }

        if self.window.is_none() || self.engine.is_none() {
            return;
        }

        match event {
            // Minimised windows report 0x0, which the engine ignores
            WindowEvent::Resized(event_size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(event_size.width, event_size.height);
                }
            }

            WindowEvent::RedrawRequested => {
                if self.cancel.is_cancelled() {
                    event_loop.exit();
                    return;
                }
                let result = match &mut self.engine {
                    Some(engine) => engine.run_frame(),
                    None => Ok(()),
                };
                match result {
                    Ok(()) => self.request_redraw(),
                    Err(e) => self.fail(event_loop, e),
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                if let Some(button) = MouseButton::from_winit(button) {
                    self.forward(InputEvent::MouseButton {
                        button,
                        pressed: state == ElementState::Pressed,
                    });
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.forward(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.forward(InputEvent::from(delta));
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.forward(InputEvent::ModifiersChanged {
                    shift: modifiers.state().shift_key(),
                });
            }

            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_title_from_options() {
        let viewer = Viewer::builder().build();
        assert_eq!(viewer.title, "Wiresphere");

        let viewer = Viewer::builder().with_title("Custom").build();
        assert_eq!(viewer.title, "Custom");
    }

    #[test]
    fn cancel_handle_is_shared() {
        let cancel = CancelHandle::new();
        let viewer = Viewer::builder().with_cancel(cancel.clone()).build();
        viewer.cancel_handle().cancel();
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn viewport_is_never_zero() {
        let size = winit::dpi::PhysicalSize::new(0, 0);
        assert_eq!(viewport_size(size), (1, 1));
    }
}
