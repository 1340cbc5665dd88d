//! Browser entry point: a full-window canvas driven by
//! `requestAnimationFrame`.
//!
//! The wasm start function creates the canvas, builds the engine on it and
//! hands the engine to an [`AnimationFrameScheduler`]. Window resizes and
//! pointer events are applied between frames. The canvas renders at CSS
//! pixel size, with a pixel ratio of 1.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};
use web_sys::{EventTarget, HtmlCanvasElement, MouseEvent, WheelEvent};

use crate::{
    engine::{bootstrap, Engine},
    error::SphereError,
    gpu::render_context::RenderContext,
    options::Options,
    schedule::{CancelHandle, FrameScheduler, FrameTask},
    InputEvent, MouseButton,
};

type SharedEngine = Rc<RefCell<Engine>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn js_error(e: JsValue) -> SphereError {
    SphereError::Web(format!("{e:?}"))
}

fn browser_window() -> Result<web_sys::Window, SphereError> {
    web_sys::window().ok_or_else(|| SphereError::Web("no global window".to_owned()))
}

/// Window inner size in CSS pixels. Never zero.
fn viewport_size(window: &web_sys::Window) -> (u32, u32) {
    let css = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
    let width = css(window.inner_width());
    let height = css(window.inner_height());
    ((width as u32).max(1), (height as u32).max(1))
}

// ── Scheduler ────────────────────────────────────────────────────────────

/// Runs one frame per browser animation frame.
///
/// [`schedule`](FrameScheduler::schedule) returns as soon as the first frame
/// is requested. Each callback runs the task and requests the next frame;
/// a cancelled handle or a failed frame ends the chain.
pub struct AnimationFrameScheduler {
    window: web_sys::Window,
}

impl AnimationFrameScheduler {
    /// Scheduler bound to the global `window`.
    ///
    /// # Errors
    ///
    /// Returns [`SphereError::Web`] outside a browser main thread.
    pub fn new() -> Result<Self, SphereError> {
        Ok(Self {
            window: browser_window()?,
        })
    }
}

fn request_frame(window: &web_sys::Window, callback: &FrameCallback) -> Result<i32, SphereError> {
    let slot = callback.borrow();
    let closure = slot
        .as_ref()
        .ok_or_else(|| SphereError::Web("frame callback missing".to_owned()))?;
    window
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .map_err(js_error)
}

impl FrameScheduler for AnimationFrameScheduler {
    fn schedule<T: FrameTask + 'static>(
        self,
        mut task: T,
        cancel: CancelHandle,
    ) -> Result<(), SphereError> {
        // The callback re-requests itself, so it holds a handle to its own slot
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let next = Rc::clone(&callback);
        let window = self.window.clone();

        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if cancel.is_cancelled() {
                log::info!("animation loop cancelled");
                return;
            }
            if let Err(e) = task.run_frame() {
                log::error!("frame failed, stopping animation loop: {e}");
                cancel.cancel();
                return;
            }
            if let Err(e) = request_frame(&window, &next) {
                log::error!("could not request the next frame: {e}");
            }
        }) as Box<dyn FnMut()>));

        let _ = request_frame(&self.window, &callback)?;
        Ok(())
    }
}

// ── Canvas + listeners ───────────────────────────────────────────────────

fn add_listener<E>(
    target: &EventTarget,
    kind: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<(), SphereError>
where
    E: wasm_bindgen::convert::FromWasmAbi + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target
        .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        .map_err(js_error)?;
    // Listeners live as long as the page
    closure.forget();
    Ok(())
}

fn forward(engine: &SharedEngine, event: InputEvent) {
    if let Ok(mut engine) = engine.try_borrow_mut() {
        let _ = engine.handle_input(event);
    }
}

fn create_canvas(window: &web_sys::Window) -> Result<HtmlCanvasElement, SphereError> {
    let document = window
        .document()
        .ok_or_else(|| SphereError::Web("no document".to_owned()))?;
    let body = document
        .body()
        .ok_or_else(|| SphereError::Web("document has no body".to_owned()))?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| SphereError::Web("created element is not a canvas".to_owned()))?;

    let (width, height) = viewport_size(window);
    canvas.set_width(width);
    canvas.set_height(height);
    canvas
        .set_attribute("style", "display: block; width: 100vw; height: 100vh;")
        .map_err(js_error)?;
    let _ = body.append_child(&canvas).map_err(js_error)?;
    Ok(canvas)
}

fn install_listeners(
    window: &web_sys::Window,
    canvas: &HtmlCanvasElement,
    engine: &SharedEngine,
) -> Result<(), SphereError> {
    {
        let window_for_resize = window.clone();
        let canvas = canvas.clone();
        let engine = Rc::clone(engine);
        add_listener(window, "resize", move |_: web_sys::Event| {
            let (width, height) = viewport_size(&window_for_resize);
            canvas.set_width(width);
            canvas.set_height(height);
            if let Ok(mut engine) = engine.try_borrow_mut() {
                engine.resize(width, height);
            }
        })?;
    }

    // Drags start on the canvas but may end anywhere on the page
    let canvas_target: &EventTarget = canvas;
    let window_target: &EventTarget = window;
    for (kind, target, pressed) in [
        ("mousedown", canvas_target, true),
        ("mouseup", window_target, false),
    ] {
        let engine = Rc::clone(engine);
        add_listener(target, kind, move |ev: MouseEvent| {
            forward(&engine, InputEvent::ModifiersChanged { shift: ev.shift_key() });
            if let Some(button) = MouseButton::from_dom(ev.button()) {
                forward(&engine, InputEvent::MouseButton { button, pressed });
            }
        })?;
    }

    {
        let engine = Rc::clone(engine);
        add_listener(canvas, "mousemove", move |ev: MouseEvent| {
            forward(&engine, InputEvent::canvas_cursor(ev.offset_x(), ev.offset_y()));
        })?;
    }

    {
        let engine = Rc::clone(engine);
        add_listener(canvas, "wheel", move |ev: WheelEvent| {
            ev.prevent_default();
            forward(&engine, InputEvent::scroll_pixels(ev.delta_y()));
        })?;
    }

    // Right-drag pans; keep the context menu out of the way
    add_listener(canvas, "contextmenu", |ev: MouseEvent| ev.prevent_default())
}

/// Build the scene on a fresh full-window canvas and start the animation
/// loop. Returns the handle that stops it.
///
/// # Errors
///
/// Returns [`SphereError::Web`] on DOM failures and the usual GPU or shader
/// errors from [`bootstrap`].
pub async fn run(options: Options) -> Result<CancelHandle, SphereError> {
    let window = browser_window()?;
    let canvas = create_canvas(&window)?;
    let size = (canvas.width(), canvas.height());

    let context = RenderContext::new(wgpu::SurfaceTarget::Canvas(canvas.clone()), size).await?;
    let engine: SharedEngine = Rc::new(RefCell::new(bootstrap(context, &options)?));
    install_listeners(&window, &canvas, &engine)?;

    let cancel = CancelHandle::new();
    AnimationFrameScheduler::new()?.schedule(engine, cancel.clone())?;
    Ok(cancel)
}

/// wasm start hook: installs the panic hook and console logger, then runs
/// the scene with default options.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    wasm_bindgen_futures::spawn_local(async {
        if let Err(e) = run(Options::default()).await {
            log::error!("wiresphere failed to start: {e}");
        }
    });
}
