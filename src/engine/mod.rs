//! The per-frame engine.
//!
//! [`Engine`] owns a render chain, camera controls and a clock. Each frame
//! reads the clock, renders the chain once and updates the controls once.
//! Resize and input events are applied between frames on the same thread.
//!
//! The render chain and the controls sit behind traits so frame scheduling
//! and resize behaviour can be exercised without a GPU.

mod construction;

pub use construction::{bootstrap, build_controls};

use crate::camera::{CameraControls, OrbitControls, PerspectiveCamera};
use crate::error::SphereError;
use crate::input::InputEvent;
use crate::renderer::scene_renderer::SceneRenderer;
use crate::schedule::FrameTask;
use crate::util::clock::Clock;

/// Something that draws the scene for a camera and owns the output size.
pub trait RenderChain {
    /// Render and present one frame. `elapsed` is seconds since the clock
    /// started.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame could not be encoded or presented.
    fn render(&mut self, camera: &PerspectiveCamera, elapsed: f32) -> Result<(), SphereError>;
    /// Resize every output-sized resource. Zero sizes are ignored.
    fn resize(&mut self, width: u32, height: u32);
    /// Current output size in physical pixels.
    fn size(&self) -> (u32, u32);
    /// Current bloom strength.
    fn bloom_strength(&self) -> f32;
}

/// Render chain, controls and clock driven one frame at a time.
pub struct Engine<R = SceneRenderer, C = OrbitControls> {
    renderer: R,
    controls: C,
    clock: Clock,
    frames: u64,
}

impl<R: RenderChain, C: CameraControls> Engine<R, C> {
    /// Assemble an engine. The clock starts on the first frame.
    #[must_use]
    pub fn new(renderer: R, controls: C) -> Self {
        Self {
            renderer,
            controls,
            clock: Clock::new(),
            frames: 0,
        }
    }

    /// The render chain.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable render chain access.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// The camera controls.
    pub fn controls(&self) -> &C {
        &self.controls
    }

    /// The current camera.
    pub fn camera(&self) -> &PerspectiveCamera {
        self.controls.camera()
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame: read the clock, render, then update the controls.
    ///
    /// # Errors
    ///
    /// Returns the render chain's error; the controls are not updated for
    /// a failed frame.
    pub fn run_frame(&mut self) -> Result<(), SphereError> {
        let elapsed = self.clock.elapsed_time();
        self.renderer.render(self.controls.camera(), elapsed)?;
        let _ = self.controls.update();
        self.frames += 1;
        Ok(())
    }

    /// Apply a viewport resize to the camera and the render chain.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.controls.resize(width, height);
        self.renderer.resize(width, height);
    }

    /// Forward a pointer event to the controls. Returns `true` if it was
    /// consumed.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        self.controls.handle_input(event)
    }
}

impl<R: RenderChain, C: CameraControls> FrameTask for Engine<R, C> {
    fn run_frame(&mut self) -> Result<(), SphereError> {
        Engine::run_frame(self)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::input::MouseButton;
    use crate::options::Options;
    use crate::renderer::postprocess::bloom::BloomSettings;
    use crate::scene::Scene;
    use crate::schedule::{CancelHandle, FrameScheduler, IntervalScheduler};

    /// Render chain that records calls instead of drawing.
    struct MockChain {
        size: (u32, u32),
        renders: u32,
        last_elapsed: f32,
        scene: Scene,
        bloom_strength: f32,
        fail: bool,
    }

    impl MockChain {
        fn new(options: &Options, camera: &PerspectiveCamera, size: (u32, u32)) -> Self {
            Self {
                size,
                renders: 0,
                last_elapsed: -1.0,
                scene: Scene::sphere(options, camera, size.0, size.1),
                bloom_strength: BloomSettings::from_options(&options.bloom).strength,
                fail: false,
            }
        }
    }

    impl RenderChain for MockChain {
        fn render(&mut self, camera: &PerspectiveCamera, elapsed: f32) -> Result<(), SphereError> {
            if self.fail {
                return Err(SphereError::Viewer("device lost".into()));
            }
            self.renders += 1;
            self.last_elapsed = elapsed;
            self.scene.sync(camera, elapsed);
            Ok(())
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
        }

        fn size(&self) -> (u32, u32) {
            self.size
        }

        fn bloom_strength(&self) -> f32 {
            self.bloom_strength
        }
    }

    /// Controls that count updates around a fixed camera.
    struct CountingControls {
        camera: PerspectiveCamera,
        updates: u32,
    }

    impl CameraControls for CountingControls {
        fn camera(&self) -> &PerspectiveCamera {
            &self.camera
        }

        fn update(&mut self) -> bool {
            self.updates += 1;
            false
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.camera.set_viewport(width, height);
        }
    }

    fn mock_engine(size: (u32, u32)) -> Engine<MockChain, OrbitControls> {
        let options = Options::default();
        let controls = build_controls(&options, size.0, size.1);
        let chain = MockChain::new(&options, controls.camera(), size);
        Engine::new(chain, controls)
    }

    fn counting_engine() -> Engine<MockChain, CountingControls> {
        let options = Options::default();
        let camera = PerspectiveCamera::from_options(&options.camera, 800, 600);
        let chain = MockChain::new(&options, &camera, (800, 600));
        Engine::new(chain, CountingControls { camera, updates: 0 })
    }

    #[test]
    fn n_ticks_render_and_update_n_times() {
        let mut engine = counting_engine();
        for _ in 0..10 {
            engine.run_frame().unwrap();
        }
        assert_eq!(engine.renderer().renders, 10);
        assert_eq!(engine.controls().updates, 10);
        assert_eq!(engine.frames(), 10);
    }

    #[test]
    fn scheduler_drives_the_engine() {
        let engine = Rc::new(RefCell::new(counting_engine()));
        IntervalScheduler::new(0)
            .with_frame_limit(25)
            .schedule(Rc::clone(&engine), CancelHandle::new())
            .unwrap();
        let engine = engine.borrow();
        assert_eq!(engine.renderer().renders, 25);
        assert_eq!(engine.controls().updates, 25);
    }

    #[test]
    fn failed_render_skips_controls_update() {
        let mut engine = counting_engine();
        engine.renderer_mut().fail = true;
        assert!(engine.run_frame().is_err());
        assert_eq!(engine.controls().updates, 0);
        assert_eq!(engine.frames(), 0);
    }

    #[test]
    fn resize_updates_aspect_and_renderer_size() {
        let mut engine = mock_engine((800, 600));
        engine.resize(1920, 1080);
        assert!((engine.camera().aspect - 1920.0 / 1080.0).abs() < 1e-6);
        assert_eq!(engine.renderer().size(), (1920, 1080));
        let projection = engine.camera().projection_matrix();
        let expected = glam::Mat4::perspective_rh(
            75f32.to_radians(),
            1920.0 / 1080.0,
            0.1,
            1000.0,
        );
        assert!(projection.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn zero_resize_is_ignored() {
        let mut engine = mock_engine((800, 600));
        engine.resize(0, 300);
        assert_eq!(engine.renderer().size(), (800, 600));
        // Minimised native window
        engine.resize(0, 0);
        assert_eq!(engine.renderer().size(), (800, 600));
        assert!((engine.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn shipped_bloom_starts_disabled() {
        let engine = mock_engine((800, 600));
        assert_eq!(engine.renderer().bloom_strength(), 0.0);
    }

    #[test]
    fn resolution_uniform_keeps_its_startup_value() {
        let mut engine = mock_engine((1024, 768));
        let uniforms = engine.renderer().scene.meshes()[0].material.uniforms();
        assert_eq!(
            uniforms.vec3("uResolution"),
            Some(glam::Vec3::new(1024.0, 768.0, 1.0))
        );
        assert_ne!(uniforms.float("uResolution"), Some(200.0));

        engine.resize(640, 480);
        engine.run_frame().unwrap();
        let uniforms = engine.renderer().scene.meshes()[0].material.uniforms();
        assert_eq!(
            uniforms.vec3("uResolution"),
            Some(glam::Vec3::new(1024.0, 768.0, 1.0))
        );
    }

    #[test]
    fn frames_feed_time_and_camera_to_the_material() {
        let mut engine = mock_engine((800, 600));
        engine.run_frame().unwrap();
        let chain = engine.renderer();
        assert!(chain.last_elapsed >= 0.0);
        let uniforms = chain.scene.meshes()[0].material.uniforms();
        assert_eq!(uniforms.float("uTime"), Some(chain.last_elapsed));
        let eye = uniforms.vec3("cameraPosition").unwrap();
        assert!(eye.abs_diff_eq(glam::Vec3::new(0.0, 0.0, 5.0), 1e-4));
        assert!(eye.abs_diff_eq(engine.camera().eye, 1e-4));
    }

    #[test]
    fn input_reaches_the_controls() {
        let mut engine = mock_engine((800, 600));
        assert!(engine.handle_input(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        }));
        let _ = engine.handle_input(InputEvent::CursorMoved { x: 100.0, y: 100.0 });
        let _ = engine.handle_input(InputEvent::CursorMoved { x: 180.0, y: 100.0 });
        let before = engine.camera().eye;
        for _ in 0..5 {
            engine.run_frame().unwrap();
        }
        assert_ne!(engine.camera().eye, before);
    }
}
