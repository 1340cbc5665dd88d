//! The concrete render chain: scene pass, bloom, composite, present.

use crate::camera::PerspectiveCamera;
use crate::engine::RenderChain;
use crate::error::SphereError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::RenderTarget;
use crate::options::Options;
use crate::renderer::mesh_pass::MeshPass;
use crate::renderer::postprocess::bloom::BloomSettings;
use crate::renderer::postprocess::effect_composer::EffectComposer;
use crate::scene::Scene;

/// Owns the GPU context, the scene, and every pass that draws it.
///
/// With a surface, each frame is presented to the window or canvas. Without
/// one (headless), frames land in an offscreen target of the output format.
pub struct SceneRenderer {
    context: RenderContext,
    scene: Scene,
    meshes: MeshPass,
    effects: EffectComposer,
    clear_color: wgpu::Color,
    offscreen: Option<RenderTarget>,
}

impl SceneRenderer {
    /// Upload `scene` and build the post-processing chain at the context's
    /// current size.
    ///
    /// # Errors
    ///
    /// Returns [`SphereError::Shader`] if any shader fails to compose.
    pub fn new(
        context: RenderContext,
        scene: Scene,
        options: &Options,
    ) -> Result<Self, SphereError> {
        let mut shader_composer = ShaderComposer::new()?;
        let size = context.size();

        let meshes = MeshPass::new(&context.device, &mut shader_composer, &scene)?;
        let bloom = BloomSettings::from_options(&options.bloom);
        let effects = EffectComposer::new(
            &context.device,
            &mut shader_composer,
            context.format(),
            size,
            bloom,
        )?;
        let offscreen = (!context.has_surface())
            .then(|| RenderTarget::new(&context.device, "Offscreen Output", size, context.format()));

        let [r, g, b] = options.display.clear_color;
        log::debug!(
            "scene renderer ready: {} mesh(es), bloom strength {}",
            scene.meshes().len(),
            bloom.strength
        );

        Ok(Self {
            context,
            scene,
            meshes,
            effects,
            clear_color: wgpu::Color {
                r: f64::from(r),
                g: f64::from(g),
                b: f64::from(b),
                a: 1.0,
            },
            offscreen,
        })
    }

    /// The GPU context.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// The scene being drawn.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    fn encode(&self, target: &wgpu::TextureView) {
        let mut encoder = self.context.create_encoder();
        self.meshes.render(
            &mut encoder,
            self.effects.scene_view(),
            self.effects.depth_view(),
            self.clear_color,
        );
        self.effects.render(&mut encoder, target);
        self.context.submit(encoder);
    }
}

impl RenderChain for SceneRenderer {
    fn render(&mut self, camera: &PerspectiveCamera, elapsed: f32) -> Result<(), SphereError> {
        self.scene.sync(camera, elapsed);
        self.meshes.update(&self.context.queue, &self.scene, camera)?;

        if let Some(target) = &self.offscreen {
            self.encode(&target.view);
            return Ok(());
        }

        let frame = match self.context.get_next_frame() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.context.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface acquire timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(SphereError::Surface(e)),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.encode(&view);
        frame.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context.resize(width, height);
        self.effects.resize(&self.context.device, (width, height));
        if self.offscreen.is_some() {
            self.offscreen = Some(RenderTarget::new(
                &self.context.device,
                "Offscreen Output",
                (width, height),
                self.context.format(),
            ));
        }
        log::debug!("renderer resized to {width}x{height}");
    }

    fn size(&self) -> (u32, u32) {
        self.context.size()
    }

    fn bloom_strength(&self) -> f32 {
        self.effects.bloom().settings().strength
    }
}
