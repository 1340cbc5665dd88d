//! Ordered post-processing chain: scene pass targets, bloom, composite.

use crate::error::SphereError;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::RenderTarget;

use super::bloom::{BloomPass, BloomSettings};
use super::composite::CompositePass;
use super::screen_pass::ScreenPass;

/// HDR colour target the scene pass draws into.
pub const SCENE_COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Depth target format of the scene pass.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Owns the scene colour/depth targets and every fullscreen pass after the
/// scene pass.
pub struct EffectComposer {
    scene_color: RenderTarget,
    depth: RenderTarget,
    bloom: BloomPass,
    composite: CompositePass,
    size: (u32, u32),
}

impl EffectComposer {
    /// Build the chain for a `size` viewport writing to `output_format`.
    ///
    /// # Errors
    ///
    /// Returns [`SphereError::Shader`] if a pass shader fails to compose.
    pub fn new(
        device: &wgpu::Device,
        shader_composer: &mut ShaderComposer,
        output_format: wgpu::TextureFormat,
        size: (u32, u32),
        bloom: BloomSettings,
    ) -> Result<Self, SphereError> {
        let scene_color = RenderTarget::new(device, "Scene Color", size, SCENE_COLOR_FORMAT);
        let depth = RenderTarget::new(device, "Scene Depth", size, DEPTH_FORMAT);
        let bloom = BloomPass::new(device, shader_composer, &scene_color.view, size, bloom)?;
        let composite = CompositePass::new(
            device,
            shader_composer,
            output_format,
            &scene_color.view,
            bloom.output_view(),
            bloom.enabled(),
        )?;
        Ok(Self {
            scene_color,
            depth,
            bloom,
            composite,
            size,
        })
    }

    /// View the scene pass renders colour into.
    pub fn scene_view(&self) -> &wgpu::TextureView {
        &self.scene_color.view
    }

    /// View the scene pass renders depth into.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth.view
    }

    /// The bloom pass.
    pub fn bloom(&self) -> &BloomPass {
        &self.bloom
    }

    /// Rebuild every resolution-dependent texture.
    pub fn resize(&mut self, device: &wgpu::Device, size: (u32, u32)) {
        if size == self.size {
            return;
        }
        self.size = size;
        self.scene_color = RenderTarget::new(device, "Scene Color", size, SCENE_COLOR_FORMAT);
        self.depth = RenderTarget::new(device, "Scene Depth", size, DEPTH_FORMAT);
        self.bloom.resize(device, size, &self.scene_color.view);
        self.composite
            .rebind(device, &self.scene_color.view, self.bloom.output_view());
    }

    /// Encode every pass after the scene pass, ending in `target`.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        if self.bloom.enabled() {
            self.bloom.render(encoder);
        }
        self.composite.render(encoder, target);
    }
}
