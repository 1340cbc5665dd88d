//! Composite pass: adds the bloom output to the scene colour and writes the
//! result to the presentation target.

use crate::error::SphereError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, draw_fullscreen, filtering_sampler, linear_sampler,
    texture_2d, uniform_buffer, uniform_buffer_init,
};
use crate::gpu::shader_composer::ShaderComposer;

/// Composite params, must match WGSL `CompositeParams`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CompositeParams {
    /// 1.0 when the bloom output holds this frame's glow, else 0.0.
    pub bloom_weight: f32,
    /// Exponent applied to the final colour.
    pub gamma: f32,
    /// Padding for GPU alignment.
    pub _pad: [f32; 2],
}

impl CompositeParams {
    /// Params for an output of the given format.
    #[must_use]
    pub fn new(format: wgpu::TextureFormat, bloom_enabled: bool) -> Self {
        Self {
            bloom_weight: if bloom_enabled { 1.0 } else { 0.0 },
            gamma: output_gamma(format),
            _pad: [0.0; 2],
        }
    }
}

/// sRGB targets encode in hardware; linear targets get an approximate
/// 1/2.2 curve in the shader.
#[must_use]
pub fn output_gamma(format: wgpu::TextureFormat) -> f32 {
    if format.is_srgb() {
        1.0
    } else {
        1.0 / 2.2
    }
}

/// Final fullscreen pass writing to the surface (or offscreen output).
pub struct CompositePass {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    params_buffer: wgpu::Buffer,
}

impl CompositePass {
    /// Build the pass for an output of `format`.
    ///
    /// # Errors
    ///
    /// Returns [`SphereError::Shader`] if the composite shader fails to
    /// compose.
    pub fn new(
        device: &wgpu::Device,
        shader_composer: &mut ShaderComposer,
        format: wgpu::TextureFormat,
        scene: &wgpu::TextureView,
        bloom: &wgpu::TextureView,
        bloom_enabled: bool,
    ) -> Result<Self, SphereError> {
        let sampler = linear_sampler(device, "Composite Sampler");
        let params = CompositeParams::new(format, bloom_enabled);
        let params_buffer = uniform_buffer_init(device, "Composite Params", &params);

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Composite Layout"),
            entries: &[
                texture_2d(0),
                texture_2d(1),
                filtering_sampler(2),
                uniform_buffer(3),
            ],
        });

        let shader = shader_composer.compose(
            device,
            "Composite Shader",
            include_str!("../../../assets/shaders/screen/composite.wgsl"),
            "composite.wgsl",
        )?;
        let pipeline =
            create_screen_space_pipeline(device, "Composite", &shader, format, None, &[&layout]);

        let bind_group =
            Self::create_bind_group(device, &layout, scene, bloom, &sampler, &params_buffer);

        Ok(Self {
            pipeline,
            layout,
            bind_group,
            sampler,
            params_buffer,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        scene: &wgpu::TextureView,
        bloom: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        params_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Composite BG"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(scene),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(bloom),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
        })
    }

    /// Point the pass at recreated input textures (after a resize).
    pub fn rebind(
        &mut self,
        device: &wgpu::Device,
        scene: &wgpu::TextureView,
        bloom: &wgpu::TextureView,
    ) {
        self.bind_group = Self::create_bind_group(
            device,
            &self.layout,
            scene,
            bloom,
            &self.sampler,
            &self.params_buffer,
        );
    }

    /// Encode the pass, clearing and overwriting `target`.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        draw_fullscreen(
            encoder,
            "Composite",
            target,
            &self.pipeline,
            &self.bind_group,
            true,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_outputs_skip_shader_gamma() {
        assert_eq!(output_gamma(wgpu::TextureFormat::Bgra8UnormSrgb), 1.0);
        assert_eq!(output_gamma(wgpu::TextureFormat::Rgba8UnormSrgb), 1.0);
        assert!((output_gamma(wgpu::TextureFormat::Bgra8Unorm) - 1.0 / 2.2).abs() < 1e-6);
    }

    #[test]
    fn disabled_bloom_has_zero_weight() {
        let params = CompositeParams::new(wgpu::TextureFormat::Bgra8UnormSrgb, false);
        assert_eq!(params.bloom_weight, 0.0);
        assert_eq!(size_of::<CompositeParams>(), 16);
    }
}
