//! Bloom post-processing pass: extracts bright pixels and adds a soft glow.
//!
//! Pipeline: luminance threshold into a half-resolution target, then a
//! chain of [`BLOOM_LEVELS`] separable Gaussian blurs, each at half the size
//! of the previous one, then a weighted sum of every level into the bloom
//! output. The composite pass adds that output to the scene.
//!
//! The pass stays in the chain at strength 0 but encodes nothing.

use crate::error::SphereError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, draw_fullscreen, filtering_sampler, linear_sampler,
    texture_2d, uniform_buffer, uniform_buffer_init,
};
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::RenderTarget;
use crate::options::BloomOptions;

use super::screen_pass::ScreenPass;

/// Number of blur levels.
pub const BLOOM_LEVELS: usize = 5;

/// Per-level weights before the radius blend.
const BASE_FACTORS: [f32; BLOOM_LEVELS] = [1.0, 0.8, 0.6, 0.4, 0.2];

/// Gaussian kernel radius (and sigma) per level.
const KERNEL_RADII: [u32; BLOOM_LEVELS] = [3, 5, 7, 9, 11];

/// Width of the smoothstep above the luminance threshold.
const SMOOTH_WIDTH: f32 = 0.01;

const BLOOM_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Level weights for a given radius: each base factor `f` is blended
/// towards `1.2 - f`, so radius 0 favours the sharp levels and radius 1 the
/// wide ones.
#[must_use]
pub fn bloom_factors(radius: f32) -> [f32; BLOOM_LEVELS] {
    BASE_FACTORS.map(|f| f * (1.0 - radius) + (1.2 - f) * radius)
}

/// Sizes of the blur levels for a full-resolution viewport. Level 0 is half
/// resolution; each later level halves again. No dimension drops below 1.
#[must_use]
pub fn level_sizes((width, height): (u32, u32)) -> [(u32, u32); BLOOM_LEVELS] {
    let mut sizes = [(1, 1); BLOOM_LEVELS];
    let (mut w, mut h) = (width.div_ceil(2).max(1), height.div_ceil(2).max(1));
    for size in &mut sizes {
        *size = (w, h);
        w = (w / 2).max(1);
        h = (h / 2).max(1);
    }
    sizes
}

/// Bloom parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    /// Output multiplier; 0 disables the pass.
    pub strength: f32,
    /// Blend between sharp and wide levels.
    pub radius: f32,
    /// Luminance threshold.
    pub threshold: f32,
}

impl BloomSettings {
    /// Settings for a freshly built chain: strength is zero unless bloom is
    /// active.
    #[must_use]
    pub fn from_options(options: &BloomOptions) -> Self {
        Self {
            strength: options.initial_strength(),
            radius: options.radius,
            threshold: options.threshold,
        }
    }
}

/// Threshold params, must match WGSL `ThresholdParams`.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct ThresholdParams {
    threshold: f32,
    smooth_width: f32,
    _pad: [f32; 2],
}

/// Blur params, must match WGSL `BlurParams`.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct BlurParams {
    texel_size: [f32; 2],
    direction: [f32; 2],
    kernel_radius: u32,
    sigma: f32,
    _pad: [f32; 2],
}

/// Accumulate params, must match WGSL `AccumulateParams`.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct AccumulateParams {
    factors: [f32; 4],
    last_factor: f32,
    strength: f32,
    _pad: [f32; 2],
}

impl AccumulateParams {
    fn new(settings: &BloomSettings) -> Self {
        let f = bloom_factors(settings.radius);
        Self {
            factors: [f[0], f[1], f[2], f[3]],
            last_factor: f[4],
            strength: settings.strength,
            _pad: [0.0; 2],
        }
    }
}

/// Resolution-dependent textures and the bind groups that reference them.
struct BloomTargets {
    bright: RenderTarget,
    // Horizontal blur output per level
    ping: Vec<RenderTarget>,
    // Fully blurred level
    levels: Vec<RenderTarget>,
    output: RenderTarget,
    threshold_bind_group: wgpu::BindGroup,
    // [level][0 = horizontal, 1 = vertical]
    blur_bind_groups: Vec<[wgpu::BindGroup; 2]>,
    _blur_buffers: Vec<[wgpu::Buffer; 2]>,
    accumulate_bind_group: wgpu::BindGroup,
}

/// Unreal-style multi-level bloom.
pub struct BloomPass {
    threshold_pipeline: wgpu::RenderPipeline,
    threshold_layout: wgpu::BindGroupLayout,
    threshold_buffer: wgpu::Buffer,

    blur_pipeline: wgpu::RenderPipeline,
    blur_layout: wgpu::BindGroupLayout,

    accumulate_pipeline: wgpu::RenderPipeline,
    accumulate_layout: wgpu::BindGroupLayout,
    accumulate_buffer: wgpu::Buffer,

    sampler: wgpu::Sampler,
    targets: BloomTargets,
    settings: BloomSettings,
}

impl BloomPass {
    /// Build the pass for a `size` viewport reading from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`SphereError::Shader`] if a bloom shader fails to compose.
    pub fn new(
        device: &wgpu::Device,
        shader_composer: &mut ShaderComposer,
        source: &wgpu::TextureView,
        size: (u32, u32),
        settings: BloomSettings,
    ) -> Result<Self, SphereError> {
        let sampler = linear_sampler(device, "Bloom Sampler");

        let threshold_buffer = uniform_buffer_init(
            device,
            "Bloom Threshold Params",
            &ThresholdParams {
                threshold: settings.threshold,
                smooth_width: SMOOTH_WIDTH,
                _pad: [0.0; 2],
            },
        );
        let accumulate_buffer = uniform_buffer_init(
            device,
            "Bloom Accumulate Params",
            &AccumulateParams::new(&settings),
        );

        // Threshold and blur share a layout shape: texture, sampler, params
        let threshold_layout = Self::source_layout(device, "Bloom Threshold Layout");
        let blur_layout = Self::source_layout(device, "Bloom Blur Layout");

        let mut accumulate_entries: Vec<_> =
            (0..BLOOM_LEVELS as u32).map(texture_2d).collect();
        accumulate_entries.push(filtering_sampler(BLOOM_LEVELS as u32));
        accumulate_entries.push(uniform_buffer(BLOOM_LEVELS as u32 + 1));
        let accumulate_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Bloom Accumulate Layout"),
                entries: &accumulate_entries,
            });

        let threshold_shader = shader_composer.compose(
            device,
            "Bloom Threshold Shader",
            include_str!("../../../assets/shaders/screen/bloom_threshold.wgsl"),
            "bloom_threshold.wgsl",
        )?;
        let blur_shader = shader_composer.compose(
            device,
            "Bloom Blur Shader",
            include_str!("../../../assets/shaders/screen/bloom_blur.wgsl"),
            "bloom_blur.wgsl",
        )?;
        let accumulate_shader = shader_composer.compose(
            device,
            "Bloom Accumulate Shader",
            include_str!("../../../assets/shaders/screen/bloom_accumulate.wgsl"),
            "bloom_accumulate.wgsl",
        )?;

        let threshold_pipeline = create_screen_space_pipeline(
            device,
            "Bloom Threshold",
            &threshold_shader,
            BLOOM_FORMAT,
            None,
            &[&threshold_layout],
        );
        let blur_pipeline = create_screen_space_pipeline(
            device,
            "Bloom Blur",
            &blur_shader,
            BLOOM_FORMAT,
            None,
            &[&blur_layout],
        );
        let accumulate_pipeline = create_screen_space_pipeline(
            device,
            "Bloom Accumulate",
            &accumulate_shader,
            BLOOM_FORMAT,
            None,
            &[&accumulate_layout],
        );

        let targets = BloomTargets::new(
            device,
            &Layouts {
                threshold: &threshold_layout,
                blur: &blur_layout,
                accumulate: &accumulate_layout,
            },
            &sampler,
            &threshold_buffer,
            &accumulate_buffer,
            source,
            size,
        );

        Ok(Self {
            threshold_pipeline,
            threshold_layout,
            threshold_buffer,
            blur_pipeline,
            blur_layout,
            accumulate_pipeline,
            accumulate_layout,
            accumulate_buffer,
            sampler,
            targets,
            settings,
        })
    }

    fn source_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[texture_2d(0), filtering_sampler(1), uniform_buffer(2)],
        })
    }

    /// Current parameters.
    pub fn settings(&self) -> BloomSettings {
        self.settings
    }

    /// Bloom output (half resolution) for the composite pass to sample.
    pub fn output_view(&self) -> &wgpu::TextureView {
        &self.targets.output.view
    }

    fn blur_level(&self, encoder: &mut wgpu::CommandEncoder, level: usize) {
        let [horizontal, vertical] = &self.targets.blur_bind_groups[level];
        draw_fullscreen(
            encoder,
            "Bloom Blur H",
            &self.targets.ping[level].view,
            &self.blur_pipeline,
            horizontal,
            true,
        );
        draw_fullscreen(
            encoder,
            "Bloom Blur V",
            &self.targets.levels[level].view,
            &self.blur_pipeline,
            vertical,
            true,
        );
    }
}

impl ScreenPass for BloomPass {
    fn enabled(&self) -> bool {
        self.settings.strength > 0.0
    }

    fn render(&self, encoder: &mut wgpu::CommandEncoder) {
        if !self.enabled() {
            return;
        }
        draw_fullscreen(
            encoder,
            "Bloom Threshold",
            &self.targets.bright.view,
            &self.threshold_pipeline,
            &self.targets.threshold_bind_group,
            true,
        );
        for level in 0..BLOOM_LEVELS {
            self.blur_level(encoder, level);
        }
        draw_fullscreen(
            encoder,
            "Bloom Accumulate",
            &self.targets.output.view,
            &self.accumulate_pipeline,
            &self.targets.accumulate_bind_group,
            true,
        );
    }

    fn resize(&mut self, device: &wgpu::Device, size: (u32, u32), source: &wgpu::TextureView) {
        self.targets = BloomTargets::new(
            device,
            &Layouts {
                threshold: &self.threshold_layout,
                blur: &self.blur_layout,
                accumulate: &self.accumulate_layout,
            },
            &self.sampler,
            &self.threshold_buffer,
            &self.accumulate_buffer,
            source,
            size,
        );
    }
}

struct Layouts<'a> {
    threshold: &'a wgpu::BindGroupLayout,
    blur: &'a wgpu::BindGroupLayout,
    accumulate: &'a wgpu::BindGroupLayout,
}

impl BloomTargets {
    fn new(
        device: &wgpu::Device,
        layouts: &Layouts<'_>,
        sampler: &wgpu::Sampler,
        threshold_buffer: &wgpu::Buffer,
        accumulate_buffer: &wgpu::Buffer,
        source: &wgpu::TextureView,
        size: (u32, u32),
    ) -> Self {
        let sizes = level_sizes(size);
        let bright = RenderTarget::new(device, "Bloom Bright", sizes[0], BLOOM_FORMAT);
        let output = RenderTarget::new(device, "Bloom Output", sizes[0], BLOOM_FORMAT);
        let ping: Vec<_> = sizes
            .iter()
            .enumerate()
            .map(|(i, &s)| RenderTarget::new(device, &format!("Bloom Ping {i}"), s, BLOOM_FORMAT))
            .collect();
        let levels: Vec<_> = sizes
            .iter()
            .enumerate()
            .map(|(i, &s)| RenderTarget::new(device, &format!("Bloom Level {i}"), s, BLOOM_FORMAT))
            .collect();

        let threshold_bind_group = source_bind_group(
            device,
            "Bloom Threshold BG",
            layouts.threshold,
            source,
            sampler,
            threshold_buffer,
        );

        let mut blur_bind_groups = Vec::with_capacity(BLOOM_LEVELS);
        let mut blur_buffers = Vec::with_capacity(BLOOM_LEVELS);
        for (i, &(w, h)) in sizes.iter().enumerate() {
            let params = |direction: [f32; 2]| BlurParams {
                texel_size: [1.0 / w as f32, 1.0 / h as f32],
                direction,
                kernel_radius: KERNEL_RADII[i],
                sigma: KERNEL_RADII[i] as f32,
                _pad: [0.0; 2],
            };
            let h_buffer =
                uniform_buffer_init(device, &format!("Bloom Blur H Params {i}"), &params([1.0, 0.0]));
            let v_buffer =
                uniform_buffer_init(device, &format!("Bloom Blur V Params {i}"), &params([0.0, 1.0]));

            // Level 0 blurs the threshold output; later levels downsample
            // the previous level through the bilinear sampler
            let input = if i == 0 { &bright.view } else { &levels[i - 1].view };
            let h_bg = source_bind_group(
                device,
                &format!("Bloom Blur H BG {i}"),
                layouts.blur,
                input,
                sampler,
                &h_buffer,
            );
            let v_bg = source_bind_group(
                device,
                &format!("Bloom Blur V BG {i}"),
                layouts.blur,
                &ping[i].view,
                sampler,
                &v_buffer,
            );
            blur_bind_groups.push([h_bg, v_bg]);
            blur_buffers.push([h_buffer, v_buffer]);
        }

        let mut entries: Vec<_> = levels
            .iter()
            .enumerate()
            .map(|(i, level)| wgpu::BindGroupEntry {
                binding: i as u32,
                resource: wgpu::BindingResource::TextureView(&level.view),
            })
            .collect();
        entries.push(wgpu::BindGroupEntry {
            binding: BLOOM_LEVELS as u32,
            resource: wgpu::BindingResource::Sampler(sampler),
        });
        entries.push(wgpu::BindGroupEntry {
            binding: BLOOM_LEVELS as u32 + 1,
            resource: accumulate_buffer.as_entire_binding(),
        });
        let accumulate_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Bloom Accumulate BG"),
            layout: layouts.accumulate,
            entries: &entries,
        });

        Self {
            bright,
            ping,
            levels,
            output,
            threshold_bind_group,
            blur_bind_groups,
            _blur_buffers: blur_buffers,
            accumulate_bind_group,
        }
    }
}

fn source_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    source: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    params: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(source),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: params.as_entire_binding(),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factors_at_default_radius() {
        let factors = bloom_factors(0.4);
        let expected = [0.68, 0.64, 0.6, 0.56, 0.52];
        for (got, want) in factors.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "{got} != {want}");
        }
    }

    #[test]
    fn factors_at_radius_extremes() {
        assert_eq!(bloom_factors(0.0), BASE_FACTORS);
        let wide = bloom_factors(1.0);
        assert!((wide[0] - 0.2).abs() < 1e-6);
        assert!((wide[4] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn levels_halve_from_half_resolution() {
        let sizes = level_sizes((1280, 720));
        assert_eq!(sizes, [(640, 360), (320, 180), (160, 90), (80, 45), (40, 22)]);
    }

    #[test]
    fn tiny_viewports_keep_one_pixel_levels() {
        let sizes = level_sizes((3, 1));
        assert_eq!(sizes[0], (2, 1));
        assert!(sizes.iter().all(|&(w, h)| w >= 1 && h >= 1));
    }

    #[test]
    fn inactive_bloom_starts_at_zero_strength() {
        let settings = BloomSettings::from_options(&BloomOptions::default());
        assert_eq!(settings.strength, 0.0);
        assert_eq!(settings.radius, 0.4);
        assert_eq!(settings.threshold, 0.05);

        let active = BloomOptions {
            active: true,
            ..BloomOptions::default()
        };
        assert_eq!(BloomSettings::from_options(&active).strength, 0.2);
    }

    #[test]
    fn param_blocks_match_wgsl_sizes() {
        assert_eq!(size_of::<ThresholdParams>(), 16);
        assert_eq!(size_of::<BlurParams>(), 32);
        assert_eq!(size_of::<AccumulateParams>(), 32);
    }

    #[test]
    fn accumulate_params_carry_strength_and_factors() {
        let params = AccumulateParams::new(&BloomSettings {
            strength: 0.8,
            radius: 0.0,
            threshold: 0.05,
        });
        assert_eq!(params.factors, [1.0, 0.8, 0.6, 0.4]);
        assert_eq!(params.last_factor, 0.2);
        assert_eq!(params.strength, 0.8);
    }
}
