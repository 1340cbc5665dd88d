//! Scene pass: draws every mesh with its shader material into the HDR
//! colour target.
//!
//! Each mesh gets its own pipeline (topology follows the material's
//! wireframe flag), vertex and index buffers, and a uniform buffer holding
//! the packed [`MaterialUniform`] block, refreshed once per frame.

use encase::ShaderType;
use wgpu::util::DeviceExt;

use crate::camera::PerspectiveCamera;
use crate::error::SphereError;
use crate::gpu::shader_composer::ShaderComposer;
use crate::renderer::pipeline_util;
use crate::scene::{MaterialUniform, Mesh, Scene, ShaderMaterial, Vertex};

/// Create the render pipeline for one material.
fn create_material_pipeline(
    device: &wgpu::Device,
    shader_composer: &mut ShaderComposer,
    material: &ShaderMaterial,
    layout: &wgpu::BindGroupLayout,
) -> Result<wgpu::RenderPipeline, SphereError> {
    let vertex = material.vertex();
    let fragment = material.fragment();
    let vertex_shader = shader_composer.compose(
        device,
        "Material Vertex Shader",
        vertex.source,
        vertex.file_path,
    )?;
    let fragment_shader = shader_composer.compose(
        device,
        "Material Fragment Shader",
        fragment.source,
        fragment.file_path,
    )?;

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Material Pipeline Layout"),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });

    let (topology, cull_mode) = if material.wireframe() {
        (wgpu::PrimitiveTopology::LineList, None)
    } else {
        (wgpu::PrimitiveTopology::TriangleList, Some(wgpu::Face::Back))
    };

    Ok(device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Material Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &vertex_shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &fragment_shader,
            entry_point: Some("fs_main"),
            targets: &pipeline_util::scene_fragment_targets(),
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(pipeline_util::depth_stencil_state()),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    }))
}

/// Indices drawn for a mesh: the edge list for wireframe materials, the
/// triangle list otherwise.
pub fn draw_indices(mesh: &Mesh) -> Vec<u32> {
    if mesh.material.wireframe() {
        mesh.geometry.wireframe_indices()
    } else {
        mesh.geometry.indices().to_vec()
    }
}

/// GPU resources of one mesh.
struct MeshDraw {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Draws every mesh of a [`Scene`].
pub struct MeshPass {
    draws: Vec<MeshDraw>,
}

impl MeshPass {
    /// Upload every mesh of `scene` and build its pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`SphereError::Shader`] if a material fails to compose.
    pub fn new(
        device: &wgpu::Device,
        shader_composer: &mut ShaderComposer,
        scene: &Scene,
    ) -> Result<Self, SphereError> {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(MaterialUniform::min_size()),
                },
                count: None,
            }],
        });

        let draws = scene
            .meshes()
            .iter()
            .map(|mesh| Self::upload(device, shader_composer, &layout, mesh))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { draws })
    }

    fn upload(
        device: &wgpu::Device,
        shader_composer: &mut ShaderComposer,
        layout: &wgpu::BindGroupLayout,
        mesh: &Mesh,
    ) -> Result<MeshDraw, SphereError> {
        let pipeline = create_material_pipeline(device, shader_composer, &mesh.material, layout)?;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertices"),
            contents: bytemuck::cast_slice(mesh.geometry.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = draw_indices(mesh);
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Indices"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Material Uniforms"),
            size: MaterialUniform::min_size().get(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material BG"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Ok(MeshDraw {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            uniform_buffer,
            bind_group,
        })
    }

    /// Write every material's uniform block for this frame.
    ///
    /// # Errors
    ///
    /// Returns [`SphereError::Uniform`] if a block fails to encode.
    pub fn update(
        &self,
        queue: &wgpu::Queue,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<(), SphereError> {
        for (draw, mesh) in self.draws.iter().zip(scene.meshes()) {
            let bytes = mesh.material.encode_uniform(camera, mesh.transform)?;
            queue.write_buffer(&draw.uniform_buffer, 0, &bytes);
        }
        Ok(())
    }

    /// Clear the targets and draw every mesh.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        color: &wgpu::TextureView,
        depth: &wgpu::TextureView,
        clear_color: wgpu::Color,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        for draw in &self.draws {
            if draw.index_count == 0 {
                continue;
            }
            pass.set_pipeline(&draw.pipeline);
            pass.set_bind_group(0, &draw.bind_group, &[]);
            pass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
            pass.set_index_buffer(draw.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..draw.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    #[test]
    fn wireframe_meshes_draw_edges() {
        let options = Options::default();
        let camera = PerspectiveCamera::from_options(&options.camera, 800, 600);
        let scene = Scene::sphere(&options, &camera, 800, 600);
        let mesh = &scene.meshes()[0];
        let indices = draw_indices(mesh);
        assert_eq!(indices, mesh.geometry.wireframe_indices());
        assert_eq!(indices.len() % 2, 0);
    }

    #[test]
    fn filled_meshes_draw_triangles() {
        let options = Options::default();
        let camera = PerspectiveCamera::from_options(&options.camera, 800, 600);
        let mut scene = Scene::sphere(&options, &camera, 800, 600);
        let mesh = &mut scene.meshes_mut()[0];
        let uniforms = mesh.material.uniforms().clone();
        mesh.material = ShaderMaterial::new(
            *mesh.material.vertex(),
            *mesh.material.fragment(),
            uniforms,
            false,
        );
        assert_eq!(draw_indices(mesh), mesh.geometry.indices());
    }
}
