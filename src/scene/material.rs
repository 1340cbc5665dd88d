//! Custom shader material for the sphere.

use encase::ShaderType;
use glam::{Mat4, Vec2, Vec3};

use crate::camera::PerspectiveCamera;
use crate::error::SphereError;
use crate::options::MaterialOptions;
use crate::scene::uniforms::UniformMap;

/// Scalar first assigned to `uResolution`. The same key is assigned again
/// with the viewport vector, so this value is never bound.
const SHADOWED_RESOLUTION: f32 = 200.0;

/// One shader stage program, embedded at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderSource {
    /// WGSL source (may contain `#import` directives).
    pub source: &'static str,
    /// Path used in composition diagnostics.
    pub file_path: &'static str,
}

/// Vertex stage of the sphere material.
pub const SPHERE_VERTEX: ShaderSource = ShaderSource {
    source: include_str!("../../assets/shaders/raster/sphere_vertex.wgsl"),
    file_path: "raster/sphere_vertex.wgsl",
};

/// Fragment stage of the sphere material.
pub const SPHERE_FRAGMENT: ShaderSource = ShaderSource {
    source: include_str!("../../assets/shaders/raster/sphere_fragment.wgsl"),
    file_path: "raster/sphere_fragment.wgsl",
};

/// GPU layout of the material uniform block. Must match
/// `MaterialUniforms` in `modules/material.wgsl`.
#[derive(Debug, Clone, Copy, PartialEq, ShaderType)]
pub struct MaterialUniform {
    /// Combined view-projection matrix.
    pub view_proj: Mat4,
    /// Object-to-world transform.
    pub model: Mat4,
    /// Camera world-space position (`cameraPosition`).
    pub camera_position: Vec3,
    /// Elapsed seconds (`uTime`).
    pub time: f32,
    /// Viewport size in pixels plus pixel ratio (`uResolution`).
    pub resolution: Vec3,
    /// Point radius (`uRadius`).
    pub radius: f32,
    /// Pointer position (`uMouse`).
    pub mouse: Vec2,
}

/// Surface appearance defined by custom vertex/fragment programs plus a set
/// of named uniforms.
#[derive(Debug, Clone)]
pub struct ShaderMaterial {
    vertex: ShaderSource,
    fragment: ShaderSource,
    uniforms: UniformMap,
    wireframe: bool,
}

impl ShaderMaterial {
    /// Material from explicit programs and uniforms.
    #[must_use]
    pub fn new(
        vertex: ShaderSource,
        fragment: ShaderSource,
        uniforms: UniformMap,
        wireframe: bool,
    ) -> Self {
        Self {
            vertex,
            fragment,
            uniforms,
            wireframe,
        }
    }

    /// The sphere material for a `width` x `height` viewport.
    ///
    /// `uResolution` is assigned twice: first the scalar 200, then the
    /// viewport vector. The map keeps the later value, so the scalar never
    /// reaches the GPU and a warning is logged.
    #[must_use]
    pub fn sphere(
        options: &MaterialOptions,
        camera: &PerspectiveCamera,
        width: u32,
        height: u32,
    ) -> Self {
        let mut uniforms = UniformMap::new();
        let _ = uniforms.insert("uTime", 0.0_f32);
        let _ = uniforms.insert("uRadius", options.radius);
        let _ = uniforms.insert("uResolution", SHADOWED_RESOLUTION);
        let _ = uniforms.insert("uMouse", Vec2::ZERO);
        let _ = uniforms.insert("cameraPosition", camera.eye);
        let _ = uniforms.insert("uResolution", viewport_resolution(width, height));

        Self::new(SPHERE_VERTEX, SPHERE_FRAGMENT, uniforms, options.wireframe)
    }

    /// Vertex stage program.
    pub fn vertex(&self) -> &ShaderSource {
        &self.vertex
    }

    /// Fragment stage program.
    pub fn fragment(&self) -> &ShaderSource {
        &self.fragment
    }

    /// Named uniform values.
    pub fn uniforms(&self) -> &UniformMap {
        &self.uniforms
    }

    /// Whether the material draws edges only.
    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    /// Per-frame refresh of the time and camera uniforms.
    pub fn sync(&mut self, camera: &PerspectiveCamera, elapsed: f32) {
        let _ = self.uniforms.set("uTime", elapsed);
        let _ = self.uniforms.set("cameraPosition", camera.eye);
    }

    /// Pack the uniform block for `camera` and an object transform.
    /// Missing or mistyped uniforms fall back to neutral values.
    pub fn to_uniform(&self, camera: &PerspectiveCamera, model: Mat4) -> MaterialUniform {
        MaterialUniform {
            view_proj: camera.build_matrix(),
            model,
            camera_position: self.uniforms.vec3("cameraPosition").unwrap_or(camera.eye),
            time: self.uniforms.float("uTime").unwrap_or(0.0),
            resolution: self.uniforms.vec3("uResolution").unwrap_or(Vec3::ONE),
            radius: self.uniforms.float("uRadius").unwrap_or(0.0),
            mouse: self.uniforms.vec2("uMouse").unwrap_or(Vec2::ZERO),
        }
    }

    /// Encode the uniform block with WGSL uniform-buffer layout.
    ///
    /// # Errors
    ///
    /// Returns [`SphereError::Uniform`] if encoding fails.
    pub fn encode_uniform(
        &self,
        camera: &PerspectiveCamera,
        model: Mat4,
    ) -> Result<Vec<u8>, SphereError> {
        let mut buffer = encase::UniformBuffer::new(Vec::<u8>::new());
        buffer
            .write(&self.to_uniform(camera, model))
            .map_err(|e| SphereError::Uniform(e.to_string()))?;
        Ok(buffer.into_inner())
    }
}

fn viewport_resolution(width: u32, height: u32) -> Vec3 {
    Vec3::new(width as f32, height as f32, 1.0)
}
