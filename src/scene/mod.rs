//! Scene contents: the sphere mesh, its material, and the uniform map the
//! material exposes to its shaders.

pub mod geometry;
pub mod material;
pub mod uniforms;

pub use geometry::{SphereGeometry, Vertex};
use glam::Mat4;
pub use material::{MaterialUniform, ShaderMaterial, ShaderSource};
pub use uniforms::{UniformMap, UniformValue};

use crate::camera::PerspectiveCamera;
use crate::options::Options;

/// Renderable object: geometry plus material, placed by a transform.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Tessellated surface.
    pub geometry: SphereGeometry,
    /// Shader programs and uniforms.
    pub material: ShaderMaterial,
    /// Object-to-world transform.
    pub transform: Mat4,
}

impl Mesh {
    /// Mesh at the origin.
    #[must_use]
    pub fn new(geometry: SphereGeometry, material: ShaderMaterial) -> Self {
        Self {
            geometry,
            material,
            transform: Mat4::IDENTITY,
        }
    }
}

/// Container of everything drawn each frame.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    meshes: Vec<Mesh>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The default scene: one wireframe sphere with the custom material,
    /// sized for a `width` x `height` viewport.
    #[must_use]
    pub fn sphere(options: &Options, camera: &PerspectiveCamera, width: u32, height: u32) -> Self {
        let geometry = SphereGeometry::from_options(&options.geometry);
        let material = ShaderMaterial::sphere(&options.material, camera, width, height);
        let mut scene = Self::new();
        let _ = scene.add(Mesh::new(geometry, material));
        scene
    }

    /// Append a mesh. Returns its index.
    pub fn add(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    /// All meshes in draw order.
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Mutable mesh access.
    pub fn meshes_mut(&mut self) -> &mut [Mesh] {
        &mut self.meshes
    }

    /// Refresh per-frame uniforms on every material.
    pub fn sync(&mut self, camera: &PerspectiveCamera, elapsed: f32) {
        for mesh in &mut self.meshes {
            mesh.material.sync(camera, elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scene_holds_one_wireframe_sphere() {
        let options = Options::default();
        let camera = PerspectiveCamera::from_options(&options.camera, 640, 480);
        let scene = Scene::sphere(&options, &camera, 640, 480);
        assert_eq!(scene.meshes().len(), 1);
        let mesh = &scene.meshes()[0];
        assert!(mesh.material.wireframe());
        assert_eq!(mesh.transform, Mat4::IDENTITY);
        assert_eq!(mesh.geometry.segments(), (32, 16));
    }
}
