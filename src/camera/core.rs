use glam::{Mat4, Vec3};

use crate::options::CameraOptions;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl PerspectiveCamera {
    /// Build a camera from options, looking at the origin, for a viewport of
    /// the given size.
    #[must_use]
    pub fn from_options(options: &CameraOptions, width: u32, height: u32) -> Self {
        Self {
            eye: Vec3::from_array(options.position),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: aspect_ratio(width, height),
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        }
    }

    /// Update the aspect ratio for a new viewport size. Zero-height
    /// viewports are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = aspect_ratio(width, height);
        }
    }

    /// View matrix (world to camera space).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Build the combined view-projection matrix.
    pub fn build_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_sits_on_positive_z() {
        let camera =
            PerspectiveCamera::from_options(&CameraOptions::default(), 800, 600);
        assert_eq!(camera.eye, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.fovy, 75.0);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn set_viewport_updates_aspect() {
        let mut camera =
            PerspectiveCamera::from_options(&CameraOptions::default(), 800, 600);
        camera.set_viewport(1920, 1080);
        assert!((camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn zero_height_viewport_is_ignored() {
        let mut camera =
            PerspectiveCamera::from_options(&CameraOptions::default(), 800, 600);
        camera.set_viewport(800, 0);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let camera =
            PerspectiveCamera::from_options(&CameraOptions::default(), 800, 600);
        let clip = camera.build_matrix() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
