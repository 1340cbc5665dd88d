//! UV sphere tessellation.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rustc_hash::FxHashSet;

use crate::options::GeometryOptions;

/// Interleaved vertex uploaded to the GPU (matches the WGSL `VertexInput`).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Unit surface normal.
    pub normal: [f32; 3],
    /// Texture coordinate (u around, v from bottom to top).
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
    ];

    /// Vertex buffer layout for pipeline creation.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Sphere mesh data: a grid of `(width_segments + 1) * (height_segments + 1)`
/// vertices wrapped around the sphere, with seam and pole vertices
/// duplicated so every grid cell has its own uv range.
#[derive(Debug, Clone)]
pub struct SphereGeometry {
    width_segments: u32,
    height_segments: u32,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl SphereGeometry {
    /// Build a full sphere.
    ///
    /// `width_segments` is raised to at least 3 and `height_segments` to at
    /// least 2.
    #[must_use]
    pub fn new(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self::with_ranges(radius, width_segments, height_segments, (0.0, TAU), (0.0, PI))
    }

    /// Build a sphere from geometry options.
    #[must_use]
    pub fn from_options(options: &GeometryOptions) -> Self {
        Self::new(options.radius, options.width_segments, options.height_segments)
    }

    /// Build a partial sphere. `phi` is the horizontal sweep `(start,
    /// length)`, `theta` the vertical sweep from the top pole.
    #[must_use]
    pub fn with_ranges(
        radius: f32,
        width_segments: u32,
        height_segments: u32,
        phi: (f32, f32),
        theta: (f32, f32),
    ) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let (phi_start, phi_length) = phi;
        let (theta_start, theta_length) = theta;
        let theta_end = (theta_start + theta_length).min(PI);

        let mut vertices = Vec::with_capacity(
            ((width_segments + 1) * (height_segments + 1)) as usize,
        );
        let mut grid = Vec::with_capacity(height_segments as usize + 1);

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;

            // Shift pole u by half a segment so pole triangles stay symmetric
            let u_offset = if iy == 0 && theta_start == 0.0 {
                0.5 / width_segments as f32
            } else if iy == height_segments && theta_end == PI {
                -0.5 / width_segments as f32
            } else {
                0.0
            };

            let mut row = Vec::with_capacity(width_segments as usize + 1);
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let (sin_phi, cos_phi) = (phi_start + u * phi_length).sin_cos();
                let (sin_theta, cos_theta) =
                    (theta_start + v * theta_length).sin_cos();

                let position = Vec3::new(
                    -radius * cos_phi * sin_theta,
                    radius * cos_theta,
                    radius * sin_phi * sin_theta,
                );
                let normal = position.normalize_or_zero();

                row.push(vertices.len() as u32);
                vertices.push(Vertex {
                    position: position.to_array(),
                    normal: normal.to_array(),
                    uv: [u + u_offset, 1.0 - v],
                });
            }
            grid.push(row);
        }

        let mut indices = Vec::new();
        for iy in 0..height_segments as usize {
            for ix in 0..width_segments as usize {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];

                // The first and last rows collapse to a pole point; skip the
                // zero-area triangle on that side
                if iy != 0 || theta_start > 0.0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments as usize - 1 || theta_end < PI {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self {
            width_segments,
            height_segments,
            vertices,
            indices,
        }
    }

    /// Segment counts `(width, height)` after clamping.
    pub fn segments(&self) -> (u32, u32) {
        (self.width_segments, self.height_segments)
    }

    /// Vertex data.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Triangle list indices.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Line list indices covering every distinct triangle edge once.
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let mut seen = FxHashSet::default();
        let mut lines = Vec::with_capacity(self.indices.len() * 2);
        for tri in self.indices.chunks_exact(3) {
            for (start, end) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = (start.min(end), start.max(end));
                if seen.insert(key) {
                    lines.extend_from_slice(&[start, end]);
                }
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sphere_counts() {
        let sphere = SphereGeometry::from_options(&GeometryOptions::default());
        assert_eq!(sphere.segments(), (32, 16));
        assert_eq!(sphere.vertices().len(), 33 * 17);
        // Two triangles per cell, minus one per cell on each pole row
        assert_eq!(sphere.indices().len(), (2 * 32 * 16 - 2 * 32) * 3);
    }

    #[test]
    fn vertices_lie_on_the_sphere() {
        let sphere = SphereGeometry::new(2.5, 12, 8);
        for v in sphere.vertices() {
            let p = Vec3::from_array(v.position);
            assert!((p.length() - 2.5).abs() < 1e-4);
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn segment_counts_are_clamped() {
        let sphere = SphereGeometry::new(1.0, 1, 1);
        assert_eq!(sphere.segments(), (3, 2));
    }

    #[test]
    fn indices_stay_in_range() {
        let sphere = SphereGeometry::new(1.0, 8, 6);
        let count = sphere.vertices().len() as u32;
        assert!(sphere.indices().iter().all(|&i| i < count));
        assert!(sphere.wireframe_indices().iter().all(|&i| i < count));
    }

    #[test]
    fn wireframe_has_no_duplicate_edges() {
        let sphere = SphereGeometry::new(1.0, 8, 6);
        let lines = sphere.wireframe_indices();
        assert_eq!(lines.len() % 2, 0);
        let mut edges: Vec<_> = lines
            .chunks_exact(2)
            .map(|e| (e[0].min(e[1]), e[0].max(e[1])))
            .collect();
        let total = edges.len();
        edges.sort_unstable();
        edges.dedup();
        assert_eq!(edges.len(), total);
        // Every triangle contributes at most three new edges
        assert!(total <= sphere.indices().len());
    }

    #[test]
    fn top_row_sits_at_the_north_pole() {
        let sphere = SphereGeometry::new(1.0, 4, 4);
        let top = &sphere.vertices()[0];
        assert!((top.position[1] - 1.0).abs() < 1e-6);
        assert_eq!(top.uv[1], 1.0);
    }
}
