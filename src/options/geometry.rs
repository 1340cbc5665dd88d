use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Sphere tessellation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Geometry", inline)]
#[serde(default)]
pub struct GeometryOptions {
    /// Sphere radius in world units.
    #[schemars(title = "Radius", range(min = 0.1, max = 10.0), extend("step" = 0.1))]
    pub radius: f32,
    /// Segments around the equator (minimum 3).
    #[schemars(title = "Width Segments", range(min = 3, max = 256))]
    pub width_segments: u32,
    /// Segments from pole to pole (minimum 2).
    #[schemars(title = "Height Segments", range(min = 2, max = 256))]
    pub height_segments: u32,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width_segments: 32,
            height_segments: 16,
        }
    }
}
