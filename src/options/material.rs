use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Sphere shader material parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Material", inline)]
#[serde(default)]
pub struct MaterialOptions {
    /// Draw triangle edges instead of filled triangles.
    #[schemars(title = "Wireframe")]
    pub wireframe: bool,
    /// Value bound to the `uRadius` uniform.
    #[schemars(title = "Point Radius", range(min = 0.0, max = 0.1), extend("step" = 0.001))]
    pub radius: f32,
}

impl Default for MaterialOptions {
    fn default() -> Self {
        Self {
            wireframe: true,
            radius: 0.001,
        }
    }
}
