use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Orbit control sensitivities and damping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Controls", inline)]
#[serde(default)]
pub struct ControlsOptions {
    /// Ease rotation and panning out over several frames.
    #[schemars(title = "Damping")]
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per update when damping.
    #[schemars(title = "Damping Factor", range(min = 0.001, max = 1.0), extend("step" = 0.005))]
    pub damping_factor: f32,
    /// Rotation sensitivity multiplier.
    #[schemars(title = "Rotate Speed", range(min = 0.1, max = 5.0), extend("step" = 0.05))]
    pub rotate_speed: f32,
    /// Pan sensitivity multiplier.
    #[schemars(title = "Pan Speed", range(min = 0.1, max = 5.0), extend("step" = 0.05))]
    pub pan_speed: f32,
    /// Zoom sensitivity multiplier.
    #[schemars(title = "Zoom Speed", range(min = 0.1, max = 5.0), extend("step" = 0.05))]
    pub zoom_speed: f32,
    /// Closest the camera may dolly towards the target.
    #[schemars(skip)]
    pub min_distance: f32,
    /// Farthest the camera may dolly away from the target.
    #[schemars(skip)]
    pub max_distance: f32,
}

impl Default for ControlsOptions {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.025,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        }
    }
}
