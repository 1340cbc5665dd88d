use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Window and frame pacing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
pub struct DisplayOptions {
    /// Native window title.
    #[schemars(skip)]
    pub title: String,
    /// Frame rate of the fixed-interval scheduler (0 = unlimited).
    #[schemars(title = "Target FPS", range(min = 0, max = 240))]
    pub target_fps: u32,
    /// Clear colour of the scene pass (linear RGB).
    #[schemars(skip)]
    pub clear_color: [f32; 3],
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            title: "Wiresphere".to_owned(),
            target_fps: 60,
            clear_color: [0.0, 0.0, 0.0],
        }
    }
}
