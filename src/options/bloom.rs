use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Bloom pass configuration.
///
/// Read once when the post-processing chain is built; the pass strength is
/// [`initial_strength`](Self::initial_strength), so an inactive bloom keeps
/// the pass in the chain with a zero multiplier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Bloom", inline)]
#[serde(default)]
pub struct BloomOptions {
    /// Whether bloom contributes to the final image.
    #[schemars(title = "Enabled")]
    pub active: bool,
    /// Glow strength used when active.
    #[schemars(title = "Strength", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub strength: f32,
    /// Blend between tight and wide glow (0..1).
    #[schemars(title = "Radius", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub radius: f32,
    /// Luminance above which pixels start to glow.
    #[schemars(title = "Threshold", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub threshold: f32,
}

impl BloomOptions {
    /// Strength handed to the bloom pass: `strength` when active, else zero.
    #[must_use]
    pub fn initial_strength(&self) -> f32 {
        if self.active {
            self.strength
        } else {
            0.0
        }
    }
}

impl Default for BloomOptions {
    fn default() -> Self {
        Self {
            active: false,
            strength: 0.2,
            radius: 0.4,
            threshold: 0.05,
        }
    }
}
