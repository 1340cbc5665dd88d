//! Scene configuration with TOML preset support.
//!
//! Everything the bootstrap reads (camera, orbit controls, bloom, material,
//! geometry, display) lives here. Options serialize to/from TOML for view
//! presets stored in `assets/view_presets/`.

mod bloom;
mod camera;
mod controls;
mod display;
mod geometry;
mod material;

use std::path::Path;

pub use bloom::BloomOptions;
pub use camera::CameraOptions;
pub use controls::ControlsOptions;
pub use display::DisplayOptions;
pub use geometry::GeometryOptions;
pub use material::MaterialOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SphereError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[bloom]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection and placement.
    pub camera: CameraOptions,
    /// Orbit control parameters.
    pub controls: ControlsOptions,
    /// Bloom post-processing parameters.
    pub bloom: BloomOptions,
    /// Shader material parameters.
    pub material: MaterialOptions,
    /// Sphere tessellation.
    pub geometry: GeometryOptions,
    /// Window and frame pacing.
    pub display: DisplayOptions,
}

impl Options {
    /// Generate JSON Schema describing the user-facing options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SphereError::Io`] if the file cannot be read and
    /// [`SphereError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, SphereError> {
        let content = std::fs::read_to_string(path).map_err(SphereError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SphereError::OptionsParse`] on malformed input.
    pub fn from_toml(content: &str) -> Result<Self, SphereError> {
        toml::from_str(content)
            .map_err(|e| SphereError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`SphereError::OptionsParse`] if serialization fails and
    /// [`SphereError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), SphereError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SphereError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SphereError::Io)?;
        }
        std::fs::write(path, content).map_err(SphereError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[bloom]
active = true
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert!(opts.bloom.active);
        // Everything else should be default
        assert_eq!(opts.bloom.strength, 0.2);
        assert_eq!(opts.controls.damping_factor, 0.025);
        assert_eq!(opts.camera.fovy, 75.0);
    }

    #[test]
    fn shipped_bloom_strength_is_zero() {
        let opts = Options::default();
        assert!(!opts.bloom.active);
        assert_eq!(opts.bloom.initial_strength(), 0.0);
    }

    #[test]
    fn active_bloom_uses_configured_strength() {
        let bloom = BloomOptions {
            active: true,
            strength: 0.75,
            ..BloomOptions::default()
        };
        assert_eq!(bloom.initial_strength(), 0.75);
    }

    #[test]
    fn glow_preset_parses() {
        let opts = Options::from_toml(include_str!(
            "../../assets/view_presets/glow.toml"
        ))
        .unwrap();
        assert!(opts.bloom.active);
        assert!(opts.bloom.initial_strength() > 0.0);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[bloom\nactive = ").unwrap_err();
        assert!(matches!(err, SphereError::OptionsParse(_)));
    }

    #[test]
    fn list_presets_finds_shipped_files() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("assets")
            .join("view_presets");
        let names = Options::list_presets(&dir);
        assert!(names.contains(&"glow".to_owned()));
        assert!(names.contains(&"static".to_owned()));
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("controls"));
        assert!(props.contains_key("bloom"));
        assert!(props.contains_key("material"));

        // Skipped fields should be absent
        let camera = &props["camera"]["properties"];
        assert!(camera.get("fovy").is_some());
        assert!(camera.get("znear").is_none());
        let display = &props["display"]["properties"];
        assert!(display.get("title").is_none());
    }
}
