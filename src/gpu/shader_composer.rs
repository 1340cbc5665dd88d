//! WGSL composition with `#import` support.

use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage, ShaderType,
};

use crate::error::SphereError;

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Pre-loads the shared WGSL modules at construction time. Consuming shaders
/// use `#import wiresphere::module_name` to pull in shared code. The composer
/// produces `naga::Module` IR directly, skipping WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition.
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Shared modules, in dependency order.
const MODULES: &[ModuleDef] = &[
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/fullscreen.wgsl"),
        file_path: "modules/fullscreen.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/material.wgsl"),
        file_path: "modules/material.wgsl",
    },
];

impl ShaderComposer {
    /// Create a composer with every shared module registered.
    ///
    /// # Errors
    ///
    /// Returns [`SphereError::Shader`] if a shared module fails to parse.
    pub fn new() -> Result<Self, SphereError> {
        let mut composer = Composer::default();
        for m in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    SphereError::Shader(format!(
                        "failed to register shader module '{}': {e}",
                        m.file_path
                    ))
                })?;
        }
        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import`
    /// directives) into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`SphereError::Shader`] if composition or validation fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, SphereError> {
        let naga_module = self
            .compose_naga(source, file_path)
            .map_err(|e| SphereError::Shader(format!("failed to compose '{file_path}': {e}")))?;

        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without creating a
    /// wgpu shader module. Useful for testing shader composition without a
    /// GPU device.
    ///
    /// # Errors
    ///
    /// Returns the composer error if the source does not compose.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, Box<naga_oil::compose::ComposerError>> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(Box::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::material::{SPHERE_FRAGMENT, SPHERE_VERTEX};

    /// Every composable shader in the crate as (source, file_path).
    fn all_shader_sources() -> Vec<(&'static str, &'static str)> {
        vec![
            (SPHERE_VERTEX.source, SPHERE_VERTEX.file_path),
            (SPHERE_FRAGMENT.source, SPHERE_FRAGMENT.file_path),
            (
                include_str!("../../assets/shaders/screen/bloom_threshold.wgsl"),
                "bloom_threshold.wgsl",
            ),
            (
                include_str!("../../assets/shaders/screen/bloom_blur.wgsl"),
                "bloom_blur.wgsl",
            ),
            (
                include_str!("../../assets/shaders/screen/bloom_accumulate.wgsl"),
                "bloom_accumulate.wgsl",
            ),
            (
                include_str!("../../assets/shaders/screen/composite.wgsl"),
                "composite.wgsl",
            ),
        ]
    }

    #[test]
    fn test_all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for (source, file_path) in all_shader_sources() {
            let module = composer
                .compose_naga(source, file_path)
                .unwrap_or_else(|e| panic!("shader '{file_path}' failed to compose: {e}"));
            assert!(!module.entry_points.is_empty(), "{file_path} has no entry point");
        }
    }

    #[test]
    fn unknown_import_is_an_error() {
        let mut composer = ShaderComposer::new().unwrap();
        let source = "#import wiresphere::missing::tint\n\
            @fragment fn fs_main() -> @location(0) vec4<f32> { return tint(); }";
        assert!(composer.compose_naga(source, "bad.wgsl").is_err());
    }
}
