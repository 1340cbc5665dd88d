//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, render targets, shader
//! composition, and the shared pipeline boilerplate used by the passes.

/// Shared wgpu boilerplate helpers for pipelines and fullscreen passes.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Render-target texture abstraction.
pub mod texture;
