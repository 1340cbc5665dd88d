//! Rendering subsystems.
//!
//! The scene pass draws shader-material meshes into an HDR target; the
//! post-processing chain (bloom, composite) turns that into the presented
//! frame. [`scene_renderer::SceneRenderer`] owns all of it.

pub mod mesh_pass;
pub(crate) mod pipeline_util;
pub mod postprocess;
pub mod scene_renderer;
