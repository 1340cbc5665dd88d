//! Engine construction: wires camera, controls, scene and render chain.

use super::Engine;
use crate::camera::{CameraControls, OrbitControls, PerspectiveCamera};
use crate::error::SphereError;
use crate::gpu::render_context::RenderContext;
use crate::options::Options;
use crate::renderer::scene_renderer::SceneRenderer;
use crate::scene::Scene;

/// Build the camera and orbit controls for a `width` x `height` viewport
/// and apply the initial controls update.
#[must_use]
pub fn build_controls(options: &Options, width: u32, height: u32) -> OrbitControls {
    let camera = PerspectiveCamera::from_options(&options.camera, width, height);
    let mut controls = OrbitControls::new(camera, &options.controls, (width, height));
    let _ = controls.update();
    controls
}

/// Construct the whole scene on an existing GPU context: a perspective
/// camera with orbit controls, the wireframe sphere with its shader
/// material, and the scene + bloom + composite chain, all sized to the
/// context's current output.
///
/// Nothing is drawn until a scheduler starts driving the returned engine.
///
/// # Errors
///
/// Returns [`SphereError::Shader`] if a shader fails to compose.
pub fn bootstrap(context: RenderContext, options: &Options) -> Result<Engine, SphereError> {
    let (width, height) = context.size();
    let controls = build_controls(options, width, height);
    let scene = Scene::sphere(options, controls.camera(), width, height);
    let renderer = SceneRenderer::new(context, scene, options)?;

    log::info!(
        "scene ready at {width}x{height} (bloom {})",
        if options.bloom.active { "on" } else { "off" }
    );
    Ok(Engine::new(renderer, controls))
}
