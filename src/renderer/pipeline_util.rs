use super::postprocess::effect_composer::{DEPTH_FORMAT, SCENE_COLOR_FORMAT};

/// HDR colour target of the scene pass (opaque, no blending).
pub(crate) fn scene_fragment_targets() -> [Option<wgpu::ColorTargetState>; 1] {
    [Some(wgpu::ColorTargetState {
        format: SCENE_COLOR_FORMAT,
        blend: None,
        write_mask: wgpu::ColorWrites::ALL,
    })]
}

/// Standard depth-stencil state used by the scene pass.
pub(crate) fn depth_stencil_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}
