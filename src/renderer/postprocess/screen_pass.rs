//! Common interface of the fullscreen passes.

/// Uniform interface for fullscreen post-processing passes that read the
/// scene colour and write their own output.
pub trait ScreenPass {
    /// Whether the pass contributes to the frame. Disabled passes are not
    /// encoded at all.
    fn enabled(&self) -> bool {
        true
    }
    /// Encode GPU commands for this pass.
    fn render(&self, encoder: &mut wgpu::CommandEncoder);
    /// Recreate resolution-dependent resources for a new viewport size,
    /// reading from the (also recreated) `source` view.
    fn resize(&mut self, device: &wgpu::Device, size: (u32, u32), source: &wgpu::TextureView);
}
