//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the wiresphere crate.
#[derive(Debug)]
pub enum SphereError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// WGSL composition or validation failure.
    Shader(String),
    /// Uniform block packing failure.
    Uniform(String),
    /// Swapchain acquisition failed for a reason other than a lost or
    /// outdated surface.
    Surface(wgpu::SurfaceError),
    /// Viewer event-loop failure.
    Viewer(String),
    /// Browser DOM or JS interop failure.
    Web(String),
}

impl fmt::Display for SphereError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::Uniform(msg) => write!(f, "uniform error: {msg}"),
            Self::Surface(e) => write!(f, "surface error: {e}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
            Self::Web(msg) => write!(f, "web error: {msg}"),
        }
    }
}

impl std::error::Error for SphereError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Surface(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for SphereError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for SphereError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message() {
        let err = SphereError::OptionsParse("bad key".into());
        assert_eq!(err.to_string(), "options parse error: bad key");
    }

    #[test]
    fn io_error_keeps_source() {
        let err: SphereError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
