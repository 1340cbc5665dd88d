//! Platform-agnostic input events fed to the camera controls.

/// Input event types and their winit conversions.
pub mod event;

pub use event::{InputEvent, MouseButton};
