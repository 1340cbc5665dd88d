//! Camera system for 3D scene viewing.
//!
//! Provides a perspective camera and orbit controls with damped rotation,
//! panning and dolly.

/// Orbit controls and the [`CameraControls`](controller::CameraControls)
/// seam used by the frame loop.
pub mod controller;
/// Perspective camera.
pub mod core;

pub use controller::{CameraControls, OrbitControls};
pub use self::core::PerspectiveCamera;
