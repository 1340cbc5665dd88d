//! Shared utilities: the animation clock and frame pacing.

/// Auto-starting elapsed-time clock.
pub mod clock;
/// Frame-rate cap and smoothed FPS.
pub mod frame_timing;
