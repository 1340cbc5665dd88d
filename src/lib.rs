// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Animated wireframe sphere rendered with wgpu.
//!
//! A UV sphere is drawn with a custom shader material whose uniforms
//! (`uTime`, `uRadius`, `uResolution`, `uMouse`, `cameraPosition`) are
//! refreshed every frame. Orbit controls with damping move a perspective
//! camera, and a bloom pass sits between the scene and the output. The
//! shipped configuration keeps bloom at strength zero, which drops the pass.
//!
//! # Key entry points
//!
//! - [`engine::bootstrap`] - build camera, controls, scene and render chain
//!   on a GPU context
//! - [`engine::Engine`] - one frame per call: render once, update controls
//!   once
//! - [`schedule`] - per-frame scheduling (`requestAnimationFrame`, winit
//!   redraws, or a fixed interval for headless runs)
//! - [`options::Options`] - runtime configuration with TOML presets
//!
//! # Frame pipeline
//!
//! scene pass (wireframe sphere into an HDR target) -> bloom (threshold,
//! blur mip chain, accumulate) -> composite -> surface or offscreen target.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod schedule;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use engine::{bootstrap, Engine};
pub use error::SphereError;
pub use gpu::render_context::RenderContext;
pub use input::{InputEvent, MouseButton};
pub use options::Options;
pub use schedule::{CancelHandle, FrameScheduler, FrameTask, IntervalScheduler};
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
