//! Post-processing effect passes.
//!
//! Provides the Unreal-style bloom pass and the final composite, chained by
//! [`effect_composer::EffectComposer`].

pub mod bloom;
pub mod composite;
pub mod effect_composer;
pub mod screen_pass;
