//! Post-processing chain descriptions.
//!
//! An `EffectChain` is an ordered list of effects with their parameters. It is
//! pure data plus the glitch timer; `render::post::EffectComposer` executes it.

mod chain;
mod glitch;

pub use chain::{BloomEffect, Effect, EffectChain, EffectKind, GodRaysEffect};
pub use glitch::{GlitchEffect, GlitchState, GlitchTimer, GlitchTransition};
