//! Post-processing: executes an `effects::EffectChain` over HDR targets and
//! tonemaps the result onto the surface.

mod composer;
mod params;
mod pipelines;
mod targets;

pub use composer::EffectComposer;
pub use params::BLOOM_INTENSITY_SCALE;
