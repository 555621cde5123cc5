//! Post-processing chain assembly and pointer-driven bloom.

use glam::Vec3;

use axolotl_engine::effects::{BloomEffect, Effect, EffectChain, GlitchEffect, GodRaysEffect};

use crate::config::DemoConfig;

/// Bloom intensity at the center of the viewport.
pub const BLOOM_PEAK: f32 = 50.0;

pub struct PostProcessingBuilder;

impl PostProcessingBuilder {
    /// A fresh chain: Render, Glitch, Bloom, GodRays.
    pub fn build(config: &DemoConfig, sun_position: Vec3) -> EffectChain {
        let mut chain = EffectChain::new();
        Self::register(config, sun_position, &mut chain);
        chain
    }

    /// Appends the four effects to an existing chain, in order.
    pub fn register(config: &DemoConfig, sun_position: Vec3, chain: &mut EffectChain) {
        let post = &config.post;
        let glitch = &config.glitch;

        chain.push(Effect::Render);
        chain.push(Effect::Glitch(GlitchEffect::new(glitch.strength, glitch.delay, glitch.duration)));
        chain.push(Effect::Bloom(BloomEffect {
            intensity: post.bloom_intensity,
            luminance_threshold: post.bloom_threshold,
            luminance_smoothing: post.bloom_smoothing,
        }));
        chain.push(Effect::GodRays(GodRaysEffect {
            source_position: sun_position,
            source_radius: post.rays_source_radius,
            source_color: post.rays_color,
            density: post.rays_density,
            decay: post.rays_decay,
            weight: post.rays_weight,
            exposure: post.rays_exposure,
            samples: post.rays_samples.max(1),
            clamp_max: post.rays_clamp_max,
        }));
    }
}

/// Bloom intensity for a pointer at normalized viewport coordinates:
/// peaks at the center and falls off linearly in Manhattan distance.
pub fn bloom_intensity_at(nx: f32, ny: f32) -> f32 {
    BLOOM_PEAK * (1.0 - (nx - 0.5).abs() - (ny - 0.5).abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use axolotl_engine::effects::EffectKind;

    #[test]
    fn chain_order_is_fixed() {
        let chain = PostProcessingBuilder::build(&DemoConfig::default(), Vec3::new(5.0, 10.0, 5.0));
        assert_eq!(
            chain.kinds(),
            vec![EffectKind::Render, EffectKind::Glitch, EffectKind::Bloom, EffectKind::GodRays]
        );
        let rays = chain.god_rays().copied().unwrap();
        assert_eq!(rays.source_position, Vec3::new(5.0, 10.0, 5.0));
        assert_eq!(chain.glitch().map(|g| g.strength), Some(0.0));
    }

    #[test]
    fn bloom_peaks_at_center_and_vanishes_at_corners() {
        assert_relative_eq!(bloom_intensity_at(0.5, 0.5), 50.0);
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
            assert!(bloom_intensity_at(x, y) <= 0.0);
        }
        assert_relative_eq!(bloom_intensity_at(0.25, 0.5), 37.5);
    }
}
