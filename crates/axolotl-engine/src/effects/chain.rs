use glam::Vec3;
use rand::Rng;

use crate::scene::Color;

use super::{GlitchEffect, GlitchTransition};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BloomEffect {
    pub intensity: f32,
    /// Luminance where the bright-pass starts to respond.
    pub luminance_threshold: f32,
    /// Width of the smoothstep ramp above the threshold.
    pub luminance_smoothing: f32,
}

impl Default for BloomEffect {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            luminance_threshold: 0.9,
            luminance_smoothing: 0.025,
        }
    }
}

/// Screen-space light shafts radiating from a spherical light source.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GodRaysEffect {
    pub source_position: Vec3,
    pub source_radius: f32,
    pub source_color: Color,
    pub density: f32,
    pub decay: f32,
    pub weight: f32,
    pub exposure: f32,
    pub samples: u32,
    pub clamp_max: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Renders the scene into the chain's input buffer.
    Render,
    Glitch(GlitchEffect),
    Bloom(BloomEffect),
    GodRays(GodRaysEffect),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EffectKind {
    Render,
    Glitch,
    Bloom,
    GodRays,
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::Render => EffectKind::Render,
            Effect::Glitch(_) => EffectKind::Glitch,
            Effect::Bloom(_) => EffectKind::Bloom,
            Effect::GodRays(_) => EffectKind::GodRays,
        }
    }
}

/// Ordered post-processing chain. Effects run in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectChain {
    effects: Vec<Effect>,
}

impl EffectChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn kinds(&self) -> Vec<EffectKind> {
        self.effects.iter().map(Effect::kind).collect()
    }

    pub fn bloom_mut(&mut self) -> Option<&mut BloomEffect> {
        self.effects.iter_mut().find_map(|e| match e {
            Effect::Bloom(b) => Some(b),
            _ => None,
        })
    }

    pub fn glitch(&self) -> Option<&GlitchEffect> {
        self.effects.iter().find_map(|e| match e {
            Effect::Glitch(g) => Some(g),
            _ => None,
        })
    }

    pub fn god_rays(&self) -> Option<&GodRaysEffect> {
        self.effects.iter().find_map(|e| match e {
            Effect::GodRays(g) => Some(g),
            _ => None,
        })
    }

    /// Advances time-driven effects. Returns the glitch transition, if any.
    pub fn update<R: Rng>(&mut self, dt: f32, rng: &mut R) -> Option<GlitchTransition> {
        let mut transition = None;
        for effect in &mut self.effects {
            if let Effect::Glitch(g) = effect {
                transition = transition.or(g.timer.update(dt, rng));
            }
        }
        transition
    }
}
