//! Per-frame motion: character animation and the drifting layers.

use glam::Vec3;

use axolotl_engine::scene::Node;

use crate::animation::skin_primitive;
use crate::composer::SceneComposer;

/// Layers that scroll continuously until the next glitch reset.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DriftLayer {
    Water,
    Sand,
    Particles,
}

impl DriftLayer {
    pub const ALL: [DriftLayer; 3] = [DriftLayer::Water, DriftLayer::Sand, DriftLayer::Particles];

    /// Units per second in the layer's parent frame (the world, here).
    pub fn velocity(self) -> Vec3 {
        match self {
            DriftLayer::Water => Vec3::new(-1.0, -1.0, 0.0),
            DriftLayer::Sand | DriftLayer::Particles => Vec3::NEG_X,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Advances the character animation and translates the drift layers.
#[derive(Debug, Default)]
pub struct AnimationDriver;

impl AnimationDriver {
    pub fn new() -> Self {
        Self
    }

    pub fn tick(&mut self, composer: &mut SceneComposer, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if let Some((scene, character)) = composer.character_parts_mut() {
            character.mixer.update(dt);
            if character.mixer.current_clip().is_some() {
                let pose = character.mixer.pose(&character.asset.rig);
                let globals = character.asset.rig.global_matrices(&pose);
                let skins = character.asset.rig.skins();
                for (prim, &id) in character.asset.primitives.iter().zip(&character.mesh_nodes) {
                    if let Some(mesh) = scene.get_mut(id).and_then(Node::mesh_data_mut) {
                        skin_primitive(prim, &globals, skins, mesh);
                    }
                }
            }
        }

        for layer in DriftLayer::ALL {
            composer.apply_drift(layer, layer.velocity() * dt);
        }
    }
}
