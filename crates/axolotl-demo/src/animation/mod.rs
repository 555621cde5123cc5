//! Keyframe animation and CPU skinning for the loaded character.

mod clip;
mod mixer;
mod rig;
mod skinning;

pub use clip::{AnimationClip, Channel, ChannelValues, Interpolation};
pub use mixer::{AnimationMixer, LoopMode};
pub use rig::{Rig, RigNode, Skin};
pub use skinning::{joint_matrices, skin_primitive, SkinnedPrimitive};

use axolotl_engine::scene::{MeshData, Transform};

/// Everything the scene needs from a loaded character model.
#[derive(Debug, Clone, Default)]
pub struct CharacterAsset {
    pub rig: Rig,
    pub primitives: Vec<SkinnedPrimitive>,
    pub clips: Vec<AnimationClip>,
}

impl CharacterAsset {
    /// Model-space meshes for `pose`, one per primitive.
    pub fn posed_meshes(&self, pose: &[Transform]) -> Vec<MeshData> {
        let globals = self.rig.global_matrices(pose);
        self.primitives
            .iter()
            .map(|prim| {
                let mut out = prim.mesh.clone();
                skin_primitive(prim, &globals, self.rig.skins(), &mut out);
                out
            })
            .collect()
    }
}
