use glam::Vec3;

use axolotl_engine::scene::{Color, LightProbe, Material, Node, NodeId, Scene, Transform};

use crate::animation::{AnimationMixer, CharacterAsset, LoopMode};
use crate::config::CharacterConfig;
use crate::geometry::uv_sphere;

/// Load state of the character model.
#[derive(Debug, Clone, PartialEq)]
pub enum CharacterState {
    Pending,
    Loaded,
    /// The model failed to load; a placeholder stands in for it.
    Failed(String),
}

/// A character attached to the scene: one mesh node per primitive under a
/// shared `character` group, skinned on the CPU every frame.
#[derive(Debug)]
pub struct LoadedCharacter {
    pub group: NodeId,
    pub asset: CharacterAsset,
    pub mixer: AnimationMixer,
    pub mesh_nodes: Vec<NodeId>,
}

fn character_group(config: &CharacterConfig) -> Node {
    let transform = Transform::from_translation(config.position).with_scale(Vec3::splat(config.scale));
    Node::group("character").with_transform(transform)
}

/// Attaches the model in its rest pose and starts the configured clip.
pub(super) fn attach_character(
    scene: &mut Scene,
    mut asset: CharacterAsset,
    probe: Option<LightProbe>,
    config: &CharacterConfig,
) -> LoadedCharacter {
    let group = scene.add(character_group(config));

    let posed = asset.posed_meshes(&asset.rig.rest_pose());
    let mesh_nodes = asset
        .primitives
        .iter()
        .zip(posed)
        .map(|(prim, mesh)| {
            let material = Material {
                color: prim.color,
                opacity: prim.opacity,
                double_sided: prim.double_sided,
                probe,
                env_intensity: config.env_intensity,
                ..Material::default()
            };
            scene.add_child(group, Node::mesh(prim.name.clone(), mesh, material).with_shadows(true, true))
        })
        .collect();

    let mut mixer = AnimationMixer::new(std::mem::take(&mut asset.clips));
    if !mixer.play(config.clip_index, LoopMode::Repeat) {
        if mixer.play(0, LoopMode::Repeat) {
            log::warn!(
                "clip {} not found ({} clips); playing clip 0",
                config.clip_index,
                mixer.clips().len()
            );
        } else {
            log::warn!("character has no animation clips");
        }
    }

    LoadedCharacter {
        group,
        asset,
        mixer,
        mesh_nodes,
    }
}

/// Stand-in sphere shown when the model is unavailable.
pub(super) fn attach_placeholder(scene: &mut Scene, probe: Option<LightProbe>, config: &CharacterConfig) -> NodeId {
    let group = scene.add(character_group(config));
    let material = Material {
        color: Color::from_hex(0xf4a6c0),
        probe,
        env_intensity: config.env_intensity,
        ..Material::default()
    };
    let mesh = uv_sphere(config.placeholder_radius, 24, 16);
    scene.add_child(group, Node::mesh("character-placeholder", mesh, material).with_shadows(true, true));
    group
}
