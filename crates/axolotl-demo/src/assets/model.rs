use std::path::Path;

use ::gltf::animation::util::ReadOutputs;
use ::gltf::animation::Property;
use glam::{Mat4, Quat, Vec2, Vec3};

use axolotl_engine::scene::{Color, MeshData, Transform};

use crate::animation::{
    AnimationClip, Channel, ChannelValues, CharacterAsset, Interpolation, Rig, RigNode, Skin,
    SkinnedPrimitive,
};

use super::AssetError;

/// Loads a glTF/GLB model: node hierarchy, skins, triangle primitives and
/// translation/rotation/scale animations. Morph targets are ignored.
pub fn load_character(path: &Path) -> Result<CharacterAsset, AssetError> {
    let (doc, buffers, _images) = ::gltf::import(path)?;
    let asset = character_from_document(&doc, &buffers)?;
    log::info!(
        "{}: {} nodes, {} primitives, {} clips",
        path.display(),
        asset.rig.len(),
        asset.primitives.len(),
        asset.clips.len()
    );
    Ok(asset)
}

pub(super) fn character_from_document(
    doc: &::gltf::Document,
    buffers: &[::gltf::buffer::Data],
) -> Result<CharacterAsset, AssetError> {
    let rig = build_rig(doc, buffers);
    let primitives = build_primitives(doc, buffers);
    if primitives.is_empty() {
        return Err(AssetError::Format("model has no triangle primitives".into()));
    }
    let clips = doc.animations().map(|anim| build_clip(&anim, buffers)).collect();

    Ok(CharacterAsset { rig, primitives, clips })
}

fn build_rig(doc: &::gltf::Document, buffers: &[::gltf::buffer::Data]) -> Rig {
    let mut parents = vec![None; doc.nodes().len()];
    for node in doc.nodes() {
        for child in node.children() {
            parents[child.index()] = Some(node.index());
        }
    }

    let nodes = doc
        .nodes()
        .map(|node| {
            let (t, r, s) = node.transform().decomposed();
            RigNode {
                name: node.name().unwrap_or_default().to_string(),
                parent: parents[node.index()],
                rest: Transform {
                    translation: Vec3::from(t),
                    rotation: Quat::from_array(r),
                    scale: Vec3::from(s),
                },
            }
        })
        .collect();

    let skins = doc
        .skins()
        .map(|skin| {
            let joints: Vec<usize> = skin.joints().map(|j| j.index()).collect();
            let reader = skin.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
            let inverse_bind = match reader.read_inverse_bind_matrices() {
                Some(iter) => iter.map(|m| Mat4::from_cols_array_2d(&m)).collect(),
                None => vec![Mat4::IDENTITY; joints.len()],
            };
            Skin { joints, inverse_bind }
        })
        .collect();

    Rig::new(nodes, skins)
}

fn build_primitives(doc: &::gltf::Document, buffers: &[::gltf::buffer::Data]) -> Vec<SkinnedPrimitive> {
    let mut out = Vec::new();

    for node in doc.nodes() {
        let Some(mesh) = node.mesh() else { continue };
        for prim in mesh.primitives() {
            if prim.mode() != ::gltf::mesh::Mode::Triangles {
                log::debug!("skipping non-triangle primitive in mesh {:?}", mesh.name());
                continue;
            }

            let reader = prim.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
            let Some(positions) = reader.read_positions() else { continue };
            let positions: Vec<Vec3> = positions.map(Vec3::from).collect();
            let count = positions.len();

            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..count as u32).collect(),
            };
            if indices.iter().any(|&i| i as usize >= count) {
                log::warn!("mesh {:?} has out-of-range indices; skipped", mesh.name());
                continue;
            }

            let uvs = match reader.read_tex_coords(0) {
                Some(uvs) => uvs.into_f32().map(Vec2::from).collect(),
                None => vec![Vec2::ZERO; count],
            };

            let mut data = MeshData::new(positions, uvs, indices);
            match reader.read_normals() {
                Some(normals) => data.normals = normals.map(Vec3::from).collect(),
                None => data.compute_vertex_normals(),
            }
            if let Some(colors) = reader.read_colors(0) {
                data.colors = colors.into_rgb_f32().collect();
            }

            let joints: Vec<[u16; 4]> = reader
                .read_joints(0)
                .map(|j| j.into_u16().collect())
                .unwrap_or_default();
            let weights: Vec<[f32; 4]> = reader
                .read_weights(0)
                .map(|w| w.into_f32().collect())
                .unwrap_or_default();

            let material = prim.material();
            let [r, g, b, a] = material.pbr_metallic_roughness().base_color_factor();
            let blended = material.alpha_mode() == ::gltf::material::AlphaMode::Blend;

            out.push(SkinnedPrimitive {
                name: mesh.name().unwrap_or("primitive").to_string(),
                node: node.index(),
                skin: node.skin().map(|s| s.index()),
                mesh: data,
                joints,
                weights,
                color: Color::rgb(r, g, b),
                opacity: if blended { a } else { 1.0 },
                double_sided: material.double_sided(),
            });
        }
    }

    out
}

fn build_clip(anim: &::gltf::Animation<'_>, buffers: &[::gltf::buffer::Data]) -> AnimationClip {
    let mut channels = Vec::new();

    for channel in anim.channels() {
        let reader = channel.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
        let Some(inputs) = reader.read_inputs() else { continue };
        let times: Vec<f32> = inputs.collect();

        let interpolation = match channel.sampler().interpolation() {
            ::gltf::animation::Interpolation::Step => Interpolation::Step,
            ::gltf::animation::Interpolation::Linear => Interpolation::Linear,
            ::gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
        };

        let values = match (channel.target().property(), reader.read_outputs()) {
            (Property::Translation, Some(ReadOutputs::Translations(it))) => {
                ChannelValues::Translation(it.map(Vec3::from).collect())
            }
            (Property::Rotation, Some(ReadOutputs::Rotations(it))) => {
                ChannelValues::Rotation(it.into_f32().map(Quat::from_array).collect())
            }
            (Property::Scale, Some(ReadOutputs::Scales(it))) => ChannelValues::Scale(it.map(Vec3::from).collect()),
            _ => continue,
        };

        channels.push(Channel {
            node: channel.target().node().index(),
            interpolation,
            times,
            values,
        });
    }

    let name = anim
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("clip {}", anim.index()));
    AnimationClip::new(name, channels)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "name": "body", "mesh": 0, "translation": [0.0, 1.0, 0.0] }],
        "meshes": [{
            "name": "tri",
            "primitives": [{ "attributes": { "POSITION": 0 } }]
        }],
        "accessors": [{
            "bufferView": 0,
            "componentType": 5126,
            "count": 3,
            "type": "VEC3",
            "min": [0.0, 0.0, 0.0],
            "max": [1.0, 1.0, 0.0]
        }],
        "bufferViews": [{ "buffer": 0, "byteLength": 36 }],
        "buffers": [{
            "byteLength": 36,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA"
        }]
    }"#;

    #[test]
    fn minimal_triangle_document_loads() {
        let (doc, buffers, _) = ::gltf::import_slice(TRIANGLE.as_bytes()).unwrap();
        let asset = character_from_document(&doc, &buffers).unwrap();

        assert_eq!(asset.rig.len(), 1);
        assert!(asset.clips.is_empty());
        assert_eq!(asset.primitives.len(), 1);

        let prim = &asset.primitives[0];
        assert!(!prim.is_skinned());
        assert_eq!(prim.mesh.indices, vec![0, 1, 2]);
        assert_eq!(prim.mesh.positions[1], Vec3::X);

        // Rigid primitives are posed by their node's transform.
        let posed = asset.posed_meshes(&asset.rig.rest_pose());
        assert_eq!(posed[0].positions[0], Vec3::Y);
    }
}
