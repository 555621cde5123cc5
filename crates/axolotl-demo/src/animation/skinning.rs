use glam::{Mat4, Vec3};

use axolotl_engine::scene::{Color, MeshData};

use super::Skin;

/// One drawable primitive of a loaded model, in its node's local space.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinnedPrimitive {
    pub name: String,
    /// Rig node the primitive hangs off.
    pub node: usize,
    pub skin: Option<usize>,
    /// Bind-pose geometry.
    pub mesh: MeshData,
    /// Up to four joint slots per vertex, indices into the skin's joint list.
    pub joints: Vec<[u16; 4]>,
    pub weights: Vec<[f32; 4]>,
    pub color: Color,
    pub opacity: f32,
    pub double_sided: bool,
}

impl SkinnedPrimitive {
    pub fn is_skinned(&self) -> bool {
        self.skin.is_some()
            && self.joints.len() == self.mesh.vertex_count()
            && self.weights.len() == self.mesh.vertex_count()
    }
}

/// `global[joint] * inverse_bind[joint]` for every joint of `skin`.
pub fn joint_matrices(skin: &Skin, globals: &[Mat4]) -> Vec<Mat4> {
    skin.joints
        .iter()
        .enumerate()
        .map(|(i, &node)| {
            let global = globals.get(node).copied().unwrap_or(Mat4::IDENTITY);
            let inverse_bind = skin.inverse_bind.get(i).copied().unwrap_or(Mat4::IDENTITY);
            global * inverse_bind
        })
        .collect()
}

/// Poses `prim` into `out` (model space). `out` must have the same topology.
///
/// Skinned primitives blend their joint matrices by weight; rigid ones take
/// their node's global matrix.
pub fn skin_primitive(prim: &SkinnedPrimitive, globals: &[Mat4], skins: &[Skin], out: &mut MeshData) {
    let skin = prim.skin.and_then(|s| skins.get(s)).filter(|_| prim.is_skinned());

    match skin {
        Some(skin) => {
            let joints = joint_matrices(skin, globals);
            for (i, (&p, &n)) in prim.mesh.positions.iter().zip(&prim.mesh.normals).enumerate() {
                let m = blend(&joints, prim.joints[i], prim.weights[i]);
                write_vertex(out, i, m, p, n);
            }
        }
        None => {
            let m = globals.get(prim.node).copied().unwrap_or(Mat4::IDENTITY);
            for (i, (&p, &n)) in prim.mesh.positions.iter().zip(&prim.mesh.normals).enumerate() {
                write_vertex(out, i, m, p, n);
            }
        }
    }
    out.mark_changed();
}

fn blend(joints: &[Mat4], slots: [u16; 4], weights: [f32; 4]) -> Mat4 {
    let mut total = 0.0;
    let mut m = Mat4::ZERO;
    for (slot, w) in slots.into_iter().zip(weights) {
        if w <= 0.0 {
            continue;
        }
        if let Some(joint) = joints.get(slot as usize) {
            m += *joint * w;
            total += w;
        }
    }
    if total > 1e-6 { m * (1.0 / total) } else { Mat4::IDENTITY }
}

fn write_vertex(out: &mut MeshData, i: usize, m: Mat4, p: Vec3, n: Vec3) {
    if let Some(dst) = out.positions.get_mut(i) {
        *dst = m.transform_point3(p);
    }
    if let Some(dst) = out.normals.get_mut(i) {
        *dst = m.transform_vector3(n).try_normalize().unwrap_or(n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec2;

    fn triangle() -> MeshData {
        MeshData::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![Vec2::ZERO; 3],
            vec![0, 1, 2],
        )
    }

    fn skinned(mesh: MeshData, weights: [f32; 4]) -> SkinnedPrimitive {
        SkinnedPrimitive {
            name: "tri".into(),
            node: 0,
            skin: Some(0),
            joints: vec![[0, 1, 0, 0]; mesh.vertex_count()],
            weights: vec![weights; mesh.vertex_count()],
            mesh,
            color: Color::WHITE,
            opacity: 1.0,
            double_sided: false,
        }
    }

    #[test]
    fn identity_joints_leave_vertices_unchanged() {
        let prim = skinned(triangle(), [0.5, 0.5, 0.0, 0.0]);
        let skin = Skin {
            joints: vec![0, 1],
            inverse_bind: vec![Mat4::IDENTITY; 2],
        };
        let mut out = prim.mesh.clone();
        skin_primitive(&prim, &[Mat4::IDENTITY; 2], &[skin], &mut out);
        for (a, b) in out.positions.iter().zip(&prim.mesh.positions) {
            assert_relative_eq!(a.distance(*b), 0.0, epsilon = 1e-6);
        }
        assert_ne!(out.revision(), prim.mesh.revision());
    }

    #[test]
    fn weights_blend_joint_translations() {
        let prim = skinned(triangle(), [0.25, 0.75, 0.0, 0.0]);
        let skin = Skin {
            joints: vec![0, 1],
            inverse_bind: vec![Mat4::IDENTITY; 2],
        };
        let globals = [Mat4::IDENTITY, Mat4::from_translation(Vec3::new(0.0, 0.0, 4.0))];
        let mut out = prim.mesh.clone();
        skin_primitive(&prim, &globals, &[skin], &mut out);
        assert_relative_eq!(out.positions[1].z, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn inverse_bind_cancels_rest_pose() {
        let rest = Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0));
        let prim = skinned(triangle(), [1.0, 0.0, 0.0, 0.0]);
        let skin = Skin {
            joints: vec![0, 1],
            inverse_bind: vec![rest.inverse(), Mat4::IDENTITY],
        };
        let mut out = prim.mesh.clone();
        skin_primitive(&prim, &[rest, Mat4::IDENTITY], &[skin], &mut out);
        assert_relative_eq!(out.positions[1].x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn rigid_primitives_follow_their_node() {
        let mut prim = skinned(triangle(), [1.0, 0.0, 0.0, 0.0]);
        prim.skin = None;
        prim.node = 1;
        let mut out = prim.mesh.clone();
        let globals = [Mat4::IDENTITY, Mat4::from_translation(Vec3::Y)];
        skin_primitive(&prim, &globals, &[], &mut out);
        assert_relative_eq!(out.positions[0].y, 1.0);
    }
}
