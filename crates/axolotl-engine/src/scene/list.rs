use core::cmp::Ordering;

use glam::{Mat4, Vec3};

use super::{NodeId, NodeKind, PerspectiveCamera, Scene};

/// Draw phase; phases render in declaration order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum RenderPhase {
    Opaque,
    Points,
    Transparent,
}

/// Stable sort key for draw items.
///
/// Ordering rules:
/// 1) `phase` ascending
/// 2) `depth`: opaque front-to-back, transparent back-to-front
/// 3) `order`: scene insertion order for ties
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SortKey {
    pub phase: RenderPhase,
    depth: u32,
    pub order: u32,
}

impl SortKey {
    pub fn new(phase: RenderPhase, view_distance: f32, order: u32) -> Self {
        // Non-negative floats order the same as their bit patterns.
        let bits = view_distance.max(0.0).to_bits();
        let depth = match phase {
            RenderPhase::Transparent => u32::MAX - bits,
            _ => bits,
        };
        Self { phase, depth, order }
    }
}

impl Ord for SortKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.phase
            .cmp(&other.phase)
            .then(self.depth.cmp(&other.depth))
            .then(self.order.cmp(&other.order))
    }
}

impl PartialOrd for SortKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderItem {
    pub key: SortKey,
    pub node: NodeId,
    pub world: Mat4,
}

/// Per-frame draw stream built from the visible drawable nodes of a scene.
///
/// The item buffer is reused across frames.
#[derive(Debug, Default)]
pub struct RenderList {
    items: Vec<RenderItem>,
}

impl RenderList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rebuild(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        self.items.clear();

        for (id, node) in scene.iter() {
            let (phase, anchor) = match &node.kind {
                NodeKind::Mesh { mesh, material } if !mesh.indices.is_empty() => {
                    let phase = if material.is_transparent() {
                        RenderPhase::Transparent
                    } else {
                        RenderPhase::Opaque
                    };
                    (phase, mesh.centroid())
                }
                NodeKind::Points { cloud, .. } if !cloud.is_empty() => {
                    (RenderPhase::Points, Vec3::ZERO)
                }
                _ => continue,
            };
            if !scene.is_visible(id) {
                continue;
            }

            let world = scene.world_matrix(id);
            let distance = world.transform_point3(anchor).distance(camera.position);
            self.items.push(RenderItem {
                key: SortKey::new(phase, distance, id.index() as u32),
                node: id,
                world,
            });
        }

        self.items.sort_by(|a, b| a.key.cmp(&b.key));
    }

    pub fn items(&self) -> &[RenderItem] {
        &self.items
    }

    pub fn phase(&self, phase: RenderPhase) -> impl Iterator<Item = &RenderItem> {
        self.items.iter().filter(move |i| i.key.phase == phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Material, MeshData, Node, Transform};
    use glam::Vec2;

    fn tri() -> MeshData {
        MeshData::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![Vec2::ZERO; 3],
            vec![0, 1, 2],
        )
    }

    fn mesh_at(name: &str, z: f32, opacity: f32) -> Node {
        let material = Material {
            opacity,
            ..Material::default()
        };
        Node::mesh(name, tri(), material).with_transform(Transform::from_translation(Vec3::new(0.0, 0.0, z)))
    }

    #[test]
    fn opaque_front_to_back_then_transparent_back_to_front() {
        let mut scene = Scene::new();
        let far_opaque = scene.add(mesh_at("far", -10.0, 1.0));
        let near_opaque = scene.add(mesh_at("near", -1.0, 1.0));
        let near_glass = scene.add(mesh_at("near glass", -2.0, 0.5));
        let far_glass = scene.add(mesh_at("far glass", -8.0, 0.5));

        let camera = PerspectiveCamera::new(45.0, 1.0, 0.1, 100.0);
        let mut list = RenderList::new();
        list.rebuild(&scene, &camera);

        let order: Vec<NodeId> = list.items().iter().map(|i| i.node).collect();
        assert_eq!(order, vec![near_opaque, far_opaque, far_glass, near_glass]);
    }

    #[test]
    fn hidden_and_empty_nodes_are_skipped() {
        let mut scene = Scene::new();
        let mut hidden = mesh_at("hidden", 0.0, 1.0);
        hidden.visible = false;
        scene.add(hidden);
        scene.add(Node::mesh("empty", MeshData::default(), Material::default()));
        scene.add(Node::group("group"));

        let mut list = RenderList::new();
        list.rebuild(&scene, &PerspectiveCamera::new(45.0, 1.0, 0.1, 100.0));
        assert!(list.items().is_empty());
    }
}
