use glam::Mat4;

use super::{Color, Fog, Light, Node, NodeId, NodeKind};

/// Node arena plus scene-wide background and fog.
///
/// Parents are always inserted before their children, so a node's parent has a
/// smaller index and parent chains cannot form cycles.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub background: Color,
    pub fog: Option<Fog>,
    nodes: Vec<Node>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a root node.
    pub fn add(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        self.push(node)
    }

    /// Adds `node` under `parent`. Unknown parents attach at the root.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        node.parent = (parent.index() < self.nodes.len()).then_some(parent);
        self.push(node)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// First node with the given name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.iter().find(|(_, n)| n.name == name).map(|(id, _)| id)
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.iter()
            .filter(move |(_, n)| n.parent == Some(parent))
            .map(|(id, _)| id)
    }

    pub fn lights(&self) -> impl Iterator<Item = (NodeId, &Light)> {
        self.iter().filter_map(|(id, n)| match &n.kind {
            NodeKind::Light(l) => Some((id, l)),
            _ => None,
        })
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        let mut cur = Some(id);
        while let Some(c) = cur {
            let Some(node) = self.get(c) else { break };
            m = node.transform.matrix() * m;
            cur = node.parent;
        }
        m
    }

    /// True when the node and all its ancestors are visible.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            match self.get(c) {
                Some(node) if node.visible => cur = node.parent,
                _ => return false,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Transform;
    use approx::assert_relative_eq;
    use glam::{Quat, Vec3};

    #[test]
    fn world_matrix_composes_parent_chain() {
        let mut scene = Scene::new();
        let root = scene.add(
            Node::group("root").with_transform(Transform::from_translation(Vec3::new(1.0, 0.0, 0.0))),
        );
        let child = scene.add_child(
            root,
            Node::group("child").with_transform(
                Transform::from_translation(Vec3::new(0.0, 2.0, 0.0))
                    .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)),
            ),
        );
        let leaf = scene.add_child(
            child,
            Node::group("leaf").with_transform(Transform::from_translation(Vec3::new(0.0, 0.0, 1.0))),
        );

        let p = scene.world_matrix(leaf).transform_point3(Vec3::ZERO);
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn hidden_ancestor_hides_descendants() {
        let mut scene = Scene::new();
        let root = scene.add(Node::group("root"));
        let child = scene.add_child(root, Node::group("child"));
        assert!(scene.is_visible(child));

        if let Some(n) = scene.get_mut(root) {
            n.visible = false;
        }
        assert!(!scene.is_visible(child));
    }

    #[test]
    fn find_and_children() {
        let mut scene = Scene::new();
        let root = scene.add(Node::group("character"));
        scene.add_child(root, Node::group("a"));
        scene.add_child(root, Node::group("b"));

        assert_eq!(scene.find("character"), Some(root));
        assert_eq!(scene.children(root).count(), 2);
        assert_eq!(scene.find("missing"), None);
    }
}
