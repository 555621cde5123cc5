use glam::Mat4;

use axolotl_engine::scene::Transform;

#[derive(Debug, Clone, PartialEq)]
pub struct RigNode {
    pub name: String,
    pub parent: Option<usize>,
    pub rest: Transform,
}

/// Joint list plus the matrices that move mesh space into each joint's
/// bind space.
#[derive(Debug, Clone, PartialEq)]
pub struct Skin {
    pub joints: Vec<usize>,
    pub inverse_bind: Vec<Mat4>,
}

/// Node hierarchy of a loaded model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rig {
    nodes: Vec<RigNode>,
    skins: Vec<Skin>,
    /// Node indices with every parent ahead of its children.
    order: Vec<usize>,
}

impl Rig {
    /// Builds a rig; parent links that are out of range or cyclic are cut.
    pub fn new(mut nodes: Vec<RigNode>, skins: Vec<Skin>) -> Self {
        let len = nodes.len();
        for node in &mut nodes {
            if node.parent.is_some_and(|p| p >= len) {
                node.parent = None;
            }
        }

        let mut children = vec![Vec::new(); len];
        for (i, node) in nodes.iter().enumerate() {
            if let Some(p) = node.parent {
                children[p].push(i);
            }
        }

        let mut order = Vec::with_capacity(len);
        let mut visited = vec![false; len];
        let mut stack: Vec<usize> = (0..len).filter(|&i| nodes[i].parent.is_none()).rev().collect();
        while let Some(i) = stack.pop() {
            if std::mem::replace(&mut visited[i], true) {
                continue;
            }
            order.push(i);
            stack.extend(children[i].iter().rev().copied());
        }

        // Nodes only reachable through a cycle become roots.
        for i in 0..len {
            if !visited[i] {
                log::warn!("rig node {i} ({}) is part of a parent cycle; detaching", nodes[i].name);
                nodes[i].parent = None;
                visited[i] = true;
                order.push(i);
            }
        }

        Self { nodes, skins, order }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[RigNode] {
        &self.nodes
    }

    pub fn skins(&self) -> &[Skin] {
        &self.skins
    }

    pub fn rest_pose(&self) -> Vec<Transform> {
        self.nodes.iter().map(|n| n.rest).collect()
    }

    /// Model-space matrix of every node for `pose` (one local transform per
    /// node; missing entries fall back to the rest transform).
    pub fn global_matrices(&self, pose: &[Transform]) -> Vec<Mat4> {
        let mut globals = vec![Mat4::IDENTITY; self.nodes.len()];
        for &i in &self.order {
            let local = pose.get(i).unwrap_or(&self.nodes[i].rest).matrix();
            globals[i] = match self.nodes[i].parent {
                Some(p) => globals[p] * local,
                None => local,
            };
        }
        globals
    }
}
