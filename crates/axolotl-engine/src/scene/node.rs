use super::{Light, Material, MeshData, PointCloud, PointsMaterial, Transform};

/// Index of a node in its `Scene`. Only valid for the scene that issued it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group,
    Mesh {
        mesh: MeshData,
        material: Material,
    },
    Points {
        cloud: PointCloud,
        material: PointsMaterial,
    },
    Light(Light),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub parent: Option<NodeId>,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            parent: None,
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            kind,
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, mesh: MeshData, material: Material) -> Self {
        Self::new(name, NodeKind::Mesh { mesh, material })
    }

    pub fn points(name: impl Into<String>, cloud: PointCloud, material: PointsMaterial) -> Self {
        Self::new(name, NodeKind::Points { cloud, material })
    }

    pub fn light(name: impl Into<String>, light: Light) -> Self {
        Self::new(name, NodeKind::Light(light))
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }

    pub fn mesh_data(&self) -> Option<&MeshData> {
        match &self.kind {
            NodeKind::Mesh { mesh, .. } => Some(mesh),
            _ => None,
        }
    }

    pub fn mesh_data_mut(&mut self) -> Option<&mut MeshData> {
        match &mut self.kind {
            NodeKind::Mesh { mesh, .. } => Some(mesh),
            _ => None,
        }
    }

    pub fn material_mut(&mut self) -> Option<&mut Material> {
        match &mut self.kind {
            NodeKind::Mesh { material, .. } => Some(material),
            _ => None,
        }
    }
}
