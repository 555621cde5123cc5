//! Renderer-agnostic scene description.
//!
//! Responsibilities:
//! - node arena with parent links and TRS transforms
//! - CPU-side geometry (meshes, point clouds) with revision counters
//! - lights, fog and the perspective camera
//! - deterministic per-frame draw ordering (`RenderList`)

mod camera;
mod color;
mod fog;
mod graph;
mod light;
mod list;
mod material;
mod mesh;
mod node;
mod points;
mod transform;

pub use camera::PerspectiveCamera;
pub use color::Color;
pub use fog::Fog;
pub use graph::Scene;
pub use light::{Light, ShadowConfig};
pub use list::{RenderItem, RenderList, RenderPhase, SortKey};
pub use material::{LightProbe, Material, PointsMaterial};
pub use mesh::MeshData;
pub use node::{Node, NodeId, NodeKind};
pub use points::PointCloud;
pub use transform::Transform;
