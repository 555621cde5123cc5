use axolotl_engine::scene::{Material, MeshData, Node};

use crate::assets::HeightMap;
use crate::config::WaterConfig;
use crate::geometry::{plane_grid, GridShape};

use super::terrain::ground_transform;

/// Water surface: a coarse plane, pushed along its local normal by the
/// displacement map when one is available.
pub fn build_water(config: &WaterConfig, displacement: Option<&HeightMap>) -> MeshData {
    let mut mesh = plane_grid(config.width, config.depth, GridShape::new(config.segments, config.segments));

    if let Some(map) = displacement {
        for (p, uv) in mesh.positions.iter_mut().zip(&mesh.uvs) {
            p.z += map.sample(uv.x, uv.y) * config.displacement_scale;
        }
        mesh.compute_vertex_normals();
    }

    mesh
}

pub(super) fn water_material(config: &WaterConfig) -> Material {
    Material {
        opacity: config.opacity.clamp(0.0, 1.0),
        double_sided: true,
        ..Material::from_color(config.color)
    }
}

pub(super) fn water_node(mesh: MeshData, config: &WaterConfig) -> Node {
    Node::mesh("water", mesh, water_material(config)).with_transform(ground_transform(config.elevation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn flat_without_a_map() {
        let mesh = build_water(&WaterConfig::default(), None);
        assert!(mesh.positions.iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn uniform_map_lifts_every_vertex() {
        let config = WaterConfig::default();
        let map = HeightMap::new(2, 2, vec![1.0; 4]).unwrap();
        let mesh = build_water(&config, Some(&map));
        for p in &mesh.positions {
            assert_relative_eq!(p.z, config.displacement_scale);
        }
    }

    #[test]
    fn material_is_translucent_and_double_sided() {
        let material = water_material(&WaterConfig::default());
        assert!(material.is_transparent());
        assert!(material.double_sided);
    }
}
