use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};

use axolotl_engine::scene::{Material, MeshData, Node, Transform};

use crate::config::TerrainConfig;
use crate::geometry::{plane_grid, GridShape};
use crate::noise::NoiseField;

/// Sand floor: a dense grid whose interior vertices are lifted by noise.
///
/// The plane is built in local XY and later rotated into the ground plane,
/// so heights go to local Z and world Z is local `-y`. Boundary vertices stay
/// at exactly zero. Normals are computed once, after displacement.
pub fn build_terrain(noise: &NoiseField, config: &TerrainConfig, seed_offset: f32) -> MeshData {
    let shape = GridShape::new(config.segments, config.segments);
    let mut mesh = plane_grid(config.width, config.depth, shape);

    for (i, p) in mesh.positions.iter_mut().enumerate() {
        if shape.is_boundary(i) {
            p.z = 0.0;
            continue;
        }
        let world_z = -p.y;
        p.z = noise.sample((p.x + seed_offset) * config.frequency, world_z * config.frequency)
            * config.amplitude;
    }

    mesh.compute_vertex_normals();
    mesh
}

/// Lays a plane mesh flat and lifts it to `elevation`.
pub(super) fn ground_transform(elevation: f32) -> Transform {
    Transform::from_translation(Vec3::new(0.0, elevation, 0.0)).with_rotation(Quat::from_rotation_x(-FRAC_PI_2))
}

pub(super) fn terrain_node(mesh: MeshData, config: &TerrainConfig) -> Node {
    Node::mesh("terrain", mesh, Material::from_color(config.color))
        .with_transform(ground_transform(config.elevation))
        .with_shadows(false, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn small() -> TerrainConfig {
        TerrainConfig {
            width: 4.0,
            depth: 4.0,
            segments: 8,
            ..TerrainConfig::default()
        }
    }

    #[test]
    fn boundary_is_pinned_and_interior_follows_noise() {
        let noise = NoiseField::with_seed(9);
        let config = small();
        let mesh = build_terrain(&noise, &config, 3.0);
        let shape = GridShape::new(8, 8);

        let mut interior_nonzero = 0;
        for (i, p) in mesh.positions.iter().enumerate() {
            if shape.is_boundary(i) {
                assert_eq!(p.z, 0.0);
            } else {
                let expected = noise.sample((p.x + 3.0) * config.frequency, -p.y * config.frequency) * config.amplitude;
                assert_relative_eq!(p.z, expected);
                if p.z != 0.0 {
                    interior_nonzero += 1;
                }
            }
        }
        assert!(interior_nonzero > 0);
    }

    #[test]
    fn normals_are_unit_length() {
        let mesh = build_terrain(&NoiseField::with_seed(1), &small(), 0.0);
        assert_eq!(mesh.normals.len(), mesh.positions.len());
        for n in &mesh.normals {
            assert_relative_eq!(n.length(), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn ground_transform_maps_local_z_to_world_up() {
        let t = ground_transform(-2.5);
        let up = t.matrix().transform_point3(Vec3::Z);
        assert_relative_eq!(up.y, -1.5, epsilon = 1e-5);
        let back = t.matrix().transform_vector3(Vec3::NEG_Y);
        assert_relative_eq!(back.z, 1.0, epsilon = 1e-5);
    }
}
