//! Procedural geometry shared by the scene builders.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use axolotl_engine::scene::MeshData;

/// Vertex counts of a plane grid with the given segment counts.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GridShape {
    pub segments_x: u32,
    pub segments_y: u32,
}

impl GridShape {
    pub fn new(segments_x: u32, segments_y: u32) -> Self {
        Self {
            segments_x: segments_x.max(1),
            segments_y: segments_y.max(1),
        }
    }

    #[inline]
    pub fn columns(self) -> usize {
        self.segments_x as usize + 1
    }

    #[inline]
    pub fn rows(self) -> usize {
        self.segments_y as usize + 1
    }

    #[inline]
    pub fn vertex_count(self) -> usize {
        self.columns() * self.rows()
    }

    /// Whether vertex `index` lies on the outermost row or column.
    pub fn is_boundary(self, index: usize) -> bool {
        let (col, row) = (index % self.columns(), index / self.columns());
        col == 0 || row == 0 || col + 1 == self.columns() || row + 1 == self.rows()
    }
}

/// Plane in the local XY plane facing +Z, centered on the origin.
///
/// Rows run from +Y to -Y; UV `(0, 1)` is the top-left corner. Triangles are
/// counter-clockwise seen from +Z.
pub fn plane_grid(width: f32, height: f32, shape: GridShape) -> MeshData {
    let (gx, gy) = (shape.segments_x, shape.segments_y);
    let seg_w = width / gx as f32;
    let seg_h = height / gy as f32;

    let mut positions = Vec::with_capacity(shape.vertex_count());
    let mut uvs = Vec::with_capacity(shape.vertex_count());
    for iy in 0..=gy {
        let y = iy as f32 * seg_h - height * 0.5;
        for ix in 0..=gx {
            let x = ix as f32 * seg_w - width * 0.5;
            positions.push(Vec3::new(x, -y, 0.0));
            uvs.push(Vec2::new(ix as f32 / gx as f32, 1.0 - iy as f32 / gy as f32));
        }
    }

    let cols = gx + 1;
    let mut indices = Vec::with_capacity((gx * gy * 6) as usize);
    for iy in 0..gy {
        for ix in 0..gx {
            let a = ix + cols * iy;
            let b = ix + cols * (iy + 1);
            let c = (ix + 1) + cols * (iy + 1);
            let d = (ix + 1) + cols * iy;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    MeshData::new(positions, uvs, indices)
}

/// UV sphere with outward normals.
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let polar = v * PI;
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let azimuth = u * 2.0 * PI;
            let n = Vec3::new(
                -azimuth.cos() * polar.sin(),
                polar.cos(),
                azimuth.sin() * polar.sin(),
            );
            positions.push(n * radius);
            normals.push(n);
            uvs.push(Vec2::new(u, 1.0 - v));
        }
    }

    let cols = ws + 1;
    let mut indices = Vec::new();
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * cols + ix + 1;
            let b = iy * cols + ix;
            let c = (iy + 1) * cols + ix;
            let d = (iy + 1) * cols + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    let mut mesh = MeshData::new(positions, uvs, indices);
    mesh.normals = normals;
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn plane_grid_counts_and_extent() {
        let mesh = plane_grid(4.0, 2.0, GridShape::new(4, 2));
        assert_eq!(mesh.vertex_count(), 15);
        assert_eq!(mesh.triangle_count(), 16);
        assert_eq!(mesh.positions[0], Vec3::new(-2.0, 1.0, 0.0));
        assert_eq!(mesh.positions[14], Vec3::new(2.0, -1.0, 0.0));
        assert_eq!(mesh.uvs[0], Vec2::new(0.0, 1.0));
    }

    #[test]
    fn plane_grid_faces_positive_z() {
        let mut mesh = plane_grid(2.0, 2.0, GridShape::new(3, 3));
        mesh.compute_vertex_normals();
        for n in &mesh.normals {
            assert_relative_eq!(n.z, 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn boundary_covers_outer_ring_only() {
        let shape = GridShape::new(3, 2);
        let boundary: Vec<usize> = (0..shape.vertex_count()).filter(|&i| shape.is_boundary(i)).collect();
        // 4 x 3 vertices: only indices 5 and 6 are interior.
        assert_eq!(boundary.len(), 10);
        assert!(!shape.is_boundary(5));
        assert!(!shape.is_boundary(6));
    }

    #[test]
    fn sphere_normals_point_outwards() {
        let mut mesh = uv_sphere(2.0, 12, 8);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert_relative_eq!(p.length(), 2.0, epsilon = 1e-4);
            assert!(p.dot(*n) > 0.0);
        }
        let before = mesh.normals.clone();
        mesh.compute_vertex_normals();
        let agree = before.iter().zip(&mesh.normals).filter(|(a, b)| a.dot(**b) > 0.5).count();
        assert!(agree * 10 >= before.len() * 9);
    }
}
