use glam::{Vec2, Vec3};

/// CPU-side indexed triangle mesh.
///
/// Renderers cache GPU buffers per node and re-upload when `revision` changes;
/// call [`MeshData::mark_changed`] after mutating the vertex vectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Optional per-vertex colors (linear). Empty means white.
    pub colors: Vec<[f32; 3]>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
    revision: u64,
}

impl MeshData {
    pub fn new(positions: Vec<Vec3>, uvs: Vec<Vec2>, indices: Vec<u32>) -> Self {
        let normals = vec![Vec3::Z; positions.len()];
        Self {
            positions,
            normals,
            colors: Vec::new(),
            uvs,
            indices,
            revision: 0,
        }
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    pub fn mark_changed(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Recomputes smooth normals as the area-weighted average of adjacent
    /// face normals.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];

        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (Some(pa), Some(pb), Some(pc)) = (
                self.positions.get(a),
                self.positions.get(b),
                self.positions.get(c),
            ) else {
                continue;
            };

            // Unnormalized cross product carries twice the triangle area.
            let face = (*pb - *pa).cross(*pc - *pa);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }

        for n in &mut normals {
            *n = n.normalize_or_zero();
        }

        self.normals = normals;
        self.mark_changed();
    }

    /// Mean of all positions; used as the sort anchor for transparent draws.
    pub fn centroid(&self) -> Vec3 {
        if self.positions.is_empty() {
            return Vec3::ZERO;
        }
        self.positions.iter().copied().sum::<Vec3>() / self.positions.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad() -> MeshData {
        MeshData::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            Vec::new(),
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn flat_quad_normals_point_up_z() {
        let mut m = quad();
        m.normals.clear();
        m.compute_vertex_normals();
        for n in &m.normals {
            assert_relative_eq!(n.z, 1.0);
        }
    }

    #[test]
    fn recompute_bumps_revision() {
        let mut m = quad();
        let before = m.revision();
        m.compute_vertex_normals();
        assert_ne!(m.revision(), before);
    }

    #[test]
    fn out_of_range_indices_are_skipped() {
        let mut m = quad();
        m.indices.extend_from_slice(&[0, 1, 99]);
        m.compute_vertex_normals();
        assert_eq!(m.normals.len(), 4);
    }
}
