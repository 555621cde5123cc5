use glam::Vec3;

/// Point cloud with per-point linear colors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    pub positions: Vec<Vec3>,
    pub colors: Vec<[f32; 3]>,
    revision: u64,
}

impl PointCloud {
    pub fn new(positions: Vec<Vec3>, colors: Vec<[f32; 3]>) -> Self {
        debug_assert_eq!(positions.len(), colors.len());
        Self {
            positions,
            colors,
            revision: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    pub fn mark_changed(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
