use glam::{Mat4, Vec3};

/// Right-handed perspective camera aimed at a target point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view, degrees.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y,
            aspect,
            near,
            far,
        }
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// wgpu clip space (depth in `[0, 1]`).
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Camera right and up axes in world space (billboard basis).
    pub fn basis(&self) -> (Vec3, Vec3) {
        let inv = self.view().inverse();
        (inv.x_axis.truncate(), inv.y_axis.truncate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn target_lands_on_screen_center() {
        let mut cam = PerspectiveCamera::new(45.0, 16.0 / 9.0, 0.1, 100.0);
        cam.position = Vec3::new(0.0, 1.0, 5.0);
        cam.look_at(Vec3::ZERO);

        let ndc = cam.view_projection().project_point3(Vec3::ZERO);
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn invalid_aspect_is_ignored() {
        let mut cam = PerspectiveCamera::new(45.0, 1.5, 0.1, 100.0);
        cam.set_aspect(0.0);
        cam.set_aspect(f32::NAN);
        assert_eq!(cam.aspect, 1.5);
    }

    #[test]
    fn basis_is_orthonormal() {
        let mut cam = PerspectiveCamera::new(45.0, 1.0, 0.1, 100.0);
        cam.position = Vec3::new(3.0, 0.5, 0.0);
        let (right, up) = cam.basis();
        assert_relative_eq!(right.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(right.dot(up), 0.0, epsilon = 1e-5);
    }
}
