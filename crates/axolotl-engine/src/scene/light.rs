use glam::{Mat4, Vec3};

use super::Color;

/// Shadow map parameters for a directional light.
///
/// The orthographic frustum is expressed in light view space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShadowConfig {
    pub map_size: u32,
    pub near: f32,
    pub far: f32,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    /// Depth bias applied when comparing against the map.
    pub bias: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            map_size: 2048,
            near: 0.5,
            far: 50.0,
            left: -10.0,
            right: 10.0,
            top: 10.0,
            bottom: -10.0,
            bias: 0.0005,
        }
    }
}

impl ShadowConfig {
    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }

    /// View-projection for a light at `position` looking at `target`.
    pub fn view_projection(&self, position: Vec3, target: Vec3) -> Mat4 {
        let dir = (target - position).normalize_or_zero();
        // Avoid a degenerate basis when the light points straight down.
        let up = if dir.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        self.projection() * Mat4::look_at_rh(position, target, up)
    }
}

/// Light sources. A directional light's position is its node's world
/// translation; it shines towards `target`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    Directional {
        color: Color,
        intensity: f32,
        target: Vec3,
        shadow: Option<ShadowConfig>,
    },
}

impl Light {
    pub fn casts_shadow(&self) -> bool {
        matches!(self, Light::Directional { shadow: Some(_), .. })
    }
}
