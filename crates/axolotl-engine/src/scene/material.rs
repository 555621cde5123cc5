use super::Color;

/// Hemisphere irradiance estimate derived from an environment map.
///
/// Lighting blends `ground` to `sky` by the world-space normal's Y component.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightProbe {
    pub sky: Color,
    pub ground: Color,
}

/// Lit surface material.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Color,
    pub emissive: Color,
    /// `< 1.0` routes the draw through the blended transparent phase.
    pub opacity: f32,
    pub double_sided: bool,
    pub probe: Option<LightProbe>,
    pub env_intensity: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            emissive: Color::BLACK,
            opacity: 1.0,
            double_sided: false,
            probe: None,
            env_intensity: 1.0,
        }
    }
}

impl Material {
    pub fn from_color(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Material for screen-facing point sprites.
#[derive(Debug, Clone, PartialEq)]
pub struct PointsMaterial {
    /// World-space sprite size.
    pub size: f32,
    pub opacity: f32,
}

impl Default for PointsMaterial {
    fn default() -> Self {
        Self {
            size: 0.05,
            opacity: 1.0,
        }
    }
}
