use super::Color;

/// Distance fog applied to lit meshes and points.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Fog {
    Linear { color: Color, near: f32, far: f32 },
    /// Squared-exponential falloff: `1 - exp(-(density * d)^2)`.
    Exponential { color: Color, density: f32 },
}

impl Fog {
    pub fn color(&self) -> Color {
        match *self {
            Fog::Linear { color, .. } | Fog::Exponential { color, .. } => color,
        }
    }

    /// Fog blend factor in `[0, 1]` at view distance `d`.
    pub fn factor(&self, d: f32) -> f32 {
        match *self {
            Fog::Linear { near, far, .. } => {
                if far <= near {
                    return if d >= far { 1.0 } else { 0.0 };
                }
                ((d - near) / (far - near)).clamp(0.0, 1.0)
            }
            Fog::Exponential { density, .. } => {
                let x = density * d;
                (1.0 - (-x * x).exp()).clamp(0.0, 1.0)
            }
        }
    }

    /// Packed as `(near, far, density, mode)` for shaders; mode 1 = linear,
    /// 2 = exponential.
    pub fn shader_params(&self) -> [f32; 4] {
        match *self {
            Fog::Linear { near, far, .. } => [near, far, 0.0, 1.0],
            Fog::Exponential { density, .. } => [0.0, 0.0, density, 2.0],
        }
    }
}
