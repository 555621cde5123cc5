/// Linear RGB color.
///
/// Hex constructors take sRGB-encoded values (as written in design tools) and
/// convert to linear; all lighting math happens in linear space.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    /// Linear components.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// `0xRRGGBB`, sRGB-encoded.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
        Self::rgb(channel(16), channel(8), channel(0))
    }

    #[inline]
    pub fn scaled(self, s: f32) -> Self {
        Self::rgb(self.r * s, self.g * s, self.b * s)
    }

    /// Per-channel offset, clamped to `[0, 1]`.
    pub fn offset(self, dr: f32, dg: f32, db: f32) -> Self {
        Self::rgb(
            (self.r + dr).clamp(0.0, 1.0),
            (self.g + dg).clamp(0.0, 1.0),
            (self.b + db).clamp(0.0, 1.0),
        )
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    #[inline]
    pub fn with_alpha(self, a: f32) -> [f32; 4] {
        [self.r, self.g, self.b, a]
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: 1.0,
        }
    }
}

impl From<[f32; 3]> for Color {
    fn from(c: [f32; 3]) -> Self {
        Self::rgb(c[0], c[1], c[2])
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hex_endpoints_are_exact() {
        assert_eq!(Color::from_hex(0xffffff), Color::WHITE);
        assert_eq!(Color::from_hex(0x000000), Color::BLACK);
    }

    #[test]
    fn hex_mid_gray_is_linearized() {
        let c = Color::from_hex(0x808080);
        assert_relative_eq!(c.r, 0.2158605, epsilon = 1e-5);
        assert_eq!(c.r, c.g);
    }

    #[test]
    fn offset_clamps() {
        let c = Color::rgb(0.95, 0.05, 0.5).offset(0.1, -0.1, 0.0);
        assert_eq!(c, Color::rgb(1.0, 0.0, 0.5));
    }
}
