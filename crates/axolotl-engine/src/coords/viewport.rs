/// Drawable area: logical size plus the device pixel ratio used for
/// offscreen render targets.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Builds a viewport from a physical surface size, capping the pixel
    /// ratio at `max_pixel_ratio`.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64, max_pixel_ratio: f32) -> Self {
        let scale = scale_factor.max(f64::EPSILON);
        Self {
            width: (width as f64 / scale) as f32,
            height: (height as f64 / scale) as f32,
            pixel_ratio: (scale as f32).min(max_pixel_ratio),
        }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    pub fn aspect(self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Render target size in physical pixels (at least 1x1).
    pub fn render_size(self) -> (u32, u32) {
        let w = (self.width * self.pixel_ratio).round().max(1.0) as u32;
        let h = (self.height * self.pixel_ratio).round().max(1.0) as u32;
        (w, h)
    }

    /// Maps a logical position to `[0, 1]` per axis (top-left origin).
    pub fn normalize(self, x: f32, y: f32) -> (f32, f32) {
        if !self.is_valid() {
            return (0.5, 0.5);
        }
        (x / self.width, y / self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pixel_ratio_is_capped() {
        let vp = Viewport::from_physical(3000, 1500, 3.0, 2.0);
        assert_relative_eq!(vp.width, 1000.0);
        assert_relative_eq!(vp.pixel_ratio, 2.0);
        assert_eq!(vp.render_size(), (2000, 1000));
    }

    #[test]
    fn normalize_center() {
        let vp = Viewport::new(800.0, 600.0, 1.0);
        assert_eq!(vp.normalize(400.0, 300.0), (0.5, 0.5));
    }

    #[test]
    fn degenerate_viewport_normalizes_to_center() {
        let vp = Viewport::new(0.0, 0.0, 1.0);
        assert_eq!(vp.normalize(12.0, 7.0), (0.5, 0.5));
        assert_eq!(vp.render_size(), (1, 1));
    }
}
