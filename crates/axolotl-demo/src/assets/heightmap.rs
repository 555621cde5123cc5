use std::path::Path;

use super::AssetError;

/// Grayscale height field in `[0, 1]`, sampled with wrapping bilinear
/// filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightMap {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl HeightMap {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self, AssetError> {
        if width == 0 || height == 0 || data.len() != width * height {
            return Err(AssetError::Format(format!(
                "height map {width}x{height} with {} samples",
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    /// From 8-bit luma rows, top row first.
    pub fn from_luma8(width: usize, height: usize, bytes: &[u8]) -> Result<Self, AssetError> {
        Self::new(width, height, bytes.iter().map(|&b| b as f32 / 255.0).collect())
    }

    /// Decodes any format the `image` crate reads and reduces it to luma.
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let luma = image::open(path)?.to_luma8();
        let (w, h) = luma.dimensions();
        Self::from_luma8(w as usize, h as usize, luma.as_raw())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn texel(&self, x: i64, y: i64) -> f32 {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.rem_euclid(self.height as i64) as usize;
        self.data[y * self.width + x]
    }

    /// Samples at texture coordinates with `v = 1` at the top row, matching
    /// the plane grid's UV layout. Coordinates wrap.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        if !u.is_finite() || !v.is_finite() {
            return 0.0;
        }
        let x = u * self.width as f32 - 0.5;
        let y = (1.0 - v) * self.height as f32 - 0.5;
        let (x0, y0) = (x.floor(), y.floor());
        let (fx, fy) = (x - x0, y - y0);
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = lerp(self.texel(x0, y0), self.texel(x0 + 1, y0), fx);
        let bottom = lerp(self.texel(x0, y0 + 1), self.texel(x0 + 1, y0 + 1), fx);
        lerp(top, bottom, fy)
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn texel_centers_return_stored_values() {
        // 2x2: top row 0, 255; bottom row 128, 64.
        let map = HeightMap::from_luma8(2, 2, &[0, 255, 128, 64]).unwrap();
        assert_relative_eq!(map.sample(0.25, 0.75), 0.0);
        assert_relative_eq!(map.sample(0.75, 0.75), 1.0);
        assert_relative_eq!(map.sample(0.25, 0.25), 128.0 / 255.0);
    }

    #[test]
    fn bilinear_between_centers() {
        let map = HeightMap::new(2, 1, vec![0.0, 1.0]).unwrap();
        assert_relative_eq!(map.sample(0.5, 0.5), 0.5);
    }

    #[test]
    fn coordinates_wrap() {
        let map = HeightMap::new(3, 3, (0..9).map(|i| i as f32 / 8.0).collect()).unwrap();
        assert_relative_eq!(map.sample(0.3, 0.6), map.sample(1.3, -0.4), epsilon = 1e-5);
    }

    #[test]
    fn mismatched_sizes_are_rejected() {
        assert!(matches!(HeightMap::new(2, 2, vec![0.0; 3]), Err(AssetError::Format(_))));
        assert!(HeightMap::new(0, 2, Vec::new()).is_err());
    }
}
