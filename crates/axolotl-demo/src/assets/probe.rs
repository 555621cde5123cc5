use std::path::Path;

use axolotl_engine::scene::{Color, LightProbe};

use super::AssetError;

/// Loads an equirectangular HDR environment (OpenEXR or anything else the
/// `image` crate decodes) and reduces it to a hemisphere probe.
pub fn load_light_probe(path: &Path) -> Result<LightProbe, AssetError> {
    let rgb = image::open(path)?.to_rgb32f();
    let (w, h) = rgb.dimensions();
    let pixels: Vec<[f32; 3]> = rgb.pixels().map(|p| p.0).collect();
    probe_from_equirect(w as usize, h as usize, &pixels)
}

/// Averages the upper and lower halves of an equirectangular image, weighting
/// each row by the solid angle it covers. Rows run from the zenith down.
pub fn probe_from_equirect(width: usize, height: usize, pixels: &[[f32; 3]]) -> Result<LightProbe, AssetError> {
    if width == 0 || height < 2 || pixels.len() != width * height {
        return Err(AssetError::Format(format!(
            "environment map {width}x{height} with {} pixels",
            pixels.len()
        )));
    }

    let mut sums = [[0.0f64; 3]; 2];
    let mut weights = [0.0f64; 2];

    for (row, texels) in pixels.chunks_exact(width).enumerate() {
        let latitude = std::f64::consts::PI * (0.5 - (row as f64 + 0.5) / height as f64);
        let w = latitude.cos();
        let half = usize::from(row >= height / 2);
        for px in texels {
            if !px.iter().all(|c| c.is_finite()) {
                continue;
            }
            for (sum, &c) in sums[half].iter_mut().zip(px) {
                *sum += c.max(0.0) as f64 * w;
            }
            weights[half] += w;
        }
    }

    let mean = |half: usize| {
        let w = weights[half].max(f64::EPSILON);
        let [r, g, b] = sums[half];
        Color::rgb((r / w) as f32, (g / w) as f32, (b / w) as f32)
    };

    Ok(LightProbe {
        sky: mean(0),
        ground: mean(1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn splits_sky_from_ground() {
        let (w, h) = (8, 4);
        let pixels: Vec<[f32; 3]> = (0..w * h)
            .map(|i| if i / w < h / 2 { [2.0, 2.0, 4.0] } else { [0.5, 0.25, 0.0] })
            .collect();
        let probe = probe_from_equirect(w, h, &pixels).unwrap();
        assert_relative_eq!(probe.sky.b, 4.0, epsilon = 1e-5);
        assert_relative_eq!(probe.ground.r, 0.5, epsilon = 1e-5);
        assert_relative_eq!(probe.ground.b, 0.0);
    }

    #[test]
    fn horizon_rows_outweigh_the_poles() {
        // Top row (near the zenith) is bright, the row at the horizon is dark.
        let pixels = vec![[10.0, 10.0, 10.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]];
        let probe = probe_from_equirect(1, 4, &pixels).unwrap();
        assert!(probe.sky.r < 5.0);
    }

    #[test]
    fn non_finite_texels_are_ignored() {
        let pixels = vec![[f32::NAN, 0.0, 0.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0]];
        let probe = probe_from_equirect(2, 2, &pixels).unwrap();
        assert_relative_eq!(probe.sky.r, 1.0);
    }

    #[test]
    fn wrong_pixel_count_is_rejected() {
        assert!(probe_from_equirect(2, 2, &[[0.0; 3]; 3]).is_err());
    }
}
