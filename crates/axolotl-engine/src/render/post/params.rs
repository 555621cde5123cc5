use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::effects::{BloomEffect, GodRaysEffect};
use crate::scene::PerspectiveCamera;

/// Maps `BloomEffect::intensity` to the additive weight of the blurred
/// bright-pass. An intensity of 50 adds the bloom layer at full strength.
pub const BLOOM_INTENSITY_SCALE: f32 = 0.02;

/// Band count for the glitch row shift.
pub(super) const GLITCH_BANDS: f32 = 24.0;

/// Generic fullscreen-pass uniform; each shader documents its own packing.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub(super) struct PostParams {
    pub a: [f32; 4],
    pub b: [f32; 4],
    pub c: [f32; 4],
    pub texel: [f32; 4],
}

impl PostParams {
    pub fn texel_of((w, h): (u32, u32)) -> [f32; 4] {
        [1.0 / w.max(1) as f32, 1.0 / h.max(1) as f32, w as f32, h as f32]
    }

    pub fn glitch(strength: f32, seed: f32) -> Self {
        Self {
            a: [strength, seed, GLITCH_BANDS, 0.0],
            ..Self::default()
        }
    }

    pub fn bright_pass(bloom: &BloomEffect) -> Self {
        Self {
            a: [bloom.luminance_threshold, bloom.luminance_smoothing, 0.0, 0.0],
            ..Self::default()
        }
    }

    pub fn blur(direction: Vec2, size: (u32, u32)) -> Self {
        Self {
            a: [direction.x, direction.y, 0.0, 0.0],
            texel: Self::texel_of(size),
            ..Self::default()
        }
    }

    pub fn composite(scale: f32) -> Self {
        Self {
            a: [scale, 0.0, 0.0, 0.0],
            ..Self::default()
        }
    }

    pub fn rays_mask(sun: &SunScreen, rays: &GodRaysEffect, aspect: f32) -> Self {
        let c = rays.source_color;
        Self {
            a: [sun.uv.x, sun.uv.y, sun.radius_uv, aspect],
            b: [c.r, c.g, c.b, sun.depth],
            c: [1.0, 0.0, 0.0, 0.0],
            ..Self::default()
        }
    }

    pub fn rays_blur(sun: &SunScreen, rays: &GodRaysEffect) -> Self {
        Self {
            a: [sun.uv.x, sun.uv.y, rays.density, rays.weight],
            b: [rays.decay, rays.exposure, rays.samples.max(1) as f32, rays.clamp_max],
            ..Self::default()
        }
    }

    pub fn output(exposure: f32, encode_srgb: bool) -> Self {
        Self {
            a: [exposure, if encode_srgb { 1.0 } else { 0.0 }, 0.0, 0.0],
            ..Self::default()
        }
    }
}

/// Light source projected to screen space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(super) struct SunScreen {
    /// Top-left origin, `[0, 1]` inside the viewport.
    pub uv: Vec2,
    /// Disk radius as a fraction of the viewport width.
    pub radius_uv: f32,
    /// Depth of the source center in `[0, 1]`.
    pub depth: f32,
}

/// Projects the god-ray source; `None` when it is behind the camera.
pub(super) fn sun_screen(camera: &PerspectiveCamera, rays: &GodRaysEffect) -> Option<SunScreen> {
    let vp = camera.view_projection();
    let project = |p: Vec3| {
        let clip = vp * p.extend(1.0);
        (clip.w > 1e-5).then(|| clip.truncate() / clip.w)
    };

    let center = project(rays.source_position)?;
    let (right, _) = camera.basis();
    let edge = project(rays.source_position + right * rays.source_radius)?;

    Some(SunScreen {
        uv: Vec2::new(center.x * 0.5 + 0.5, 0.5 - center.y * 0.5),
        radius_uv: ((edge.x - center.x) * 0.5).abs(),
        depth: center.z.clamp(0.0, 1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Color;
    use approx::assert_relative_eq;

    fn rays_at(position: Vec3) -> GodRaysEffect {
        GodRaysEffect {
            source_position: position,
            source_radius: 1.0,
            source_color: Color::WHITE,
            density: 0.96,
            decay: 0.93,
            weight: 0.4,
            exposure: 0.6,
            samples: 60,
            clamp_max: 1.0,
        }
    }

    fn camera() -> PerspectiveCamera {
        let mut cam = PerspectiveCamera::new(45.0, 1.0, 0.1, 100.0);
        cam.position = Vec3::new(0.0, 0.0, 5.0);
        cam.look_at(Vec3::ZERO);
        cam
    }

    #[test]
    fn source_at_target_projects_to_center() {
        let sun = sun_screen(&camera(), &rays_at(Vec3::ZERO)).unwrap();
        assert_relative_eq!(sun.uv.x, 0.5, epsilon = 1e-5);
        assert_relative_eq!(sun.uv.y, 0.5, epsilon = 1e-5);
        assert!(sun.radius_uv > 0.0);
        assert!(sun.depth > 0.0 && sun.depth < 1.0);
    }

    #[test]
    fn source_above_target_is_in_upper_half() {
        let sun = sun_screen(&camera(), &rays_at(Vec3::new(0.0, 1.0, 0.0))).unwrap();
        assert!(sun.uv.y < 0.5);
    }

    #[test]
    fn source_behind_camera_is_culled() {
        assert!(sun_screen(&camera(), &rays_at(Vec3::new(0.0, 0.0, 20.0))).is_none());
    }

    #[test]
    fn bloom_scale_maps_peak_intensity_to_unity() {
        let p = PostParams::composite(50.0 * BLOOM_INTENSITY_SCALE);
        assert_relative_eq!(p.a[0], 1.0);
    }
}
