//! Typed demo configuration. Every value has a default; only the asset root
//! is read from the environment.

use std::path::PathBuf;

use glam::Vec3;

use axolotl_engine::scene::{Color, ShadowConfig};

/// Environment variable overriding [`AssetPaths::root`].
pub const ASSET_DIR_ENV: &str = "AXOLOTL_ASSET_DIR";

#[derive(Debug, Clone, Default)]
pub struct DemoConfig {
    pub assets: AssetPaths,
    pub environment: EnvironmentConfig,
    pub terrain: TerrainConfig,
    pub water: WaterConfig,
    pub particles: ParticleConfig,
    pub lighting: LightingConfig,
    pub character: CharacterConfig,
    pub camera: CameraConfig,
    pub post: PostConfig,
    pub glitch: GlitchConfig,
}

impl DemoConfig {
    /// Defaults, with the asset root taken from `AXOLOTL_ASSET_DIR` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(root) = std::env::var_os(ASSET_DIR_ENV).filter(|v| !v.is_empty()) {
            config.assets.root = PathBuf::from(root);
        }
        config
    }
}

/// Asset locations; the three file paths are relative to `root`.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub root: PathBuf,
    pub character: PathBuf,
    pub light_probe: PathBuf,
    pub displacement: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            character: PathBuf::from("models/axolotl.glb"),
            light_probe: PathBuf::from("textures/environment.exr"),
            displacement: PathBuf::from("textures/noise.jpg"),
        }
    }
}

/// Which distance fog the scene uses.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FogMode {
    Linear { near: f32, far: f32 },
    Exponential { density: f32 },
}

#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub background: Color,
    pub fog_color: Color,
    pub fog: FogMode,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        let deep_water = Color::from_hex(0x0b3d4f);
        Self {
            background: deep_water,
            fog_color: deep_water,
            fog: FogMode::Exponential { density: 0.06 },
        }
    }
}

#[derive(Debug, Clone)]
pub struct TerrainConfig {
    pub width: f32,
    pub depth: f32,
    pub segments: u32,
    /// Noise coordinate scale.
    pub frequency: f32,
    /// Height scale applied to the noise sample.
    pub amplitude: f32,
    pub elevation: f32,
    pub color: Color,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 20.0,
            depth: 20.0,
            segments: 128,
            frequency: 0.2,
            amplitude: 0.3,
            elevation: -2.5,
            color: Color::from_hex(0xc2a878),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WaterConfig {
    pub width: f32,
    pub depth: f32,
    pub segments: u32,
    /// Displacement along the plane normal for a full-white map texel.
    pub displacement_scale: f32,
    pub elevation: f32,
    pub color: Color,
    pub opacity: f32,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            width: 20.0,
            depth: 20.0,
            segments: 48,
            displacement_scale: 0.3,
            elevation: 2.0,
            color: Color::from_hex(0x4fb3c8),
            opacity: 0.35,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParticleConfig {
    pub count: usize,
    pub min: Vec3,
    pub max: Vec3,
    pub base_color: Color,
    /// Per-channel color jitter, uniform in `[-jitter, jitter]`.
    pub color_jitter: f32,
    pub size: f32,
    pub opacity: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            min: Vec3::new(-10.0, -1.0, -10.0),
            max: Vec3::new(10.0, 3.0, 10.0),
            base_color: Color::from_hex(0x9fd8e8),
            color_jitter: 0.1,
            size: 0.04,
            opacity: 0.8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LightingConfig {
    pub ambient_color: Color,
    pub ambient_intensity: f32,
    pub sun_color: Color,
    pub sun_intensity: f32,
    pub sun_position: Vec3,
    pub shadow: ShadowConfig,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: Color::WHITE,
            ambient_intensity: 0.3,
            sun_color: Color::from_hex(0xfff1dc),
            sun_intensity: 1.4,
            sun_position: Vec3::new(5.0, 10.0, 5.0),
            shadow: ShadowConfig {
                map_size: 2048,
                near: 0.5,
                far: 30.0,
                left: -10.0,
                right: 10.0,
                top: 10.0,
                bottom: -10.0,
                bias: 0.0005,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct CharacterConfig {
    /// Clip played on load; out-of-range falls back to clip 0.
    pub clip_index: usize,
    pub position: Vec3,
    pub scale: f32,
    pub env_intensity: f32,
    /// Placeholder sphere radius used when the model fails to load.
    pub placeholder_radius: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            clip_index: 0,
            position: Vec3::ZERO,
            scale: 1.0,
            env_intensity: 1.0,
            placeholder_radius: 0.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    /// Render targets never exceed this device pixel ratio.
    pub max_pixel_ratio: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y: 45.0,
            near: 0.1,
            far: 100.0,
            position: Vec3::new(0.0, 1.0, 5.0),
            target: Vec3::ZERO,
            max_pixel_ratio: 2.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostConfig {
    pub bloom_intensity: f32,
    pub bloom_threshold: f32,
    pub bloom_smoothing: f32,
    pub rays_source_radius: f32,
    pub rays_color: Color,
    pub rays_density: f32,
    pub rays_decay: f32,
    pub rays_weight: f32,
    pub rays_exposure: f32,
    pub rays_samples: u32,
    pub rays_clamp_max: f32,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            bloom_intensity: 25.0,
            bloom_threshold: 0.4,
            bloom_smoothing: 0.3,
            rays_source_radius: 1.0,
            rays_color: Color::from_hex(0xffddaa),
            rays_density: 0.96,
            rays_decay: 0.93,
            rays_weight: 0.4,
            rays_exposure: 0.6,
            rays_samples: 60,
            rays_clamp_max: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GlitchConfig {
    /// Visible distortion; zero keeps only the timer.
    pub strength: f32,
    pub delay: (f32, f32),
    pub duration: (f32, f32),
    /// Probability of a random camera position on reset.
    pub random_probability: f64,
    pub random_min: Vec3,
    pub random_max: Vec3,
    pub viewpoints: [Vec3; 2],
}

impl Default for GlitchConfig {
    fn default() -> Self {
        Self {
            strength: 0.0,
            delay: (1.5, 3.5),
            duration: (0.6, 1.0),
            random_probability: 0.8,
            random_min: Vec3::new(-4.0, -2.0, -4.0),
            random_max: Vec3::new(4.0, 1.0, 4.0),
            viewpoints: [Vec3::new(0.0, -1.5, 2.5), Vec3::new(3.0, 0.5, 0.0)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_bundled_assets() {
        let paths = AssetPaths::default();
        assert_eq!(paths.root, PathBuf::from("assets"));
        assert!(paths.character.ends_with("axolotl.glb"));
        assert!(paths.light_probe.extension().is_some_and(|e| e == "exr"));
        assert!(paths.displacement.extension().is_some_and(|e| e == "jpg"));
    }

    #[test]
    fn glitch_reset_bounds_are_ordered() {
        let g = GlitchConfig::default();
        assert!(g.random_min.cmple(g.random_max).all());
        assert!(g.delay.0 <= g.delay.1 && g.duration.0 <= g.duration.1);
    }
}
