//! Asset loading: the character model, the environment light probe, and the
//! water displacement map.
//!
//! Loads run on a worker thread (`AssetRequest`) and are drained by the scene
//! composer once per frame.

mod fs;
mod heightmap;
mod model;
mod probe;
mod request;

use std::fmt;
use std::path::{Path, PathBuf};

use axolotl_engine::scene::LightProbe;

use crate::animation::CharacterAsset;

pub use self::fs::FsAssetLoader;
pub use self::heightmap::HeightMap;
pub use self::model::load_character;
pub use self::probe::{load_light_probe, probe_from_equirect};
pub use self::request::{AssetEvent, AssetRequest};

/// Source of the three scene assets. Paths are relative to the loader's root.
pub trait AssetLoader: Send + Sync {
    fn load_character(&self, path: &Path) -> Result<CharacterAsset, AssetError>;
    fn load_light_probe(&self, path: &Path) -> Result<LightProbe, AssetError>;
    fn load_displacement(&self, path: &Path) -> Result<HeightMap, AssetError>;
}

#[derive(Debug)]
pub enum AssetError {
    Io { path: PathBuf, source: std::io::Error },
    Gltf(::gltf::Error),
    Image(image::ImageError),
    /// The file decoded but its contents are unusable.
    Format(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io { path, source } => write!(f, "failed to read {}: {source}", path.display()),
            AssetError::Gltf(e) => write!(f, "gltf: {e}"),
            AssetError::Image(e) => write!(f, "image: {e}"),
            AssetError::Format(msg) => write!(f, "unusable asset: {msg}"),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io { source, .. } => Some(source),
            AssetError::Gltf(e) => Some(e),
            AssetError::Image(e) => Some(e),
            AssetError::Format(_) => None,
        }
    }
}

impl From<::gltf::Error> for AssetError {
    fn from(e: ::gltf::Error) -> Self {
        AssetError::Gltf(e)
    }
}

impl From<image::ImageError> for AssetError {
    fn from(e: image::ImageError) -> Self {
        AssetError::Image(e)
    }
}
