use std::path::{Path, PathBuf};

use axolotl_engine::scene::LightProbe;

use crate::animation::CharacterAsset;

use super::{load_character, load_light_probe, AssetError, AssetLoader, HeightMap};

/// Reads assets from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsAssetLoader {
    root: PathBuf,
}

impl FsAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf, AssetError> {
        let full = self.root.join(path);
        match std::fs::metadata(&full) {
            Ok(meta) if meta.is_file() => Ok(full),
            Ok(_) => Err(AssetError::Format(format!("{} is not a file", full.display()))),
            Err(source) => Err(AssetError::Io { path: full, source }),
        }
    }
}

impl AssetLoader for FsAssetLoader {
    fn load_character(&self, path: &Path) -> Result<CharacterAsset, AssetError> {
        load_character(&self.resolve(path)?)
    }

    fn load_light_probe(&self, path: &Path) -> Result<LightProbe, AssetError> {
        load_light_probe(&self.resolve(path)?)
    }

    fn load_displacement(&self, path: &Path) -> Result<HeightMap, AssetError> {
        HeightMap::load(&self.resolve(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_report_io_errors_with_the_full_path() {
        let loader = FsAssetLoader::new("definitely/not/here");
        let err = loader.load_light_probe(Path::new("env.exr")).unwrap_err();
        match err {
            AssetError::Io { path, .. } => assert!(path.ends_with("env.exr")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(loader.load_character(Path::new("m.glb")).is_err());
        assert!(loader.load_displacement(Path::new("n.jpg")).is_err());
    }
}
