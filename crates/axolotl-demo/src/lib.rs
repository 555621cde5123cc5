//! Axolotl drift scene.
//!
//! Demo layer over `axolotl-engine`: procedural sand and water, a drifting
//! particle cloud, an asynchronously loaded skinned character, and the
//! render → glitch → bloom → god-rays effect chain.

pub mod animation;
pub mod app;
pub mod assets;
pub mod composer;
pub mod config;
pub mod controls;
pub mod driver;
pub mod geometry;
pub mod glitch;
pub mod noise;
pub mod post;
pub mod stats;

use std::sync::Arc;

use anyhow::Result;

use axolotl_engine::device::GpuInit;
use axolotl_engine::logging::{init_logging, LoggingConfig};
use axolotl_engine::window::{Runtime, RuntimeConfig};

use crate::app::DemoApp;
use crate::assets::FsAssetLoader;
use crate::config::DemoConfig;

/// Opens the window and runs the scene until it closes.
pub fn run() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = DemoConfig::from_env();
    log::info!("asset root: {}", config.assets.root.display());

    let loader = Arc::new(FsAssetLoader::new(config.assets.root.clone()));
    let app = DemoApp::new(config, loader);

    Runtime::run(RuntimeConfig::default(), GpuInit::default(), app)
}
