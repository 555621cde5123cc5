//! Axolotl engine crate.
//!
//! Platform + GPU runtime for the drift scene: window/event loop, input, frame
//! timing, a renderer-agnostic scene graph, effect-chain descriptions and the
//! wgpu renderers that consume them.

pub mod core;
pub mod device;
pub mod input;
pub mod time;
pub mod window;

pub mod coords;
pub mod effects;
pub mod logging;
pub mod render;
pub mod scene;
