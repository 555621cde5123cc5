//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers, targets) and create
//! them lazily on first use, so construction needs no device.
//!
//! Convention:
//! - scene rendering happens in linear HDR (`HDR_FORMAT`) offscreen targets
//! - only the output pass and the overlay write to the surface

mod common;
mod ctx;
mod overlay;
pub mod post;
mod scene_renderer;
mod targets;

pub use common::{DEPTH_FORMAT, HDR_FORMAT};
pub use ctx::{RenderCtx, RenderTarget};
pub use overlay::{OverlayRect, OverlayRenderer};
pub use scene_renderer::SceneRenderer;
pub use targets::RenderTexture;
