//! Screen-space geometry for overlays and pointer handling.
//!
//! Canonical CPU space: logical pixels, origin top-left, +X right, +Y down.
//! World-space math uses `glam` directly.

mod rect;
mod viewport;

pub use rect::Rect;
pub use viewport::Viewport;
