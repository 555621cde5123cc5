//! Input subsystem.
//!
//! Public API does not expose winit types; `platform::winit` translates window
//! events into `InputEvent`s.

mod frame;
mod state;
mod types;

pub(crate) mod platform;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, Modifiers, MouseButton, PointerMoveEvent};
