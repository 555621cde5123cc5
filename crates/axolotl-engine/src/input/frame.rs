use std::collections::HashSet;

use super::types::{InputEvent, Key};

/// Per-frame input deltas, cleared by the runtime after each frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,
    pub keys_pressed: HashSet<Key>,

    /// Sum of pointer motion this frame, in logical pixels.
    pub pointer_delta: (f32, f32),
    wheel: f32,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.pointer_delta = (0.0, 0.0);
        self.wheel = 0.0;
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        if let InputEvent::Wheel { lines } = ev {
            self.wheel += lines;
        }
        self.events.push(ev);
    }

    /// Accumulated vertical wheel motion this frame, in lines.
    pub fn wheel_lines(&self) -> f32 {
        self.wheel
    }
}
