use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{ButtonState, InputEvent, Key, Modifiers, MouseButton, PointerMoveEvent};

/// What is held right now: keys, buttons, modifiers and the pointer.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    /// Pointer position in logical pixels; `None` once it leaves the window.
    pub pointer_pos: Option<(f32, f32)>,
    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Folds `ev` into the held state and records it in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::Focused(false) => {
                self.keys_down.clear();
                self.buttons_down.clear();
            }
            InputEvent::Focused(true) => {}

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                if let Some((px, py)) = self.pointer_pos {
                    frame.pointer_delta.0 += x - px;
                    frame.pointer_delta.1 += y - py;
                }
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state } => match state {
                ButtonState::Pressed => {
                    if self.keys_down.insert(*key) {
                        frame.keys_pressed.insert(*key);
                    }
                }
                ButtonState::Released => {
                    self.keys_down.remove(key);
                }
            },

            InputEvent::PointerButton { button, state } => match state {
                ButtonState::Pressed => {
                    self.buttons_down.insert(*button);
                }
                ButtonState::Released => {
                    self.buttons_down.remove(button);
                }
            },

            InputEvent::Wheel { .. } => {}
        }

        frame.push_event(ev);
    }
}
