use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

use crate::input::{ButtonState, InputEvent, Key, Modifiers, MouseButton, PointerMoveEvent};

/// Logical pixels per wheel line for touchpad scrolling.
const PIXELS_PER_LINE: f32 = 40.0;

/// Maps the window events the drift scene listens to; the rest yield `None`.
pub(crate) fn translate_window_event(window: &Window, event: &WindowEvent) -> Option<InputEvent> {
    let ev = match event {
        WindowEvent::ModifiersChanged(m) => InputEvent::ModifiersChanged(Modifiers {
            shift: m.state().shift_key(),
        }),
        WindowEvent::Focused(f) => InputEvent::Focused(*f),
        WindowEvent::CursorLeft { .. } => InputEvent::PointerLeft,
        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = logical(window, *position);
            InputEvent::PointerMoved(PointerMoveEvent { x, y })
        }
        WindowEvent::MouseInput { state, button, .. } => InputEvent::PointerButton {
            button: match button {
                WinitMouseButton::Left => MouseButton::Left,
                WinitMouseButton::Right => MouseButton::Right,
                WinitMouseButton::Middle => MouseButton::Other(2),
                WinitMouseButton::Back => MouseButton::Other(3),
                WinitMouseButton::Forward => MouseButton::Other(4),
                WinitMouseButton::Other(v) => MouseButton::Other(*v),
            },
            state: button_state(*state),
        },
        WindowEvent::MouseWheel { delta, .. } => InputEvent::Wheel {
            lines: match delta {
                MouseScrollDelta::LineDelta(_, y) => *y,
                MouseScrollDelta::PixelDelta(p) => logical(window, *p).1 / PIXELS_PER_LINE,
            },
        },
        WindowEvent::KeyboardInput { event, .. } => InputEvent::Key {
            key: match event.physical_key {
                PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
                PhysicalKey::Code(other) => Key::Other(other as u32),
                PhysicalKey::Unidentified(_) => Key::Other(0),
            },
            state: button_state(event.state),
        },
        _ => return None,
    };
    Some(ev)
}

fn button_state(state: ElementState) -> ButtonState {
    match state {
        ElementState::Pressed => ButtonState::Pressed,
        ElementState::Released => ButtonState::Released,
    }
}

fn logical(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let p = pos.to_logical::<f64>(window.scale_factor());
    (p.x as f32, p.y as f32)
}
