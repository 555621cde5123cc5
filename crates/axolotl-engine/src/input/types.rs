/// Keys the drift scene reacts to. Escape quits; everything else is carried
/// as its platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Other(u32),
}

/// Buttons the orbit controls read.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Other(u16),
}

/// Press or release, shared by keys and mouse buttons.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Held modifiers. Shift turns a left drag into a pan.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
}

/// Pointer position in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f32,
    pub y: f32,
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),
    Key { key: Key, state: ButtonState },
    PointerMoved(PointerMoveEvent),
    PointerButton { button: MouseButton, state: ButtonState },
    /// Vertical wheel motion in lines; touchpad pixels are converted upstream.
    Wheel { lines: f32 },
    PointerLeft,
    /// Losing focus releases every held button, so a drag cannot stick.
    Focused(bool),
}
