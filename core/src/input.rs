//! Raw input fed to the tree by the host.

use crate::display::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u8),
}

/// Keys the widgets react to. Anything else arrives as `Other` with the host's code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Enter,
    KeypadEnter,
    Escape,
    Space,
    Tab,
    Backspace,
    Delete,
    /// Function key `F1`..`F12`.
    F(u8),
    /// A printable key, for shortcuts such as `Ctrl+A`.
    Char(char),
    Other(u32),
}

impl Key {
    #[inline]
    pub fn is_enter(self) -> bool {
        matches!(self, Key::Enter | Key::KeypadEnter)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { ctrl: false, shift: false, alt: false };
    pub const CTRL: Modifiers = Modifiers { ctrl: true, shift: false, alt: false };
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerMove { pos: Point },
    PointerDown { pos: Point, button: MouseButton },
    PointerUp { pos: Point, button: MouseButton },
    KeyDown { key: Key, modifiers: Modifiers },
    KeyUp { key: Key, modifiers: Modifiers },
    /// Committed text from the host's text input; may hold several characters.
    TextInput { text: String },
    /// Vertical wheel motion in lines, positive away from the user.
    Wheel { delta: f32 },
}

impl InputEvent {
    /// Pointer position carried by the event, if any.
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::PointerMove { pos }
            | InputEvent::PointerDown { pos, .. }
            | InputEvent::PointerUp { pos, .. } => Some(*pos),
            _ => None,
        }
    }

    #[inline]
    pub fn key_down(key: Key) -> Self {
        InputEvent::KeyDown { key, modifiers: Modifiers::NONE }
    }

    #[inline]
    pub fn left_down(x: f32, y: f32) -> Self {
        InputEvent::PointerDown { pos: Point::new(x, y), button: MouseButton::Left }
    }

    #[inline]
    pub fn left_up(x: f32, y: f32) -> Self {
        InputEvent::PointerUp { pos: Point::new(x, y), button: MouseButton::Left }
    }

    #[inline]
    pub fn pointer_move(x: f32, y: f32) -> Self {
        InputEvent::PointerMove { pos: Point::new(x, y) }
    }

    #[inline]
    pub fn text(text: impl Into<String>) -> Self {
        InputEvent::TextInput { text: text.into() }
    }
}
