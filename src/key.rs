/// Key codes representing individual keys on the keyboard.
///
/// This enum provides a platform-agnostic representation of keys.
/// Hosts should map their platform-specific key events to these codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key. Control combinations are reported as the lowercase
    /// letter plus [`Modifiers::CTRL`], e.g. Ctrl+C is `Char('c')`.
    Char(char),
    Enter,
    Backspace,
    Tab,
    Backtab,
    Esc,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    Center,
    Home,
    End,
    PageUp,
    PageDown,
    Clear,
    Exit,
    Cancel,
    Pause,
    Print,
    /// Function key `F1` through `F64`.
    F(u8),
}

bitflags::bitflags! {
    /// Keyboard modifier flags.
    ///
    /// These can be combined to represent multiple modifiers held simultaneously.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// A key press event with optional modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,
    /// Modifier keys held during the key press.
    pub mods: Modifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: Modifiers) -> Self {
        Self { code, mods }
    }

    /// An unmodified character key.
    pub fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::empty())
    }
}

/// Mouse buttons and wheel directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    ThumbNext,
    ThumbPrev,
    Button6,
    Button7,
    Button8,
    WheelUp,
    WheelDown,
    WheelLeft,
    WheelRight,
    /// Motion or release with no button held.
    None,
}

/// A mouse action at a screen cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub button: MouseButton,
    pub mods: Modifiers,
    /// Zero-based screen column.
    pub column: u16,
    /// Zero-based screen row.
    pub row: u16,
}

/// Raw input events fed to the matching [`Vm`](crate::Vm).
///
/// Each one is a single occurrence coming from the host's event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key press.
    Key(KeyEvent),
    /// A mouse button, wheel or motion event.
    Mouse(MouseEvent),
    /// A bracketed paste.
    Paste(String),
    /// The terminal was resized to the given dimensions.
    Resize { width: u16, height: u16 },
}

impl InputEvent {
    /// An unmodified character key press.
    pub fn char(c: char) -> Self {
        InputEvent::Key(KeyEvent::char(c))
    }

    /// A key press with modifiers.
    pub fn key(code: KeyCode, mods: Modifiers) -> Self {
        InputEvent::Key(KeyEvent::new(code, mods))
    }
}

impl From<KeyEvent> for InputEvent {
    fn from(ev: KeyEvent) -> Self {
        InputEvent::Key(ev)
    }
}

impl From<MouseEvent> for InputEvent {
    fn from(ev: MouseEvent) -> Self {
        InputEvent::Mouse(ev)
    }
}
