//! Conversion from crossterm terminal events.

use crossterm::event as ct;

use crate::error::Error;
use crate::key::{InputEvent, KeyCode, KeyEvent, Modifiers, MouseButton, MouseEvent};

fn modifiers(mods: ct::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    if mods.contains(ct::KeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if mods.contains(ct::KeyModifiers::CONTROL) {
        out |= Modifiers::CTRL;
    }
    if mods.contains(ct::KeyModifiers::ALT) {
        out |= Modifiers::ALT;
    }
    if mods.intersects(ct::KeyModifiers::META | ct::KeyModifiers::SUPER) {
        out |= Modifiers::META;
    }
    out
}

fn key_code(code: ct::KeyCode) -> Option<KeyCode> {
    let code = match code {
        ct::KeyCode::Char(c) => KeyCode::Char(c),
        ct::KeyCode::Enter => KeyCode::Enter,
        ct::KeyCode::Backspace => KeyCode::Backspace,
        ct::KeyCode::Tab => KeyCode::Tab,
        ct::KeyCode::BackTab => KeyCode::Backtab,
        ct::KeyCode::Esc => KeyCode::Esc,
        ct::KeyCode::Delete => KeyCode::Delete,
        ct::KeyCode::Insert => KeyCode::Insert,
        ct::KeyCode::Up => KeyCode::Up,
        ct::KeyCode::Down => KeyCode::Down,
        ct::KeyCode::Left => KeyCode::Left,
        ct::KeyCode::Right => KeyCode::Right,
        ct::KeyCode::Home => KeyCode::Home,
        ct::KeyCode::End => KeyCode::End,
        ct::KeyCode::PageUp => KeyCode::PageUp,
        ct::KeyCode::PageDown => KeyCode::PageDown,
        ct::KeyCode::KeypadBegin => KeyCode::Center,
        ct::KeyCode::Pause => KeyCode::Pause,
        ct::KeyCode::PrintScreen => KeyCode::Print,
        ct::KeyCode::F(n) => KeyCode::F(n),
        _ => return None,
    };
    Some(code)
}

fn mouse_button(button: ct::MouseButton) -> MouseButton {
    match button {
        ct::MouseButton::Left => MouseButton::Left,
        ct::MouseButton::Right => MouseButton::Right,
        ct::MouseButton::Middle => MouseButton::Middle,
    }
}

impl TryFrom<ct::KeyEvent> for KeyEvent {
    type Error = Error;

    fn try_from(ev: ct::KeyEvent) -> Result<Self, Error> {
        if ev.kind == ct::KeyEventKind::Release {
            return Err(Error::UnsupportedEvent(format!("{ev:?}")));
        }
        let code = key_code(ev.code).ok_or_else(|| Error::UnsupportedEvent(format!("{:?}", ev.code)))?;
        let mut mods = modifiers(ev.modifiers);
        // Shift is implied by the key itself: typed runes arrive already
        // shifted and Backtab is Shift+Tab.
        if matches!(code, KeyCode::Char(_) | KeyCode::Backtab) {
            mods -= Modifiers::SHIFT;
        }
        Ok(KeyEvent::new(code, mods))
    }
}

impl From<ct::MouseEvent> for MouseEvent {
    fn from(ev: ct::MouseEvent) -> Self {
        let button = match ev.kind {
            ct::MouseEventKind::Down(b) | ct::MouseEventKind::Drag(b) => mouse_button(b),
            ct::MouseEventKind::Up(_) | ct::MouseEventKind::Moved => MouseButton::None,
            ct::MouseEventKind::ScrollUp => MouseButton::WheelUp,
            ct::MouseEventKind::ScrollDown => MouseButton::WheelDown,
            ct::MouseEventKind::ScrollLeft => MouseButton::WheelLeft,
            ct::MouseEventKind::ScrollRight => MouseButton::WheelRight,
        };
        MouseEvent {
            button,
            mods: modifiers(ev.modifiers),
            column: ev.column,
            row: ev.row,
        }
    }
}

impl TryFrom<ct::Event> for InputEvent {
    type Error = Error;

    fn try_from(ev: ct::Event) -> Result<Self, Error> {
        match ev {
            ct::Event::Key(key) => KeyEvent::try_from(key).map(InputEvent::Key),
            ct::Event::Mouse(mouse) => Ok(InputEvent::Mouse(mouse.into())),
            ct::Event::Paste(text) => Ok(InputEvent::Paste(text)),
            ct::Event::Resize(width, height) => Ok(InputEvent::Resize { width, height }),
            other => Err(Error::UnsupportedEvent(format!("{other:?}"))),
        }
    }
}
