//! Textual key and mouse descriptors.
//!
//! Descriptors are `+`-joined tokens: any number of modifiers (`Ctrl`, `Alt`,
//! `Meta`, `Shift`, case-insensitive) followed by exactly one key or mouse
//! button name. A single character stands for itself, `Space` is the space
//! character and a trailing `+` token is the plus key (`Alt++`).

use crate::config::CodecConfig;
use crate::error::{Error, Result};
use crate::key::{KeyCode, KeyEvent, Modifiers, MouseButton};

const LABEL_CTRL: &str = "Ctrl";
const LABEL_ALT: &str = "Alt";
const LABEL_META: &str = "Meta";
const LABEL_SHIFT: &str = "Shift";

const MODIFIER_LABELS: [(Modifiers, &str); 4] = [
    (Modifiers::CTRL, LABEL_CTRL),
    (Modifiers::ALT, LABEL_ALT),
    (Modifiers::META, LABEL_META),
    (Modifiers::SHIFT, LABEL_SHIFT),
];

const MAX_FUNCTION_KEY: u8 = 64;

// Canonical name first; aliases follow and are only accepted when parsing.
const KEY_NAMES: &[(KeyCode, &[&str])] = &[
    (KeyCode::Enter, &["Enter"]),
    (KeyCode::Backspace, &["Backspace", "Backspace2"]),
    (KeyCode::Tab, &["Tab"]),
    (KeyCode::Backtab, &["Backtab"]),
    (KeyCode::Esc, &["Escape", "Esc"]),
    (KeyCode::Delete, &["Delete"]),
    (KeyCode::Insert, &["Insert"]),
    (KeyCode::Up, &["Up"]),
    (KeyCode::Down, &["Down"]),
    (KeyCode::Left, &["Left"]),
    (KeyCode::Right, &["Right"]),
    (KeyCode::UpLeft, &["UpLeft"]),
    (KeyCode::UpRight, &["UpRight"]),
    (KeyCode::DownLeft, &["DownLeft"]),
    (KeyCode::DownRight, &["DownRight"]),
    (KeyCode::Center, &["Center"]),
    (KeyCode::Home, &["Home"]),
    (KeyCode::End, &["End"]),
    (KeyCode::PageUp, &["PageUp", "PgUp"]),
    (KeyCode::PageDown, &["PageDown", "PgDn"]),
    (KeyCode::Clear, &["Clear"]),
    (KeyCode::Exit, &["Exit"]),
    (KeyCode::Cancel, &["Cancel"]),
    (KeyCode::Pause, &["Pause"]),
    (KeyCode::Print, &["Print"]),
];

const MOUSE_NAMES: &[(MouseButton, &str)] = &[
    (MouseButton::Left, "MouseLeft"),
    (MouseButton::Right, "MouseRight"),
    (MouseButton::Middle, "MouseMiddle"),
    (MouseButton::ThumbNext, "MouseThumbNext"),
    (MouseButton::ThumbPrev, "MouseThumbPrev"),
    (MouseButton::Button6, "MouseButton6"),
    (MouseButton::Button7, "MouseButton7"),
    (MouseButton::Button8, "MouseButton8"),
    (MouseButton::WheelUp, "MouseWheelUp"),
    (MouseButton::WheelDown, "MouseWheelDown"),
    (MouseButton::WheelLeft, "MouseWheelLeft"),
    (MouseButton::WheelRight, "MouseWheelRight"),
    (MouseButton::None, "MouseNone"),
];

fn modifier(piece: &str) -> Option<Modifiers> {
    MODIFIER_LABELS
        .iter()
        .find(|(_, label)| piece.eq_ignore_ascii_case(label))
        .map(|(m, _)| *m)
}

fn named_key(piece: &str) -> Option<KeyCode> {
    if piece.eq_ignore_ascii_case("space") || piece.eq_ignore_ascii_case("spacebar") {
        return Some(KeyCode::Char(' '));
    }
    for (code, names) in KEY_NAMES {
        if names.iter().any(|n| piece.eq_ignore_ascii_case(n)) {
            return Some(*code);
        }
    }
    let digits = piece.strip_prefix(['f', 'F'])?;
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match digits.parse::<u8>() {
        Ok(n) if (1..=MAX_FUNCTION_KEY).contains(&n) => Some(KeyCode::F(n)),
        _ => None,
    }
}

fn single_char(piece: &str) -> Option<char> {
    let mut chars = piece.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Decodes a key descriptor such as `"Ctrl+Alt+x"`, `"PageDown"` or `"Alt++"`.
pub fn parse_key(text: &str, config: &CodecConfig) -> Result<KeyEvent> {
    if text.is_empty() {
        return Err(Error::invalid_key(text));
    }

    let mut mods = Modifiers::empty();
    let mut code = None;
    let mut rest = text;

    if text == "+" {
        return Ok(KeyEvent::char('+'));
    }
    if let Some(head) = text.strip_suffix("++") {
        if head.is_empty() {
            return Err(Error::invalid_key(text));
        }
        code = Some(KeyCode::Char('+'));
        rest = head;
    } else if text.ends_with('+') {
        return Err(Error::invalid_key(text));
    }

    for piece in rest.split('+') {
        if let Some(m) = modifier(piece) {
            mods |= m;
            continue;
        }
        if code.is_some() {
            return Err(Error::invalid_key(text));
        }
        let key = named_key(piece)
            .or_else(|| single_char(piece).map(KeyCode::Char))
            .ok_or_else(|| Error::invalid_key(text))?;
        code = Some(key);
    }

    let mut code = code.ok_or_else(|| Error::invalid_key(text))?;
    if mods.contains(Modifiers::CTRL) {
        if let KeyCode::Char(c) = code {
            code = KeyCode::Char(c.to_ascii_lowercase());
        }
        if config.unify_enter_keys && code == KeyCode::Char('j') {
            code = KeyCode::Enter;
            mods.remove(Modifiers::CTRL);
        }
    }
    Ok(KeyEvent { code, mods })
}

fn write_modifiers(out: &mut String, mods: Modifiers) {
    for (m, label) in MODIFIER_LABELS {
        if mods.contains(m) {
            out.push_str(label);
            out.push('+');
        }
    }
}

/// Encodes a key event in the canonical descriptor syntax.
pub fn format_key(ev: &KeyEvent, config: &CodecConfig) -> Result<String> {
    let mut mods = ev.mods;
    let mut code = ev.code;
    if config.unify_enter_keys && mods.contains(Modifiers::CTRL) && code == KeyCode::Char('j') {
        mods.remove(Modifiers::CTRL);
        code = KeyCode::Enter;
    }

    let mut out = String::new();
    write_modifiers(&mut out, mods);
    match code {
        KeyCode::Char(' ') => out.push_str("Space"),
        KeyCode::Char(c) if mods.contains(Modifiers::CTRL) && c.is_ascii_lowercase() => {
            out.push(c.to_ascii_uppercase())
        }
        KeyCode::Char(c) => out.push(c),
        KeyCode::F(n) if (1..=MAX_FUNCTION_KEY).contains(&n) => {
            out.push('F');
            out.push_str(&n.to_string());
        }
        KeyCode::F(n) => return Err(Error::invalid_key(&format!("F{n}"))),
        named => {
            let (_, names) = KEY_NAMES
                .iter()
                .find(|(c, _)| *c == named)
                .ok_or_else(|| Error::invalid_key(&format!("{named:?}")))?;
            out.push_str(names[0]);
        }
    }
    Ok(out)
}

/// Decodes a mouse descriptor such as `"Ctrl+MouseLeft"`.
pub fn parse_mouse(text: &str) -> Result<(Modifiers, MouseButton)> {
    let mut mods = Modifiers::empty();
    let mut pieces = text.split('+').peekable();
    while let Some(piece) = pieces.next() {
        if let Some(m) = modifier(piece) {
            mods |= m;
            continue;
        }
        let button = MOUSE_NAMES
            .iter()
            .find(|(_, name)| piece.eq_ignore_ascii_case(name))
            .map(|(b, _)| *b);
        return match button {
            Some(b) if pieces.peek().is_none() => Ok((mods, b)),
            _ => Err(Error::invalid_key(text)),
        };
    }
    Err(Error::invalid_key(text))
}

/// Encodes a mouse button with modifiers.
pub fn format_mouse(mods: Modifiers, button: MouseButton) -> String {
    let mut out = String::new();
    write_modifiers(&mut out, mods);
    let name = MOUSE_NAMES
        .iter()
        .find(|(b, _)| *b == button)
        .map_or("MouseNone", |(_, name)| *name);
    out.push_str(name);
    out
}
