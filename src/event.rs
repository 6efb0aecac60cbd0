//! Matchers for single input events.
//!
//! An [`Event`] is a blueprint for a raw [`InputEvent`]: given one it decides
//! whether it matches and, if so, hands back the payload worth capturing.

use std::fmt;

use crate::codec;
use crate::config::CodecConfig;
use crate::error::Result;
use crate::key::{InputEvent, KeyCode, KeyEvent, Modifiers, MouseButton};

/// A set of runes described by inclusive ranges, optionally negated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuneSet {
    ranges: Vec<(char, char)>,
    negated: bool,
}

impl RuneSet {
    pub fn new(ranges: &[(char, char)], negated: bool) -> Self {
        Self {
            ranges: ranges.to_vec(),
            negated,
        }
    }

    pub fn range(low: char, high: char) -> Self {
        Self::new(&[(low, high)], false)
    }

    pub fn single(c: char) -> Self {
        Self::range(c, c)
    }

    /// Adds the runes of `other` to this set. Both sets must be non-negated.
    pub fn union(mut self, other: &RuneSet) -> Self {
        debug_assert!(
            !self.negated && !other.negated,
            "union of a negated rune set"
        );
        self.ranges.extend_from_slice(&other.ranges);
        self
    }

    pub fn complement(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    pub fn contains(&self, c: char) -> bool {
        let in_set = self.ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi);
        in_set != self.negated
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

impl fmt::Display for RuneSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if self.negated {
            f.write_str("^")?;
        }
        for &(lo, hi) in &self.ranges {
            if lo == hi {
                write!(f, "{}", lo.escape_debug())?;
            } else {
                write!(f, "{}-{}", lo.escape_debug(), hi.escape_debug())?;
            }
        }
        f.write_str("]")
    }
}

/// The payload captured from a matched input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Nothing worth keeping, e.g. a capture spanning zero events.
    Empty,
    Rune(char),
    Text(String),
    Key(KeyEvent),
    Mouse {
        button: MouseButton,
        column: u16,
        row: u16,
    },
    Size {
        width: u16,
        height: u16,
    },
}

impl Value {
    /// Appends the textual form of the payload. Only runes and pasted text
    /// contribute; everything else is empty.
    pub fn write_text(&self, out: &mut String) {
        match self {
            Value::Rune(c) => out.push(*c),
            Value::Text(s) => out.push_str(s),
            _ => {}
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }
}

/// A matcher for one raw input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// An exact key and modifier combination.
    Key { key: KeyEvent, unify_enter: bool },
    /// An exact mouse button and modifier combination.
    Mouse {
        button: MouseButton,
        mods: Modifiers,
    },
    /// Any typed rune within the inclusive range.
    RuneRange { low: char, high: char },
    /// Any typed rune in the set.
    RuneSet(RuneSet),
    /// Any paste.
    Paste,
    /// Any resize.
    Resize,
}

impl Event {
    pub fn key(key: KeyEvent) -> Self {
        Event::Key {
            key,
            unify_enter: false,
        }
    }

    /// A key matcher honouring the codec's Enter unification.
    pub fn key_with(key: KeyEvent, config: &CodecConfig) -> Self {
        Event::Key {
            key,
            unify_enter: config.unify_enter_keys,
        }
    }

    pub fn any_rune() -> Self {
        Event::RuneRange {
            low: '\0',
            high: char::MAX,
        }
    }

    /// Builds a matcher from its textual name: `paste`, `resize`, `any`, a
    /// mouse descriptor or a key descriptor, tried in that order.
    pub fn parse(text: &str, config: &CodecConfig) -> Result<Self> {
        match text.to_lowercase().as_str() {
            "paste" => return Ok(Event::Paste),
            "resize" => return Ok(Event::Resize),
            "any" => return Ok(Event::any_rune()),
            _ => {}
        }
        if let Ok((mods, button)) = codec::parse_mouse(text) {
            return Ok(Event::Mouse { button, mods });
        }
        let key = codec::parse_key(text, config)?;
        Ok(Event::key_with(key, config))
    }

    /// Tests `raw` against this matcher, returning the captured payload on
    /// success.
    pub fn matches(&self, raw: &InputEvent) -> Option<Value> {
        match (self, raw) {
            (Event::Key { key, unify_enter }, InputEvent::Key(ev)) => {
                let unified = *unify_enter
                    && key.code == KeyCode::Enter
                    && ev.code == KeyCode::Char('j')
                    && ev.mods == key.mods | Modifiers::CTRL;
                if ev == key || unified {
                    Some(key_payload(ev))
                } else {
                    None
                }
            }
            (Event::Mouse { button, mods }, InputEvent::Mouse(ev)) => {
                if ev.button == *button && ev.mods == *mods {
                    Some(Value::Mouse {
                        button: ev.button,
                        column: ev.column,
                        row: ev.row,
                    })
                } else {
                    None
                }
            }
            (Event::RuneRange { low, high }, InputEvent::Key(ev)) => {
                wildcard_rune(ev).filter(|c| low <= c && c <= high).map(Value::Rune)
            }
            (Event::RuneSet(set), InputEvent::Key(ev)) => {
                wildcard_rune(ev).filter(|&c| set.contains(c)).map(Value::Rune)
            }
            (Event::Paste, InputEvent::Paste(text)) => Some(Value::Text(text.clone())),
            (Event::Resize, InputEvent::Resize { width, height }) => Some(Value::Size {
                width: *width,
                height: *height,
            }),
            _ => None,
        }
    }
}

fn key_payload(ev: &KeyEvent) -> Value {
    match typed_rune(ev) {
        Some(c) => Value::Rune(c),
        None => Value::Key(*ev),
    }
}

// Runes typed without a command modifier; Shift is part of typing.
fn typed_rune(ev: &KeyEvent) -> Option<char> {
    match ev.code {
        KeyCode::Char(c) if (ev.mods - Modifiers::SHIFT).is_empty() => Some(c),
        _ => None,
    }
}

// Wildcards take any rune key except control combinations.
fn wildcard_rune(ev: &KeyEvent) -> Option<char> {
    match ev.code {
        KeyCode::Char(c) if !ev.mods.contains(Modifiers::CTRL) => Some(c),
        _ => None,
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Key { key, unify_enter } => {
                let config = CodecConfig {
                    unify_enter_keys: *unify_enter,
                };
                match codec::format_key(key, &config) {
                    Ok(s) => f.write_str(&s),
                    Err(err) => write!(f, "{err}"),
                }
            }
            Event::Mouse { button, mods } => f.write_str(&codec::format_mouse(*mods, *button)),
            Event::RuneRange { low, high } if *low == '\0' && *high == char::MAX => {
                f.write_str("Any")
            }
            Event::RuneRange { low, high } => {
                write!(f, "Any [{}-{}]", low.escape_debug(), high.escape_debug())
            }
            Event::RuneSet(set) => write!(f, "Any {set}"),
            Event::Paste => f.write_str("Paste"),
            Event::Resize => f.write_str("Resize"),
        }
    }
}
