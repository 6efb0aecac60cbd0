//! The pattern algebra used to describe key binding grammars.

use crate::compile::Compiler;
use crate::config::CodecConfig;
use crate::error::Result;
use crate::event::{Event, RuneSet};
use crate::program::Program;

/// An immutable grammar fragment.
///
/// Build patterns with the constructors below and turn them into bytecode with
/// [`Pattern::compile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Match a single event.
    Literal(Event),
    Sequence(Box<Pattern>, Box<Pattern>),
    /// Ordered choice. Both sides are explored concurrently.
    Alternation(Box<Pattern>, Box<Pattern>),
    Star(Box<Pattern>),
    Plus(Box<Pattern>),
    Optional(Box<Pattern>),
    /// Turn the events matched by the inner pattern into a command using the
    /// `$`-template.
    Capture(Box<Pattern>, String),
    /// Succeed as soon as this point is reached.
    EndOfInput,
    /// A reference to a named rule of a [`Grammar`].
    NonTerminal(String),
}

impl Pattern {
    pub fn lit(ev: Event) -> Self {
        Pattern::Literal(ev)
    }

    /// A literal parsed from its textual descriptor, e.g. `"Ctrl+x"`, `"G"`,
    /// `"MouseLeft"` or `"paste"`.
    pub fn key(text: &str) -> Result<Self> {
        Self::key_with(text, &CodecConfig::default())
    }

    pub fn key_with(text: &str, config: &CodecConfig) -> Result<Self> {
        Event::parse(text, config).map(Pattern::Literal)
    }

    pub fn any_rune() -> Self {
        Pattern::Literal(Event::any_rune())
    }

    pub fn rune_range(low: char, high: char) -> Self {
        Pattern::Literal(Event::RuneRange { low, high })
    }

    pub fn rune_set(set: RuneSet) -> Self {
        Pattern::Literal(Event::RuneSet(set))
    }

    /// Left-folded sequence of the given patterns.
    pub fn seq<const N: usize>(items: [Pattern; N]) -> Self {
        const { assert!(N > 0, "a sequence needs at least one pattern") };
        Self::seq_all(items).unwrap_or(Pattern::EndOfInput)
    }

    /// Right-folded alternation of the given patterns.
    pub fn alt<const N: usize>(items: [Pattern; N]) -> Self {
        const { assert!(N > 0, "an alternation needs at least one pattern") };
        Self::alt_all(items).unwrap_or(Pattern::EndOfInput)
    }

    /// Like [`Pattern::seq`] for a runtime list; `None` when it is empty.
    pub fn seq_all(items: impl IntoIterator<Item = Pattern>) -> Option<Self> {
        items
            .into_iter()
            .reduce(|acc, p| Pattern::Sequence(Box::new(acc), Box::new(p)))
    }

    /// Like [`Pattern::alt`] for a runtime list; `None` when it is empty.
    pub fn alt_all(items: impl IntoIterator<Item = Pattern>) -> Option<Self> {
        let items: Vec<Pattern> = items.into_iter().collect();
        items
            .into_iter()
            .rev()
            .reduce(|acc, p| Pattern::Alternation(Box::new(p), Box::new(acc)))
    }

    pub fn then(self, next: Pattern) -> Self {
        Pattern::Sequence(Box::new(self), Box::new(next))
    }

    pub fn or(self, other: Pattern) -> Self {
        Pattern::Alternation(Box::new(self), Box::new(other))
    }

    pub fn star(self) -> Self {
        Pattern::Star(Box::new(self))
    }

    pub fn plus(self) -> Self {
        Pattern::Plus(Box::new(self))
    }

    pub fn opt(self) -> Self {
        Pattern::Optional(Box::new(self))
    }

    pub fn cap(self, template: impl Into<String>) -> Self {
        Pattern::Capture(Box::new(self), template.into())
    }

    pub fn end() -> Self {
        Pattern::EndOfInput
    }

    pub fn non_terminal(name: impl Into<String>) -> Self {
        Pattern::NonTerminal(name.into())
    }

    /// Compiles a standalone pattern. Fails if it refers to a named rule.
    pub fn compile(&self) -> Result<Program> {
        Compiler::new().compile(self)
    }
}

/// A set of named, possibly recursive rules with a designated root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    rules: Vec<(String, Pattern)>,
    root: String,
}

impl Grammar {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            root: root.into(),
        }
    }

    pub fn rule(mut self, name: impl Into<String>, body: Pattern) -> Self {
        self.rules.push((name.into(), body));
        self
    }

    pub fn rules(&self) -> &[(String, Pattern)] {
        &self.rules
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Compiles all rules; address 0 calls the root rule and ends.
    pub fn compile(&self) -> Result<Program> {
        Compiler::new().compile_grammar(self)
    }
}
