//! A PEG-flavoured text syntax for patterns and grammars.
//!
//! ```text
//! grammar    <- definition+
//! definition <- identifier '<-' expression
//! expression <- sequence ('/' sequence)*
//! sequence   <- suffix+
//! suffix     <- primary ('?' / '*' / '+')*
//! primary    <- identifier / '(' expression ')' / literal / class / '.'
//!             / '{' expression '}' literal
//! ```
//!
//! Literals are quoted key descriptors (`'Ctrl+x'`, `"G"`). The literal after a
//! `{...}` capture is its template instead. `#` starts a comment that runs to
//! the end of the line.

use crate::error::{Error, Result};
use crate::event::RuneSet;
use crate::pattern::{Grammar, Pattern};

/// Parses a single expression.
pub fn parse(text: &str) -> Result<Pattern> {
    let mut p = Parser::new(text);
    p.skip_space();
    let pattern = p.parse_expression()?;
    p.expect_eof()?;
    Ok(pattern)
}

/// Parses a list of `name <- expression` definitions. The first definition is
/// the root.
pub fn parse_grammar(text: &str) -> Result<Grammar> {
    let mut p = Parser::new(text);
    p.skip_space();
    let mut grammar: Option<Grammar> = None;
    while !p.is_eof() {
        let start = p.pos;
        let name = p.parse_identifier()?;
        if !p.eat_arrow() {
            return Err(Error::syntax(start, format!("expected '<-' after '{name}'")));
        }
        let body = p.parse_expression()?;
        grammar = Some(grammar.unwrap_or_else(|| Grammar::new(name.clone())).rule(name, body));
    }
    grammar.ok_or_else(|| Error::syntax(p.pos, "expected a definition"))
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Parser { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn is_eof(&self) -> bool {
        self.pos == self.text.len()
    }

    fn char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::syntax(self.pos, message)
    }

    fn skip_space(&mut self) {
        loop {
            match self.char() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => return,
            }
        }
    }

    // Consumes `c` and the space after it.
    fn eat(&mut self, c: char) -> bool {
        if self.char() == Some(c) {
            self.bump();
            self.skip_space();
            true
        } else {
            false
        }
    }

    fn eat_arrow(&mut self) -> bool {
        if self.rest().starts_with("<-") {
            self.pos += 2;
            self.skip_space();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{c}'")))
        }
    }

    fn expect_eof(&self) -> Result<()> {
        match self.char() {
            None => Ok(()),
            Some(c) => Err(self.error(format!("unexpected '{c}'"))),
        }
    }

    fn parse_expression(&mut self) -> Result<Pattern> {
        let mut alternatives = vec![self.parse_sequence()?];
        while self.eat('/') {
            alternatives.push(self.parse_sequence()?);
        }
        Pattern::alt_all(alternatives).ok_or_else(|| self.error("expected a pattern"))
    }

    fn parse_sequence(&mut self) -> Result<Pattern> {
        let mut items = Vec::new();
        while self.starts_primary() {
            items.push(self.parse_suffix()?);
        }
        Pattern::seq_all(items).ok_or_else(|| self.error("expected a pattern"))
    }

    // A primary can start here, and it is not the name of the next definition.
    fn starts_primary(&self) -> bool {
        match self.char() {
            Some('(' | '{' | '[' | '.' | '\'' | '"') => true,
            Some(c) if is_ident_start(c) => !self.at_definition(),
            _ => false,
        }
    }

    fn at_definition(&self) -> bool {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .find(|&(_, c)| !is_ident_char(c))
            .map_or(rest.len(), |(i, _)| i);
        rest[end..].trim_start().starts_with("<-")
    }

    fn parse_suffix(&mut self) -> Result<Pattern> {
        let mut pattern = self.parse_primary()?;
        loop {
            pattern = if self.eat('?') {
                pattern.opt()
            } else if self.eat('*') {
                pattern.star()
            } else if self.eat('+') {
                pattern.plus()
            } else {
                return Ok(pattern);
            };
        }
    }

    fn parse_primary(&mut self) -> Result<Pattern> {
        match self.char() {
            Some('(') => {
                self.eat('(');
                let inner = self.parse_expression()?;
                self.expect(')')?;
                Ok(inner)
            }
            Some('{') => {
                self.eat('{');
                let inner = self.parse_expression()?;
                self.expect('}')?;
                if !matches!(self.char(), Some('\'' | '"')) {
                    return Err(self.error("expected a template after capture"));
                }
                let template = self.parse_quoted()?;
                Ok(inner.cap(template))
            }
            Some('[') => self.parse_class(),
            Some('.') => {
                self.eat('.');
                Ok(Pattern::any_rune())
            }
            Some('\'' | '"') => {
                let text = self.parse_quoted()?;
                Pattern::key(&text)
            }
            Some(c) if is_ident_start(c) => Ok(Pattern::non_terminal(self.parse_identifier()?)),
            Some(c) => Err(self.error(format!("unexpected '{c}'"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_identifier(&mut self) -> Result<String> {
        let start = self.pos;
        match self.char() {
            Some(c) if is_ident_start(c) => {}
            _ => return Err(self.error("expected an identifier")),
        }
        while self.char().is_some_and(is_ident_char) {
            self.bump();
        }
        let name = self.text[start..self.pos].to_string();
        self.skip_space();
        Ok(name)
    }

    // The unescaped content of a quoted literal.
    fn parse_quoted(&mut self) -> Result<String> {
        let start = self.pos;
        let Some(quote) = self.bump() else {
            return Err(self.error("expected a literal"));
        };
        let mut out = String::new();
        loop {
            match self.char() {
                None => return Err(Error::syntax(start, "unterminated literal")),
                Some(c) if c == quote => {
                    self.bump();
                    break;
                }
                Some(_) => out.push(self.parse_char()?),
            }
        }
        if out.is_empty() {
            return Err(Error::syntax(start, "empty literal"));
        }
        self.skip_space();
        Ok(out)
    }

    fn parse_class(&mut self) -> Result<Pattern> {
        let start = self.pos;
        self.bump();
        let negated = if self.char() == Some('^') {
            self.bump();
            true
        } else {
            false
        };
        let mut ranges = Vec::new();
        loop {
            match self.char() {
                None => return Err(Error::syntax(start, "unterminated character class")),
                Some(']') => {
                    self.bump();
                    break;
                }
                Some(_) => {
                    let low = self.parse_char()?;
                    let high = if self.char() == Some('-') && !self.rest().starts_with("-]") {
                        self.bump();
                        self.parse_char()?
                    } else {
                        low
                    };
                    if high < low {
                        return Err(self.error(format!("invalid range '{low}-{high}'")));
                    }
                    ranges.push((low, high));
                }
            }
        }
        if ranges.is_empty() {
            return Err(Error::syntax(start, "empty character class"));
        }
        self.skip_space();
        Ok(Pattern::rune_set(RuneSet::new(&ranges, negated)))
    }

    // One possibly escaped character inside a literal or class.
    fn parse_char(&mut self) -> Result<char> {
        let escape_at = self.pos;
        match self.bump() {
            Some('\\') => {}
            Some(c) => return Ok(c),
            None => return Err(self.error("unexpected end of input")),
        }
        let c = match self.bump() {
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some(c @ ('\'' | '"' | '[' | ']' | '\\' | '-')) => c,
            Some(c @ '0'..='7') => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.char().and_then(|c| c.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.bump();
                        }
                        None => break,
                    }
                }
                char::from_u32(code).ok_or_else(|| Error::syntax(escape_at, "invalid octal escape"))?
            }
            Some(c) => return Err(Error::syntax(escape_at, format!("unknown escape '\\{c}'"))),
            None => return Err(self.error("unexpected end of input")),
        };
        Ok(c)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
