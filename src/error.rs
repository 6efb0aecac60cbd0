pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{0}: invalid key event")]
    InvalidKeyEvent(String),
    #[error("syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),
    #[error("unsupported terminal event: {0}")]
    UnsupportedEvent(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("unknown rule '{0}'")]
    UnknownRule(String),
    #[error("rule '{0}' is defined more than once")]
    DuplicateRule(String),
}

impl Error {
    pub(crate) fn invalid_key(text: &str) -> Self {
        Error::InvalidKeyEvent(text.to_string())
    }

    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Error::Syntax {
            position,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Error::InvalidKeyEvent("Ctrl+".to_string()), "Ctrl+: invalid key event")]
    #[case(
        Error::syntax(7, "expected ')'"),
        "syntax error at position 7: expected ')'"
    )]
    #[case(
        Error::Compile(CompileError::UnknownRule("motion".to_string())),
        "compile error: unknown rule 'motion'"
    )]
    #[case(
        Error::Compile(CompileError::DuplicateRule("count".to_string())),
        "compile error: rule 'count' is defined more than once"
    )]
    #[case(
        Error::UnsupportedEvent("FocusGained".to_string()),
        "unsupported terminal event: FocusGained"
    )]
    fn error_display(#[case] error: Error, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn compile_error_converts_and_keeps_source() {
        let err: Error = CompileError::UnknownRule("x".to_string()).into();
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn invalid_key_has_no_source() {
        let err = Error::invalid_key("Foo+Bar");
        assert!(std::error::Error::source(&err).is_none());
    }
}
