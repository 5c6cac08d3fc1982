//! Expression errors.

/// Broad class of an [`ExprError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unrecognized input character.
    Lex,
    /// Token stream does not fit the grammar.
    Syntax,
    /// Well-formed input that cannot be evaluated.
    Evaluation,
}

/// Errors raised by a single `evaluate` call.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ExprError {
    #[error("unexpected character '{ch}' at position {position}")]
    Lex { ch: char, position: usize },

    #[error("syntax error at position {position}: {message}")]
    Syntax { message: String, position: usize },

    #[error("unknown operator '{op}' at position {position}")]
    UnknownOperator { op: String, position: usize },

    #[error("unknown function '{name}' at position {position}")]
    UnknownFunction { name: String, position: usize },

    #[error("cannot convert '{text}' to a number")]
    InvalidNumber { text: String },
}

impl ExprError {
    pub(crate) fn syntax(message: impl Into<String>, position: usize) -> Self {
        Self::Syntax {
            message: message.into(),
            position,
        }
    }

    /// Classify the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExprError::Lex { .. } => ErrorKind::Lex,
            ExprError::Syntax { .. } => ErrorKind::Syntax,
            ExprError::UnknownOperator { .. }
            | ExprError::UnknownFunction { .. }
            | ExprError::InvalidNumber { .. } => ErrorKind::Evaluation,
        }
    }
}
