//! Lexing errors.

use crate::{SourceContext, Span};

/// The kind of lexing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A quoted string has no closing `"`.
    UnterminatedString,
    /// A character that cannot appear inside or terminate a number.
    UnexpectedCharInNumber(char),
    /// A second `.` in one number.
    RepeatedDecimalPoint,
    /// A second exponent marker in one number.
    RepeatedExponent,
    /// A character that starts no token.
    UnexpectedChar(char),
}

/// A lexing error with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// The kind of error.
    pub kind: LexErrorKind,
    /// Where the offending input is. For unterminated strings this starts at
    /// the opening quote.
    pub span: Span,
    /// The lines around the error.
    pub context: SourceContext,
}

impl LexError {
    /// Create a lexing error, computing its context from `source`.
    pub fn new(kind: LexErrorKind, span: Span, source: &str) -> Self {
        Self {
            kind,
            span,
            context: SourceContext::locate(source, span.start),
        }
    }
}

impl std::fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexErrorKind::UnterminatedString => write!(f, "unterminated string"),
            LexErrorKind::UnexpectedCharInNumber(c) => {
                write!(f, "unexpected character {c:?} in number")
            }
            LexErrorKind::RepeatedDecimalPoint => write!(f, "repeated decimal point in number"),
            LexErrorKind::RepeatedExponent => write!(f, "repeated exponent in number"),
            LexErrorKind::UnexpectedChar(c) => write!(f, "unexpected character {c:?}"),
        }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at offset {} (line {}, column {})\n{}",
            self.kind, self.span.start, self.context.line, self.context.column, self.context
        )
    }
}

impl std::error::Error for LexError {}
