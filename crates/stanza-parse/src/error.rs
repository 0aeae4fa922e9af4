//! Parse errors.

use stanza_tokenizer::{SourceContext, Span};

/// The kind of structural failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The document does not start with a mapping entry.
    ExpectedMapping,
    /// A mapping line does not start with an identifier key.
    ExpectedKey,
    /// A key is not followed by `:`.
    MissingColon,
    /// No value production matched where one is required.
    ExpectedValue,
    /// A dash-sequence line does not start with `-`.
    ExpectedDash,
    /// A bracket-sequence element is followed by neither `,` nor `]`.
    ExpectedSeparator,
    /// End of input before the closing `]`. The span is the opening `[`.
    UnclosedSequence,
    /// End of input in the middle of a construct.
    UnexpectedEof,
    /// Content left over after a complete value or document.
    TrailingContent,
    /// Values nest deeper than [`MAX_DEPTH`](crate::MAX_DEPTH).
    NestingTooDeep,
}

/// A parse error with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Source location.
    pub span: Span,
    /// The lines around the error.
    pub context: SourceContext,
}

impl ParseError {
    /// Create a parse error, computing its context from `source`.
    pub fn new(kind: ParseErrorKind, span: Span, source: &str) -> Self {
        Self {
            kind,
            span,
            context: SourceContext::locate(source, span.start),
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErrorKind::ExpectedMapping => write!(f, "expected a mapping"),
            ParseErrorKind::ExpectedKey => write!(f, "expected key"),
            ParseErrorKind::MissingColon => write!(f, "missing ':' after key"),
            ParseErrorKind::ExpectedValue => write!(f, "expected value"),
            ParseErrorKind::ExpectedDash => write!(f, "expected '-'"),
            ParseErrorKind::ExpectedSeparator => write!(f, "expected ',' or ']'"),
            ParseErrorKind::UnclosedSequence => write!(f, "unclosed sequence"),
            ParseErrorKind::UnexpectedEof => write!(f, "unexpected end of input"),
            ParseErrorKind::TrailingContent => write!(f, "trailing content"),
            ParseErrorKind::NestingTooDeep => write!(f, "nesting too deep"),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at offset {} (line {}, column {})\n{}",
            self.kind, self.span.start, self.context.line, self.context.column, self.context
        )
    }
}

impl std::error::Error for ParseError {}
