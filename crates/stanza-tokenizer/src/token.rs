//! Token types for the Stanza tokenizer.

use crate::Span;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Layout tokens
    /// Run of spaces and tabs. The token width is the run length.
    Whitespace,
    /// Newline: `\n` or `\r\n`
    Newline,

    // Structural tokens
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `-` followed by whitespace, a newline or end of input
    Dash,
    /// `[`
    LBracket,
    /// `]`
    RBracket,

    // Scalar tokens
    /// Identifier: `[A-Za-z][A-Za-z0-9]*`
    Ident,
    /// Number: `-1`, `2.5`, `1e-3`
    Number,
    /// Quoted string: `"hello world"`, quotes included
    Quoted,

    /// End of input
    Eof,
}

impl TokenKind {
    /// Whether this token can stand alone as a scalar value.
    pub fn is_scalar(&self) -> bool {
        matches!(self, TokenKind::Ident | TokenKind::Number | TokenKind::Quoted)
    }

    /// Whether this token only carries layout (whitespace or newline).
    pub fn is_layout(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Newline)
    }
}

/// A token: its kind, repeat count and span in the source text.
///
/// Tokens do not borrow the source; use [`Token::text`] with the
/// buffer they were produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// Repeat count. For whitespace this is the indentation width in
    /// characters; it is zero for every other kind.
    pub width: u32,
    /// The span in the source text.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, width: u32, span: Span) -> Self {
        Self { kind, width, span }
    }

    /// The source text of this token.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.slice(source)
    }
}
