//! The tree produced by the parser.

use stanza_tokenizer::{Span, Token};

/// A half-open range of token indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenRange {
    /// First token index (inclusive).
    pub start: u32,
    /// Last token index (exclusive).
    pub end: u32,
}

impl TokenRange {
    /// Create a range from start and end token indices.
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// An empty range positioned at token `at`.
    pub fn empty(at: u32) -> Self {
        Self { start: at, end: at }
    }

    /// The tokens covered by this range.
    pub fn tokens<'t>(&self, tokens: &'t [Token]) -> &'t [Token] {
        tokens
            .get(self.start as usize..self.end as usize)
            .unwrap_or_default()
    }

    /// The source span from the first covered token to the last.
    ///
    /// An empty range maps to an empty span at the start of token `start`.
    pub fn span(&self, tokens: &[Token]) -> Span {
        match self.tokens(tokens) {
            [] => tokens
                .get(self.start as usize)
                .map_or(Span::default(), |t| Span::empty(t.span.start)),
            [first, .., last] => first.span.extend(last.span),
            [only] => only.span,
        }
    }
}

/// How a sequence was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceStyle {
    /// `[a, b, c]`
    Bracket,
    /// One `- item` per line.
    Dash,
}

/// A parsed node.
#[derive(Debug, Clone, PartialEq)]
pub enum Syntax {
    /// `key: value` entries in source order.
    Mapping {
        entries: Vec<SyntaxEntry>,
        tokens: TokenRange,
    },
    /// Ordered items.
    Sequence {
        items: Vec<Syntax>,
        style: SequenceStyle,
        tokens: TokenRange,
    },
    /// A single identifier, number or quoted string token.
    Scalar { tokens: TokenRange },
    /// A key with no value.
    Empty { tokens: TokenRange },
}

impl Syntax {
    /// The token range this node was built from.
    pub fn tokens(&self) -> TokenRange {
        match self {
            Syntax::Mapping { tokens, .. }
            | Syntax::Sequence { tokens, .. }
            | Syntax::Scalar { tokens }
            | Syntax::Empty { tokens } => *tokens,
        }
    }
}

/// One mapping entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxEntry {
    /// Index of the identifier token holding the key.
    pub key: u32,
    /// The value.
    pub value: Syntax,
}

impl SyntaxEntry {
    /// The key text.
    pub fn key_text<'a>(&self, source: &'a str, tokens: &[Token]) -> &'a str {
        tokens
            .get(self.key as usize)
            .map_or("", |t| t.text(source))
    }
}
