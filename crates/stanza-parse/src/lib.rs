//! Parser for stanza.
//!
//! [`Parser`] walks a token sequence produced by [`tokenize`] and yields a
//! [`Syntax`] tree whose leaves point back into that sequence. The grammar is
//! indentation sensitive: a deeper line opens a nested construct and a
//! shallower one closes it.

pub use stanza_tokenizer::{
    ContextLine, LexError, LexErrorKind, SourceContext, Span, Token, TokenKind, Tokenizer,
    tokenize,
};

mod error;
pub use error::{ParseError, ParseErrorKind};

mod syntax;
pub use syntax::{SequenceStyle, Syntax, SyntaxEntry, TokenRange};

mod parser;
pub use parser::{MAX_DEPTH, Parser};
