//! A tokenizer for stanza

mod context;
pub use context::{ContextLine, SourceContext};

mod error;
pub use error::{LexError, LexErrorKind};

mod span;
pub use span::Span;

mod token;
pub use token::{Token, TokenKind};

mod tokenizer;
pub use tokenizer::{Tokenizer, tokenize};
