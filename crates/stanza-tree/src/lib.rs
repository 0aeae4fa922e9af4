//! Document tree for Stanza configuration files.
//!
//! A [`Document`] owns its source text, its tokens and an arena of nodes
//! guarded by one lock. [`Node`] handles are cheap to copy and can be shared
//! across threads; every call on them takes the document lock for its full
//! duration. Inside [`Node::view`] and user [`Decode`] impls the tree is
//! read through [`NodeRef`], which borrows the already-locked arena.
//!
//! ```
//! let doc = stanza_tree::parse("c: 2\nasd: [1,2]\n").unwrap();
//! let root = doc.root();
//! assert_eq!(root.get("c").unwrap().decode::<i32>().unwrap(), 2);
//! assert_eq!(
//!     root.get("asd").unwrap().decode::<Vec<String>>().unwrap(),
//!     ["1", "2"]
//! );
//! ```

mod arena;
mod builder;
mod decode;
mod diagnostic;
mod document;
mod error;
mod index;
mod value;
mod view;

pub use arena::NodeId;
pub use decode::{Decode, Shape};
pub use diagnostic::SyntaxError;
pub use document::{Document, Node};
pub use error::AccessError;
pub use index::Index;
pub use stanza_parse::{
    LexError, LexErrorKind, ParseError, ParseErrorKind, SequenceStyle, SourceContext, Span,
};
pub use value::{Detached, IntoNode, Mapping};
pub use view::NodeRef;

/// The runtime shape of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Mapping,
    Sequence,
    Scalar,
    Empty,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Mapping => write!(f, "mapping"),
            NodeKind::Sequence => write!(f, "sequence"),
            NodeKind::Scalar => write!(f, "scalar"),
            NodeKind::Empty => write!(f, "empty"),
        }
    }
}

/// Parse a Stanza document.
pub fn parse(source: &str) -> Result<Document, SyntaxError> {
    Document::parse(source)
}
