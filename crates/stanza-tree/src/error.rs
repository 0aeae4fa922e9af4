//! Errors raised by accessors and decoders.

use crate::{NodeKind, Shape};

/// An access or conversion failure.
///
/// These are local to the call that raised them; the tree is unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The node is Empty and no default was supplied.
    MissingValue,
    /// A key lookup or `set` on a node that is not a mapping.
    NotAMapping { found: NodeKind },
    /// An index lookup on a node that is not a sequence.
    NotASequence { found: NodeKind },
    /// The node's shape disagrees with the requested type.
    ShapeMismatch { expected: Shape, found: NodeKind },
    /// The scalar text does not convert to the requested type.
    InvalidScalar { text: String, target: &'static str },
    /// The handle refers to a node that was released by `set`.
    StaleNode,
    /// Raised by a user decoder.
    Custom(String),
}

impl AccessError {
    /// Create a custom error from a user decoder.
    pub fn custom(message: impl std::fmt::Display) -> Self {
        AccessError::Custom(message.to_string())
    }
}

impl std::fmt::Display for AccessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessError::MissingValue => write!(f, "missing value and no default"),
            AccessError::NotAMapping { found } => write!(f, "expected a mapping, found {found}"),
            AccessError::NotASequence { found } => write!(f, "expected a sequence, found {found}"),
            AccessError::ShapeMismatch { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            AccessError::InvalidScalar { text, target } => {
                write!(f, "cannot convert {text:?} to {target}")
            }
            AccessError::StaleNode => write!(f, "node was released"),
            AccessError::Custom(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for AccessError {}
