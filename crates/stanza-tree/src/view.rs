//! Read access to a locked tree.

use stanza_parse::{SequenceStyle, Span, Token};

use crate::arena::{Arena, NodeData, NodeValue, ScalarText};
use crate::decode::decode_node;
use crate::{AccessError, Decode, Index, NodeId, NodeKind};

/// Everything a [`NodeRef`] reads, borrowed from a locked document.
#[derive(Clone, Copy)]
pub(crate) struct Tree<'t> {
    pub arena: &'t Arena,
    pub source: &'t str,
    pub tokens: &'t [Token],
    pub empty: NodeId,
}

impl<'t> Tree<'t> {
    pub fn node(self, id: NodeId) -> Result<NodeRef<'t>, AccessError> {
        let data = self.arena.get(id).ok_or(AccessError::StaleNode)?;
        Ok(NodeRef {
            tree: self,
            id,
            data,
        })
    }

    fn empty(self) -> Result<NodeRef<'t>, AccessError> {
        self.node(self.empty)
    }
}

/// A node read while the document lock is held.
///
/// Handed to [`Node::view`](crate::Node::view) closures and [`Decode`]
/// impls. Calling methods of [`Node`](crate::Node) from inside those would
/// wait on the lock this view already holds; navigate with `NodeRef`
/// instead.
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: Tree<'t>,
    id: NodeId,
    data: &'t NodeData,
}

impl<'t> NodeRef<'t> {
    /// This node's handle.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node's shape.
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// Whether this is an Empty node, including the missing-value sentinel.
    pub fn is_empty(&self) -> bool {
        self.kind() == NodeKind::Empty
    }

    /// The enclosing node; `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'t>> {
        self.data.parent.and_then(|id| self.tree.node(id).ok())
    }

    /// Look up a key (`&str`, `String`) or an index (`usize`).
    ///
    /// A missing key or out-of-range index yields the document's Empty
    /// sentinel. Looking up a key on a non-mapping, or an index on a
    /// non-sequence, fails.
    pub fn get(&self, index: impl Index) -> Result<NodeRef<'t>, AccessError> {
        match index.find(*self)? {
            Some(id) => self.tree.node(id),
            None => self.tree.empty(),
        }
    }

    /// Look up a key comparing at most `len` leading bytes.
    ///
    /// A stored key matches if both strings agree on their first `len`
    /// bytes, or if both end together before that. So `get_prefix("xxxx", 1)`
    /// finds a stored key `"x"`, and also `"xy"`.
    pub fn get_prefix(&self, key: &str, len: usize) -> Result<NodeRef<'t>, AccessError> {
        match self.find_key(key, Some(len))? {
            Some(id) => self.tree.node(id),
            None => self.tree.empty(),
        }
    }

    pub(crate) fn find_key(
        &self,
        key: &str,
        len: Option<usize>,
    ) -> Result<Option<NodeId>, AccessError> {
        let NodeValue::Mapping(entries) = &self.data.value else {
            return Err(AccessError::NotAMapping { found: self.kind() });
        };
        let found = entries
            .iter()
            .find(|(stored, _)| key_matches(stored, key, len))
            .map(|(_, id)| *id);
        if found.is_none() {
            tracing::warn!(key, "key not found, returning empty");
        }
        Ok(found)
    }

    pub(crate) fn find_item(&self, index: usize) -> Result<Option<NodeId>, AccessError> {
        let NodeValue::Sequence { items, .. } = &self.data.value else {
            return Err(AccessError::NotASequence { found: self.kind() });
        };
        let found = items.get(index).copied();
        if found.is_none() {
            tracing::warn!(index, len = items.len(), "index out of range, returning empty");
        }
        Ok(found)
    }

    /// Number of entries or items; zero for scalars and Empty.
    pub fn len(&self) -> usize {
        match &self.data.value {
            NodeValue::Mapping(entries) => entries.len(),
            NodeValue::Sequence { items, .. } => items.len(),
            NodeValue::Scalar(_) | NodeValue::Empty => 0,
        }
    }

    /// Mapping keys in order. Empty for other shapes.
    pub fn keys(&self) -> impl Iterator<Item = &'t str> + use<'t> {
        let data: &'t NodeData = self.data;
        let entries: &'t [(String, NodeId)] = match &data.value {
            NodeValue::Mapping(entries) => entries.as_slice(),
            _ => &[],
        };
        entries.iter().map(|(key, _)| key.as_str())
    }

    /// Mapping entries in order. Empty for other shapes.
    pub fn entries(&self) -> impl Iterator<Item = (&'t str, NodeRef<'t>)> + use<'t> {
        let (tree, data): (Tree<'t>, &'t NodeData) = (self.tree, self.data);
        let entries: &'t [(String, NodeId)] = match &data.value {
            NodeValue::Mapping(entries) => entries.as_slice(),
            _ => &[],
        };
        entries
            .iter()
            .filter_map(move |(key, id)| Some((key.as_str(), tree.node(*id).ok()?)))
    }

    /// Sequence items in order. Empty for other shapes.
    pub fn items(&self) -> impl Iterator<Item = NodeRef<'t>> + use<'t> {
        let (tree, data): (Tree<'t>, &'t NodeData) = (self.tree, self.data);
        let items: &'t [NodeId] = match &data.value {
            NodeValue::Sequence { items, .. } => items.as_slice(),
            _ => &[],
        };
        items.iter().filter_map(move |id| tree.node(*id).ok())
    }

    /// How the sequence was written, for sequences.
    pub fn sequence_style(&self) -> Option<SequenceStyle> {
        match self.data.value {
            NodeValue::Sequence { style, .. } => Some(style),
            _ => None,
        }
    }

    /// A scalar's raw text: the literal stored by `set` (quotes included),
    /// or the exact source text it was parsed from.
    pub fn text(&self) -> Option<&'t str> {
        match self.scalar()? {
            ScalarText::Literal { text, .. } => Some(text.as_str()),
            ScalarText::Source(range) => {
                Some(range.span(self.tree.tokens).slice(self.tree.source))
            }
        }
    }

    pub(crate) fn scalar(&self) -> Option<&'t ScalarText> {
        let data: &'t NodeData = self.data;
        match &data.value {
            NodeValue::Scalar(text) => Some(text),
            _ => None,
        }
    }

    /// Source location, for parsed nodes.
    pub fn span(&self) -> Option<Span> {
        self.data.tokens.map(|range| range.span(self.tree.tokens))
    }

    /// Convert this node to `T`. Empty fails with
    /// [`AccessError::MissingValue`].
    pub fn decode<T: Decode>(&self) -> Result<T, AccessError> {
        decode_node(*self, None)
    }

    /// Convert this node to `T`, or return `default` if it is Empty.
    pub fn decode_or<T: Decode>(&self, default: T) -> Result<T, AccessError> {
        decode_node(*self, Some(default))
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Compare `stored` and `key`. With a length, only that many leading bytes
/// are compared, and reaching it counts as a match.
fn key_matches(stored: &str, key: &str, len: Option<usize>) -> bool {
    let Some(len) = len else {
        return stored == key;
    };
    let (stored, key) = (stored.as_bytes(), key.as_bytes());
    for i in 0..len {
        match (stored.get(i), key.get(i)) {
            (None, None) => return true,
            (Some(a), Some(b)) if a == b => {}
            _ => return false,
        }
    }
    true
}
