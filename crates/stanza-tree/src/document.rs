//! Documents and node handles.

use std::sync::{Mutex, MutexGuard, PoisonError};

use stanza_parse::{Parser, SequenceStyle, Token, tokenize};

use crate::arena::{Arena, NodeData, NodeValue};
use crate::builder::TreeBuilder;
use crate::view::Tree;
use crate::{AccessError, Decode, Index, IntoNode, NodeId, NodeKind, NodeRef, SyntaxError};

/// A parsed (or built) Stanza document.
///
/// The root is always a mapping. The source text and its tokens never
/// change after parsing; the nodes sit behind a single lock that every
/// [`Node`] operation takes, so a document can be shared between threads.
#[derive(Debug)]
pub struct Document {
    source: String,
    tokens: Vec<Token>,
    arena: Mutex<Arena>,
    root: NodeId,
    empty: NodeId,
}

impl Document {
    /// An empty document with no source, to be filled with [`Node::set`].
    pub fn new() -> Self {
        let mut arena = Arena::default();
        let root = arena.alloc(NodeData {
            parent: None,
            tokens: None,
            value: NodeValue::Mapping(Vec::new()),
        });
        Self::with_root(String::new(), Vec::new(), arena, root)
    }

    /// Tokenize and parse `source`.
    pub fn parse(source: impl Into<String>) -> Result<Self, SyntaxError> {
        let source = source.into();
        let tokens = tokenize(&source)?;
        let syntax = Parser::new(&source, &tokens).parse_document()?;

        let mut arena = Arena::default();
        let root = TreeBuilder::new(&source, &tokens, &mut arena).build(&syntax, None);
        Ok(Self::with_root(source, tokens, arena, root))
    }

    fn with_root(source: String, tokens: Vec<Token>, mut arena: Arena, root: NodeId) -> Self {
        let empty = arena.alloc(NodeData {
            parent: Some(root),
            tokens: None,
            value: NodeValue::Empty,
        });
        Self {
            source,
            tokens,
            arena: Mutex::new(arena),
            root,
            empty,
        }
    }

    /// The text this document was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The tokens of [`source`](Self::source), ending with end-of-input.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The root mapping.
    pub fn root(&self) -> Node<'_> {
        Node {
            doc: self,
            id: self.root,
        }
    }

    /// The shared Empty node returned for missing keys and indices.
    pub fn empty(&self) -> Node<'_> {
        Node {
            doc: self,
            id: self.empty,
        }
    }

    /// A handle for `id`, which may be stale.
    pub fn node(&self, id: NodeId) -> Node<'_> {
        Node { doc: self, id }
    }

    fn lock(&self) -> MutexGuard<'_, Arena> {
        // Poisoning is ignored: `set` swaps an entry in a single step.
        self.arena.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_tree<R>(&self, f: impl FnOnce(Tree<'_>) -> R) -> R {
        let arena = self.lock();
        f(Tree {
            arena: &arena,
            source: &self.source,
            tokens: &self.tokens,
            empty: self.empty,
        })
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// A handle to a node in a [`Document`].
///
/// Handles compare equal when they name the same node of the same document.
/// Each method locks the document once; a handle whose node was replaced by
/// [`set`](Node::set) fails with [`AccessError::StaleNode`].
#[derive(Clone, Copy)]
pub struct Node<'doc> {
    doc: &'doc Document,
    id: NodeId,
}

impl<'doc> Node<'doc> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'doc Document {
        self.doc
    }

    fn with<R>(
        &self,
        f: impl FnOnce(NodeRef<'_>) -> Result<R, AccessError>,
    ) -> Result<R, AccessError> {
        self.doc.with_tree(|tree| f(tree.node(self.id)?))
    }

    /// Run `f` on this node with the document locked once.
    pub fn view<R>(&self, f: impl FnOnce(NodeRef<'_>) -> R) -> Result<R, AccessError> {
        self.with(|node| Ok(f(node)))
    }

    /// Look up a key (`&str`, `String`) or an index (`usize`).
    ///
    /// Missing keys and out-of-range indices return the document's Empty
    /// sentinel. Lookups on scalars and Empty nodes fail.
    pub fn get(&self, index: impl Index) -> Result<Node<'doc>, AccessError> {
        let id = self.with(|node| Ok(node.get(index)?.id()))?;
        Ok(self.doc.node(id))
    }

    /// Look up a key comparing only the first `len` bytes; see
    /// [`NodeRef::get_prefix`].
    pub fn get_prefix(&self, key: &str, len: usize) -> Result<Node<'doc>, AccessError> {
        let id = self.with(|node| Ok(node.get_prefix(key, len)?.id()))?;
        Ok(self.doc.node(id))
    }

    /// Convert to `T`. Empty fails with [`AccessError::MissingValue`].
    pub fn decode<T: Decode>(&self) -> Result<T, AccessError> {
        self.with(|node| node.decode())
    }

    /// Convert to `T`, or return `default` if the node is Empty.
    pub fn decode_or<T: Decode>(&self, default: T) -> Result<T, AccessError> {
        self.with(|node| node.decode_or(default))
    }

    /// Store `value` under `key` in this mapping.
    ///
    /// An existing entry with exactly that key is removed and its subtree
    /// released, so handles into it become stale. The new entry goes last.
    pub fn set(&self, key: &str, value: impl IntoNode) -> Result<(), AccessError> {
        let value = value.into_node();
        let mut arena = self.doc.lock();

        let data = arena.get(self.id).ok_or(AccessError::StaleNode)?;
        let NodeValue::Mapping(entries) = &data.value else {
            return Err(AccessError::NotAMapping { found: data.kind() });
        };
        let existing = entries.iter().position(|(k, _)| k == key);

        let new = value.attach(&mut arena, Some(self.id));
        let mut released = None;
        if let Some(NodeData {
            value: NodeValue::Mapping(entries),
            ..
        }) = arena.get_mut(self.id)
        {
            released = existing.map(|i| entries.remove(i).1);
            entries.push((key.to_string(), new));
        }
        if let Some(old) = released {
            arena.release(old);
        }
        tracing::trace!(key, replaced = released.is_some(), "set");
        Ok(())
    }

    pub fn kind(&self) -> Result<NodeKind, AccessError> {
        self.with(|node| Ok(node.kind()))
    }

    /// Whether this is an Empty node.
    pub fn is_empty(&self) -> Result<bool, AccessError> {
        self.with(|node| Ok(node.is_empty()))
    }

    /// Number of entries or items.
    pub fn len(&self) -> Result<usize, AccessError> {
        self.with(|node| Ok(node.len()))
    }

    /// Mapping keys in order.
    pub fn keys(&self) -> Result<Vec<String>, AccessError> {
        self.with(|node| Ok(node.keys().map(str::to_string).collect()))
    }

    /// The enclosing node; `None` for the root.
    pub fn parent(&self) -> Result<Option<Node<'doc>>, AccessError> {
        let parent = self.with(|node| Ok(node.parent().map(|p| p.id())))?;
        Ok(parent.map(|id| self.doc.node(id)))
    }

    pub fn sequence_style(&self) -> Result<Option<SequenceStyle>, AccessError> {
        self.with(|node| Ok(node.sequence_style()))
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node").field("id", &self.id).finish()
    }
}
