//! Node storage.
//!
//! Nodes live in slots addressed by [`NodeId`]. Releasing a node frees its
//! slot and bumps the slot's generation, so handles to it stop resolving
//! instead of reading whatever is allocated there next.

use stanza_parse::{SequenceStyle, TokenRange};

use crate::NodeKind;

/// Stable handle to a node within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// Where a scalar's text comes from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ScalarText {
    /// Built by the parser: the token range in the document source.
    Source(TokenRange),
    /// Built by `set`. A quoted literal keeps its surrounding `"`.
    Literal { text: String, quoted: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NodeValue {
    Mapping(Vec<(String, NodeId)>),
    Sequence {
        items: Vec<NodeId>,
        style: SequenceStyle,
    },
    Scalar(ScalarText),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NodeData {
    pub parent: Option<NodeId>,
    /// Tokens the node was parsed from; `None` for nodes built by `set`.
    pub tokens: Option<TokenRange>,
    pub value: NodeValue,
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self.value {
            NodeValue::Mapping(_) => NodeKind::Mapping,
            NodeValue::Sequence { .. } => NodeKind::Sequence,
            NodeValue::Scalar(_) => NodeKind::Scalar,
            NodeValue::Empty => NodeKind::Empty,
        }
    }

    fn children(&self) -> Vec<NodeId> {
        match &self.value {
            NodeValue::Mapping(entries) => entries.iter().map(|(_, id)| *id).collect(),
            NodeValue::Sequence { items, .. } => items.clone(),
            NodeValue::Scalar(_) | NodeValue::Empty => Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    data: Option<NodeData>,
}

#[derive(Debug, Default)]
pub(crate) struct Arena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Arena {
    pub fn alloc(&mut self, data: NodeData) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.data = Some(data);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            data: Some(data),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.data.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.data.as_mut())
    }

    /// Release `id` and everything below it.
    pub fn release(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let Some(slot) = self.slots.get_mut(id.index as usize) else {
                continue;
            };
            if slot.generation != id.generation {
                continue;
            }
            let Some(data) = slot.data.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
            pending.extend(data.children());
        }
    }

    /// Number of live nodes.
    pub fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(parent: Option<NodeId>) -> NodeData {
        NodeData {
            parent,
            tokens: None,
            value: NodeValue::Scalar(ScalarText::Literal {
                text: "1".to_string(),
                quoted: false,
            }),
        }
    }

    #[test]
    fn test_release_invalidates_subtree() {
        let mut arena = Arena::default();
        let map = arena.alloc(NodeData {
            parent: None,
            tokens: None,
            value: NodeValue::Mapping(Vec::new()),
        });
        let child = arena.alloc(scalar(Some(map)));
        if let Some(NodeData {
            value: NodeValue::Mapping(entries),
            ..
        }) = arena.get_mut(map)
        {
            entries.push(("a".to_string(), child));
        }
        assert_eq!(arena.live(), 2);

        arena.release(map);
        assert!(arena.get(map).is_none());
        assert!(arena.get(child).is_none());
        assert_eq!(arena.live(), 0);
    }

    #[test]
    fn test_reused_slot_does_not_resolve_old_handle() {
        let mut arena = Arena::default();
        let old = arena.alloc(scalar(None));
        arena.release(old);
        let new = arena.alloc(scalar(None));
        assert_ne!(old, new);
        assert!(arena.get(old).is_none());
        assert!(arena.get(new).is_some());

        // Releasing a stale handle leaves the new occupant alone.
        arena.release(old);
        assert!(arena.get(new).is_some());
    }
}
