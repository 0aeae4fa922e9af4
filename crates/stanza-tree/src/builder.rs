//! Build arena nodes from a parsed [`Syntax`] tree.

use stanza_parse::{Syntax, Token};

use crate::arena::{Arena, NodeData, NodeId, NodeValue, ScalarText};

pub(crate) struct TreeBuilder<'a> {
    source: &'a str,
    tokens: &'a [Token],
    arena: &'a mut Arena,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(source: &'a str, tokens: &'a [Token], arena: &'a mut Arena) -> Self {
        Self {
            source,
            tokens,
            arena,
        }
    }

    /// Allocate `syntax` and its descendants; returns the new node.
    pub fn build(&mut self, syntax: &Syntax, parent: Option<NodeId>) -> NodeId {
        let tokens = Some(syntax.tokens());
        match syntax {
            Syntax::Mapping { entries, .. } => {
                let id = self.alloc(parent, tokens, NodeValue::Mapping(Vec::new()));
                let children = entries
                    .iter()
                    .map(|entry| {
                        let key = entry.key_text(self.source, self.tokens).to_string();
                        (key, self.build(&entry.value, Some(id)))
                    })
                    .collect();
                self.fill(id, NodeValue::Mapping(children));
                id
            }
            Syntax::Sequence { items, style, .. } => {
                let id = self.alloc(
                    parent,
                    tokens,
                    NodeValue::Sequence {
                        items: Vec::new(),
                        style: *style,
                    },
                );
                let children = items.iter().map(|item| self.build(item, Some(id))).collect();
                self.fill(
                    id,
                    NodeValue::Sequence {
                        items: children,
                        style: *style,
                    },
                );
                id
            }
            Syntax::Scalar { tokens: range } => {
                self.alloc(parent, tokens, NodeValue::Scalar(ScalarText::Source(*range)))
            }
            Syntax::Empty { .. } => self.alloc(parent, tokens, NodeValue::Empty),
        }
    }

    fn alloc(
        &mut self,
        parent: Option<NodeId>,
        tokens: Option<stanza_parse::TokenRange>,
        value: NodeValue,
    ) -> NodeId {
        self.arena.alloc(NodeData {
            parent,
            tokens,
            value,
        })
    }

    fn fill(&mut self, id: NodeId, value: NodeValue) {
        if let Some(data) = self.arena.get_mut(id) {
            data.value = value;
        }
    }
}
