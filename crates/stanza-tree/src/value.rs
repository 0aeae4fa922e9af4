//! Values built in code, before they are attached to a document.

use crate::arena::{Arena, NodeData, NodeId, NodeValue, ScalarText};

/// An owned node that does not belong to any document yet.
#[derive(Debug, Clone, PartialEq)]
pub enum Detached {
    /// Scalar text. Quoted text keeps its surrounding `"`.
    Scalar { text: String, quoted: bool },
    /// A nested mapping.
    Mapping(Mapping),
}

impl Detached {
    /// An unquoted scalar, written out verbatim.
    pub fn scalar(text: impl Into<String>) -> Self {
        Detached::Scalar {
            text: text.into(),
            quoted: false,
        }
    }

    /// A string scalar. It is stored and serialized as `"text"`, with `"`
    /// and `\` escaped by a backslash, and reads back as `text`.
    pub fn string(text: &str) -> Self {
        let mut quoted = String::with_capacity(text.len() + 2);
        quoted.push('"');
        for c in text.chars() {
            if matches!(c, '"' | '\\') {
                quoted.push('\\');
            }
            quoted.push(c);
        }
        quoted.push('"');
        Detached::Scalar {
            text: quoted,
            quoted: true,
        }
    }

    /// Move this value into `arena` under `parent`.
    pub(crate) fn attach(self, arena: &mut Arena, parent: Option<NodeId>) -> NodeId {
        match self {
            Detached::Scalar { text, quoted } => arena.alloc(NodeData {
                parent,
                tokens: None,
                value: NodeValue::Scalar(ScalarText::Literal { text, quoted }),
            }),
            Detached::Mapping(mapping) => {
                let id = arena.alloc(NodeData {
                    parent,
                    tokens: None,
                    value: NodeValue::Mapping(Vec::new()),
                });
                let entries = mapping
                    .entries
                    .into_iter()
                    .map(|(key, value)| (key, value.attach(arena, Some(id))))
                    .collect();
                if let Some(data) = arena.get_mut(id) {
                    data.value = NodeValue::Mapping(entries);
                }
                id
            }
        }
    }
}

/// A mapping under construction.
///
/// Passing it to [`Node::set`](crate::Node::set) moves the whole subtree into
/// the document.
///
/// ```
/// use stanza_tree::{Document, Mapping};
///
/// let mut server = Mapping::new();
/// server.set("host", "localhost").set("port", 8080);
///
/// let doc = Document::new();
/// doc.root().set("server", server).unwrap();
/// let port = doc.root().get("server").unwrap().get("port").unwrap();
/// assert_eq!(port.decode::<u16>().unwrap(), 8080);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, Detached)>,
}

impl Mapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key` at the end, replacing any entry with
    /// exactly that key.
    pub fn set(&mut self, key: impl Into<String>, value: impl IntoNode) -> &mut Self {
        let key = key.into();
        self.entries.retain(|(k, _)| *k != key);
        self.entries.push((key, value.into_node()));
        self
    }

    /// The value stored under exactly `key`.
    pub fn get(&self, key: &str) -> Option<&Detached> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Values that [`Node::set`](crate::Node::set) can store.
pub trait IntoNode {
    fn into_node(self) -> Detached;
}

impl IntoNode for Detached {
    fn into_node(self) -> Detached {
        self
    }
}

impl IntoNode for Mapping {
    fn into_node(self) -> Detached {
        Detached::Mapping(self)
    }
}

impl IntoNode for &str {
    fn into_node(self) -> Detached {
        Detached::string(self)
    }
}

impl IntoNode for String {
    fn into_node(self) -> Detached {
        Detached::string(&self)
    }
}

impl IntoNode for &String {
    fn into_node(self) -> Detached {
        Detached::string(self)
    }
}

impl IntoNode for char {
    fn into_node(self) -> Detached {
        Detached::string(self.encode_utf8(&mut [0; 4]))
    }
}

macro_rules! impl_into_node_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoNode for $ty {
                fn into_node(self) -> Detached {
                    Detached::scalar(self.to_string())
                }
            }
        )*
    };
}

impl_into_node_display!(
    bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);
