//! Serializer for Stanza document trees.
//!
//! Renders a node back to text, keeping mapping key order and the bracket
//! or dash style of every sequence. Scalars parsed from source are written
//! exactly as they appeared; comments and original spacing are not kept.
//!
//! ```
//! let doc = stanza_tree::parse("c: 2\nasd: [1,2]\n").unwrap();
//! let text = stanza_format::to_string(doc.root()).unwrap();
//! assert_eq!(text, "c: 2\nasd: [1, 2]\n");
//! ```

mod options;
mod writer;

pub use options::FormatOptions;
pub use writer::StanzaWriter;

use stanza_tree::{AccessError, Node};

/// Serialize `node` with default options.
pub fn to_string(node: Node<'_>) -> Result<String, AccessError> {
    to_string_with_options(node, &FormatOptions::default())
}

/// Serialize `node` with the given options.
pub fn to_string_with_options(
    node: Node<'_>,
    options: &FormatOptions,
) -> Result<String, AccessError> {
    node.view(|node| {
        let mut writer = StanzaWriter::with_options(options.clone());
        writer.write_node(node);
        writer.finish()
    })
}
