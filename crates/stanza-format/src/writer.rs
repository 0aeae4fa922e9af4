//! Low-level Stanza output writer.

use stanza_tree::{NodeKind, NodeRef, SequenceStyle};
use tracing::trace;

use crate::FormatOptions;

/// What the writer emitted last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emitted {
    Newline,
    Dash,
    Text,
}

/// Renders nodes to Stanza text.
///
/// Rules:
/// - a mapping writes `key: ` and its value, one entry per line, indented
///   by depth;
/// - a bracket sequence writes `[a, b]` inline;
/// - a dash sequence writes one `- item` line per item, indented by depth.
///   A nested dash sequence or mapping item goes on the following lines one
///   level deeper. It gets a bare `- ` line of its own unless it directly
///   follows a scalar or bracket item;
/// - a scalar writes its stored literal, or its exact source text;
/// - Empty writes a single space.
///
/// Repeated newlines and dash markers collapse into one.
pub struct StanzaWriter {
    out: String,
    last: Emitted,
    options: FormatOptions,
}

impl StanzaWriter {
    /// Create a new writer with default options.
    pub fn new() -> Self {
        Self::with_options(FormatOptions::default())
    }

    /// Create a new writer with the given options.
    pub fn with_options(options: FormatOptions) -> Self {
        Self {
            out: String::new(),
            last: Emitted::Newline,
            options,
        }
    }

    /// Consume the writer and return the output.
    pub fn finish(mut self) -> String {
        if !self.options.trailing_newline {
            let len = self.out.trim_end_matches('\n').len();
            self.out.truncate(len);
        }
        self.out
    }

    /// Write `node` as a top-level value.
    pub fn write_node(&mut self, node: NodeRef<'_>) {
        self.write(node, 0);
    }

    fn write(&mut self, node: NodeRef<'_>, depth: usize) {
        match node.kind() {
            NodeKind::Mapping => self.write_mapping(node, depth),
            NodeKind::Sequence => match node.sequence_style() {
                Some(SequenceStyle::Dash) => self.write_dash_sequence(node, depth),
                _ => self.write_bracket_sequence(node, depth),
            },
            NodeKind::Scalar => self.text(node.text().unwrap_or_default()),
            NodeKind::Empty => self.text(" "),
        }
    }

    fn write_mapping(&mut self, node: NodeRef<'_>, depth: usize) {
        trace!(depth, entries = node.len(), "write mapping");
        self.newline();
        for (key, value) in node.entries() {
            self.indent(depth);
            self.text(key);
            self.text(": ");
            self.write(value, depth + 1);
            self.newline();
        }
    }

    fn write_bracket_sequence(&mut self, node: NodeRef<'_>, depth: usize) {
        self.text("[");
        for (i, item) in node.items().enumerate() {
            if i > 0 {
                self.text(", ");
            }
            // Everything inside brackets stays inline.
            if item.kind() == NodeKind::Sequence {
                self.write_bracket_sequence(item, depth + 1);
            } else {
                self.write(item, depth + 1);
            }
        }
        self.text("]");
    }

    fn write_dash_sequence(&mut self, node: NodeRef<'_>, depth: usize) {
        trace!(depth, items = node.len(), "write dash sequence");
        self.newline();
        let mut after_inline_item = false;
        for item in node.items() {
            let block = item.kind() == NodeKind::Mapping
                || item.sequence_style() == Some(SequenceStyle::Dash);
            if !block || !after_inline_item {
                self.newline();
                self.indent(depth);
                self.dash();
            }
            self.write(item, depth + 1);
            after_inline_item = matches!(item.kind(), NodeKind::Scalar | NodeKind::Sequence) && !block;
        }
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(self.options.indent);
        }
    }

    fn newline(&mut self) {
        if self.last != Emitted::Newline {
            self.out.push('\n');
            self.last = Emitted::Newline;
        }
    }

    fn dash(&mut self) {
        if self.last != Emitted::Dash {
            self.out.push_str("- ");
            self.last = Emitted::Dash;
        }
    }

    fn text(&mut self, text: &str) {
        self.out.push_str(text);
        self.last = Emitted::Text;
    }
}

impl Default for StanzaWriter {
    fn default() -> Self {
        Self::new()
    }
}
