//! Formatting options for Stanza serialization.

/// Options for Stanza serialization.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Indentation string, repeated once per nesting level (default: "    " - 4 spaces)
    pub indent: &'static str,

    /// End the output with a newline (default: true)
    pub trailing_newline: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: "    ",
            trailing_newline: true,
        }
    }
}

impl FormatOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom indentation string.
    pub fn indent(mut self, indent: &'static str) -> Self {
        self.indent = indent;
        self
    }

    /// Choose whether the output ends with a newline.
    pub fn trailing_newline(mut self, trailing_newline: bool) -> Self {
        self.trailing_newline = trailing_newline;
        self
    }
}
