//! Line and column context around a byte offset, for diagnostics.

use std::fmt;

/// One numbered line of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextLine {
    /// 1-based line number.
    pub number: usize,
    /// Line text without its line terminator.
    pub text: String,
}

/// The lines surrounding an error position.
///
/// Carries the 1-based line and column of the offset, the line it falls on,
/// and the lines directly before and after it when they exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    /// 1-based line of the offset.
    pub line: usize,
    /// 1-based column of the offset, counted in characters.
    pub column: usize,
    /// The line before, if any.
    pub previous: Option<ContextLine>,
    /// The line containing the offset.
    pub current: ContextLine,
    /// The line after, if any.
    pub next: Option<ContextLine>,
}

impl SourceContext {
    /// Locate `offset` in `source`. Offsets past the end clamp to the end.
    pub fn locate(source: &str, offset: u32) -> Self {
        let mut offset = (offset as usize).min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }

        let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
        let line_index = source[..line_start].matches('\n').count();
        let column = source[line_start..offset].chars().count() + 1;

        let lines: Vec<&str> = source
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect();
        let numbered = |index: usize| ContextLine {
            number: index + 1,
            text: lines.get(index).copied().unwrap_or_default().to_string(),
        };

        Self {
            line: line_index + 1,
            column,
            previous: line_index.checked_sub(1).map(numbered),
            current: numbered(line_index),
            next: (line_index + 1 < lines.len()).then(|| numbered(line_index + 1)),
        }
    }
}

impl fmt::Display for SourceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self.next.as_ref().unwrap_or(&self.current).number;
        let gutter = last.to_string().len();

        if let Some(previous) = &self.previous {
            writeln!(f, "{:>gutter$} | {}", previous.number, previous.text)?;
        }
        writeln!(f, "{:>gutter$} | {}", self.current.number, self.current.text)?;
        write!(
            f,
            "{:>gutter$} | {:>col$}",
            "",
            "^",
            col = self.column
        )?;
        if let Some(next) = &self.next {
            write!(f, "\n{:>gutter$} | {}", next.number, next.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line() {
        let ctx = SourceContext::locate("abc: 1\nd: 2\n", 2);
        assert_eq!(ctx.line, 1);
        assert_eq!(ctx.column, 3);
        assert!(ctx.previous.is_none());
        assert_eq!(ctx.current.text, "abc: 1");
        assert_eq!(ctx.next.as_ref().map(|l| l.text.as_str()), Some("d: 2"));
    }

    #[test]
    fn test_middle_line() {
        let ctx = SourceContext::locate("a: 1\nb: [1\nc: 3", 8);
        assert_eq!(ctx.line, 2);
        assert_eq!(ctx.column, 4);
        assert_eq!(ctx.previous.map(|l| l.number), Some(1));
        assert_eq!(ctx.next.map(|l| l.text), Some("c: 3".to_string()));
    }

    #[test]
    fn test_crlf_lines() {
        let ctx = SourceContext::locate("a: 1\r\nb: 2\r\n", 6);
        assert_eq!(ctx.line, 2);
        assert_eq!(ctx.column, 1);
        assert_eq!(ctx.current.text, "b: 2");
        assert_eq!(ctx.previous.map(|l| l.text), Some("a: 1".to_string()));
    }

    #[test]
    fn test_display_caret() {
        let ctx = SourceContext::locate("a: 1\nb: ?\n", 8);
        let rendered = ctx.to_string();
        assert_eq!(rendered, "1 | a: 1\n2 | b: ?\n  |    ^\n3 | ");
    }

    #[test]
    fn test_offset_past_end() {
        let ctx = SourceContext::locate("a", 40);
        assert_eq!(ctx.line, 1);
        assert_eq!(ctx.column, 2);
    }
}
