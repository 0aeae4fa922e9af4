//! Diagnostic rendering for lexing and parsing errors.

use ariadne::{Color, Label, Report, ReportKind, Source};
use stanza_parse::{LexError, LexErrorKind, ParseError, ParseErrorKind, SourceContext, Span};

/// Why a document failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    Lex(LexError),
    Parse(ParseError),
}

impl SyntaxError {
    /// Location of the offending input.
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::Lex(e) => e.span,
            SyntaxError::Parse(e) => e.span,
        }
    }

    /// The source lines around the error.
    pub fn context(&self) -> &SourceContext {
        match self {
            SyntaxError::Lex(e) => &e.context,
            SyntaxError::Parse(e) => &e.context,
        }
    }

    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let report = self.build_report(filename);
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
    ) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
        let range: std::ops::Range<usize> = self.span().into();
        let report = |message: String, label: &str| {
            Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message(message)
                .with_label(
                    Label::new((filename, range.clone()))
                        .with_message(label)
                        .with_color(Color::Red),
                )
        };

        match self {
            SyntaxError::Lex(e) => match e.kind {
                LexErrorKind::UnterminatedString => report(e.kind.to_string(), "string starts here")
                    .with_help("add a closing '\"'"),
                LexErrorKind::UnexpectedCharInNumber(_)
                | LexErrorKind::RepeatedDecimalPoint
                | LexErrorKind::RepeatedExponent => report(e.kind.to_string(), "in this number")
                    .with_help("numbers end at whitespace, '#', ',' or ']'; quote the value to use it as text"),
                LexErrorKind::UnexpectedChar(_) => report(e.kind.to_string(), "unexpected character"),
            },
            SyntaxError::Parse(e) => match e.kind {
                ParseErrorKind::ExpectedMapping => report(e.kind.to_string(), "document starts here")
                    .with_help("a document is a list of `key: value` lines"),
                ParseErrorKind::ExpectedKey => report(e.kind.to_string(), "expected an identifier here")
                    .with_help("keys are identifiers: a letter followed by letters or digits"),
                ParseErrorKind::MissingColon => report(e.kind.to_string(), "expected ':' here"),
                ParseErrorKind::ExpectedValue => report(e.kind.to_string(), "expected a value here"),
                ParseErrorKind::ExpectedDash => report(e.kind.to_string(), "expected '-' here")
                    .with_help("every line of a dash sequence starts with '- ' at the same indentation"),
                ParseErrorKind::ExpectedSeparator => report(e.kind.to_string(), "expected ',' or ']' here"),
                ParseErrorKind::UnclosedSequence => report(e.kind.to_string(), "sequence opened here")
                    .with_help("add a closing ']'"),
                ParseErrorKind::UnexpectedEof => report(e.kind.to_string(), "input ends here"),
                ParseErrorKind::TrailingContent => report(e.kind.to_string(), "unexpected content here")
                    .with_help("check the indentation of this line"),
                ParseErrorKind::NestingTooDeep => report(e.kind.to_string(), "limit reached here")
                    .with_help(format!("values may nest at most {} levels deep", stanza_parse::MAX_DEPTH)),
            },
        }
    }
}

impl From<LexError> for SyntaxError {
    fn from(e: LexError) -> Self {
        SyntaxError::Lex(e)
    }
}

impl From<ParseError> for SyntaxError {
    fn from(e: ParseError) -> Self {
        SyntaxError::Parse(e)
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxError::Lex(e) => write!(f, "{e}"),
            SyntaxError::Parse(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SyntaxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyntaxError::Lex(e) => Some(e),
            SyntaxError::Parse(e) => Some(e),
        }
    }
}
