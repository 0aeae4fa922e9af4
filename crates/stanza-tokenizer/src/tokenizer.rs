//! Tokenizer for the Stanza configuration language.

use crate::{LexError, LexErrorKind, Span, Token, TokenKind};
use tracing::trace;

/// A tokenizer that produces tokens from Stanza source text.
///
/// Iterating yields every token up to, but not including, the end-of-input
/// token, and stops after the first error.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
    /// Set once end of input or an error has been returned by the iterator.
    done: bool,
}

impl<'src> Tokenizer<'src> {
    /// Create a new tokenizer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
            done: false,
        }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    fn token(&self, kind: TokenKind, width: u32, start: u32) -> Token {
        let span = Span::new(start, self.pos);
        trace!("Token {:?} at {:?}: {:?}", kind, span, span.slice(self.source));
        Token::new(kind, width, span)
    }

    fn error(&self, kind: LexErrorKind, start: u32) -> LexError {
        let end = self.pos.max(start + self.peek().map_or(0, |c| c.len_utf8() as u32));
        LexError::new(kind, Span::new(start, end), self.source)
    }

    /// Get the next token, skipping comments.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        loop {
            let start = self.pos;
            let Some(c) = self.peek() else {
                return Ok(self.token(TokenKind::Eof, 0, start));
            };

            return match c {
                '#' => {
                    self.skip_comment();
                    continue;
                }
                ' ' | '\t' => Ok(self.tokenize_whitespace()),
                '\n' => {
                    self.advance();
                    Ok(self.token(TokenKind::Newline, 0, start))
                }
                '\r' if self.peek_nth(1) == Some('\n') => {
                    self.advance();
                    self.advance();
                    Ok(self.token(TokenKind::Newline, 0, start))
                }
                ':' => Ok(self.single(TokenKind::Colon)),
                ',' => Ok(self.single(TokenKind::Comma)),
                '[' => Ok(self.single(TokenKind::LBracket)),
                ']' => Ok(self.single(TokenKind::RBracket)),
                '"' => self.tokenize_quoted(),
                '-' if matches!(self.peek_nth(1), None | Some(' ' | '\t' | '\n' | '\r')) => {
                    Ok(self.single(TokenKind::Dash))
                }
                '-' | '.' | '0'..='9' => self.tokenize_number(),
                c if c.is_ascii_alphabetic() => Ok(self.tokenize_ident()),
                c => Err(self.error(LexErrorKind::UnexpectedChar(c), start)),
            };
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.pos;
        self.advance();
        self.token(kind, 0, start)
    }

    /// Consume a `#` comment up to, not including, the newline.
    fn skip_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' || (c == '\r' && self.peek_nth(1) == Some('\n')) {
                break;
            }
            self.advance();
        }
    }

    fn tokenize_whitespace(&mut self) -> Token {
        let start = self.pos;
        let mut width = 0;
        while let Some(' ' | '\t') = self.peek() {
            self.advance();
            width += 1;
        }
        self.token(TokenKind::Whitespace, width, start)
    }

    fn tokenize_ident(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek()
            && c.is_ascii_alphanumeric()
        {
            self.advance();
        }
        self.token(TokenKind::Ident, 0, start)
    }

    /// A quoted string runs to the next `"` not preceded by a backslash.
    /// The token keeps both quotes and any escapes verbatim.
    fn tokenize_quoted(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        self.advance();
        loop {
            match self.advance() {
                Some('"') => return Ok(self.token(TokenKind::Quoted, 0, start)),
                Some('\\') => {
                    self.advance();
                }
                Some(_) => {}
                None => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedString,
                        Span::new(start, start + 1),
                        self.source,
                    ));
                }
            }
        }
    }

    fn tokenize_number(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }

        let mut seen_point = false;
        let mut seen_exponent = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {
                    self.advance();
                }
                '.' => {
                    if seen_point {
                        return Err(self.error(LexErrorKind::RepeatedDecimalPoint, self.pos));
                    }
                    seen_point = true;
                    self.advance();
                }
                'e' | 'E' => {
                    if seen_exponent {
                        return Err(self.error(LexErrorKind::RepeatedExponent, self.pos));
                    }
                    seen_exponent = true;
                    self.advance();
                    if let Some('+' | '-') = self.peek() {
                        self.advance();
                    }
                }
                '#' | ',' | ']' | ' ' | '\t' | '\n' | '\r' => break,
                c => return Err(self.error(LexErrorKind::UnexpectedCharInNumber(c), self.pos)),
            }
        }

        Ok(self.token(TokenKind::Number, 0, start))
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => {
                self.done = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Tokenize a whole document.
///
/// The returned sequence always ends with exactly one [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token()?;
        tokens.push(token);
        if token.kind == TokenKind::Eof {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<(TokenKind, &str)> {
        Tokenizer::new(source)
            .map(|t| t.map(|t| (t.kind, t.text(source))))
            .collect::<Result<_, _>>()
            .unwrap()
    }

    fn lex_err(source: &str) -> LexError {
        tokenize(source).unwrap_err()
    }

    fn dump(source: &str) -> String {
        tokenize(source)
            .unwrap()
            .iter()
            .map(|t| match t.kind {
                TokenKind::Whitespace => format!("Whitespace({})", t.width),
                TokenKind::Newline | TokenKind::Eof => format!("{:?}", t.kind),
                kind => format!("{kind:?}({})", t.text(source)),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_structural_tokens() {
        assert_eq!(lex(":"), vec![(TokenKind::Colon, ":")]);
        assert_eq!(lex(","), vec![(TokenKind::Comma, ",")]);
        assert_eq!(lex("["), vec![(TokenKind::LBracket, "[")]);
        assert_eq!(lex("]"), vec![(TokenKind::RBracket, "]")]);
        assert_eq!(lex("-"), vec![(TokenKind::Dash, "-")]);
        assert_eq!(lex("\n"), vec![(TokenKind::Newline, "\n")]);
        assert_eq!(lex("\r\n"), vec![(TokenKind::Newline, "\r\n")]);
    }

    #[test]
    fn test_ident() {
        assert_eq!(lex("hello"), vec![(TokenKind::Ident, "hello")]);
        assert_eq!(lex("a1b2"), vec![(TokenKind::Ident, "a1b2")]);
        assert_eq!(lex("true"), vec![(TokenKind::Ident, "true")]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(lex("42"), vec![(TokenKind::Number, "42")]);
        assert_eq!(lex("-7"), vec![(TokenKind::Number, "-7")]);
        assert_eq!(lex(".5"), vec![(TokenKind::Number, ".5")]);
        assert_eq!(lex("1.1e2"), vec![(TokenKind::Number, "1.1e2")]);
        assert_eq!(lex("1e-3"), vec![(TokenKind::Number, "1e-3")]);
        assert_eq!(lex("2E+8"), vec![(TokenKind::Number, "2E+8")]);
    }

    #[test]
    fn test_number_terminators() {
        assert_eq!(
            lex("1,2]"),
            vec![
                (TokenKind::Number, "1"),
                (TokenKind::Comma, ","),
                (TokenKind::Number, "2"),
                (TokenKind::RBracket, "]"),
            ]
        );
        assert_eq!(lex("3#c"), vec![(TokenKind::Number, "3")]);
    }

    #[test]
    fn test_whitespace_width() {
        let tokens = tokenize(" \t  x").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Whitespace);
        assert_eq!(tokens[0].width, 4);
        assert_eq!(tokens[0].span, Span::new(0, 4));
    }

    #[test]
    fn test_dash_vs_negative_number() {
        assert_eq!(
            lex("- -1"),
            vec![
                (TokenKind::Dash, "-"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Number, "-1"),
            ]
        );
        assert_eq!(lex("-\n"), vec![(TokenKind::Dash, "-"), (TokenKind::Newline, "\n")]);
    }

    #[test]
    fn test_quoted() {
        assert_eq!(lex(r#""a b""#), vec![(TokenKind::Quoted, r#""a b""#)]);
        assert_eq!(
            lex(r#""say \"hi\"""#),
            vec![(TokenKind::Quoted, r#""say \"hi\"""#)]
        );
        assert_eq!(lex(r##""# not a comment""##).len(), 1);
    }

    #[test]
    fn test_comments_emit_nothing() {
        assert_eq!(
            lex("a # note\nb"),
            vec![
                (TokenKind::Ident, "a"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Newline, "\n"),
                (TokenKind::Ident, "b"),
            ]
        );
    }

    #[test]
    fn test_single_eof() {
        let tokens = tokenize("a: 1\n").unwrap();
        let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        assert_eq!(eofs, 1);
        assert_eq!(tokens.last().map(|t| t.span), Some(Span::empty(5)));
    }

    #[test]
    fn test_token_dump() {
        insta::assert_snapshot!(
            dump("c: 2\nasd: [1,2]\n"),
            @"Ident(c) Colon(:) Whitespace(1) Number(2) Newline Ident(asd) Colon(:) Whitespace(1) LBracket([) Number(1) Comma(,) Number(2) RBracket(]) Newline Eof"
        );
    }

    #[test]
    fn test_dash_sequence_dump() {
        insta::assert_snapshot!(
            dump("f:\n - 1\n -\n  - 2\n"),
            @"Ident(f) Colon(:) Newline Whitespace(1) Dash(-) Whitespace(1) Number(1) Newline Whitespace(1) Dash(-) Newline Whitespace(2) Dash(-) Whitespace(1) Number(2) Newline Eof"
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = lex_err("a: \"oops\n");
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
        assert_eq!(err.span.start, 3);
        assert_eq!(err.context.line, 1);
        assert_eq!(err.context.column, 4);
    }

    #[test]
    fn test_malformed_numbers() {
        assert_eq!(lex_err("1.2.3").kind, LexErrorKind::RepeatedDecimalPoint);
        assert_eq!(lex_err("1.2.3").span.start, 3);
        assert_eq!(lex_err("1e2e3").kind, LexErrorKind::RepeatedExponent);
        assert_eq!(
            lex_err("12x").kind,
            LexErrorKind::UnexpectedCharInNumber('x')
        );
        assert_eq!(lex_err("a: 5:").kind, LexErrorKind::UnexpectedCharInNumber(':'));
    }

    #[test]
    fn test_unexpected_char() {
        let err = lex_err("a: 1\nb: ?\n");
        assert_eq!(err.kind, LexErrorKind::UnexpectedChar('?'));
        assert_eq!(err.span, Span::new(8, 9));
        assert_eq!(err.context.line, 2);
        assert!(err.to_string().starts_with("unexpected character '?' at offset 8"));
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let mut tokenizer = Tokenizer::new("? a");
        assert!(matches!(tokenizer.next(), Some(Err(_))));
        assert!(tokenizer.next().is_none());
    }
}
