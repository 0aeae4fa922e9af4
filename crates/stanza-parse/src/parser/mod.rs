//! Backtracking recursive-descent parser for Stanza.
//!
//! Every production either matches and advances the cursor, reports "no
//! match" (`Ok(None)`) with the cursor back where it started, or fails the
//! whole parse with a [`ParseError`]. Productions never copy tokens; they
//! only move the cursor over the shared slice.

use stanza_tokenizer::{Span, Token, TokenKind};
use tracing::trace;

use crate::{ParseError, ParseErrorKind, SequenceStyle, Syntax, SyntaxEntry, TokenRange};

type Production = Result<Option<Syntax>, ParseError>;

/// Deepest chain of nested productions accepted before the parse fails with
/// [`ParseErrorKind::NestingTooDeep`]. Keeps the recursion well inside the
/// stack of a default thread.
pub const MAX_DEPTH: usize = 128;

/// Parser over a tokenized document.
#[derive(Clone)]
pub struct Parser<'a> {
    source: &'a str,
    tokens: &'a [Token],
    cursor: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser over `tokens`, which must have been produced from
    /// `source`.
    pub fn new(source: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            source,
            tokens,
            cursor: 0,
            depth: 0,
        }
    }

    /// Current token index.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Parse the whole document as one mapping.
    pub fn parse_document(&mut self) -> Result<Syntax, ParseError> {
        let Some(root) = self.try_mapping()? else {
            let at = self.lookahead(|p| {
                p.skip_layout();
                p.peek()
            });
            return Err(self.error(ParseErrorKind::ExpectedMapping, at.span));
        };

        self.skip_layout();
        let rest = self.peek();
        if rest.kind != TokenKind::Eof {
            return Err(self.error(ParseErrorKind::TrailingContent, rest.span));
        }
        Ok(root)
    }

    // --- cursor primitives ---

    fn peek(&self) -> Token {
        self.tokens
            .get(self.cursor)
            .or(self.tokens.last())
            .copied()
            .unwrap_or_else(|| {
                Token::new(TokenKind::Eof, 0, Span::empty(self.source.len() as u32))
            })
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.cursor += 1;
        }
        token
    }

    fn skip_whitespace(&mut self) {
        while self.peek().kind == TokenKind::Whitespace {
            self.advance();
        }
    }

    fn skip_layout(&mut self) {
        while self.peek().kind.is_layout() {
            self.advance();
        }
    }

    /// Skip whitespace and blank lines, then return the column of the first
    /// content token reached. At the start of a line this is the width of
    /// its leading whitespace run.
    fn skip_to_content(&mut self) -> u32 {
        self.skip_layout();
        self.column(self.peek())
    }

    fn column(&self, token: Token) -> u32 {
        let start = (token.span.start as usize).min(self.source.len());
        let prefix = self.source.get(..start).unwrap_or_default();
        let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
        prefix[line_start..].chars().count() as u32
    }

    fn range_from(&self, start: usize) -> TokenRange {
        TokenRange::new(start as u32, self.cursor as u32)
    }

    fn error(&self, kind: ParseErrorKind, span: Span) -> ParseError {
        trace!("parse error {:?} at {:?}", kind, span);
        ParseError::new(kind, span, self.source)
    }

    /// The rest of the line must be blank.
    fn expect_line_end(&mut self) -> Result<(), ParseError> {
        self.skip_whitespace();
        let next = self.peek();
        match next.kind {
            TokenKind::Newline | TokenKind::Eof => Ok(()),
            _ => Err(self.error(ParseErrorKind::TrailingContent, next.span)),
        }
    }

    // --- speculation ---

    /// Run a production speculatively: unless it matches, the cursor is
    /// restored to where it was. Every production goes through here, so this
    /// is also where nesting depth is bounded.
    fn attempt<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<Option<T>, ParseError>,
    ) -> Result<Option<T>, ParseError> {
        if self.depth >= MAX_DEPTH {
            let at = self.lookahead(|p| {
                p.skip_layout();
                p.peek()
            });
            return Err(self.error(ParseErrorKind::NestingTooDeep, at.span));
        }

        let saved = self.cursor;
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        if !matches!(result, Ok(Some(_))) {
            self.cursor = saved;
        }
        result
    }

    /// Run `f` for measurement only; the cursor is always restored.
    fn lookahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.cursor;
        let result = f(self);
        self.cursor = saved;
        result
    }

    // --- productions ---

    fn try_scalar(&mut self) -> Production {
        self.attempt(|p| {
            p.skip_whitespace();
            let start = p.cursor;
            let token = p.peek();
            if !token.kind.is_scalar() {
                return Ok(None);
            }
            p.advance();
            trace!("scalar {:?} at token {}", token.text(p.source), start);
            Ok(Some(Syntax::Scalar {
                tokens: p.range_from(start),
            }))
        })
    }

    fn try_bracket_sequence(&mut self) -> Production {
        self.attempt(|p| {
            p.skip_whitespace();
            let start = p.cursor;
            let open = p.peek();
            if open.kind != TokenKind::LBracket {
                return Ok(None);
            }
            p.advance();
            trace!("bracket sequence at token {}", start);

            let mut items = Vec::new();
            loop {
                p.skip_layout();
                match p.peek().kind {
                    TokenKind::Eof => {
                        return Err(p.error(ParseErrorKind::UnclosedSequence, open.span));
                    }
                    TokenKind::RBracket => {
                        p.advance();
                        break;
                    }
                    _ => {}
                }

                let item = match p.try_bracket_sequence()? {
                    Some(item) => item,
                    None => match p.try_scalar()? {
                        Some(item) => item,
                        None => {
                            let at = p.peek();
                            return Err(p.error(ParseErrorKind::ExpectedValue, at.span));
                        }
                    },
                };
                items.push(item);

                p.skip_layout();
                let separator = p.peek();
                match separator.kind {
                    TokenKind::Comma => {
                        p.advance();
                    }
                    TokenKind::RBracket => {
                        p.advance();
                        break;
                    }
                    TokenKind::Eof => {
                        return Err(p.error(ParseErrorKind::UnclosedSequence, open.span));
                    }
                    _ => {
                        return Err(p.error(ParseErrorKind::ExpectedSeparator, separator.span));
                    }
                }
            }

            trace!("bracket sequence with {} items", items.len());
            Ok(Some(Syntax::Sequence {
                items,
                style: SequenceStyle::Bracket,
                tokens: p.range_from(start),
            }))
        })
    }

    /// Parse the value on the lines below a key or a bare dash, whose line
    /// sits at column `indent`. The cursor is on the newline ending that
    /// line. A following line that is not deeper leaves the value Empty.
    fn nested_block(&mut self, indent: u32) -> Result<Syntax, ParseError> {
        let (next_indent, next) = self.lookahead(|p| (p.skip_to_content(), p.peek()));
        trace!("nested block: indent {} -> {}", indent, next_indent);

        if next.kind == TokenKind::Eof || next_indent <= indent {
            return Ok(Syntax::Empty {
                tokens: TokenRange::empty(self.cursor as u32),
            });
        }

        let value = if next.kind == TokenKind::Dash {
            self.try_dash_sequence()?
        } else {
            self.try_mapping()?
        };
        value.ok_or_else(|| self.error(ParseErrorKind::ExpectedValue, next.span))
    }

    fn try_dash_sequence(&mut self) -> Production {
        self.attempt(|p| {
            let start = p.cursor;
            let indent = p.lookahead(|p| p.skip_to_content());
            trace!("dash sequence at token {} with indent {}", start, indent);

            let mut items = Vec::new();
            loop {
                let line_start = p.cursor;
                let this_indent = p.skip_to_content();
                if p.at_eof() || this_indent < indent {
                    p.cursor = line_start;
                    break;
                }

                if this_indent > indent {
                    p.cursor = line_start;
                    let item = match p.try_dash_sequence()? {
                        Some(item) => item,
                        None => match p.try_mapping()? {
                            Some(item) => item,
                            None => {
                                let at = p.lookahead(|p| {
                                    p.skip_layout();
                                    p.peek()
                                });
                                return Err(p.error(ParseErrorKind::ExpectedValue, at.span));
                            }
                        },
                    };
                    items.push(item);
                    continue;
                }

                let dash = p.peek();
                if dash.kind != TokenKind::Dash {
                    if items.is_empty() {
                        return Ok(None);
                    }
                    return Err(p.error(ParseErrorKind::ExpectedDash, dash.span));
                }
                p.advance();
                p.skip_whitespace();

                let next = p.peek();
                let item = match next.kind {
                    TokenKind::Eof => {
                        return Err(p.error(ParseErrorKind::UnexpectedEof, next.span));
                    }
                    TokenKind::Newline => p.nested_block(indent)?,
                    TokenKind::Dash => match p.try_dash_sequence()? {
                        Some(item) => item,
                        None => return Err(p.error(ParseErrorKind::ExpectedValue, next.span)),
                    },
                    _ => {
                        let item = match p.try_bracket_sequence()? {
                            Some(item) => item,
                            None => match p.try_scalar()? {
                                Some(item) => item,
                                None => {
                                    return Err(p.error(ParseErrorKind::ExpectedValue, next.span));
                                }
                            },
                        };
                        p.expect_line_end()?;
                        item
                    }
                };
                items.push(item);
            }

            if items.is_empty() {
                return Ok(None);
            }
            trace!("dash sequence with {} items", items.len());
            Ok(Some(Syntax::Sequence {
                items,
                style: SequenceStyle::Dash,
                tokens: p.range_from(start),
            }))
        })
    }

    fn try_mapping(&mut self) -> Production {
        self.attempt(|p| {
            let start = p.cursor;
            let indent = p.lookahead(|p| p.skip_to_content());
            trace!("mapping at token {} with indent {}", start, indent);

            let mut entries = Vec::new();
            loop {
                let line_start = p.cursor;
                let this_indent = p.skip_to_content();
                if p.at_eof() || this_indent < indent {
                    p.cursor = line_start;
                    break;
                }

                let key = p.peek();
                if key.kind != TokenKind::Ident {
                    if entries.is_empty() {
                        return Ok(None);
                    }
                    return Err(p.error(ParseErrorKind::ExpectedKey, key.span));
                }
                let key_index = p.cursor as u32;
                p.advance();

                let colon = p.peek();
                if colon.kind != TokenKind::Colon {
                    return Err(p.error(ParseErrorKind::MissingColon, colon.span));
                }
                p.advance();
                p.skip_whitespace();

                let next = p.peek();
                trace!("key {:?}, value starts with {:?}", key.text(p.source), next.kind);
                let value = match next.kind {
                    TokenKind::Eof => Syntax::Empty {
                        tokens: TokenRange::empty(p.cursor as u32),
                    },
                    TokenKind::Newline => p.nested_block(indent)?,
                    TokenKind::LBracket => {
                        let value = match p.try_bracket_sequence()? {
                            Some(value) => value,
                            None => return Err(p.error(ParseErrorKind::ExpectedValue, next.span)),
                        };
                        p.expect_line_end()?;
                        value
                    }
                    _ => {
                        let value = match p.try_scalar()? {
                            Some(value) => value,
                            None => return Err(p.error(ParseErrorKind::ExpectedValue, next.span)),
                        };
                        p.expect_line_end()?;
                        value
                    }
                };
                entries.push(SyntaxEntry {
                    key: key_index,
                    value,
                });
            }

            if entries.is_empty() {
                return Ok(None);
            }
            trace!("mapping with {} entries", entries.len());
            Ok(Some(Syntax::Mapping {
                entries,
                tokens: p.range_from(start),
            }))
        })
    }
}

#[cfg(test)]
mod tests;
