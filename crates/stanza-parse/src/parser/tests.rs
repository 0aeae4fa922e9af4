use super::*;
use stanza_tokenizer::tokenize;

fn show(syntax: &Syntax, source: &str, tokens: &[Token]) -> String {
    match syntax {
        Syntax::Mapping { entries, .. } => {
            let entries: Vec<_> = entries
                .iter()
                .map(|e| {
                    format!(
                        "{}: {}",
                        e.key_text(source, tokens),
                        show(&e.value, source, tokens)
                    )
                })
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        Syntax::Sequence { items, style, .. } => {
            let items: Vec<_> = items.iter().map(|i| show(i, source, tokens)).collect();
            let marker = match style {
                SequenceStyle::Bracket => "",
                SequenceStyle::Dash => "-",
            };
            format!("{marker}[{}]", items.join(", "))
        }
        Syntax::Scalar { tokens: range } => range.span(tokens).slice(source).to_string(),
        Syntax::Empty { .. } => "~".to_string(),
    }
}

fn parse(source: &str) -> String {
    let tokens = tokenize(source).unwrap();
    let syntax = Parser::new(source, &tokens).parse_document().unwrap();
    show(&syntax, source, &tokens)
}

fn parse_err(source: &str) -> ParseError {
    let tokens = tokenize(source).unwrap();
    Parser::new(source, &tokens).parse_document().unwrap_err()
}

#[test]
fn test_inline_values() {
    insta::assert_snapshot!(parse("c: 2\nasd: [1,2]\n"), @"{c: 2, asd: [1, 2]}");
}

#[test]
fn test_nested_dash_sequence() {
    insta::assert_snapshot!(
        parse("f:\n - 1\n -\n  - 2\n  - 3\n"),
        @"{f: -[1, -[2, 3]]}"
    );
}

#[test]
fn test_nested_mappings() {
    insta::assert_snapshot!(
        parse("a:\n  b: 1\n  c:\n    d: x\ne: \"s\"\n"),
        @r#"{a: {b: 1, c: {d: x}}, e: "s"}"#
    );
}

#[test]
fn test_empty_values() {
    insta::assert_snapshot!(parse("a:\nb: 1\n"), @"{a: ~, b: 1}");
    insta::assert_snapshot!(parse("a:"), @"{a: ~}");
    insta::assert_snapshot!(parse("a:\n\n   # nothing\n"), @"{a: ~}");
    insta::assert_snapshot!(parse("a:\n  b:\nc: 1\n"), @"{a: {b: ~}, c: 1}");
}

#[test]
fn test_comments_and_blank_lines() {
    insta::assert_snapshot!(
        parse("# header\n\na: 1 # trailing\n\n\nb: [x, y] # c\n"),
        @"{a: 1, b: [x, y]}"
    );
}

#[test]
fn test_bracket_sequences() {
    insta::assert_snapshot!(
        parse("m: [[1, 2], [3],\n  4, ]\n"),
        @"{m: [[1, 2], [3], 4]}"
    );
    insta::assert_snapshot!(parse("m: []\n"), @"{m: []}");
}

#[test]
fn test_dash_sequence_items() {
    insta::assert_snapshot!(parse("l:\n  - [1, 2]\n  - x\n"), @"{l: -[[1, 2], x]}");
    insta::assert_snapshot!(parse("l:\n  - 1\n    k: v\n"), @"{l: -[1, {k: v}]}");
    insta::assert_snapshot!(parse("l:\n - - 1\n   - 2\n - 3\n"), @"{l: -[-[1, 2], 3]}");
}

#[test]
fn test_deeper_sibling_joins_enclosing_mapping() {
    // `b` is shallower than `q` but deeper than `a`, so it belongs to the root.
    insta::assert_snapshot!(
        parse("a:\n   q: \"str\"\n  b: 1.1e2\n"),
        @r#"{a: {q: "str"}, b: 1.1e2}"#
    );
}

#[test]
fn test_indented_root_and_crlf() {
    insta::assert_snapshot!(parse("  a: 1\n  b: 2\n"), @"{a: 1, b: 2}");
    insta::assert_snapshot!(parse("a: 1\r\nb:\r\n  - x\r\n"), @"{a: 1, b: -[x]}");
}

#[test]
fn test_scalar_token_ranges() {
    let source = "c: 2\nasd: [1,2]\n";
    let tokens = tokenize(source).unwrap();
    let Syntax::Mapping { entries, .. } = Parser::new(source, &tokens).parse_document().unwrap()
    else {
        panic!("expected mapping");
    };
    assert_eq!(entries[0].value.tokens().tokens(&tokens).len(), 1);
    assert_eq!(entries[0].value.tokens().span(&tokens).slice(source), "2");
    assert_eq!(entries[1].value.tokens().span(&tokens).slice(source), "[1,2]");
}

#[test]
fn test_failed_productions_restore_cursor() {
    let source = "- 1\n";
    let tokens = tokenize(source).unwrap();
    let mut parser = Parser::new(source, &tokens);
    assert!(parser.try_mapping().unwrap().is_none());
    assert_eq!(parser.position(), 0);
    assert!(parser.try_bracket_sequence().unwrap().is_none());
    assert_eq!(parser.position(), 0);

    let source = "  x: 1";
    let tokens = tokenize(source).unwrap();
    let mut parser = Parser::new(source, &tokens);
    assert!(parser.try_dash_sequence().unwrap().is_none());
    assert!(parser.try_scalar().unwrap().is_some());
    assert_eq!(parser.position(), 2);
}

#[test]
fn test_unclosed_sequence_points_at_bracket() {
    let err = parse_err("a: [1,2");
    assert_eq!(err.kind, ParseErrorKind::UnclosedSequence);
    assert_eq!(err.span.start, 3);
    assert_eq!(err.context.line, 1);
    assert_eq!(err.context.column, 4);
    assert_eq!(err.context.current.text, "a: [1,2");
}

#[test]
fn test_structural_errors() {
    assert_eq!(parse_err("a 1").kind, ParseErrorKind::MissingColon);
    assert_eq!(parse_err("a 1").span.start, 1);

    assert_eq!(parse_err("a: 1\n- 2\n").kind, ParseErrorKind::ExpectedKey);
    assert_eq!(parse_err("a: 1\n- 2\n").span.start, 5);

    assert_eq!(parse_err("a: 1 2\n").kind, ParseErrorKind::TrailingContent);
    assert_eq!(parse_err("a: x:").kind, ParseErrorKind::TrailingContent);
    assert_eq!(parse_err("  a: 1\nb: 2\n").kind, ParseErrorKind::TrailingContent);
    assert_eq!(parse_err("  a: 1\nb: 2\n").span.start, 7);

    assert_eq!(parse_err("a: [1 2]").kind, ParseErrorKind::ExpectedSeparator);
    assert_eq!(parse_err("a: [1 2]").span.start, 6);

    assert_eq!(parse_err("a: [1, :]").kind, ParseErrorKind::ExpectedValue);
    assert_eq!(parse_err("a: [1, :]").span.start, 7);

    assert_eq!(parse_err("l:\n  - 1\n  x: 2\n").kind, ParseErrorKind::ExpectedDash);
    assert_eq!(parse_err("l:\n  - 1\n  x: 2\n").span.start, 11);

    assert_eq!(parse_err("l:\n  - ").kind, ParseErrorKind::UnexpectedEof);
}

#[test]
fn test_documents_without_mapping() {
    assert_eq!(parse_err("").kind, ParseErrorKind::ExpectedMapping);
    assert_eq!(parse_err("# only a comment\n\n").kind, ParseErrorKind::ExpectedMapping);
    assert_eq!(parse_err("- 1\n").kind, ParseErrorKind::ExpectedMapping);
    assert_eq!(parse_err("[1]").kind, ParseErrorKind::ExpectedMapping);
}

#[test]
fn test_nesting_limit() {
    let nested = |depth: usize| format!("a: {}1{}\n", "[".repeat(depth), "]".repeat(depth));
    assert_eq!(parse(&nested(3)), "{a: [[[1]]]}");
    parse(&nested(100));

    let err = parse_err(&format!("a: {}{}\n", "[".repeat(5_000), "]".repeat(5_000)));
    assert_eq!(err.kind, ParseErrorKind::NestingTooDeep);
    // The first `[` is at offset 3; the limit is hit one production short
    // of MAX_DEPTH because the root mapping counts as a level.
    assert_eq!(err.span.start as usize, 3 + MAX_DEPTH - 1);
    assert_eq!(err.kind.to_string(), "nesting too deep");
}

#[test]
fn test_nesting_limit_in_blocks() {
    let dashes = format!("a:\n  {}1\n", "- ".repeat(5_000));
    assert_eq!(parse_err(&dashes).kind, ParseErrorKind::NestingTooDeep);

    let mappings: String = (0..1_000).map(|i| format!("{}k:\n", " ".repeat(i))).collect();
    assert_eq!(parse_err(&mappings).kind, ParseErrorKind::NestingTooDeep);

    let shallow: String = (0..50).map(|i| format!("{}k:\n", " ".repeat(i))).collect();
    parse(&shallow);
}

#[test]
fn test_error_display() {
    let err = parse_err("a: 1\nb: [x\n");
    insta::assert_snapshot!(err.kind.to_string(), @"unclosed sequence");
    assert!(err.to_string().starts_with("unclosed sequence at offset 8 (line 2, column 4)"));
}
