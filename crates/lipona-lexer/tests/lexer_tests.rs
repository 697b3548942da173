//! Lexer tests: reserved words, operators, literals, string segments,
//! comments, error codes, recovery and determinism.

use lipona_lexer::{Lexer, TokenKind, ALL_KEYWORDS};
use lipona_types::ast::StringPart;
use lipona_types::{ErrorCode, SourceFile, Span};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Lex source text and return just the token kinds (excluding final Eof).
fn kinds(source: &str) -> Vec<TokenKind> {
    let sf = SourceFile::new("test.lipo", source);
    let result = Lexer::new(&sf).lex();
    result
        .tokens
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| t.kind)
        .collect()
}

/// Lex and return the error codes in discovery order.
fn error_codes(source: &str) -> Vec<ErrorCode> {
    let sf = SourceFile::new("test.lipo", source);
    let result = Lexer::new(&sf).lex();
    result.errors.errors.iter().map(|e| e.code).collect()
}

/// Lex a single string literal and return its segments.
fn string_parts(source: &str) -> Vec<StringPart> {
    match kinds(source).as_slice() {
        [TokenKind::String(parts)] => parts.clone(),
        other => panic!("expected one string token, got {other:?}"),
    }
}

fn lit(s: &str) -> StringPart {
    StringPart::Literal(s.to_string())
}

fn ident(s: &str) -> TokenKind {
    TokenKind::Identifier(s.to_string())
}

// ─────────────────────────────────────────────────────────────────────
// Reserved words
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_every_reserved_word_lexes_to_keyword() {
    for &kw in ALL_KEYWORDS {
        let k = kinds(kw);
        assert_eq!(k.len(), 1, "keyword '{kw}'");
        assert!(k[0].is_keyword(), "'{kw}' should lex as a keyword");
    }
}

#[test]
fn test_compound_comparisons_are_single_tokens() {
    assert_eq!(
        kinds("a suli_sama b lili_sama c"),
        vec![
            ident("a"),
            TokenKind::SuliSama,
            ident("b"),
            TokenKind::LiliSama,
            ident("c"),
        ]
    );
}

#[test]
fn test_keyword_prefix_is_identifier() {
    assert_eq!(kinds("jon"), vec![ident("jon")]);
    assert_eq!(kinds("pini_"), vec![ident("pini_")]);
    assert_eq!(kinds("suli_samaa"), vec![ident("suli_samaa")]);
}

#[test]
fn test_keywords_are_case_sensitive() {
    assert_eq!(kinds("Jo PINI"), vec![ident("Jo"), ident("PINI")]);
}

#[test]
fn test_stdlib_names_are_plain_identifiers() {
    assert_eq!(
        kinds("toki kulupu_sin nasin_ken"),
        vec![ident("toki"), ident("kulupu_sin"), ident("nasin_ken")]
    );
}

#[test]
fn test_underscore_identifiers() {
    assert_eq!(kinds("_ _x a_1"), vec![ident("_"), ident("_x"), ident("a_1")]);
}

// ─────────────────────────────────────────────────────────────────────
// Operators & punctuation
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_operators_and_punctuation() {
    assert_eq!(
        kinds("+ - * / ( ) ,"),
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::Comma,
        ]
    );
}

#[test]
fn test_call_tokens_without_spaces() {
    assert_eq!(
        kinds("sum(a,b)"),
        vec![
            ident("sum"),
            TokenKind::LParen,
            ident("a"),
            TokenKind::Comma,
            ident("b"),
            TokenKind::RParen,
        ]
    );
}

#[test]
fn test_minus_before_number_is_separate_token() {
    assert_eq!(kinds("-5"), vec![TokenKind::Minus, TokenKind::Number(5.0)]);
}

// ─────────────────────────────────────────────────────────────────────
// Numbers
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_integer_and_decimal_numbers() {
    assert_eq!(
        kinds("0 42 3.14 007"),
        vec![
            TokenKind::Number(0.0),
            TokenKind::Number(42.0),
            TokenKind::Number(3.14),
            TokenKind::Number(7.0),
        ]
    );
}

#[test]
fn test_trailing_dot_is_not_part_of_number() {
    // `.` alone is not a Lipona character
    assert_eq!(kinds("1.").first(), Some(&TokenKind::Number(1.0)));
    assert_eq!(error_codes("1."), vec![ErrorCode::UNEXPECTED_CHARACTER]);
}

#[test]
fn test_number_followed_by_letters_is_invalid() {
    assert_eq!(error_codes("12abc"), vec![ErrorCode::INVALID_NUMBER]);
    assert!(kinds("12abc").is_empty());
}

// ─────────────────────────────────────────────────────────────────────
// Whitespace & comments
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_newlines_are_whitespace() {
    assert_eq!(
        kinds("x\n\n  jo\r\n\t1"),
        vec![ident("x"), TokenKind::Jo, TokenKind::Number(1.0)]
    );
}

#[test]
fn test_line_comment_is_discarded() {
    assert_eq!(
        kinds("x jo 1 // set x\n// whole line\ntoki(x)"),
        vec![
            ident("x"),
            TokenKind::Jo,
            TokenKind::Number(1.0),
            ident("toki"),
            TokenKind::LParen,
            ident("x"),
            TokenKind::RParen,
        ]
    );
}

#[test]
fn test_comment_at_end_of_file() {
    assert_eq!(kinds("pini // done"), vec![TokenKind::Pini]);
}

#[test]
fn test_slash_is_division_not_comment() {
    assert_eq!(
        kinds("a / b"),
        vec![ident("a"), TokenKind::Slash, ident("b")]
    );
}

#[test]
fn test_comment_inside_string_is_text() {
    assert_eq!(string_parts("\"a // b\""), vec![lit("a // b")]);
}

// ─────────────────────────────────────────────────────────────────────
// Strings
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_plain_string() {
    assert_eq!(string_parts("\"toki!\""), vec![lit("toki!")]);
}

#[test]
fn test_empty_string_has_no_parts() {
    assert_eq!(string_parts("\"\""), Vec::<StringPart>::new());
}

#[test]
fn test_escapes_are_resolved() {
    assert_eq!(
        string_parts(r#""a\nb\tc\rd\\e\"f\{g\}""#),
        vec![lit("a\nb\tc\rd\\e\"f{g}")]
    );
}

#[test]
fn test_escaped_braces_do_not_start_segment() {
    assert_eq!(string_parts(r#""\{name\}""#), vec![lit("{name}")]);
}

#[test]
fn test_interpolation_segments() {
    let parts = string_parts("\"toki, {name}!\"");
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], lit("toki, "));
    assert!(matches!(&parts[1], StringPart::Code { source, .. } if source == "name"));
    assert_eq!(parts[2], lit("!"));
}

#[test]
fn test_interpolation_keeps_raw_expression_source() {
    let parts = string_parts("\"{a + b * 2}\"");
    assert!(matches!(&parts[0], StringPart::Code { source, .. } if source == "a + b * 2"));
}

#[test]
fn test_interpolation_skips_nested_strings() {
    let parts = string_parts(r#""x{sitelen_len("}")}y""#);
    assert_eq!(parts.len(), 3);
    assert!(
        matches!(&parts[1], StringPart::Code { source, .. } if source == r#"sitelen_len("}")"#)
    );
    assert_eq!(parts[2], lit("y"));
}

#[test]
fn test_adjacent_interpolations() {
    let parts = string_parts("\"{a}{b}\"");
    assert_eq!(parts.len(), 2);
    assert!(parts.iter().all(|p| matches!(p, StringPart::Code { .. })));
}

#[test]
fn test_string_may_span_lines() {
    assert_eq!(string_parts("\"a\nb\""), vec![lit("a\nb")]);
}

#[test]
fn test_unicode_string_content() {
    assert_eq!(string_parts("\"jan pona ☺\""), vec![lit("jan pona ☺")]);
}

#[test]
fn test_code_segment_span_on_later_line() {
    let parts = string_parts("\n  \"n: {count}\"");
    assert_eq!(
        parts[1],
        StringPart::Code {
            source: "count".into(),
            span: Span::new(2, 8, 2, 12),
        }
    );
}

// ─────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_unterminated_string() {
    assert_eq!(error_codes("\"abc"), vec![ErrorCode::UNTERMINATED_STRING]);
}

#[test]
fn test_invalid_escape() {
    assert_eq!(error_codes(r#""a\qb""#), vec![ErrorCode::INVALID_ESCAPE]);
    // The bad escape is dropped; the rest of the literal survives.
    assert_eq!(string_parts(r#""a\qb""#), vec![lit("ab")]);
}

#[test]
fn test_unterminated_interpolation() {
    assert_eq!(
        error_codes("\"a {b"),
        vec![ErrorCode::UNTERMINATED_INTERPOLATION]
    );
}

#[test]
fn test_empty_interpolation() {
    assert_eq!(error_codes("\"a {} b\""), vec![ErrorCode::EMPTY_INTERPOLATION]);
    assert_eq!(error_codes("\"{   }\""), vec![ErrorCode::EMPTY_INTERPOLATION]);
}

#[test]
fn test_bare_braces_outside_strings_are_illegal() {
    assert_eq!(
        error_codes("{ }"),
        vec![ErrorCode::UNEXPECTED_CHARACTER, ErrorCode::UNEXPECTED_CHARACTER]
    );
}

#[test]
fn test_symbolic_comparisons_are_illegal() {
    let sf = SourceFile::new("test.lipo", "a == b");
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.errors.total_errors, 2);
    let err = &result.errors.errors[0];
    assert_eq!(err.code, ErrorCode::UNEXPECTED_CHARACTER);
    assert!(err.suggestion.as_deref().unwrap_or("").contains("sama"));
}

#[test]
fn test_error_carries_position_and_source_line() {
    let sf = SourceFile::new("prog.lipo", "x jo 1\ny jo 2 $ 3");
    let result = Lexer::new(&sf).lex();
    let err = &result.errors.errors[0];
    assert_eq!(err.file, "prog.lipo");
    assert_eq!(err.span, Span::new(2, 8, 2, 8));
    assert_eq!(err.source_line, "y jo 2 $ 3");
    assert_eq!(err.message, "unexpected character '$'");
}

#[test]
fn test_recovery_collects_multiple_errors() {
    assert_eq!(
        error_codes("a $ b % \"c\\q\""),
        vec![
            ErrorCode::UNEXPECTED_CHARACTER,
            ErrorCode::UNEXPECTED_CHARACTER,
            ErrorCode::INVALID_ESCAPE,
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Whole programs
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_function_definition_tokens() {
    let src = "ilo sum (a, b) open\n  pana a + b\npini";
    assert_eq!(
        kinds(src),
        vec![
            TokenKind::Ilo,
            ident("sum"),
            TokenKind::LParen,
            ident("a"),
            TokenKind::Comma,
            ident("b"),
            TokenKind::RParen,
            TokenKind::Open,
            TokenKind::Pana,
            ident("a"),
            TokenKind::Plus,
            ident("b"),
            TokenKind::Pini,
        ]
    );
}

#[test]
fn test_if_else_tokens() {
    let src = "x suli 3 la open toki(x) pini taso open toki(0) pini";
    let k = kinds(src);
    assert_eq!(k[1], TokenKind::Suli);
    assert_eq!(k[3], TokenKind::La);
    assert_eq!(k[4], TokenKind::Open);
    assert!(k.contains(&TokenKind::Taso));
    assert_eq!(k.last(), Some(&TokenKind::Pini));
}

#[test]
fn test_eof_span_after_last_token() {
    let sf = SourceFile::new("test.lipo", "x\ny");
    let result = Lexer::new(&sf).lex();
    let eof = result.tokens.last().unwrap();
    assert_eq!(eof.kind, TokenKind::Eof);
    assert_eq!(eof.span, Span::point(2, 2));
}

#[test]
fn test_lexer_determinism_100_iterations() {
    let src = "ilo f (n) open\n  pana \"n: {n + 1}\"\npini\nwile x lili 3 la open x jo x + 1 pini";
    let sf = SourceFile::new("test.lipo", src);
    let first = Lexer::new(&sf).lex().tokens;
    for _ in 0..100 {
        let again = Lexer::new(&sf).lex().tokens;
        assert_eq!(first, again);
    }
}
