//! Comprehensive lexer tests for the Slate worksheet language.
//!
//! Covers: all reserved keywords, operators, literals (numeric suffixes,
//! strings, chars), comments with nesting, newline and semicolon handling,
//! edge cases, error recovery, and the 100-iteration determinism test.

use slate_lexer::{Lexer, TokenKind};
use slate_types::SourceFile;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Lex source text and return just the token kinds (excluding final Eof).
fn kinds(source: &str) -> Vec<TokenKind> {
    let sf = SourceFile::new("test.slate", source);
    let result = Lexer::new(&sf).lex();
    result
        .tokens
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| t.kind)
        .collect()
}

/// Lex and return all token kinds including Eof.
fn kinds_with_eof(source: &str) -> Vec<TokenKind> {
    let sf = SourceFile::new("test.slate", source);
    Lexer::new(&sf)
        .lex()
        .tokens
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

/// Lex and return the diagnostic count.
fn diag_count(source: &str) -> usize {
    let sf = SourceFile::new("test.slate", source);
    let result = Lexer::new(&sf).lex();
    result.diags.total
}

/// Lex and return the first diagnostic message.
fn first_diag(source: &str) -> String {
    let sf = SourceFile::new("test.slate", source);
    let result = Lexer::new(&sf).lex();
    result
        .diags
        .first()
        .map(|d| d.message.clone())
        .unwrap_or_default()
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Identifier(name.to_string())
}

// ─────────────────────────────────────────────────────────────────────
// Keywords
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_all_keywords() {
    let pairs = [
        ("val", TokenKind::Val),
        ("def", TokenKind::Def),
        ("class", TokenKind::Class),
        ("trait", TokenKind::Trait),
        ("object", TokenKind::Object),
        ("extends", TokenKind::Extends),
        ("with", TokenKind::With),
        ("new", TokenKind::New),
        ("case", TokenKind::Case),
        ("abstract", TokenKind::Abstract),
        ("if", TokenKind::If),
        ("else", TokenKind::Else),
        ("true", TokenKind::True),
        ("false", TokenKind::False),
    ];
    for (src, expected) in &pairs {
        let k = kinds(src);
        assert_eq!(k, vec![expected.clone()], "keyword '{src}'");
    }
}

#[test]
fn test_keyword_prefix_is_identifier() {
    assert_eq!(kinds("value"), vec![ident("value")]);
    assert_eq!(kinds("definition"), vec![ident("definition")]);
    assert_eq!(kinds("classy"), vec![ident("classy")]);
    assert_eq!(kinds("newer"), vec![ident("newer")]);
}

#[test]
fn test_builtin_names_are_plain_identifiers() {
    // List, Seq, Some, None, Nil are resolved later, not reserved
    assert_eq!(
        kinds("List Seq Some None Nil"),
        vec![
            ident("List"),
            ident("Seq"),
            ident("Some"),
            ident("None"),
            ident("Nil"),
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Numeric literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_int_literal() {
    assert_eq!(kinds("42"), vec![TokenKind::IntLit(42)]);
    assert_eq!(kinds("0"), vec![TokenKind::IntLit(0)]);
}

#[test]
fn test_long_literal() {
    assert_eq!(kinds("42L"), vec![TokenKind::LongLit(42)]);
    assert_eq!(kinds("7l"), vec![TokenKind::LongLit(7)]);
    // Values beyond i32 still fit in a Long
    assert_eq!(
        kinds("3000000000L"),
        vec![TokenKind::LongLit(3_000_000_000)]
    );
}

#[test]
fn test_double_literal() {
    assert_eq!(kinds("2.5"), vec![TokenKind::DoubleLit(2.5)]);
    assert_eq!(kinds("0.25"), vec![TokenKind::DoubleLit(0.25)]);
    assert_eq!(kinds("3d"), vec![TokenKind::DoubleLit(3.0)]);
    assert_eq!(kinds("2.5D"), vec![TokenKind::DoubleLit(2.5)]);
}

#[test]
fn test_float_literal() {
    assert_eq!(kinds("2.5f"), vec![TokenKind::FloatLit(2.5)]);
    assert_eq!(kinds("3F"), vec![TokenKind::FloatLit(3.0)]);
}

#[test]
fn test_int_overflow_is_diagnosed() {
    assert_eq!(diag_count("2147483648"), 1);
    assert!(first_diag("2147483648").contains("out of range for Int"));
    // i32::MAX itself is fine
    assert_eq!(diag_count("2147483647"), 0);
}

#[test]
fn test_decimal_long_suffix_is_diagnosed() {
    assert_eq!(diag_count("2.5L"), 1);
    assert!(first_diag("2.5L").contains("cannot take the 'L' suffix"));
}

#[test]
fn test_int_dot_method_is_not_decimal() {
    // `3.min` must lex as Int, Dot, Identifier
    assert_eq!(
        kinds("3.min"),
        vec![TokenKind::IntLit(3), TokenKind::Dot, ident("min")]
    );
}

// ─────────────────────────────────────────────────────────────────────
// String & char literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_string_literal() {
    assert_eq!(
        kinds("\"hello\""),
        vec![TokenKind::StrLit("hello".to_string())]
    );
    assert_eq!(kinds("\"\""), vec![TokenKind::StrLit(String::new())]);
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        kinds(r#""a\nb\t\"c\"""#),
        vec![TokenKind::StrLit("a\nb\t\"c\"".to_string())]
    );
}

#[test]
fn test_unterminated_string() {
    assert_eq!(diag_count("\"oops"), 1);
    assert!(first_diag("\"oops").contains("unterminated string"));
    // A newline also terminates
    assert_eq!(diag_count("\"oops\nval x = 1"), 1);
}

#[test]
fn test_char_literal() {
    assert_eq!(kinds("'a'"), vec![TokenKind::CharLit('a')]);
    assert_eq!(kinds("'f'"), vec![TokenKind::CharLit('f')]);
    assert_eq!(kinds(r"'\n'"), vec![TokenKind::CharLit('\n')]);
    assert_eq!(kinds(r"'\''"), vec![TokenKind::CharLit('\'')]);
}

#[test]
fn test_bad_char_literals() {
    assert_eq!(diag_count("''"), 1);
    assert!(first_diag("''").contains("empty character literal"));
    assert_eq!(diag_count("'ab'"), 1);
    assert!(first_diag("'ab'").contains("only one character"));
}

#[test]
fn test_unknown_escape() {
    assert_eq!(diag_count(r#""a\qb""#), 1);
    assert!(first_diag(r#""a\qb""#).contains("unknown escape"));
}

// ─────────────────────────────────────────────────────────────────────
// Operators & punctuation
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_single_char_operators() {
    assert_eq!(
        kinds("+ - * / %"),
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
        ]
    );
}

#[test]
fn test_comparison_operators() {
    assert_eq!(
        kinds("== != < > <= >="),
        vec![
            TokenKind::EqEq,
            TokenKind::BangEq,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEq,
            TokenKind::GreaterEq,
        ]
    );
}

#[test]
fn test_logical_operators() {
    assert_eq!(
        kinds("&& || !"),
        vec![TokenKind::AmpAmp, TokenKind::PipePipe, TokenKind::Bang]
    );
}

#[test]
fn test_arrows_and_bounds() {
    assert_eq!(kinds("=>"), vec![TokenKind::FatArrow]);
    assert_eq!(kinds("<:"), vec![TokenKind::Subtype]);
    assert_eq!(kinds("="), vec![TokenKind::Eq]);
    // `= >` with a space is two tokens
    assert_eq!(kinds("= >"), vec![TokenKind::Eq, TokenKind::Greater]);
}

#[test]
fn test_unimplemented_placeholder() {
    assert_eq!(kinds("???"), vec![TokenKind::Unimplemented]);
    // One or two question marks are not a placeholder
    assert_eq!(diag_count("?"), 1);
    assert_eq!(diag_count("??"), 2);
}

#[test]
fn test_punctuation() {
    assert_eq!(
        kinds("( ) { } [ ] , : ; . _"),
        vec![
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::Comma,
            TokenKind::Colon,
            TokenKind::Semi,
            TokenKind::Dot,
            TokenKind::Underscore,
        ]
    );
}

#[test]
fn test_underscore_prefixed_identifier() {
    assert_eq!(kinds("_tmp"), vec![ident("_tmp")]);
    assert_eq!(kinds("_ <:"), vec![TokenKind::Underscore, TokenKind::Subtype]);
}

#[test]
fn test_lone_ampersand_and_pipe() {
    assert!(first_diag("a & b").contains("use '&&'"));
    assert!(first_diag("a | b").contains("use '||'"));
}

// ─────────────────────────────────────────────────────────────────────
// Newlines, semicolons & comments
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_newline_tokens() {
    assert_eq!(
        kinds("val x\nval y"),
        vec![
            TokenKind::Val,
            ident("x"),
            TokenKind::Newline,
            TokenKind::Val,
            ident("y"),
        ]
    );
}

#[test]
fn test_semicolon_separator() {
    assert_eq!(
        kinds("val x = 1; val y = 2"),
        vec![
            TokenKind::Val,
            ident("x"),
            TokenKind::Eq,
            TokenKind::IntLit(1),
            TokenKind::Semi,
            TokenKind::Val,
            ident("y"),
            TokenKind::Eq,
            TokenKind::IntLit(2),
        ]
    );
}

#[test]
fn test_line_comment_stripped() {
    assert_eq!(
        kinds("val x = 1 // the answer"),
        vec![TokenKind::Val, ident("x"), TokenKind::Eq, TokenKind::IntLit(1)]
    );
    // Newline after the comment is still a token
    assert_eq!(
        kinds("// header\nval x"),
        vec![TokenKind::Newline, TokenKind::Val, ident("x")]
    );
}

#[test]
fn test_block_comment_stripped() {
    assert_eq!(
        kinds("val /* ignored */ x"),
        vec![TokenKind::Val, ident("x")]
    );
}

#[test]
fn test_nested_block_comment() {
    assert_eq!(
        kinds("val /* outer /* inner */ still outer */ x"),
        vec![TokenKind::Val, ident("x")]
    );
}

#[test]
fn test_unterminated_block_comment() {
    assert_eq!(diag_count("val x /* oops"), 1);
    assert!(first_diag("val x /* oops").contains("unterminated block comment"));
}

#[test]
fn test_crlf_handling() {
    assert_eq!(
        kinds("val x\r\nval y"),
        vec![
            TokenKind::Val,
            ident("x"),
            TokenKind::Newline,
            TokenKind::Val,
            ident("y"),
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Whole statements
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_val_statement() {
    assert_eq!(
        kinds("val x: Int = 2 + 3"),
        vec![
            TokenKind::Val,
            ident("x"),
            TokenKind::Colon,
            ident("Int"),
            TokenKind::Eq,
            TokenKind::IntLit(2),
            TokenKind::Plus,
            TokenKind::IntLit(3),
        ]
    );
}

#[test]
fn test_def_with_bound_param() {
    assert_eq!(
        kinds("def f(a: _ <: Animal) = a"),
        vec![
            TokenKind::Def,
            ident("f"),
            TokenKind::LParen,
            ident("a"),
            TokenKind::Colon,
            TokenKind::Underscore,
            TokenKind::Subtype,
            ident("Animal"),
            TokenKind::RParen,
            TokenKind::Eq,
            ident("a"),
        ]
    );
}

#[test]
fn test_class_header() {
    assert_eq!(
        kinds("case class Point(x: Int, y: Int) extends Shape with Ordered"),
        vec![
            TokenKind::Case,
            TokenKind::Class,
            ident("Point"),
            TokenKind::LParen,
            ident("x"),
            TokenKind::Colon,
            ident("Int"),
            TokenKind::Comma,
            ident("y"),
            TokenKind::Colon,
            ident("Int"),
            TokenKind::RParen,
            TokenKind::Extends,
            ident("Shape"),
            TokenKind::With,
            ident("Ordered"),
        ]
    );
}

#[test]
fn test_generic_type_application() {
    assert_eq!(
        kinds("List[Int]"),
        vec![
            ident("List"),
            TokenKind::LBracket,
            ident("Int"),
            TokenKind::RBracket,
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Edge cases & error recovery
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_source() {
    assert_eq!(kinds_with_eof(""), vec![TokenKind::Eof]);
}

#[test]
fn test_whitespace_only_source() {
    assert_eq!(kinds_with_eof("   \t  "), vec![TokenKind::Eof]);
}

#[test]
fn test_always_ends_with_eof() {
    for src in ["", "val x = 1", "\"unterminated", "val x = @"] {
        let all = kinds_with_eof(src);
        assert_eq!(all.last(), Some(&TokenKind::Eof), "source: {src:?}");
    }
}

#[test]
fn test_recovery_after_unexpected_character() {
    // The bad character is reported, then lexing continues
    assert_eq!(
        kinds("val x = @ 5"),
        vec![TokenKind::Val, ident("x"), TokenKind::Eq, TokenKind::IntLit(5)]
    );
    assert_eq!(diag_count("val x = @ 5"), 1);
}

#[test]
fn test_diag_cap() {
    let source = "@".repeat(50);
    let sf = SourceFile::new("test.slate", source);
    let result = Lexer::new(&sf).lex();
    assert!(result.diags.total >= slate_types::MAX_DIAGS);
    assert!(result.diags.diags.len() <= slate_types::MAX_DIAGS);
}

#[test]
fn test_spans_are_one_based() {
    let sf = SourceFile::new("test.slate", "val x");
    let result = Lexer::new(&sf).lex();
    let val = &result.tokens[0];
    assert_eq!(val.span.start_line, 1);
    assert_eq!(val.span.start_col, 1);
    assert_eq!(val.span.end_col, 3);
    let x = &result.tokens[1];
    assert_eq!(x.span.start_col, 5);
}

#[test]
fn test_spans_across_lines() {
    let sf = SourceFile::new("test.slate", "val x = 1\nval y = 2");
    let result = Lexer::new(&sf).lex();
    let second_val = result
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Val)
        .nth(1)
        .expect("second val");
    assert_eq!(second_val.span.start_line, 2);
    assert_eq!(second_val.span.start_col, 1);
}

#[test]
fn test_determinism_100_iterations() {
    let source = "def square(x: Int): Int = x * x\nval n = square(5)\n// done";
    let sf = SourceFile::new("test.slate", source);
    let first: Vec<TokenKind> = Lexer::new(&sf)
        .lex()
        .tokens
        .into_iter()
        .map(|t| t.kind)
        .collect();
    for i in 0..100 {
        let again: Vec<TokenKind> = Lexer::new(&sf)
            .lex()
            .tokens
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(first, again, "Determinism failure at iteration {i}");
    }
}
