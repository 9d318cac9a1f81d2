//! Integration tests for end-to-end parsing.
//!
//! These tests drive the public API the way a caller would: source text is
//! tokenized, parsed against a symbol table and rendered back as text,
//! S-expressions or a caret diagnostic.

use exprparse::{
    config::ParserConfig,
    display_error,
    grammar::{pattern::Pattern, symbol_table::SymbolTable},
    lexer::lexer::{tokenize, tokenize_with, OperatorChars},
    parser::{
        lookups::{default_grammar, default_operator_chars, DEFAULT_GRAMMAR},
        parser::{parse, parse_source, parse_with},
    },
};

fn render(source: &str) -> Vec<String> {
    parse_source(source, Some("test.math".to_string()))
        .unwrap()
        .iter()
        .map(|node| node.to_string())
        .collect()
}

#[test]
fn test_round_trip_through_display() {
    assert_eq!(render("a - b"), vec!["a - b"]);
    assert_eq!(render("a / b"), vec!["a / b"]);
    assert_eq!(render("-x"), vec!["- x"]);
    assert_eq!(render("-x / y"), vec!["- x / y"]);
    assert_eq!(render("1 / x"), vec!["1 / x"]);
    assert_eq!(render("f(a, b)"), vec!["f ( a , b )"]);
    assert_eq!(render("if a then b else c"), vec!["if a then b else c"]);
    assert_eq!(render("x = \"hi\""), vec!["x = \"hi\""]);
}

#[test]
fn test_display_output_reparses_to_same_tree() {
    for source in ["a - b * c", "a / (b + c)", "2 x + y", "a ? b : c", "f(x)[1]"] {
        let first = parse_source(source, None).unwrap();
        let printed = first[0].to_string();
        let second = parse_source(&printed, None).unwrap();

        assert_eq!(first[0].normalized(), second[0].normalized(), "{} printed as {}", source, printed);
    }
}

#[test]
fn test_multiple_statements() {
    let source = "x = 1\ny = x + 2 // trailing comment\n\nz = f(\n  x,\n  y\n)";
    let statements = parse_source(source, None).unwrap();

    assert_eq!(statements.len(), 3);
    assert_eq!(statements[0].sexp(), "(= x 1)");
    assert_eq!(statements[1].sexp(), "(= y (+ x 2))");
    assert_eq!(statements[2].sexp(), "(= z (( f x y )))");
}

#[test]
fn test_parse_matches_parse_with_defaults() {
    let source = "a <<= b >>> 2";
    let tokens = tokenize(source.to_string(), None).unwrap();

    let defaults = parse(tokens.clone()).unwrap();
    let explicit = parse_with(tokens, &DEFAULT_GRAMMAR, ParserConfig::default()).unwrap();

    assert_eq!(defaults, explicit);
    assert_eq!(defaults[0].sexp(), "(<<= a (>>> b 2))");
}

#[test]
fn test_custom_grammar_and_operator_chars() {
    let mut grammar = SymbolTable::new();
    grammar.nilfix("(number)", 0, Pattern::Empty);
    grammar.nilfix("(symbol)", 0, Pattern::Empty);
    grammar.register_str("and", "xfy", 100, Pattern::Empty).unwrap();
    grammar.register_str("::", "xfx", 50, Pattern::Empty).unwrap();
    grammar.register_str("let", "fy", 200, Pattern::keyword_then("in", 200)).unwrap();

    let chars = OperatorChars::new(":", ":");
    let tokens = tokenize_with("let x :: 1 in x and y".to_string(), None, &chars).unwrap();
    let parsed = parse_with(tokens, &grammar, ParserConfig::default().with_implicit_multiplication(false)).unwrap();

    assert_eq!(parsed[0].sexp(), "(let (:: x 1) in (and x y))");
}

#[test]
fn test_default_operator_chars_split_operators() {
    let tokens = tokenize_with("a>>>=b".to_string(), None, &default_operator_chars()).unwrap();
    let values: Vec<&str> = tokens.iter().map(|token| token.value.as_str()).collect();

    assert_eq!(values, vec!["a", ">>>=", "b", "EOF"]);
}

#[test]
fn test_grammar_can_be_extended() {
    let mut grammar = default_grammar();
    grammar.infix_l("@", 80, Pattern::Empty);

    let tokens = tokenize("a @ b * c".to_string(), None).unwrap();
    let parsed = parse_with(tokens, &grammar, ParserConfig::default()).unwrap();
    assert_eq!(parsed[0].sexp(), "(* (@ a b) c)");

    assert!(parse_source("a @ b", None).is_err());
}

#[test]
fn test_error_diagnostic() {
    let source = "x = 1\ny = a < b < c";
    let error = parse_source(source, Some("input.math".to_string())).unwrap_err();
    let rendered = display_error(&error, source);

    assert!(rendered.starts_with("Error: AmbiguousNonAssociative"));
    assert!(rendered.contains("-> input.math"));
    assert!(rendered.contains("2 | y = a < b < c"));
    assert!(rendered.trim_end().ends_with('^'));
}

#[test]
fn test_unrecognised_character() {
    let error = parse_source("a = $", None).unwrap_err();
    assert_eq!(error.get_error_name(), "UnknownOperator");
}
