//! Unit tests for the parser module.
//!
//! This module contains tests for:
//! - Precedence and associativity, including the equal-precedence tie-breaks
//! - Canonical forms for subtraction, division and negation
//! - Continuation patterns (`if`, ternary, `switch`)
//! - Implicit multiplication and newline-separated statements
//! - Calls, indexing and array literals
//! - Error reporting

use std::thread;

use crate::{
    ast::ast::Node,
    config::ParserConfig,
    errors::errors::{Error, ErrorImpl},
    grammar::{pattern::Pattern, symbol_table::SymbolTable},
    lexer::lexer::tokenize,
};

use super::{
    lookups::{default_grammar, DEFAULT_GRAMMAR},
    parser::{parse_source, parse_with, Category, Parser},
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn parse_all(source: &str) -> Vec<Node> {
    init();
    parse_source(source, Some("test.math".to_string())).unwrap()
}

fn parse_one(source: &str) -> Node {
    let mut nodes = parse_all(source);
    assert_eq!(nodes.len(), 1, "expected one statement in {:?}", source);
    nodes.remove(0)
}

fn sexp(source: &str) -> String {
    parse_one(source).sexp()
}

fn parse_err(source: &str) -> Error {
    init();
    parse_source(source, Some("test.math".to_string())).unwrap_err()
}

fn parse_in(source: &str, grammar: &SymbolTable, config: ParserConfig) -> Result<Vec<Node>, Error> {
    init();
    let tokens = tokenize(source.to_string(), Some("test.math".to_string())).unwrap();
    parse_with(tokens, grammar, config)
}

#[test]
fn test_tighter_operator_binds_first() {
    assert_eq!(sexp("a + b * c"), "(+ a (* b c))");
    assert_eq!(sexp("a * b + c"), "(+ (* a b) c)");
    assert_eq!(sexp("a = b || c && d"), "(= a (|| b (&& c d)))");
}

#[test]
fn test_left_and_right_associativity() {
    assert_eq!(sexp("a << b << c"), "(<< (<< a b) c)");
    assert_eq!(sexp("a ^ b ^ c"), "(^ a (^ b c))");
    assert_eq!(sexp("a = b = c"), "(= a (= b c))");
}

#[test]
fn test_non_associative_chain_is_ambiguous() {
    let error = parse_err("a < b < c");
    assert_eq!(
        error.get_kind(),
        &ErrorImpl::AmbiguousNonAssociative {
            first: "<".to_string(),
            second: "<".to_string(),
        }
    );

    assert_eq!(parse_err("a < b == c").get_error_name(), "AmbiguousNonAssociative");
    assert_eq!(sexp("a < b && c < d"), "(&& (< a b) (< c d))");
}

#[test]
fn test_difference_is_sum_of_negation() {
    assert_eq!(sexp("a - b"), "(+ a (* -1 b))");
    assert_eq!(parse_one("a - b"), parse_one("a + (-1) * b").normalized());
    assert_eq!(sexp("a - b - c"), "(+ a (* -1 b) (* -1 c))");
}

#[test]
fn test_quotient_is_product_of_reciprocal() {
    assert_eq!(sexp("a / b"), "(* a (^ b -1))");
    assert_eq!(sexp("a / b / c"), "(* a (^ b -1) (^ c -1))");
}

#[test]
fn test_unary_signs() {
    assert_eq!(sexp("-3"), "-3");
    assert_eq!(sexp("-x"), "(* -1 x)");
    assert_eq!(sexp("+x"), "x");
    assert_eq!(sexp("a * -b"), "(* a -1 b)");
    assert_eq!(sexp("-x ^ 2"), "(* -1 (^ x 2))");
}

#[test]
fn test_adjacent_signs_rejected() {
    let error = parse_err("- - x");
    assert_eq!(
        error.get_kind(),
        &ErrorImpl::AdjacentSignError {
            previous: "-".to_string(),
            sign: "-".to_string(),
        }
    );

    assert_eq!(parse_err("a + -b").get_error_name(), "AdjacentSignError");
    assert_eq!(sexp("a + (-b)"), "(+ a (group (* -1 b)))");
}

#[test]
fn test_non_associative_prefix_cannot_nest() {
    let mut grammar = default_grammar();
    grammar.prefix_n("~", 110, Pattern::Empty);

    let error = parse_in("~ ~ x", &grammar, ParserConfig::default()).unwrap_err();
    assert_eq!(
        error.get_kind(),
        &ErrorImpl::PrecedenceViolation {
            operator: "~".to_string(),
            found: 110,
            allowed: 109,
        }
    );

    // The default `~` is fy and nests freely.
    assert_eq!(sexp("~ ~ x"), "(~ (~ x))");
}

#[test]
fn test_flattening_stops_at_parentheses() {
    assert_eq!(sexp("a + b + c"), "(+ a b c)");
    assert_eq!(sexp("a * b * c"), "(* a b c)");
    assert_eq!(sexp("a ; b ; c"), "(; a b c)");
    assert_eq!(sexp("a + (b + c)"), "(+ a (group (+ b c)))");
    assert_eq!(parse_one("a + (b + c)").normalized().sexp(), "(+ a b c)");
}

#[test]
fn test_implicit_multiplication() {
    assert_eq!(parse_one("2 x"), parse_one("2 * x"));
    assert_eq!(sexp("2 x y"), "(* 2 x y)");
    assert_eq!(sexp("2 (x + 1)"), "(* 2 (group (+ x 1)))");
    assert_eq!(sexp("a + 2 x"), "(+ a (* 2 x))");
}

#[test]
fn test_implicit_multiplication_disabled() {
    let config = ParserConfig::default().with_implicit_multiplication(false);
    let error = parse_in("a b", &DEFAULT_GRAMMAR, config).unwrap_err();

    assert_eq!(error.get_kind(), &ErrorImpl::UndefinedLeftDenotation { token: "b".to_string() });
}

#[test]
fn test_if_then_else() {
    assert_eq!(sexp("if a then b else c"), "(if a then b else c)");
    assert_eq!(sexp("if a then b"), "(if a then b)");
    assert_eq!(sexp("if a < b then x = 1 else x = 2"), "(if (< a b) then (= x 1) else (= x 2))");

    let error = parse_err("if a");
    assert_eq!(
        error.get_kind(),
        &ErrorImpl::UnexpectedEndOfPattern {
            expected: "then".to_string(),
            found: "EOF".to_string(),
        }
    );
}

#[test]
fn test_string_literal_never_matches_keyword() {
    let config = ParserConfig::default().with_implicit_multiplication(false);
    let error = parse_in("if a \"then\" b", &DEFAULT_GRAMMAR, config).unwrap_err();

    assert_eq!(
        error.get_kind(),
        &ErrorImpl::UnexpectedEndOfPattern {
            expected: "then".to_string(),
            found: "then".to_string(),
        }
    );
}

#[test]
fn test_ternary_and_switch() {
    assert_eq!(sexp("a ? b : c"), "(? a b : c)");
    assert_eq!(sexp("a ? b : c ? d : e"), "(? a b : (? c d : e))");
    assert_eq!(sexp("a ? b = 1 : c"), "(? a (= b 1) : c)");
    assert_eq!(sexp("switch case 1 case x + 1"), "(switch case 1 case (+ x 1))");
    assert_eq!(sexp("switch"), "(switch)");
}

#[test]
fn test_alternative_without_match() {
    let mut grammar = default_grammar();
    grammar.prefix(
        "pick",
        1201,
        Pattern::alt(Pattern::keyword_then("left", 1201), Pattern::keyword_then("right", 1201)),
    );
    let config = ParserConfig::default().with_implicit_multiplication(false);

    let parsed = parse_in("pick x right y", &grammar, config).unwrap();
    assert_eq!(parsed[0].sexp(), "(pick x right y)");

    let error = parse_in("pick x middle", &grammar, config).unwrap_err();
    assert_eq!(
        error.get_kind(),
        &ErrorImpl::PatternMismatch {
            expected: vec!["left".to_string(), "right".to_string()],
            found: "middle".to_string(),
        }
    );
}

#[test]
fn test_suffix_and_prefix_roles() {
    assert_eq!(sexp("x!"), "(! x)");
    assert_eq!(sexp("!x"), "(! x)");
    assert_eq!(sexp("x++ + 1"), "(+ (++ x) 1)");
    assert_eq!(sexp("a + b!"), "(+ a (! b))");
    assert_eq!(sexp("-x!"), "(* -1 (! x))");
}

#[test]
fn test_newlines_separate_statements() {
    let nodes = parse_all("a = 1\nb = 2");
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].sexp(), "(= a 1)");
    assert_eq!(nodes[1].sexp(), "(= b 2)");

    assert_eq!(sexp("( a = 1\n )"), "(group (= a 1))");
    assert_eq!(sexp("[1,\n2]"), "([ 1 2 ])");

    // An operator with no null role continues the statement.
    assert_eq!(sexp("a\n* b"), "(* a b)");

    // Implicit products and calls never cross a top-level newline.
    assert_eq!(parse_all("a\nb").len(), 2);
    assert_eq!(parse_all("f\n(x)").len(), 2);

    // A sign starting a line begins a new statement even though it also has an infix role.
    let nodes = parse_all("a = 1\n-b");
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].sexp(), "(= a 1)");
    assert_eq!(nodes[1].sexp(), "(* -1 b)");
    assert!(parse_all("\n\n").is_empty());
}

#[test]
fn test_calls_indexing_and_arrays() {
    assert_eq!(sexp("f(a, b)"), "(( f a b ))");
    assert_eq!(sexp("f()"), "(( f ))");
    assert_eq!(sexp("m[1](x)"), "(( ([ m 1 ]) x ))");
    assert_eq!(sexp("f(a)(b)"), "(( (( f a )) b ))");
    assert_eq!(sexp("[1, 2, 3]"), "([ 1 2 3 ])");
    assert_eq!(sexp("[]"), "([ ])");
    assert_eq!(sexp("2 f(x)"), "(* 2 (( f x )))");
}

#[test]
fn test_assoc_to_left_switch() {
    let mut grammar = SymbolTable::new();
    grammar.nilfix("(number)", 0, Pattern::Empty);
    grammar.nilfix("(symbol)", 0, Pattern::Empty);
    grammar.infix_r("=", 100, Pattern::Empty);
    grammar.infix_l("+", 100, Pattern::Empty);

    let right = parse_in("a = b + c", &grammar, ParserConfig::default()).unwrap();
    assert_eq!(right[0].sexp(), "(+ (= a b) c)");

    let left = parse_in("a = b + c", &grammar, ParserConfig::default().with_assoc_to_left(true)).unwrap();
    assert_eq!(left[0].sexp(), "(= a (+ b c))");
}

#[test]
fn test_nesting_limit() {
    let config = ParserConfig::default().with_max_depth(3);

    assert!(parse_in("((a))", &DEFAULT_GRAMMAR, config).is_ok());

    let error = parse_in("(((a)))", &DEFAULT_GRAMMAR, config).unwrap_err();
    assert_eq!(error.get_kind(), &ErrorImpl::NestingTooDeep { limit: 3 });

    // Left-leaning operators deepen the tree without recursing.
    assert_eq!(sexp("a % b % c"), "(% (% a b) c)");
    assert!(parse_in("a % b", &DEFAULT_GRAMMAR, config).is_ok());
    assert!(parse_in("a % b % c % d", &DEFAULT_GRAMMAR, config).is_err());
    assert!(parse_in("f(a)(b)(c)(d)", &DEFAULT_GRAMMAR, config).is_err());
    assert!(parse_in("x! ! ! !", &DEFAULT_GRAMMAR, config).is_err());
}

#[test]
fn test_long_left_leaning_chain_hits_depth_limit() {
    let source = format!("a{}", " % a".repeat(20_000));
    let error = parse_in(&source, &DEFAULT_GRAMMAR, ParserConfig::default()).unwrap_err();
    assert_eq!(error.get_kind(), &ErrorImpl::NestingTooDeep { limit: 256 });

    // Flattened chains grow sideways and stay within the limit.
    let sum = format!("a{}", " + a".repeat(2_000));
    let nodes = parse_in(&sum, &DEFAULT_GRAMMAR, ParserConfig::default()).unwrap();
    assert_eq!(nodes[0].as_operator().unwrap().args.len(), 2_001);
}

#[test]
fn test_undefined_denotations() {
    assert_eq!(parse_err(")").get_kind(), &ErrorImpl::UndefinedNullDenotation { token: ")".to_string() });
    assert_eq!(parse_err("a )").get_kind(), &ErrorImpl::UndefinedLeftDenotation { token: ")".to_string() });
    assert_eq!(parse_err("a +").get_error_name(), "UndefinedNullDenotation");
    assert_eq!(parse_err("a @ b").get_kind(), &ErrorImpl::UnknownOperator { operator: "@".to_string() });
    assert_eq!(parse_err("f(a b").get_error_name(), "UnexpectedEndOfPattern");
}

#[test]
fn test_cursor_history() {
    let tokens = tokenize("a + \n b".to_string(), None).unwrap();
    let mut parser = Parser::new(tokens, &DEFAULT_GRAMMAR, ParserConfig::default()).unwrap();

    assert_eq!(parser.current().category, Category::Symbol);
    assert!(parser.previous().is_none());

    parser.advance().unwrap();
    let plus = parser.expect("+").unwrap();
    assert_eq!(plus.category, Category::Operator);
    assert!(parser.newline_flag());

    assert_eq!(parser.previous().unwrap().id, "+");
    assert_eq!(parser.previous_previous().unwrap().token.value, "a");

    let error = parser.expect(")").unwrap_err();
    assert_eq!(
        error.get_kind(),
        &ErrorImpl::UnexpectedToken {
            expected: ")".to_string(),
            found: "b".to_string(),
        }
    );

    parser.advance().unwrap();
    assert!(parser.at_end());
}

#[test]
fn test_cursor_tracks_nesting() {
    let tokens = tokenize("( [ x ] )".to_string(), None).unwrap();
    let mut parser = Parser::new(tokens, &DEFAULT_GRAMMAR, ParserConfig::default()).unwrap();

    parser.advance().unwrap();
    parser.advance().unwrap();
    assert_eq!(parser.nesting(), (1, 1));
    parser.advance().unwrap();
    parser.advance().unwrap();
    assert_eq!(parser.nesting(), (1, 0));
    parser.advance().unwrap();
    assert_eq!(parser.nesting(), (0, 0));
}

#[test]
fn test_reserved_symbols_resolve_to_themselves() {
    let tokens = tokenize("then x".to_string(), None).unwrap();
    let parser = Parser::new(tokens, &DEFAULT_GRAMMAR, ParserConfig::default()).unwrap();

    assert_eq!(parser.current().category, Category::Reserved);
    assert_eq!(parser.current_id(), "then");
    assert_eq!(parser.current().keyword(), Some("then"));
}

#[test]
fn test_concurrent_parses_share_default_grammar() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            thread::spawn(move || {
                let source = format!("x{} = a + b * {}", i, i);
                parse_source(&source, None).map(|nodes| nodes[0].sexp())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.join().unwrap().unwrap();
        assert_eq!(result, format!("(= x{} (+ a (* b {})))", i, i));
    }
}
