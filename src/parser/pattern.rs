use crate::{
    ast::ast::Capture,
    errors::errors::{Error, ErrorImpl},
    grammar::{pattern::Pattern, symbol_table::Binding},
};

use super::{
    expr::{check_operand, parse_expr},
    parser::Parser,
};

/// Matches `pattern` against the upcoming lexemes, appending what it
/// consumes to `captures`.
pub fn match_pattern(parser: &mut Parser, mut captures: Vec<Capture>, pattern: &Pattern) -> Result<Vec<Capture>, Error> {
    match pattern {
        Pattern::Empty => Ok(captures),
        Pattern::Sequence(first, second) => {
            let captures = match_pattern(parser, captures, first)?;
            match_pattern(parser, captures, second)
        }
        Pattern::Alternative(first, second) => {
            let keyword = parser.current().keyword().map(String::from);
            let starts = |branch: &Pattern| keyword.as_deref().is_some_and(|text| branch.starts_with(text));

            if starts(first) {
                match_pattern(parser, captures, first)
            } else if starts(second) {
                match_pattern(parser, captures, second)
            } else if pattern.nullable() {
                Ok(captures)
            } else {
                Err(Error::new(
                    ErrorImpl::PatternMismatch {
                        expected: pattern.first_set().into_iter().map(String::from).collect(),
                        found: parser.current().token.value.clone(),
                    },
                    parser.current().span().clone(),
                ))
            }
        }
        Pattern::Repeat(inner) => {
            while parser.current().keyword().is_some_and(|text| inner.starts_with(text)) {
                captures = match_pattern(parser, captures, inner)?;
            }
            Ok(captures)
        }
        Pattern::Literal(text, precedence) => {
            if parser.current().keyword() != Some(text.as_str()) {
                return Err(Error::new(
                    ErrorImpl::UnexpectedEndOfPattern {
                        expected: text.clone(),
                        found: parser.current().token.value.clone(),
                    },
                    parser.current().span().clone(),
                ));
            }

            let keyword = parser.advance()?;
            captures.push(Capture::Keyword {
                text: keyword.id,
                span: keyword.token.span,
            });

            if let Some(precedence) = precedence {
                let expr = parse_expr(parser, Binding::context(*precedence))?;
                check_operand(text, &expr, *precedence)?;
                captures.push(Capture::Expr(expr));
            }

            Ok(captures)
        }
    }
}
