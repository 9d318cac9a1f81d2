use std::fmt::Display;

use thiserror::Error;

use crate::{Position, Span};

/// A fatal error with the source span of the offending token attached.
#[derive(Error, Debug, Clone)]
#[error("{internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
    span: Span,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, span: Span) -> Self {
        Error {
            internal_error: error_impl,
            span,
        }
    }

    /// Errors raised while building a grammar have no source location.
    pub fn unlocated(error_impl: ErrorImpl) -> Self {
        Error::new(error_impl, Span::null())
    }

    pub fn get_position(&self) -> &Position {
        &self.span.start
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn get_kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnknownOperator { .. } => "UnknownOperator",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UndefinedNullDenotation { .. } => "UndefinedNullDenotation",
            ErrorImpl::UndefinedLeftDenotation { .. } => "UndefinedLeftDenotation",
            ErrorImpl::AdjacentSignError { .. } => "AdjacentSignError",
            ErrorImpl::PrecedenceViolation { .. } => "PrecedenceViolation",
            ErrorImpl::AmbiguousNonAssociative { .. } => "AmbiguousNonAssociative",
            ErrorImpl::PatternMismatch { .. } => "PatternMismatch",
            ErrorImpl::UnexpectedEndOfPattern { .. } => "UnexpectedEndOfPattern",
            ErrorImpl::NestingTooDeep { .. } => "NestingTooDeep",
            ErrorImpl::InvalidSpecification { .. } => "InvalidSpecification",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::NumberParseError { token } => {
                ErrorTip::Suggestion(format!("Invalid number: `{}`", token))
            }
            ErrorImpl::UnknownOperator { operator } => ErrorTip::Suggestion(format!(
                "Operator `{}` is not part of the grammar",
                operator
            )),
            ErrorImpl::UnexpectedToken { expected, found } => {
                ErrorTip::Suggestion(format!("Expected `{}`, found `{}`", expected, found))
            }
            ErrorImpl::UndefinedNullDenotation { token } => ErrorTip::Suggestion(format!(
                "`{}` cannot start an expression, is an operand missing?",
                token
            )),
            ErrorImpl::UndefinedLeftDenotation { token } => ErrorTip::Suggestion(format!(
                "`{}` cannot follow a complete expression, is an operator missing?",
                token
            )),
            ErrorImpl::AdjacentSignError { previous, sign } => ErrorTip::Suggestion(format!(
                "Sign `{}` directly after `{}`, use parentheses",
                sign, previous
            )),
            ErrorImpl::PrecedenceViolation { .. } => {
                ErrorTip::Suggestion(String::from("Use parentheses to group the operand"))
            }
            ErrorImpl::AmbiguousNonAssociative { first, second } => {
                ErrorTip::Suggestion(format!(
                    "`{}` and `{}` do not associate, use parentheses",
                    first, second
                ))
            }
            ErrorImpl::PatternMismatch { expected, .. } => {
                ErrorTip::Suggestion(format!("Expected one of: {}", expected.join(", ")))
            }
            ErrorImpl::UnexpectedEndOfPattern { expected, .. } => {
                ErrorTip::Suggestion(format!("Expected keyword `{}`", expected))
            }
            ErrorImpl::NestingTooDeep { limit } => {
                ErrorTip::Suggestion(format!("Expressions may nest at most {} deep", limit))
            }
            ErrorImpl::InvalidSpecification { .. } => ErrorTip::Suggestion(String::from(
                "Valid specifications are f, fx, fy, xf, yf, xfx, xfy and yfx",
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unknown operator: {operator:?}")]
    UnknownOperator { operator: String },
    #[error("unexpected token: expected {expected:?}, found {found:?}")]
    UnexpectedToken { expected: String, found: String },
    #[error("undefined prefix/nilfix operator: {token:?}")]
    UndefinedNullDenotation { token: String },
    #[error("undefined suffix/infix operator: {token:?}")]
    UndefinedLeftDenotation { token: String },
    #[error("sign {sign:?} not allowed after {previous:?}")]
    AdjacentSignError { previous: String, sign: String },
    #[error("precedence error in {operator:?}: operand at {found} exceeds {allowed}")]
    PrecedenceViolation {
        operator: String,
        found: u32,
        allowed: u32,
    },
    #[error("non-associative operators {first:?} and {second:?} at same precedence")]
    AmbiguousNonAssociative { first: String, second: String },
    #[error("no alternative matches {found:?}")]
    PatternMismatch { expected: Vec<String>, found: String },
    #[error("expected {expected:?}, found {found:?}")]
    UnexpectedEndOfPattern { expected: String, found: String },
    #[error("expression nested deeper than {limit}")]
    NestingTooDeep { limit: usize },
    #[error("invalid operator specification {spec:?}")]
    InvalidSpecification { spec: String },
}
