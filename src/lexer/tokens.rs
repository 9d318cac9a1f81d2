use std::fmt::Display;

use crate::Span;

/// Lexical category of a token, as delivered to the parser.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    String,
    Symbol,
    Operator,
    Newline,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Newline => write!(f, "{} (\\n)", self.kind),
            TokenKind::EOF => write!(f, "{}", self.kind),
            _ => write!(f, "{} ({})", self.kind, self.value),
        }
    }
}
