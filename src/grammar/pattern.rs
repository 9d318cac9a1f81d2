//! Continuation patterns.
//!
//! A pattern describes the fixed keywords that must follow an operator, such
//! as `then` and an optional `else` after `if`. It is a small regular
//! language over keyword texts, where a keyword may be followed by a
//! sub-expression parsed at a given precedence.

use std::fmt::Display;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Pattern {
    /// Matches nothing and always succeeds.
    #[default]
    Empty,
    Sequence(Box<Pattern>, Box<Pattern>),
    Alternative(Box<Pattern>, Box<Pattern>),
    /// Zero or more repetitions.
    Repeat(Box<Pattern>),
    /// A keyword, optionally followed by an expression at the given precedence.
    Literal(String, Option<u32>),
}

impl Pattern {
    pub fn keyword(text: &str) -> Self {
        Pattern::Literal(String::from(text), None)
    }

    pub fn keyword_then(text: &str, precedence: u32) -> Self {
        Pattern::Literal(String::from(text), Some(precedence))
    }

    pub fn seq(first: Pattern, second: Pattern) -> Self {
        Pattern::Sequence(Box::new(first), Box::new(second))
    }

    pub fn alt(first: Pattern, second: Pattern) -> Self {
        Pattern::Alternative(Box::new(first), Box::new(second))
    }

    pub fn optional(pattern: Pattern) -> Self {
        Pattern::alt(pattern, Pattern::Empty)
    }

    pub fn repeat(pattern: Pattern) -> Self {
        Pattern::Repeat(Box::new(pattern))
    }

    /// Whether the pattern can match zero tokens.
    pub fn nullable(&self) -> bool {
        match self {
            Pattern::Empty | Pattern::Repeat(_) => true,
            Pattern::Sequence(first, second) => first.nullable() && second.nullable(),
            Pattern::Alternative(first, second) => first.nullable() || second.nullable(),
            Pattern::Literal(..) => false,
        }
    }

    /// Keyword texts that can begin a non-empty match.
    pub fn first_set(&self) -> Vec<&str> {
        match self {
            Pattern::Empty => vec![],
            Pattern::Repeat(inner) => inner.first_set(),
            Pattern::Sequence(first, second) => {
                let mut set = first.first_set();
                if first.nullable() {
                    for text in second.first_set() {
                        if !set.contains(&text) {
                            set.push(text);
                        }
                    }
                }
                set
            }
            Pattern::Alternative(first, second) => {
                let mut set = first.first_set();
                for text in second.first_set() {
                    if !set.contains(&text) {
                        set.push(text);
                    }
                }
                set
            }
            Pattern::Literal(text, _) => vec![text.as_str()],
        }
    }

    pub fn starts_with(&self, text: &str) -> bool {
        self.first_set().contains(&text)
    }

    /// Every keyword text mentioned anywhere in the pattern.
    pub fn keywords(&self) -> Vec<&str> {
        match self {
            Pattern::Empty => vec![],
            Pattern::Repeat(inner) => inner.keywords(),
            Pattern::Sequence(first, second) | Pattern::Alternative(first, second) => {
                let mut all = first.keywords();
                all.extend(second.keywords());
                all
            }
            Pattern::Literal(text, _) => vec![text.as_str()],
        }
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pattern::Empty => write!(f, "ε"),
            Pattern::Sequence(first, second) => write!(f, "{} {}", first, second),
            Pattern::Alternative(first, second) => write!(f, "({} | {})", first, second),
            Pattern::Repeat(inner) => write!(f, "({})*", inner),
            Pattern::Literal(text, None) => write!(f, "{}", text),
            Pattern::Literal(text, Some(precedence)) => write!(f, "{} <{}>", text, precedence),
        }
    }
}
