//! Parser module for building expression trees.
//!
//! This module contains an operator-precedence (Pratt) parser driven
//! entirely by a [`SymbolTable`](crate::grammar::symbol_table::SymbolTable).
//! It handles:
//!
//! - Prefix, suffix, infix and nilfix operators with Prolog-style
//!   specifications and tie-breaking between equal precedences
//! - Continuation patterns such as `if ... then ... else ...`
//! - Canonical forms for subtraction, division and negation
//! - Implicit multiplication and newline-separated statements
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing, with binding powers taken from the grammar.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod pattern;
pub mod stmt;

#[cfg(test)]
mod tests;
