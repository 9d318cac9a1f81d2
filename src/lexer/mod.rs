//! Lexical analysis module.
//!
//! This module contains the tokenizer that converts source text into the
//! token stream consumed by the parser. It handles:
//!
//! - Numbers, strings and symbols (identifiers and keywords alike)
//! - Operators, segmented by a configurable operator character set
//! - Explicit newline tokens, which the parser uses as statement separators
//! - Comments and other whitespace, which are skipped

pub mod lexer;
pub mod tokens;
