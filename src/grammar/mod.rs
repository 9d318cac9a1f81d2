//! Grammar definitions: the symbol table of operators and keywords, and the
//! continuation patterns that describe fixed keywords following an operator.

pub mod pattern;
pub mod symbol_table;
