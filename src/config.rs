//! Parser configuration.
//!
//! The grammar itself lives in a [`SymbolTable`](crate::grammar::symbol_table::SymbolTable);
//! this struct holds the switches that are global to a parse rather than per operator.

/// Default bound on expression nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Treat two juxtaposed operands as a product (`2 x` is `2 * x`).
    pub implicit_multiplication: bool,
    /// At equal precedence, bind the shared operand to the left-associative
    /// operator instead of the right-associative one.
    pub assoc_to_left: bool,
    /// Maximum nesting of sub-expressions before the parse is aborted.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            implicit_multiplication: true,
            assoc_to_left: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserConfig {
    pub fn with_implicit_multiplication(mut self, enabled: bool) -> Self {
        self.implicit_multiplication = enabled;
        self
    }

    pub fn with_assoc_to_left(mut self, enabled: bool) -> Self {
        self.assoc_to_left = enabled;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
