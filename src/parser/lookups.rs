use lazy_static::lazy_static;

use crate::{
    grammar::{
        pattern::Pattern,
        symbol_table::{Action, SymbolTable, END_ID, NUMBER_ID, STATEMENT_PRECEDENCE, STRING_ID, SYMBOL_ID},
    },
    lexer::lexer::OperatorChars,
};

lazy_static! {
    /// The default grammar, shared by every call to [`parse`](super::parser::parse).
    pub static ref DEFAULT_GRAMMAR: SymbolTable = default_grammar();
}

/// Operator characters matching the default grammar.
pub fn default_operator_chars() -> OperatorChars {
    OperatorChars::default()
}

/// Builds the default C-like expression grammar.
pub fn default_grammar() -> SymbolTable {
    let mut table = SymbolTable::new();
    create_token_lookups(&mut table);
    table
}

pub fn create_token_lookups(table: &mut SymbolTable) {
    // Literals
    table.nilfix(NUMBER_ID, 0, Pattern::Empty);
    table.nilfix(STRING_ID, 0, Pattern::Empty);
    table.nilfix(SYMBOL_ID, 0, Pattern::Empty);

    // Grouping, arrays, calls and indexing
    table
        .prefix("(", STATEMENT_PRECEDENCE, Pattern::keyword(")"))
        .with_action(Action::Group)
        .with_node_precedence(0);
    table
        .prefix("[", STATEMENT_PRECEDENCE, Pattern::keyword("]"))
        .with_action(Action::Array)
        .with_node_precedence(0);
    table.infix_l("[", 10, Pattern::keyword("]")).with_action(Action::Index);
    table.infix_l("(", 20, Pattern::keyword(")")).with_action(Action::Call);

    // Increments and factorial
    table.suffix("++", 30, Pattern::Empty);
    table.suffix("--", 30, Pattern::Empty);
    table.prefix("++", 40, Pattern::Empty);
    table.prefix("--", 40, Pattern::Empty);
    table.suffix("!", 50, Pattern::Empty);

    // Arithmetic
    table.infix_r("^", 60, Pattern::Empty);
    table.prefix("+", 70, Pattern::Empty).with_action(Action::Identity);
    table.prefix("-", 70, Pattern::Empty).with_action(Action::Negate);
    table.infix_l("*", 80, Pattern::Empty).with_action(Action::Product);
    table.infix_l("/", 80, Pattern::Empty).with_action(Action::Quotient);
    table.infix_l("%", 90, Pattern::Empty);
    table.infix_l("+", 100, Pattern::Empty).with_action(Action::Sum);
    table.infix_l("-", 100, Pattern::Empty).with_action(Action::Difference);

    // Bitwise
    table.prefix("~", 110, Pattern::Empty);
    for shift in ["<<", ">>", ">>>"] {
        table.infix_l(shift, 120, Pattern::Empty);
    }
    table.infix_l("&", 130, Pattern::Empty);
    table.infix_l("#", 140, Pattern::Empty);
    table.infix_l("|", 150, Pattern::Empty);

    // Relational
    for relation in ["<", "<=", ">", ">=", "==", "!="] {
        table.infix_n(relation, 160, Pattern::Empty);
    }

    // Logical
    table.prefix("!", 170, Pattern::Empty);
    table.infix_l("&&", 180, Pattern::Empty);
    table.infix_l("||", 190, Pattern::Empty);
    table
        .infix_r("?", 200, Pattern::keyword_then(":", 200))
        .with_rbp(STATEMENT_PRECEDENCE);

    // Assignment
    for assignment in ["=", "^=", "*=", "/=", "%=", "+=", "-=", "<<=", ">>=", ">>>=", "&=", "#=", "|="] {
        table.infix_r(assignment, 210, Pattern::Empty);
    }

    table.infix_l(";", 220, Pattern::Empty).with_action(Action::Compound);

    // Control flow
    table.prefix(
        "if",
        STATEMENT_PRECEDENCE,
        Pattern::seq(
            Pattern::keyword_then("then", STATEMENT_PRECEDENCE),
            Pattern::optional(Pattern::keyword_then("else", STATEMENT_PRECEDENCE)),
        ),
    );
    table.nilfix("switch", 0, Pattern::repeat(Pattern::keyword_then("case", STATEMENT_PRECEDENCE)));

    // Reserved
    for reserved in [END_ID, ",", ")", "]", ":"] {
        table.symbol(reserved);
    }
}
