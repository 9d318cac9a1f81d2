use crate::{
    ast::ast::Node,
    errors::errors::{Error, ErrorImpl},
    grammar::symbol_table::Binding,
};

use super::{expr::parse_expr, parser::Parser};

/// Parses newline-separated top-level statements until the end of input.
pub fn parse_statements(parser: &mut Parser) -> Result<Vec<Node>, Error> {
    let mut statements = vec![];

    while !parser.at_end() {
        let statement = parse_expr(parser, Binding::statement())?;
        log::debug!("parsed statement {}", statement);
        statements.push(statement);

        // Only a newline may start the next statement.
        if !parser.newline_flag() {
            break;
        }
    }

    if !parser.at_end() {
        return Err(Error::new(
            ErrorImpl::UndefinedLeftDenotation { token: parser.current().token.value.clone() },
            parser.current().span().clone(),
        ));
    }

    Ok(statements)
}
