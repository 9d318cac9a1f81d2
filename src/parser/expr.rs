use crate::{
    ast::ast::{Capture, Node, OperatorNode},
    errors::errors::{Error, ErrorImpl},
    grammar::symbol_table::{Action, Associativity, Binding, RoleEntry, Role},
    Span,
};

use super::{
    parser::{Category, Parser},
    pattern::match_pattern,
};

/// Operators the canonical forms are expressed in.
const SUM_ID: &str = "+";
const PRODUCT_ID: &str = "*";
const POWER_ID: &str = "^";

/// Parses one expression in `context`.
pub fn parse_expr(parser: &mut Parser, context: Binding) -> Result<Node, Error> {
    parse_in_context(parser, context, None)
}

/// Parses the operand of `operator`, whose role binding is `context`.
fn parse_operand(parser: &mut Parser, context: Binding, operator: &str) -> Result<Node, Error> {
    parse_in_context(parser, context, Some(operator))
}

fn parse_in_context(parser: &mut Parser, context: Binding, operator: Option<&str>) -> Result<Node, Error> {
    parser.enter()?;
    let mut left = nud(parser)?;
    // Levels this loop has stacked on top of `left`; they count towards the depth limit.
    let mut levels = 0;

    loop {
        let current = parser.current().clone();
        let left_role = current
            .left_role()
            .filter(|role| !matches!(role.action, Action::Call | Action::Index) || left.is_callable());
        let has_null = current.null_role().is_some();
        let implicit = left_role.is_none() && has_null && parser.config().implicit_multiplication;

        let candidate = match left_role {
            Some(role) => role.binding,
            None if implicit => match product_role(parser) {
                Some(role) => role.binding,
                None => break,
            },
            None => break,
        };

        if !should_shift(parser, &context, operator, &candidate)? {
            log::trace!("reduce before {:?} in context {:?}", current.id, context);
            break;
        }

        let newline = parser.newline_at_top_level();
        let chain = chain_id(&left);
        left = match left_role {
            Some(role) if !(newline && has_null) => led(parser, left, role)?,
            None if !newline => implicit_product(parser, left)?,
            _ => break,
        };

        // Merging into an existing chain widens the tree instead of deepening it.
        if !chain.is_some_and(|id| left.is_chain_of(&id)) {
            parser.enter()?;
            levels += 1;
        }
    }

    for _ in 0..=levels {
        parser.leave();
    }
    Ok(left)
}

fn chain_id(node: &Node) -> Option<String> {
    node.as_operator()
        .filter(|operator| operator.is_chain_of(&operator.id))
        .map(|operator| operator.id.clone())
}

/// Decides whether the candidate operator takes the expression parsed so
/// far as its left operand (shift), or whether that expression is complete
/// in `context` (reduce).
fn should_shift(parser: &Parser, context: &Binding, operator: Option<&str>, candidate: &Binding) -> Result<bool, Error> {
    if context.rbp < candidate.lbp {
        return Ok(false);
    }

    if context.rbp == candidate.lbp {
        if context.precedence < candidate.precedence {
            return Ok(false);
        }

        if context.precedence == candidate.precedence {
            let assoc_to_left = parser.config().assoc_to_left;
            match (context.associativity(), candidate.associativity()) {
                (Some(Associativity::NonAssociative), _) | (_, Some(Associativity::NonAssociative)) => {
                    return Err(Error::new(
                        ErrorImpl::AmbiguousNonAssociative {
                            first: operator.map(String::from).unwrap_or_default(),
                            second: parser.current().token.value.clone(),
                        },
                        parser.current().span().clone(),
                    ));
                }
                (Some(Associativity::Left), Some(Associativity::Left)) => return Ok(false),
                (Some(Associativity::Left), Some(Associativity::Right)) => return Ok(!assoc_to_left),
                (Some(Associativity::Right), Some(Associativity::Left)) => return Ok(assoc_to_left),
                _ => {}
            }
        }
    }

    log::trace!("shift {:?} in context {:?}", parser.current_id(), context);
    Ok(true)
}

/// Fails unless `operand` binds at least as tightly as `allowed`.
pub fn check_operand(operator: &str, operand: &Node, allowed: u32) -> Result<(), Error> {
    if operand.precedence() > allowed {
        return Err(Error::new(
            ErrorImpl::PrecedenceViolation {
                operator: String::from(operator),
                found: operand.precedence(),
                allowed,
            },
            operand.span().clone(),
        ));
    }
    Ok(())
}

fn is_sign(id: &str) -> bool {
    id == "+" || id == "-"
}

/// Span from `start` through the last consumed lexeme.
fn span_from(parser: &Parser, start: &Span) -> Span {
    match parser.previous() {
        Some(last) => start.to(last.span()),
        None => start.clone(),
    }
}

fn nud(parser: &mut Parser) -> Result<Node, Error> {
    let current = parser.current().clone();

    if let Some(previous) = parser.previous() {
        if is_sign(&previous.id) && is_sign(&current.id) {
            return Err(Error::new(
                ErrorImpl::AdjacentSignError {
                    previous: previous.id.clone(),
                    sign: current.id.clone(),
                },
                current.span().clone(),
            ));
        }
    }

    let Some(role) = current.null_role() else {
        return Err(Error::new(
            ErrorImpl::UndefinedNullDenotation { token: current.token.value.clone() },
            current.span().clone(),
        ));
    };

    match role.role {
        Role::Nilfix => parse_nilfix(parser, role),
        _ => parse_prefix(parser, role),
    }
}

fn parse_nilfix(parser: &mut Parser, role: &RoleEntry) -> Result<Node, Error> {
    let lexeme = parser.advance()?;
    let span = lexeme.token.span.clone();

    match lexeme.category {
        Category::Number => match lexeme.token.value.parse::<f64>() {
            Ok(value) => Ok(Node::number(value, span)),
            Err(_) => Err(Error::new(ErrorImpl::NumberParseError { token: lexeme.token.value.clone() }, span)),
        },
        Category::String => Ok(Node::String {
            value: lexeme.token.value,
            span,
        }),
        Category::Symbol => Ok(Node::symbol(&lexeme.token.value, span)),
        _ => {
            let trailing = match_pattern(parser, vec![], &role.pattern)?;
            let mut node = OperatorNode::new(&lexeme.id, Role::Nilfix, role.node_precedence, span_from(parser, &span));
            node.trailing = trailing;
            Ok(Node::Operator(node))
        }
    }
}

fn parse_prefix(parser: &mut Parser, role: &RoleEntry) -> Result<Node, Error> {
    let operator = parser.advance()?;
    if role.action == Action::Array {
        return parse_array(parser, &operator.id, operator.span(), role);
    }

    let operand = parse_operand(parser, role.binding, &operator.id)?;
    check_operand(&operator.id, &operand, role.binding.rbp)?;
    let trailing = match_pattern(parser, vec![], &role.pattern)?;
    let span = span_from(parser, operator.span());

    let node = match role.action {
        Action::Identity => operand,
        Action::Negate => negate(operand, role.node_precedence, span),
        _ => {
            let mut node = OperatorNode::new(&operator.id, Role::Prefix, role.node_precedence, span);
            node.right = Some(Box::new(operand));
            node.trailing = trailing;
            node.grouping = role.action == Action::Group;
            Node::Operator(node)
        }
    };

    Ok(node)
}

/// Comma-separated expressions up to the start of `role`'s closing pattern.
fn parse_arguments(parser: &mut Parser, role: &RoleEntry) -> Result<Vec<Node>, Error> {
    let mut args = vec![];
    if parser.current().keyword().is_some_and(|text| role.pattern.starts_with(text)) {
        return Ok(args);
    }

    loop {
        args.push(parse_expr(parser, Binding::statement())?);
        if parser.current_id() != "," {
            break;
        }
        parser.expect(",")?;
    }

    Ok(args)
}

fn parse_array(parser: &mut Parser, id: &str, start: &Span, role: &RoleEntry) -> Result<Node, Error> {
    let args = parse_arguments(parser, role)?;
    let trailing = match_pattern(parser, vec![], &role.pattern)?;

    let mut node = OperatorNode::new(id, Role::Prefix, role.node_precedence, span_from(parser, start));
    node.args = args;
    node.trailing = trailing;
    Ok(Node::Operator(node))
}

fn parse_call(parser: &mut Parser, left: Node, role: &RoleEntry) -> Result<Node, Error> {
    let open = parser.advance()?;
    let args = parse_arguments(parser, role)?;
    let trailing = match_pattern(parser, vec![], &role.pattern)?;
    check_operand(&open.id, &left, role.binding.lbp)?;

    let mut node = OperatorNode::new(&open.id, Role::Infix, role.node_precedence, span_from(parser, left.span()));
    node.left = Some(Box::new(left));
    node.args = args;
    node.trailing = trailing;
    Ok(Node::Operator(node))
}

fn led(parser: &mut Parser, left: Node, role: &RoleEntry) -> Result<Node, Error> {
    if matches!(role.action, Action::Call | Action::Index) {
        return parse_call(parser, left, role);
    }

    let operator = parser.advance()?;

    if role.role == Role::Suffix {
        let trailing = match_pattern(parser, vec![], &role.pattern)?;
        check_operand(&operator.id, &left, role.binding.lbp)?;

        let mut node = OperatorNode::new(&operator.id, Role::Suffix, role.node_precedence, span_from(parser, left.span()));
        node.left = Some(Box::new(left));
        node.trailing = trailing;
        return Ok(Node::Operator(node));
    }

    let right = parse_operand(parser, role.binding, &operator.id)?;
    let trailing = match_pattern(parser, vec![], &role.pattern)?;
    check_operand(&operator.id, &left, role.binding.lbp)?;
    check_operand(&operator.id, &right, role.binding.rbp)?;

    let span = span_from(parser, left.span());
    Ok(build_infix(parser, &operator.id, role, left, right, trailing, span))
}

/// Juxtaposed operands, parsed as if a `*` stood between them.
fn implicit_product(parser: &mut Parser, left: Node) -> Result<Node, Error> {
    let Some(role) = product_role(parser) else {
        return Err(Error::new(
            ErrorImpl::UndefinedLeftDenotation { token: parser.current().token.value.clone() },
            parser.current().span().clone(),
        ));
    };

    log::trace!("implicit product before {:?}", parser.current_id());

    let right = parse_operand(parser, role.binding, PRODUCT_ID)?;
    check_operand(PRODUCT_ID, &left, role.binding.lbp)?;
    check_operand(PRODUCT_ID, &right, role.binding.rbp)?;

    let span = left.span().to(right.span());
    Ok(build_infix(parser, PRODUCT_ID, role, left, right, vec![], span))
}

fn product_role<'a>(parser: &Parser<'a>) -> Option<&'a RoleEntry> {
    parser.grammar().lookup(PRODUCT_ID).and_then(|entry| entry.left.as_ref())
}

/// Node precedence of the infix `id`, or `fallback`'s when `id` has no infix role.
fn canonical_precedence(parser: &Parser, id: &str, fallback: &RoleEntry) -> u32 {
    parser
        .grammar()
        .lookup(id)
        .and_then(|entry| entry.left.as_ref())
        .map(|role| role.node_precedence)
        .unwrap_or(fallback.node_precedence)
}

fn build_infix(parser: &Parser, id: &str, role: &RoleEntry, left: Node, right: Node, trailing: Vec<Capture>, span: Span) -> Node {
    match role.action {
        Action::Sum | Action::Product | Action::Compound => chain(id, role.node_precedence, left, right, trailing, span),
        Action::Difference => {
            let negated = negate(right, canonical_precedence(parser, PRODUCT_ID, role), span.clone());
            chain(SUM_ID, canonical_precedence(parser, SUM_ID, role), left, negated, trailing, span)
        }
        Action::Quotient => {
            let mut power = OperatorNode::new(POWER_ID, Role::Infix, canonical_precedence(parser, POWER_ID, role), right.span().clone());
            power.right = Some(Box::new(Node::number(-1.0, right.span().clone())));
            power.left = Some(Box::new(right));
            chain(PRODUCT_ID, canonical_precedence(parser, PRODUCT_ID, role), left, Node::Operator(power), trailing, span)
        }
        _ => {
            let mut node = OperatorNode::new(id, Role::Infix, role.node_precedence, span);
            node.left = Some(Box::new(left));
            node.right = Some(Box::new(right));
            node.trailing = trailing;
            Node::Operator(node)
        }
    }
}

/// n-ary `id` node over both operands, merging operands that are already
/// unparenthesised `id` chains.
fn chain(id: &str, precedence: u32, left: Node, right: Node, trailing: Vec<Capture>, span: Span) -> Node {
    let mut node = OperatorNode::new(id, Role::Infix, precedence, span);

    for operand in [left, right] {
        match operand {
            Node::Operator(inner) if inner.is_chain_of(id) => node.args.extend(inner.args),
            other => node.args.push(other),
        }
    }

    node.trailing = trailing;
    Node::Operator(node)
}

/// Canonical negation: `-3` is a literal, `-(a * b)` without parentheses
/// gains a leading `-1` factor and anything else becomes `-1 * x`.
pub fn negate(node: Node, precedence: u32, span: Span) -> Node {
    match node {
        Node::Number { value, span } => Node::number(-value, span),
        Node::Operator(mut product) if product.is_chain_of(PRODUCT_ID) => {
            product.args.insert(0, Node::number(-1.0, span));
            Node::Operator(product)
        }
        other => {
            let mut product = OperatorNode::new(PRODUCT_ID, Role::Infix, precedence, span.clone());
            product.args = vec![Node::number(-1.0, span), other];
            Node::Operator(product)
        }
    }
}
