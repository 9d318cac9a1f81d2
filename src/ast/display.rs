//! Rendering of parsed trees.
//!
//! `Display` turns a tree back into spaced source text, undoing the
//! canonical forms where it can (`a + -1 * b` prints as `a - b`,
//! `a * b ^ -1` as `a / b`). [`Node::sexp`] gives an unambiguous
//! S-expression dump, which is what the tests compare against.

use std::fmt::{Display, Formatter, Result};

use super::ast::{Capture, Node, OperatorNode};

impl Display for Capture {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Capture::Keyword { text, .. } => write!(f, "{}", text),
            Capture::Expr(node) => write!(f, "{}", node),
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Node::Number { value, .. } if *value < 0.0 => write!(f, "- {}", -value),
            Node::Number { value, .. } => write!(f, "{}", value),
            Node::String { value, .. } => write!(f, "{:?}", value),
            Node::Symbol { name, .. } => write!(f, "{}", name),
            Node::Operator(node) => write_operator(f, node),
        }
    }
}

fn is_minus_one(node: &Node) -> bool {
    matches!(node, Node::Number { value, .. } if *value == -1.0)
}

fn is_reciprocal(node: &Node) -> bool {
    node.as_operator().is_some_and(|power| {
        power.id == "^" && power.left.is_some() && power.right.as_deref().is_some_and(is_minus_one)
    })
}

fn is_negative_term(node: &Node) -> bool {
    node.is_negative_number() || (node.is_chain_of("*") && node.as_operator().is_some_and(|product| product.args[0].is_negative_number()))
}

fn write_trailing(f: &mut Formatter<'_>, node: &OperatorNode) -> Result {
    for capture in &node.trailing {
        write!(f, " {}", capture)?;
    }
    Ok(())
}

fn write_operator(f: &mut Formatter<'_>, node: &OperatorNode) -> Result {
    if node.is_chain_of("+") {
        write!(f, "{}", node.args[0])?;
        for arg in &node.args[1..] {
            if is_negative_term(arg) {
                write!(f, " {}", arg)?;
            } else {
                write!(f, " + {}", arg)?;
            }
        }
        return write_trailing(f, node);
    }

    if node.is_chain_of("*") {
        let mut signed = is_minus_one(&node.args[0]);
        if signed {
            write!(f, "- ")?;
        } else {
            write!(f, "{}", node.args[0])?;
        }
        for arg in &node.args[1..] {
            match arg.as_operator() {
                Some(power) if is_reciprocal(arg) => {
                    if signed {
                        write!(f, "1")?;
                    }
                    if let Some(base) = &power.left {
                        write!(f, " / {}", base)?;
                    }
                }
                _ => {
                    if !signed {
                        write!(f, " * ")?;
                    }
                    write!(f, "{}", arg)?;
                }
            }
            signed = false;
        }
        return write_trailing(f, node);
    }

    if node.is_chain_of(";") {
        let parts: Vec<String> = node.args.iter().map(|arg| arg.to_string()).collect();
        write!(f, "{}", parts.join(" ; "))?;
        return write_trailing(f, node);
    }

    if let Some(left) = &node.left {
        write!(f, "{} ", left)?;
    }
    write!(f, "{}", node.id)?;
    if let Some(right) = &node.right {
        write!(f, " {}", right)?;
    }
    if !node.args.is_empty() {
        let parts: Vec<String> = node.args.iter().map(|arg| arg.to_string()).collect();
        write!(f, " {}", parts.join(" , "))?;
    }
    write_trailing(f, node)
}

impl Node {
    /// S-expression rendering: `a - b` gives `(+ a (* -1 b))`.
    pub fn sexp(&self) -> String {
        match self {
            Node::Number { value, .. } => value.to_string(),
            Node::String { value, .. } => format!("{:?}", value),
            Node::Symbol { name, .. } => name.clone(),
            Node::Operator(node) if node.grouping => match &node.right {
                Some(inner) => format!("(group {})", inner.sexp()),
                None => String::from("(group)"),
            },
            Node::Operator(node) => {
                let mut parts = vec![node.id.clone()];
                parts.extend(node.left.iter().map(|left| left.sexp()));
                parts.extend(node.right.iter().map(|right| right.sexp()));
                parts.extend(node.args.iter().map(|arg| arg.sexp()));
                parts.extend(node.trailing.iter().map(|capture| match capture {
                    Capture::Keyword { text, .. } => text.clone(),
                    Capture::Expr(expr) => expr.sexp(),
                }));
                format!("({})", parts.join(" "))
            }
        }
    }
}
