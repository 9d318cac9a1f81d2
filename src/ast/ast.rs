use crate::{grammar::symbol_table::Role, Span};

/// Something a continuation pattern captured after an operator.
#[derive(Debug, Clone)]
pub enum Capture {
    Keyword { text: String, span: Span },
    Expr(Node),
}

impl PartialEq for Capture {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Capture::Keyword { text: a, .. }, Capture::Keyword { text: b, .. }) => a == b,
            (Capture::Expr(a), Capture::Expr(b)) => a == b,
            _ => false,
        }
    }
}

/// An operator applied to its operands.
///
/// Binary operators fill `left`/`right`; flattened chains (`a + b + c`) and
/// argument lists (`f(a, b)`, `[a, b]`) use `args`. Keywords and
/// sub-expressions matched by the operator's continuation pattern are kept
/// in `trailing`, in source order.
#[derive(Debug, Clone)]
pub struct OperatorNode {
    pub id: String,
    pub role: Role,
    pub left: Option<Box<Node>>,
    pub right: Option<Box<Node>>,
    pub args: Vec<Node>,
    pub trailing: Vec<Capture>,
    pub precedence: u32,
    /// Set for parenthesised groups, which are never flattened into.
    pub grouping: bool,
    pub span: Span,
}

impl OperatorNode {
    pub fn new(id: &str, role: Role, precedence: u32, span: Span) -> Self {
        OperatorNode {
            id: String::from(id),
            role,
            left: None,
            right: None,
            args: vec![],
            trailing: vec![],
            precedence,
            grouping: false,
            span,
        }
    }

    /// Whether this node is an unparenthesised n-ary chain of `id`.
    pub fn is_chain_of(&self, id: &str) -> bool {
        self.id == id && self.role == Role::Infix && !self.grouping && self.left.is_none() && !self.args.is_empty()
    }
}

// Spans are ignored so that trees parsed from different sources compare equal.
impl PartialEq for OperatorNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.role == other.role
            && self.left == other.left
            && self.right == other.right
            && self.args == other.args
            && self.trailing == other.trailing
            && self.precedence == other.precedence
            && self.grouping == other.grouping
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    Number { value: f64, span: Span },
    String { value: String, span: Span },
    Symbol { name: String, span: Span },
    Operator(OperatorNode),
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Number { value: a, .. }, Node::Number { value: b, .. }) => a == b,
            (Node::String { value: a, .. }, Node::String { value: b, .. }) => a == b,
            (Node::Symbol { name: a, .. }, Node::Symbol { name: b, .. }) => a == b,
            (Node::Operator(a), Node::Operator(b)) => a == b,
            _ => false,
        }
    }
}

impl Node {
    pub fn number(value: f64, span: Span) -> Self {
        Node::Number { value, span }
    }

    pub fn symbol(name: &str, span: Span) -> Self {
        Node::Symbol { name: String::from(name), span }
    }

    /// Precedence the node presents to an enclosing operator. Leaves are atomic.
    pub fn precedence(&self) -> u32 {
        match self {
            Node::Operator(node) => node.precedence,
            _ => 0,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Node::Number { span, .. } | Node::String { span, .. } | Node::Symbol { span, .. } => span,
            Node::Operator(node) => &node.span,
        }
    }

    pub fn as_operator(&self) -> Option<&OperatorNode> {
        match self {
            Node::Operator(node) => Some(node),
            _ => None,
        }
    }

    pub fn is_chain_of(&self, id: &str) -> bool {
        self.as_operator().is_some_and(|node| node.is_chain_of(id))
    }

    pub fn is_negative_number(&self) -> bool {
        matches!(self, Node::Number { value, .. } if *value < 0.0)
    }

    /// Whether an argument list may follow directly, as in `f(x)` or `m[1](x)`.
    pub fn is_callable(&self) -> bool {
        match self {
            Node::Symbol { .. } => true,
            // Calls and indexing are the only infix nodes without a right operand.
            Node::Operator(node) => node.role == Role::Infix && node.left.is_some() && node.right.is_none(),
            _ => false,
        }
    }

    /// The tree with parenthesised groups removed and the `+`, `*` and `;`
    /// chains they separated merged again.
    pub fn normalized(&self) -> Node {
        match self {
            Node::Operator(node) if node.grouping => match &node.right {
                Some(inner) => inner.normalized(),
                None => self.clone(),
            },
            Node::Operator(node) => {
                let mut out = node.clone();
                out.left = node.left.as_ref().map(|left| Box::new(left.normalized()));
                out.right = node.right.as_ref().map(|right| Box::new(right.normalized()));
                out.trailing = node
                    .trailing
                    .iter()
                    .map(|capture| match capture {
                        Capture::Expr(expr) => Capture::Expr(expr.normalized()),
                        keyword => keyword.clone(),
                    })
                    .collect();

                let flattens = node.is_chain_of(&node.id) && matches!(node.id.as_str(), "+" | "*" | ";");
                out.args = vec![];
                for arg in &node.args {
                    let arg = arg.normalized();
                    match arg {
                        Node::Operator(inner) if flattens && inner.is_chain_of(&node.id) => out.args.extend(inner.args),
                        other => out.args.push(other),
                    }
                }

                Node::Operator(out)
            }
            leaf => leaf.clone(),
        }
    }
}
