//! The operator registry.
//!
//! Operators are registered with a Prolog-style specification (`xfy`, `fx`,
//! ...) that fixes both the fixity and the associativity. Precedences follow
//! the Prolog convention: a numerically smaller precedence binds tighter,
//! atoms sit at 0 and ordinary operators range up to [`LOOSEST_PRECEDENCE`].

use std::{collections::HashMap, fmt::Display, str::FromStr};

use crate::errors::errors::{Error, ErrorImpl};

use super::pattern::Pattern;

/// Precedence of the loosest ordinary operator.
pub const LOOSEST_PRECEDENCE: u32 = 1200;

/// Precedence of a whole statement; every operator fits inside it.
pub const STATEMENT_PRECEDENCE: u32 = LOOSEST_PRECEDENCE + 1;

/// Grammar identifiers of the literal categories and the end marker.
pub const NUMBER_ID: &str = "(number)";
pub const STRING_ID: &str = "(string)";
pub const SYMBOL_ID: &str = "(symbol)";
pub const END_ID: &str = "(end)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Nilfix,
    Prefix,
    Suffix,
    Infix,
}

impl Role {
    /// Null roles apply when no left operand has been parsed yet.
    pub fn is_null(&self) -> bool {
        matches!(self, Role::Nilfix | Role::Prefix)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Prolog operator specification: `f` marks the operator, `x` an operand
/// that must bind strictly tighter and `y` one that may bind equally tight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spec {
    F,
    Fx,
    Fy,
    Xf,
    Yf,
    Xfx,
    Xfy,
    Yfx,
}

impl Spec {
    pub fn role(&self) -> Role {
        match self {
            Spec::F => Role::Nilfix,
            Spec::Fx | Spec::Fy => Role::Prefix,
            Spec::Xf | Spec::Yf => Role::Suffix,
            Spec::Xfx | Spec::Xfy | Spec::Yfx => Role::Infix,
        }
    }

    /// Binding powers for an operator of this specification at `precedence`.
    pub fn binding(&self, precedence: u32) -> Binding {
        let tighter = precedence.saturating_sub(1);
        let (lbp, rbp) = match self {
            Spec::F => (0, 0),
            Spec::Fx => (0, tighter),
            Spec::Fy => (0, precedence),
            Spec::Xf => (tighter, 0),
            Spec::Yf => (precedence, 0),
            Spec::Xfx => (tighter, tighter),
            Spec::Xfy => (tighter, precedence),
            Spec::Yfx => (precedence, tighter),
        };

        Binding { precedence, lbp, rbp }
    }
}

impl FromStr for Spec {
    type Err = Error;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        match spec {
            "f" => Ok(Spec::F),
            "fx" => Ok(Spec::Fx),
            "fy" => Ok(Spec::Fy),
            "xf" => Ok(Spec::Xf),
            "yf" => Ok(Spec::Yf),
            "xfx" => Ok(Spec::Xfx),
            "xfy" => Ok(Spec::Xfy),
            "yfx" => Ok(Spec::Yfx),
            _ => Err(Error::unlocated(ErrorImpl::InvalidSpecification { spec: String::from(spec) })),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
    NonAssociative,
}

/// Precedence and binding powers of one role, or of a parsing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub precedence: u32,
    pub lbp: u32,
    pub rbp: u32,
}

impl Binding {
    /// Context for a sub-expression that may reach `precedence` on both sides.
    pub fn context(precedence: u32) -> Self {
        Binding { precedence, lbp: precedence, rbp: precedence }
    }

    pub fn statement() -> Self {
        Binding::context(STATEMENT_PRECEDENCE)
    }

    /// Associativity implied by the binding powers, if they imply one.
    pub fn associativity(&self) -> Option<Associativity> {
        let Binding { precedence: p, lbp, rbp } = *self;

        if (p == lbp + 1 && p > rbp) || (p == rbp + 1 && p > lbp) {
            Some(Associativity::NonAssociative)
        } else if p == lbp && p > rbp {
            Some(Associativity::Left)
        } else if p == rbp && p > lbp {
            Some(Associativity::Right)
        } else {
            None
        }
    }
}

/// How a role turns its operands into a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Plain operator node with `left`/`right` operands.
    Default,
    /// Parenthesised sub-expression.
    Group,
    /// Unary plus: the operand itself.
    Identity,
    /// Unary minus, canonicalised to a product with `-1`.
    Negate,
    /// n-ary addition.
    Sum,
    /// Subtraction, canonicalised to addition of the negated operand.
    Difference,
    /// n-ary multiplication.
    Product,
    /// Division, canonicalised to multiplication by the operand to the `-1`.
    Quotient,
    /// n-ary sequencing.
    Compound,
    /// Function call with a comma-separated argument list.
    Call,
    /// Indexing with a comma-separated index list.
    Index,
    /// Array literal.
    Array,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleEntry {
    pub role: Role,
    pub binding: Binding,
    pub pattern: Pattern,
    pub action: Action,
    /// Precedence recorded on the node this role produces.
    pub node_precedence: u32,
}

impl RoleEntry {
    pub fn new(spec: Spec, precedence: u32, pattern: Pattern) -> Self {
        RoleEntry {
            role: spec.role(),
            binding: spec.binding(precedence),
            pattern,
            action: Action::Default,
            node_precedence: precedence,
        }
    }

    pub fn precedence(&self) -> u32 {
        self.binding.precedence
    }

    pub fn with_action(&mut self, action: Action) -> &mut Self {
        self.action = action;
        self
    }

    pub fn with_rbp(&mut self, rbp: u32) -> &mut Self {
        self.binding.rbp = rbp;
        self
    }

    pub fn with_node_precedence(&mut self, precedence: u32) -> &mut Self {
        self.node_precedence = precedence;
        self
    }
}

/// The roles one identifier can play: at most one null role (nilfix or
/// prefix) and one left role (suffix or infix). An entry with neither is a
/// reserved keyword such as `then` or `)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarEntry {
    pub id: String,
    pub null: Option<RoleEntry>,
    pub left: Option<RoleEntry>,
}

impl GrammarEntry {
    pub fn new(id: &str) -> Self {
        GrammarEntry {
            id: String::from(id),
            null: None,
            left: None,
        }
    }

    pub fn is_reserved(&self) -> bool {
        self.null.is_none() && self.left.is_none()
    }
}

/// Registry mapping identifiers to their grammar entries.
///
/// The table is built up front and only read while parsing, so one table can
/// serve any number of concurrent parses.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: HashMap<String, GrammarEntry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable { entries: HashMap::new() }
    }

    /// Returns the entry for `id`, creating a bare keyword entry if needed.
    pub fn symbol(&mut self, id: &str) -> &mut GrammarEntry {
        self.entries
            .entry(String::from(id))
            .or_insert_with(|| GrammarEntry::new(id))
    }

    /// Registers `id` in the role implied by `spec`, replacing any earlier
    /// definition of the same role slot. Keywords named by `pattern` are
    /// registered as reserved symbols.
    pub fn register(&mut self, id: &str, spec: Spec, precedence: u32, pattern: Pattern) -> &mut RoleEntry {
        for keyword in pattern.keywords() {
            if !self.entries.contains_key(keyword) {
                self.entries.insert(String::from(keyword), GrammarEntry::new(keyword));
            }
        }

        log::debug!("register {:?} as {:?} at {}", id, spec, precedence);

        let entry = RoleEntry::new(spec, precedence, pattern);
        let symbol = self.symbol(id);
        let slot = if entry.role.is_null() { &mut symbol.null } else { &mut symbol.left };
        slot.insert(entry)
    }

    /// Like [`register`](Self::register) but takes the specification as text.
    pub fn register_str(&mut self, id: &str, spec: &str, precedence: u32, pattern: Pattern) -> Result<&mut RoleEntry, Error> {
        let spec = spec.parse::<Spec>()?;
        Ok(self.register(id, spec, precedence, pattern))
    }

    pub fn lookup(&self, id: &str) -> Option<&GrammarEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn nilfix(&mut self, id: &str, precedence: u32, pattern: Pattern) -> &mut RoleEntry {
        self.register(id, Spec::F, precedence, pattern)
    }

    pub fn prefix_n(&mut self, id: &str, precedence: u32, pattern: Pattern) -> &mut RoleEntry {
        self.register(id, Spec::Fx, precedence, pattern)
    }

    pub fn prefix(&mut self, id: &str, precedence: u32, pattern: Pattern) -> &mut RoleEntry {
        self.register(id, Spec::Fy, precedence, pattern)
    }

    pub fn suffix_n(&mut self, id: &str, precedence: u32, pattern: Pattern) -> &mut RoleEntry {
        self.register(id, Spec::Xf, precedence, pattern)
    }

    pub fn suffix(&mut self, id: &str, precedence: u32, pattern: Pattern) -> &mut RoleEntry {
        self.register(id, Spec::Yf, precedence, pattern)
    }

    pub fn infix_n(&mut self, id: &str, precedence: u32, pattern: Pattern) -> &mut RoleEntry {
        self.register(id, Spec::Xfx, precedence, pattern)
    }

    pub fn infix_r(&mut self, id: &str, precedence: u32, pattern: Pattern) -> &mut RoleEntry {
        self.register(id, Spec::Xfy, precedence, pattern)
    }

    pub fn infix_l(&mut self, id: &str, precedence: u32, pattern: Pattern) -> &mut RoleEntry {
        self.register(id, Spec::Yfx, precedence, pattern)
    }
}
