//! Parser state and entry points.
//!
//! The `Parser` struct is the token cursor: it walks the token stream,
//! resolves every token against the symbol table, skips newline tokens while
//! remembering that it did, and tracks parenthesis and bracket nesting so
//! that newlines only separate statements at the top level.
//!
//! All state of a parse lives here, so one symbol table can drive any number
//! of parses at once.

use crate::{
    ast::ast::Node,
    config::ParserConfig,
    errors::errors::{Error, ErrorImpl},
    grammar::symbol_table::{GrammarEntry, RoleEntry, SymbolTable, END_ID, NUMBER_ID, STRING_ID, SYMBOL_ID},
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind},
    },
    Position, Span,
};

use super::{lookups::DEFAULT_GRAMMAR, stmt::parse_statements};

/// How the cursor classified a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Number,
    String,
    Symbol,
    Operator,
    /// A symbol that names a grammar entry, such as `if` or `then`.
    Reserved,
    End,
}

/// A token resolved against the symbol table.
#[derive(Debug, Clone)]
pub struct Lexeme<'a> {
    /// Grammar identifier: the operator text, or `(number)` and friends.
    pub id: String,
    pub category: Category,
    pub token: Token,
    pub entry: Option<&'a GrammarEntry>,
}

impl<'a> Lexeme<'a> {
    pub fn null_role(&self) -> Option<&'a RoleEntry> {
        self.entry.and_then(|entry| entry.null.as_ref())
    }

    pub fn left_role(&self) -> Option<&'a RoleEntry> {
        self.entry.and_then(|entry| entry.left.as_ref())
    }

    /// Text a continuation pattern can match; literals never match keywords.
    pub fn keyword(&self) -> Option<&str> {
        match self.category {
            Category::Operator | Category::Reserved => Some(&self.id),
            _ => None,
        }
    }

    pub fn span(&self) -> &Span {
        &self.token.span
    }
}

/// The main parser structure that maintains parsing state.
pub struct Parser<'a> {
    /// The list of tokens to parse
    tokens: Vec<Token>,
    /// Index of the next unread token
    pos: usize,
    grammar: &'a SymbolTable,
    config: ParserConfig,
    current: Lexeme<'a>,
    previous: Option<Lexeme<'a>>,
    previous_previous: Option<Lexeme<'a>>,
    /// Whether newlines were skipped right before `current`
    newline_flag: bool,
    paren_depth: i32,
    bracket_depth: i32,
    /// Current nesting of `parse_expr` calls
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser positioned on the first token.
    pub fn new(tokens: Vec<Token>, grammar: &'a SymbolTable, config: ParserConfig) -> Result<Self, Error> {
        let placeholder = Lexeme {
            id: String::from(END_ID),
            category: Category::End,
            token: Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span::null(),
            },
            entry: None,
        };

        let mut parser = Parser {
            tokens,
            pos: 0,
            grammar,
            config,
            current: placeholder,
            previous: None,
            previous_previous: None,
            newline_flag: false,
            paren_depth: 0,
            bracket_depth: 0,
            depth: 0,
        };
        parser.current = parser.read_lexeme()?;
        Ok(parser)
    }

    /// Reads the next lexeme, skipping and recording newlines.
    fn read_lexeme(&mut self) -> Result<Lexeme<'a>, Error> {
        self.newline_flag = false;
        while self.pos < self.tokens.len() && self.tokens[self.pos].kind == TokenKind::Newline {
            self.newline_flag = true;
            self.pos += 1;
        }

        let Some(token) = self.tokens.get(self.pos).cloned() else {
            return Ok(self.end_lexeme());
        };
        self.pos += 1;

        let (id, category) = match token.kind {
            TokenKind::Number => (String::from(NUMBER_ID), Category::Number),
            TokenKind::String => (String::from(STRING_ID), Category::String),
            TokenKind::Symbol if self.grammar.contains(&token.value) => (token.value.clone(), Category::Reserved),
            TokenKind::Symbol => (String::from(SYMBOL_ID), Category::Symbol),
            TokenKind::Operator if self.grammar.contains(&token.value) => (token.value.clone(), Category::Operator),
            TokenKind::Operator => {
                return Err(Error::new(ErrorImpl::UnknownOperator { operator: token.value.clone() }, token.span.clone()));
            }
            TokenKind::EOF | TokenKind::Newline => (String::from(END_ID), Category::End),
        };

        Ok(Lexeme {
            entry: self.grammar.lookup(&id),
            id,
            category,
            token,
        })
    }

    fn end_lexeme(&self) -> Lexeme<'a> {
        let at = self
            .tokens
            .last()
            .map(|token| token.span.end.clone())
            .unwrap_or_else(Position::null);

        Lexeme {
            id: String::from(END_ID),
            category: Category::End,
            token: Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span { start: at.clone(), end: at },
            },
            entry: self.grammar.lookup(END_ID),
        }
    }

    /// Returns the current lexeme without advancing.
    pub fn current(&self) -> &Lexeme<'a> {
        &self.current
    }

    pub fn current_id(&self) -> &str {
        &self.current.id
    }

    /// The most recently consumed lexeme.
    pub fn previous(&self) -> Option<&Lexeme<'a>> {
        self.previous.as_ref()
    }

    /// The lexeme consumed before [`previous`](Self::previous).
    pub fn previous_previous(&self) -> Option<&Lexeme<'a>> {
        self.previous_previous.as_ref()
    }

    /// Consumes the current lexeme and returns it.
    pub fn advance(&mut self) -> Result<Lexeme<'a>, Error> {
        match self.current.id.as_str() {
            "(" => self.paren_depth += 1,
            ")" => self.paren_depth -= 1,
            "[" => self.bracket_depth += 1,
            "]" => self.bracket_depth -= 1,
            _ => {}
        }

        let next = self.read_lexeme()?;
        let consumed = std::mem::replace(&mut self.current, next);
        self.previous_previous = self.previous.replace(consumed.clone());
        Ok(consumed)
    }

    /// Consumes the current lexeme, which must have the identifier `id`.
    pub fn expect(&mut self, id: &str) -> Result<Lexeme<'a>, Error> {
        if self.current.id != id {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    expected: String::from(id),
                    found: self.current.token.value.clone(),
                },
                self.current.span().clone(),
            ));
        }

        self.advance()
    }

    pub fn at_end(&self) -> bool {
        self.current.category == Category::End
    }

    pub fn newline_flag(&self) -> bool {
        self.newline_flag
    }

    /// Whether a newline precedes the current token outside any brackets.
    pub fn newline_at_top_level(&self) -> bool {
        self.newline_flag && self.paren_depth == 0 && self.bracket_depth == 0
    }

    pub fn nesting(&self) -> (i32, i32) {
        (self.paren_depth, self.bracket_depth)
    }

    pub fn grammar(&self) -> &'a SymbolTable {
        self.grammar
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Records one more level of nesting, either a sub-expression or a node
    /// stacked onto the left operand, failing past the configured limit.
    pub fn enter(&mut self) -> Result<(), Error> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(Error::new(
                ErrorImpl::NestingTooDeep { limit: self.config.max_depth },
                self.current.span().clone(),
            ));
        }
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Parses a token stream with the default grammar and configuration.
///
/// Returns one tree per statement, in source order.
pub fn parse(tokens: Vec<Token>) -> Result<Vec<Node>, Error> {
    parse_with(tokens, &DEFAULT_GRAMMAR, ParserConfig::default())
}

pub fn parse_with(tokens: Vec<Token>, grammar: &SymbolTable, config: ParserConfig) -> Result<Vec<Node>, Error> {
    let mut parser = Parser::new(tokens, grammar, config)?;
    parse_statements(&mut parser)
}

/// Tokenizes and parses `source` with the defaults.
pub fn parse_source(source: &str, file: Option<String>) -> Result<Vec<Node>, Error> {
    let tokens = tokenize(String::from(source), file)?;
    parse(tokens)
}
