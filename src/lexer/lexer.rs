use std::sync::Arc;

use regex::Regex;

use crate::{errors::errors::{Error, ErrorImpl}, Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind};

pub type RegexHandler = fn(&mut Lexer, &Regex);

/// Characters that make up multi-character operators.
///
/// An operator is one character from `prefix` followed by any run of
/// characters from `suffix`, so with the defaults `<<=` and `!=` are single
/// operators while `(` or `,` always stand alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorChars {
    pub prefix: String,
    pub suffix: String,
}

impl Default for OperatorChars {
    fn default() -> Self {
        OperatorChars {
            prefix: String::from("!#%&*+-/<=>^|~"),
            suffix: String::from("&+-<=>|"),
        }
    }
}

impl OperatorChars {
    pub fn new(prefix: &str, suffix: &str) -> Self {
        OperatorChars {
            prefix: String::from(prefix),
            suffix: String::from(suffix),
        }
    }

    fn regex(&self) -> Regex {
        let class = |chars: &str| chars.chars().map(|c| regex::escape(&c.to_string())).collect::<String>();
        let pattern = if self.suffix.is_empty() {
            format!("^[{}]", class(&self.prefix))
        } else {
            format!("^[{}][{}]*", class(&self.prefix), class(&self.suffix))
        };
        // Escaped character classes built from literal chars are always valid.
        Regex::new(&pattern).unwrap_or_else(|_| Regex::new("^[^\\s\\w\"]").unwrap())
    }
}

#[derive(Clone)]
pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

#[derive(Clone)]
pub struct Lexer {
    patterns: Vec<RegexPattern>,
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    file: Arc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>, operators: &OperatorChars) -> Lexer {
        let file_name = if let Some(file) = file {
            Arc::new(file)
        } else {
            Arc::new(String::from("shell"))
        };

        let mut patterns = vec![
            RegexPattern { regex: Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
            RegexPattern { regex: Regex::new("^[0-9]+(\\.[0-9]+)?([eE][+-]?[0-9]+)?").unwrap(), handler: number_handler },
            RegexPattern { regex: Regex::new("^\\n").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Newline, "\n") },
            RegexPattern { regex: Regex::new("^[ \\t\\r]+").unwrap(), handler: skip_handler },
            RegexPattern { regex: Regex::new("^\"[^\"]*\"").unwrap(), handler: string_handler },
            RegexPattern { regex: Regex::new("^//[^\\n]*").unwrap(), handler: skip_handler },
        ];

        if !operators.prefix.is_empty() {
            patterns.push(RegexPattern { regex: operators.regex(), handler: operator_handler });
        }

        // Any other punctuation is a single-character operator.
        patterns.push(RegexPattern { regex: Regex::new("^[^\\s\\w\"]").unwrap(), handler: operator_handler });

        Lexer {
            pos: 0,
            tokens: vec![],
            patterns,
            source,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or('\0')
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Span of the next `len` bytes.
    pub fn span_of(&self, len: usize) -> Span {
        Span {
            start: Position(self.pos as u32, Arc::clone(&self.file)),
            end: Position((self.pos + len) as u32, Arc::clone(&self.file)),
        }
    }

    fn matched(&self, regex: &Regex) -> String {
        regex.find(self.remainder()).map(|m| m.as_str().to_string()).unwrap_or_default()
    }
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    let span = lexer.span_of(matched.len());

    lexer.advance_n(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::Number, matched, span));
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    lexer.advance_n(matched.len());
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    let span = lexer.span_of(matched.len());
    let string_literal = &matched[1..matched.len() - 1];

    let mut result = String::new();
    let mut chars = string_literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.peek() {
                Some('n') => {
                    result.push('\n');
                    chars.next();
                }
                Some('t') => {
                    result.push('\t');
                    chars.next();
                }
                Some('\\') => {
                    result.push('\\');
                    chars.next();
                }
                _ => result.push(ch), // Keep the backslash
            }
        } else {
            result.push(ch);
        }
    }

    lexer.advance_n(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::String, result, span));
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = lexer.matched(regex);
    let span = lexer.span_of(value.len());

    lexer.advance_n(value.len());
    lexer.push(MK_TOKEN!(TokenKind::Symbol, value, span));
}

fn operator_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = lexer.matched(regex);
    let span = lexer.span_of(value.len());

    lexer.advance_n(value.len());
    lexer.push(MK_TOKEN!(TokenKind::Operator, value, span));
}

/// Tokenizes `source` with the default operator character set.
pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    tokenize_with(source, file, &OperatorChars::default())
}

pub fn tokenize_with(source: String, file: Option<String>, operators: &OperatorChars) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file, operators);
    let patterns = lex.patterns.clone();

    while !lex.at_eof() {
        let mut matched = false;

        for pattern in patterns.iter() {
            if pattern.regex.is_match(lex.remainder()) {
                (pattern.handler)(&mut lex, &pattern.regex);
                matched = true;
                break;
            }
        }

        if !matched {
            let span = lex.span_of(lex.at().len_utf8());
            return Err(Error::new(ErrorImpl::UnrecognisedToken { token: lex.at().to_string() }, span));
        }
    }

    log::debug!("tokenized {} into {} tokens", lex.file, lex.tokens.len());

    let span = lex.span_of(0);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
    Ok(lex.tokens)
}
