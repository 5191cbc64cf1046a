use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use sv_core::{BinaryOp, ErrorKind, Expr, FlagKey, StorylineError};

pub const DEFAULT_MAX_EXPRESSION_DEPTH: usize = 32;
pub const DEFAULT_MAX_EXPRESSION_TERMS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprLimits {
    pub max_depth: usize,
    // Also bounds the height of the tree an unparenthesized chain folds into.
    pub max_terms: usize,
}

impl Default for ExprLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_EXPRESSION_DEPTH,
            max_terms: DEFAULT_MAX_EXPRESSION_TERMS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    Operator(BinaryOp),
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(word) => f.write_str(word),
            Self::Operator(op) => f.write_str(op.symbol()),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
        }
    }
}

/// Splits an expression on operators, parentheses, and whitespace.
///
/// A lone `=` or `!` is not an operator and comes back as a word so the
/// parser can reject it with the offending text.
pub fn tokenize(source: &str) -> Vec<Token> {
    let chars = source.chars().collect::<Vec<_>>();
    let mut tokens = Vec::new();
    let mut index = 0usize;

    while index < chars.len() {
        let ch = chars[index];
        if ch.is_whitespace() {
            index += 1;
            continue;
        }

        match ch {
            '(' => {
                tokens.push(Token::LParen);
                index += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                index += 1;
            }
            '<' | '>' | '=' | '!' => {
                let mut symbol = ch.to_string();
                if chars.get(index + 1) == Some(&'=') {
                    symbol.push('=');
                }
                index += symbol.len();
                tokens.push(match BinaryOp::from_symbol(&symbol) {
                    Some(op) => Token::Operator(op),
                    None => Token::Word(symbol),
                });
            }
            '+' => {
                tokens.push(Token::Operator(BinaryOp::Add));
                index += 1;
            }
            '-' => {
                tokens.push(Token::Operator(BinaryOp::Sub));
                index += 1;
            }
            _ => {
                let start = index;
                while index < chars.len() && !is_token_boundary(chars[index]) {
                    index += 1;
                }
                let word = chars[start..index].iter().collect::<String>();
                tokens.push(match word.as_str() {
                    "and" => Token::Operator(BinaryOp::And),
                    "or" => Token::Operator(BinaryOp::Or),
                    _ => Token::Word(word),
                });
            }
        }
    }

    tokens
}

pub fn parse_expression(source: &str) -> Result<Expr, StorylineError> {
    parse_expression_with_limits(source, ExprLimits::default())
}

pub fn parse_expression_with_limits(
    source: &str,
    limits: ExprLimits,
) -> Result<Expr, StorylineError> {
    let tokens = tokenize(source);
    let mut parser = ExprParser {
        tokens: &tokens,
        position: 0,
        terms: 0,
        limits,
    };

    let expr = parser.parse_binary(1, 0)?;
    match parser.peek() {
        Some(token) => Err(unexpected_token(token)),
        None => Ok(expr),
    }
}

struct ExprParser<'a> {
    tokens: &'a [Token],
    position: usize,
    terms: usize,
    limits: ExprLimits,
}

impl<'a> ExprParser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    // Precedence climbing: each loop iteration folds one operator of at least
    // `min_precedence` into `left`.
    fn parse_binary(&mut self, min_precedence: u8, depth: usize) -> Result<Expr, StorylineError> {
        let mut left = self.parse_term(depth)?;

        while let Some(Token::Operator(op)) = self.peek() {
            let op = *op;
            if op.precedence() < min_precedence {
                break;
            }
            self.position += 1;
            let right = self.parse_binary(op.precedence() + 1, depth)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_term(&mut self, depth: usize) -> Result<Expr, StorylineError> {
        match self.next() {
            None => Err(unexpected_eof()),
            Some(Token::Word(word)) => {
                self.terms += 1;
                if self.terms > self.limits.max_terms {
                    return Err(StorylineError::new(
                        ErrorKind::ExpressionSyntax,
                        "EXPR_TOO_LONG",
                        format!("Expression has more than {} terms", self.limits.max_terms),
                    ));
                }
                parse_word(word)
            }
            Some(Token::LParen) => {
                if depth + 1 > self.limits.max_depth {
                    return Err(StorylineError::new(
                        ErrorKind::ExpressionSyntax,
                        "EXPR_TOO_DEEP",
                        format!("Expression nesting exceeds {} levels", self.limits.max_depth),
                    ));
                }
                let inner = self.parse_binary(1, depth + 1)?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    Some(other) => Err(unexpected_token(other)),
                    None => Err(unexpected_eof()),
                }
            }
            Some(token @ (Token::Operator(_) | Token::RParen)) => Err(invalid_term(token)),
        }
    }
}

fn parse_word(word: &str) -> Result<Expr, StorylineError> {
    if word.chars().all(|ch| ch.is_ascii_digit()) {
        return word
            .parse::<i64>()
            .map(|value| Expr::Integer { value })
            .map_err(|_| invalid_term(word));
    }
    if identifier_regex().is_match(word) {
        return Ok(Expr::Flag {
            name: FlagKey::parse(word),
        });
    }
    Err(invalid_term(word))
}

fn invalid_term(token: impl fmt::Display) -> StorylineError {
    StorylineError::new(
        ErrorKind::ExpressionSyntax,
        "EXPR_INVALID_TERM",
        format!("Invalid term: {}", token),
    )
}

fn unexpected_token(token: &Token) -> StorylineError {
    StorylineError::new(
        ErrorKind::ExpressionSyntax,
        "EXPR_UNEXPECTED_TOKEN",
        format!("Unexpected token: {}", token),
    )
}

fn unexpected_eof() -> StorylineError {
    StorylineError::new(
        ErrorKind::ExpressionSyntax,
        "EXPR_UNEXPECTED_EOF",
        "unexpected EOF",
    )
}

fn is_token_boundary(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | '<' | '>' | '=' | '!' | '+' | '-')
}

fn identifier_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*$").expect("identifier regex"))
}
