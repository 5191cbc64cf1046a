mod document;
mod expr;

pub use document::{parse_storyline_source, DocumentFormat};
pub use expr::{
    parse_expression, parse_expression_with_limits, tokenize, ExprLimits, Token,
    DEFAULT_MAX_EXPRESSION_DEPTH, DEFAULT_MAX_EXPRESSION_TERMS,
};
