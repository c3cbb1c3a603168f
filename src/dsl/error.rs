//! Error types for parsing and evaluating queries.

use thiserror::Error;

use super::ast::{ExprType, Operator};

/// Errors raised while scanning or parsing a query. A failed parse never
/// yields a partial chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("syntax error at {pos}: expected {expected}, found {found}")]
    Syntax {
        pos: usize,
        expected: &'static str,
        found: String,
    },

    #[error("unsupported operator `{symbol}` at {pos}")]
    UnsupportedOperator { pos: usize, symbol: String },

    #[error("unsupported link `{symbol}` at {pos}")]
    UnsupportedLink { pos: usize, symbol: String },

    #[error("unterminated quoted literal starting at {pos}")]
    UnterminatedString { pos: usize },

    #[error("syntax error at {pos}: illegal character `{ch}`")]
    Illegal { pos: usize, ch: char },

    #[error("empty query")]
    Empty,

    #[error("invalid date format `{pattern}`: {reason}")]
    InvalidDateFormat { pattern: String, reason: String },
}

/// Errors raised while checking a record against a parsed chain.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("field not found: {0}")]
    FieldNotFound(String),

    #[error("field `{key}`: cannot compare {found} value as {expected}")]
    TypeMismatch {
        key: String,
        expected: ExprType,
        found: &'static str,
    },

    #[error("field `{key}`: `{value}` is not a valid {expected} value")]
    InvalidValue {
        key: String,
        expected: ExprType,
        value: String,
    },

    #[error("operator `{op}` is not defined for {expr_type} values")]
    UnsupportedOperator { op: Operator, expr_type: ExprType },

    #[error("no date format registered")]
    NoDateFormat,

    #[error("`{0}` does not match any registered date format")]
    UnparseableDate(String),

    #[error("record is not an object with named fields")]
    NotAnObject,

    #[error("failed to read record fields: {0}")]
    Serialize(#[from] serde_json::Error),
}
