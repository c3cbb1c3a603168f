//! Filter query language for single-record matching.
//!
//! Syntax:
//!   key == value            - equality (strings compare case-insensitively)
//!   key != value            - inequality
//!   key > n, key <= n, ...  - ordering (numbers and dates only)
//!   not key == value        - negate one condition
//!   cond & cond, cond && cond, cond AND cond
//!   cond | cond, cond || cond, cond OR cond
//!
//! Values are bare words, numbers, `"double quoted"` strings with
//! backslash escapes, or `'single quoted'` dates. Conditions fold strictly
//! left to right: `a & b | c` is `(a & b) | c`.

mod ast;
mod classify;
mod dates;
mod error;
mod eval;
mod lexer;
mod parser;

pub use ast::*;
pub use classify::{Quoting, classify, parse_bool};
pub use error::{EvalError, ParseError};
pub use lexer::{Scanner, Token, TokenKind, tokenize};
pub use parser::parse_query;
