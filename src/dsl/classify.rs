//! Literal type inference.
//!
//! The type of a condition's value comes from its surface form alone,
//! first match wins:
//!
//!   'single quoted'           -> time
//!   -?[0-9]+                  -> integer
//!   -?[0-9]+\.[0-9]+          -> float
//!   true | false | t | f      -> boolean (case-insensitive)
//!   anything else             -> literal
//!
//! Double quotes do not change the outcome: `"42"` is an integer and
//! `"t"` a boolean. A one-letter string `t` or `f` therefore can only be
//! matched as a boolean; this ambiguity is part of the surface syntax.

use super::ast::ExprType;
use super::lexer::{float_literal, integer_literal, matches_fully};

/// How a value was written in the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    Bare,
    Double,
    Single,
}

const BOOLEAN_TRUE: [&str; 2] = ["true", "t"];
const BOOLEAN_FALSE: [&str; 2] = ["false", "f"];

/// Infer the expression type of a raw literal.
pub fn classify(raw: &str, quoting: Quoting) -> ExprType {
    if quoting == Quoting::Single {
        ExprType::Time
    } else if matches_fully(integer_literal, raw) {
        ExprType::Integer
    } else if matches_fully(float_literal, raw) {
        ExprType::Float
    } else if parse_bool(raw).is_some() {
        ExprType::Boolean
    } else {
        ExprType::Literal
    }
}

/// Parse one of the recognized boolean spellings.
pub fn parse_bool(raw: &str) -> Option<bool> {
    if BOOLEAN_TRUE.iter().any(|b| raw.eq_ignore_ascii_case(b)) {
        Some(true)
    } else if BOOLEAN_FALSE.iter().any(|b| raw.eq_ignore_ascii_case(b)) {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cascade() {
        let cases = [
            ("string", Quoting::Bare, ExprType::Literal),
            ("42", Quoting::Bare, ExprType::Integer),
            ("-1337", Quoting::Bare, ExprType::Integer),
            ("3.14", Quoting::Bare, ExprType::Float),
            ("-3.14", Quoting::Bare, ExprType::Float),
            ("true", Quoting::Bare, ExprType::Boolean),
            ("FALSE", Quoting::Bare, ExprType::Boolean),
            ("t", Quoting::Bare, ExprType::Boolean),
            ("F", Quoting::Bare, ExprType::Boolean),
            ("2006-01-02", Quoting::Single, ExprType::Time),
            ("42", Quoting::Single, ExprType::Time),
            ("hello world", Quoting::Double, ExprType::Literal),
            ("", Quoting::Double, ExprType::Literal),
            ("3.", Quoting::Double, ExprType::Literal),
            (".5", Quoting::Double, ExprType::Literal),
            ("1e5", Quoting::Bare, ExprType::Literal),
            ("yes", Quoting::Bare, ExprType::Literal),
        ];
        for (raw, quoting, expected) in cases {
            assert_eq!(classify(raw, quoting), expected, "classify({raw:?})");
        }
    }

    #[test]
    fn test_double_quotes_keep_structural_type() {
        assert_eq!(classify("42", Quoting::Double), ExprType::Integer);
        assert_eq!(classify("42.1", Quoting::Double), ExprType::Float);
        assert_eq!(classify("true", Quoting::Double), ExprType::Boolean);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("T"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("0"), None);
    }
}
