//! Data model for parsed queries.

use std::cmp::Ordering;
use std::fmt;

use super::dates::DateFormats;
use super::error::ParseError;

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq, // ==
    Ne, // !=
    Gt, // >
    Lt, // <
    Ge, // >=
    Le, // <=
}

impl Operator {
    /// Map a scanned operator symbol to an operator.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(Operator::Eq),
            "!=" => Some(Operator::Ne),
            ">" => Some(Operator::Gt),
            "<" => Some(Operator::Lt),
            ">=" => Some(Operator::Ge),
            "<=" => Some(Operator::Le),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
        }
    }

    /// True for `>`, `<`, `>=` and `<=`.
    pub fn is_ordering(self) -> bool {
        !matches!(self, Operator::Eq | Operator::Ne)
    }

    /// Apply the operator to the result of comparing field (left) with
    /// literal (right). Incomparable values (`None`) only satisfy `!=`.
    pub fn apply(self, ord: Option<Ordering>) -> bool {
        match self {
            Operator::Eq => ord == Some(Ordering::Equal),
            Operator::Ne => ord != Some(Ordering::Equal),
            Operator::Gt => ord == Some(Ordering::Greater),
            Operator::Lt => ord == Some(Ordering::Less),
            Operator::Ge => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
            Operator::Le => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// How a condition combines with the next one in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    And,
    Or,
    /// Last condition of the chain.
    Eof,
}

impl Link {
    /// Map a scanned link symbol or keyword to a link.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "&" | "&&" => Some(Link::And),
            "|" | "||" => Some(Link::Or),
            s if s.eq_ignore_ascii_case("and") => Some(Link::And),
            s if s.eq_ignore_ascii_case("or") => Some(Link::Or),
            _ => None,
        }
    }

    /// Fold `left` and `right` with this link. `Eof` keeps `left`.
    pub fn combine(self, left: bool, right: bool) -> bool {
        match self {
            Link::And => left && right,
            Link::Or => left || right,
            Link::Eof => left,
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::And => f.write_str("&"),
            Link::Or => f.write_str("|"),
            Link::Eof => Ok(()),
        }
    }
}

/// Inferred type of a condition's literal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprType {
    Literal,
    Integer,
    Float,
    Boolean,
    Time,
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExprType::Literal => "literal",
            ExprType::Integer => "integer",
            ExprType::Float => "float",
            ExprType::Boolean => "boolean",
            ExprType::Time => "time",
        };
        f.write_str(name)
    }
}

/// One `[not] key op value` predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub key: String,
    pub operator: Operator,
    /// Literal text with quotes and escapes removed.
    pub expression: String,
    pub expr_type: ExprType,
    /// Link to the next condition; `Link::Eof` on the last one.
    pub link: Link,
    pub negated: bool,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("not ")?;
        }
        write!(f, "{} {} ", self.key, self.operator)?;
        match self.expr_type {
            ExprType::Literal => {
                f.write_str("\"")?;
                for c in self.expression.chars() {
                    if c == '"' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str("\"")
            }
            ExprType::Time => write!(f, "'{}'", self.expression),
            ExprType::Integer | ExprType::Float | ExprType::Boolean => {
                f.write_str(&self.expression)
            }
        }
    }
}

/// A parsed query: conditions folded strictly left to right.
///
/// The conditions are fixed once parsing succeeds. The only mutable part
/// is the list of accepted date formats, which takes `&mut self` and so
/// cannot race with evaluation through `&self`.
#[derive(Debug, Clone)]
pub struct PredicateChain {
    conditions: Vec<Condition>,
    pub(crate) formats: DateFormats,
}

impl PredicateChain {
    pub(crate) fn new(conditions: Vec<Condition>) -> Self {
        PredicateChain {
            conditions,
            formats: DateFormats::default(),
        }
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Register a date format, tried after all previously registered ones
    /// whenever a time value has to be parsed. Fails if `pattern` is not a
    /// valid format description.
    pub fn add_date_format(&mut self, pattern: &str) -> Result<(), ParseError> {
        self.formats.push(pattern)
    }

    /// Registered date format patterns in the order they are tried.
    pub fn date_formats(&self) -> impl Iterator<Item = &str> {
        self.formats.patterns()
    }
}

/// Chains are equal when their conditions are; date formats are ignored.
impl PartialEq for PredicateChain {
    fn eq(&self, other: &Self) -> bool {
        self.conditions == other.conditions
    }
}

impl fmt::Display for PredicateChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cond in &self.conditions {
            write!(f, "{}", cond)?;
            if cond.link != Link::Eof {
                write!(f, " {} ", cond.link)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(key: &str, expression: &str, expr_type: ExprType, link: Link) -> Condition {
        Condition {
            key: key.into(),
            operator: Operator::Eq,
            expression: expression.into(),
            expr_type,
            link,
            negated: false,
        }
    }

    #[test]
    fn test_operator_symbols() {
        for op in [
            Operator::Eq,
            Operator::Ne,
            Operator::Gt,
            Operator::Lt,
            Operator::Ge,
            Operator::Le,
        ] {
            assert_eq!(Operator::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(Operator::from_symbol("==="), None);
        assert_eq!(Operator::from_symbol("="), None);
    }

    #[test]
    fn test_operator_apply() {
        assert!(Operator::Ge.apply(Some(Ordering::Equal)));
        assert!(!Operator::Gt.apply(Some(Ordering::Equal)));
        assert!(Operator::Ne.apply(None));
        assert!(!Operator::Eq.apply(None));
        assert!(!Operator::Le.apply(None));
    }

    #[test]
    fn test_link_keywords() {
        assert_eq!(Link::from_symbol("&&"), Some(Link::And));
        assert_eq!(Link::from_symbol("AnD"), Some(Link::And));
        assert_eq!(Link::from_symbol("||"), Some(Link::Or));
        assert_eq!(Link::from_symbol("or"), Some(Link::Or));
        assert_eq!(Link::from_symbol("&&&"), None);
        assert_eq!(Link::from_symbol("&|"), None);
    }

    #[test]
    fn test_display_quotes_literals() {
        let chain = PredicateChain::new(vec![
            cond("title", r#"say "hi" \o/"#, ExprType::Literal, Link::Or),
            cond("date", "2008-01-02", ExprType::Time, Link::And),
            Condition {
                negated: true,
                ..cond("disabled", "t", ExprType::Boolean, Link::Eof)
            },
        ]);
        assert_eq!(
            chain.to_string(),
            r#"title == "say \"hi\" \\o/" | date == '2008-01-02' & not disabled == t"#
        );
    }

    #[test]
    fn test_equality_ignores_date_formats() {
        let a = PredicateChain::new(vec![cond("a", "1", ExprType::Integer, Link::Eof)]);
        let mut b = a.clone();
        b.add_date_format("[year]").unwrap();
        assert_eq!(a, b);
    }
}
