//! Evaluator for parsed predicate chains.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::ast::{Condition, ExprType, PredicateChain};
use super::classify::parse_bool;
use super::error::EvalError;
use super::lexer::{float_literal, integer_literal, matches_fully};
use crate::record::{FieldAccessor, StructFields, Value};

/// Comparison domain for numeric conditions. Integers stay exact when both
/// sides are integral.
#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Accept only the query's own number syntax (`-?[0-9]+(\.[0-9]+)?`).
    /// Integers too large for `i64` fall back to `f64`.
    fn parse(s: &str) -> Option<Self> {
        if matches_fully(integer_literal, s) {
            s.parse::<i64>()
                .map(Number::Int)
                .or_else(|_| s.parse::<f64>().map(Number::Float))
                .ok()
        } else if matches_fully(float_literal, s) {
            s.parse::<f64>().ok().map(Number::Float)
        } else {
            None
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl PredicateChain {
    /// Check a key/value mapping. Keys are matched verbatim.
    pub fn check_map(&self, record: &HashMap<String, Value>) -> Result<bool, EvalError> {
        self.check(record)
    }

    /// Check a value with named fields, as exposed by its `Serialize` impl.
    pub fn check_struct<T: Serialize + ?Sized>(&self, record: &T) -> Result<bool, EvalError> {
        let fields = StructFields::from_serialize(record)?;
        self.check(&fields)
    }

    /// Check any record type. The first error aborts the evaluation.
    pub fn check<R: FieldAccessor + ?Sized>(&self, record: &R) -> Result<bool, EvalError> {
        let conditions = self.conditions();
        let Some(first) = conditions.first() else {
            return Ok(false);
        };

        let mut result = self.eval_condition(first, record)?;
        for pair in conditions.windows(2) {
            let next = self.eval_condition(&pair[1], record)?;
            result = pair[0].link.combine(result, next);
        }

        Ok(result)
    }

    fn eval_condition<R: FieldAccessor + ?Sized>(
        &self,
        cond: &Condition,
        record: &R,
    ) -> Result<bool, EvalError> {
        let value = record
            .field(&cond.key)
            .ok_or_else(|| EvalError::FieldNotFound(cond.key.clone()))?;

        if cond.operator.is_ordering()
            && matches!(cond.expr_type, ExprType::Literal | ExprType::Boolean)
        {
            return Err(EvalError::UnsupportedOperator {
                op: cond.operator,
                expr_type: cond.expr_type,
            });
        }

        let ord = match cond.expr_type {
            ExprType::Literal => {
                let field = coerce_string(cond, &value)?;
                Some(field.to_lowercase().cmp(&cond.expression.to_lowercase()))
            }
            ExprType::Integer | ExprType::Float => {
                let literal = Number::parse(&cond.expression)
                    .ok_or_else(|| invalid_literal(cond))?;
                coerce_number(cond, &value)?.compare(literal)
            }
            ExprType::Boolean => {
                let literal = parse_bool(&cond.expression).ok_or_else(|| invalid_literal(cond))?;
                Some(coerce_bool(cond, &value)?.cmp(&literal))
            }
            ExprType::Time => {
                let literal = self.formats.parse(&cond.expression)?;
                let field = match value {
                    Value::DateTime(dt) => dt,
                    Value::String(s) => self.formats.parse(&s)?,
                    other => return Err(mismatch(cond, &other)),
                };
                Some(field.cmp(&literal))
            }
        };

        let matched = cond.operator.apply(ord);
        let result = if cond.negated { !matched } else { matched };
        tracing::trace!("Condition '{}' -> {}", cond, result);
        Ok(result)
    }
}

fn mismatch(cond: &Condition, value: &Value) -> EvalError {
    EvalError::TypeMismatch {
        key: cond.key.clone(),
        expected: cond.expr_type,
        found: value.type_name(),
    }
}

fn invalid_literal(cond: &Condition) -> EvalError {
    EvalError::InvalidValue {
        key: cond.key.clone(),
        expected: cond.expr_type,
        value: cond.expression.clone(),
    }
}

fn coerce_string(cond: &Condition, value: &Value) -> Result<String, EvalError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(mismatch(cond, other)),
    }
}

fn coerce_number(cond: &Condition, value: &Value) -> Result<Number, EvalError> {
    match value {
        Value::Int(i) => Ok(Number::Int(*i)),
        Value::Float(f) if f.is_finite() => Ok(Number::Float(*f)),
        Value::Float(f) => Err(EvalError::InvalidValue {
            key: cond.key.clone(),
            expected: cond.expr_type,
            value: f.to_string(),
        }),
        Value::String(s) => Number::parse(s).ok_or_else(|| EvalError::InvalidValue {
            key: cond.key.clone(),
            expected: cond.expr_type,
            value: s.clone(),
        }),
        other => Err(mismatch(cond, other)),
    }
}

fn coerce_bool(cond: &Condition, value: &Value) -> Result<bool, EvalError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => parse_bool(s).ok_or_else(|| EvalError::InvalidValue {
            key: cond.key.clone(),
            expected: cond.expr_type,
            value: s.clone(),
        }),
        other => Err(mismatch(cond, other)),
    }
}
