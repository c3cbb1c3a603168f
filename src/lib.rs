//! Compile filter queries such as `title == "foo" & age > 42` into a
//! predicate chain and check single records against it.
//!
//! ```
//! use std::collections::HashMap;
//! use chainql::{Value, parse_query};
//!
//! let chain = parse_query(r#"title == "foo BAR" & age > 42"#).unwrap();
//! let record: HashMap<String, Value> = [
//!     ("title".to_string(), Value::from("foo bar")),
//!     ("age".to_string(), Value::from(43)),
//! ]
//! .into();
//! assert!(chain.check_map(&record).unwrap());
//! ```

pub mod config;
pub mod dsl;
pub mod record;

pub use dsl::{
    Condition, EvalError, ExprType, Link, Operator, ParseError, PredicateChain, parse_query,
};
pub use record::{FieldAccessor, StructFields, Value};
