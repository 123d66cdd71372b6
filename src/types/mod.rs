//! Core data types for quilldb

mod table;
mod timestamp;

pub use table::{ColumnDef, ColumnType, TableSchema};
pub use timestamp::Timestamp;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime value domain.
///
/// This is a closed union: no other runtime type is permitted internally,
/// regardless of the declared SQL type string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    /// Null value
    Null,

    /// 64-bit signed integer
    Integer(i64),

    /// Decimal value
    Decimal(f64),

    /// Text string
    Text(String),

    /// Civil timestamp
    Timestamp(Timestamp),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Kind name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Integer(_) => "INTEGER",
            Value::Decimal(_) => "DECIMAL",
            Value::Text(_) => "TEXT",
            Value::Timestamp(_) => "TIMESTAMP",
        }
    }

    /// Numeric view of the value, when it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Canonical text key for hashing/deduplication. Distinct from `Display`
    /// so that `Text("1")` and `Integer(1)` never collide.
    pub fn dedup_key(&self) -> String {
        match self {
            Value::Null => "n:".to_string(),
            Value::Integer(i) => format!("i:{}", i),
            Value::Decimal(d) => format!("d:{}", d),
            Value::Text(s) => format!("t:{}", s),
            Value::Timestamp(ts) => format!("s:{}", ts),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.partial_cmp(b),
            (Value::Decimal(a), Value::Decimal(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Decimal(b)) => (*a as f64).partial_cmp(b),
            (Value::Decimal(a), Value::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Text(a), Value::Text(b)) => a.partial_cmp(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Text(s) => write!(f, "{}", s),
            Value::Timestamp(ts) => write!(f, "{}", ts),
        }
    }
}

/// A row is one positional value per column.
pub type Row = Vec<Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_kind_numeric_ordering() {
        assert!(Value::Integer(2) < Value::Decimal(2.5));
        assert!(Value::Decimal(3.0) > Value::Integer(2));
    }

    #[test]
    fn test_mismatched_kinds_do_not_order() {
        assert_eq!(Value::Text("a".into()).partial_cmp(&Value::Integer(1)), None);
        assert_eq!(Value::Null.partial_cmp(&Value::Null), None);
    }

    #[test]
    fn test_dedup_keys_do_not_collide_across_kinds() {
        assert_ne!(
            Value::Text("1".into()).dedup_key(),
            Value::Integer(1).dedup_key()
        );
    }
}
