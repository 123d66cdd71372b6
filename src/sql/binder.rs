//! Parameter binder - substitutes positional `?` markers
//!
//! Binding happens on raw text before lexing. Quote state is tracked
//! character by character so a `?` inside a single-quoted literal is never
//! touched. Parameters are consumed strictly left to right.

use crate::error::{DbError, Result};
use crate::types::Value;

/// Replace every unquoted `?` in `text` with a rendered literal.
///
/// Fails when the number of unquoted markers exceeds the supplied parameter
/// count; surplus parameters are ignored.
pub fn bind(text: &str, params: &[Value]) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut next_param = 0usize;
    let mut in_quotes = false;

    for ch in text.chars() {
        match ch {
            '\'' => {
                in_quotes = !in_quotes;
                out.push(ch);
            }
            '?' if !in_quotes => {
                let value = params.get(next_param).ok_or_else(|| {
                    DbError::Binding(format!(
                        "statement has more than {} parameter marker(s)",
                        params.len()
                    ))
                })?;
                out.push_str(&render_literal(value));
                next_param += 1;
            }
            _ => out.push(ch),
        }
    }

    Ok(out)
}

/// Render a value as a statement literal.
fn render_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Timestamp(ts) => format!("'{}'", ts),
        Value::Integer(i) => i.to_string(),
        Value::Decimal(d) => d.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Timestamp;

    #[test]
    fn test_bind_in_order() {
        let sql = bind(
            "INSERT INTO t (a, b) VALUES (?, ?)",
            &[Value::Text("x".into()), Value::Integer(5)],
        )
        .unwrap();
        assert_eq!(sql, "INSERT INTO t (a, b) VALUES ('x', 5)");
    }

    #[test]
    fn test_marker_inside_literal_untouched() {
        let sql = bind("SELECT * FROM t WHERE a = '?' AND b = ?", &[Value::Integer(1)]).unwrap();
        assert_eq!(sql, "SELECT * FROM t WHERE a = '?' AND b = 1");
    }

    #[test]
    fn test_too_few_parameters_fails() {
        let err = bind("SELECT * FROM t WHERE a = ? AND b = ?", &[Value::Integer(1)]);
        assert!(matches!(err, Err(DbError::Binding(_))));
    }

    #[test]
    fn test_surplus_parameters_are_ignored() {
        let sql = bind("SELECT * FROM t", &[Value::Integer(1)]).unwrap();
        assert_eq!(sql, "SELECT * FROM t");
    }

    #[test]
    fn test_text_quotes_are_doubled() {
        let sql = bind("VALUES (?)", &[Value::Text("it's".into())]).unwrap();
        assert_eq!(sql, "VALUES ('it''s')");
    }

    #[test]
    fn test_null_and_numbers() {
        let sql = bind(
            "VALUES (?, ?, ?)",
            &[Value::Null, Value::Integer(-3), Value::Decimal(2.5)],
        )
        .unwrap();
        assert_eq!(sql, "VALUES (NULL, -3, 2.5)");
    }

    #[test]
    fn test_timestamp_is_quoted_literal() {
        let ts = Timestamp::new(2024, 3, 7, 10, 30, 0);
        let sql = bind("VALUES (?)", &[Value::Timestamp(ts)]).unwrap();
        assert_eq!(sql, "VALUES ('03/07/2024 10:30:00.000')");
    }
}
