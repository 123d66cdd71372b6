//! Condition and aggregate evaluation
//!
//! Evaluates parsed WHERE clauses against candidate rows and computes
//! aggregate functions over a qualified row set. Literal operands are
//! coerced to the column's declared type through one coercion table before
//! any comparison happens.

use super::ast::{AggregateCall, AggregateFunc, Combinator, CompareOp, Comparison, Condition, Literal, Predicate};
use crate::error::{DbError, Result};
use crate::types::{ColumnType, Row, TableSchema, Timestamp, Value};
use std::cmp::Ordering;

/// Coercion table keyed by (literal kind, declared column type).
///
/// - text column: the literal's text, numbers rendered naturally
/// - timestamp column: quoted literal parsed as a timestamp
/// - numeric column: literal text parsed, conversion error when malformed;
///   a fractional input is not a valid INTEGER
pub fn coerce_literal(literal: &Literal, col_type: &ColumnType) -> Result<Value> {
    match (literal, col_type) {
        (Literal::Null, _) => Ok(Value::Null),

        (Literal::Text(s), ColumnType::Text { .. }) => Ok(Value::Text(s.clone())),
        (Literal::Number(n), ColumnType::Text { .. }) => Ok(Value::Text(format_number(*n))),

        (Literal::Number(n), ColumnType::Integer) => {
            if n.fract() == 0.0 {
                Ok(Value::Integer(*n as i64))
            } else {
                Err(DbError::Conversion(format!("{} is not a valid INTEGER", n)))
            }
        }
        (Literal::Text(s), ColumnType::Integer) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                Ok(Value::Integer(i))
            } else {
                match trimmed.parse::<f64>() {
                    Ok(d) if d.fract() == 0.0 => Ok(Value::Integer(d as i64)),
                    _ => Err(DbError::Conversion(format!(
                        "'{}' is not a valid INTEGER",
                        s
                    ))),
                }
            }
        }

        (Literal::Number(n), ColumnType::Decimal { .. }) => Ok(Value::Decimal(*n)),
        (Literal::Text(s), ColumnType::Decimal { .. }) => s
            .trim()
            .parse::<f64>()
            .map(Value::Decimal)
            .map_err(|_| DbError::Conversion(format!("'{}' is not a valid DECIMAL", s))),

        (Literal::Text(s), ColumnType::Timestamp) => Timestamp::parse(s).map(Value::Timestamp),
        (Literal::Number(_), ColumnType::Timestamp) => Err(DbError::Conversion(
            "a TIMESTAMP column requires a quoted timestamp literal".to_string(),
        )),
    }
}

/// Coerce an already-typed value to a declared column type. Used when an
/// INSERT/UPDATE copies a same-row column or an aggregate result into a
/// column of a different type.
pub fn coerce_value(value: &Value, col_type: &ColumnType) -> Result<Value> {
    match (value, col_type) {
        (Value::Null, _) => Ok(Value::Null),

        (Value::Integer(i), ColumnType::Integer) => Ok(Value::Integer(*i)),
        (Value::Integer(i), ColumnType::Decimal { .. }) => Ok(Value::Decimal(*i as f64)),
        (Value::Integer(i), ColumnType::Text { .. }) => Ok(Value::Text(i.to_string())),

        (Value::Decimal(d), ColumnType::Integer) => {
            if d.fract() == 0.0 {
                Ok(Value::Integer(*d as i64))
            } else {
                Err(DbError::Conversion(format!("{} is not a valid INTEGER", d)))
            }
        }
        (Value::Decimal(d), ColumnType::Decimal { .. }) => Ok(Value::Decimal(*d)),
        (Value::Decimal(d), ColumnType::Text { .. }) => Ok(Value::Text(format_number(*d))),

        (Value::Text(s), target) => coerce_literal(&Literal::Text(s.clone()), target),

        (Value::Timestamp(ts), ColumnType::Timestamp) => Ok(Value::Timestamp(*ts)),
        (Value::Timestamp(ts), ColumnType::Text { .. }) => Ok(Value::Text(ts.to_string())),

        (value, target) => Err(DbError::Conversion(format!(
            "cannot convert {} to {}",
            value.kind(),
            target.name()
        ))),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Evaluate a parsed WHERE clause against one row.
///
/// AND short-circuits on the first non-match, OR on the first match.
pub fn matches_row(condition: &Condition, schema: &TableSchema, row: &Row) -> Result<bool> {
    match condition.combinator {
        Combinator::And => {
            for comparison in &condition.comparisons {
                if !matches_comparison(comparison, schema, row)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Combinator::Or => {
            for comparison in &condition.comparisons {
                if matches_comparison(comparison, schema, row)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

fn matches_comparison(comparison: &Comparison, schema: &TableSchema, row: &Row) -> Result<bool> {
    let index = schema
        .column_index(&comparison.column)
        .ok_or_else(|| DbError::ColumnNotFound(comparison.column.clone()))?;
    let col_type = &schema.columns[index].col_type;
    let row_value = &row[index];

    // No operator yields true against NULL.
    if row_value.is_null() {
        return Ok(false);
    }

    match &comparison.predicate {
        Predicate::Compare { op, value } => {
            let operand = coerce_literal(value, col_type)?;
            if operand.is_null() {
                return Ok(false);
            }
            let matched = match op {
                CompareOp::Eq => row_value == &operand,
                CompareOp::Ne => row_value != &operand,
                CompareOp::Lt => row_value.partial_cmp(&operand) == Some(Ordering::Less),
                CompareOp::Gt => row_value.partial_cmp(&operand) == Some(Ordering::Greater),
            };
            Ok(matched)
        }
        Predicate::Like { pattern } => {
            Ok(LikePattern::compile(pattern).matches(&row_value.to_string()))
        }
        Predicate::In { values } => {
            for value in values {
                let operand = coerce_literal(value, col_type)?;
                if !operand.is_null() && row_value == &operand {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

/// Compiled LIKE pattern. `%` matches any run of characters (including an
/// empty one), `_` matches exactly one. Matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct LikePattern {
    pattern: Vec<PatternChar>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PatternChar {
    Literal(char),
    AnyChar,  // _
    AnyChars, // %
}

impl LikePattern {
    pub fn compile(pattern: &str) -> Self {
        let mut compiled: Vec<PatternChar> = Vec::new();
        for ch in pattern.chars() {
            match ch {
                // Adjacent % runs collapse; they match the same texts.
                '%' => {
                    if compiled.last() != Some(&PatternChar::AnyChars) {
                        compiled.push(PatternChar::AnyChars);
                    }
                }
                '_' => compiled.push(PatternChar::AnyChar),
                c => compiled.extend(c.to_lowercase().map(PatternChar::Literal)),
            }
        }
        Self { pattern: compiled }
    }

    /// Two-pointer match: only the most recent `%` ever needs revisiting,
    /// so a failed tail retries from one character past that anchor instead
    /// of recursing over every split point.
    pub fn matches(&self, text: &str) -> bool {
        let text: Vec<char> = text.to_lowercase().chars().collect();
        let mut ti = 0;
        let mut pi = 0;
        let mut anchor: Option<(usize, usize)> = None;

        while ti < text.len() {
            if pi < self.pattern.len() {
                match self.pattern[pi] {
                    PatternChar::AnyChars => {
                        anchor = Some((pi + 1, ti));
                        pi += 1;
                        continue;
                    }
                    PatternChar::AnyChar => {
                        ti += 1;
                        pi += 1;
                        continue;
                    }
                    PatternChar::Literal(c) if c == text[ti] => {
                        ti += 1;
                        pi += 1;
                        continue;
                    }
                    PatternChar::Literal(_) => {}
                }
            }
            match anchor {
                Some((anchor_pi, anchor_ti)) => {
                    pi = anchor_pi;
                    ti = anchor_ti + 1;
                    anchor = Some((anchor_pi, anchor_ti + 1));
                }
                None => return false,
            }
        }

        while pi < self.pattern.len() && self.pattern[pi] == PatternChar::AnyChars {
            pi += 1;
        }
        pi == self.pattern.len()
    }
}

/// Evaluate an aggregate over the qualified row set.
///
/// `COUNT(*)` returns the cardinality. Every other function ignores NULL
/// inputs and returns NULL when the remaining set is empty.
pub fn eval_aggregate(
    call: &AggregateCall,
    schema: &TableSchema,
    rows: &[&Row],
) -> Result<Value> {
    let column = match &call.column {
        None => {
            // Argument was `*`; the parser only allows that for COUNT.
            return Ok(Value::Integer(rows.len() as i64));
        }
        Some(name) => name,
    };

    let index = schema
        .column_index(column)
        .ok_or_else(|| DbError::ColumnNotFound(column.clone()))?;
    let col_type = &schema.columns[index].col_type;
    let values: Vec<&Value> = rows
        .iter()
        .map(|row| &row[index])
        .filter(|v| !v.is_null())
        .collect();

    match call.func {
        AggregateFunc::Count => Ok(Value::Integer(values.len() as i64)),

        AggregateFunc::Sum => {
            if values.is_empty() {
                return Ok(Value::Null);
            }
            match col_type {
                // Integer sums stay in integer arithmetic so large values
                // keep exact precision.
                ColumnType::Integer => {
                    let mut sum: i128 = 0;
                    for &value in &values {
                        match value {
                            Value::Integer(i) => sum += *i as i128,
                            other => {
                                return Err(DbError::TypeError(format!(
                                    "{} requires numeric values, got {}",
                                    call.func.name(),
                                    other.kind()
                                )))
                            }
                        }
                    }
                    Ok(Value::Integer(sum as i64))
                }
                _ => Ok(Value::Decimal(numeric_values(call, &values)?.iter().sum())),
            }
        }

        AggregateFunc::Avg => {
            if values.is_empty() {
                return Ok(Value::Null);
            }
            let nums = numeric_values(call, &values)?;
            Ok(Value::Decimal(nums.iter().sum::<f64>() / nums.len() as f64))
        }

        AggregateFunc::Min | AggregateFunc::Max => {
            let want = if call.func == AggregateFunc::Min {
                Ordering::Less
            } else {
                Ordering::Greater
            };
            let mut best: Option<&Value> = None;
            for &value in &values {
                best = Some(match best {
                    None => value,
                    Some(current) => {
                        if value.partial_cmp(current) == Some(want) {
                            value
                        } else {
                            current
                        }
                    }
                });
            }
            Ok(best.cloned().unwrap_or(Value::Null))
        }

        AggregateFunc::Stdev | AggregateFunc::Var => {
            let nums = numeric_values(call, &values)?;
            // Sample statistics need at least two observations.
            if nums.len() < 2 {
                return Ok(Value::Null);
            }
            let mean = nums.iter().sum::<f64>() / nums.len() as f64;
            let variance = nums.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                / (nums.len() - 1) as f64;
            match call.func {
                AggregateFunc::Var => Ok(Value::Decimal(variance)),
                _ => Ok(Value::Decimal(variance.sqrt())),
            }
        }
    }
}

fn numeric_values(call: &AggregateCall, values: &[&Value]) -> Result<Vec<f64>> {
    values
        .iter()
        .map(|v| {
            v.as_f64().ok_or_else(|| {
                DbError::TypeError(format!(
                    "{} requires numeric values, got {}",
                    call.func.name(),
                    v.kind()
                ))
            })
        })
        .collect()
}

/// Declared type of an aggregate result column, for cursor metadata.
pub fn aggregate_result_type(call: &AggregateCall, schema: &TableSchema) -> Result<ColumnType> {
    match call.func {
        AggregateFunc::Count => Ok(ColumnType::Integer),
        AggregateFunc::Avg | AggregateFunc::Stdev | AggregateFunc::Var => Ok(ColumnType::Decimal {
            precision: 18,
            scale: 0,
        }),
        AggregateFunc::Sum | AggregateFunc::Min | AggregateFunc::Max => {
            let column = call.column.as_ref().ok_or_else(|| {
                DbError::Syntax(format!("{}(*) is not supported", call.func.name()))
            })?;
            schema
                .column(column)
                .map(|c| c.col_type)
                .ok_or_else(|| DbError::ColumnNotFound(column.clone()))
        }
    }
}
