//! Result sets and the forward-only cursor
//!
//! A SELECT materializes its projection into a `ResultSet` the cursor
//! privately owns. Once materialized it is fully decoupled from the store:
//! iterating or closing the cursor never blocks on or touches table data.

use crate::error::{DbError, Result};
use crate::types::{ColumnDef, ColumnType, Row, Timestamp, Value};

/// Ephemeral projection produced by a SELECT. Column metadata is sourced
/// from the originating columns (names possibly aliased), never recomputed
/// from the projected values.
#[derive(Debug, Clone)]
pub struct ResultSet {
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(columns: Vec<ColumnDef>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Forward-only, single-pass reader over a materialized [`ResultSet`].
///
/// The cursor starts positioned before the first row; call [`Cursor::advance`]
/// to move onto each row in turn.
pub struct Cursor {
    result: ResultSet,
    /// Index of the current row plus one; 0 means before the first row.
    position: usize,
    open: bool,
}

impl Cursor {
    pub fn new(result: ResultSet) -> Self {
        Self {
            result,
            position: 0,
            open: true,
        }
    }

    /// Move to the next row. Returns false once the rows are exhausted or
    /// the cursor has been closed.
    pub fn advance(&mut self) -> bool {
        if !self.open || self.position >= self.result.rows.len() {
            return false;
        }
        self.position += 1;
        true
    }

    /// Close the cursor, releasing its private row copy. Dropping the
    /// cursor has the same effect; the source table is never touched.
    pub fn close(&mut self) {
        self.open = false;
        self.result.rows = Vec::new();
        self.position = 0;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn column_count(&self) -> usize {
        self.result.columns.len()
    }

    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.result.columns.get(index).map(|c| c.name.as_str())
    }

    pub fn column_type(&self, index: usize) -> Option<ColumnType> {
        self.result.columns.get(index).map(|c| c.col_type)
    }

    pub fn column_size(&self, index: usize) -> Option<usize> {
        self.result.columns.get(index).map(ColumnDef::size)
    }

    pub fn column_precision(&self, index: usize) -> Option<u32> {
        self.result.columns.get(index).map(ColumnDef::precision)
    }

    pub fn column_scale(&self, index: usize) -> Option<u32> {
        self.result.columns.get(index).map(ColumnDef::scale)
    }

    /// Case-insensitive by-name ordinal lookup.
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.result
            .columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    fn current_row(&self) -> Result<&Row> {
        if !self.open {
            return Err(DbError::TypeError("cursor is closed".to_string()));
        }
        if self.position == 0 {
            return Err(DbError::TypeError(
                "cursor is positioned before the first row".to_string(),
            ));
        }
        Ok(&self.result.rows[self.position - 1])
    }

    /// Raw value of the given column on the current row.
    pub fn value(&self, index: usize) -> Result<&Value> {
        let row = self.current_row()?;
        row.get(index)
            .ok_or_else(|| DbError::ColumnNotFound(format!("ordinal {}", index)))
    }

    pub fn is_null(&self, index: usize) -> Result<bool> {
        Ok(self.value(index)?.is_null())
    }

    /// Integer view of the value. Decimal truncates toward zero.
    pub fn get_i64(&self, index: usize) -> Result<i64> {
        match self.value(index)? {
            Value::Integer(i) => Ok(*i),
            Value::Decimal(d) => Ok(*d as i64),
            other => Err(DbError::TypeError(format!(
                "cannot read {} as INTEGER",
                other.kind()
            ))),
        }
    }

    /// Decimal view of the value. Integer widens losslessly.
    pub fn get_f64(&self, index: usize) -> Result<f64> {
        match self.value(index)? {
            Value::Integer(i) => Ok(*i as f64),
            Value::Decimal(d) => Ok(*d),
            other => Err(DbError::TypeError(format!(
                "cannot read {} as DECIMAL",
                other.kind()
            ))),
        }
    }

    /// Text view of the value: any non-null value renders via its display
    /// form.
    pub fn get_string(&self, index: usize) -> Result<String> {
        match self.value(index)? {
            Value::Null => Err(DbError::TypeError("cannot read NULL as TEXT".to_string())),
            other => Ok(other.to_string()),
        }
    }

    pub fn get_timestamp(&self, index: usize) -> Result<Timestamp> {
        match self.value(index)? {
            Value::Timestamp(ts) => Ok(*ts),
            Value::Text(s) => Timestamp::parse(s),
            other => Err(DbError::TypeError(format!(
                "cannot read {} as TIMESTAMP",
                other.kind()
            ))),
        }
    }
}
