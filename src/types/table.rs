//! Table schema definitions

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Declared column type.
///
/// Every declared SQL type name maps onto one of these four kinds;
/// unrecognized names fall back to `Text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// Text/String, with an optional declared size
    Text { size: Option<usize> },
    /// 64-bit signed integer
    Integer,
    /// Decimal number with declared precision and scale
    Decimal { precision: u32, scale: u32 },
    /// Civil timestamp
    Timestamp,
}

impl ColumnType {
    /// Map a declared SQL type name plus optional `(n[,m])` arguments onto a
    /// column type. Unrecognized names default to `Text`.
    pub fn from_spec(name: &str, args: &[u32]) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "INT" | "INTEGER" => ColumnType::Integer,
            "DECIMAL" | "NUMERIC" | "FLOAT" | "REAL" | "DOUBLE" => ColumnType::Decimal {
                precision: args.first().copied().unwrap_or(18),
                scale: args.get(1).copied().unwrap_or(0),
            },
            "TIMESTAMP" | "DATETIME" | "DATE" => ColumnType::Timestamp,
            _ => ColumnType::Text {
                size: args.first().map(|n| *n as usize),
            },
        }
    }

    /// SQL name of the type, without size arguments.
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Text { .. } => "TEXT",
            ColumnType::Integer => "INTEGER",
            ColumnType::Decimal { .. } => "DECIMAL",
            ColumnType::Timestamp => "TIMESTAMP",
        }
    }
}

/// Column definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub col_type: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, col_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            col_type,
        }
    }

    /// Derived storage size of the column in bytes (declared size for text).
    pub fn size(&self) -> usize {
        match self.col_type {
            ColumnType::Text { size } => size.unwrap_or(255),
            ColumnType::Integer => 8,
            ColumnType::Decimal { precision, .. } => precision as usize,
            ColumnType::Timestamp => 8,
        }
    }

    /// Derived numeric precision (0 for non-numeric columns).
    pub fn precision(&self) -> u32 {
        match self.col_type {
            ColumnType::Integer => 19,
            ColumnType::Decimal { precision, .. } => precision,
            _ => 0,
        }
    }

    /// Derived numeric scale (0 for non-decimal columns).
    pub fn scale(&self) -> u32 {
        match self.col_type {
            ColumnType::Decimal { scale, .. } => scale,
            _ => 0,
        }
    }
}

/// Table schema: ordered columns plus an optional primary-key column subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    /// Ordered primary-key column names; empty means no primary key.
    pub primary_key: Vec<String>,
    /// Lowercased column name -> position
    #[serde(skip)]
    column_map: AHashMap<String, usize>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        let mut schema = Self {
            name: name.into(),
            columns,
            primary_key: Vec::new(),
            column_map: AHashMap::new(),
        };
        schema.rebuild_column_map();
        schema
    }

    pub fn with_primary_key(mut self, primary_key: Vec<String>) -> Self {
        self.primary_key = primary_key;
        self
    }

    /// Rebuild the name -> position map. Must be called after deserializing.
    pub fn rebuild_column_map(&mut self) {
        self.column_map = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.to_ascii_lowercase(), i))
            .collect();
    }

    /// Case-insensitive column position lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_map.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    /// Positions of the primary-key columns, in declared key order.
    pub fn primary_key_indices(&self) -> Vec<usize> {
        self.primary_key
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect()
    }
}
