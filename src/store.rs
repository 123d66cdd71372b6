//! In-memory table store
//!
//! The `TableStore` is the single source of truth for all table data. Every
//! statement is serialized behind one coarse mutex over the whole table map;
//! a statement holds the lock for its entire duration, so callers never
//! observe a partially applied mutation from another statement.

use crate::config::StoreConfig;
use crate::error::{DbError, Result};
use crate::types::{Row, TableSchema};
use ahash::AHashMap;
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};

/// A named table: schema plus rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub schema: TableSchema,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Primary-key tuple of a row, as dedup keys. Empty when the table has
    /// no primary key.
    pub fn key_of(&self, row: &Row) -> Vec<String> {
        self.schema
            .primary_key_indices()
            .iter()
            .map(|&i| row[i].dedup_key())
            .collect()
    }

    /// Whether some existing row already carries this primary-key tuple.
    pub fn has_key(&self, key: &[String]) -> bool {
        if key.is_empty() {
            return false;
        }
        self.rows.iter().any(|row| self.key_of(row) == key)
    }
}

/// The set of named tables. Table names are canonicalized case-insensitively.
pub struct TableStore {
    config: StoreConfig,
    tables: Mutex<AHashMap<String, Table>>,
}

impl TableStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            tables: Mutex::new(AHashMap::new()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Take the statement lock. Held for the whole duration of a statement.
    pub(crate) fn lock(&self) -> MutexGuard<'_, AHashMap<String, Table>> {
        self.tables.lock()
    }

    fn canonical(name: &str) -> String {
        name.to_ascii_lowercase()
    }

    /// Create an empty table. Fails when a table with the same
    /// case-insensitive name already exists.
    pub fn create_table(&self, schema: TableSchema) -> Result<()> {
        let mut tables = self.lock();
        Self::create_table_locked(&mut tables, schema)
    }

    pub(crate) fn create_table_locked(
        tables: &mut AHashMap<String, Table>,
        schema: TableSchema,
    ) -> Result<()> {
        let key = Self::canonical(&schema.name);
        if tables.contains_key(&key) {
            return Err(DbError::DuplicateTable(schema.name.clone()));
        }
        tables.insert(key, Table::new(schema));
        Ok(())
    }

    /// Drop a table and all its rows.
    pub fn drop_table(&self, name: &str) -> Result<()> {
        let mut tables = self.lock();
        tables
            .remove(&Self::canonical(name))
            .map(|_| ())
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.lock().contains_key(&Self::canonical(name))
    }

    pub fn table_names(&self) -> Vec<String> {
        self.lock().values().map(|t| t.schema.name.clone()).collect()
    }

    pub fn row_count(&self, name: &str) -> Result<usize> {
        let tables = self.lock();
        Self::get_locked(&tables, name).map(Table::row_count)
    }

    /// Direct row insert, bypassing the statement path. The row must already
    /// be typed to the schema; only length and primary-key uniqueness are
    /// checked here.
    pub fn insert_row(&self, name: &str, row: Row) -> Result<usize> {
        let mut tables = self.lock();
        let ignore = self.config.ignore_constraint_violations;
        let table = Self::get_locked_mut(&mut tables, name)?;
        if row.len() != table.schema.columns.len() {
            return Err(DbError::TypeError(format!(
                "row has {} values, table '{}' has {} columns",
                row.len(),
                table.schema.name,
                table.schema.columns.len()
            )));
        }
        let key = table.key_of(&row);
        if table.has_key(&key) {
            if ignore {
                return Ok(0);
            }
            return Err(DbError::ConstraintViolation(table.schema.name.clone()));
        }
        table.rows.push(row);
        Ok(1)
    }

    /// Remove every row from a table, returning the prior row count.
    pub fn clear_table(&self, name: &str) -> Result<usize> {
        let mut tables = self.lock();
        let table = Self::get_locked_mut(&mut tables, name)?;
        let count = table.rows.len();
        table.rows.clear();
        Ok(count)
    }

    pub(crate) fn get_locked<'a>(
        tables: &'a AHashMap<String, Table>,
        name: &str,
    ) -> Result<&'a Table> {
        tables
            .get(&Self::canonical(name))
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    pub(crate) fn get_locked_mut<'a>(
        tables: &'a mut AHashMap<String, Table>,
        name: &str,
    ) -> Result<&'a mut Table> {
        tables
            .get_mut(&Self::canonical(name))
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }
}

impl Default for TableStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}
