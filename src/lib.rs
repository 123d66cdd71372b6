//! quilldb - an in-memory relational store
//!
//! A single-process store addressed through a restricted SQL-like statement
//! language: CREATE TABLE, DROP, INSERT, UPDATE, DELETE and single-table
//! SELECT with WHERE, aggregates, aliasing, DISTINCT and ORDER BY.
//! Statements take positional `?` parameters.
//!
//! ## Architecture
//! - Binder: positional parameter substitution (quote-aware)
//! - Lexer/Parser: tokens to a typed AST
//! - Evaluator: WHERE matching, literal coercion, aggregates
//! - Engine: statement dispatch against the table store
//! - Cursor: forward-only reader over a materialized projection
//!
//! All statements are serialized behind one coarse store lock; a cursor is
//! fully decoupled from the lock once its SELECT has materialized.
//!
//! ```
//! use quilldb::{Connection, StoreConfig, TableStore, Value};
//! use std::sync::Arc;
//!
//! let store = Arc::new(TableStore::new(StoreConfig::default()));
//! let conn = Connection::open(store);
//! conn.execute_non_query("CREATE TABLE t (a TEXT, b INTEGER)", &[]).unwrap();
//! conn.execute_non_query(
//!     "INSERT INTO t (a, b) VALUES (?, ?)",
//!     &[Value::Text("x".into()), Value::Integer(5)],
//! ).unwrap();
//! let mut cursor = conn.execute_reader("SELECT b FROM t WHERE a = 'x'", &[]).unwrap();
//! assert!(cursor.advance());
//! assert_eq!(cursor.get_i64(0).unwrap(), 5);
//! ```

pub mod config;
pub mod connection;
pub mod cursor;
pub mod sql;
pub mod store;
pub mod types;

mod error;

pub use config::StoreConfig;
pub use connection::{Command, Connection, Parameters};
pub use cursor::{Cursor, ResultSet};
pub use error::{DbError, Result};
pub use sql::{Engine, StatementOutcome};
pub use store::{Table, TableStore};
pub use types::{ColumnDef, ColumnType, Row, TableSchema, Timestamp, Value};
