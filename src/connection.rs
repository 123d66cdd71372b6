//! Connection and command surface
//!
//! Thin adapter layer over the engine: a `Connection` is a handle onto one
//! store, and a `Command` carries statement text plus a named parameter
//! collection. Parameter names exist for the caller's bookkeeping only;
//! binding consumes values strictly in textual `?` order.

use crate::cursor::Cursor;
use crate::error::Result;
use crate::sql::Engine;
use crate::store::TableStore;
use crate::types::Value;
use std::sync::Arc;

/// Ordered, named parameter collection for a [`Command`].
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    slots: Vec<(String, Value)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter by name, replacing an existing slot or appending a
    /// new one at the end.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.index_of(&name) {
            Some(index) => self.slots[index].1 = value,
            None => self.slots.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.index_of(name).map(|i| &self.slots[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// Remove the slot with the given name, keeping the order of the rest.
    pub fn remove_at(&mut self, name: &str) -> Option<Value> {
        self.index_of(name).map(|i| self.slots.remove(i).1)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Values in slot order, as consumed by the binder.
    pub fn values(&self) -> Vec<Value> {
        self.slots.iter().map(|(_, v)| v.clone()).collect()
    }
}

/// Handle onto one table store.
pub struct Connection {
    engine: Engine,
    open: bool,
}

impl Connection {
    /// Open a connection. A no-op lifecycle hook: the store itself needs no
    /// per-connection state.
    pub fn open(store: Arc<TableStore>) -> Self {
        Self {
            engine: Engine::new(store),
            open: true,
        }
    }

    /// Close the connection. Cursors already handed out stay valid: they
    /// own private copies of their rows.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn create_command(&self, text: impl Into<String>) -> Command<'_> {
        Command {
            engine: &self.engine,
            text: text.into(),
            parameters: Parameters::new(),
        }
    }

    pub fn execute_non_query(&self, text: &str, params: &[Value]) -> Result<usize> {
        self.engine.execute_non_query(text, params)
    }

    pub fn execute_reader(&self, text: &str, params: &[Value]) -> Result<Cursor> {
        self.engine.execute_reader(text, params)
    }
}

/// One executable statement with its parameter collection.
pub struct Command<'conn> {
    engine: &'conn Engine,
    pub text: String,
    pub parameters: Parameters,
}

impl Command<'_> {
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn execute_non_query(&self) -> Result<usize> {
        self.engine.execute_non_query(&self.text, &self.parameters.values())
    }

    /// Execute a SELECT. The returned cursor owns its materialized rows;
    /// dropping it (or calling `close`) releases them deterministically.
    pub fn execute_reader(&self) -> Result<Cursor> {
        self.engine.execute_reader(&self.text, &self.parameters.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;

    fn connection() -> Connection {
        let conn = Connection::open(Arc::new(TableStore::new(StoreConfig::default())));
        conn.execute_non_query("CREATE TABLE T (A TEXT, B INTEGER)", &[])
            .unwrap();
        conn
    }

    #[test]
    fn test_parameters_are_consumed_in_slot_order() {
        let conn = connection();
        let mut cmd = conn.create_command("INSERT INTO T (A, B) VALUES (?, ?)");
        // Names do not matter for binding, only slot order does
        cmd.parameters.set("beta", Value::Text("x".into()));
        cmd.parameters.set("alpha", Value::Integer(5));
        assert_eq!(cmd.execute_non_query().unwrap(), 1);

        let mut cursor = conn.execute_reader("SELECT B FROM T WHERE A = 'x'", &[]).unwrap();
        assert!(cursor.advance());
        assert_eq!(cursor.get_i64(0).unwrap(), 5);
    }

    #[test]
    fn test_parameter_collection_by_name() {
        let mut params = Parameters::new();
        params.set("a", Value::Integer(1));
        params.set("b", Value::Integer(2));
        assert!(params.contains("A"));
        assert_eq!(params.index_of("b"), Some(1));

        params.set("a", Value::Integer(9)); // replace keeps position
        assert_eq!(params.index_of("a"), Some(0));
        assert_eq!(params.get("a"), Some(&Value::Integer(9)));

        assert_eq!(params.remove_at("a"), Some(Value::Integer(9)));
        assert_eq!(params.index_of("b"), Some(0));
        assert!(!params.contains("a"));
    }

    #[test]
    fn test_cursor_survives_connection_close() {
        let mut conn = connection();
        conn.execute_non_query("INSERT INTO T (A, B) VALUES ('x', 1)", &[])
            .unwrap();
        let mut cursor = conn.execute_reader("SELECT * FROM T", &[]).unwrap();
        conn.close();
        assert!(cursor.advance());
        assert_eq!(cursor.get_string(0).unwrap(), "x");
    }

    #[test]
    fn test_command_reuse_with_new_text() {
        let conn = connection();
        let mut cmd = conn.create_command("INSERT INTO T (A, B) VALUES ('a', 1)");
        cmd.execute_non_query().unwrap();
        cmd.set_text("SELECT COUNT(*) FROM T");
        let mut cursor = cmd.execute_reader().unwrap();
        assert!(cursor.advance());
        assert_eq!(cursor.get_i64(0).unwrap(), 1);
    }
}
