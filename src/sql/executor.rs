//! Execution engine - dispatches parsed statements against the table store
//!
//! Every statement runs to completion behind the store's single mutex.
//! Preconditions (table existence, column validity, type coercibility) are
//! validated before any mutation, so a failing statement leaves the store
//! unchanged.

use super::ast::*;
use super::binder;
use super::evaluator;
use super::parser;
use crate::cursor::{Cursor, ResultSet};
use crate::error::{DbError, Result};
use crate::store::{Table, TableStore};
use crate::types::{ColumnDef, Row, TableSchema, Value};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

/// Outcome of one statement.
#[derive(Debug)]
pub enum StatementOutcome {
    /// CREATE/DROP/INSERT/UPDATE/DELETE
    RowsAffected(usize),
    /// SELECT
    Rows(ResultSet),
}

pub struct Engine {
    store: Arc<TableStore>,
}

impl Engine {
    pub fn new(store: Arc<TableStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<TableStore> {
        &self.store
    }

    /// Bind, parse and execute one statement.
    pub fn run(&self, sql: &str, params: &[Value]) -> Result<StatementOutcome> {
        let bound = binder::bind(sql, params)?;
        let statement = parser::parse_statement(&bound)?;
        self.dispatch(statement)
    }

    /// Execute a DDL/DML statement, returning the affected row count.
    pub fn execute_non_query(&self, sql: &str, params: &[Value]) -> Result<usize> {
        match self.run(sql, params)? {
            StatementOutcome::RowsAffected(n) => Ok(n),
            StatementOutcome::Rows(_) => Err(DbError::Syntax(
                "SELECT must be executed through a reader".to_string(),
            )),
        }
    }

    /// Execute a SELECT, returning a cursor over its materialized result.
    pub fn execute_reader(&self, sql: &str, params: &[Value]) -> Result<Cursor> {
        match self.run(sql, params)? {
            StatementOutcome::Rows(result) => Ok(Cursor::new(result)),
            StatementOutcome::RowsAffected(_) => Err(DbError::Syntax(
                "only SELECT can be executed through a reader".to_string(),
            )),
        }
    }

    fn dispatch(&self, statement: Statement) -> Result<StatementOutcome> {
        // One coarse lock for the whole statement.
        let mut tables = self.store.lock();

        match statement {
            Statement::CreateTable(stmt) => {
                let schema = build_schema(stmt)?;
                TableStore::create_table_locked(&mut tables, schema)?;
                Ok(StatementOutcome::RowsAffected(0))
            }
            Statement::DropTable(stmt) => {
                let key = stmt.table.to_ascii_lowercase();
                if tables.remove(&key).is_none() {
                    return Err(DbError::TableNotFound(stmt.table));
                }
                Ok(StatementOutcome::RowsAffected(0))
            }
            Statement::Insert(stmt) => {
                let ignore = self.store.config().ignore_constraint_violations;
                let table = TableStore::get_locked_mut(&mut tables, &stmt.table)?;
                execute_insert(table, &stmt, ignore).map(StatementOutcome::RowsAffected)
            }
            Statement::Update(stmt) => {
                let table = TableStore::get_locked_mut(&mut tables, &stmt.table)?;
                execute_update(table, &stmt).map(StatementOutcome::RowsAffected)
            }
            Statement::Delete(stmt) => {
                let table = TableStore::get_locked_mut(&mut tables, &stmt.table)?;
                execute_delete(table, &stmt).map(StatementOutcome::RowsAffected)
            }
            Statement::Select(stmt) => {
                let table = TableStore::get_locked(&tables, &stmt.table)?;
                execute_select(table, &stmt).map(StatementOutcome::Rows)
            }
        }
    }
}

fn build_schema(stmt: CreateTableStmt) -> Result<TableSchema> {
    let mut seen = HashSet::new();
    for column in &stmt.columns {
        if !seen.insert(column.name.to_ascii_lowercase()) {
            return Err(DbError::Syntax(format!(
                "duplicate column name '{}'",
                column.name
            )));
        }
    }

    let columns: Vec<ColumnDef> = stmt
        .columns
        .into_iter()
        .map(|c| ColumnDef::new(c.name, c.col_type))
        .collect();
    let schema = TableSchema::new(stmt.table, columns);

    for key_column in &stmt.primary_key {
        if schema.column_index(key_column).is_none() {
            return Err(DbError::InvalidPrimaryKey(key_column.clone()));
        }
    }

    Ok(schema.with_primary_key(stmt.primary_key))
}

/// A resolved INSERT/UPDATE right-hand side.
enum Resolved {
    /// Value known before touching any row
    Const(Value),
    /// Same-row column copy, coerced to the target column's type
    CopyColumn(usize),
}

/// Resolve a value expression down to a constant or a column copy.
///
/// Resolution priority: NULL literal, aggregate call, same-row column
/// reference, type-directed literal parse.
fn resolve_expr(
    expr: &ValueExpr,
    schema: &TableSchema,
    target: &ColumnDef,
    qualified: &[&Row],
) -> Result<Resolved> {
    match expr {
        ValueExpr::Literal(Literal::Null) => Ok(Resolved::Const(Value::Null)),
        ValueExpr::Aggregate(call) => {
            let value = evaluator::eval_aggregate(call, schema, qualified)?;
            Ok(Resolved::Const(evaluator::coerce_value(
                &value,
                &target.col_type,
            )?))
        }
        ValueExpr::ColumnRef(name) => match schema.column_index(name) {
            Some(index) => Ok(Resolved::CopyColumn(index)),
            None => {
                // Not a column: fall through to a literal parse of the text
                let value =
                    evaluator::coerce_literal(&Literal::Text(name.clone()), &target.col_type)?;
                Ok(Resolved::Const(value))
            }
        },
        ValueExpr::Literal(literal) => Ok(Resolved::Const(evaluator::coerce_literal(
            literal,
            &target.col_type,
        )?)),
    }
}

fn execute_insert(table: &mut Table, stmt: &InsertStmt, ignore_violations: bool) -> Result<usize> {
    let schema = &table.schema;

    // Target column positions, in statement order.
    let targets: Vec<usize> = if stmt.columns.is_empty() {
        if stmt.values.len() != schema.columns.len() {
            return Err(DbError::Syntax(format!(
                "INSERT has {} value(s) but table '{}' has {} column(s)",
                stmt.values.len(),
                schema.name,
                schema.columns.len()
            )));
        }
        (0..schema.columns.len()).collect()
    } else {
        stmt.columns
            .iter()
            .map(|name| {
                schema
                    .column_index(name)
                    .ok_or_else(|| DbError::ColumnNotFound(name.clone()))
            })
            .collect::<Result<_>>()?
    };

    // Aggregates in an INSERT range over the table's current rows.
    let qualified: Vec<&Row> = table.rows.iter().collect();

    let mut resolved = Vec::with_capacity(targets.len());
    for (&index, expr) in targets.iter().zip(&stmt.values) {
        resolved.push(resolve_expr(expr, schema, &schema.columns[index], &qualified)?);
    }

    // Build the new row; same-row references see values assigned so far.
    let mut row: Row = vec![Value::Null; schema.columns.len()];
    for (&index, value) in targets.iter().zip(&resolved) {
        row[index] = match value {
            Resolved::Const(v) => v.clone(),
            Resolved::CopyColumn(source) => {
                evaluator::coerce_value(&row[*source], &schema.columns[index].col_type)?
            }
        };
    }

    let key = table.key_of(&row);
    if table.has_key(&key) {
        if ignore_violations {
            return Ok(0);
        }
        return Err(DbError::ConstraintViolation(table.schema.name.clone()));
    }

    table.rows.push(row);
    Ok(1)
}

fn execute_update(table: &mut Table, stmt: &UpdateStmt) -> Result<usize> {
    let schema = &table.schema;

    let targets: Vec<usize> = stmt
        .assignments
        .iter()
        .map(|(name, _)| {
            schema
                .column_index(name)
                .ok_or_else(|| DbError::ColumnNotFound(name.clone()))
        })
        .collect::<Result<_>>()?;

    // Qualify rows before any mutation.
    let mut matched = Vec::new();
    for (i, row) in table.rows.iter().enumerate() {
        let is_match = match &stmt.where_clause {
            Some(condition) => evaluator::matches_row(condition, schema, row)?,
            None => true,
        };
        if is_match {
            matched.push(i);
        }
    }

    // Aggregate right-hand sides are evaluated once, over the qualified set.
    let qualified: Vec<&Row> = matched.iter().map(|&i| &table.rows[i]).collect();
    let mut resolved = Vec::with_capacity(targets.len());
    for (&index, (_, expr)) in targets.iter().zip(&stmt.assignments) {
        resolved.push(resolve_expr(expr, schema, &schema.columns[index], &qualified)?);
    }

    // Every replacement row is resolved before any is committed, so a
    // coercion failure on a later row leaves the table untouched.
    let column_types: Vec<_> = targets.iter().map(|&i| schema.columns[i].col_type).collect();
    let mut updated = Vec::with_capacity(matched.len());
    for &row_index in &matched {
        let mut row = table.rows[row_index].clone();
        // Assignments apply in statement order; a same-row reference sees
        // the effect of earlier assignments to the same row.
        for ((&target, value), col_type) in targets.iter().zip(&resolved).zip(&column_types) {
            row[target] = match value {
                Resolved::Const(v) => v.clone(),
                Resolved::CopyColumn(source) => evaluator::coerce_value(&row[*source], col_type)?,
            };
        }
        updated.push(row);
    }

    for (&row_index, row) in matched.iter().zip(updated) {
        table.rows[row_index] = row;
    }

    Ok(matched.len())
}

fn execute_delete(table: &mut Table, stmt: &DeleteStmt) -> Result<usize> {
    let condition = match &stmt.where_clause {
        None => {
            let count = table.rows.len();
            table.rows.clear();
            return Ok(count);
        }
        Some(condition) => condition,
    };

    // Evaluate the full condition before removing anything.
    let mut keep = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        keep.push(!evaluator::matches_row(condition, &table.schema, row)?);
    }
    let removed = keep.iter().filter(|&&k| !k).count();

    let mut keep_iter = keep.into_iter();
    table.rows.retain(|_| keep_iter.next().unwrap_or(true));

    Ok(removed)
}

/// One projected output column: either a source column position or an
/// aggregate evaluated once over the qualified set.
enum OutputColumn {
    Plain(usize),
    Aggregate(AggregateCall),
}

fn execute_select(table: &Table, stmt: &SelectStmt) -> Result<ResultSet> {
    let schema = &table.schema;

    // Resolve `*` and aliases into output columns with their metadata.
    let mut outputs = Vec::new();
    let mut defs = Vec::new();
    for item in &stmt.columns {
        match item {
            SelectColumn::Star => {
                for (i, column) in schema.columns.iter().enumerate() {
                    outputs.push(OutputColumn::Plain(i));
                    defs.push(column.clone());
                }
            }
            SelectColumn::Column { name, alias } => {
                let index = schema
                    .column_index(name)
                    .ok_or_else(|| DbError::ColumnNotFound(name.clone()))?;
                let mut def = schema.columns[index].clone();
                if let Some(alias) = alias {
                    def.name = alias.clone();
                }
                outputs.push(OutputColumn::Plain(index));
                defs.push(def);
            }
            SelectColumn::Aggregate { call, alias } => {
                let col_type = evaluator::aggregate_result_type(call, schema)?;
                let name = alias.clone().unwrap_or_else(|| call.display_name());
                outputs.push(OutputColumn::Aggregate(call.clone()));
                defs.push(ColumnDef::new(name, col_type));
            }
        }
    }

    // Qualify source rows.
    let mut qualified: Vec<&Row> = Vec::new();
    for row in &table.rows {
        let is_match = match &stmt.where_clause {
            Some(condition) => evaluator::matches_row(condition, schema, row)?,
            None => true,
        };
        if is_match {
            qualified.push(row);
        }
    }

    // Stable ascending sort, left-to-right over the listed columns.
    if !stmt.order_by.is_empty() {
        let keys: Vec<usize> = stmt
            .order_by
            .iter()
            .map(|name| {
                schema
                    .column_index(name)
                    .ok_or_else(|| DbError::ColumnNotFound(name.clone()))
            })
            .collect::<Result<_>>()?;
        qualified.sort_by(|a, b| {
            for &key in &keys {
                let ord = sort_cmp(&a[key], &b[key]);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }

    // Aggregates are evaluated once, over the already-qualified row set.
    let mut aggregate_values = Vec::new();
    for output in &outputs {
        aggregate_values.push(match output {
            OutputColumn::Aggregate(call) => {
                Some(evaluator::eval_aggregate(call, schema, &qualified)?)
            }
            OutputColumn::Plain(_) => None,
        });
    }

    let all_aggregates = outputs
        .iter()
        .all(|o| matches!(o, OutputColumn::Aggregate(_)));

    let rows: Vec<Row> = if all_aggregates && !outputs.is_empty() {
        // A pure aggregate projection always yields exactly one row.
        vec![aggregate_values.into_iter().flatten().collect()]
    } else {
        qualified
            .iter()
            .map(|source| {
                outputs
                    .iter()
                    .zip(&aggregate_values)
                    .map(|(output, aggregate)| match output {
                        OutputColumn::Plain(index) => source[*index].clone(),
                        OutputColumn::Aggregate(_) => {
                            aggregate.clone().unwrap_or(Value::Null)
                        }
                    })
                    .collect()
            })
            .collect()
    };

    // DISTINCT is an order-preserving de-duplication over whole projected
    // tuples, applied last.
    let rows = if stmt.distinct {
        apply_distinct(rows)
    } else {
        rows
    };

    Ok(ResultSet::new(defs, rows))
}

/// Total order for sorting: NULL sorts before every value; values of the
/// same column share a kind, so `partial_cmp` decides the rest.
fn sort_cmp(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
    }
}

fn apply_distinct(rows: Vec<Row>) -> Vec<Row> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for row in rows {
        let key: Vec<String> = row.iter().map(Value::dedup_key).collect();
        if seen.insert(key) {
            result.push(row);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;

    fn engine() -> Engine {
        Engine::new(Arc::new(TableStore::default()))
    }

    fn seeded() -> Engine {
        let engine = engine();
        engine
            .execute_non_query(
                "CREATE TABLE People (Name TEXT, Age INTEGER, City TEXT, PRIMARY KEY (Name))",
                &[],
            )
            .unwrap();
        for (name, age, city) in [
            ("ada", 36, "london"),
            ("bob", 41, "paris"),
            ("cyd", 36, "london"),
        ] {
            engine
                .execute_non_query(
                    "INSERT INTO People (Name, Age, City) VALUES (?, ?, ?)",
                    &[
                        Value::Text(name.into()),
                        Value::Integer(age),
                        Value::Text(city.into()),
                    ],
                )
                .unwrap();
        }
        engine
    }

    fn collect(cursor: &mut Cursor) -> Vec<Vec<Value>> {
        let mut rows = Vec::new();
        while cursor.advance() {
            rows.push(
                (0..cursor.column_count())
                    .map(|i| cursor.value(i).unwrap().clone())
                    .collect(),
            );
        }
        rows
    }

    #[test]
    fn test_create_insert_select_roundtrip() {
        let engine = engine();
        engine
            .execute_non_query("CREATE TABLE T (A TEXT, B INTEGER)", &[])
            .unwrap();
        assert_eq!(
            engine
                .execute_non_query("INSERT INTO T (A, B) VALUES ('x', 5)", &[])
                .unwrap(),
            1
        );
        let mut cursor = engine
            .execute_reader("SELECT * FROM T WHERE A = 'x'", &[])
            .unwrap();
        let rows = collect(&mut cursor);
        assert_eq!(
            rows,
            vec![vec![Value::Text("x".into()), Value::Integer(5)]]
        );
    }

    #[test]
    fn test_count_star_tracks_row_count() {
        let engine = seeded();
        let mut cursor = engine.execute_reader("SELECT COUNT(*) FROM People", &[]).unwrap();
        assert!(cursor.advance());
        assert_eq!(cursor.get_i64(0).unwrap(), 3);

        engine.execute_non_query("DELETE People", &[]).unwrap();
        let mut cursor = engine.execute_reader("SELECT COUNT(*) FROM People", &[]).unwrap();
        assert!(cursor.advance());
        assert_eq!(cursor.get_i64(0).unwrap(), 0);
    }

    #[test]
    fn test_delete_reports_prior_count_then_zero() {
        let engine = seeded();
        assert_eq!(engine.execute_non_query("DELETE People", &[]).unwrap(), 3);
        assert_eq!(engine.execute_non_query("DELETE People", &[]).unwrap(), 0);
    }

    #[test]
    fn test_delete_with_condition_counts_matches() {
        let engine = seeded();
        assert_eq!(
            engine
                .execute_non_query("DELETE FROM People WHERE Age = 36", &[])
                .unwrap(),
            2
        );
        assert_eq!(engine.store().row_count("People").unwrap(), 1);
    }

    #[test]
    fn test_update_only_touches_matching_rows() {
        let engine = seeded();
        assert_eq!(
            engine
                .execute_non_query("UPDATE People SET Age = 50 WHERE City = 'london'", &[])
                .unwrap(),
            2
        );
        let mut cursor = engine
            .execute_reader("SELECT Age FROM People WHERE City = 'london'", &[])
            .unwrap();
        for row in collect(&mut cursor) {
            assert_eq!(row[0], Value::Integer(50));
        }
        let mut cursor = engine
            .execute_reader("SELECT Age FROM People WHERE Name = 'bob'", &[])
            .unwrap();
        assert!(cursor.advance());
        assert_eq!(cursor.get_i64(0).unwrap(), 41);
    }

    #[test]
    fn test_distinct_deduplicates_projected_tuples() {
        let engine = engine();
        engine
            .execute_non_query("CREATE TABLE T (A TEXT, B INTEGER)", &[])
            .unwrap();
        for _ in 0..2 {
            engine
                .execute_non_query("INSERT INTO T (A, B) VALUES ('x', 1)", &[])
                .unwrap();
        }
        engine
            .execute_non_query("INSERT INTO T (A, B) VALUES ('y', 2)", &[])
            .unwrap();
        let mut cursor = engine.execute_reader("SELECT DISTINCT * FROM T", &[]).unwrap();
        assert_eq!(collect(&mut cursor).len(), 2);
    }

    #[test]
    fn test_bound_parameter_equals_literal() {
        let engine = seeded();
        let mut bound = engine
            .execute_reader("SELECT * FROM People WHERE Name = ?", &[Value::Text("ada".into())])
            .unwrap();
        let mut literal = engine
            .execute_reader("SELECT * FROM People WHERE Name = 'ada'", &[])
            .unwrap();
        assert_eq!(collect(&mut bound), collect(&mut literal));
    }

    #[test]
    fn test_mixed_combinators_rejected_end_to_end() {
        let engine = seeded();
        let err = engine.execute_reader(
            "SELECT * FROM People WHERE Name = 'x' AND Age = 1 OR City = 'paris'",
            &[],
        );
        assert!(matches!(err, Err(DbError::Syntax(_))));
    }

    #[test]
    fn test_duplicate_primary_key_fails_by_default() {
        let engine = seeded();
        let err = engine.execute_non_query(
            "INSERT INTO People (Name, Age, City) VALUES ('ada', 1, 'rome')",
            &[],
        );
        assert!(matches!(err, Err(DbError::ConstraintViolation(_))));
        assert_eq!(engine.store().row_count("People").unwrap(), 3);
    }

    #[test]
    fn test_duplicate_primary_key_suppressed_is_noop() {
        let store = Arc::new(TableStore::new(
            StoreConfig::new().ignore_constraint_violations(true),
        ));
        let engine = Engine::new(store);
        engine
            .execute_non_query("CREATE TABLE T (Id INTEGER, PRIMARY KEY (Id))", &[])
            .unwrap();
        assert_eq!(
            engine.execute_non_query("INSERT INTO T (Id) VALUES (1)", &[]).unwrap(),
            1
        );
        assert_eq!(
            engine.execute_non_query("INSERT INTO T (Id) VALUES (1)", &[]).unwrap(),
            0
        );
        assert_eq!(engine.store().row_count("T").unwrap(), 1);
    }

    #[test]
    fn test_order_by_is_stable_and_ascending() {
        let engine = seeded();
        let mut cursor = engine
            .execute_reader("SELECT Name FROM People ORDER BY Age, Name", &[])
            .unwrap();
        let names: Vec<String> = collect(&mut cursor)
            .into_iter()
            .map(|r| r[0].to_string())
            .collect();
        assert_eq!(names, vec!["ada", "cyd", "bob"]);
    }

    #[test]
    fn test_aliasing_renames_result_columns() {
        let engine = seeded();
        let cursor = engine
            .execute_reader("SELECT Name AS Who, COUNT(*) AS Total FROM People", &[])
            .unwrap();
        assert_eq!(cursor.column_name(0), Some("Who"));
        assert_eq!(cursor.column_name(1), Some("Total"));
        assert_eq!(cursor.ordinal("total"), Some(1));
    }

    #[test]
    fn test_mixed_aggregate_and_column_projection() {
        let engine = seeded();
        let mut cursor = engine
            .execute_reader("SELECT Name, AVG(Age) FROM People WHERE City = 'london'", &[])
            .unwrap();
        let rows = collect(&mut cursor);
        assert_eq!(rows.len(), 2);
        for row in rows {
            assert_eq!(row[1], Value::Decimal(36.0));
        }
    }

    #[test]
    fn test_pure_aggregate_on_empty_set() {
        let engine = seeded();
        let mut cursor = engine
            .execute_reader("SELECT COUNT(*), MAX(Age) FROM People WHERE Age > 100", &[])
            .unwrap();
        let rows = collect(&mut cursor);
        assert_eq!(rows, vec![vec![Value::Integer(0), Value::Null]]);
    }

    #[test]
    fn test_update_with_aggregate_rhs_uses_prior_values() {
        let engine = seeded();
        // MAX(Age) over the qualified set is computed before mutation
        assert_eq!(
            engine
                .execute_non_query("UPDATE People SET Age = MAX(Age)", &[])
                .unwrap(),
            3
        );
        let mut cursor = engine.execute_reader("SELECT DISTINCT Age FROM People", &[]).unwrap();
        let rows = collect(&mut cursor);
        assert_eq!(rows, vec![vec![Value::Integer(41)]]);
    }

    #[test]
    fn test_update_column_copy() {
        let engine = engine();
        engine
            .execute_non_query("CREATE TABLE T (A TEXT, B TEXT)", &[])
            .unwrap();
        engine
            .execute_non_query("INSERT INTO T (A, B) VALUES ('left', 'right')", &[])
            .unwrap();
        engine.execute_non_query("UPDATE T SET B = A", &[]).unwrap();
        let mut cursor = engine.execute_reader("SELECT B FROM T", &[]).unwrap();
        assert!(cursor.advance());
        assert_eq!(cursor.get_string(0).unwrap(), "left");
    }

    #[test]
    fn test_failed_statement_leaves_store_unchanged() {
        let engine = seeded();
        // Conversion failure: 'old' is not a valid INTEGER
        let err = engine.execute_non_query(
            "UPDATE People SET City = 'moved', Age = 'old' WHERE City = 'london'",
            &[],
        );
        assert!(matches!(err, Err(DbError::Conversion(_))));
        let mut cursor = engine
            .execute_reader("SELECT COUNT(*) FROM People WHERE City = 'moved'", &[])
            .unwrap();
        assert!(cursor.advance());
        assert_eq!(cursor.get_i64(0).unwrap(), 0);
    }

    #[test]
    fn test_failed_copy_update_leaves_earlier_rows_untouched() {
        let engine = engine();
        engine
            .execute_non_query("CREATE TABLE T (A TEXT, B INTEGER)", &[])
            .unwrap();
        engine
            .execute_non_query("INSERT INTO T (A, B) VALUES ('5', 1)", &[])
            .unwrap();
        engine
            .execute_non_query("INSERT INTO T (A, B) VALUES ('x', 2)", &[])
            .unwrap();
        // The copy coerces row by row; the second row fails, and the first
        // must keep its original value.
        let err = engine.execute_non_query("UPDATE T SET B = A", &[]);
        assert!(matches!(err, Err(DbError::Conversion(_))));
        let mut cursor = engine
            .execute_reader("SELECT B FROM T WHERE A = '5'", &[])
            .unwrap();
        assert!(cursor.advance());
        assert_eq!(cursor.get_i64(0).unwrap(), 1);
    }

    #[test]
    fn test_fractional_literal_rejected_for_integer_column() {
        let engine = seeded();
        let err = engine.execute_non_query(
            "INSERT INTO People (Name, Age, City) VALUES ('dee', 1.5, 'rome')",
            &[],
        );
        assert!(matches!(err, Err(DbError::Conversion(_))));
        assert_eq!(engine.store().row_count("People").unwrap(), 3);
    }

    #[test]
    fn test_unknown_table_and_column_errors() {
        let engine = seeded();
        assert!(matches!(
            engine.execute_reader("SELECT * FROM Nothing", &[]),
            Err(DbError::TableNotFound(_))
        ));
        assert!(matches!(
            engine.execute_reader("SELECT Nope FROM People", &[]),
            Err(DbError::ColumnNotFound(_))
        ));
        assert!(matches!(
            engine.execute_non_query("INSERT INTO People (Nope) VALUES (1)", &[]),
            Err(DbError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_primary_key_column_rejected() {
        let engine = engine();
        let err = engine.execute_non_query("CREATE TABLE T (A TEXT, PRIMARY KEY (B))", &[]);
        assert!(matches!(err, Err(DbError::InvalidPrimaryKey(_))));
        assert!(!engine.store().contains_table("T"));
    }

    #[test]
    fn test_like_and_in_filters() {
        let engine = seeded();
        let mut cursor = engine
            .execute_reader("SELECT Name FROM People WHERE Name LIKE '%d%'", &[])
            .unwrap();
        assert_eq!(collect(&mut cursor).len(), 2); // ada, cyd

        let mut cursor = engine
            .execute_reader("SELECT Name FROM People WHERE Name IN ('ada', 'bob')", &[])
            .unwrap();
        assert_eq!(collect(&mut cursor).len(), 2);
    }

    #[test]
    fn test_select_through_non_query_is_rejected() {
        let engine = seeded();
        assert!(engine.execute_non_query("SELECT * FROM People", &[]).is_err());
        assert!(engine.execute_reader("DELETE People", &[]).is_err());
    }

    #[test]
    fn test_timestamp_column_roundtrip() {
        let engine = engine();
        engine
            .execute_non_query("CREATE TABLE Ev (At TIMESTAMP, What TEXT)", &[])
            .unwrap();
        engine
            .execute_non_query(
                "INSERT INTO Ev (At, What) VALUES ('3/7/2024 10:30:00', 'launch')",
                &[],
            )
            .unwrap();
        let mut cursor = engine
            .execute_reader("SELECT * FROM Ev WHERE At > '1/1/2024'", &[])
            .unwrap();
        assert!(cursor.advance());
        let ts = cursor.get_timestamp(0).unwrap();
        assert_eq!(ts.month(), 3);
        assert_eq!(ts.hour(), 10);
    }
}
