//! Abstract syntax tree for the restricted SQL dialect

use crate::types::ColumnType;

/// Top-level statement
#[derive(Debug, Clone)]
pub enum Statement {
    CreateTable(CreateTableStmt),
    DropTable(DropTableStmt),
    Insert(InsertStmt),
    Update(UpdateStmt),
    Delete(DeleteStmt),
    Select(SelectStmt),
}

/// CREATE TABLE statement
#[derive(Debug, Clone)]
pub struct CreateTableStmt {
    pub table: String,
    pub columns: Vec<ColumnSpec>,
    /// Ordered primary-key column names; empty means no primary key.
    pub primary_key: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: String,
    pub col_type: ColumnType,
}

/// DROP [TABLE] statement
#[derive(Debug, Clone)]
pub struct DropTableStmt {
    pub table: String,
}

/// INSERT statement
#[derive(Debug, Clone)]
pub struct InsertStmt {
    pub table: String,
    /// Target columns; empty means all columns in declared order.
    pub columns: Vec<String>,
    pub values: Vec<ValueExpr>,
}

/// UPDATE statement
#[derive(Debug, Clone)]
pub struct UpdateStmt {
    pub table: String,
    pub assignments: Vec<(String, ValueExpr)>,
    pub where_clause: Option<Condition>,
}

/// DELETE statement
#[derive(Debug, Clone)]
pub struct DeleteStmt {
    pub table: String,
    pub where_clause: Option<Condition>,
}

/// SELECT statement (single table, no joins)
#[derive(Debug, Clone)]
pub struct SelectStmt {
    pub table: String,
    pub distinct: bool,
    pub columns: Vec<SelectColumn>,
    pub where_clause: Option<Condition>,
    /// ORDER BY column names, left-to-right; always ascending.
    pub order_by: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum SelectColumn {
    /// `*` - expanded to the table's full column list at execution time
    Star,
    Column {
        name: String,
        alias: Option<String>,
    },
    Aggregate {
        call: AggregateCall,
        alias: Option<String>,
    },
}

/// An aggregate pseudo-column, e.g. `COUNT(*)` or `SUM(price)`.
#[derive(Debug, Clone)]
pub struct AggregateCall {
    pub func: AggregateFunc,
    /// Argument column; `None` means `*` (COUNT only).
    pub column: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
    Stdev,
    Var,
}

impl AggregateFunc {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "COUNT" => Some(AggregateFunc::Count),
            "SUM" => Some(AggregateFunc::Sum),
            "AVG" => Some(AggregateFunc::Avg),
            "MIN" => Some(AggregateFunc::Min),
            "MAX" => Some(AggregateFunc::Max),
            "STDEV" => Some(AggregateFunc::Stdev),
            "VAR" => Some(AggregateFunc::Var),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunc::Count => "COUNT",
            AggregateFunc::Sum => "SUM",
            AggregateFunc::Avg => "AVG",
            AggregateFunc::Min => "MIN",
            AggregateFunc::Max => "MAX",
            AggregateFunc::Stdev => "STDEV",
            AggregateFunc::Var => "VAR",
        }
    }
}

impl AggregateCall {
    /// Display form used as the default result column name.
    pub fn display_name(&self) -> String {
        match &self.column {
            Some(col) => format!("{}({})", self.func.name(), col),
            None => format!("{}(*)", self.func.name()),
        }
    }
}

/// Right-hand side of an INSERT value or UPDATE assignment.
///
/// Resolution priority at execution time: NULL literal, aggregate call,
/// same-row column reference, type-directed literal parse.
#[derive(Debug, Clone)]
pub enum ValueExpr {
    Literal(Literal),
    Aggregate(AggregateCall),
    /// Bare identifier: a same-row column reference when the name matches a
    /// column, otherwise parsed as a literal against the target type.
    ColumnRef(String),
}

/// Untyped literal as written; coerced against a declared column type.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Number(f64),
    Text(String),
}

/// Parsed WHERE clause: a flat comparison list joined by exactly one
/// combinator. Mixing AND and OR is rejected at parse time.
#[derive(Debug, Clone)]
pub struct Condition {
    pub comparisons: Vec<Comparison>,
    pub combinator: Combinator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

#[derive(Debug, Clone)]
pub struct Comparison {
    pub column: String,
    pub predicate: Predicate,
}

#[derive(Debug, Clone)]
pub enum Predicate {
    Compare { op: CompareOp, value: Literal },
    Like { pattern: String },
    In { values: Vec<Literal> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Gt,
}
