//! Statement model
//!
//! Structured statements handed to the execution collaborator: a qualified
//! table name, column list, predicate list, join list, ordering list and an
//! optional command timeout. The core never renders SQL itself.

use std::time::Duration;

use serde_json::Value;

use crate::descriptor::QualifiedColumn;

/// Predicate operators supported by filter terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,  // =
    Lt,  // <
    Lte, // <=
    Gt,  // >
    Gte, // >=
}

impl CompareOp {
    pub fn to_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
        }
    }
}

/// Single resolved predicate; terms combine conjunctively.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterTerm {
    pub column: QualifiedColumn,
    pub operator: CompareOp,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// One resolved ordering term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTerm {
    pub column: QualifiedColumn,
    pub direction: SortOrder,
}

/// Inner equality join, direction fixed left (previously joined entity)
/// to right (newly joined entity).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinSpec {
    /// Table being joined in
    pub table: &'static str,
    pub left: QualifiedColumn,
    pub right: QualifiedColumn,
}

/// A parameterized select
#[derive(Debug, Clone)]
pub struct SelectStatement {
    pub table: &'static str,
    /// Qualified read columns of every registered entity, main first
    pub columns: Vec<QualifiedColumn>,
    pub joins: Vec<JoinSpec>,
    pub filters: Vec<FilterTerm>,
    pub order: Vec<OrderTerm>,
    pub limit: Option<i64>,
    pub timeout: Option<Duration>,
}

/// A parameterized single- or multi-row insert
#[derive(Debug, Clone)]
pub struct InsertStatement {
    pub table: &'static str,
    /// Bare writable column names
    pub columns: Vec<&'static str>,
    /// Value rows matched to `columns` positionally
    pub rows: Vec<Vec<Value>>,
    /// Identity column the backend should report back, if requested
    pub returning: Option<&'static str>,
    pub timeout: Option<Duration>,
}

/// A parameterized bulk update scoped by filter terms
#[derive(Debug, Clone)]
pub struct UpdateStatement {
    pub table: &'static str,
    /// Bare-column assignments in resolution order
    pub assignments: Vec<(&'static str, Value)>,
    pub filters: Vec<FilterTerm>,
    pub timeout: Option<Duration>,
}

/// A parameterized bulk delete scoped by filter terms
#[derive(Debug, Clone)]
pub struct DeleteStatement {
    pub table: &'static str,
    pub filters: Vec<FilterTerm>,
    pub timeout: Option<Duration>,
}

/// The statements `execute_mutation` accepts
#[derive(Debug, Clone)]
pub enum MutationStatement {
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
}
