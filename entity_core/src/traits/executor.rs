//! Trait definitions
//!
//! This module defines the seam between the query-building core and the
//! external execution collaborator (connection handling, transactions and
//! SQL rendering live on the other side of this trait).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::EntityError;
use crate::statement::{InsertStatement, MutationStatement, SelectStatement};
use crate::Row;

/// One page of raw rows plus the total match count across all pages.
#[derive(Debug, Clone)]
pub struct RowPage {
    pub rows: Vec<Row>,
    pub total_count: i64,
}

/// The external execution collaborator.
///
/// The core hands over structured, parameterized statements and gets back
/// row maps, affected-row counts, or a generated identity. No retries, no
/// cancellation: a statement either completes or its error surfaces
/// immediately to the caller. Deadlines, if any, travel on the statement
/// itself and are the implementor's responsibility.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    /// Run a select and return its rows, keyed by bare column name.
    async fn execute_query(&self, statement: &SelectStatement) -> Result<Vec<Row>, EntityError>;

    /// Run a single-row insert and return the backend-generated identity.
    async fn execute_scalar_insert(
        &self,
        statement: &InsertStatement,
    ) -> Result<Value, EntityError>;

    /// Run an insert/update/delete and return the affected-row count.
    async fn execute_mutation(&self, statement: &MutationStatement) -> Result<u64, EntityError>;

    /// Run a select limited to one page and report the total match count.
    async fn paginate(
        &self,
        statement: &SelectStatement,
        page: i64,
        page_size: i64,
    ) -> Result<RowPage, EntityError>;
}
