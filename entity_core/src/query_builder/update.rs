//! Mutation terminals: insert, update, delete

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::debug_log;
use crate::errors::EntityError;
use crate::resolver::resolve_assignments;
use crate::statement::{DeleteStatement, InsertStatement, MutationStatement, UpdateStatement};
use crate::traits::{Entity, StatementExecutor};

use super::builder::EntityQuery;

impl<T: Entity, E: StatementExecutor> EntityQuery<T, E> {
    fn insert_statement(&self, entities: &[&T]) -> Result<InsertStatement, EntityError> {
        let columns: Vec<&'static str> = self.main.writable_columns();
        let mut rows = Vec::with_capacity(entities.len());
        for entity in entities {
            let values = entity.writable_values()?;
            rows.push(values.into_iter().map(|(_, value)| value).collect());
        }
        Ok(InsertStatement {
            table: self.main.table_name,
            columns,
            rows,
            returning: None,
            timeout: self.command_timeout,
        })
    }

    /// Ordering makes no sense on a mutation and signals a stale builder,
    /// so refuse before issuing anything. Joins likewise: mutations are
    /// scoped to the main table only, which also rules out filters that
    /// resolved against another entity's table.
    fn guard_mutation(&self, operation: &str) -> Result<(), EntityError> {
        if !self.order.is_empty() {
            return Err(EntityError::InvalidState(format!(
                "{operation} cannot be combined with ordering"
            )));
        }
        if !self.joins.is_empty() {
            return Err(EntityError::InvalidState(format!(
                "{operation} cannot be combined with joins"
            )));
        }
        if let Some(term) = self
            .filters
            .iter()
            .find(|term| term.column.table != self.main.table_name)
        {
            return Err(EntityError::InvalidState(format!(
                "{operation} cannot filter on '{}': not a {} column",
                term.column, self.main.entity_name
            )));
        }
        Ok(())
    }

    /// Insert one entity's writable columns. Auto-generated columns are
    /// omitted so the backend assigns them.
    pub async fn insert(&mut self, entity: &T) -> Result<u64, EntityError> {
        let statement = self.insert_statement(&[entity])?;
        debug_log!(table = statement.table, "executing insert");
        let affected = self
            .executor
            .execute_mutation(&MutationStatement::Insert(statement))
            .await?;
        self.reset();
        Ok(affected)
    }

    /// Insert a batch in one statement. An empty batch is a no-op.
    pub async fn insert_many(&mut self, entities: &[T]) -> Result<u64, EntityError> {
        if entities.is_empty() {
            self.reset();
            return Ok(0);
        }
        let refs: Vec<&T> = entities.iter().collect();
        let statement = self.insert_statement(&refs)?;
        debug_log!(
            table = statement.table,
            rows = statement.rows.len(),
            "executing batch insert"
        );
        let affected = self
            .executor
            .execute_mutation(&MutationStatement::Insert(statement))
            .await?;
        self.reset();
        Ok(affected)
    }

    /// Insert one entity and return its backend-generated identity,
    /// decoded as `R`.
    ///
    /// # Errors
    ///
    /// `Configuration` if the entity declares no auto-generated column,
    /// `Serialization` if the returned identity does not decode as `R`.
    pub async fn insert_returning_id<R: DeserializeOwned>(
        &mut self,
        entity: &T,
    ) -> Result<R, EntityError> {
        let identity = self
            .main
            .identity_column()
            .ok_or_else(|| EntityError::Configuration {
                entity: self.main.entity_name,
                reason: "no auto-generated identity column declared".to_string(),
            })?;
        let mut statement = self.insert_statement(&[entity])?;
        statement.returning = Some(identity);
        debug_log!(table = statement.table, identity, "executing scalar insert");
        let value = self.executor.execute_scalar_insert(&statement).await?;
        let id = serde_json::from_value(value).map_err(|error| {
            EntityError::Serialization(format!(
                "generated identity of {} did not decode: {error}",
                self.main.entity_name
            ))
        })?;
        self.reset();
        Ok(id)
    }

    /// Update the writable columns named in `values` on every row the
    /// accumulated filters match.
    ///
    /// Auto-generated and unmapped properties in `values` are skipped;
    /// unknown properties fail with `Mapping`. An update that would end
    /// up with no assignments is refused.
    ///
    /// # Errors
    ///
    /// `InvalidState` if ordering or joins were composed, or if no
    /// writable assignment remains. No statement is issued in either
    /// case and the builder keeps its state.
    pub async fn update(&mut self, values: Vec<(&str, Value)>) -> Result<u64, EntityError> {
        self.guard_mutation("update")?;
        let assignments = resolve_assignments(self.main, values)?;
        if assignments.is_empty() {
            return Err(EntityError::InvalidState(
                "update produced no writable assignments".to_string(),
            ));
        }
        let statement = UpdateStatement {
            table: self.main.table_name,
            assignments,
            filters: self.filters.clone(),
            timeout: self.command_timeout,
        };
        debug_log!(
            table = statement.table,
            assignments = statement.assignments.len(),
            filters = statement.filters.len(),
            "executing update"
        );
        let affected = self
            .executor
            .execute_mutation(&MutationStatement::Update(statement))
            .await?;
        self.reset();
        Ok(affected)
    }

    /// Delete every row the accumulated filters match. With no filters
    /// this clears the whole table.
    ///
    /// # Errors
    ///
    /// `InvalidState` if ordering or joins were composed; no statement
    /// is issued and the builder keeps its state.
    pub async fn delete(&mut self) -> Result<u64, EntityError> {
        self.guard_mutation("delete")?;
        let statement = DeleteStatement {
            table: self.main.table_name,
            filters: self.filters.clone(),
            timeout: self.command_timeout,
        };
        debug_log!(
            table = statement.table,
            filters = statement.filters.len(),
            "executing delete"
        );
        let affected = self
            .executor
            .execute_mutation(&MutationStatement::Delete(statement))
            .await?;
        self.reset();
        Ok(affected)
    }
}
