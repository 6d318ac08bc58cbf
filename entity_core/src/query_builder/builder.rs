//! Builder state and select terminals

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use crate::debug_log;
use crate::descriptor::EntityDescriptor;
use crate::errors::EntityError;
use crate::materializer::rows_to_entities;
use crate::registry;
use crate::statement::{FilterTerm, JoinSpec, OrderTerm, SelectStatement};
use crate::traits::{Entity, StatementExecutor};

/// Entity-typed query builder over a shared statement executor.
///
/// One builder serves one main entity type `T`. Composition methods
/// (`filter`, `join`, `order_by`, ...) accumulate state and validate
/// their inputs eagerly: a method that fails leaves the builder exactly
/// as it was. Terminal methods execute, then reset the builder back to
/// its pristine state, but only on success.
pub struct EntityQuery<T: Entity, E: StatementExecutor> {
    pub(super) executor: Arc<E>,
    pub(super) command_timeout: Option<Duration>,
    pub(super) main: &'static EntityDescriptor,
    /// Entities whose columns the select projects, main first
    pub(super) registered: Vec<&'static EntityDescriptor>,
    /// Cursor for implicit join chaining: the most recently joined entity
    pub(super) last_joined: &'static EntityDescriptor,
    pub(super) filters: Vec<FilterTerm>,
    pub(super) order: Vec<OrderTerm>,
    pub(super) joins: Vec<JoinSpec>,
    pub(super) limit: Option<i64>,
    pub(super) _entity: PhantomData<fn() -> T>,
}

impl<T: Entity, E: StatementExecutor> EntityQuery<T, E> {
    /// Create a builder for `T`, resolving (and caching) its descriptor.
    ///
    /// # Errors
    ///
    /// `Configuration` if `T`'s metadata is invalid.
    pub fn new(executor: Arc<E>) -> Result<Self, EntityError> {
        let main = registry::resolve::<T>()?;
        Ok(Self {
            executor,
            command_timeout: None,
            main,
            registered: vec![main],
            last_joined: main,
            filters: Vec::new(),
            order: Vec::new(),
            joins: Vec::new(),
            limit: None,
            _entity: PhantomData,
        })
    }

    /// Set a per-statement deadline carried on every statement this
    /// builder issues. Survives resets.
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }

    /// Cap the number of rows the next select returns. Clamped up to 1,
    /// like `paginate`'s arguments.
    pub fn limit(&mut self, limit: i64) -> &mut Self {
        self.limit = Some(limit.max(1));
        self
    }

    /// Register an entity into the select projection, keeping main first
    /// and each descriptor at most once.
    pub(super) fn register(&mut self, descriptor: &'static EntityDescriptor) {
        if !self
            .registered
            .iter()
            .any(|existing| std::ptr::eq(*existing, descriptor))
        {
            self.registered.push(descriptor);
        }
    }

    pub(super) fn select_statement(&self, limit: Option<i64>) -> SelectStatement {
        SelectStatement {
            table: self.main.table_name,
            columns: self
                .registered
                .iter()
                .flat_map(|descriptor| descriptor.qualified_columns())
                .collect(),
            joins: self.joins.clone(),
            filters: self.filters.clone(),
            order: self.order.clone(),
            limit,
            timeout: self.command_timeout,
        }
    }

    /// Back to pristine: composition state cleared, executor and timeout
    /// kept. Called by terminals after success, never after failure.
    pub(super) fn reset(&mut self) {
        self.registered.clear();
        self.registered.push(self.main);
        self.last_joined = self.main;
        self.filters.clear();
        self.order.clear();
        self.joins.clear();
        self.limit = None;
    }

    /// Execute the accumulated select and materialize every matching row.
    pub async fn get(&mut self) -> Result<Vec<T>, EntityError> {
        let statement = self.select_statement(self.limit);
        debug_log!(
            entity = self.main.entity_name,
            table = statement.table,
            filters = statement.filters.len(),
            joins = statement.joins.len(),
            "executing select"
        );
        let rows = self.executor.execute_query(&statement).await?;
        let entities = rows_to_entities(rows)?;
        self.reset();
        Ok(entities)
    }

    /// Execute the select capped at one row; `None` when nothing matches.
    pub async fn first_or_default(&mut self) -> Result<Option<T>, EntityError> {
        let statement = self.select_statement(Some(1));
        let rows = self.executor.execute_query(&statement).await?;
        let entity = match rows.first() {
            Some(row) => Some(T::from_row(row)?),
            None => None,
        };
        self.reset();
        Ok(entity)
    }

    /// Whether at least one row matches the accumulated filters.
    pub async fn exists(&mut self) -> Result<bool, EntityError> {
        let statement = self.select_statement(Some(1));
        let rows = self.executor.execute_query(&statement).await?;
        let found = !rows.is_empty();
        self.reset();
        Ok(found)
    }
}
