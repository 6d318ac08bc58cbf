//! Core RowHaus functionality
//!
//! This module contains the main RowHaus struct: it owns the connection
//! pool and hands out entity query builders wired to the PostgreSQL
//! statement executor.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::errors::RowHausError;
use crate::executor::PgStatementExecutor;
use config::DatabaseConfig;
use entity_core::{Entity, EntityQuery};

/// Main RowHaus coordinator that manages the database connection and
/// creates entity query builders
pub struct RowHaus {
    pool: PgPool,
    executor: Arc<PgStatementExecutor>,
    command_timeout: Option<Duration>,
}

impl RowHaus {
    /// Create a new RowHaus with a database connection
    pub async fn new(config: DatabaseConfig) -> Result<Self, RowHausError> {
        let connection_string = config.connection_string();

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        // Set max lifetime if specified
        if config.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        let pool = pool_options.connect(&connection_string).await?;
        let executor = Arc::new(PgStatementExecutor::new(pool.clone()));

        let command_timeout = match config.statement_timeout_seconds {
            0 => None,
            seconds => Some(Duration::from_secs(seconds)),
        };

        Ok(Self {
            pool,
            executor,
            command_timeout,
        })
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a query builder for entity type `T`.
    ///
    /// Builders are independent: each carries its own composition state
    /// and shares the pool through the executor.
    pub fn entities<T: Entity>(
        &self,
    ) -> Result<EntityQuery<T, PgStatementExecutor>, RowHausError> {
        let query = EntityQuery::new(Arc::clone(&self.executor))?;
        Ok(match self.command_timeout {
            Some(timeout) => query.with_command_timeout(timeout),
            None => query,
        })
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), RowHausError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
