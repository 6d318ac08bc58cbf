//! Error types for RowHaus operations

use entity_core::EntityError;
use thiserror::Error;

/// Top-level error for pool setup and entity operations
#[derive(Error, Debug)]
pub enum RowHausError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Entity(#[from] EntityError),
}
