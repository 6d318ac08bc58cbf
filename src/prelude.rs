//! Convenience re-exports for common RowHaus usage
//!
//! # Example
//!
//! ```rust
//! use rowhaus::prelude::*;
//! ```

// Core RowHaus components
pub use crate::core::RowHaus;
pub use crate::errors::RowHausError;
pub use crate::executor::PgStatementExecutor;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig};

// Entity mapping and query building
pub use entity_core::prelude::*;

// The derive macro for entity structs
pub use entity_derive::Entity;

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use sqlx;
pub use tokio;

// Commonly used sqlx types
pub use sqlx::PgPool;
