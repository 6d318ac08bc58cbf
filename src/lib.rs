//! # RowHaus
//!
//! A metadata-driven entity mapping layer for PostgreSQL with a fluent,
//! entity-typed query builder. Entities are plain structs annotated with
//! three attribute markers; queries compose by property name and are
//! validated against the entity metadata before any SQL is issued.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rowhaus::prelude::*;
//!
//! #[derive(Debug, Default, Entity)]
//! #[table(name = "users")]
//! pub struct User {
//!     #[field(name = "id")]
//!     #[auto_increment]
//!     pub id: i64,
//!
//!     #[field(name = "user_name")]
//!     pub name: String,
//!
//!     #[field]
//!     pub active: bool,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let rowhaus = RowHaus::new(config.database).await?;
//!
//!     let user = User {
//!         id: 0,
//!         name: "John Doe".to_string(),
//!         active: true,
//!     };
//!
//!     let mut users = rowhaus.entities::<User>()?;
//!     let id: i64 = users.insert_returning_id(&user).await?;
//!
//!     users.filter(vec![("active", FilterValue::scalar(true))])?;
//!     users.order_by(&["name"])?;
//!     let active_users = users.get().await?;
//!     println!("Inserted {id}, {} active users", active_users.len());
//!
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod errors;
pub mod prelude;

mod executor;
mod sql;

// Re-export the main public types for convenience
pub use crate::core::RowHaus;
pub use crate::errors::RowHausError;
pub use crate::executor::PgStatementExecutor;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig};

// Re-export internal crates used by macros and the public API
pub use entity_core;
pub use entity_derive;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
