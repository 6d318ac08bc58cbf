//! Trait definitions
//!
//! This module defines the core traits: entity metadata and the
//! statement execution seam.

pub mod entity;
pub mod executor;

pub use entity::Entity;
pub use executor::{RowPage, StatementExecutor};
