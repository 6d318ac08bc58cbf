//! Trait definitions
//!
//! This module defines the metadata contract every mapped entity type
//! fulfills. It is normally implemented via `#[derive(Entity)]` from the
//! `entity-derive` crate rather than by hand.
//!
//! Recommended usage:
//! ```ignore
//! use entity_derive::Entity;
//!
//! #[derive(Debug, Default, Entity)]
//! #[table(name = "customers")]
//! pub struct Customer {
//!     #[field(name = "id")]
//!     #[auto_increment]
//!     pub id: i64,
//!
//!     #[field(name = "first_name")]
//!     pub first_name: String,
//!
//!     #[field]
//!     pub active: bool,
//! }
//! ```

use serde_json::Value;

use crate::descriptor::FieldBinding;
use crate::errors::EntityError;
use crate::Row;

/// Static metadata and row conversion for a type mapped to exactly one table.
///
/// The three markers consumed here are the whole registration surface:
/// `#[table(name = "...")]` on the struct, `#[field]`/`#[field(name = "...")]`
/// on mapped properties, and `#[auto_increment]` on backend-generated
/// identities. Properties without a field marker are invisible to every
/// operation (and must implement `Default` so materialization can fill them).
pub trait Entity: Sized + Send + Sync + 'static {
    /// Rust type name, used in error context
    fn entity_name() -> &'static str;

    /// The database table this entity maps to
    fn table_name() -> &'static str;

    /// Field bindings in declaration order
    fn bindings() -> &'static [FieldBinding];

    /// Properties that exist on the type but carry no field marker
    fn unmapped_properties() -> &'static [&'static str] {
        &[]
    }

    /// Construct an instance from a result row keyed by bare column name.
    ///
    /// # Errors
    ///
    /// Returns `MissingColumn` if a bound column is absent from the row
    /// (a schema/mapping mismatch, always fatal) and `Serialization` if a
    /// value cannot be converted to the declared property type.
    fn from_row(row: &Row) -> Result<Self, EntityError>;

    /// Emit `(column, value)` pairs for the writable (non-auto-generated)
    /// bindings, in binding order. Order matters: the executor matches
    /// values to columns positionally for multi-row inserts.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if a property value cannot be converted.
    fn writable_values(&self) -> Result<Vec<(&'static str, Value)>, EntityError>;
}
