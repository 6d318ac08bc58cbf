//! Convenience re-exports for downstream crates.
//!
//! ```ignore
//! use entity_core::prelude::*;
//! ```

pub use crate::descriptor::{EntityDescriptor, FieldBinding, QualifiedColumn};
pub use crate::errors::EntityError;
pub use crate::materializer::{
    bool_column_value, coerce_bool, column_value, nullable_bool_column_value, to_column_value,
};
pub use crate::query_builder::{EntityQuery, Page};
pub use crate::registry;
pub use crate::resolver::FilterValue;
pub use crate::statement::{
    CompareOp, DeleteStatement, FilterTerm, InsertStatement, JoinSpec, MutationStatement,
    OrderTerm, SelectStatement, SortOrder, UpdateStatement,
};
pub use crate::traits::{Entity, RowPage, StatementExecutor};
pub use crate::Row;
