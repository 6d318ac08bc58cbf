//! Metadata-driven entity mapping and query building.
//!
//! The crate turns annotated entity types into structured, parameterized
//! statements and materializes raw result rows back into instances. It
//! never talks to a database itself: execution lives behind the
//! [`StatementExecutor`] trait, implemented by a backend crate.
//!
//! Pipeline:
//! 1. registry — one cached [`EntityDescriptor`] per entity type
//! 2. resolver — property names and filter values into qualified terms
//! 3. query_builder — stateful composition and terminal operations
//! 4. materializer — result rows into typed instances

pub mod descriptor;
pub mod errors;
pub mod materializer;
pub mod query_builder;
pub mod registry;
pub mod resolver;
pub mod statement;
pub mod traits;

pub mod prelude;

/// A raw result row keyed by bare column name.
///
/// Backends strip table qualification before handing rows over; when a
/// join projects the same column name from two tables, the last one wins.
pub type Row = std::collections::HashMap<String, serde_json::Value>;

pub use descriptor::{EntityDescriptor, FieldBinding, QualifiedColumn};
pub use errors::EntityError;
pub use query_builder::{EntityQuery, Page};
pub use resolver::FilterValue;
pub use statement::{
    CompareOp, DeleteStatement, FilterTerm, InsertStatement, JoinSpec, MutationStatement,
    OrderTerm, SelectStatement, SortOrder, UpdateStatement,
};
pub use traits::{Entity, RowPage, StatementExecutor};

// Re-exported for derive-generated code, which names Value through this
// crate so downstream crates need no direct serde_json dependency.
pub use serde_json;

/// Debug logging, compiled in only with the `debug-logging` feature.
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

/// Trace logging, compiled in only with the `debug-logging` feature.
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}
