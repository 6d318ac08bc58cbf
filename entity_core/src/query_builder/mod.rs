//! Query builder
//!
//! A stateful, entity-typed builder that accumulates filters, joins and
//! ordering, then runs a terminal operation through the statement
//! executor. Terminal operations reset the builder only after they
//! succeed, so a failed call can be corrected and retried on the same
//! builder.

mod builder;
mod filter;
mod join;
mod ordering;
mod pagination;
mod update;

#[cfg(test)]
mod integration_tests;

pub use builder::EntityQuery;
pub use pagination::Page;
