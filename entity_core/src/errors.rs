use thiserror::Error;

/// Errors raised by the mapping core.
///
/// Every variant carries the property/type context needed to diagnose a
/// mapping mistake without inspecting generated SQL. Errors are raised
/// synchronously to the immediate caller and never retried internally.
#[derive(Error, Debug)]
pub enum EntityError {
    /// The entity type is not usable (no mapped fields, duplicate columns, ...)
    #[error("Entity {entity} is not usable: {reason}")]
    Configuration {
        entity: &'static str,
        reason: String,
    },

    /// A filter/order/join/update referenced a property the target type does not have
    #[error("Property '{property}' is not matching type {entity}")]
    Mapping {
        entity: &'static str,
        property: String,
    },

    /// The property exists on the target type but carries no field marker
    #[error("Property '{property}' on {entity} is not a field")]
    NotAField {
        entity: &'static str,
        property: String,
    },

    /// A filter value was neither a plain scalar nor a comparison wrapper
    #[error("Bad comparison value for property '{property}': {reason}")]
    ComparisonType { property: String, reason: String },

    /// Incompatible builder state combination (e.g. ordering before a bulk mutation)
    #[error("Invalid query state: {0}")]
    InvalidState(String),

    /// A result row is missing a column the entity's bindings expect
    #[error("Column '{column}' missing from result row for entity {entity}")]
    MissingColumn {
        entity: &'static str,
        column: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Database error: {0}")]
    Database(String),
}
