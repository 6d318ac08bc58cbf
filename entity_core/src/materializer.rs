//! Materializer
//!
//! Converts raw result rows into typed entity instances and entity
//! property values into column values for inserts. Conversion goes
//! through `serde_json::Value` in both directions.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::EntityError;
use crate::traits::Entity;
use crate::Row;

/// Read a typed value out of `row` under `column`.
///
/// # Errors
///
/// `MissingColumn` when the row has no such key, `Serialization` when the
/// stored value does not decode as `V`.
pub fn column_value<V: DeserializeOwned>(
    entity: &'static str,
    row: &Row,
    column: &str,
) -> Result<V, EntityError> {
    let value = row
        .get(column)
        .ok_or_else(|| EntityError::MissingColumn {
            entity,
            column: column.to_string(),
        })?
        .clone();
    serde_json::from_value(value).map_err(|error| {
        EntityError::Serialization(format!(
            "column '{column}' of {entity} did not decode: {error}"
        ))
    })
}

/// Read a boolean column with the tolerant coercion used for backends
/// that store flags as integers.
pub fn bool_column_value(
    entity: &'static str,
    row: &Row,
    column: &str,
) -> Result<bool, EntityError> {
    let value = row.get(column).ok_or_else(|| EntityError::MissingColumn {
        entity,
        column: column.to_string(),
    })?;
    Ok(coerce_bool(value))
}

/// Read an optional boolean column: SQL null stays `None`, anything else
/// coerces like [`bool_column_value`].
pub fn nullable_bool_column_value(
    entity: &'static str,
    row: &Row,
    column: &str,
) -> Result<Option<bool>, EntityError> {
    let value = row.get(column).ok_or_else(|| EntityError::MissingColumn {
        entity,
        column: column.to_string(),
    })?;
    match value {
        Value::Null => Ok(None),
        other => Ok(Some(coerce_bool(other))),
    }
}

/// Truthiness coercion for boolean properties: null is false, numbers are
/// true when non-zero, any other non-null value is true.
pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                integer != 0
            } else if let Some(float) = number.as_f64() {
                float != 0.0
            } else {
                number.as_u64().map(|u| u != 0).unwrap_or(true)
            }
        }
        _ => true,
    }
}

/// Convert a property value into the column value handed to the executor.
pub fn to_column_value<V: Serialize>(
    entity: &'static str,
    property: &'static str,
    value: &V,
) -> Result<Value, EntityError> {
    serde_json::to_value(value).map_err(|error| {
        EntityError::Serialization(format!(
            "property '{property}' of {entity} did not encode: {error}"
        ))
    })
}

/// Materialize every row into an entity, preserving row order.
pub fn rows_to_entities<T: Entity>(rows: Vec<Row>) -> Result<Vec<T>, EntityError> {
    rows.iter().map(T::from_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn reads_typed_values() {
        let row = row(&[("id", json!(7)), ("name", json!("anna"))]);
        let id: i64 = column_value("User", &row, "id").unwrap();
        let name: String = column_value("User", &row, "name").unwrap();
        assert_eq!(id, 7);
        assert_eq!(name, "anna");
    }

    #[test]
    fn missing_column_is_fatal() {
        let row = row(&[("id", json!(7))]);
        let error = column_value::<i64>("User", &row, "name").unwrap_err();
        assert!(matches!(error, EntityError::MissingColumn { .. }));
    }

    #[test]
    fn type_mismatch_is_a_serialization_error() {
        let row = row(&[("id", json!("not a number"))]);
        let error = column_value::<i64>("User", &row, "id").unwrap_err();
        assert!(matches!(error, EntityError::Serialization(_)));
    }

    #[test]
    fn bool_coercion_truth_table() {
        assert!(!coerce_bool(&Value::Null));
        assert!(!coerce_bool(&json!(false)));
        assert!(coerce_bool(&json!(true)));
        assert!(!coerce_bool(&json!(0)));
        assert!(coerce_bool(&json!(1)));
        assert!(coerce_bool(&json!(-3)));
        assert!(!coerce_bool(&json!(0.0)));
        assert!(coerce_bool(&json!(0.5)));
        assert!(coerce_bool(&json!("false")));
        assert!(coerce_bool(&json!("")));
    }

    #[test]
    fn bool_column_coerces_stored_integers() {
        let row = row(&[("active", json!(1)), ("deleted", json!(0))]);
        assert!(bool_column_value("User", &row, "active").unwrap());
        assert!(!bool_column_value("User", &row, "deleted").unwrap());
    }

    #[test]
    fn nullable_bool_keeps_null_distinct() {
        let row = row(&[("verified", Value::Null), ("active", json!(2))]);
        assert_eq!(
            nullable_bool_column_value("User", &row, "verified").unwrap(),
            None
        );
        assert_eq!(
            nullable_bool_column_value("User", &row, "active").unwrap(),
            Some(true)
        );
    }

    #[test]
    fn encodes_property_values() {
        let value = to_column_value("User", "Name", &"anna").unwrap();
        assert_eq!(value, json!("anna"));
    }
}
