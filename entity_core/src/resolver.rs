//! Expression resolver
//!
//! Turns caller-supplied filter/order/join/assignment specifications into
//! column references and terms validated against a target entity's
//! descriptor.

use serde_json::Value;

use crate::descriptor::{EntityDescriptor, QualifiedColumn};
use crate::errors::EntityError;
use crate::statement::{CompareOp, FilterTerm, OrderTerm, SortOrder};

/// A filter input value: either a plain scalar (implicit equality) or one
/// of the five comparison wrappers carrying its inner value.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Plain scalar, compared with `=` (null becomes an IS NULL predicate)
    Scalar(Value),
    EqualTo(Value),
    GreaterThan(Value),
    GreaterThanOrEqualTo(Value),
    LessThan(Value),
    LessThanOrEqualTo(Value),
}

impl FilterValue {
    pub fn scalar(value: impl Into<Value>) -> Self {
        FilterValue::Scalar(value.into())
    }

    pub fn eq(value: impl Into<Value>) -> Self {
        FilterValue::EqualTo(value.into())
    }

    pub fn gt(value: impl Into<Value>) -> Self {
        FilterValue::GreaterThan(value.into())
    }

    pub fn gte(value: impl Into<Value>) -> Self {
        FilterValue::GreaterThanOrEqualTo(value.into())
    }

    pub fn lt(value: impl Into<Value>) -> Self {
        FilterValue::LessThan(value.into())
    }

    pub fn lte(value: impl Into<Value>) -> Self {
        FilterValue::LessThanOrEqualTo(value.into())
    }

    /// Split into operator and carried value. A plain scalar must really
    /// be scalar-shaped; anything else would need a comparison wrapper.
    fn into_parts(self, property: &str) -> Result<(CompareOp, Value), EntityError> {
        match self {
            FilterValue::Scalar(value) => match value {
                Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                    Ok((CompareOp::Eq, value))
                }
                other => Err(EntityError::ComparisonType {
                    property: property.to_string(),
                    reason: format!(
                        "expected a scalar or a comparison wrapper, got {}",
                        json_kind(&other)
                    ),
                }),
            },
            FilterValue::EqualTo(value) => Ok((CompareOp::Eq, value)),
            FilterValue::GreaterThan(value) => Ok((CompareOp::Gt, value)),
            FilterValue::GreaterThanOrEqualTo(value) => Ok((CompareOp::Gte, value)),
            FilterValue::LessThan(value) => Ok((CompareOp::Lt, value)),
            FilterValue::LessThanOrEqualTo(value) => Ok((CompareOp::Lte, value)),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Resolve named filter fields against `target` into conjunctive terms.
///
/// # Errors
///
/// `Mapping` for a property the target does not have, `NotAField` for a
/// property without a field marker, `ComparisonType` for a malformed value.
pub fn resolve_filter_terms(
    target: &EntityDescriptor,
    fields: Vec<(&str, FilterValue)>,
) -> Result<Vec<FilterTerm>, EntityError> {
    let mut terms = Vec::with_capacity(fields.len());
    for (property, value) in fields {
        let binding = match target.binding(property) {
            Some(binding) => binding,
            None if target.is_unmapped(property) => {
                return Err(EntityError::NotAField {
                    entity: target.entity_name,
                    property: property.to_string(),
                })
            }
            None => {
                return Err(EntityError::Mapping {
                    entity: target.entity_name,
                    property: property.to_string(),
                })
            }
        };
        let (operator, value) = value.into_parts(property)?;
        terms.push(FilterTerm {
            column: target.qualify(binding),
            operator,
            value,
        });
    }
    Ok(terms)
}

/// Resolve ordering properties against `target`, one direction per call.
///
/// Properties without a field marker contribute nothing; properties the
/// target does not have at all fail with `Mapping`.
pub fn resolve_order_terms(
    target: &EntityDescriptor,
    properties: &[&str],
    direction: SortOrder,
) -> Result<Vec<OrderTerm>, EntityError> {
    let mut terms = Vec::with_capacity(properties.len());
    for property in properties {
        match target.binding(property) {
            Some(binding) => terms.push(OrderTerm {
                column: target.qualify(binding),
                direction,
            }),
            None if target.is_unmapped(property) => continue,
            None => {
                return Err(EntityError::Mapping {
                    entity: target.entity_name,
                    property: property.to_string(),
                })
            }
        }
    }
    Ok(terms)
}

/// Resolve one side of a join condition. Joins require fielded properties
/// on both sides, so an unmapped property is as fatal as an unknown one.
pub fn resolve_join_column(
    target: &EntityDescriptor,
    property: &str,
) -> Result<QualifiedColumn, EntityError> {
    target
        .binding(property)
        .map(|binding| target.qualify(binding))
        .ok_or_else(|| EntityError::Mapping {
            entity: target.entity_name,
            property: property.to_string(),
        })
}

/// Resolve update assignments against `target` into bare-column pairs.
///
/// Unknown properties fail with `Mapping`; unmapped and auto-generated
/// properties are skipped (updates touch writable columns only).
pub fn resolve_assignments(
    target: &EntityDescriptor,
    values: Vec<(&str, Value)>,
) -> Result<Vec<(&'static str, Value)>, EntityError> {
    let mut assignments = Vec::with_capacity(values.len());
    for (property, value) in values {
        match target.binding(property) {
            Some(binding) if binding.auto_generated => continue,
            Some(binding) => assignments.push((binding.column, value)),
            None if target.is_unmapped(property) => continue,
            None => {
                return Err(EntityError::Mapping {
                    entity: target.entity_name,
                    property: property.to_string(),
                })
            }
        }
    }
    Ok(assignments)
}
