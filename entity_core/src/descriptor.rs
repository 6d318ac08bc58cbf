//! Entity metadata
//!
//! This module defines the immutable per-type descriptor built by the
//! metadata registry from an entity's markers.

use std::fmt;

use crate::errors::EntityError;

/// The association between one struct property and one table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBinding {
    /// Rust-side property name
    pub property: &'static str,
    /// Bare, unqualified column name
    pub column: &'static str,
    /// Backend-generated identity: excluded from writes, kept in reads
    pub auto_generated: bool,
}

/// A `table.column` reference, used once more than one table is in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifiedColumn {
    pub table: &'static str,
    pub column: &'static str,
}

impl fmt::Display for QualifiedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// Immutable metadata for one entity type: table name plus ordered field
/// bindings. Built lazily on first reference, cached for the process
/// lifetime by the registry.
#[derive(Debug, Clone, Copy)]
pub struct EntityDescriptor {
    /// Rust type name, for diagnostics
    pub entity_name: &'static str,
    pub table_name: &'static str,
    /// Bindings in declaration order
    pub fields: &'static [FieldBinding],
    /// Properties without a field marker; ignored by all operations but
    /// kept so the resolver can tell "unknown" apart from "unmapped"
    pub unmapped: &'static [&'static str],
}

impl EntityDescriptor {
    /// Look up a binding by property name (case-insensitive, as the
    /// source of truth for all filter/order/join resolution).
    pub fn binding(&self, property: &str) -> Option<&FieldBinding> {
        self.fields
            .iter()
            .find(|binding| binding.property.eq_ignore_ascii_case(property))
    }

    /// Whether the property exists on the type but carries no field marker.
    pub fn is_unmapped(&self, property: &str) -> bool {
        self.unmapped
            .iter()
            .any(|name| name.eq_ignore_ascii_case(property))
    }

    /// Qualify a binding's column with this entity's table name.
    pub fn qualify(&self, binding: &FieldBinding) -> QualifiedColumn {
        QualifiedColumn {
            table: self.table_name,
            column: binding.column,
        }
    }

    /// The full read column set, qualified.
    pub fn qualified_columns(&self) -> Vec<QualifiedColumn> {
        self.fields
            .iter()
            .map(|binding| self.qualify(binding))
            .collect()
    }

    /// Bare column names eligible for writes (auto-generated excluded),
    /// in binding order. Order matters: the executor matches insert
    /// values to columns positionally.
    pub fn writable_columns(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|binding| !binding.auto_generated)
            .map(|binding| binding.column)
            .collect()
    }

    /// The first auto-generated binding, if any (the identity column an
    /// `insert_returning_id` asks the backend for).
    pub fn identity_column(&self) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|binding| binding.auto_generated)
            .map(|binding| binding.column)
    }

    /// Validate the invariants the registry requires of every descriptor.
    pub(crate) fn validate(&self) -> Result<(), EntityError> {
        if self.table_name.is_empty() {
            return Err(EntityError::Configuration {
                entity: self.entity_name,
                reason: "missing table marker".to_string(),
            });
        }
        if self.fields.is_empty() {
            return Err(EntityError::Configuration {
                entity: self.entity_name,
                reason: "no properties carry a field marker".to_string(),
            });
        }
        for (index, binding) in self.fields.iter().enumerate() {
            if self.fields[..index]
                .iter()
                .any(|earlier| earlier.column == binding.column)
            {
                return Err(EntityError::Configuration {
                    entity: self.entity_name,
                    reason: format!("duplicate column name '{}'", binding.column),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BINDINGS: &[FieldBinding] = &[
        FieldBinding {
            property: "Id",
            column: "id",
            auto_generated: true,
        },
        FieldBinding {
            property: "Name",
            column: "user_name",
            auto_generated: false,
        },
    ];

    fn descriptor() -> EntityDescriptor {
        EntityDescriptor {
            entity_name: "User",
            table_name: "users",
            fields: BINDINGS,
            unmapped: &["Scratch"],
        }
    }

    #[test]
    fn qualified_column_display() {
        let column = QualifiedColumn {
            table: "users",
            column: "id",
        };
        assert_eq!(column.to_string(), "users.id");
    }

    #[test]
    fn binding_lookup_is_case_insensitive() {
        let descriptor = descriptor();
        assert!(descriptor.binding("name").is_some());
        assert!(descriptor.binding("NAME").is_some());
        assert!(descriptor.binding("missing").is_none());
        assert!(descriptor.is_unmapped("scratch"));
    }

    #[test]
    fn writable_columns_exclude_identities() {
        let descriptor = descriptor();
        assert_eq!(descriptor.writable_columns(), vec!["user_name"]);
        assert_eq!(descriptor.identity_column(), Some("id"));
    }

    #[test]
    fn validate_rejects_duplicate_columns() {
        const DUPLICATED: &[FieldBinding] = &[
            FieldBinding {
                property: "A",
                column: "same",
                auto_generated: false,
            },
            FieldBinding {
                property: "B",
                column: "same",
                auto_generated: false,
            },
        ];
        let descriptor = EntityDescriptor {
            entity_name: "Broken",
            table_name: "broken",
            fields: DUPLICATED,
            unmapped: &[],
        };
        assert!(matches!(
            descriptor.validate(),
            Err(EntityError::Configuration { .. })
        ));
    }
}
