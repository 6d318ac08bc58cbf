//! Parsing of `#[table]`, `#[field]` and `#[auto_increment]` attributes
//! and compile-time validation of table and column names.

use std::collections::HashSet;

use quote::quote;
use syn::{Attribute, Data, Error, Fields, Ident, Meta, Result, Type};

/// One struct field and how (or whether) it maps to a column.
pub struct EntityField {
    pub ident: Ident,
    pub ty: Type,
    /// Normalized type string, whitespace removed, for type dispatch
    pub type_string: String,
    /// `None` means the field carries no `#[field]` marker
    pub column: Option<String>,
    pub auto_generated: bool,
}

pub fn parse_table_attribute(attrs: &[Attribute]) -> Result<String> {
    let mut table_name = None;

    for attr in attrs {
        if attr.path().is_ident("table") {
            if let Meta::List(meta_list) = &attr.meta {
                table_name = parse_name_value(&meta_list.tokens);
            }
        }
    }

    let table_name = table_name.ok_or_else(|| {
        Error::new(
            proc_macro2::Span::call_site(),
            "table attribute is required: add #[table(name = \"table_name\")] to your struct",
        )
    })?;

    validate_identifier(&table_name).map_err(|e| {
        Error::new(
            proc_macro2::Span::call_site(),
            format!("Invalid table name '{}': {}", table_name, e),
        )
    })?;

    Ok(table_name)
}

pub fn parse_entity_fields(data: &Data) -> Result<Vec<EntityField>> {
    let Data::Struct(data_struct) = data else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "Entity can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(fields_named) = &data_struct.fields else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "Entity can only be derived for structs with named fields",
        ));
    };

    let mut fields = Vec::new();
    let mut seen_columns = HashSet::new();

    for field in &fields_named.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;

        let column = parse_field_column(&field.attrs, &ident)?;
        let auto_generated = has_attribute(&field.attrs, "auto_increment");

        if auto_generated && column.is_none() {
            return Err(Error::new(
                ident.span(),
                format!(
                    "auto_increment on '{}' requires a #[field] marker",
                    ident
                ),
            ));
        }

        if let Some(column) = &column {
            validate_identifier(column).map_err(|e| {
                Error::new(
                    ident.span(),
                    format!("Invalid column name '{}': {}", column, e),
                )
            })?;
            if !seen_columns.insert(column.clone()) {
                return Err(Error::new(
                    ident.span(),
                    format!("Duplicate column name '{}'", column),
                ));
            }
        }

        let ty = field.ty.clone();
        let type_string = quote!(#ty).to_string().replace(' ', "");

        fields.push(EntityField {
            ident,
            ty,
            type_string,
            column,
            auto_generated,
        });
    }

    if !fields.iter().any(|field| field.column.is_some()) {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "Entity requires at least one #[field] marker",
        ));
    }

    Ok(fields)
}

/// Returns the mapped column name, or `None` when the field carries no
/// `#[field]` marker. A bare `#[field]` maps to the field's own name.
fn parse_field_column(attrs: &[Attribute], ident: &Ident) -> Result<Option<String>> {
    for attr in attrs {
        if attr.path().is_ident("field") {
            return match &attr.meta {
                Meta::Path(_) => Ok(Some(ident.to_string())),
                Meta::List(meta_list) => {
                    let name = parse_name_value(&meta_list.tokens).ok_or_else(|| {
                        Error::new(
                            ident.span(),
                            "field attribute takes #[field] or #[field(name = \"column\")]",
                        )
                    })?;
                    Ok(Some(name))
                }
                Meta::NameValue(_) => Err(Error::new(
                    ident.span(),
                    "field attribute takes #[field] or #[field(name = \"column\")]",
                )),
            };
        }
    }
    Ok(None)
}

/// Walk `name = "value"` tokens inside an attribute list.
fn parse_name_value(tokens: &proc_macro2::TokenStream) -> Option<String> {
    let mut iter = tokens.clone().into_iter().peekable();

    while let Some(token) = iter.next() {
        if let proc_macro2::TokenTree::Ident(key) = token {
            if key != "name" {
                continue;
            }
            if let Some(proc_macro2::TokenTree::Punct(punct)) = iter.peek() {
                if punct.as_char() == '=' {
                    iter.next();
                    if let Some(proc_macro2::TokenTree::Literal(lit)) = iter.next() {
                        return Some(lit.to_string().trim_matches('"').to_string());
                    }
                }
            }
        }
    }

    None
}

fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    // PostgreSQL identifier limit
    if name.len() > 63 {
        return Err(format!(
            "Name '{}' is too long: {} characters (max 63)",
            name,
            name.len()
        ));
    }

    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name cannot be empty".to_string())?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "Name '{}' must start with a letter or underscore",
            name
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!(
            "Name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed",
            name
        ));
    }

    if is_reserved_keyword(name) {
        return Err(format!("Name '{}' is a reserved SQL keyword", name));
    }

    Ok(())
}

fn is_reserved_keyword(name: &str) -> bool {
    const RESERVED_KEYWORDS: &[&str] = &[
        "SELECT", "INSERT", "UPDATE", "DELETE", "FROM", "WHERE", "JOIN", "INNER", "LEFT", "RIGHT",
        "FULL", "OUTER", "ON", "AS", "AND", "OR", "NOT", "NULL", "TRUE", "FALSE", "CASE", "WHEN",
        "THEN", "ELSE", "END", "IF", "EXISTS", "IN", "LIKE", "BETWEEN", "ORDER", "BY", "GROUP",
        "HAVING", "LIMIT", "OFFSET", "UNION", "ALL", "DISTINCT", "COUNT", "SUM", "AVG", "MIN",
        "MAX", "CREATE", "DROP", "ALTER", "TABLE", "INDEX", "VIEW", "DATABASE", "SCHEMA",
        "PRIMARY", "KEY", "FOREIGN", "REFERENCES", "UNIQUE", "CHECK", "DEFAULT", "CONSTRAINT",
        "COLUMN", "ADD", "MODIFY", "RENAME", "TO", "SERIAL", "BIGSERIAL", "SMALLSERIAL", "TEXT",
        "VARCHAR", "CHAR", "INTEGER", "BIGINT", "SMALLINT", "DECIMAL", "NUMERIC", "REAL",
        "DOUBLE", "PRECISION", "BOOLEAN", "DATE", "TIME", "TIMESTAMP", "TIMESTAMPTZ", "INTERVAL",
        "UUID", "JSON", "JSONB", "ARRAY", "RETURNING", "CONFLICT", "NOTHING", "EXCLUDED",
        "GENERATED", "ALWAYS", "STORED", "IDENTITY", "SEQUENCE", "TRIGGER", "FUNCTION",
        "PROCEDURE", "BEGIN", "DECLARE", "EXCEPTION",
    ];

    RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn accepts_ordinary_identifiers() {
        assert!(validate_identifier("users").is_ok());
        assert!(validate_identifier("user_profiles").is_ok());
        assert!(validate_identifier("_private").is_ok());
        assert!(validate_identifier("table123").is_ok());
        assert!(validate_identifier("a").is_ok());
    }

    #[test]
    fn rejects_reserved_keywords() {
        assert!(validate_identifier("SELECT").is_err());
        assert!(validate_identifier("returning").is_err());
    }

    #[test]
    fn rejects_malformed_identifiers() {
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("123table").is_err());
        assert!(validate_identifier("user-table").is_err());
        assert!(validate_identifier(&"x".repeat(64)).is_err());
    }

    #[test]
    fn rejects_injection_attempts() {
        let malicious_names = [
            "users; DROP TABLE users; --",
            "users' OR '1'='1",
            "users/**/UNION/**/SELECT",
        ];
        for name in malicious_names {
            assert!(validate_identifier(name).is_err(), "accepted: {name}");
        }
    }
}
