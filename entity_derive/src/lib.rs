//! Procedural macro for mapping entity structs to database tables
//!
//! This crate provides `#[derive(Entity)]`, which implements the
//! `entity_core::Entity` trait from three attribute markers.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod codegen;
mod parsing;

use codegen::generate_entity_impl;
use parsing::{parse_entity_fields, parse_table_attribute};

/// Derive macro for the `Entity` trait
///
/// Usage:
/// ```rust,ignore
/// use entity_derive::Entity;
///
/// #[derive(Debug, Default, Entity)]
/// #[table(name = "customers")]
/// pub struct Customer {
///     #[field(name = "id")]
///     #[auto_increment]
///     pub id: i64,
///
///     #[field(name = "first_name")]
///     pub first_name: String,
///
///     #[field]
///     pub active: bool,
///
///     // no marker: invisible to queries, filled with Default
///     pub cached_display_name: String,
/// }
/// ```
///
/// `#[field]` maps a property to the column of the same name,
/// `#[field(name = "...")]` overrides the column name, and
/// `#[auto_increment]` marks a backend-generated identity column that is
/// excluded from inserts and updates. Table and column names are
/// validated at compile time.
#[proc_macro_derive(Entity, attributes(table, field, auto_increment))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    let table_name = match parse_table_attribute(&input.attrs) {
        Ok(name) => name,
        Err(e) => return e.to_compile_error().into(),
    };

    let fields = match parse_entity_fields(&input.data) {
        Ok(fields) => fields,
        Err(e) => return e.to_compile_error().into(),
    };

    let expanded = generate_entity_impl(name, &table_name, &fields);

    TokenStream::from(expanded)
}
