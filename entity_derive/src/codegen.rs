//! Code generation for the `Entity` trait implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

use crate::parsing::EntityField;

pub fn generate_entity_impl(
    name: &Ident,
    table_name: &str,
    fields: &[EntityField],
) -> TokenStream {
    let entity_name = name.to_string();

    let bindings = fields.iter().filter_map(|field| {
        let column = field.column.as_deref()?;
        let property = field.ident.to_string();
        let auto_generated = field.auto_generated;
        Some(quote! {
            ::entity_core::descriptor::FieldBinding {
                property: #property,
                column: #column,
                auto_generated: #auto_generated,
            }
        })
    });

    let unmapped = fields.iter().filter_map(|field| {
        if field.column.is_some() {
            return None;
        }
        let property = field.ident.to_string();
        Some(quote! { #property })
    });

    let from_row_fields = fields.iter().map(|field| {
        let ident = &field.ident;
        let Some(column) = field.column.as_deref() else {
            return quote! { #ident: ::core::default::Default::default() };
        };
        // Boolean properties get tolerant coercion for backends that
        // store flags as integers; everything else decodes by type.
        match field.type_string.as_str() {
            "bool" => quote! {
                #ident: ::entity_core::materializer::bool_column_value(
                    #entity_name, row, #column,
                )?
            },
            "Option<bool>" => quote! {
                #ident: ::entity_core::materializer::nullable_bool_column_value(
                    #entity_name, row, #column,
                )?
            },
            _ => {
                let ty = &field.ty;
                quote! {
                    #ident: ::entity_core::materializer::column_value::<#ty>(
                        #entity_name, row, #column,
                    )?
                }
            }
        }
    });

    let writable_values = fields.iter().filter_map(|field| {
        let column = field.column.as_deref()?;
        if field.auto_generated {
            return None;
        }
        let ident = &field.ident;
        let property = field.ident.to_string();
        Some(quote! {
            (
                #column,
                ::entity_core::materializer::to_column_value(
                    #entity_name, #property, &self.#ident,
                )?,
            )
        })
    });

    quote! {
        impl ::entity_core::traits::Entity for #name {
            fn entity_name() -> &'static str {
                #entity_name
            }

            fn table_name() -> &'static str {
                #table_name
            }

            fn bindings() -> &'static [::entity_core::descriptor::FieldBinding] {
                &[ #( #bindings ),* ]
            }

            fn unmapped_properties() -> &'static [&'static str] {
                &[ #( #unmapped ),* ]
            }

            fn from_row(row: &::entity_core::Row) -> ::core::result::Result<Self, ::entity_core::errors::EntityError> {
                ::core::result::Result::Ok(Self {
                    #( #from_row_fields ),*
                })
            }

            fn writable_values(
                &self,
            ) -> ::core::result::Result<
                ::std::vec::Vec<(&'static str, ::entity_core::serde_json::Value)>,
                ::entity_core::errors::EntityError,
            > {
                ::core::result::Result::Ok(::std::vec![ #( #writable_values ),* ])
            }
        }
    }
}
