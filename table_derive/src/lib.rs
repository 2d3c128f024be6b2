//! Procedural macros for generating table metadata
//!
//! This crate provides the `#[model]` macro and `TableMetadata` derive, which
//! record at compile time how a row struct maps onto its table.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod generation;
mod model_macro;
mod parsing;

use generation::generate_table_metadata_impl;
use model_macro::model_attribute;
use parsing::{parse_field_attributes, parse_table_attributes};

/// Derive macro for the `TableMetadata` trait
///
/// Attributes:
/// - `#[table(name = "...")]` on the struct, required
/// - `#[primary_key]` on the key field; a field named `id` is used otherwise
/// - `#[column(name = "...")]` or `#[sqlx(rename = "...")]` to rename a column
/// - `#[column(skip)]` or `#[sqlx(skip)]` for fields that are not columns
///
/// `#[serde(rename = "...")]` and struct-level `#[serde(rename_all = "...")]` are
/// honored for the field side of the mapping. Columns must always serialize, so
/// `skip_serializing_if` and `flatten` are rejected, and serde-skipped fields
/// need `#[column(skip)]`.
///
/// ```ignore
/// #[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow, TableMetadata)]
/// #[table(name = "articles")]
/// pub struct ArticleRow {
///     #[primary_key]
///     pub id: i64,
///     #[column(name = "headline")]
///     #[sqlx(rename = "headline")]
///     pub title: String,
/// }
/// ```
#[proc_macro_derive(TableMetadata, attributes(table, primary_key, column))]
pub fn derive_table_metadata(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let table_info = match parse_table_attributes(&input.attrs) {
        Ok(attrs) => attrs,
        Err(e) => return e.to_compile_error().into(),
    };

    let field_info = match parse_field_attributes(&input.data, table_info.rename_all) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    #[cfg(feature = "debug-logging")]
    eprintln!(
        "[table-derive] {} -> {} ({} columns)",
        input.ident,
        table_info.name,
        field_info.columns.len()
    );

    generate_table_metadata_impl(&input.ident, &input.generics, &table_info, &field_info).into()
}

/// Convenience attribute macro that adds all necessary derives for a row type
#[proc_macro_attribute]
pub fn model(attr: TokenStream, item: TokenStream) -> TokenStream {
    model_attribute(attr, item)
}
