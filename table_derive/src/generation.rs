//! Code generation for the `TableMetadata` implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Generics, Ident};

use crate::parsing::{FieldInfo, TableInfo};

pub fn generate_table_metadata_impl(
    name: &Ident,
    generics: &Generics,
    table_info: &TableInfo,
    field_info: &FieldInfo,
) -> TokenStream {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let table_name = &table_info.name;
    let id_column = &field_info.id_column;
    let columns = field_info.columns.iter().map(|c| &c.column_name);
    let mappings = field_info.columns.iter().map(|c| {
        let field = &c.field_name;
        let column = &c.column_name;
        quote! { (#field, #column) }
    });

    quote! {
        impl #impl_generics store_object::TableMetadata for #name #ty_generics #where_clause {
            fn table_name() -> &'static str {
                #table_name
            }

            fn id_column() -> &'static str {
                #id_column
            }

            fn columns() -> &'static [&'static str] {
                &[#(#columns),*]
            }

            fn field_to_column() -> &'static [(&'static str, &'static str)] {
                &[#(#mappings),*]
            }
        }
    }
}
