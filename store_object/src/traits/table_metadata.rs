//! Table mapping of row types
//!
//! This module defines how a row struct maps onto its table.

/// Metadata about the table a row type is stored in.
///
/// This trait should be derived:
/// ```ignore
/// use table_derive::TableMetadata;
///
/// #[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow, TableMetadata)]
/// #[table(name = "articles")]
/// pub struct ArticleRow {
///     #[primary_key]
///     pub id: i64,
///     pub title: String,
///     #[column(name = "author_id")]
///     pub author: i64,
/// }
/// ```
pub trait TableMetadata {
    /// The table name in the database
    fn table_name() -> &'static str;

    /// Column holding the primary key
    fn id_column() -> &'static str;

    /// All columns, in field declaration order
    fn columns() -> &'static [&'static str];

    /// `(field name, column name)` pairs, in field declaration order.
    ///
    /// Field names are the names the row serializes its fields under.
    fn field_to_column() -> &'static [(&'static str, &'static str)];

    /// Column for a field, if the field is mapped.
    fn column_for(field_name: &str) -> Option<&'static str> {
        Self::field_to_column()
            .iter()
            .find(|(field, _)| *field == field_name)
            .map(|(_, column)| *column)
    }

    /// Field that maps to the primary key column.
    fn id_field() -> Option<&'static str> {
        Self::field_to_column()
            .iter()
            .find(|(_, column)| *column == Self::id_column())
            .map(|(field, _)| *field)
    }
}
