//! Parsing utilities for table and column attributes
//!
//! This module handles the parsing of `#[table]`, `#[column]` and
//! `#[primary_key]` attributes and validation of table and column names.

use syn::spanned::Spanned;
use syn::{Attribute, Data, Error, Fields, LitStr, Result};

/// Validate table name and return syn::Error for better proc macro error handling
pub fn validate_table_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid table name '{}': {}", name, e)))
}

/// Validate column name and return syn::Error for better proc macro error handling
pub fn validate_column_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid column name '{}': {}", name, e)))
}

/// Names end up verbatim in generated SQL, so they must be plain identifiers.
fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    // PostgreSQL limit
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
        return Err(format!("Name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed", name));
    }

    if is_reserved_keyword(name) {
        return Err(format!("Name '{}' is a reserved SQL keyword", name));
    }

    Ok(())
}

/// Keywords Postgres refuses as bare column or table names
fn is_reserved_keyword(name: &str) -> bool {
    const RESERVED_KEYWORDS: &[&str] = &[
        "ALL",
        "ANALYSE",
        "ANALYZE",
        "AND",
        "ANY",
        "ARRAY",
        "AS",
        "ASC",
        "ASYMMETRIC",
        "BOTH",
        "CASE",
        "CAST",
        "CHECK",
        "COLLATE",
        "COLUMN",
        "CONSTRAINT",
        "CREATE",
        "CURRENT_DATE",
        "CURRENT_ROLE",
        "CURRENT_TIME",
        "CURRENT_TIMESTAMP",
        "CURRENT_USER",
        "DEFAULT",
        "DEFERRABLE",
        "DELETE",
        "DESC",
        "DISTINCT",
        "DO",
        "ELSE",
        "END",
        "EXCEPT",
        "FALSE",
        "FETCH",
        "FOR",
        "FOREIGN",
        "FROM",
        "GRANT",
        "GROUP",
        "HAVING",
        "IN",
        "INITIALLY",
        "INSERT",
        "INTERSECT",
        "INTO",
        "LATERAL",
        "LEADING",
        "LIMIT",
        "LOCALTIME",
        "LOCALTIMESTAMP",
        "NOT",
        "NULL",
        "OFFSET",
        "ON",
        "ONLY",
        "OR",
        "ORDER",
        "PLACING",
        "PRIMARY",
        "REFERENCES",
        "RETURNING",
        "SELECT",
        "SESSION_USER",
        "SOME",
        "SYMMETRIC",
        "TABLE",
        "THEN",
        "TO",
        "TRAILING",
        "TRUE",
        "UNION",
        "UNIQUE",
        "UPDATE",
        "USER",
        "USING",
        "VARIADIC",
        "WHEN",
        "WHERE",
        "WINDOW",
        "WITH",
    ];

    RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
}

#[derive(Debug)]
pub struct TableInfo {
    pub name: String,
    /// Struct-level `#[serde(rename_all = "...")]`
    pub rename_all: Option<RenameRule>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    /// Name the field serializes under
    pub field_name: String,
    pub column_name: String,
}

#[derive(Debug)]
pub struct FieldInfo {
    pub columns: Vec<ColumnInfo>,
    pub id_column: String,
}

/// Serde's `rename_all` case rules, applied to snake_case field names.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    pub fn from_serde(rule: &str) -> Option<Self> {
        Some(match rule {
            "lowercase" => RenameRule::Lower,
            "UPPERCASE" => RenameRule::Upper,
            "PascalCase" => RenameRule::Pascal,
            "camelCase" => RenameRule::Camel,
            "snake_case" => RenameRule::Snake,
            "SCREAMING_SNAKE_CASE" => RenameRule::ScreamingSnake,
            "kebab-case" => RenameRule::Kebab,
            "SCREAMING-KEBAB-CASE" => RenameRule::ScreamingKebab,
            _ => return None,
        })
    }

    pub fn apply(&self, field: &str) -> String {
        match self {
            RenameRule::Lower | RenameRule::Snake => field.to_string(),
            RenameRule::Upper | RenameRule::ScreamingSnake => field.to_ascii_uppercase(),
            RenameRule::Pascal => {
                let mut pascal = String::with_capacity(field.len());
                let mut capitalize = true;
                for ch in field.chars() {
                    if ch == '_' {
                        capitalize = true;
                    } else if capitalize {
                        pascal.push(ch.to_ascii_uppercase());
                        capitalize = false;
                    } else {
                        pascal.push(ch);
                    }
                }
                pascal
            }
            RenameRule::Camel => {
                let pascal = RenameRule::Pascal.apply(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => pascal,
                }
            }
            RenameRule::Kebab => field.replace('_', "-"),
            RenameRule::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }
}

/// Keys and values of a `name = "value", flag` attribute list.
#[derive(Debug, Default)]
struct AttrArgs {
    name: Option<String>,
    rename: Option<String>,
    rename_all: Option<LitStr>,
    skip: bool,
    skip_serializing: bool,
    /// Keys that make serialized rows disagree with the column list
    unsupported: Option<(String, proc_macro2::Span)>,
}

/// Value of `key = "x"` or, for `key(serialize = "x", deserialize = "y")`, the serialize side.
fn serialized_name(meta: &syn::meta::ParseNestedMeta<'_>) -> Result<Option<LitStr>> {
    if meta.input.peek(syn::Token![=]) {
        return Ok(Some(meta.value()?.parse::<LitStr>()?));
    }

    let mut serialize = None;
    meta.parse_nested_meta(|inner| {
        let value = inner.value()?.parse::<LitStr>()?;
        if inner.path.is_ident("serialize") {
            serialize = Some(value);
        }
        Ok(())
    })?;
    Ok(serialize)
}

fn parse_attr_args(attr: &Attribute) -> Result<AttrArgs> {
    let mut args = AttrArgs::default();
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("name") {
            args.name = Some(meta.value()?.parse::<LitStr>()?.value());
        } else if meta.path.is_ident("rename") {
            args.rename = serialized_name(&meta)?.map(|lit| lit.value());
        } else if meta.path.is_ident("rename_all") {
            args.rename_all = serialized_name(&meta)?;
        } else if meta.path.is_ident("skip") {
            args.skip = true;
        } else if meta.path.is_ident("skip_serializing") {
            args.skip_serializing = true;
        } else if meta.path.is_ident("skip_serializing_if") || meta.path.is_ident("flatten") {
            let key = meta.path.get_ident().map(|ident| ident.to_string()).unwrap_or_default();
            args.unsupported = Some((key, meta.path.span()));
            if meta.input.peek(syn::Token![=]) {
                meta.value()?.parse::<syn::Expr>()?;
            }
        } else if meta.input.peek(syn::Token![=]) {
            // keys owned by other derives
            meta.value()?.parse::<syn::Expr>()?;
        } else if meta.input.peek(syn::token::Paren) {
            let _nested;
            syn::parenthesized!(_nested in meta.input);
        }
        Ok(())
    })?;
    Ok(args)
}

pub fn parse_table_attributes(attrs: &[Attribute]) -> Result<TableInfo> {
    let mut table_name = None;
    let mut rename_all = None;

    for attr in attrs {
        if attr.path().is_ident("table") {
            table_name = parse_attr_args(attr)?.name;
        } else if attr.path().is_ident("serde") {
            if let Some(rule) = parse_attr_args(attr)?.rename_all {
                let parsed = RenameRule::from_serde(&rule.value()).ok_or_else(|| {
                    Error::new(
                        rule.span(),
                        format!("unknown serde rename_all rule `{}`", rule.value()),
                    )
                })?;
                rename_all = Some(parsed);
            }
        }
    }

    let table_name = table_name.ok_or_else(|| {
        Error::new(
            proc_macro2::Span::call_site(),
            "table attribute is required: add #[table(name = \"table_name\")] to your struct",
        )
    })?;

    validate_table_name_syn(&table_name, proc_macro2::Span::call_site())?;

    Ok(TableInfo {
        name: table_name,
        rename_all,
    })
}

pub fn parse_field_attributes(data: &Data, rename_all: Option<RenameRule>) -> Result<FieldInfo> {
    let Data::Struct(data_struct) = data else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "TableMetadata can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(fields_named) = &data_struct.fields else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "TableMetadata can only be derived for structs with named fields",
        ));
    };

    let mut columns = Vec::new();
    let mut id_column = None;
    let mut fallback_id = None;

    for field in &fields_named.named {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;
        let ident_str = ident.to_string();
        let ident_str = ident_str.strip_prefix("r#").unwrap_or(&ident_str).to_string();

        let mut field_name = match rename_all {
            Some(rule) => rule.apply(&ident_str),
            None => ident_str.clone(),
        };
        let mut column_name = ident_str.clone();
        let mut skip = false;
        let mut not_serialized = false;

        for attr in &field.attrs {
            if attr.path().is_ident("serde") {
                let args = parse_attr_args(attr)?;
                if let Some((key, span)) = args.unsupported {
                    return Err(Error::new(
                        span,
                        format!(
                            "serde `{}` is not supported on table columns: every column must always serialize",
                            key
                        ),
                    ));
                }
                if let Some(rename) = args.rename {
                    field_name = rename;
                }
                not_serialized |= args.skip || args.skip_serializing;
            } else if attr.path().is_ident("sqlx") {
                let args = parse_attr_args(attr)?;
                if let Some(rename) = args.rename {
                    column_name = rename;
                }
                skip |= args.skip;
            } else if attr.path().is_ident("column") {
                let args = parse_attr_args(attr)?;
                if let Some(name) = args.name {
                    column_name = name;
                }
                skip |= args.skip;
            }
        }

        if skip {
            continue;
        }
        if not_serialized {
            return Err(Error::new_spanned(
                ident,
                "field is skipped by serde but is still a column: add #[column(skip)] or #[sqlx(skip)]",
            ));
        }

        validate_column_name_syn(&column_name, ident.span())?;

        if has_attribute(&field.attrs, "primary_key") {
            if id_column.is_some() {
                return Err(Error::new_spanned(
                    ident,
                    "only one field can be marked #[primary_key]",
                ));
            }
            id_column = Some(column_name.clone());
        } else if ident_str == "id" {
            fallback_id = Some(column_name.clone());
        }

        columns.push(ColumnInfo {
            field_name,
            column_name,
        });
    }

    // A field named `id` is the primary key unless another field is marked
    let id_column = id_column.or(fallback_id).ok_or_else(|| {
        Error::new(
            proc_macro2::Span::call_site(),
            "no primary key: mark a field with #[primary_key] or name it `id`",
        )
    })?;

    Ok(FieldInfo { columns, id_column })
}

pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
