//! Write statements for GenericStore
//!
//! Reads are rendered by [`SqlQuery`](crate::scope::SqlQuery). This module
//! renders the INSERT and UPDATE pieces, numbering `$n` placeholders the same way.

use crate::errors::StoreError;
use crate::traits::{OnConflict, TableMetadata};
use serde::Serialize;
use serde_json::Value;

/// One INSERT cell: `None` renders `DEFAULT`, `Some(Null)` renders `NULL`.
pub type Cell = Option<Value>;

/// Column values of a row, in field declaration order.
///
/// Every mapped field must be present in the serialized row.
pub fn row_values<D>(dto: &D) -> Result<Vec<(&'static str, Value)>, StoreError>
where
    D: TableMetadata + Serialize,
{
    let value = serde_json::to_value(dto)?;
    let Value::Object(mut fields) = value else {
        return Err(StoreError::SerializationError(format!(
            "row for `{}` did not serialize to an object",
            D::table_name()
        )));
    };

    D::field_to_column()
        .iter()
        .map(|(field, column)| match fields.remove(*field) {
            Some(value) => Ok((*column, value)),
            None => Err(StoreError::SerializationError(format!(
                "row for `{}` has no serialized field `{}` for column `{}`",
                D::table_name(),
                field,
                column
            ))),
        })
        .collect()
}

fn push_value(sql: &mut String, values: &mut Vec<Value>, value: Value) {
    if value.is_null() {
        sql.push_str("NULL");
    } else {
        values.push(value);
        sql.push('$');
        sql.push_str(&values.len().to_string());
    }
}

/// `INSERT INTO table (cols) VALUES (...), (...)`.
///
/// Placeholders start at `$1`.
pub fn insert_sql(table: &str, columns: &[&str], rows: Vec<Vec<Cell>>) -> (String, Vec<Value>) {
    let mut values = Vec::new();
    let mut sql = format!("INSERT INTO {} ({}) VALUES ", table, columns.join(", "));

    for (i, row) in rows.into_iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push('(');
        for (j, cell) in row.into_iter().enumerate() {
            if j > 0 {
                sql.push_str(", ");
            }
            match cell {
                Some(value) => push_value(&mut sql, &mut values, value),
                None => sql.push_str("DEFAULT"),
            }
        }
        sql.push(')');
    }

    (sql, values)
}

/// `col = $n, ...` continuing after the `already_bound` values.
pub fn set_clause(assignments: Vec<(String, Value)>, already_bound: usize) -> (String, Vec<Value>) {
    let mut values = Vec::new();
    let mut sql = String::new();

    for (i, (column, value)) in assignments.into_iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&column);
        sql.push_str(" = ");
        if value.is_null() {
            sql.push_str("NULL");
        } else {
            values.push(value);
            sql.push('$');
            sql.push_str(&(already_bound + values.len()).to_string());
        }
    }

    (sql, values)
}

/// ` ON CONFLICT ...` clause for an insert that already bound `already_bound` values.
pub fn on_conflict_sql(
    on_conflict: &OnConflict,
    id_column: &str,
    insert_columns: &[&str],
    already_bound: usize,
) -> (String, Vec<Value>) {
    let (set, values) = if on_conflict.do_nothing {
        (String::new(), Vec::new())
    } else if !on_conflict.updates.is_empty() {
        set_clause(
            on_conflict
                .updates
                .iter()
                .map(|(column, value)| (column.clone(), value.clone()))
                .collect(),
            already_bound,
        )
    } else if !on_conflict.update_columns.is_empty() {
        (excluded(on_conflict.update_columns.iter().map(String::as_str)), Vec::new())
    } else if on_conflict.update_all {
        (
            excluded(
                insert_columns
                    .iter()
                    .copied()
                    .filter(|column| *column != id_column),
            ),
            Vec::new(),
        )
    } else {
        (String::new(), Vec::new())
    };

    let mut sql = String::from(" ON CONFLICT");
    if !on_conflict.on_constraint.is_empty() {
        sql.push_str(" ON CONSTRAINT ");
        sql.push_str(&on_conflict.on_constraint);
    } else if !on_conflict.columns.is_empty() {
        sql.push_str(&format!(" ({})", on_conflict.columns.join(", ")));
    } else if !set.is_empty() {
        // DO UPDATE needs a target
        sql.push_str(&format!(" ({})", id_column));
    }

    if set.is_empty() {
        sql.push_str(" DO NOTHING");
    } else {
        sql.push_str(" DO UPDATE SET ");
        sql.push_str(&set);
    }

    (sql, values)
}

fn excluded<'a>(columns: impl Iterator<Item = &'a str>) -> String {
    columns
        .map(|column| format!("{} = EXCLUDED.{}", column, column))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct UserRow {
        id: i64,
        name: String,
        email: Option<String>,
    }

    impl TableMetadata for UserRow {
        fn table_name() -> &'static str {
            "users"
        }

        fn id_column() -> &'static str {
            "id"
        }

        fn columns() -> &'static [&'static str] {
            &["id", "full_name", "email"]
        }

        fn field_to_column() -> &'static [(&'static str, &'static str)] {
            &[("id", "id"), ("name", "full_name"), ("email", "email")]
        }
    }

    #[test]
    fn test_row_values_follow_column_mapping() {
        let row = UserRow {
            id: 4,
            name: "ann".to_string(),
            email: None,
        };

        let values = row_values(&row).unwrap();
        assert_eq!(
            values,
            vec![
                ("id", json!(4)),
                ("full_name", json!("ann")),
                ("email", Value::Null),
            ]
        );
    }

    /// Serializes under camelCase keys while its mapping lists snake_case fields.
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct MismatchedRow {
        id: i64,
        display_name: String,
    }

    impl TableMetadata for MismatchedRow {
        fn table_name() -> &'static str {
            "people"
        }

        fn id_column() -> &'static str {
            "id"
        }

        fn columns() -> &'static [&'static str] {
            &["id", "display_name"]
        }

        fn field_to_column() -> &'static [(&'static str, &'static str)] {
            &[("id", "id"), ("display_name", "display_name")]
        }
    }

    #[test]
    fn test_row_values_rejects_unmapped_serialized_fields() {
        let row = MismatchedRow {
            id: 3,
            display_name: "ann".to_string(),
        };

        let err = row_values(&row).unwrap_err();
        assert!(matches!(err, StoreError::SerializationError(_)));
        assert!(err.to_string().contains("display_name"));
    }

    #[test]
    fn test_insert_renders_default_and_null() {
        let (sql, values) = insert_sql(
            "users",
            &["id", "full_name", "email"],
            vec![
                vec![None, Some(json!("ann")), Some(Value::Null)],
                vec![Some(json!(7)), Some(json!("bob")), Some(json!("b@x.io"))],
            ],
        );

        assert_eq!(
            sql,
            "INSERT INTO users (id, full_name, email) VALUES (DEFAULT, $1, NULL), ($2, $3, $4)"
        );
        assert_eq!(values, vec![json!("ann"), json!(7), json!("bob"), json!("b@x.io")]);
    }

    #[test]
    fn test_set_clause_numbering() {
        let (sql, values) = set_clause(
            vec![
                ("full_name".to_string(), json!("ann")),
                ("email".to_string(), Value::Null),
                ("age".to_string(), json!(30)),
            ],
            2,
        );
        assert_eq!(sql, "full_name = $3, email = NULL, age = $4");
        assert_eq!(values, vec![json!("ann"), json!(30)]);
    }

    #[test]
    fn test_on_conflict_defaults_to_do_nothing() {
        let (sql, values) = on_conflict_sql(&OnConflict::default(), "id", &["id", "name"], 2);
        assert_eq!(sql, " ON CONFLICT DO NOTHING");
        assert!(values.is_empty());
    }

    #[test]
    fn test_on_conflict_update_all_uses_primary_key_target() {
        let (sql, _) = on_conflict_sql(
            &OnConflict::default().update_all(),
            "id",
            &["id", "full_name", "email"],
            3,
        );
        assert_eq!(
            sql,
            " ON CONFLICT (id) DO UPDATE SET full_name = EXCLUDED.full_name, email = EXCLUDED.email"
        );
    }

    #[test]
    fn test_on_conflict_explicit_updates() {
        let on_conflict = OnConflict::columns(["email"]).set("visits", json!(1));
        let (sql, values) = on_conflict_sql(&on_conflict, "id", &["id", "email"], 2);
        assert_eq!(sql, " ON CONFLICT (email) DO UPDATE SET visits = $3");
        assert_eq!(values, vec![json!(1)]);
    }

    #[test]
    fn test_on_conflict_constraint_and_columns() {
        let on_conflict = OnConflict::on_constraint("users_email_key").update_columns(["full_name"]);
        let (sql, _) = on_conflict_sql(&on_conflict, "id", &["id", "full_name"], 2);
        assert_eq!(
            sql,
            " ON CONFLICT ON CONSTRAINT users_email_key DO UPDATE SET full_name = EXCLUDED.full_name"
        );
    }
}
