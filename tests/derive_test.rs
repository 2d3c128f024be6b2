//! TableMetadata derive and lowering through the facade prelude, no database needed

use flexstore::prelude::*;

#[model]
#[table(name = "accounts")]
pub struct AccountRow {
    #[primary_key]
    #[sqlx(rename = "account_id")]
    pub key: i64,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[column(name = "mail")]
    #[sqlx(rename = "mail")]
    pub email: String,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(skip)]
    pub score: f64,
}

#[derive(Debug, Clone, TableMetadata)]
#[table(name = "sessions")]
pub struct SessionRow {
    pub id: Uuid,
    pub account_id: i64,
}

#[test]
fn test_table_metadata_from_attributes() {
    assert_eq!(AccountRow::table_name(), "accounts");
    assert_eq!(AccountRow::id_column(), "account_id");
    assert_eq!(
        AccountRow::columns(),
        &["account_id", "display_name", "mail", "created_at"]
    );
    assert_eq!(AccountRow::column_for("displayName"), Some("display_name"));
    assert_eq!(AccountRow::column_for("score"), None);
    assert_eq!(AccountRow::id_field(), Some("key"));
}

#[test]
fn test_id_named_field_is_primary_key() {
    assert_eq!(SessionRow::table_name(), "sessions");
    assert_eq!(SessionRow::id_column(), "id");
    assert_eq!(SessionRow::columns(), &["id", "account_id"]);
}

#[test]
fn test_default_scope_builder_maps_fields() {
    let builder = store_object::generic_store::default_scope_builder::<AccountRow>();
    let scopes = builder
        .build(&params![
            filter("displayName", "ann"),
            filter("ID", serde_json::json!([1, 2])),
            order_by("mail", true),
        ])
        .unwrap();

    let mut query = SqlQuery::new(AccountRow::table_name());
    apply_scopes(&mut query, &scopes);
    let (sql, values) = query.to_select_sql();

    assert_eq!(
        sql,
        "SELECT * FROM accounts WHERE display_name = $1 AND account_id IN ($2, $3) ORDER BY mail DESC"
    );
    assert_eq!(values.len(), 3);
}

#[model]
#[table(name = "people")]
#[serde(rename_all = "camelCase")]
pub struct PersonRow {
    pub id: i64,
    pub display_name: String,
    pub home_town: Option<String>,
}

#[test]
fn test_rename_all_rows_write_their_values() {
    assert_eq!(
        PersonRow::field_to_column(),
        &[
            ("id", "id"),
            ("displayName", "display_name"),
            ("homeTown", "home_town")
        ]
    );

    let row = PersonRow {
        id: 3,
        display_name: "ann".to_string(),
        home_town: None,
    };
    let values = store_object::generic_store::statements::row_values(&row).unwrap();
    assert_eq!(
        values,
        vec![
            ("id", serde_json::json!(3)),
            ("display_name", serde_json::json!("ann")),
            ("home_town", serde_json::Value::Null),
        ]
    );
}
