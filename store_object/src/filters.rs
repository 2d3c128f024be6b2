//! Common filters

use query_params::{filter, Filter, Params};
use serde_json::Value;

/// Field name stores map to the primary key column.
pub const ID_FIELD: &str = "ID";

/// Filter rows by primary key.
///
/// One id compares with `=`, several become an `IN` list.
pub fn ids<I, T>(ids: I) -> Filter
where
    I: IntoIterator<Item = T>,
    T: Into<Value>,
{
    filter(
        ID_FIELD,
        Value::Array(ids.into_iter().map(Into::into).collect()),
    )
}

/// The primary key filter in `params`, if any.
pub fn get_ids(params: &Params) -> Option<&Filter> {
    params.get_filter(ID_FIELD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use query_params::params;
    use serde_json::json;

    #[test]
    fn test_ids_filter() {
        let f = ids([1, 2, 3]);
        assert_eq!(f.field_name, "ID");
        assert_eq!(f.value, json!([1, 2, 3]));
    }

    #[test]
    fn test_get_ids() {
        let params = params![filter("name", "x"), ids(["a"])];
        assert_eq!(get_ids(&params).map(|f| f.value.clone()), Some(json!(["a"])));
        assert!(get_ids(&params![filter("name", "x")]).is_none());
    }
}
