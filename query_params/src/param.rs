//! The `Param` sum type
//!
//! Every fragment of query intent is one variant of [`Param`]. The kind string
//! of each variant is stable and is what lowering registries key on.

use crate::errors::QueryError;
use crate::filter::{Filter, Or};
use crate::grouping::GroupBy;
use crate::locking::{WithHint, WithLock};
use crate::ordering::OrderBy;
use crate::pagination::Paginate;
use crate::preload::Preload;
use crate::select::Select;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable kind identifiers for the built-in params.
pub mod kind {
    pub const FILTER: &str = "filter";
    pub const OR: &str = "or";
    pub const ORDER_BY: &str = "orderby";
    pub const GROUP_BY: &str = "groupby";
    pub const SELECT: &str = "select";
    pub const PAGINATE: &str = "paginate";
    pub const PRELOAD: &str = "preload";
    pub const WITH_LOCK: &str = "withlock";
    pub const WITH_HINT: &str = "withhint";

    pub const BUILT_IN: [&str; 9] = [
        FILTER, OR, ORDER_BY, GROUP_BY, SELECT, PAGINATE, PRELOAD, WITH_LOCK, WITH_HINT,
    ];
}

/// A param whose kind is defined by the caller.
///
/// Lowered only when a handler is registered for `kind`. The kind never
/// names a built-in param.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCustomParam")]
pub struct CustomParam {
    pub kind: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Deserialize)]
struct RawCustomParam {
    kind: String,
    #[serde(default)]
    args: Value,
}

impl TryFrom<RawCustomParam> for CustomParam {
    type Error = QueryError;

    fn try_from(raw: RawCustomParam) -> Result<Self, Self::Error> {
        custom(raw.kind, raw.args)
    }
}

/// Create a caller-defined param.
///
/// Fails with [`QueryError::ReservedKind`] when `kind` is a built-in kind.
pub fn custom(kind: impl Into<String>, args: impl Into<Value>) -> Result<CustomParam, QueryError> {
    let kind = kind.into();
    if self::kind::BUILT_IN.contains(&kind.as_str()) {
        return Err(QueryError::ReservedKind(kind));
    }

    Ok(CustomParam {
        kind,
        args: args.into(),
    })
}

/// One fragment of query intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Param {
    #[serde(rename = "filter")]
    Filter(Filter),
    #[serde(rename = "or")]
    Or(Or),
    #[serde(rename = "orderby")]
    OrderBy(OrderBy),
    #[serde(rename = "groupby")]
    GroupBy(GroupBy),
    #[serde(rename = "select")]
    Select(Select),
    #[serde(rename = "paginate")]
    Paginate(Paginate),
    #[serde(rename = "preload")]
    Preload(Preload),
    #[serde(rename = "withlock")]
    WithLock(WithLock),
    #[serde(rename = "withhint")]
    WithHint(WithHint),
    #[serde(rename = "custom")]
    Custom(CustomParam),
}

impl Param {
    /// Kind identifier used to pick a lowering handler.
    pub fn kind(&self) -> &str {
        match self {
            Param::Filter(_) => kind::FILTER,
            Param::Or(_) => kind::OR,
            Param::OrderBy(_) => kind::ORDER_BY,
            Param::GroupBy(_) => kind::GROUP_BY,
            Param::Select(_) => kind::SELECT,
            Param::Paginate(_) => kind::PAGINATE,
            Param::Preload(_) => kind::PRELOAD,
            Param::WithLock(_) => kind::WITH_LOCK,
            Param::WithHint(_) => kind::WITH_HINT,
            Param::Custom(c) => &c.kind,
        }
    }

    pub fn as_filter(&self) -> Option<&Filter> {
        match self {
            Param::Filter(f) => Some(f),
            _ => None,
        }
    }
}

macro_rules! impl_from_param {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Param {
                fn from(value: $ty) -> Self {
                    Param::$variant(value)
                }
            }
        )*
    };
}

impl_from_param! {
    Filter => Filter,
    Or => Or,
    OrderBy => OrderBy,
    GroupBy => GroupBy,
    Select => Select,
    Paginate => Paginate,
    Preload => Preload,
    WithLock => WithLock,
    WithHint => WithHint,
    Custom => CustomParam,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{filter, or};
    use crate::grouping::group_by;
    use crate::locking::{lock_for_update, with_hint};
    use crate::ordering::order_by;
    use crate::pagination::paginate;
    use crate::preload::preload;
    use crate::select::select;
    use serde_json::json;

    #[test]
    fn test_param_kinds() {
        let params: Vec<Param> = vec![
            filter("id", 1).into(),
            or([filter("id", 1)]).unwrap().into(),
            order_by("id", true).into(),
            group_by(["id"]).into(),
            select(["id"]).into(),
            paginate(0, 10).into(),
            preload("Author", Vec::<Param>::new()).into(),
            lock_for_update().into(),
            with_hint("hint").into(),
        ];

        let kinds: Vec<&str> = params.iter().map(Param::kind).collect();
        assert_eq!(kinds, kind::BUILT_IN.to_vec());
    }

    #[test]
    fn test_custom_param_kind() {
        let p = Param::from(custom("fulltext", json!({"q": "rust"})).unwrap());
        assert_eq!(p.kind(), "fulltext");
    }

    #[test]
    fn test_custom_param_rejects_builtin_kinds() {
        for builtin in kind::BUILT_IN {
            assert_eq!(
                custom(builtin, json!(null)),
                Err(QueryError::ReservedKind(builtin.to_string()))
            );
        }

        let err = serde_json::from_value::<Param>(json!({
            "type": "custom",
            "kind": "filter",
            "args": {"field_name": "id"}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("reserved"));

        let decoded: Param =
            serde_json::from_value(json!({"type": "custom", "kind": "fulltext"})).unwrap();
        assert_eq!(decoded, Param::from(custom("fulltext", json!(null)).unwrap()));
    }

    #[test]
    fn test_as_filter() {
        let p = Param::from(filter("id", 1));
        assert_eq!(p.as_filter().map(|f| f.field_name.as_str()), Some("id"));

        let p = Param::from(order_by("id", false));
        assert!(p.as_filter().is_none());
    }

    #[test]
    fn test_param_serde_tagging() {
        let p = Param::from(filter("age", 20));
        let encoded = serde_json::to_value(&p).unwrap();
        assert_eq!(
            encoded,
            json!({"type": "filter", "field_name": "age", "operator": "EQ", "value": 20})
        );

        let decoded: Param = serde_json::from_value(json!({
            "type": "orderby",
            "field_name": "name",
            "desc": true
        }))
        .unwrap();
        assert_eq!(decoded, Param::from(order_by("name", true)));
    }

    #[test]
    fn test_nested_preload_deserializes() {
        let decoded: Param = serde_json::from_value(json!({
            "type": "preload",
            "name": "Author",
            "params": [{"type": "filter", "field_name": "active", "value": true}]
        }))
        .unwrap();

        assert_eq!(
            decoded,
            Param::from(preload("Author", [filter("active", true)]))
        );
    }
}
