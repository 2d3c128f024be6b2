//! Filter and OR params
//!
//! A filter narrows the rows returned from a store to those where a field
//! compares to a value. OR groups several filters into one disjunction.

use crate::errors::QueryError;
use crate::operator::Operator;
use crate::param::Param;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single `field <op> value` condition.
///
/// The value may be a scalar or an array. Arrays with more than one element
/// lower to `IN` / `NOT IN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field_name: String,
    #[serde(default)]
    pub operator: Operator,
    pub value: Value,
}

impl Filter {
    /// Return a copy of this filter with a different operator.
    ///
    /// Field name and value are kept as they are.
    pub fn with_op(self, operator: Operator) -> Self {
        Self { operator, ..self }
    }
}

/// Create a filter on `field_name` with the default `Eq` operator.
///
/// ```
/// use query_params::{filter, Operator};
///
/// let by_id = filter("id", 1);
/// let older = filter("age", 20).with_op(Operator::Gt);
/// let any_of = filter("id", vec![1, 2, 3]);
/// # let _ = (by_id, older, any_of);
/// ```
pub fn filter(field_name: impl Into<String>, value: impl Into<Value>) -> Filter {
    Filter {
        field_name: field_name.into(),
        operator: Operator::Eq,
        value: value.into(),
    }
}

/// Disjunction over filters. Lowered as one parenthesized AND-term.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Or {
    pub filters: Vec<Filter>,
}

impl Or {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self { filters }
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Combine params into an OR group.
///
/// Every member must be a filter. Anything else is rejected with
/// [`QueryError::OrMember`] naming the kind that was passed.
pub fn or<I, P>(params: I) -> Result<Or, QueryError>
where
    I: IntoIterator<Item = P>,
    P: Into<Param>,
{
    let filters = params
        .into_iter()
        .map(|param| match param.into() {
            Param::Filter(f) => Ok(f),
            other => Err(QueryError::OrMember {
                kind: other.kind().to_string(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Or { filters })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_by;
    use serde_json::json;

    #[test]
    fn test_filter_defaults_to_eq() {
        let f = filter("name", "john");
        assert_eq!(f.field_name, "name");
        assert_eq!(f.operator, Operator::Eq);
        assert_eq!(f.value, json!("john"));
    }

    #[test]
    fn test_with_op_keeps_field_and_value() {
        let f = filter("age", 20).with_op(Operator::Gt);
        assert_eq!(f.field_name, "age");
        assert_eq!(f.operator, Operator::Gt);
        assert_eq!(f.value, json!(20));
    }

    #[test]
    fn test_with_op_last_call_wins() {
        let f = filter("age", 20)
            .with_op(Operator::Gt)
            .with_op(Operator::Lte);
        assert_eq!(f.operator, Operator::Lte);
        assert_eq!(f.value, json!(20));
    }

    #[test]
    fn test_filter_with_collection() {
        let f = filter("id", vec![1, 2, 3]);
        assert_eq!(f.value, json!([1, 2, 3]));
    }

    #[test]
    fn test_or_accepts_filters() {
        let group = or([filter("id", 1), filter("id", 2)]).unwrap();
        assert_eq!(group.filters.len(), 2);
        assert_eq!(group.filters[0].value, json!(1));
        assert_eq!(group.filters[1].value, json!(2));
    }

    #[test]
    fn test_or_empty() {
        let group = or(Vec::<Filter>::new()).unwrap();
        assert!(group.is_empty());
    }

    #[test]
    fn test_or_rejects_non_filter() {
        let result = or([
            Param::from(filter("id", 1)),
            Param::from(group_by(["id"])),
        ]);

        let err = result.unwrap_err();
        assert_eq!(
            err,
            QueryError::OrMember {
                kind: "groupby".to_string()
            }
        );
        assert!(err.to_string().contains("groupby"));
    }
}
