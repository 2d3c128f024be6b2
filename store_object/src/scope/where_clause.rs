//! Where-clause assembly
//!
//! Turns a `(column, operator, value)` triple into a `?`-templated predicate.

use super::{Bind, Predicate};
use crate::errors::LowerError;
use query_params::Operator;
use serde_json::Value;

/// Build the predicate for one filter.
///
/// - arrays with more than one element become `col IN (?)` / `col NOT IN (?)`
///   bound to the whole list; only `Eq` and `Neq` are allowed there
/// - a one-element array is unwrapped and compared as a scalar
/// - null values and empty arrays are rejected
pub fn build_where(column: &str, operator: Operator, value: &Value) -> Result<Predicate, LowerError> {
    match value {
        Value::Null => Err(LowerError::NullValue {
            field: column.to_string(),
            operator,
        }),
        Value::Array(items) => match items.as_slice() {
            [] => Err(LowerError::EmptyCollection {
                field: column.to_string(),
                operator,
            }),
            [single] => build_where(column, operator, single),
            _ => {
                let token = in_operator_to_sql(operator).ok_or_else(|| {
                    LowerError::UnsupportedInOperator {
                        field: column.to_string(),
                        operator,
                    }
                })?;
                Ok(Predicate::new(
                    format!("{} {} (?)", column, token),
                    vec![Bind::List(items.clone())],
                ))
            }
        },
        scalar => Ok(Predicate::with_value(
            format!("{} {} ?", column, operator_to_sql(operator)),
            scalar.clone(),
        )),
    }
}

/// SQL token for a scalar comparison.
pub fn operator_to_sql(operator: Operator) -> &'static str {
    match operator {
        Operator::Eq => "=",
        Operator::Neq => "<>",
        Operator::Gt => ">",
        Operator::Gte => ">=",
        Operator::Lt => "<",
        Operator::Lte => "<=",
    }
}

/// SQL token for a collection comparison, `None` when the operator has no IN form.
pub fn in_operator_to_sql(operator: Operator) -> Option<&'static str> {
    match operator {
        Operator::Eq => Some("IN"),
        Operator::Neq => Some("NOT IN"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_operators() {
        let cases = [
            (Operator::Eq, "age = ?"),
            (Operator::Neq, "age <> ?"),
            (Operator::Gt, "age > ?"),
            (Operator::Gte, "age >= ?"),
            (Operator::Lt, "age < ?"),
            (Operator::Lte, "age <= ?"),
        ];

        for (op, expected) in cases {
            let predicate = build_where("age", op, &json!(20)).unwrap();
            assert_eq!(predicate.template, expected);
            assert_eq!(predicate.args, vec![Bind::Value(json!(20))]);
        }
    }

    #[test]
    fn test_collection_becomes_in() {
        let predicate = build_where("id", Operator::Eq, &json!([1, 2, 3])).unwrap();
        assert_eq!(predicate.template, "id IN (?)");
        assert_eq!(predicate.args, vec![Bind::List(vec![json!(1), json!(2), json!(3)])]);

        let predicate = build_where("id", Operator::Neq, &json!([1, 2])).unwrap();
        assert_eq!(predicate.template, "id NOT IN (?)");
    }

    #[test]
    fn test_single_element_collection_is_scalar() {
        let predicate = build_where("id", Operator::Eq, &json!([1])).unwrap();
        assert_eq!(predicate.template, "id = ?");
        assert_eq!(predicate.args, vec![Bind::Value(json!(1))]);

        // same as the scalar form
        assert_eq!(predicate, build_where("id", Operator::Eq, &json!(1)).unwrap());

        // ordering operators are fine once unwrapped
        let predicate = build_where("id", Operator::Gt, &json!([7])).unwrap();
        assert_eq!(predicate.template, "id > ?");
    }

    #[test]
    fn test_in_rejects_ordering_operators() {
        for op in [Operator::Gt, Operator::Gte, Operator::Lt, Operator::Lte] {
            let err = build_where("id", op, &json!([1, 2])).unwrap_err();
            assert_eq!(
                err,
                LowerError::UnsupportedInOperator {
                    field: "id".to_string(),
                    operator: op,
                }
            );
        }
    }

    #[test]
    fn test_null_value_rejected() {
        let err = build_where("name", Operator::Eq, &Value::Null).unwrap_err();
        assert!(matches!(err, LowerError::NullValue { .. }));
        assert!(err.to_string().contains("name"));

        let err = build_where("name", Operator::Eq, &json!([null])).unwrap_err();
        assert!(matches!(err, LowerError::NullValue { .. }));
    }

    #[test]
    fn test_empty_collection_rejected() {
        let err = build_where("id", Operator::Eq, &json!([])).unwrap_err();
        assert_eq!(
            err,
            LowerError::EmptyCollection {
                field: "id".to_string(),
                operator: Operator::Eq,
            }
        );
    }

    #[test]
    fn test_object_value_is_scalar() {
        let predicate = build_where("meta", Operator::Eq, &json!({"a": 1})).unwrap();
        assert_eq!(predicate.template, "meta = ?");
    }
}
