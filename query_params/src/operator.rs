//! Comparison operators used by filters

use crate::errors::QueryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator applied between a field and a filter value.
///
/// Numeric codes follow declaration order: `Eq` is 0, `Lte` is 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Operator {
    #[default]
    Eq = 0,
    Neq = 1,
    Gt = 2,
    Gte = 3,
    Lt = 4,
    Lte = 5,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Eq,
        Operator::Neq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
    ];

    /// Stable name of the operator (`"EQ"`, `"NEQ"`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "EQ",
            Operator::Neq => "NEQ",
            Operator::Gt => "GT",
            Operator::Gte => "GTE",
            Operator::Lt => "LT",
            Operator::Lte => "LTE",
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Render any numeric code, known or not.
    ///
    /// Unknown codes render as `UNKNOWN(<n>)` so the offending value shows up in logs.
    pub fn describe(code: u8) -> String {
        match Operator::try_from(code) {
            Ok(op) => op.as_str().to_string(),
            Err(_) => format!("UNKNOWN({})", code),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for Operator {
    type Error = QueryError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Operator::ALL
            .get(code as usize)
            .copied()
            .ok_or(QueryError::UnknownOperator(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_names() {
        assert_eq!(Operator::Eq.to_string(), "EQ");
        assert_eq!(Operator::Neq.to_string(), "NEQ");
        assert_eq!(Operator::Gt.to_string(), "GT");
        assert_eq!(Operator::Gte.to_string(), "GTE");
        assert_eq!(Operator::Lt.to_string(), "LT");
        assert_eq!(Operator::Lte.to_string(), "LTE");
    }

    #[test]
    fn test_operator_default_is_eq() {
        assert_eq!(Operator::default(), Operator::Eq);
    }

    #[test]
    fn test_operator_codes() {
        for (code, op) in Operator::ALL.iter().enumerate() {
            assert_eq!(op.code() as usize, code);
            assert_eq!(Operator::try_from(code as u8), Ok(*op));
        }
    }

    #[test]
    fn test_unknown_operator_code() {
        assert_eq!(Operator::describe(3), "GTE");
        assert_eq!(Operator::describe(42), "UNKNOWN(42)");

        let err = Operator::try_from(42).unwrap_err();
        assert_eq!(err, QueryError::UnknownOperator(42));
        assert_eq!(err.to_string(), "unsupported operator code: UNKNOWN(42)");
    }

    #[test]
    fn test_operator_serde_uses_names() {
        assert_eq!(serde_json::to_string(&Operator::Gte).unwrap(), "\"GTE\"");
        let op: Operator = serde_json::from_str("\"NEQ\"").unwrap();
        assert_eq!(op, Operator::Neq);
    }
}
