//! Error types for query parameter construction

use thiserror::Error;

/// Errors raised while assembling query params.
///
/// These signal a bug at the call site (a param that can never be valid),
/// not a problem with user input or with the database.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("OR only accepts filter params but got `{kind}`")]
    OrMember { kind: String },

    #[error("unsupported operator code: UNKNOWN({0})")]
    UnknownOperator(u8),

    #[error("unsupported lock kind code: {0}")]
    UnknownLockKind(u8),

    #[error("custom param kind `{0}` is reserved for a built-in param")]
    ReservedKind(String),
}
