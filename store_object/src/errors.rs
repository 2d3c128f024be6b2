use query_params::{LockKind, Operator};
use thiserror::Error;

/// Errors raised while lowering params into backend scopes.
///
/// Every variant points at a bug in the calling code. None of them depend on
/// database state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LowerError {
    #[error("filter on `{field}` ({operator}): value cannot be null")]
    NullValue { field: String, operator: Operator },

    #[error("filter on `{field}` ({operator}): empty collection is not a valid filter value")]
    EmptyCollection { field: String, operator: Operator },

    #[error("filter on `{field}`: {operator} is unsupported operator for IN clause")]
    UnsupportedInOperator { field: String, operator: Operator },

    #[error("lock `{kind}` is not supported by this backend")]
    UnsupportedLock { kind: LockKind },

    #[error("no handler registered for param kind `{0}`")]
    UnknownParamKind(String),

    #[error("handler for `{expected}` received a `{found}` param")]
    UnexpectedParam { expected: String, found: String },

    #[error("invalid `{kind}` param: {reason}")]
    InvalidParam { kind: String, reason: String },
}

/// Errors returned by store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error on {table} during {operation}: {source}")]
    DatabaseError {
        table: String,
        operation: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Query lowering error: {0}")]
    LoweringError(#[from] LowerError),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("id is required when no params are given")]
    MissingId,

    #[error("transaction rolled back: a nested operation failed")]
    RolledBack,

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl StoreError {
    pub fn database_operation(table: &str, operation: &str, source: sqlx::Error) -> Self {
        StoreError::DatabaseError {
            table: table.to_string(),
            operation: operation.to_string(),
            source,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::ValidationError(message.into())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::SerializationError(err.to_string())
    }
}
