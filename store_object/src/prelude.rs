//! Convenience re-exports for common store-object usage

// Core traits
pub use crate::traits::{Entity, OnConflict, Store, TableMetadata};

// Conversion
pub use crate::converter::{to_many, Converter, IdentityConverter, ManualConverter};

// Error types
pub use crate::errors::{LowerError, StoreError};

// Core store functionality
pub use crate::generic_store::{GenericStore, OpScope, TxOptions};

// Query lowering
pub use crate::scope::{
    apply_scopes, LockStrength, Predicate, QueryScope, ScopeBuilder, ScopeFn, SqlQuery,
    UnknownParamPolicy,
};

// Common filters
pub use crate::filters::{get_ids, ids};

// Query params
pub use query_params::prelude::*;

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use sqlx::{FromRow, PgPool, Row};
