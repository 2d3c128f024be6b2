//! Store Object - query lowering and the Postgres store layer for FlexStore
//!
//! This crate turns backend-independent [`query_params`] into backend scopes
//! (see [`scope`]) and runs them against Postgres through a generic store.

pub mod converter;
pub mod errors;
pub mod filters;
pub mod generic_store;
pub mod prelude;
pub mod scope;
pub mod traits;

pub use converter::{to_many, Converter, IdentityConverter, ManualConverter};
pub use errors::{LowerError, StoreError};
pub use generic_store::{GenericStore, IsolationLevel, OpScope, StoreTransaction, TxOptions};
pub use scope::{QueryScope, ScopeBuilder, ScopeFn, SqlQuery, UnknownParamPolicy};
pub use traits::*;

use sqlx::PgPool;

pub type DbPool = PgPool;
