//! # FlexStore
//!
//! Composable query params, lowered deterministically into Postgres queries,
//! with a generic async store on top.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flexstore::prelude::*;
//!
//! #[model]
//! #[table(name = "users")]
//! pub struct User {
//!     #[primary_key]
//!     pub id: i64,
//!     pub name: String,
//!     pub age: i32,
//! }
//!
//! impl Entity for User {
//!     type Id = i64;
//!
//!     fn id(&self) -> i64 {
//!         self.id
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::new(
//!         "localhost".to_string(), 5432, "flexstore".to_string(),
//!         "postgres".to_string(), "password".to_string(),
//!         1, 5, 30, 600, 3600,
//!     );
//!
//!     let mut flexstore = FlexStore::new(config).await?;
//!     let user_store = flexstore.row_store::<User>();
//!     flexstore.register_store("users", user_store)?;
//!     let users = flexstore.get_store::<GenericStore<User, User, IdentityConverter<User>>>("users")?;
//!
//!     let id = users.create(User { id: 0, name: "Ann".to_string(), age: 31 }).await?;
//!     let adults = users
//!         .list(&params![filter("age", 18).with_op(Operator::Gte), order_by("name", false)])
//!         .await?;
//!     println!("created {}, {} adults", id, adults.len());
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use core::FlexStore;
pub use errors::FlexStoreError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, QueryConfig, StoreConfig};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated macro code to work correctly
pub use query_params;
pub use store_object;
pub use table_derive;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
