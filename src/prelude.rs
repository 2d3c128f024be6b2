//! Convenience re-exports for common FlexStore usage
//!
//! # Example
//!
//! ```rust
//! use flexstore::prelude::*;
//!
//! let params = params![filter("age", 18).with_op(Operator::Gte), order_by("name", false)];
//! assert_eq!(params.len(), 2);
//! ```

// Core FlexStore components
pub use crate::core::FlexStore;
pub use crate::errors::FlexStoreError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, QueryConfig, StoreConfig};

// Store layer, lowering and query params
pub use store_object::prelude::*;

// Re-export store_object module for macro-generated code
pub use store_object;

// Re-export table derive for row definitions
pub use table_derive::{model, TableMetadata};

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use sqlx;
pub use tokio;

// Commonly used sqlx and value types
pub use chrono::{DateTime, Utc};
pub use sqlx::{Postgres, Transaction};
pub use uuid::Uuid;
