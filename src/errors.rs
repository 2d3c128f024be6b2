//! Error types for the FlexStore crate
//!
//! This module contains the errors returned by the `FlexStore` coordinator.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlexStoreError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] store_object::StoreError),

    #[error("Store not found: {0}")]
    StoreNotFound(String),

    #[error("Store already registered: {0}")]
    StoreAlreadyRegistered(String),
}
