//! Traits for store operations
//!
//! This module contains the traits that define entities, their table mapping
//! and the store interface built on top of them.

pub mod entity;
pub mod store;
pub mod table_metadata;

pub use entity::Entity;
pub use store::{OnConflict, Store};
pub use table_metadata::TableMetadata;
