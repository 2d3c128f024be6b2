//! Store interface
//!
//! This module defines the CRUD surface every store backend offers.

use super::entity::Entity;
use crate::errors::StoreError;
use async_trait::async_trait;
use query_params::Params;
use serde_json::Value;
use std::collections::BTreeMap;

/// Conflict resolution for [`Store::upsert`].
///
/// With no action configured the conflicting insert is skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OnConflict {
    /// Conflict target columns. Defaults to the primary key column.
    pub columns: Vec<String>,
    /// Overwrite every inserted column with the incoming value.
    pub update_all: bool,
    pub do_nothing: bool,
    /// Explicit assignments, `column = value`.
    pub updates: BTreeMap<String, Value>,
    /// Columns to overwrite with the incoming value.
    pub update_columns: Vec<String>,
    /// Named constraint used as the conflict target instead of `columns`.
    pub on_constraint: String,
}

impl OnConflict {
    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn on_constraint(name: impl Into<String>) -> Self {
        Self {
            on_constraint: name.into(),
            ..Default::default()
        }
    }

    pub fn do_nothing(mut self) -> Self {
        self.do_nothing = true;
        self
    }

    pub fn update_all(mut self) -> Self {
        self.update_all = true;
        self
    }

    pub fn update_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.update_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.updates.insert(column.into(), value.into());
        self
    }
}

/// CRUD operations over one entity type, driven by query params.
#[async_trait]
pub trait Store<E: Entity>: Send + Sync {
    /// First entity matching `params`, `None` when nothing matches.
    async fn get(&self, params: &Params) -> Result<Option<E>, StoreError>;

    /// All entities matching `params`
    async fn list(&self, params: &Params) -> Result<Vec<E>, StoreError>;

    /// Number of entities matching `params`
    async fn count(&self, params: &Params) -> Result<i64, StoreError>;

    async fn exists(&self, params: &Params) -> Result<bool, StoreError>;

    /// Insert one entity and return its identifier
    async fn create(&self, entity: E) -> Result<E::Id, StoreError>;

    /// Insert one entity, resolving conflicts as configured
    async fn upsert(&self, entity: E, on_conflict: OnConflict) -> Result<E::Id, StoreError>;

    /// Insert entities in batches
    async fn create_many(&self, entities: Vec<E>) -> Result<(), StoreError>;

    /// Overwrite every column of the matching rows, nulls included.
    ///
    /// Rows are matched by the entity's id, narrowed further by `params`.
    /// An entity without an id needs at least one param.
    async fn update(&self, entity: E, params: &Params) -> Result<u64, StoreError>;

    /// Like [`Store::update`] but only writes fields that are not null.
    async fn partial_update(&self, entity: E, params: &Params) -> Result<u64, StoreError>;

    /// Delete the rows matching `params`, returning how many went away
    async fn delete(&self, params: &Params) -> Result<u64, StoreError>;
}
