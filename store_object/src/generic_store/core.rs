use crate::converter::IdentityConverter;
use crate::filters::ID_FIELD;
use crate::scope::{ScopeBuilder, SqlQuery, UnknownParamPolicy};
use crate::traits::TableMetadata;
use crate::DbPool;
use super::transaction::OpScope;
use std::marker::PhantomData;

/// Rows per INSERT in `create_many` unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Postgres store for entity `E`, persisted as row type `D` through converter `C`.
pub struct GenericStore<E, D, C> {
    pub(crate) db_pool: DbPool,
    pub(crate) converter: C,
    pub(crate) scope_builder: ScopeBuilder<SqlQuery>,
    pub(crate) batch_size: usize,
    pub(crate) op_scope: Option<OpScope>,
    pub(crate) _phantom: PhantomData<fn() -> (E, D)>,
}

impl<E, D, C: Clone> Clone for GenericStore<E, D, C> {
    fn clone(&self) -> Self {
        Self {
            db_pool: self.db_pool.clone(),
            converter: self.converter.clone(),
            scope_builder: self.scope_builder.clone(),
            batch_size: self.batch_size,
            op_scope: self.op_scope.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<E, D: TableMetadata, C> std::fmt::Debug for GenericStore<E, D, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericStore")
            .field("table", &D::table_name())
            .field("batch_size", &self.batch_size)
            .field("scope_builder", &self.scope_builder)
            .field("op_scope", &self.op_scope)
            .finish()
    }
}

/// Scope builder that maps every field of `D` to its column, plus `"ID"` to the primary key.
pub fn default_scope_builder<D: TableMetadata>() -> ScopeBuilder<SqlQuery> {
    ScopeBuilder::new().with_field_to_col_map(
        D::field_to_column()
            .iter()
            .copied()
            .chain(std::iter::once((ID_FIELD, D::id_column()))),
    )
}

impl<E, D: TableMetadata, C> GenericStore<E, D, C> {
    pub fn new(db_pool: DbPool, converter: C) -> Self {
        Self {
            db_pool,
            converter,
            scope_builder: default_scope_builder::<D>(),
            batch_size: DEFAULT_BATCH_SIZE,
            op_scope: None,
            _phantom: PhantomData,
        }
    }

    /// Rows per INSERT in `create_many`. Zero restores the default.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = if batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            batch_size
        };
        self
    }

    /// Replace the scope builder, e.g. to add custom filters or handlers.
    pub fn with_scope_builder(mut self, scope_builder: ScopeBuilder<SqlQuery>) -> Self {
        self.scope_builder = scope_builder;
        self
    }

    pub fn with_unknown_param_policy(mut self, policy: UnknownParamPolicy) -> Self {
        self.scope_builder = self.scope_builder.with_unknown_param_policy(policy);
        self
    }

    pub fn scope_builder(&self) -> &ScopeBuilder<SqlQuery> {
        &self.scope_builder
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// A copy of this store whose operations run on the open transaction of
    /// `scope`. Between scope calls they fall back to the pool.
    pub fn in_scope(&self, scope: &OpScope) -> Self
    where
        C: Clone,
    {
        Self {
            op_scope: Some(scope.clone()),
            ..self.clone()
        }
    }

    pub fn op_scope(&self) -> Option<&OpScope> {
        self.op_scope.as_ref()
    }
}

impl<D: TableMetadata> GenericStore<D, D, IdentityConverter<D>> {
    /// Store whose entity type is its own row type.
    pub fn for_rows(db_pool: DbPool) -> Self {
        Self::new(db_pool, IdentityConverter::new())
    }
}
