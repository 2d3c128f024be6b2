//! Scope builder and lowering registry

use super::where_clause::build_where;
use super::{LockStrength, Predicate, QueryScope, ScopeFn};
use crate::errors::LowerError;
use query_params::{kind, Filter, LockKind, Param, Params};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Lowers one param into a scope mutation.
pub type ParamHandler<Q> =
    Arc<dyn Fn(&ScopeBuilder<Q>, &Param) -> Result<ScopeFn<Q>, LowerError> + Send + Sync>;

/// Replaces the default lowering of filters on one field.
pub type FilterOverride<Q> = Arc<dyn Fn(&Filter) -> Result<ScopeFn<Q>, LowerError> + Send + Sync>;

/// What `build` does with a param whose kind has no registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownParamPolicy {
    /// Drop the param and keep going.
    #[default]
    Skip,
    /// Fail the build with [`LowerError::UnknownParamKind`].
    Reject,
}

/// Wrap a closure or fn as a [`ParamHandler`].
pub fn handler<Q, F>(f: F) -> ParamHandler<Q>
where
    Q: QueryScope,
    F: Fn(&ScopeBuilder<Q>, &Param) -> Result<ScopeFn<Q>, LowerError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as a [`FilterOverride`].
pub fn filter_override<Q, F>(f: F) -> FilterOverride<Q>
where
    Q: QueryScope,
    F: Fn(&Filter) -> Result<ScopeFn<Q>, LowerError> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn scope<Q, F>(f: F) -> ScopeFn<Q>
where
    Q: QueryScope,
    F: Fn(&mut Q) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Builds backend scopes from query params.
///
/// Configure it once with the `with_*` options, then share it. `build` only
/// needs `&self`.
///
/// ```
/// use query_params::{filter, order_by, params, Operator};
/// use store_object::scope::{apply_scopes, ScopeBuilder, SqlQuery};
///
/// let builder = ScopeBuilder::<SqlQuery>::new()
///     .with_field_to_col_map([("Age", "age"), ("Name", "name")]);
///
/// let scopes = builder
///     .build(&params![filter("Age", 20).with_op(Operator::Gt), order_by("Name", false)])
///     .unwrap();
///
/// let mut query = SqlQuery::new("users");
/// apply_scopes(&mut query, &scopes);
///
/// let (sql, values) = query.to_select_sql();
/// assert_eq!(sql, "SELECT * FROM users WHERE age > $1 ORDER BY name ASC");
/// assert_eq!(values, vec![serde_json::json!(20)]);
/// ```
pub struct ScopeBuilder<Q: QueryScope> {
    field_to_col: HashMap<String, String>,
    custom_filters: HashMap<String, FilterOverride<Q>>,
    registry: HashMap<String, ParamHandler<Q>>,
    lock_strengths: HashMap<LockKind, LockStrength>,
    unknown_param_policy: UnknownParamPolicy,
}

impl<Q: QueryScope> Clone for ScopeBuilder<Q> {
    fn clone(&self) -> Self {
        Self {
            field_to_col: self.field_to_col.clone(),
            custom_filters: self.custom_filters.clone(),
            registry: self.registry.clone(),
            lock_strengths: self.lock_strengths.clone(),
            unknown_param_policy: self.unknown_param_policy,
        }
    }
}

impl<Q: QueryScope> fmt::Debug for ScopeBuilder<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&String> = self.registry.keys().collect();
        kinds.sort();
        let mut custom: Vec<&String> = self.custom_filters.keys().collect();
        custom.sort();

        f.debug_struct("ScopeBuilder")
            .field("field_to_col", &self.field_to_col)
            .field("custom_filters", &custom)
            .field("registry", &kinds)
            .field("lock_strengths", &self.lock_strengths)
            .field("unknown_param_policy", &self.unknown_param_policy)
            .finish()
    }
}

impl<Q: QueryScope> Default for ScopeBuilder<Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q: QueryScope> ScopeBuilder<Q> {
    /// Builder with handlers for every built-in param kind and no column renames.
    pub fn new() -> Self {
        let mut registry: HashMap<String, ParamHandler<Q>> = HashMap::new();
        registry.insert(kind::FILTER.to_string(), handler(Self::lower_filter));
        registry.insert(kind::OR.to_string(), handler(Self::lower_or));
        registry.insert(kind::PAGINATE.to_string(), handler(Self::lower_paginate));
        registry.insert(kind::GROUP_BY.to_string(), handler(Self::lower_group_by));
        registry.insert(kind::SELECT.to_string(), handler(Self::lower_select));
        registry.insert(kind::ORDER_BY.to_string(), handler(Self::lower_order_by));
        registry.insert(kind::PRELOAD.to_string(), handler(Self::lower_preload));
        registry.insert(kind::WITH_LOCK.to_string(), handler(Self::lower_lock));
        registry.insert(kind::WITH_HINT.to_string(), handler(Self::lower_hint));

        Self {
            field_to_col: HashMap::new(),
            custom_filters: HashMap::new(),
            registry,
            lock_strengths: HashMap::new(),
            unknown_param_policy: UnknownParamPolicy::default(),
        }
    }

    /// Map field names to column names. Unmapped fields are used as-is.
    pub fn with_field_to_col_map<I, K, V>(mut self, map: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.field_to_col = map
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Replace the default lowering of filters on the given fields.
    ///
    /// Overrides apply to top-level filters only. OR members and having
    /// filters always use the default lowering.
    pub fn with_custom_filters<I, K>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = (K, FilterOverride<Q>)>,
        K: Into<String>,
    {
        self.custom_filters = filters.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self
    }

    /// Add one filter override, keeping any already configured.
    pub fn with_custom_filter<F>(mut self, field_name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Filter) -> Result<ScopeFn<Q>, LowerError> + Send + Sync + 'static,
    {
        self.custom_filters
            .insert(field_name.into(), filter_override(f));
        self
    }

    /// Register or replace the handler for a param kind.
    pub fn with_handler<F>(mut self, kind: impl Into<String>, f: F) -> Self
    where
        F: Fn(&ScopeBuilder<Q>, &Param) -> Result<ScopeFn<Q>, LowerError> + Send + Sync + 'static,
    {
        self.registry.insert(kind.into(), handler(f));
        self
    }

    /// Unregister the handler for a param kind.
    pub fn without_handler(mut self, kind: &str) -> Self {
        self.registry.remove(kind);
        self
    }

    /// Emit `strength` for `kind`, taking precedence over the backend default.
    pub fn with_lock_strength(mut self, kind: LockKind, strength: LockStrength) -> Self {
        self.lock_strengths.insert(kind, strength);
        self
    }

    pub fn with_unknown_param_policy(mut self, policy: UnknownParamPolicy) -> Self {
        self.unknown_param_policy = policy;
        self
    }

    pub fn has_handler(&self, kind: &str) -> bool {
        self.registry.contains_key(kind)
    }

    pub fn unknown_param_policy(&self) -> UnknownParamPolicy {
        self.unknown_param_policy
    }

    /// Lower every param, in order.
    ///
    /// The first lowering error aborts the whole build; no partial list is returned.
    pub fn build(&self, params: &Params) -> Result<Vec<ScopeFn<Q>>, LowerError> {
        let mut scopes = Vec::with_capacity(params.len());

        for param in params {
            match self.registry.get(param.kind()) {
                Some(lower) => scopes.push(lower(self, param)?),
                None => match self.unknown_param_policy {
                    UnknownParamPolicy::Skip => {
                        tracing::trace!(kind = param.kind(), "no handler registered, skipping param");
                    }
                    UnknownParamPolicy::Reject => {
                        return Err(LowerError::UnknownParamKind(param.kind().to_string()));
                    }
                },
            }
        }

        tracing::trace!(params = params.len(), scopes = scopes.len(), "lowered query params");
        Ok(scopes)
    }

    /// Column name for a field.
    pub fn column<'a>(&'a self, field_name: &'a str) -> &'a str {
        self.field_to_col
            .get(field_name)
            .map(String::as_str)
            .unwrap_or(field_name)
    }

    pub fn lower_filter(&self, param: &Param) -> Result<ScopeFn<Q>, LowerError> {
        let Param::Filter(filter) = param else {
            return Err(unexpected(kind::FILTER, param));
        };

        if let Some(custom) = self.custom_filters.get(&filter.field_name) {
            return custom(filter);
        }

        let predicate = self.predicate(filter)?;
        Ok(scope(move |q: &mut Q| q.and_where(predicate.clone())))
    }

    pub fn lower_or(&self, param: &Param) -> Result<ScopeFn<Q>, LowerError> {
        let Param::Or(or) = param else {
            return Err(unexpected(kind::OR, param));
        };

        let predicates = or
            .filters
            .iter()
            .map(|f| self.predicate(f))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(scope(move |q: &mut Q| {
            if predicates.is_empty() {
                return;
            }

            let mut group = q.session();
            for (i, predicate) in predicates.iter().enumerate() {
                if i == 0 {
                    group.and_where(predicate.clone());
                } else {
                    group.or_where(predicate.clone());
                }
            }
            q.where_scope(group);
        }))
    }

    pub fn lower_paginate(&self, param: &Param) -> Result<ScopeFn<Q>, LowerError> {
        let Param::Paginate(p) = param else {
            return Err(unexpected(kind::PAGINATE, param));
        };

        let (offset, limit) = (p.offset, p.limit);
        Ok(scope(move |q: &mut Q| {
            q.offset(offset);
            q.limit(limit);
        }))
    }

    pub fn lower_group_by(&self, param: &Param) -> Result<ScopeFn<Q>, LowerError> {
        let Param::GroupBy(group) = param else {
            return Err(unexpected(kind::GROUP_BY, param));
        };

        let mut clause = group
            .field_names
            .iter()
            .map(|name| self.column(name))
            .collect::<Vec<_>>()
            .join(", ");
        if !group.option.is_empty() {
            clause.push(' ');
            clause.push_str(&group.option);
        }

        let having = group
            .having
            .iter()
            .map(|f| self.predicate(f))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(scope(move |q: &mut Q| {
            q.group(&clause);
            for predicate in &having {
                q.having(predicate.clone());
            }
        }))
    }

    pub fn lower_select(&self, param: &Param) -> Result<ScopeFn<Q>, LowerError> {
        let Param::Select(select) = param else {
            return Err(unexpected(kind::SELECT, param));
        };

        let columns: Vec<String> = select
            .field_names
            .iter()
            .map(|name| self.column(name).to_string())
            .collect();
        Ok(scope(move |q: &mut Q| q.select(&columns)))
    }

    pub fn lower_order_by(&self, param: &Param) -> Result<ScopeFn<Q>, LowerError> {
        let Param::OrderBy(order) = param else {
            return Err(unexpected(kind::ORDER_BY, param));
        };

        let column = self.column(&order.field_name).to_string();
        let desc = order.desc;
        Ok(scope(move |q: &mut Q| q.order(&column, desc)))
    }

    /// Nested params are built with this same builder and applied to the
    /// relation's own query, never to the root.
    pub fn lower_preload(&self, param: &Param) -> Result<ScopeFn<Q>, LowerError> {
        let Param::Preload(preload) = param else {
            return Err(unexpected(kind::PRELOAD, param));
        };

        let name = preload.name.clone();
        let nested = if preload.has_params() {
            self.build(&Params::new(preload.params.clone()))?
        } else {
            Vec::new()
        };

        Ok(scope(move |q: &mut Q| q.preload(&name, &nested)))
    }

    pub fn lower_lock(&self, param: &Param) -> Result<ScopeFn<Q>, LowerError> {
        let Param::WithLock(lock) = param else {
            return Err(unexpected(kind::WITH_LOCK, param));
        };

        let strength = self
            .lock_strengths
            .get(&lock.kind)
            .copied()
            .or_else(|| Q::lock_strength(lock.kind))
            .ok_or(LowerError::UnsupportedLock { kind: lock.kind })?;

        Ok(scope(move |q: &mut Q| q.lock(strength)))
    }

    pub fn lower_hint(&self, param: &Param) -> Result<ScopeFn<Q>, LowerError> {
        let Param::WithHint(hint) = param else {
            return Err(unexpected(kind::WITH_HINT, param));
        };

        let hint = hint.hint.clone();
        Ok(scope(move |q: &mut Q| q.hint(&hint)))
    }

    fn predicate(&self, filter: &Filter) -> Result<Predicate, LowerError> {
        build_where(
            self.column(&filter.field_name),
            filter.operator,
            &filter.value,
        )
    }
}

fn unexpected(expected: &str, found: &Param) -> LowerError {
    LowerError::UnexpectedParam {
        expected: expected.to_string(),
        found: found.kind().to_string(),
    }
}
