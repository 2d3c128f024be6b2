//! Lowering of query params into backend scopes
//!
//! A [`ScopeBuilder`] turns an ordered [`Params`](query_params::Params) list
//! into an ordered list of [`ScopeFn`] mutations. Each mutation is applied to a
//! backend query context implementing [`QueryScope`], left to right.

pub mod builder;
pub mod sql_query;
pub mod where_clause;


use query_params::LockKind;
use serde_json::Value;
use std::sync::Arc;

pub use builder::{FilterOverride, ParamHandler, ScopeBuilder, UnknownParamPolicy};
pub use sql_query::SqlQuery;
pub use where_clause::build_where;

/// A mutation produced by lowering one param.
pub type ScopeFn<Q> = Arc<dyn Fn(&mut Q) + Send + Sync>;

/// Value bound to one `?` placeholder of a [`Predicate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Value(Value),
    /// Whole collection bound to an `IN (?)` placeholder.
    List(Vec<Value>),
}

/// Parameterized condition such as `age > ?` together with its bound values.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub template: String,
    pub args: Vec<Bind>,
}

impl Predicate {
    pub fn new(template: impl Into<String>, args: Vec<Bind>) -> Self {
        Self {
            template: template.into(),
            args,
        }
    }

    /// Predicate with a single scalar argument.
    pub fn with_value(template: impl Into<String>, value: Value) -> Self {
        Self::new(template, vec![Bind::Value(value)])
    }
}

/// Row lock strength a backend knows how to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockStrength {
    Update,
    NoKeyUpdate,
    Share,
    KeyShare,
}

impl LockStrength {
    pub fn to_sql(&self) -> &'static str {
        match self {
            LockStrength::Update => "FOR UPDATE",
            LockStrength::NoKeyUpdate => "FOR NO KEY UPDATE",
            LockStrength::Share => "FOR SHARE",
            LockStrength::KeyShare => "FOR KEY SHARE",
        }
    }
}

/// Capabilities a backend query context must offer so params can be lowered onto it.
pub trait QueryScope: Sized + Send + 'static {
    /// A fresh context with no conditions, used to assemble OR groups.
    fn session(&self) -> Self;

    /// AND a predicate into the WHERE clause.
    fn and_where(&mut self, predicate: Predicate);

    /// OR a predicate into the WHERE clause.
    fn or_where(&mut self, predicate: Predicate);

    /// AND a whole sub-scope as one parenthesized term.
    fn where_scope(&mut self, group: Self);

    fn order(&mut self, column: &str, desc: bool);

    fn group(&mut self, clause: &str);

    fn having(&mut self, predicate: Predicate);

    fn select(&mut self, columns: &[String]);

    /// Negative offsets and limits remove any previously set value.
    fn offset(&mut self, offset: i64);

    fn limit(&mut self, limit: i64);

    /// Eager-load `relation`, applying `scopes` to the relation's own query.
    fn preload(&mut self, relation: &str, scopes: &[ScopeFn<Self>]);

    fn lock(&mut self, strength: LockStrength);

    fn hint(&mut self, hint: &str);

    /// Lock strength this backend emits for `kind`, if it supports it at all.
    ///
    /// Only `FOR UPDATE` is assumed to be universally available.
    fn lock_strength(kind: LockKind) -> Option<LockStrength> {
        match kind {
            LockKind::ForUpdate => Some(LockStrength::Update),
            _ => None,
        }
    }
}

/// Apply scopes to a query context in order.
pub fn apply_scopes<Q: QueryScope>(query: &mut Q, scopes: &[ScopeFn<Q>]) {
    for scope in scopes {
        scope(query);
    }
}
