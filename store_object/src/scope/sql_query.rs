//! Postgres query context
//!
//! [`SqlQuery`] records the mutations applied to it and renders them as SQL
//! with `$n` placeholders plus the values to bind, in placeholder order.

use super::{Bind, LockStrength, Predicate, QueryScope, ScopeFn};
use query_params::LockKind;
use serde_json::Value;

/// Connector placed before a WHERE condition.
#[derive(Debug, Clone, PartialEq)]
enum Condition {
    And(Predicate),
    Or(Predicate),
    Group(SqlQuery),
}

/// SQL query under construction for one table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqlQuery {
    table: String,
    conditions: Vec<Condition>,
    columns: Vec<String>,
    group_by: Vec<String>,
    having: Vec<Predicate>,
    order_by: Vec<(String, bool)>,
    limit: Option<i64>,
    offset: Option<i64>,
    preloads: Vec<(String, SqlQuery)>,
    lock: Option<LockStrength>,
    hints: Vec<String>,
}

/// Accumulates rendered SQL and bound values while numbering placeholders.
struct Renderer {
    values: Vec<Value>,
    next: usize,
}

impl Renderer {
    fn starting_at(next: usize) -> Self {
        Self {
            values: Vec::new(),
            next,
        }
    }

    fn placeholder(&mut self, value: Value) -> String {
        let param = format!("${}", self.next);
        self.next += 1;
        self.values.push(value);
        param
    }

    /// Replace each `?` in the template with the next bound argument.
    fn predicate(&mut self, predicate: &Predicate) -> String {
        let mut sql = String::with_capacity(predicate.template.len() + 8);
        let mut args = predicate.args.iter();

        for ch in predicate.template.chars() {
            if ch != '?' {
                sql.push(ch);
                continue;
            }

            match args.next() {
                Some(Bind::Value(value)) => {
                    let param = self.placeholder(value.clone());
                    sql.push_str(&param);
                }
                Some(Bind::List(values)) => {
                    let params: Vec<String> = values
                        .iter()
                        .map(|value| self.placeholder(value.clone()))
                        .collect();
                    sql.push_str(&params.join(", "));
                }
                // More placeholders than arguments; leave it for the database to reject
                None => sql.push('?'),
            }
        }

        sql
    }

    fn conditions(&mut self, conditions: &[Condition]) -> String {
        let mut sql = String::new();

        for (i, condition) in conditions.iter().enumerate() {
            let (connector, rendered) = match condition {
                Condition::And(predicate) => (" AND ", self.predicate(predicate)),
                Condition::Or(predicate) => (" OR ", self.predicate(predicate)),
                Condition::Group(group) => {
                    if group.conditions.is_empty() {
                        continue;
                    }
                    (" AND ", format!("({})", self.conditions(&group.conditions)))
                }
            };

            if i > 0 && !sql.is_empty() {
                sql.push_str(connector);
            }
            sql.push_str(&rendered);
        }

        sql
    }
}

impl SqlQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    pub fn limit_value(&self) -> Option<i64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<i64> {
        self.offset
    }

    pub fn lock_strength_value(&self) -> Option<LockStrength> {
        self.lock
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Relations to eager-load, each with its own query.
    pub fn preloads(&self) -> &[(String, SqlQuery)] {
        &self.preloads
    }

    pub fn preload_query(&self, relation: &str) -> Option<&SqlQuery> {
        self.preloads
            .iter()
            .find(|(name, _)| name == relation)
            .map(|(_, query)| query)
    }

    /// WHERE clause with placeholders numbered from `start`.
    ///
    /// Returns an empty string when there are no conditions.
    pub fn where_sql(&self, start: usize) -> (String, Vec<Value>) {
        let mut renderer = Renderer::starting_at(start);
        let body = renderer.conditions(&self.conditions);
        if body.is_empty() {
            (String::new(), renderer.values)
        } else {
            (format!("WHERE {}", body), renderer.values)
        }
    }

    /// Full SELECT statement.
    pub fn to_select_sql(&self) -> (String, Vec<Value>) {
        let mut renderer = Renderer::starting_at(1);
        let mut sql = self.select_head();

        self.push_filtering(&mut sql, &mut renderer);

        if !self.order_by.is_empty() {
            let items: Vec<String> = self
                .order_by
                .iter()
                .map(|(column, desc)| format!("{} {}", column, if *desc { "DESC" } else { "ASC" }))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&items.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }
        if let Some(lock) = self.lock {
            sql.push(' ');
            sql.push_str(lock.to_sql());
        }

        (sql, renderer.values)
    }

    /// `SELECT COUNT(*) AS total ...`, ignoring ordering, pagination and locks.
    ///
    /// Grouped queries are counted per group by wrapping them in a sub-select.
    pub fn to_count_sql(&self) -> (String, Vec<Value>) {
        let mut renderer = Renderer::starting_at(1);

        if self.group_by.is_empty() {
            let mut sql = format!("SELECT COUNT(*) AS total FROM {}", self.table);
            self.push_filtering(&mut sql, &mut renderer);
            (sql, renderer.values)
        } else {
            let mut inner = self.select_head();
            self.push_filtering(&mut inner, &mut renderer);
            (
                format!("SELECT COUNT(*) AS total FROM ({}) AS grouped", inner),
                renderer.values,
            )
        }
    }

    /// `SELECT EXISTS(...)` over the filtered rows.
    pub fn to_exists_sql(&self) -> (String, Vec<Value>) {
        let mut renderer = Renderer::starting_at(1);
        let mut inner = format!("SELECT 1 FROM {}", self.table);
        self.push_filtering(&mut inner, &mut renderer);
        (format!("SELECT EXISTS({}) AS found", inner), renderer.values)
    }

    /// `DELETE FROM ... WHERE ...`.
    pub fn to_delete_sql(&self) -> (String, Vec<Value>) {
        let (where_clause, values) = self.where_sql(1);
        let mut sql = format!("DELETE FROM {}", self.table);
        if !where_clause.is_empty() {
            sql.push(' ');
            sql.push_str(&where_clause);
        }
        (sql, values)
    }

    fn select_head(&self) -> String {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };

        if self.hints.is_empty() {
            format!("SELECT {} FROM {}", columns, self.table)
        } else {
            format!(
                "SELECT /*+ {} */ {} FROM {}",
                self.hints.join(" "),
                columns,
                self.table
            )
        }
    }

    /// Append WHERE, GROUP BY and HAVING.
    fn push_filtering(&self, sql: &mut String, renderer: &mut Renderer) {
        let where_body = renderer.conditions(&self.conditions);
        if !where_body.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_body);
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if !self.having.is_empty() {
            let having: Vec<String> = self
                .having
                .iter()
                .map(|predicate| renderer.predicate(predicate))
                .collect();
            sql.push_str(" HAVING ");
            sql.push_str(&having.join(" AND "));
        }
    }
}

impl QueryScope for SqlQuery {
    fn session(&self) -> Self {
        SqlQuery::new(self.table.clone())
    }

    fn and_where(&mut self, predicate: Predicate) {
        self.conditions.push(Condition::And(predicate));
    }

    fn or_where(&mut self, predicate: Predicate) {
        self.conditions.push(Condition::Or(predicate));
    }

    fn where_scope(&mut self, group: Self) {
        self.conditions.push(Condition::Group(group));
    }

    fn order(&mut self, column: &str, desc: bool) {
        self.order_by.push((column.to_string(), desc));
    }

    fn group(&mut self, clause: &str) {
        self.group_by.push(clause.to_string());
    }

    fn having(&mut self, predicate: Predicate) {
        self.having.push(predicate);
    }

    fn select(&mut self, columns: &[String]) {
        self.columns = columns.to_vec();
    }

    /// A negative offset clears it.
    fn offset(&mut self, offset: i64) {
        self.offset = (offset >= 0).then_some(offset);
    }

    /// A negative limit clears it.
    fn limit(&mut self, limit: i64) {
        self.limit = (limit >= 0).then_some(limit);
    }

    fn preload(&mut self, relation: &str, scopes: &[ScopeFn<Self>]) {
        let mut query = SqlQuery::new(relation);
        super::apply_scopes(&mut query, scopes);
        self.preloads.push((relation.to_string(), query));
    }

    fn lock(&mut self, strength: LockStrength) {
        self.lock = Some(strength);
    }

    fn hint(&mut self, hint: &str) {
        self.hints.push(hint.to_string());
    }

    fn lock_strength(kind: LockKind) -> Option<LockStrength> {
        Some(match kind {
            LockKind::ForUpdate => LockStrength::Update,
            LockKind::ForNoKeyUpdate => LockStrength::NoKeyUpdate,
            LockKind::ForShare => LockStrength::Share,
            LockKind::ForKeyShare => LockStrength::KeyShare,
        })
    }
}
