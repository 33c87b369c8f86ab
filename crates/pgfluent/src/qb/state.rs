//! Query construction state and rendering.

use crate::error::{DbError, DbResult};
use crate::qb::join::{Join, JoinKind};
use crate::qb::order::{Direction, OrderSpec};
use crate::qb::predicate::{Connective, Predicate, write_where};
use crate::qb::statement::{SqlWriter, Statement};
use crate::value::Value;

/// Accumulated query fragments.
///
/// A plain value: every method consumes and returns the state, and every
/// `render_*` method is pure. Clone it to keep a configured query around.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    table: Option<String>,
    fields: String,
    joins: Vec<Join>,
    predicates: Vec<Predicate>,
    order: Option<OrderSpec>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            table: None,
            fields: "*".to_string(),
            joins: Vec::new(),
            predicates: Vec::new(),
            order: None,
            limit: None,
            offset: None,
        }
    }
}

impl QueryState {
    /// Fresh state targeting `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            ..Self::default()
        }
    }

    // ==================== Accessors ====================

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn fields(&self) -> &str {
        &self.fields
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn order(&self) -> Option<&OrderSpec> {
        self.order.as_ref()
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    // ==================== Fragments ====================

    /// Set the field list (default `*`).
    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = fields.into();
        self
    }

    /// Append a predicate with the given connective.
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn and_where(self, column: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.with_predicate(Predicate::new(Connective::And, column, operator, value))
    }

    pub fn or_where(self, column: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.with_predicate(Predicate::new(Connective::Or, column, operator, value))
    }

    pub fn not_where(self, column: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.with_predicate(Predicate::new(Connective::Not, column, operator, value))
    }

    /// Append a join of a known kind.
    pub fn with_join(mut self, kind: JoinKind, table: &str, on: &str) -> Self {
        self.joins.push(Join::new(kind, table, on));
        self
    }

    /// Append a join from its SQL keyword. Unknown kinds return
    /// `DbError::InvalidJoinKind`.
    pub fn try_join(self, kind: &str, table: &str, on: &str) -> DbResult<Self> {
        let kind: JoinKind = kind.parse()?;
        Ok(self.with_join(kind, table, on))
    }

    /// Replace the ORDER BY.
    pub fn with_order(mut self, columns: impl Into<String>, direction: Direction) -> Self {
        self.order = Some(OrderSpec {
            columns: columns.into(),
            direction,
        });
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set OFFSET. Only rendered when a LIMIT is also set.
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    // ==================== Rendering ====================

    fn require_table(&self) -> DbResult<&str> {
        self.table
            .as_deref()
            .ok_or_else(|| DbError::validation("no table selected: call table() first"))
    }

    fn write_from_joins_where(&self, w: &mut SqlWriter, table: &str) {
        w.push(" FROM ").push(table);
        for join in &self.joins {
            w.push(" ").push(&join.render());
        }
        write_where(w, &self.predicates);
    }

    fn write_order_limit(&self, w: &mut SqlWriter, limit: Option<u64>) {
        if let Some(order) = &self.order {
            w.push(" ").push(&order.render());
        }
        if let Some(limit) = limit {
            w.push(&format!(" LIMIT {}", limit));
            if let Some(offset) = self.offset {
                w.push(&format!(" OFFSET {}", offset));
            }
        }
    }

    fn render_select_with_limit(&self, limit: Option<u64>) -> DbResult<Statement> {
        let table = self.require_table()?;
        let mut w = SqlWriter::new("SELECT ");
        w.push(&self.fields);
        self.write_from_joins_where(&mut w, table);
        self.write_order_limit(&mut w, limit);
        Ok(w.finish())
    }

    /// `SELECT fields FROM table [JOIN..] [WHERE..] [ORDER BY..] [LIMIT n [OFFSET m]]`
    pub fn render_select(&self) -> DbResult<Statement> {
        self.render_select_with_limit(self.limit)
    }

    /// The SELECT with `LIMIT 1`, regardless of the stored limit.
    pub fn render_first(&self) -> DbResult<Statement> {
        self.render_select_with_limit(Some(1))
    }

    /// `SELECT COUNT(*) FROM table [JOIN..] [WHERE..]`
    pub fn render_count(&self) -> DbResult<Statement> {
        let table = self.require_table()?;
        let mut w = SqlWriter::new("SELECT COUNT(*)");
        self.write_from_joins_where(&mut w, table);
        Ok(w.finish())
    }

    /// `INSERT INTO table (columns) VALUES (?,?,...)`
    ///
    /// `columns` is a literal comma-joined list; its length must equal the
    /// number of values.
    pub fn render_insert(&self, columns: &str, values: Vec<Value>) -> DbResult<Statement> {
        let table = self.require_table()?;
        if values.is_empty() {
            return Err(DbError::validation("insert requires at least one value"));
        }
        let expected = columns
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .count();
        if expected == 0 {
            return Err(DbError::validation("insert requires a column list"));
        }
        if expected != values.len() {
            return Err(DbError::ParamCount {
                expected,
                got: values.len(),
            });
        }

        let mut w = SqlWriter::new("INSERT INTO ");
        w.push(table)
            .push(" (")
            .push(columns)
            .push(") VALUES (")
            .push_bind_list(values)
            .push(")");
        Ok(w.finish())
    }

    /// `UPDATE table SET a = ?, b = ? [WHERE..]`; set values bind before predicate values.
    pub fn render_update(&self, assignments: Vec<(String, Value)>) -> DbResult<Statement> {
        let table = self.require_table()?;
        if assignments.is_empty() {
            return Err(DbError::validation("update requires at least one assignment"));
        }

        let mut w = SqlWriter::new("UPDATE ");
        w.push(table).push(" SET ");
        for (idx, (column, value)) in assignments.into_iter().enumerate() {
            if idx > 0 {
                w.push(", ");
            }
            w.push(&column).push(" = ").push_bind(value);
        }
        write_where(&mut w, &self.predicates);
        Ok(w.finish())
    }

    /// `DELETE FROM table [WHERE..]`.
    ///
    /// PostgreSQL has no `DELETE ... LIMIT`; a stored limit is applied through a
    /// `ctid` subquery over the same predicates.
    pub fn render_delete(&self) -> DbResult<Statement> {
        let table = self.require_table()?;
        let mut w = SqlWriter::new("DELETE FROM ");
        w.push(table);
        match self.limit {
            None => write_where(&mut w, &self.predicates),
            Some(limit) => {
                w.push(" WHERE ctid IN (SELECT ctid FROM ").push(table);
                write_where(&mut w, &self.predicates);
                w.push(&format!(" LIMIT {})", limit));
            }
        }
        Ok(w.finish())
    }
}

/// Catalog lookup used by `column_exists`. A trailing alias (`users u`) is
/// dropped. A `schema.table` name is split; otherwise the session's current
/// schema is searched.
pub(crate) fn render_column_exists(table: &str, column: &str) -> Statement {
    let table = table.split_whitespace().next().unwrap_or(table);
    let mut w = SqlWriter::new("SELECT 1 FROM information_schema.columns WHERE table_schema = ");
    let table = match table.rsplit_once('.') {
        Some((schema, table)) => {
            w.push_bind(Value::from(schema));
            table
        }
        None => {
            w.push("current_schema()");
            table
        }
    };
    w.push(" AND table_name = ")
        .push_bind(Value::from(table))
        .push(" AND column_name = ")
        .push_bind(Value::from(column))
        .push(" LIMIT 1");
    w.finish()
}
