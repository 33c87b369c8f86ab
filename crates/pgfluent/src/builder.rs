//! The connection-bound fluent query builder.
//!
//! ```ignore
//! use pgfluent::{ConnectionConfig, Direction, QueryBuilder};
//!
//! let mut db = QueryBuilder::new(ConnectionConfig::from_env()?);
//! db.connect("shop").await?;
//!
//! let rows = db
//!     .table("users u")
//!     .select("u.id, u.name, p.title")
//!     .join("LEFT JOIN", "posts p", "p.user_id = u.id")?
//!     .where_("u.status", "=", "active")
//!     .or_where("u.role", "=", "admin")
//!     .order("u.created_at", Direction::Desc)
//!     .limit(20)
//!     .get()
//!     .await?;
//!
//! let id = db.table("users").insert("name,email", ["Ann", "a@x.com"]).await?;
//! ```
//!
//! # State
//!
//! Configuration calls accumulate into a [`QueryState`]. Terminal operations
//! render and run it but leave it in place, so a second `get()` reruns the same
//! query. `table()` starts a new query by resetting everything; `reset()` does
//! the same without choosing a table; `close()` also drops the session.
//!
//! # Trust boundary
//!
//! Only values are bound as parameters. Table names, field lists, operators,
//! order columns and join ON conditions are inserted verbatim and must never be
//! built from untrusted input.
//!
//! # Concurrency
//!
//! Every method takes `&mut self`. Share a builder across tasks only behind a
//! lock (e.g. `tokio::sync::Mutex`), and keep one builder per logical query
//! sequence.

use crate::config::{ConnectionConfig, Driver};
use crate::error::{DbError, DbResult};
use crate::executor::Executor;
use crate::logging::{CONN_TARGET, log_statement};
use crate::postgres::PgExecutor;
use crate::qb::{Direction, JoinKind, QueryState, Statement, render_column_exists};
use crate::row::Record;
use crate::value::Value;
use std::fmt;

/// Fluent query builder bound to (at most) one executor session.
pub struct QueryBuilder<E = PgExecutor> {
    config: ConnectionConfig,
    session: Option<E>,
    state: QueryState,
}

impl<E> fmt::Debug for QueryBuilder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("config", &self.config)
            .field("connected", &self.session.is_some())
            .field("state", &self.state)
            .finish()
    }
}

impl<E: Executor> QueryBuilder<E> {
    /// A builder over an already open session.
    pub fn with_executor(executor: E) -> Self {
        Self {
            config: ConnectionConfig::default(),
            session: Some(executor),
            state: QueryState::default(),
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Set connection parameters. Pure state; no I/O.
    ///
    /// Fails with `DbError::Config` for an unknown driver name or when a session
    /// is already open.
    pub fn configure(
        &mut self,
        host: &str,
        user: &str,
        password: &str,
        driver: &str,
    ) -> DbResult<&mut Self> {
        if self.session.is_some() {
            return Err(DbError::config(
                "cannot reconfigure a connected builder; close() it first",
            ));
        }
        let driver: Driver = driver.parse()?;
        self.config = self
            .config
            .clone()
            .host(host)
            .user(user)
            .password(password)
            .driver(driver);
        Ok(self)
    }

    /// Borrow the accumulated state.
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    fn apply(&mut self, f: impl FnOnce(QueryState) -> QueryState) -> &mut Self {
        self.state = f(std::mem::take(&mut self.state));
        self
    }

    // ==================== Configuration ====================

    /// Begin a new query on `name`, discarding all previous fragments.
    pub fn table(&mut self, name: &str) -> &mut Self {
        self.state = QueryState::new(name);
        self
    }

    /// Discard all fragments, including the table.
    pub fn reset(&mut self) -> &mut Self {
        self.state = QueryState::default();
        self
    }

    /// Set the field list (default `*`).
    pub fn select(&mut self, fields: &str) -> &mut Self {
        self.apply(|s| s.with_fields(fields))
    }

    /// Append `AND column operator ?`.
    pub fn where_(&mut self, column: &str, operator: &str, value: impl Into<Value>) -> &mut Self {
        self.apply(|s| s.and_where(column, operator, value))
    }

    /// Append `OR column operator ?`.
    pub fn or_where(&mut self, column: &str, operator: &str, value: impl Into<Value>) -> &mut Self {
        self.apply(|s| s.or_where(column, operator, value))
    }

    /// Append `NOT column operator ?` (as `AND NOT ...` after the first predicate).
    pub fn not_where(
        &mut self,
        column: &str,
        operator: &str,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.apply(|s| s.not_where(column, operator, value))
    }

    /// Append a join given its SQL keyword (`INNER JOIN`, `RIGHT JOIN`,
    /// `LEFT JOIN` or `LEFT OUTER JOIN`). Anything else fails with
    /// `DbError::InvalidJoinKind` and appends nothing.
    pub fn join(&mut self, kind: &str, table: &str, on: &str) -> DbResult<&mut Self> {
        let kind: JoinKind = kind.parse()?;
        Ok(self.join_kind(kind, table, on))
    }

    /// Append a join of a known kind.
    pub fn join_kind(&mut self, kind: JoinKind, table: &str, on: &str) -> &mut Self {
        self.apply(|s| s.with_join(kind, table, on))
    }

    /// Replace the ORDER BY.
    pub fn order(&mut self, columns: &str, direction: Direction) -> &mut Self {
        self.apply(|s| s.with_order(columns, direction))
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.apply(|s| s.with_limit(limit))
    }

    /// Set OFFSET; ignored unless a limit is set too.
    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.apply(|s| s.with_offset(offset))
    }

    /// Render the SELECT `get()` would run, without running it.
    pub fn to_sql(&self) -> DbResult<Statement> {
        self.state.render_select()
    }

    // ==================== Terminal operations ====================

    fn session(&mut self) -> DbResult<&mut E> {
        self.session.as_mut().ok_or(DbError::NotConnected)
    }

    async fn fetch(&mut self, operation: &'static str, stmt: Statement) -> DbResult<Vec<Record>> {
        let session = self.session()?;
        log_statement(operation, &stmt);
        session.fetch_all(&stmt).await
    }

    async fn run(&mut self, operation: &'static str, stmt: Statement) -> DbResult<u64> {
        let session = self.session()?;
        log_statement(operation, &stmt);
        session.execute(&stmt).await
    }

    /// Run the SELECT and return every row.
    pub async fn get(&mut self) -> DbResult<Vec<Record>> {
        let stmt = self.state.render_select()?;
        self.fetch("get", stmt).await
    }

    /// Run the SELECT with `LIMIT 1` and return the row, if any.
    pub async fn first(&mut self) -> DbResult<Option<Record>> {
        let stmt = self.state.render_first()?;
        Ok(self.fetch("first", stmt).await?.into_iter().next())
    }

    /// `SELECT COUNT(*)` over the table, joins and predicates.
    pub async fn count(&mut self) -> DbResult<i64> {
        let stmt = self.state.render_count()?;
        let rows = self.fetch("count", stmt).await?;
        rows.first()
            .and_then(|row| row.get_idx(0))
            .and_then(Value::as_i64)
            .ok_or_else(|| DbError::decode("count", "COUNT(*) returned no integer"))
    }

    /// Insert one row and return the generated identifier.
    ///
    /// `columns` is a comma-joined list; one value is required per column.
    /// Empty or mismatched input is rejected before anything is sent.
    ///
    /// # Identifier
    ///
    /// On PostgreSQL the id is `lastval()`, the value most recently produced by
    /// any sequence in this session. For a table without a sequence-backed
    /// column it is therefore the id of an earlier insert into another table.
    /// If no sequence has been used in the session yet the call returns
    /// `DbError::Query` even though the row was written; wrap the insert in
    /// `transaction()` to roll it back in that case.
    pub async fn insert<V: Into<Value>>(
        &mut self,
        columns: &str,
        values: impl IntoIterator<Item = V>,
    ) -> DbResult<i64> {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let stmt = self.state.render_insert(columns, values)?;
        let session = self.session()?;
        log_statement("insert", &stmt);
        session.insert(&stmt).await
    }

    /// `UPDATE table SET ... [WHERE ...]`; returns the affected row count.
    pub async fn update<C: Into<String>, V: Into<Value>>(
        &mut self,
        assignments: impl IntoIterator<Item = (C, V)>,
    ) -> DbResult<u64> {
        let assignments: Vec<(String, Value)> = assignments
            .into_iter()
            .map(|(c, v)| (c.into(), v.into()))
            .collect();
        let stmt = self.state.render_update(assignments)?;
        self.run("update", stmt).await
    }

    /// `DELETE FROM table [WHERE ...]`, honoring a set limit.
    pub async fn delete(&mut self) -> DbResult<()> {
        let stmt = self.state.render_delete()?;
        self.run("delete", stmt).await?;
        Ok(())
    }

    /// Run caller-supplied SQL verbatim with positional parameters, ignoring all
    /// builder state. Use PostgreSQL placeholders (`$1, $2, ...`).
    pub async fn raw(&mut self, sql: &str, params: Vec<Value>) -> DbResult<Vec<Record>> {
        self.fetch("raw", Statement::raw(sql, params)).await
    }

    // ==================== Session ====================

    pub async fn transaction(&mut self) -> DbResult<()> {
        self.session()?.begin().await
    }

    pub async fn commit(&mut self) -> DbResult<()> {
        self.session()?.commit().await
    }

    pub async fn rollback(&mut self) -> DbResult<()> {
        self.session()?.rollback().await
    }

    /// Whether `column` exists on `table`, or on the selected table when `None`.
    pub async fn column_exists(&mut self, column: &str, table: Option<&str>) -> DbResult<bool> {
        let table = match table.or(self.state.table()) {
            Some(table) => table.to_string(),
            None => return Err(DbError::validation("no table given and none selected")),
        };
        let stmt = render_column_exists(&table, column);
        Ok(!self.fetch("column_exists", stmt).await?.is_empty())
    }

    /// Reset all state and release the session.
    pub fn close(&mut self) {
        self.state = QueryState::default();
        if self.session.take().is_some() {
            tracing::info!(target: CONN_TARGET, "session closed");
        }
    }
}

impl QueryBuilder<PgExecutor> {
    /// An unconnected PostgreSQL builder.
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            session: None,
            state: QueryState::default(),
        }
    }

    /// Open a PostgreSQL session to `database` using the configured parameters.
    ///
    /// Failures are logged and returned as `DbError::Connection`; the builder
    /// stays unconnected.
    pub async fn connect(&mut self, database: &str) -> DbResult<()> {
        let session = PgExecutor::connect(&self.config, database).await?;
        self.session = Some(session);
        Ok(())
    }
}
