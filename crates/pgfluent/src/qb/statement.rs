//! Rendered statements and the writer that produces them.

use crate::value::Value;
use std::borrow::Cow;
use tokio_postgres::types::ToSql;

/// A rendered SQL statement with its positional parameters.
///
/// Builder output uses `?` as the placeholder and records the byte offset of
/// every placeholder it emits. [`Statement::to_postgres_sql`] rewrites only those
/// offsets, so a literal `?` coming from a verbatim fragment (for example the
/// jsonb key-exists operator) is left alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<Value>,
    placeholders: Vec<usize>,
}

impl Statement {
    /// Wrap caller-supplied SQL. No placeholder is recorded, so the SQL reaches
    /// the server exactly as given (use PostgreSQL's native `$1, $2, ...`).
    pub fn raw(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
            placeholders: Vec::new(),
        }
    }

    /// The canonical SQL text (with `?` placeholders for builder output).
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bound parameters in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Number of placeholders the builder emitted.
    pub fn placeholder_count(&self) -> usize {
        self.placeholders.len()
    }

    /// SQL with every recorded placeholder replaced by `$1..$n`.
    pub fn to_postgres_sql(&self) -> Cow<'_, str> {
        if self.placeholders.is_empty() {
            return Cow::Borrowed(&self.sql);
        }

        let mut out = String::with_capacity(self.sql.len() + self.placeholders.len() * 2);
        let mut last = 0;
        for (idx, &pos) in self.placeholders.iter().enumerate() {
            out.push_str(&self.sql[last..pos]);
            out.push('$');
            out.push_str(&(idx + 1).to_string());
            last = pos + 1;
        }
        out.push_str(&self.sql[last..]);
        Cow::Owned(out)
    }

    /// Parameters as references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
    }
}

/// Incremental SQL writer that keeps text, parameters and placeholder offsets in step.
#[derive(Debug, Default)]
pub(crate) struct SqlWriter {
    sql: String,
    params: Vec<Value>,
    placeholders: Vec<usize>,
}

impl SqlWriter {
    pub(crate) fn new(initial_sql: &str) -> Self {
        Self {
            sql: initial_sql.to_string(),
            ..Self::default()
        }
    }

    /// Append raw SQL (no parameters).
    pub(crate) fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append a `?` placeholder and bind `value` to it.
    pub(crate) fn push_bind(&mut self, value: Value) -> &mut Self {
        self.placeholders.push(self.sql.len());
        self.sql.push('?');
        self.params.push(value);
        self
    }

    /// Append `?, ?, ...` for each value.
    pub(crate) fn push_bind_list(&mut self, values: impl IntoIterator<Item = Value>) -> &mut Self {
        for (idx, value) in values.into_iter().enumerate() {
            if idx > 0 {
                self.sql.push(',');
            }
            self.push_bind(value);
        }
        self
    }

    pub(crate) fn finish(self) -> Statement {
        Statement {
            sql: self.sql,
            params: self.params,
            placeholders: self.placeholders,
        }
    }
}
