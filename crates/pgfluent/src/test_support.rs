//! Recording executor for unit tests.

use crate::error::{DbError, DbResult};
use crate::executor::Executor;
use crate::qb::Statement;
use crate::row::Record;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    FetchAll(Statement),
    Execute(Statement),
    Insert(Statement),
    Begin,
    Commit,
    Rollback,
}

#[derive(Default)]
struct Inner {
    calls: Vec<Call>,
    rows: VecDeque<Vec<Record>>,
    last_id: i64,
    failure: Option<String>,
}

/// Records every call; clones share the same log so a test can keep a handle
/// while the builder owns the executor.
#[derive(Clone, Default)]
pub(crate) struct RecordingExecutor {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue a result set for the next `fetch_all`.
    pub(crate) fn with_rows(self, rows: Vec<Record>) -> Self {
        self.inner.lock().unwrap().rows.push_back(rows);
        self
    }

    /// Make every statement fail with `DbError::Other(message)`.
    pub(crate) fn failing(message: &str) -> Self {
        let executor = Self::default();
        executor.inner.lock().unwrap().failure = Some(message.to_string());
        executor
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// The statements sent so far, whatever the call kind.
    pub(crate) fn statements(&self) -> Vec<Statement> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::FetchAll(s) | Call::Execute(s) | Call::Insert(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn last_statement(&self) -> Statement {
        self.statements().pop().expect("no statement was executed")
    }

    fn record(&self, call: Call) -> DbResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(call);
        match &inner.failure {
            Some(message) => Err(DbError::Other(message.clone())),
            None => Ok(()),
        }
    }
}

impl Executor for RecordingExecutor {
    async fn fetch_all(&mut self, stmt: &Statement) -> DbResult<Vec<Record>> {
        self.record(Call::FetchAll(stmt.clone()))?;
        Ok(self.inner.lock().unwrap().rows.pop_front().unwrap_or_default())
    }

    async fn execute(&mut self, stmt: &Statement) -> DbResult<u64> {
        self.record(Call::Execute(stmt.clone()))?;
        Ok(1)
    }

    async fn insert(&mut self, stmt: &Statement) -> DbResult<i64> {
        self.record(Call::Insert(stmt.clone()))?;
        let mut inner = self.inner.lock().unwrap();
        inner.last_id += 1;
        Ok(inner.last_id)
    }

    async fn begin(&mut self) -> DbResult<()> {
        self.record(Call::Begin)
    }

    async fn commit(&mut self) -> DbResult<()> {
        self.record(Call::Commit)
    }

    async fn rollback(&mut self) -> DbResult<()> {
        self.record(Call::Rollback)
    }
}
