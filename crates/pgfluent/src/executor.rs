//! The executor contract: the only external collaborator of the builder.

use crate::error::DbResult;
use crate::qb::Statement;
use crate::row::Record;

/// A database session that can run parameterized statements.
///
/// Any client with positional parameters and error-on-execute can implement
/// this. [`crate::PgExecutor`] is the PostgreSQL implementation. Methods take
/// `&mut self`: a session serves one caller at a time.
pub trait Executor: Send {
    /// Run a row-returning statement and collect every row.
    fn fetch_all(
        &mut self,
        stmt: &Statement,
    ) -> impl std::future::Future<Output = DbResult<Vec<Record>>> + Send;

    /// Run a statement and return the number of affected rows.
    fn execute(
        &mut self,
        stmt: &Statement,
    ) -> impl std::future::Future<Output = DbResult<u64>> + Send;

    /// Run an INSERT and return the identifier it generated.
    fn insert(
        &mut self,
        stmt: &Statement,
    ) -> impl std::future::Future<Output = DbResult<i64>> + Send;

    /// Open a transaction on this session.
    fn begin(&mut self) -> impl std::future::Future<Output = DbResult<()>> + Send;

    /// Commit the open transaction.
    fn commit(&mut self) -> impl std::future::Future<Output = DbResult<()>> + Send;

    /// Roll back the open transaction.
    fn rollback(&mut self) -> impl std::future::Future<Output = DbResult<()>> + Send;
}
