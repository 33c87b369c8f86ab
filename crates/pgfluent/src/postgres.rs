//! PostgreSQL executor over `tokio_postgres`.

use crate::config::ConnectionConfig;
use crate::error::{DbError, DbResult};
use crate::executor::Executor;
use crate::logging::CONN_TARGET;
use crate::qb::Statement;
use crate::row::Record;
use tokio_postgres::{Client, NoTls};

/// A single PostgreSQL session.
///
/// Dropping it closes the connection. Builder placeholders are numbered
/// (`$1..$n`) here, right before the statement is sent.
pub struct PgExecutor {
    client: Client,
}

impl PgExecutor {
    /// Wrap an already connected client (e.g. one created with a TLS connector).
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Open a session to `database`.
    ///
    /// The connection future is driven on a spawned tokio task which ends when the
    /// client is dropped, so this must be called from within a tokio runtime.
    pub async fn connect(config: &ConnectionConfig, database: &str) -> DbResult<Self> {
        let pg = config.to_pg_config(database)?;
        let (client, connection) = pg.connect(NoTls).await.map_err(|e| {
            tracing::error!(
                target: CONN_TARGET,
                host = %config.host,
                port = config.port,
                database,
                error = %e,
                "failed to connect"
            );
            DbError::Connection(e.to_string())
        })?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(target: CONN_TARGET, error = %e, "connection terminated");
            }
        });

        tracing::info!(
            target: CONN_TARGET,
            host = %config.host,
            port = config.port,
            database,
            "connected"
        );
        Ok(Self::new(client))
    }

    /// The underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl Executor for PgExecutor {
    async fn fetch_all(&mut self, stmt: &Statement) -> DbResult<Vec<Record>> {
        let sql = stmt.to_postgres_sql();
        let rows = self
            .client
            .query(sql.as_ref(), &stmt.params_ref())
            .await
            .map_err(DbError::from_db_error)?;
        rows.iter().map(Record::from_pg_row).collect()
    }

    async fn execute(&mut self, stmt: &Statement) -> DbResult<u64> {
        let sql = stmt.to_postgres_sql();
        self.client
            .execute(sql.as_ref(), &stmt.params_ref())
            .await
            .map_err(DbError::from_db_error)
    }

    async fn insert(&mut self, stmt: &Statement) -> DbResult<i64> {
        self.execute(stmt).await?;
        // lastval() is per-session and not per-table: without a sequence on the target
        // table it reports whatever sequence this session last advanced.
        let row = self
            .client
            .query_one("SELECT lastval()", &[])
            .await
            .map_err(DbError::from_db_error)?;
        row.try_get::<_, i64>(0)
            .map_err(|e| DbError::decode("lastval", e.to_string()))
    }

    async fn begin(&mut self) -> DbResult<()> {
        self.client
            .batch_execute("BEGIN")
            .await
            .map_err(DbError::from_db_error)
    }

    async fn commit(&mut self) -> DbResult<()> {
        self.client
            .batch_execute("COMMIT")
            .await
            .map_err(DbError::from_db_error)
    }

    async fn rollback(&mut self) -> DbResult<()> {
        self.client
            .batch_execute("ROLLBACK")
            .await
            .map_err(DbError::from_db_error)
    }
}
