//! `tracing` integration.
//!
//! The crate never installs a subscriber. Events are emitted under two targets:
//!
//! - `pgfluent.sql`: one DEBUG event per dispatched statement
//! - `pgfluent.conn`: session lifecycle (INFO) and connection failures (ERROR)

use crate::qb::Statement;

pub(crate) const SQL_TARGET: &str = "pgfluent.sql";
pub(crate) const CONN_TARGET: &str = "pgfluent.conn";

/// Longest SQL text (in bytes) included in a log event.
const MAX_LOGGED_SQL: usize = 200;

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// Emit the statement about to be sent. Parameter values are never logged.
pub(crate) fn log_statement(operation: &'static str, stmt: &Statement) {
    let sql = stmt.sql();
    let truncated = sql.len() > MAX_LOGGED_SQL;
    tracing::debug!(
        target: SQL_TARGET,
        operation,
        param_count = stmt.params().len(),
        truncated,
        sql = %truncate_sql_bytes(sql, MAX_LOGGED_SQL),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_sql_bytes("SELECT 1", 100), "SELECT 1");
        assert_eq!(truncate_sql_bytes("SELECT 1", 6), "SELECT");
        // 'é' is two bytes; cutting inside it backs off to the boundary.
        assert_eq!(truncate_sql_bytes("é", 1), "");
    }
}
