//! # pgfluent
//!
//! A fluent query-builder facade over `tokio-postgres`.
//!
//! Chained calls accumulate a table, a field list, joins, predicates, an order
//! and a limit/offset; a terminal call renders one parameterized statement,
//! runs it and returns rows or an insert id.
//!
//! ## Features
//!
//! - **Parameter-safe values**: every predicate and insert value is a bind parameter
//! - **Fixed clause order**: SELECT, FROM, JOIN, WHERE, ORDER BY, LIMIT, OFFSET
//! - **Typed errors**: configuration, connection and execution failures are all `DbError`
//! - **Pluggable executor**: the builder only needs an [`Executor`]; [`PgExecutor`] ships
//!
//! ```ignore
//! use pgfluent::{ConnectionConfig, QueryBuilder};
//!
//! let mut db = QueryBuilder::new(ConnectionConfig::new().user("app").password("secret"));
//! db.connect("shop").await?;
//!
//! let adults = db
//!     .table("users")
//!     .where_("age", ">=", 18)
//!     .limit(10)
//!     .get()
//!     .await?;
//!
//! let id = db.table("users").insert("name,email", ["Ann", "a@x.com"]).await?;
//! db.table("sessions").where_("user_id", "=", id).delete().await?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod executor;
pub mod postgres;
pub mod qb;
pub mod row;
pub mod value;

mod logging;

#[cfg(test)]
mod test_support;

pub use builder::QueryBuilder;
pub use config::{ConnectionConfig, Driver};
pub use error::{DbError, DbResult};
pub use executor::Executor;
pub use postgres::PgExecutor;
pub use qb::{Connective, Direction, Join, JoinKind, OrderSpec, Predicate, QueryState, Statement};
pub use row::Record;
pub use value::Value;
