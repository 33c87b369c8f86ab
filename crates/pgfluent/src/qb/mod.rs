//! Query fragments and their rendering.
//!
//! Everything here is pure: [`QueryState`] accumulates fragments and renders
//! them into a [`Statement`] without touching a connection.
//!
//! # Clause order
//!
//! `SELECT fields FROM table [JOIN ...]* [WHERE chain] [ORDER BY cols DIR] [LIMIT n [OFFSET m]]`
//!
//! # Placeholders
//!
//! Each predicate value becomes one `?` placeholder, bound in append order.
//! The statement remembers where every placeholder was written, so executors can
//! renumber them (`$1..$n` for PostgreSQL) without re-parsing the SQL.
//!
//! ```ignore
//! use pgfluent::qb::QueryState;
//!
//! let stmt = QueryState::new("users")
//!     .not_where("age", ">", "18")
//!     .render_select()?;
//! assert_eq!(stmt.sql(), "SELECT * FROM users WHERE NOT age > ?");
//! ```

mod join;
mod order;
mod predicate;
mod state;
mod statement;

pub use join::{Join, JoinKind};
pub use order::{Direction, OrderSpec};
pub use predicate::{Connective, Predicate};
pub use state::QueryState;
pub use statement::Statement;

pub(crate) use state::render_column_exists;
