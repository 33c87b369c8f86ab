//! JOIN kinds and entries.

use crate::error::DbError;
use std::fmt;
use std::str::FromStr;

/// The accepted join kinds. Parsing is case- and wording-exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Right,
    Left,
    LeftOuter,
}

impl JoinKind {
    /// SQL keyword form.
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::LeftOuter => "LEFT OUTER JOIN",
        }
    }
}

impl FromStr for JoinKind {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INNER JOIN" => Ok(JoinKind::Inner),
            "RIGHT JOIN" => Ok(JoinKind::Right),
            "LEFT JOIN" => Ok(JoinKind::Left),
            "LEFT OUTER JOIN" => Ok(JoinKind::LeftOuter),
            other => Err(DbError::InvalidJoinKind(other.to_string())),
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One JOIN clause. `table` and `on` are inserted verbatim and must never carry
/// untrusted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub on: String,
}

impl Join {
    pub fn new(kind: JoinKind, table: impl Into<String>, on: impl Into<String>) -> Self {
        Self {
            kind,
            table: table.into(),
            on: on.into(),
        }
    }

    pub(crate) fn render(&self) -> String {
        format!("{} {} ON {}", self.kind, self.table, self.on)
    }
}
