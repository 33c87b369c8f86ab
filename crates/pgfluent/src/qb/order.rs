//! ORDER BY clause.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// The single ORDER BY of a query. `columns` may be comma-separated and is
/// inserted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    pub columns: String,
    pub direction: Direction,
}

impl OrderSpec {
    pub(crate) fn render(&self) -> String {
        format!("ORDER BY {} {}", self.columns, self.direction)
    }
}
