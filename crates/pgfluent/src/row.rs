//! Result rows as ordered column-name to value records

use crate::error::{DbError, DbResult};
use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tokio_postgres::Row;

/// One result row.
///
/// Columns keep the order the server returned them in. Duplicate column names
/// (e.g. `id` from both sides of a join) are kept; lookup by name returns the first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every column of a `tokio_postgres` row into [`Value`]s.
    pub fn from_pg_row(row: &Row) -> DbResult<Self> {
        let mut record = Record {
            columns: Vec::with_capacity(row.len()),
            values: Vec::with_capacity(row.len()),
        };
        for (idx, column) in row.columns().iter().enumerate() {
            let value: Value = row
                .try_get(idx)
                .map_err(|e| DbError::decode(column.name(), e.to_string()))?;
            record.push(column.name(), value);
        }
        Ok(record)
    }

    /// Append a column.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.push(column.into());
        self.values.push(value.into());
    }

    /// Look up a column by name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.values[idx])
    }

    /// Look up a column by name, returning `DbError::Decode` when it is absent.
    pub fn try_get(&self, column: &str) -> DbResult<&Value> {
        self.get(column)
            .ok_or_else(|| DbError::decode(column, "no such column in result row"))
    }

    /// Look up a column by position.
    pub fn get_idx(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(column, value)` pairs in result order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl<C: Into<String>, V: Into<Value>> FromIterator<(C, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.push(column, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        [("id", Value::Int(1)), ("name", Value::from("Ann"))]
            .into_iter()
            .collect()
    }

    #[test]
    fn lookup_by_name_and_position() {
        let record = sample();
        assert_eq!(record.get("name"), Some(&Value::from("Ann")));
        assert_eq!(record.get_idx(0), Some(&Value::Int(1)));
        assert!(record.get("email").is_none());
        assert!(matches!(
            record.try_get("email"),
            Err(DbError::Decode { .. })
        ));
    }

    #[test]
    fn duplicate_columns_resolve_to_first() {
        let mut record = sample();
        record.push("id", 2);
        assert_eq!(record.len(), 3);
        assert_eq!(record.get("id"), Some(&Value::Int(1)));
    }

    #[test]
    fn serializes_as_ordered_object() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"Ann"}"#);
    }
}
