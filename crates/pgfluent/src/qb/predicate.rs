//! WHERE predicates and chain rendering.

use crate::qb::statement::SqlWriter;
use crate::value::Value;

/// How a predicate attaches to the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
    Not,
}

/// One `column operator ?` condition.
///
/// `column` and `operator` are inserted verbatim; only `value` is bound.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub connective: Connective,
    pub column: String,
    pub operator: String,
    pub value: Value,
}

impl Predicate {
    pub fn new(
        connective: Connective,
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            connective,
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// Append ` WHERE <chain>` to `w`, binding one value per predicate in order.
///
/// The first predicate carries no connective unless it is NOT. A later NOT
/// predicate renders as `AND NOT ...`.
pub(crate) fn write_where(w: &mut SqlWriter, predicates: &[Predicate]) {
    if predicates.is_empty() {
        return;
    }

    w.push(" WHERE ");
    for (idx, p) in predicates.iter().enumerate() {
        let prefix = match (idx, p.connective) {
            (0, Connective::Not) => "NOT ",
            (0, _) => "",
            (_, Connective::And) => " AND ",
            (_, Connective::Or) => " OR ",
            (_, Connective::Not) => " AND NOT ",
        };
        w.push(prefix)
            .push(&p.column)
            .push(" ")
            .push(&p.operator)
            .push(" ")
            .push_bind(p.value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(predicates: &[Predicate]) -> (String, Vec<Value>) {
        let mut w = SqlWriter::new("");
        write_where(&mut w, predicates);
        let stmt = w.finish();
        (stmt.sql().to_string(), stmt.params().to_vec())
    }

    #[test]
    fn empty_chain_renders_nothing() {
        assert_eq!(render(&[]).0, "");
    }

    #[test]
    fn leading_not_keeps_its_keyword() {
        let (sql, params) = render(&[Predicate::new(Connective::Not, "age", ">", "18")]);
        assert_eq!(sql, " WHERE NOT age > ?");
        assert_eq!(params, vec![Value::from("18")]);
    }

    #[test]
    fn leading_or_drops_its_connective() {
        let (sql, _) = render(&[Predicate::new(Connective::Or, "a", "=", 1)]);
        assert_eq!(sql, " WHERE a = ?");
    }

    #[test]
    fn later_not_is_joined_with_and() {
        let (sql, params) = render(&[
            Predicate::new(Connective::And, "status", "=", "active"),
            Predicate::new(Connective::Or, "role", "=", "admin"),
            Predicate::new(Connective::Not, "banned", "=", true),
        ]);
        assert_eq!(
            sql,
            " WHERE status = ? OR role = ? AND NOT banned = ?"
        );
        assert_eq!(
            params,
            vec![Value::from("active"), Value::from("admin"), Value::Bool(true)]
        );
    }
}
