//! Dynamic scalar used for bind parameters and decoded columns.
//!
//! Predicate values are opaque to the builder. A [`Value::Text`] bound against a
//! non-text parameter is coerced to the type the server inferred for that
//! placeholder, so `where_("age", ">", "18")` works against an `int4` column.
//!
//! One-dimensional arrays decode to [`Value::Json`]. Column types with no
//! mapping here (interval, inet, money, ...) fail with a decode error; cast them
//! to text in the query (`SELECT span::text ...`) to read them.

use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{FromSql, IsNull, Kind, ToSql, Type};

type BoxError = Box<dyn Error + Sync + Send>;

/// A bind parameter or a decoded column value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text payload, if this is a `Text` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view. Text holding a decimal integer is parsed.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// JSON view; bytes become an array of numbers.
    pub fn into_json(self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => b.into(),
            Value::Int(i) => i.into(),
            Value::Float(f) => f.into(),
            Value::Text(s) => s.into(),
            Value::Bytes(b) => b.into(),
            Value::Json(v) => v,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Text(s) => parse_bool(s).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::Json(v) => write!(f, "{v}"),
        }
    }
}

// ==================== Conversions ====================

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Text(v.to_rfc3339())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Text(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ==================== Binding ====================

fn is_text(ty: &Type) -> bool {
    matches!(
        *ty,
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN
    ) || ty.name() == "citext"
}

/// Types whose binary wire form is the UTF-8 text itself.
fn is_text_wire(ty: &Type) -> bool {
    <&str as ToSql>::accepts(ty) || matches!(ty.kind(), Kind::Enum(_))
}

fn mismatch(kind: &str, ty: &Type) -> BoxError {
    format!("cannot bind {} value to parameter of type {}", kind, ty).into()
}

fn parse_bool(s: &str) -> Result<bool, BoxError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "t" | "true" | "1" | "y" | "yes" | "on" => Ok(true),
        "f" | "false" | "0" | "n" | "no" | "off" => Ok(false),
        other => Err(format!("invalid boolean literal '{}'", other).into()),
    }
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, BoxError> {
    let s = s.trim();
    s.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(Into::into)
}

fn encode_int(v: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(v)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(v)?.to_sql(ty, out),
        Type::INT8 => v.to_sql(ty, out),
        Type::OID => u32::try_from(v)?.to_sql(ty, out),
        Type::FLOAT4 => {
            let f = v as f32;
            if f as i128 != i128::from(v) {
                return Err(format!("integer {} is not exactly representable as float4", v).into());
            }
            f.to_sql(ty, out)
        }
        Type::FLOAT8 => {
            let f = v as f64;
            if f as i128 != i128::from(v) {
                return Err(format!("integer {} is not exactly representable as float8", v).into());
            }
            f.to_sql(ty, out)
        }
        Type::NUMERIC => Decimal::from(v).to_sql(ty, out),
        _ if is_text(ty) => v.to_string().to_sql(ty, out),
        _ => Err(mismatch("integer", ty)),
    }
}

fn encode_float(v: f64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        Type::FLOAT8 => v.to_sql(ty, out),
        Type::NUMERIC => Decimal::try_from(v)?.to_sql(ty, out),
        _ if is_text(ty) => v.to_string().to_sql(ty, out),
        _ => Err(mismatch("float", ty)),
    }
}

fn encode_text(s: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::BOOL => parse_bool(s)?.to_sql(ty, out),
        Type::INT2 => s.trim().parse::<i16>()?.to_sql(ty, out),
        Type::INT4 => s.trim().parse::<i32>()?.to_sql(ty, out),
        Type::INT8 => s.trim().parse::<i64>()?.to_sql(ty, out),
        Type::FLOAT4 => s.trim().parse::<f32>()?.to_sql(ty, out),
        Type::FLOAT8 => s.trim().parse::<f64>()?.to_sql(ty, out),
        Type::NUMERIC => s.trim().parse::<Decimal>()?.to_sql(ty, out),
        Type::JSON | Type::JSONB => serde_json::from_str::<serde_json::Value>(s)?.to_sql(ty, out),
        Type::UUID => uuid::Uuid::parse_str(s.trim())?.to_sql(ty, out),
        Type::TIMESTAMPTZ => DateTime::parse_from_rfc3339(s.trim())?
            .with_timezone(&Utc)
            .to_sql(ty, out),
        Type::TIMESTAMP => parse_timestamp(s)?.to_sql(ty, out),
        Type::DATE => s.trim().parse::<NaiveDate>()?.to_sql(ty, out),
        Type::TIME => s.trim().parse::<NaiveTime>()?.to_sql(ty, out),
        Type::BYTEA => s.as_bytes().to_sql(ty, out),
        _ if is_text_wire(ty) => s.to_sql(ty, out),
        _ => Err(mismatch("text", ty)),
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(b) => match *ty {
                Type::BOOL => b.to_sql(ty, out),
                _ if is_text(ty) => b.to_string().to_sql(ty, out),
                _ => Err(mismatch("boolean", ty)),
            },
            Value::Int(v) => encode_int(*v, ty, out),
            Value::Float(v) => encode_float(*v, ty, out),
            Value::Text(s) => encode_text(s, ty, out),
            Value::Bytes(b) => match *ty {
                Type::BYTEA => b.to_sql(ty, out),
                _ => Err(mismatch("bytea", ty)),
            },
            Value::Json(v) => match *ty {
                Type::JSON | Type::JSONB => v.to_sql(ty, out),
                _ if is_text(ty) => v.to_string().to_sql(ty, out),
                _ => Err(mismatch("json", ty)),
            },
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

// ==================== Decoding ====================

impl<'a> FromSql<'a> for Value {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        let value = match *ty {
            Type::BOOL => Value::Bool(bool::from_sql(ty, raw)?),
            Type::INT2 => Value::Int(i64::from(i16::from_sql(ty, raw)?)),
            Type::INT4 => Value::Int(i64::from(i32::from_sql(ty, raw)?)),
            Type::INT8 => Value::Int(i64::from_sql(ty, raw)?),
            Type::OID => Value::Int(i64::from(u32::from_sql(ty, raw)?)),
            Type::FLOAT4 => Value::Float(f64::from(f32::from_sql(ty, raw)?)),
            Type::FLOAT8 => Value::Float(f64::from_sql(ty, raw)?),
            Type::NUMERIC => Value::Text(Decimal::from_sql(ty, raw)?.to_string()),
            Type::JSON | Type::JSONB => Value::Json(serde_json::Value::from_sql(ty, raw)?),
            Type::UUID => Value::Text(uuid::Uuid::from_sql(ty, raw)?.to_string()),
            Type::TIMESTAMPTZ => Value::Text(DateTime::<Utc>::from_sql(ty, raw)?.to_rfc3339()),
            Type::TIMESTAMP => Value::Text(NaiveDateTime::from_sql(ty, raw)?.to_string()),
            Type::DATE => Value::Text(NaiveDate::from_sql(ty, raw)?.to_string()),
            Type::TIME => Value::Text(NaiveTime::from_sql(ty, raw)?.to_string()),
            Type::BYTEA => Value::Bytes(Vec::<u8>::from_sql(ty, raw)?),
            _ if is_text_wire(ty) => Value::Text(String::from_sql(ty, raw)?),
            _ => match ty.kind() {
                Kind::Array(_) => {
                    let items = Vec::<Option<Value>>::from_sql(ty, raw)?;
                    Value::Json(
                        items
                            .into_iter()
                            .map(|item| item.unwrap_or(Value::Null).into_json())
                            .collect(),
                    )
                }
                Kind::Domain(base) => Value::from_sql(base, raw)?,
                _ => return Err(format!("unsupported column type {}", ty).into()),
            },
        };
        Ok(value)
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, BoxError> {
        Ok(Value::Null)
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &Value, ty: &Type) -> Result<(IsNull, BytesMut), BoxError> {
        let mut buf = BytesMut::new();
        let is_null = value.to_sql(ty, &mut buf)?;
        Ok((is_null, buf))
    }

    #[test]
    fn text_coerces_to_inferred_integer_type() {
        let (is_null, buf) = encode(&Value::from("18"), &Type::INT4).unwrap();
        assert!(matches!(is_null, IsNull::No));
        assert_eq!(&buf[..], &18i32.to_be_bytes());
    }

    #[test]
    fn text_that_is_not_a_number_is_rejected() {
        assert!(encode(&Value::from("eighteen"), &Type::INT8).is_err());
    }

    #[test]
    fn text_binds_verbatim_to_text_parameters() {
        let (_, buf) = encode(&Value::from("a@x.com"), &Type::VARCHAR).unwrap();
        assert_eq!(&buf[..], b"a@x.com");
    }

    #[test]
    fn null_binds_as_sql_null() {
        let (is_null, buf) = encode(&Value::Null, &Type::INT4).unwrap();
        assert!(matches!(is_null, IsNull::Yes));
        assert!(buf.is_empty());
    }

    #[test]
    fn int_narrowing_overflow_is_an_error() {
        assert!(encode(&Value::Int(70_000), &Type::INT2).is_err());
        assert!(encode(&Value::Int(7), &Type::INT2).is_ok());
    }

    #[test]
    fn boolean_literals() {
        assert!(parse_bool("Yes").unwrap());
        assert!(!parse_bool(" off ").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn bytes_only_bind_to_bytea() {
        assert!(encode(&Value::Bytes(vec![1, 2]), &Type::BYTEA).is_ok());
        assert!(encode(&Value::Bytes(vec![1, 2]), &Type::INT4).is_err());
    }

    #[test]
    fn decode_int4_column() {
        let raw = 42i32.to_be_bytes();
        assert_eq!(Value::from_sql(&Type::INT4, &raw).unwrap(), Value::Int(42));
        assert_eq!(Value::from_sql_null(&Type::INT4).unwrap(), Value::Null);
    }

    #[test]
    fn decode_int4_array_as_json() {
        let mut buf = BytesMut::new();
        vec![Some(1i32), None, Some(3)]
            .to_sql(&Type::INT4_ARRAY, &mut buf)
            .unwrap();
        assert_eq!(
            Value::from_sql(&Type::INT4_ARRAY, &buf).unwrap(),
            Value::Json(serde_json::json!([1, null, 3]))
        );
    }

    #[test]
    fn decode_text_array_as_json() {
        let mut buf = BytesMut::new();
        vec!["a", "b"].to_sql(&Type::TEXT_ARRAY, &mut buf).unwrap();
        assert_eq!(
            Value::from_sql(&Type::TEXT_ARRAY, &buf).unwrap(),
            Value::Json(serde_json::json!(["a", "b"]))
        );
    }

    #[test]
    fn unsupported_column_types_fail_to_decode() {
        // 1 second as an interval: 8 bytes of microseconds, 4 of days, 4 of months.
        let mut raw = Vec::new();
        raw.extend_from_slice(&1_000_000i64.to_be_bytes());
        raw.extend_from_slice(&0i32.to_be_bytes());
        raw.extend_from_slice(&0i32.to_be_bytes());
        assert!(Value::from_sql(&Type::INTERVAL, &raw).is_err());
        assert!(Value::from_sql(&Type::INET, &[2, 32, 0, 4, 127, 0, 0, 1]).is_err());
    }

    #[test]
    fn text_does_not_bind_to_binary_only_types() {
        assert!(encode(&Value::from("1 day"), &Type::INTERVAL).is_err());
        assert!(encode(&Value::from("{1,2}"), &Type::INT4_ARRAY).is_err());
        assert!(encode(&Value::from("10.0.0.1"), &Type::INET).is_err());
    }

    #[test]
    fn int_to_float_must_be_exact() {
        assert!(encode(&Value::Int(16_777_216), &Type::FLOAT4).is_ok());
        assert!(encode(&Value::Int(16_777_217), &Type::FLOAT4).is_err());
        assert!(encode(&Value::Int((1 << 53) + 1), &Type::FLOAT8).is_err());
        assert!(encode(&Value::Int(i64::MAX), &Type::FLOAT8).is_err());
    }

    #[test]
    fn option_maps_none_to_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![Value::Null, Value::Int(1), Value::from("a")])
            .unwrap();
        assert_eq!(json, r#"[null,1,"a"]"#);
    }
}
