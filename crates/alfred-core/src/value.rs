/// Semantic values exposed by records
///
/// Filters and the sorter never see concrete Rust field types, only the
/// semantic value a record hands out for one of its fields.
use crate::error::CoercionError;
use chrono::{DateTime, FixedOffset, Utc};
use std::fmt;

/// A borrowed field value, tagged with its semantic type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Text(&'a str),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    /// Delimited text array, already split into its elements
    List(&'a [String]),
}

impl Value<'_> {
    /// Semantic kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Text(_) => ValueKind::Text,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::List(_) => ValueKind::List,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            Value::List(items) => write!(f, "{}", items.join(",")),
        }
    }
}

/// Semantic type tag of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    Integer,
    Float,
    Boolean,
    Timestamp,
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Boolean => "boolean",
            ValueKind::Timestamp => "timestamp",
            ValueKind::List => "list",
        };
        f.write_str(name)
    }
}

/// Conversion from a Rust field into its semantic value.
///
/// Implemented for the field types the engine knows how to compare. Record
/// implementations (hand written or generated by [`impl_record!`](crate::impl_record))
/// call this from [`Record::value`](crate::Record::value).
pub trait IntoValue {
    fn to_value(&self) -> Value<'_>;
}

impl IntoValue for String {
    fn to_value(&self) -> Value<'_> {
        Value::Text(self)
    }
}

impl IntoValue for &str {
    fn to_value(&self) -> Value<'_> {
        Value::Text(self)
    }
}

macro_rules! integer_into_value {
    ($($ty:ty),*) => {
        $(
            impl IntoValue for $ty {
                fn to_value(&self) -> Value<'_> {
                    Value::Integer(i64::from(*self))
                }
            }
        )*
    };
}

integer_into_value!(i8, i16, i32, i64, u8, u16, u32);

impl IntoValue for f32 {
    fn to_value(&self) -> Value<'_> {
        Value::Float(f64::from(*self))
    }
}

impl IntoValue for f64 {
    fn to_value(&self) -> Value<'_> {
        Value::Float(*self)
    }
}

impl IntoValue for bool {
    fn to_value(&self) -> Value<'_> {
        Value::Boolean(*self)
    }
}

impl IntoValue for DateTime<Utc> {
    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(*self)
    }
}

impl IntoValue for DateTime<FixedOffset> {
    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(self.with_timezone(&Utc))
    }
}

impl IntoValue for Vec<String> {
    fn to_value(&self) -> Value<'_> {
        Value::List(self)
    }
}

/// Parse canonical boolean text.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false counterparts
/// `0`, `f`, `F`, `FALSE`, `false`, `False`.
pub fn parse_bool(s: &str) -> Result<bool, CoercionError> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(CoercionError::Boolean(s.to_string())),
    }
}

/// Parse an RFC 3339 timestamp and normalize it to UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, CoercionError> {
    let parsed = DateTime::parse_from_rfc3339(s)?;
    Ok(parsed.with_timezone(&Utc))
}
