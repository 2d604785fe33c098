//! @ai:module:intent Dynamically typed value produced by any-typed argument parsing
//! @ai:module:layer domain
//! @ai:module:public_api Value
//! @ai:module:stateless true

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// @ai:intent Value whose concrete shape is inferred from the literal
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    /// Unsigned integer above `i64::MAX`; smaller ones are stored as `Int`.
    Uint(u64),
    String(String),
    Slice(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Name of the variant, used in mismatch diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::Uint(_) => "integer",
            Value::String(_) => "string",
            Value::Slice(_) => "slice",
            Value::Map(_) => "map",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Uint(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::Int(i) => u64::try_from(*i).ok(),
            Value::Uint(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::Slice(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        match i64::try_from(u) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Uint(u),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Slice(items.into_iter().map(Into::into).collect())
    }
}

/// Renders the value in marker literal syntax, quoting every string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Slice(items) => {
                write!(f, "{{")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "}}")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (idx, (key, value)) in entries.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{:?}:{}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_literal_syntax() {
        let mut entries = BTreeMap::new();
        entries.insert("key".to_string(), Value::from(vec![1i64, 2]));
        entries.insert("name".to_string(), Value::from("a,b"));
        assert_eq!(
            Value::Map(entries).to_string(),
            r#"{"key":{1,2},"name":"a,b"}"#
        );
    }

    #[test]
    fn test_unsigned_above_signed_range() {
        assert_eq!(Value::from(7u64), Value::Int(7));
        let max = Value::from(u64::MAX);
        assert_eq!(max, Value::Uint(u64::MAX));
        assert_eq!(max.as_uint(), Some(u64::MAX));
        assert_eq!(max.as_int(), None);
        assert_eq!(max.to_string(), "18446744073709551615");
        assert_eq!(serde_json::to_string(&max).unwrap(), "18446744073709551615");
    }

    #[test]
    fn test_serializes_untagged() {
        let value = Value::from(vec![Value::Bool(true), Value::Int(-3), Value::Null]);
        assert_eq!(serde_json::to_string(&value).unwrap(), "[true,-3,null]");
    }
}
