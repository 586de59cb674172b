//! Raw host values accepted by term builders, and the datum payload a
//! literal term carries.

use std::collections::{BTreeMap, HashMap};
use std::time::SystemTime;

use base64::Engine;
use indexmap::IndexMap;
use serde_json::Number;

use crate::term::Term;

/// Literal payload of a `DATUM` term. Numbers are always finite.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Raw bytes, sent as the `BINARY` pseudo-type
    Binary(Vec<u8>),
}

impl Datum {
    /// Wire form of the payload
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Datum::Null => serde_json::Value::Null,
            Datum::Bool(b) => serde_json::Value::Bool(*b),
            Datum::Number(n) => serde_json::Value::Number(n.clone()),
            Datum::String(s) => serde_json::Value::String(s.clone()),
            Datum::Binary(bytes) => serde_json::json!({
                "$reql_type$": "BINARY",
                "data": base64::engine::general_purpose::STANDARD.encode(bytes),
            }),
        }
    }
}

/// A host value before lifting.
///
/// Builders accept `impl Into<Value>`; lifting turns each variant into a
/// term (see [`Term::lift`]).
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Binary(Vec<u8>),
    /// Lifted to an `EPOCH_TIME` term
    Time(SystemTime),
    Array(Vec<Value>),
    /// Entries in caller order; keys must be unique
    Object(Vec<(String, Value)>),
    /// An already-built term, inserted as is
    Term(Term),
}

impl Value {
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Value {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn array<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Value {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    pub fn binary(bytes: impl Into<Vec<u8>>) -> Value {
        Value::Binary(bytes.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::UInt(_) | Value::Float(_) => "number",
            Value::String(_) => "string",
            Value::Binary(_) => "binary",
            Value::Time(_) => "time",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Term(_) => "term",
        }
    }
}

macro_rules! from_int {
    ($variant:ident, $target:ty: $($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::$variant(<$target>::from(n))
            }
        })*
    };
}

from_int!(Int, i64: i8, i16, i32, i64, u8, u16, u32);
from_int!(UInt, u64: u64);

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::UInt(n as u64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
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

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<SystemTime> for Value {
    fn from(t: SystemTime) -> Self {
        Value::Time(t)
    }
}

impl From<Term> for Value {
    fn from(t: Term) -> Self {
        Value::Term(t)
    }
}

impl From<&Term> for Value {
    fn from(t: &Term) -> Self {
        Value::Term(t.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::array(items)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::array(items)
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(map: BTreeMap<String, T>) -> Self {
        Value::object(map.into_iter().map(|(k, v)| (k, v.into())))
    }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(map: HashMap<String, T>) -> Self {
        Value::object(map.into_iter().map(|(k, v)| (k, v.into())))
    }
}

impl<T: Into<Value>> From<IndexMap<String, T>> for Value {
    fn from(map: IndexMap<String, T>) -> Self {
        Value::object(map.into_iter().map(|(k, v)| (k, v.into())))
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::array(items),
            serde_json::Value::Object(map) => Value::object(map.into_iter().map(|(k, v)| (k, v.into()))),
        }
    }
}

/// Build a `Vec<Value>` from heterogeneous arguments.
///
/// ```ignore
/// let args = reql::args![r::table("users")?, 10, "name"];
/// ```
#[macro_export]
macro_rules! args {
    ($($value:expr),* $(,)?) => {
        ::std::vec![$($crate::Value::from($value)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_datum_uses_pseudo_type() {
        let json = Datum::Binary(b"hi".to_vec()).to_json();
        assert_eq!(json["$reql_type$"], "BINARY");
        assert_eq!(json["data"], "aGk=");
    }

    #[test]
    fn json_numbers_keep_their_kind() {
        assert!(matches!(Value::from(serde_json::json!(3)), Value::Int(3)));
        assert!(matches!(Value::from(serde_json::json!(u64::MAX)), Value::UInt(u64::MAX)));
        assert!(matches!(Value::from(serde_json::json!(1.5)), Value::Float(f) if f == 1.5));
    }

    #[test]
    fn option_none_is_null() {
        assert!(matches!(Value::from(None::<i64>), Value::Null));
        assert!(matches!(Value::from(Some("x")), Value::String(s) if s == "x"));
    }

    #[test]
    fn args_macro_mixes_kinds() {
        let args = crate::args![1, "two", true, ()];
        let kinds: Vec<_> = args.iter().map(Value::kind).collect();
        assert_eq!(kinds, ["number", "string", "bool", "null"]);
    }
}
