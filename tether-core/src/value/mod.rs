//! Dynamic Value Model
//!
//! Store state, dispatched actions, projected props, and effect dependency
//! lists all share one dynamic value type. This mirrors the shape of data in
//! an external observable store: nulls, booleans, floating-point numbers,
//! strings, ordered lists, string-keyed maps, and callables.
//!
//! # Reference Semantics
//!
//! Structured variants (`List`, `Map`) and callables are stored behind `Arc`.
//! Cloning a value is cheap and preserves identity: two clones of the same
//! list are *the same* list as far as the equality primitive is concerned,
//! while two structurally identical lists built separately are not. The
//! shallow-equality contract (see [`equality`]) depends on this.
//!
//! # Serialization
//!
//! `Value` implements `Serialize` and `Deserialize`. Callables and
//! non-finite numbers serialize as `null`, matching what `JSON.stringify`
//! does with the equivalent data. Deserialization never produces a `Func`.

mod equality;

pub use equality::{deps_equal, identical, shallow_equal};

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A callable value. Compared by identity, never by contents.
pub type Callable = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// A dynamic value: store state, action, props, or effect dependency.
#[derive(Clone)]
pub enum Value {
    /// The absence of a value. Also the "rendered with no props" sentinel.
    Null,
    Bool(bool),
    /// All numbers are f64, including the distinct `+0.0` / `-0.0` and NaN.
    Number(f64),
    Str(Arc<str>),
    /// Ordered sequence. Shared, so nested lists have reference identity.
    List(Arc<Vec<Value>>),
    /// Insertion-ordered map. Shared, so nested maps have reference identity.
    Map(Arc<IndexMap<String, Value>>),
    /// A callable, e.g. an event handler placed in props.
    Func(Callable),
}

impl Value {
    /// Build a map value from key/value entries, preserving entry order.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(Arc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Build a list value.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Value::List(Arc::new(items.into_iter().collect()))
    }

    /// Wrap a callable as a value.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Value::Func(Arc::new(f))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a key in a map value. Returns `None` for non-map values.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Index into a list value. Returns `None` for non-list values.
    pub fn at(&self, index: usize) -> Option<&Value> {
        match self {
            Value::List(items) => items.get(index),
            _ => None,
        }
    }

    /// Invoke a callable value. Returns `None` for non-callable values.
    pub fn call(&self, args: &[Value]) -> Option<Value> {
        match self {
            Value::Func(f) => Some((**f)(args)),
            _ => None,
        }
    }

    /// Convert to a `serde_json::Value`. Callables and non-finite numbers
    /// become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(self)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Value::Func(_) => f.write_str("Func(<callable>)"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<serde_json::Value> for Value {
    fn from(raw: serde_json::Value) -> Self {
        match raw {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                Value::Number(n.as_f64().unwrap_or(f64::NAN))
            }
            serde_json::Value::String(s) => Value::Str(Arc::from(s)),
            serde_json::Value::Array(items) => {
                Value::List(Arc::new(items.into_iter().map(Value::from).collect()))
            }
            serde_json::Value::Object(entries) => Value::Map(Arc::new(
                entries.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            )),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s.to_string()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
            Value::Func(_) => serde_json::Value::Null,
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            // NaN and infinities are not representable in JSON.
            Value::Number(_) => serializer.serialize_unit(),
            Value::Str(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, item) in entries.iter() {
                    map.serialize_entry(key, item)?;
                }
                map.end()
            }
            Value::Func(_) => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(Value::from(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_preserves_entry_order() {
        let value = Value::object([
            ("z", Value::from(1)),
            ("a", Value::from(2)),
            ("m", Value::from(3)),
        ]);

        match &value {
            Value::Map(entries) => {
                let keys: Vec<&str> = entries.keys().map(|k| k.as_str()).collect();
                assert_eq!(keys, vec!["z", "a", "m"]);
            }
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn get_and_at_accessors() {
        let value = Value::object([("items", Value::list([Value::from("a"), Value::from("b")]))]);

        let items = value.get("items").expect("key present");
        assert_eq!(items.at(1).and_then(|v| v.as_str()), Some("b"));
        assert!(value.get("missing").is_none());
        assert!(value.at(0).is_none());
    }

    #[test]
    fn call_invokes_callable() {
        let double = Value::func(|args| {
            Value::from(args.first().and_then(|v| v.as_f64()).unwrap_or(0.0) * 2.0)
        });

        let result = double.call(&[Value::from(21)]).expect("callable");
        assert_eq!(result.as_f64(), Some(42.0));

        assert!(Value::Null.call(&[]).is_none());
    }

    #[test]
    fn clone_shares_identity() {
        let map = Value::object([("a", Value::from(1))]);
        let clone = map.clone();

        assert!(identical(&map, &clone));
    }

    #[test]
    fn json_round_trip() {
        let raw: serde_json::Value = serde_json::json!({
            "count": 3.0,
            "label": "items",
            "nested": { "flag": true },
            "list": [1.0, null]
        });

        let value = Value::from(raw.clone());
        assert_eq!(value.get("count").and_then(|v| v.as_f64()), Some(3.0));
        assert_eq!(value.to_json(), raw);
    }

    #[test]
    fn func_serializes_as_null() {
        let value = Value::object([("handler", Value::func(|_| Value::Null))]);
        assert_eq!(value.to_json(), serde_json::json!({ "handler": null }));
    }

    #[test]
    fn nan_serializes_as_null() {
        let value = Value::from(f64::NAN);
        assert_eq!(value.to_json(), serde_json::Value::Null);
    }

    #[test]
    fn deserializes_from_json_text() {
        let value: Value = serde_json::from_str(r#"{"count": 1}"#).expect("valid json");
        assert_eq!(value.get("count").and_then(|v| v.as_f64()), Some(1.0));
    }
}
