//! Property value types for graph nodes and edges
//!
//! Properties are scalar: string, integer, float, boolean or null. Structured
//! values arriving from the service (arrays, objects) are kept as their JSON
//! text so a node never fails to load because of one exotic field.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Scalar property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl PropertyValue {
    /// Get string value if this is a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "{}", s),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Float(fl) => write!(f, "{}", fl),
            PropertyValue::Boolean(b) => write!(f, "{}", b),
            PropertyValue::Null => write!(f, "null"),
        }
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Boolean(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => PropertyValue::Integer(i),
                None => PropertyValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => PropertyValue::String(s),
            structured @ (Value::Array(_) | Value::Object(_)) => {
                PropertyValue::String(structured.to_string())
            }
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyValue::String(s) => serializer.serialize_str(s),
            PropertyValue::Integer(i) => serializer.serialize_i64(*i),
            PropertyValue::Float(f) => serializer.serialize_f64(*f),
            PropertyValue::Boolean(b) => serializer.serialize_bool(*b),
            PropertyValue::Null => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(serde_json::Value::deserialize(deserializer)?.into())
    }
}

// Convenience conversions
impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::Integer(i as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

/// Property map for node and edge properties, ordered by key for stable display
pub type PropertyMap = BTreeMap<String, PropertyValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_value_conversions() {
        let string_prop: PropertyValue = "hello".into();
        assert_eq!(string_prop.as_string(), Some("hello"));

        assert_eq!(PropertyValue::from(42i64), PropertyValue::Integer(42));
        assert_eq!(PropertyValue::from(7i32), PropertyValue::Integer(7));
        assert_eq!(PropertyValue::from(2.5), PropertyValue::Float(2.5));
        assert_eq!(PropertyValue::from(true), PropertyValue::Boolean(true));
        assert_eq!(PropertyValue::Integer(42).as_string(), None);
    }

    #[test]
    fn test_deserialize_json_scalars() {
        let props: PropertyMap = serde_json::from_str(
            r#"{"name": "Alice", "age": 30, "score": 0.5, "active": false, "manager": null}"#,
        )
        .unwrap();

        assert_eq!(props["name"].as_string(), Some("Alice"));
        assert_eq!(props["age"], PropertyValue::Integer(30));
        assert_eq!(props["score"], PropertyValue::Float(0.5));
        assert_eq!(props["active"], PropertyValue::Boolean(false));
        assert_eq!(props["manager"], PropertyValue::Null);
    }

    #[test]
    fn test_structured_values_flatten_to_json_text() {
        let props: PropertyMap =
            serde_json::from_str(r#"{"tags": ["a", "b"], "meta": {"k": 1}}"#).unwrap();

        assert_eq!(props["tags"].as_string(), Some(r#"["a","b"]"#));
        assert_eq!(props["meta"].as_string(), Some(r#"{"k":1}"#));
    }

    #[test]
    fn test_serialize_as_plain_json() {
        let mut props = PropertyMap::new();
        props.insert("age".to_string(), 30i64.into());
        props.insert("name".to_string(), "Alice".into());
        props.insert("none".to_string(), PropertyValue::Null);

        let json = serde_json::to_string(&props).unwrap();
        assert_eq!(json, r#"{"age":30,"name":"Alice","none":null}"#);
    }
}
