//! Action parameter values.
//!
//! Action parameters are opaque to the dispatcher. Handlers read them through
//! the typed accessors below.
//!
//! ## ParamValue Types
//!
//! - `Number`: Numbers (counts, probabilities, priorities)
//! - `Bool`: Flags (won, once)
//! - `Text`: Strings (messages, expressions, ids)
//! - `List`: Ordered values (choices, nested action lists)
//! - `Map`: Nested parameter bags

use im::OrdMap;
use serde::{Deserialize, Serialize};

/// Ordered parameter bag. Cloning is O(1).
pub type Params = OrdMap<String, ParamValue>;

/// Value for an action parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean flag.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// Text value.
    Text(String),
    /// List of values.
    List(Vec<ParamValue>),
    /// Nested parameters.
    Map(Params),
}

impl ParamValue {
    /// Get as number if this is a Number value.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as bool if this is a Bool value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string reference if this is a Text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as list reference if this is a List value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            ParamValue::List(v) => Some(v),
            _ => None,
        }
    }

    /// Get as map reference if this is a Map value.
    #[must_use]
    pub fn as_map(&self) -> Option<&Params> {
        match self {
            ParamValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Look up a key if this is a Map value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.as_map().and_then(|m| m.get(key))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Number(v as f64)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Number(f64::from(v))
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<Vec<ParamValue>> for ParamValue {
    fn from(v: Vec<ParamValue>) -> Self {
        ParamValue::List(v)
    }
}

impl From<Params> for ParamValue {
    fn from(m: Params) -> Self {
        ParamValue::Map(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(ParamValue::from(3).as_number(), Some(3.0));
        assert_eq!(ParamValue::from(true).as_bool(), Some(true));
        assert_eq!(ParamValue::from("hi").as_text(), Some("hi"));
        assert_eq!(ParamValue::from("hi").as_number(), None);

        let list = ParamValue::from(vec![ParamValue::from(1), ParamValue::from(2)]);
        assert_eq!(list.as_list().map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_nested_map_lookup() {
        let mut inner = Params::new();
        inner.insert("text".to_string(), "Accept".into());
        let choice = ParamValue::from(inner);

        assert_eq!(choice.get("text").and_then(ParamValue::as_text), Some("Accept"));
        assert!(choice.get("missing").is_none());
        assert!(ParamValue::from(1).get("text").is_none());
    }

    #[test]
    fn test_untagged_json_shape() {
        let json = r#"{"message": "Hello", "count": 2, "won": false, "tags": ["a", "b"]}"#;
        let value: ParamValue = serde_json::from_str(json).unwrap();

        assert_eq!(value.get("message").and_then(ParamValue::as_text), Some("Hello"));
        assert_eq!(value.get("count").and_then(ParamValue::as_number), Some(2.0));
        assert_eq!(value.get("won").and_then(ParamValue::as_bool), Some(false));
        assert_eq!(value.get("tags").and_then(ParamValue::as_list).map(<[_]>::len), Some(2));
    }
}
