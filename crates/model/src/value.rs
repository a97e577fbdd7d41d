use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde_json::{Number, Value};

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A dynamically typed value passed to, or returned from, a tool.
///
/// Each JSON kind maps to exactly one case. Numbers that can't be
/// represented as `f64` fall back to `Null`.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ArgValue {
    /// Absence of a value.
    #[default]
    Null,
    /// A number.
    Number(f64),
    /// A string.
    String(String),
    /// A boolean.
    Bool(bool),
    /// A nested object.
    Object(BTreeMap<String, ArgValue>),
    /// An array.
    Array(Vec<ArgValue>),
}

impl ArgValue {
    /// Returns the string if this is a string value.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a number value.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean value.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns `true` if the value is `Null`.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, ArgValue::Null)
    }

    /// Converts the value back to JSON.
    pub fn to_json(&self) -> Value {
        match self {
            ArgValue::Null => Value::Null,
            // Integral numbers are written without a fractional part.
            ArgValue::Number(n) if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER => {
                Value::Number(Number::from(*n as i64))
            }
            ArgValue::Number(n) => {
                Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null)
            }
            ArgValue::String(s) => Value::String(s.clone()),
            ArgValue::Bool(b) => Value::Bool(*b),
            ArgValue::Object(map) => Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            ArgValue::Array(items) => {
                Value::Array(items.iter().map(ArgValue::to_json).collect())
            }
        }
    }
}

impl From<Value> for ArgValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ArgValue::Null,
            Value::Bool(b) => ArgValue::Bool(b),
            Value::Number(n) => n.as_f64().map_or(ArgValue::Null, ArgValue::Number),
            Value::String(s) => ArgValue::String(s),
            Value::Array(items) => {
                ArgValue::Array(items.into_iter().map(ArgValue::from).collect())
            }
            Value::Object(map) => ArgValue::Object(
                map.into_iter().map(|(k, v)| (k, ArgValue::from(v))).collect(),
            ),
        }
    }
}

impl From<&str> for ArgValue {
    #[inline]
    fn from(value: &str) -> Self {
        ArgValue::String(value.to_owned())
    }
}

impl From<String> for ArgValue {
    #[inline]
    fn from(value: String) -> Self {
        ArgValue::String(value)
    }
}

impl From<f64> for ArgValue {
    #[inline]
    fn from(value: f64) -> Self {
        ArgValue::Number(value)
    }
}

impl From<bool> for ArgValue {
    #[inline]
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

/// Strings are written as-is, everything else as JSON text.
impl Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::String(s) => f.write_str(s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_json() {
        let value = ArgValue::from(json!({
            "city": "Paris",
            "days": 3,
            "metric": true,
            "extra": null,
            "tags": ["a", 1],
        }));
        let ArgValue::Object(map) = value else {
            panic!("expected an object");
        };
        assert_eq!(map["city"].as_str(), Some("Paris"));
        assert_eq!(map["days"].as_f64(), Some(3.0));
        assert_eq!(map["metric"].as_bool(), Some(true));
        assert!(map["extra"].is_null());
        assert_eq!(
            map["tags"],
            ArgValue::Array(vec![ArgValue::from("a"), ArgValue::Number(1.0)])
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ArgValue::from("plain").to_string(), "plain");
        assert_eq!(ArgValue::Bool(false).to_string(), "false");
        assert_eq!(ArgValue::Null.to_string(), "null");
        assert_eq!(ArgValue::Number(25.0).to_string(), "25");
        assert_eq!(ArgValue::Number(0.5).to_string(), "0.5");
        let object = ArgValue::from(json!({ "x": "y" }));
        assert_eq!(object.to_string(), r#"{"x":"y"}"#);
    }
}
