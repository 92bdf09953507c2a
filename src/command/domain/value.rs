//! Tagged parameter values carried by commands and command results.
//!
//! Parameters arrive as arbitrary JSON from the UI and from AI providers.
//! Rather than passing loosely typed maps around, every value is lifted into
//! [`ParamValue`] so consumers match on the variant they expect.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Ordered mapping from parameter name to value.
pub type ParamMap = BTreeMap<String, ParamValue>;

/// A single parameter value.
///
/// Serialised untagged, so the wire form is plain JSON.
///
/// # Examples
///
/// ```
/// use assistant_core::command::domain::ParamValue;
///
/// let value: ParamValue = serde_json::from_str("[1, \"two\", null]").expect("valid JSON");
/// let items = value.as_list().expect("list");
/// assert_eq!(items.first().and_then(ParamValue::as_i64), Some(1));
/// assert!(items.get(2).is_some_and(ParamValue::is_null));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum ParamValue {
    /// JSON `null`.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// An integral number representable as `i64`.
    Integer(i64),
    /// A non-negative integral number above `i64::MAX`.
    UnsignedInteger(u64),
    /// Any other number.
    Float(f64),
    /// A string.
    String(String),
    /// An ordered list of values.
    List(Vec<ParamValue>),
    /// A nested mapping.
    Map(ParamMap),
}

impl ParamValue {
    /// Returns `true` for [`ParamValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string slice if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer if this is an integer value.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer if it fits in `u64`.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Integer(value) => u64::try_from(*value).ok(),
            Self::UnsignedInteger(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "Widening integer parameters to f64 is the documented behaviour"
    )]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Integer(value) => Some(*value as f64),
            Self::UnsignedInteger(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Returns the items if this is a list value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries if this is a map value.
    #[must_use]
    pub const fn as_map(&self) -> Option<&ParamMap> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Self::UnsignedInteger(value), Self::Integer)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<Self>> for ParamValue {
    fn from(value: Vec<Self>) -> Self {
        Self::List(value)
    }
}

impl From<ParamMap> for ParamValue {
    fn from(value: ParamMap) -> Self {
        Self::Map(value)
    }
}

impl From<Number> for ParamValue {
    fn from(number: Number) -> Self {
        if let Some(integer) = number.as_i64() {
            return Self::Integer(integer);
        }
        if let Some(unsigned) = number.as_u64() {
            return Self::UnsignedInteger(unsigned);
        }
        number.as_f64().map_or(Self::Null, Self::Float)
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(flag),
            Value::Number(number) => Self::from(number),
            Value::String(text) => Self::String(text),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, item)| (key, Self::from(item)))
                    .collect(),
            ),
        }
    }
}

impl From<ParamValue> for Value {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Null => Self::Null,
            ParamValue::Bool(flag) => Self::Bool(flag),
            ParamValue::Integer(integer) => Self::from(integer),
            ParamValue::UnsignedInteger(unsigned) => Self::from(unsigned),
            ParamValue::Float(float) => Number::from_f64(float).map_or(Self::Null, Self::Number),
            ParamValue::String(text) => Self::String(text),
            ParamValue::List(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            ParamValue::Map(entries) => Self::Object(
                entries
                    .into_iter()
                    .map(|(key, item)| (key, Self::from(item)))
                    .collect(),
            ),
        }
    }
}
