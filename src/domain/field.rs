use serde::de::{Deserialize, Deserializer};
use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Structured fields of an event, keyed by name.
pub type Fields = BTreeMap<String, FieldValue>;

/// Value of a structured field.
///
/// Floats are kept unconverted so NaN and infinities fail serialization
/// instead of being written as `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Json(Value),
    Float(f64),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Json(value) => value.as_str(),
            FieldValue::Float(_) => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Json(value) => value.serialize(serializer),
            FieldValue::Float(value) if value.is_finite() => serializer.serialize_f64(*value),
            FieldValue::Float(value) => Err(S::Error::custom(format!(
                "float value {value} cannot be represented in JSON"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(FieldValue::Json)
    }
}

impl PartialEq<Value> for FieldValue {
    fn eq(&self, other: &Value) -> bool {
        match self {
            FieldValue::Json(value) => value == other,
            FieldValue::Float(value) => other.is_f64() && other.as_f64() == Some(*value),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Json(Value::String(text)) => f.write_str(text),
            FieldValue::Json(value) => write!(f, "{value}"),
            FieldValue::Float(value) => write!(f, "{value}"),
        }
    }
}

macro_rules! json_field_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Json(Value::from(value))
                }
            }
        )*
    };
}

json_field_value!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, String, &str, Value,
);

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Float(f64::from(value))
    }
}
