//! Stored value model
//!
//! Every entry in a slot is one of four JSON scalars. Richer types are layered
//! on top through [`IntoValue`] and [`FromValue`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SaveError, SaveResult};

/// A single stored value
///
/// Serialized untagged so the slot payload is a plain JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Short name of the variant, used in listings and error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
        }
    }

    /// Reject values JSON cannot represent
    pub fn validate(&self) -> SaveResult<()> {
        match self {
            Value::Float(f) if !f.is_finite() => Err(SaveError::Validation(format!(
                "Float value {} cannot be stored",
                f
            ))),
            _ => Ok(()),
        }
    }

    /// Parse a CLI-style literal into a value of the named type
    pub fn parse_typed(input: &str, type_name: &str) -> SaveResult<Self> {
        let invalid = || {
            SaveError::Validation(format!("'{}' is not a valid {}", input, type_name))
        };

        match type_name.to_lowercase().as_str() {
            "string" | "str" => Ok(Value::String(input.to_string())),
            "int" | "integer" => input.trim().parse().map(Value::Int).map_err(|_| invalid()),
            "float" | "number" => {
                let value = Value::Float(input.trim().parse().map_err(|_| invalid())?);
                value.validate()?;
                Ok(value)
            }
            "bool" | "boolean" => parse_bool(input).map(Value::Bool).ok_or_else(invalid),
            other => Err(SaveError::Validation(format!(
                "Unknown value type: '{}'. Valid types: string, int, float, bool",
                other
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

/// Case-insensitive `true`/`false`
pub(crate) fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Conversion into a stored value
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Conversion out of a stored value
///
/// Returns `None` when the stored value has no sensible reading as `Self`.
pub trait FromValue: Sized {
    /// Name used in conversion errors
    const TYPE_NAME: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    const TYPE_NAME: &'static str = "value";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            Value::String(s) => parse_bool(s),
            Value::Float(_) => None,
        }
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl FromValue for i64 {
    const TYPE_NAME: &'static str = "integer";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(*i),
            Value::Float(f) => {
                let in_range = *f >= i64::MIN as f64 && *f < i64::MAX as f64;
                (f.fract() == 0.0 && in_range).then_some(*f as i64)
            }
            Value::Bool(b) => Some(i64::from(*b)),
            Value::String(s) => s.trim().parse().ok(),
        }
    }
}

macro_rules! narrow_int {
    ($($ty:ty),*) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::Int(i64::from(self))
                }
            }

            impl FromValue for $ty {
                const TYPE_NAME: &'static str = "integer";

                fn from_value(value: &Value) -> Option<Self> {
                    i64::from_value(value).and_then(|i| <$ty>::try_from(i).ok())
                }
            }
        )*
    };
}

narrow_int!(i32, u32, u8);

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl FromValue for f64 {
    const TYPE_NAME: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::String(s) => s.trim().parse().ok(),
            Value::Bool(_) => None,
        }
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        // Go through the shortest decimal form so 0.1f32 is stored as 0.1
        let widened = self.to_string().parse().unwrap_or(f64::from(self));
        Value::Float(widened)
    }
}

impl FromValue for f32 {
    const TYPE_NAME: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl FromValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.to_string())
    }
}
