//! In-memory value store for one slot
//!
//! The store is a plain map; it knows how to turn itself into the JSON
//! payload that gets encrypted, and back. Persisting after each change is the
//! slot manager's job.

use std::collections::BTreeMap;

use crate::error::{SaveError, SaveResult};
use crate::models::{decode_array, Composite, FromValue, IntoValue, Value};

/// Key → value map for the active slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueStore {
    values: BTreeMap<String, Value>,
}

impl ValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate from a decrypted JSON payload
    pub fn from_json_bytes(bytes: &[u8]) -> SaveResult<Self> {
        let values: BTreeMap<String, Value> = serde_json::from_slice(bytes)
            .map_err(|e| SaveError::SerializationFailed(e.to_string()))?;
        Ok(Self { values })
    }

    /// Serialize to the JSON payload
    pub fn to_json_bytes(&self) -> SaveResult<Vec<u8>> {
        serde_json::to_vec(&self.values).map_err(|e| SaveError::SerializationFailed(e.to_string()))
    }

    /// Raw stored value
    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Read a value as `T`, or `default` if it is missing or unconvertible
    pub fn get<T: FromValue>(&self, key: &str, default: T) -> T {
        match self.try_get(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                log::warn!("{}; using default", e);
                default
            }
        }
    }

    /// Read a value as `T`, reporting conversion failures
    pub fn try_get<T: FromValue>(&self, key: &str) -> SaveResult<Option<T>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(value) => T::from_value(value)
                .map(Some)
                .ok_or_else(|| SaveError::KeyConversionFailed {
                    key: key.to_string(),
                    expected: T::TYPE_NAME,
                }),
        }
    }

    /// Read an array, substituting per-element defaults
    ///
    /// A missing key, a non-string value, or an empty string yields the whole
    /// `defaults` array (or an empty one). Otherwise elements that fail to
    /// parse take `defaults[i]`, or the element type's zero value.
    pub fn get_array<T: Composite>(&self, key: &str, defaults: Option<&[T]>) -> Vec<T> {
        let whole_default = || defaults.map(<[T]>::to_vec).unwrap_or_default();

        match self.values.get(key) {
            Some(Value::String(s)) => decode_array(s, defaults).unwrap_or_else(whole_default),
            Some(other) => {
                log::warn!(
                    "Value for key '{}' is a {}, not a {} array; using default",
                    key,
                    other.type_name(),
                    <T as Composite>::TYPE_NAME
                );
                whole_default()
            }
            None => whole_default(),
        }
    }

    /// Insert or overwrite a value
    pub fn set<T: IntoValue>(&mut self, key: &str, value: T) -> SaveResult<()> {
        let value = value.into_value();
        value.validate()?;
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Remove a key; returns whether it was present
    pub fn delete(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    /// Flip a bool (a missing key counts as `false`); returns the new value
    pub fn toggle_bool(&mut self, key: &str) -> SaveResult<bool> {
        let flipped = !self.get(key, false);
        self.set(key, flipped)?;
        Ok(flipped)
    }

    /// Keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Entries in key order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
