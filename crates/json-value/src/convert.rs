//! Bridge between [`JsonValue`] and untyped native value graphs.
//!
//! The untyped side is [`serde_json::Value`], the ecosystem's "any"
//! shape for configuration loaders and HTTP clients. Both directions
//! are explicit and fallible; neither silently defaults to `Null`.

use thiserror::Error;

use crate::json::JsonError;
use crate::value::{JsonObject, JsonValue};

#[derive(Debug, Error)]
pub enum BridgeError {
    /// The native value matches none of the accepted shapes; the
    /// message names the offending type or value.
    #[error("unsupported native type: {0}")]
    UnsupportedType(String),
    #[error(transparent)]
    Codec(#[from] JsonError),
}

impl JsonValue {
    /// Convert an untyped native graph into a `JsonValue`.
    ///
    /// Dispatch is a closed match over the six accepted shapes — null,
    /// bool, number, string, sequence, string-keyed mapping — in that
    /// order. Numbers widen to `f64`; a numeric payload with no finite
    /// `f64` reading is rejected rather than coerced.
    ///
    /// Native booleans and numbers are distinct variants here, so the
    /// boxed-boolean ambiguity some runtimes suffer from cannot arise:
    /// a boolean always becomes `Bool`, a number always `Number`.
    pub fn from_any(value: serde_json::Value) -> Result<JsonValue, BridgeError> {
        match value {
            serde_json::Value::Null => Ok(JsonValue::Null),
            serde_json::Value::Bool(b) => Ok(JsonValue::Bool(b)),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => Ok(JsonValue::Number(f)),
                None => Err(BridgeError::UnsupportedType(format!(
                    "number {n} is not representable as f64"
                ))),
            },
            serde_json::Value::String(s) => Ok(JsonValue::String(s)),
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(JsonValue::from_any)
                .collect::<Result<Vec<_>, _>>()
                .map(JsonValue::Array),
            serde_json::Value::Object(fields) => fields
                .into_iter()
                .map(|(key, value)| Ok((key, JsonValue::from_any(value)?)))
                .collect::<Result<JsonObject, BridgeError>>()
                .map(JsonValue::Object),
        }
    }

    /// Convert `self` into an untyped native graph.
    ///
    /// Structural mirror of [`JsonValue::from_any`]. All numbers stay
    /// floating-point on the native side. A non-finite number has no
    /// native representation and fails, like everywhere else in the
    /// codec.
    pub fn to_any(&self) -> Result<serde_json::Value, BridgeError> {
        match self {
            JsonValue::Null => Ok(serde_json::Value::Null),
            JsonValue::Bool(b) => Ok(serde_json::Value::Bool(*b)),
            JsonValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .ok_or(BridgeError::Codec(JsonError::NonFiniteNumber(*n))),
            JsonValue::String(s) => Ok(serde_json::Value::String(s.clone())),
            JsonValue::Array(items) => items
                .iter()
                .map(JsonValue::to_any)
                .collect::<Result<Vec<_>, _>>()
                .map(serde_json::Value::Array),
            JsonValue::Object(fields) => fields
                .iter()
                .map(|(key, value)| Ok((key.clone(), value.to_any()?)))
                .collect::<Result<serde_json::Map<String, serde_json::Value>, BridgeError>>()
                .map(serde_json::Value::Object),
        }
    }
}

// URL-like scalars stringify.

impl From<url::Url> for JsonValue {
    fn from(value: url::Url) -> Self {
        JsonValue::String(value.into())
    }
}

impl From<&url::Url> for JsonValue {
    fn from(value: &url::Url) -> Self {
        JsonValue::String(value.as_str().to_owned())
    }
}
