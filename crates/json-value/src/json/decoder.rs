//! JSON text decoder.

use serde::Deserialize as _;

use super::error::JsonError;
use crate::value::JsonValue;

/// Decoder from JSON bytes/text into [`JsonValue`] trees.
///
/// Strict RFC 8259: no comments, no trailing commas, a single
/// top-level value. Every numeric literal decodes to `Number(f64)`.
/// Malformed input always surfaces as [`JsonError::Malformed`]; the
/// decoder never falls back to `Null`.
#[derive(Debug, Default)]
pub struct JsonDecoder;

impl JsonDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode one JSON document from UTF-8 bytes.
    pub fn decode(&mut self, data: &[u8]) -> Result<JsonValue, JsonError> {
        let mut de = serde_json::Deserializer::from_slice(data);
        let value = JsonValue::deserialize(&mut de)?;
        de.end()?;
        Ok(value)
    }

    /// Decode one JSON document from text.
    pub fn decode_str(&mut self, text: &str) -> Result<JsonValue, JsonError> {
        self.decode(text.as_bytes())
    }
}
