//! Dynamically-typed JSON values with a round-trip-safe wire codec.
//!
//! The crate centers on [`JsonValue`], a six-variant tagged union for
//! loosely-structured JSON data: build request payloads or pick apart
//! arbitrary API responses without declaring types up front. Around it:
//!
//! - [`json::JsonDecoder`] / [`json::JsonEncoder`] — strict RFC 8259
//!   text codec with compact, pretty, and sorted-key output modes.
//! - an untyped bridge to and from [`serde_json::Value`] graphs
//!   ([`JsonValue::from_any`] / [`JsonValue::to_any`]).
//! - a strongly-typed bridge to any serde type
//!   ([`JsonValue::from_typed`] / [`JsonValue::to_typed`]).
//!
//! All numbers are `f64`; object key order is insertion order but never
//! significant for equality.

mod convert;
mod serde_support;
mod value;

pub mod json;

pub use convert::BridgeError;
pub use json::{JsonDecoder, JsonEncoder, JsonError, WriteOptions};
pub use value::{JsonObject, JsonValue};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_inspect_format() {
        let mut payload = JsonValue::Object(JsonObject::new());
        payload.insert("name", "Guilherme");
        payload.insert("tags", vec![JsonValue::from("a"), JsonValue::from("b")]);
        assert_eq!(payload["name"].as_str(), Some("Guilherme"));
        assert_eq!(
            payload.to_json_string(),
            "{\"name\":\"Guilherme\",\"tags\":[\"a\",\"b\"]}"
        );
    }

    #[test]
    fn decode_mutate_encode() {
        let mut decoder = JsonDecoder::new();
        let mut value = decoder.decode(b"{\"id\":\"uuid\",\"n\":1}").unwrap();
        value.set_key("id", None);
        value.insert("n", 2.0);
        assert_eq!(value.to_json_string(), "{\"n\":2}");
    }
}
