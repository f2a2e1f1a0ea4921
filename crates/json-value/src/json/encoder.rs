//! JSON text encoder.
//!
//! Produces RFC 8259 output from a [`JsonValue`]: compact by default,
//! optionally indented and/or with object keys in sorted order.

use std::fmt::{self, Write as _};

use super::error::JsonError;
use crate::value::JsonValue;

const INDENT: &str = "  ";

/// Output formatting switches. Both off is the compact default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Indented multi-line output.
    pub pretty: bool,
    /// Emit object keys in lexicographic order instead of insertion
    /// order.
    pub sorted_keys: bool,
}

impl WriteOptions {
    pub fn compact() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }

    pub fn sorted() -> Self {
        Self {
            sorted_keys: true,
            ..Self::default()
        }
    }
}

/// Encoder for [`JsonValue`] trees.
#[derive(Debug, Default)]
pub struct JsonEncoder {
    options: WriteOptions,
}

impl JsonEncoder {
    /// Compact encoder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Encode `value` as UTF-8 JSON bytes.
    ///
    /// Fails with [`JsonError::NonFiniteNumber`] when the tree contains
    /// a NaN or infinite number; no partial output is returned.
    pub fn encode(&mut self, value: &JsonValue) -> Result<Vec<u8>, JsonError> {
        Ok(self.encode_string(value)?.into_bytes())
    }

    /// Encode `value` as a JSON string.
    pub fn encode_string(&mut self, value: &JsonValue) -> Result<String, JsonError> {
        let mut out = String::with_capacity(64);
        self.write_value(&mut out, value, 0)?;
        Ok(out)
    }

    fn write_value(
        &self,
        out: &mut String,
        value: &JsonValue,
        depth: usize,
    ) -> Result<(), JsonError> {
        match value {
            JsonValue::Null => out.push_str("null"),
            JsonValue::Bool(true) => out.push_str("true"),
            JsonValue::Bool(false) => out.push_str("false"),
            JsonValue::Number(n) => {
                if !n.is_finite() {
                    return Err(JsonError::NonFiniteNumber(*n));
                }
                // Shortest round-trip form; integer-valued doubles
                // print without a fraction (1.0 -> "1").
                let _ = write!(out, "{n}");
            }
            JsonValue::String(s) => write_escaped(out, s),
            JsonValue::Array(items) => {
                if items.is_empty() {
                    out.push_str("[]");
                    return Ok(());
                }
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.write_break(out, depth + 1);
                    self.write_value(out, item, depth + 1)?;
                }
                self.write_break(out, depth);
                out.push(']');
            }
            JsonValue::Object(fields) => {
                if fields.is_empty() {
                    out.push_str("{}");
                    return Ok(());
                }
                out.push('{');
                let mut entries: Vec<(&String, &JsonValue)> = fields.iter().collect();
                if self.options.sorted_keys {
                    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
                }
                for (i, (key, item)) in entries.into_iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.write_break(out, depth + 1);
                    write_escaped(out, key);
                    out.push(':');
                    if self.options.pretty {
                        out.push(' ');
                    }
                    self.write_value(out, item, depth + 1)?;
                }
                self.write_break(out, depth);
                out.push('}');
            }
        }
        Ok(())
    }

    fn write_break(&self, out: &mut String, depth: usize) {
        if self.options.pretty {
            out.push('\n');
            for _ in 0..depth {
                out.push_str(INDENT);
            }
        }
    }
}

fn write_escaped(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl JsonValue {
    /// Compact JSON text for `self`.
    ///
    /// This is the fail-soft convenience formatter: an unencodable tree
    /// (non-finite number) yields `""`. Use [`JsonEncoder::encode`] when
    /// the failure matters.
    pub fn to_json_string(&self) -> String {
        self.to_json_string_with(WriteOptions::compact())
    }

    /// JSON text for `self` under `options`, `""` on encode failure.
    pub fn to_json_string_with(&self, options: WriteOptions) -> String {
        JsonEncoder::with_options(options)
            .encode_string(self)
            .unwrap_or_default()
    }
}

/// Formats as compact JSON through the fail-soft convenience path:
/// like [`JsonValue::to_json_string`], an unencodable tree (non-finite
/// number) renders as the empty string rather than an error. Use
/// [`JsonEncoder::encode`] when the failure must be observable.
impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_control_characters() {
        let value = JsonValue::from("a\"b\\c\n\t\u{0001}");
        assert_eq!(
            value.to_json_string(),
            "\"a\\\"b\\\\c\\n\\t\\u0001\""
        );
    }

    #[test]
    fn integer_valued_numbers_have_no_fraction() {
        assert_eq!(JsonValue::Number(1.0).to_json_string(), "1");
        assert_eq!(JsonValue::Number(-2.0).to_json_string(), "-2");
        assert_eq!(JsonValue::Number(1.5).to_json_string(), "1.5");
    }

    #[test]
    fn non_finite_number_fails_strict_entry() {
        let mut encoder = JsonEncoder::new();
        let err = encoder.encode(&JsonValue::Number(f64::NAN)).unwrap_err();
        assert!(matches!(err, JsonError::NonFiniteNumber(_)));
    }

    #[test]
    fn non_finite_number_is_swallowed_by_convenience_formatter() {
        assert_eq!(JsonValue::Number(f64::INFINITY).to_json_string(), "");
    }

    #[test]
    fn display_inherits_convenience_masking() {
        assert_eq!(format!("{}", JsonValue::Number(1.0)), "1");
        assert_eq!(format!("{}", JsonValue::Number(f64::NAN)), "");
    }

    #[test]
    fn pretty_output_indents_two_spaces() {
        let mut fields = crate::JsonObject::new();
        fields.insert("a".to_owned(), JsonValue::from(vec![JsonValue::from(1.0)]));
        let value = JsonValue::Object(fields);
        assert_eq!(
            value.to_json_string_with(WriteOptions::pretty()),
            "{\n  \"a\": [\n    1\n  ]\n}"
        );
    }

    #[test]
    fn sorted_mode_orders_keys() {
        let mut fields = crate::JsonObject::new();
        fields.insert("b".to_owned(), JsonValue::from(2.0));
        fields.insert("a".to_owned(), JsonValue::from(1.0));
        assert_eq!(
            JsonValue::Object(fields.clone()).to_json_string(),
            "{\"b\":2,\"a\":1}"
        );
        assert_eq!(
            JsonValue::Object(fields).to_json_string_with(WriteOptions::sorted()),
            "{\"a\":1,\"b\":2}"
        );
    }
}
