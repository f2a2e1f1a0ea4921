//! Serde integration.
//!
//! [`JsonValue`] serializes to whatever self-describing format drives
//! the serializer and deserializes from any self-describing input,
//! which is what powers both the wire decoder and the strongly-typed
//! bridge ([`JsonValue::from_typed`] / [`JsonValue::to_typed`]).

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, Impossible, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::convert::BridgeError;
use crate::json::{JsonEncoder, JsonError};
use crate::value::{JsonObject, JsonValue};

// Integer-valued doubles inside this band are exact; emit them as
// integers so downstream integer fields accept them.
const EXACT_INT_BOUND: f64 = 9_007_199_254_740_992.0; // 2^53

impl Serialize for JsonValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JsonValue::Null => serializer.serialize_unit(),
            JsonValue::Bool(b) => serializer.serialize_bool(*b),
            JsonValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() <= EXACT_INT_BOUND {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            JsonValue::String(s) => serializer.serialize_str(s),
            JsonValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            JsonValue::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

struct JsonValueVisitor;

impl<'de> Visitor<'de> for JsonValueVisitor {
    type Value = JsonValue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<JsonValue, E> {
        Ok(JsonValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<JsonValue, E> {
        Ok(JsonValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<JsonValue, D::Error> {
        JsonValue::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<JsonValue, E> {
        Ok(JsonValue::Bool(value))
    }

    // Every numeric shape lands in f64.

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<JsonValue, E> {
        Ok(JsonValue::Number(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<JsonValue, E> {
        Ok(JsonValue::Number(value as f64))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<JsonValue, E> {
        Ok(JsonValue::Number(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<JsonValue, E> {
        Ok(JsonValue::String(value.to_owned()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<JsonValue, E> {
        Ok(JsonValue::String(value))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<JsonValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(JsonValue::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<JsonValue, A::Error> {
        let mut fields = JsonObject::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, JsonValue>()? {
            fields.insert(key, value);
        }
        Ok(JsonValue::Object(fields))
    }
}

impl<'de> Deserialize<'de> for JsonValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<JsonValue, D::Error> {
        deserializer.deserialize_any(JsonValueVisitor)
    }
}

// ---- Strongly-typed bridge -------------------------------------------
//
// The outbound direction round-trips through JSON bytes. The inbound
// direction drives the source type's `Serialize` impl into a
// `JsonValue` tree directly: a text writer would render NaN/infinity
// as the `null` token, and a bridge failure must never silently
// default to `Null`. Both directions fail with the codec's error
// classes and share its number normalization.

impl JsonValue {
    /// Build a `JsonValue` from any serializable `value`.
    ///
    /// Shapes JSON cannot express fail instead of degrading: composite
    /// map keys yield [`BridgeError::UnsupportedType`], non-finite
    /// floats yield [`JsonError::NonFiniteNumber`] exactly like the
    /// encoder does.
    pub fn from_typed<T: Serialize>(value: &T) -> Result<JsonValue, BridgeError> {
        value.serialize(ValueSerializer)
    }

    /// Decode `self` into any deserializable target type.
    pub fn to_typed<T: serde::de::DeserializeOwned>(&self) -> Result<T, BridgeError> {
        let bytes = JsonEncoder::new().encode(self)?;
        Ok(serde_json::from_slice(&bytes).map_err(JsonError::Malformed)?)
    }
}

impl ser::Error for BridgeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        BridgeError::UnsupportedType(msg.to_string())
    }
}

/// Serializer that assembles a [`JsonValue`] tree from any `Serialize`
/// source, enforcing the codec's limits on the way in.
struct ValueSerializer;

impl Serializer for ValueSerializer {
    type Ok = JsonValue;
    type Error = BridgeError;

    type SerializeSeq = SerializeArray;
    type SerializeTuple = SerializeArray;
    type SerializeTupleStruct = SerializeArray;
    type SerializeTupleVariant = SerializeVariantArray;
    type SerializeMap = SerializeObject;
    type SerializeStruct = SerializeObject;
    type SerializeStructVariant = SerializeVariantObject;

    fn serialize_bool(self, v: bool) -> Result<JsonValue, BridgeError> {
        Ok(JsonValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<JsonValue, BridgeError> {
        Ok(JsonValue::Number(f64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<JsonValue, BridgeError> {
        Ok(JsonValue::Number(f64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<JsonValue, BridgeError> {
        Ok(JsonValue::Number(f64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<JsonValue, BridgeError> {
        Ok(JsonValue::Number(v as f64))
    }

    fn serialize_u8(self, v: u8) -> Result<JsonValue, BridgeError> {
        Ok(JsonValue::Number(f64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<JsonValue, BridgeError> {
        Ok(JsonValue::Number(f64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<JsonValue, BridgeError> {
        Ok(JsonValue::Number(f64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<JsonValue, BridgeError> {
        Ok(JsonValue::Number(v as f64))
    }

    fn serialize_f32(self, v: f32) -> Result<JsonValue, BridgeError> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<JsonValue, BridgeError> {
        if v.is_finite() {
            Ok(JsonValue::Number(v))
        } else {
            Err(BridgeError::Codec(JsonError::NonFiniteNumber(v)))
        }
    }

    fn serialize_char(self, v: char) -> Result<JsonValue, BridgeError> {
        Ok(JsonValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<JsonValue, BridgeError> {
        Ok(JsonValue::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<JsonValue, BridgeError> {
        Ok(JsonValue::Array(
            v.iter().map(|b| JsonValue::Number(f64::from(*b))).collect(),
        ))
    }

    fn serialize_none(self) -> Result<JsonValue, BridgeError> {
        Ok(JsonValue::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<JsonValue, BridgeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<JsonValue, BridgeError> {
        Ok(JsonValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<JsonValue, BridgeError> {
        Ok(JsonValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<JsonValue, BridgeError> {
        Ok(JsonValue::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<JsonValue, BridgeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<JsonValue, BridgeError> {
        let mut fields = JsonObject::with_capacity(1);
        fields.insert(variant.to_owned(), value.serialize(ValueSerializer)?);
        Ok(JsonValue::Object(fields))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeArray, BridgeError> {
        Ok(SerializeArray {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeArray, BridgeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeArray, BridgeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVariantArray, BridgeError> {
        Ok(SerializeVariantArray {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeObject, BridgeError> {
        Ok(SerializeObject {
            fields: JsonObject::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeObject, BridgeError> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVariantObject, BridgeError> {
        Ok(SerializeVariantObject {
            variant,
            fields: JsonObject::with_capacity(len),
        })
    }
}

struct SerializeArray {
    items: Vec<JsonValue>,
}

impl ser::SerializeSeq for SerializeArray {
    type Ok = JsonValue;
    type Error = BridgeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), BridgeError> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<JsonValue, BridgeError> {
        Ok(JsonValue::Array(self.items))
    }
}

impl ser::SerializeTuple for SerializeArray {
    type Ok = JsonValue;
    type Error = BridgeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), BridgeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<JsonValue, BridgeError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeArray {
    type Ok = JsonValue;
    type Error = BridgeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), BridgeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<JsonValue, BridgeError> {
        ser::SerializeSeq::end(self)
    }
}

struct SerializeVariantArray {
    variant: &'static str,
    items: Vec<JsonValue>,
}

impl ser::SerializeTupleVariant for SerializeVariantArray {
    type Ok = JsonValue;
    type Error = BridgeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), BridgeError> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<JsonValue, BridgeError> {
        let mut fields = JsonObject::with_capacity(1);
        fields.insert(self.variant.to_owned(), JsonValue::Array(self.items));
        Ok(JsonValue::Object(fields))
    }
}

struct SerializeObject {
    fields: JsonObject,
    pending_key: Option<String>,
}

impl ser::SerializeMap for SerializeObject {
    type Ok = JsonValue;
    type Error = BridgeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), BridgeError> {
        self.pending_key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), BridgeError> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| BridgeError::UnsupportedType("map value without a key".to_owned()))?;
        self.fields.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<JsonValue, BridgeError> {
        Ok(JsonValue::Object(self.fields))
    }
}

impl ser::SerializeStruct for SerializeObject {
    type Ok = JsonValue;
    type Error = BridgeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), BridgeError> {
        self.fields
            .insert(key.to_owned(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<JsonValue, BridgeError> {
        Ok(JsonValue::Object(self.fields))
    }
}

struct SerializeVariantObject {
    variant: &'static str,
    fields: JsonObject,
}

impl ser::SerializeStructVariant for SerializeVariantObject {
    type Ok = JsonValue;
    type Error = BridgeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), BridgeError> {
        self.fields
            .insert(key.to_owned(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<JsonValue, BridgeError> {
        let mut wrapper = JsonObject::with_capacity(1);
        wrapper.insert(self.variant.to_owned(), JsonValue::Object(self.fields));
        Ok(JsonValue::Object(wrapper))
    }
}

/// Object keys must be text. Scalar keys with an obvious text form
/// (integers, bools, chars, unit variants) stringify; everything else
/// is rejected.
struct KeySerializer;

fn key_error(got: &str) -> BridgeError {
    BridgeError::UnsupportedType(format!("map key must be a string, got {got}"))
}

impl Serializer for KeySerializer {
    type Ok = String;
    type Error = BridgeError;

    type SerializeSeq = Impossible<String, BridgeError>;
    type SerializeTuple = Impossible<String, BridgeError>;
    type SerializeTupleStruct = Impossible<String, BridgeError>;
    type SerializeTupleVariant = Impossible<String, BridgeError>;
    type SerializeMap = Impossible<String, BridgeError>;
    type SerializeStruct = Impossible<String, BridgeError>;
    type SerializeStructVariant = Impossible<String, BridgeError>;

    fn serialize_str(self, v: &str) -> Result<String, BridgeError> {
        Ok(v.to_owned())
    }

    fn serialize_char(self, v: char) -> Result<String, BridgeError> {
        Ok(v.to_string())
    }

    fn serialize_bool(self, v: bool) -> Result<String, BridgeError> {
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String, BridgeError> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String, BridgeError> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String, BridgeError> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String, BridgeError> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String, BridgeError> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String, BridgeError> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String, BridgeError> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String, BridgeError> {
        Ok(v.to_string())
    }

    fn serialize_f32(self, _v: f32) -> Result<String, BridgeError> {
        Err(key_error("a float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String, BridgeError> {
        Err(key_error("a float"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String, BridgeError> {
        Err(key_error("bytes"))
    }

    fn serialize_none(self) -> Result<String, BridgeError> {
        Err(key_error("a null"))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _value: &T) -> Result<String, BridgeError> {
        Err(key_error("an optional"))
    }

    fn serialize_unit(self) -> Result<String, BridgeError> {
        Err(key_error("a null"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String, BridgeError> {
        Err(key_error("a unit struct"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String, BridgeError> {
        Ok(variant.to_owned())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String, BridgeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String, BridgeError> {
        Err(key_error("an enum variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, BridgeError> {
        Err(key_error("a sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, BridgeError> {
        Err(key_error("a tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, BridgeError> {
        Err(key_error("a tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, BridgeError> {
        Err(key_error("an enum variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, BridgeError> {
        Err(key_error("a map"))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, BridgeError> {
        Err(key_error("a struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, BridgeError> {
        Err(key_error("an enum variant"))
    }
}
