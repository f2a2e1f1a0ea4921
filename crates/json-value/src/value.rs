//! Dynamic JSON value model.
//!
//! [`JsonValue`] is a closed tagged union over the six JSON productions.
//! Every numeric literal, integer or not, is stored as an `f64`; the
//! distinction between `1` and `1.0` exists only in serialized text.

use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::{Index, IndexMut};

use indexmap::IndexMap;

/// Insertion-ordered object payload.
pub type JsonObject = IndexMap<String, JsonValue>;

/// Shared miss sentinel for `Index` lookups.
static NULL: JsonValue = JsonValue::Null;

/// A dynamically-typed JSON value.
///
/// Values form a finite tree: `Array` and `Object` own their children
/// exclusively, so no sharing and no cycles are possible. Mutation is
/// by replacement; the typed setters swap the whole variant rather than
/// coercing payloads in place.
///
/// Equality is structural. Object comparison is order-insensitive (two
/// objects with the same key/value pairs compare equal regardless of
/// insertion order), and hashing is consistent with that.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum JsonValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(JsonObject),
}

impl JsonValue {
    pub fn of_string(value: impl Into<String>) -> Self {
        JsonValue::String(value.into())
    }

    pub fn of_number(value: f64) -> Self {
        JsonValue::Number(value)
    }

    pub fn of_bool(value: bool) -> Self {
        JsonValue::Bool(value)
    }

    pub fn of_array(items: Vec<JsonValue>) -> Self {
        JsonValue::Array(items)
    }

    pub fn of_object(fields: JsonObject) -> Self {
        JsonValue::Object(fields)
    }

    /// Lowercase name of the current variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "bool",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::Array(_) => "array",
            JsonValue::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    // ---- Typed view accessors ----------------------------------------
    //
    // Each accessor returns the payload when the current variant matches
    // and `None` otherwise. A variant mismatch is never an error.

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<JsonValue>> {
        match self {
            JsonValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<JsonValue>> {
        match self {
            JsonValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            JsonValue::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut JsonObject> {
        match self {
            JsonValue::Object(fields) => Some(fields),
            _ => None,
        }
    }

    // ---- Paired setters ----------------------------------------------
    //
    // `Some` replaces `self` with the corresponding variant; `None`
    // replaces `self` with `Null`. The previous variant never matters.

    pub fn set_string(&mut self, value: Option<String>) {
        *self = match value {
            Some(s) => JsonValue::String(s),
            None => JsonValue::Null,
        };
    }

    pub fn set_number(&mut self, value: Option<f64>) {
        *self = match value {
            Some(n) => JsonValue::Number(n),
            None => JsonValue::Null,
        };
    }

    pub fn set_bool(&mut self, value: Option<bool>) {
        *self = match value {
            Some(b) => JsonValue::Bool(b),
            None => JsonValue::Null,
        };
    }

    pub fn set_array(&mut self, value: Option<Vec<JsonValue>>) {
        *self = match value {
            Some(items) => JsonValue::Array(items),
            None => JsonValue::Null,
        };
    }

    pub fn set_object(&mut self, value: Option<JsonObject>) {
        *self = match value {
            Some(fields) => JsonValue::Object(fields),
            None => JsonValue::Null,
        };
    }

    // ---- Positional access -------------------------------------------

    /// Element at `index`, or `None` when `self` is not an array or the
    /// index is out of bounds.
    pub fn get(&self, index: usize) -> Option<&JsonValue> {
        match self {
            JsonValue::Array(items) => items.get(index),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut JsonValue> {
        match self {
            JsonValue::Array(items) => items.get_mut(index),
            _ => None,
        }
    }

    /// Replace the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `self` is not an array or `index` is out of bounds.
    /// Positional assignment is a caller contract, not a recoverable
    /// condition; it never grows the array.
    pub fn set_index(&mut self, index: usize, value: impl Into<JsonValue>) {
        self[index] = value.into();
    }

    /// Append `value`.
    ///
    /// # Panics
    ///
    /// Panics when `self` is not an array.
    pub fn push(&mut self, value: impl Into<JsonValue>) {
        match self {
            JsonValue::Array(items) => items.push(value.into()),
            other => panic!("cannot push onto {} value", other.kind()),
        }
    }

    // ---- Keyed access ------------------------------------------------

    /// Value under `key`, or `None` when `self` is not an object or the
    /// key is missing.
    pub fn get_key(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(fields) => fields.get(key),
            _ => None,
        }
    }

    pub fn get_key_mut(&mut self, key: &str) -> Option<&mut JsonValue> {
        match self {
            JsonValue::Object(fields) => fields.get_mut(key),
            _ => None,
        }
    }

    /// Insert or overwrite `key` when `self` is an object; silent no-op
    /// otherwise. There is no object to mutate on a variant mismatch,
    /// and keyed writes deliberately stay fail-soft.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        if let JsonValue::Object(fields) = self {
            fields.insert(key.into(), value.into());
        }
    }

    /// Remove `key`, returning the removed value. No-op (returning
    /// `None`) when `self` is not an object. Remaining keys keep their
    /// relative order.
    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        match self {
            JsonValue::Object(fields) => fields.shift_remove(key),
            _ => None,
        }
    }

    /// Keyed write where `None` means removal: `Some(v)` inserts or
    /// overwrites, `None` deletes the key.
    pub fn set_key(&mut self, key: &str, value: Option<JsonValue>) {
        match value {
            Some(v) => self.insert(key, v),
            None => {
                self.remove(key);
            }
        }
    }

    // ---- Dynamic member access ---------------------------------------
    //
    // Field-style aliases over keyed access, for call sites that read
    // object keys as if they were named fields.

    /// `self.member("name")` reads the `name` key, yielding `Null` for
    /// misses and variant mismatches.
    pub fn member(&self, name: &str) -> &JsonValue {
        self.get_key(name).unwrap_or(&NULL)
    }

    /// Same contract as [`JsonValue::set_key`].
    pub fn set_member(&mut self, name: &str, value: Option<JsonValue>) {
        self.set_key(name, value);
    }
}

impl Hash for JsonValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            JsonValue::Null => {}
            JsonValue::Bool(b) => b.hash(state),
            // 0.0 and -0.0 compare equal, so they must hash equal.
            JsonValue::Number(n) => {
                let n = if *n == 0.0 { 0.0 } else { *n };
                n.to_bits().hash(state);
            }
            JsonValue::String(s) => s.hash(state),
            JsonValue::Array(items) => {
                for item in items {
                    item.hash(state);
                }
            }
            // Equality is insertion-order-insensitive; hash entries in
            // sorted key order to stay consistent with it.
            JsonValue::Object(fields) => {
                let mut keys: Vec<&String> = fields.keys().collect();
                keys.sort_unstable();
                for key in keys {
                    key.hash(state);
                    if let Some(value) = fields.get(key.as_str()) {
                        value.hash(state);
                    }
                }
            }
        }
    }
}

// ---- Operator sugar --------------------------------------------------

impl Index<usize> for JsonValue {
    type Output = JsonValue;

    /// Fail-soft positional read: yields `Null` for non-arrays and
    /// out-of-bounds indexes.
    fn index(&self, index: usize) -> &JsonValue {
        self.get(index).unwrap_or(&NULL)
    }
}

impl IndexMut<usize> for JsonValue {
    /// Positional write slot.
    ///
    /// # Panics
    ///
    /// Unlike the read side, the write side has no absent sentinel to
    /// hand out: it panics when `self` is not an array or `index` is out
    /// of bounds.
    fn index_mut(&mut self, index: usize) -> &mut JsonValue {
        match self {
            JsonValue::Array(items) => {
                let len = items.len();
                items.get_mut(index).unwrap_or_else(|| {
                    panic!("index {index} out of bounds for array of length {len}")
                })
            }
            other => panic!("cannot assign by index into {} value", other.kind()),
        }
    }
}

impl Index<&str> for JsonValue {
    type Output = JsonValue;

    /// Fail-soft keyed read: yields `Null` for non-objects and missing
    /// keys.
    fn index(&self, key: &str) -> &JsonValue {
        self.member(key)
    }
}

// ---- Literal-construction sugar --------------------------------------

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        JsonValue::Bool(value)
    }
}

impl From<f64> for JsonValue {
    fn from(value: f64) -> Self {
        JsonValue::Number(value)
    }
}

impl From<f32> for JsonValue {
    fn from(value: f32) -> Self {
        JsonValue::Number(f64::from(value))
    }
}

impl From<i32> for JsonValue {
    fn from(value: i32) -> Self {
        JsonValue::Number(f64::from(value))
    }
}

impl From<u32> for JsonValue {
    fn from(value: u32) -> Self {
        JsonValue::Number(f64::from(value))
    }
}

impl From<i64> for JsonValue {
    /// Lossy above 2^53, like every other route into `Number`.
    fn from(value: i64) -> Self {
        JsonValue::Number(value as f64)
    }
}

impl From<u64> for JsonValue {
    /// Lossy above 2^53, like every other route into `Number`.
    fn from(value: u64) -> Self {
        JsonValue::Number(value as f64)
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        JsonValue::String(value.to_owned())
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        JsonValue::String(value)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(items: Vec<JsonValue>) -> Self {
        JsonValue::Array(items)
    }
}

impl From<JsonObject> for JsonValue {
    fn from(fields: JsonObject) -> Self {
        JsonValue::Object(fields)
    }
}

impl<T: Into<JsonValue>> From<Option<T>> for JsonValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => JsonValue::Null,
        }
    }
}

impl FromIterator<JsonValue> for JsonValue {
    fn from_iter<I: IntoIterator<Item = JsonValue>>(iter: I) -> Self {
        JsonValue::Array(iter.into_iter().collect())
    }
}

impl FromIterator<(String, JsonValue)> for JsonValue {
    fn from_iter<I: IntoIterator<Item = (String, JsonValue)>>(iter: I) -> Self {
        JsonValue::Object(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(value: &JsonValue) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn accessor_miss_is_absent_not_error() {
        let value = JsonValue::Number(1.0);
        assert_eq!(value.as_str(), None);
        assert_eq!(value.as_bool(), None);
        assert_eq!(value.as_array(), None);
        assert_eq!(value.as_object(), None);
        assert_eq!(value.as_f64(), Some(1.0));
    }

    #[test]
    fn setter_replaces_whole_variant() {
        let mut value = JsonValue::Number(42.0);
        value.set_string(Some("hello".to_owned()));
        assert_eq!(value, JsonValue::String("hello".to_owned()));
        value.set_string(None);
        assert!(value.is_null());
    }

    #[test]
    fn keyed_write_noops_on_non_object() {
        let mut value = JsonValue::Number(1.0);
        value.insert("key", "x");
        assert_eq!(value, JsonValue::Number(1.0));
        assert_eq!(value.remove("key"), None);
    }

    #[test]
    fn object_equality_ignores_insertion_order() {
        let ab: JsonValue = [
            ("a".to_owned(), JsonValue::from(1.0)),
            ("b".to_owned(), JsonValue::from(2.0)),
        ]
        .into_iter()
        .collect();
        let ba: JsonValue = [
            ("b".to_owned(), JsonValue::from(2.0)),
            ("a".to_owned(), JsonValue::from(1.0)),
        ]
        .into_iter()
        .collect();
        assert_eq!(ab, ba);
        assert_eq!(hash_of(&ab), hash_of(&ba));
    }

    #[test]
    fn zero_hashes_like_negative_zero() {
        assert_eq!(JsonValue::Number(0.0), JsonValue::Number(-0.0));
        assert_eq!(
            hash_of(&JsonValue::Number(0.0)),
            hash_of(&JsonValue::Number(-0.0))
        );
    }

    #[test]
    fn index_read_is_fail_soft() {
        let value = JsonValue::from(vec![JsonValue::from(1.0)]);
        assert_eq!(value[0], JsonValue::Number(1.0));
        assert!(value[7].is_null());
        assert!(JsonValue::Bool(true)[0].is_null());
        assert!(value["key"].is_null());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn index_write_past_end_panics() {
        let mut value = JsonValue::from(vec![JsonValue::from(1.0)]);
        value[3] = JsonValue::Null;
    }

    #[test]
    #[should_panic(expected = "cannot assign by index")]
    fn index_write_into_scalar_panics() {
        let mut value = JsonValue::from("text");
        value[0] = JsonValue::Null;
    }
}
