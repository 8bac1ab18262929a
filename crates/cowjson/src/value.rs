//! The `Json` document model.
//!
//! `Json` is a sum type over the seven JSON kinds. Strings, arrays and
//! objects live behind an `Rc`, so cloning a `Json` is O(1) and shares the
//! payload. Every mutating method goes through `Rc::make_mut`: if the payload
//! is shared it is duplicated first, and only the private copy is changed.
//! Other values holding the old payload never observe the write.
//!
//! Values handed to [`Json::append`], [`Json::insert`] and
//! [`Json::insert_key`] are deep-copied before they are stored, so a
//! container never aliases storage that the caller still holds.
//!
//! `==` compares containers by identity of their shared payload;
//! [`Json::equal`] is the structural comparison.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{JsonError, Result};

/// The tag of a [`Json`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    Null,
    Int,
    Double,
    Bool,
    String,
    Array,
    Object,
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonType::Null => "null",
            JsonType::Int => "int",
            JsonType::Double => "double",
            JsonType::Bool => "bool",
            JsonType::String => "string",
            JsonType::Array => "array",
            JsonType::Object => "object",
        };
        f.write_str(name)
    }
}

/// A JSON value with copy-on-write containers.
///
/// Objects are kept in a `BTreeMap`, so iteration and serialization always
/// follow sorted key order.
#[derive(Debug, Clone, Default)]
pub enum Json {
    #[default]
    Null,
    Int(i64),
    Double(f64),
    Bool(bool),
    String(Rc<String>),
    Array(Rc<Vec<Json>>),
    Object(Rc<BTreeMap<String, Json>>),
}

// ── Construction ─────────────────────────────────────────────────────────────

impl Json {
    /// A null value.
    pub fn new() -> Self {
        Json::Null
    }

    /// A value of the given type holding that type's zero value:
    /// `0`, `0.0`, `false`, `""`, `[]` or `{}`.
    pub fn with_type(json_type: JsonType) -> Self {
        match json_type {
            JsonType::Null => Json::Null,
            JsonType::Int => Json::Int(0),
            JsonType::Double => Json::Double(0.0),
            JsonType::Bool => Json::Bool(false),
            JsonType::String => Json::String(Rc::default()),
            JsonType::Array => Json::array(),
            JsonType::Object => Json::object(),
        }
    }

    /// An empty array.
    pub fn array() -> Self {
        Json::Array(Rc::default())
    }

    /// An empty object.
    pub fn object() -> Self {
        Json::Object(Rc::default())
    }

    pub fn json_type(&self) -> JsonType {
        match self {
            Json::Null => JsonType::Null,
            Json::Int(_) => JsonType::Int,
            Json::Double(_) => JsonType::Double,
            Json::Bool(_) => JsonType::Bool,
            Json::String(_) => JsonType::String,
            Json::Array(_) => JsonType::Array,
            Json::Object(_) => JsonType::Object,
        }
    }

    fn mismatch(&self, expected: JsonType) -> JsonError {
        JsonError::TypeMismatch {
            expected,
            found: self.json_type(),
        }
    }
}

impl From<i64> for Json {
    fn from(value: i64) -> Self {
        Json::Int(value)
    }
}

impl From<i32> for Json {
    fn from(value: i32) -> Self {
        Json::Int(value.into())
    }
}

impl From<f64> for Json {
    fn from(value: f64) -> Self {
        Json::Double(value)
    }
}

impl From<bool> for Json {
    fn from(value: bool) -> Self {
        Json::Bool(value)
    }
}

impl From<&str> for Json {
    fn from(value: &str) -> Self {
        Json::String(Rc::new(value.to_owned()))
    }
}

impl From<String> for Json {
    fn from(value: String) -> Self {
        Json::String(Rc::new(value))
    }
}

impl From<Vec<Json>> for Json {
    fn from(items: Vec<Json>) -> Self {
        Json::Array(Rc::new(items))
    }
}

impl From<BTreeMap<String, Json>> for Json {
    fn from(map: BTreeMap<String, Json>) -> Self {
        Json::Object(Rc::new(map))
    }
}

/// Shallow, sharing copy. Lets `&Json` be passed wherever `impl Into<Json>`
/// is accepted.
impl From<&Json> for Json {
    fn from(value: &Json) -> Self {
        value.clone()
    }
}

impl FromIterator<Json> for Json {
    fn from_iter<I: IntoIterator<Item = Json>>(iter: I) -> Self {
        Json::Array(Rc::new(iter.into_iter().collect()))
    }
}

impl<K: Into<String>> FromIterator<(K, Json)> for Json {
    fn from_iter<I: IntoIterator<Item = (K, Json)>>(iter: I) -> Self {
        Json::Object(Rc::new(
            iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }
}

// ── Type predicates ──────────────────────────────────────────────────────────

impl Json {
    pub fn is_null(&self) -> bool {
        matches!(self, Json::Null)
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Json::Int(_))
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Json::Double(_))
    }

    /// Int or Double.
    pub fn is_number(&self) -> bool {
        matches!(self, Json::Int(_) | Json::Double(_))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Json::Bool(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Json::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Json::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Json::Object(_))
    }
}

// ── Scalar accessors ─────────────────────────────────────────────────────────

impl Json {
    /// The boolean payload. No coercion from other tags.
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Json::Bool(b) => Ok(*b),
            _ => Err(self.mismatch(JsonType::Bool)),
        }
    }

    /// The integer payload. A `Double` is a mismatch even if it is integral.
    pub fn as_int(&self) -> Result<i64> {
        match self {
            Json::Int(n) => Ok(*n),
            _ => Err(self.mismatch(JsonType::Int)),
        }
    }

    /// The floating payload. An `Int` is a mismatch.
    pub fn as_double(&self) -> Result<f64> {
        match self {
            Json::Double(n) => Ok(*n),
            _ => Err(self.mismatch(JsonType::Double)),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Json::String(s) => Ok(s.as_str()),
            _ => Err(self.mismatch(JsonType::String)),
        }
    }

    pub fn as_array(&self) -> Result<&[Json]> {
        match self {
            Json::Array(items) => Ok(items.as_slice()),
            _ => Err(self.mismatch(JsonType::Array)),
        }
    }

    pub fn as_object(&self) -> Result<&BTreeMap<String, Json>> {
        match self {
            Json::Object(map) => Ok(map),
            _ => Err(self.mismatch(JsonType::Object)),
        }
    }

    /// Array storage ready for writing, unshared first if needed.
    fn array_mut(&mut self) -> Result<&mut Vec<Json>> {
        match self {
            Json::Array(items) => Ok(Rc::make_mut(items)),
            _ => Err(self.mismatch(JsonType::Array)),
        }
    }

    /// Object storage ready for writing, unshared first if needed.
    fn object_mut(&mut self) -> Result<&mut BTreeMap<String, Json>> {
        match self {
            Json::Object(map) => Ok(Rc::make_mut(map)),
            _ => Err(self.mismatch(JsonType::Object)),
        }
    }
}

impl TryFrom<&Json> for bool {
    type Error = JsonError;

    fn try_from(value: &Json) -> Result<Self> {
        value.as_bool()
    }
}

impl TryFrom<&Json> for i64 {
    type Error = JsonError;

    fn try_from(value: &Json) -> Result<Self> {
        value.as_int()
    }
}

impl TryFrom<&Json> for f64 {
    type Error = JsonError;

    fn try_from(value: &Json) -> Result<Self> {
        value.as_double()
    }
}

impl TryFrom<&Json> for String {
    type Error = JsonError;

    fn try_from(value: &Json) -> Result<Self> {
        value.as_str().map(str::to_owned)
    }
}

// ── Indexing ─────────────────────────────────────────────────────────────────

/// Maps a signed index onto `0..len`.
fn element_index(index: i64, len: usize) -> Result<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or(JsonError::IndexOutOfRange { index, len })
}

impl Json {
    /// The array element at `index`.
    pub fn at(&self, index: i64) -> Result<&Json> {
        let items = self.as_array()?;
        let i = element_index(index, items.len())?;
        Ok(&items[i])
    }

    /// A writable slot for the array element at `index`.
    ///
    /// Bounds are checked before the storage is touched, so a failed call
    /// never unshares anything.
    pub fn at_mut(&mut self, index: i64) -> Result<&mut Json> {
        let i = element_index(index, self.as_array()?.len())?;
        Ok(&mut self.array_mut()?[i])
    }

    /// Read-only member lookup. `None` if the key is absent or `self` is
    /// not an object.
    pub fn get(&self, key: &str) -> Option<&Json> {
        match self {
            Json::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// A writable slot for the member `key`.
    ///
    /// A missing key is inserted with a `Null` value first, so this grows the
    /// object. Use [`Json::get`] to look up without side effects.
    pub fn member_mut(&mut self, key: &str) -> Result<&mut Json> {
        let map = self.object_mut()?;
        Ok(map.entry(key.to_owned()).or_default())
    }
}

// ── Container mutation ───────────────────────────────────────────────────────

impl Json {
    /// Appends a deep copy of `value` to this array.
    pub fn append(&mut self, value: impl Into<Json>) -> Result<()> {
        let value = value.into().copy_self();
        self.array_mut()?.push(value);
        Ok(())
    }

    /// Inserts a deep copy of `value` before position `index`.
    /// `index == size()` appends.
    pub fn insert(&mut self, index: i64, value: impl Into<Json>) -> Result<()> {
        let len = self.as_array()?.len();
        let i = usize::try_from(index)
            .ok()
            .filter(|&i| i <= len)
            .ok_or(JsonError::IndexOutOfRange { index, len })?;
        let value = value.into().copy_self();
        self.array_mut()?.insert(i, value);
        Ok(())
    }

    /// Sets member `key` to a deep copy of `value`, replacing any previous
    /// value.
    pub fn insert_key(&mut self, key: impl Into<String>, value: impl Into<Json>) -> Result<()> {
        let value = value.into().copy_self();
        self.object_mut()?.insert(key.into(), value);
        Ok(())
    }

    /// Removes and returns the array element at `index`.
    pub fn remove(&mut self, index: i64) -> Result<Json> {
        let i = element_index(index, self.as_array()?.len())?;
        Ok(self.array_mut()?.remove(i))
    }

    /// Removes member `key` and returns its value.
    ///
    /// An absent key leaves shared storage shared.
    pub fn remove_key(&mut self, key: &str) -> Result<Option<Json>> {
        if !self.find_key(key)? {
            return Ok(None);
        }
        Ok(self.object_mut()?.remove(key))
    }

    /// Whether this object has a member named `key`.
    pub fn find_key(&self, key: &str) -> Result<bool> {
        Ok(self.as_object()?.contains_key(key))
    }

    /// Element count of an array or object, character count of a string.
    pub fn size(&self) -> Result<usize> {
        match self {
            Json::String(s) => Ok(s.chars().count()),
            Json::Array(items) => Ok(items.len()),
            Json::Object(map) => Ok(map.len()),
            _ => Err(JsonError::UnsupportedOperation {
                operation: "size",
                found: self.json_type(),
            }),
        }
    }

    /// Number of values currently sharing this payload.
    pub fn use_count(&self) -> Result<usize> {
        match self {
            Json::String(s) => Ok(Rc::strong_count(s)),
            Json::Array(items) => Ok(Rc::strong_count(items)),
            Json::Object(map) => Ok(Rc::strong_count(map)),
            _ => Err(JsonError::UnsupportedOperation {
                operation: "use_count",
                found: self.json_type(),
            }),
        }
    }

    /// Iterates over array elements.
    pub fn iter(&self) -> Result<std::slice::Iter<'_, Json>> {
        Ok(self.as_array()?.iter())
    }

    /// Iterates over object members in key order.
    pub fn entries(&self) -> Result<btree_map::Iter<'_, String, Json>> {
        Ok(self.as_object()?.iter())
    }
}

// ── Copying and comparison ───────────────────────────────────────────────────

impl Json {
    /// A fully independent deep copy: no payload of the result is shared
    /// with `self`.
    pub fn copy_self(&self) -> Json {
        match self {
            Json::String(s) => Json::String(Rc::new(s.as_str().to_owned())),
            Json::Array(items) => items.iter().map(Json::copy_self).collect(),
            Json::Object(map) => Json::Object(Rc::new(
                map.iter().map(|(k, v)| (k.clone(), v.copy_self())).collect(),
            )),
            scalar => scalar.clone(),
        }
    }

    /// Structural equality. Tags must match exactly, so `Int(1)` and
    /// `Double(1.0)` differ. Doubles with identical bits are equal, so a NaN
    /// equals its own deep copy.
    pub fn equal(&self, other: &Json) -> bool {
        match (self, other) {
            (Json::Null, Json::Null) => true,
            (Json::Int(a), Json::Int(b)) => a == b,
            (Json::Double(a), Json::Double(b)) => a.to_bits() == b.to_bits() || a == b,
            (Json::Bool(a), Json::Bool(b)) => a == b,
            (Json::String(a), Json::String(b)) => a == b,
            (Json::Array(a), Json::Array(b)) => {
                Rc::ptr_eq(a, b)
                    || (a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equal(y)))
            }
            (Json::Object(a), Json::Object(b)) => {
                Rc::ptr_eq(a, b)
                    || (a.len() == b.len()
                        && a
                            .iter()
                            .zip(b.iter())
                            .all(|((ka, va), (kb, vb))| ka == kb && va.equal(vb)))
            }
            _ => false,
        }
    }
}

/// Scalars compare by value; strings, arrays and objects compare by identity
/// of their shared payload.
impl PartialEq for Json {
    fn eq(&self, other: &Json) -> bool {
        match (self, other) {
            (Json::Null, Json::Null) => true,
            (Json::Int(a), Json::Int(b)) => a == b,
            (Json::Double(a), Json::Double(b)) => a == b,
            (Json::Bool(a), Json::Bool(b)) => a == b,
            (Json::String(a), Json::String(b)) => Rc::ptr_eq(a, b),
            (Json::Array(a), Json::Array(b)) => Rc::ptr_eq(a, b),
            (Json::Object(a), Json::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
