//! Owned document tree.
//!
//! The streaming API never builds a tree, but small documents are often
//! easier to handle whole. [`Value`] is either a string or a nested object,
//! and objects are [`Fields`]: ordered `(name, value)` lists that keep
//! repeated names.
//!
//! ```rust
//! use yocton::{loads, Value};
//!
//! let doc = loads("title: Report\nauthor { name: Ann }\ntag: a\ntag: b\n").unwrap();
//!
//! assert_eq!(doc.get_str("title"), Some("Report"));
//! let author = doc.get("author").and_then(Value::as_object).unwrap();
//! assert_eq!(author.get_str("name"), Some("Ann"));
//!
//! let tags: Vec<_> = doc.get_all("tag").filter_map(Value::as_str).collect();
//! assert_eq!(tags, ["a", "b"]);
//! ```

use crate::Fields;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A property value: a string or a nested object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    String(String),
    Object(Fields),
}

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yocton::{Fields, Value};
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::Object(Fields::new()).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Object(_) => None,
        }
    }

    /// If the value is an object, returns a reference to its fields. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Fields> {
        match self {
            Value::Object(fields) => Some(fields),
            Value::String(_) => None,
        }
    }

    #[inline]
    pub fn as_object_mut(&mut self) -> Option<&mut Fields> {
        match self {
            Value::Object(fields) => Some(fields),
            Value::String(_) => None,
        }
    }

    /// Parses a string value with [`FromStr`](std::str::FromStr).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yocton::Value;
    ///
    /// assert_eq!(Value::from("42").parse::<u16>(), Some(42));
    /// assert_eq!(Value::from("x").parse::<u16>(), None);
    /// ```
    #[must_use]
    pub fn parse<T: std::str::FromStr>(&self) -> Option<T> {
        self.as_str().and_then(|s| s.parse().ok())
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::String(String::new())
    }
}

impl fmt::Display for Value {
    /// Strings display as their contents, objects as a Yocton document.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Object(fields) => fmt::Display::fmt(fields, f),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Object(fields) => fields.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match deserializer.deserialize_any(ValueVisitor)? {
            Value::Object(fields) => Ok(fields),
            Value::String(s) => Err(de::Error::invalid_type(
                de::Unexpected::Str(&s),
                &"a map of properties",
            )),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string, a scalar or a map of properties")
    }

    fn visit_bool<E>(self, value: bool) -> Result<Value, E> {
        Ok(Value::String(value.to_string()))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
        Ok(Value::String(value.to_string()))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Value, E> {
        Ok(Value::String(value.to_string()))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Value, E> {
        Ok(Value::String(value.to_string()))
    }

    fn visit_char<E>(self, value: char) -> Result<Value, E> {
        Ok(Value::String(value.to_string()))
    }

    fn visit_str<E>(self, value: &str) -> Result<Value, E> {
        Ok(Value::String(value.to_string()))
    }

    fn visit_string<E>(self, value: String) -> Result<Value, E> {
        Ok(Value::String(value))
    }

    // A name repeated under a single-value target; the last one wins, as it
    // does for scalar fields.
    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut last = None;
        while let Some(value) = seq.next_element::<Value>()? {
            last = Some(value);
        }
        last.ok_or_else(|| de::Error::invalid_length(0, &self))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut fields = Fields::new();
        while let Some((name, entry)) = map.next_entry::<String, Entry>()? {
            match entry {
                Entry::Absent => {}
                Entry::One(value) => fields.push(name, value),
                Entry::Many(values) => {
                    for value in values {
                        fields.push(name.clone(), value);
                    }
                }
            }
        }
        Ok(Value::Object(fields))
    }
}

// A map entry coming from another data format: nulls are dropped and
// sequences become repeated properties.
enum Entry {
    Absent,
    One(Value),
    Many(Vec<Value>),
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(EntryVisitor)
    }
}

struct EntryVisitor;

impl<'de> Visitor<'de> for EntryVisitor {
    type Value = Entry;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        ValueVisitor.expecting(formatter)
    }

    fn visit_bool<E>(self, value: bool) -> Result<Entry, E> {
        Ok(Entry::One(Value::String(value.to_string())))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Entry, E> {
        Ok(Entry::One(Value::String(value.to_string())))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Entry, E> {
        Ok(Entry::One(Value::String(value.to_string())))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Entry, E> {
        Ok(Entry::One(Value::String(value.to_string())))
    }

    fn visit_char<E>(self, value: char) -> Result<Entry, E> {
        Ok(Entry::One(Value::String(value.to_string())))
    }

    fn visit_str<E>(self, value: &str) -> Result<Entry, E> {
        Ok(Entry::One(Value::String(value.to_string())))
    }

    fn visit_string<E>(self, value: String) -> Result<Entry, E> {
        Ok(Entry::One(Value::String(value)))
    }

    fn visit_unit<E>(self) -> Result<Entry, E> {
        Ok(Entry::Absent)
    }

    fn visit_none<E>(self) -> Result<Entry, E> {
        Ok(Entry::Absent)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Entry, D::Error>
    where
        D: Deserializer<'de>,
    {
        Entry::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Entry, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut values = Vec::new();
        while let Some(value) = seq.next_element::<Value>()? {
            values.push(value);
        }
        Ok(Entry::Many(values))
    }

    fn visit_map<A>(self, map: A) -> Result<Entry, A::Error>
    where
        A: MapAccess<'de>,
    {
        ValueVisitor.visit_map(map).map(Entry::One)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Fields> for Value {
    fn from(value: Fields) -> Self {
        Value::Object(value)
    }
}

macro_rules! from_display {
    ($($ty:ty)*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::String(value.to_string())
                }
            }
        )*
    };
}

from_display! { bool char i8 i16 i32 i64 isize u8 u16 u32 u64 usize f32 f64 }

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            Value::Object(_) => Err(crate::Error::custom("expected string, found object")),
        }
    }
}

impl TryFrom<Value> for Fields {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Object(fields) => Ok(fields),
            Value::String(s) => Err(crate::Error::custom(format!(
                "expected object, found string {s:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(true), Value::String("true".into()));
        assert_eq!(Value::from(-7i32), Value::String("-7".into()));
        assert_eq!(Value::from(2.5f64), Value::String("2.5".into()));
        assert_eq!(Value::from('x'), Value::String("x".into()));
    }

    #[test]
    fn test_tryfrom() {
        assert_eq!(String::try_from(Value::from("a")).unwrap(), "a");
        assert!(String::try_from(Value::Object(Fields::new())).is_err());
        assert!(Fields::try_from(Value::from("a")).is_err());
    }

    #[test]
    fn test_const_is_methods() {
        const fn check_string(v: &Value) -> bool {
            v.is_string()
        }
        assert!(check_string(&Value::from("s")));
        assert!(Value::Object(Fields::new()).is_object());
    }

    #[test]
    fn test_serialize_to_json() {
        let mut inner = Fields::new();
        inner.push("b", "2");
        let value = Value::Object(inner);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"b":"2"}"#);
        assert_eq!(serde_json::to_string(&Value::from("x")).unwrap(), r#""x""#);
    }

    #[test]
    fn test_deserialize_from_json() {
        let value: Value =
            serde_json::from_str(r#"{"n": 1, "ok": true, "skip": null, "tags": ["a", "b"]}"#)
                .unwrap();
        let fields = value.as_object().unwrap();
        let names: Vec<_> = fields.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["n", "ok", "tags", "tags"]);
        assert_eq!(fields.get_str("n"), Some("1"));
        assert_eq!(fields.get_str("ok"), Some("true"));
    }

    #[test]
    fn test_repeated_name_into_value_takes_last() {
        use std::collections::HashMap;

        let map: HashMap<String, Value> = crate::from_str("a: 1\nb { c: 2 }\na: 3\n").unwrap();
        assert_eq!(map["a"], Value::from("3"));
        assert!(map["b"].is_object());

        #[derive(Deserialize, Debug)]
        struct Holder {
            v: Value,
        }

        let holder: Holder = crate::from_str("v: x\nv { inner: y }\n").unwrap();
        let inner = holder.v.as_object().and_then(|f| f.get_str("inner"));
        assert_eq!(inner, Some("y"));
    }
}
