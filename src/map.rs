//! Ordered property list for Yocton objects.
//!
//! This module provides [`Fields`], the owned form of an object. Unlike a
//! map it keeps every property in document order, including repeated names,
//! so a document read into `Fields` and written back out is unchanged.
//!
//! ## Examples
//!
//! ```rust
//! use yocton::{Fields, Value};
//!
//! let mut fields = Fields::new();
//! fields.push("host", "example.org");
//! fields.push("port", 8080);
//! fields.push("port", 8081);
//!
//! assert_eq!(fields.len(), 3);
//! assert_eq!(fields.get_str("port"), Some("8081"));
//! assert_eq!(fields.to_string(), "host: example.org\nport: 8080\nport: 8081\n");
//! ```

use crate::parser::{Object, PropertyKind};
use crate::source::ByteSource;
use crate::writer::Writer;
use crate::Value;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::io::Write;
use std::mem;

/// The properties of one object, in order.
///
/// # Examples
///
/// ```rust
/// use yocton::Fields;
///
/// let fields: Fields = [("b", "1"), ("a", "2")].into_iter().collect();
/// let names: Vec<_> = fields.names().collect();
/// assert_eq!(names, ["b", "a"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fields(Vec<(String, Value)>);

impl Fields {
    /// Creates an empty property list.
    #[must_use]
    pub fn new() -> Self {
        Fields(Vec::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Fields(Vec::with_capacity(capacity))
    }

    /// Appends a property. Existing properties with the same name are kept.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.push((name.into(), value.into()));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the properties, in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, (String, Value)> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the value of the last property called `name`.
    ///
    /// Later properties override earlier ones, the way a configuration file
    /// is usually read.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yocton::{loads, Value};
    ///
    /// let fields = loads("level: 1\nlevel: 2\n").unwrap();
    /// assert_eq!(fields.get("level"), Some(&Value::from("2")));
    /// assert_eq!(fields.get("missing"), None);
    /// ```
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Like [`Fields::get`], for string values only.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Returns every value of properties called `name`, in document order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.0
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(n, _)| n == name)
    }

    /// Groups values by name, keyed in order of first appearance.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yocton::loads;
    ///
    /// let fields = loads("x: 1\ny: 2\nx: 3\n").unwrap();
    /// let groups = fields.grouped();
    /// assert_eq!(groups.keys().collect::<Vec<_>>(), ["x", "y"]);
    /// assert_eq!(groups["x"].len(), 2);
    /// ```
    #[must_use]
    pub fn grouped(&self) -> IndexMap<String, Vec<Value>> {
        self.clone().into_grouped()
    }

    /// Consuming form of [`Fields::grouped`].
    pub fn into_grouped(mut self) -> IndexMap<String, Vec<Value>> {
        let mut groups: IndexMap<String, Vec<Value>> = IndexMap::with_capacity(self.0.len());
        for (name, value) in mem::take(&mut self.0) {
            groups.entry(name).or_default().push(value);
        }
        groups
    }

    /// Reads the remaining properties of `object` and everything nested in them.
    ///
    /// Reading stops at the end of the object or at the first error; check
    /// [`Stream::error`](crate::Stream::error) afterwards, or use
    /// [`load_stream`](crate::load_stream) which does that for you.
    pub fn read<S: ByteSource>(object: Object<'_, S>) -> Fields {
        let mut parents: Vec<(String, Object<'_, S>, Fields)> = Vec::new();
        let mut current = object;
        let mut fields = Fields::new();
        loop {
            match current.next_property() {
                Some(prop) => match prop.kind() {
                    PropertyKind::String => fields.push(prop.name(), prop.to_value_string()),
                    PropertyKind::Object => {
                        let parent = mem::take(&mut fields);
                        parents.push((prop.name().into_owned(), current, parent));
                        current = prop.inner();
                    }
                },
                None => match parents.pop() {
                    Some((name, parent_object, mut parent)) => {
                        parent.push(name, Value::Object(fields));
                        fields = parent;
                        current = parent_object;
                    }
                    None => return fields,
                },
            }
        }
    }

    /// Writes these properties at the writer's current nesting level.
    pub fn write<W: Write>(&self, writer: &mut Writer<W>) {
        let mut pending = vec![self.0.iter()];
        while let Some(iter) = pending.last_mut() {
            match iter.next() {
                Some((name, Value::String(s))) => writer.field(name, s),
                Some((name, Value::Object(fields))) => {
                    writer.begin_subobject(name);
                    pending.push(fields.0.iter());
                }
                None => {
                    pending.pop();
                    if !pending.is_empty() {
                        writer.end_subobject();
                    }
                }
            }
        }
    }
}

// Nested objects are unlinked onto a heap stack first, so dropping a deep
// document does not recurse once per level.
impl Drop for Fields {
    fn drop(&mut self) {
        fn take_children(fields: &mut Fields, pending: &mut Vec<Fields>) {
            for (_, value) in &mut fields.0 {
                if let Value::Object(inner) = value {
                    if !inner.is_empty() {
                        pending.push(mem::take(inner));
                    }
                }
            }
        }

        let mut pending = Vec::new();
        take_children(self, &mut pending);
        while let Some(mut fields) = pending.pop() {
            take_children(&mut fields, &mut pending);
        }
    }
}

impl fmt::Display for Fields {
    /// Formats the properties as a Yocton document.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut writer = Writer::new(Vec::new());
        self.write(&mut writer);
        let bytes = writer.into_inner().map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&bytes))
    }
}

impl Serialize for Fields {
    /// Serializes as a map; repeated names become repeated keys.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(mut self) -> Self::IntoIter {
        mem::take(&mut self.0).into_iter()
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = &'a (String, Value);
    type IntoIter = std::slice::Iter<'a, (String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Fields(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl<K, V> Extend<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<Value>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.push(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Indent, Stream, WriterOptions};

    #[test]
    fn test_read_nested() {
        let stream = Stream::from_slice(b"a: 1\nb { c { d: 2 } e: 3 }\nf: 4\n");
        let fields = Fields::read(stream.root());
        assert!(stream.error().is_none());

        let mut c = Fields::new();
        c.push("d", "2");
        let mut b = Fields::new();
        b.push("c", c);
        b.push("e", "3");
        let mut expected = Fields::new();
        expected.push("a", "1");
        expected.push("b", b);
        expected.push("f", "4");
        assert_eq!(fields, expected);
    }

    fn deep_document(depth: usize) -> String {
        let mut text = "a {\n".repeat(depth);
        text.push_str("leaf: x\n");
        text.push_str(&"}\n".repeat(depth));
        text
    }

    #[test]
    fn test_deep_document_reads_writes_and_drops() {
        let depth = 100_000;
        let text = deep_document(depth);
        let fields = crate::loads(&text).unwrap();

        let mut level = &fields;
        let mut levels = 0;
        while let Some(inner) = level.get("a").and_then(Value::as_object) {
            level = inner;
            levels += 1;
        }
        assert_eq!(levels, depth);
        assert_eq!(level.get_str("leaf"), Some("x"));

        let options = WriterOptions::new().with_indent(Indent::Spaces(0));
        let mut writer = Writer::with_options(Vec::new(), options);
        fields.write(&mut writer);
        assert_eq!(writer.into_inner().unwrap(), text.as_bytes());
        drop(fields);
    }

    #[test]
    fn test_read_stops_at_error() {
        let stream = Stream::from_slice(b"a: 1\nb { c: 2\n");
        let fields = Fields::read(stream.root());
        assert_eq!(fields.get_str("a"), Some("1"));
        assert_eq!(stream.error().unwrap().message(), "unexpected EOF");
    }

    #[test]
    fn test_display_nested() {
        let mut inner = Fields::new();
        inner.push("k", "two words");
        let mut fields = Fields::new();
        fields.push("obj", inner);
        assert_eq!(fields.to_string(), "obj {\n\tk: \"two words\"\n}\n");
    }

    #[test]
    fn test_get_all_and_contains() {
        let fields: Fields = [("x", "1"), ("y", "2"), ("x", "3")].into_iter().collect();
        let xs: Vec<_> = fields.get_all("x").filter_map(Value::as_str).collect();
        assert_eq!(xs, ["1", "3"]);
        assert!(fields.contains("y"));
        assert!(!fields.contains("z"));
    }

    #[test]
    fn test_serialize_repeated_keys() {
        let fields: Fields = [("x", "1"), ("x", "2")].into_iter().collect();
        assert_eq!(serde_json::to_string(&fields).unwrap(), r#"{"x":"1","x":"2"}"#);
    }
}
