//! # yocton
//!
//! A streaming pull parser and writer for Yocton, a minimalist hierarchical
//! text format for configuration files and small data documents.
//!
//! ## What is Yocton?
//!
//! A Yocton document is a list of properties. Each property is a name with
//! either a string value or a nested object:
//!
//! ```text
//! name: "Acme widget"
//! version: 1.2
//! size {
//!     w: 30
//!     h: 40
//! }
//! tag: red
//! tag: blue
//! ```
//!
//! There are no numbers, booleans, lists or nulls. Every value is a string
//! and meaning is assigned by the reader; lists are written by repeating a
//! property name. Strings made of ASCII letters, digits and `_-+.` can be
//! written bare; anything else is quoted, with C-style escapes.
//!
//! ## Key Features
//!
//! - **Pull parsing**: properties are read one at a time from a [`Stream`],
//!   in document order, from any [`ByteSource`] or [`std::io::Read`]
//! - **Skip-forward**: nested objects the caller is not interested in are
//!   skipped automatically when the parent moves on
//! - **Deferred errors**: the first error is recorded in the stream and later
//!   reads report the end of data, so traversal code needs one error check
//! - **Writer**: [`Writer`] emits documents with minimal quoting
//! - **Document tree**: [`Fields`] and [`Value`] hold whole documents
//! - **Serde Compatible**: [`from_str`] and [`to_string`] map documents onto
//!   `#[derive(Serialize, Deserialize)]` types
//!
//! ## Quick Start
//!
//! ### Streaming
//!
//! ```rust
//! use yocton::{PropertyKind, Stream};
//!
//! let stream = Stream::from_slice(b"a: 1\nobj {\n  b: 2\n}\n");
//! let root = stream.root();
//!
//! let mut seen = Vec::new();
//! while let Some(prop) = root.next_property() {
//!     match prop.kind() {
//!         PropertyKind::String => seen.push(format!("{}={}", prop.name(), prop.value())),
//!         PropertyKind::Object => {
//!             let obj = prop.inner();
//!             while let Some(child) = obj.next_property() {
//!                 seen.push(format!("{}.{}={}", prop.name(), child.name(), child.value()));
//!             }
//!         }
//!     }
//! }
//!
//! assert!(stream.error().is_none());
//! assert_eq!(seen, ["a=1", "obj.b=2"]);
//! ```
//!
//! ### Serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use yocton::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User {
//!     id: 123,
//!     name: "Alice Smith".to_string(),
//!     active: true,
//! };
//!
//! let text = to_string(&user).unwrap();
//! assert_eq!(text, "id: 123\nname: \"Alice Smith\"\nactive: true\n");
//!
//! let user_back: User = from_str(&text).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ## Logging
//!
//! The crate logs through [`tracing`]: the first recorded error of a stream
//! or writer at `debug`, buffer refills and flushes at `trace`. No subscriber
//! is installed.

#[macro_use]
pub mod macros;

pub mod de;
pub mod error;
pub mod map;
pub mod options;
pub mod ser;
pub mod source;
pub mod value;
pub mod writer;

mod parser;
mod reader;
mod token;

pub use de::from_fields;
pub use error::{Error, Result};
pub use map::Fields;
pub use options::{Indent, ReaderOptions, WriterOptions, DEFAULT_BUFFER_SIZE};
pub use parser::{Object, Properties, Property, PropertyKind, Stream};
pub use ser::to_fields;
pub use source::{ByteSource, ReadSource};
pub use token::is_bare_string;
pub use value::Value;
pub use writer::Writer;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Reads a whole document from a stream into a [`Fields`] tree.
///
/// # Errors
///
/// Returns the first error recorded by the stream.
pub fn load_stream<S: ByteSource>(stream: &Stream<S>) -> Result<Fields> {
    let fields = Fields::read(stream.root());
    match stream.error() {
        Some(err) => Err(err),
        None => Ok(fields),
    }
}

/// Reads a whole document from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use std::io::Cursor;
///
/// let fields = yocton::load(Cursor::new("a: 1\n")).unwrap();
/// assert_eq!(fields.get_str("a"), Some("1"));
/// ```
///
/// # Errors
///
/// Returns the syntax or I/O error that stopped parsing.
pub fn load<R: io::Read>(reader: R) -> Result<Fields> {
    load_stream(&Stream::from_reader(reader))
}

/// Reads a whole document from a string.
///
/// # Errors
///
/// Returns the syntax error that stopped parsing.
pub fn loads(s: &str) -> Result<Fields> {
    load_slice(s.as_bytes())
}

/// Reads a whole document from bytes. Invalid UTF-8 in names and values is
/// replaced.
///
/// # Errors
///
/// Returns the syntax error that stopped parsing.
pub fn load_slice(v: &[u8]) -> Result<Fields> {
    load_stream(&Stream::from_slice(v))
}

/// Formats a document tree as Yocton text.
///
/// # Examples
///
/// ```rust
/// let fields = yocton::yocton!({ "a": 1, "b": { "c": "x y" } });
/// assert_eq!(yocton::dumps(&fields), "a: 1\nb {\n\tc: \"x y\"\n}\n");
/// ```
#[must_use]
pub fn dumps(fields: &Fields) -> String {
    fields.to_string()
}

/// Serialize any `T: Serialize` to a Yocton string.
///
/// The top level must serialize as a struct or a map.
///
/// # Errors
///
/// Returns an error if the value has no Yocton representation.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, WriterOptions::default())
}

/// Serialize any `T: Serialize` to a Yocton string with custom indentation.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use yocton::{to_string_with_options, Indent, WriterOptions};
///
/// #[derive(Serialize)]
/// struct Inner { v: u8 }
/// #[derive(Serialize)]
/// struct Outer { inner: Inner }
///
/// let options = WriterOptions::new().with_indent(Indent::Spaces(2));
/// let text = to_string_with_options(&Outer { inner: Inner { v: 1 } }, options).unwrap();
/// assert_eq!(text, "inner {\n  v: 1\n}\n");
/// ```
///
/// # Errors
///
/// Returns an error if the value has no Yocton representation.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: WriterOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let mut buffer = Vec::new();
    to_writer_with_options(&mut buffer, value, options)?;
    String::from_utf8(buffer).map_err(Error::custom)
}

/// Serialize any `T: Serialize` to a writer in Yocton format.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, WriterOptions::default())
}

/// Serialize any `T: Serialize` to a writer in Yocton format with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(writer: W, value: &T, options: WriterOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let fields = to_fields(value)?;
    let mut writer = Writer::with_options(writer, options);
    fields.write(&mut writer);
    writer.into_inner()?;
    Ok(())
}

/// Deserialize an instance of type `T` from a string of Yocton text.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use yocton::from_str;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("x: 1\ny: 2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns the syntax error that stopped parsing, or an error if the document
/// does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_fields(loads(s)?)
}

/// Deserialize an instance of type `T` from an I/O stream of Yocton.
///
/// # Errors
///
/// Returns the syntax or I/O error that stopped parsing, or an error if the
/// document does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    from_fields(load(reader)?)
}

/// Deserialize an instance of type `T` from bytes of Yocton text.
///
/// # Errors
///
/// Returns the syntax error that stopped parsing, or an error if the document
/// does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_fields(load_slice(v)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
    }

    #[test]
    fn test_serialize_deserialize_point() {
        let point = Point { x: 1, y: 2 };
        let text = to_string(&point).unwrap();
        let point_back: Point = from_str(&text).unwrap();
        assert_eq!(point, point_back);
    }

    #[test]
    fn test_serialize_deserialize_user() {
        let user = User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
        };

        let text = to_string(&user).unwrap();
        assert_eq!(text, "id: 123\nname: Alice\nactive: true\ntags: admin\ntags: user\n");
        let user_back: User = from_str(&text).unwrap();
        assert_eq!(user, user_back);
    }

    #[test]
    fn test_syntax_error_is_returned() {
        let err = from_str::<Point>("x: 1\ny 2\n").unwrap_err();
        assert_eq!(err.to_string(), "2: ':' or '{' expected to follow field name");
    }

    #[test]
    fn test_to_writer() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &Point { x: 5, y: 6 }).unwrap();
        assert_eq!(buffer, b"x: 5\ny: 6\n");
    }

    #[test]
    fn test_from_reader() {
        let point: Point = from_reader(io::Cursor::new(b"y: 2\nx: 1\n")).unwrap();
        assert_eq!(point, Point { x: 1, y: 2 });
    }

    #[test]
    fn test_load_and_dumps() {
        let text = "a: 1\nb {\n\tc: \"two words\"\n}\n";
        let fields = loads(text).unwrap();
        assert_eq!(dumps(&fields), text);
    }
}
