//! The Yocton pull parser.
//!
//! A [`Stream`] owns the input and all parse state. Traversal goes through
//! [`Object`] handles: each call to [`Object::next_property`] reads exactly one
//! property from the shared input and returns it as a [`Property`]. A
//! property whose value is a nested object hands out a child [`Object`] via
//! [`Property::inner`].
//!
//! ## Forward-only traversal
//!
//! The input is read exactly once, in document order. If the caller stops
//! reading a nested object early and asks its parent for the next property,
//! the parser first consumes the unread remainder of the nested object (and
//! anything nested inside it). Handles to objects that were skipped or have
//! finished stay safe to use; they simply report no more properties.
//!
//! ## Deferred error checking
//!
//! Errors are recorded once per stream, first error wins, and from then on
//! every read reports the end of data. Straight-line traversal code can ignore
//! errors entirely and check [`Stream::error`] once at the end:
//!
//! ```rust
//! use yocton::{PropertyKind, Stream};
//!
//! let stream = Stream::from_slice(b"name: widget\nsize {\n  w: 3\n  h: 4\n}\n");
//! let root = stream.root();
//!
//! let mut name = String::new();
//! let mut area = 0u32;
//! while let Some(prop) = root.next_property() {
//!     match &*prop.name() {
//!         "name" => name = prop.to_value_string(),
//!         "size" => {
//!             let size = prop.inner();
//!             let mut dims = Vec::new();
//!             while let Some(dim) = size.next_property() {
//!                 dims.push(dim.parse::<u32>());
//!             }
//!             area = dims.iter().product();
//!         }
//!         _ => {}
//!     }
//! }
//!
//! assert!(stream.error().is_none());
//! assert_eq!(name, "widget");
//! assert_eq!(area, 12);
//! ```

use crate::error::{Error, ErrorState, ERROR_EOF};
use crate::options::ReaderOptions;
use crate::source::{ByteSource, ReadSource};
use crate::token::{Token, Tokenizer};
use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

type ObjectId = u64;

const ROOT_ID: ObjectId = 0;
// Handed out for type mismatches; never matches an open object.
const DETACHED_ID: ObjectId = ObjectId::MAX;

/// Whether a property holds a string value or a nested object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    String,
    Object,
}

#[derive(Debug)]
enum RawValue {
    Text(Vec<u8>),
    Object(ObjectId),
}

#[derive(Debug)]
struct RawProperty {
    name: Vec<u8>,
    value: RawValue,
}

struct Parser<S> {
    tokens: Tokenizer<S>,
    errors: ErrorState,
    // Ids of the objects that have not finished, outermost (the root) first.
    // Only the last one may read tokens.
    open: Vec<ObjectId>,
    root_finished: bool,
    next_id: ObjectId,
}

impl<S: ByteSource> Parser<S> {
    fn new(source: S, options: &ReaderOptions) -> Self {
        Parser {
            tokens: Tokenizer::new(source, options),
            errors: ErrorState::default(),
            open: vec![ROOT_ID],
            root_finished: false,
            next_id: ROOT_ID + 1,
        }
    }

    fn syntax_error(&mut self, msg: &str) {
        let line = self.tokens.line();
        self.errors.record(Error::syntax(line, msg));
    }

    fn next_property(&mut self, id: ObjectId) -> Option<RawProperty> {
        if self.errors.is_set() {
            return None;
        }
        // Finished, skipped and detached objects are no longer on the stack.
        let depth = self.open.iter().rposition(|&open| open == id)?;
        if depth == 0 && self.root_finished {
            return None;
        }
        self.skip_forward(depth);
        if self.errors.is_set() {
            return None;
        }
        self.read_property()
    }

    /// Consumes whatever is left of the objects nested below `depth`.
    fn skip_forward(&mut self, depth: usize) {
        while self.open.len() > depth + 1 {
            if self.read_property().is_none() && self.errors.is_set() {
                return;
            }
        }
    }

    /// Reads the next property of the innermost open object.
    fn read_property(&mut self) -> Option<RawProperty> {
        let at_root = self.open.len() == 1;
        match self.tokens.next_token(&mut self.errors) {
            Token::String => self.read_property_body(),
            Token::CloseBrace => {
                if at_root {
                    self.syntax_error("closing brace not expected at top level");
                } else {
                    self.open.pop();
                }
                None
            }
            Token::Eof => {
                // EOF is only valid at the top level.
                if at_root {
                    self.root_finished = true;
                } else {
                    self.syntax_error(ERROR_EOF);
                }
                None
            }
            Token::Colon | Token::OpenBrace => {
                self.syntax_error("expected start of next field");
                None
            }
            Token::Error => None,
        }
    }

    fn read_property_body(&mut self) -> Option<RawProperty> {
        let name = self.tokens.take_text();
        match self.tokens.next_token(&mut self.errors) {
            Token::Colon => match self.tokens.next_token(&mut self.errors) {
                Token::String => Some(RawProperty {
                    name,
                    value: RawValue::Text(self.tokens.take_text()),
                }),
                _ => {
                    self.syntax_error("string expected to follow ':'");
                    None
                }
            },
            Token::OpenBrace => {
                if self.open.try_reserve(1).is_err() {
                    let line = self.tokens.line();
                    self.errors.record(Error::Alloc { line });
                    return None;
                }
                let id = self.next_id;
                self.next_id += 1;
                self.open.push(id);
                Some(RawProperty {
                    name,
                    value: RawValue::Object(id),
                })
            }
            _ => {
                self.syntax_error("':' or '{' expected to follow field name");
                None
            }
        }
    }
}

/// A Yocton parse session: the input, the parse state and the sticky error.
///
/// Every [`Object`] and [`Property`] borrows the stream they came from.
/// Dropping the stream releases everything.
pub struct Stream<S> {
    parser: RefCell<Parser<S>>,
}

impl<S: ByteSource> Stream<S> {
    /// Creates a stream pulling bytes from `source`.
    pub fn new(source: S) -> Self {
        Self::with_options(source, ReaderOptions::default())
    }

    pub fn with_options(source: S, options: ReaderOptions) -> Self {
        Stream {
            parser: RefCell::new(Parser::new(source, &options)),
        }
    }

    /// Returns the top-level object of the document.
    pub fn root(&self) -> Object<'_, S> {
        Object {
            stream: self,
            id: ROOT_ID,
        }
    }

    /// Returns the first error recorded while reading, if any.
    ///
    /// Asking repeatedly always returns the same error.
    #[must_use]
    pub fn error(&self) -> Option<Error> {
        self.parser.borrow().errors.get().cloned()
    }

    #[must_use]
    pub fn has_error(&self) -> bool {
        self.parser.borrow().errors.is_set()
    }

    /// Current line number of the input (1-based).
    #[must_use]
    pub fn line(&self) -> usize {
        self.parser.borrow().tokens.line()
    }

    fn record_constraint(&self, msg: &str) {
        let mut parser = self.parser.borrow_mut();
        let line = parser.tokens.line();
        parser.errors.record(Error::constraint(line, msg));
    }
}

impl<R: Read> Stream<ReadSource<R>> {
    /// Creates a stream over anything implementing [`Read`].
    pub fn from_reader(reader: R) -> Self {
        Stream::new(ReadSource::new(reader))
    }

    pub fn from_reader_with_options(reader: R, options: ReaderOptions) -> Self {
        Stream::with_options(ReadSource::new(reader), options)
    }
}

impl<'a> Stream<ReadSource<&'a [u8]>> {
    /// Creates a stream over an in-memory document.
    pub fn from_slice(input: &'a [u8]) -> Self {
        Stream::from_reader(input)
    }

    pub fn from_slice_with_options(input: &'a [u8], options: ReaderOptions) -> Self {
        Stream::from_reader_with_options(input, options)
    }
}

impl Stream<ReadSource<File>> {
    /// Opens the file at `path` for reading.
    ///
    /// # Errors
    ///
    /// Returns the error from opening the file. Errors while reading it are
    /// recorded in the stream like any other.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Stream::from_reader(File::open(path)?))
    }
}

impl<S> fmt::Debug for Stream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream").finish_non_exhaustive()
    }
}

/// Handle to one `{ ... }` scope of a [`Stream`], or to the top level.
///
/// Handles are cheap to copy. A handle to an object that has finished, or
/// that was skipped because its parent moved on, yields no more properties.
pub struct Object<'s, S> {
    stream: &'s Stream<S>,
    id: ObjectId,
}

impl<S> Clone for Object<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Object<'_, S> {}

impl<'s, S: ByteSource> Object<'s, S> {
    /// Reads the next property of this object.
    ///
    /// Returns `None` at the end of the object, after an error, or when this
    /// handle is no longer current. Use [`Stream::error`] to tell these apart.
    pub fn next_property(&self) -> Option<Property<'s, S>> {
        let raw = self.stream.parser.borrow_mut().next_property(self.id)?;
        Some(Property {
            stream: self.stream,
            name: raw.name,
            value: raw.value,
        })
    }

    /// Iterates over the remaining properties of this object.
    pub fn properties(&self) -> Properties<'s, S> {
        Properties { object: *self }
    }

    /// Records `message` as an error at the current line unless `condition` holds.
    ///
    /// Returns `condition`. This is how calling code reports semantic problems
    /// (a value out of range, a missing field) through the same single error
    /// check as syntax errors.
    ///
    /// ```rust
    /// use yocton::Stream;
    ///
    /// let stream = Stream::from_slice(b"port: 99999\n");
    /// let root = stream.root();
    /// while let Some(prop) = root.next_property() {
    ///     let port = prop.parse::<u32>();
    ///     root.check("port out of range", port <= 65535);
    /// }
    /// assert_eq!(stream.error().unwrap().to_string(), "1: port out of range");
    /// ```
    pub fn check(&self, message: &str, condition: bool) -> bool {
        if !condition {
            self.stream.record_constraint(message);
        }
        condition
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }

    /// The stream this object belongs to.
    pub fn stream(&self) -> &'s Stream<S> {
        self.stream
    }
}

impl<S> fmt::Debug for Object<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object").field("id", &self.id).finish()
    }
}

/// Iterator over the properties of an [`Object`], created by [`Object::properties`].
pub struct Properties<'s, S> {
    object: Object<'s, S>,
}

impl<'s, S: ByteSource> Iterator for Properties<'s, S> {
    type Item = Property<'s, S>;

    fn next(&mut self) -> Option<Self::Item> {
        self.object.next_property()
    }
}

/// One name/value pair read from a [`Stream`].
///
/// Names and values are byte strings; the `&str` accessors decode them as
/// UTF-8, replacing invalid sequences. The handle returned by
/// [`Property::inner`] stays current only until the owning object is asked
/// for its next property.
pub struct Property<'s, S> {
    stream: &'s Stream<S>,
    name: Vec<u8>,
    value: RawValue,
}

impl<'s, S: ByteSource> Property<'s, S> {
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        match self.value {
            RawValue::Text(_) => PropertyKind::String,
            RawValue::Object(_) => PropertyKind::Object,
        }
    }

    #[must_use]
    pub fn is_object(&self) -> bool {
        self.kind() == PropertyKind::Object
    }

    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    pub fn name_bytes(&self) -> &[u8] {
        &self.name
    }

    /// The string value of this property.
    ///
    /// Asking for the value of an object property records an error and
    /// returns an empty string.
    pub fn value(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.value_bytes())
    }

    /// The raw bytes of the value; see [`Property::value`].
    pub fn value_bytes(&self) -> &[u8] {
        match &self.value {
            RawValue::Text(text) => text,
            RawValue::Object(_) => {
                self.stream.record_constraint(&format!(
                    "property '{}' has object, not value type",
                    self.name()
                ));
                &[]
            }
        }
    }

    /// An owned copy of the value, for storing into caller-owned structures.
    pub fn to_value_string(&self) -> String {
        self.value().into_owned()
    }

    /// The nested object of this property.
    ///
    /// Asking for the object of a string property records an error and
    /// returns a handle that yields no properties.
    pub fn inner(&self) -> Object<'s, S> {
        let id = match self.value {
            RawValue::Object(id) => id,
            RawValue::Text(_) => {
                self.stream.record_constraint(&format!(
                    "property '{}' has value, not object type",
                    self.name()
                ));
                DETACHED_ID
            }
        };
        Object {
            stream: self.stream,
            id,
        }
    }

    /// Parses the value with [`FromStr`].
    ///
    /// On failure an error is recorded and `T::default()` is returned, so
    /// reading can carry on until the final error check.
    ///
    /// ```rust
    /// use yocton::Stream;
    ///
    /// let stream = Stream::from_slice(b"count: 12\nlimit: lots\n");
    /// let root = stream.root();
    /// assert_eq!(root.next_property().unwrap().parse::<i8>(), 12);
    /// assert_eq!(root.next_property().unwrap().parse::<i8>(), 0);
    /// assert_eq!(stream.error().unwrap().message(), "invalid value for 'limit': lots");
    /// ```
    pub fn parse<T>(&self) -> T
    where
        T: FromStr + Default,
    {
        let value = self.value();
        match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                self.stream.record_constraint(&format!(
                    "invalid value for '{}': {}",
                    self.name(),
                    value
                ));
                T::default()
            }
        }
    }

    /// Looks the value up in `names`, returning its position.
    ///
    /// An unknown value records an error and returns `None`.
    ///
    /// ```rust
    /// use yocton::Stream;
    ///
    /// let stream = Stream::from_slice(b"level: warn\n");
    /// let prop = stream.root().next_property().unwrap();
    /// assert_eq!(prop.enum_index(&["debug", "info", "warn"]), Some(2));
    /// ```
    pub fn enum_index(&self, names: &[&str]) -> Option<usize> {
        let value = self.value();
        let index = names.iter().position(|name| *name == value);
        if index.is_none() {
            self.stream.record_constraint(&format!(
                "unknown value for '{}': {}",
                self.name(),
                value
            ));
        }
        index
    }
}

impl<S> fmt::Debug for Property<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Property");
        debug.field("name", &String::from_utf8_lossy(&self.name));
        match &self.value {
            RawValue::Text(text) => debug.field("value", &String::from_utf8_lossy(text)),
            RawValue::Object(id) => debug.field("object", id),
        };
        debug.finish()
    }
}
