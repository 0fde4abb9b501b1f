//! Configuration options for reading and writing Yocton.
//!
//! - [`ReaderOptions`]: read buffer size and optional `//` comments
//! - [`WriterOptions`]: indentation style and output buffer size
//!
//! ## Examples
//!
//! ```rust
//! use yocton::{Indent, ReaderOptions, Stream, WriterOptions};
//!
//! let options = ReaderOptions::new().with_comments(true);
//! let stream = Stream::from_slice_with_options(b"// header\nname: value\n", options);
//! let prop = stream.root().next_property().unwrap();
//! assert_eq!(prop.value(), "value");
//!
//! let options = WriterOptions::new().with_indent(Indent::Spaces(2));
//! assert_eq!(options.indent, Indent::Spaces(2));
//! ```

/// Size of the read-ahead and output buffers unless configured otherwise.
pub const DEFAULT_BUFFER_SIZE: usize = 256;

/// Configuration for [`Stream`](crate::Stream).
///
/// # Examples
///
/// ```rust
/// use yocton::ReaderOptions;
///
/// let options = ReaderOptions::new();
/// assert_eq!(options.buffer_size, 256);
/// assert!(!options.allow_comments);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Capacity of the read-ahead buffer handed to the byte source.
    pub buffer_size: usize,
    /// Treat `//` up to the end of the line as whitespace.
    pub allow_comments: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            buffer_size: DEFAULT_BUFFER_SIZE,
            allow_comments: false,
        }
    }
}

impl ReaderOptions {
    /// Creates default options (256-byte buffer, no comments).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the read buffer capacity. A size of zero is raised to one byte.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yocton::ReaderOptions;
    ///
    /// assert_eq!(ReaderOptions::new().with_buffer_size(0).buffer_size, 1);
    /// ```
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    /// Enables or disables `//` line comments.
    #[must_use]
    pub fn with_comments(mut self, allow_comments: bool) -> Self {
        self.allow_comments = allow_comments;
        self
    }
}

/// Indentation emitted by [`Writer`](crate::Writer) for each nesting level.
///
/// # Examples
///
/// ```rust
/// use yocton::Indent;
///
/// assert_eq!(Indent::Tab.as_str(), "\t");
/// assert_eq!(Indent::Spaces(4).as_str(), "    ");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Indent {
    #[default]
    Tab,
    Spaces(usize),
}

impl Indent {
    /// Returns the text for one level of indentation.
    #[must_use]
    pub fn as_str(&self) -> String {
        match self {
            Indent::Tab => "\t".to_string(),
            Indent::Spaces(n) => " ".repeat(*n),
        }
    }
}

/// Configuration for [`Writer`](crate::Writer).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriterOptions {
    pub indent: Indent,
    pub buffer_size: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            indent: Indent::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl WriterOptions {
    /// Creates default options (tab indentation, 256-byte buffer).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation style.
    #[must_use]
    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    /// Sets how many bytes are buffered before they are handed to the sink.
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }
}
