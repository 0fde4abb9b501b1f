//! Yocton output.
//!
//! [`Writer`] emits a document one property at a time. Names and values are
//! written bare when they consist only of bare-string characters and quoted
//! otherwise, so anything written can be read back by a
//! [`Stream`](crate::Stream).
//!
//! ```rust
//! use yocton::Writer;
//!
//! let mut writer = Writer::new(Vec::new());
//! writer.field("name", "hello world");
//! writer.begin_subobject("size");
//! writer.field("w", "3");
//! writer.end_subobject();
//!
//! let out = writer.into_inner().unwrap();
//! assert_eq!(out, b"name: \"hello world\"\nsize {\n\tw: 3\n}\n");
//! ```
//!
//! The only bytes that do not survive a round trip are NUL bytes: they are
//! written as `\x00`, which the reader rejects.

use crate::error::{Error, ErrorState, Result};
use crate::options::WriterOptions;
use crate::token::is_bare_string;
use std::fmt;
use std::io::Write;

/// Buffered Yocton emitter over any [`Write`] sink.
///
/// Like the reader, the writer keeps a sticky error: once the sink fails,
/// every later call does nothing, and the failure is reported by
/// [`Writer::error`], [`Writer::flush`] and [`Writer::into_inner`].
///
/// Output is held in an internal buffer; call [`Writer::flush`] or
/// [`Writer::into_inner`] when done.
pub struct Writer<W: Write> {
    sink: W,
    buf: Vec<u8>,
    buffer_size: usize,
    indent: String,
    level: usize,
    line: usize,
    errors: ErrorState,
}

impl<W: Write> Writer<W> {
    pub fn new(sink: W) -> Self {
        Self::with_options(sink, WriterOptions::default())
    }

    pub fn with_options(sink: W, options: WriterOptions) -> Self {
        let buffer_size = options.buffer_size.max(1);
        Writer {
            sink,
            buf: Vec::with_capacity(buffer_size),
            buffer_size,
            indent: options.indent.as_str(),
            level: 0,
            line: 1,
            errors: ErrorState::default(),
        }
    }

    /// Writes a `name: value` property at the current nesting level.
    pub fn field(&mut self, name: impl AsRef<[u8]>, value: impl AsRef<[u8]>) {
        self.write_indent();
        self.write_string(name.as_ref());
        self.push(b": ");
        self.write_string(value.as_ref());
        self.push(b"\n");
    }

    /// Opens a `name { ... }` object; following properties go inside it.
    pub fn begin_subobject(&mut self, name: impl AsRef<[u8]>) {
        self.write_indent();
        self.write_string(name.as_ref());
        self.push(b" {\n");
        self.level += 1;
    }

    /// Closes the innermost open object.
    ///
    /// Closing at the top level records an error.
    pub fn end_subobject(&mut self) {
        if self.errors.is_set() {
            return;
        }
        if self.level == 0 {
            self.errors.record(Error::constraint(
                self.line,
                "end_subobject called at top level",
            ));
            return;
        }
        self.level -= 1;
        self.write_indent();
        self.push(b"}\n");
    }

    /// Hands all buffered output to the sink and flushes it.
    ///
    /// # Errors
    ///
    /// Returns the recorded error, either from an earlier call or from this flush.
    pub fn flush(&mut self) -> Result<()> {
        self.drain();
        if !self.errors.is_set() {
            if let Err(e) = self.sink.flush() {
                self.errors.record(Error::io(self.line, &e));
            }
        }
        match self.errors.get() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Flushes and returns the sink.
    ///
    /// # Errors
    ///
    /// Returns the recorded error if any write failed.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.sink)
    }

    #[must_use]
    pub fn error(&self) -> Option<Error> {
        self.errors.get().cloned()
    }

    #[must_use]
    pub fn has_error(&self) -> bool {
        self.errors.is_set()
    }

    /// Number of objects currently open.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    fn write_indent(&mut self) {
        if self.level > 0 {
            let indent = self.indent.repeat(self.level);
            self.push(indent.as_bytes());
        }
    }

    fn write_string(&mut self, s: &[u8]) {
        if is_bare_string(s) {
            self.push(s);
            return;
        }
        let mut quoted = Vec::with_capacity(s.len() + 2);
        quoted.push(b'"');
        for &byte in s {
            match byte {
                b'\n' => quoted.extend_from_slice(b"\\n"),
                b'\t' => quoted.extend_from_slice(b"\\t"),
                b'\\' => quoted.extend_from_slice(b"\\\\"),
                b'"' => quoted.extend_from_slice(b"\\\""),
                0x00..=0x1f => {
                    // Writing into a Vec cannot fail.
                    let _ = write!(quoted, "\\x{byte:02x}");
                }
                _ => quoted.push(byte),
            }
        }
        quoted.push(b'"');
        self.push(&quoted);
    }

    fn push(&mut self, bytes: &[u8]) {
        if self.errors.is_set() {
            return;
        }
        self.line += bytes.iter().filter(|&&b| b == b'\n').count();
        self.buf.extend_from_slice(bytes);
        if self.buf.len() >= self.buffer_size {
            self.drain();
        }
    }

    fn drain(&mut self) {
        if self.errors.is_set() || self.buf.is_empty() {
            return;
        }
        tracing::trace!(bytes = self.buf.len(), line = self.line, "writing output buffer");
        if let Err(e) = self.sink.write_all(&self.buf) {
            self.errors.record(Error::io(self.line, &e));
        }
        self.buf.clear();
    }
}

impl<W: Write> fmt::Debug for Writer<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("level", &self.level)
            .field("line", &self.line)
            .field("buffered", &self.buf.len())
            .finish_non_exhaustive()
    }
}
