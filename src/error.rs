//! Error types for Yocton reading and writing.
//!
//! Yocton records at most one error per stream. The reader never hands an
//! error back from the call that detected it; instead the error is stored in
//! the stream's sticky error state and every later read behaves as the end of
//! data. Callers check [`Stream::error`](crate::Stream::error) once, after the
//! traversal.
//!
//! ## Error Categories
//!
//! - **Syntax Errors**: malformed token sequences, unexpected braces or EOF
//! - **Constraint Errors**: semantic failures raised by calling code through
//!   [`Object::check`](crate::Object::check)
//! - **Allocation Errors**: token text could not grow
//! - **I/O Errors**: the byte source or output sink failed
//! - **Custom Errors**: raised by the serde layer
//!
//! ## Examples
//!
//! ```rust
//! use yocton::Stream;
//!
//! let stream = Stream::from_slice(b"}");
//! assert!(stream.root().next_property().is_none());
//!
//! let err = stream.error().unwrap();
//! assert_eq!(err.line(), Some(1));
//! assert_eq!(err.to_string(), "1: closing brace not expected at top level");
//! ```

use std::fmt;
use thiserror::Error;

pub(crate) const ERROR_ALLOC: &str = "memory allocation failure";
pub(crate) const ERROR_EOF: &str = "unexpected EOF";

/// Represents every error a Yocton stream, writer or serde conversion can record.
///
/// The display form of the line-carrying variants is `line: message`, which
/// is what the `yocton-print` tool reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed input
    #[error("{line}: {msg}")]
    Syntax { line: usize, msg: String },

    /// Failure declared by calling code through a check
    #[error("{line}: {msg}")]
    Constraint { line: usize, msg: String },

    /// Token text could not be allocated
    #[error("{line}: memory allocation failure")]
    Alloc { line: usize },

    /// The byte source or the output sink failed
    #[error("{line}: I/O error: {msg}")]
    Io { line: usize, msg: String },

    /// Error raised while mapping documents onto Rust types
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error at the given line.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yocton::Error;
    ///
    /// let err = Error::syntax(3, "unexpected EOF");
    /// assert_eq!(err.to_string(), "3: unexpected EOF");
    /// ```
    pub fn syntax(line: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            msg: msg.to_string(),
        }
    }

    /// Creates a constraint error, as raised by [`Object::check`](crate::Object::check).
    pub fn constraint(line: usize, msg: &str) -> Self {
        Error::Constraint {
            line,
            msg: msg.to_string(),
        }
    }

    /// Creates an I/O error at the given line.
    pub fn io(line: usize, err: &std::io::Error) -> Self {
        Error::Io {
            line,
            msg: err.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yocton::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert_eq!(err.line(), None);
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Line number at which the error was detected, if it came from a stream or writer.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Syntax { line, .. }
            | Error::Constraint { line, .. }
            | Error::Alloc { line }
            | Error::Io { line, .. } => Some(*line),
            Error::Custom(_) => None,
        }
    }

    /// The error message without the line prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Error::Syntax { msg, .. } | Error::Constraint { msg, .. } | Error::Io { msg, .. } => {
                msg
            }
            Error::Alloc { .. } => ERROR_ALLOC,
            Error::Custom(msg) => msg,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// The sticky, first-write-wins error slot shared by everything reading one stream.
#[derive(Debug, Default)]
pub(crate) struct ErrorState(Option<Error>);

impl ErrorState {
    /// Stores `err` unless an error is already recorded.
    pub(crate) fn record(&mut self, err: Error) {
        if self.0.is_some() {
            return;
        }
        tracing::debug!(line = ?err.line(), message = err.message(), "yocton error recorded");
        self.0 = Some(err);
    }

    #[inline]
    pub(crate) fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub(crate) fn get(&self) -> Option<&Error> {
        self.0.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_error_wins() {
        let mut state = ErrorState::default();
        assert!(!state.is_set());

        state.record(Error::syntax(2, "first"));
        state.record(Error::syntax(5, "second"));

        assert_eq!(state.get(), Some(&Error::syntax(2, "first")));
    }

    #[test]
    fn test_alloc_message() {
        let err = Error::Alloc { line: 7 };
        assert_eq!(err.message(), ERROR_ALLOC);
        assert_eq!(err.to_string(), "7: memory allocation failure");
    }

    #[test]
    fn test_io_display() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = Error::io(4, &io);
        assert_eq!(err.line(), Some(4));
        assert_eq!(err.to_string(), "4: I/O error: disk on fire");
    }
}
