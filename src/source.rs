//! Byte sources feeding a [`Stream`](crate::Stream).
//!
//! A source fills a caller-provided buffer and reports how many bytes it
//! wrote. Zero means the input is permanently exhausted; the stream never
//! calls the source again after that, nor after an error has been recorded.
//!
//! Any closure of the form `FnMut(&mut [u8]) -> usize` is a source, and
//! [`ReadSource`] adapts anything implementing [`std::io::Read`].
//!
//! ```rust
//! use yocton::Stream;
//!
//! let mut chunks = vec![&b"b: 2\n"[..], &b"a: 1\n"[..]];
//! let stream = Stream::new(move |buf: &mut [u8]| match chunks.pop() {
//!     Some(chunk) => {
//!         buf[..chunk.len()].copy_from_slice(chunk);
//!         chunk.len()
//!     }
//!     None => 0,
//! });
//!
//! let root = stream.root();
//! assert_eq!(root.next_property().unwrap().name(), "a");
//! assert_eq!(root.next_property().unwrap().name(), "b");
//! assert!(root.next_property().is_none());
//! ```

use std::io::{self, Read};

/// Supplier of raw input bytes.
pub trait ByteSource {
    /// Fills `buf` with up to `buf.len()` bytes and returns how many were written.
    ///
    /// `Ok(0)` signals the end of input.
    ///
    /// # Errors
    ///
    /// An error is recorded by the stream as a sticky I/O error.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl<F> ByteSource for F
where
    F: FnMut(&mut [u8]) -> usize,
{
    #[inline]
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self(buf))
    }
}

/// Adapts an [`io::Read`] (a file, a socket, a byte slice) into a [`ByteSource`].
///
/// Interrupted reads are retried; other failures are reported to the stream.
#[derive(Debug)]
pub struct ReadSource<R> {
    reader: R,
}

impl<R: Read> ReadSource<R> {
    pub fn new(reader: R) -> Self {
        ReadSource { reader }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> ByteSource for ReadSource<R> {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.reader.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flaky {
        interrupted: bool,
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::new(io::ErrorKind::Interrupted, "again"));
            }
            buf[0] = b'x';
            Ok(1)
        }
    }

    #[test]
    fn test_read_source_retries_interrupted() {
        let mut source = ReadSource::new(Flaky { interrupted: false });
        let mut buf = [0u8; 4];
        assert_eq!(source.fill(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], b'x');
    }

    #[test]
    fn test_closure_source() {
        let mut source = |buf: &mut [u8]| {
            buf[0] = b'a';
            1
        };
        let mut buf = [0u8; 1];
        assert_eq!(ByteSource::fill(&mut source, &mut buf).unwrap(), 1);
        assert_eq!(&buf, b"a");
    }
}
