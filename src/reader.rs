use crate::source::ByteSource;
use std::io;

/// Fixed-capacity read-ahead buffer over a [`ByteSource`], with line tracking.
///
/// End of input is not an error at this level; the tokenizer decides whether
/// running out of bytes is a valid EOF or a truncated document.
pub(crate) struct CharReader<S> {
    source: S,
    buf: Box<[u8]>,
    len: usize,
    pos: usize,
    line: usize,
    exhausted: bool,
}

impl<S: ByteSource> CharReader<S> {
    pub(crate) fn new(source: S, capacity: usize) -> Self {
        CharReader {
            source,
            buf: vec![0; capacity.max(1)].into_boxed_slice(),
            len: 0,
            pos: 0,
            line: 1,
            exhausted: false,
        }
    }

    /// Returns the next byte without consuming it, refilling the buffer if needed.
    pub(crate) fn peek(&mut self) -> io::Result<Option<u8>> {
        if self.pos >= self.len {
            if self.exhausted {
                return Ok(None);
            }
            let filled = match self.source.fill(&mut self.buf) {
                Ok(n) => n.min(self.buf.len()),
                Err(e) => {
                    self.exhausted = true;
                    return Err(e);
                }
            };
            tracing::trace!(bytes = filled, line = self.line, "refilled read buffer");
            if filled == 0 {
                // The source is never asked again once it reports the end.
                self.exhausted = true;
                return Ok(None);
            }
            self.len = filled;
            self.pos = 0;
        }
        Ok(Some(self.buf[self.pos]))
    }

    /// Consumes and returns the next byte, counting newlines.
    pub(crate) fn consume(&mut self) -> io::Result<Option<u8>> {
        let next = self.peek()?;
        if let Some(c) = next {
            self.pos += 1;
            if c == b'\n' {
                self.line += 1;
            }
        }
        Ok(next)
    }

    #[inline]
    pub(crate) fn line(&self) -> usize {
        self.line
    }
}
