//! Tokenizer: turns the byte stream into strings, colons and braces.

use crate::error::{Error, ErrorState, ERROR_EOF};
use crate::options::ReaderOptions;
use crate::reader::CharReader;
use crate::source::ByteSource;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Kind of token produced by [`Tokenizer::next_token`].
///
/// For [`Token::String`] the decoded text is held by the tokenizer until the
/// next call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Token {
    String,
    Colon,
    OpenBrace,
    CloseBrace,
    Eof,
    Error,
}

/// Returns `true` for bytes that may appear in a bare (unquoted) string.
#[inline]
pub(crate) fn is_bare_string_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'_' | b'-' | b'+' | b'.')
}

/// Returns `true` if `s` can be written without quotes.
///
/// # Examples
///
/// ```rust
/// use yocton::is_bare_string;
///
/// assert!(is_bare_string(b"sub-obj_1.2+3"));
/// assert!(!is_bare_string(b""));
/// assert!(!is_bare_string(b"two words"));
/// ```
pub fn is_bare_string(s: &[u8]) -> bool {
    !s.is_empty() && s.iter().all(|&c| is_bare_string_char(c))
}

pub(crate) struct Tokenizer<S> {
    reader: CharReader<S>,
    text: Vec<u8>,
    allow_comments: bool,
    at_start: bool,
}

impl<S: ByteSource> Tokenizer<S> {
    pub(crate) fn new(source: S, options: &ReaderOptions) -> Self {
        Tokenizer {
            reader: CharReader::new(source, options.buffer_size),
            text: Vec::new(),
            allow_comments: options.allow_comments,
            at_start: true,
        }
    }

    #[inline]
    pub(crate) fn line(&self) -> usize {
        self.reader.line()
    }

    /// Takes the text of the last string token.
    pub(crate) fn take_text(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.text)
    }

    /// Reads one token. Once `errors` is set, no more input is read.
    pub(crate) fn next_token(&mut self, errors: &mut ErrorState) -> Token {
        if errors.is_set() {
            return Token::Error;
        }
        if self.at_start {
            self.at_start = false;
            if !self.skip_bom(errors) {
                return Token::Error;
            }
        }

        let c = loop {
            let Some(c) = self.consume(errors) else {
                return self.end_of_input(errors);
            };
            match c {
                b' ' | b'\t' | b'\n' | b'\r' => {}
                b'/' if self.allow_comments => {
                    if !self.skip_comment(errors) {
                        return Token::Error;
                    }
                }
                _ => break c,
            }
        };

        match c {
            b':' => Token::Colon,
            b'{' => Token::OpenBrace,
            b'}' => Token::CloseBrace,
            b'"' => self.read_quoted(errors),
            c if is_bare_string_char(c) => self.read_bare(c, errors),
            _ => {
                self.error(errors, "unknown token: not valid bare-string character");
                Token::Error
            }
        }
    }

    fn end_of_input(&self, errors: &ErrorState) -> Token {
        // An I/O failure also looks like the end of input to the reader.
        if errors.is_set() {
            Token::Error
        } else {
            Token::Eof
        }
    }

    fn error(&self, errors: &mut ErrorState, msg: &str) {
        errors.record(Error::syntax(self.line(), msg));
    }

    fn peek(&mut self, errors: &mut ErrorState) -> Option<u8> {
        match self.reader.peek() {
            Ok(c) => c,
            Err(e) => {
                errors.record(Error::io(self.line(), &e));
                None
            }
        }
    }

    fn consume(&mut self, errors: &mut ErrorState) -> Option<u8> {
        match self.reader.consume() {
            Ok(c) => c,
            Err(e) => {
                errors.record(Error::io(self.line(), &e));
                None
            }
        }
    }

    fn push_text(&mut self, c: u8, errors: &mut ErrorState) -> bool {
        if self.text.len() == self.text.capacity() {
            let additional = self.text.len().max(64);
            if self.text.try_reserve(additional).is_err() {
                errors.record(Error::Alloc { line: self.line() });
                return false;
            }
        }
        self.text.push(c);
        true
    }

    fn skip_bom(&mut self, errors: &mut ErrorState) -> bool {
        if self.peek(errors) != Some(UTF8_BOM[0]) {
            return !errors.is_set();
        }
        for expected in UTF8_BOM {
            if self.consume(errors) != Some(expected) {
                self.error(errors, "invalid byte-order mark");
                return false;
            }
        }
        true
    }

    fn skip_comment(&mut self, errors: &mut ErrorState) -> bool {
        if self.consume(errors) != Some(b'/') {
            self.error(errors, "unknown token: '/' must begin a '//' comment");
            return false;
        }
        while let Some(c) = self.peek(errors) {
            if c == b'\n' {
                break;
            }
            self.consume(errors);
        }
        !errors.is_set()
    }

    fn read_bare(&mut self, first: u8, errors: &mut ErrorState) -> Token {
        self.text.clear();
        if !self.push_text(first, errors) {
            return Token::Error;
        }
        // Reaching EOF here is fine: a bare string may end the document.
        while let Some(c) = self.peek(errors) {
            if !is_bare_string_char(c) {
                break;
            }
            self.consume(errors);
            if !self.push_text(c, errors) {
                return Token::Error;
            }
        }
        if errors.is_set() {
            Token::Error
        } else {
            Token::String
        }
    }

    fn read_quoted(&mut self, errors: &mut ErrorState) -> Token {
        self.text.clear();
        loop {
            let Some(c) = self.consume(errors) else {
                self.error(errors, ERROR_EOF);
                return Token::Error;
            };
            let c = match c {
                b'"' => return Token::String,
                b'\\' => match self.read_escape(errors) {
                    Some(c) => c,
                    None => return Token::Error,
                },
                c => c,
            };
            if !self.push_text(c, errors) {
                return Token::Error;
            }
        }
    }

    fn read_escape(&mut self, errors: &mut ErrorState) -> Option<u8> {
        let Some(c) = self.consume(errors) else {
            self.error(errors, ERROR_EOF);
            return None;
        };
        let decoded = match c {
            b'n' => b'\n',
            b't' => b'\t',
            b'r' => b'\r',
            b'a' => 0x07,
            b'b' => 0x08,
            b'\\' => b'\\',
            b'"' => b'"',
            b'x' => return self.read_hex_escape(errors),
            other => {
                self.error(
                    errors,
                    &format!("unknown string escape: \\{}", char::from(other)),
                );
                return None;
            }
        };
        Some(decoded)
    }

    fn read_hex_escape(&mut self, errors: &mut ErrorState) -> Option<u8> {
        let mut value: u32 = 0;
        for _ in 0..2 {
            let Some(c) = self.consume(errors) else {
                self.error(errors, ERROR_EOF);
                return None;
            };
            let Some(digit) = char::from(c).to_digit(16) else {
                self.error(
                    errors,
                    "\\x sequence must be followed by two hexadecimal characters",
                );
                return None;
            };
            value = value * 16 + digit;
        }
        match value {
            0 => {
                self.error(errors, "NUL byte not allowed in \\x escape sequence");
                None
            }
            0x01..=0x1f => Some(value as u8),
            _ => {
                self.error(
                    errors,
                    "\\x escape sequence can only be used for control characters (ASCII 0x01-0x1f range)",
                );
                None
            }
        }
    }
}
