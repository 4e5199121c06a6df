//! Keytab materialization.
//!
//! Resolves the two keytab source representations into one readable byte
//! stream: inline base64 text when present, a filesystem path otherwise.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use freeipa_core::{Error, Result};
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, Cursor, Read};

/// Readable stream over keytab material.
///
/// The underlying descriptor, if any, is closed exactly once when the
/// stream is dropped, on every exit path.
#[derive(Debug)]
pub enum KeytabStream {
    /// Keytab bytes decoded from inline base64 text.
    Inline(Cursor<Vec<u8>>),
    /// Keytab file opened for reading.
    File(File),
}

impl Read for KeytabStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Inline(cursor) => cursor.read(buf),
            Self::File(file) => file.read(buf),
        }
    }
}

/// Turns a (path, base64 text) pair into a readable keytab stream.
///
/// Non-empty base64 text always wins; the path is not touched in that
/// case, regardless of its value. Whitespace anywhere in the base64 text
/// is stripped before decoding to tolerate keytabs that were encoded with
/// inserted line breaks; decoding uses the standard alphabet with required
/// padding.
///
/// # Errors
///
/// - [`Error::KeytabDecode`] when the base64 text cannot be decoded; the
///   decoder's failure text is preserved.
/// - [`Error::EmptyKeytabPath`] when neither source holds a value.
/// - [`Error::KeytabNotFound`] when the file at `path` cannot be opened;
///   the OS failure text is preserved.
pub fn materialize(path: &str, base64_text: &str) -> Result<KeytabStream> {
    if !base64_text.is_empty() {
        let compact = compact_base64_whitespace(base64_text);
        let decoded = STANDARD
            .decode(compact.as_bytes())
            .map_err(|err| Error::KeytabDecode(err.to_string()))?;
        return Ok(KeytabStream::Inline(Cursor::new(decoded)));
    }

    if path.is_empty() {
        return Err(Error::EmptyKeytabPath);
    }

    let file = File::open(path).map_err(|err| Error::KeytabNotFound {
        path: path.to_string(),
        reason: err.to_string(),
    })?;
    Ok(KeytabStream::File(file))
}

const fn is_base64_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\u{0b}' | '\u{0c}')
}

/// Strips the whitespace set base64 emitters commonly insert, anywhere in
/// the string. Allocates only when at least one such character is present.
fn compact_base64_whitespace(text: &str) -> Cow<'_, str> {
    if text.chars().any(is_base64_whitespace) {
        Cow::Owned(text.chars().filter(|ch| !is_base64_whitespace(*ch)).collect())
    } else {
        Cow::Borrowed(text)
    }
}
