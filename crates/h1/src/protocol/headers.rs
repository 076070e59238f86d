//! Case-insensitive header set with incremental, line based ingestion.
//!
//! Field names are stored lower-cased. Setting a name that is already present
//! appends the new value after `", "`, which is the HTTP rule for combining
//! repeated fields into one.
//!
//! [`Headers::parse_block`] consumes complete `name: value\r\n` lines from the
//! front of a buffer and leaves any undelimited fragment in place, so it can
//! be called again once more bytes arrive.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

use tracing::trace;

use crate::ensure;
use crate::protocol::DecodeError;
use crate::utils::{CRLF, find_crlf};

/// Name of the header declaring the body length, in its stored form.
pub const CONTENT_LENGTH: &str = "content-length";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: BTreeMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `name` ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Stores `value` under `name`, or appends `", " + value` when the name is
    /// already present. Never overwrites.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.inner.entry(name.to_ascii_lowercase()) {
            Entry::Vacant(entry) => {
                entry.insert(value.to_owned());
            }
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.push_str(", ");
                existing.push_str(value);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates `(name, value)` pairs ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Splits one header line into its lower-cased name and trimmed value.
    ///
    /// A trailing CRLF is tolerated. The name is not checked against the token
    /// grammar here, [`Headers::parse_block`] does that.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::MalformedHeader`] when there is no colon or the line is not UTF-8
    /// - [`DecodeError::InvalidFieldSpacing`] when whitespace sits right before the colon
    pub fn parse_line(raw: &[u8]) -> Result<(String, String), DecodeError> {
        let raw = raw.strip_suffix(CRLF).unwrap_or(raw);
        let line = std::str::from_utf8(raw).map_err(|_| DecodeError::malformed_header(String::from_utf8_lossy(raw)))?;

        let Some((name, value)) = line.split_once(':') else {
            return Err(DecodeError::malformed_header(line));
        };

        ensure!(!name.ends_with([' ', '\t']), DecodeError::invalid_field_spacing(name.trim()));

        Ok((name.trim().to_ascii_lowercase(), value.trim().to_owned()))
    }

    /// Consumes zero or more complete lines from the front of `data`.
    ///
    /// Returns how many bytes were consumed and whether the empty line that
    /// terminates the header block was reached. The terminator itself is
    /// consumed, anything after it is not touched. A trailing line without
    /// CRLF is left for the next call.
    ///
    /// # Errors
    ///
    /// Whatever [`Headers::parse_line`] reports, plus
    /// [`DecodeError::InvalidToken`] for a field name outside the token grammar.
    pub fn parse_block(&mut self, data: &[u8]) -> Result<(usize, bool), DecodeError> {
        let mut consumed = 0;

        while let Some(idx) = find_crlf(&data[consumed..]) {
            if idx == 0 {
                consumed += CRLF.len();
                trace!(consumed, "header block complete");
                return Ok((consumed, true));
            }

            let line = &data[consumed..consumed + idx];
            consumed += idx + CRLF.len();

            let (name, value) = Self::parse_line(line)?;
            ensure!(is_token(&name), DecodeError::invalid_token(name));

            trace!(name = %name, value = %value, "parsed header line");
            self.set(&name, &value);
        }

        Ok((consumed, false))
    }

    /// The declared body length, `None` when no `Content-Length` was seen.
    ///
    /// # Errors
    ///
    /// [`DecodeError::InvalidContentLength`] unless the value is a plain base-10
    /// number. Repeated fields fold into `"a, b"` and are rejected as well.
    pub fn content_length(&self) -> Result<Option<u64>, DecodeError> {
        let Some(value) = self.get(CONTENT_LENGTH) else {
            return Ok(None);
        };

        ensure!(!value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()), DecodeError::invalid_content_length(value));

        value.parse::<u64>().map(Some).map_err(|_| DecodeError::invalid_content_length(value))
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "- {name}: {value}")?;
        }
        Ok(())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Headers {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.set(name, value);
        }
        headers
    }
}

/// `tchar` from RFC 9110, section 5.6.2.
#[inline]
fn is_tchar(b: u8) -> bool {
    matches!(b,
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
    ) || b.is_ascii_alphanumeric()
}

pub(crate) fn is_token(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(is_tchar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn get_ignores_case() {
        let mut headers = Headers::new();
        headers.set("Host", "localhost:42069");
        headers.set("user-agent", "curl/7.81.0");
        headers.set("ACCEPT", "*/*");

        for name in ["host", "HOST", "Host", "hOsT"] {
            assert_eq!(headers.get(name), Some("localhost:42069"));
        }
        for name in ["User-Agent", "USER-AGENT", "user-agent"] {
            assert_eq!(headers.get(name), Some("curl/7.81.0"));
        }
        assert_eq!(headers.get("accept"), Some("*/*"));
        assert_eq!(headers.get("missing"), None);
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn set_folds_repeated_names() {
        let mut headers = Headers::new();
        headers.set("X", "a");
        headers.set("x", "b");
        assert_eq!(headers.get("X"), Some("a, b"));

        headers.set("X", "c");
        assert_eq!(headers.get("x"), Some("a, b, c"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn parse_line_splits_on_first_colon() {
        let (name, value) = Headers::parse_line(b"Host: localhost:42069\r\n").unwrap();
        assert_eq!(name, "host");
        assert_eq!(value, "localhost:42069");

        let (name, value) = Headers::parse_line(b"  X-Empty:   ").unwrap();
        assert_eq!(name, "x-empty");
        assert_eq!(value, "");
    }

    #[test]
    fn parse_line_without_colon() {
        let err = Headers::parse_line(b"Host localhost\r\n").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedHeader { .. }), "{err:?}");
    }

    #[test]
    fn parse_line_with_space_before_colon() {
        let err = Headers::parse_line(b"Host : x\r\n").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidFieldSpacing { ref name } if name == "Host"), "{err:?}");

        let err = Headers::parse_line(b"Host\t: x").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidFieldSpacing { .. }), "{err:?}");
    }

    #[test]
    fn parse_block_stops_at_terminator() {
        let data = indoc! {"
            Host: localhost:42069
            Accept: */*

            body"}
        .replace('\n', "\r\n");

        let mut headers = Headers::new();
        let (consumed, complete) = headers.parse_block(data.as_bytes()).unwrap();

        assert!(complete);
        assert_eq!(&data[consumed..], "body");
        assert_eq!(headers.get("host"), Some("localhost:42069"));
        assert_eq!(headers.get("accept"), Some("*/*"));
    }

    #[test]
    fn parse_block_leaves_partial_line() {
        let mut headers = Headers::new();
        let (consumed, complete) = headers.parse_block(b"Host: a\r\nAcce").unwrap();

        assert!(!complete);
        assert_eq!(consumed, 9);
        assert_eq!(headers.len(), 1);

        let (consumed, complete) = headers.parse_block(b"Acce").unwrap();
        assert!(!complete);
        assert_eq!(consumed, 0);
    }

    #[test]
    fn parse_block_empty_line_first() {
        let mut headers = Headers::new();
        let (consumed, complete) = headers.parse_block(b"\r\nHost: a\r\n").unwrap();

        assert!(complete);
        assert_eq!(consumed, 2);
        assert!(headers.is_empty());
    }

    #[test]
    fn parse_block_folds_duplicates() {
        let mut headers = Headers::new();
        headers.parse_block(b"Set-Person: lane\r\nSet-Person: prime\r\n\r\n").unwrap();
        assert_eq!(headers.get("set-person"), Some("lane, prime"));
    }

    #[test]
    fn parse_block_rejects_bad_token() {
        let mut headers = Headers::new();
        let err = headers.parse_block(b"H\xc2\xa9st: localhost\r\n\r\n").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidToken { .. }), "{err:?}");

        let err = headers.parse_block(b"Ho(st: localhost\r\n\r\n").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidToken { .. }), "{err:?}");

        let err = headers.parse_block(b": no-name\r\n\r\n").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidToken { .. }), "{err:?}");
    }

    #[test]
    fn token_grammar() {
        assert!(is_token("content-length"));
        assert!(is_token("x!#$%&'*+-.^_`|~09az"));
        assert!(!is_token(""));
        assert!(!is_token("two words"));
        assert!(!is_token("a:b"));
        assert!(!is_token("quote\""));
    }

    #[test]
    fn content_length_parsing() {
        let headers: Headers = [("Content-Length", "13")].into_iter().collect();
        assert_eq!(headers.content_length().unwrap(), Some(13));

        assert_eq!(Headers::new().content_length().unwrap(), None);

        for bad in ["-1", "+5", "abc", "", "1 2", "18446744073709551616"] {
            let headers: Headers = [("content-length", bad)].into_iter().collect();
            let err = headers.content_length().unwrap_err();
            assert!(matches!(err, DecodeError::InvalidContentLength { .. }), "{bad}: {err:?}");
        }

        let headers: Headers = [("content-length", "5"), ("content-length", "5")].into_iter().collect();
        assert!(headers.content_length().is_err());
    }
}
