//! Parser for the request line, `METHOD SP TARGET SP HTTP/VERSION`.

use crate::ensure;
use crate::protocol::{DecodeError, RequestLine};

const HTTP_NAME: &str = "HTTP";
const SUPPORTED_VERSION: &str = "1.1";

/// Parses one request line, given without its CRLF.
///
/// # Errors
///
/// - [`DecodeError::MalformedRequestLine`] unless the line is exactly three
///   non-empty tokens separated by single spaces
/// - [`DecodeError::MalformedVersion`] unless the third token is `HTTP/<version>`
/// - [`DecodeError::UnsupportedVersion`] for any version other than `1.1`
pub fn parse_request_line(line: &[u8]) -> Result<RequestLine, DecodeError> {
    let line = std::str::from_utf8(line).map_err(|_| DecodeError::malformed_request_line(String::from_utf8_lossy(line)))?;

    let parts: Vec<&str> = line.split(' ').collect();
    let [method, target, version] = parts[..] else {
        return Err(DecodeError::malformed_request_line(line));
    };
    ensure!(!method.is_empty() && !target.is_empty(), DecodeError::malformed_request_line(line));

    let Some((name, number)) = version.split_once('/') else {
        return Err(DecodeError::malformed_version(version));
    };
    ensure!(name == HTTP_NAME && !number.contains('/'), DecodeError::malformed_version(version));
    ensure!(number == SUPPORTED_VERSION, DecodeError::unsupported_version(number));

    Ok(RequestLine::new(method, target, number))
}
