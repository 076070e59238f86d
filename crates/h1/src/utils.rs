//! Small helpers shared by the decoder and the server glue.

/// Returns early with `Err($error)` when `$predicate` does not hold.
///
/// Works like `assert!`, except that the failure is reported to the caller
/// instead of panicking:
///
/// ```ignore
/// ensure!(consumed <= max_header_bytes, DecodeError::too_large_header(consumed, max_header_bytes));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;

/// The HTTP/1.1 line terminator.
pub(crate) const CRLF: &[u8] = b"\r\n";

/// Position of the first CRLF in `bytes`, if any.
#[inline]
pub(crate) fn find_crlf(bytes: &[u8]) -> Option<usize> {
    bytes.windows(CRLF.len()).position(|window| window == CRLF)
}
