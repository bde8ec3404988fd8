use std::fmt;

use crate::error::{ErrorKind, HttpError};

/// `tchar` — characters allowed in HTTP tokens (RFC 9110 §5.6.2): method
/// names, header field names.
///
/// ```text
/// tchar = "!" / "#" / "$" / "%" / "&" / "'" / "*" / "+" / "-" / "." /
///         "^" / "_" / "`" / "|" / "~" / DIGIT / ALPHA
/// ```
#[inline]
pub(crate) fn is_tchar(b: u8) -> bool {
    matches!(
        b,
        b'!' | b'#'
            | b'$'
            | b'%'
            | b'&'
            | b'\''
            | b'*'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~'
            | b'0'..=b'9'
            | b'a'..=b'z'
            | b'A'..=b'Z'
    )
}

/// An HTTP request method.
///
/// Only requires that the method be a well-formed HTTP token, so
/// arbitrary tokens (e.g. `PURGE`, `LOCK`) are accepted and uppercased
/// rather than rejected against a closed list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Method(Box<str>);

impl Method {
    pub const GET: &'static str = "GET";
    pub const HEAD: &'static str = "HEAD";
    pub const POST: &'static str = "POST";
    pub const PUT: &'static str = "PUT";
    pub const DELETE: &'static str = "DELETE";
    pub const CONNECT: &'static str = "CONNECT";
    pub const OPTIONS: &'static str = "OPTIONS";
    pub const TRACE: &'static str = "TRACE";
    pub const PATCH: &'static str = "PATCH";

    /// Parse (and uppercase) a method token from raw bytes.
    ///
    /// Errors with [`ErrorKind::InvalidStartLine`] if `bytes` is empty or
    /// contains a byte outside the `tchar` set.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HttpError> {
        if bytes.is_empty() {
            return Err(HttpError::with_preview(
                ErrorKind::InvalidStartLine,
                "empty method token",
                bytes,
            ));
        }
        if !bytes.iter().all(|&b| is_tchar(b)) {
            return Err(HttpError::with_preview(
                ErrorKind::InvalidStartLine,
                "method token contains an invalid character",
                bytes,
            ));
        }
        let upper: String = bytes.iter().map(|&b| b.to_ascii_uppercase() as char).collect();
        Ok(Self(upper.into_boxed_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether RFC 9110 §9 names this method as never carrying a
    /// meaningful request body by default (used by the framing applier).
    pub fn is_bodyless_by_default(&self) -> bool {
        matches!(
            self.as_str(),
            Self::GET | Self::HEAD | Self::OPTIONS | Self::TRACE | Self::DELETE
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl serde::Serialize for Method {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
