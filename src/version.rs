use std::fmt;

use crate::error::{ErrorKind, HttpError};

/// HTTP protocol version. Only `1.0` and `1.1` are modeled; encoders
/// never emit anything else either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVersion {
    /// HTTP/1.0
    Http10,
    /// HTTP/1.1
    Http11,
}

impl HttpVersion {
    /// Parse a version from its wire bytes (e.g. `b"HTTP/1.1"`).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HttpError> {
        // Case-insensitive on the literal "HTTP".
        if bytes.len() != 8 || !bytes[..5].eq_ignore_ascii_case(b"HTTP/") {
            return Err(HttpError::with_preview(
                ErrorKind::UnsupportedHttpVersion,
                "version must look like HTTP/x.y",
                bytes,
            ));
        }
        match &bytes[5..] {
            b"1.0" => Ok(Self::Http10),
            b"1.1" => Ok(Self::Http11),
            _ => Err(HttpError::with_preview(
                ErrorKind::UnsupportedHttpVersion,
                "only HTTP/1.0 and HTTP/1.1 are supported",
                bytes,
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http10 => "HTTP/1.0",
            Self::Http11 => "HTTP/1.1",
        }
    }

    /// The numeric value printed with one decimal, e.g. `"1.1"`.
    pub fn as_numeric_str(&self) -> &'static str {
        match self {
            Self::Http10 => "1.0",
            Self::Http11 => "1.1",
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for HttpVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_supported_versions() {
        assert_eq!(HttpVersion::from_bytes(b"HTTP/1.0").unwrap(), HttpVersion::Http10);
        assert_eq!(HttpVersion::from_bytes(b"HTTP/1.1").unwrap(), HttpVersion::Http11);
    }

    #[test]
    fn case_insensitive_on_http_literal() {
        assert_eq!(HttpVersion::from_bytes(b"http/1.1").unwrap(), HttpVersion::Http11);
    }

    #[test]
    fn rejects_http2() {
        assert_eq!(
            HttpVersion::from_bytes(b"HTTP/2.0").unwrap_err().kind(),
            ErrorKind::UnsupportedHttpVersion
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(HttpVersion::from_bytes(b"nope").is_err());
    }
}
