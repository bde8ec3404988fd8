//! Request/status line and bare-line encoders.

use bytes::{BufMut, Bytes, BytesMut};

use crate::method::Method;
use crate::start_line::canonical_reason_phrase;
use crate::version::HttpVersion;

/// Request-line components to encode. Defaults: method `GET`, path `/`,
/// version `1.1`.
#[derive(Debug, Clone)]
pub struct RequestLineParts {
    pub method: Method,
    pub path: Bytes,
    pub version: HttpVersion,
}

impl Default for RequestLineParts {
    fn default() -> Self {
        Self {
            method: Method::from_bytes(Method::GET.as_bytes()).expect("GET is a valid token"),
            path: Bytes::from_static(b"/"),
            version: HttpVersion::Http11,
        }
    }
}

/// Status-line components to encode. `status_text: None` defaults to the
/// canonical reason phrase for `status_code`.
#[derive(Debug, Clone)]
pub struct ResponseLineParts {
    pub version: HttpVersion,
    pub status_code: u16,
    pub status_text: Option<String>,
}

/// `"<METHOD-UPPERCASED> <path> HTTP/<version>"` with no trailing CRLF.
pub fn encode_request_line(parts: &RequestLineParts) -> Bytes {
    let mut out = BytesMut::with_capacity(parts.path.len() + 24);
    out.put_slice(parts.method.as_str().as_bytes());
    out.put_u8(b' ');
    out.put_slice(&parts.path);
    out.put_u8(b' ');
    out.put_slice(b"HTTP/");
    out.put_slice(parts.version.as_numeric_str().as_bytes());
    out.freeze()
}

/// `"HTTP/<version> <statusCode> <statusText>"` with no trailing CRLF.
pub fn encode_response_line(parts: &ResponseLineParts) -> Bytes {
    let text = parts
        .status_text
        .clone()
        .unwrap_or_else(|| canonical_reason_phrase(parts.status_code).to_string());
    let mut out = BytesMut::with_capacity(text.len() + 24);
    out.put_slice(b"HTTP/");
    out.put_slice(parts.version.as_numeric_str().as_bytes());
    out.put_u8(b' ');
    out.put_slice(parts.status_code.to_string().as_bytes());
    out.put_u8(b' ');
    out.put_slice(text.as_bytes());
    out.freeze()
}

/// `bytes + CR + LF`.
pub fn encode_http_line(line: &[u8]) -> Bytes {
    let mut out = BytesMut::with_capacity(line.len() + 2);
    out.put_slice(line);
    out.put_slice(b"\r\n");
    out.freeze()
}

/// Concatenation of each input line followed by CRLF.
pub fn encode_http_lines(lines: &[&[u8]]) -> Bytes {
    let total: usize = lines.iter().map(|l| l.len() + 2).sum();
    let mut out = BytesMut::with_capacity(total);
    for line in lines {
        out.put_slice(line);
        out.put_slice(b"\r\n");
    }
    out.freeze()
}
