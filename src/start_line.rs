use bytes::Bytes;

use crate::error::{ErrorKind, HttpError};
use crate::limits::Limits;
use crate::method::Method;
use crate::version::HttpVersion;

/// A parsed HTTP request-line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// The exact original line bytes (no CRLF).
    pub raw: Bytes,
    pub method: Method,
    /// Request-target, as raw bytes — URL parsing beyond capture is out
    /// of scope.
    pub path: Bytes,
    pub version: HttpVersion,
}

/// A parsed HTTP status-line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub raw: Bytes,
    pub version: HttpVersion,
    pub status_code: u16,
    pub status_text: String,
}

/// Parse a request-line: `TOKEN SP TARGET SP "HTTP/" DIGIT "." DIGIT`.
///
/// Leading/trailing ASCII whitespace around the whole line is tolerated;
/// exactly one SP must separate each component.
pub fn parse_request_line(line: &[u8], limits: &Limits) -> Result<RequestLine, HttpError> {
    let raw = Bytes::copy_from_slice(line);
    let trimmed = trim_ascii(line);

    let Some(sp1) = trimmed.iter().position(|&b| b == b' ') else {
        return Err(HttpError::with_preview(
            ErrorKind::InvalidStartLine,
            "request-line missing method/target separator",
            line,
        ));
    };
    let method_bytes = &trimmed[..sp1];
    let rest = &trimmed[sp1 + 1..];

    let Some(sp2) = rest.iter().position(|&b| b == b' ') else {
        return Err(HttpError::with_preview(
            ErrorKind::InvalidStartLine,
            "request-line missing target/version separator",
            line,
        ));
    };
    let target = &rest[..sp2];
    let version_bytes = &rest[sp2 + 1..];

    if target.is_empty() {
        return Err(HttpError::with_preview(
            ErrorKind::InvalidStartLine,
            "empty request-target",
            line,
        ));
    }
    if target.len() > limits.max_uri_bytes {
        return Err(HttpError::with_preview(
            ErrorKind::UriTooLarge,
            format!("request-target exceeds {} bytes", limits.max_uri_bytes),
            target,
        ));
    }

    let method = Method::from_bytes(method_bytes)?;
    let version = HttpVersion::from_bytes(version_bytes)?;

    Ok(RequestLine { raw, method, path: Bytes::copy_from_slice(target), version })
}

/// Parse a status-line: `"HTTP/" DIGIT "." DIGIT SP 3DIGIT (SP REASON)?`.
pub fn parse_status_line(line: &[u8], limits: &Limits) -> Result<StatusLine, HttpError> {
    let raw = Bytes::copy_from_slice(line);
    let trimmed = trim_ascii(line);

    let Some(sp1) = trimmed.iter().position(|&b| b == b' ') else {
        return Err(HttpError::with_preview(
            ErrorKind::InvalidStartLine,
            "status-line missing version/status separator",
            line,
        ));
    };
    let version_bytes = &trimmed[..sp1];
    let rest = &trimmed[sp1 + 1..];

    let (code_bytes, reason_bytes) = match rest.iter().position(|&b| b == b' ') {
        Some(sp2) => (&rest[..sp2], &rest[sp2 + 1..]),
        None => (rest, &rest[rest.len()..]),
    };

    let version = HttpVersion::from_bytes(version_bytes)?;

    if code_bytes.len() != 3 || !code_bytes.iter().all(u8::is_ascii_digit) {
        return Err(HttpError::with_preview(
            ErrorKind::InvalidStatusCode,
            "status code must be exactly three digits",
            code_bytes,
        ));
    }
    // Safe: exactly three ASCII digits, parse cannot fail or overflow u16.
    let status_code: u16 = std::str::from_utf8(code_bytes).unwrap().parse().unwrap();
    if !(100..=599).contains(&status_code) {
        return Err(HttpError::with_preview(
            ErrorKind::InvalidStatusCode,
            "status code must be in [100, 599]",
            code_bytes,
        ));
    }

    if reason_bytes.len() > limits.max_reason_phrase_bytes {
        return Err(HttpError::with_preview(
            ErrorKind::InvalidReasonPhrase,
            format!("reason phrase exceeds {} bytes", limits.max_reason_phrase_bytes),
            reason_bytes,
        ));
    }

    let reason_trimmed = trim_ascii(reason_bytes);
    let status_text = if reason_trimmed.is_empty() {
        canonical_reason_phrase(status_code).to_string()
    } else {
        String::from_utf8_lossy(reason_trimmed).into_owned()
    };

    Ok(StatusLine { raw, version, status_code, status_text })
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !b.is_ascii_whitespace()).map_or(start, |p| p + 1);
    &bytes[start..end]
}

/// The RFC-defined canonical reason phrase for a status code, or
/// `"Unknown"` when none is registered — used by both the decoder's
/// blank-reason default and the encoder's omitted-reason default.
pub fn canonical_reason_phrase(status_code: u16) -> &'static str {
    match status_code {
        100 => "Continue",
        101 => "Switching Protocols",
        102 => "Processing",
        103 => "Early Hints",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        207 => "Multi-Status",
        208 => "Already Reported",
        226 => "IM Used",
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        305 => "Use Proxy",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Content Too Large",
        414 => "URI Too Long",
        415 => "Unsupported Media Type",
        416 => "Range Not Satisfiable",
        417 => "Expectation Failed",
        418 => "I'm a Teapot",
        421 => "Misdirected Request",
        422 => "Unprocessable Content",
        423 => "Locked",
        424 => "Failed Dependency",
        425 => "Too Early",
        426 => "Upgrade Required",
        428 => "Precondition Required",
        429 => "Too Many Requests",
        431 => "Request Header Fields Too Large",
        451 => "Unavailable For Legal Reasons",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "HTTP Version Not Supported",
        506 => "Variant Also Negotiates",
        507 => "Insufficient Storage",
        508 => "Loop Detected",
        510 => "Not Extended",
        511 => "Network Authentication Required",
        _ => "Unknown",
    }
}
