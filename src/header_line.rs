use bytes::Bytes;

use crate::error::{ErrorKind, HttpError};
use crate::limits::Limits;

/// A single parsed `name: value` header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine {
    pub name: Bytes,
    pub value: Bytes,
}

/// Parse one header line's bytes (no CRLF).
///
/// The name is the longest prefix before the first `:`, trimmed; the
/// value is the remainder after that `:`, trimmed (embedded `:` bytes are
/// preserved). See Open Question #1 in DESIGN.md: obsolete line folding
/// is rejected, not silently accepted, so a caller that wants folding
/// support must pre-join continuation lines itself.
pub fn parse_header_line(line: &[u8], limits: &Limits) -> Result<HeaderLine, HttpError> {
    if let Some(&first) = line.first() {
        if first == b' ' || first == b'\t' {
            return Err(HttpError::with_preview(
                ErrorKind::InvalidHeaderFolding,
                "obsolete header line folding is not supported",
                line,
            ));
        }
    }

    let Some(colon) = line.iter().position(|&b| b == b':') else {
        return Err(HttpError::with_preview(
            ErrorKind::InvalidHeaderLine,
            "header line missing ':'",
            line,
        ));
    };

    let name = trim_ascii(&line[..colon]);
    if name.is_empty() {
        return Err(HttpError::with_preview(
            ErrorKind::EmptyHeaderName,
            "header name is empty after trimming",
            line,
        ));
    }
    if name.len() > limits.max_header_name_bytes {
        return Err(HttpError::with_preview(
            ErrorKind::HeaderTooLarge,
            format!("header name exceeds {} bytes", limits.max_header_name_bytes),
            name,
        ));
    }

    let value = trim_ascii(&line[colon + 1..]);
    if value.len() > limits.max_header_value_bytes {
        return Err(HttpError::with_preview(
            ErrorKind::HeaderTooLarge,
            format!("header value exceeds {} bytes", limits.max_header_value_bytes),
            value,
        ));
    }

    Ok(HeaderLine { name: Bytes::copy_from_slice(name), value: Bytes::copy_from_slice(value) })
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !b.is_ascii_whitespace()).map_or(start, |p| p + 1);
    &bytes[start..end]
}
