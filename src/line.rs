use crate::error::{ErrorKind, HttpError};
use crate::limits::Limits;

/// The result of a successful [`scan_line`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedLine {
    /// Byte offset of the line's first byte (inclusive).
    pub start: usize,
    /// Byte offset just past the line's last byte, before CR (exclusive).
    pub end: usize,
    /// Total bytes consumed from `offset`, including the terminating CRLF.
    pub bytes_consumed: usize,
}

/// Scan forward from `offset` in `buffer` for the first CRLF-terminated
/// line.
///
/// Returns `Ok(Some(line))` on success, `Ok(None)` when more data is
/// needed (no protocol violation observed yet), or `Err` on a bare-CR /
/// bare-LF violation or a line exceeding `limits.max_line_bytes`.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidArgument`] if `offset` is out of range or
/// `limits.max_line_bytes` is zero.
pub fn scan_line(
    buffer: &[u8],
    offset: usize,
    limits: &Limits,
) -> Result<Option<ScannedLine>, HttpError> {
    if limits.max_line_bytes == 0 {
        return Err(HttpError::new(ErrorKind::InvalidArgument, "max_line_bytes must be positive"));
    }
    if offset > buffer.len() || (offset == buffer.len() && !buffer.is_empty()) {
        return Err(HttpError::new(
            ErrorKind::InvalidArgument,
            format!("offset {offset} out of range for buffer of length {}", buffer.len()),
        ));
    }

    let mut i = offset;
    while i < buffer.len() {
        let b = buffer[i];
        if b == b'\r' {
            // A lone trailing CR at end-of-buffer is "need more data", not
            // an error.
            let Some(&next) = buffer.get(i + 1) else {
                break;
            };
            if next == b'\n' {
                let bytes_consumed = (i - offset) + 2;
                return Ok(Some(ScannedLine { start: offset, end: i, bytes_consumed }));
            }
            return Err(HttpError::with_preview(
                ErrorKind::InvalidLineEnding,
                "bare CR not followed by LF",
                &buffer[offset..=i],
            ));
        }
        if b == b'\n' {
            return Err(HttpError::with_preview(
                ErrorKind::InvalidLineEnding,
                "bare LF not preceded by CR",
                &buffer[offset..=i],
            ));
        }
        if i - offset >= limits.max_line_bytes {
            return Err(HttpError::with_preview(
                ErrorKind::LineTooLarge,
                format!("line exceeds {} bytes", limits.max_line_bytes),
                &buffer[offset..=i],
            ));
        }
        i += 1;
    }

    // Reached end of buffer without a terminator. Still need to enforce
    // the length cap on the unterminated tail seen so far.
    if buffer.len() - offset > limits.max_line_bytes {
        return Err(HttpError::with_preview(
            ErrorKind::LineTooLarge,
            format!("line exceeds {} bytes", limits.max_line_bytes),
            &buffer[offset..],
        ));
    }

    Ok(None)
}
