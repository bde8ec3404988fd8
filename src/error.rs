use std::fmt;

/// Maximum number of raw input bytes retained in an [`HttpError`] preview.
const PREVIEW_LIMIT: usize = 50;

/// The uniform error taxonomy used across every decoder and encoder in this
/// crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A bare CR or bare LF was encountered where CRLF was required.
    InvalidLineEnding,
    /// A single line exceeded `Limits::max_line_bytes`.
    LineTooLarge,
    /// A request-line or status-line did not match the expected grammar.
    InvalidStartLine,
    /// The HTTP version was not `1.0` or `1.1`.
    UnsupportedHttpVersion,
    /// The request-target exceeded `Limits::max_uri_bytes`.
    UriTooLarge,
    /// The status code was not an integer in `[100, 599]`.
    InvalidStatusCode,
    /// The reason phrase exceeded `Limits::max_reason_phrase_bytes`.
    InvalidReasonPhrase,
    /// A header line had no `:` separator.
    InvalidHeaderLine,
    /// A header line's name was empty after trimming.
    EmptyHeaderName,
    /// A header name or value exceeded its configured size limit.
    HeaderTooLarge,
    /// Obsolete header line folding was encountered and this decoder
    /// rejects it (see DESIGN.md Open Question #1).
    InvalidHeaderFolding,
    /// The header count exceeded `Limits::max_header_count`.
    TooManyHeaders,
    /// The running header block size exceeded `Limits::max_header_block_bytes`.
    HeaderBlockTooLarge,
    /// Content-Length was missing, non-integer, negative, or conflicting.
    InvalidContentLength,
    /// Content-Length exceeded `Limits::max_body_bytes`.
    ContentLengthTooLarge,
    /// A chunk-size line was empty or not valid hexadecimal.
    InvalidChunkSize,
    /// A chunk-size's hex digit count or decoded value exceeded its limit.
    ChunkSizeTooLarge,
    /// A chunk extension exceeded `Limits::max_chunk_extension_bytes`.
    ChunkExtensionTooLarge,
    /// The CRLF expected immediately after chunk data was absent.
    MissingChunkCrlf,
    /// Both Content-Length and Transfer-Encoding: chunked were present
    /// while `strict_smuggling_mode` is enabled (§4.11 of SPEC_FULL.md).
    ConflictingFraming,
    /// A decode/encode step was called on a state already `Finished` or
    /// `Error`.
    AlreadyFinished,
    /// A caller-side argument was out of range or the wrong type/shape;
    /// distinct from a protocol error.
    InvalidArgument,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidLineEnding => "INVALID_LINE_ENDING",
            Self::LineTooLarge => "LINE_TOO_LARGE",
            Self::InvalidStartLine => "INVALID_START_LINE",
            Self::UnsupportedHttpVersion => "UNSUPPORTED_HTTP_VERSION",
            Self::UriTooLarge => "URI_TOO_LARGE",
            Self::InvalidStatusCode => "INVALID_STATUS_CODE",
            Self::InvalidReasonPhrase => "INVALID_REASON_PHRASE",
            Self::InvalidHeaderLine => "INVALID_HEADER_LINE",
            Self::EmptyHeaderName => "EMPTY_HEADER_NAME",
            Self::HeaderTooLarge => "HEADER_TOO_LARGE",
            Self::InvalidHeaderFolding => "INVALID_HEADER_FOLDING",
            Self::TooManyHeaders => "TOO_MANY_HEADERS",
            Self::HeaderBlockTooLarge => "HEADER_BLOCK_TOO_LARGE",
            Self::InvalidContentLength => "INVALID_CONTENT_LENGTH",
            Self::ContentLengthTooLarge => "CONTENT_LENGTH_TOO_LARGE",
            Self::InvalidChunkSize => "INVALID_CHUNK_SIZE",
            Self::ChunkSizeTooLarge => "CHUNK_SIZE_TOO_LARGE",
            Self::ChunkExtensionTooLarge => "CHUNK_EXTENSION_TOO_LARGE",
            Self::MissingChunkCrlf => "MISSING_CHUNK_CRLF",
            Self::ConflictingFraming => "CONFLICTING_FRAMING",
            Self::AlreadyFinished => "ALREADY_FINISHED",
            Self::InvalidArgument => "INVALID_ARGUMENT",
        };
        f.write_str(s)
    }
}

/// An error raised by any decoder or encoder in this crate.
///
/// Carries the [`ErrorKind`], a human-readable message, and a bounded
/// preview of the raw input nearest the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    kind: ErrorKind,
    message: String,
    preview: Vec<u8>,
    truncated: bool,
}

impl HttpError {
    /// Build an error with no raw-input context.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), preview: Vec::new(), truncated: false }
    }

    /// Build an error carrying up to [`PREVIEW_LIMIT`] bytes of `raw` as
    /// context, truncating and marking with a trailing `…` marker if
    /// longer.
    pub fn with_preview(kind: ErrorKind, message: impl Into<String>, raw: &[u8]) -> Self {
        let truncated = raw.len() > PREVIEW_LIMIT;
        let preview = raw[..raw.len().min(PREVIEW_LIMIT)].to_vec();
        Self { kind, message: message.into(), preview, truncated }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Raw-input preview bytes (already bounded to [`PREVIEW_LIMIT`]).
    pub fn preview(&self) -> &[u8] {
        &self.preview
    }

    /// Whether [`HttpError::preview`] was truncated from a longer input.
    pub fn is_preview_truncated(&self) -> bool {
        self.truncated
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if !self.preview.is_empty() {
            write!(f, " (near \"{}", String::from_utf8_lossy(&self.preview))?;
            if self.truncated {
                f.write_str("…")?;
            }
            f.write_str("\")")?;
        }
        Ok(())
    }
}

impl std::error::Error for HttpError {}

pub type Result<T> = std::result::Result<T, HttpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let e = HttpError::new(ErrorKind::InvalidStartLine, "bad line");
        assert_eq!(e.to_string(), "INVALID_START_LINE: bad line");
    }

    #[test]
    fn preview_is_bounded_and_marked_truncated() {
        let raw = vec![b'a'; 100];
        let e = HttpError::with_preview(ErrorKind::LineTooLarge, "too long", &raw);
        assert_eq!(e.preview().len(), PREVIEW_LIMIT);
        assert!(e.is_preview_truncated());
        assert!(e.to_string().ends_with("…\")"));
    }

    #[test]
    fn short_preview_is_not_marked_truncated() {
        let e = HttpError::with_preview(ErrorKind::InvalidHeaderLine, "oops", b"short");
        assert!(!e.is_preview_truncated());
        assert!(e.to_string().contains("short"));
    }
}
