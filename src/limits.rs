/// Configurable size bounds enforced by every decoder in this crate.
///
/// All fields are in bytes unless otherwise noted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum length of a single CRLF-terminated line (default: 8 KiB).
    pub max_line_bytes: usize,
    /// Maximum length of the request-target (default: 8 KiB).
    pub max_uri_bytes: usize,
    /// Maximum length of a status-line reason phrase (default: 512 B).
    pub max_reason_phrase_bytes: usize,
    /// Maximum length of a single header field name (default: 256 B).
    pub max_header_name_bytes: usize,
    /// Maximum length of a single header field value (default: 8 KiB).
    pub max_header_value_bytes: usize,
    /// Maximum number of header fields (default: 100).
    pub max_header_count: usize,
    /// Maximum cumulative size of the header block (default: 32 KiB).
    pub max_header_block_bytes: usize,
    /// Maximum number of hex digits in a chunk-size line (default: 8).
    pub max_chunk_size_hex_digits: usize,
    /// Maximum decoded value of a single chunk size (default: 10 MiB).
    pub max_chunk_size: u64,
    /// Maximum length of a chunk-extension string (default: 1 KiB).
    pub max_chunk_extension_bytes: usize,
    /// Maximum total body size, fixed-length or chunked (default: 10 MiB).
    pub max_body_bytes: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_line_bytes: 8 * 1024,
            max_uri_bytes: 8 * 1024,
            max_reason_phrase_bytes: 512,
            max_header_name_bytes: 256,
            max_header_value_bytes: 8 * 1024,
            max_header_count: 100,
            max_header_block_bytes: 32 * 1024,
            max_chunk_size_hex_digits: 8,
            max_chunk_size: 10 * 1024 * 1024,
            max_chunk_extension_bytes: 1024,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let l = Limits::default();
        assert_eq!(l.max_line_bytes, 8192);
        assert_eq!(l.max_uri_bytes, 8192);
        assert_eq!(l.max_reason_phrase_bytes, 512);
        assert_eq!(l.max_header_name_bytes, 256);
        assert_eq!(l.max_header_value_bytes, 8192);
        assert_eq!(l.max_header_count, 100);
        assert_eq!(l.max_header_block_bytes, 32 * 1024);
        assert_eq!(l.max_chunk_size_hex_digits, 8);
    }
}
