//! `Content-Encoding` header validator.

use super::rejects_control_bytes;
use crate::method::is_tchar;

const KNOWN_ENCODINGS: &[&str] = &["gzip", "br", "deflate", "identity", "zstd"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEncodingValidation {
    Valid { encodings: Vec<String> },
    Invalid { reason: String },
}

fn invalid(reason: impl Into<String>) -> ContentEncodingValidation {
    ContentEncodingValidation::Invalid { reason: reason.into() }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContentEncodingOptions {
    /// Restrict tokens to [`KNOWN_ENCODINGS`].
    pub strict_known_encoding: bool,
    /// Reject `identity` combined with any other encoding.
    pub forbid_identity_mix: bool,
}

pub fn validate_content_encoding(raw: &str, options: &ContentEncodingOptions) -> ContentEncodingValidation {
    if let Some(reason) = rejects_control_bytes(raw) {
        return invalid(reason);
    }

    let mut encodings = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            return invalid("empty encoding token");
        }
        if !token.bytes().all(is_tchar) {
            return invalid(format!("'{token}' is not a valid token"));
        }
        let lower = token.to_ascii_lowercase();
        if encodings.contains(&lower) {
            return invalid(format!("duplicate encoding '{lower}'"));
        }
        if options.strict_known_encoding && !KNOWN_ENCODINGS.contains(&lower.as_str()) {
            return invalid(format!("'{lower}' is not a recognized encoding"));
        }
        encodings.push(lower);
    }

    if encodings.is_empty() {
        return invalid("at least one encoding is required");
    }
    if options.forbid_identity_mix && encodings.len() > 1 && encodings.iter().any(|e| e == "identity") {
        return invalid("identity cannot be combined with other encodings");
    }

    ContentEncodingValidation::Valid { encodings }
}
