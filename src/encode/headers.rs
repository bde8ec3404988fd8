//! Header-block encoder.

use bytes::{BufMut, Bytes, BytesMut};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::headers::HeaderMap;

/// Percent-encoding reserved for `encode_headers`' optional `encode_value`
/// mode: controls plus the bytes that would otherwise break header
/// framing (`"`, `%`, `\`, and whitespace beyond a single interior SP).
const VALUE_ENCODE_SET: &AsciiSet =
    &CONTROLS.add(b'"').add(b'%').add(b'\\').add(b'\r').add(b'\n');

/// Well-known acronyms that name canonicalization leaves alone instead of
/// lower-then-capitalize-after-hyphen.
const ACRONYM_EXCEPTIONS: &[(&str, &str)] = &[
    ("etag", "ETag"),
    ("www-authenticate", "WWW-Authenticate"),
    ("te", "TE"),
    ("dnt", "DNT"),
    ("md5", "MD5"),
    ("csrf", "CSRF"),
];

/// Lowercase, then capitalize the first letter of each hyphen-delimited
/// segment, with a small exception set for well-known acronyms.
pub fn canonicalize_header_name(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    if let Some((_, canonical)) = ACRONYM_EXCEPTIONS.iter().find(|(k, _)| *k == lower) {
        return canonical.to_string();
    }

    let mut out = String::with_capacity(name.len());
    for (i, segment) in lower.split('-').enumerate() {
        if i > 0 {
            out.push('-');
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Encode every `(name, value)` pair in `headers`, one `"<Canonical-Name>:
/// <value>" CRLF` line per value — array-valued headers emit one line per
/// value, in original insertion order. When `encode_value` is set, each
/// value is percent-encoded first.
pub fn encode_headers(headers: &HeaderMap, encode_value: bool) -> Bytes {
    let mut out = BytesMut::new();
    for (name, value) in headers.raw_pairs() {
        let canonical = canonicalize_header_name(&String::from_utf8_lossy(name));
        out.put_slice(canonical.as_bytes());
        out.put_slice(b": ");
        if encode_value {
            let encoded =
                utf8_percent_encode(&String::from_utf8_lossy(value), VALUE_ENCODE_SET).to_string();
            out.put_slice(encoded.as_bytes());
        } else {
            out.put_slice(value);
        }
        out.put_slice(b"\r\n");
    }
    out.freeze()
}
