//! Framing header derivation and hop-by-hop sanitization.

use crate::headers::HeaderMap;
use crate::method::Method;

/// The shape of a message body, as seen by the framing applier.
pub enum BodyDescriptor<'a> {
    /// No body at all, or deliberately omitted.
    None,
    /// A fully-materialized body of known length.
    Buffer(&'a [u8]),
    /// A body whose length is not known up front.
    AsyncStream,
}

/// Whether the enclosing message is a request or response, and the
/// method/status that determines if a body is semantically allowed.
pub enum FramingContext<'a> {
    Request { method: &'a Method },
    Response { status_code: u16 },
}

fn semantically_allows_body(ctx: &FramingContext) -> bool {
    match ctx {
        FramingContext::Request { method } => !method.is_bodyless_by_default(),
        FramingContext::Response { status_code } => {
            !((100..200).contains(status_code) || *status_code == 204 || *status_code == 304)
        }
    }
}

/// Derive `content-length`/`transfer-encoding` from the body shape.
pub fn apply_framing(headers: &mut HeaderMap, body: &BodyDescriptor<'_>, ctx: &FramingContext<'_>) {
    match body {
        BodyDescriptor::AsyncStream => {
            headers.remove("content-length");
            headers.remove("content-range");
            headers.set("transfer-encoding", "chunked");
        }
        BodyDescriptor::None => {
            headers.remove("transfer-encoding");
            headers.remove("content-length");
            if semantically_allows_body(ctx) {
                headers.set("content-length", "0");
            }
        }
        BodyDescriptor::Buffer(bytes) => {
            headers.remove("transfer-encoding");
            if bytes.is_empty() {
                headers.remove("content-length");
                if semantically_allows_body(ctx) {
                    headers.set("content-length", "0");
                }
            } else {
                headers.set("content-length", bytes.len().to_string());
            }
        }
    }
}

const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Remove every hop-by-hop header name (the fixed list plus any name
/// listed inside a `Connection:` header value). Mandatory before
/// re-emission by an intermediary, optional for first-party encoding.
pub fn sanitize_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<String> = headers
        .get("connection")
        .map(|values| {
            values
                .iter()
                .flat_map(|v| {
                    String::from_utf8_lossy(v)
                        .split(',')
                        .map(|s| s.trim().to_ascii_lowercase())
                        .collect::<Vec<_>>()
                })
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    for name in HOP_BY_HOP {
        headers.remove(name);
    }
    for name in listed {
        headers.remove(&name);
    }
}
