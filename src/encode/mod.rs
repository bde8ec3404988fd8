//! Symmetric encoders: framing derivation, line/header encoding, and the
//! streaming message encoder.

pub mod framing;
pub mod headers;
pub mod line;
pub mod message;

pub use framing::{apply_framing, sanitize_hop_by_hop, BodyDescriptor, FramingContext};
pub use headers::{canonicalize_header_name, encode_headers};
pub use line::{encode_http_line, encode_http_lines, encode_request_line, encode_response_line, RequestLineParts, ResponseLineParts};
pub use message::{Body, MessageEncoder, StartLine};
