//! # httpwire
//!
//! A **strict, streaming HTTP/1.0 and HTTP/1.1 message codec** implemented
//! as a state machine, for use as a library in synchronous and asynchronous
//! contexts alike.
//!
//! httpwire decodes requests and responses incrementally, byte-by-byte or
//! in arbitrarily-sized chunks, and encodes messages (including
//! `futures_core::Stream`-backed bodies) back onto the wire. It supports
//! chunked transfer encoding, pipelining, and the structured-header
//! validators needed to safely act on what it decodes.
//!
//! ## Quick start — decoding a request
//!
//! ```rust
//! use httpwire::{Limits, RequestDecoder};
//!
//! let mut decoder = RequestDecoder::new(Limits::default());
//! let events = decoder.decode(b"GET /hello HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();
//! assert!(events.iter().any(|e| matches!(e, httpwire::Event::MessageComplete)));
//! assert_eq!(decoder.request_line().unwrap().path.as_ref(), b"/hello");
//! ```
//!
//! ## Quick start — incremental, byte-at-a-time decoding
//!
//! ```rust
//! use httpwire::{Limits, RequestDecoder, Phase};
//!
//! let mut decoder = RequestDecoder::new(Limits::default());
//! for &byte in b"GET / HTTP/1.1\r\nHost: x\r\n\r\n" {
//!     decoder.decode(&[byte]).unwrap();
//! }
//! assert_eq!(decoder.phase(), Phase::Finished);
//! ```

mod body;
mod date;
mod encode;
mod error;
mod header_line;
mod headers;
mod limits;
mod line;
mod message;
mod method;
mod start_line;
mod validate;
mod version;

pub use body::{ChunkedBodyDecoder, ChunkedPhase, FixedLengthBodyDecoder, FixedLengthPhase};
pub use date::{format_http_date, is_valid_http_date, parse_http_date, HttpDate};
pub use encode::{
    apply_framing, canonicalize_header_name, encode_headers, encode_http_line, encode_http_lines,
    encode_request_line, encode_response_line, sanitize_hop_by_hop, Body, BodyDescriptor,
    FramingContext, MessageEncoder, RequestLineParts, ResponseLineParts, StartLine,
};
pub use error::{ErrorKind, HttpError};
pub use header_line::{parse_header_line, HeaderLine};
pub use headers::{HeaderMap, HeadersDecoder, HeadersPhase};
pub use limits::Limits;
pub use message::{Event, Phase, RequestDecoder, ResponseDecoder};
pub use method::Method;
pub use start_line::{parse_request_line, parse_status_line, RequestLine, StatusLine};
pub use validate::{
    validate_cache_control, validate_content_encoding, validate_content_range, validate_content_type,
    validate_cookie, validate_host, validate_range, CacheControlValidation, ContentEncodingOptions,
    ContentEncodingValidation, ContentRangeValidation, ContentRangeValue, ContentTypeValidation,
    ContentTypeValue, CookieOptions, CookieValidation, DirectiveValue, HostKind, HostValidation,
    RangeValidation,
};
pub use version::HttpVersion;
