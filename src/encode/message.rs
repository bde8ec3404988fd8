//! The message encoder: a lazy byte-chunk [`Stream`] that yields the
//! start-line, the header block, then the body — chunked
//! transfer-encoding it itself when the body is an async stream.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{BufMut, Bytes, BytesMut};
use futures_core::Stream;

use crate::encode::framing::{apply_framing, sanitize_hop_by_hop, BodyDescriptor, FramingContext};
use crate::encode::headers::encode_headers;
use crate::encode::line::{encode_request_line, encode_response_line, RequestLineParts, ResponseLineParts};
use crate::error::HttpError;
use crate::headers::HeaderMap;

/// Which start-line shape to encode.
pub enum StartLine {
    Request(RequestLineParts),
    Response(ResponseLineParts),
}

/// A message body to encode.
pub enum Body {
    None,
    Buffer(Bytes),
    /// A source whose individual buffers are chunk-encoded as received;
    /// empty source buffers are skipped, since a zero-length chunk would
    /// prematurely terminate the stream.
    Stream(Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>),
}

enum BodyState {
    None,
    Buffer(Option<Bytes>),
    Stream { inner: Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>, finished: bool },
}

/// Produces the wire bytes of one HTTP message as a lazily-polled
/// [`Stream`] of [`Bytes`] chunks.
///
/// The entire head (start-line + header block) is buffered and yielded
/// before the body source is ever polled, so a body stream backed by a
/// slow source does not block headers from going out.
pub struct MessageEncoder {
    head: Option<Bytes>,
    body: BodyState,
}

impl MessageEncoder {
    /// `sanitize` applies the mandatory-for-intermediaries hop-by-hop
    /// stripping pass; first-party encoders typically pass `false`.
    pub fn new(start_line: StartLine, mut headers: HeaderMap, body: Body, sanitize: bool) -> Self {
        let descriptor = match &body {
            Body::None => BodyDescriptor::None,
            Body::Buffer(bytes) => BodyDescriptor::Buffer(bytes),
            Body::Stream(_) => BodyDescriptor::AsyncStream,
        };

        let ctx = match &start_line {
            StartLine::Request(parts) => FramingContext::Request { method: &parts.method },
            StartLine::Response(parts) => FramingContext::Response { status_code: parts.status_code },
        };
        apply_framing(&mut headers, &descriptor, &ctx);
        if sanitize {
            sanitize_hop_by_hop(&mut headers);
        }

        let start_line_bytes = match &start_line {
            StartLine::Request(parts) => encode_request_line(parts),
            StartLine::Response(parts) => encode_response_line(parts),
        };
        let header_block = encode_headers(&headers, false);

        let mut head = BytesMut::with_capacity(start_line_bytes.len() + 2 + header_block.len() + 2);
        head.put_slice(&start_line_bytes);
        head.put_slice(b"\r\n");
        head.put_slice(&header_block);
        head.put_slice(b"\r\n");

        let body_state = match body {
            Body::None => BodyState::None,
            Body::Buffer(bytes) => {
                if bytes.is_empty() {
                    BodyState::None
                } else {
                    BodyState::Buffer(Some(bytes))
                }
            }
            Body::Stream(inner) => BodyState::Stream { inner, finished: false },
        };

        Self { head: Some(head.freeze()), body: body_state }
    }
}

fn encode_chunk(chunk: &[u8]) -> Bytes {
    let size = format!("{:x}", chunk.len());
    let mut out = BytesMut::with_capacity(size.len() + 2 + chunk.len() + 2);
    out.put_slice(size.as_bytes());
    out.put_slice(b"\r\n");
    out.put_slice(chunk);
    out.put_slice(b"\r\n");
    out.freeze()
}

impl Stream for MessageEncoder {
    type Item = Result<Bytes, HttpError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if let Some(head) = this.head.take() {
            return Poll::Ready(Some(Ok(head)));
        }

        match &mut this.body {
            BodyState::None => Poll::Ready(None),
            BodyState::Buffer(slot) => match slot.take() {
                Some(bytes) => Poll::Ready(Some(Ok(bytes))),
                None => Poll::Ready(None),
            },
            BodyState::Stream { inner, finished } => {
                if *finished {
                    return Poll::Ready(None);
                }
                loop {
                    match inner.as_mut().poll_next(cx) {
                        Poll::Pending => return Poll::Pending,
                        Poll::Ready(Some(Ok(chunk))) => {
                            if chunk.is_empty() {
                                continue;
                            }
                            return Poll::Ready(Some(Ok(encode_chunk(&chunk))));
                        }
                        Poll::Ready(Some(Err(e))) => {
                            *finished = true;
                            return Poll::Ready(Some(Err(e)));
                        }
                        Poll::Ready(None) => {
                            *finished = true;
                            return Poll::Ready(Some(Ok(Bytes::from_static(b"0\r\n\r\n"))));
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::version::HttpVersion;
    use futures_util::stream;
    use std::sync::Arc;
    use std::task::{Wake, Waker};

    struct NoopWaker;
    impl Wake for NoopWaker {
        fn wake(self: Arc<Self>) {}
    }

    fn collect(mut encoder: MessageEncoder) -> Vec<u8> {
        let waker = Waker::from(Arc::new(NoopWaker));
        let mut cx = Context::from_waker(&waker);
        let mut out = Vec::new();
        loop {
            match Pin::new(&mut encoder).poll_next(&mut cx) {
                Poll::Ready(Some(Ok(chunk))) => out.extend_from_slice(&chunk),
                Poll::Ready(Some(Err(e))) => panic!("unexpected encoder error: {e}"),
                Poll::Ready(None) => break,
                Poll::Pending => panic!("unexpected pending stream in this test"),
            }
        }
        out
    }

    #[test]
    fn encodes_request_with_buffer_body() {
        let start = StartLine::Request(RequestLineParts {
            method: Method::from_bytes(b"POST").unwrap(),
            path: Bytes::from_static(b"/x"),
            version: HttpVersion::Http11,
        });
        let mut headers = HeaderMap::new();
        headers.push(Bytes::from_static(b"host"), Bytes::from_static(b"example.com"));
        let encoder = MessageEncoder::new(start, headers, Body::Buffer(Bytes::from_static(b"hi")), false);
        let out = collect(encoder);
        assert_eq!(
            out,
            b"POST /x HTTP/1.1\r\nHost: example.com\r\nContent-Length: 2\r\n\r\nhi".to_vec()
        );
    }

    #[test]
    fn encodes_response_with_no_body() {
        let start =
            StartLine::Response(ResponseLineParts { version: HttpVersion::Http11, status_code: 204, status_text: None });
        let encoder = MessageEncoder::new(start, HeaderMap::new(), Body::None, false);
        let out = collect(encoder);
        assert_eq!(out, b"HTTP/1.1 204 No Content\r\n\r\n".to_vec());
    }

    #[test]
    fn encodes_stream_body_as_chunked() {
        let start =
            StartLine::Response(ResponseLineParts { version: HttpVersion::Http11, status_code: 200, status_text: None });
        let source = stream::iter(vec![
            Ok(Bytes::from_static(b"hello")),
            Ok(Bytes::from_static(b"")),
            Ok(Bytes::from_static(b"world")),
        ]);
        let body = Body::Stream(Box::pin(source));
        let encoder = MessageEncoder::new(start, HeaderMap::new(), body, false);
        let out = collect(encoder);
        let expected = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n5\r\nworld\r\n0\r\n\r\n";
        assert_eq!(out, expected.to_vec());
    }

    #[test]
    fn head_is_yielded_before_stream_body_is_polled() {
        // A stream that would panic if polled proves the head chunk is
        // self-contained and doesn't require touching the body source.
        let start =
            StartLine::Response(ResponseLineParts { version: HttpVersion::Http11, status_code: 200, status_text: None });
        let source = stream::iter(vec![Ok(Bytes::from_static(b"x"))]);
        let body = Body::Stream(Box::pin(source));
        let mut encoder = MessageEncoder::new(start, HeaderMap::new(), body, false);

        let waker = Waker::from(Arc::new(NoopWaker));
        let mut cx = Context::from_waker(&waker);
        match Pin::new(&mut encoder).poll_next(&mut cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                assert!(chunk.starts_with(b"HTTP/1.1 200 OK"));
            }
            other => panic!("expected head chunk, got {other:?}"),
        }
    }
}
