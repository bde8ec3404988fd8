//! The top-level message state machine: sequences start-line → headers →
//! body → optional trailers, choosing the body framing from the parsed
//! headers.

use bytes::Bytes;

use crate::body::{ChunkedBodyDecoder, FixedLengthBodyDecoder};
use crate::error::{ErrorKind, HttpError};
use crate::headers::{HeaderMap, HeadersDecoder};
use crate::limits::Limits;
use crate::start_line::{parse_request_line, parse_status_line, RequestLine, StatusLine};

/// Phase of an in-progress [`RequestDecoder`] or [`ResponseDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    StartLine,
    Headers,
    BodyFixed,
    BodyChunked,
    /// Read-until-close body (response only; this core does not model
    /// connection closure itself, so the caller signals it explicitly via
    /// `finish_on_close`).
    BodyEof,
    Finished,
    Error,
}

/// One of the ordered events a decoder emits while consuming input.
/// Collected into a `Vec<Event>` per `decode` call rather than delivered
/// through a callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    MessageBegin,
    RequestLine(RequestLine),
    StatusLine(StatusLine),
    HeadersBegin,
    HeadersComplete,
    BodyBegin,
    BodyChunk(Bytes),
    BodyComplete { total_size: u64 },
    TrailersComplete,
    MessageComplete,
}

/// Resolved body framing, selected from the parsed headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Framing {
    None,
    Fixed(u64),
    Chunked,
    Eof,
}

fn select_framing(
    headers: &HeaderMap,
    limits: &Limits,
    is_response: bool,
    bodiless_status: bool,
    no_body_hint: bool,
    strict_smuggling_mode: bool,
) -> Result<Framing, HttpError> {
    if no_body_hint || bodiless_status {
        return Ok(Framing::None);
    }

    let has_chunked = headers.get("transfer-encoding").is_some_and(|values| {
        values
            .iter()
            .any(|v| String::from_utf8_lossy(v).to_ascii_lowercase().contains("chunked"))
    });
    let has_content_length = headers.contains("content-length");

    if has_chunked && has_content_length {
        if strict_smuggling_mode {
            return Err(HttpError::new(
                ErrorKind::ConflictingFraming,
                "both Transfer-Encoding: chunked and Content-Length present",
            ));
        }
        return Ok(Framing::Chunked);
    }
    if has_chunked {
        return Ok(Framing::Chunked);
    }

    if has_content_length {
        let joined = headers.get_joined("content-length").unwrap_or_default();
        let mut values: Vec<&str> = joined.split(", ").collect();
        values.dedup();
        if values.len() > 1 {
            return Err(HttpError::new(
                ErrorKind::InvalidContentLength,
                "conflicting Content-Length values",
            ));
        }
        match values[0].parse::<u64>() {
            Ok(n) if !values[0].starts_with('-') => {
                if n > limits.max_body_bytes {
                    return Err(HttpError::new(
                        ErrorKind::ContentLengthTooLarge,
                        format!("Content-Length {n} exceeds {}", limits.max_body_bytes),
                    ));
                }
                return Ok(Framing::Fixed(n));
            }
            _ => {
                // Open Question #2 (DESIGN.md): invalid Content-Length
                // falls through to "no body" for requests, errors for
                // responses.
                if is_response {
                    return Err(HttpError::new(
                        ErrorKind::InvalidContentLength,
                        "Content-Length is not a valid non-negative integer",
                    ));
                }
                return Ok(Framing::None);
            }
        }
    }

    if is_response {
        Ok(Framing::Eof)
    } else {
        Ok(Framing::None)
    }
}

fn bodiless_status_code(code: u16) -> bool {
    (100..200).contains(&code) || code == 204 || code == 304
}

enum Body {
    None,
    Fixed(FixedLengthBodyDecoder),
    Chunked(ChunkedBodyDecoder),
    Eof { decoded_bytes: u64, chunks: Vec<Bytes> },
}

/// Decodes a stream of bytes into an HTTP request, emitting the
/// `Event` sequence as each part of the message becomes available.
pub struct RequestDecoder {
    phase: Phase,
    limits: Limits,
    strict_smuggling_mode: bool,
    pending: Vec<u8>,
    request_line: Option<RequestLine>,
    headers_decoder: Option<HeadersDecoder>,
    headers: Option<HeaderMap>,
    body: Body,
    error: Option<HttpError>,
}

impl RequestDecoder {
    pub fn new(limits: Limits) -> Self {
        Self::with_options(limits, false)
    }

    pub fn with_options(limits: Limits, strict_smuggling_mode: bool) -> Self {
        Self {
            phase: Phase::StartLine,
            limits,
            strict_smuggling_mode,
            pending: Vec::new(),
            request_line: None,
            headers_decoder: Some(HeadersDecoder::new()),
            headers: None,
            body: Body::None,
            error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn request_line(&self) -> Option<&RequestLine> {
        self.request_line.as_ref()
    }

    pub fn headers(&self) -> Option<&HeaderMap> {
        self.headers.as_ref()
    }

    pub fn error(&self) -> Option<&HttpError> {
        self.error.as_ref()
    }

    /// Decoded body bytes so far, flattened; empty until a body decoder
    /// has started.
    pub fn body_chunks(&self) -> Vec<Bytes> {
        match &self.body {
            Body::None => Vec::new(),
            Body::Fixed(d) => d.chunks().to_vec(),
            Body::Chunked(d) => d.chunks().to_vec(),
            Body::Eof { chunks, .. } => chunks.clone(),
        }
    }

    pub fn decode(&mut self, input: &[u8]) -> Result<Vec<Event>, HttpError> {
        decode_message(
            &mut self.phase,
            &self.limits,
            self.strict_smuggling_mode,
            &mut self.pending,
            &mut self.request_line,
            &mut None::<StatusLine>,
            false,
            false,
            &mut self.headers_decoder,
            &mut self.headers,
            &mut self.body,
            &mut self.error,
            input,
            StartLineKind::Request,
        )
    }
}

/// Decodes a stream of bytes into an HTTP response, emitting the
/// `Event` sequence as each part of the message becomes available.
pub struct ResponseDecoder {
    phase: Phase,
    limits: Limits,
    strict_smuggling_mode: bool,
    no_body_hint: bool,
    pending: Vec<u8>,
    status_line: Option<StatusLine>,
    headers_decoder: Option<HeadersDecoder>,
    headers: Option<HeaderMap>,
    body: Body,
    error: Option<HttpError>,
}

impl ResponseDecoder {
    /// `no_body_hint` should be set when this response answers a `HEAD`
    /// request: the message machine cannot otherwise tell.
    pub fn new(limits: Limits, no_body_hint: bool) -> Self {
        Self::with_options(limits, no_body_hint, false)
    }

    pub fn with_options(limits: Limits, no_body_hint: bool, strict_smuggling_mode: bool) -> Self {
        Self {
            phase: Phase::StartLine,
            limits,
            strict_smuggling_mode,
            no_body_hint,
            pending: Vec::new(),
            status_line: None,
            headers_decoder: Some(HeadersDecoder::new()),
            headers: None,
            body: Body::None,
            error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status_line(&self) -> Option<&StatusLine> {
        self.status_line.as_ref()
    }

    pub fn headers(&self) -> Option<&HeaderMap> {
        self.headers.as_ref()
    }

    pub fn error(&self) -> Option<&HttpError> {
        self.error.as_ref()
    }

    pub fn body_chunks(&self) -> Vec<Bytes> {
        match &self.body {
            Body::None => Vec::new(),
            Body::Fixed(d) => d.chunks().to_vec(),
            Body::Chunked(d) => d.chunks().to_vec(),
            Body::Eof { chunks, .. } => chunks.clone(),
        }
    }

    /// Signal that the connection has closed: finishes a `BODY_EOF` body.
    /// A no-op in any other phase.
    pub fn finish_on_close(&mut self) -> Vec<Event> {
        if self.phase == Phase::BodyEof {
            self.phase = Phase::Finished;
            if let Body::Eof { decoded_bytes, .. } = &self.body {
                return vec![
                    Event::BodyComplete { total_size: *decoded_bytes },
                    Event::MessageComplete,
                ];
            }
        }
        Vec::new()
    }

    pub fn decode(&mut self, input: &[u8]) -> Result<Vec<Event>, HttpError> {
        decode_message(
            &mut self.phase,
            &self.limits,
            self.strict_smuggling_mode,
            &mut self.pending,
            &mut None::<RequestLine>,
            &mut self.status_line,
            true,
            self.no_body_hint,
            &mut self.headers_decoder,
            &mut self.headers,
            &mut self.body,
            &mut self.error,
            input,
            StartLineKind::Response,
        )
    }
}

enum StartLineKind {
    Request,
    Response,
}

#[allow(clippy::too_many_arguments)]
fn decode_message(
    phase: &mut Phase,
    limits: &Limits,
    strict_smuggling_mode: bool,
    pending: &mut Vec<u8>,
    request_line_out: &mut Option<RequestLine>,
    status_line_out: &mut Option<StatusLine>,
    is_response: bool,
    no_body_hint: bool,
    headers_decoder: &mut Option<HeadersDecoder>,
    headers_out: &mut Option<HeaderMap>,
    body: &mut Body,
    error_out: &mut Option<HttpError>,
    input: &[u8],
    kind: StartLineKind,
) -> Result<Vec<Event>, HttpError> {
    if matches!(*phase, Phase::Finished | Phase::Error) {
        return Err(HttpError::new(ErrorKind::AlreadyFinished, "message already finished"));
    }

    let mut events = Vec::new();
    if pending.is_empty() && !input.is_empty() {
        // start-of-message marker only emitted once, at the very first
        // call carrying data.
        if request_line_out.is_none() && status_line_out.as_ref().map(Option::is_none).unwrap_or(true) {
            events.push(Event::MessageBegin);
        }
    }
    pending.extend_from_slice(input);

    let run = |phase: &mut Phase,
               pending: &mut Vec<u8>,
               events: &mut Vec<Event>|
     -> Result<(), HttpError> {
        if *phase == Phase::StartLine {
            let Some(scanned) = crate::line::scan_line(pending, 0, limits)? else { return Ok(()) };
            let line = pending[scanned.start..scanned.end].to_vec();
            *pending = pending.split_off(scanned.bytes_consumed);

            match kind {
                StartLineKind::Request => {
                    let rl = parse_request_line(&line, limits)?;
                    events.push(Event::RequestLine(rl.clone()));
                    *request_line_out = Some(rl);
                }
                StartLineKind::Response => {
                    let sl = parse_status_line(&line, limits)?;
                    events.push(Event::StatusLine(sl.clone()));
                    *status_line_out = Some(sl);
                }
            }
            events.push(Event::HeadersBegin);
            *phase = Phase::Headers;
        }

        if *phase == Phase::Headers {
            let decoder = headers_decoder.as_mut().expect("headers decoder present while in Headers phase");
            let take = std::mem::take(pending);
            decoder.decode(&take, limits)?;
            if decoder.phase() == crate::headers::HeadersPhase::Finished {
                let mut finished = headers_decoder.take().unwrap();
                *pending = finished.take_remainder().to_vec();
                let headers = finished.into_headers();

                events.push(Event::HeadersComplete);

                let bodiless_status = is_response
                    && status_line_out.as_ref().is_some_and(|s| bodiless_status_code(s.status_code));
                let framing = select_framing(
                    &headers,
                    limits,
                    is_response,
                    bodiless_status,
                    no_body_hint,
                    strict_smuggling_mode,
                )?;
                *headers_out = Some(headers);

                match framing {
                    Framing::None => {
                        *phase = Phase::Finished;
                        events.push(Event::MessageComplete);
                    }
                    Framing::Fixed(n) => {
                        *body = Body::Fixed(FixedLengthBodyDecoder::new(n, limits)?);
                        *phase = Phase::BodyFixed;
                        events.push(Event::BodyBegin);
                    }
                    Framing::Chunked => {
                        *body = Body::Chunked(ChunkedBodyDecoder::new());
                        *phase = Phase::BodyChunked;
                        events.push(Event::BodyBegin);
                    }
                    Framing::Eof => {
                        *body = Body::Eof { decoded_bytes: 0, chunks: Vec::new() };
                        *phase = Phase::BodyEof;
                        events.push(Event::BodyBegin);
                    }
                }
            }
        }

        if *phase == Phase::BodyFixed {
            if let Body::Fixed(decoder) = body {
                let take = std::mem::take(pending);
                let before = decoder.chunks().len();
                decoder.decode(&take)?;
                for chunk in &decoder.chunks()[before..] {
                    events.push(Event::BodyChunk(chunk.clone()));
                }
                if decoder.phase() == crate::body::FixedLengthPhase::Finished {
                    let total = decoder.decoded_bytes();
                    let mut decoder_owned = match std::mem::replace(body, Body::None) {
                        Body::Fixed(d) => d,
                        _ => unreachable!(),
                    };
                    *pending = decoder_owned.take_overflow().to_vec();
                    *phase = Phase::Finished;
                    events.push(Event::BodyComplete { total_size: total });
                    events.push(Event::MessageComplete);
                }
            }
        }

        if *phase == Phase::BodyChunked {
            if let Body::Chunked(decoder) = body {
                let take = std::mem::take(pending);
                let before = decoder.chunks().len();
                decoder.decode(&take, limits)?;
                for chunk in &decoder.chunks()[before..] {
                    events.push(Event::BodyChunk(chunk.clone()));
                }
                if decoder.phase() == crate::body::ChunkedPhase::Finished {
                    let total = decoder.decoded_bytes();
                    let mut decoder_owned = match std::mem::replace(body, Body::None) {
                        Body::Chunked(d) => d,
                        _ => unreachable!(),
                    };
                    *pending = decoder_owned.take_remainder().to_vec();
                    *phase = Phase::Finished;
                    events.push(Event::TrailersComplete);
                    events.push(Event::BodyComplete { total_size: total });
                    events.push(Event::MessageComplete);
                }
            }
        }

        if *phase == Phase::BodyEof {
            if let Body::Eof { decoded_bytes, chunks } = body {
                let take = std::mem::take(pending);
                if !take.is_empty() {
                    let bytes = Bytes::from(take);
                    *decoded_bytes += bytes.len() as u64;
                    chunks.push(bytes.clone());
                    events.push(Event::BodyChunk(bytes));
                }
            }
        }

        Ok(())
    };

    match run(phase, pending, &mut events) {
        Ok(()) => Ok(events),
        Err(e) => {
            *phase = Phase::Error;
            *error_out = Some(e.clone());
            Err(e)
        }
    }
}
