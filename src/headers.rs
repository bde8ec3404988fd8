use bytes::{Bytes, BytesMut};

use crate::error::{ErrorKind, HttpError};
use crate::header_line::parse_header_line;
use crate::limits::Limits;

/// Dual (normalized, raw) view of a header block.
///
/// The two views are kept atomically consistent by routing every mutation
/// through [`HeaderMap::push`]: raw preserves original casing and
/// insertion order; normalized is a lowercase-keyed multimap with every
/// value trimmed, empty/whitespace-only values filtered out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    raw: Vec<(Bytes, Bytes)>,
    normalized: Vec<(Box<str>, Vec<Bytes>)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one `(name, value)` pair, updating both views atomically.
    /// An empty-after-trim value is still recorded in `raw` (every
    /// insertion is preserved there) but filtered out of `normalized`.
    pub fn push(&mut self, name: Bytes, value: Bytes) {
        self.raw.push((name.clone(), value.clone()));

        let trimmed = trim_bytes(&value);
        if trimmed.is_empty() {
            return;
        }
        let trimmed = Bytes::copy_from_slice(trimmed);
        let lower = String::from_utf8_lossy(&name).to_ascii_lowercase();

        if let Some(entry) = self.normalized.iter_mut().find(|(k, _)| k.as_ref() == lower) {
            entry.1.push(trimmed);
        } else {
            self.normalized.push((lower.into_boxed_str(), vec![trimmed]));
        }
    }

    /// Append an array-valued input, flattening so each value contributes
    /// a separate `(name, value)` raw pair.
    pub fn push_all(&mut self, name: &Bytes, values: impl IntoIterator<Item = Bytes>) {
        for v in values {
            self.push(name.clone(), v);
        }
    }

    /// All values for `name` (case-insensitive), or `None` if absent.
    pub fn get(&self, name: &str) -> Option<&[Bytes]> {
        let lower = name.to_ascii_lowercase();
        self.normalized.iter().find(|(k, _)| k.as_ref() == lower).map(|(_, v)| v.as_slice())
    }

    /// The first value for `name`, if present.
    pub fn get_first(&self, name: &str) -> Option<&Bytes> {
        self.get(name).and_then(|v| v.first())
    }

    /// `name`'s values joined with `", "`, or `None` if absent — used by
    /// the structured-header validators, with `set-cookie` exempted by
    /// callers that need per-cookie semantics.
    pub fn get_joined(&self, name: &str) -> Option<String> {
        self.get(name).map(|values| {
            values
                .iter()
                .map(|v| String::from_utf8_lossy(v).into_owned())
                .collect::<Vec<_>>()
                .join(", ")
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove every value for `name` from both views.
    pub fn remove(&mut self, name: &str) {
        let lower = name.to_ascii_lowercase();
        self.raw.retain(|(k, _)| !k.eq_ignore_ascii_case(lower.as_bytes()));
        self.normalized.retain(|(k, _)| k.as_ref() != lower);
    }

    /// Set `name` to a single value, replacing any existing values.
    pub fn set(&mut self, name: &str, value: impl Into<Bytes>) {
        self.remove(name);
        self.push(Bytes::copy_from_slice(name.as_bytes()), value.into());
    }

    /// Iterate the raw, insertion-ordered, original-casing pairs.
    pub fn raw_pairs(&self) -> impl Iterator<Item = (&Bytes, &Bytes)> {
        self.raw.iter().map(|(n, v)| (n, v))
    }

    /// Iterate the normalized `(lowercase name, values)` entries.
    pub fn normalized_entries(&self) -> impl Iterator<Item = (&str, &[Bytes])> {
        self.normalized.iter().map(|(k, v)| (k.as_ref(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }
}

fn trim_bytes(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !b.is_ascii_whitespace()).map_or(start, |p| p + 1);
    &bytes[start..end]
}

/// Phase of an in-progress [`HeadersDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadersPhase {
    Reading,
    Finished,
}

/// Accumulates a header block until the terminating empty line, bounding
/// header count, individual sizes, and cumulative block size.
#[derive(Debug, Clone)]
pub struct HeadersDecoder {
    buffer: BytesMut,
    headers: HeaderMap,
    block_bytes: usize,
    count: usize,
    phase: HeadersPhase,
}

impl HeadersDecoder {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
            headers: HeaderMap::new(),
            block_bytes: 0,
            count: 0,
            phase: HeadersPhase::Reading,
        }
    }

    pub fn phase(&self) -> HeadersPhase {
        self.phase
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn into_headers(self) -> HeaderMap {
        self.headers
    }

    /// Bytes left over after the terminating CRLF, to be handed to the
    /// next decoding stage.
    pub fn take_remainder(&mut self) -> Bytes {
        self.buffer.split().freeze()
    }

    /// Feed more input. Returns `Ok(())`; inspect [`HeadersDecoder::phase`]
    /// to learn whether the block finished.
    pub fn decode(&mut self, input: &[u8], limits: &Limits) -> Result<(), HttpError> {
        if self.phase == HeadersPhase::Finished {
            return Err(HttpError::new(ErrorKind::AlreadyFinished, "headers already finished"));
        }

        if !input.is_empty() {
            self.buffer.extend_from_slice(input);
        }

        loop {
            let scanned = match crate::line::scan_line(&self.buffer, 0, limits)? {
                Some(s) => s,
                None => return Ok(()),
            };

            if scanned.end == scanned.start {
                // Terminating empty line.
                self.phase = HeadersPhase::Finished;
                let remainder = self.buffer.split_off(scanned.bytes_consumed);
                self.buffer = remainder;
                return Ok(());
            }

            let line_bytes = self.buffer[scanned.start..scanned.end].to_vec();
            let parsed = parse_header_line(&line_bytes, limits)?;

            self.count += 1;
            if self.count > limits.max_header_count {
                return Err(HttpError::new(
                    ErrorKind::TooManyHeaders,
                    format!("header count exceeds {}", limits.max_header_count),
                ));
            }
            self.block_bytes += scanned.bytes_consumed;
            if self.block_bytes > limits.max_header_block_bytes {
                return Err(HttpError::new(
                    ErrorKind::HeaderBlockTooLarge,
                    format!("header block exceeds {} bytes", limits.max_header_block_bytes),
                ));
            }

            tracing::trace!(name = %String::from_utf8_lossy(&parsed.name), "parsed header line");
            self.headers.push(parsed.name, parsed.value);

            let consumed = scanned.bytes_consumed;
            let remainder = self.buffer.split_off(consumed);
            self.buffer = remainder;
        }
    }
}

impl Default for HeadersDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_map_normalizes_and_trims() {
        let mut h = HeaderMap::new();
        h.push(Bytes::from_static(b"Host"), Bytes::from_static(b"  example.com  "));
        assert_eq!(h.get_first("host").unwrap().as_ref(), b"example.com");
    }

    #[test]
    fn header_map_filters_empty_values_from_normalized() {
        let mut h = HeaderMap::new();
        h.push(Bytes::from_static(b"X-Empty"), Bytes::from_static(b"   "));
        assert!(h.get("x-empty").is_none());
        // but raw still records the insertion
        assert_eq!(h.raw_pairs().count(), 1);
    }

    #[test]
    fn header_map_preserves_raw_casing_and_order() {
        let mut h = HeaderMap::new();
        h.push(Bytes::from_static(b"Set-Cookie"), Bytes::from_static(b"a=1"));
        h.push(Bytes::from_static(b"Set-Cookie"), Bytes::from_static(b"b=2"));
        let raw: Vec<_> = h.raw_pairs().collect();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].0.as_ref(), b"Set-Cookie");
        assert_eq!(h.get("set-cookie").unwrap(), &[Bytes::from_static(b"a=1"), Bytes::from_static(b"b=2")]);
    }

    #[test]
    fn decoder_parses_simple_block() {
        let mut d = HeadersDecoder::new();
        d.decode(b"Host: example.com\r\nAccept: */*\r\n\r\n", &Limits::default()).unwrap();
        assert_eq!(d.phase(), HeadersPhase::Finished);
        assert_eq!(d.headers().get_first("host").unwrap().as_ref(), b"example.com");
    }

    #[test]
    fn decoder_pauses_on_incomplete_input() {
        let mut d = HeadersDecoder::new();
        d.decode(b"Host: example.com\r\n", &Limits::default()).unwrap();
        assert_eq!(d.phase(), HeadersPhase::Reading);
    }

    #[test]
    fn decoder_byte_at_a_time_matches_one_shot() {
        let raw = b"Host: h\r\nAccept: */*\r\nX-A: 1\r\n\r\ntrailing";
        let limits = Limits::default();

        let mut one_shot = HeadersDecoder::new();
        one_shot.decode(raw, &limits).unwrap();

        let mut incremental = HeadersDecoder::new();
        for &b in raw {
            incremental.decode(&[b], &limits).unwrap();
        }

        assert_eq!(one_shot.phase(), incremental.phase());
        assert_eq!(one_shot.headers(), incremental.headers());
    }

    #[test]
    fn decoder_leaves_remainder_after_terminator() {
        let mut d = HeadersDecoder::new();
        d.decode(b"Host: h\r\n\r\nBODY", &Limits::default()).unwrap();
        assert_eq!(d.phase(), HeadersPhase::Finished);
        assert_eq!(&d.take_remainder()[..], b"BODY");
    }

    #[test]
    fn decoder_enforces_max_header_count() {
        let mut l = Limits::default();
        l.max_header_count = 1;
        let mut d = HeadersDecoder::new();
        let err = d.decode(b"A: 1\r\nB: 2\r\n\r\n", &l).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooManyHeaders);
    }

    #[test]
    fn decoder_enforces_header_block_bytes() {
        let mut l = Limits::default();
        l.max_header_block_bytes = 5;
        let mut d = HeadersDecoder::new();
        let err = d.decode(b"Host: example.com\r\n\r\n", &l).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HeaderBlockTooLarge);
    }

    #[test]
    fn decoder_rejects_input_after_finished() {
        let mut d = HeadersDecoder::new();
        d.decode(b"\r\n", &Limits::default()).unwrap();
        let err = d.decode(b"more", &Limits::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyFinished);
    }
}
