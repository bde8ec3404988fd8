use bytes::{Bytes, BytesMut};

use crate::error::{ErrorKind, HttpError};
use crate::header_line::parse_header_line;
use crate::headers::HeaderMap;
use crate::limits::Limits;
use crate::line::scan_line;

/// Externally observable phase of a [`ChunkedBodyDecoder`]. The chunk
/// extension is an implementation detail folded into `Size` here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkedPhase {
    Size,
    Data,
    Crlf,
    Trailer,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Size,
    AfterDataCr,
    AfterDataLf,
    Trailer,
}

/// `SIZE → DATA → CRLF → (SIZE | TRAILER) → FINISHED` chunked
/// transfer-encoding decoder.
#[derive(Debug, Clone)]
pub struct ChunkedBodyDecoder {
    step: Step,
    buffer: BytesMut,
    current_chunk_size: u64,
    remaining_chunk_bytes: u64,
    chunks: Vec<Bytes>,
    decoded_bytes: u64,
    trailers: HeaderMap,
    in_data_phase: bool,
    finished: bool,
}

impl ChunkedBodyDecoder {
    pub fn new() -> Self {
        Self {
            step: Step::Size,
            buffer: BytesMut::new(),
            current_chunk_size: 0,
            remaining_chunk_bytes: 0,
            chunks: Vec::new(),
            decoded_bytes: 0,
            trailers: HeaderMap::new(),
            in_data_phase: false,
            finished: false,
        }
    }

    pub fn phase(&self) -> ChunkedPhase {
        if self.finished {
            ChunkedPhase::Finished
        } else if self.in_data_phase {
            ChunkedPhase::Data
        } else {
            match self.step {
                Step::Size => ChunkedPhase::Size,
                Step::AfterDataCr | Step::AfterDataLf => ChunkedPhase::Crlf,
                Step::Trailer => ChunkedPhase::Trailer,
            }
        }
    }

    pub fn chunks(&self) -> &[Bytes] {
        &self.chunks
    }

    pub fn decoded_bytes(&self) -> u64 {
        self.decoded_bytes
    }

    pub fn trailers(&self) -> &HeaderMap {
        &self.trailers
    }

    /// Bytes left over after the terminating trailer CRLF, belonging to
    /// the next pipelined message.
    pub fn take_remainder(&mut self) -> Bytes {
        self.buffer.split().freeze()
    }

    /// Feed more input. Inspect [`ChunkedBodyDecoder::phase`] afterward.
    pub fn decode(&mut self, input: &[u8], limits: &Limits) -> Result<(), HttpError> {
        if self.finished {
            return Err(HttpError::new(ErrorKind::AlreadyFinished, "chunked body already finished"));
        }
        if !input.is_empty() {
            self.buffer.extend_from_slice(input);
        }

        loop {
            if self.in_data_phase {
                if self.buffer.is_empty() {
                    return Ok(());
                }
                let accept =
                    (self.buffer.len() as u64).min(self.remaining_chunk_bytes) as usize;
                let data = self.buffer.split_to(accept).freeze();
                self.remaining_chunk_bytes -= accept as u64;
                self.decoded_bytes += accept as u64;
                self.chunks.push(data);
                if self.remaining_chunk_bytes == 0 {
                    self.in_data_phase = false;
                    self.step = Step::AfterDataCr;
                }
                continue;
            }

            match self.step {
                Step::Size => {
                    let Some(scanned) = scan_line(&self.buffer, 0, limits)? else { return Ok(()) };
                    let line = self.buffer[scanned.start..scanned.end].to_vec();
                    self.buffer = self.buffer.split_off(scanned.bytes_consumed);
                    self.apply_size_line(&line, limits)?;
                }
                Step::AfterDataCr => {
                    let Some(&b0) = self.buffer.first() else { return Ok(()) };
                    if b0 != b'\r' {
                        return Err(HttpError::with_preview(
                            ErrorKind::MissingChunkCrlf,
                            "expected CR after chunk data",
                            &self.buffer,
                        ));
                    }
                    self.buffer = self.buffer.split_off(1);
                    self.step = Step::AfterDataLf;
                }
                Step::AfterDataLf => {
                    let Some(&b0) = self.buffer.first() else { return Ok(()) };
                    if b0 != b'\n' {
                        return Err(HttpError::with_preview(
                            ErrorKind::MissingChunkCrlf,
                            "expected LF after chunk data CR",
                            &self.buffer,
                        ));
                    }
                    self.buffer = self.buffer.split_off(1);
                    self.step = Step::Size;
                }
                Step::Trailer => {
                    let Some(scanned) = scan_line(&self.buffer, 0, limits)? else { return Ok(()) };
                    let consumed = scanned.bytes_consumed;
                    if scanned.end == scanned.start {
                        self.buffer = self.buffer.split_off(consumed);
                        self.finished = true;
                        tracing::trace!(decoded = self.decoded_bytes, "chunked body finished");
                        return Ok(());
                    }
                    let line = self.buffer[scanned.start..scanned.end].to_vec();
                    self.buffer = self.buffer.split_off(consumed);
                    let parsed = parse_header_line(&line, limits)?;
                    self.merge_trailer(parsed.name, parsed.value);
                }
            }
        }
    }

    fn merge_trailer(&mut self, name: Bytes, value: Bytes) {
        // Duplicate trailer names merge by comma-joining, matching
        // list-valued HTTP header semantics.
        let lower = String::from_utf8_lossy(&name).to_ascii_lowercase();
        if let Some(existing) = self.trailers.get_first(&lower).cloned() {
            let mut joined = existing.to_vec();
            joined.extend_from_slice(b", ");
            joined.extend_from_slice(&value);
            self.trailers.set(&lower, Bytes::from(joined));
        } else {
            self.trailers.push(name, value);
        }
    }

    fn apply_size_line(&mut self, line: &[u8], limits: &Limits) -> Result<(), HttpError> {
        let semi = line.iter().position(|&b| b == b';');
        let (size_part, ext_part) = match semi {
            Some(i) => (&line[..i], &line[i + 1..]),
            None => (line, &line[line.len()..]),
        };

        if ext_part.len() > limits.max_chunk_extension_bytes {
            return Err(HttpError::with_preview(
                ErrorKind::ChunkExtensionTooLarge,
                format!("chunk extension exceeds {} bytes", limits.max_chunk_extension_bytes),
                ext_part,
            ));
        }

        if size_part.is_empty() {
            return Err(HttpError::with_preview(
                ErrorKind::InvalidChunkSize,
                "empty chunk size",
                line,
            ));
        }
        if size_part.len() > limits.max_chunk_size_hex_digits {
            return Err(HttpError::with_preview(
                ErrorKind::ChunkSizeTooLarge,
                format!("chunk size has more than {} hex digits", limits.max_chunk_size_hex_digits),
                size_part,
            ));
        }
        if !size_part.iter().all(u8::is_ascii_hexdigit) {
            return Err(HttpError::with_preview(
                ErrorKind::InvalidChunkSize,
                "chunk size is not valid hexadecimal",
                size_part,
            ));
        }

        let size_str = std::str::from_utf8(size_part).unwrap();
        let size = u64::from_str_radix(size_str, 16).map_err(|_| {
            HttpError::with_preview(ErrorKind::InvalidChunkSize, "chunk size overflow", size_part)
        })?;
        if size > limits.max_chunk_size {
            return Err(HttpError::with_preview(
                ErrorKind::ChunkSizeTooLarge,
                format!("chunk size exceeds {} bytes", limits.max_chunk_size),
                size_part,
            ));
        }

        self.current_chunk_size = size;
        if size == 0 {
            self.step = Step::Trailer;
        } else {
            self.remaining_chunk_bytes = size;
            self.in_data_phase = true;
        }
        Ok(())
    }
}

impl Default for ChunkedBodyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> Limits {
        Limits::default()
    }

    fn body_str(d: &ChunkedBodyDecoder) -> String {
        d.chunks().iter().flat_map(|c| c.to_vec()).map(|b| b as char).collect()
    }

    #[test]
    fn zero_chunk_only_finishes_with_empty_body_and_trailers() {
        let mut d = ChunkedBodyDecoder::new();
        d.decode(b"0\r\n\r\n", &limits()).unwrap();
        assert_eq!(d.phase(), ChunkedPhase::Finished);
        assert!(d.chunks().is_empty());
        assert_eq!(d.trailers().len(), 0);
    }

    #[test]
    fn two_chunks_concatenate() {
        let mut d = ChunkedBodyDecoder::new();
        d.decode(b"5\r\nHello\r\n6\r\n World\r\n0\r\n\r\n", &limits()).unwrap();
        assert_eq!(d.phase(), ChunkedPhase::Finished);
        assert_eq!(body_str(&d), "Hello World");
        assert_eq!(d.decoded_bytes(), 11);
    }

    #[test]
    fn trailer_headers_are_captured() {
        let mut d = ChunkedBodyDecoder::new();
        d.decode(b"5\r\nHello\r\n0\r\nX-Trailer: ok\r\n\r\n", &limits()).unwrap();
        assert_eq!(body_str(&d), "Hello");
        assert_eq!(d.trailers().get_first("x-trailer").unwrap().as_ref(), b"ok");
    }

    #[test]
    fn duplicate_trailer_names_comma_join() {
        let mut d = ChunkedBodyDecoder::new();
        d.decode(b"0\r\nX-T: a\r\nX-T: b\r\n\r\n", &limits()).unwrap();
        assert_eq!(d.trailers().get_first("x-t").unwrap().as_ref(), b"a, b");
    }

    #[test]
    fn chunk_extension_is_ignored_but_length_checked() {
        let mut d = ChunkedBodyDecoder::new();
        d.decode(b"5;ext=val\r\nHello\r\n0\r\n\r\n", &limits()).unwrap();
        assert_eq!(body_str(&d), "Hello");
    }

    #[test]
    fn oversized_chunk_extension_is_rejected() {
        let mut l = limits();
        l.max_chunk_extension_bytes = 2;
        let mut d = ChunkedBodyDecoder::new();
        let err = d.decode(b"5;extension-too-long\r\nHello\r\n0\r\n\r\n", &l).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ChunkExtensionTooLarge);
    }

    #[test]
    fn hex_chunk_size_digit_limit() {
        let mut l = limits();
        l.max_chunk_size_hex_digits = 2;
        let mut d = ChunkedBodyDecoder::new();
        let err = d.decode(b"abc\r\n", &l).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ChunkSizeTooLarge);
    }

    #[test]
    fn hex_chunk_size_digit_limit_exact_is_ok() {
        let mut l = limits();
        l.max_chunk_size_hex_digits = 2;
        let mut d = ChunkedBodyDecoder::new();
        d.decode(b"ab\r\n", &l).unwrap();
        assert_eq!(d.phase(), ChunkedPhase::Data);
    }

    #[test]
    fn invalid_hex_chunk_size_is_rejected() {
        let mut d = ChunkedBodyDecoder::new();
        let err = d.decode(b"xyz\r\n", &limits()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidChunkSize);
    }

    #[test]
    fn missing_crlf_after_chunk_data_is_rejected() {
        let mut d = ChunkedBodyDecoder::new();
        let err = d.decode(b"3\r\nabcXX", &limits()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingChunkCrlf);
    }

    #[test]
    fn byte_at_a_time_matches_one_shot() {
        let raw: &[u8] = b"5\r\nHello\r\n6\r\n World\r\n0\r\nX-Trailer: ok\r\n\r\n";

        let mut one_shot = ChunkedBodyDecoder::new();
        one_shot.decode(raw, &limits()).unwrap();

        let mut incremental = ChunkedBodyDecoder::new();
        for &b in raw {
            incremental.decode(&[b], &limits()).unwrap();
        }

        assert_eq!(body_str(&one_shot), body_str(&incremental));
        assert_eq!(one_shot.phase(), incremental.phase());
        assert_eq!(
            one_shot.trailers().get_first("x-trailer"),
            incremental.trailers().get_first("x-trailer")
        );
    }

    #[test]
    fn remainder_after_finish_is_captured_for_pipelining() {
        let mut d = ChunkedBodyDecoder::new();
        d.decode(b"0\r\n\r\nNEXTREQUEST", &limits()).unwrap();
        assert_eq!(&d.take_remainder()[..], b"NEXTREQUEST");
    }

    #[test]
    fn chunk_size_too_large_value_is_rejected() {
        let mut l = limits();
        l.max_chunk_size = 4;
        let mut d = ChunkedBodyDecoder::new();
        let err = d.decode(b"5\r\nHello\r\n0\r\n\r\n", &l).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ChunkSizeTooLarge);
    }
}
