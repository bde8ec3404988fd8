use bytes::{Bytes, BytesMut};

use crate::error::{ErrorKind, HttpError};
use crate::limits::Limits;

/// Phase of a [`FixedLengthBodyDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedLengthPhase {
    Data,
    Finished,
}

/// Consumes exactly `content_length` bytes across arbitrarily many
/// `decode` calls.
#[derive(Debug, Clone)]
pub struct FixedLengthBodyDecoder {
    phase: FixedLengthPhase,
    content_length: u64,
    remaining: u64,
    decoded_bytes: u64,
    chunks: Vec<Bytes>,
    /// Bytes past the body's end, belonging to the next pipelined
    /// message.
    overflow: BytesMut,
}

impl FixedLengthBodyDecoder {
    /// Create a decoder for a body of exactly `content_length` bytes.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::ContentLengthTooLarge`] if `content_length` exceeds
    /// `limits.max_body_bytes`.
    pub fn new(content_length: u64, limits: &Limits) -> Result<Self, HttpError> {
        if content_length > limits.max_body_bytes {
            return Err(HttpError::new(
                ErrorKind::ContentLengthTooLarge,
                format!("Content-Length {content_length} exceeds {}", limits.max_body_bytes),
            ));
        }
        let phase =
            if content_length == 0 { FixedLengthPhase::Finished } else { FixedLengthPhase::Data };
        Ok(Self {
            phase,
            content_length,
            remaining: content_length,
            decoded_bytes: 0,
            chunks: Vec::new(),
            overflow: BytesMut::new(),
        })
    }

    pub fn phase(&self) -> FixedLengthPhase {
        self.phase
    }

    pub fn decoded_bytes(&self) -> u64 {
        self.decoded_bytes
    }

    pub fn remaining_bytes(&self) -> u64 {
        self.remaining
    }

    /// `decoded_bytes / content_length`, defined as `1.0` when
    /// `content_length` is `0`.
    pub fn progress(&self) -> f64 {
        if self.content_length == 0 { 1.0 } else { self.decoded_bytes as f64 / self.content_length as f64 }
    }

    pub fn chunks(&self) -> &[Bytes] {
        &self.chunks
    }

    /// Bytes left over after the body finished, belonging to the next
    /// message; drains the internal overflow buffer.
    pub fn take_overflow(&mut self) -> Bytes {
        self.overflow.split().freeze()
    }

    /// Feed more input.
    pub fn decode(&mut self, input: &[u8]) -> Result<(), HttpError> {
        if self.phase == FixedLengthPhase::Finished {
            if input.is_empty() {
                return Ok(());
            }
            return Err(HttpError::new(
                ErrorKind::AlreadyFinished,
                "fixed-length body already finished",
            ));
        }
        if input.is_empty() {
            return Ok(());
        }

        let accept = (input.len() as u64).min(self.remaining) as usize;
        self.chunks.push(Bytes::copy_from_slice(&input[..accept]));
        self.decoded_bytes += accept as u64;
        self.remaining -= accept as u64;

        if accept < input.len() {
            self.overflow.extend_from_slice(&input[accept..]);
        }

        if self.remaining == 0 {
            self.phase = FixedLengthPhase::Finished;
            tracing::trace!(decoded = self.decoded_bytes, "fixed-length body finished");
        }
        Ok(())
    }
}
