//! Body decoders: fixed-length (Content-Length) and chunked transfer
//! encoding, each a pausable, restartable state machine.

mod chunked;
mod fixed;

pub use chunked::{ChunkedBodyDecoder, ChunkedPhase};
pub use fixed::{FixedLengthBodyDecoder, FixedLengthPhase};
