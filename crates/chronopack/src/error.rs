//! Error and Result types for chronopack operations.

use std::io;
use thiserror::Error;

/// A convenience `Result` type for chronopack operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// The error type for encoding, decoding and series operations.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A caller-supplied argument is outside its valid domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The envelope parsed but its records are not well-formed.
    #[error("Corrupt payload: {0}")]
    CorruptPayload(String),

    /// The envelope bytes could not be parsed.
    #[error("Decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// The envelope could not be serialized.
    #[error("Encode error: {0}")]
    Encode(#[from] prost::EncodeError),

    /// The JSON fallback payload could not be read or written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying I/O error from the gzip stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    /// Returns true when the error describes damaged stored data rather than
    /// a bad call.
    pub fn is_corruption(&self) -> bool {
        !matches!(self, CodecError::InvalidArgument(_))
    }
}
