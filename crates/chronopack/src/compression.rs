//! Gzip framing of serialized envelopes.

use crate::error::Result;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Gzip-compresses `bytes`.
///
/// # Errors
///
/// Returns `CodecError::Io` if the deflate stream fails.
pub fn compress(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 2 + 32), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

/// Inflates a gzip stream.
///
/// # Errors
///
/// Returns `CodecError::Io` if `bytes` is not a complete gzip stream.
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut inflated = Vec::new();
    decoder.read_to_end(&mut inflated)?;
    Ok(inflated)
}
