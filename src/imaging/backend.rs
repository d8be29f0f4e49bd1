//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the ingest pipeline
//! needs: a cheap header-only `identify`, and `transcode`, which decodes,
//! resizes and re-encodes in one pass.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Backends work on
//! in-memory buffers; reading files is the caller's concern.

use super::params::TranscodeParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    /// The bytes could not be interpreted as an image.
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Encoded output of a transcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`, e.g. `image/jpeg`.
    pub mime: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Read image dimensions without decoding pixel data.
    fn identify(&self, source: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode `source`, resize to the target in `params`, and re-encode.
    fn transcode(
        &self,
        source: &[u8],
        params: &TranscodeParams,
    ) -> Result<EncodedImage, BackendError>;
}
