//! High-level image operations.
//!
//! These functions combine calculations with backend execution: identify the
//! source, plan the bounded target, have the backend transcode, and wrap the
//! result as a self-contained payload.

use super::backend::{BackendError, ImageBackend};
use super::calculations::bounded_dimensions;
use super::params::{MAX_EDGE, TRANSCODE_QUALITY, TranscodeParams};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// A transcoded photo, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodedImage {
    /// `data:` URL holding the encoded bytes.
    pub payload: String,
    pub width: u32,
    pub height: u32,
}

/// Plan a transcode for a source of the given dimensions without executing it.
pub fn plan_transcode(original: (u32, u32)) -> TranscodeParams {
    let (width, height) = bounded_dimensions(original, MAX_EDGE);
    TranscodeParams {
        width,
        height,
        quality: TRANSCODE_QUALITY,
    }
}

/// Identify, bound, and re-encode one image held in memory.
pub fn transcode_image(backend: &impl ImageBackend, source: &[u8]) -> Result<TranscodedImage> {
    let dims = backend.identify(source)?;
    let params = plan_transcode((dims.width, dims.height));
    let encoded = backend.transcode(source, &params)?;

    Ok(TranscodedImage {
        payload: data_url(encoded.mime, &encoded.bytes),
        width: encoded.width,
        height: encoded.height,
    })
}

/// Wrap encoded bytes as a `data:` URL.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Guess the MIME type of image bytes from their magic number.
///
/// Returns `None` when the bytes are not a recognized image format.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}
