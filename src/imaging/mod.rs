//! Image transcoding in pure Rust, with no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` (header only) |
//! | **Bound** | [`bounded_dimensions`]: long edge capped at [`MAX_EDGE`] |
//! | **Resize → JPEG** | Lanczos3 + `image::codecs::jpeg::JpegEncoder` |
//! | **Payload** | `base64` data URL, self-contained |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing a transcode
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, EncodedImage, ImageBackend};
pub use calculations::bounded_dimensions;
pub use operations::{TranscodedImage, data_url, plan_transcode, sniff_mime, transcode_image};
pub use params::{MAX_EDGE, Quality, TRANSCODE_QUALITY, TranscodeParams};
pub use rust_backend::{RustBackend, supported_input_extensions};
