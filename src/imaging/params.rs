//! Parameter types for the transcode operation.
//!
//! These structs describe *what* to produce, not *how*. They sit between
//! [`operations`](super::operations), which decides the target from the
//! source dimensions, and the [`backend`](super::backend), which does the
//! pixel work. Swapping in a mock backend leaves the planning logic intact.
//!
//! ## Constants
//!
//! - [`MAX_EDGE`]: longest edge of any stored photo, in pixels.
//! - [`TRANSCODE_QUALITY`]: JPEG quality for stored photos. Not configurable.

/// Longest edge, in pixels, of a transcoded photo.
pub const MAX_EDGE: u32 = 1600;

/// Lossy quality every photo is re-encoded at.
pub const TRANSCODE_QUALITY: Quality = Quality::new(80);

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    /// Clamps `value` into 1-100.
    pub const fn new(value: u32) -> Self {
        if value < 1 {
            Self(1)
        } else if value > 100 {
            Self(100)
        } else {
            Self(value)
        }
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// The value as the encoder's byte-sized quality.
    pub const fn as_u8(self) -> u8 {
        self.0 as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        TRANSCODE_QUALITY
    }
}

/// Target of a single transcode: output bitmap size and encode quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscodeParams {
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
