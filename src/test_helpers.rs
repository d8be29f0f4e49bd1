//! Shared test utilities for the live-gal test suite.
//!
//! Provides synthetic image encoders, record builders, and extractors that
//! keep ordering assertions readable.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut store = PhotoStore::open(MemoryKvStore::new());
//! store.add_photos(vec![record("a", 300), record("b", 100)]);
//! assert_eq!(ids(store.list()), ["a", "b"]);
//! ```

use image::{ImageEncoder, RgbImage, RgbaImage};

use crate::types::PhotoRecord;

// =========================================================================
// Synthetic images
// =========================================================================

/// Encode a gradient JPEG of the given size in memory.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

/// Encode a half-transparent PNG of the given size in memory.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        image::Rgba([200, (x % 256) as u8, 40, 128])
    });
    let mut bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgba8)
        .unwrap();
    bytes
}

/// Encode a JPEG whose left half is red and right half blue.
pub fn split_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            image::Rgb([255, 0, 0])
        } else {
            image::Rgb([0, 0, 255])
        }
    });
    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, 95)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

/// Insert an APP1 Exif segment carrying only an Orientation tag right
/// after the JPEG's SOI marker.
pub fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "not a JPEG");

    // Big-endian TIFF header, one IFD with a single SHORT entry (0x0112)
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\0\x2A");
    tiff.extend_from_slice(&8u32.to_be_bytes());
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x0112u16.to_be_bytes());
    tiff.extend_from_slice(&3u16.to_be_bytes());
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_be_bytes());

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);

    let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

// =========================================================================
// Record builders
// =========================================================================

/// A small record with a fixed tiny payload.
pub fn record(id: &str, captured_at: i64) -> PhotoRecord {
    PhotoRecord {
        id: id.to_string(),
        payload: "data:image/jpeg;base64,AAAA".to_string(),
        captured_at,
        width: 4,
        height: 3,
        source_name: format!("{id}.jpg"),
    }
}

/// `count` records with ids `p0..p{count-1}`, newest first, 10 ms apart.
pub fn records_descending(count: usize, newest: i64) -> Vec<PhotoRecord> {
    (0..count)
        .map(|i| record(&format!("p{i}"), newest - i as i64 * 10))
        .collect()
}

// =========================================================================
// Extractors
// =========================================================================

/// Record ids in sequence order.
pub fn ids(records: &[PhotoRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

/// Assert `records` is sorted by `captured_at`, newest first.
pub fn assert_descending(records: &[PhotoRecord]) {
    for pair in records.windows(2) {
        assert!(
            pair[0].captured_at >= pair[1].captured_at,
            "out of order: {} ({}) before {} ({})",
            pair[0].id,
            pair[0].captured_at,
            pair[1].id,
            pair[1].captured_at
        );
    }
}
