//! CLI output formatting.
//!
//! Every entity is shown by its positional index first, with ids, sizes, and
//! source names as secondary context.
//!
//! # Output Format
//!
//! ## Ingest
//!
//! ```text
//! Ingesting 3 photos
//!     001 IMG_0001.jpg → 1600x1067 (3fa9c2d01b7e)
//!     002 notes.txt: skipped
//!         Reason: Decode failed: ...
//!     003 IMG_0003.jpg → 1200x1600 (9b02e4f1a6c3)
//! Added 2 of 3 photos, skipped 1 (42 in gallery)
//! ```
//!
//! ## List
//!
//! ```text
//! Photos (2)
//! 001 2024-05-18 14:03:21  3fa9c2d01b7e  1600x1067  IMG_0001.jpg
//! 002 2024-05-18 14:03:21  9b02e4f1a6c3  1200x1600  IMG_0003.jpg
//! ```
//!
//! ## Columns
//!
//! ```text
//! Column 1 (2 photos)
//!     001 IMG_0001.jpg (3fa9c2d01b7e)
//!     003 IMG_0007.jpg (c4d5e6f7a8b9)
//! Column 2 (1 photo)
//!     002 IMG_0003.jpg (9b02e4f1a6c3)
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function returning `Vec<String>` and a
//! `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::gallery::IngestOutcome;
use crate::ingest::IngestEvent;
use crate::store::Persisted;
use crate::types::{GallerySettings, PhotoRecord};
use chrono::{Local, TimeZone};
use std::fmt::Display;

/// Longest banner value shown verbatim.
const BANNER_PREVIEW: usize = 60;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Render a capture time (ms since epoch) in `tz`.
fn format_time<Tz: TimeZone>(millis: i64, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    match tz.timestamp_millis_opt(millis).single() {
        Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format!("@{millis}"),
    }
}

/// Shorten data URLs to their header and size.
fn banner_preview(banner: &str) -> String {
    if banner.starts_with("data:") {
        let header = banner.split(',').next().unwrap_or(banner);
        return format!("{header},… ({} bytes)", banner.len());
    }
    if banner.chars().count() > BANNER_PREVIEW {
        let cut: String = banner.chars().take(BANNER_PREVIEW).collect();
        return format!("{cut}...");
    }
    banner.to_string()
}

/// Operator-facing line for a degraded write, if any.
fn persisted_warning(persisted: Persisted) -> Option<String> {
    match persisted {
        Persisted::Full => None,
        Persisted::Truncated { kept } => Some(format!(
            "Warning: storage is full; only the {kept} newest photos will survive a restart"
        )),
        Persisted::Failed => {
            Some("Warning: changes could not be saved and will be lost on restart".to_string())
        }
    }
}

// ============================================================================
// Ingest
// ============================================================================

/// Format one ingest progress event.
pub fn format_ingest_event(event: &IngestEvent) -> Vec<String> {
    match event {
        IngestEvent::BatchStarted { count } => {
            vec![format!("Ingesting {}", plural(*count, "photo"))]
        }
        IngestEvent::PhotoTranscoded {
            index,
            source_name,
            id,
            width,
            height,
        } => vec![format!(
            "    {} {} \u{2192} {}x{} ({})",
            format_index(*index),
            source_name,
            width,
            height,
            id
        )],
        IngestEvent::PhotoSkipped {
            index,
            source_name,
            reason,
        } => vec![
            format!("    {} {}: skipped", format_index(*index), source_name),
            format!("        Reason: {}", reason),
        ],
    }
}

/// Format the end-of-batch summary.
///
/// Failures that never reached the transcoder (missing or unreadable paths)
/// have no progress line, so every failure is listed here.
pub fn format_ingest_summary(outcome: &IngestOutcome, total: usize) -> Vec<String> {
    let report = &outcome.report;
    let mut lines = vec![format!(
        "Added {} of {}, skipped {} ({} in gallery)",
        report.records.len(),
        plural(report.attempted(), "photo"),
        report.failures.len(),
        total
    )];
    if !report.failures.is_empty() {
        lines.push("Skipped".to_string());
        for failure in &report.failures {
            lines.push(format!("    {}: {}", failure.source_name, failure.reason));
        }
    }
    if let Some(warning) = outcome.persisted.and_then(persisted_warning) {
        lines.push(warning);
    }
    lines
}

pub fn print_ingest_summary(outcome: &IngestOutcome, total: usize) {
    for line in format_ingest_summary(outcome, total) {
        println!("{}", line);
    }
}

// ============================================================================
// Collection
// ============================================================================

/// Format the collection, newest first, with capture times in local time.
pub fn format_photo_list(photos: &[PhotoRecord]) -> Vec<String> {
    format_photo_list_in(photos, &Local)
}

fn format_photo_list_in<Tz: TimeZone>(photos: &[PhotoRecord], tz: &Tz) -> Vec<String>
where
    Tz::Offset: Display,
{
    if photos.is_empty() {
        return vec!["No photos yet".to_string()];
    }
    let mut lines = vec![format!("Photos ({})", photos.len())];
    for (i, photo) in photos.iter().enumerate() {
        lines.push(format!(
            "{} {}  {}  {}x{}  {}",
            format_index(i + 1),
            format_time(photo.captured_at, tz),
            photo.id,
            photo.width,
            photo.height,
            photo.source_name
        ));
    }
    lines
}

pub fn print_photo_list(photos: &[PhotoRecord]) {
    for line in format_photo_list(photos) {
        println!("{}", line);
    }
}

/// Format the outcome of deleting `id`.
pub fn format_delete(id: &str, result: Option<Persisted>) -> Vec<String> {
    match result {
        None => vec![format!("Not found: {}", id)],
        Some(persisted) => {
            let mut lines = vec![format!("Deleted {}", id)];
            lines.extend(persisted_warning(persisted));
            lines
        }
    }
}

pub fn print_delete(id: &str, result: Option<Persisted>) {
    for line in format_delete(id, result) {
        println!("{}", line);
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Format a round-robin column assignment.
///
/// Indices are positions in the full collection, so column `c` of `k`
/// shows `c+1, c+1+k, c+1+2k, ...`.
pub fn format_columns(columns: &[Vec<&PhotoRecord>]) -> Vec<String> {
    let count = columns.len();
    let mut lines = Vec::new();
    for (c, column) in columns.iter().enumerate() {
        lines.push(format!("Column {} ({})", c + 1, plural(column.len(), "photo")));
        for (row, photo) in column.iter().enumerate() {
            lines.push(format!(
                "    {} {} ({})",
                format_index(row * count + c + 1),
                photo.source_name,
                photo.id
            ));
        }
    }
    lines
}

pub fn print_columns(columns: &[Vec<&PhotoRecord>]) {
    for line in format_columns(columns) {
        println!("{}", line);
    }
}

// ============================================================================
// Settings
// ============================================================================

pub fn format_settings(settings: &GallerySettings, persisted: Option<Persisted>) -> Vec<String> {
    let mut lines = vec![
        format!("Title: {}", settings.title),
        format!("Banner: {}", banner_preview(&settings.banner_payload)),
    ];
    lines.extend(persisted.and_then(persisted_warning));
    lines
}

pub fn print_settings(settings: &GallerySettings, persisted: Option<Persisted>) {
    for line in format_settings(settings, persisted) {
        println!("{}", line);
    }
}
