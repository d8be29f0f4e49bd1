//! Photo ingestion: selected files → [`PhotoRecord`]s.
//!
//! Each file goes through [`transcode_image`] (decode → bound to
//! [`MAX_EDGE`](crate::imaging::MAX_EDGE) → JPEG) and is stamped with an id
//! and a capture time. Ingestion never touches the store; the caller merges
//! the resulting records.
//!
//! ## Batches
//!
//! Files selected together form a batch. They are transcoded one at a time,
//! in selection order, so only one decoded bitmap is alive at once. Record
//! `i` is stamped `now - i * BATCH_STEP_MS`: under newest-first ordering the
//! first file selected is shown first.
//!
//! A file that cannot be read or decoded is skipped and reported in
//! [`BatchReport::failures`]; the rest of the batch carries on. Files are
//! read inside the batch loop ([`read_sources`]), so each file's bytes are
//! dropped once its record is built.
//!
//! ## Progress
//!
//! Pass a [`Sender`] to receive an [`IngestEvent`] per file, e.g. to print
//! progress from another thread while the batch runs.

use crate::imaging::{BackendError, ImageBackend, supported_input_extensions, transcode_image};
use crate::types::PhotoRecord;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Capture-time spacing between consecutive files of one batch.
pub const BATCH_STEP_MS: i64 = 10;

/// Hex characters kept from the id digest.
const ID_LEN: usize = 12;

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A selected file, read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file; the name is its final path component.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::new(display_name(path), bytes))
    }
}

/// A file left out of a batch, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub source_name: String,
    pub reason: String,
}

/// Outcome of transcoding one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Records in selection order.
    pub records: Vec<PhotoRecord>,
    pub failures: Vec<SkippedFile>,
}

impl BatchReport {
    /// Some files were stored and some were skipped.
    pub fn is_partial(&self) -> bool {
        !self.records.is_empty() && !self.failures.is_empty()
    }

    /// Every selected file produced a record.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.records.len() + self.failures.len()
    }
}

/// Progress of a running batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestEvent {
    BatchStarted {
        count: usize,
    },
    PhotoTranscoded {
        /// 1-based position in the batch.
        index: usize,
        source_name: String,
        id: String,
        width: u32,
        height: u32,
    },
    PhotoSkipped {
        index: usize,
        source_name: String,
        reason: String,
    },
}

/// Transcode one file into a record stamped `captured_at`.
pub fn transcode(
    backend: &impl ImageBackend,
    source: &SourceFile,
    captured_at: i64,
) -> Result<PhotoRecord, BackendError> {
    let image = transcode_image(backend, &source.bytes)?;
    Ok(PhotoRecord {
        id: generate_id(source, captured_at),
        payload: image.payload,
        captured_at,
        width: image.width,
        height: image.height,
        source_name: source.name.clone(),
    })
}

/// Transcode a batch sequentially, skipping files that fail.
///
/// `sources` is pulled one item at a time, after the previous file has been
/// fully transcoded, so a lazy iterator such as [`read_sources`] keeps only
/// one file's bytes in memory. An `Err` item is a file that could not be
/// read; it is skipped like a file that fails to decode.
///
/// `now` is the capture time of the first file, in ms since the epoch.
pub fn transcode_batch<I>(
    backend: &impl ImageBackend,
    sources: I,
    now: i64,
    events: Option<&Sender<IngestEvent>>,
) -> BatchReport
where
    I: IntoIterator<Item = Result<SourceFile, SkippedFile>>,
    I::IntoIter: ExactSizeIterator,
{
    let emit = |event: IngestEvent| {
        if let Some(tx) = events {
            // Receiver gone means nobody is watching; the batch still runs.
            let _ = tx.send(event);
        }
    };

    let sources = sources.into_iter();
    emit(IngestEvent::BatchStarted {
        count: sources.len(),
    });

    let mut report = BatchReport::default();
    for (i, source) in sources.enumerate() {
        let captured_at = now - i as i64 * BATCH_STEP_MS;
        let outcome = source.and_then(|source| {
            transcode(backend, &source, captured_at).map_err(|e| SkippedFile {
                source_name: source.name,
                reason: e.to_string(),
            })
        });
        match outcome {
            Ok(record) => {
                debug!(
                    source = %record.source_name,
                    id = %record.id,
                    width = record.width,
                    height = record.height,
                    "photo transcoded"
                );
                emit(IngestEvent::PhotoTranscoded {
                    index: i + 1,
                    source_name: record.source_name.clone(),
                    id: record.id.clone(),
                    width: record.width,
                    height: record.height,
                });
                report.records.push(record);
            }
            Err(skipped) => {
                warn!(source = %skipped.source_name, error = %skipped.reason, "skipping photo");
                emit(IngestEvent::PhotoSkipped {
                    index: i + 1,
                    source_name: skipped.source_name.clone(),
                    reason: skipped.reason.clone(),
                });
                report.failures.push(skipped);
            }
        }
    }
    report
}

/// Lazily read `files`, one per iteration step.
///
/// A file that cannot be read yields a [`SkippedFile`] named after its final
/// path component.
pub fn read_sources(
    files: &[PathBuf],
) -> impl ExactSizeIterator<Item = Result<SourceFile, SkippedFile>> + '_ {
    files.iter().map(|path| {
        SourceFile::read(path).map_err(|e| SkippedFile {
            source_name: display_name(path),
            reason: e.to_string(),
        })
    })
}

/// Wrap files already in memory as batch input.
pub fn loaded(
    sources: Vec<SourceFile>,
) -> impl ExactSizeIterator<Item = Result<SourceFile, SkippedFile>> {
    sources.into_iter().map(Ok)
}

/// Resolve selected paths into the files of one batch.
///
/// Files are taken as given, whatever their extension. Directories are
/// walked recursively in file-name order, keeping supported image
/// extensions only. Paths that don't exist are reported as skipped.
pub fn collect_sources(paths: &[PathBuf]) -> (Vec<PathBuf>, Vec<SkippedFile>) {
    let mut files = Vec::new();
    let mut missing = Vec::new();

    for path in paths {
        if path.is_dir() {
            let walker = WalkDir::new(path).sort_by_file_name().into_iter();
            for entry in walker {
                match entry {
                    Ok(entry) if entry.file_type().is_file() && is_image(entry.path()) => {
                        files.push(entry.into_path());
                    }
                    Ok(_) => {}
                    Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable entry"),
                }
            }
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            missing.push(SkippedFile {
                source_name: path.display().to_string(),
                reason: "no such file or directory".to_string(),
            });
        }
    }
    (files, missing)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .is_some_and(|e| supported_input_extensions().contains(&e.as_str()))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Fresh id: digest of the source, its name, the capture time, and a
/// process-wide counter, so re-ingesting the same file yields a new id.
fn generate_id(source: &SourceFile, captured_at: i64) -> String {
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut hasher = Sha256::new();
    hasher.update(&source.bytes);
    hasher.update(source.name.as_bytes());
    hasher.update(b"\0");
    hasher.update(captured_at.to_le_bytes());
    hasher.update(counter.to_le_bytes());
    let mut id = format!("{:x}", hasher.finalize());
    id.truncate(ID_LEN);
    id
}

/// Current time in ms since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockBackend;
    use std::fs;
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn backend_with(images: &[(&[u8], u32, u32)]) -> MockBackend {
        images
            .iter()
            .fold(MockBackend::new(), |b, (bytes, w, h)| b.with_image(bytes, *w, *h))
    }

    #[test]
    fn transcode_builds_record() {
        let backend = backend_with(&[(b"A", 3000, 2000)]);
        let record = transcode(&backend, &SourceFile::new("a.jpg", b"A".to_vec()), 5000).unwrap();

        assert_eq!(record.source_name, "a.jpg");
        assert_eq!(record.captured_at, 5000);
        assert_eq!((record.width, record.height), (1600, 1067));
        assert_eq!(record.id.len(), ID_LEN);
        assert!(record.payload.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn batch_staggers_capture_times_in_selection_order() {
        let backend = backend_with(&[(b"A", 10, 10), (b"B", 10, 10), (b"C", 10, 10)]);
        let sources = vec![
            SourceFile::new("A.jpg", b"A".to_vec()),
            SourceFile::new("B.jpg", b"B".to_vec()),
            SourceFile::new("C.jpg", b"C".to_vec()),
        ];

        let report = transcode_batch(&backend, loaded(sources), 1_000_000, None);

        let times: Vec<i64> = report.records.iter().map(|r| r.captured_at).collect();
        assert_eq!(times, [1_000_000, 999_990, 999_980]);
        assert!(report.is_complete());
        assert!(!report.is_partial());
    }

    #[test]
    fn batch_skips_undecodable_file_and_continues() {
        let backend = backend_with(&[(b"A", 10, 10), (b"C", 10, 10)]);
        let sources = vec![
            SourceFile::new("A.jpg", b"A".to_vec()),
            SourceFile::new("notes.txt", b"hello".to_vec()),
            SourceFile::new("C.jpg", b"C".to_vec()),
        ];

        let report = transcode_batch(&backend, loaded(sources), 1000, None);

        let names: Vec<&str> = report.records.iter().map(|r| r.source_name.as_str()).collect();
        assert_eq!(names, ["A.jpg", "C.jpg"]);
        // Position in the batch still drives the stagger
        assert_eq!(report.records[1].captured_at, 980);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source_name, "notes.txt");
        assert!(report.failures[0].reason.contains("Decode failed"));
        assert!(report.is_partial());
        assert_eq!(report.attempted(), 3);
    }

    #[test]
    fn batch_of_only_failures_is_not_partial() {
        let backend = MockBackend::new();
        let report = transcode_batch(&backend, loaded(vec![SourceFile::new("x", vec![1])]), 0, None);
        assert!(report.records.is_empty());
        assert!(!report.is_partial());
        assert!(!report.is_complete());
    }

    #[test]
    fn empty_batch_is_empty_report() {
        let backend = MockBackend::new();
        let report = transcode_batch(&backend, loaded(vec![]), 0, None);
        assert_eq!(report, BatchReport::default());
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn batch_emits_events_in_order() {
        let backend = backend_with(&[(b"A", 100, 50)]);
        let sources = vec![
            SourceFile::new("A.jpg", b"A".to_vec()),
            SourceFile::new("bad.jpg", b"?".to_vec()),
        ];
        let (tx, rx) = mpsc::channel();

        let report = transcode_batch(&backend, loaded(sources), 0, Some(&tx));
        drop(tx);
        let events: Vec<IngestEvent> = rx.into_iter().collect();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0], IngestEvent::BatchStarted { count: 2 });
        assert_eq!(
            events[1],
            IngestEvent::PhotoTranscoded {
                index: 1,
                source_name: "A.jpg".into(),
                id: report.records[0].id.clone(),
                width: 100,
                height: 50,
            }
        );
        assert!(matches!(
            &events[2],
            IngestEvent::PhotoSkipped { index: 2, source_name, .. } if source_name == "bad.jpg"
        ));
    }

    #[test]
    fn dropped_receiver_does_not_stop_batch() {
        let backend = backend_with(&[(b"A", 10, 10)]);
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let report = transcode_batch(
            &backend,
            loaded(vec![SourceFile::new("A", b"A".to_vec())]),
            0,
            Some(&tx),
        );
        assert_eq!(report.records.len(), 1);
    }

    #[test]
    fn ids_are_unique_for_identical_input() {
        let source = SourceFile::new("same.jpg", b"same".to_vec());
        let a = generate_id(&source, 42);
        let b = generate_id(&source, 42);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn collect_walks_directories_for_images() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("card");
        fs::create_dir_all(dir.join("sub")).unwrap();
        fs::write(dir.join("b.JPG"), "").unwrap();
        fs::write(dir.join("a.png"), "").unwrap();
        fs::write(dir.join("readme.txt"), "").unwrap();
        fs::write(dir.join("sub/c.webp"), "").unwrap();

        let (files, missing) = collect_sources(&[dir.clone()]);

        let names: Vec<String> = files.iter().map(|p| display_name(p)).collect();
        assert_eq!(names, ["a.png", "b.JPG", "c.webp"]);
        assert!(missing.is_empty());
    }

    #[test]
    fn collect_keeps_explicit_files_and_reports_missing() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("photo.dat");
        fs::write(&file, "").unwrap();
        let gone = tmp.path().join("gone.jpg");

        let (files, missing) = collect_sources(&[file.clone(), gone]);

        assert_eq!(files, [file]);
        assert_eq!(missing.len(), 1);
        assert!(missing[0].source_name.ends_with("gone.jpg"));
    }

    #[test]
    fn source_file_read_uses_file_name() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("IMG_0001.jpg");
        fs::write(&path, b"bytes").unwrap();
        let source = SourceFile::read(&path).unwrap();
        assert_eq!(source.name, "IMG_0001.jpg");
        assert_eq!(source.bytes, b"bytes");
    }

    #[test]
    fn batch_pulls_next_source_only_after_previous_is_transcoded() {
        let backend = backend_with(&[(b"A", 10, 10), (b"B", 10, 10), (b"C", 10, 10)]);
        let names = ["A", "B", "C"];

        // Each finished file leaves an identify and a transcode behind, so
        // file `i` must see exactly `2 * i` recorded operations when read.
        let sources = names.iter().enumerate().map(|(i, name)| {
            assert_eq!(backend.get_operations().len(), 2 * i, "{name} read too early");
            Ok(SourceFile::new(*name, name.as_bytes().to_vec()))
        });
        let report = transcode_batch(&backend, sources, 0, None);

        assert_eq!(report.records.len(), 3);
    }

    #[test]
    fn unreadable_file_is_skipped_at_its_position() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.jpg");
        let c = tmp.path().join("c.jpg");
        fs::write(&a, b"A").unwrap();
        fs::write(&c, b"C").unwrap();
        let files = vec![a, tmp.path().join("vanished.jpg"), c];
        let backend = backend_with(&[(b"A", 10, 10), (b"C", 10, 10)]);
        let (tx, rx) = mpsc::channel();

        let report = transcode_batch(&backend, read_sources(&files), 1000, Some(&tx));
        drop(tx);
        let events: Vec<IngestEvent> = rx.into_iter().collect();

        assert_eq!(events[0], IngestEvent::BatchStarted { count: 3 });
        assert!(matches!(
            &events[2],
            IngestEvent::PhotoSkipped { index: 2, source_name, .. } if source_name == "vanished.jpg"
        ));
        let times: Vec<i64> = report.records.iter().map(|r| r.captured_at).collect();
        assert_eq!(times, [1000, 980]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source_name, "vanished.jpg");
    }
}
