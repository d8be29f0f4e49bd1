//! The gallery session: stores, transcoder, and layout behind one handle.
//!
//! [`Gallery`] is what a front end talks to. It owns one durable layer,
//! shared by the photo and settings stores, and an [`ImageBackend`] for
//! ingestion. All reads come from memory; every mutation re-mirrors
//! synchronously before returning.
//!
//! ```no_run
//! # use live_gal::gallery::Gallery;
//! # use std::path::{Path, PathBuf};
//! let mut gallery = Gallery::open(Path::new(".live-gal"))?;
//! let outcome = gallery.ingest_paths(&[PathBuf::from("card/DCIM")], None);
//! println!("{} photos added", outcome.report.records.len());
//! # Ok::<(), live_gal::gallery::GalleryError>(())
//! ```

use crate::config::{ConfigError, GalleryConfig, load_config};
use crate::imaging::{ImageBackend, RustBackend};
use crate::ingest::{
    BatchReport, IngestEvent, SkippedFile, SourceFile, collect_sources, loaded, now_millis,
    read_sources, transcode_batch,
};
use crate::layout::distribute;
use crate::store::{FileKvStore, KeyValueStore, Persisted, PhotoStore, SettingsStore};
use crate::types::{GallerySettings, PhotoRecord, SettingsUpdate};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("cannot open data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result of one ingest batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub report: BatchReport,
    /// Mirror state after adding the batch; `None` when nothing was added.
    pub persisted: Option<Persisted>,
}

/// A live gallery over a durable layer `K` and an image backend `B`.
#[derive(Debug)]
pub struct Gallery<K, B = RustBackend> {
    photos: PhotoStore<Arc<K>>,
    settings: SettingsStore<Arc<K>>,
    backend: B,
}

impl Gallery<FileKvStore> {
    /// Open the gallery in `data_dir`, reading its `config.toml` if present.
    pub fn open(data_dir: &Path) -> Result<Self, GalleryError> {
        let config = load_config(data_dir)?;
        Self::open_with_config(data_dir, &config)
    }

    /// Open the gallery in `data_dir` with an already resolved config.
    pub fn open_with_config(data_dir: &Path, config: &GalleryConfig) -> Result<Self, GalleryError> {
        let kv = FileKvStore::open(data_dir, config.storage.quota()).map_err(|source| {
            GalleryError::DataDir {
                path: data_dir.to_path_buf(),
                source,
            }
        })?;
        info!(dir = %kv.dir().display(), quota = ?config.storage.quota(), "opening gallery");
        Ok(Self::with_parts(
            Arc::new(kv),
            RustBackend::new(),
            config.defaults.to_settings(),
        ))
    }
}

impl<K: KeyValueStore, B: ImageBackend> Gallery<K, B> {
    /// Assemble a gallery from its parts, loading both mirrors from `kv`.
    pub fn with_parts(kv: Arc<K>, backend: B, defaults: GallerySettings) -> Self {
        Self {
            photos: PhotoStore::open(Arc::clone(&kv)),
            settings: SettingsStore::open(kv, defaults),
            backend,
        }
    }

    /// Transcode `sources` as one batch and add the results.
    pub fn ingest(
        &mut self,
        sources: Vec<SourceFile>,
        events: Option<&Sender<IngestEvent>>,
    ) -> IngestOutcome {
        self.ingest_batch(loaded(sources), events)
    }

    /// Read files and directories from disk and ingest them as one batch.
    ///
    /// Each file is read only when its turn in the batch comes. Paths that
    /// don't exist are listed first among the failures, ahead of files that
    /// could not be read or decoded.
    pub fn ingest_paths(
        &mut self,
        paths: &[PathBuf],
        events: Option<&Sender<IngestEvent>>,
    ) -> IngestOutcome {
        let (files, mut missing) = collect_sources(paths);
        for skipped in &missing {
            warn!(path = %skipped.source_name, "selected path does not exist");
        }
        let mut outcome = self.ingest_batch(read_sources(&files), events);
        missing.append(&mut outcome.report.failures);
        outcome.report.failures = missing;
        outcome
    }

    fn ingest_batch<I>(&mut self, sources: I, events: Option<&Sender<IngestEvent>>) -> IngestOutcome
    where
        I: IntoIterator<Item = Result<SourceFile, SkippedFile>>,
        I::IntoIter: ExactSizeIterator,
    {
        let report = transcode_batch(&self.backend, sources, now_millis(), events);
        let persisted = if report.records.is_empty() {
            None
        } else {
            Some(self.photos.add_photos(report.records.clone()))
        };
        info!(
            added = report.records.len(),
            skipped = report.failures.len(),
            total = self.photos.len(),
            "batch ingested"
        );
        IngestOutcome { report, persisted }
    }

    /// Current collection, newest first.
    pub fn photos(&self) -> &[PhotoRecord] {
        self.photos.list()
    }

    pub fn photo(&self, id: &str) -> Option<&PhotoRecord> {
        self.photos.get(id)
    }

    /// Delete by id; `None` when the id is unknown.
    pub fn delete_photo(&mut self, id: &str) -> Option<Persisted> {
        self.photos.delete_photo(id)
    }

    pub fn settings(&self) -> &GallerySettings {
        self.settings.get()
    }

    pub fn update_settings(&mut self, update: SettingsUpdate) -> Persisted {
        self.settings.update(update)
    }

    /// Current collection dealt into `columns` waterfall columns.
    pub fn columns(&self, columns: NonZeroUsize) -> Vec<Vec<&PhotoRecord>> {
        distribute(self.photos.list(), columns)
    }
}
