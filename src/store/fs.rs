//! File-backed key/value backend.
//!
//! ## Storage Layout
//!
//! ```text
//! .live-gal/
//! ├── config.toml            # optional, see `config`
//! ├── event_photos.json      # photo mirror
//! └── event_settings.json    # settings mirror
//! ```
//!
//! Writes go to `<key>.json.tmp` and are renamed over `<key>.json`, so a
//! crash mid-write leaves the previous blob intact.

use super::{KeyValueStore, StorageError, validate_key};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const BLOB_EXTENSION: &str = "json";

/// One JSON file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    dir: PathBuf,
    quota: Option<u64>,
}

impl FileKvStore {
    /// Open (creating if needed) the data directory. `quota` of `None` means unlimited.
    pub fn open(dir: impl Into<PathBuf>, quota: Option<u64>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, quota })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the blob for `key`.
    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{BLOB_EXTENSION}"))
    }

    /// Total size of all blobs except `key`'s.
    fn bytes_excluding(&self, key: &str) -> io::Result<u64> {
        let skip = self.blob_path(key);
        let mut total = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_blob = path
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case(BLOB_EXTENSION));
            if is_blob && path != skip {
                total += fs::metadata(&path)?.len();
            }
        }
        Ok(total)
    }
}

impl KeyValueStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        validate_key(key)?;
        match fs::read(self.blob_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        validate_key(key)?;

        if let Some(quota) = self.quota {
            let needed = self.bytes_excluding(key)? + value.len() as u64;
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }

        let path = self.blob_path(key);
        let tmp = path.with_extension(format!("{BLOB_EXTENSION}.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}
