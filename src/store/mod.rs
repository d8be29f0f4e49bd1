//! # Storage Layer
//!
//! Durable state is a set of independent keyed blobs behind the
//! [`KeyValueStore`] trait. Two blobs exist:
//!
//! | Key | Contents | Owner |
//! |---|---|---|
//! | [`PHOTOS_KEY`] (`event_photos`) | JSON array of `PhotoRecord`, newest first | [`PhotoStore`] |
//! | [`SETTINGS_KEY`] (`event_settings`) | JSON `GallerySettings` object | [`SettingsStore`] |
//!
//! ## Memory Is Truth
//!
//! Each store keeps an authoritative in-memory copy and treats the durable
//! blob as a *mirror*:
//!
//! 1. **Startup**: the mirror seeds memory. A missing blob means empty state;
//!    an unreadable or unparsable blob is logged and also means empty state.
//! 2. **Mutation**: memory changes first, then the whole value is written
//!    back synchronously.
//! 3. **Write failure**: logged and swallowed. Memory stays correct; the
//!    mirror may lag behind it, never the reverse.
//!
//! ## Quota
//!
//! Backends may enforce a byte quota over all blobs they hold, failing with
//! [`StorageError::QuotaExceeded`]. The photo store reacts by mirroring only
//! the most recent [`FALLBACK_KEEP`](photos::FALLBACK_KEEP) photos.
//!
//! ## Implementations
//!
//! - [`FileKvStore`]: one `<key>.json` file per blob in a data directory.
//! - [`MemoryKvStore`]: a map behind a mutex, for tests and scratch sessions.
//!
//! Both stores hold the backend by value; share one backend between them by
//! wrapping it in an `Arc` (the trait is implemented for `Arc<T>` and `&T`).

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;

pub mod fs;
pub mod memory;
pub mod photos;
pub mod settings;

pub use fs::FileKvStore;
pub use memory::MemoryKvStore;
pub use photos::{FALLBACK_KEEP, PhotoStore};
pub use settings::SettingsStore;

/// Blob holding the photo sequence.
pub const PHOTOS_KEY: &str = "event_photos";

/// Blob holding the settings singleton.
pub const SETTINGS_KEY: &str = "event_settings";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("quota exceeded writing '{key}': {needed} bytes needed, quota is {quota}")]
    QuotaExceeded { key: String, needed: u64, quota: u64 },
    #[error("corrupt blob '{key}': {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
    #[error("invalid key '{0}'")]
    InvalidKey(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable key/value collaborator.
///
/// Methods take `&self` so one backend can be shared by several stores;
/// implementations provide their own interior mutability.
pub trait KeyValueStore {
    /// Read a blob. `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace a blob. Either the whole value is stored or nothing changes.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        (**self).put(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        (**self).put(key, value)
    }
}

/// Durability of the mirror after a mutation.
///
/// Never an error: the in-memory state is correct in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persisted {
    /// The full state was written.
    Full,
    /// Only the `kept` most recent photos were written.
    Truncated { kept: usize },
    /// Nothing was written; the mirror still holds the previous state.
    Failed,
}

/// Load and parse a JSON blob.
pub(crate) fn load_json<T: DeserializeOwned>(
    kv: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(bytes) = kv.get(key)? else {
        return Ok(None);
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StorageError::Corrupt {
            key: key.to_string(),
            source,
        })
}

/// Serialize and write a JSON blob, returning the number of bytes written.
pub(crate) fn save_json<T: Serialize + ?Sized>(
    kv: &impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<usize, StorageError> {
    let bytes = serde_json::to_vec(value)?;
    kv.put(key, &bytes)?;
    Ok(bytes.len())
}

/// Keys become file names, so keep them to a safe alphabet.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
