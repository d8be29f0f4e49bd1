//! In-memory key/value backend.

use super::{KeyValueStore, StorageError, validate_key};
use std::collections::HashMap;
use std::sync::Mutex;

/// Blobs held in a `HashMap`, with the same quota rules as [`FileKvStore`].
///
/// Uses `Mutex` (not `RefCell`) so it is `Sync` and can sit behind an `Arc`.
///
/// [`FileKvStore`]: super::FileKvStore
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    quota: Option<u64>,
}

impl MemoryKvStore {
    /// Unlimited store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store rejecting writes that would push the total size over `quota` bytes.
    pub fn with_quota(quota: u64) -> Self {
        Self {
            blobs: Mutex::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Total bytes currently stored across all keys.
    #[cfg(test)]
    fn used_bytes(&self) -> u64 {
        self.lock().values().map(|v| v.len() as u64).sum()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // A panic while holding the lock cannot leave a half-written blob
        // behind, so the map is still consistent.
        self.blobs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        validate_key(key)?;
        Ok(self.lock().get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut blobs = self.lock();

        if let Some(quota) = self.quota {
            let others: u64 = blobs
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len() as u64)
                .sum();
            let needed = others + value.len() as u64;
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }

        blobs.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
