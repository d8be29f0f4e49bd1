//! The photo collection and its durable mirror.
//!
//! [`PhotoStore`] owns the authoritative sequence of [`PhotoRecord`]s, always
//! sorted by `captured_at`, newest first. Every mutation rewrites the full
//! sequence to the [`PHOTOS_KEY`] blob.
//!
//! ## Overflow
//!
//! When the full write fails (typically [`StorageError::QuotaExceeded`]) and
//! the collection holds more than [`FALLBACK_KEEP`] photos, the store retries
//! with only the newest [`FALLBACK_KEEP`]. The dropped photos stay visible for
//! the rest of the session but will not survive a restart. If the retry fails
//! too, the mirror keeps whatever it held before.
//!
//! [`StorageError::QuotaExceeded`]: super::StorageError::QuotaExceeded

use super::{KeyValueStore, PHOTOS_KEY, Persisted, load_json, save_json};
use crate::types::PhotoRecord;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Photos mirrored by the fallback write when the full sequence does not fit.
pub const FALLBACK_KEEP: usize = 50;

/// Ordered, durable photo collection.
#[derive(Debug)]
pub struct PhotoStore<K> {
    kv: K,
    photos: Vec<PhotoRecord>,
}

impl<K: KeyValueStore> PhotoStore<K> {
    /// Seed the collection from the durable mirror.
    ///
    /// Never fails: a missing, unreadable, or corrupt mirror yields an empty
    /// collection.
    pub fn open(kv: K) -> Self {
        let photos = match load_json::<Vec<PhotoRecord>>(&kv, PHOTOS_KEY) {
            Ok(Some(mut photos)) => {
                sort_descending(&mut photos);
                dedupe_ids(&mut photos);
                info!(key = PHOTOS_KEY, photos = photos.len(), "loaded photos");
                photos
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = PHOTOS_KEY, error = %e, "could not load photos, starting empty");
                Vec::new()
            }
        };
        Self { kv, photos }
    }

    /// Merge `new` into the collection and re-sort everything, newest first.
    ///
    /// The sort is stable over `new ++ existing`, so records with equal
    /// timestamps keep their batch order and sit ahead of older entries.
    /// Records whose id is already taken are dropped.
    pub fn add_photos(&mut self, new: Vec<PhotoRecord>) -> Persisted {
        let mut taken: HashSet<String> = self.photos.iter().map(|p| p.id.clone()).collect();
        let mut merged = Vec::with_capacity(new.len() + self.photos.len());

        for record in new {
            if taken.insert(record.id.clone()) {
                merged.push(record);
            } else {
                warn!(id = %record.id, source = %record.source_name, "duplicate photo id, dropping");
            }
        }
        let added = merged.len();
        merged.append(&mut self.photos);
        sort_descending(&mut merged);
        self.photos = merged;

        debug!(added, total = self.photos.len(), "photos added");
        self.persist()
    }

    /// Remove the photo with `id`.
    ///
    /// Returns `None` when no such photo exists; nothing is written then.
    pub fn delete_photo(&mut self, id: &str) -> Option<Persisted> {
        let before = self.photos.len();
        self.photos.retain(|p| p.id != id);
        if self.photos.len() == before {
            debug!(id, "delete of unknown photo ignored");
            return None;
        }
        debug!(id, total = self.photos.len(), "photo deleted");
        Some(self.persist())
    }

    /// Snapshot of the collection, newest first.
    pub fn list(&self) -> &[PhotoRecord] {
        &self.photos
    }

    pub fn get(&self, id: &str) -> Option<&PhotoRecord> {
        self.photos.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Write the full sequence, falling back to the newest [`FALLBACK_KEEP`].
    fn persist(&self) -> Persisted {
        let total = self.photos.len();
        let err = match save_json(&self.kv, PHOTOS_KEY, &self.photos) {
            Ok(bytes) => {
                debug!(key = PHOTOS_KEY, bytes, photos = total, "photos persisted");
                return Persisted::Full;
            }
            Err(e) => e,
        };

        warn!(
            key = PHOTOS_KEY,
            error = %err,
            photos = total,
            "storage full, photos may not survive a restart"
        );
        if total <= FALLBACK_KEEP {
            return Persisted::Failed;
        }

        match save_json(&self.kv, PHOTOS_KEY, &self.photos[..FALLBACK_KEEP]) {
            Ok(bytes) => {
                warn!(
                    key = PHOTOS_KEY,
                    bytes,
                    kept = FALLBACK_KEEP,
                    dropped = total - FALLBACK_KEEP,
                    "persisted only the most recent photos"
                );
                Persisted::Truncated {
                    kept: FALLBACK_KEEP,
                }
            }
            Err(e) => {
                warn!(key = PHOTOS_KEY, error = %e, "fallback write failed, change not persisted");
                Persisted::Failed
            }
        }
    }
}

fn sort_descending(photos: &mut [PhotoRecord]) {
    // sort_by is stable
    photos.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
}

/// Keep the first occurrence of each id.
fn dedupe_ids(photos: &mut Vec<PhotoRecord>) {
    let mut seen = HashSet::new();
    photos.retain(|p| seen.insert(p.id.clone()));
}
