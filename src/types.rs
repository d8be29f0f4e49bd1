//! Shared types persisted to the durable layer and handed to the views.
//!
//! Field names are serialized in camelCase (`capturedAt`, `sourceName`,
//! `bannerPayload`) and must stay stable: they are the on-disk format of the
//! `event_photos` and `event_settings` blobs.

use serde::{Deserialize, Serialize};

/// A single ingested photo.
///
/// Created once by the transcoder and never mutated afterwards. `width` and
/// `height` describe the transcoded bitmap, not the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    /// Opaque identifier, unique within the store.
    pub id: String,
    /// Self-contained image data (`data:image/jpeg;base64,...`).
    pub payload: String,
    /// Milliseconds since the Unix epoch. Display order is descending on this.
    pub captured_at: i64,
    pub width: u32,
    pub height: u32,
    /// Filename the photo was selected from.
    pub source_name: String,
}

/// Header settings shown above the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GallerySettings {
    pub title: String,
    /// Image reference (URL) or a self-contained data URL.
    pub banner_payload: String,
}

/// Partial settings update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub title: Option<String>,
    pub banner_payload: Option<String>,
}

impl SettingsUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            banner_payload: None,
        }
    }

    pub fn banner(banner_payload: impl Into<String>) -> Self {
        Self {
            title: None,
            banner_payload: Some(banner_payload.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.banner_payload.is_none()
    }
}

impl GallerySettings {
    /// Merge the provided fields of `update` into `self`.
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(banner) = update.banner_payload {
            self.banner_payload = banner;
        }
    }
}
