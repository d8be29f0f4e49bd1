//! The gallery settings singleton and its durable mirror.

use super::{KeyValueStore, Persisted, SETTINGS_KEY, load_json, save_json};
use crate::types::{GallerySettings, SettingsUpdate};
use serde::Deserialize;
use tracing::{debug, warn};

/// Stored settings with every field optional, so a blob missing a field
/// still loads: absent fields fall back to the defaults.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSettings {
    title: Option<String>,
    banner_payload: Option<String>,
}

impl From<StoredSettings> for SettingsUpdate {
    fn from(stored: StoredSettings) -> Self {
        Self {
            title: stored.title,
            banner_payload: stored.banner_payload,
        }
    }
}

/// Title and banner shown in the gallery header.
#[derive(Debug)]
pub struct SettingsStore<K> {
    kv: K,
    settings: GallerySettings,
}

impl<K: KeyValueStore> SettingsStore<K> {
    /// Load the mirror over `defaults`. Never fails.
    pub fn open(kv: K, defaults: GallerySettings) -> Self {
        let mut settings = defaults;
        match load_json::<StoredSettings>(&kv, SETTINGS_KEY) {
            Ok(Some(stored)) => settings.apply(stored.into()),
            Ok(None) => {}
            Err(e) => {
                warn!(key = SETTINGS_KEY, error = %e, "could not load settings, using defaults");
            }
        }
        Self { kv, settings }
    }

    pub fn get(&self) -> &GallerySettings {
        &self.settings
    }

    /// Merge the provided fields and mirror the whole singleton.
    pub fn update(&mut self, update: SettingsUpdate) -> Persisted {
        self.settings.apply(update);
        match save_json(&self.kv, SETTINGS_KEY, &self.settings) {
            Ok(bytes) => {
                debug!(key = SETTINGS_KEY, bytes, "settings persisted");
                Persisted::Full
            }
            Err(e) => {
                warn!(key = SETTINGS_KEY, error = %e, "failed to persist settings");
                Persisted::Failed
            }
        }
    }
}
