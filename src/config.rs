//! Gallery configuration.
//!
//! An optional `config.toml` in the data directory overrides stock defaults.
//! The file is sparse: only the keys you set are replaced, everything else
//! keeps its stock value.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [storage]
//! quota_bytes = 5242880     # Total bytes across all blobs (0 = unlimited)
//!
//! [defaults]
//! title = "2024 Global Tech Innovation Summit - Highlights"
//! banner = "https://images.unsplash.com/photo-1540575861501-7cf05a4b125a?auto=format&fit=crop&w=1600&q=80"
//! ```
//!
//! `[defaults]` only seeds the settings singleton: once an operator saves a
//! title or banner, the saved value wins over the config file.
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::GallerySettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Roughly what a browser grants one origin for local storage.
const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

const DEFAULT_TITLE: &str = "2024 Global Tech Innovation Summit - Highlights";
const DEFAULT_BANNER: &str = "https://images.unsplash.com/photo-1540575861501-7cf05a4b125a?auto=format&fit=crop&w=1600&q=80";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Durable storage limits.
    pub storage: StorageConfig,
    /// Settings used until the operator saves their own.
    pub defaults: DefaultsConfig,
}

impl GalleryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.defaults.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "defaults.title must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Byte budget shared by every blob. `0` disables the check.
    pub quota_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }
}

impl StorageConfig {
    /// The quota to enforce, if any.
    pub fn quota(&self) -> Option<u64> {
        (self.quota_bytes > 0).then_some(self.quota_bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    pub title: String,
    /// Banner URL or data URL.
    pub banner: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            banner: DEFAULT_BANNER.to_string(),
        }
    }
}

impl DefaultsConfig {
    pub fn to_settings(&self) -> GallerySettings {
        GallerySettings {
            title: self.title.clone(),
            banner_payload: self.banner.clone(),
        }
    }
}

// =============================================================================
// Loading, merging, and validation
// =============================================================================

/// Stock defaults as a `toml::Value::Table`, the base layer for overrides.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GalleryConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read `config.toml` from `dir` as a raw value; `Ok(None)` when absent.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Merge an optional overlay onto `base`, deserialize, and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<GalleryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config for a data directory, falling back to stock defaults.
pub fn load_config(dir: &Path) -> Result<GalleryConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// A fully commented stock `config.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# live-gal configuration
# =====================
# Place this file at <data-dir>/config.toml. All settings are optional;
# the values below are the defaults. Unknown keys are rejected.

# ---------------------------------------------------------------------------
# Durable storage
# ---------------------------------------------------------------------------
[storage]
# Total bytes allowed across all stored blobs. When a photo write would
# exceed it, only the 50 newest photos are kept on disk. 0 = unlimited.
quota_bytes = 5242880

# ---------------------------------------------------------------------------
# Gallery header
# ---------------------------------------------------------------------------
# Used until an operator saves a title or banner with `live-gal settings`.
[defaults]
title = "2024 Global Tech Innovation Summit - Highlights"

# Banner image: an http(s) URL or a data URL.
banner = "https://images.unsplash.com/photo-1540575861501-7cf05a4b125a?auto=format&fit=crop&w=1600&q=80"
"##
}
