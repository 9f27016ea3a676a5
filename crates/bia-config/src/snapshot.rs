//! Configuration snapshots for run provenance.
//!
//! A snapshot records which configuration produced a set of results so two
//! runs can be compared by hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::analytics::AnalyticsConfig;
use crate::resolve::LoadedConfig;

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    pub schema_version: String,

    /// Path the config was loaded from, if any.
    #[serde(default)]
    pub path: Option<String>,

    pub source: String,

    /// SHA-256 of the effective configuration, serialized canonically.
    pub config_hash: String,

    /// Effective configuration after defaults were applied.
    pub config: AnalyticsConfig,
}

impl ConfigSnapshot {
    pub fn new(loaded: &LoadedConfig) -> Self {
        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: loaded.config.schema_version.clone(),
            path: loaded.path.as_ref().map(|p| p.display().to_string()),
            source: loaded.source.to_string(),
            config_hash: config_hash(&loaded.config),
            config: loaded.config.clone(),
        }
    }
}

/// Hash the effective configuration.
///
/// Two files that differ only in whitespace or omitted defaults hash the same.
pub fn config_hash(config: &AnalyticsConfig) -> String {
    // Struct field order is fixed, so the serialization is canonical.
    let canonical = serde_json::to_string(config).unwrap_or_default();
    hash_content(&canonical)
}

/// Compute the SHA-256 hash of content.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
