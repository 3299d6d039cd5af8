//! Per-source download state, persisted between runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tld_core::{Result, TldError};
use tracing::warn;

/// File name of the metadata document inside the generated directory
pub const METADATA_FILE: &str = "metadata.json";

/// Validators and freshness hints from the last successful response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedHeaders {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<String>,

    /// `max-age` parsed out of `cache_control`, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_max_age: Option<u64>,
}

/// Download state of one source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Updated on every attempt, successful or not
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<DateTime<Utc>>,

    /// Updated only when a new body was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_downloaded: Option<DateTime<Utc>>,

    #[serde(default)]
    pub headers: CachedHeaders,
}

/// Metadata of every source, keyed by source name (`RDAP_BOOTSTRAP`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(pub BTreeMap<String, SourceMetadata>);

impl Metadata {
    /// Load the metadata file; missing or unparseable files start fresh
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Ignoring unparseable download metadata");
                Self::default()
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(TldError::io(path, e)),
        }
    }

    /// Write the metadata file, creating its directory if needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| TldError::io(parent, e))?;
        }
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        std::fs::write(path, json).map_err(|e| TldError::io(path, e))
    }

    /// Entry for a source, created on first use
    pub fn entry(&mut self, key: &str) -> &mut SourceMetadata {
        self.0.entry(key.to_string()).or_default()
    }

    /// Entry for a source, if one was ever recorded
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SourceMetadata> {
        self.0.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generated").join(METADATA_FILE);

        let mut metadata = Metadata::default();
        let entry = metadata.entry("RDAP_BOOTSTRAP");
        entry.last_checked = Some(Utc::now());
        entry.headers.etag = Some("\"abc\"".into());
        metadata.save(&path).unwrap();

        let loaded = Metadata::load(&path).unwrap();
        assert_eq!(loaded, metadata);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["RDAP_BOOTSTRAP"]["headers"]["etag"], "\"abc\"");
    }

    #[test]
    fn test_missing_and_corrupt_start_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(METADATA_FILE);
        assert_eq!(Metadata::load(&path).unwrap(), Metadata::default());

        std::fs::write(&path, "not json").unwrap();
        assert_eq!(Metadata::load(&path).unwrap(), Metadata::default());
    }
}
