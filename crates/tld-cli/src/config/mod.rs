//! Configuration management.
//!
//! Lookup order: `--config` / `TLDKIT_CONFIG`, then `./tldkit.toml`, then the
//! platform config directory, then built-in defaults.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tld_build::config::{DEFAULT_GENERATED_DIR, DEFAULT_MANUAL_DIR, DEFAULT_SOURCE_DIR};
use tld_build::BuildPaths;
use tld_fetch::{FetchClient, RetryConfig, METADATA_FILE};

use crate::output::OutputFormat;

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "tldkit.toml";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Downloaded upstream sources
    pub source_dir: PathBuf,

    /// Manually curated alias and supplemental files
    pub manual_dir: PathBuf,

    /// Generated files: the dataset, script mapping and download metadata
    pub generated_dir: PathBuf,

    /// Extracted per-TLD page data (defaults to `<source_dir>/tld-pages`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages_dir: Option<PathBuf>,

    /// Dataset location (defaults to `<generated_dir>/tlds.json`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Default output format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,

    pub download: DownloadConfig,
}

/// `[download]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Attempts per source, retries included
    pub max_attempts: u32,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_attempts: 3,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            manual_dir: PathBuf::from(DEFAULT_MANUAL_DIR),
            generated_dir: PathBuf::from(DEFAULT_GENERATED_DIR),
            pages_dir: None,
            output: None,
            output_format: None,
            download: DownloadConfig::default(),
        }
    }
}

impl Config {
    /// Per-user config file path.
    pub fn user_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("org", "tldkit", "tldkit")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Find the config file to use, if any.
    ///
    /// An explicitly requested file must exist; the implicit locations are
    /// skipped when absent.
    pub fn locate(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            anyhow::ensure!(path.exists(), "Config file not found: {}", path.display());
            return Ok(Some(path.to_path_buf()));
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Ok(Some(local));
        }

        Ok(Self::user_path().ok().filter(|p| p.exists()))
    }

    /// Load configuration, returning it with the file it came from.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        match Self::locate(explicit)? {
            Some(path) => Ok((Self::from_file(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Parse one config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Input and output locations of the build
    #[must_use]
    pub fn build_paths(&self) -> BuildPaths {
        let mut paths = BuildPaths::from_dirs(&self.source_dir, &self.manual_dir, &self.generated_dir);
        if let Some(pages_dir) = &self.pages_dir {
            paths.pages_dir.clone_from(pages_dir);
        }
        if let Some(output) = &self.output {
            paths.output.clone_from(output);
        }
        paths
    }

    /// Where download metadata is kept
    #[must_use]
    pub fn metadata_path(&self) -> PathBuf {
        self.generated_dir.join(METADATA_FILE)
    }

    /// Download client configured from the `[download]` table
    pub fn fetch_client(&self) -> Result<FetchClient> {
        Ok(FetchClient::builder()
            .timeout(Duration::from_secs(self.download.timeout_secs))
            .retry(RetryConfig::new().max_attempts(self.download.max_attempts))
            .build()?)
    }
}
