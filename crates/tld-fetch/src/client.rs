//! Conditional, retrying HTTP downloads.

use chrono::Utc;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, CACHE_CONTROL, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED,
};
use reqwest::{Client as HttpClient, Response, StatusCode};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tld_build::sources::tld_list_changed;
use tld_core::{Result, TldError};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::cache::{is_fresh, parse_max_age};
use crate::config::RetryConfig;
use crate::metadata::{Metadata, SourceMetadata};
use crate::sources::{DownloadTarget, Source};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of one source download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadStatus {
    /// A new body was written
    Downloaded,
    /// The local copy is current (304, fresh cache, or same TLD list)
    NotModified,
    /// The download failed; the local copy, if any, is untouched
    Error,
}

/// Downloader for the dataset sources
#[derive(Clone)]
pub struct FetchClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    retry_config: RetryConfig,
}

impl FetchClient {
    /// Create a client with default settings
    pub fn new() -> Result<Self> {
        FetchClientBuilder::new().build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> FetchClientBuilder {
        FetchClientBuilder::new()
    }

    /// Download every target, loading and saving the metadata file around
    /// the run. Targets are fetched one after another.
    pub async fn download_all(
        &self,
        targets: &[DownloadTarget],
        metadata_path: &Path,
    ) -> Result<BTreeMap<Source, DownloadStatus>> {
        let mut metadata = Metadata::load(metadata_path)?;
        let mut results = BTreeMap::new();

        for target in targets {
            let entry = metadata.entry(target.source.key());
            let status = self.download(target, entry).await;
            info!(source = %target.source, status = ?status, "Download finished");
            results.insert(target.source, status);
        }

        metadata.save(metadata_path)?;
        Ok(results)
    }

    /// Download one target, updating its metadata entry in place
    pub async fn download(&self, target: &DownloadTarget, entry: &mut SourceMetadata) -> DownloadStatus {
        let now = Utc::now();
        entry.last_checked = Some(now);

        if is_fresh(entry, now) {
            info!(source = %target.source, "Cache still fresh, skipping request");
            return DownloadStatus::NotModified;
        }

        match self.try_download(target, entry).await {
            Ok(status) => status,
            Err(e) => {
                error!(source = %target.source, error = %e, "Download failed");
                DownloadStatus::Error
            }
        }
    }

    async fn try_download(
        &self,
        target: &DownloadTarget,
        entry: &mut SourceMetadata,
    ) -> Result<DownloadStatus> {
        let response = self
            .get_with_retry(&target.url, conditional_headers(entry))
            .await?;
        let status = response.status();

        if status == StatusCode::NOT_MODIFIED {
            debug!(source = %target.source, "Not modified");
            return Ok(DownloadStatus::NotModified);
        }
        if status != StatusCode::OK {
            return Err(TldError::Status {
                status: status.as_u16(),
                url: target.url.to_string(),
            });
        }

        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| TldError::Http(e.to_string()))?;

        if target.source == Source::TldList {
            let existing = std::fs::read_to_string(&target.path).ok();
            if !tld_list_changed(existing.as_deref(), &String::from_utf8_lossy(&body)) {
                info!("TLD list unchanged apart from its header");
                return Ok(DownloadStatus::NotModified);
            }
        }

        write_file(&target.path, &body)?;
        record_headers(entry, &headers);
        entry.last_downloaded = Some(Utc::now());
        info!(source = %target.source, bytes = body.len(), path = %target.path.display(), "Downloaded");
        Ok(DownloadStatus::Downloaded)
    }

    /// GET with retries on transport errors and 5xx; any other status is
    /// returned to the caller as is.
    async fn get_with_retry(&self, url: &Url, headers: HeaderMap) -> Result<Response> {
        let retry = &self.inner.retry_config;
        let attempts = retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            debug!(url = %url, attempt, "GET request");
            let result = self
                .inner
                .http
                .get(url.clone())
                .headers(headers.clone())
                .send()
                .await
                .map_err(|e| TldError::Http(e.to_string()))
                .and_then(|response| {
                    if response.status().is_server_error() {
                        Err(TldError::Status {
                            status: response.status().as_u16(),
                            url: url.to_string(),
                        })
                    } else {
                        Ok(response)
                    }
                });

            match result {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt + 1 < attempts => {
                    let wait = retry.backoff_for(attempt);
                    warn!(url = %url, error = %e, wait_ms = wait.as_millis(), "Retrying request");
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn conditional_headers(entry: &SourceMetadata) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let stored = [
        (IF_NONE_MATCH, entry.headers.etag.as_deref()),
        (IF_MODIFIED_SINCE, entry.headers.last_modified.as_deref()),
    ];
    for (name, value) in stored {
        if let Some(value) = value.and_then(|v| HeaderValue::from_str(v).ok()) {
            headers.insert(name, value);
        }
    }
    headers
}

fn record_headers(entry: &mut SourceMetadata, headers: &HeaderMap) {
    let text = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    if let Some(etag) = text(ETAG) {
        entry.headers.etag = Some(etag);
    }
    if let Some(last_modified) = text(LAST_MODIFIED) {
        entry.headers.last_modified = Some(last_modified);
    }
    if let Some(cache_control) = text(CACHE_CONTROL) {
        if let Some(max_age) = parse_max_age(&cache_control).filter(|age| *age > 0) {
            entry.headers.cache_control = Some(cache_control);
            entry.headers.cache_max_age = Some(max_age);
        }
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| TldError::io(parent, e))?;
    }
    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".part");
    let tmp = path.with_file_name(tmp_name);

    std::fs::write(&tmp, bytes).map_err(|e| TldError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| TldError::io(path, e))
}

/// Builder for configuring a [`FetchClient`]
pub struct FetchClientBuilder {
    timeout: Duration,
    user_agent: String,
    retry_config: RetryConfig,
}

impl Default for FetchClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClientBuilder {
    /// Create a builder with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("tldkit/{}", env!("CARGO_PKG_VERSION")),
            retry_config: RetryConfig::default(),
        }
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set retry configuration
    #[must_use]
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<FetchClient> {
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| TldError::Http(e.to_string()))?;

        Ok(FetchClient {
            inner: Arc::new(ClientInner {
                http,
                retry_config: self.retry_config,
            }),
        })
    }
}
