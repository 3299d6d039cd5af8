//! Downloader for the machine-readable TLD dataset sources.
//!
//! [`FetchClient`] issues conditional requests (ETag / Last-Modified), honors
//! a stored `Cache-Control: max-age`, and retries transient failures. What it
//! learned about each source is kept in a [`Metadata`] file between runs.

mod cache;
mod client;
mod config;
mod metadata;
mod sources;

pub use cache::{is_fresh, parse_max_age};
pub use client::{DownloadStatus, FetchClient, FetchClientBuilder};
pub use config::RetryConfig;
pub use metadata::{CachedHeaders, Metadata, SourceMetadata, METADATA_FILE};
pub use sources::{DownloadTarget, Source};
pub use tld_core::{Result, TldError};
