//! End-to-end build: sources -> records -> cross-reference -> snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tld_core::{Dataset, Result, TldRecord, PUBLICATION_FIELD};
use tracing::info;

use crate::builder::build_record;
use crate::config::BuildPaths;
use crate::crossref::link_idn_variants;
use crate::persist::{write_if_changed, WriteStatus};
use crate::sources::Sources;

/// Indentation of the published snapshot
pub const OUTPUT_INDENT: usize = 2;

/// Result of a [`build`] run
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    pub total_tlds: usize,
    pub output: PathBuf,
    pub changed: bool,
    pub status: WriteStatus,
    /// Size of the snapshot on disk after the run, if it exists
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Build every record from already loaded sources and wrap them
#[must_use]
pub fn build_dataset(sources: &Sources, published_at: DateTime<Utc>) -> Dataset {
    let records: Vec<TldRecord> = sources
        .root_zone
        .iter()
        .map(|entry| build_record(entry, sources))
        .collect();
    Dataset::new(link_idn_variants(records), published_at)
}

/// Load all sources, build the dataset and persist it if it changed.
///
/// Only a missing or unreadable root zone aborts the run; a failed write is
/// reported in the summary's status.
pub fn build(paths: &BuildPaths) -> Result<BuildSummary> {
    let sources = Sources::load(paths)?;

    info!("Building TLD records...");
    let dataset = build_dataset(&sources, Utc::now());
    let total_tlds = dataset.tlds.len();

    let outcome = write_if_changed(&paths.output, &dataset, &[PUBLICATION_FIELD], OUTPUT_INDENT);
    let file_size = std::fs::metadata(&paths.output).ok().map(|m| m.len());

    info!(
        total_tlds,
        output = %paths.output.display(),
        changed = outcome.changed,
        "Build finished"
    );
    Ok(BuildSummary {
        total_tlds,
        output: paths.output.clone(),
        changed: outcome.changed,
        status: outcome.status,
        file_size,
        error: outcome.error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tld_core::{RdapSource, RootZoneEntry};

    #[test]
    fn test_build_dataset_from_memory() {
        let mut sources = Sources::default();
        sources.root_zone = vec![
            RootZoneEntry::new(".com", "generic", "VeriSign Global Registry Services"),
            RootZoneEntry::new(".tw", "country-code", "TWNIC"),
            RootZoneEntry::new(".xn--kpry57d", "country-code", "TWNIC"),
        ];
        sources
            .rdap_bootstrap
            .insert("com".into(), "https://rdap.iana.org/".into());
        sources.pages.insert(
            "xn--kpry57d".into(),
            tld_core::PageData {
                tld_iso: Some("tw".into()),
                ..Default::default()
            },
        );

        let at = Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap();
        let dataset = build_dataset(&sources, at);

        assert_eq!(dataset.publication, "2026-10-16T08:30:00Z");
        assert_eq!(dataset.tlds.len(), 3);
        assert_eq!(
            dataset.find("com").and_then(|r| r.rdap_source()),
            Some(RdapSource::Bootstrap)
        );
        assert_eq!(
            dataset.find("tw").and_then(|r| r.idn_variants.clone()),
            Some(vec!["xn--kpry57d".to_string()])
        );
    }

    #[test]
    fn test_missing_root_zone_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::from_dirs(
            &dir.path().join("source"),
            &dir.path().join("manual"),
            &dir.path().join("generated"),
        );
        assert!(build(&paths).is_err());
        assert!(!paths.output.exists());
    }
}
