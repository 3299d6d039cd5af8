use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::TldRecord;

/// Top-level key holding the publication timestamp
pub const PUBLICATION_FIELD: &str = "publication";

/// Default dataset description
pub const DEFAULT_DESCRIPTION: &str = "Enhanced TLD bootstrap data, from IANA sources";

/// IANA Root Zone Database listing
pub const IANA_ROOT_DB_URL: &str = "https://www.iana.org/domains/root/db";

/// IANA RDAP bootstrap file for DNS
pub const IANA_RDAP_URL: &str = "https://data.iana.org/rdap/dns.json";

/// Upstream sources the dataset was built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSources {
    /// Root zone database URL
    pub iana_root_db: String,

    /// RDAP bootstrap URL
    pub iana_rdap: String,
}

impl Default for DatasetSources {
    fn default() -> Self {
        Self {
            iana_root_db: IANA_ROOT_DB_URL.to_string(),
            iana_rdap: IANA_RDAP_URL.to_string(),
        }
    }
}

/// The published document: a wrapper around all TLD records.
///
/// Only the wrapper carries a wall-clock value (`publication`); records
/// themselves are a pure function of the inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub description: String,

    /// UTC timestamp, `YYYY-MM-DDTHH:MM:SSZ`
    pub publication: String,

    pub sources: DatasetSources,

    pub tlds: Vec<TldRecord>,
}

impl Dataset {
    /// Wrap records with the default description and sources
    #[must_use]
    pub fn new(tlds: Vec<TldRecord>, published_at: DateTime<Utc>) -> Self {
        Self {
            description: DEFAULT_DESCRIPTION.to_string(),
            publication: format_publication(published_at),
            sources: DatasetSources::default(),
            tlds,
        }
    }

    /// Find a record by label (case-insensitive, leading dot ignored)
    #[must_use]
    pub fn find(&self, label: &str) -> Option<&TldRecord> {
        let key = super::normalize_label(label);
        self.tlds
            .iter()
            .find(|r| r.label == key || r.unicode_label.as_deref() == Some(key.as_str()))
    }
}

/// Format a timestamp the way the `publication` field stores it
#[must_use]
pub fn format_publication(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
