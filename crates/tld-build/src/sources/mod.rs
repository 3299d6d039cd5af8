//! Readers for every input of the build, and the [`Sources`] context they fill.
//!
//! Optional sources degrade to an empty mapping when missing or unreadable;
//! only the root zone table is mandatory.

mod agreements;
mod aliases;
mod pages;
mod rdap;
mod root_zone;
mod scripts;
mod tld_list;

pub use agreements::{normalize_agreement_types, parse_agreement_types, read_registry_agreements};
pub use aliases::{read_as_org_aliases, read_manager_aliases};
pub use pages::{page_data_path, read_all_page_data, read_page_data};
pub use rdap::{read_rdap_bootstrap, read_supplemental_rdap, SupplementalRdap};
pub use root_zone::read_root_zone;
pub use scripts::read_idn_scripts;
pub use tld_list::{parse_tld_list, tld_list_changed};

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use tld_core::{PageData, RegistryAgreement, Result, RootZoneEntry, TldError};
use tracing::{info, warn};

use crate::asn::{read_asn_table, RangeIndex};
use crate::config::BuildPaths;

/// Everything the record builder consults, loaded once per run.
///
/// Built before any record and only borrowed afterwards.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    /// Root zone entries, in table order
    pub root_zone: Vec<RootZoneEntry>,

    /// TLD -> RDAP URL from the IANA bootstrap file
    pub rdap_bootstrap: HashMap<String, String>,

    /// TLD -> RDAP server from the curated supplemental list
    pub supplemental_rdap: HashMap<String, SupplementalRdap>,

    /// TLD -> ICANN registry agreement
    pub agreements: HashMap<String, RegistryAgreement>,

    /// TLD manager name -> canonical alias
    pub manager_aliases: HashMap<String, String>,

    /// AS organization name -> canonical alias
    pub as_org_aliases: HashMap<String, String>,

    /// IDN label -> Unicode script name
    pub idn_scripts: HashMap<String, String>,

    /// TLD -> extracted detail page fields
    pub pages: HashMap<String, PageData>,

    /// IP -> ASN index, absent when no table is available
    pub asn_index: Option<RangeIndex>,
}

impl Sources {
    /// Run every reader against the configured paths
    pub fn load(paths: &BuildPaths) -> Result<Self> {
        info!("Parsing source files...");
        let root_zone = read_root_zone(&paths.root_zone)?;
        let labels: Vec<String> = root_zone.iter().map(RootZoneEntry::label).collect();

        let sources = Self {
            rdap_bootstrap: read_rdap_bootstrap(&paths.rdap_bootstrap),
            supplemental_rdap: read_supplemental_rdap(&paths.supplemental_rdap),
            agreements: read_registry_agreements(&paths.registry_agreements),
            manager_aliases: read_manager_aliases(&paths.manager_aliases),
            as_org_aliases: read_as_org_aliases(&paths.as_org_aliases),
            idn_scripts: read_idn_scripts(&paths.idn_scripts),
            pages: read_all_page_data(&paths.pages_dir, &labels),
            asn_index: load_asn_index(&paths.asn_table),
            root_zone,
        };

        info!(
            tlds = sources.root_zone.len(),
            pages = sources.pages.len(),
            rdap = sources.rdap_bootstrap.len(),
            agreements = sources.agreements.len(),
            asn_ranges = sources.asn_index.as_ref().map_or(0, RangeIndex::len),
            "Sources loaded"
        );
        Ok(sources)
    }
}

fn load_asn_index(path: &Path) -> Option<RangeIndex> {
    match read_asn_table(path) {
        Ok(entries) => Some(RangeIndex::build(entries)),
        Err(e) if e.is_not_found() => {
            info!(path = %path.display(), "No iptoasn data found, nameserver IPs will not be enriched");
            None
        }
        Err(e) => {
            warn!(error = %e, "Error loading iptoasn data");
            None
        }
    }
}

/// Read and parse an optional JSON source.
///
/// A missing file is silent (`None`); unreadable or unparseable files are
/// logged and also yield `None`.
pub(crate) fn read_optional_json<T: DeserializeOwned>(path: &Path, source_name: &str) -> Option<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(source = source_name, path = %path.display(), "Optional source not found");
            return None;
        }
        Err(e) => {
            warn!(source = source_name, error = %TldError::io(path, e), "Cannot read source");
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(source = source_name, path = %path.display(), error = %e, "Cannot parse source");
            None
        }
    }
}
