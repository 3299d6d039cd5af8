//! File locations the build reads from and writes to.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Downloaded IANA/ICANN sources
pub const DEFAULT_SOURCE_DIR: &str = "data/source";

/// Manually curated files
pub const DEFAULT_MANUAL_DIR: &str = "data/manual";

/// Build outputs and generated helper files
pub const DEFAULT_GENERATED_DIR: &str = "data/generated";

/// Where every input lives and where the dataset is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPaths {
    /// Extracted root zone table (JSON array of `{domain, type, manager}`)
    pub root_zone: PathBuf,

    /// IANA RDAP bootstrap file
    pub rdap_bootstrap: PathBuf,

    /// IANA `tlds-alpha-by-domain.txt`
    pub tld_list: PathBuf,

    /// ICANN registry agreement table (CSV)
    pub registry_agreements: PathBuf,

    /// iptoasn combined table (TSV, optionally gzipped)
    pub asn_table: PathBuf,

    /// Directory of extracted per-TLD page data
    pub pages_dir: PathBuf,

    /// Supplemental ccTLD RDAP servers
    pub supplemental_rdap: PathBuf,

    /// TLD manager aliases
    pub manager_aliases: PathBuf,

    /// AS organization aliases
    pub as_org_aliases: PathBuf,

    /// IDN label to script mapping
    pub idn_scripts: PathBuf,

    /// The dataset
    pub output: PathBuf,
}

impl BuildPaths {
    /// Lay out the standard file names under three directories
    #[must_use]
    pub fn from_dirs(source_dir: &Path, manual_dir: &Path, generated_dir: &Path) -> Self {
        Self {
            root_zone: source_dir.join("iana-root.json"),
            rdap_bootstrap: source_dir.join("iana-rdap.json"),
            tld_list: source_dir.join("iana-tlds.txt"),
            registry_agreements: source_dir.join("icann-registry-agreement-table.csv"),
            asn_table: source_dir.join("iptoasn").join("ip2asn-combined.tsv.gz"),
            pages_dir: source_dir.join("tld-pages"),
            supplemental_rdap: manual_dir.join("supplemental-cctld-rdap.json"),
            manager_aliases: manual_dir.join("tld-manager-aliases.json"),
            as_org_aliases: manual_dir.join("as-org-aliases.json"),
            idn_scripts: generated_dir.join("idn-script-mapping.json"),
            output: generated_dir.join("tlds.json"),
        }
    }
}

impl Default for BuildPaths {
    fn default() -> Self {
        Self::from_dirs(
            Path::new(DEFAULT_SOURCE_DIR),
            Path::new(DEFAULT_MANUAL_DIR),
            Path::new(DEFAULT_GENERATED_DIR),
        )
    }
}
