//! Catalog of downloadable sources.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tld_core::{Result, TldError};
use url::Url;

/// A machine-readable upstream source
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Source {
    RdapBootstrap,
    TldList,
    RegistryAgreementTable,
    Iptoasn,
}

impl Source {
    /// Every source, in download order
    pub const ALL: [Self; 4] = [
        Self::RdapBootstrap,
        Self::TldList,
        Self::RegistryAgreementTable,
        Self::Iptoasn,
    ];

    /// Key used in the metadata file and on the command line
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::RdapBootstrap => "RDAP_BOOTSTRAP",
            Self::TldList => "TLD_LIST",
            Self::RegistryAgreementTable => "REGISTRY_AGREEMENT_TABLE",
            Self::Iptoasn => "IPTOASN",
        }
    }

    /// Upstream location
    #[must_use]
    pub const fn url(self) -> &'static str {
        match self {
            Self::RdapBootstrap => "https://data.iana.org/rdap/dns.json",
            Self::TldList => "https://data.iana.org/TLD/tlds-alpha-by-domain.txt",
            Self::RegistryAgreementTable => {
                "https://www.icann.org/en/registry-agreements/csvdownload"
            }
            Self::Iptoasn => "https://iptoasn.com/data/ip2asn-combined.tsv.gz",
        }
    }

    /// Location relative to the source directory
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::RdapBootstrap => "iana-rdap.json",
            Self::TldList => "iana-tlds.txt",
            Self::RegistryAgreementTable => "icann-registry-agreement-table.csv",
            Self::Iptoasn => "iptoasn/ip2asn-combined.tsv.gz",
        }
    }

    /// Upstream URL paired with its file under `source_dir`
    pub fn target(self, source_dir: &Path) -> Result<DownloadTarget> {
        DownloadTarget::new(self, self.url(), source_dir.join(self.file_name()))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Source {
    type Err = TldError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|source| source.key().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|s| s.key()).collect();
                TldError::Config(format!("unknown source {s:?}, expected one of {}", known.join(", ")))
            })
    }
}

/// Where one source is fetched from and written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub source: Source,
    pub url: Url,
    pub path: PathBuf,
}

impl DownloadTarget {
    /// Pair a source with an explicit URL and destination
    pub fn new(source: Source, url: &str, path: impl Into<PathBuf>) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| TldError::Config(format!("invalid URL {url:?}: {e}")))?;
        Ok(Self {
            source,
            url,
            path: path.into(),
        })
    }
}
