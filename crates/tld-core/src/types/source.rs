//! Shapes of the inbound sources, as handed over by the extractors.

use serde::{Deserialize, Serialize};

use super::{normalize_label, NOT_ASSIGNED};

/// One row of the IANA Root Zone Database table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootZoneEntry {
    /// Domain with leading dot, e.g. ".com"
    pub domain: String,

    /// Raw IANA type tag
    #[serde(rename = "type")]
    pub tag: String,

    /// TLD manager, or "Not assigned"
    pub manager: String,
}

impl RootZoneEntry {
    /// Create an entry
    #[must_use]
    pub fn new(domain: impl Into<String>, tag: impl Into<String>, manager: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            tag: tag.into(),
            manager: manager.into(),
        }
    }

    /// Record key: lowercase, no leading dot
    #[must_use]
    pub fn label(&self) -> String {
        normalize_label(&self.domain)
    }

    /// Returns true unless the manager is the "Not assigned" sentinel
    #[must_use]
    pub fn is_delegated(&self) -> bool {
        self.manager.trim() != NOT_ASSIGNED
    }
}

/// Organizations as extracted from a TLD detail page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageOrgs {
    #[serde(default)]
    pub tld_manager: Option<String>,
    #[serde(default)]
    pub admin: Option<String>,
    #[serde(default)]
    pub tech: Option<String>,
}

/// A nameserver as extracted from a TLD detail page, addresses still raw
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageNameserver {
    pub hostname: String,
    #[serde(default)]
    pub ipv4: Vec<String>,
    #[serde(default)]
    pub ipv6: Vec<String>,
}

/// Flat fields extracted from a per-TLD IANA detail page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageData {
    #[serde(default)]
    pub orgs: Option<PageOrgs>,
    #[serde(default)]
    pub nameservers: Option<Vec<PageNameserver>>,
    #[serde(default)]
    pub registry_url: Option<String>,
    #[serde(default)]
    pub whois_server: Option<String>,
    #[serde(default)]
    pub rdap_server: Option<String>,
    #[serde(default)]
    pub tld_created: Option<String>,
    #[serde(default)]
    pub tld_updated: Option<String>,
    /// ISO country code an IDN ccTLD is designated for
    #[serde(default)]
    pub tld_iso: Option<String>,
}

/// Entry of the ICANN registry agreement table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryAgreement {
    pub tld: String,
    /// Raw agreement types, e.g. `["Base", "Brand (Spec 13)"]`
    #[serde(default)]
    pub agreement_types: Vec<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub u_label: Option<String>,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub agreement_date: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}
