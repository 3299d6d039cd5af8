use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Nameserver;

/// ASCII-compatible encoding prefix carried by IDN labels
pub const ACE_PREFIX: &str = "xn--";

/// Root zone manager value for TLDs that are not delegated
pub const NOT_ASSIGNED: &str = "Not assigned";

/// IANA registry tag that marks a country-code TLD
pub const COUNTRY_CODE_TAG: &str = "country-code";

/// Normalize a root zone domain (".COM") to a record key ("com")
#[must_use]
pub fn normalize_label(domain: &str) -> String {
    domain.trim().trim_start_matches('.').to_lowercase()
}

/// Returns true if the label is in ACE (punycode) form
#[must_use]
pub fn is_idn(label: &str) -> bool {
    label.len() > ACE_PREFIX.len()
        && label
            .get(..ACE_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(ACE_PREFIX))
}

/// Returns true if the label is a two-letter ASCII country-code TLD
#[must_use]
pub fn is_ascii_cctld(label: &str) -> bool {
    label.len() == 2
        && label.bytes().all(|b| b.is_ascii_alphabetic())
        && !label.to_ascii_lowercase().starts_with("xn")
}

/// Coarse TLD classification derived from the IANA registry tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TldKind {
    /// Generic TLD (every tag other than country-code)
    #[serde(rename = "gtld")]
    Generic,
    /// Country-code TLD
    #[serde(rename = "cctld")]
    CountryCode,
}

impl TldKind {
    /// Derive the kind from a raw IANA tag such as "generic" or "country-code"
    #[must_use]
    pub fn from_registry_tag(tag: &str) -> Self {
        if tag.trim().eq_ignore_ascii_case(COUNTRY_CODE_TAG) {
            Self::CountryCode
        } else {
            Self::Generic
        }
    }

    /// Returns true for ccTLDs
    #[must_use]
    pub const fn is_country_code(self) -> bool {
        matches!(self, Self::CountryCode)
    }
}

impl std::fmt::Display for TldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generic => write!(f, "gTLD"),
            Self::CountryCode => write!(f, "ccTLD"),
        }
    }
}

/// Which source supplied a record's RDAP server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RdapSource {
    /// The per-TLD IANA detail page
    PageData,
    /// The IANA RDAP bootstrap file
    Bootstrap,
    /// The manually curated supplemental ccTLD list
    Supplemental,
}

impl std::fmt::Display for RdapSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageData => write!(f, "page_data"),
            Self::Bootstrap => write!(f, "bootstrap"),
            Self::Supplemental => write!(f, "supplemental"),
        }
    }
}

/// An RDAP base URL together with its provenance.
///
/// Server and source only ever travel together, so a record cannot carry one
/// without the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdapEndpoint {
    /// RDAP base URL
    #[serde(rename = "rdap_server")]
    pub server: String,

    /// Where the URL came from
    #[serde(rename = "rdap_source")]
    pub source: RdapSource,
}

impl RdapEndpoint {
    /// Pair a server URL with its source
    #[must_use]
    pub fn new(server: impl Into<String>, source: RdapSource) -> Self {
        Self {
            server: server.into(),
            source,
        }
    }
}

/// Organizations responsible for a TLD
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organizations {
    /// TLD manager from the root zone (present iff delegated)
    #[serde(rename = "tld_manager", default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,

    /// Administrative contact organization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<String>,

    /// Technical contact organization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech: Option<String>,
}

impl Organizations {
    /// Returns true if no organization is known
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.manager.is_none() && self.admin.is_none() && self.tech.is_none()
    }
}

/// Derived, non-canonical data attached to a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    /// Canonical name of the TLD manager from the curated alias list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tld_manager_alias: Option<String>,

    /// ISO 3166 country name (ccTLDs only)
    #[serde(rename = "country_name_iso", default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,

    /// Normalized ICANN registry agreement types
    #[serde(
        rename = "registry_agreement_types",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub agreement_types: Option<Vec<String>>,

    /// Canonical operator names matched from nameserver AS organizations
    #[serde(rename = "as_org_aliases", default, skip_serializing_if = "Option::is_none")]
    pub operator_aliases: Option<BTreeSet<String>>,
}

impl Annotations {
    /// Returns true if nothing has been derived
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tld_manager_alias.is_none()
            && self.country_name.is_none()
            && self.agreement_types.is_none()
            && self.operator_aliases.is_none()
    }
}

/// One canonical record per root zone entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TldRecord {
    /// ASCII label, lowercase, no leading dot
    #[serde(rename = "tld")]
    pub label: String,

    /// Decoded Unicode form of an IDN label
    #[serde(rename = "tld_unicode", default, skip_serializing_if = "Option::is_none")]
    pub unicode_label: Option<String>,

    /// Unicode script of an IDN label
    #[serde(rename = "tld_script", default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,

    /// ISO country code an IDN ccTLD is designated for
    #[serde(rename = "tld_iso", default, skip_serializing_if = "Option::is_none")]
    pub iso_country_code: Option<String>,

    /// False when the root zone lists the manager as "Not assigned"
    pub delegated: bool,

    /// Raw IANA classification ("generic", "country-code", "sponsored", ...)
    #[serde(rename = "iana_tag")]
    pub registry_tag: String,

    /// Derived classification
    #[serde(rename = "type")]
    pub kind: TldKind,

    #[serde(rename = "orgs", default, skip_serializing_if = "Organizations::is_empty")]
    pub organizations: Organizations,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nameservers: Option<Vec<Nameserver>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whois_server: Option<String>,

    /// RDAP server and provenance, flattened to `rdap_server` / `rdap_source`
    #[serde(flatten)]
    pub rdap: Option<RdapEndpoint>,

    #[serde(rename = "tld_created", default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,

    #[serde(rename = "tld_updated", default, skip_serializing_if = "Option::is_none")]
    pub updated_dates: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,

    /// IDN ccTLDs designated for this ASCII ccTLD, sorted
    #[serde(rename = "idn", default, skip_serializing_if = "Option::is_none")]
    pub idn_variants: Option<Vec<String>>,
}

impl TldRecord {
    /// Create a bare record with only the root zone facts filled in
    #[must_use]
    pub fn new(label: impl Into<String>, registry_tag: impl Into<String>, delegated: bool) -> Self {
        let registry_tag = registry_tag.into();
        Self {
            label: label.into(),
            unicode_label: None,
            script: None,
            iso_country_code: None,
            delegated,
            kind: TldKind::from_registry_tag(&registry_tag),
            registry_tag,
            organizations: Organizations::default(),
            nameservers: None,
            registry_url: None,
            whois_server: None,
            rdap: None,
            created_date: None,
            updated_dates: None,
            annotations: Annotations::default(),
            idn_variants: None,
        }
    }

    /// Returns true if the label is in ACE form
    #[must_use]
    pub fn is_idn(&self) -> bool {
        is_idn(&self.label)
    }

    /// RDAP server URL, if any source supplied one
    #[must_use]
    pub fn rdap_server(&self) -> Option<&str> {
        self.rdap.as_ref().map(|r| r.server.as_str())
    }

    /// Provenance of [`Self::rdap_server`]
    #[must_use]
    pub fn rdap_source(&self) -> Option<RdapSource> {
        self.rdap.as_ref().map(|r| r.source)
    }

    /// Label to show to humans: the Unicode form when known
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.unicode_label.as_deref().unwrap_or(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label(".COM"), "com");
        assert_eq!(normalize_label("xn--kpry57d"), "xn--kpry57d");
        assert_eq!(normalize_label(" .uk "), "uk");
    }

    #[test]
    fn test_label_classification() {
        assert!(is_idn("xn--kpry57d"));
        assert!(!is_idn("xn--"));
        assert!(!is_idn("com"));
        assert!(is_ascii_cctld("tw"));
        assert!(!is_ascii_cctld("com"));
        assert!(!is_ascii_cctld("xn"));
    }

    #[test]
    fn test_kind_from_tag() {
        assert_eq!(TldKind::from_registry_tag("country-code"), TldKind::CountryCode);
        assert_eq!(TldKind::from_registry_tag("generic"), TldKind::Generic);
        assert_eq!(TldKind::from_registry_tag("sponsored"), TldKind::Generic);
        assert_eq!(TldKind::from_registry_tag("infrastructure"), TldKind::Generic);
    }

    #[test]
    fn test_bare_record_serialization() {
        let record = TldRecord::new("example", "generic", false);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "tld": "example",
                "delegated": false,
                "iana_tag": "generic",
                "type": "gtld",
            })
        );
    }

    #[test]
    fn test_rdap_fields_flatten_together() {
        let mut record = TldRecord::new("tw", "country-code", true);
        record.rdap = Some(RdapEndpoint::new("https://rdap.twnic.tw/", RdapSource::Bootstrap));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["rdap_server"], "https://rdap.twnic.tw/");
        assert_eq!(json["rdap_source"], "bootstrap");

        let back: TldRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.rdap_source(), Some(RdapSource::Bootstrap));
        assert_eq!(back.rdap_server(), Some("https://rdap.twnic.tw/"));
    }

    #[test]
    fn test_annotations_serialize_when_present() {
        let mut record = TldRecord::new("uk", "country-code", true);
        record.annotations.country_name = Some("United Kingdom".into());
        record.annotations.operator_aliases =
            Some(["Nominet".to_string()].into_iter().collect());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["annotations"]["country_name_iso"], "United Kingdom");
        assert_eq!(json["annotations"]["as_org_aliases"], serde_json::json!(["Nominet"]));
        assert!(json["annotations"].get("tld_manager_alias").is_none());
    }
}
