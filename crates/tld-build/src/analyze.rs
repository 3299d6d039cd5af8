//! Summary statistics over the raw sources, for sanity checks before a build.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tld_core::{is_idn, RootZoneEntry, COUNTRY_CODE_TAG};

use crate::sources::parse_tld_list;

/// Root zone tags counted together as generic
pub const GENERIC_TAGS: &[&str] = &["generic", "sponsored", "infrastructure", "generic-restricted"];

/// Counts over the IANA TLD list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TldListStats {
    pub total: usize,
    /// Labels in ACE form (`xn--`)
    pub idns: usize,
}

/// Counts over delegated root zone entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DelegatedStats {
    pub total: usize,
    pub unique_managers: usize,
    pub unique_gtld_managers: usize,
    pub unique_cctld_managers: usize,
    pub idns: usize,
    /// IDN count per raw IANA tag
    pub idns_by_tag: BTreeMap<String, usize>,
    /// Sum over [`GENERIC_TAGS`]
    pub generic: usize,
    /// Entry count per raw IANA tag
    pub by_tag: BTreeMap<String, usize>,
}

/// Counts over the root zone table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RootZoneStats {
    pub total: usize,
    pub delegated: DelegatedStats,
    pub undelegated: usize,
}

/// Counts over the RDAP bootstrap lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RdapStats {
    pub total_tlds: usize,
    pub unique_servers: usize,
}

/// Count labels and IDNs in a TLD list
#[must_use]
pub fn analyze_tld_list(text: &str) -> TldListStats {
    let labels = parse_tld_list(text);
    TldListStats {
        total: labels.len(),
        idns: labels.iter().filter(|label| is_idn(label)).count(),
    }
}

/// Break the root zone down by delegation, tag and manager
#[must_use]
pub fn analyze_root_zone(entries: &[RootZoneEntry]) -> RootZoneStats {
    let mut stats = RootZoneStats {
        total: entries.len(),
        ..RootZoneStats::default()
    };

    let mut managers = BTreeSet::new();
    let mut gtld_managers = BTreeSet::new();
    let mut cctld_managers = BTreeSet::new();

    for entry in entries {
        if !entry.is_delegated() {
            stats.undelegated += 1;
            continue;
        }

        let tag = entry.tag.trim().to_lowercase();
        let manager = entry.manager.trim();
        let delegated = &mut stats.delegated;
        delegated.total += 1;
        *delegated.by_tag.entry(tag.clone()).or_default() += 1;

        managers.insert(manager);
        if GENERIC_TAGS.contains(&tag.as_str()) {
            delegated.generic += 1;
            gtld_managers.insert(manager);
        } else if tag == COUNTRY_CODE_TAG {
            cctld_managers.insert(manager);
        }

        if is_idn(&entry.label()) {
            delegated.idns += 1;
            *delegated.idns_by_tag.entry(tag).or_default() += 1;
        }
    }

    stats.delegated.unique_managers = managers.len();
    stats.delegated.unique_gtld_managers = gtld_managers.len();
    stats.delegated.unique_cctld_managers = cctld_managers.len();
    stats
}

/// Count TLDs and distinct servers in the bootstrap lookup
#[must_use]
pub fn analyze_rdap(lookup: &HashMap<String, String>) -> RdapStats {
    RdapStats {
        total_tlds: lookup.len(),
        unique_servers: lookup.values().collect::<BTreeSet<_>>().len(),
    }
}
