//! Per-TLD record assembly.
//!
//! [`build_record`] is a pure function of one root zone entry and the
//! shared [`Sources`]; it never touches the file system.

use std::collections::BTreeSet;
use tld_core::{
    IpRecord, Nameserver, Organizations, PageData, PageNameserver, RdapEndpoint,
    RdapSource, RootZoneEntry, TldKind, TldRecord,
};
use tracing::warn;

use crate::asn::RangeIndex;
use crate::country::country_name_for;
use crate::sources::{normalize_agreement_types, Sources};

/// Build the record for one root zone entry
#[must_use]
pub fn build_record(entry: &RootZoneEntry, sources: &Sources) -> TldRecord {
    let label = entry.label();
    let delegated = entry.is_delegated();
    let mut record = TldRecord::new(label.clone(), entry.tag.trim(), delegated);
    let page = sources.pages.get(&label);

    if record.is_idn() {
        record.unicode_label = decode_idn(&label);
        record.script = sources.idn_scripts.get(&label).cloned();
        if record.kind.is_country_code() {
            record.iso_country_code = page
                .and_then(|p| p.tld_iso.as_deref())
                .map(str::trim)
                .filter(|iso| !iso.is_empty())
                .map(str::to_lowercase);
        }
    }

    let manager = delegated.then(|| entry.manager.trim().to_string());
    record.annotations.tld_manager_alias = manager
        .as_ref()
        .and_then(|m| sources.manager_aliases.get(m))
        .cloned();
    record.organizations = organizations(manager, page);
    record.rdap = resolve_rdap(&label, page, sources);

    if let Some(page) = page {
        record.registry_url = non_empty(page.registry_url.as_deref());
        record.whois_server = non_empty(page.whois_server.as_deref());
        record.created_date = non_empty(page.tld_created.as_deref());
        record.updated_dates = non_empty(page.tld_updated.as_deref()).map(|d| vec![d]);

        if let Some(nameservers) = &page.nameservers {
            let mut aliases = BTreeSet::new();
            record.nameservers = Some(
                nameservers
                    .iter()
                    .map(|ns| enrich_nameserver(ns, sources, &mut aliases))
                    .collect(),
            );
            if !aliases.is_empty() {
                record.annotations.operator_aliases = Some(aliases);
            }
        }
    }

    if record.kind == TldKind::CountryCode {
        record.annotations.country_name =
            country_name_for(&label, record.iso_country_code.as_deref()).map(String::from);
    } else if let Some(agreement) = sources.agreements.get(&label) {
        let types = normalize_agreement_types(&agreement.agreement_types);
        if !types.is_empty() {
            record.annotations.agreement_types = Some(types);
        }
    }

    record
}

fn organizations(manager: Option<String>, page: Option<&PageData>) -> Organizations {
    let page_orgs = page.and_then(|p| p.orgs.as_ref());
    Organizations {
        manager,
        admin: non_empty(page_orgs.and_then(|o| o.admin.as_deref())),
        tech: non_empty(page_orgs.and_then(|o| o.tech.as_deref())),
    }
}

/// Page data, then the IANA bootstrap, then the supplemental list
fn resolve_rdap(label: &str, page: Option<&PageData>, sources: &Sources) -> Option<RdapEndpoint> {
    if let Some(server) = non_empty(page.and_then(|p| p.rdap_server.as_deref())) {
        return Some(RdapEndpoint::new(server, RdapSource::PageData));
    }
    if let Some(server) = non_empty(sources.rdap_bootstrap.get(label).map(String::as_str)) {
        return Some(RdapEndpoint::new(server, RdapSource::Bootstrap));
    }
    non_empty(
        sources
            .supplemental_rdap
            .get(label)
            .map(|s| s.rdap_server.as_str()),
    )
    .map(|server| RdapEndpoint::new(server, RdapSource::Supplemental))
}

fn enrich_nameserver(
    ns: &PageNameserver,
    sources: &Sources,
    aliases: &mut BTreeSet<String>,
) -> Nameserver {
    let mut enrich = |ip: &String| {
        let record = resolve_ip(ip, sources.asn_index.as_ref());
        if let Some(alias) = sources.as_org_aliases.get(&record.org_name) {
            aliases.insert(alias.clone());
        }
        record
    };

    Nameserver {
        hostname: ns.hostname.clone(),
        ipv4: ns.ipv4.iter().map(&mut enrich).collect(),
        ipv6: ns.ipv6.iter().map(&mut enrich).collect(),
    }
}

/// Resolve one address, falling back to the unknown sentinel
#[must_use]
pub fn resolve_ip(address: &str, index: Option<&RangeIndex>) -> IpRecord {
    index
        .and_then(|index| index.lookup(address))
        .map_or_else(
            || IpRecord::unknown(address),
            |range| IpRecord::new(address, range.asn, &range.org_name, &range.country),
        )
}

fn decode_idn(label: &str) -> Option<String> {
    let (unicode, result) = idna::domain_to_unicode(label);
    match result {
        Ok(()) if unicode != label => Some(unicode),
        Ok(()) => None,
        Err(e) => {
            warn!(label, error = ?e, "Cannot decode IDN label");
            None
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asn::RangeEntry;
    use crate::sources::SupplementalRdap;
    use tld_core::{PageOrgs, RegistryAgreement};

    fn com_entry() -> RootZoneEntry {
        RootZoneEntry::new(".com", "generic", "VeriSign Global Registry Services")
    }

    #[test]
    fn test_bootstrap_rdap_when_no_page_data() {
        let mut sources = Sources::default();
        sources
            .rdap_bootstrap
            .insert("com".into(), "https://rdap.iana.org/".into());

        let record = build_record(&com_entry(), &sources);
        assert_eq!(record.rdap_server(), Some("https://rdap.iana.org/"));
        assert_eq!(record.rdap_source(), Some(RdapSource::Bootstrap));
        assert!(record.nameservers.is_none());
    }

    #[test]
    fn test_page_rdap_wins_over_bootstrap() {
        let mut sources = Sources::default();
        sources
            .rdap_bootstrap
            .insert("com".into(), "https://rdap.iana.org/".into());
        sources.pages.insert(
            "com".into(),
            PageData {
                rdap_server: Some("https://rdap.verisign.com/com/v1/".into()),
                ..PageData::default()
            },
        );

        let record = build_record(&com_entry(), &sources);
        assert_eq!(record.rdap_server(), Some("https://rdap.verisign.com/com/v1/"));
        assert_eq!(record.rdap_source(), Some(RdapSource::PageData));
    }

    #[test]
    fn test_supplemental_rdap_last() {
        let mut sources = Sources::default();
        sources.supplemental_rdap.insert(
            "de".into(),
            SupplementalRdap {
                rdap_server: "https://rdap.denic.de/".into(),
                source: None,
            },
        );
        let entry = RootZoneEntry::new(".de", "country-code", "DENIC eG");

        let record = build_record(&entry, &sources);
        assert_eq!(record.rdap_source(), Some(RdapSource::Supplemental));
        assert_eq!(record.annotations.country_name.as_deref(), Some("Germany"));
    }

    #[test]
    fn test_no_rdap_anywhere() {
        let record = build_record(&com_entry(), &Sources::default());
        assert!(record.rdap.is_none());
        assert!(record.rdap_source().is_none());
    }

    #[test]
    fn test_undelegated_keeps_page_orgs() {
        let mut sources = Sources::default();
        sources.pages.insert(
            "example".into(),
            PageData {
                orgs: Some(PageOrgs {
                    tld_manager: None,
                    admin: Some("Internet Assigned Numbers Authority".into()),
                    tech: Some("  ".into()),
                }),
                ..PageData::default()
            },
        );
        let entry = RootZoneEntry::new(".example", "generic", "Not assigned");

        let record = build_record(&entry, &sources);
        assert!(!record.delegated);
        assert!(record.organizations.manager.is_none());
        assert_eq!(
            record.organizations.admin.as_deref(),
            Some("Internet Assigned Numbers Authority")
        );
        assert!(record.organizations.tech.is_none());
    }

    #[test]
    fn test_manager_alias_annotation() {
        let mut sources = Sources::default();
        sources.manager_aliases.insert(
            "VeriSign Global Registry Services".into(),
            "Verisign".into(),
        );
        let record = build_record(&com_entry(), &sources);
        assert_eq!(record.annotations.tld_manager_alias.as_deref(), Some("Verisign"));
    }

    #[test]
    fn test_nameserver_enrichment_and_operator_aliases() {
        let mut sources = Sources::default();
        sources.asn_index = Some(RangeIndex::build(vec![
            RangeEntry::new("192.0.2.0", "192.0.2.255", 13335, "US", "CLOUDFLARENET"),
            RangeEntry::new("198.51.100.0", "198.51.100.255", 0, "None", "Not routed"),
        ]));
        sources
            .as_org_aliases
            .insert("CLOUDFLARENET".into(), "Cloudflare".into());
        sources.pages.insert(
            "com".into(),
            PageData {
                nameservers: Some(vec![
                    PageNameserver {
                        hostname: "a.ns.test".into(),
                        ipv4: vec!["192.0.2.10".into(), "198.51.100.1".into()],
                        ipv6: vec!["2001:db8::1".into()],
                    },
                    PageNameserver {
                        hostname: "b.ns.test".into(),
                        ipv4: vec!["192.0.2.11".into()],
                        ipv6: vec![],
                    },
                ]),
                ..PageData::default()
            },
        );

        let record = build_record(&com_entry(), &sources);
        let nameservers = record.nameservers.unwrap();
        assert_eq!(nameservers.len(), 2);

        let a = &nameservers[0];
        assert_eq!(a.ipv4[0].asn, 13335);
        assert_eq!(a.ipv4[0].org_name, "CLOUDFLARENET");
        // asn 0 range is a real match, not the sentinel
        assert_eq!(a.ipv4[1].asn, 0);
        assert_eq!(a.ipv4[1].org_name, "Not routed");
        assert!(a.ipv6[0].is_unknown());

        let aliases = record.annotations.operator_aliases.unwrap();
        assert_eq!(aliases.into_iter().collect::<Vec<_>>(), vec!["Cloudflare"]);
    }

    #[test]
    fn test_no_asn_table_gives_sentinels() {
        let mut sources = Sources::default();
        sources.pages.insert(
            "com".into(),
            PageData {
                nameservers: Some(vec![PageNameserver {
                    hostname: "a.ns.test".into(),
                    ipv4: vec!["192.0.2.10".into()],
                    ipv6: vec![],
                }]),
                ..PageData::default()
            },
        );

        let record = build_record(&com_entry(), &sources);
        let ns = &record.nameservers.unwrap()[0];
        assert!(ns.ipv4[0].is_unknown());
        assert!(record.annotations.operator_aliases.is_none());
    }

    #[test]
    fn test_idn_cctld_fields() {
        let mut sources = Sources::default();
        sources
            .idn_scripts
            .insert("xn--kpry57d".into(), "Han".into());
        sources.pages.insert(
            "xn--kpry57d".into(),
            PageData {
                tld_iso: Some("TW".into()),
                tld_created: Some("2010-06-25".into()),
                tld_updated: Some("2024-01-02".into()),
                ..PageData::default()
            },
        );
        let entry = RootZoneEntry::new(".xn--kpry57d", "country-code", "TWNIC");

        let record = build_record(&entry, &sources);
        assert_eq!(record.unicode_label.as_deref(), Some("台灣"));
        assert_eq!(record.script.as_deref(), Some("Han"));
        assert_eq!(record.iso_country_code.as_deref(), Some("tw"));
        assert_eq!(
            record.annotations.country_name.as_deref(),
            Some("Taiwan, Province of China")
        );
        assert_eq!(record.created_date.as_deref(), Some("2010-06-25"));
        assert_eq!(record.updated_dates, Some(vec!["2024-01-02".to_string()]));
    }

    #[test]
    fn test_malformed_punycode_omits_unicode() {
        let mut sources = Sources::default();
        sources
            .rdap_bootstrap
            .insert("xn--zz".into(), "https://rdap.example/".into());
        sources.idn_scripts.insert("xn--zz".into(), "Latin".into());
        let entry = RootZoneEntry::new(".xn--zz", "generic", "Example Registry");

        let record = build_record(&entry, &sources);
        assert!(record.unicode_label.is_none());
        assert_eq!(record.label, "xn--zz");
        assert_eq!(record.script.as_deref(), Some("Latin"));
        assert_eq!(record.rdap_server(), Some("https://rdap.example/"));
        assert_eq!(
            record.organizations.manager.as_deref(),
            Some("Example Registry")
        );

        // the next record still decodes
        let good = build_record(
            &RootZoneEntry::new(".xn--mgbaam7a8h", "country-code", "TRA"),
            &sources,
        );
        assert_eq!(good.unicode_label.as_deref(), Some("امارات"));
    }

    #[test]
    fn test_ascii_label_has_no_idn_fields() {
        let mut sources = Sources::default();
        sources.idn_scripts.insert("com".into(), "Latin".into());
        let record = build_record(&com_entry(), &sources);
        assert!(record.unicode_label.is_none());
        assert!(record.script.is_none());
        assert!(record.annotations.country_name.is_none());
    }

    #[test]
    fn test_agreement_types() {
        let mut sources = Sources::default();
        sources.agreements.insert(
            "aaa".into(),
            RegistryAgreement {
                tld: "aaa".into(),
                agreement_types: vec!["Base".into(), "Brand (Spec 13)".into()],
                ..RegistryAgreement::default()
            },
        );
        sources.agreements.insert(
            "odd".into(),
            RegistryAgreement {
                tld: "odd".into(),
                agreement_types: vec!["Mystery".into()],
                ..RegistryAgreement::default()
            },
        );

        let aaa = build_record(&RootZoneEntry::new(".aaa", "generic", "AAA"), &sources);
        assert_eq!(
            aaa.annotations.agreement_types,
            Some(vec!["base".to_string(), "brand".to_string()])
        );

        let odd = build_record(&RootZoneEntry::new(".odd", "generic", "Odd"), &sources);
        assert!(odd.annotations.agreement_types.is_none());
        assert!(odd.annotations.is_empty());
    }

    #[test]
    fn test_resolve_ip_malformed_is_unknown() {
        let index = RangeIndex::build(vec![RangeEntry::new(
            "0.0.0.0",
            "255.255.255.255",
            1,
            "US",
            "EVERYTHING",
        )]);
        assert!(resolve_ip("not-an-ip", Some(&index)).is_unknown());
        assert_eq!(resolve_ip("10.0.0.1", Some(&index)).asn, 1);
    }
}
