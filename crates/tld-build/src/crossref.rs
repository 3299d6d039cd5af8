//! IDN ccTLD <-> ASCII ccTLD cross-referencing.

use std::collections::{BTreeMap, HashSet};
use tld_core::TldRecord;
use tracing::{debug, info};

/// Attach every IDN ccTLD to the ASCII ccTLD its ISO code designates.
///
/// The variant map is derived from the finished records first and merged
/// in a single pass afterwards; no record is read after being modified.
/// Variants pointing at a label absent from `records` are skipped.
#[must_use]
pub fn link_idn_variants(records: Vec<TldRecord>) -> Vec<TldRecord> {
    let labels: HashSet<&str> = records.iter().map(|r| r.label.as_str()).collect();

    let mut variants: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for record in &records {
        if !record.is_idn() || !record.kind.is_country_code() {
            continue;
        }
        let Some(iso) = record.iso_country_code.as_deref() else {
            continue;
        };
        if !labels.contains(iso) {
            debug!(idn = %record.label, target = iso, "IDN ccTLD points at unknown ccTLD");
            continue;
        }
        variants
            .entry(iso.to_string())
            .or_default()
            .push(record.label.clone());
    }
    for list in variants.values_mut() {
        list.sort();
        list.dedup();
    }

    info!(linked = variants.len(), "Cross-referenced IDN ccTLDs");
    records
        .into_iter()
        .map(|mut record| {
            if let Some(extra) = variants.remove(&record.label) {
                let mut merged = record.idn_variants.take().unwrap_or_default();
                merged.extend(extra);
                merged.sort();
                merged.dedup();
                record.idn_variants = Some(merged);
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idn(label: &str, iso: &str) -> TldRecord {
        let mut record = TldRecord::new(label, "country-code", true);
        record.iso_country_code = Some(iso.into());
        record
    }

    #[test]
    fn test_links_sorted_variants() {
        let records = vec![
            TldRecord::new("cn", "country-code", true),
            idn("xn--fiqz9s", "cn"),
            idn("xn--fiqs8s", "cn"),
            TldRecord::new("com", "generic", true),
        ];

        let linked = link_idn_variants(records);
        assert_eq!(
            linked[0].idn_variants,
            Some(vec!["xn--fiqs8s".to_string(), "xn--fiqz9s".to_string()])
        );
        assert!(linked[1].idn_variants.is_none());
        assert!(linked[3].idn_variants.is_none());
        assert_eq!(linked.len(), 4);
    }

    #[test]
    fn test_missing_target_is_skipped() {
        let records = vec![idn("xn--mgbaam7a8h", "ae")];
        let linked = link_idn_variants(records);
        assert_eq!(linked.len(), 1);
        assert!(linked[0].idn_variants.is_none());
    }

    #[test]
    fn test_generic_idn_is_not_linked() {
        let mut generic = TldRecord::new("xn--80asehdb", "generic", true);
        generic.iso_country_code = Some("ru".into());
        let records = vec![TldRecord::new("ru", "country-code", true), generic];
        assert!(link_idn_variants(records)[0].idn_variants.is_none());
    }
}
