use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tld_core::{normalize_label, RegistryAgreement, Result, TldError};
use tracing::{debug, info, warn};

const COL_TLD: &str = "Top Level Domain";
const COL_TYPE: &str = "Agreement Type";
const COL_STATUS: &str = "Agreement Status";
const COL_ULABEL: &str = "U-Label";
const COL_OPERATOR: &str = "Operator";
const COL_DATE: &str = "Agreement Date";
const COL_LINK: &str = "Link";

/// Raw ICANN agreement type -> dataset tag
const AGREEMENT_TYPE_TAGS: &[(&str, &str)] = &[
    ("Base", "base"),
    ("Brand (Spec 13)", "brand"),
    ("Community (Spec 12)", "community"),
    ("Sponsored", "sponsored"),
    ("Non-Sponsored", "non_sponsored"),
];

/// Split the comma-separated `Agreement Type` cell
#[must_use]
pub fn parse_agreement_types(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Map raw agreement types to their tags, dropping unrecognized ones and
/// keeping the order of the rest.
#[must_use]
pub fn normalize_agreement_types(raw: &[String]) -> Vec<String> {
    raw.iter()
        .filter_map(|t| {
            AGREEMENT_TYPE_TAGS
                .iter()
                .find(|(name, _)| *name == t.trim())
                .map(|(_, tag)| (*tag).to_string())
        })
        .collect()
}

/// Read the registry agreement table, keyed by lowercased TLD
#[must_use]
pub fn read_registry_agreements(path: &Path) -> HashMap<String, RegistryAgreement> {
    let mut content = String::new();
    let read = std::fs::File::open(path).and_then(|mut f| f.read_to_string(&mut content));
    match read {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "Registry agreement table not found");
            return HashMap::new();
        }
        Err(e) => {
            warn!(error = %TldError::io(path, e), "Cannot read registry agreement table");
            return HashMap::new();
        }
    }

    match parse_registry_agreements(content.trim_start_matches('\u{feff}')) {
        Ok(agreements) => {
            info!(count = agreements.len(), "Parsed registry agreements");
            agreements
        }
        Err(e) => {
            warn!(error = %e, "Cannot parse registry agreement table");
            HashMap::new()
        }
    }
}

fn parse_registry_agreements(content: &str) -> Result<HashMap<String, RegistryAgreement>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(|e| TldError::Csv(e.to_string()))?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let tld_col = column(COL_TLD)
        .ok_or_else(|| TldError::malformed("registry agreements", format!("missing column {COL_TLD:?}")))?;
    let type_col = column(COL_TYPE);
    let status_col = column(COL_STATUS);
    let ulabel_col = column(COL_ULABEL);
    let operator_col = column(COL_OPERATOR);
    let date_col = column(COL_DATE);
    let link_col = column(COL_LINK);

    let mut agreements = HashMap::new();
    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                debug!(error = %e, "Skipping unreadable agreement row");
                continue;
            }
        };
        let cell = |col: Option<usize>| {
            col.and_then(|i| row.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        let Some(tld) = cell(Some(tld_col)).map(|t| normalize_label(&t)) else {
            continue;
        };
        let agreement = RegistryAgreement {
            tld: tld.clone(),
            agreement_types: cell(type_col).map_or_else(Vec::new, |t| parse_agreement_types(&t)),
            status: cell(status_col).unwrap_or_default(),
            u_label: cell(ulabel_col),
            operator: cell(operator_col),
            agreement_date: cell(date_col),
            link: cell(link_col),
        };
        agreements.insert(tld, agreement);
    }
    Ok(agreements)
}
