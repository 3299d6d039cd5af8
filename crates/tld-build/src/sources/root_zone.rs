use serde::Deserialize;
use std::path::Path;
use tld_core::{Result, RootZoneEntry, TldError};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct RawEntry {
    domain: Option<String>,
    #[serde(rename = "type")]
    tag: Option<String>,
    manager: Option<String>,
}

/// Read the extracted root zone table.
///
/// This is the one mandatory source: a missing or unparseable file is an
/// error. Rows lacking `domain`, `type` or `manager` are dropped.
pub fn read_root_zone(path: &Path) -> Result<Vec<RootZoneEntry>> {
    let content = std::fs::read_to_string(path).map_err(|e| TldError::io(path, e))?;
    let raw: Vec<RawEntry> = serde_json::from_str(&content)
        .map_err(|e| TldError::malformed("root zone", format!("{}: {e}", path.display())))?;

    let total = raw.len();
    let entries: Vec<RootZoneEntry> = raw
        .into_iter()
        .filter_map(|row| match (row.domain, row.tag, row.manager) {
            (Some(domain), Some(tag), Some(manager)) if !domain.trim().is_empty() => {
                Some(RootZoneEntry::new(domain, tag, manager))
            }
            _ => None,
        })
        .collect();

    if entries.len() < total {
        debug!(dropped = total - entries.len(), "Dropped incomplete root zone rows");
    }
    info!(count = entries.len(), "Parsed root zone entries");
    Ok(entries)
}
