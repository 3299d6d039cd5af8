use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::read_optional_json;

#[derive(Debug, Deserialize)]
struct AliasName {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ManagerAliasFile {
    #[serde(rename = "managerAliases", default)]
    aliases: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct AsOrgAliasFile {
    #[serde(rename = "asOrgAliases", default)]
    aliases: Map<String, Value>,
}

/// Read the TLD manager alias file into `manager name -> canonical alias`
#[must_use]
pub fn read_manager_aliases(path: &Path) -> HashMap<String, String> {
    read_optional_json::<ManagerAliasFile>(path, "manager aliases")
        .map(|file| reverse(file.aliases))
        .unwrap_or_default()
}

/// Read the AS organization alias file into `AS org name -> canonical alias`
#[must_use]
pub fn read_as_org_aliases(path: &Path) -> HashMap<String, String> {
    read_optional_json::<AsOrgAliasFile>(path, "as org aliases")
        .map(|file| reverse(file.aliases))
        .unwrap_or_default()
}

// canonical -> [names] becomes name -> canonical, in file order. Entries
// without a name are skipped; a name listed under two canonicals keeps the later one.
fn reverse(aliases: Map<String, Value>) -> HashMap<String, String> {
    let mut lookup = HashMap::new();
    for (canonical, names) in aliases {
        let names: Vec<AliasName> = match serde_json::from_value(names) {
            Ok(names) => names,
            Err(e) => {
                debug!(canonical = %canonical, error = %e, "Skipping malformed alias list");
                continue;
            }
        };
        for name in names.into_iter().filter_map(|entry| entry.name) {
            if name.is_empty() {
                continue;
            }
            if let Some(previous) = lookup.insert(name.clone(), canonical.clone()) {
                debug!(name = %name, previous = %previous, canonical = %canonical, "Alias listed under two canonical names");
            }
        }
    }
    lookup
}
