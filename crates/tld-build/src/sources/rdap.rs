use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use super::read_optional_json;

#[derive(Debug, Deserialize)]
struct Bootstrap {
    services: Vec<(Vec<String>, Vec<String>)>,
}

/// Read the IANA RDAP bootstrap file into `tld -> first service URL`
#[must_use]
pub fn read_rdap_bootstrap(path: &Path) -> HashMap<String, String> {
    let Some(bootstrap) = read_optional_json::<Bootstrap>(path, "rdap bootstrap") else {
        return HashMap::new();
    };

    let mut lookup = HashMap::new();
    for (tlds, urls) in bootstrap.services {
        let Some(url) = urls.into_iter().next() else {
            continue;
        };
        for tld in tlds {
            lookup
                .entry(tld.trim_start_matches('.').to_lowercase())
                .or_insert_with(|| url.clone());
        }
    }

    info!(count = lookup.len(), "Parsed RDAP bootstrap");
    lookup
}

/// A curated RDAP server for a ccTLD missing from the bootstrap file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplementalRdap {
    pub rdap_server: String,
    /// Where the server was found
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SupplementalFile {
    #[serde(rename = "ccTldRdapServers", default)]
    servers: Vec<SupplementalRow>,
}

#[derive(Debug, Deserialize)]
struct SupplementalRow {
    #[serde(default)]
    tld: String,
    #[serde(rename = "rdapServer")]
    rdap_server: Option<String>,
    source: Option<String>,
}

/// Read the supplemental ccTLD RDAP list into `tld -> server`
#[must_use]
pub fn read_supplemental_rdap(path: &Path) -> HashMap<String, SupplementalRdap> {
    let Some(file) = read_optional_json::<SupplementalFile>(path, "supplemental rdap") else {
        return HashMap::new();
    };

    file.servers
        .into_iter()
        .filter_map(|row| {
            let tld = row.tld.trim_start_matches('.').to_lowercase();
            let rdap_server = row.rdap_server.filter(|s| !s.is_empty())?;
            (!tld.is_empty()).then(|| {
                (
                    tld,
                    SupplementalRdap {
                        rdap_server,
                        source: row.source,
                    },
                )
            })
        })
        .collect()
}
