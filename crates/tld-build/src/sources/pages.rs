use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tld_core::{is_idn, PageData};
use tracing::info;

use super::read_optional_json;

const IDN_BUCKET: &str = "idn";

/// Location of a TLD's extracted page: `<dir>/<bucket>/<label>.json`
#[must_use]
pub fn page_data_path(dir: &Path, label: &str) -> PathBuf {
    let bucket = if is_idn(label) {
        IDN_BUCKET.to_string()
    } else {
        label.chars().next().map(String::from).unwrap_or_default()
    };
    dir.join(bucket).join(format!("{label}.json"))
}

/// Read one TLD's page data, `None` when absent or unparseable
#[must_use]
pub fn read_page_data(dir: &Path, label: &str) -> Option<PageData> {
    read_optional_json(&page_data_path(dir, label), "tld page")
}

/// Read page data for every label that has some
#[must_use]
pub fn read_all_page_data(dir: &Path, labels: &[String]) -> HashMap<String, PageData> {
    if !dir.is_dir() {
        info!(path = %dir.display(), "No TLD page directory, records will lack page data");
        return HashMap::new();
    }

    let pages: HashMap<String, PageData> = labels
        .iter()
        .filter_map(|label| read_page_data(dir, label).map(|page| (label.clone(), page)))
        .collect();
    info!(count = pages.len(), "Parsed TLD pages");
    pages
}
