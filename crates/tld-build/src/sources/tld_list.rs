/// Labels of an IANA `tlds-alpha-by-domain.txt`, lowercased, comments and
/// blank lines dropped
#[must_use]
pub fn parse_tld_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect()
}

/// Returns true if the label lists differ. The version header is ignored,
/// so a re-stamped but otherwise identical list is unchanged.
#[must_use]
pub fn tld_list_changed(old: Option<&str>, new: &str) -> bool {
    match old {
        Some(old) => parse_tld_list(old) != parse_tld_list(new),
        None => true,
    }
}
