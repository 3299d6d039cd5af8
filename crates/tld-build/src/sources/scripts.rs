use std::collections::HashMap;
use std::path::Path;

use super::read_optional_json;

/// Read the precomputed IDN script mapping (`label -> script name`)
#[must_use]
pub fn read_idn_scripts(path: &Path) -> HashMap<String, String> {
    read_optional_json::<HashMap<String, String>>(path, "idn scripts")
        .map(|scripts| {
            scripts
                .into_iter()
                .map(|(label, script)| (label.to_lowercase(), script))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_scripts() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{"XN--P1AI": "Cyrillic", "xn--fiqs8s": "Han"}}"#).unwrap();
        let scripts = read_idn_scripts(tmp.path());
        assert_eq!(scripts["xn--p1ai"], "Cyrillic");
        assert_eq!(scripts["xn--fiqs8s"], "Han");
    }

    #[test]
    fn test_unparseable_scripts_are_empty() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "[1, 2, 3]").unwrap();
        assert!(read_idn_scripts(tmp.path()).is_empty());
    }
}
