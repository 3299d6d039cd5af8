//! Idempotent snapshot persistence.
//!
//! A snapshot is rewritten only when something other than its volatile
//! top-level keys changed, so an unchanged dataset keeps its bytes and mtime.

use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tld_core::{Result, TldError};
use tracing::{debug, info, warn};

/// What happened to the snapshot file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteStatus {
    Written,
    Unchanged,
    Error,
}

/// Result of [`write_if_changed`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteOutcome {
    pub changed: bool,
    pub status: WriteStatus,
    /// Description of the failure when `status` is [`WriteStatus::Error`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WriteOutcome {
    const fn written() -> Self {
        Self {
            changed: true,
            status: WriteStatus::Written,
            error: None,
        }
    }

    const fn unchanged() -> Self {
        Self {
            changed: false,
            status: WriteStatus::Unchanged,
            error: None,
        }
    }

    fn error(e: &TldError) -> Self {
        Self {
            changed: false,
            status: WriteStatus::Error,
            error: Some(e.to_string()),
        }
    }
}

/// Write `data` to `path` as indented JSON unless the file already holds the
/// same content once `volatile_fields` are ignored.
///
/// A prior file that does not parse is overwritten. Read and write failures
/// are reported through [`WriteStatus::Error`], never as a panic; the file is
/// replaced by rename, so readers never observe a half-written snapshot.
pub fn write_if_changed<T: Serialize>(
    path: &Path,
    data: &T,
    volatile_fields: &[&str],
    indent: usize,
) -> WriteOutcome {
    match try_write_if_changed(path, data, volatile_fields, indent) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to persist snapshot");
            WriteOutcome::error(&e)
        }
    }
}

fn try_write_if_changed<T: Serialize>(
    path: &Path,
    data: &T,
    volatile_fields: &[&str],
    indent: usize,
) -> Result<WriteOutcome> {
    let new_value = serde_json::to_value(data)?;

    match std::fs::read_to_string(path) {
        Ok(existing) => match serde_json::from_str::<Value>(&existing) {
            Ok(old_value) => {
                if strip(&old_value, volatile_fields) == strip(&new_value, volatile_fields) {
                    info!(path = %path.display(), "No changes detected, snapshot left untouched");
                    return Ok(WriteOutcome::unchanged());
                }
                debug!(path = %path.display(), "Snapshot content differs");
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Existing snapshot is not valid JSON, overwriting");
            }
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No existing snapshot");
        }
        Err(e) => return Err(TldError::io(path, e)),
    }

    write_atomic(path, &to_pretty_json(data, indent)?)?;
    info!(path = %path.display(), "Snapshot written");
    Ok(WriteOutcome::written())
}

/// Copy of a top-level object without the volatile keys. Key order does not
/// take part in the comparison.
fn strip(value: &Value, volatile_fields: &[&str]) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !volatile_fields.contains(&key.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Map<String, Value>>(),
        ),
        other => other.clone(),
    }
}

// Serialized from the data itself so keys keep their declaration order
fn to_pretty_json<T: Serialize>(value: &T, indent: usize) -> Result<Vec<u8>> {
    let indent = vec![b' '; indent];
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| TldError::io(parent, e))?;
    }

    let tmp = temp_path(path);
    if let Err(e) = std::fs::write(&tmp, bytes) {
        let _ = std::fs::remove_file(&tmp);
        return Err(TldError::io(&tmp, e));
    }
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        TldError::io(path, e)
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const VOLATILE: &[&str] = &["publication"];

    #[test]
    fn test_written_then_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/tlds.json");
        let data = json!({"publication": "2026-01-01T00:00:00Z", "tlds": [{"tld": "com"}]});

        let first = write_if_changed(&path, &data, VOLATILE, 2);
        assert_eq!(first.status, WriteStatus::Written);
        assert!(first.changed);

        let second = write_if_changed(&path, &data, VOLATILE, 2);
        assert_eq!(second.status, WriteStatus::Unchanged);
        assert!(!second.changed);
    }

    #[test]
    fn test_volatile_only_change_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tlds.json");
        let old = json!({"publication": "2026-01-01T00:00:00Z", "tlds": ["com"]});
        write_if_changed(&path, &old, VOLATILE, 2);

        let bytes_before = std::fs::read(&path).unwrap();
        let mtime_before = std::fs::metadata(&path).unwrap().modified().unwrap();

        let new = json!({"publication": "2026-06-01T12:00:00Z", "tlds": ["com"]});
        let outcome = write_if_changed(&path, &new, VOLATILE, 2);

        assert_eq!(outcome.status, WriteStatus::Unchanged);
        assert_eq!(std::fs::read(&path).unwrap(), bytes_before);
        assert_eq!(
            std::fs::metadata(&path).unwrap().modified().unwrap(),
            mtime_before
        );
    }

    #[test]
    fn test_content_change_rewrites_with_new_publication() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tlds.json");
        write_if_changed(&path, &json!({"publication": "a", "tlds": ["com"]}), VOLATILE, 2);

        let outcome = write_if_changed(
            &path,
            &json!({"publication": "b", "tlds": ["com", "net"]}),
            VOLATILE,
            2,
        );
        assert_eq!(outcome.status, WriteStatus::Written);

        let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk["publication"], "b");
    }

    #[test]
    fn test_corrupt_snapshot_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tlds.json");
        std::fs::write(&path, "{ not json").unwrap();

        let outcome = write_if_changed(&path, &json!({"tlds": []}), VOLATILE, 2);
        assert_eq!(outcome.status, WriteStatus::Written);
        assert!(!dir.path().join("tlds.json.tmp").exists());
    }

    #[test]
    fn test_format_indent_newline_and_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tlds.json");
        write_if_changed(&path, &json!({"tld_unicode": "台灣"}), VOLATILE, 2);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n  \"tld_unicode\": \"台灣\"\n}\n");
    }

    #[test]
    fn test_key_order_alone_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tlds.json");
        std::fs::write(&path, "{\"tlds\": [], \"description\": \"d\"}\n").unwrap();

        let outcome = write_if_changed(&path, &json!({"description": "d", "tlds": []}), VOLATILE, 2);
        assert_eq!(outcome.status, WriteStatus::Unchanged);
    }

    #[test]
    fn test_record_keeps_field_order() {
        use chrono::TimeZone;
        use tld_core::{Dataset, RdapEndpoint, RdapSource, TldRecord};

        let mut record = TldRecord::new("com", "generic", true);
        record.organizations.manager = Some("VeriSign Global Registry Services".into());
        record.rdap = Some(RdapEndpoint::new(
            "https://rdap.verisign.com/com/v1/",
            RdapSource::Bootstrap,
        ));
        let published = chrono::Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let dataset = Dataset::new(vec![record], published);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tlds.json");
        write_if_changed(&path, &dataset, VOLATILE, 2);

        let expected = r#"{
  "description": "Enhanced TLD bootstrap data, from IANA sources",
  "publication": "2026-01-01T00:00:00Z",
  "sources": {
    "iana_root_db": "https://www.iana.org/domains/root/db",
    "iana_rdap": "https://data.iana.org/rdap/dns.json"
  },
  "tlds": [
    {
      "tld": "com",
      "delegated": true,
      "iana_tag": "generic",
      "type": "gtld",
      "orgs": {
        "tld_manager": "VeriSign Global Registry Services"
      },
      "rdap_server": "https://rdap.verisign.com/com/v1/",
      "rdap_source": "bootstrap"
    }
  ]
}
"#;
        assert_eq!(std::fs::read_to_string(&path).unwrap(), expected);
    }

    #[test]
    fn test_unreadable_target_is_error() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the file should be cannot be read as text
        let path = dir.path().join("tlds.json");
        std::fs::create_dir(&path).unwrap();

        let outcome = write_if_changed(&path, &json!({"tlds": []}), VOLATILE, 2);
        assert_eq!(outcome.status, WriteStatus::Error);
        assert!(!outcome.changed);
        assert!(outcome.error.is_some());
    }
}
