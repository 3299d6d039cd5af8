//! Binary-level tests against a temporary data tree.

use assert_cmd::Command;
use flate2::write::GzEncoder;
use flate2::Compression;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
    config: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let config = root.join("tldkit.toml");
        fs::write(
            &config,
            format!(
                "source_dir = {:?}\nmanual_dir = {:?}\ngenerated_dir = {:?}\n",
                root.join("source"),
                root.join("manual"),
                root.join("generated"),
            ),
        )
        .unwrap();
        Self { dir, config }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tldkit").unwrap();
        cmd.current_dir(self.root())
            .env_remove("TLDKIT_CONFIG")
            .env("RUST_LOG", "off")
            .arg("--config")
            .arg(&self.config);
        cmd
    }

    fn write_asn_table(&self, rows: &str) {
        let path = self.root().join("source/iptoasn/ip2asn-combined.tsv.gz");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut gz = GzEncoder::new(fs::File::create(path).unwrap(), Compression::default());
        gz.write_all(rows.as_bytes()).unwrap();
        gz.finish().unwrap();
    }

    fn write_root_zone(&self, json: &str) {
        self.write_source("iana-root.json", json);
    }

    fn write_source(&self, name: &str, content: &str) {
        let path = self.root().join("source").join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

#[test]
fn test_lookup_json() {
    let fixture = Fixture::new();
    fixture.write_asn_table("192.0.2.0\t192.0.2.255\t64500\tZZ\tEXAMPLE-NET\n");

    fixture
        .cmd()
        .args(["lookup", "192.0.2.5", "203.0.113.1", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"asn\": 64500"))
        .stdout(predicate::str::contains("EXAMPLE-NET"))
        .stdout(predicate::str::contains("\"as_org\": \"Unknown\""));
}

#[test]
fn test_lookup_rejects_garbage() {
    let fixture = Fixture::new();
    fixture.write_asn_table("192.0.2.0\t192.0.2.255\t64500\tZZ\tEXAMPLE-NET\n");
    fixture
        .cmd()
        .args(["lookup", "999.1.1.1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid IP address"));
}

#[test]
fn test_lookup_without_table_fails() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["lookup", "192.0.2.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tldkit download IPTOASN"));
}

#[test]
fn test_build_then_show() {
    let fixture = Fixture::new();
    fixture.write_root_zone(
        r#"[{"domain": ".com", "type": "generic", "manager": "VeriSign Global Registry Services"}]"#,
    );

    fixture
        .cmd()
        .args(["build", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_tlds\": 1"))
        .stdout(predicate::str::contains("\"status\": \"written\""));
    assert!(fixture.root().join("generated/tlds.json").exists());

    fixture
        .cmd()
        .args(["build", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"unchanged\""));

    fixture
        .cmd()
        .args(["show", ".COM", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"tld\": \"com\""))
        .stdout(predicate::str::contains("\"type\": \"gtld\""));

    fixture
        .cmd()
        .args(["show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TLD not found"));
}

#[test]
fn test_build_without_root_zone_fails() {
    let fixture = Fixture::new();
    fixture.cmd().arg("build").assert().failure();
}

#[test]
fn test_config_path() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tldkit.toml"));
}

#[test]
fn test_unknown_download_source() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["download", "ROOT_ZONE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown source"));
}

#[test]
fn test_analyze_all_sources() {
    let fixture = Fixture::new();
    fixture.write_source("iana-tlds.txt", "# Version 2026101500\nCOM\nNET\nXN--P1AI\n");
    fixture.write_root_zone(
        r#"[
            {"domain": ".com", "type": "generic", "manager": "VeriSign"},
            {"domain": ".xn--p1ai", "type": "country-code", "manager": "Coordination Center for TLD RU"},
            {"domain": ".active", "type": "generic", "manager": "Not assigned"}
        ]"#,
    );
    fixture.write_source(
        "iana-rdap.json",
        r#"{"services": [
            [["com", "net"], ["https://rdap.verisign.com/com/v1/"]],
            [["xn--p1ai"], ["https://rdap.tcinet.ru/"]]
        ]}"#,
    );

    let output = fixture.cmd().args(["analyze", "-o", "json"]).output().unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(report["tld_list"]["total"], 3);
    assert_eq!(report["tld_list"]["idns"], 1);
    assert_eq!(report["root_zone"]["total"], 3);
    assert_eq!(report["root_zone"]["undelegated"], 1);
    assert_eq!(report["root_zone"]["delegated"]["idns"], 1);
    assert_eq!(report["rdap"]["total_tlds"], 3);
    assert_eq!(report["rdap"]["unique_servers"], 2);
}

#[test]
fn test_analyze_missing_source_fails() {
    let fixture = Fixture::new();
    fixture.write_source("iana-tlds.txt", "COM\n");

    fixture
        .cmd()
        .args(["analyze", "tlds-txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total TLDs: 1"));

    fixture
        .cmd()
        .args(["analyze", "tlds-txt", "rdap"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("TLD List Analysis"))
        .stderr(predicate::str::contains("Cannot analyze rdap"));
}
