//! `tldkit analyze` - summary statistics over the downloaded sources.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use tld_build::analyze::{
    analyze_rdap, analyze_root_zone, analyze_tld_list, RdapStats, RootZoneStats, TldListStats,
    GENERIC_TAGS,
};
use tld_build::sources::{read_rdap_bootstrap, read_root_zone};
use tld_core::TldError;
use tracing::warn;

use super::Context;
use crate::cli::args::{AnalyzeArgs, AnalyzeTarget};
use crate::output::render;

#[derive(Debug, Default, Serialize)]
struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    tld_list: Option<TldListStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    root_zone: Option<RootZoneStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rdap: Option<RdapStats>,
}

pub fn execute(ctx: &Context, args: &AnalyzeArgs) -> Result<()> {
    let targets = if args.targets.is_empty() {
        AnalyzeTarget::ALL.to_vec()
    } else {
        args.targets.clone()
    };
    let paths = ctx.config.build_paths();

    let mut report = Report::default();
    let mut failed = Vec::new();
    for target in targets {
        let outcome = match target {
            AnalyzeTarget::TldsTxt => std::fs::read_to_string(&paths.tld_list)
                .map_err(|e| TldError::io(&paths.tld_list, e))
                .map(|text| report.tld_list = Some(analyze_tld_list(&text))),
            AnalyzeTarget::RootDb => read_root_zone(&paths.root_zone)
                .map(|entries| report.root_zone = Some(analyze_root_zone(&entries))),
            AnalyzeTarget::Rdap => require(&paths.rdap_bootstrap).map(|()| {
                report.rdap = Some(analyze_rdap(&read_rdap_bootstrap(&paths.rdap_bootstrap)));
            }),
        };
        if let Err(e) = outcome {
            warn!(source = target.name(), error = %e, "Cannot analyze source");
            failed.push(target.name());
        }
    }

    if let Some(text) = render(ctx.output_format, &report)? {
        println!("{text}");
    } else {
        print_report(&report);
    }

    if !failed.is_empty() {
        anyhow::bail!(
            "Cannot analyze {}; run `tldkit download` first",
            failed.join(", ")
        );
    }
    Ok(())
}

// the bootstrap reader degrades a missing file to an empty lookup
fn require(path: &Path) -> Result<(), TldError> {
    std::fs::metadata(path)
        .map(|_| ())
        .map_err(|e| TldError::io(path, e))
}

fn print_report(report: &Report) {
    let mut sections = 0;

    if let Some(stats) = &report.tld_list {
        println!("{}", "TLD List Analysis:".bold());
        println!("  Total TLDs: {}", stats.total);
        println!("  IDNs (xn--): {}", stats.idns);
        sections += 1;
    }

    if let Some(stats) = &report.root_zone {
        if sections > 0 {
            println!();
        }
        print_root_zone(stats);
        sections += 1;
    }

    if let Some(stats) = &report.rdap {
        if sections > 0 {
            println!();
        }
        println!("{}", "RDAP Bootstrap Analysis:".bold());
        println!("  Total TLDs: {}", stats.total_tlds);
        println!("  Unique RDAP Servers: {}", stats.unique_servers);
    }
}

fn print_root_zone(stats: &RootZoneStats) {
    let delegated = &stats.delegated;
    println!("{}", "Root Zone Database Analysis:".bold());
    println!("  Total TLDs: {}", stats.total);
    println!();
    println!("  Delegated:");
    println!("    Total: {}", delegated.total);
    println!("    Unique TLD Managers: {}", delegated.unique_managers);
    println!("      Unique gTLD Managers: {}", delegated.unique_gtld_managers);
    println!("      Unique ccTLD Managers: {}", delegated.unique_cctld_managers);
    println!();
    println!("    IDN Statistics:");
    println!("      Total IDNs: {}", delegated.idns);
    for (tag, count) in &delegated.idns_by_tag {
        println!("        {tag} IDNs: {count}");
    }
    println!();
    println!("    By Type:");
    println!("      Generic: {}", delegated.generic);
    for tag in GENERIC_TAGS {
        if let Some(count) = delegated.by_tag.get(*tag) {
            println!("        {tag}: {count}");
        }
    }
    if let Some(count) = delegated.by_tag.get("country-code") {
        println!("      Country-code: {count}");
    }
    println!();
    println!("  Undelegated:");
    println!("    Total: {}", stats.undelegated);
}
