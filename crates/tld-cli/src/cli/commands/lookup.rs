//! `tldkit lookup` - resolve addresses against the iptoasn table.

use anyhow::{Context as _, Result};
use colored::Colorize;
use std::net::IpAddr;
use tabled::{settings::Style, Table, Tabled};
use tld_build::asn::read_asn_table;
use tld_build::builder::resolve_ip;
use tld_build::RangeIndex;
use tld_core::{IpRecord, TldError};

use super::Context;
use crate::cli::args::LookupArgs;
use crate::output::render;

#[derive(Tabled)]
struct IpRow {
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "ASN")]
    asn: u32,
    #[tabled(rename = "Organization")]
    org: String,
    #[tabled(rename = "Country")]
    country: String,
}

impl From<&IpRecord> for IpRow {
    fn from(record: &IpRecord) -> Self {
        Self {
            ip: record.address.clone(),
            asn: record.asn,
            org: record.org_name.clone(),
            country: record.country.clone(),
        }
    }
}

pub fn execute(ctx: &Context, args: &LookupArgs) -> Result<()> {
    for ip in &args.ips {
        ip.trim()
            .parse::<IpAddr>()
            .map_err(|_| TldError::InvalidIp(ip.clone()))?;
    }

    let path = ctx.config.build_paths().asn_table;
    let entries = read_asn_table(&path).with_context(|| {
        format!(
            "Cannot load ASN table {}; run `tldkit download IPTOASN` first",
            path.display()
        )
    })?;
    let index = RangeIndex::build(entries);

    let records: Vec<IpRecord> = args
        .ips
        .iter()
        .map(|ip| resolve_ip(ip.trim(), Some(&index)))
        .collect();

    if let Some(text) = render(ctx.output_format, &records)? {
        println!("{text}");
        return Ok(());
    }

    let rows: Vec<IpRow> = records.iter().map(IpRow::from).collect();
    println!("{}", Table::new(&rows).with(Style::rounded()).to_string());

    let misses = records.iter().filter(|r| r.is_unknown()).count();
    if misses > 0 {
        println!("{} {misses} address(es) not covered by any range", "Note:".yellow());
    }
    Ok(())
}
