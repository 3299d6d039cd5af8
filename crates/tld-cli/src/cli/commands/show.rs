//! `tldkit show` - print one record of the generated dataset.

use anyhow::{Context as _, Result};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};
use tld_core::{Dataset, TldRecord};

use super::Context;
use crate::cli::args::ShowArgs;
use crate::output::render;

#[derive(Tabled)]
struct NameserverRow {
    #[tabled(rename = "Nameserver")]
    hostname: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "ASN")]
    asn: u32,
    #[tabled(rename = "Organization")]
    org: String,
    #[tabled(rename = "Country")]
    country: String,
}

pub fn execute(ctx: &Context, args: &ShowArgs) -> Result<()> {
    let path = ctx.config.build_paths().output;
    let content = std::fs::read_to_string(&path).with_context(|| {
        format!(
            "Cannot read dataset {}; run `tldkit build` first",
            path.display()
        )
    })?;
    let dataset: Dataset = serde_json::from_str(&content)
        .with_context(|| format!("Invalid dataset {}", path.display()))?;

    let record = dataset
        .find(&args.tld)
        .ok_or_else(|| anyhow::anyhow!("TLD not found in dataset: {}", args.tld))?;

    if let Some(text) = render(ctx.output_format, record)? {
        println!("{text}");
    } else {
        print_record_pretty(record);
    }
    Ok(())
}

fn print_record_pretty(record: &TldRecord) {
    let heading = match &record.unicode_label {
        Some(unicode) => format!(".{} ({unicode})", record.label),
        None => format!(".{}", record.label),
    };
    println!("{} {}", "TLD:".bold(), heading.cyan().bold());
    println!();

    field("Type", Some(&format!("{} ({})", record.registry_tag, kind_label(record))));
    field("Delegated", Some(if record.delegated { "yes" } else { "no" }));
    field("Manager", record.organizations.manager.as_deref());
    field("Manager alias", record.annotations.tld_manager_alias.as_deref());
    field("Admin", record.organizations.admin.as_deref());
    field("Tech", record.organizations.tech.as_deref());
    field("Country", record.annotations.country_name.as_deref());
    field("Script", record.script.as_deref());
    field("Registry URL", record.registry_url.as_deref());
    field("WHOIS", record.whois_server.as_deref());
    if let Some(rdap) = &record.rdap {
        let source = serde_json::to_value(rdap.source)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_default();
        field("RDAP", Some(&format!("{} [{}]", rdap.server, source.dimmed())));
    }
    field("Created", record.created_date.as_deref());
    if let Some(updated) = &record.updated_dates {
        field("Updated", Some(&updated.join(", ")));
    }
    if let Some(types) = &record.annotations.agreement_types {
        field("Agreement", Some(&types.join(", ")));
    }
    if let Some(aliases) = &record.annotations.operator_aliases {
        let aliases: Vec<&str> = aliases.iter().map(String::as_str).collect();
        field("Operators", Some(&aliases.join(", ")));
    }
    if let Some(variants) = &record.idn_variants {
        field("IDN variants", Some(&variants.join(", ")));
    }

    if let Some(nameservers) = &record.nameservers {
        let rows: Vec<NameserverRow> = nameservers
            .iter()
            .flat_map(|ns| {
                ns.addresses().map(|ip| NameserverRow {
                    hostname: ns.hostname.clone(),
                    ip: ip.address.clone(),
                    asn: ip.asn,
                    org: ip.org_name.clone(),
                    country: ip.country.clone(),
                })
            })
            .collect();
        if !rows.is_empty() {
            println!();
            println!("{}", "Nameservers:".bold().underline());
            println!("{}", Table::new(&rows).with(Style::rounded()).to_string());
        }
    }
}

fn field(name: &str, value: Option<impl AsRef<str>>) {
    if let Some(value) = value {
        println!("  {} {}", format!("{name}:").bold(), value.as_ref());
    }
}

const fn kind_label(record: &TldRecord) -> &'static str {
    if record.kind.is_country_code() {
        "ccTLD"
    } else {
        "gTLD"
    }
}
