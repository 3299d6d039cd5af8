//! `tldkit download` - refresh the upstream sources.

use anyhow::Result;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};
use tld_fetch::{DownloadStatus, DownloadTarget, Source};

use super::Context;
use crate::cli::args::DownloadArgs;
use crate::output::render;

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "File")]
    file: String,
}

pub async fn execute(ctx: &Context, args: DownloadArgs) -> Result<()> {
    let sources = if args.sources.is_empty() {
        Source::ALL.to_vec()
    } else {
        args.sources
            .iter()
            .map(|s| s.parse::<Source>())
            .collect::<Result<Vec<_>, _>>()?
    };

    let targets = sources
        .into_iter()
        .map(|source| source.target(&ctx.config.source_dir))
        .collect::<Result<Vec<DownloadTarget>, _>>()?;

    let client = ctx.config.fetch_client()?;
    let results = client
        .download_all(&targets, &ctx.config.metadata_path())
        .await?;

    if let Some(text) = render(ctx.output_format, &results)? {
        println!("{text}");
    } else {
        let rows: Vec<StatusRow> = targets
            .iter()
            .filter_map(|target| {
                let status = results.get(&target.source)?;
                let label = match status {
                    DownloadStatus::Downloaded => "downloaded".green().to_string(),
                    DownloadStatus::NotModified => "not_modified".dimmed().to_string(),
                    DownloadStatus::Error => "error".red().bold().to_string(),
                };
                Some(StatusRow {
                    source: target.source.to_string(),
                    status: label,
                    file: target.path.display().to_string(),
                })
            })
            .collect();
        println!("{}", Table::new(&rows).with(Style::rounded()).to_string());
    }

    let failed = results
        .values()
        .filter(|s| **s == DownloadStatus::Error)
        .count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} downloads failed", results.len());
    }
    Ok(())
}
