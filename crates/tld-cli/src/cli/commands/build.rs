//! `tldkit build` - aggregate the sources into the dataset.

use anyhow::Result;
use colored::Colorize;
use tld_build::WriteStatus;

use super::Context;
use crate::output::render;

pub fn execute(ctx: &Context) -> Result<()> {
    let paths = ctx.config.build_paths();
    let summary = tld_build::build(&paths)?;

    if let Some(text) = render(ctx.output_format, &summary)? {
        println!("{text}");
    } else {
        let state = match summary.status {
            WriteStatus::Written => "written".green().bold(),
            WriteStatus::Unchanged => "unchanged".yellow(),
            WriteStatus::Error => "error".red().bold(),
        };
        println!("{} {} TLDs", "Built:".bold(), summary.total_tlds);
        println!("  {} {}", "Output:".bold(), summary.output.display());
        println!("  {} {}", "Status:".bold(), state);
        if let Some(size) = summary.file_size {
            println!("  {} {} bytes", "Size:".bold(), size);
        }
    }

    if summary.status == WriteStatus::Error {
        anyhow::bail!(
            "Failed to write {}: {}",
            summary.output.display(),
            summary.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}
