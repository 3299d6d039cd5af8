//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Build and query the TLD dataset
///
/// Aggregates the IANA root zone, RDAP bootstrap, ICANN registry agreements
/// and iptoasn data into one record per top-level domain.
#[derive(Parser, Debug)]
#[command(name = "tldkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (or set TLDKIT_CONFIG env var)
    #[arg(short, long, env = "TLDKIT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build tlds.json from the local sources
    Build,

    /// Download the upstream sources
    Download(DownloadArgs),

    /// Report statistics over the downloaded sources
    Analyze(AnalyzeArgs),

    /// Resolve IP addresses to their ASN, organization and country
    Lookup(LookupArgs),

    /// Show one TLD from the generated dataset
    Show(ShowArgs),

    /// Inspect CLI configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Sources to download (RDAP_BOOTSTRAP, TLD_LIST, REGISTRY_AGREEMENT_TABLE, IPTOASN); all when omitted
    pub sources: Vec<String>,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Sources to analyze; all when omitted
    #[arg(value_enum)]
    pub targets: Vec<AnalyzeTarget>,
}

/// A source `tldkit analyze` knows how to summarize
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnalyzeTarget {
    /// IANA TLD list
    TldsTxt,
    /// Root zone table
    RootDb,
    /// RDAP bootstrap file
    Rdap,
}

impl AnalyzeTarget {
    pub const ALL: [Self; 3] = [Self::TldsTxt, Self::RootDb, Self::Rdap];

    /// Name as accepted on the command line
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TldsTxt => "tlds-txt",
            Self::RootDb => "root-db",
            Self::Rdap => "rdap",
        }
    }
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// IPv4 or IPv6 addresses
    #[arg(required = true)]
    pub ips: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// TLD label, ASCII or Unicode, with or without the leading dot
    pub tld: String,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Show which config file is in use
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tldkit", "lookup", "192.0.2.1", "::1", "-o", "json", "-v"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        match cli.command {
            Commands::Lookup(args) => assert_eq!(args.ips, vec!["192.0.2.1", "::1"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_lookup_requires_an_address() {
        assert!(Cli::try_parse_from(["tldkit", "lookup"]).is_err());
    }

    #[test]
    fn test_analyze_targets() {
        let cli = Cli::try_parse_from(["tldkit", "analyze", "tlds-txt", "rdap"]).unwrap();
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.targets, vec![AnalyzeTarget::TldsTxt, AnalyzeTarget::Rdap]);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["tldkit", "analyze", "whois"]).is_err());
    }

    #[test]
    fn test_download_sources_optional() {
        let cli = Cli::try_parse_from(["tldkit", "download"]).unwrap();
        match cli.command {
            Commands::Download(args) => assert!(args.sources.is_empty()),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
