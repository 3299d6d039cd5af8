//! tldkit - build and query the TLD dataset

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tld_cli::run().await
}
