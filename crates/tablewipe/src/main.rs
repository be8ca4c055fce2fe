//! tablewipe - delete every item from a DynamoDB table.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;
mod dynamodb;
mod prelude;

use crate::cli::Cli;
use crate::config::Config;

/// Log filter used when `RUST_LOG` is unset. Quiet unless `--verbose`, so
/// stderr stays clear of the progress lines on stdout.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "tablewipe=debug,tablewipe_core=debug"
    } else {
        "tablewipe=warn,tablewipe_core=warn"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout carries the progress lines.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(cli.global.is_verbose()).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_cli(&cli)?;
    tracing::debug!(?config, "starting purge");

    dynamodb::run(&config, &cli.global).await?;

    Ok(())
}
