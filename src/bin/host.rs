//! Headless search host reading queries from stdin.
//!
//! Each stdin line is the current query text. Events are written to stdout
//! as newline-delimited JSON; all tracing output goes to stderr so that
//! stdout remains a clean protocol channel.

use std::path::PathBuf;

use clap::Parser;
use quicksearch::{HostConfig, run_bridge};
use quicksearch_core::QueryCoordinator;
use tokio::io::BufReader;

/// quicksearch: batched multi-index search with stale-response fencing.
#[derive(Parser)]
#[command(name = "quicksearch-host", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, env = "QUICKSEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Emit raw results only, without rendered HTML.
    #[arg(long)]
    no_html: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = HostConfig::load(cli.config.as_deref())?;
    if cli.no_html {
        config.render.enabled = false;
    }

    let coordinator = QueryCoordinator::from_config(&config.search)?;
    let renderer = config.renderer()?;

    tracing::info!(enabled = coordinator.is_enabled(), "quicksearch-host starting");

    let stdin = BufReader::new(tokio::io::stdin());
    run_bridge(&coordinator, renderer.as_ref(), stdin, tokio::io::stdout())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "quicksearch-host exited with error");
            anyhow::anyhow!("quicksearch-host failed: {e}")
        })?;

    tracing::info!("quicksearch-host shut down cleanly");
    Ok(())
}
