use anyhow::{Context, Result};
use clap::Parser;
use svdsync::{Config, RunOptions, Syncer};
use svdsync_fetch::ReqwestClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Mirror STM32 SVD archives into this repository.
///
/// Runs in the current directory: family directories and the staging area
/// `raw/` live next to `README.md`.
#[derive(Debug, Parser)]
#[command(name = "svdsync", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Cli {
    /// Download fresh archives instead of reusing the staged ones
    #[arg(short = 'd', long = "download")]
    download: bool,

    /// Commit README.md and the family directories afterwards
    #[arg(short = 'c', long = "commit")]
    commit: bool,
}

/// Text logs on stderr, filtered by `RUST_LOG` (default `info`).
fn initialize_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_tracing();

    let root = std::env::current_dir().context("failed to determine working directory")?;
    let config = Config::load(&root).context("failed to load configuration")?;
    let client = ReqwestClient::new().context("failed to build HTTP client")?;

    let options = RunOptions {
        download: cli.download,
        commit: cli.commit,
    };
    let report = Syncer::new(client, config, root).run(options).await?;

    info!(
        families = report.families.len(),
        committed = ?report.commit,
        "sync finished"
    );
    Ok(())
}
