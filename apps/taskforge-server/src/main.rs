//! Taskforge server binary.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

mod config;
mod server;

use config::AppConfig;

/// Checklist backend with provider-verified identities.
#[derive(Debug, Parser)]
#[command(name = "taskforge-server", version, about)]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(long, short = 'c', default_value = "config/taskforge.yaml")]
    config: PathBuf,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;

    if args.print_config {
        println!(
            "{}",
            serde_json::to_string_pretty(&config).context("serializing configuration")?
        );
        return Ok(());
    }

    init_tracing(&config);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting taskforge server");

    server::run(config).await
}

/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
