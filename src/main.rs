use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tunefetch::bot;
use tunefetch::cli::Cli;
use tunefetch::config::Config;
use tunefetch::utils;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "tunefetch=debug"
    } else {
        "tunefetch=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Check for required external dependencies (non-fatal in Docker)
    let missing_deps = utils::check_dependencies().await;
    if !missing_deps.is_empty() {
        eprintln!("⚠️  Dependency check warnings:");
        for dep in missing_deps {
            eprintln!("   • {}", dep);
        }
        eprintln!("   (Continuing anyway - tools may be available)");
    }

    // Missing token is fatal: log and exit without starting the dispatcher
    let config = match Config::resolve(&cli) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("configuration error: {err:#}");
            std::process::exit(1);
        }
    };

    bot::run(config).await
}
