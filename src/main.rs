mod config;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use togglsheet_core::remote::sheets::GoogleSheet;
use togglsheet_core::remote::toggl::TogglClient;
use togglsheet_core::{SyncConfig, SyncReport, Synchronizer};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use config::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = args.into_config().context("Invalid configuration")?;
    let report = run(&config).await?;

    println!("{}", render::report(&report, &config));
    Ok(())
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("togglsheet={log_level},togglsheet_core={log_level},warn").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(config: &SyncConfig) -> Result<SyncReport> {
    info!(
        sheet = %config.sheet_key,
        worksheet = %config.worksheet,
        projects = config.options.projects.len(),
        "Starting sync"
    );

    let source = TogglClient::from_config(config).context("Failed to set up Toggl client")?;
    let sheet = GoogleSheet::connect(config)
        .await
        .context("Failed to open Google Sheet")?;

    Synchronizer::new(source, sheet, config.options.clone())
        .run()
        .await
        .context("Sync failed")
}
