//! Coupang sync entry point.

use anyhow::Result;
use jobsync::{run_cycle, CoupangSource, SheetsConfig, SheetsStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,jobsync=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
    dotenvy::dotenv().ok();

    let config = CoupangSource::config();
    let sheets = SheetsConfig::from_env(&config.spreadsheet_env_var)?;
    let source = CoupangSource::new()?;
    let store = SheetsStore::new(sheets)?;

    run_cycle(&config, &source, &store).await?;
    Ok(())
}
