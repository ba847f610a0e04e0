//! Legis Tracker CLI
//!
//! Prints the overview of each bill id given on the command line as JSON.
//!
//! ```text
//! legis-tracker 42 57
//! ```

use anyhow::Context;
use legis_tracker::config::Settings;
use legis_tracker::db::DatabaseManager;
use legis_tracker::documents::DocumentClient;
use legis_tracker::Tracker;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let bill_ids = std::env::args()
        .skip(1)
        .map(|arg| {
            arg.parse::<i32>()
                .with_context(|| format!("'{}' is not a bill id", arg))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    if bill_ids.is_empty() {
        anyhow::bail!("usage: legis-tracker <bill-id>...");
    }

    info!("🚀 Starting Legis Tracker...");

    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");

    let database = DatabaseManager::connect(&settings.database)
        .await
        .context("Failed to connect to the database")?;
    database.bootstrap_schema().await?;

    let tracker = Tracker::new(
        Arc::new(database.store()),
        DocumentClient::new(&settings.documents)?,
        settings.reports.clone(),
    );

    for bill_id in bill_ids {
        match tracker.bill_overview(bill_id).await {
            Ok(overview) => println!("{}", serde_json::to_string_pretty(&overview)?),
            Err(e) => {
                e.log();
                error!("❌ Could not build overview of bill {}", bill_id);
                return Err(e.into());
            }
        }
    }

    info!("👋 Done");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,legis_tracker=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();
}
