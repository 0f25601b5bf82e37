use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use store_review_etl::clients::ClientPool;
use store_review_etl::config::Settings;
use store_review_etl::{CollectionService, CsvStore};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::new()?;

    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    info!(started_at = %timestamp, "Starting review collection");

    let client_pool = Arc::new(ClientPool::new(&settings.api)?);
    let service = CollectionService::from_settings(&settings, client_pool)?;
    let mut store = CsvStore::new(&settings.output)?;

    let report = service.run(&mut store).await?;

    println!("\nCollection Summary:");
    println!("Timestamp: {}", timestamp);
    for (platform, count) in &report.per_platform {
        println!("{} reviews: {}", platform, count);
    }
    println!("Combined (deduplicated): {}", report.combined);
    println!("Total Time: {:.2} minutes", report.elapsed.as_secs_f64() / 60.0);
    for path in store.written() {
        println!("Output File: {}", path.display());
    }
    if store.written().is_empty() {
        println!("No reviews collected, no files written");
    }

    Ok(())
}
