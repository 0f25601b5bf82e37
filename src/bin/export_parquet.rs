use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use store_review_etl::config::Settings;
use store_review_etl::storage::{read_reviews, CsvStore, Dataset, ParquetConverter};

/// Converts the combined CSV from a previous run into Parquet.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::new()?;
    let store = CsvStore::new(&settings.output)?;

    let csv_path = store.path_for(Dataset::Combined, "csv");
    let parquet_path = store.path_for(Dataset::Combined, "parquet");

    let reviews = read_reviews(&csv_path)
        .with_context(|| format!("reading {}", csv_path.display()))?;
    info!(rows = reviews.len(), path = %csv_path.display(), "Loaded combined reviews");

    ParquetConverter::convert_reviews_to_parquet(&reviews, &parquet_path)?;

    println!(
        "Wrote {} rows to {}",
        reviews.len(),
        parquet_path.display()
    );

    Ok(())
}
