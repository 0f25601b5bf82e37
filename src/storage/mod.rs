pub mod csv;
pub mod parquet;

pub use self::csv::{CsvStore, read_reviews, write_reviews};
pub use self::parquet::ParquetConverter;

#[cfg(test)]
use std::collections::HashMap;
use crate::error::Result;
use crate::models::{Platform, ReviewRecord};

/// Which result set is being persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Platform(Platform),
    Combined,
}

impl Dataset {
    pub fn file_stem(&self, prefix: &str) -> String {
        match self {
            Dataset::Platform(platform) => format!("{}_{}_reviews", prefix, platform),
            Dataset::Combined => format!("{}_reviews_combined", prefix),
        }
    }
}

/// Persistence collaborator handed the collected result sets.
pub trait ReviewSink {
    fn write(&mut self, dataset: Dataset, records: &[ReviewRecord]) -> Result<()>;
}

/// Keeps written datasets in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySink {
    datasets: HashMap<Dataset, Vec<ReviewRecord>>,
}

#[cfg(test)]
impl MemorySink {
    pub fn dataset(&self, dataset: Dataset) -> Option<&[ReviewRecord]> {
        self.datasets.get(&dataset).map(Vec::as_slice)
    }
}

#[cfg(test)]
impl ReviewSink for MemorySink {
    fn write(&mut self, dataset: Dataset, records: &[ReviewRecord]) -> Result<()> {
        self.datasets.insert(dataset, records.to_vec());
        Ok(())
    }
}
