use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use crate::config::OutputConfig;
use crate::error::Result;
use crate::models::ReviewRecord;
use super::{Dataset, ParquetConverter, ReviewSink};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes records as CSV with a leading BOM so spreadsheet tools pick up
/// UTF-8 for Korean and Japanese text.
pub fn write_reviews(path: &Path, records: &[ReviewRecord]) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(UTF8_BOM)?;

    let mut writer = ::csv::Writer::from_writer(file);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_reviews(path: &Path) -> Result<Vec<ReviewRecord>> {
    let bytes = fs::read(path)?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    let mut reader = ::csv::Reader::from_reader(body);
    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<ReviewRecord>, _>>()?;
    Ok(records)
}

/// File-backed sink: one CSV per dataset under the output directory, plus a
/// Parquet copy of the combined set when enabled.
pub struct CsvStore {
    dir: PathBuf,
    prefix: String,
    parquet: bool,
    written: Vec<PathBuf>,
}

impl CsvStore {
    pub fn new(output: &OutputConfig) -> Result<Self> {
        let dir = PathBuf::from(&output.dir);
        fs::create_dir_all(&dir)?;

        Ok(Self {
            dir,
            prefix: output.file_prefix.clone(),
            parquet: output.parquet,
            written: Vec::new(),
        })
    }

    pub fn path_for(&self, dataset: Dataset, extension: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", dataset.file_stem(&self.prefix), extension))
    }

    /// Files written so far, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ReviewSink for CsvStore {
    fn write(&mut self, dataset: Dataset, records: &[ReviewRecord]) -> Result<()> {
        if records.is_empty() {
            warn!(dataset = ?dataset, "Nothing to save, skipping file");
            return Ok(());
        }

        let path = self.path_for(dataset, "csv");
        write_reviews(&path, records)?;
        info!(
            path = %path.display(),
            rows = records.len(),
            "Saved reviews"
        );
        self.written.push(path);

        if self.parquet && dataset == Dataset::Combined {
            let path = self.path_for(dataset, "parquet");
            ParquetConverter::convert_reviews_to_parquet(records, &path)?;
            info!(
                path = %path.display(),
                rows = records.len(),
                "Saved Parquet export"
            );
            self.written.push(path);
        }

        Ok(())
    }
}
