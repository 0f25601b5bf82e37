pub mod clients;
pub mod config;
pub mod error;
pub mod extractors;
pub mod models;
pub mod resolver;
pub mod services;
pub mod storage;
pub mod utils;

pub use error::{Error, Result};
pub use extractors::ReviewCollector;
pub use models::{Locale, Platform, ReviewRecord};
pub use services::{CollectionReport, CollectionService};
pub use storage::{CsvStore, ReviewSink};
