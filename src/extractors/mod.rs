pub mod appstore;
pub mod googleplay;

use async_trait::async_trait;
use crate::error::Result;
use crate::models::{Locale, Platform, ReviewRecord};

pub use appstore::AppStoreCollector;
pub use googleplay::GooglePlayCollector;

/// Produces the reviews of one app for one locale. Implementations own
/// their pagination strategy and absorb per-request failures; a degraded run
/// returns fewer records rather than an error.
#[async_trait]
pub trait ReviewCollector: Send + Sync {
    fn platform(&self) -> Platform;

    async fn collect(&self, app_id: &str, locale: &Locale) -> Result<Vec<ReviewRecord>>;
}
