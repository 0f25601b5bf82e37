use std::sync::Arc;
use async_trait::async_trait;
use tracing::{info, warn};
use crate::error::{Error, Result};
use crate::extractors::ReviewCollector;
use crate::models::{Locale, PageCursor, Platform, ReviewRecord};
use crate::services::appstore::{FeedPage, ReviewFeed};
use crate::utils::sleep_with_jitter;

/// Consecutive empty or failed pages after which the feed is considered done.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 3;

pub struct AppStoreCollector {
    feed: Arc<dyn ReviewFeed>,
    max_pages: u32,
    page_delay_ms: u64,
    jitter_ms: u64,
}

impl AppStoreCollector {
    pub fn new(
        feed: Arc<dyn ReviewFeed>,
        max_pages: u32,
        page_delay_ms: u64,
        jitter_ms: u64,
    ) -> Self {
        Self {
            feed,
            max_pages,
            page_delay_ms,
            jitter_ms,
        }
    }

    /// Fetches one page and converts it as a unit: a malformed entry fails
    /// the whole page.
    async fn collect_page(&self, country: &str, page: u32, app_id: &str) -> Result<Vec<ReviewRecord>> {
        let entries = match self.feed.fetch_page(country, page, app_id).await? {
            FeedPage::Entries(entries) => entries,
            FeedPage::NoEntries => return Ok(Vec::new()),
        };

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            if let Some(record) = entry.into_record()? {
                records.push(record);
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl ReviewCollector for AppStoreCollector {
    fn platform(&self) -> Platform {
        Platform::AppStore
    }

    async fn collect(&self, app_id: &str, locale: &Locale) -> Result<Vec<ReviewRecord>> {
        let country = locale.country.as_str();
        let mut cursor = PageCursor::new(self.max_pages);
        let mut records: Vec<ReviewRecord> = Vec::new();
        let mut reached_server = false;
        let mut last_connect_error = None;

        info!(
            app_id = app_id,
            country = country,
            max_pages = self.max_pages,
            "Starting App Store collection"
        );

        while cursor.in_bounds() {
            let page = cursor.page;

            match self.collect_page(country, page, app_id).await {
                Ok(page_records) if !page_records.is_empty() => {
                    reached_server = true;
                    cursor.record_success();
                    let count = page_records.len();
                    records.extend(page_records);
                    info!(
                        country = country,
                        page = page,
                        reviews = count,
                        total = records.len(),
                        "Collected page"
                    );
                }
                Ok(_) => {
                    reached_server = true;
                    let failures = cursor.record_failure();
                    info!(
                        country = country,
                        page = page,
                        consecutive = failures,
                        "No reviews on page"
                    );
                }
                Err(e) => {
                    if e.is_connect() {
                        last_connect_error = Some(e.to_string());
                    } else {
                        reached_server = true;
                    }
                    let failures = cursor.record_failure();
                    warn!(
                        error = %e,
                        country = country,
                        page = page,
                        consecutive = failures,
                        "Page request failed"
                    );
                }
            }

            if cursor.consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                info!(
                    country = country,
                    page = page,
                    "Too many consecutive empty pages, stopping"
                );
                break;
            }
            if cursor.is_last_page() {
                break;
            }

            sleep_with_jitter(self.page_delay_ms, self.jitter_ms).await;
            cursor.advance();
        }

        if !reached_server {
            if let Some(reason) = last_connect_error {
                return Err(Error::Unreachable {
                    platform: Platform::AppStore,
                    reason,
                });
            }
        }

        for record in records.iter_mut() {
            record.tag(locale);
        }

        info!(
            app_id = app_id,
            country = country,
            reviews = records.len(),
            "Finished App Store collection"
        );

        Ok(records)
    }
}
