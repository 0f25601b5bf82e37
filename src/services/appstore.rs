use std::sync::Arc;
use async_trait::async_trait;
use tracing::{error, debug};
use crate::clients::ClientPool;
use crate::error::{Result, Error};
use crate::models::{FeedEntry, FeedResponse};

/// Outcome of a successfully fetched feed page.
#[derive(Debug)]
pub enum FeedPage {
    Entries(Vec<FeedEntry>),
    /// The payload has no `feed.entry`; past the last page the feed keeps
    /// answering 200 with an empty feed.
    NoEntries,
}

/// Source of customer-review feed pages, addressed by country and page number.
#[async_trait]
pub trait ReviewFeed: Send + Sync {
    async fn fetch_page(&self, country: &str, page: u32, app_id: &str) -> Result<FeedPage>;
}

#[derive(Clone)]
pub struct AppStoreFeed {
    client_pool: Arc<ClientPool>,
    base_url: String,
}

impl AppStoreFeed {
    pub fn new(client_pool: Arc<ClientPool>, base_url: &str) -> Self {
        Self {
            client_pool,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn page_url(&self, country: &str, page: u32, app_id: &str) -> String {
        format!(
            "{}/{}/rss/customerreviews/page={}/id={}/sortby=mostrecent/json",
            self.base_url, country, page, app_id
        )
    }
}

#[async_trait]
impl ReviewFeed for AppStoreFeed {
    async fn fetch_page(&self, country: &str, page: u32, app_id: &str) -> Result<FeedPage> {
        let url = self.page_url(country, page, app_id);
        let client = self.client_pool.next_client();

        let response = client.send(client.get(&url)).await?;
        let status = response.status();

        debug!(
            status = status.as_u16(),
            url = url,
            "Feed response received"
        );

        if !status.is_success() {
            return Err(Error::Status(status));
        }

        let body = response.bytes().await?;
        let parsed: FeedResponse = serde_json::from_slice(&body).map_err(|e| {
            error!(
                error = %e,
                body_len = body.len(),
                url = url,
                "Failed to parse review feed"
            );
            Error::from(e)
        })?;

        Ok(match parsed.feed.and_then(|f| f.entry) {
            Some(entries) => FeedPage::Entries(entries.into_vec()),
            None => FeedPage::NoEntries,
        })
    }
}
