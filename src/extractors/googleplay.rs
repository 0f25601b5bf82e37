use std::sync::Arc;
use async_trait::async_trait;
use tracing::{info, warn};
use crate::error::{Error, Result};
use crate::extractors::ReviewCollector;
use crate::models::{ContinuationCursor, Locale, Platform, ReviewRecord};
use crate::services::googleplay::ReviewListing;
use crate::utils::{dedup_by_review_id, sleep_with_jitter};

/// Largest batch the listing endpoint returns per call.
pub const MAX_PAGE_SIZE: u32 = 200;

pub struct GooglePlayCollector {
    listing: Arc<dyn ReviewListing>,
    page_size: u32,
    request_delay_ms: u64,
    jitter_ms: u64,
}

impl GooglePlayCollector {
    pub fn new(
        listing: Arc<dyn ReviewListing>,
        page_size: u32,
        request_delay_ms: u64,
        jitter_ms: u64,
    ) -> Self {
        Self {
            listing,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            request_delay_ms,
            jitter_ms,
        }
    }
}

#[async_trait]
impl ReviewCollector for GooglePlayCollector {
    fn platform(&self) -> Platform {
        Platform::GooglePlay
    }

    async fn collect(&self, app_id: &str, locale: &Locale) -> Result<Vec<ReviewRecord>> {
        let lang = locale.lang_or_empty();
        let country = locale.country.as_str();
        let mut cursor = ContinuationCursor::new();
        let mut records: Vec<ReviewRecord> = Vec::new();

        info!(
            app_id = app_id,
            lang = lang,
            country = country,
            page_size = self.page_size,
            "Starting Google Play collection"
        );

        loop {
            let request = cursor.begin_request();

            let page = match self
                .listing
                .list_reviews(app_id, lang, country, self.page_size, cursor.token.as_deref())
                .await
            {
                Ok(page) => page,
                Err(e) if request == 1 && e.is_connect() => {
                    return Err(Error::Unreachable {
                        platform: Platform::GooglePlay,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    // Indistinguishable from a short listing downstream; the
                    // warning is the only trace of the truncation.
                    warn!(
                        error = %e,
                        request = request,
                        collected = records.len(),
                        "Listing request failed, keeping partial results"
                    );
                    break;
                }
            };

            if page.reviews.is_empty() {
                info!(request = request, "No more reviews");
                break;
            }

            let batch = page.reviews.len();
            for review in page.reviews {
                match review.into_record() {
                    Ok(record) => records.push(record),
                    Err(e) => warn!(error = %e, request = request, "Skipping review"),
                }
            }

            info!(
                request = request,
                reviews = batch,
                total = records.len(),
                "Collected batch"
            );

            if !cursor.advance(page.next_token) {
                info!(request = request, "Reached last page");
                break;
            }

            sleep_with_jitter(self.request_delay_ms, self.jitter_ms).await;
        }

        let collected = records.len();
        let mut records = dedup_by_review_id(records);
        if records.len() != collected {
            info!(
                before = collected,
                after = records.len(),
                "Removed duplicate reviews"
            );
        }

        for record in records.iter_mut() {
            record.tag(locale);
        }

        info!(
            app_id = app_id,
            lang = lang,
            country = country,
            reviews = records.len(),
            "Finished Google Play collection"
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;
    use crate::clients::ClientPool;
    use crate::config::ApiConfig;
    use crate::models::{PlayReview, ReviewPage};
    use crate::services::PlayStoreApi;

    /// Replays scripted pages and records the tokens it was called with.
    struct ScriptedListing {
        pages: Mutex<Vec<Result<ReviewPage>>>,
        tokens: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedListing {
        fn new(mut pages: Vec<Result<ReviewPage>>) -> Arc<Self> {
            pages.reverse();
            Arc::new(Self {
                pages: Mutex::new(pages),
                tokens: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Option<String>> {
            self.tokens.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReviewListing for ScriptedListing {
        async fn list_reviews(
            &self,
            _app_id: &str,
            _lang: &str,
            _country: &str,
            _count: u32,
            token: Option<&str>,
        ) -> Result<ReviewPage> {
            self.tokens.lock().unwrap().push(token.map(str::to_string));
            self.pages
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(ReviewPage::default()))
        }
    }

    fn review(id: &str) -> PlayReview {
        PlayReview {
            review_id: Some(id.to_string()),
            user_name: Some(format!("user-{}", id)),
            content: Some(format!("content-{}", id)),
            score: Some(5),
            ..Default::default()
        }
    }

    fn page(ids: &[&str], token: Option<&str>) -> Result<ReviewPage> {
        Ok(ReviewPage {
            reviews: ids.iter().map(|id| review(id)).collect(),
            next_token: token.map(str::to_string),
        })
    }

    fn collector(listing: Arc<ScriptedListing>) -> GooglePlayCollector {
        GooglePlayCollector::new(listing, 200, 0, 0)
    }

    fn ids(records: &[ReviewRecord]) -> Vec<&str> {
        records.iter().map(|r| r.review_id.as_str()).collect()
    }

    #[tokio::test]
    async fn follows_token_until_exhausted() {
        let listing = ScriptedListing::new(vec![
            page(&["a", "b"], Some("t1")),
            page(&["c"], None),
        ]);

        let records = collector(listing.clone())
            .collect("com.example", &Locale::new("ko", "kr"))
            .await
            .unwrap();

        assert_eq!(ids(&records), vec!["a", "b", "c"]);
        assert_eq!(listing.calls(), vec![None, Some("t1".to_string())]);
        assert!(records.iter().all(|r| r.lang == "ko" && r.country == "kr"));
    }

    #[tokio::test]
    async fn error_keeps_partial_results() {
        let listing = ScriptedListing::new(vec![
            page(&["a", "b"], Some("t1")),
            Err(Error::MalformedResponse("boom".to_string())),
            page(&["never"], None),
        ]);

        let records = collector(listing.clone())
            .collect("com.example", &Locale::new("ko", "kr"))
            .await
            .unwrap();

        assert_eq!(ids(&records), vec!["a", "b"]);
        assert_eq!(listing.calls().len(), 2);
    }

    #[tokio::test]
    async fn empty_batch_terminates() {
        let listing = ScriptedListing::new(vec![
            page(&["a"], Some("t1")),
            page(&[], Some("t2")),
        ]);

        let records = collector(listing.clone())
            .collect("com.example", &Locale::new("en", "us"))
            .await
            .unwrap();

        assert_eq!(ids(&records), vec!["a"]);
        assert_eq!(listing.calls().len(), 2);
    }

    #[tokio::test]
    async fn duplicate_ids_keep_first() {
        let listing = ScriptedListing::new(vec![
            page(&["a", "b"], Some("t1")),
            page(&["b", "c"], None),
        ]);

        let records = collector(listing)
            .collect("com.example", &Locale::new("ko", "kr"))
            .await
            .unwrap();

        assert_eq!(ids(&records), vec!["a", "b", "c"]);
        assert_eq!(records[1].author, "user-b");
    }

    #[tokio::test]
    async fn reviews_without_score_are_skipped() {
        let mut unscored = review("x");
        unscored.score = None;
        let listing = ScriptedListing::new(vec![Ok(ReviewPage {
            reviews: vec![unscored, review("y")],
            next_token: None,
        })]);

        let records = collector(listing)
            .collect("com.example", &Locale::new("ko", "kr"))
            .await
            .unwrap();

        assert_eq!(ids(&records), vec!["y"]);
    }

    #[test]
    fn page_size_is_clamped() {
        let listing = ScriptedListing::new(Vec::new());
        assert_eq!(GooglePlayCollector::new(listing.clone(), 500, 0, 0).page_size, MAX_PAGE_SIZE);
        assert_eq!(GooglePlayCollector::new(listing, 0, 0, 0).page_size, 1);
    }

    #[tokio::test]
    async fn refused_first_call_is_unreachable() {
        let pool = Arc::new(ClientPool::new(&ApiConfig::default()).unwrap());
        // Nothing listens on port 1.
        let listing = Arc::new(PlayStoreApi::new(pool, "http://127.0.0.1:1"));

        let err = GooglePlayCollector::new(listing, 200, 0, 0)
            .collect("com.example", &Locale::new("ko", "kr"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unreachable { platform: Platform::GooglePlay, .. }));
    }

    #[tokio::test]
    async fn non_connect_failure_on_first_call_is_empty_result() {
        let listing = ScriptedListing::new(vec![Err(Error::MalformedResponse("boom".to_string()))]);

        let records = collector(listing.clone())
            .collect("com.example", &Locale::new("ko", "kr"))
            .await
            .unwrap();

        assert!(records.is_empty());
        assert_eq!(listing.calls().len(), 1);
    }

    async fn elapsed_collecting(listing: Arc<ScriptedListing>) -> Duration {
        let collector = GooglePlayCollector::new(listing, 200, 500, 0);
        let started = tokio::time::Instant::now();
        collector
            .collect("com.example", &Locale::new("ko", "kr"))
            .await
            .unwrap();
        started.elapsed()
    }

    #[tokio::test(start_paused = true)]
    async fn waits_between_requests_only() {
        let listing = ScriptedListing::new(vec![
            page(&["a"], Some("t1")),
            page(&["b"], Some("t2")),
            page(&["c"], None),
        ]);

        let elapsed = elapsed_collecting(listing.clone()).await;

        assert_eq!(listing.calls().len(), 3);
        assert!(elapsed >= Duration::from_millis(1000), "{:?}", elapsed);
        assert!(elapsed < Duration::from_millis(1500), "{:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn no_pause_after_last_token() {
        let listing = ScriptedListing::new(vec![page(&["a"], None)]);

        let elapsed = elapsed_collecting(listing.clone()).await;

        assert_eq!(listing.calls().len(), 1);
        assert!(elapsed < Duration::from_millis(500), "{:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn no_pause_after_failed_request() {
        let listing = ScriptedListing::new(vec![
            page(&["a"], Some("t1")),
            Err(Error::MalformedResponse("boom".to_string())),
        ]);

        let elapsed = elapsed_collecting(listing.clone()).await;

        assert_eq!(listing.calls().len(), 2);
        assert!(elapsed >= Duration::from_millis(500), "{:?}", elapsed);
        assert!(elapsed < Duration::from_millis(1000), "{:?}", elapsed);
    }
}
