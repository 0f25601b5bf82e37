use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use crate::clients::ClientPool;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::extractors::{AppStoreCollector, GooglePlayCollector, ReviewCollector};
use crate::models::{Locale, Platform, ReviewRecord};
use crate::resolver;
use crate::services::appstore::AppStoreFeed;
use crate::services::googleplay::PlayStoreApi;
use crate::storage::{Dataset, ReviewSink};
use crate::utils::{dedup_merged, normalize_timestamp};

/// One platform's collector, the app it targets and the locales to sweep.
pub struct PlatformPlan {
    pub collector: Box<dyn ReviewCollector>,
    pub app_id: String,
    pub locales: Vec<Locale>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionReport {
    pub per_platform: Vec<(Platform, usize)>,
    pub combined: usize,
    pub elapsed: Duration,
}

pub struct CollectionService {
    plans: Vec<PlatformPlan>,
}

impl CollectionService {
    pub fn new(plans: Vec<PlatformPlan>) -> Self {
        Self { plans }
    }

    /// Resolves both app ids and wires the HTTP-backed collectors. Fails
    /// before any request is made when an id cannot be resolved.
    pub fn from_settings(settings: &Settings, client_pool: Arc<ClientPool>) -> Result<Self> {
        let appstore_id = resolve_app(Platform::AppStore, &settings.apps.appstore_url)?;
        let googleplay_id = resolve_app(Platform::GooglePlay, &settings.apps.googleplay_url)?;

        info!(
            appstore_id = %appstore_id,
            googleplay_id = %googleplay_id,
            "Resolved app identifiers"
        );

        let jitter_ms = settings.api.delay_jitter_ms;

        let appstore = AppStoreCollector::new(
            Arc::new(AppStoreFeed::new(client_pool.clone(), &settings.appstore.base_url)),
            settings.appstore.max_pages,
            settings.appstore.page_delay_ms,
            jitter_ms,
        );

        let googleplay = GooglePlayCollector::new(
            Arc::new(PlayStoreApi::new(client_pool, &settings.googleplay.base_url)),
            settings.googleplay.page_size,
            settings.googleplay.request_delay_ms,
            jitter_ms,
        );

        Ok(Self::new(vec![
            PlatformPlan {
                collector: Box::new(appstore),
                app_id: appstore_id,
                locales: settings.appstore.locales(),
            },
            PlatformPlan {
                collector: Box::new(googleplay),
                app_id: googleplay_id,
                locales: settings.googleplay.locales.clone(),
            },
        ]))
    }

    /// Runs every locale of one plan in order and concatenates the results.
    ///
    /// An unreachable store aborts only when `first_in_run` is set and the
    /// failing locale is the plan's first, so nothing has been collected yet.
    /// Otherwise the locale is skipped and collection goes on.
    pub async fn collect_platform(
        &self,
        plan: &PlatformPlan,
        first_in_run: bool,
    ) -> Result<Vec<ReviewRecord>> {
        let platform = plan.collector.platform();
        let mut records = Vec::new();

        for (index, locale) in plan.locales.iter().enumerate() {
            let mut batch = match plan.collector.collect(&plan.app_id, locale).await {
                Ok(batch) => batch,
                Err(e @ Error::Unreachable { .. }) if !(first_in_run && index == 0) => {
                    warn!(
                        error = %e,
                        platform = %platform,
                        locale = %locale,
                        "Store unreachable, skipping locale"
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };
            for record in batch.iter_mut() {
                normalize(record, platform, locale);
            }
            info!(
                platform = %platform,
                locale = %locale,
                reviews = batch.len(),
                "Locale collected"
            );
            records.extend(batch);
        }

        Ok(records)
    }

    pub async fn run(&self, sink: &mut dyn ReviewSink) -> Result<CollectionReport> {
        let started = Instant::now();
        let mut collected = Vec::with_capacity(self.plans.len());

        for (index, plan) in self.plans.iter().enumerate() {
            let platform = plan.collector.platform();
            let records = self.collect_platform(plan, index == 0).await?;
            info!(
                platform = %platform,
                reviews = records.len(),
                "Platform collected"
            );
            collected.push((platform, records));
        }

        let mut per_platform = Vec::with_capacity(collected.len());
        let mut merged = Vec::new();
        for (platform, records) in collected {
            if records.is_empty() {
                warn!(platform = %platform, "No reviews collected");
            }
            sink.write(Dataset::Platform(platform), &records)?;
            per_platform.push((platform, records.len()));
            merged.extend(records);
        }

        let before = merged.len();
        let combined = dedup_merged(merged);
        info!(
            before = before,
            after = combined.len(),
            "Merged result sets"
        );
        sink.write(Dataset::Combined, &combined)?;

        Ok(CollectionReport {
            per_platform,
            combined: combined.len(),
            elapsed: started.elapsed(),
        })
    }
}

fn resolve_app(platform: Platform, url: &str) -> Result<String> {
    match resolver::detect_platform(url) {
        Some(detected) if detected != platform => {
            warn!(url = %url, expected = %platform, detected = %detected, "URL host belongs to another store");
        }
        None => warn!(url = %url, expected = %platform, "Unrecognized store host"),
        _ => {}
    }
    resolver::resolve(platform, url)
}

fn normalize(record: &mut ReviewRecord, platform: Platform, locale: &Locale) {
    record.platform = platform;
    record.tag(locale);
    record.updated = normalize_timestamp(&record.updated);
    if let Some(replied_at) = record.replied_at.as_mut() {
        *replied_at = normalize_timestamp(replied_at);
    }
}
