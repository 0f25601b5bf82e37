use chrono::{DateTime, NaiveDateTime};
use rand::Rng;
use std::time::Duration;

const NORMALIZED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub async fn sleep_with_jitter(base_ms: u64, jitter_ms: u64) {
    let jitter = if jitter_ms == 0 {
        0
    } else {
        rand::rng().random_range(0..=jitter_ms)
    };
    let total = base_ms + jitter;
    if total > 0 {
        tokio::time::sleep(Duration::from_millis(total)).await;
    }
}

/// Formats an RFC 3339 timestamp as `YYYY-MM-DD HH:MM:SS` in UTC. Values
/// that are already normalized or cannot be parsed are returned unchanged.
pub fn normalize_timestamp(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return parsed.naive_utc().format(NORMALIZED_FORMAT).to_string();
    }
    if NaiveDateTime::parse_from_str(trimmed, NORMALIZED_FORMAT).is_ok() {
        return trimmed.to_string();
    }
    raw.to_string()
}
