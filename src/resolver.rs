//! Extracts store-specific app identifiers from storefront URLs.

use reqwest::Url;
use crate::error::{Error, Result};
use crate::models::Platform;

fn parse(url: &str) -> Result<Url> {
    Url::parse(url.trim()).map_err(|e| Error::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

fn not_found(platform: Platform, url: &str) -> Error {
    Error::IdentifierNotFound {
        platform,
        url: url.to_string(),
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `https://apps.apple.com/kr/app/vrew/id1477811799` -> `1477811799`.
///
/// Prefers the last `id<digits>` path segment and falls back to the last
/// purely numeric segment.
pub fn resolve_appstore_id(url: &str) -> Result<String> {
    let parsed = parse(url)?;
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.collect())
        .unwrap_or_default();

    segments
        .iter()
        .rev()
        .find_map(|s| s.strip_prefix("id").filter(|rest| is_digits(rest)))
        .or_else(|| segments.iter().rev().copied().find(|s| is_digits(s)))
        .map(str::to_string)
        .ok_or_else(|| not_found(Platform::AppStore, url))
}

/// `https://play.google.com/store/apps/details?id=com.example` -> `com.example`.
pub fn resolve_googleplay_id(url: &str) -> Result<String> {
    let parsed = parse(url)?;
    parsed
        .query_pairs()
        .find(|(key, value)| key == "id" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| not_found(Platform::GooglePlay, url))
}

/// Classifies a storefront URL by host.
pub fn detect_platform(url: &str) -> Option<Platform> {
    let parsed = parse(url).ok()?;
    match parsed.host_str()? {
        "apps.apple.com" | "itunes.apple.com" => Some(Platform::AppStore),
        "play.google.com" => Some(Platform::GooglePlay),
        _ => None,
    }
}

pub fn resolve(platform: Platform, url: &str) -> Result<String> {
    match platform {
        Platform::AppStore => resolve_appstore_id(url),
        Platform::GooglePlay => resolve_googleplay_id(url),
    }
}
