use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    AppStore,
    GooglePlay,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::AppStore => "appstore",
            Platform::GooglePlay => "googleplay",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storefront locale a collector runs against. App Store feeds are keyed by
/// country only, so `lang` is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub country: String,
    #[serde(default)]
    pub lang: Option<String>,
}

impl Locale {
    pub fn country(country: &str) -> Self {
        Self {
            country: country.to_string(),
            lang: None,
        }
    }

    pub fn new(lang: &str, country: &str) -> Self {
        Self {
            country: country.to_string(),
            lang: Some(lang.to_string()),
        }
    }

    pub fn lang_or_empty(&self) -> &str {
        self.lang.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lang {
            Some(lang) => write!(f, "{}-{}", lang, self.country),
            None => f.write_str(&self.country),
        }
    }
}

/// One collected review. Field order is the column order of the CSV output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub platform: Platform,
    pub author: String,
    pub title: String,
    pub content: String,
    pub rating: u8,
    pub version: String,
    pub vote_sum: u32,
    pub vote_count: u32,
    pub updated: String,
    pub review_id: String,
    pub country: String,
    pub lang: String,
    pub thumbs_up_count: Option<u32>,
    pub reply_content: Option<String>,
    pub replied_at: Option<String>,
}

#[cfg(test)]
impl ReviewRecord {
    pub fn new(platform: Platform, author: &str, content: &str, rating: u8) -> Self {
        Self {
            platform,
            author: author.to_string(),
            title: String::new(),
            content: content.to_string(),
            rating,
            version: String::new(),
            vote_sum: 0,
            vote_count: 0,
            updated: String::new(),
            review_id: String::new(),
            country: String::new(),
            lang: String::new(),
            thumbs_up_count: None,
            reply_content: None,
            replied_at: None,
        }
    }

    pub fn with_review_id(mut self, review_id: &str) -> Self {
        self.review_id = review_id.to_string();
        self
    }
}

impl ReviewRecord {
    pub fn has_review_id(&self) -> bool {
        !self.review_id.is_empty()
    }

    /// Attach the locale the record was collected under.
    pub fn tag(&mut self, locale: &Locale) {
        self.country = locale.country.clone();
        self.lang = locale.lang_or_empty().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Platform::GooglePlay).unwrap(), "\"googleplay\"");
        assert_eq!(Platform::AppStore.to_string(), "appstore");
    }

    #[test]
    fn tag_sets_country_and_lang() {
        let mut record = ReviewRecord::new(Platform::AppStore, "a", "b", 5);
        record.tag(&Locale::country("jp"));
        assert_eq!(record.country, "jp");
        assert_eq!(record.lang, "");

        record.tag(&Locale::new("ko", "kr"));
        assert_eq!(record.country, "kr");
        assert_eq!(record.lang, "ko");
    }
}
