use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use crate::error::{Error, Result};
use super::review::{Platform, ReviewRecord};

#[derive(Debug, Deserialize)]
pub struct FeedResponse {
    pub feed: Option<Feed>,
}

#[derive(Debug, Deserialize)]
pub struct Feed {
    #[serde(default)]
    pub entry: Option<OneOrMany<FeedEntry>>,
}

// The RSS feed collapses a single-entry list into a bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Author {
    pub name: Option<Label>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedEntry {
    pub author: Option<Author>,
    pub title: Option<Label>,
    pub content: Option<Label>,
    #[serde(rename = "im:rating")]
    pub rating: Option<Label>,
    #[serde(rename = "im:version")]
    pub version: Option<Label>,
    #[serde(rename = "im:voteSum")]
    pub vote_sum: Option<Label>,
    #[serde(rename = "im:voteCount")]
    pub vote_count: Option<Label>,
    pub updated: Option<Label>,
    pub id: Option<Label>,
}

fn label_or_empty(label: Option<Label>) -> String {
    label.map(|l| l.label).unwrap_or_default()
}

fn parse_count(label: Option<Label>, field: &str) -> Result<u32> {
    match label {
        Some(l) if !l.label.trim().is_empty() => l.label.trim().parse().map_err(|_| {
            Error::MalformedResponse(format!("{} is not a count: {:?}", field, l.label))
        }),
        _ => Ok(0),
    }
}

fn check_rating(rating: i64) -> Result<u8> {
    if (1..=5).contains(&rating) {
        Ok(rating as u8)
    } else {
        Err(Error::MalformedResponse(format!("rating out of range: {}", rating)))
    }
}

impl FeedEntry {
    /// Entries without `im:rating` describe the app itself and yield `None`.
    pub fn into_record(self) -> Result<Option<ReviewRecord>> {
        let Some(rating) = self.rating else {
            return Ok(None);
        };
        let rating: i64 = rating.label.trim().parse().map_err(|_| {
            Error::MalformedResponse(format!("rating is not an integer: {:?}", rating.label))
        })?;

        let author = self
            .author
            .and_then(|a| a.name)
            .map(|n| n.label)
            .unwrap_or_default();

        Ok(Some(ReviewRecord {
            platform: Platform::AppStore,
            author,
            title: label_or_empty(self.title),
            content: label_or_empty(self.content),
            rating: check_rating(rating)?,
            version: label_or_empty(self.version),
            vote_sum: parse_count(self.vote_sum, "im:voteSum")?,
            vote_count: parse_count(self.vote_count, "im:voteCount")?,
            updated: label_or_empty(self.updated),
            review_id: label_or_empty(self.id),
            country: String::new(),
            lang: String::new(),
            thumbs_up_count: None,
            reply_content: None,
            replied_at: None,
        }))
    }
}

/// One page of the marketplace review listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewPage {
    pub reviews: Vec<PlayReview>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayReview {
    pub review_id: Option<String>,
    pub user_name: Option<String>,
    pub content: Option<String>,
    pub score: Option<i64>,
    pub thumbs_up_count: Option<u32>,
    pub at: Option<DateTime<Utc>>,
    pub reply_content: Option<String>,
    pub replied_at: Option<DateTime<Utc>>,
    pub app_version: Option<String>,
}

fn str_at(item: &Value, pointer: &str) -> Option<String> {
    item.pointer(pointer).and_then(Value::as_str).map(str::to_string)
}

fn time_at(item: &Value, pointer: &str) -> Option<DateTime<Utc>> {
    item.pointer(pointer)
        .and_then(Value::as_i64)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

impl PlayReview {
    /// Reads a positional review array from the listing payload. Missing
    /// positions become `None`.
    pub fn from_item(item: &Value) -> Self {
        Self {
            review_id: str_at(item, "/0"),
            user_name: str_at(item, "/1/0"),
            content: str_at(item, "/4"),
            score: item.pointer("/2").and_then(Value::as_i64),
            thumbs_up_count: item
                .pointer("/6")
                .and_then(Value::as_u64)
                .map(|n| n.min(u32::MAX as u64) as u32),
            at: time_at(item, "/5/0"),
            reply_content: str_at(item, "/7/1"),
            replied_at: time_at(item, "/7/2/0"),
            app_version: str_at(item, "/10"),
        }
    }

    pub fn into_record(self) -> Result<ReviewRecord> {
        let score = self
            .score
            .ok_or_else(|| Error::MalformedResponse("review without score".to_string()))?;

        Ok(ReviewRecord {
            platform: Platform::GooglePlay,
            author: self.user_name.unwrap_or_default(),
            title: String::new(),
            content: self.content.unwrap_or_default(),
            rating: check_rating(score)?,
            version: self.app_version.unwrap_or_default(),
            vote_sum: 0,
            vote_count: 0,
            updated: self.at.map(|t| t.to_rfc3339()).unwrap_or_default(),
            review_id: self.review_id.unwrap_or_default(),
            country: String::new(),
            lang: String::new(),
            thumbs_up_count: self.thumbs_up_count,
            reply_content: self.reply_content,
            replied_at: self.replied_at.map(|t| t.to_rfc3339()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_entry_is_skipped() {
        let entry: FeedEntry = serde_json::from_value(json!({
            "im:name": {"label": "Vrew"},
            "title": {"label": "Vrew - AI video editor"},
            "id": {"label": "https://apps.apple.com/kr/app/id1477811799"}
        }))
        .unwrap();
        assert!(entry.into_record().unwrap().is_none());
    }

    #[test]
    fn review_entry_maps_labels_and_defaults_votes() {
        let entry: FeedEntry = serde_json::from_value(json!({
            "author": {"name": {"label": "브루팬"}, "uri": {"label": "x"}},
            "title": {"label": "좋아요"},
            "content": {"label": "자막 작업이 편해요", "attributes": {"type": "text"}},
            "im:rating": {"label": "5"},
            "im:version": {"label": "2.4.1"},
            "updated": {"label": "2024-05-01T02:03:04-07:00"},
            "id": {"label": "11223344"}
        }))
        .unwrap();

        let record = entry.into_record().unwrap().unwrap();
        assert_eq!(record.author, "브루팬");
        assert_eq!(record.content, "자막 작업이 편해요");
        assert_eq!(record.rating, 5);
        assert_eq!(record.vote_sum, 0);
        assert_eq!(record.vote_count, 0);
        assert_eq!(record.review_id, "11223344");
    }

    #[test]
    fn non_numeric_rating_is_malformed() {
        let entry = FeedEntry {
            rating: Some(Label { label: "five".to_string() }),
            ..Default::default()
        };
        assert!(matches!(entry.into_record(), Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn single_entry_feed_is_accepted() {
        let response: FeedResponse = serde_json::from_value(json!({
            "feed": {"entry": {"im:rating": {"label": "3"}}}
        }))
        .unwrap();
        let entries = response.feed.unwrap().entry.unwrap().into_vec();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn play_item_reads_positional_fields() {
        let item = json!([
            "gp:AOqpTOE",
            ["홍길동", [null, 2, null, [null, 0, "https://img"]]],
            4,
            null,
            "번역 기능 최고",
            [1714521600, 0],
            12,
            [null, "감사합니다", [1714608000, 0]],
            null,
            null,
            "3.1.0"
        ]);

        let review = PlayReview::from_item(&item);
        assert_eq!(review.review_id.as_deref(), Some("gp:AOqpTOE"));
        assert_eq!(review.user_name.as_deref(), Some("홍길동"));
        assert_eq!(review.thumbs_up_count, Some(12));

        let record = review.into_record().unwrap();
        assert_eq!(record.author, "홍길동");
        assert_eq!(record.rating, 4);
        assert_eq!(record.version, "3.1.0");
        assert_eq!(record.updated, "2024-05-01T00:00:00+00:00");
        assert_eq!(record.reply_content.as_deref(), Some("감사합니다"));
    }
}
