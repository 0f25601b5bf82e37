use std::collections::HashSet;
use crate::models::ReviewRecord;

/// Drops later records whose `review_id` was already seen. Records without
/// an id are always kept.
pub fn dedup_by_review_id(records: Vec<ReviewRecord>) -> Vec<ReviewRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| !r.has_review_id() || seen.insert(r.review_id.clone()))
        .collect()
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum MergeKey {
    Id {
        platform: &'static str,
        country: String,
        review_id: String,
    },
    Text {
        platform: &'static str,
        country: String,
        author: String,
        content: String,
    },
}

fn merge_key(record: &ReviewRecord) -> MergeKey {
    let platform = record.platform.as_str();
    if record.has_review_id() {
        MergeKey::Id {
            platform,
            country: record.country.clone(),
            review_id: record.review_id.clone(),
        }
    } else {
        MergeKey::Text {
            platform,
            country: record.country.clone(),
            author: record.author.clone(),
            content: record.content.clone(),
        }
    }
}

/// Stable dedup of a merged result set: keyed on platform, country and the
/// review id, falling back to author and content when the id is missing.
pub fn dedup_merged(records: Vec<ReviewRecord>) -> Vec<ReviewRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(merge_key(r)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Platform;

    fn record(id: &str, author: &str, content: &str, country: &str) -> ReviewRecord {
        let mut r = ReviewRecord::new(Platform::GooglePlay, author, content, 5).with_review_id(id);
        r.country = country.to_string();
        r
    }

    #[test]
    fn keeps_first_occurrence_of_review_id() {
        let deduped = dedup_by_review_id(vec![
            record("a", "first", "x", "kr"),
            record("b", "other", "y", "kr"),
            record("a", "second", "z", "kr"),
        ]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].author, "first");
        assert_eq!(deduped[1].review_id, "b");
    }

    #[test]
    fn records_without_id_survive_id_dedup() {
        let deduped = dedup_by_review_id(vec![
            record("", "a", "same", "kr"),
            record("", "a", "same", "kr"),
        ]);
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn merged_dedup_falls_back_to_author_and_content() {
        let deduped = dedup_merged(vec![
            record("", "a", "same", "kr"),
            record("", "a", "same", "kr"),
            record("", "a", "same", "us"),
            record("", "b", "same", "kr"),
        ]);
        assert_eq!(deduped.len(), 3);
    }

    #[test]
    fn merged_dedup_separates_platforms() {
        let mut appstore = record("42", "a", "x", "kr");
        appstore.platform = Platform::AppStore;
        let deduped = dedup_merged(vec![
            appstore,
            record("42", "a", "x", "kr"),
            record("42", "b", "y", "kr"),
        ]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[1].author, "a");
    }
}
