pub mod dedup;
pub mod time;

pub use dedup::{dedup_by_review_id, dedup_merged};
pub use time::{normalize_timestamp, sleep_with_jitter};
