mod review;
mod response;
mod cursor;

pub use review::{Platform, Locale, ReviewRecord};
pub use response::{FeedResponse, FeedEntry, Label, OneOrMany, PlayReview, ReviewPage};
pub use cursor::{PageCursor, ContinuationCursor};
