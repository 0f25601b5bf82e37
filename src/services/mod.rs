pub mod appstore;
pub mod googleplay;
pub mod collection;

pub use appstore::{AppStoreFeed, FeedPage, ReviewFeed};
pub use googleplay::{PlayStoreApi, ReviewListing};
pub use collection::{CollectionReport, CollectionService, PlatformPlan};
