/// Page-counter state for the App Store feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    pub page: u32,
    pub consecutive_failures: u32,
    max_pages: u32,
}

impl PageCursor {
    pub fn new(max_pages: u32) -> Self {
        Self {
            page: 1,
            consecutive_failures: 0,
            max_pages,
        }
    }

    pub fn in_bounds(&self) -> bool {
        self.page <= self.max_pages
    }

    pub fn is_last_page(&self) -> bool {
        self.page >= self.max_pages
    }

    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
    }

    /// Returns the updated count of consecutive empty or failed pages.
    pub fn record_failure(&mut self) -> u32 {
        self.consecutive_failures += 1;
        self.consecutive_failures
    }

    pub fn advance(&mut self) {
        self.page += 1;
    }
}

/// Continuation-token state for the Google Play listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContinuationCursor {
    pub token: Option<String>,
    pub requests: u32,
}

impl ContinuationCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_request(&mut self) -> u32 {
        self.requests += 1;
        self.requests
    }

    /// Stores the next token. Returns false when there is nothing left to fetch.
    pub fn advance(&mut self, token: Option<String>) -> bool {
        self.token = token.filter(|t| !t.is_empty());
        self.token.is_some()
    }
}
