use std::sync::Arc;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{error, debug};
use crate::clients::ClientPool;
use crate::error::{Result, Error};
use crate::models::{PlayReview, ReviewPage};

const LISTING_RPC: &str = "UsvDTd";
const SORT_NEWEST: u8 = 2;
const XSSI_PREFIX: &str = ")]}'";

/// One call of the marketplace review listing: a batch of reviews plus the
/// token for the next call.
#[async_trait]
pub trait ReviewListing: Send + Sync {
    async fn list_reviews(
        &self,
        app_id: &str,
        lang: &str,
        country: &str,
        count: u32,
        token: Option<&str>,
    ) -> Result<ReviewPage>;
}

#[derive(Clone)]
pub struct PlayStoreApi {
    client_pool: Arc<ClientPool>,
    base_url: String,
}

impl PlayStoreApi {
    pub fn new(client_pool: Arc<ClientPool>, base_url: &str) -> Self {
        Self {
            client_pool,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/_/PlayStoreUi/data/batchexecute", self.base_url)
    }
}

/// Builds the `f.req` form value for a listing request.
pub fn listing_request(app_id: &str, count: u32, token: Option<&str>) -> String {
    let inner = json!([
        null,
        null,
        [2, SORT_NEWEST, [count, null, token], null, []],
        [app_id, 7]
    ]);
    json!([[[LISTING_RPC, inner.to_string(), null, "generic"]]]).to_string()
}

/// Parses a `batchexecute` response body into a review page.
pub fn parse_listing(body: &str) -> Result<ReviewPage> {
    let trimmed = body.trim_start();
    let payload = trimmed.strip_prefix(XSSI_PREFIX).unwrap_or(trimmed);
    let envelope: Value = serde_json::from_str(payload.trim_start())?;

    let data = match envelope.pointer("/0/2") {
        None | Some(Value::Null) => return Ok(ReviewPage::default()),
        Some(Value::String(s)) => serde_json::from_str::<Value>(s)?,
        Some(other) => {
            return Err(Error::MalformedResponse(format!(
                "unexpected listing payload: {}",
                other
            )));
        }
    };

    let reviews = data
        .pointer("/0")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(PlayReview::from_item).collect())
        .unwrap_or_default();

    let next_token = data
        .as_array()
        .and_then(|parts| parts.len().checked_sub(2).and_then(|i| parts.get(i)))
        .and_then(Value::as_array)
        .and_then(|marker| marker.last())
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(ReviewPage { reviews, next_token })
}

#[async_trait]
impl ReviewListing for PlayStoreApi {
    async fn list_reviews(
        &self,
        app_id: &str,
        lang: &str,
        country: &str,
        count: u32,
        token: Option<&str>,
    ) -> Result<ReviewPage> {
        let url = self.endpoint();
        let client = self.client_pool.next_client();

        let request = client
            .post(&url)
            .query(&[("hl", lang), ("gl", country)])
            .form(&[("f.req", listing_request(app_id, count, token))]);

        let response = client.send(request).await?;
        let status = response.status();

        debug!(
            status = status.as_u16(),
            app_id = app_id,
            lang = lang,
            country = country,
            "Listing response received"
        );

        if !status.is_success() {
            return Err(Error::Status(status));
        }

        let body = response.text().await?;
        parse_listing(&body).map_err(|e| {
            error!(
                error = %e,
                body_len = body.len(),
                "Failed to parse review listing"
            );
            e
        })
    }
}
