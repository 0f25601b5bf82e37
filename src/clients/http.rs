use std::time::Duration;
use reqwest::{Client, Response, RequestBuilder};
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use crate::error::{Error, Result};
use crate::config::ApiConfig;
use tracing::{error, debug};

pub struct HttpClient {
    client: Client,
    headers: HeaderMap,
}

impl HttpClient {
    pub fn new(api: &ApiConfig, user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();

        for (key, value) in api.headers.iter() {
            if let (Ok(header_name), Ok(header_value)) = (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value)
            ) {
                headers.insert(header_name, header_value);
                debug!(
                    header_key = key,
                    header_value = value,
                    "Adding header"
                );
            } else {
                error!(
                    header_key = key,
                    header_value = value,
                    "Invalid header value"
                );
            }
        }

        debug!(
            user_agent = user_agent,
            timeout_secs = api.timeout_secs,
            "Creating client"
        );

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            headers,
        })
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url).headers(self.headers.clone())
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url).headers(self.headers.clone())
    }

    /// Sends the request, turning 429 and 403 into their dedicated errors.
    /// Any other status is returned to the caller to classify.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = request.build()?;

        debug!(
            method = %request.method(),
            url = %request.url(),
            "Sending request"
        );

        let response = self.client.execute(request).await?;

        debug!(
            status = response.status().as_u16(),
            url = %response.url(),
            "Response received"
        );

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                debug!("Rate limit exceeded");
                Err(Error::RateLimit)
            },
            StatusCode::FORBIDDEN => {
                debug!(url = %response.url(), "Received 403 Forbidden");
                Err(Error::Forbidden)
            },
            _ => Ok(response)
        }
    }
}
