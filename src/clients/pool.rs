use std::sync::atomic::{AtomicUsize, Ordering};
use crate::config::ApiConfig;
use crate::clients::http::HttpClient;
use crate::error::Result;
use tracing::debug;

const DEFAULT_USER_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
];

/// Round-robin set of clients, one per user agent.
pub struct ClientPool {
    clients: Vec<HttpClient>,
    current: AtomicUsize,
}

impl ClientPool {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let user_agents: Vec<&str> = if api.user_agents.is_empty() {
            DEFAULT_USER_AGENTS.to_vec()
        } else {
            api.user_agents.iter().map(String::as_str).collect()
        };

        debug!("Creating client pool with {} user agents", user_agents.len());

        let clients = user_agents
            .into_iter()
            .map(|user_agent| HttpClient::new(api, user_agent))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            clients,
            current: AtomicUsize::new(0),
        })
    }

    pub fn next_client(&self) -> &HttpClient {
        let current = self.current.fetch_add(1, Ordering::SeqCst);
        &self.clients[current % self.clients.len()]
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
