use reqwest::blocking::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

use crate::error::{PipelineError, Result};
use crate::record::Record;

pub const DEFAULT_SOURCE_URL: &str = "https://jsonplaceholder.typicode.com/posts/";

/// Where records come from.
pub trait SourceFetcher {
    /// At most `n` records in the source's natural order.
    fn fetch(&self, n: usize) -> Result<Vec<Record>>;
}

/// Blocking HTTP source serving a JSON array of posts.
pub struct HttpFetcher {
    client: Client,
    url: Url,
}

impl HttpFetcher {
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| {
            PipelineError::InvalidConfig(format!("invalid source URL '{url}': {e}"))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("postlens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PipelineError::Fetch {
                url: url.to_string(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn fetch_error(&self, reason: impl Into<String>) -> PipelineError {
        PipelineError::Fetch {
            url: self.url.to_string(),
            reason: reason.into(),
        }
    }
}

impl SourceFetcher for HttpFetcher {
    fn fetch(&self, n: usize) -> Result<Vec<Record>> {
        let start_time = Instant::now();
        info!(
            action = "start",
            component = "fetcher",
            url = %self.url,
            limit = n,
            "Fetching records"
        );

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .map_err(|e| self.fetch_error(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.fetch_error(format!("server returned {status}")));
        }

        let body = response
            .text()
            .map_err(|e| self.fetch_error(format!("failed to read response body: {e}")))?;
        debug!(component = "fetcher", bytes = body.len(), "Response received");

        let records = parse_records(&body, n).map_err(|e| self.fetch_error(e))?;

        info!(
            action = "complete",
            component = "fetcher",
            record_count = records.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Fetched records"
        );
        Ok(records)
    }
}

/// Decodes a JSON array of posts and keeps the first `n`.
pub fn parse_records(json: &str, n: usize) -> std::result::Result<Vec<Record>, String> {
    let mut records: Vec<Record> =
        serde_json::from_str(json).map_err(|e| format!("malformed response: {e}"))?;
    records.truncate(n);
    Ok(records)
}
