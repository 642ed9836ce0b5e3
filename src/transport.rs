use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tokio::time::timeout;
use tracing::debug;

use crate::error::{Error, Result};

/// Classified HTTP outcome of a feed fetch. Success and redirection share a
/// single variant because both permit parsing; 304 is carved out before the
/// generic 3xx rule so conditional fetches short-circuit correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NotFound,
    NotModified,
    ServerError,
    Forbidden,
    Other(u16),
}

impl Status {
    pub fn from_code(code: u16) -> Self {
        match code {
            304 => Status::NotModified,
            404 => Status::NotFound,
            403 => Status::Forbidden,
            500..=599 => Status::ServerError,
            200..=399 => Status::Ok,
            other => Status::Other(other),
        }
    }
}

/// Result of one transport fetch, consumed once by the reader.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: Status,
    pub body: Vec<u8>,
    pub message: String,
}

/// Conditional-GET capable transport. The reader always passes a
/// modified-since timestamp; the Unix epoch means "fetch unconditionally".
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str, modified_since: DateTime<Utc>) -> Result<Response>;
}

/// Default reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout_duration: Duration,
    user_agent: String,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::limited(10))
            .gzip(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            timeout_duration: Duration::from_secs(30),
            user_agent: format!("feed-reader/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_duration = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    fn validate_url(&self, url: &str) -> Result<()> {
        let parsed = url::Url::parse(url)
            .map_err(|e| Error::InvalidUrl(format!("Invalid URL {}: {}", url, e)))?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(Error::InvalidUrl(format!("Unsupported scheme: {}", scheme))),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str, modified_since: DateTime<Utc>) -> Result<Response> {
        self.validate_url(url)?;
        debug!("Fetching feed from: {}", url);

        let mut request = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header(
                "Accept",
                "application/rss+xml, application/atom+xml, application/xml, text/xml, */*",
            );

        // The epoch stands for "no cutoff"; sending it as a real
        // If-Modified-Since would be meaningless to the server.
        if modified_since != DateTime::<Utc>::UNIX_EPOCH {
            request = request.header(
                "If-Modified-Since",
                modified_since.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
            );
        }

        let response = timeout(self.timeout_duration, request.send())
            .await
            .map_err(|_| Error::Timeout(format!("Request to {} timed out", url)))?
            .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

        let code = response.status().as_u16();
        let message = response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown status")
            .to_string();

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Http(format!("Failed to read response body: {}", e)))?
            .to_vec();

        debug!("Downloaded {} bytes from {} (HTTP {})", body.len(), url, code);

        Ok(Response {
            status: Status::from_code(code),
            body,
            message,
        })
    }
}
