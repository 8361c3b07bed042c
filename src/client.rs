use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

/// Boundary to the provider's HTTP endpoints. The decoders never talk to the
/// network; everything they consume comes in through this trait, which also
/// keeps the orchestrator testable against a double.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetch a feed or page as text. Any non-200 status is a transport error.
    async fn fetch_text(&self, url: &str) -> Result<String>;

    /// Check that a synthesized link actually exists. Only a 404 marks it
    /// unreachable; auth-guarded statuses (401/403) still prove the resource
    /// is there.
    async fn validate_reachable(&self, url: &str) -> Result<String>;
}

/// Client for the flashscore site and its ninja feed endpoints.
///
/// Feed endpoints answer 404 unless the request carries the provider's
/// `x-fsign` header, so it is attached to every request.
#[derive(Clone)]
pub struct FlashscoreClient {
    http: Client,
    fsign: String,
}

impl FlashscoreClient {
    pub fn new(fsign: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(FlashscoreClient {
            http,
            fsign: fsign.to_string(),
        })
    }
}

#[async_trait]
impl FeedFetcher for FlashscoreClient {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url).with_context(|| format!("invalid feed url: {url}"))?;
        debug!(%parsed, "fetching");

        let resp = self
            .http
            .get(parsed)
            .header("x-fsign", &self.fsign)
            .send()
            .await
            .with_context(|| format!("request failed for {url}"))?;

        if resp.status() != StatusCode::OK {
            anyhow::bail!("fetch error {} for {}", resp.status(), url);
        }
        resp.text()
            .await
            .with_context(|| format!("failed to read body of {url}"))
    }

    async fn validate_reachable(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url).with_context(|| format!("invalid link: {url}"))?;

        let resp = self
            .http
            .get(parsed)
            .header("x-fsign", &self.fsign)
            .send()
            .await
            .with_context(|| format!("reachability check failed for {url}"))?;

        if resp.status() == StatusCode::NOT_FOUND {
            anyhow::bail!("url not found: {url} (HTTP 404)");
        }
        Ok(url.to_string())
    }
}
