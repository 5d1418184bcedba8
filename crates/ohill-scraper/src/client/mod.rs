//! HTTP client for the `CampusDish` location page and its JSON menu API.

mod api;

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::error::ScraperError;
use crate::extract::parse_model;

pub use api::normalize_api_payload;

/// Connect timeout shared by page and API requests.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Fetches `CampusDish` pages and API responses.
///
/// Page fetches ([`Self::fetch_base_model`], [`Self::fetch_period_model`])
/// use the client-wide request timeout and fail on any non-2xx status. API
/// fetches ([`Self::fetch_api`]) use their own shorter timeout and never
/// fail: they return `None` when no candidate URL produces JSON.
#[derive(Debug, Clone)]
pub struct CampusDishClient {
    pub(super) client: Client,
    pub(super) base_url: String,
    pub(super) api_url: String,
    pub(super) api_timeout: Duration,
}

impl CampusDishClient {
    /// Creates a client for one location page and its menu API.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `base_url` or `api_url` does not parse.
    /// - [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed (e.g., invalid TLS config).
    pub fn new(
        base_url: &str,
        api_url: &str,
        request_timeout_secs: u64,
        api_timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ScraperError> {
        parse_url(base_url)?;
        parse_url(api_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(request_timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_owned(),
            api_url: api_url.to_owned(),
            api_timeout: Duration::from_secs(api_timeout_secs),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetches the location page with no period selected.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_model`].
    pub async fn fetch_base_model(&self) -> Result<Value, ScraperError> {
        let url = self.base_url.clone();
        self.fetch_model(&url).await
    }

    /// Fetches the location page with `?periodId={period_id}`.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_model`].
    pub async fn fetch_period_model(&self, period_id: &str) -> Result<Value, ScraperError> {
        let url = self.period_url(period_id)?;
        self.fetch_model(&url).await
    }

    /// GETs `url` and parses the `model: {...}` object embedded in the page.
    ///
    /// No retries at this layer.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] on network, timeout, or body read failure.
    /// - [`ScraperError::UnexpectedStatus`] on any non-2xx status.
    /// - Any error from [`parse_model`].
    pub async fn fetch_model(&self, url: &str) -> Result<Value, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let html = response.text().await?;
        parse_model(&html, url)
    }

    /// Builds the location-page URL for one meal period.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if the base URL does not parse.
    pub(super) fn period_url(&self, period_id: &str) -> Result<String, ScraperError> {
        let mut url = parse_url(&self.base_url)?;
        url.query_pairs_mut().append_pair("periodId", period_id);
        Ok(url.to_string())
    }
}

fn parse_url(raw: &str) -> Result<reqwest::Url, ScraperError> {
    reqwest::Url::parse(raw).map_err(|e| ScraperError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
