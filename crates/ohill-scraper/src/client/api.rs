//! Best-effort fetches against the undocumented `GetMenu` JSON API.
//!
//! The endpoint's query-parameter naming has drifted over time, so a short
//! list of candidate URLs is tried in order. Every failure (network error,
//! non-200 status, non-JSON content type, unparsable body) just moves on to
//! the next candidate; exhausting the list yields `None`.

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde_json::{Map, Value};

use super::{parse_url, CampusDishClient};
use crate::error::ScraperError;

const JSON_MEDIA_TYPE: &str = "application/json";
const API_ACCEPT: &str = "application/json, text/plain, */*";

/// Query-parameter shapes tried, in order, for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    DailyPeriodId,
    PeriodId,
    WeekDailySelectedPeriodId,
}

const CANDIDATES: [Candidate; 3] = [
    Candidate::DailyPeriodId,
    Candidate::PeriodId,
    Candidate::WeekDailySelectedPeriodId,
];

impl CampusDishClient {
    /// Fetches one period from the JSON API and normalizes it to a
    /// `{"Menu": ...}` payload. See [`normalize_api_payload`].
    pub async fn fetch_api(
        &self,
        location_id: &str,
        date_mmddyyyy: &str,
        period_id: &str,
    ) -> Option<Value> {
        self.fetch_api_raw(location_id, date_mmddyyyy, period_id)
            .await
            .map(normalize_api_payload)
    }

    /// Fetches one period from the JSON API, returning the body exactly as
    /// served by the first candidate URL that answers with JSON.
    pub async fn fetch_api_raw(
        &self,
        location_id: &str,
        date_mmddyyyy: &str,
        period_id: &str,
    ) -> Option<Value> {
        for candidate in CANDIDATES {
            let url = match self.api_candidate_url(candidate, location_id, date_mmddyyyy, period_id)
            {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!(error = %e, "menu API URL could not be built");
                    return None;
                }
            };
            match self.try_api_url(&url).await {
                Ok(Some(body)) => {
                    tracing::debug!(%url, period_id, "menu API answered");
                    return Some(body);
                }
                Ok(None) => {}
                Err(e) => tracing::debug!(%url, error = %e, "menu API candidate failed"),
            }
        }
        tracing::debug!(period_id, "no menu API candidate returned JSON");
        None
    }

    /// `Ok(None)` when the response is not a 200 with a JSON content type.
    async fn try_api_url(&self, url: &str) -> Result<Option<Value>, ScraperError> {
        let response = self
            .client
            .get(url)
            .timeout(self.api_timeout)
            .header(reqwest::header::ACCEPT, API_ACCEPT)
            .header("X-Requested-With", "XMLHttpRequest")
            .header(reqwest::header::REFERER, &self.base_url)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK
            || !is_json_content_type(response.headers().get(CONTENT_TYPE))
        {
            tracing::debug!(
                %url,
                status = response.status().as_u16(),
                "menu API candidate did not return JSON"
            );
            return Ok(None);
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| ScraperError::Deserialize {
                context: format!("menu API response from {url}"),
                source: e,
            })
    }

    fn api_candidate_url(
        &self,
        candidate: Candidate,
        location_id: &str,
        date_mmddyyyy: &str,
        period_id: &str,
    ) -> Result<String, ScraperError> {
        let mut url = parse_url(&self.api_url)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("locationId", location_id)
                .append_pair("date", date_mmddyyyy);
            match candidate {
                Candidate::DailyPeriodId => {
                    query
                        .append_pair("mode", "Daily")
                        .append_pair("periodId", period_id);
                }
                Candidate::PeriodId => {
                    query.append_pair("periodId", period_id);
                }
                Candidate::WeekDailySelectedPeriodId => {
                    query
                        .append_pair("week", "0")
                        .append_pair("mode", "Daily")
                        .append_pair("selectedPeriodId", period_id);
                }
            }
        }
        Ok(url.to_string())
    }
}

fn is_json_content_type(value: Option<&HeaderValue>) -> bool {
    value
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with(JSON_MEDIA_TYPE))
}

/// Coerce an API body into the page-model shape the merger expects.
///
/// A body with a top-level `Menu` key is returned as-is; one with a
/// top-level `model` key is unwrapped; anything else is wrapped as
/// `{"Menu": body}`.
#[must_use]
pub fn normalize_api_payload(body: Value) -> Value {
    match body {
        Value::Object(mut obj) => {
            if obj.contains_key("Menu") {
                Value::Object(obj)
            } else if let Some(model) = obj.remove("model") {
                model
            } else {
                wrap_menu(Value::Object(obj))
            }
        }
        other => wrap_menu(other),
    }
}

fn wrap_menu(body: Value) -> Value {
    let mut wrapped = Map::new();
    wrapped.insert("Menu".to_owned(), body);
    Value::Object(wrapped)
}
