//! Raw upstream capture for offline inspection.
//!
//! Unlike [`crate::MenuBuilder`] nothing here is normalized: the base model
//! and each period's body are written exactly as served.

use std::path::{Path, PathBuf};

use chrono::Utc;
use ohill_core::utc_timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::CampusDishClient;
use crate::error::ScraperError;
use crate::resolve::base_model_info;
use crate::types::PayloadSource;

/// One period's raw capture. `source` and `raw` are `None` when every fetch failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodDump {
    pub name: String,
    pub source: Option<PayloadSource>,
    pub raw: Option<Value>,
}

/// Everything fetched for one day. `periods` is written as an object keyed
/// by period id, in the order the base page declares them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDump {
    pub fetched_at: String,
    pub base_url: String,
    /// Upstream `MM/DD/YYYY`, empty when absent.
    pub date: String,
    pub location_id: String,
    pub selected_period_id: String,
    pub base_model_raw: Value,
    #[serde(with = "ordered_periods")]
    pub periods: Vec<(String, PeriodDump)>,
}

impl RawDump {
    /// `ohill_raw_MM-DD-YYYY.json`, or `ohill_raw_unknown.json` without a date.
    #[must_use]
    pub fn file_name(&self) -> String {
        if self.date.is_empty() {
            "ohill_raw_unknown.json".to_owned()
        } else {
            format!("ohill_raw_{}.json", self.date.replace('/', "-"))
        }
    }

    #[must_use]
    pub fn period(&self, id: &str) -> Option<&PeriodDump> {
        self.periods
            .iter()
            .find_map(|(pid, period)| (pid == id).then_some(period))
    }
}

/// Serializes the period list as a JSON object without reordering its keys.
mod ordered_periods {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    use super::PeriodDump;

    pub(super) fn serialize<S: Serializer>(
        periods: &[(String, PeriodDump)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(periods.len()))?;
        for (id, period) in periods {
            map.serialize_entry(id, period)?;
        }
        map.end()
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, PeriodDump)>, D::Error> {
        deserializer.deserialize_map(PeriodsVisitor)
    }

    struct PeriodsVisitor;

    impl<'de> Visitor<'de> for PeriodsVisitor {
        type Value = Vec<(String, PeriodDump)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of period id to period capture")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut periods = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(entry) = access.next_entry()? {
                periods.push(entry);
            }
            Ok(periods)
        }
    }
}

/// Fetch the base page and every declared period without merging.
///
/// Each period tries the JSON API first (when the base page gave a location
/// and date) and then its `?periodId=` page.
///
/// # Errors
///
/// Any error fetching or parsing the base page.
pub async fn collect_raw_dump(client: &CampusDishClient) -> Result<RawDump, ScraperError> {
    let base = client.fetch_base_model().await?;
    let info = base_model_info(&base);
    let location_id = info.location_id.clone().unwrap_or_default();

    let mut periods = Vec::with_capacity(info.periods.len());
    for period in &info.periods {
        let mut capture = None;

        if !location_id.is_empty() && !info.date.is_empty() {
            capture = client
                .fetch_api_raw(&location_id, &info.date, &period.id)
                .await
                .map(|raw| (PayloadSource::Api, raw));
        }

        if capture.is_none() {
            match client.fetch_period_model(&period.id).await {
                Ok(raw) => capture = Some((PayloadSource::Html, raw)),
                Err(e) => tracing::warn!(
                    period_id = %period.id,
                    error = %e,
                    "period capture failed"
                ),
            }
        }

        let (source, raw) = capture.unzip();
        periods.push((
            period.id.clone(),
            PeriodDump {
                name: period.name.clone(),
                source,
                raw,
            },
        ));
    }

    Ok(RawDump {
        fetched_at: utc_timestamp(Utc::now()),
        base_url: client.base_url().to_owned(),
        date: info.date,
        location_id,
        selected_period_id: info.selected_period_id.unwrap_or_default(),
        base_model_raw: base,
        periods,
    })
}

/// Write the combined dump into `dir`, plus one `period_{id}.json` per
/// period when `split` is set. Returns the combined file's path.
///
/// # Errors
///
/// - [`ScraperError::Io`] if `dir` cannot be created or a file cannot be written.
/// - [`ScraperError::Serialize`] if a capture cannot be encoded.
pub fn write_raw_dump(dump: &RawDump, dir: &Path, split: bool) -> Result<PathBuf, ScraperError> {
    std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;

    if split {
        for (id, period) in &dump.periods {
            write_json(&dir.join(format!("period_{id}.json")), period)?;
        }
    }

    let path = dir.join(dump.file_name());
    write_json(&path, dump)?;
    Ok(path)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ScraperError> {
    let text = serde_json::to_string_pretty(value).map_err(ScraperError::Serialize)?;
    std::fs::write(path, text).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, source: std::io::Error) -> ScraperError {
    ScraperError::Io {
        path: path.display().to_string(),
        source,
    }
}
