//! Orchestrates one full menu build: base page, then every declared period.

use chrono::Utc;
use ohill_core::{normalize_date, utc_timestamp, MenuDocument, PeriodStrategy, StationOverrides};
use serde_json::Value;

use crate::client::CampusDishClient;
use crate::error::ScraperError;
use crate::merge::{MenuAccumulator, PeriodMerger};
use crate::resolve::base_model_info;
use crate::types::{BaseModelInfo, MenuPeriod, PayloadSource};

/// Builds a [`MenuDocument`] for one venue.
///
/// Every call to [`MenuBuilder::build`] starts from an empty accumulator;
/// nothing is shared between builds.
#[derive(Debug, Clone)]
pub struct MenuBuilder {
    client: CampusDishClient,
    overrides: StationOverrides,
    venue: String,
    strategy: PeriodStrategy,
}

impl MenuBuilder {
    #[must_use]
    pub fn new(client: CampusDishClient, overrides: StationOverrides, venue: &str) -> Self {
        Self {
            client,
            overrides,
            venue: venue.to_owned(),
            strategy: PeriodStrategy::default(),
        }
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: PeriodStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn client(&self) -> &CampusDishClient {
        &self.client
    }

    /// Fetch the base page and every declared period, then emit the sorted
    /// document.
    ///
    /// Period fetches run one after another. A failed period is logged and
    /// skipped.
    ///
    /// # Errors
    ///
    /// Any error fetching or parsing the base page. No partial document is
    /// produced in that case.
    pub async fn build(&self) -> Result<MenuDocument, ScraperError> {
        let base = self.client.fetch_base_model().await?;
        let info = base_model_info(&base);
        let merger = PeriodMerger::new(&self.overrides);
        let mut acc = MenuAccumulator::new();

        let selected = info.selected_period_id.as_deref();
        let selected_name = selected.and_then(|id| info.period_name(id));
        merger.merge(&base, &mut acc, selected, selected_name);

        for period in &info.periods {
            match self.fetch_period(&info, period).await {
                Ok((payload, source)) => {
                    let written = merger.merge(
                        &payload,
                        &mut acc,
                        Some(period.id.as_str()),
                        Some(period.name.as_str()),
                    );
                    tracing::debug!(
                        period_id = %period.id,
                        period = %period.name,
                        %source,
                        written,
                        "merged period"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        period_id = %period.id,
                        period = %period.name,
                        error = %e,
                        "period fetch failed; skipping"
                    );
                }
            }
        }

        let item_count = acc.item_count();
        let meals = acc.into_meals();
        tracing::info!(
            venue = %self.venue,
            date = %info.date,
            meals = meals.len(),
            items = item_count,
            "menu build complete"
        );

        Ok(MenuDocument {
            venue: self.venue.clone(),
            date: normalize_date(&info.date),
            generated_at: utc_timestamp(Utc::now()),
            meals,
        })
    }

    /// One period's payload: the JSON API first when that strategy is on and
    /// the base page gave a location and date, else the period's page.
    async fn fetch_period(
        &self,
        info: &BaseModelInfo,
        period: &MenuPeriod,
    ) -> Result<(Value, PayloadSource), ScraperError> {
        if self.strategy == PeriodStrategy::ApiFirst {
            if let Some(location_id) = info.location_id.as_deref() {
                if !info.date.is_empty() {
                    if let Some(payload) = self
                        .client
                        .fetch_api(location_id, &info.date, &period.id)
                        .await
                    {
                        return Ok((payload, PayloadSource::Api));
                    }
                }
            }
        }
        let payload = self.client.fetch_period_model(&period.id).await?;
        Ok((payload, PayloadSource::Html))
    }
}
