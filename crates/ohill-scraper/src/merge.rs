//! Folding fetched menu payloads into one meal → station → item tree.
//!
//! Each payload (embedded page model or API response) is merged into a
//! [`MenuAccumulator`]. Items are keyed by `(meal, station, product id)`, so
//! re-merging the same payload is a no-op and a later, more period-specific
//! fetch overwrites what an earlier fetch recorded for the same key.

use std::collections::{BTreeMap, HashMap};

use ohill_core::{meal_rank, Meal, MenuItem, MenuStation, StationOverrides};
use serde_json::Value;

use crate::resolve::{
    allergen_names, declared_periods, dedup_sorted, entry_period_id, entry_station_id,
    menu_products, menu_section, product_allergens, product_id, product_tags, product_title,
    station_id, station_name, station_period_id, stations,
};

/// One item as last written by a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedItem {
    pub product_id: String,
    pub station_id: String,
    pub period_id: Option<String>,
    pub title: String,
    pub tags: Vec<String>,
    pub allergens: Vec<String>,
}

impl From<MergedItem> for MenuItem {
    fn from(item: MergedItem) -> Self {
        MenuItem {
            title: item.title,
            tags: item.tags,
            allergens: item.allergens,
            notes: None,
        }
    }
}

type StationItems = BTreeMap<String, MergedItem>;

/// Running meal name → station name → product id → item map for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuAccumulator {
    meals: BTreeMap<String, BTreeMap<String, StationItems>>,
}

impl MenuAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.meals
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeMap::len)
            .sum()
    }

    #[must_use]
    pub fn get(&self, meal: &str, station: &str, product_id: &str) -> Option<&MergedItem> {
        self.meals.get(meal)?.get(station)?.get(product_id)
    }

    fn upsert(&mut self, meal: String, station: String, item: MergedItem) {
        self.meals
            .entry(meal)
            .or_default()
            .entry(station)
            .or_default()
            .insert(item.product_id.clone(), item);
    }

    /// Emit meals in service order, stations by name, items by
    /// case-insensitive title.
    #[must_use]
    pub fn into_meals(self) -> Vec<Meal> {
        let mut meals: Vec<Meal> = self
            .meals
            .into_iter()
            .map(|(name, stations)| Meal {
                name,
                stations: stations
                    .into_iter()
                    .map(|(name, items)| {
                        let mut items: Vec<MergedItem> = items.into_values().collect();
                        items.sort_by_cached_key(|i| i.title.to_lowercase());
                        MenuStation {
                            name,
                            items: items.into_iter().map(MenuItem::from).collect(),
                        }
                    })
                    .collect(),
            })
            .collect();
        meals.sort_by(|a, b| meal_rank(&a.name).cmp(&meal_rank(&b.name)));
        meals
    }
}

#[derive(Debug, Clone, Default)]
struct StationInfo {
    name: Option<String>,
    period_id: Option<String>,
}

/// Merges payloads using a station-name override table.
#[derive(Debug, Clone, Copy)]
pub struct PeriodMerger<'a> {
    overrides: &'a StationOverrides,
}

impl<'a> PeriodMerger<'a> {
    #[must_use]
    pub fn new(overrides: &'a StationOverrides) -> Self {
        Self { overrides }
    }

    /// Fold `payload` into `acc`, returning how many items were written.
    ///
    /// `forced_period_id` is the period this fetch explicitly targeted; it is
    /// used for items whose station and entry carry no period of their own.
    /// When no `forced_period_name` is given it is looked up in the payload's
    /// declared periods, else synthesized as `Period {id}`. Missing or
    /// malformed fields never fail the merge: items without a product id or
    /// title are skipped and everything else falls back to a placeholder.
    pub fn merge(
        &self,
        payload: &Value,
        acc: &mut MenuAccumulator,
        forced_period_id: Option<&str>,
        forced_period_name: Option<&str>,
    ) -> usize {
        let menu = menu_section(payload);

        let period_names: HashMap<String, String> = declared_periods(menu)
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        let forced_period_id = forced_period_id.filter(|id| !id.is_empty());
        let forced_period_name = forced_period_id.map(|id| {
            forced_period_name
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .or_else(|| period_names.get(id).cloned())
                .unwrap_or_else(|| format!("Period {id}"))
        });

        let allergen_lookup = allergen_names(menu);

        let station_info: HashMap<String, StationInfo> = stations(menu)
            .iter()
            .filter_map(|s| {
                let id = station_id(s)?;
                Some((
                    id,
                    StationInfo {
                        name: station_name(s),
                        period_id: station_period_id(s),
                    },
                ))
            })
            .collect();

        let mut written = 0;
        for entry in menu_products(menu) {
            let empty = Value::Null;
            let product = entry.get("Product").unwrap_or(&empty);
            let (Some(pid), Some(title)) = (product_id(entry), product_title(product)) else {
                continue;
            };

            let sid = entry_station_id(entry);
            let station = station_info.get(&sid);

            let period_id = station
                .and_then(|s| s.period_id.clone())
                .or_else(|| entry_period_id(entry))
                .or_else(|| forced_period_id.map(str::to_string));

            let meal = period_id
                .as_ref()
                .and_then(|id| period_names.get(id).cloned())
                .or_else(|| forced_period_name.clone())
                .unwrap_or_else(|| format!("Period {}", period_id.as_deref().unwrap_or("?")));

            let station_display = self.station_display_name(&sid, station);

            let item = MergedItem {
                product_id: pid,
                station_id: sid,
                period_id,
                title,
                tags: dedup_sorted(product_tags(product)),
                allergens: dedup_sorted(product_allergens(product, &allergen_lookup)),
            };
            acc.upsert(meal, station_display, item);
            written += 1;
        }

        written
    }

    /// Override table, then the payload's declared name, then `Station {id}`.
    fn station_display_name(&self, sid: &str, station: Option<&StationInfo>) -> String {
        if let Some(name) = self.overrides.get(sid) {
            return name.to_string();
        }
        if let Some(name) = station.and_then(|s| s.name.as_deref()) {
            return name.to_string();
        }
        if sid.is_empty() {
            "Station ?".to_string()
        } else {
            format!("Station {sid}")
        }
    }
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
