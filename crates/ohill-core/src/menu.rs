//! The served menu document: meals, each holding stations, each holding items.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Meals in service order. Anything not listed here sorts after these.
const MEAL_ORDER: [&str; 5] = ["Breakfast", "Brunch", "Lunch", "Dinner", "Late Night"];

/// Rank used when no entry of [`MEAL_ORDER`] matches.
const UNRANKED_MEAL: usize = 99;

/// A full day's menu for one venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuDocument {
    pub venue: String,
    /// `YYYY-MM-DD` when the upstream date parsed, otherwise the raw upstream string.
    pub date: String,
    /// UTC, second precision, `Z` suffix.
    pub generated_at: String,
    pub meals: Vec<Meal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    pub stations: Vec<MenuStation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuStation {
    pub name: String,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub title: String,
    /// Dietary labels and category names, sorted case-insensitively.
    pub tags: Vec<String>,
    pub allergens: Vec<String>,
    pub notes: Option<String>,
}

impl MenuDocument {
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.meals
            .iter()
            .flat_map(|m| &m.stations)
            .map(|s| s.items.len())
            .sum()
    }

    #[must_use]
    pub fn meal(&self, name: &str) -> Option<&Meal> {
        self.meals.iter().find(|m| m.name == name)
    }
}

/// Sort key for a meal name: known meals by service order, the rest after
/// them alphabetically.
#[must_use]
pub fn meal_rank(name: &str) -> (usize, &str) {
    let rank = MEAL_ORDER
        .iter()
        .position(|m| *m == name)
        .unwrap_or(UNRANKED_MEAL);
    (rank, name)
}

/// Convert an upstream `MM/DD/YYYY` date to `YYYY-MM-DD`, returning the input
/// unchanged when it does not parse.
#[must_use]
pub fn normalize_date(mmddyyyy: &str) -> String {
    NaiveDate::parse_from_str(mmddyyyy.trim(), "%m/%d/%Y").map_or_else(
        |_| mmddyyyy.to_string(),
        |d| d.format("%Y-%m-%d").to_string(),
    )
}

/// Format a UTC instant as `2025-01-31T08:15:00Z`.
#[must_use]
pub fn utc_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
