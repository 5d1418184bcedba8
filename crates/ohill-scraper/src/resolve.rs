//! Field resolvers over the upstream menu JSON.
//!
//! The upstream schema is inconsistent between the embedded page model and
//! the JSON API, so every lookup tries a short list of keys and degrades to
//! `None` instead of failing. A value only counts when it is "present": a
//! non-empty string, a non-zero number, `true`, or a non-empty container.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::types::{BaseModelInfo, MenuPeriod};

const ALLERGEN_FLAG_PREFIX: &str = "Contains";

pub(crate) fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Render an id-like value as text: strings verbatim, numbers as their JSON text.
pub(crate) fn id_text(value: &Value) -> Option<String> {
    if !is_present(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// First present value among `keys`, rendered as id text.
pub(crate) fn first_id(obj: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| obj.get(*k).and_then(id_text))
}

fn first_str<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_str).filter(|s| !s.is_empty()))
}

fn array<'a>(obj: &'a Value, key: &str) -> &'a [Value] {
    obj.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// The menu object of a payload: its `Menu` member when present, else the payload itself.
#[must_use]
pub fn menu_section(payload: &Value) -> &Value {
    match payload.get("Menu") {
        Some(menu) if menu.is_object() => menu,
        _ => payload,
    }
}

/// Periods declared in `MenuPeriods`, in upstream order.
#[must_use]
pub fn declared_periods(menu: &Value) -> Vec<MenuPeriod> {
    array(menu, "MenuPeriods")
        .iter()
        .filter_map(|p| {
            let id = first_id(p, &["PeriodId"])?;
            let name = p.get("Name").and_then(Value::as_str)?;
            Some(MenuPeriod {
                id,
                name: name.to_string(),
            })
        })
        .collect()
}

/// Date, location, selected period, and declared periods of a base-page model.
#[must_use]
pub fn base_model_info(model: &Value) -> BaseModelInfo {
    BaseModelInfo {
        date: first_str(model, &["Date"]).unwrap_or_default().to_string(),
        location_id: first_id(model, &["LocationId"]),
        selected_period_id: first_id(model, &["SelectedPeriodId"]),
        periods: declared_periods(menu_section(model)),
    }
}

/// `Allergens` list as id → display name.
pub(crate) fn allergen_names(menu: &Value) -> HashMap<String, String> {
    array(menu, "Allergens")
        .iter()
        .filter_map(|a| {
            let id = first_id(a, &["Id"])?;
            let name = first_str(a, &["Name"])?;
            Some((id, name.to_string()))
        })
        .collect()
}

pub(crate) fn stations(menu: &Value) -> &[Value] {
    array(menu, "Stations")
}

pub(crate) fn menu_products(menu: &Value) -> &[Value] {
    array(menu, "MenuProducts")
}

pub(crate) fn station_id(station: &Value) -> Option<String> {
    first_id(station, &["StationId", "Id"])
}

pub(crate) fn station_name(station: &Value) -> Option<String> {
    first_str(station, &["Name"]).map(str::to_string)
}

/// A station's own period: `MenuPeriodId`, `PeriodId`, then `MenuPeriod.PeriodId`.
pub(crate) fn station_period_id(station: &Value) -> Option<String> {
    first_id(station, &["MenuPeriodId", "PeriodId"])
        .or_else(|| station.get("MenuPeriod").and_then(|p| first_id(p, &["PeriodId"])))
}

/// Station a menu-product entry is served at. Empty when missing.
pub(crate) fn entry_station_id(entry: &Value) -> String {
    first_id(entry, &["StationId"]).unwrap_or_default()
}

/// Product id from the nested `Product`, falling back to the entry itself.
pub(crate) fn product_id(entry: &Value) -> Option<String> {
    entry
        .get("Product")
        .and_then(|p| first_id(p, &["ProductId"]))
        .or_else(|| first_id(entry, &["ProductId"]))
}

/// `MarketingName`, else `DisplayName`, trimmed. `None` when blank.
pub(crate) fn product_title(product: &Value) -> Option<String> {
    let title = first_str(product, &["MarketingName", "DisplayName"])?.trim();
    (!title.is_empty()).then(|| title.to_string())
}

pub(crate) fn entry_period_id(entry: &Value) -> Option<String> {
    first_id(entry, &["MenuPeriodId", "PeriodId"])
}

/// Enabled dietary labels followed by category display names.
pub(crate) fn product_tags(product: &Value) -> Vec<String> {
    let dietary = array(product, "DietaryInformation")
        .iter()
        .filter(|d| d.get("IsEnabled").is_some_and(is_present))
        .filter_map(|d| first_str(d, &["Name"]));
    let categories = array(product, "Categories")
        .iter()
        .filter_map(|c| first_str(c, &["DisplayName"]));

    dietary.chain(categories).map(str::to_string).collect()
}

/// Allergens from truthy `Contains*` flags in `AvailableFilters`.
pub(crate) fn product_allergens(
    product: &Value,
    allergen_lookup: &HashMap<String, String>,
) -> Vec<String> {
    let Some(filters) = product.get("AvailableFilters").and_then(Value::as_object) else {
        return Vec::new();
    };

    filters
        .iter()
        .filter(|(_, v)| is_present(v))
        .filter_map(|(key, _)| {
            let bare = key.strip_prefix(ALLERGEN_FLAG_PREFIX)?;
            allergen_lookup
                .get(key)
                .cloned()
                .or_else(|| (!bare.is_empty()).then(|| bare.to_string()))
        })
        .collect()
}

/// Drop case-insensitive duplicates (first spelling wins) and sort by lowercase.
pub(crate) fn dedup_sorted(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out: Vec<String> = values
        .into_iter()
        .filter(|v| seen.insert(v.to_lowercase()))
        .collect();
    out.sort_by_cached_key(|v| v.to_lowercase());
    out
}
