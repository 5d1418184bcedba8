use ohill_core::StationOverrides;
use serde_json::{json, Value};

use super::*;

fn no_overrides() -> StationOverrides {
    StationOverrides::default()
}

fn product(pid: u64, title: &str, station: u64) -> Value {
    json!({
        "StationId": station,
        "Product": {"ProductId": pid, "MarketingName": title}
    })
}

fn breakfast_payload() -> Value {
    json!({
        "Menu": {
            "MenuPeriods": [{"PeriodId": 1, "Name": "Breakfast"}],
            "Stations": [{"StationId": 10, "Name": "Hearth", "PeriodId": 1}],
            "MenuProducts": [product(100, "Eggs", 10)]
        }
    })
}

// ---------------------------------------------------------------------------
// Accumulation
// ---------------------------------------------------------------------------

#[test]
fn merge_builds_meal_station_item_tree() {
    let overrides = no_overrides();
    let mut acc = MenuAccumulator::new();
    let written = PeriodMerger::new(&overrides).merge(&breakfast_payload(), &mut acc, None, None);

    assert_eq!(written, 1);
    let meals = acc.into_meals();
    assert_eq!(
        meals,
        vec![Meal {
            name: "Breakfast".into(),
            stations: vec![MenuStation {
                name: "Hearth".into(),
                items: vec![MenuItem {
                    title: "Eggs".into(),
                    tags: vec![],
                    allergens: vec![],
                    notes: None,
                }],
            }],
        }]
    );
}

#[test]
fn merge_is_idempotent() {
    let overrides = no_overrides();
    let merger = PeriodMerger::new(&overrides);
    let payload = breakfast_payload();

    let mut once = MenuAccumulator::new();
    merger.merge(&payload, &mut once, Some("1"), None);

    let mut twice = MenuAccumulator::new();
    merger.merge(&payload, &mut twice, Some("1"), None);
    merger.merge(&payload, &mut twice, Some("1"), None);

    assert_eq!(once, twice, "re-merging the same payload must not change the tree");
    assert_eq!(twice.item_count(), 1);
}

#[test]
fn later_merge_overwrites_same_key() {
    let overrides = no_overrides();
    let merger = PeriodMerger::new(&overrides);
    let payload = |title: &str| {
        json!({"Menu": {
            "MenuPeriods": [{"PeriodId": 2, "Name": "Lunch"}],
            "MenuProducts": [{
                "StationId": 7,
                "MenuPeriodId": 2,
                "Product": {"ProductId": 55, "MarketingName": title}
            }]
        }})
    };

    let mut acc = MenuAccumulator::new();
    merger.merge(&payload("Old"), &mut acc, None, None);
    merger.merge(&payload("New"), &mut acc, None, None);

    let item = acc.get("Lunch", "Station 7", "55").expect("item present");
    assert_eq!(item.title, "New");
    assert_eq!(acc.item_count(), 1);
}

#[test]
fn same_product_in_two_stations_does_not_collide() {
    let overrides = no_overrides();
    let payload = json!({"Menu": {
        "MenuPeriods": [{"PeriodId": 1, "Name": "Breakfast"}],
        "MenuProducts": [product(9, "Toast", 1), product(9, "Toast", 2)]
    }});
    let mut acc = MenuAccumulator::new();
    PeriodMerger::new(&overrides).merge(&payload, &mut acc, Some("1"), None);

    assert_eq!(acc.item_count(), 2);
    assert!(acc.get("Breakfast", "Station 1", "9").is_some());
    assert!(acc.get("Breakfast", "Station 2", "9").is_some());
}

#[test]
fn entries_without_id_or_title_are_dropped() {
    let overrides = no_overrides();
    let payload = json!({"Menu": {"MenuProducts": [
        {"StationId": 1, "Product": {"MarketingName": "No id"}},
        {"StationId": 1, "Product": {"ProductId": 2, "MarketingName": "   "}},
        {"StationId": 1, "Product": {"ProductId": 3, "DisplayName": "Kept"}},
        {"StationId": 1}
    ]}});
    let mut acc = MenuAccumulator::new();
    let written = PeriodMerger::new(&overrides).merge(&payload, &mut acc, None, None);

    assert_eq!(written, 1);
    assert_eq!(acc.get("Period ?", "Station 1", "3").map(|i| i.title.as_str()), Some("Kept"));
}

#[test]
fn empty_payload_writes_nothing() {
    let overrides = no_overrides();
    let mut acc = MenuAccumulator::new();
    let written = PeriodMerger::new(&overrides).merge(&json!({}), &mut acc, Some("1"), None);
    assert_eq!(written, 0);
    assert!(acc.is_empty());
}

// ---------------------------------------------------------------------------
// Period and meal resolution
// ---------------------------------------------------------------------------

#[test]
fn station_period_beats_entry_period_and_forced_period() {
    let overrides = no_overrides();
    let payload = json!({"Menu": {
        "MenuPeriods": [
            {"PeriodId": 1, "Name": "Breakfast"},
            {"PeriodId": 2, "Name": "Lunch"},
            {"PeriodId": 3, "Name": "Dinner"}
        ],
        "Stations": [{"Id": 4, "MenuPeriod": {"PeriodId": 1}}],
        "MenuProducts": [{
            "StationId": 4,
            "PeriodId": 2,
            "Product": {"ProductId": 1, "MarketingName": "Grits"}
        }]
    }});
    let mut acc = MenuAccumulator::new();
    PeriodMerger::new(&overrides).merge(&payload, &mut acc, Some("3"), Some("Dinner"));

    let item = acc.get("Breakfast", "Station 4", "1").expect("filed under station period");
    assert_eq!(item.period_id.as_deref(), Some("1"));
}

#[test]
fn forced_period_applies_when_nothing_else_resolves() {
    let overrides = no_overrides();
    let payload = json!({"Menu": {
        "MenuPeriods": [{"PeriodId": 3, "Name": "Dinner"}],
        "MenuProducts": [product(1, "Soup", 5)]
    }});
    let mut acc = MenuAccumulator::new();
    PeriodMerger::new(&overrides).merge(&payload, &mut acc, Some("3"), None);

    assert!(acc.get("Dinner", "Station 5", "1").is_some());
}

#[test]
fn forced_name_is_used_when_period_is_undeclared() {
    let overrides = no_overrides();
    let payload = json!({"Menu": {"MenuProducts": [product(1, "Soup", 5)]}});
    let mut acc = MenuAccumulator::new();
    PeriodMerger::new(&overrides).merge(&payload, &mut acc, Some("8"), Some("Late Night"));

    assert!(acc.get("Late Night", "Station 5", "1").is_some());
}

#[test]
fn undeclared_forced_period_synthesizes_name() {
    let overrides = no_overrides();
    let payload = json!({"Menu": {"MenuProducts": [product(1, "Soup", 5)]}});
    let mut acc = MenuAccumulator::new();
    PeriodMerger::new(&overrides).merge(&payload, &mut acc, Some("8"), None);

    assert!(acc.get("Period 8", "Station 5", "1").is_some());
}

#[test]
fn undeclared_entry_period_synthesizes_name_from_its_id() {
    let overrides = no_overrides();
    let payload = json!({"Menu": {"MenuProducts": [{
        "StationId": 5,
        "MenuPeriodId": 12,
        "Product": {"ProductId": 1, "MarketingName": "Soup"}
    }]}});
    let mut acc = MenuAccumulator::new();
    PeriodMerger::new(&overrides).merge(&payload, &mut acc, None, None);

    assert!(acc.get("Period 12", "Station 5", "1").is_some());
}

#[test]
fn empty_forced_id_counts_as_absent() {
    let overrides = no_overrides();
    let payload = json!({"Menu": {"MenuProducts": [product(1, "Soup", 5)]}});
    let mut acc = MenuAccumulator::new();
    PeriodMerger::new(&overrides).merge(&payload, &mut acc, Some(""), Some("Ignored"));

    assert!(acc.get("Period ?", "Station 5", "1").is_some());
}

// ---------------------------------------------------------------------------
// Station names
// ---------------------------------------------------------------------------

#[test]
fn override_wins_over_declared_station_name() {
    let overrides: StationOverrides = [("10".to_string(), "Fire Grill".to_string())]
        .into_iter()
        .collect();
    let mut acc = MenuAccumulator::new();
    PeriodMerger::new(&overrides).merge(&breakfast_payload(), &mut acc, None, None);

    assert!(acc.get("Breakfast", "Fire Grill", "100").is_some());
    assert!(acc.get("Breakfast", "Hearth", "100").is_none());
}

#[test]
fn missing_station_id_uses_question_mark() {
    let overrides = no_overrides();
    let payload = json!({"Menu": {
        "MenuPeriods": [{"PeriodId": 1, "Name": "Breakfast"}],
        "MenuProducts": [{"Product": {"ProductId": 1, "MarketingName": "Fruit"}}]
    }});
    let mut acc = MenuAccumulator::new();
    PeriodMerger::new(&overrides).merge(&payload, &mut acc, Some("1"), None);

    assert!(acc.get("Breakfast", "Station ?", "1").is_some());
}

// ---------------------------------------------------------------------------
// Tags and allergens
// ---------------------------------------------------------------------------

#[test]
fn tags_and_allergens_are_deduped_and_sorted() {
    let overrides = no_overrides();
    let payload = json!({"Menu": {
        "MenuPeriods": [{"PeriodId": 1, "Name": "Lunch"}],
        "Allergens": [{"Id": "ContainsWheat", "Name": "Wheat/Gluten"}],
        "MenuProducts": [{
            "StationId": 3,
            "PeriodId": 1,
            "Product": {
                "ProductId": 77,
                "MarketingName": "Pasta",
                "DietaryInformation": [
                    {"Name": "vegetarian", "IsEnabled": true},
                    {"Name": "Vegetarian", "IsEnabled": true}
                ],
                "Categories": [{"DisplayName": "Entrees"}],
                "AvailableFilters": {"ContainsWheat": true, "ContainsMilk": 1, "ContainsEgg": 0}
            }
        }]
    }});
    let mut acc = MenuAccumulator::new();
    PeriodMerger::new(&overrides).merge(&payload, &mut acc, None, None);

    let item = acc.get("Lunch", "Station 3", "77").expect("item present");
    assert_eq!(item.tags, vec!["Entrees", "vegetarian"]);
    assert_eq!(item.allergens, vec!["Milk", "Wheat/Gluten"]);
}

// ---------------------------------------------------------------------------
// Output ordering
// ---------------------------------------------------------------------------

#[test]
fn meals_emit_in_service_order() {
    let overrides = no_overrides();
    let payload = json!({"Menu": {
        "MenuPeriods": [
            {"PeriodId": 3, "Name": "Dinner"},
            {"PeriodId": 9, "Name": "Snack"},
            {"PeriodId": 1, "Name": "Breakfast"},
            {"PeriodId": 2, "Name": "Lunch"}
        ],
        "MenuProducts": [
            {"StationId": 1, "PeriodId": 3, "Product": {"ProductId": 1, "MarketingName": "A"}},
            {"StationId": 1, "PeriodId": 9, "Product": {"ProductId": 2, "MarketingName": "B"}},
            {"StationId": 1, "PeriodId": 1, "Product": {"ProductId": 3, "MarketingName": "C"}},
            {"StationId": 1, "PeriodId": 2, "Product": {"ProductId": 4, "MarketingName": "D"}}
        ]
    }});
    let mut acc = MenuAccumulator::new();
    PeriodMerger::new(&overrides).merge(&payload, &mut acc, None, None);

    let names: Vec<String> = acc.into_meals().into_iter().map(|m| m.name).collect();
    assert_eq!(names, vec!["Breakfast", "Lunch", "Dinner", "Snack"]);
}

#[test]
fn stations_and_items_emit_alphabetically() {
    let overrides = no_overrides();
    let payload = json!({"Menu": {
        "MenuPeriods": [{"PeriodId": 1, "Name": "Breakfast"}],
        "Stations": [
            {"StationId": 1, "Name": "Trattoria"},
            {"StationId": 2, "Name": "Copper Hood"}
        ],
        "MenuProducts": [
            {"StationId": 1, "PeriodId": 1, "Product": {"ProductId": 1, "MarketingName": "banana"}},
            {"StationId": 1, "PeriodId": 1, "Product": {"ProductId": 2, "MarketingName": "Apple"}},
            {"StationId": 2, "PeriodId": 1, "Product": {"ProductId": 3, "MarketingName": "Oats"}}
        ]
    }});
    let mut acc = MenuAccumulator::new();
    PeriodMerger::new(&overrides).merge(&payload, &mut acc, None, None);

    let meals = acc.into_meals();
    let stations: Vec<&str> = meals[0].stations.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(stations, vec!["Copper Hood", "Trattoria"]);
    let titles: Vec<&str> = meals[0].stations[1]
        .items
        .iter()
        .map(|i| i.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Apple", "banana"]);
}
