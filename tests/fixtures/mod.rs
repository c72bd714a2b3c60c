//! Shared matchup data for integration testing

#![allow(dead_code)]

use chrono::NaiveDate;
use multielo_tracker::config::RatingConfig;
use multielo_tracker::{CompetitorRegistry, Matchup, PlacementSlot};

pub const TOLERANCE: f64 = 1e-9;

pub fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid test date")
}

pub fn tied(ids: &[&str]) -> Option<PlacementSlot> {
    Some(PlacementSlot::Tied(ids.iter().map(|id| id.to_string()).collect()))
}

pub fn single(id: &str) -> Option<PlacementSlot> {
    Some(PlacementSlot::Single(id.to_string()))
}

pub fn default_registry() -> CompetitorRegistry {
    CompetitorRegistry::from_config(&RatingConfig::default()).expect("default config is valid")
}

/// Three weekly family game nights, no ties
pub fn family_game_nights() -> Vec<Matchup> {
    vec![
        Matchup::ranked(date("2020-03-29"), ["Homer", "Marge", "Bart"]),
        Matchup::ranked(date("2020-04-05"), ["Lisa", "Bart", "Homer"]),
        Matchup::ranked(date("2020-04-12"), ["Lisa", "Marge", "Homer"]),
    ]
}

/// Five game nights including tied finishes and empty slots
pub fn family_game_nights_with_ties() -> Vec<Matchup> {
    vec![
        Matchup::ranked(date("2020-03-29"), ["Homer", "Marge", "Bart"]),
        Matchup::new(
            date("2020-04-05"),
            vec![tied(&["Lisa", "Bart"]), None, single("Homer")],
        ),
        Matchup::new(
            date("2020-04-12"),
            vec![tied(&["Lisa", "Marge"]), single("Homer"), None],
        ),
        Matchup::new(
            date("2020-04-19"),
            vec![tied(&["Marge", "Homer", "Bart"]), None, None],
        ),
        Matchup::new(
            date("2020-04-26"),
            vec![single("Lisa"), tied(&["Bart", "Marge"]), single("Homer")],
        ),
    ]
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {}, got {}",
        expected,
        actual
    );
}
