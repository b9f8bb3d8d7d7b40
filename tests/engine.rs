//! End-to-end checks of the loader and the filter/aggregate engine against
//! the committed fixture dataset.

mod common;

use std::collections::BTreeSet;

use encoding_rs::UTF_8;

use resto_explore::{
    aggregate::DEFAULT_MAP_CENTER,
    data::{Availability, Dataset, PriceRange, Restaurant},
    filter::{self, FilterCriteria, Requirement},
    loader,
};

const FIXTURE: &str = "restaurants.csv";

fn load_fixture() -> Dataset {
    let path = common::fixture_path(FIXTURE);
    loader::load(&path, b',', UTF_8).expect("load fixture")
}

#[test]
fn loader_drops_bad_rows_and_keeps_the_rest() {
    let dataset = load_fixture();
    // 12 data lines: one structurally malformed, one without a latitude.
    assert_eq!(dataset.len(), 10);
    assert!(
        dataset
            .rows
            .iter()
            .all(|row| row.latitude.is_finite() && row.longitude.is_finite())
    );
}

#[test]
fn loader_nulls_unparsable_fields_without_dropping_rows() {
    let dataset = load_fixture();
    let unrated = find(&dataset, "Unrated Grill");
    assert_eq!(unrated.average_rating, None);
    assert_eq!(unrated.delivery_minutes, Some(18.0));

    let mystery = find(&dataset, "Mystery Price");
    assert_eq!(mystery.price_range, None);

    let fuzzy = find(&dataset, "Fuzzy Flags");
    assert_eq!(fuzzy.pickup_available, None);
    assert_eq!(fuzzy.delivery_available, None);
}

#[test]
fn quoted_names_with_commas_survive_normalization() {
    let dataset = load_fixture();
    let row = find(&dataset, "Pit Stop, BBQ");
    assert_eq!(row.price_range, Some(PriceRange::Expensive));
}

#[test]
fn unrestricted_criteria_keep_every_fully_comparable_row() {
    let dataset = load_fixture();
    let criteria = FilterCriteria::unrestricted(&dataset);
    let (subset, aggregates) = filter::apply(&dataset, &criteria);
    // Rows with an absent rating or price cannot satisfy their clauses.
    assert_eq!(subset.len(), 8);
    assert_eq!(aggregates.count, 8);
    assert!(!subset.iter().any(|r| r.name.as_deref() == Some("Mystery Price")));
    assert!(!subset.iter().any(|r| r.name.as_deref() == Some("Unrated Grill")));
}

#[test]
fn aggregates_match_hand_computed_fixture_values() {
    let dataset = load_fixture();
    let criteria = FilterCriteria::unrestricted(&dataset);
    let (_, aggregates) = filter::apply(&dataset, &criteria);

    let mean_rating = aggregates.mean_rating.expect("mean rating");
    assert!((mean_rating - 4.075).abs() < 1e-9);

    assert_eq!(aggregates.pickup_availability.yes, 5);
    assert_eq!(aggregates.pickup_availability.no, 2);
    assert_eq!(aggregates.pickup_availability.unknown, 1);
    assert_eq!(aggregates.delivery_availability.yes, 5);

    assert_eq!(aggregates.price_counts[&PriceRange::Budget], 2);
    assert_eq!(aggregates.price_counts[&PriceRange::MidRange], 3);
    assert_eq!(aggregates.price_counts[&PriceRange::Expensive], 2);
    assert_eq!(aggregates.price_counts[&PriceRange::Luxury], 1);
}

#[test]
fn apply_is_deterministic_for_identical_inputs() {
    let dataset = load_fixture();
    let mut criteria = FilterCriteria::unrestricted(&dataset);
    criteria.name_query = "luna".to_string();
    let first = filter::apply(&dataset, &criteria);
    let second = filter::apply(&dataset, &criteria);
    assert_eq!(first.0, second.0);
    assert_eq!(first.1, second.1);
}

#[test]
fn filtered_subset_never_invents_rows() {
    let dataset = load_fixture();
    let mut criteria = FilterCriteria::unrestricted(&dataset);
    criteria.max_rating = 4.2;
    let (subset, _) = filter::apply(&dataset, &criteria);
    for row in &subset {
        assert!(dataset.rows.iter().any(|candidate| candidate == *row));
    }
}

#[test]
fn empty_price_selection_matches_no_row_and_defaults_the_map() {
    let dataset = load_fixture();
    let mut criteria = FilterCriteria::unrestricted(&dataset);
    criteria.price_categories = BTreeSet::new();
    let (subset, aggregates) = filter::apply(&dataset, &criteria);
    assert!(subset.is_empty());
    assert_eq!(aggregates.count, 0);
    assert_eq!(aggregates.map_center, DEFAULT_MAP_CENTER);
}

#[test]
fn name_query_matching_is_case_insensitive() {
    let dataset = load_fixture();
    let mut criteria = FilterCriteria::unrestricted(&dataset);
    criteria.name_query = "cafe".to_string();
    let (subset, _) = filter::apply(&dataset, &criteria);
    let names: Vec<&str> = subset.iter().filter_map(|r| r.name.as_deref()).collect();
    assert_eq!(names, ["CAFE Luna", "Luna Cafeteria"]);
}

#[test]
fn map_center_is_the_mean_of_subset_coordinates() {
    let dataset = load_fixture();
    let mut criteria = FilterCriteria::unrestricted(&dataset);
    criteria.name_query = "luna".to_string();
    let (subset, aggregates) = filter::apply(&dataset, &criteria);
    assert_eq!(subset.len(), 2);
    let expected_lat = (29.7604 + 29.7522) / 2.0;
    let expected_lon = (-95.3698 + -95.3660) / 2.0;
    assert!((aggregates.map_center.latitude - expected_lat).abs() < 1e-9);
    assert!((aggregates.map_center.longitude - expected_lon).abs() < 1e-9);
}

#[test]
fn conjunction_of_all_clauses_selects_exactly_the_expected_row() {
    let rows = vec![
        synthetic("First", 4.0, PriceRange::Budget, 20.0, 10.0, Availability::Yes),
        synthetic("Second", 4.8, PriceRange::Luxury, 50.0, 5.0, Availability::No),
    ];
    let dataset = Dataset::new(rows);
    let criteria = FilterCriteria {
        name_query: String::new(),
        price_categories: BTreeSet::from([PriceRange::Budget, PriceRange::Luxury]),
        max_rating: 4.5,
        max_delivery_minutes: 30.0,
        max_pickup_minutes: 15.0,
        pickup_requirement: Requirement::Any,
        delivery_requirement: Requirement::Any,
    };
    let (subset, aggregates) = filter::apply(&dataset, &criteria);
    assert_eq!(aggregates.count, 1);
    assert_eq!(subset[0].name.as_deref(), Some("First"));
}

fn find<'a>(dataset: &'a Dataset, name: &str) -> &'a Restaurant {
    dataset
        .rows
        .iter()
        .find(|row| row.name.as_deref() == Some(name))
        .unwrap_or_else(|| panic!("fixture row '{name}' not found"))
}

fn synthetic(
    name: &str,
    rating: f64,
    price: PriceRange,
    delivery: f64,
    pickup: f64,
    pickup_available: Availability,
) -> Restaurant {
    Restaurant {
        name: Some(name.to_string()),
        latitude: 29.76,
        longitude: -95.36,
        average_rating: Some(rating),
        price_range: Some(price),
        pickup_available: Some(pickup_available),
        delivery_available: Some(Availability::Yes),
        delivery_minutes: Some(delivery),
        pickup_minutes: Some(pickup),
        display_address: None,
    }
}
